//! Pipelined HTML lexer/parser.
//!
//! The tokenizer and the tree builder run as two stages connected by a
//! single-slot handoff. Tree construction can send the tokenizer back to
//! re-lex under a different content model (e.g. raw text after `<script>`).
//! See [`html5::pipeline`] for the concurrency contract.

#[cfg(any(test, feature = "dom-snapshot"))]
pub mod dom_snapshot;
pub mod html5;

mod types;

pub use crate::html5::{
    ExecutionMode, Grammar, ParseError, ParseErrorCode, ParseOutput, ParserConfig, PipelineError,
    PipelineStats, parse, parse_with,
};
pub use crate::types::{Id, Node, NodeId};
