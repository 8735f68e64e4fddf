//! HTML5 parsing path: tokenizer, tree builders and the two-stage pipeline.

pub mod pipeline;
mod session;
pub(crate) mod shared;
pub mod tokenizer;
pub mod tree_builder;

// Public re-exports: consumers should import from `html_pipeline::html5::*` rather than `shared::*`.
pub use pipeline::{ParseOutput, Pipeline, PipelineConfig, PipelineError, Stage};
pub use session::{
    AnyTreeBuilder, ExecutionMode, Grammar, ParserConfig, parse, parse_sequential, parse_with,
};
pub use shared::{
    Atom, AtomTable, Attribute, AttributeValue, DocumentParseContext, ErrorOrigin, ErrorPolicy,
    Input, ParseError, ParseErrorCode, PipelineState, PipelineStats, Span, TextResolveError,
    TextResolver, TextSpan, TextValue, Token,
};
pub use tokenizer::{
    Checkpoint, ContentModel, Html5Tokenizer, Lexer, TokenFmt, TokenizerConfig, TokenizerStats,
};
pub use tree_builder::{
    BuiltDocument, EngineInvariantError, Html5TreeBuilder, IgnoreRollback, RollbackSink,
    TreeBuilderConfig, TreeBuilderError, TreeConstruction, XmlTreeBuilder,
};
