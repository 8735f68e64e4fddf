//! Shared types for the HTML5 parsing path.
//!
//! This module is `pub(crate)`; downstream consumers import these types via
//! `html_pipeline::html5::{Token, Span, ParseError, ...}`.

mod atom;
mod context;
mod counters;
mod error;
mod input;
mod span;
mod token;

pub use atom::{Atom, AtomTable};
pub use context::DocumentParseContext;
pub use counters::{PipelineState, PipelineStats};
pub(crate) use error::{ErrorList, merge_errors};
pub use error::{ErrorOrigin, ErrorPolicy, ParseError, ParseErrorCode};
pub use input::{Input, TextResolveError, TextResolver};
pub use span::{Span, TextSpan};
pub use token::{Attribute, AttributeValue, TextValue, Token};
