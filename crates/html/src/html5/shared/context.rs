//! Parse context: everything one parse needs before the stages start.

use super::{ErrorPolicy, Input};
use crate::html5::tokenizer::{Html5Tokenizer, TokenizerConfig};

/// Document-level parse context.
///
/// Owns the shared input, the lexer automaton, and the document metadata the
/// tree builder starts from. Built once per parse and consumed by either the
/// pipelined or the sequential driver.
#[derive(Debug)]
pub struct DocumentParseContext {
    pub input: Input,
    pub base_uri: String,
    pub errors: ErrorPolicy,
    pub tokenizer: Html5Tokenizer,
}

impl DocumentParseContext {
    pub fn new(input: &str, base_uri: &str, errors: ErrorPolicy) -> Self {
        Self::with_tokenizer_config(input, base_uri, errors, TokenizerConfig::default())
    }

    pub fn with_tokenizer_config(
        input: &str,
        base_uri: &str,
        errors: ErrorPolicy,
        config: TokenizerConfig,
    ) -> Self {
        let input = Input::new(input);
        let tokenizer = Html5Tokenizer::new(config, input.clone(), errors);
        Self {
            input,
            base_uri: base_uri.to_string(),
            errors,
            tokenizer,
        }
    }
}
