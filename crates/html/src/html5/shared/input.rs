//! Decoded input shared by the lexer and parser stages.

use super::span::TextSpan;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Decoded Unicode input for one parse.
///
/// Invariant: the text is immutable for the lifetime of the parse, so spans
/// handed out by the tokenizer stay resolvable on the syntax-stage thread even
/// after a rollback discards the token that carried them.
#[derive(Clone, Debug)]
pub struct Input {
    id: u64,
    text: Arc<str>,
}

impl Input {
    pub fn new(text: &str) -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            text: Arc::from(text),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Opaque identity for this input instance.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Create a span for the given range.
    pub fn span(&self, start: usize, end: usize) -> TextSpan {
        debug_assert!(
            self.text.is_char_boundary(start) && self.text.is_char_boundary(end),
            "span must be on UTF-8 boundaries"
        );
        TextSpan::new(start, end)
    }
}

/// Failure to resolve a span against an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextResolveError {
    InvalidSpan { span: TextSpan },
}

/// Resolve text spans into `&str`.
pub trait TextResolver {
    fn resolve_span(&self, span: TextSpan) -> Result<&str, TextResolveError>;
}

impl TextResolver for Input {
    fn resolve_span(&self, span: TextSpan) -> Result<&str, TextResolveError> {
        let text = self.as_str();
        if !(span.start <= span.end
            && span.end <= text.len()
            && text.is_char_boundary(span.start)
            && text.is_char_boundary(span.end))
        {
            return Err(TextResolveError::InvalidSpan { span });
        }
        Ok(&text[span.start..span.end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_valid_spans_and_rejects_split_chars() {
        let input = Input::new("héllo");
        assert_eq!(input.resolve_span(TextSpan::new(0, 1)), Ok("h"));
        assert!(input.resolve_span(TextSpan::new(0, 2)).is_err());
        assert!(input.resolve_span(TextSpan::new(3, 99)).is_err());
    }

    #[test]
    fn clones_share_identity() {
        let input = Input::new("abc");
        let other = input.clone();
        assert_eq!(input.id(), other.id());
        assert_ne!(input.id(), Input::new("abc").id());
    }
}
