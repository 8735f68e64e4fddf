//! Span types used by HTML5 tokens.

/// Byte span into the decoded input.
///
/// Invariant: spans sit on UTF-8 boundaries of the `Input` that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must be <= end");
        Self { start, end }
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }
}

/// Alias for text spans (used by tokenizer output).
pub type TextSpan = Span;
