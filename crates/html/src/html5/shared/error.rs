//! Parse errors for tokenization/tree-building.
//!
//! These are recoverable: they are accumulated and returned alongside the
//! document. Fatal pipeline faults live in `html5::pipeline::PipelineError`.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorCode {
    EofBeforeTagName,
    EofInTag,
    EofInComment,
    EofInDoctype,
    InvalidFirstCharacterOfTagName,
    MissingEndTagName,
    UnexpectedQuestionMarkInsteadOfTagName,
    IncorrectlyOpenedComment,
    DuplicateAttribute,
    EndTagWithAttributes,
    MissingDoctypeName,
    InvalidCharacterReference,
    UnexpectedEndTag,
    MisplacedDoctype,
    NonVoidSelfClosingTag,
    UnclosedElement,
}

impl ParseErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseErrorCode::EofBeforeTagName => "eof-before-tag-name",
            ParseErrorCode::EofInTag => "eof-in-tag",
            ParseErrorCode::EofInComment => "eof-in-comment",
            ParseErrorCode::EofInDoctype => "eof-in-doctype",
            ParseErrorCode::InvalidFirstCharacterOfTagName => {
                "invalid-first-character-of-tag-name"
            }
            ParseErrorCode::MissingEndTagName => "missing-end-tag-name",
            ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName => {
                "unexpected-question-mark-instead-of-tag-name"
            }
            ParseErrorCode::IncorrectlyOpenedComment => "incorrectly-opened-comment",
            ParseErrorCode::DuplicateAttribute => "duplicate-attribute",
            ParseErrorCode::EndTagWithAttributes => "end-tag-with-attributes",
            ParseErrorCode::MissingDoctypeName => "missing-doctype-name",
            ParseErrorCode::InvalidCharacterReference => "invalid-character-reference",
            ParseErrorCode::UnexpectedEndTag => "unexpected-end-tag",
            ParseErrorCode::MisplacedDoctype => "misplaced-doctype",
            ParseErrorCode::NonVoidSelfClosingTag => "non-void-html-element-start-tag-with-trailing-solidus",
            ParseErrorCode::UnclosedElement => "unclosed-element",
        }
    }
}

/// Which stage recorded an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorOrigin {
    Tokenizer,
    TreeBuilder,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: ParseErrorCode,
    pub origin: ErrorOrigin,
    /// Byte offset into the decoded input.
    pub position: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.code.as_str(), self.position)
    }
}

/// Error tracking policy.
///
/// `max_errors == 0` disables tracking entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ErrorPolicy {
    pub max_errors: usize,
}

impl ErrorPolicy {
    pub fn no_tracking() -> Self {
        Self { max_errors: 0 }
    }

    pub fn tracking(max_errors: usize) -> Self {
        Self { max_errors }
    }

    pub fn is_tracking(self) -> bool {
        self.max_errors > 0
    }
}

/// Bounded per-stage error list.
#[derive(Clone, Debug, Default)]
pub(crate) struct ErrorList {
    policy: ErrorPolicy,
    errors: Vec<ParseError>,
}

impl ErrorList {
    pub(crate) fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            errors: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, origin: ErrorOrigin, code: ParseErrorCode, position: usize) {
        if self.errors.len() >= self.policy.max_errors {
            return;
        }
        log::trace!(target: "html5.errors", "{origin:?}: {} @{position}", code.as_str());
        self.errors.push(ParseError {
            code,
            origin,
            position,
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.errors.truncate(len);
    }

    pub(crate) fn take(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }
}

/// Merge per-stage error lists into a single position-ordered list.
///
/// The sort is stable, so equal positions keep tokenizer-before-builder order.
pub(crate) fn merge_errors(
    policy: ErrorPolicy,
    tokenizer: Vec<ParseError>,
    builder: Vec<ParseError>,
) -> Vec<ParseError> {
    let mut all = tokenizer;
    all.extend(builder);
    all.sort_by_key(|err| err.position);
    all.truncate(policy.max_errors);
    all
}
