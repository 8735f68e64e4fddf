//! HTML5 token model.

use super::{Atom, TextResolveError, TextResolver, TextSpan};
use std::borrow::Cow;

/// HTML attribute with interned name and optional value.
///
/// Determinism contract:
/// - Attributes on a `StartTag` are stored in encounter order.
/// - Duplicate attributes in a single start tag are dropped after the first
///   occurrence ("first-wins").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: Atom,
    pub value: Option<AttributeValue>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeValue {
    /// Borrowed span into the shared input.
    Span(TextSpan),
    /// Owned value (e.g., after character reference decoding).
    Owned(String),
}

/// Text payload for text/comment tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextValue {
    Span(TextSpan),
    Owned(String),
}

impl TextValue {
    pub fn resolve<'a>(&'a self, text: &'a dyn TextResolver) -> Result<Cow<'a, str>, TextResolveError> {
        match self {
            TextValue::Span(span) => text.resolve_span(*span).map(Cow::Borrowed),
            TextValue::Owned(s) => Ok(Cow::Borrowed(s.as_str())),
        }
    }
}

impl AttributeValue {
    pub fn resolve<'a>(&'a self, text: &'a dyn TextResolver) -> Result<Cow<'a, str>, TextResolveError> {
        match self {
            AttributeValue::Span(span) => text.resolve_span(*span).map(Cow::Borrowed),
            AttributeValue::Owned(s) => Ok(Cow::Borrowed(s.as_str())),
        }
    }
}

/// Lexical token. Immutable once produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Doctype {
        /// Name atomized with HTML ASCII-folding rules.
        name: Option<Atom>,
        public_id: Option<String>,
        system_id: Option<String>,
        force_quirks: bool,
    },
    StartTag {
        name: Atom,
        attrs: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag {
        name: Atom,
    },
    Comment {
        text: TextValue,
    },
    /// Text run in source order.
    Text {
        text: TextValue,
    },
    /// End of input. Produced exactly once, always last.
    Eof,
}

impl Token {
    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Token::Doctype { .. } => "Doctype",
            Token::StartTag { .. } => "StartTag",
            Token::EndTag { .. } => "EndTag",
            Token::Comment { .. } => "Comment",
            Token::Text { .. } => "Text",
            Token::Eof => "Eof",
        }
    }
}
