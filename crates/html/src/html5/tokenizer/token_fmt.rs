//! Deterministic token formatting for snapshot tests and trace logs.
//!
//! Format: `StartTag(a href="x")`, `StartTag(br/)`, `EndTag(a)`, `Text("x")`,
//! `Comment("c")`, `Doctype(html)`, `Eof`. Attribute encounter order is kept.

use crate::html5::shared::{Attribute, TextResolveError, TextResolver, TextSpan, Token};
use std::fmt::Write;

#[derive(Debug, PartialEq, Eq)]
pub enum TokenFmtError {
    InvalidSpan { span: TextSpan },
}

impl std::fmt::Display for TokenFmtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenFmtError::InvalidSpan { span } => {
                write!(f, "invalid span: {}..{}", span.start, span.end)
            }
        }
    }
}

impl std::error::Error for TokenFmtError {}

impl From<TextResolveError> for TokenFmtError {
    fn from(err: TextResolveError) -> Self {
        match err {
            TextResolveError::InvalidSpan { span } => TokenFmtError::InvalidSpan { span },
        }
    }
}

/// Formatter bound to the input that token spans point into.
pub struct TokenFmt<'a> {
    text: &'a dyn TextResolver,
}

impl<'a> TokenFmt<'a> {
    pub fn new(text: &'a dyn TextResolver) -> Self {
        Self { text }
    }

    pub fn format_token(&self, token: &Token) -> Result<String, TokenFmtError> {
        let mut out = String::new();
        match token {
            Token::Doctype {
                name,
                public_id,
                system_id,
                force_quirks,
            } => {
                out.push_str("Doctype(");
                out.push_str(name.as_ref().map_or("", |n| n.as_str()));
                if let Some(public_id) = public_id {
                    let _ = write!(out, " public=\"{}\"", escape_text(public_id));
                }
                if let Some(system_id) = system_id {
                    let _ = write!(out, " system=\"{}\"", escape_text(system_id));
                }
                if *force_quirks {
                    out.push_str(" quirks");
                }
                out.push(')');
            }
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => {
                let _ = write!(out, "StartTag({name}");
                for attr in attrs {
                    out.push(' ');
                    self.push_attr(&mut out, attr)?;
                }
                if *self_closing {
                    out.push('/');
                }
                out.push(')');
            }
            Token::EndTag { name } => {
                let _ = write!(out, "EndTag({name})");
            }
            Token::Comment { text } => {
                let _ = write!(out, "Comment(\"{}\")", escape_text(&text.resolve(self.text)?));
            }
            Token::Text { text } => {
                let _ = write!(out, "Text(\"{}\")", escape_text(&text.resolve(self.text)?));
            }
            Token::Eof => out.push_str("Eof"),
        }
        Ok(out)
    }

    pub fn format_all<'t>(
        &self,
        tokens: impl IntoIterator<Item = &'t Token>,
    ) -> Result<Vec<String>, TokenFmtError> {
        tokens.into_iter().map(|t| self.format_token(t)).collect()
    }

    fn push_attr(&self, out: &mut String, attr: &Attribute) -> Result<(), TokenFmtError> {
        out.push_str(attr.name.as_str());
        if let Some(value) = &attr.value {
            let _ = write!(out, "=\"{}\"", escape_text(&value.resolve(self.text)?));
        }
        Ok(())
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' || ch == '\u{7f}' => {
                let _ = write!(out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}
