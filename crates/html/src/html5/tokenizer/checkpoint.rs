//! Lexer checkpoints.

use super::ContentModel;
use crate::html5::shared::Atom;

/// Immutable snapshot sufficient to resume lexing deterministically.
///
/// A checkpoint is only meaningful for the tokenizer (and `Input`) that
/// produced it. Restoring it with the same content model reproduces exactly
/// the token sequence that followed the anchor token originally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    pub(crate) input_id: u64,
    pub(crate) offset: usize,
    pub(crate) content_model: ContentModel,
    pub(crate) last_start_tag: Option<Atom>,
    pub(crate) emitted: u64,
    pub(crate) errors: usize,
}

impl Checkpoint {
    /// Byte offset into the input at which lexing resumes.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn content_model(&self) -> ContentModel {
        self.content_model
    }

    /// Number of tokens emitted before this checkpoint was taken. The anchor
    /// token is token number `anchor_index() - 1` (zero-based).
    pub fn anchor_index(&self) -> u64 {
        self.emitted
    }

    pub fn last_start_tag(&self) -> Option<&Atom> {
        self.last_start_tag.as_ref()
    }

    /// Same resume point, different content model.
    pub fn with_content_model(&self, content_model: ContentModel) -> Self {
        Self {
            content_model,
            ..self.clone()
        }
    }
}
