//! Tokenizer state machine definitions.

/// Content model governing how text after a tag is tokenized.
///
/// These are the only states the automaton rests in between tokens, and hence
/// the only states a `Checkpoint` can carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContentModel {
    /// Markup is recognized.
    #[default]
    Data,
    /// Text with character references, ended by the appropriate end tag
    /// (`title`, `textarea`).
    RcData,
    /// Raw text ended by the appropriate end tag (`style`, `xmp`, ...).
    RawText,
    /// Script body, ended by `</script`.
    ScriptData,
    /// Everything to end of input is text.
    PlainText,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenizerState {
    Data,
    RcData,
    RawText,
    ScriptData,
    PlainText,
    TagOpen,
    EndTagOpen,
    TagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    SelfClosingStartTag,
    MarkupDeclarationOpen,
    Comment,
    BogusComment,
    Doctype,
}

impl From<ContentModel> for TokenizerState {
    fn from(model: ContentModel) -> Self {
        match model {
            ContentModel::Data => TokenizerState::Data,
            ContentModel::RcData => TokenizerState::RcData,
            ContentModel::RawText => TokenizerState::RawText,
            ContentModel::ScriptData => TokenizerState::ScriptData,
            ContentModel::PlainText => TokenizerState::PlainText,
        }
    }
}

impl TokenizerState {
    /// The content model this state rests in, if it is a token boundary state.
    pub(crate) fn content_model(self) -> Option<ContentModel> {
        match self {
            TokenizerState::Data => Some(ContentModel::Data),
            TokenizerState::RcData => Some(ContentModel::RcData),
            TokenizerState::RawText => Some(ContentModel::RawText),
            TokenizerState::ScriptData => Some(ContentModel::ScriptData),
            TokenizerState::PlainText => Some(ContentModel::PlainText),
            _ => None,
        }
    }
}
