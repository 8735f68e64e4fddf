//! HTML5 tokenizer (the lexer automaton).
//!
//! This is a pull tokenizer over a complete, shared `Input`: every call to
//! `next_token` returns exactly one token.
//!
//! Invariants:
//! - Between calls the automaton rests in a content-model state; transient
//!   tag/comment/doctype states never outlive a call.
//! - Determinism: the remaining token sequence is a pure function of
//!   (input, cursor, content model, last start tag name). `save_state` captures
//!   exactly that tuple, so restoring a checkpoint replays the same tokens.
//! - Exactly one `Eof` is emitted per pass; restoring a checkpoint re-arms it.
//! - The cursor only moves forward, except through `restore_state`.

use crate::html5::shared::{
    Atom, AtomTable, Attribute, AttributeValue, ErrorList, ErrorOrigin, ErrorPolicy, Input,
    ParseError, ParseErrorCode, TextValue, Token,
};
use char_ref::decode_character_references;
use memchr::memchr;
use states::TokenizerState;

mod char_ref;
mod checkpoint;
mod states;
mod token_fmt;

pub use checkpoint::Checkpoint;
pub use states::ContentModel;
pub use token_fmt::{TokenFmt, TokenFmtError};

/// Configuration for the tokenizer.
#[derive(Clone, Debug)]
pub struct TokenizerConfig {
    /// Decode character references in data text, RCDATA text and attribute values.
    pub decode_character_references: bool,
    /// ASCII-fold tag and attribute names (HTML). When false, names are kept
    /// verbatim (XML).
    pub fold_names: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            decode_character_references: true,
            fold_names: true,
        }
    }
}

/// Checkpointable token source driven by the parse stages.
///
/// `save_state` is only meaningful at a token boundary, i.e. between two
/// `lex` calls; restoring that checkpoint replays the same tokens.
pub trait Lexer {
    fn lex(&mut self) -> Token;

    /// Byte offset where the next token starts.
    fn position(&self) -> usize;

    fn save_state(&self) -> Checkpoint;

    fn restore_state(&mut self, checkpoint: &Checkpoint);

    fn take_errors(&mut self) -> Vec<ParseError>;
}

impl Lexer for Html5Tokenizer {
    fn lex(&mut self) -> Token {
        self.next_token()
    }

    fn position(&self) -> usize {
        Html5Tokenizer::position(self)
    }

    fn save_state(&self) -> Checkpoint {
        Html5Tokenizer::save_state(self)
    }

    fn restore_state(&mut self, checkpoint: &Checkpoint) {
        Html5Tokenizer::restore_state(self, checkpoint)
    }

    fn take_errors(&mut self) -> Vec<ParseError> {
        Html5Tokenizer::take_errors(self)
    }
}

/// Minimal tokenizer instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizerStats {
    pub steps: u64,
    pub state_transitions: u64,
    pub tokens_emitted: u64,
    pub restores: u64,
}

/// Tag under construction.
#[derive(Debug)]
struct TagBuilder {
    is_end: bool,
    name: Option<Atom>,
    attrs: Vec<Attribute>,
    attr_name: Option<Atom>,
    attr_is_duplicate: bool,
    value_start: usize,
    saw_attributes: bool,
    self_closing: bool,
}

impl TagBuilder {
    fn new(is_end: bool) -> Self {
        Self {
            is_end,
            name: None,
            attrs: Vec::new(),
            attr_name: None,
            attr_is_duplicate: false,
            value_start: 0,
            saw_attributes: false,
            self_closing: false,
        }
    }
}

#[derive(Debug)]
enum Step {
    Continue,
    Emit(Token),
}

/// HTML5 tokenizer.
#[derive(Debug)]
pub struct Html5Tokenizer {
    config: TokenizerConfig,
    input: Input,
    atoms: AtomTable,
    state: TokenizerState,
    cursor: usize,
    token_start: usize,
    comment_start: usize,
    tag: Option<TagBuilder>,
    last_start_tag: Option<Atom>,
    emitted: u64,
    eof_emitted: bool,
    errors: ErrorList,
    stats: TokenizerStats,
}

impl Html5Tokenizer {
    pub fn new(config: TokenizerConfig, input: Input, errors: ErrorPolicy) -> Self {
        Self {
            config,
            input,
            atoms: AtomTable::new(),
            state: TokenizerState::Data,
            cursor: 0,
            token_start: 0,
            comment_start: 0,
            tag: None,
            last_start_tag: None,
            emitted: 0,
            eof_emitted: false,
            errors: ErrorList::new(errors),
            stats: TokenizerStats::default(),
        }
    }

    /// Lex one token under the current content model.
    ///
    /// After `Eof` has been returned, further calls keep returning `Eof`
    /// without counting it as a new emission.
    pub fn next_token(&mut self) -> Token {
        if self.eof_emitted {
            return Token::Eof;
        }
        loop {
            self.stats.steps = self.stats.steps.saturating_add(1);
            if let Step::Emit(token) = self.step() {
                return self.emit(token);
            }
        }
    }

    /// Lex everything from the current position up to and including `Eof`.
    pub fn drain_to_eof(&mut self) -> Vec<Token> {
        let mut out = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            out.push(token);
            if done {
                return out;
            }
        }
    }

    /// Snapshot the automaton at the current token boundary.
    pub fn save_state(&self) -> Checkpoint {
        let content_model = self
            .state
            .content_model()
            .unwrap_or(ContentModel::Data);
        debug_assert!(
            self.state.content_model().is_some(),
            "checkpoint taken mid-token in state {:?}",
            self.state
        );
        Checkpoint {
            input_id: self.input.id(),
            offset: self.cursor,
            content_model,
            last_start_tag: self.last_start_tag.clone(),
            emitted: self.emitted,
            errors: self.errors.len(),
        }
    }

    /// Seek back to `checkpoint` and resume under its content model.
    ///
    /// Errors recorded after the checkpoint belong to discarded tokens and are
    /// dropped; replaying records them again if the same tokens reappear.
    /// The checkpoint must come from this tokenizer's input; debug builds
    /// assert it.
    pub fn restore_state(&mut self, checkpoint: &Checkpoint) {
        debug_assert_eq!(
            checkpoint.input_id,
            self.input.id(),
            "checkpoint was taken on a different input"
        );
        log::trace!(
            target: "html5.tokenizer",
            "restore @{} -> @{} as {:?} (emitted {} -> {})",
            self.cursor,
            checkpoint.offset,
            checkpoint.content_model,
            self.emitted,
            checkpoint.emitted
        );
        self.cursor = checkpoint.offset;
        self.state = checkpoint.content_model.into();
        self.last_start_tag = checkpoint.last_start_tag.clone();
        self.emitted = checkpoint.emitted;
        self.errors.truncate(checkpoint.errors);
        self.eof_emitted = false;
        self.tag = None;
        self.stats.restores = self.stats.restores.saturating_add(1);
    }

    pub fn content_model(&self) -> ContentModel {
        self.state.content_model().unwrap_or(ContentModel::Data)
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn stats(&self) -> TokenizerStats {
        self.stats
    }

    /// Take the lexical errors recorded so far.
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        self.errors.take()
    }

    fn emit(&mut self, token: Token) -> Token {
        debug_assert!(
            self.state.content_model().is_some(),
            "token emitted from transient state {:?}",
            self.state
        );
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html5.tokenizer", "emit token #{}: {token:?}", self.emitted);
        self.emitted += 1;
        self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
        if token.is_eof() {
            self.eof_emitted = true;
        }
        token
    }

    fn transition_to(&mut self, next: TokenizerState) {
        if self.state == next {
            return;
        }
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "html5.tokenizer",
            "state {:?} -> {:?} @{}",
            self.state,
            next,
            self.cursor
        );
        self.state = next;
        self.stats.state_transitions = self.stats.state_transitions.saturating_add(1);
    }

    fn error(&mut self, code: ParseErrorCode) {
        self.errors.record(ErrorOrigin::Tokenizer, code, self.cursor);
    }

    fn step(&mut self) -> Step {
        match self.state {
            TokenizerState::Data => self.step_data(),
            TokenizerState::RcData => self.step_raw_text(true),
            TokenizerState::RawText | TokenizerState::ScriptData => self.step_raw_text(false),
            TokenizerState::PlainText => self.step_plaintext(),
            TokenizerState::TagOpen => self.step_tag_open(),
            TokenizerState::EndTagOpen => self.step_end_tag_open(),
            TokenizerState::TagName => self.step_tag_name(),
            TokenizerState::BeforeAttributeName => self.step_before_attribute_name(),
            TokenizerState::AttributeName => self.step_attribute_name(),
            TokenizerState::AfterAttributeName => self.step_after_attribute_name(),
            TokenizerState::BeforeAttributeValue => self.step_before_attribute_value(),
            TokenizerState::AttributeValueDoubleQuoted => self.step_attribute_value_quoted(b'"'),
            TokenizerState::AttributeValueSingleQuoted => self.step_attribute_value_quoted(b'\''),
            TokenizerState::AttributeValueUnquoted => self.step_attribute_value_unquoted(),
            TokenizerState::SelfClosingStartTag => self.step_self_closing_start_tag(),
            TokenizerState::MarkupDeclarationOpen => self.step_markup_declaration_open(),
            TokenizerState::Comment => self.step_comment(),
            TokenizerState::BogusComment => self.step_bogus_comment(),
            TokenizerState::Doctype => self.step_doctype(),
        }
    }

    fn step_data(&mut self) -> Step {
        let Some(b) = self.peek() else {
            return Step::Emit(Token::Eof);
        };
        if b == b'<' {
            self.token_start = self.cursor;
            self.cursor += 1;
            self.transition_to(TokenizerState::TagOpen);
            return Step::Continue;
        }
        let end = self.find_byte(b'<').unwrap_or(self.input.len());
        let token = self.text_token(self.cursor, end, true);
        self.cursor = end;
        Step::Emit(token)
    }

    /// RCDATA, RAWTEXT and script data: text up to the appropriate end tag.
    fn step_raw_text(&mut self, decode: bool) -> Step {
        if self.peek().is_none() {
            return Step::Emit(Token::Eof);
        }
        let close = self
            .last_start_tag
            .as_ref()
            .and_then(|name| find_appropriate_end_tag(self.input.as_str(), self.cursor, name.as_str()));
        match close {
            Some(at) if at == self.cursor => {
                self.token_start = at;
                self.cursor = at + 2;
                self.tag = Some(TagBuilder::new(true));
                self.transition_to(TokenizerState::TagName);
                Step::Continue
            }
            Some(at) => {
                let token = self.text_token(self.cursor, at, decode);
                self.cursor = at;
                Step::Emit(token)
            }
            None => {
                let end = self.input.len();
                let token = self.text_token(self.cursor, end, decode);
                self.cursor = end;
                Step::Emit(token)
            }
        }
    }

    fn step_plaintext(&mut self) -> Step {
        if self.peek().is_none() {
            return Step::Emit(Token::Eof);
        }
        let end = self.input.len();
        let token = self.text_token(self.cursor, end, false);
        self.cursor = end;
        Step::Emit(token)
    }

    fn step_tag_open(&mut self) -> Step {
        match self.peek() {
            Some(b'!') => {
                self.cursor += 1;
                self.transition_to(TokenizerState::MarkupDeclarationOpen);
                Step::Continue
            }
            Some(b'/') => {
                self.cursor += 1;
                self.transition_to(TokenizerState::EndTagOpen);
                Step::Continue
            }
            Some(b) if b.is_ascii_alphabetic() => {
                self.tag = Some(TagBuilder::new(false));
                self.transition_to(TokenizerState::TagName);
                Step::Continue
            }
            Some(b'?') => {
                self.error(ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName);
                self.comment_start = self.cursor;
                self.transition_to(TokenizerState::BogusComment);
                Step::Continue
            }
            None => {
                self.error(ParseErrorCode::EofBeforeTagName);
                self.transition_to(TokenizerState::Data);
                Step::Emit(self.text_token(self.token_start, self.cursor, false))
            }
            Some(_) => {
                // The `<` is text; reprocess the current byte in Data.
                self.error(ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.transition_to(TokenizerState::Data);
                Step::Emit(self.text_token(self.token_start, self.cursor, false))
            }
        }
    }

    fn step_end_tag_open(&mut self) -> Step {
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() => {
                self.tag = Some(TagBuilder::new(true));
                self.transition_to(TokenizerState::TagName);
                Step::Continue
            }
            Some(b'>') => {
                self.error(ParseErrorCode::MissingEndTagName);
                self.cursor += 1;
                self.transition_to(TokenizerState::Data);
                Step::Continue
            }
            None => {
                self.error(ParseErrorCode::EofBeforeTagName);
                self.transition_to(TokenizerState::Data);
                Step::Emit(self.text_token(self.token_start, self.cursor, false))
            }
            Some(_) => {
                self.error(ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.comment_start = self.cursor;
                self.transition_to(TokenizerState::BogusComment);
                Step::Continue
            }
        }
    }

    fn step_tag_name(&mut self) -> Step {
        let start = self.cursor;
        let end = self.scan_until(start, is_tag_name_stop);
        if end == self.input.len() {
            return self.eof_in_tag();
        }
        let name = self.intern_name(start, end);
        if let Some(tag) = self.tag.as_mut() {
            tag.name = Some(name);
        }
        self.cursor = end;
        self.transition_to(TokenizerState::BeforeAttributeName);
        Step::Continue
    }

    fn step_before_attribute_name(&mut self) -> Step {
        self.skip_whitespace();
        match self.peek() {
            None => self.eof_in_tag(),
            Some(b'>') => {
                self.cursor += 1;
                self.emit_current_tag()
            }
            Some(b'/') => {
                self.cursor += 1;
                self.transition_to(TokenizerState::SelfClosingStartTag);
                Step::Continue
            }
            Some(_) => {
                self.transition_to(TokenizerState::AttributeName);
                Step::Continue
            }
        }
    }

    fn step_attribute_name(&mut self) -> Step {
        let start = self.cursor;
        // A leading `=` is part of the name.
        let scan_from = if self.peek() == Some(b'=') { start + 1 } else { start };
        let end = self.scan_until(scan_from, |b| is_tag_name_stop(b) || b == b'=');
        let name = self.intern_name(start, end);
        self.cursor = end;
        let duplicate = self
            .tag
            .as_ref()
            .is_some_and(|tag| tag.attrs.iter().any(|attr| attr.name == name));
        if duplicate {
            self.errors
                .record(ErrorOrigin::Tokenizer, ParseErrorCode::DuplicateAttribute, start);
        }
        if let Some(tag) = self.tag.as_mut() {
            tag.attr_name = Some(name);
            tag.attr_is_duplicate = duplicate;
            tag.saw_attributes = true;
        }
        self.transition_to(TokenizerState::AfterAttributeName);
        Step::Continue
    }

    fn step_after_attribute_name(&mut self) -> Step {
        self.skip_whitespace();
        match self.peek() {
            None => self.eof_in_tag(),
            Some(b'=') => {
                self.cursor += 1;
                self.transition_to(TokenizerState::BeforeAttributeValue);
                Step::Continue
            }
            Some(b'/') => {
                self.finish_attribute(None);
                self.cursor += 1;
                self.transition_to(TokenizerState::SelfClosingStartTag);
                Step::Continue
            }
            Some(b'>') => {
                self.finish_attribute(None);
                self.cursor += 1;
                self.emit_current_tag()
            }
            Some(_) => {
                self.finish_attribute(None);
                self.transition_to(TokenizerState::AttributeName);
                Step::Continue
            }
        }
    }

    fn step_before_attribute_value(&mut self) -> Step {
        self.skip_whitespace();
        let next = match self.peek() {
            None => return self.eof_in_tag(),
            Some(b'"') => TokenizerState::AttributeValueDoubleQuoted,
            Some(b'\'') => TokenizerState::AttributeValueSingleQuoted,
            Some(b'>') => {
                self.finish_attribute(Some(AttributeValue::Owned(String::new())));
                self.cursor += 1;
                return self.emit_current_tag();
            }
            Some(_) => {
                self.set_value_start(self.cursor);
                self.transition_to(TokenizerState::AttributeValueUnquoted);
                return Step::Continue;
            }
        };
        self.cursor += 1;
        self.set_value_start(self.cursor);
        self.transition_to(next);
        Step::Continue
    }

    fn step_attribute_value_quoted(&mut self, quote: u8) -> Step {
        let Some(close) = self.find_byte(quote) else {
            return self.eof_in_tag();
        };
        let start = self.tag.as_ref().map_or(self.cursor, |tag| tag.value_start);
        let value = self.attribute_value(start, close);
        self.finish_attribute(Some(value));
        self.cursor = close + 1;
        self.transition_to(TokenizerState::BeforeAttributeName);
        Step::Continue
    }

    fn step_attribute_value_unquoted(&mut self) -> Step {
        let end = self.scan_until(self.cursor, |b| b.is_ascii_whitespace() || b == b'>');
        if end == self.input.len() {
            return self.eof_in_tag();
        }
        let start = self.tag.as_ref().map_or(self.cursor, |tag| tag.value_start);
        let value = self.attribute_value(start, end);
        self.finish_attribute(Some(value));
        self.cursor = end;
        self.transition_to(TokenizerState::BeforeAttributeName);
        Step::Continue
    }

    fn step_self_closing_start_tag(&mut self) -> Step {
        match self.peek() {
            None => self.eof_in_tag(),
            Some(b'>') => {
                self.cursor += 1;
                if let Some(tag) = self.tag.as_mut() {
                    tag.self_closing = true;
                }
                self.emit_current_tag()
            }
            Some(_) => {
                // Stray solidus inside a tag; continue with attributes.
                self.transition_to(TokenizerState::BeforeAttributeName);
                Step::Continue
            }
        }
    }

    fn step_markup_declaration_open(&mut self) -> Step {
        if self.starts_with(b"--") {
            self.cursor += 2;
            self.comment_start = self.cursor;
            self.transition_to(TokenizerState::Comment);
        } else if self.starts_with_ignore_ascii_case(b"doctype") {
            self.cursor += b"doctype".len();
            self.transition_to(TokenizerState::Doctype);
        } else {
            self.error(ParseErrorCode::IncorrectlyOpenedComment);
            self.comment_start = self.cursor;
            self.transition_to(TokenizerState::BogusComment);
        }
        Step::Continue
    }

    fn step_comment(&mut self) -> Step {
        let start = self.comment_start;
        // `<!-->` and `<!--->` close an empty comment.
        let abrupt = if self.starts_with(b">") {
            Some(1)
        } else if self.starts_with(b"->") {
            Some(2)
        } else {
            None
        };
        let (text_end, resume) = match abrupt {
            Some(len) => (start, start + len),
            None => match self.input.as_str()[start..].find("-->") {
                Some(rel) => (start + rel, start + rel + 3),
                None => {
                    self.cursor = self.input.len();
                    self.error(ParseErrorCode::EofInComment);
                    (self.input.len(), self.input.len())
                }
            },
        };
        self.cursor = resume;
        self.transition_to(TokenizerState::Data);
        Step::Emit(Token::Comment {
            text: TextValue::Span(self.input.span(start, text_end)),
        })
    }

    fn step_bogus_comment(&mut self) -> Step {
        let start = self.comment_start;
        let (text_end, resume) = match self.find_byte(b'>') {
            Some(at) => (at, at + 1),
            None => (self.input.len(), self.input.len()),
        };
        self.cursor = resume;
        self.transition_to(TokenizerState::Data);
        Step::Emit(Token::Comment {
            text: TextValue::Span(self.input.span(start, text_end)),
        })
    }

    fn step_doctype(&mut self) -> Step {
        let body_start = self.cursor;
        let (body_end, resume, terminated) = match self.find_byte(b'>') {
            Some(at) => (at, at + 1, true),
            None => (self.input.len(), self.input.len(), false),
        };
        if !terminated {
            self.cursor = body_end;
            self.error(ParseErrorCode::EofInDoctype);
        }
        let DoctypeFields {
            name: raw_name,
            public_id,
            system_id,
            malformed,
        } = parse_doctype_body(&self.input.as_str()[body_start..body_end]);
        let name = match raw_name {
            Some(raw) => Some(self.atoms.intern_ascii_folded(raw)),
            None => {
                self.errors.record(
                    ErrorOrigin::Tokenizer,
                    ParseErrorCode::MissingDoctypeName,
                    body_start,
                );
                None
            }
        };
        let force_quirks = !terminated || name.is_none() || malformed;
        self.cursor = resume;
        self.transition_to(TokenizerState::Data);
        Step::Emit(Token::Doctype {
            name,
            public_id,
            system_id,
            force_quirks,
        })
    }

    fn eof_in_tag(&mut self) -> Step {
        self.cursor = self.input.len();
        self.error(ParseErrorCode::EofInTag);
        self.tag = None;
        self.transition_to(TokenizerState::Data);
        Step::Continue
    }

    fn emit_current_tag(&mut self) -> Step {
        self.transition_to(TokenizerState::Data);
        let Some(tag) = self.tag.take() else {
            return Step::Continue;
        };
        let Some(name) = tag.name else {
            return Step::Continue;
        };
        if tag.is_end {
            if tag.saw_attributes {
                self.errors.record(
                    ErrorOrigin::Tokenizer,
                    ParseErrorCode::EndTagWithAttributes,
                    self.token_start,
                );
            }
            return Step::Emit(Token::EndTag { name });
        }
        self.last_start_tag = Some(name.clone());
        Step::Emit(Token::StartTag {
            name,
            attrs: tag.attrs,
            self_closing: tag.self_closing,
        })
    }

    fn set_value_start(&mut self, at: usize) {
        if let Some(tag) = self.tag.as_mut() {
            tag.value_start = at;
        }
    }

    fn finish_attribute(&mut self, value: Option<AttributeValue>) {
        let Some(tag) = self.tag.as_mut() else {
            return;
        };
        let Some(name) = tag.attr_name.take() else {
            return;
        };
        // End-tag attributes are reported once the tag is emitted.
        if tag.attr_is_duplicate || tag.is_end {
            return;
        }
        tag.attrs.push(Attribute { name, value });
    }

    fn attribute_value(&mut self, start: usize, end: usize) -> AttributeValue {
        match self.decoded(start, end) {
            Some(owned) => AttributeValue::Owned(owned),
            None => AttributeValue::Span(self.input.span(start, end)),
        }
    }

    fn text_token(&mut self, start: usize, end: usize, decode: bool) -> Token {
        let decoded = if decode { self.decoded(start, end) } else { None };
        let text = match decoded {
            Some(owned) => TextValue::Owned(owned),
            None => TextValue::Span(self.input.span(start, end)),
        };
        Token::Text { text }
    }

    /// Decode character references in `start..end`, or `None` if the raw span
    /// can be used as-is.
    fn decoded(&mut self, start: usize, end: usize) -> Option<String> {
        if !self.config.decode_character_references {
            return None;
        }
        let raw = &self.input.as_str()[start..end];
        let decoded = decode_character_references(raw);
        for rel in &decoded.invalid {
            self.errors.record(
                ErrorOrigin::Tokenizer,
                ParseErrorCode::InvalidCharacterReference,
                start + rel,
            );
        }
        match decoded.text {
            std::borrow::Cow::Borrowed(_) => None,
            std::borrow::Cow::Owned(owned) => Some(owned),
        }
    }

    fn intern_name(&mut self, start: usize, end: usize) -> Atom {
        let raw = &self.input.as_str()[start..end];
        if self.config.fold_names {
            self.atoms.intern_ascii_folded(raw)
        } else {
            self.atoms.intern_exact(raw)
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_str().as_bytes().get(self.cursor).copied()
    }

    fn starts_with(&self, prefix: &[u8]) -> bool {
        self.input.as_str().as_bytes()[self.cursor..].starts_with(prefix)
    }

    fn starts_with_ignore_ascii_case(&self, prefix: &[u8]) -> bool {
        self.input.as_str().as_bytes()[self.cursor..]
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    }

    fn find_byte(&self, needle: u8) -> Option<usize> {
        memchr(needle, &self.input.as_str().as_bytes()[self.cursor..]).map(|rel| self.cursor + rel)
    }

    /// Index of the first byte at or after `from` matching `stop`, or input length.
    ///
    /// Stop predicates only match ASCII bytes, so the result is a char boundary.
    fn scan_until(&self, from: usize, stop: impl Fn(u8) -> bool) -> usize {
        let bytes = self.input.as_str().as_bytes();
        bytes[from..]
            .iter()
            .position(|&b| stop(b))
            .map_or(bytes.len(), |rel| from + rel)
    }

    fn skip_whitespace(&mut self) {
        self.cursor = self.scan_until(self.cursor, |b| !b.is_ascii_whitespace());
    }
}

fn is_tag_name_stop(b: u8) -> bool {
    b == b'>' || b == b'/' || b.is_ascii_whitespace()
}

/// Find `</name` followed by whitespace, `/` or `>` at or after `from`.
///
/// Matching is ASCII case-insensitive. A candidate cut off by end of input is
/// not an end tag.
fn find_appropriate_end_tag(text: &str, from: usize, name: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let name = name.as_bytes();
    let mut i = from;
    while let Some(rel) = memchr(b'<', &bytes[i..]) {
        let at = i + rel;
        let name_start = at + 2;
        let name_end = name_start + name.len();
        if bytes.get(at + 1) == Some(&b'/')
            && bytes
                .get(name_start..name_end)
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
            && bytes.get(name_end).is_some_and(|&b| is_tag_name_stop(b))
        {
            return Some(at);
        }
        i = at + 1;
    }
    None
}

#[derive(Debug, Default, PartialEq, Eq)]
struct DoctypeFields<'a> {
    name: Option<&'a str>,
    public_id: Option<String>,
    system_id: Option<String>,
    malformed: bool,
}

fn parse_doctype_body(body: &str) -> DoctypeFields<'_> {
    let mut fields = DoctypeFields::default();
    let rest = body.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let name_len = rest
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(rest.len());
    if name_len == 0 {
        return fields;
    }
    fields.name = Some(&rest[..name_len]);
    let mut rest = rest[name_len..].trim_start_matches(|c: char| c.is_ascii_whitespace());
    if rest.is_empty() {
        return fields;
    }
    let keyword_len = rest
        .find(|c: char| c.is_ascii_whitespace() || c == '"' || c == '\'')
        .unwrap_or(rest.len());
    let keyword = &rest[..keyword_len];
    rest = &rest[keyword_len..];
    if keyword.eq_ignore_ascii_case("public") {
        match take_quoted(rest) {
            Some((public_id, tail)) => {
                fields.public_id = Some(public_id.to_string());
                if let Some((system_id, _)) = take_quoted(tail) {
                    fields.system_id = Some(system_id.to_string());
                }
            }
            None => fields.malformed = true,
        }
    } else if keyword.eq_ignore_ascii_case("system") {
        match take_quoted(rest) {
            Some((system_id, _)) => fields.system_id = Some(system_id.to_string()),
            None => fields.malformed = true,
        }
    } else {
        fields.malformed = true;
    }
    fields
}

/// Split a leading quoted string off `s` (after optional whitespace).
fn take_quoted(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let quote = s.chars().next().filter(|&c| c == '"' || c == '\'')?;
    let body = &s[1..];
    let close = body.find(quote)?;
    Some((&body[..close], &body[close + 1..]))
}

#[cfg(test)]
mod tests;
