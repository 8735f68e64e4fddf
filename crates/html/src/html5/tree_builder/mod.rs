//! Tree construction.
//!
//! A builder consumes tokens in order and grows a document. Builders never
//! touch the tokenizer directly: when a start tag changes how the following
//! text must be lexed (e.g. `<script>`), the builder asks for a content-model
//! switch through a [`RollbackSink`], and the driver (pipelined or
//! sequential) re-lexes everything after that token.

use crate::html5::shared::{
    Atom, Attribute, DocumentParseContext, ErrorList, ErrorOrigin, Input, ParseError,
    ParseErrorCode, TextResolveError, TextValue, Token,
};
use crate::html5::tokenizer::ContentModel;
use crate::types::Node;
use arena::{DOCUMENT, NodeArena, NodeIndex};
use stack::{OpenElement, OpenElementsStack, ScopeKind};

mod arena;
mod elements;
mod stack;
mod xml;

pub use xml::XmlTreeBuilder;

#[derive(Clone, Debug)]
pub struct TreeBuilderConfig {
    /// Merge adjacent text into a single text node.
    pub coalesce_text: bool,
}

impl Default for TreeBuilderConfig {
    fn default() -> Self {
        Self {
            coalesce_text: true,
        }
    }
}

/// Engine invariant violation (bug/corruption), not a recoverable HTML error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("tree builder invariant violated: {detail}")]
pub struct EngineInvariantError {
    pub detail: &'static str,
}

impl EngineInvariantError {
    pub(crate) fn new(detail: &'static str) -> Self {
        Self { detail }
    }
}

impl From<TextResolveError> for EngineInvariantError {
    fn from(_: TextResolveError) -> Self {
        Self::new("token text span does not resolve against the input")
    }
}

pub type TreeBuilderError = EngineInvariantError;

/// Channel from a builder back to whoever drives the tokenizer.
///
/// A request is anchored on the token currently being processed: every token
/// lexed after it is discarded and the input following it is lexed again
/// under `model`. Repeating a request for the same token is harmless.
pub trait RollbackSink {
    fn switch_content_model(&mut self, model: ContentModel);
}

/// Sink for drivers that never re-lex.
#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreRollback;

impl RollbackSink for IgnoreRollback {
    fn switch_content_model(&mut self, _model: ContentModel) {}
}

/// The document and the recoverable errors recorded while building it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltDocument {
    pub document: Node,
    pub errors: Vec<ParseError>,
}

/// Token consumer that builds a document.
///
/// `position` is the byte offset at which the token starts. `Eof` is
/// processed exactly once and last; `finish` is only called after it.
pub trait TreeConstruction {
    fn process(
        &mut self,
        token: &Token,
        position: usize,
        rollback: &mut dyn RollbackSink,
    ) -> Result<(), TreeBuilderError>;

    fn finish(self) -> Result<BuiltDocument, TreeBuilderError>;
}

/// State shared by the HTML and XML builders.
#[derive(Debug)]
struct BuilderCore {
    input: Input,
    arena: NodeArena,
    open: OpenElementsStack,
    errors: ErrorList,
    coalesce_text: bool,
    saw_content: bool,
    saw_eof: bool,
}

impl BuilderCore {
    fn new(config: &TreeBuilderConfig, ctx: &DocumentParseContext) -> Self {
        Self {
            input: ctx.input.clone(),
            arena: NodeArena::new(ctx.base_uri.clone()),
            open: OpenElementsStack::default(),
            errors: ErrorList::new(ctx.errors),
            coalesce_text: config.coalesce_text,
            saw_content: false,
            saw_eof: false,
        }
    }

    fn error(&mut self, code: ParseErrorCode, position: usize) {
        self.errors.record(ErrorOrigin::TreeBuilder, code, position);
    }

    /// Rejects tokens arriving after `Eof`.
    fn begin_token(&mut self, token: &Token) -> Result<(), TreeBuilderError> {
        if self.saw_eof {
            return Err(EngineInvariantError::new("token delivered after Eof"));
        }
        if token.is_eof() {
            self.saw_eof = true;
        }
        Ok(())
    }

    fn insertion_parent(&self) -> NodeIndex {
        self.open.current().map_or(DOCUMENT, |entry| entry.index)
    }

    fn doctype(&mut self, name: Option<&str>, position: usize) {
        if self.saw_content || self.arena.has_doctype() {
            log::debug!(target: "html5.tree_builder", "ignoring misplaced doctype @{position}");
            self.error(ParseErrorCode::MisplacedDoctype, position);
            return;
        }
        self.arena.set_doctype(name.unwrap_or_default().to_string());
    }

    fn insert_element(
        &mut self,
        name: &Atom,
        attrs: &[Attribute],
        push: bool,
    ) -> Result<(), TreeBuilderError> {
        self.saw_content = true;
        let attributes = attrs
            .iter()
            .map(|attr| -> Result<(String, Option<String>), TextResolveError> {
                let value = attr
                    .value
                    .as_ref()
                    .map(|value| value.resolve(&self.input).map(|v| v.into_owned()))
                    .transpose()?;
                Ok((attr.name.as_str().to_string(), value))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let parent = self.insertion_parent();
        let index = self.arena.add_element(parent, name.clone(), attributes)?;
        if push {
            self.open.push(OpenElement {
                index,
                name: name.clone(),
            });
        }
        Ok(())
    }

    fn end_tag(&mut self, name: &Atom, scope: ScopeKind, position: usize) {
        match self.open.pop_until_including(name, scope) {
            Some((_, 0)) => {}
            Some((_, implicitly_closed)) => {
                for _ in 0..implicitly_closed {
                    self.error(ParseErrorCode::UnclosedElement, position);
                }
            }
            None => {
                log::debug!(
                    target: "html5.tree_builder",
                    "dropping unmatched end tag </{name}> @{position}"
                );
                self.error(ParseErrorCode::UnexpectedEndTag, position);
            }
        }
    }

    fn text(&mut self, token_text: &TextValue) -> Result<(), TreeBuilderError> {
        let text = token_text.resolve(&self.input)?;
        if !text.chars().all(|c| c.is_ascii_whitespace()) {
            self.saw_content = true;
        }
        let parent = self.insertion_parent();
        self.arena.append_text(parent, &text, self.coalesce_text)
    }

    fn comment(&mut self, token_text: &TextValue) -> Result<(), TreeBuilderError> {
        let text = token_text.resolve(&self.input)?.into_owned();
        let parent = self.insertion_parent();
        self.arena.add_comment(parent, text).map(|_| ())
    }

    fn eof(&mut self, position: usize) {
        let unclosed = self.open.drain().count();
        for _ in 0..unclosed {
            self.error(ParseErrorCode::UnclosedElement, position);
        }
    }

    fn finish(mut self) -> Result<BuiltDocument, TreeBuilderError> {
        if !self.saw_eof {
            return Err(EngineInvariantError::new("finish called before Eof"));
        }
        log::trace!(
            target: "html5.tree_builder",
            "finished: {} nodes, max depth {}",
            self.arena.len(),
            self.open.max_depth()
        );
        let errors = self.errors.take();
        Ok(BuiltDocument {
            document: self.arena.into_dom()?,
            errors,
        })
    }
}

/// HTML tree builder.
///
/// Covers the element-level rules a streaming parser needs: void elements,
/// raw-text content models, scoped end tags and implicit closing at `Eof`.
/// Insertion modes and the adoption agency algorithm are not modeled.
#[derive(Debug)]
pub struct Html5TreeBuilder {
    core: BuilderCore,
}

impl Html5TreeBuilder {
    pub fn new(config: TreeBuilderConfig, ctx: &DocumentParseContext) -> Self {
        Self {
            core: BuilderCore::new(&config, ctx),
        }
    }

    fn start_tag(
        &mut self,
        name: &Atom,
        attrs: &[Attribute],
        self_closing: bool,
        position: usize,
        rollback: &mut dyn RollbackSink,
    ) -> Result<(), TreeBuilderError> {
        let void = elements::is_void(name.as_str());
        if self_closing && !void {
            self.core.error(ParseErrorCode::NonVoidSelfClosingTag, position);
        }
        self.core.insert_element(name, attrs, !void)?;
        if let Some(model) = elements::content_model_for(name.as_str()) {
            log::trace!(
                target: "html5.tree_builder",
                "<{name}> @{position} switches content model to {model:?}"
            );
            rollback.switch_content_model(model);
        }
        Ok(())
    }
}

impl TreeConstruction for Html5TreeBuilder {
    fn process(
        &mut self,
        token: &Token,
        position: usize,
        rollback: &mut dyn RollbackSink,
    ) -> Result<(), TreeBuilderError> {
        self.core.begin_token(token)?;
        match token {
            Token::Doctype { name, .. } => {
                self.core.doctype(name.as_ref().map(|n| n.as_str()), position);
            }
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => self.start_tag(name, attrs, *self_closing, position, rollback)?,
            Token::EndTag { name } => self.core.end_tag(name, ScopeKind::InScope, position),
            Token::Text { text } => self.core.text(text)?,
            Token::Comment { text } => self.core.comment(text)?,
            Token::Eof => self.core.eof(position),
        }
        Ok(())
    }

    fn finish(self) -> Result<BuiltDocument, TreeBuilderError> {
        self.core.finish()
    }
}

#[cfg(test)]
mod tests;
