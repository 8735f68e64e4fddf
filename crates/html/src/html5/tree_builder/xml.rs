//! Generic XML-style tree builder.

use super::stack::ScopeKind;
use super::{BuilderCore, BuiltDocument, RollbackSink, TreeBuilderConfig, TreeBuilderError, TreeConstruction};
use crate::html5::shared::{DocumentParseContext, Token};

/// Builder without HTML element knowledge.
///
/// Self-closing tags produce empty elements, end tags close the nearest
/// matching open element wherever it is, and the tokenizer's content model
/// is never switched.
#[derive(Debug)]
pub struct XmlTreeBuilder {
    core: BuilderCore,
}

impl XmlTreeBuilder {
    pub fn new(config: TreeBuilderConfig, ctx: &DocumentParseContext) -> Self {
        Self {
            core: BuilderCore::new(&config, ctx),
        }
    }
}

impl TreeConstruction for XmlTreeBuilder {
    fn process(
        &mut self,
        token: &Token,
        position: usize,
        _rollback: &mut dyn RollbackSink,
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
            } => self.core.insert_element(name, attrs, !*self_closing)?,
            Token::EndTag { name } => self.core.end_tag(name, ScopeKind::Unbounded, position),
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
