//! Parse entry points: configuration, builder selection and drivers.

use crate::html5::pipeline::{
    ParseOutput, Pipeline, PipelineConfig, PipelineError, rollback_target,
};
use crate::html5::shared::{
    DocumentParseContext, ErrorPolicy, PipelineState, PipelineStats, Token, merge_errors,
};
use crate::html5::tokenizer::{Checkpoint, ContentModel, Lexer, TokenizerConfig};
use crate::html5::tree_builder::{
    BuiltDocument, Html5TreeBuilder, RollbackSink, TreeBuilderConfig, TreeBuilderError,
    TreeConstruction, XmlTreeBuilder,
};

/// Tree-construction rules applied to the token stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Grammar {
    #[default]
    Html,
    /// Case-preserving names, no void elements, no content-model switching.
    Xml,
}

/// How the lexer and the tree builder are scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Lexer and tree builder on two threads.
    #[default]
    Pipelined,
    /// Lex-then-construct on the calling thread.
    Sequential,
}

#[derive(Clone, Debug, Default)]
pub struct ParserConfig {
    pub grammar: Grammar,
    pub tokenizer: TokenizerConfig,
    pub tree_builder: TreeBuilderConfig,
    pub errors: ErrorPolicy,
    pub pipeline: PipelineConfig,
    pub mode: ExecutionMode,
}

/// Parse `input` as HTML with default settings.
pub fn parse(input: &str, base_uri: &str) -> Result<ParseOutput, PipelineError> {
    parse_with(input, base_uri, ParserConfig::default())
}

pub fn parse_with(
    input: &str,
    base_uri: &str,
    config: ParserConfig,
) -> Result<ParseOutput, PipelineError> {
    let mut tokenizer_config = config.tokenizer;
    if config.grammar == Grammar::Xml {
        tokenizer_config.fold_names = false;
    }
    let ctx =
        DocumentParseContext::with_tokenizer_config(input, base_uri, config.errors, tokenizer_config);
    let builder = AnyTreeBuilder::new(config.grammar, config.tree_builder, &ctx);
    log::debug!(
        target: "html5.pipeline",
        "parsing {} bytes as {:?} ({:?})",
        ctx.input.len(),
        config.grammar,
        config.mode
    );
    let DocumentParseContext {
        tokenizer, errors, ..
    } = ctx;
    match config.mode {
        ExecutionMode::Pipelined => Pipeline::new(tokenizer, builder, config.pipeline, errors).run(),
        ExecutionMode::Sequential => parse_sequential(tokenizer, builder, errors),
    }
}

/// Lex and construct on the calling thread.
///
/// Rollback requests restore the lexer before the next token is lexed, so
/// nothing is ever discarded. Produces the same document and errors as the
/// pipelined driver.
pub fn parse_sequential<L, B>(
    mut lexer: L,
    mut builder: B,
    errors: ErrorPolicy,
) -> Result<ParseOutput, PipelineError>
where
    L: Lexer,
    B: TreeConstruction,
{
    let mut stats = PipelineStats::default();
    loop {
        let position = lexer.position();
        let token = lexer.lex();
        let after = lexer.save_state();
        stats.tokens_lexed += 1;
        stats.tokens_delivered += 1;
        let mut sink = ImmediateRollback {
            anchor: &token,
            after: &after,
            target: None,
        };
        builder.process(&token, position, &mut sink)?;
        if let Some(target) = sink.target.take() {
            lexer.restore_state(&target);
            stats.rollbacks += 1;
        }
        if token.is_eof() {
            break;
        }
    }
    let built = builder.finish()?;
    stats.state = PipelineState::Terminated;
    Ok(ParseOutput {
        document: built.document,
        errors: merge_errors(errors, lexer.take_errors(), built.errors),
        stats,
    })
}

/// Collects the rollback target for the token being processed; applied once
/// `process` returns.
struct ImmediateRollback<'a> {
    anchor: &'a Token,
    after: &'a Checkpoint,
    target: Option<Checkpoint>,
}

impl RollbackSink for ImmediateRollback<'_> {
    fn switch_content_model(&mut self, model: ContentModel) {
        // Last request wins; asking for the anchor's own model cancels.
        self.target = rollback_target(self.anchor, self.after, model);
    }
}

/// Builder chosen from `Grammar` at construction time.
#[derive(Debug)]
pub enum AnyTreeBuilder {
    Html(Html5TreeBuilder),
    Xml(XmlTreeBuilder),
}

impl AnyTreeBuilder {
    pub fn new(grammar: Grammar, config: TreeBuilderConfig, ctx: &DocumentParseContext) -> Self {
        match grammar {
            Grammar::Html => Self::Html(Html5TreeBuilder::new(config, ctx)),
            Grammar::Xml => Self::Xml(XmlTreeBuilder::new(config, ctx)),
        }
    }
}

impl TreeConstruction for AnyTreeBuilder {
    fn process(
        &mut self,
        token: &Token,
        position: usize,
        rollback: &mut dyn RollbackSink,
    ) -> Result<(), TreeBuilderError> {
        match self {
            Self::Html(builder) => builder.process(token, position, rollback),
            Self::Xml(builder) => builder.process(token, position, rollback),
        }
    }

    fn finish(self) -> Result<BuiltDocument, TreeBuilderError> {
        match self {
            Self::Html(builder) => builder.finish(),
            Self::Xml(builder) => builder.finish(),
        }
    }
}
