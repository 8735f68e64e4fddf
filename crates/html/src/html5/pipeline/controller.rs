//! Runs both stages to completion and assembles the result.

use super::lexical::{LexicalReport, LexicalStage};
use super::syntax::{SyntaxReport, SyntaxStage};
use super::{ParseOutput, PipelineConfig, PipelineError, Shared, Stage};
use crate::html5::shared::{ErrorPolicy, PipelineState, PipelineStats, merge_errors};
use crate::html5::tokenizer::Lexer;
use crate::html5::tree_builder::TreeConstruction;
use std::any::Any;
use std::thread;

/// A lexer and a tree builder wired together for one document.
///
/// `run` spawns the two stages on scoped threads and blocks until both have
/// exited. A panic or fatal error in either stage aborts the other.
pub struct Pipeline<L, B> {
    lexer: L,
    builder: B,
    config: PipelineConfig,
    errors: ErrorPolicy,
}

impl<L, B> Pipeline<L, B>
where
    L: Lexer + Send,
    B: TreeConstruction + Send,
{
    pub fn new(lexer: L, builder: B, config: PipelineConfig, errors: ErrorPolicy) -> Self {
        Self {
            lexer,
            builder,
            config,
            errors,
        }
    }

    pub fn run(self) -> Result<ParseOutput, PipelineError> {
        let Pipeline {
            lexer,
            builder,
            config,
            errors,
        } = self;
        let shared = Shared::default();

        let (lexical, syntax) = thread::scope(|scope| {
            let lexical = scope.spawn(|| {
                let _guard = AbortOnPanic(&shared);
                LexicalStage::new(lexer, &shared, &config).run()
            });
            let syntax = scope.spawn(|| {
                let _guard = AbortOnPanic(&shared);
                SyntaxStage::new(builder, &shared, &config).run()
            });
            (
                joined(Stage::Lexical, lexical.join()),
                joined(Stage::Syntax, syntax.join()),
            )
        });

        let (lexical, syntax) = match (lexical, syntax) {
            (Ok(lexical), Ok(syntax)) => (lexical, syntax),
            (lexical, syntax) => return Err(root_cause(lexical.err(), syntax.err())),
        };
        shared.set_state(PipelineState::Terminated);
        Ok(assemble(lexical, syntax, errors, shared.state()))
    }
}

fn assemble(
    lexical: LexicalReport,
    syntax: SyntaxReport,
    policy: ErrorPolicy,
    state: PipelineState,
) -> ParseOutput {
    let stats = PipelineStats {
        tokens_lexed: lexical.tokens_lexed,
        tokens_delivered: syntax.tokens_delivered,
        tokens_discarded: lexical.tokens_discarded,
        rollbacks: lexical.rollbacks,
        max_lookahead: lexical.max_lookahead,
        state,
    };
    log::debug!(target: "html5.pipeline", "pipeline finished: {stats:?}");
    ParseOutput {
        document: syntax.built.document,
        errors: merge_errors(policy, lexical.errors, syntax.built.errors),
        stats,
    }
}

/// Aborts the pipeline if the owning stage unwinds.
struct AbortOnPanic<'a>(&'a Shared);

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.abort();
        }
    }
}

fn joined<T>(
    stage: Stage,
    result: thread::Result<Result<T, PipelineError>>,
) -> Result<T, PipelineError> {
    match result {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!(target: "html5.pipeline", "{stage} stage panicked: {message}");
            Err(PipelineError::WorkerPanicked { stage, message })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// The stage that failed first reports the real error; the other one only
/// sees `Aborted`.
fn root_cause(lexical: Option<PipelineError>, syntax: Option<PipelineError>) -> PipelineError {
    match (lexical, syntax) {
        (Some(PipelineError::Aborted), Some(err)) | (Some(err), _) | (None, Some(err)) => err,
        (None, None) => PipelineError::Aborted,
    }
}
