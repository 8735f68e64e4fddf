//! Two-thread lexer/parser pipeline.
//!
//! The lexical stage lexes one token at a time into a single-slot channel;
//! the syntax stage drains it into tree construction. Tree construction can
//! ask to re-lex everything after the token it is processing (a rollback),
//! which the lexical stage honors by discarding its buffered token and
//! restoring the tokenizer from the checkpoint delivered with that token.
//!
//! Invariants:
//! - Tokens reach tree construction in lexical order; after a rollback the
//!   sequence resumes right after the anchor token, with no token duplicated
//!   or skipped.
//! - At most one token is lexed but not yet consumed.
//! - `Eof` is processed exactly once, and the lexical stage exits only after
//!   it has been drained with no rollback outstanding.

use crate::html5::shared::{ParseError, PipelineState, PipelineStats, Token};
use crate::html5::tokenizer::Checkpoint;
use crate::html5::tree_builder::TreeBuilderError;
use crate::types::Node;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Duration;

mod channel;
mod controller;
mod lexical;
mod signal;
mod syntax;

pub use channel::HandoffChannel;
pub use controller::Pipeline;
pub use signal::RollbackSignal;
pub(crate) use syntax::rollback_target;

/// Pipeline worker identity, for error reports and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Lexical,
    Syntax,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Lexical => "lexical",
            Stage::Syntax => "syntax",
        })
    }
}

/// Fatal pipeline fault. Recoverable parse errors never surface here.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{stage} stage panicked: {message}")]
    WorkerPanicked { stage: Stage, message: String },
    #[error(transparent)]
    TreeBuilder(#[from] TreeBuilderError),
    #[error("pipeline aborted")]
    Aborted,
}

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Spin hints a stage issues before parking when it has nothing to do.
    pub spin_limit: u32,
    /// Upper bound on a single park; stages re-check their state afterwards.
    pub idle_wait: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            spin_limit: 64,
            idle_wait: Duration::from_micros(200),
        }
    }
}

/// Result of a complete parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOutput {
    pub document: Node,
    /// Tokenizer and tree-builder errors, ordered by position.
    pub errors: Vec<ParseError>,
    pub stats: PipelineStats,
}

/// Channel item: a token plus what the syntax stage needs to anchor a
/// rollback on it.
#[derive(Clone, Debug)]
pub(crate) struct LexedToken {
    pub(crate) token: Token,
    /// Byte offset where the token starts.
    pub(crate) position: usize,
    /// Tokenizer state right after lexing `token`.
    pub(crate) checkpoint: Checkpoint,
}

/// State shared by both stages for one run.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub(crate) channel: HandoffChannel<LexedToken>,
    pub(crate) rollback: RollbackSignal<Checkpoint>,
    aborted: AtomicBool,
    state: AtomicU8,
}

impl Shared {
    /// Stop both stages. Idempotent.
    pub(crate) fn abort(&self) {
        self.aborted.store(true, Ordering::Release);
        self.channel.close();
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    pub(crate) fn set_state(&self, state: PipelineState) {
        let raw = match state {
            PipelineState::Running => 0,
            PipelineState::Draining => 1,
            PipelineState::Terminated => 2,
        };
        self.state.store(raw, Ordering::Release);
    }

    pub(crate) fn state(&self) -> PipelineState {
        match self.state.load(Ordering::Acquire) {
            0 => PipelineState::Running,
            1 => PipelineState::Draining,
            _ => PipelineState::Terminated,
        }
    }
}
