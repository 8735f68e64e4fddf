//! Producer: owns the tokenizer and fills the handoff slot.

use super::channel::Backoff;
use super::{LexedToken, PipelineConfig, PipelineError, Shared};
use crate::html5::shared::{ParseError, PipelineState};
use crate::html5::tokenizer::Lexer;

/// What the lexical stage hands back when it exits cleanly.
#[derive(Debug, Default)]
pub(crate) struct LexicalReport {
    pub(crate) errors: Vec<ParseError>,
    pub(crate) tokens_lexed: u64,
    pub(crate) tokens_discarded: u64,
    pub(crate) rollbacks: u64,
    pub(crate) max_lookahead: u64,
}

pub(crate) struct LexicalStage<'a, L> {
    lexer: L,
    shared: &'a Shared,
    backoff: Backoff,
    eof_produced: bool,
    report: LexicalReport,
}

impl<'a, L: Lexer> LexicalStage<'a, L> {
    pub(crate) fn new(lexer: L, shared: &'a Shared, config: &PipelineConfig) -> Self {
        Self {
            lexer,
            shared,
            backoff: Backoff::new(config.spin_limit, config.idle_wait),
            eof_produced: false,
            report: LexicalReport::default(),
        }
    }

    pub(crate) fn run(mut self) -> Result<LexicalReport, PipelineError> {
        log::debug!(target: "html5.pipeline", "lexical stage started");
        loop {
            if self.shared.is_aborted() {
                log::debug!(target: "html5.pipeline", "lexical stage aborted");
                return Err(PipelineError::Aborted);
            }
            if self.shared.rollback.is_pending() {
                self.roll_back();
                continue;
            }
            if self.eof_produced {
                // Done once `Eof` has been drained and nothing can re-open it.
                if !self.shared.channel.is_occupied() && !self.shared.rollback.is_pending() {
                    break;
                }
                self.idle();
                continue;
            }
            if self.shared.channel.is_occupied() {
                self.idle();
                continue;
            }
            let item = self.lex_one();
            self.produce(item)?;
        }
        self.report.errors = self.lexer.take_errors();
        log::debug!(
            target: "html5.pipeline",
            "lexical stage done: {} lexed, {} discarded, {} rollbacks",
            self.report.tokens_lexed,
            self.report.tokens_discarded,
            self.report.rollbacks
        );
        Ok(self.report)
    }

    fn lex_one(&mut self) -> LexedToken {
        let position = self.lexer.position();
        let token = self.lexer.lex();
        let checkpoint = self.lexer.save_state();
        self.report.tokens_lexed += 1;
        LexedToken {
            token,
            position,
            checkpoint,
        }
    }

    /// Only called with a vacant slot. This stage is the sole producer, so a
    /// refused token means the handoff was corrupted.
    fn produce(&mut self, item: LexedToken) -> Result<(), PipelineError> {
        let is_eof = item.token.is_eof();
        if self.shared.channel.try_produce(item).is_err() {
            log::warn!(target: "html5.pipeline", "handoff slot filled behind the lexical stage");
            self.shared.abort();
            return Err(PipelineError::Aborted);
        }
        self.backoff.reset();
        let in_flight = self
            .report
            .tokens_lexed
            .saturating_sub(self.report.tokens_discarded)
            .saturating_sub(self.shared.channel.consumed());
        self.report.max_lookahead = self.report.max_lookahead.max(in_flight);
        if is_eof {
            log::debug!(target: "html5.pipeline", "Eof produced; draining");
            self.eof_produced = true;
            self.shared.set_state(PipelineState::Draining);
        }
        Ok(())
    }

    fn roll_back(&mut self) {
        // The slot must be empty before the flag drops, or the syntax stage
        // could consume a stale token.
        let dropped = u64::from(self.shared.channel.discard().is_some());
        self.report.tokens_discarded += dropped;
        let Some(checkpoint) = self.shared.rollback.poll_and_clear() else {
            return;
        };
        self.report.rollbacks += 1;
        log::debug!(
            target: "html5.pipeline",
            "rollback after token #{} as {:?} ({dropped} discarded)",
            checkpoint.anchor_index(),
            checkpoint.content_model()
        );
        self.lexer.restore_state(&checkpoint);
        if self.eof_produced {
            self.eof_produced = false;
            self.shared.set_state(PipelineState::Running);
        }
        self.backoff.reset();
    }

    fn idle(&mut self) {
        let shared = self.shared;
        self.backoff.snooze(|timeout| {
            shared
                .channel
                .wait_vacant(timeout, || shared.rollback.is_pending());
        });
    }
}
