//! Consumer: owns tree construction and drains the handoff slot.

use super::channel::Backoff;
use super::{LexedToken, PipelineConfig, PipelineError, Shared};
use crate::html5::shared::Token;
use crate::html5::tokenizer::{Checkpoint, ContentModel};
use crate::html5::tree_builder::{BuiltDocument, RollbackSink, TreeConstruction};

/// Checkpoint a rollback anchored on `anchor` should resume from, or `None`
/// if no re-lex is needed.
///
/// `after` is the tokenizer state right after `anchor` was lexed. Requests
/// anchored on `Eof` are rejected: nothing follows it.
pub(crate) fn rollback_target(
    anchor: &Token,
    after: &Checkpoint,
    model: ContentModel,
) -> Option<Checkpoint> {
    if anchor.is_eof() {
        log::warn!(
            target: "html5.pipeline",
            "ignoring {model:?} rollback anchored on Eof"
        );
        return None;
    }
    if after.content_model() == model {
        return None;
    }
    Some(after.with_content_model(model))
}

/// Rollback sink bound to the token currently being processed.
///
/// Repeating the last request is a no-op, so the lexer re-lexes at most once
/// per distinct request on an anchor.
struct AnchoredRollback<'a> {
    anchor: &'a LexedToken,
    shared: &'a Shared,
    requested: Option<ContentModel>,
}

impl<'a> AnchoredRollback<'a> {
    fn new(anchor: &'a LexedToken, shared: &'a Shared) -> Self {
        Self {
            anchor,
            shared,
            requested: None,
        }
    }
}

impl RollbackSink for AnchoredRollback<'_> {
    fn switch_content_model(&mut self, model: ContentModel) {
        if self.requested == Some(model) {
            return;
        }
        let checkpoint = match self.requested {
            // The earlier request may already be applied; only an explicit
            // checkpoint undoes it, even back to the anchor's own model.
            Some(_) => self.anchor.checkpoint.with_content_model(model),
            None => {
                match rollback_target(&self.anchor.token, &self.anchor.checkpoint, model) {
                    Some(checkpoint) => checkpoint,
                    None => return,
                }
            }
        };
        self.requested = Some(model);
        self.shared.rollback.request_rollback(checkpoint);
        self.shared.channel.wake();
    }
}

#[derive(Debug)]
pub(crate) struct SyntaxReport {
    pub(crate) built: BuiltDocument,
    pub(crate) tokens_delivered: u64,
}

pub(crate) struct SyntaxStage<'a, B> {
    builder: B,
    shared: &'a Shared,
    backoff: Backoff,
    delivered: u64,
}

impl<'a, B: TreeConstruction> SyntaxStage<'a, B> {
    pub(crate) fn new(builder: B, shared: &'a Shared, config: &PipelineConfig) -> Self {
        Self {
            builder,
            shared,
            backoff: Backoff::new(config.spin_limit, config.idle_wait),
            delivered: 0,
        }
    }

    pub(crate) fn run(mut self) -> Result<SyntaxReport, PipelineError> {
        log::debug!(target: "html5.pipeline", "syntax stage started");
        loop {
            if self.shared.is_aborted() {
                log::debug!(target: "html5.pipeline", "syntax stage aborted");
                return Err(PipelineError::Aborted);
            }
            // Whatever sits in the slot is stale while a rollback is outstanding.
            let next = if self.shared.rollback.is_pending() {
                None
            } else {
                self.shared.channel.try_consume()
            };
            let Some(item) = next else {
                self.idle();
                continue;
            };
            self.backoff.reset();
            self.delivered += 1;
            let mut sink = AnchoredRollback::new(&item, self.shared);
            if let Err(err) = self.builder.process(&item.token, item.position, &mut sink) {
                log::warn!(target: "html5.pipeline", "tree construction failed: {err}");
                self.shared.abort();
                return Err(err.into());
            }
            if item.token.is_eof() {
                break;
            }
        }
        let built = self.builder.finish().map_err(|err| {
            log::warn!(target: "html5.pipeline", "finishing the document failed: {err}");
            self.shared.abort();
            PipelineError::from(err)
        })?;
        log::debug!(
            target: "html5.pipeline",
            "syntax stage done: {} tokens delivered",
            self.delivered
        );
        Ok(SyntaxReport {
            built,
            tokens_delivered: self.delivered,
        })
    }

    fn idle(&mut self) {
        let shared = self.shared;
        self.backoff.snooze(|timeout| {
            shared
                .channel
                .wait_occupied(timeout, || shared.rollback.is_pending());
        });
    }
}
