//! Pipeline instrumentation.

/// Final state of a parse pipeline run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PipelineState {
    /// Both stages active.
    #[default]
    Running,
    /// The lexical stage produced `Eof`; the syntax stage has not processed it yet.
    Draining,
    /// Both stages exited and the document is finalized.
    Terminated,
}

/// Counters reported alongside a parsed document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Tokens produced by the lexer, including ones later discarded.
    pub tokens_lexed: u64,
    /// Tokens handed to tree construction.
    pub tokens_delivered: u64,
    /// Buffered tokens dropped by rollbacks.
    pub tokens_discarded: u64,
    /// Rollback requests honored by the lexical stage.
    pub rollbacks: u64,
    /// Highest number of produced-but-unconsumed tokens observed.
    pub max_lookahead: u64,
    pub state: PipelineState,
}
