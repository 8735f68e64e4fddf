use html_pipeline::html5::{
    BuiltDocument, ErrorPolicy, Html5Tokenizer, Input, RollbackSink, TextResolver, Token,
    TokenFmt, TokenizerConfig, TreeBuilderError, TreeConstruction,
};
use std::sync::{Arc, Mutex};

/// Format `tokens` one per line, naming the case and token index on failure.
pub fn format_tokens(
    tokens: &[Token],
    resolver: &dyn TextResolver,
    case_id: &str,
) -> Result<Vec<String>, String> {
    let fmt = TokenFmt::new(resolver);
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            fmt.format_token(token)
                .map_err(|err| format!("{err} for '{case_id}' token #{index}"))
        })
        .collect()
}

/// Lex `input` to `Eof` in the data content model, with no tree builder
/// feedback.
pub fn lex_snapshot(input: &str, config: TokenizerConfig) -> Vec<String> {
    let input = Input::new(input);
    let mut tokenizer = Html5Tokenizer::new(config, input.clone(), ErrorPolicy::no_tracking());
    let tokens = tokenizer.drain_to_eof();
    format_tokens(&tokens, &input, "lex_snapshot").unwrap_or_else(|err| panic!("{err}"))
}

/// Tokens seen by a [`Recorded`] builder, shared with the test thread.
pub type TokenLog = Arc<Mutex<Vec<String>>>;

/// Builder wrapper that logs every delivered token before forwarding it.
pub struct Recorded<B> {
    inner: B,
    input: Input,
    log: TokenLog,
}

impl<B> Recorded<B> {
    pub fn new(inner: B, input: Input) -> (Self, TokenLog) {
        let log = TokenLog::default();
        let recorded = Self {
            inner,
            input,
            log: Arc::clone(&log),
        };
        (recorded, log)
    }
}

impl<B: TreeConstruction> TreeConstruction for Recorded<B> {
    fn process(
        &mut self,
        token: &Token,
        position: usize,
        rollback: &mut dyn RollbackSink,
    ) -> Result<(), TreeBuilderError> {
        let line = TokenFmt::new(&self.input)
            .format_token(token)
            .unwrap_or_else(|err| panic!("{err} at byte {position}"));
        self.log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line);
        self.inner.process(token, position, rollback)
    }

    fn finish(self) -> Result<BuiltDocument, TreeBuilderError> {
        self.inner.finish()
    }
}
