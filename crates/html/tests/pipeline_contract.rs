//! End-to-end checks of the pipelined driver through the public API.

use html_pipeline::dom_snapshot::{DomSnapshotOptions, assert_dom_eq};
use html_pipeline::html5::{
    BuiltDocument, DocumentParseContext, ErrorPolicy, Html5TreeBuilder, Pipeline, PipelineConfig,
    PipelineState, RollbackSink, Token, TreeBuilderConfig, TreeBuilderError, TreeConstruction,
};
use html_pipeline::{ExecutionMode, Node, ParserConfig, parse, parse_with};
use html_test_support::token_snapshot::{Recorded, lex_snapshot};
use html_test_support::assert_lines_eq;
use std::time::Duration;

fn sequential(errors: ErrorPolicy) -> ParserConfig {
    ParserConfig {
        errors,
        mode: ExecutionMode::Sequential,
        ..ParserConfig::default()
    }
}

fn pipelined(errors: ErrorPolicy, pipeline: PipelineConfig) -> ParserConfig {
    ParserConfig {
        errors,
        pipeline,
        ..ParserConfig::default()
    }
}

fn mixed_document(blocks: usize) -> String {
    let mut out = String::from("<!DOCTYPE html><html><head><title>T</title>");
    out.push_str("<style>body > p { color: red }</style></head><body>");
    for i in 0..blocks {
        out.push_str(&format!(
            "<div class=b{i}><p>item &amp; {i}<br><script>if (x<{i}) y='</p>';</script>"
        ));
        out.push_str("<textarea><i>raw</i></textarea></span><!-- c --></div>");
    }
    out.push_str("</body></html>");
    out
}

#[test]
fn tokens_without_rollback_match_plain_lexing() {
    let input = "<div id=a><p>one<!-- two --><br/>three</p></div>";
    let ctx = DocumentParseContext::new(input, "", ErrorPolicy::no_tracking());
    let builder = Html5TreeBuilder::new(TreeBuilderConfig::default(), &ctx);
    let (builder, log) = Recorded::new(builder, ctx.input.clone());
    let DocumentParseContext { tokenizer, .. } = ctx;
    let output = Pipeline::new(
        tokenizer,
        builder,
        PipelineConfig::default(),
        ErrorPolicy::no_tracking(),
    )
    .run()
    .expect("parse");
    let delivered = log.lock().unwrap().clone();
    assert_lines_eq(
        "delivered tokens",
        &lex_snapshot(input, Default::default()),
        &delivered,
    );
    assert_eq!(output.stats.rollbacks, 0);
    assert_eq!(output.stats.tokens_discarded, 0);
}

#[test]
fn pipelined_and_sequential_agree_on_a_large_document() {
    let input = mixed_document(300);
    let errors = ErrorPolicy::tracking(10_000);
    let reference = parse_with(&input, "https://example.test/", sequential(errors)).expect("seq");
    for config in [
        PipelineConfig::default(),
        PipelineConfig {
            spin_limit: 0,
            idle_wait: Duration::from_micros(20),
        },
    ] {
        let output = parse_with(&input, "https://example.test/", pipelined(errors, config))
            .expect("pipelined");
        assert_dom_eq(
            &reference.document,
            &output.document,
            DomSnapshotOptions {
                ignore_ids: false,
                ignore_base_uri: false,
            },
        );
        assert_eq!(output.errors, reference.errors);
        // title, style, then one script and one textarea per block.
        assert_eq!(output.stats.rollbacks, 2 + 2 * 300);
        assert_eq!(output.stats.rollbacks, reference.stats.rollbacks);
        assert!(output.stats.max_lookahead <= 1);
        assert_eq!(
            output.stats.tokens_lexed,
            output.stats.tokens_delivered + output.stats.tokens_discarded
        );
        assert_eq!(output.stats.tokens_delivered, reference.stats.tokens_delivered);
        assert_eq!(output.stats.state, PipelineState::Terminated);
    }
}

#[test]
fn repeated_runs_are_deterministic() {
    let input = mixed_document(8);
    let config = || {
        pipelined(
            ErrorPolicy::tracking(256),
            PipelineConfig {
                spin_limit: 1,
                idle_wait: Duration::from_micros(10),
            },
        )
    };
    let first = parse_with(&input, "", config()).expect("parse");
    for _ in 0..100 {
        let again = parse_with(&input, "", config()).expect("parse");
        assert_eq!(again.document, first.document);
        assert_eq!(again.errors, first.errors);
    }
}

#[test]
fn deep_nesting_does_not_recurse() {
    let depth = 20_000;
    let input = "<div>".repeat(depth);
    let output = parse(&input, "").expect("parse");
    let mut node = &output.document;
    let mut levels = 0;
    while let Some(child) = node.children().first() {
        node = child;
        levels += 1;
    }
    assert_eq!(levels, depth);
}

/// Counts tokens and never asks for a rollback.
struct Counting {
    tokens: usize,
}

impl TreeConstruction for Counting {
    fn process(
        &mut self,
        _token: &Token,
        _position: usize,
        _rollback: &mut dyn RollbackSink,
    ) -> Result<(), TreeBuilderError> {
        self.tokens += 1;
        Ok(())
    }

    fn finish(self) -> Result<BuiltDocument, TreeBuilderError> {
        Ok(BuiltDocument {
            document: Node::Text {
                id: html_pipeline::Id(0),
                text: self.tokens.to_string(),
            },
            errors: Vec::new(),
        })
    }
}

#[test]
fn custom_builders_plug_into_the_pipeline() {
    // Without a content-model switch the script body is lexed as markup.
    let input = "<script>a<b>c</script>";
    let ctx = DocumentParseContext::new(input, "", ErrorPolicy::no_tracking());
    let DocumentParseContext { tokenizer, .. } = ctx;
    let output = Pipeline::new(
        tokenizer,
        Counting { tokens: 0 },
        PipelineConfig::default(),
        ErrorPolicy::no_tracking(),
    )
    .run()
    .expect("parse");
    assert_eq!(output.document.text_content(), "6");
    assert_eq!(output.stats.tokens_delivered, 6);
    assert_eq!(output.stats.rollbacks, 0);
}
