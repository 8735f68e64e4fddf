use super::{
    BuiltDocument, Html5TreeBuilder, IgnoreRollback, RollbackSink, TreeBuilderConfig,
    TreeConstruction, XmlTreeBuilder,
};
use crate::dom_snapshot::{DomSnapshot, DomSnapshotOptions};
use crate::html5::shared::{AtomTable, DocumentParseContext, ErrorPolicy, ParseErrorCode, TextValue, Token};
use crate::html5::tokenizer::{ContentModel, TokenizerConfig};

#[derive(Default)]
struct RecordingSink {
    requests: Vec<ContentModel>,
}

impl RollbackSink for RecordingSink {
    fn switch_content_model(&mut self, model: ContentModel) {
        self.requests.push(model);
    }
}

/// Drive `builder` over the context's tokenizer, re-lexing immediately when a
/// content-model switch is requested.
fn drive<B: TreeConstruction>(
    ctx: &mut DocumentParseContext,
    mut builder: B,
) -> (BuiltDocument, Vec<ContentModel>) {
    let tokenizer = &mut ctx.tokenizer;
    let mut switches = Vec::new();
    loop {
        let position = tokenizer.position();
        let token = tokenizer.next_token();
        let after = tokenizer.save_state();
        let mut sink = RecordingSink::default();
        builder
            .process(&token, position, &mut sink)
            .expect("builder accepts every token up to Eof");
        if let Some(&model) = sink.requests.last() {
            tokenizer.restore_state(&after.with_content_model(model));
        }
        switches.extend(sink.requests);
        if token.is_eof() {
            break;
        }
    }
    (builder.finish().expect("finish after Eof"), switches)
}

fn html_ctx(input: &str) -> DocumentParseContext {
    DocumentParseContext::new(input, "https://example.test/doc", ErrorPolicy::tracking(32))
}

fn build_html_with(input: &str, config: TreeBuilderConfig) -> (BuiltDocument, Vec<ContentModel>) {
    let mut ctx = html_ctx(input);
    let builder = Html5TreeBuilder::new(config, &ctx);
    drive(&mut ctx, builder)
}

fn build_html(input: &str) -> (BuiltDocument, Vec<ContentModel>) {
    build_html_with(input, TreeBuilderConfig::default())
}

fn build_xml(input: &str) -> (BuiltDocument, Vec<ContentModel>) {
    let config = TokenizerConfig {
        fold_names: false,
        ..TokenizerConfig::default()
    };
    let mut ctx = DocumentParseContext::with_tokenizer_config(
        input,
        "",
        ErrorPolicy::tracking(32),
        config,
    );
    let builder = XmlTreeBuilder::new(TreeBuilderConfig::default(), &ctx);
    drive(&mut ctx, builder)
}

fn lines(built: &BuiltDocument) -> Vec<String> {
    DomSnapshot::new(&built.document, DomSnapshotOptions::default()).into_lines()
}

fn codes(built: &BuiltDocument) -> Vec<ParseErrorCode> {
    built.errors.iter().map(|e| e.code).collect()
}

#[test]
fn element_with_text_child() {
    let (built, switches) = build_html("<a>x</a>");
    assert_eq!(lines(&built), vec!["#document", "  <a>", "    \"x\""]);
    assert!(built.errors.is_empty());
    assert!(switches.is_empty());
}

#[test]
fn script_switches_to_script_data() {
    let (built, switches) = build_html(r#"<script>if (a<b) x="</p>";</script><p>ok"#);
    assert_eq!(switches, vec![ContentModel::ScriptData]);
    assert_eq!(
        lines(&built),
        vec![
            "#document",
            "  <script>",
            r#"    "if (a<b) x=\"</p>\";""#,
            "  <p>",
            "    \"ok\"",
        ]
    );
}

#[test]
fn raw_text_and_rcdata_elements_request_their_models() {
    let (built, switches) =
        build_html("<style>p > a {}</style><title>a &amp; <b></title><textarea></textarea>");
    assert_eq!(
        switches,
        vec![
            ContentModel::RawText,
            ContentModel::RcData,
            ContentModel::RcData
        ]
    );
    assert_eq!(
        lines(&built),
        vec![
            "#document",
            "  <style>",
            "    \"p > a {}\"",
            "  <title>",
            "    \"a & <b>\"",
            "  <textarea>",
        ]
    );
}

#[test]
fn plaintext_swallows_the_rest() {
    let (built, switches) = build_html("<plaintext><b>x</b></plaintext>");
    assert_eq!(switches, vec![ContentModel::PlainText]);
    assert_eq!(
        lines(&built),
        vec!["#document", "  <plaintext>", "    \"<b>x</b></plaintext>\""]
    );
    assert_eq!(codes(&built), vec![ParseErrorCode::UnclosedElement]);
}

#[test]
fn void_elements_are_not_opened() {
    let (built, _) = build_html("<br><img src=a.png alt>text");
    assert_eq!(
        lines(&built),
        vec![
            "#document",
            "  <br>",
            "  <img src=\"a.png\" alt>",
            "  \"text\"",
        ]
    );
    assert!(built.errors.is_empty());
}

#[test]
fn self_closing_non_void_is_reported_and_opened() {
    let (built, _) = build_html("<div/>x");
    assert_eq!(lines(&built), vec!["#document", "  <div>", "    \"x\""]);
    assert_eq!(
        codes(&built),
        vec![
            ParseErrorCode::NonVoidSelfClosingTag,
            ParseErrorCode::UnclosedElement
        ]
    );
}

#[test]
fn unmatched_end_tag_is_ignored_and_text_coalesces() {
    let (built, _) = build_html("<p>a</span>b</p>");
    assert_eq!(lines(&built), vec!["#document", "  <p>", "    \"ab\""]);
    assert_eq!(codes(&built), vec![ParseErrorCode::UnexpectedEndTag]);
}

#[test]
fn coalescing_can_be_disabled() {
    let (built, _) = build_html_with(
        "<p>a</span>b</p>",
        TreeBuilderConfig {
            coalesce_text: false,
        },
    );
    assert_eq!(
        lines(&built),
        vec!["#document", "  <p>", "    \"a\"", "    \"b\""]
    );
}

#[test]
fn end_tag_closes_intervening_elements() {
    let (built, _) = build_html("<div><span>x</div>y");
    assert_eq!(
        lines(&built),
        vec![
            "#document",
            "  <div>",
            "    <span>",
            "      \"x\"",
            "  \"y\"",
        ]
    );
    assert_eq!(codes(&built), vec![ParseErrorCode::UnclosedElement]);
}

#[test]
fn scope_boundary_hides_outer_element() {
    let (built, _) = build_html("<div><table></div>");
    assert_eq!(
        codes(&built),
        vec![
            ParseErrorCode::UnexpectedEndTag,
            ParseErrorCode::UnclosedElement,
            ParseErrorCode::UnclosedElement
        ]
    );
}

#[test]
fn unclosed_elements_are_closed_at_eof() {
    let (built, _) = build_html("<div><span>x");
    assert_eq!(
        codes(&built),
        vec![
            ParseErrorCode::UnclosedElement,
            ParseErrorCode::UnclosedElement
        ]
    );
    assert_eq!(built.errors[0].position, "<div><span>x".len());
}

#[test]
fn doctype_only_before_content() {
    let (built, _) = build_html("\n<!DOCTYPE html><p></p>");
    assert_eq!(
        lines(&built),
        vec!["#document doctype=\"html\"", "  \"\\n\"", "  <p>"]
    );

    let (built, _) = build_html("<p></p><!DOCTYPE html>");
    assert_eq!(lines(&built), vec!["#document", "  <p>"]);
    assert_eq!(codes(&built), vec![ParseErrorCode::MisplacedDoctype]);
}

#[test]
fn comments_and_base_uri() {
    let (built, _) = build_html("<!-- top --><p><!--in--></p>");
    assert_eq!(
        lines(&built),
        vec!["#document", "  <!--  top  -->", "  <p>", "    <!-- in -->"]
    );
    let options = DomSnapshotOptions {
        ignore_base_uri: false,
        ..DomSnapshotOptions::default()
    };
    let snapshot = DomSnapshot::new(&built.document, options);
    assert_eq!(
        snapshot.as_lines()[0],
        "#document base=\"https://example.test/doc\""
    );
}

#[test]
fn xml_builder_keeps_case_and_honors_self_closing() {
    let (built, switches) = build_xml("<Root><item/><Item>v</Item><script><b/></script></Root>");
    assert!(switches.is_empty());
    assert_eq!(
        lines(&built),
        vec![
            "#document",
            "  <Root>",
            "    <item>",
            "    <Item>",
            "      \"v\"",
            "    <script>",
            "      <b>",
        ]
    );
    assert!(built.errors.is_empty());
}

#[test]
fn xml_end_tag_reaches_past_any_element() {
    let (built, _) = build_xml("<a><table><b></a>");
    assert_eq!(
        lines(&built),
        vec!["#document", "  <a>", "    <table>", "      <b>"]
    );
    assert_eq!(
        codes(&built),
        vec![
            ParseErrorCode::UnclosedElement,
            ParseErrorCode::UnclosedElement
        ]
    );
}

#[test]
fn tokens_after_eof_violate_an_invariant() {
    let ctx = html_ctx("");
    let mut builder = Html5TreeBuilder::new(TreeBuilderConfig::default(), &ctx);
    let mut sink = IgnoreRollback;
    builder.process(&Token::Eof, 0, &mut sink).expect("eof");
    let err = builder
        .process(
            &Token::Text {
                text: TextValue::Owned("late".to_string()),
            },
            0,
            &mut sink,
        )
        .expect_err("text after Eof");
    assert_eq!(err.detail, "token delivered after Eof");
}

#[test]
fn finish_requires_eof() {
    let ctx = html_ctx("<p>");
    let mut builder = XmlTreeBuilder::new(TreeBuilderConfig::default(), &ctx);
    let mut atoms = AtomTable::new();
    builder
        .process(
            &Token::StartTag {
                name: atoms.intern_ascii_folded("p"),
                attrs: Vec::new(),
                self_closing: false,
            },
            0,
            &mut IgnoreRollback,
        )
        .expect("start tag");
    assert!(builder.finish().is_err());
}
