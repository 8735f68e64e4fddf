use super::{ContentModel, Html5Tokenizer, TokenFmt, TokenizerConfig};
use crate::html5::shared::{ErrorPolicy, Input, ParseErrorCode, Token};

fn tokenizer(text: &str) -> Html5Tokenizer {
    Html5Tokenizer::new(
        TokenizerConfig::default(),
        Input::new(text),
        ErrorPolicy::tracking(64),
    )
}

fn fmt_all(tokenizer: &Html5Tokenizer, tokens: &[Token]) -> Vec<String> {
    TokenFmt::new(tokenizer.input())
        .format_all(tokens)
        .expect("token formatting in tests must be deterministic")
}

fn lex(text: &str) -> Vec<String> {
    let mut t = tokenizer(text);
    let tokens = t.drain_to_eof();
    fmt_all(&t, &tokens)
}

fn error_codes(t: &mut Html5Tokenizer) -> Vec<ParseErrorCode> {
    t.take_errors().into_iter().map(|e| e.code).collect()
}

#[test]
fn simple_element_with_text() {
    assert_eq!(
        lex("<a>x</a>"),
        vec!["StartTag(a)", "Text(\"x\")", "EndTag(a)", "Eof"]
    );
}

#[test]
fn empty_input_is_just_eof() {
    assert_eq!(lex(""), vec!["Eof"]);
}

#[test]
fn eof_is_emitted_once_then_repeated_without_counting() {
    let mut t = tokenizer("x");
    assert!(matches!(t.next_token(), Token::Text { .. }));
    assert_eq!(t.next_token(), Token::Eof);
    assert_eq!(t.next_token(), Token::Eof);
    assert_eq!(t.stats().tokens_emitted, 2);
}

#[test]
fn names_are_ascii_folded() {
    assert_eq!(
        lex("<DiV ID=Main></DIV>"),
        vec!["StartTag(div id=\"Main\")", "EndTag(div)", "Eof"]
    );
}

#[test]
fn xml_names_keep_case() {
    let config = TokenizerConfig {
        fold_names: false,
        ..TokenizerConfig::default()
    };
    let mut t = Html5Tokenizer::new(config, Input::new("<Item/>"), ErrorPolicy::no_tracking());
    let tokens = t.drain_to_eof();
    assert_eq!(fmt_all(&t, &tokens), vec!["StartTag(Item/)", "Eof"]);
}

#[test]
fn attribute_forms() {
    assert_eq!(
        lex(r#"<input type="text" value='a > b' disabled data-x=1 />"#),
        vec![
            "StartTag(input type=\"text\" value=\"a > b\" disabled data-x=\"1\"/)",
            "Eof"
        ]
    );
}

#[test]
fn duplicate_attributes_first_wins() {
    let mut t = tokenizer("<p class=a class=b>");
    let tokens = t.drain_to_eof();
    assert_eq!(fmt_all(&t, &tokens), vec!["StartTag(p class=\"a\")", "Eof"]);
    assert_eq!(error_codes(&mut t), vec![ParseErrorCode::DuplicateAttribute]);
}

#[test]
fn missing_attribute_value_is_empty() {
    assert_eq!(lex("<a href=>"), vec!["StartTag(a href=\"\")", "Eof"]);
}

#[test]
fn end_tag_attributes_are_dropped_and_reported() {
    let mut t = tokenizer("</p class=x>");
    let tokens = t.drain_to_eof();
    assert_eq!(fmt_all(&t, &tokens), vec!["EndTag(p)", "Eof"]);
    assert_eq!(error_codes(&mut t), vec![ParseErrorCode::EndTagWithAttributes]);
}

#[test]
fn character_references_in_text_and_attributes() {
    assert_eq!(
        lex("<a title=\"&lt;&amp;\">1 &lt; 2</a>"),
        vec![
            "StartTag(a title=\"<&\")",
            "Text(\"1 < 2\")",
            "EndTag(a)",
            "Eof"
        ]
    );
}

#[test]
fn character_reference_decoding_can_be_disabled() {
    let config = TokenizerConfig {
        decode_character_references: false,
        ..TokenizerConfig::default()
    };
    let mut t = Html5Tokenizer::new(config, Input::new("&amp;"), ErrorPolicy::no_tracking());
    let tokens = t.drain_to_eof();
    assert_eq!(fmt_all(&t, &tokens), vec!["Text(\"&amp;\")", "Eof"]);
}

#[test]
fn stray_less_than_is_text() {
    let mut t = tokenizer("a < b");
    let tokens = t.drain_to_eof();
    assert_eq!(
        fmt_all(&t, &tokens),
        vec!["Text(\"a \")", "Text(\"<\")", "Text(\" b\")", "Eof"]
    );
    assert_eq!(
        error_codes(&mut t),
        vec![ParseErrorCode::InvalidFirstCharacterOfTagName]
    );
}

#[test]
fn lone_less_than_at_end() {
    let mut t = tokenizer("x<");
    let tokens = t.drain_to_eof();
    assert_eq!(fmt_all(&t, &tokens), vec!["Text(\"x\")", "Text(\"<\")", "Eof"]);
    assert_eq!(error_codes(&mut t), vec![ParseErrorCode::EofBeforeTagName]);
}

#[test]
fn eof_inside_tag_drops_the_tag() {
    let mut t = tokenizer("ok<div class=\"x");
    let tokens = t.drain_to_eof();
    assert_eq!(fmt_all(&t, &tokens), vec!["Text(\"ok\")", "Eof"]);
    assert_eq!(error_codes(&mut t), vec![ParseErrorCode::EofInTag]);
}

#[test]
fn comments_including_abrupt_and_unterminated() {
    assert_eq!(
        lex("<!-- hi --><!--><!--->"),
        vec!["Comment(\" hi \")", "Comment(\"\")", "Comment(\"\")", "Eof"]
    );
    let mut t = tokenizer("<!-- open");
    let tokens = t.drain_to_eof();
    assert_eq!(fmt_all(&t, &tokens), vec!["Comment(\" open\")", "Eof"]);
    assert_eq!(error_codes(&mut t), vec![ParseErrorCode::EofInComment]);
}

#[test]
fn bogus_comments() {
    assert_eq!(
        lex("<?xml version=\"1.0\"?><!x></ 3>"),
        vec![
            "Comment(\"?xml version=\\\"1.0\\\"?\")",
            "Comment(\"x\")",
            "Comment(\" 3\")",
            "Eof"
        ]
    );
}

#[test]
fn doctype_variants() {
    assert_eq!(lex("<!DOCTYPE html>"), vec!["Doctype(html)", "Eof"]);
    assert_eq!(
        lex(r#"<!doctype HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#),
        vec![
            "Doctype(html public=\"-//W3C//DTD HTML 4.01//EN\" system=\"http://www.w3.org/TR/html4/strict.dtd\")",
            "Eof"
        ]
    );
    let mut t = tokenizer("<!DOCTYPE>");
    let tokens = t.drain_to_eof();
    assert_eq!(fmt_all(&t, &tokens), vec!["Doctype( quirks)", "Eof"]);
    assert_eq!(error_codes(&mut t), vec![ParseErrorCode::MissingDoctypeName]);
}

#[test]
fn script_without_content_model_switch_is_markup() {
    assert_eq!(
        lex("<script>a<b>c</script>"),
        vec![
            "StartTag(script)",
            "Text(\"a\")",
            "StartTag(b)",
            "Text(\"c\")",
            "EndTag(script)",
            "Eof"
        ]
    );
}

#[test]
fn restoring_into_script_data_lexes_raw_text() {
    let mut t = tokenizer("<script>a<b>&amp;</SCRIPT >tail");
    let start = t.next_token();
    let after_start = t.save_state();
    // Lexer ran ahead under the wrong content model.
    let _ = t.next_token();
    let _ = t.next_token();
    t.restore_state(&after_start.with_content_model(ContentModel::ScriptData));
    let mut tokens = vec![start];
    tokens.extend(t.drain_to_eof());
    assert_eq!(
        fmt_all(&t, &tokens),
        vec![
            "StartTag(script)",
            "Text(\"a<b>&amp;\")",
            "EndTag(script)",
            "Text(\"tail\")",
            "Eof"
        ]
    );
}

#[test]
fn rcdata_decodes_references_and_needs_the_appropriate_end_tag() {
    let mut t = tokenizer("<title>a &amp; </b></titlex></title>");
    let _ = t.next_token();
    let cp = t.save_state();
    t.restore_state(&cp.with_content_model(ContentModel::RcData));
    let tokens = t.drain_to_eof();
    assert_eq!(
        fmt_all(&t, &tokens),
        vec!["Text(\"a & </b></titlex>\")", "EndTag(title)", "Eof"]
    );
}

#[test]
fn raw_text_end_tag_cut_off_by_eof_is_text() {
    let mut t = tokenizer("<style>x</style");
    let _ = t.next_token();
    let cp = t.save_state();
    t.restore_state(&cp.with_content_model(ContentModel::RawText));
    let tokens = t.drain_to_eof();
    assert_eq!(fmt_all(&t, &tokens), vec!["Text(\"x</style\")", "Eof"]);
}

#[test]
fn plaintext_consumes_everything() {
    let mut t = tokenizer("<plaintext></plaintext><b>");
    let _ = t.next_token();
    let cp = t.save_state();
    t.restore_state(&cp.with_content_model(ContentModel::PlainText));
    let tokens = t.drain_to_eof();
    assert_eq!(
        fmt_all(&t, &tokens),
        vec!["Text(\"</plaintext><b>\")", "Eof"]
    );
}

#[test]
fn replaying_a_checkpoint_reproduces_the_same_suffix() {
    let text = "<!DOCTYPE html><p class=a>one &amp; two<!-- c --><br/>x < y</p>";
    for k in 0..8 {
        let mut t = tokenizer(text);
        for _ in 0..k {
            let _ = t.next_token();
        }
        let cp = t.save_state();
        let first = t.drain_to_eof();
        let first_errors = t.save_state().errors;
        t.restore_state(&cp);
        let second = t.drain_to_eof();
        assert_eq!(first, second, "suffix after token {k} must replay identically");
        assert_eq!(first_errors, t.save_state().errors);
    }
}

#[test]
fn restore_truncates_errors_recorded_after_the_checkpoint() {
    let mut t = tokenizer("<a><b c=1 c=2>");
    let _ = t.next_token();
    let cp = t.save_state();
    let _ = t.next_token();
    assert_eq!(t.save_state().errors, 1);
    t.restore_state(&cp);
    assert_eq!(t.save_state().errors, 0);
    assert_eq!(t.stats().restores, 1);
}

#[test]
fn checkpoint_identifies_its_anchor() {
    let mut t = tokenizer("<a>x");
    let _ = t.next_token();
    let cp = t.save_state();
    assert_eq!(cp.anchor_index(), 1);
    assert_eq!(cp.offset(), 3);
    assert_eq!(cp.last_start_tag().map(|a| a.as_str()), Some("a"));
    assert_eq!(cp.content_model(), ContentModel::Data);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "checkpoint was taken on a different input")]
fn foreign_checkpoint_is_rejected_in_debug_builds() {
    let a = tokenizer("<a>");
    let mut b = tokenizer("<a>");
    let cp = a.save_state();
    b.restore_state(&cp);
}

#[test]
fn non_ascii_text_and_attribute_values_keep_boundaries() {
    assert_eq!(
        lex("<p title=ünï>π σ</p>"),
        vec![
            "StartTag(p title=\"ünï\")",
            "Text(\"π σ\")",
            "EndTag(p)",
            "Eof"
        ]
    );
}
