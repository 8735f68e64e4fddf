//! TOML golden fixtures for end-to-end parse checks.
//!
//! One file holds any number of `[[case]]` tables:
//!
//! ```toml
//! format = "html-pipeline-fixture-v1"
//!
//! [[case]]
//! id = "script-raw-text"
//! input = "<script>a<b</script>"
//! tokens = ["StartTag(script)", "Text(\"a<b\")", "EndTag(script)", "Eof"]
//! dom = ["#document", "  <script>", "    \"a<b\""]
//! errors = []
//! rollbacks = 1
//! ```
//!
//! `tokens`, `errors` and `rollbacks` are optional; omitted fields are not
//! checked.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const PIPELINE_FIXTURE_FORMAT_V1: &str = "html-pipeline-fixture-v1";

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FixtureGrammar {
    #[default]
    Html,
    Xml,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FixtureCase {
    pub id: String,
    pub input: String,
    #[serde(default)]
    pub base_uri: String,
    #[serde(default)]
    pub grammar: FixtureGrammar,
    /// Tokens in delivery order, formatted with `TokenFmt`.
    pub tokens: Option<Vec<String>>,
    /// `DomSnapshot` lines with ids and base URI ignored.
    pub dom: Vec<String>,
    /// Error codes in position order.
    pub errors: Option<Vec<String>>,
    pub rollbacks: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FixtureFile {
    format: String,
    #[serde(rename = "case", default)]
    cases: Vec<FixtureCase>,
}

/// A case plus the file it came from.
#[derive(Clone, Debug)]
pub struct LoadedCase {
    pub path: PathBuf,
    pub case: FixtureCase,
}

/// Load every `*.toml` fixture under `dir`, in file-name order.
///
/// Panics on unreadable or malformed files, unknown formats, empty files and
/// duplicate case ids, so a broken fixture fails loudly instead of being
/// skipped.
pub fn load_fixture_dir(dir: &Path) -> Vec<LoadedCase> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap_or_else(|err| panic!("failed to read fixture dir {dir:?}: {err}"))
        .map(|entry| {
            entry
                .unwrap_or_else(|err| panic!("failed to read entry in {dir:?}: {err}"))
                .path()
        })
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();
    assert!(!paths.is_empty(), "no fixtures found in {dir:?}");

    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for path in paths {
        for case in load_fixture_file(&path) {
            assert!(
                seen.insert(case.id.clone()),
                "duplicate fixture id '{}' in {path:?}",
                case.id
            );
            out.push(LoadedCase {
                path: path.clone(),
                case,
            });
        }
    }
    out
}

fn load_fixture_file(path: &Path) -> Vec<FixtureCase> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read fixture {path:?}: {err}"));
    let file: FixtureFile = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse fixture {path:?}: {err}"));
    assert_eq!(
        file.format, PIPELINE_FIXTURE_FORMAT_V1,
        "unsupported fixture format in {path:?}"
    );
    assert!(!file.cases.is_empty(), "fixture {path:?} has no cases");
    for case in &file.cases {
        assert!(
            case.dom.first().is_some_and(|line| line.starts_with("#document")),
            "case '{}' in {path:?}: dom must start with #document",
            case.id
        );
        if let Some(tokens) = &case.tokens {
            assert_eq!(
                tokens.last().map(String::as_str),
                Some("Eof"),
                "case '{}' in {path:?}: tokens must end with Eof",
                case.id
            );
        }
    }
    file.cases
}
