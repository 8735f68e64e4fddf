use crate::Node;
use std::fmt::{self, Write};

/// Deterministic DOM serialization and equality rules for parity tests.
/// Not a public stable format; intended for test comparisons.
///
/// Equivalence rules:
/// - Node kinds, element names and doctype names must match.
/// - Attribute list order is significant; names and values must match.
/// - Text and comments must match exactly (post character-reference decode).
/// - IDs and the document base URI can be ignored by options.
#[derive(Clone, Copy, Debug)]
pub struct DomSnapshotOptions {
    pub ignore_ids: bool,
    pub ignore_base_uri: bool,
}

impl Default for DomSnapshotOptions {
    fn default() -> Self {
        Self {
            ignore_ids: true,
            ignore_base_uri: true,
        }
    }
}

#[derive(Debug)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(root: &Node, options: DomSnapshotOptions) -> Self {
        let mut lines = Vec::new();
        // Explicit stack: snapshots are taken of arbitrarily deep documents.
        let mut stack = vec![(root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let mut line = " ".repeat(depth * 2);
            write_node_line(&mut line, node, &options);
            lines.push(line);
            stack.extend(node.children().iter().rev().map(|child| (child, depth + 1)));
        }
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[derive(Debug)]
pub struct DomMismatch {
    path: String,
    detail: String,
    expected: String,
    actual: String,
}

impl fmt::Display for DomMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DOM mismatch at {}: {}", self.path, self.detail)?;
        writeln!(f, "expected: {}", self.expected)?;
        write!(f, "actual:   {}", self.actual)
    }
}

impl std::error::Error for DomMismatch {}

pub fn assert_dom_eq(expected: &Node, actual: &Node, options: DomSnapshotOptions) {
    if let Err(mismatch) = compare_dom(expected, actual, options) {
        panic!("{mismatch}");
    }
}

/// Compare two trees, reporting the first difference with its path.
pub fn compare_dom(
    expected: &Node,
    actual: &Node,
    options: DomSnapshotOptions,
) -> Result<(), Box<DomMismatch>> {
    let mut stack = vec![(expected, actual, format!("/{}", node_label(expected)))];
    while let Some((expected, actual, path)) = stack.pop() {
        let expected_line = format_node_line(expected, &options);
        let actual_line = format_node_line(actual, &options);
        if expected_line != actual_line {
            let detail = if std::mem::discriminant(expected) != std::mem::discriminant(actual) {
                "node kind"
            } else {
                "node content"
            };
            return Err(Box::new(DomMismatch {
                path,
                detail: detail.to_string(),
                expected: truncate_line(expected_line, 160),
                actual: truncate_line(actual_line, 160),
            }));
        }
        let (expected_children, actual_children) = (expected.children(), actual.children());
        if expected_children.len() != actual_children.len() {
            return Err(Box::new(DomMismatch {
                path,
                detail: format!(
                    "child count (expected {}, actual {})",
                    expected_children.len(),
                    actual_children.len()
                ),
                expected: expected_line,
                actual: actual_line,
            }));
        }
        for (idx, (exp, act)) in expected_children
            .iter()
            .zip(actual_children)
            .enumerate()
            .rev()
        {
            stack.push((exp, act, format!("{path}/{}[{idx}]", node_label(exp))));
        }
    }
    Ok(())
}

fn node_label(node: &Node) -> String {
    match node {
        Node::Document { .. } => "#document".to_string(),
        Node::Element { name, .. } => {
            let mut label = name.clone();
            if let Some(Some(id)) = node.attribute("id")
                && !id.is_empty()
            {
                label.push('#');
                write_escaped(&mut label, id);
            }
            label
        }
        Node::Text { .. } => "#text".to_string(),
        Node::Comment { .. } => "#comment".to_string(),
    }
}

fn truncate_line(mut line: String, max_len: usize) -> String {
    if line.len() > max_len {
        let mut cut = max_len.saturating_sub(3);
        while !line.is_char_boundary(cut) {
            cut -= 1;
        }
        line.truncate(cut);
        line.push_str("...");
    }
    line
}

fn format_node_line(node: &Node, options: &DomSnapshotOptions) -> String {
    let mut line = String::new();
    write_node_line(&mut line, node, options);
    line
}

fn write_node_line(out: &mut String, node: &Node, options: &DomSnapshotOptions) {
    match node {
        Node::Document {
            id,
            base_uri,
            doctype,
            ..
        } => {
            out.push_str("#document");
            if let Some(dt) = doctype {
                out.push_str(" doctype=\"");
                write_escaped(out, dt);
                out.push('"');
            }
            if !options.ignore_base_uri {
                out.push_str(" base=\"");
                write_escaped(out, base_uri);
                out.push('"');
            }
            if !options.ignore_ids {
                let _ = write!(out, " id={}", id.0);
            }
        }
        Node::Element {
            id,
            name,
            attributes,
            ..
        } => {
            out.push('<');
            out.push_str(name);
            for (attr, value) in attributes {
                out.push(' ');
                out.push_str(attr);
                if let Some(value) = value {
                    out.push_str("=\"");
                    write_escaped(out, value);
                    out.push('"');
                }
            }
            if !options.ignore_ids {
                let _ = write!(out, " data-node-id=\"{}\"", id.0);
            }
            out.push('>');
        }
        Node::Text { text, id } => {
            out.push('"');
            write_escaped(out, text);
            out.push('"');
            if !options.ignore_ids {
                let _ = write!(out, " id={}", id.0);
            }
        }
        Node::Comment { text, id } => {
            out.push_str("<!-- ");
            write_escaped(out, text);
            out.push_str(" -->");
            if !options.ignore_ids {
                let _ = write!(out, " id={}", id.0);
            }
        }
    }
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ if ch.is_ascii() => out.push(ch),
            _ => {
                let _ = write!(out, "\\u{{{:X}}}", ch as u32);
            }
        }
    }
}
