//! Index arena the builders insert into, materialized into an owned `Node`
//! tree once construction is finished.

use super::EngineInvariantError;
use crate::html5::shared::Atom;
use crate::types::{Id, Node, NodeId};

pub(crate) type NodeIndex = usize;

/// The document node always lives at index 0.
pub(crate) const DOCUMENT: NodeIndex = 0;

#[derive(Debug)]
enum ArenaNode {
    Document {
        doctype: Option<String>,
        children: Vec<NodeIndex>,
    },
    Element {
        name: Atom,
        attributes: Vec<(String, Option<String>)>,
        children: Vec<NodeIndex>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl ArenaNode {
    fn children(&self) -> Option<&[NodeIndex]> {
        match self {
            ArenaNode::Document { children, .. } | ArenaNode::Element { children, .. } => {
                Some(children)
            }
            ArenaNode::Text { .. } | ArenaNode::Comment { .. } => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<NodeIndex>> {
        match self {
            ArenaNode::Document { children, .. } | ArenaNode::Element { children, .. } => {
                Some(children)
            }
            ArenaNode::Text { .. } | ArenaNode::Comment { .. } => None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct NodeArena {
    base_uri: String,
    nodes: Vec<ArenaNode>,
}

impl NodeArena {
    pub(crate) fn new(base_uri: String) -> Self {
        Self {
            base_uri,
            nodes: vec![ArenaNode::Document {
                doctype: None,
                children: Vec::new(),
            }],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn set_doctype(&mut self, name: String) {
        if let ArenaNode::Document { doctype, .. } = &mut self.nodes[DOCUMENT] {
            *doctype = Some(name);
        }
    }

    pub(crate) fn has_doctype(&self) -> bool {
        matches!(
            &self.nodes[DOCUMENT],
            ArenaNode::Document {
                doctype: Some(_),
                ..
            }
        )
    }

    pub(crate) fn add_element(
        &mut self,
        parent: NodeIndex,
        name: Atom,
        attributes: Vec<(String, Option<String>)>,
    ) -> Result<NodeIndex, EngineInvariantError> {
        self.add_child(
            parent,
            ArenaNode::Element {
                name,
                attributes,
                children: Vec::new(),
            },
        )
    }

    pub(crate) fn add_comment(
        &mut self,
        parent: NodeIndex,
        text: String,
    ) -> Result<NodeIndex, EngineInvariantError> {
        self.add_child(parent, ArenaNode::Comment { text })
    }

    /// Append text under `parent`, merging into a trailing text sibling when
    /// `coalesce` is set. Empty text is dropped.
    pub(crate) fn append_text(
        &mut self,
        parent: NodeIndex,
        text: &str,
        coalesce: bool,
    ) -> Result<(), EngineInvariantError> {
        if text.is_empty() {
            return Ok(());
        }
        if coalesce {
            let last = self
                .nodes
                .get(parent)
                .and_then(ArenaNode::children)
                .and_then(|children| children.last().copied());
            if let Some(ArenaNode::Text { text: existing }) = last.map(|i| &mut self.nodes[i]) {
                existing.push_str(text);
                return Ok(());
            }
        }
        self.add_child(
            parent,
            ArenaNode::Text {
                text: text.to_string(),
            },
        )
        .map(|_| ())
    }

    fn add_child(
        &mut self,
        parent: NodeIndex,
        child: ArenaNode,
    ) -> Result<NodeIndex, EngineInvariantError> {
        let child_index = self.nodes.len();
        let children = self
            .nodes
            .get_mut(parent)
            .and_then(ArenaNode::children_mut)
            .ok_or(EngineInvariantError::new("insertion parent cannot have children"))?;
        children.push(child_index);
        self.nodes.push(child);
        Ok(child_index)
    }

    /// Build the owned tree. Iterative, so document depth is not bounded by
    /// the call stack.
    pub(crate) fn into_dom(self) -> Result<Node, EngineInvariantError> {
        let base_uri = self.base_uri;
        let mut nodes = self.nodes;
        let mut built: Vec<Node> = Vec::with_capacity(nodes.len());

        fn take_children(n: usize, built: &mut Vec<Node>) -> Result<Vec<Node>, EngineInvariantError> {
            let at = built
                .len()
                .checked_sub(n)
                .ok_or(EngineInvariantError::new("arena child was not built"))?;
            Ok(built.split_off(at))
        }

        // Postorder: a node is built on its second visit, when its children
        // are the last `children.len()` entries of `built`, in order.
        let mut stack: Vec<(NodeIndex, bool)> = vec![(DOCUMENT, false)];
        while let Some((index, visited)) = stack.pop() {
            if !visited {
                stack.push((index, true));
                if let Some(children) = nodes[index].children() {
                    stack.extend(children.iter().rev().map(|&child| (child, false)));
                }
                continue;
            }

            let id = Id(index as NodeId);
            let node = match &mut nodes[index] {
                ArenaNode::Document { doctype, children } => Node::Document {
                    id,
                    base_uri: base_uri.clone(),
                    doctype: doctype.take(),
                    children: take_children(children.len(), &mut built)?,
                },
                ArenaNode::Element {
                    name,
                    attributes,
                    children,
                } => Node::Element {
                    id,
                    name: name.as_str().to_string(),
                    attributes: std::mem::take(attributes),
                    children: take_children(children.len(), &mut built)?,
                },
                ArenaNode::Text { text } => Node::Text {
                    id,
                    text: std::mem::take(text),
                },
                ArenaNode::Comment { text } => Node::Comment {
                    id,
                    text: std::mem::take(text),
                },
            };
            built.push(node);
        }

        match (built.pop(), built.is_empty()) {
            (Some(root), true) => Ok(root),
            _ => Err(EngineInvariantError::new(
                "arena should build exactly one root node",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html5::shared::AtomTable;

    #[test]
    fn into_dom_stress_deep_nesting() {
        let depth: usize = 10_000;
        let mut atoms = AtomTable::new();
        let div = atoms.intern_ascii_folded("div");
        let mut arena = NodeArena::new(String::new());
        let mut parent = DOCUMENT;
        for _ in 0..depth {
            parent = arena
                .add_element(parent, div.clone(), Vec::new())
                .expect("element parent");
        }

        let dom = arena.into_dom().expect("dom");
        let mut current = &dom;
        let mut seen = 0usize;
        loop {
            match current {
                Node::Document { children, .. } => {
                    assert_eq!(children.len(), 1);
                    current = &children[0];
                }
                Node::Element { name, children, .. } => {
                    assert_eq!(name, "div");
                    seen += 1;
                    if seen == depth {
                        assert!(children.is_empty());
                        break;
                    }
                    assert_eq!(children.len(), 1);
                    current = &children[0];
                }
                Node::Text { .. } | Node::Comment { .. } => {
                    panic!("unexpected leaf node before reaching depth");
                }
            }
        }
    }

    #[test]
    fn ids_follow_creation_order_and_text_coalesces() {
        let mut atoms = AtomTable::new();
        let mut arena = NodeArena::new("https://example.test/".to_string());
        let p = arena
            .add_element(DOCUMENT, atoms.intern_ascii_folded("p"), Vec::new())
            .expect("p");
        arena.append_text(p, "a", true).expect("text");
        arena.append_text(p, "b", true).expect("text");
        arena.add_comment(p, "c".to_string()).expect("comment");
        arena.append_text(p, "d", true).expect("text");
        arena.append_text(p, "", true).expect("empty text");

        let dom = arena.into_dom().expect("dom");
        let Node::Document {
            id,
            base_uri,
            children,
            ..
        } = &dom
        else {
            panic!("root must be a document");
        };
        assert_eq!(*id, Id(0));
        assert_eq!(base_uri, "https://example.test/");
        let element = &children[0];
        assert_eq!(element.id(), Id(1));
        let ids: Vec<_> = element.children().iter().map(Node::id).collect();
        assert_eq!(ids, vec![Id(2), Id(3), Id(4)]);
        assert_eq!(element.text_content(), "abd");
    }

    #[test]
    fn leaf_parent_is_an_invariant_violation() {
        let mut arena = NodeArena::new(String::new());
        arena.add_comment(DOCUMENT, "x".to_string()).expect("comment");
        assert!(arena.add_comment(1, "y".to_string()).is_err());
    }
}
