pub type NodeId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Id(pub NodeId);

/// Owned document tree produced by tree construction.
///
/// Ids are assigned in creation order; the document itself is `Id(0)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Document {
        id: Id,
        base_uri: String,
        doctype: Option<String>,
        children: Vec<Node>,
    },
    Element {
        id: Id,
        name: String,
        attributes: Vec<(String, Option<String>)>,
        children: Vec<Node>,
    },
    Text {
        id: Id,
        text: String,
    },
    Comment {
        id: Id,
        text: String,
    },
}

impl Node {
    pub fn id(&self) -> Id {
        match self {
            Node::Document { id, .. } => *id,
            Node::Element { id, .. } => *id,
            Node::Text { id, .. } => *id,
            Node::Comment { id, .. } => *id,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => children,
            Node::Text { .. } | Node::Comment { .. } => &[],
        }
    }

    /// Element name, or `None` for non-element nodes.
    pub fn element_name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<Option<&str>> {
        let Node::Element { attributes, .. } = self else {
            return None;
        };
        attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_deref())
    }

    /// Concatenated text of all descendant text nodes, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Node::Text { text, .. } => out.push_str(text),
                Node::Document { children, .. } | Node::Element { children, .. } => {
                    stack.extend(children.iter().rev());
                }
                Node::Comment { .. } => {}
            }
        }
        out
    }
}

// Children are detached onto a heap worklist so dropping a deep tree does not
// recurse once per level.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = match self {
            Node::Document { children, .. } | Node::Element { children, .. } => {
                std::mem::take(children)
            }
            Node::Text { .. } | Node::Comment { .. } => return,
        };
        while let Some(mut node) = pending.pop() {
            if let Node::Document { children, .. } | Node::Element { children, .. } = &mut node {
                pending.append(children);
            }
        }
    }
}
