//! Arena-backed node model.
//!
//! Nodes live in a single `Forest` arena and reference each other by index
//! (`NodeId`) rather than through shared, reference-counted pointers. See
//! `spec.md` §9 for the rationale: this avoids cycles between parent and
//! child links and keeps subtree traversal cache-friendly.

/// Index of a [`Node`] inside a [`Forest`]'s arena. Stable for the lifetime
/// of the `Forest` that produced it; never reused.
pub type NodeId = usize;

/// A single parsed attribute, preserving insertion order and the original
/// quote character used in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
    pub quote: char,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>, quote: char) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            quote,
        }
    }
}

/// Discriminator derived from [`Node::name`], per `spec.md` §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    /// `name` is empty.
    Text,
    /// `name` starts with `!` or `?`.
    Special,
    /// Anything else.
    Element,
}

/// A single tree entity: an element, a text run, or a "special" node
/// (doctype, comment, or processing instruction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Lowercased tag name, empty for text nodes, or the raw `!...`/`?...`
    /// body for special nodes.
    pub name: String,
    /// Text content for text nodes; unused for elements (raw-text elements
    /// attach their content as a child text node instead).
    pub value: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl Node {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            attributes: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn category(&self) -> NodeCategory {
        if self.name.is_empty() {
            NodeCategory::Text
        } else if self.name.starts_with('!') || self.name.starts_with('?') {
            NodeCategory::Special
        } else {
            NodeCategory::Element
        }
    }
}

/// An arena of [`Node`]s plus the ordered list of root-level node ids.
///
/// Mirrors `spec.md`'s "forest" concept: an ordered sequence of top-level
/// nodes, each exclusively owning its children through index links rather
/// than pointers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    arena: Vec<Node>,
    pub(crate) roots: Vec<NodeId>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.arena[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.arena[id]
    }

    /// Root-level node ids, in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    fn insert(&mut self, node: Node) -> NodeId {
        self.arena.push(node);
        self.arena.len() - 1
    }

    /// Creates a standalone element/special node, not yet attached anywhere.
    pub fn new_element(&mut self, name: impl Into<String>) -> NodeId {
        self.insert(Node::new(name))
    }

    /// Creates a standalone text node.
    pub fn new_text(&mut self, value: impl Into<String>) -> NodeId {
        let mut node = Node::new(String::new());
        node.value = value.into();
        self.insert(node)
    }

    /// Attaches `child` as the last child of `parent`, setting `child`'s
    /// parent pointer. If `parent` is `None`, `child` becomes a new
    /// root-level node.
    pub fn append_child(&mut self, parent: Option<NodeId>, child: NodeId) {
        match parent {
            Some(parent_id) => {
                self.arena[child].parent = Some(parent_id);
                self.arena[parent_id].children.push(child);
            }
            None => {
                self.arena[child].parent = None;
                self.roots.push(child);
            }
        }
    }

    /// Creates a text node from `value` and appends it as a child of
    /// `parent`. If `parent` is `None`, the text is discarded (matches
    /// `spec.md` §4.2.3: top-level text has nowhere to attach).
    pub fn append_text_child(&mut self, parent: Option<NodeId>, value: impl Into<String>) {
        if let Some(parent_id) = parent {
            let id = self.new_text(value);
            self.append_child(Some(parent_id), id);
        }
    }

    pub fn append_attributes(&mut self, node: NodeId, attributes: impl IntoIterator<Item = Attribute>) {
        self.arena[node].attributes.extend(attributes);
    }

    /// Deep-clones the subtree rooted at `id` (from `other`) into `self`,
    /// allocating fresh arena slots and relinking indices. Returns the new
    /// root's id. Does not attach the clone anywhere; the caller does that
    /// with [`Forest::append_child`].
    pub fn clone_subtree_from(&mut self, other: &Forest, id: NodeId) -> NodeId {
        let source = other.node(id);
        let mut clone = Node::new(source.name.clone());
        clone.value = source.value.clone();
        clone.attributes = source.attributes.clone();
        let new_id = self.insert(clone);

        for &child in &source.children {
            let new_child = self.clone_subtree_from(other, child);
            self.append_child(Some(new_id), new_child);
        }

        new_id
    }
}
