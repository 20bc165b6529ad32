//! Arena-based document tree.
//!
//! All nodes live in one contiguous vector; parent/child/sibling links are
//! indices into it. Embedded sub-document bodies may be allocated in the same
//! arena with no parent link, reachable only via their embedding element's
//! [`FrameState`](super::node::FrameState).

use crate::dom::node::{FrameState, Node, NodeData, NodeId};

pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
}

impl Document {
    /// Create a document with an empty `body` root.
    pub fn new() -> Self {
        let mut doc = Self { nodes: Vec::new(), body: NodeId::NONE };
        doc.body = doc.create_element("body", Vec::new());
        doc
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// The document body, root of all extraction walks.
    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a detached element node. Tag is stored lowercase.
    pub fn create_element(&mut self, tag: &str, attrs: Vec<(String, String)>) -> NodeId {
        let classes = attrs
            .iter()
            .find(|(name, _)| name == "class")
            .map(|(_, value)| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        self.alloc(Node::new(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attrs,
            classes,
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text.into())))
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = last_child;
            node.next_sibling = NodeId::NONE;
        }
        if let Some(last) = self.get_mut(last_child) {
            last.next_sibling = child;
        }
        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert `new_node` immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(node) => (node.parent, node.prev_sibling),
            None => return,
        };

        if let Some(node) = self.get_mut(new_node) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = sibling;
        }
        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }
        if prev.is_some() {
            if let Some(prev_node) = self.get_mut(prev) {
                prev_node.next_sibling = new_node;
            }
        } else if let Some(parent_node) = self.get_mut(parent) {
            parent_node.first_child = new_node;
        }
    }

    /// Unlink a node from its parent and siblings. The node itself stays in
    /// the arena; only the links are cleared.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(node) => (node.parent, node.prev_sibling, node.next_sibling),
            None => return,
        };

        if let Some(prev_node) = self.get_mut(prev) {
            prev_node.next_sibling = next;
        }
        if let Some(next_node) = self.get_mut(next) {
            next_node.prev_sibling = prev;
        }
        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child == id {
                parent_node.first_child = next;
            }
            if parent_node.last_child == id {
                parent_node.last_child = prev;
            }
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Iterate over the children of a node in document order.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self.get(parent).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        ChildrenIter { doc: self, current: first }
    }

    /// Element children only, in document order.
    pub fn element_children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent).filter(|&id| self.is_element(id))
    }

    /// Depth-first pre-order walk of the subtree below `root`, excluding
    /// `root` itself. Never crosses into embedded frame content.
    pub fn descendants(&self, root: NodeId) -> DescendantsIter<'_> {
        let mut stack = Vec::new();
        let mut children: Vec<NodeId> = self.children(root).collect();
        children.reverse();
        stack.extend(children);
        DescendantsIter { doc: self, stack }
    }

    /// Step backward one position in document order: the previous node's
    /// deepest last descendant comes before its ancestors. With
    /// `skip_children` the current node's subtree is stepped over (used when
    /// leaving an ignored subtree). Returns `NONE` at `root`.
    pub fn previous_node(&self, node: NodeId, skip_children: bool, root: NodeId) -> NodeId {
        if node == root || node.is_none() {
            return NodeId::NONE;
        }
        let Some(n) = self.get(node) else { return NodeId::NONE };
        if self.is_element(node) && !skip_children && n.last_child.is_some() {
            return n.last_child;
        }
        if n.prev_sibling.is_some() {
            return n.prev_sibling;
        }
        if n.parent.is_some() {
            return self.previous_node(n.parent, true, root);
        }
        NodeId::NONE
    }

    /// First descendant (document order) matching the predicate.
    pub fn find_descendant<F>(&self, root: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Self, NodeId) -> bool,
    {
        self.descendants(root).find(|&id| predicate(self, id))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Element and frame accessors.
impl Document {
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| matches!(n.data, NodeData::Text(_)))
    }

    /// Lowercase tag name, or `None` for text nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { tag, .. } => Some(tag.as_str()),
            NodeData::Text(_) => None,
        })
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(attr_name, _)| attr_name == name)
                .map(|(_, value)| value.as_str()),
            NodeData::Text(_) => None,
        })
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get(id).is_some_and(|n| match &n.data {
            NodeData::Element { classes, .. } => classes.iter().any(|c| c == class),
            NodeData::Text(_) => false,
        })
    }

    /// Raw content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(text) => Some(text.as_str()),
            NodeData::Element { .. } => None,
        })
    }

    /// Rendered visibility of the node itself.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.layout.visible)
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.get_mut(id) {
            node.layout.visible = visible;
        }
    }

    pub fn frame_state(&self, id: NodeId) -> Option<&FrameState> {
        self.get(id).and_then(|n| n.frame.as_ref())
    }

    pub fn set_frame_state(&mut self, id: NodeId, frame: FrameState) {
        if let Some(node) = self.get_mut(id) {
            node.frame = Some(frame);
        }
    }
}

pub struct ChildrenIter<'a> {
    doc: &'a Document,
    current: NodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self.doc.get(id).map(|n| n.next_sibling).unwrap_or(NodeId::NONE);
        Some(id)
    }
}

pub struct DescendantsIter<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantsIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let mut children: Vec<NodeId> = self.doc.children(id).collect();
        children.reverse();
        self.stack.extend(children);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_links_siblings_in_order() {
        let mut doc = Document::new();
        let div = doc.create_element("div", vec![]);
        let p1 = doc.create_element("p", vec![]);
        let p2 = doc.create_element("p", vec![]);
        doc.append(doc.body(), div);
        doc.append(div, p1);
        doc.append(div, p2);

        let children: Vec<_> = doc.children(div).collect();
        assert_eq!(children, vec![p1, p2]);
        assert_eq!(doc.get(p2).unwrap().prev_sibling, p1);
    }

    #[test]
    fn descendants_walk_is_preorder() {
        let mut doc = Document::new();
        let div = doc.create_element("div", vec![]);
        let p = doc.create_element("p", vec![]);
        let text = doc.create_text("hi");
        let span = doc.create_element("span", vec![]);
        doc.append(doc.body(), div);
        doc.append(div, p);
        doc.append(p, text);
        doc.append(div, span);

        let order: Vec<_> = doc.descendants(doc.body()).collect();
        assert_eq!(order, vec![div, p, text, span]);
    }

    #[test]
    fn descendants_do_not_cross_frame_content() {
        let mut doc = Document::new();
        let iframe = doc.create_element("iframe", vec![]);
        doc.append(doc.body(), iframe);
        let content = doc.create_element("body", vec![]);
        let p = doc.create_element("p", vec![]);
        doc.append(content, p);
        doc.set_frame_state(
            iframe,
            FrameState {
                frame_id: None,
                origin: crate::dom::FrameOrigin::SameOrigin,
                content_root: content,
            },
        );

        let order: Vec<_> = doc.descendants(doc.body()).collect();
        assert_eq!(order, vec![iframe]);
    }

    #[test]
    fn previous_node_descends_into_last_child() {
        let mut doc = Document::new();
        let h2 = doc.create_element("h2", vec![]);
        let div = doc.create_element("div", vec![]);
        let p = doc.create_element("p", vec![]);
        doc.append(doc.body(), h2);
        doc.append(doc.body(), div);
        doc.append(div, p);

        // Stepping back from div enters its subtree before reaching h2.
        assert_eq!(doc.previous_node(div, false, doc.body()), p);
        assert_eq!(doc.previous_node(div, true, doc.body()), h2);
        assert_eq!(doc.previous_node(h2, true, doc.body()), NodeId::NONE);
    }

    #[test]
    fn detach_relinks_neighbors() {
        let mut doc = Document::new();
        let a = doc.create_element("p", vec![]);
        let b = doc.create_element("p", vec![]);
        let c = doc.create_element("p", vec![]);
        doc.append(doc.body(), a);
        doc.append(doc.body(), b);
        doc.append(doc.body(), c);

        doc.detach(b);
        let children: Vec<_> = doc.children(doc.body()).collect();
        assert_eq!(children, vec![a, c]);
        assert_eq!(doc.get(c).unwrap().prev_sibling, a);
    }

    #[test]
    fn class_attribute_is_pre_split() {
        let mut doc = Document::new();
        let div = doc.create_element(
            "div",
            vec![("class".to_string(), "sidebar no-read-aloud".to_string())],
        );
        assert!(doc.has_class(div, "no-read-aloud"));
        assert!(!doc.has_class(div, "read"));
    }
}
