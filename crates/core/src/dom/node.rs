//! Node storage for the arena document tree.

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node payload: an element or a text run.
#[derive(Debug, Clone)]
pub enum NodeData {
    Element {
        /// Lowercase tag name.
        tag: String,
        attrs: Vec<(String, String)>,
        /// Pre-split class attribute for fast matching.
        classes: Vec<String>,
    },
    Text(String),
}

/// Rendered-layout facts the extraction heuristics consult.
///
/// These are captured from the rendered page, not computed here: the engine
/// never runs layout itself.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Whether the node is rendered visible.
    pub visible: bool,
    /// Horizontal offset of the border box. Negative means off-canvas.
    pub left: f64,
    /// Computed `float: right`.
    pub float_right: bool,
    /// Computed `position: fixed`.
    pub position_fixed: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self { visible: true, left: 0.0, float_right: false, position_fixed: false }
    }
}

/// Declared origin of an embedded sub-document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOrigin {
    SameOrigin,
    CrossOrigin,
    Unknown,
}

/// State attached to an embedding element (`iframe`/`frame`).
///
/// `content_root` points at the embedded document's body, allocated in the
/// same arena with no parent link: it is reachable only through the
/// embedding element, never by child traversal or rendered text.
#[derive(Debug, Clone)]
pub struct FrameState {
    pub frame_id: Option<String>,
    pub origin: FrameOrigin,
    pub content_root: NodeId,
}

/// A node in the arena document.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub layout: Layout,
    pub frame: Option<FrameState>,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            data,
            layout: Layout::default(),
            frame: None,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}
