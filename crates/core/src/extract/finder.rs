//! Block detection: the recursive walk that decides which nodes form
//! readable blocks.

use crate::dom::document::Document;
use crate::dom::node::NodeId;
use crate::dom::tags::{self, TagClass};
use crate::dom::{layout, text};

/// A structural node selected as one unit of narratable content.
///
/// `multi` marks blocks whose direct children render as separate passages
/// rather than one merged passage. Never outlives one extraction call.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub node: NodeId,
    pub multi: bool,
    /// Rendered character count, used by the statistical trimmer.
    pub chars: usize,
}

/// Walk the subtree under `root` and return its text blocks in document
/// order. `threshold` is the minimum rendered character count for a node to
/// qualify on its own text.
pub fn find_text_blocks(doc: &Document, root: NodeId, threshold: usize) -> Vec<TextBlock> {
    let mut finder = Finder { doc, threshold, blocks: Vec::new() };
    finder.walk(root);
    finder.blocks.retain(|block| layout::is_on_canvas(doc, block.node));
    finder.blocks
}

struct Finder<'a> {
    doc: &'a Document,
    threshold: usize,
    blocks: Vec<TextBlock>,
}

impl Finder<'_> {
    fn walk(&mut self, id: NodeId) {
        match tags::classify(self.doc, id) {
            TagClass::Skip | TagClass::Text => {}
            TagClass::EmbeddingPoint => {
                // Directly accessible sub-documents are walked in place;
                // everything else is the aggregator's concern.
                if let Some(frame) = self.doc.frame_state(id) {
                    if frame.content_root.is_some() {
                        self.walk(frame.content_root);
                    }
                }
            }
            TagClass::DescriptionList => self.add_block(id, false),
            TagClass::ListContainer => {
                let items: Vec<NodeId> = self.doc.element_children(id).collect();
                if items.iter().any(|&item| self.has_text_nodes(item)) {
                    self.add_block(id, false);
                } else if items.iter().any(|&item| self.is_paragraph(item)) {
                    self.add_block(id, true);
                } else if items.iter().any(|&item| self.contains_text_blocks(item)) {
                    self.add_block(id, true);
                }
                // A list that fails all three tests is a leaf: no descent.
            }
            TagClass::TableBody => {
                let rows: Vec<NodeId> = self.doc.element_children(id).collect();
                let first_row_cells =
                    rows.first().map(|&row| self.doc.element_children(row).count()).unwrap_or(0);
                if rows.len() > 3 || first_row_cells > 3 {
                    if rows.iter().any(|&row| self.contains_text_blocks(row)) {
                        self.add_block(id, true);
                    }
                } else {
                    for row in rows {
                        self.walk(row);
                    }
                }
            }
            _ => {
                if self.has_text_nodes(id) {
                    self.add_block(id, false);
                } else if self.has_paragraphs(id) {
                    self.add_block(id, true);
                } else {
                    let children: Vec<NodeId> = self
                        .doc
                        .element_children(id)
                        .filter(|&child| !tags::blocks_descent(self.doc, child))
                        .collect();
                    for child in children {
                        self.walk(child);
                    }
                }
            }
        }
    }

    fn add_block(&mut self, node: NodeId, multi: bool) {
        let chars = text::rendered_text(self.doc, node).chars().count();
        self.blocks.push(TextBlock { node, multi, chars });
    }

    /// Meaningful text directly present (a direct child text node of at
    /// least 3 trimmed characters), with the whole node's rendered text
    /// reaching the threshold.
    fn has_text_nodes(&self, id: NodeId) -> bool {
        if !self.doc.is_element(id) {
            return false;
        }
        let has_own_text = self
            .doc
            .children(id)
            .any(|child| self.doc.text(child).is_some_and(|t| t.trim().len() >= 3));
        has_own_text && text::rendered_text(self.doc, id).chars().count() >= self.threshold
    }

    fn is_paragraph(&self, id: NodeId) -> bool {
        self.doc.tag(id) == Some("p")
            && self.doc.is_visible(id)
            && text::rendered_text(self.doc, id).chars().count() >= self.threshold
    }

    fn has_paragraphs(&self, id: NodeId) -> bool {
        self.doc.element_children(id).any(|child| self.is_paragraph(child))
    }

    fn contains_text_blocks(&self, id: NodeId) -> bool {
        let children: Vec<NodeId> = self
            .doc
            .element_children(id)
            .filter(|&child| !tags::blocks_descent(self.doc, child))
            .collect();
        children.iter().any(|&child| self.has_text_nodes(child))
            || children.iter().any(|&child| self.is_paragraph(child))
            || children.iter().any(|&child| self.contains_text_blocks(child))
    }
}
