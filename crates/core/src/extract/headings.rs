//! Heading context: headings skipped between blocks that should still be
//! read before the block they introduce.

use crate::dom::document::Document;
use crate::dom::node::NodeId;
use crate::dom::tags;

/// Collect the headings standing between `block` and `prev_block` (or the
/// walk `root`) that outrank the block's own heading level.
///
/// The walk steps backward through document order. Each visible,
/// non-ignored heading whose level is strictly less than the running level
/// is collected and lowers the bar, producing a chain whose levels strictly
/// decrease walking backward. The returned order is reversed, outermost
/// heading first.
pub fn headings_for(
    doc: &Document,
    block: NodeId,
    prev_block: Option<NodeId>,
    root: NodeId,
) -> Vec<NodeId> {
    let first_inner = doc.find_descendant(block, |d, id| {
        d.is_element(id)
            && d.is_visible(id)
            && (tags::heading_level(d, id) < 100 || d.tag(id) == Some("p"))
    });
    let mut current_level = first_inner.map(|id| tags::heading_level(doc, id)).unwrap_or(100);

    let mut collected = Vec::new();
    let mut node = doc.previous_node(block, true, root);
    while node.is_some() && Some(node) != prev_block {
        let ignore = doc.is_element(node) && tags::is_ignored(doc, node);
        if !ignore && doc.is_element(node) && doc.is_visible(node) {
            let level = tags::heading_level(doc, node);
            if level < current_level {
                collected.push(node);
                current_level = level;
            }
        }
        // Leaving an ignored subtree steps over it without descending.
        node = doc.previous_node(node, ignore, root);
    }
    collected.reverse();
    collected
}
