//! Geometry predicates for block candidates.

use crate::dom::document::Document;
use crate::dom::node::NodeId;

/// Whether a candidate block survives the geometry post-filter: rendered
/// visible and not positioned off-canvas to the left.
pub fn is_on_canvas(doc: &Document, id: NodeId) -> bool {
    doc.get(id).is_some_and(|n| n.layout.visible && n.layout.left >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_hidden_and_offscreen_nodes() {
        let mut doc = Document::new();
        let visible = doc.create_element("div", vec![]);
        let hidden = doc.create_element("div", vec![]);
        doc.set_visible(hidden, false);
        let offscreen = doc.create_element("div", vec![]);
        doc.get_mut(offscreen).unwrap().layout.left = -9999.0;

        assert!(is_on_canvas(&doc, visible));
        assert!(!is_on_canvas(&doc, hidden));
        assert!(!is_on_canvas(&doc, offscreen));
    }
}
