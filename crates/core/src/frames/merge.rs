//! Document-order merge of parent passages and sub-document texts.

use std::collections::HashMap;

use crate::dom::document::Document;
use crate::dom::node::NodeId;
use crate::extract::extract_subtree_passages;

/// Splice collected frame texts into the reading order.
///
/// When no frame contributed anything, the parent-only `base` list is
/// returned untouched. Otherwise the top-level children are walked in
/// document order: an embedding element with collected texts contributes an
/// empty-string separator followed by its texts, every other child
/// contributes its own extracted passages at the threshold the parent
/// pipeline settled on.
pub fn merge_document_order(
    doc: &mut Document,
    base: Vec<String>,
    frame_texts: &HashMap<NodeId, Vec<String>>,
    threshold: usize,
) -> Vec<String> {
    if frame_texts.values().all(|texts| texts.is_empty()) {
        return base;
    }

    let children: Vec<NodeId> = doc.element_children(doc.body()).collect();
    let mut merged = Vec::new();
    for child in children {
        match frame_texts.get(&child) {
            Some(texts) if !texts.is_empty() => {
                merged.push(String::new());
                merged.extend(texts.iter().cloned());
            }
            _ => merged.extend(extract_subtree_passages(doc, child, threshold)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::{FrameOrigin, FrameState};

    fn paragraph(doc: &mut Document, parent: NodeId, text: &str) {
        let p = doc.create_element("p", vec![]);
        let t = doc.create_text(text);
        doc.append(parent, p);
        doc.append(p, t);
    }

    #[test]
    fn empty_map_returns_base_unchanged() {
        let mut doc = Document::new();
        let div = doc.create_element("div", vec![]);
        doc.append(doc.body(), div);
        paragraph(&mut doc, div, "Parent paragraph long enough to be its own block.");

        let base = vec!["Parent paragraph long enough to be its own block.".to_string()];
        let merged = merge_document_order(&mut doc, base.clone(), &HashMap::new(), 50);
        assert_eq!(merged, base);
    }

    #[test]
    fn all_empty_contributions_return_base_unchanged() {
        let mut doc = Document::new();
        let iframe = doc.create_element("iframe", vec![]);
        doc.append(doc.body(), iframe);

        let base = vec!["parent text".to_string()];
        let mut map = HashMap::new();
        map.insert(iframe, Vec::new());
        assert_eq!(merge_document_order(&mut doc, base.clone(), &map, 50), base);
    }

    #[test]
    fn frame_texts_are_spliced_at_the_embedding_position() {
        let mut doc = Document::new();
        let before = doc.create_element("div", vec![]);
        doc.append(doc.body(), before);
        paragraph(&mut doc, before, "Text before the embedded document, long enough to keep.");
        let iframe = doc.create_element("iframe", vec![]);
        doc.append(doc.body(), iframe);
        doc.set_frame_state(
            iframe,
            FrameState {
                frame_id: Some("abc123xyz".to_string()),
                origin: FrameOrigin::CrossOrigin,
                content_root: NodeId::NONE,
            },
        );
        let after = doc.create_element("div", vec![]);
        doc.append(doc.body(), after);
        paragraph(&mut doc, after, "Text after the embedded document, also long enough.");

        let base = vec!["unused once a frame contributes".to_string()];
        let mut map = HashMap::new();
        map.insert(iframe, vec!["Framed one.".to_string(), "Framed two.".to_string()]);

        let merged = merge_document_order(&mut doc, base, &map, 50);
        assert_eq!(
            merged,
            vec![
                "Text before the embedded document, long enough to keep.",
                "",
                "Framed one.",
                "Framed two.",
                "Text after the embedded document, also long enough.",
            ]
        );
    }
}
