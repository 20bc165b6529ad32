//! Passage rendering: turn one block into its narratable strings.

use crate::dom::document::Document;
use crate::dom::node::NodeId;
use crate::dom::tags;
use crate::dom::text::{
    add_missing_punctuation, rendered_text, split_paragraphs, starts_with_enumerator,
};
use crate::extract::finder::TextBlock;

/// Render a block into one or more passages.
///
/// Multi blocks emit one passage per visible element child; single blocks
/// render as one string split at blank-line paragraph boundaries. Both paths
/// run the punctuation-repair pass first.
pub fn render_block(doc: &mut Document, block: &TextBlock) -> Vec<String> {
    let scope = RenderScope::new(doc, block.node);
    if block.multi {
        let children: Vec<NodeId> = scope
            .doc()
            .element_children(block.node)
            .filter(|&child| scope.doc().is_visible(child))
            .collect();
        children.into_iter().map(|child| passage_text(scope.doc(), child)).collect()
    } else {
        let text = passage_text(scope.doc(), block.node);
        split_paragraphs(&text)
    }
}

fn passage_text(doc: &Document, id: NodeId) -> String {
    add_missing_punctuation(&rendered_text(doc, id)).trim().to_string()
}

/// Scoped mutation around one block render: hides "don't read" descendants
/// and injects ordinal numbering into unnumbered lists, restoring both on
/// drop so the document is unchanged on every exit path.
struct RenderScope<'a> {
    doc: &'a mut Document,
    hidden: Vec<NodeId>,
    injected: Vec<NodeId>,
}

impl<'a> RenderScope<'a> {
    fn new(doc: &'a mut Document, block: NodeId) -> Self {
        let hidden: Vec<NodeId> = doc
            .descendants(block)
            .filter(|&id| doc.is_element(id) && doc.is_visible(id) && tags::dont_read(doc, id))
            .collect();
        for &id in &hidden {
            doc.set_visible(id, false);
        }

        let mut lists: Vec<NodeId> = Vec::new();
        if matches!(doc.tag(block), Some("ol" | "ul")) {
            lists.push(block);
        }
        lists.extend(doc.descendants(block).filter(|&id| matches!(doc.tag(id), Some("ol" | "ul"))));

        let mut injected = Vec::new();
        for list in lists {
            let items: Vec<NodeId> = doc.element_children(list).collect();
            let first_text = match items.first() {
                Some(&first) => rendered_text(doc, first),
                None => continue,
            };
            if first_text.is_empty() || starts_with_enumerator(&first_text) {
                continue;
            }
            for (index, &item) in items.iter().enumerate() {
                let marker = doc.create_text(format!("{}. ", index + 1));
                let first_child = doc.get(item).map(|n| n.first_child).unwrap_or(NodeId::NONE);
                if first_child.is_some() {
                    doc.insert_before(first_child, marker);
                } else {
                    doc.append(item, marker);
                }
                injected.push(marker);
            }
        }

        Self { doc, hidden, injected }
    }

    fn doc(&self) -> &Document {
        self.doc
    }
}

impl Drop for RenderScope<'_> {
    fn drop(&mut self) {
        for &marker in &self.injected {
            self.doc.detach(marker);
        }
        for &id in &self.hidden {
            self.doc.set_visible(id, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_block(doc: &Document, node: NodeId) -> TextBlock {
        let _ = doc;
        TextBlock { node, multi: false, chars: 0 }
    }

    #[test]
    fn single_block_splits_on_blank_lines() {
        let mut doc = Document::new();
        let div = doc.create_element("div", vec![]);
        doc.append(doc.body(), div);
        for text in ["Para one.", "Para two."] {
            let p = doc.create_element("p", vec![]);
            let t = doc.create_text(text);
            doc.append(div, p);
            doc.append(p, t);
        }

        let block = single_block(&doc, div);
        assert_eq!(render_block(&mut doc, &block), vec!["Para one.", "Para two."]);
    }

    #[test]
    fn multi_block_renders_each_visible_child() {
        let mut doc = Document::new();
        let div = doc.create_element("div", vec![]);
        doc.append(doc.body(), div);
        for text in ["First child.", "Second child."] {
            let p = doc.create_element("p", vec![]);
            let t = doc.create_text(text);
            doc.append(div, p);
            doc.append(p, t);
        }
        let hidden = doc.create_element("p", vec![]);
        let t = doc.create_text("Not rendered.");
        doc.append(div, hidden);
        doc.append(hidden, t);
        doc.set_visible(hidden, false);

        let block = TextBlock { node: div, multi: true, chars: 0 };
        assert_eq!(render_block(&mut doc, &block), vec!["First child.", "Second child."]);
    }

    #[test]
    fn dont_read_elements_are_suppressed_and_restored() {
        let mut doc = Document::new();
        let p = doc.create_element("p", vec![]);
        let t1 = doc.create_text("Citation needed");
        let sup = doc.create_element("sup", vec![]);
        let t2 = doc.create_text("[1]");
        doc.append(doc.body(), p);
        doc.append(p, t1);
        doc.append(p, sup);
        doc.append(sup, t2);

        let block = single_block(&doc, p);
        assert_eq!(render_block(&mut doc, &block), vec!["Citation needed"]);
        // The suppression is scoped to the render.
        assert!(doc.is_visible(sup));
    }

    #[test]
    fn unnumbered_lists_gain_ordinals() {
        let mut doc = Document::new();
        let ol = doc.create_element("ol", vec![]);
        doc.append(doc.body(), ol);
        for text in ["alpha", "beta"] {
            let li = doc.create_element("li", vec![]);
            let t = doc.create_text(text);
            doc.append(ol, li);
            doc.append(li, t);
        }

        let block = single_block(&doc, ol);
        let passages = render_block(&mut doc, &block);
        assert_eq!(passages, vec!["1. alpha.\n2. beta"]);
        // Injected markers are gone once the render finishes.
        assert_eq!(rendered_text(&doc, ol), "alpha\nbeta");
    }

    #[test]
    fn already_numbered_lists_are_left_alone() {
        let mut doc = Document::new();
        let ol = doc.create_element("ol", vec![]);
        doc.append(doc.body(), ol);
        for text in ["1. alpha", "2. beta"] {
            let li = doc.create_element("li", vec![]);
            let t = doc.create_text(text);
            doc.append(ol, li);
            doc.append(li, t);
        }

        let block = single_block(&doc, ol);
        assert_eq!(render_block(&mut doc, &block), vec!["1. alpha.\n2. beta"]);
    }

    #[test]
    fn punctuation_repair_applies_before_splitting() {
        let mut doc = Document::new();
        let div = doc.create_element("div", vec![]);
        let t1 = doc.create_text("Line without punctuation");
        let br = doc.create_element("br", vec![]);
        let t2 = doc.create_text("next line.");
        doc.append(doc.body(), div);
        doc.append(div, t1);
        doc.append(div, br);
        doc.append(div, t2);

        let block = single_block(&doc, div);
        assert_eq!(render_block(&mut doc, &block), vec!["Line without punctuation.\nnext line."]);
    }
}
