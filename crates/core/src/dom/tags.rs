//! Tag-class dispatch for the extraction walk.
//!
//! The finder consumes a single [`TagClass`] per node instead of scattering
//! tag checks through the traversal.

use crate::dom::document::Document;
use crate::dom::node::NodeId;

/// Tags that are never read, never descended into, and never blocks: form
/// controls, media, script/style, navigation landmarks, footers.
const IGNORE_TAGS: &[&str] = &[
    "select", "textarea", "button", "label", "audio", "video", "dialog", "embed", "menu", "nav",
    "noframes", "noscript", "object", "script", "style", "svg", "aside", "footer",
];

/// Tags the finder does not recurse into when scanning a container's
/// children (they are either ignored or captured through their parent).
const NO_DESCENT_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "p"];

/// Structural class of a node, as seen by the block finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    /// Never read or descended into.
    Skip,
    /// `h1`..`h6`, with its level.
    Heading(u8),
    /// `p`.
    Paragraph,
    /// `a` carrying an `href`.
    Anchor,
    /// `ol` / `ul`.
    ListContainer,
    /// `dl`.
    DescriptionList,
    /// `tbody`.
    TableBody,
    /// `tr`.
    TableRow,
    /// `iframe` / `frame`: hosts an embedded sub-document.
    EmbeddingPoint,
    /// Any other element: walked as a plain container.
    Generic,
    /// Text run.
    Text,
}

/// Classify one node.
pub fn classify(doc: &Document, id: NodeId) -> TagClass {
    let Some(tag) = doc.tag(id) else {
        return TagClass::Text;
    };
    if is_ignored(doc, id) {
        return TagClass::Skip;
    }
    match tag {
        "p" => TagClass::Paragraph,
        "ol" | "ul" => TagClass::ListContainer,
        "dl" => TagClass::DescriptionList,
        "tbody" => TagClass::TableBody,
        "tr" => TagClass::TableRow,
        "iframe" | "frame" => TagClass::EmbeddingPoint,
        "a" if doc.attr(id, "href").is_some() => TagClass::Anchor,
        _ => heading_level_of_tag(tag).map(TagClass::Heading).unwrap_or(TagClass::Generic),
    }
}

/// Whether the node matches the fixed "never narrate" set: ignored tags,
/// `#footer`, `.no-read-aloud`, `aria-hidden="true"`.
pub fn is_ignored(doc: &Document, id: NodeId) -> bool {
    let Some(tag) = doc.tag(id) else {
        return false;
    };
    IGNORE_TAGS.contains(&tag)
        || doc.attr(id, "id") == Some("footer")
        || doc.has_class(id, "no-read-aloud")
        || doc.attr(id, "aria-hidden") == Some("true")
}

/// Whether the finder may recurse into this child while scanning a
/// container: the ignore set plus headings, paragraphs, and links.
pub fn blocks_descent(doc: &Document, id: NodeId) -> bool {
    if !doc.is_element(id) {
        return true;
    }
    if is_ignored(doc, id) {
        return true;
    }
    let tag = doc.tag(id).unwrap_or_default();
    NO_DESCENT_TAGS.contains(&tag) || (tag == "a" && doc.attr(id, "href").is_some())
}

/// "Don't read" predicate applied while rendering a block: ignored nodes,
/// superscripts, right-floated and fixed-position elements.
pub fn dont_read(doc: &Document, id: NodeId) -> bool {
    if !doc.is_element(id) {
        return false;
    }
    if is_ignored(doc, id) || doc.tag(id) == Some("sup") {
        return true;
    }
    doc.get(id).is_some_and(|n| n.layout.float_right || n.layout.position_fixed)
}

/// Heading level of a node. Non-headings rank at 100 ("deepest"), so any
/// real heading outranks them.
pub fn heading_level(doc: &Document, id: NodeId) -> u8 {
    doc.tag(id).and_then(heading_level_of_tag).unwrap_or(100)
}

fn heading_level_of_tag(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_structural_tags() {
        let mut doc = Document::new();
        let ul = doc.create_element("ul", vec![]);
        let dl = doc.create_element("dl", vec![]);
        let tbody = doc.create_element("tbody", vec![]);
        let iframe = doc.create_element("iframe", vec![]);
        let div = doc.create_element("div", vec![]);
        let h3 = doc.create_element("h3", vec![]);

        assert_eq!(classify(&doc, ul), TagClass::ListContainer);
        assert_eq!(classify(&doc, dl), TagClass::DescriptionList);
        assert_eq!(classify(&doc, tbody), TagClass::TableBody);
        assert_eq!(classify(&doc, iframe), TagClass::EmbeddingPoint);
        assert_eq!(classify(&doc, div), TagClass::Generic);
        assert_eq!(classify(&doc, h3), TagClass::Heading(3));
    }

    #[test]
    fn anchor_needs_href() {
        let mut doc = Document::new();
        let link = doc.create_element("a", vec![("href".to_string(), "/x".to_string())]);
        let anchor = doc.create_element("a", vec![]);
        assert_eq!(classify(&doc, link), TagClass::Anchor);
        assert_eq!(classify(&doc, anchor), TagClass::Generic);
    }

    #[test]
    fn ignore_set_covers_markers_not_just_tags() {
        let mut doc = Document::new();
        let nav = doc.create_element("nav", vec![]);
        let footer_id = doc.create_element("div", vec![("id".to_string(), "footer".to_string())]);
        let marked =
            doc.create_element("div", vec![("class".to_string(), "no-read-aloud".to_string())]);
        let hidden =
            doc.create_element("div", vec![("aria-hidden".to_string(), "true".to_string())]);
        let plain = doc.create_element("div", vec![]);

        assert!(is_ignored(&doc, nav));
        assert!(is_ignored(&doc, footer_id));
        assert!(is_ignored(&doc, marked));
        assert!(is_ignored(&doc, hidden));
        assert!(!is_ignored(&doc, plain));
    }

    #[test]
    fn dont_read_includes_layout_facts() {
        let mut doc = Document::new();
        let sup = doc.create_element("sup", vec![]);
        let floated = doc.create_element("span", vec![]);
        doc.get_mut(floated).unwrap().layout.float_right = true;
        let fixed = doc.create_element("div", vec![]);
        doc.get_mut(fixed).unwrap().layout.position_fixed = true;
        let span = doc.create_element("span", vec![]);

        assert!(dont_read(&doc, sup));
        assert!(dont_read(&doc, floated));
        assert!(dont_read(&doc, fixed));
        assert!(!dont_read(&doc, span));
    }

    #[test]
    fn non_headings_rank_deepest() {
        let mut doc = Document::new();
        let h1 = doc.create_element("h1", vec![]);
        let p = doc.create_element("p", vec![]);
        assert_eq!(heading_level(&doc, h1), 1);
        assert_eq!(heading_level(&doc, p), 100);
    }
}
