//! Math-markup speech seam.
//!
//! Math elements render as symbol soup; a collaborator turns their markup
//! into spoken text. The engine only defines the seam: [`MathSpeech`] is the
//! collaborator trait, [`MathSubstitutions`] the resolved markup-to-speech
//! table (resolved once per session), and [`MathScope`] the guard that swaps
//! spoken text in for the duration of one extraction. Collaborator failure
//! degrades to no substitution at all.

use async_trait::async_trait;
use tracing::warn;

use crate::dom::document::Document;
use crate::dom::node::{NodeData, NodeId};
use crate::error::Result;

/// Turns math markup into spoken text.
#[async_trait]
pub trait MathSpeech: Send + Sync {
    /// One spoken string per markup string, in order.
    async fn spoken_math(&self, markup: &[String]) -> Result<Vec<String>>;
}

/// Every `math` element under `root` paired with its outer markup.
pub fn collect_math_markup(doc: &Document, root: NodeId) -> Vec<(NodeId, String)> {
    doc.descendants(root)
        .filter(|&id| doc.tag(id) == Some("math"))
        .map(|id| (id, outer_markup(doc, id)))
        .collect()
}

/// Minimal markup serialization, tags and text only. Speech services key on
/// element structure, not attributes.
fn outer_markup(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_markup(doc, id, &mut out);
    out
}

fn write_markup(doc: &Document, id: NodeId, out: &mut String) {
    let Some(node) = doc.get(id) else { return };
    match &node.data {
        NodeData::Text(text) => out.push_str(text),
        NodeData::Element { tag, .. } => {
            out.push('<');
            out.push_str(tag);
            out.push('>');
            for child in doc.children(id) {
                write_markup(doc, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

/// Spoken text per math element, resolved once per session.
#[derive(Default)]
pub struct MathSubstitutions {
    entries: Vec<(NodeId, String)>,
}

impl MathSubstitutions {
    /// Resolve spoken text for the given markup points. A collaborator
    /// error degrades to an empty table, leaving math text as rendered.
    pub async fn resolve(points: Vec<(NodeId, String)>, speech: &dyn MathSpeech) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        let markup: Vec<String> = points.iter().map(|(_, m)| m.clone()).collect();
        let spoken = match speech.spoken_math(&markup).await {
            Ok(spoken) => spoken,
            Err(error) => {
                warn!(target: "lector.extract", %error, "math speech unavailable");
                return Self::default();
            }
        };
        let entries = points
            .into_iter()
            .enumerate()
            .map(|(i, (node, _))| {
                let text = spoken
                    .get(i)
                    .filter(|s| !s.is_empty())
                    .cloned()
                    .unwrap_or_else(|| "math expression".to_string());
                (node, text)
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scoped substitution: hides each math element and inserts its spoken text
/// beside it, restoring both on drop.
pub struct MathScope<'a> {
    doc: &'a mut Document,
    hidden: Vec<NodeId>,
    inserted: Vec<NodeId>,
}

impl<'a> MathScope<'a> {
    pub fn new(doc: &'a mut Document, subs: &MathSubstitutions) -> Self {
        let mut hidden = Vec::new();
        let mut inserted = Vec::new();
        for (node, spoken) in &subs.entries {
            if !doc.is_visible(*node) {
                continue;
            }
            let text = doc.create_text(spoken.clone());
            doc.insert_before(*node, text);
            doc.set_visible(*node, false);
            inserted.push(text);
            hidden.push(*node);
        }
        Self { doc, hidden, inserted }
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        self.doc
    }
}

impl Drop for MathScope<'_> {
    fn drop(&mut self) {
        for &text in &self.inserted {
            self.doc.detach(text);
        }
        for &node in &self.hidden {
            self.doc.set_visible(node, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::text::rendered_text;
    use crate::error::Error;

    struct FixedSpeech(Vec<String>);

    #[async_trait]
    impl MathSpeech for FixedSpeech {
        async fn spoken_math(&self, _markup: &[String]) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSpeech;

    #[async_trait]
    impl MathSpeech for BrokenSpeech {
        async fn spoken_math(&self, _markup: &[String]) -> Result<Vec<String>> {
            Err(Error::Remote("service down".to_string()))
        }
    }

    fn doc_with_math() -> (Document, NodeId) {
        let mut doc = Document::new();
        let p = doc.create_element("p", vec![]);
        let t = doc.create_text("The identity");
        let math = doc.create_element("math", vec![]);
        let mi = doc.create_element("mi", vec![]);
        let x = doc.create_text("x");
        doc.append(doc.body(), p);
        doc.append(p, t);
        doc.append(p, math);
        doc.append(math, mi);
        doc.append(mi, x);
        (doc, math)
    }

    #[test]
    fn outer_markup_serializes_tags_and_text() {
        let (doc, math) = doc_with_math();
        assert_eq!(outer_markup(&doc, math), "<math><mi>x</mi></math>");
    }

    #[tokio::test]
    async fn scope_swaps_spoken_text_and_restores() {
        let (mut doc, math) = doc_with_math();
        let p = doc.get(math).unwrap().parent;
        let points = collect_math_markup(&doc, doc.body());
        let subs = MathSubstitutions::resolve(points, &FixedSpeech(vec!["ex".to_string()])).await;

        {
            let mut scope = MathScope::new(&mut doc, &subs);
            assert_eq!(rendered_text(scope.doc_mut(), p), "The identity ex");
        }
        assert!(doc.is_visible(math));
        assert_eq!(rendered_text(&doc, p), "The identity x");
    }

    #[tokio::test]
    async fn missing_spoken_entries_fall_back_to_a_generic_phrase() {
        let (doc, _) = doc_with_math();
        let points = collect_math_markup(&doc, doc.body());
        let subs = MathSubstitutions::resolve(points, &FixedSpeech(Vec::new())).await;
        assert_eq!(subs.entries[0].1, "math expression");
    }

    #[tokio::test]
    async fn collaborator_failure_degrades_to_no_substitution() {
        let (mut doc, _) = doc_with_math();
        let points = collect_math_markup(&doc, doc.body());
        let subs = MathSubstitutions::resolve(points, &BrokenSpeech).await;
        assert!(subs.is_empty());

        let body = doc.body();
        let mut scope = MathScope::new(&mut doc, &subs);
        assert_eq!(rendered_text(scope.doc_mut(), body), "The identity x");
    }
}
