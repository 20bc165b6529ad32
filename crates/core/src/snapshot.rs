//! Snapshot (de)serialization.
//!
//! A snapshot is the JSON tree a host layer captures from a rendered page:
//! elements with the layout facts the heuristics consult, text runs, and
//! embedded sub-documents. [`Snapshot::build`] converts it into the arena
//! form the engine works on. Same-origin sub-documents are inlined into the
//! parent arena as frame content roots; cross-origin ones become separate
//! documents addressed by frame ID, served over the channel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lector_protocol::mint_frame_id;

use crate::dom::document::Document;
use crate::dom::node::{FrameOrigin, FrameState, NodeId};

/// A captured page tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: SnapshotNode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotKind {
    #[default]
    Element,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapshotOrigin {
    SameOrigin,
    CrossOrigin,
    Unknown,
}

impl From<SnapshotOrigin> for FrameOrigin {
    fn from(origin: SnapshotOrigin) -> Self {
        match origin {
            SnapshotOrigin::SameOrigin => FrameOrigin::SameOrigin,
            SnapshotOrigin::CrossOrigin => FrameOrigin::CrossOrigin,
            SnapshotOrigin::Unknown => FrameOrigin::Unknown,
        }
    }
}

/// One node of the captured tree. Everything but the payload defaults, so
/// hand-written fixtures stay short.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotNode {
    #[serde(default)]
    pub kind: SnapshotKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub left: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub float_right: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fixed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<SnapshotOrigin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_document: Option<Box<SnapshotNode>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

fn default_visible() -> bool {
    true
}

/// The arena form of a snapshot: the parent document plus the cross-origin
/// sub-documents keyed by frame ID.
pub struct LoadedSnapshot {
    pub document: Document,
    pub frame_contents: Vec<(String, Document)>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Convert into the arena form.
    pub fn build(&self) -> LoadedSnapshot {
        let mut document = Document::new();
        let mut frame_contents = Vec::new();
        let body = document.body();
        for child in &self.body.children {
            build_node(child, &mut document, body, &mut frame_contents);
        }
        LoadedSnapshot { document, frame_contents }
    }
}

fn build_node(
    node: &SnapshotNode,
    doc: &mut Document,
    parent: NodeId,
    frame_contents: &mut Vec<(String, Document)>,
) {
    match node.kind {
        SnapshotKind::Text => {
            let text = doc.create_text(node.text.clone().unwrap_or_default());
            doc.append(parent, text);
        }
        SnapshotKind::Element => {
            let tag = node.tag.as_deref().unwrap_or("div");
            let attrs: Vec<(String, String)> =
                node.attrs.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            let id = doc.create_element(tag, attrs);
            if let Some(n) = doc.get_mut(id) {
                n.layout.visible = node.visible;
                n.layout.left = node.left;
                n.layout.float_right = node.float_right;
                n.layout.position_fixed = node.fixed;
            }
            doc.append(parent, id);

            if matches!(doc.tag(id), Some("iframe" | "frame")) {
                attach_frame(node, doc, id, frame_contents);
                return;
            }
            for child in &node.children {
                build_node(child, doc, id, frame_contents);
            }
        }
    }
}

fn attach_frame(
    node: &SnapshotNode,
    doc: &mut Document,
    id: NodeId,
    frame_contents: &mut Vec<(String, Document)>,
) {
    let origin = node.origin.map(FrameOrigin::from).unwrap_or(FrameOrigin::Unknown);
    match (&node.content_document, origin) {
        // Cross-origin content is reachable over the channel only: build it
        // as its own document and address it by frame ID.
        (Some(content), FrameOrigin::CrossOrigin) => {
            let frame_id = node.frame_id.clone().unwrap_or_else(mint_frame_id);
            let mut content_doc = Document::new();
            let content_body = content_doc.body();
            let mut nested = Vec::new();
            for child in &content.children {
                build_node(child, &mut content_doc, content_body, &mut nested);
            }
            frame_contents.push((frame_id.clone(), content_doc));
            frame_contents.append(&mut nested);
            doc.set_frame_state(
                id,
                FrameState { frame_id: Some(frame_id), origin, content_root: NodeId::NONE },
            );
        }
        // Same-origin content is inlined: a parentless body in the same
        // arena, reachable only through the embedding element.
        (Some(content), _) => {
            let content_root = doc.create_element("body", vec![]);
            for child in &content.children {
                build_node(child, doc, content_root, frame_contents);
            }
            doc.set_frame_state(
                id,
                FrameState { frame_id: node.frame_id.clone(), origin, content_root },
            );
        }
        (None, _) => {
            if node.frame_id.is_some() || node.origin.is_some() {
                doc.set_frame_state(
                    id,
                    FrameState {
                        frame_id: node.frame_id.clone(),
                        origin,
                        content_root: NodeId::NONE,
                    },
                );
            }
        }
    }
}
