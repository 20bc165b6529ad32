//! Sub-document discovery and per-frame text collection.

use serde_json::Value;
use tracing::debug;

use lector_protocol::METHOD_GET_FRAME_TEXTS;

use crate::dom::document::Document;
use crate::dom::node::{FrameOrigin, NodeId};
use crate::dom::text::{collect_text_runs, rendered_text, split_paragraphs};
use crate::error::Result;
use crate::frames::channel::FrameChannel;

/// How a sub-document's content can be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameAccess {
    /// The content tree is loaded alongside the parent; read it directly.
    Direct,
    /// The content lives behind the frame channel, addressed by frame ID.
    Channel,
    /// No content tree and no frame ID. Nothing to collect.
    Inaccessible,
}

/// One embedding point found under the extraction root.
#[derive(Debug, Clone)]
pub struct SubDocumentDescriptor {
    pub node: NodeId,
    pub frame_id: Option<String>,
    pub origin: FrameOrigin,
    pub access: FrameAccess,
}

/// Find every embedding element under `root`, in document order.
pub fn discover_frames(doc: &Document, root: NodeId) -> Vec<SubDocumentDescriptor> {
    doc.descendants(root)
        .filter(|&id| matches!(doc.tag(id), Some("iframe" | "frame")))
        .map(|id| {
            let state = doc.frame_state(id);
            let content_root = state.map(|s| s.content_root).unwrap_or(NodeId::NONE);
            let frame_id = state.and_then(|s| s.frame_id.clone());
            let origin = state.map(|s| s.origin).unwrap_or(FrameOrigin::Unknown);
            let access = if content_root.is_some() {
                FrameAccess::Direct
            } else if frame_id.is_some() {
                FrameAccess::Channel
            } else {
                FrameAccess::Inaccessible
            };
            SubDocumentDescriptor { node: id, frame_id, origin, access }
        })
        .collect()
}

/// Collect readable texts from a directly accessible content tree.
///
/// Tries progressively looser shapes: blank-line paragraphs, then long
/// lines, then the whole rendered text, then raw text runs. The first
/// non-empty level wins.
pub fn direct_frame_texts(doc: &Document, content_root: NodeId) -> Vec<String> {
    let text = rendered_text(doc, content_root);

    let paragraphs: Vec<String> =
        split_paragraphs(&text).into_iter().filter(|p| p.trim().len() > 3).collect();
    if !paragraphs.is_empty() {
        return paragraphs;
    }

    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.len() > 10)
        .map(str::to_string)
        .collect();
    if !lines.is_empty() {
        return lines;
    }

    let trimmed = text.trim();
    if !trimmed.is_empty() {
        return vec![trimmed.to_string()];
    }

    collect_text_runs(doc, content_root, 3)
}

/// Fetch readable texts from a channel-addressed frame.
pub async fn channel_frame_texts(
    channel: &dyn FrameChannel,
    frame_id: &str,
    index: usize,
    quietly: bool,
) -> Result<Vec<String>> {
    let data = channel.request(frame_id, METHOD_GET_FRAME_TEXTS, index, quietly).await?;
    match data {
        Some(value) => Ok(parse_texts(value)),
        None => Ok(Vec::new()),
    }
}

fn parse_texts(value: Value) -> Vec<String> {
    match serde_json::from_value(value) {
        Ok(texts) => texts,
        Err(error) => {
            debug!(target: "lector.frames", %error, "malformed frame texts payload");
            Vec::new()
        }
    }
}
