//! The block pipeline: finder -> trimmer -> heading context -> renderer.

pub mod finder;
pub mod headings;
pub mod render;
pub mod trimmer;

use tracing::info;

pub use finder::{TextBlock, find_text_blocks};

use crate::config::ExtractOptions;
use crate::dom::document::Document;
use crate::dom::node::NodeId;

/// Result of one pipeline run: the passages, plus the block threshold that
/// produced them (lowered when the trimmer's retry fired), which downstream
/// per-subtree extraction reuses.
pub struct Extraction {
    pub passages: Vec<String>,
    pub threshold: usize,
}

/// Run the full pipeline under `root`.
pub fn extract_passages(
    doc: &mut Document,
    root: NodeId,
    opts: &ExtractOptions,
    quietly: bool,
) -> Extraction {
    let blocks = finder::find_text_blocks(doc, root, opts.block_threshold);
    if !quietly {
        let chars: usize = blocks.iter().map(|b| b.chars).sum();
        info!(target: "lector.extract", blocks = blocks.len(), chars, "found text blocks");
    }
    let outcome = trimmer::trim_if_sparse(doc, root, blocks, opts);
    let passages = render_with_headings(doc, root, &outcome.blocks);
    Extraction { passages, threshold: outcome.threshold }
}

/// Pipeline restricted to one subtree at a fixed threshold, with heading
/// collection rooted at the subtree and no document-level trim. Used by the
/// document-order merger for non-frame top-level children.
pub fn extract_subtree_passages(doc: &mut Document, root: NodeId, threshold: usize) -> Vec<String> {
    let blocks = finder::find_text_blocks(doc, root, threshold);
    render_with_headings(doc, root, &blocks)
}

fn render_with_headings(doc: &mut Document, root: NodeId, blocks: &[TextBlock]) -> Vec<String> {
    let mut to_read: Vec<TextBlock> = Vec::new();
    let mut prev: Option<NodeId> = None;
    for block in blocks {
        for heading in headings::headings_for(doc, block.node, prev, root) {
            to_read.push(TextBlock { node: heading, multi: false, chars: 0 });
        }
        to_read.push(block.clone());
        prev = Some(block.node);
    }

    let mut passages = Vec::new();
    for block in &to_read {
        passages.extend(render::render_block(doc, block).into_iter().filter(|t| !t.is_empty()));
    }
    passages
}
