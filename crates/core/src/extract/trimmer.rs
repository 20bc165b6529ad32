//! Statistical boilerplate trim for low-content documents.
//!
//! When the full-threshold pass captures too little text, the finder re-runs
//! at a much lower threshold and the head/tail of the resulting block list
//! is scanned for outliers. The heuristic assumes boilerplate blocks near
//! the document edges are anomalously large relative to the genuine content
//! blocks around them; it is an outlier test, not a rigorous one.

use tracing::debug;

use crate::config::ExtractOptions;
use crate::dom::document::Document;
use crate::dom::node::NodeId;
use crate::extract::finder::{self, TextBlock};

/// Block list after the optional retry, plus the threshold that produced it
/// (reused by downstream per-subtree extraction).
pub struct TrimOutcome {
    pub blocks: Vec<TextBlock>,
    pub threshold: usize,
}

/// Re-walk at the lower threshold and trim edge outliers when the captured
/// text is below the low-content cutoff; otherwise pass the blocks through.
pub fn trim_if_sparse(
    doc: &Document,
    root: NodeId,
    blocks: Vec<TextBlock>,
    opts: &ExtractOptions,
) -> TrimOutcome {
    let total: usize = blocks.iter().map(|b| b.chars).sum();
    if total >= opts.low_content_cutoff {
        return TrimOutcome { blocks, threshold: opts.block_threshold };
    }

    let retry = finder::find_text_blocks(doc, root, opts.retry_threshold);
    let lens: Vec<usize> = retry.iter().map(|b| b.chars).collect();
    debug!(
        target: "lector.extract",
        blocks = retry.len(),
        chars = lens.iter().sum::<usize>(),
        "low content, re-walked at lower threshold"
    );

    let head = (opts.probe_start..lens.len()).find(|&i| {
        let (mean, spread) = gaussian(&lens[..i]);
        lens[i] as f64 > mean + opts.outlier_multiplier * spread
    });
    let mut tail = None;
    if lens.len() >= 4 {
        for i in (0..=lens.len() - 4).rev() {
            let (mean, spread) = gaussian(&lens[i + 1..]);
            if lens[i] as f64 > mean + opts.outlier_multiplier * spread {
                tail = Some(i + 1);
                break;
            }
        }
    }

    if head.is_none() && tail.is_none() {
        return TrimOutcome { blocks: retry, threshold: opts.retry_threshold };
    }
    let start = head.unwrap_or(0);
    let end = tail.unwrap_or(lens.len());
    if start >= end {
        // Crossed cut points on a degenerate layout; trimming here could
        // discard everything, so keep the list whole.
        debug!(target: "lector.extract", start, end, "crossed trim points, keeping all blocks");
        return TrimOutcome { blocks: retry, threshold: opts.retry_threshold };
    }

    debug!(target: "lector.extract", start, end, "trimmed boilerplate edges");
    TrimOutcome {
        blocks: retry.into_iter().skip(start).take(end - start).collect(),
        threshold: opts.retry_threshold,
    }
}

/// Mean and spread of a window of block lengths. The spread is the square
/// root of the summed squared deviations, not divided by n; the original
/// heuristic was tuned with this quirk, so it is kept as-is.
fn gaussian(lens: &[usize]) -> (f64, f64) {
    if lens.is_empty() {
        return (0.0, 0.0);
    }
    let mean = lens.iter().sum::<usize>() as f64 / lens.len() as f64;
    let squared_deviations: f64 = lens.iter().map(|&l| (l as f64 - mean).powi(2)).sum();
    (mean, squared_deviations.sqrt())
}
