//! Tunable extraction parameters.

use std::time::Duration;

/// Heuristic knobs for the extraction pipeline.
///
/// The defaults were tuned empirically against real pages, not derived
/// formally, so they are carried as configuration rather than constants.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Minimum rendered characters for a node to qualify as a text block.
    pub block_threshold: usize,
    /// Total captured characters below which the finder re-runs at
    /// `retry_threshold` and the boilerplate trim kicks in.
    pub low_content_cutoff: usize,
    /// Lowered block threshold used by the retry pass.
    pub retry_threshold: usize,
    /// First candidate cut index probed by the head/tail trim.
    pub probe_start: usize,
    /// A block is an outlier when its length exceeds
    /// `mean + outlier_multiplier * spread` of the blocks on its side.
    pub outlier_multiplier: f64,
    /// Deadline for one cross-frame channel request.
    pub frame_timeout: Duration,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            block_threshold: 50,
            low_content_cutoff: 1000,
            retry_threshold: 3,
            probe_start: 3,
            outlier_multiplier: 2.0,
            frame_timeout: Duration::from_millis(500),
        }
    }
}
