//! Error types for the extraction engine.
//!
//! Per-frame failures are never fatal: the aggregator catches them and
//! degrades to "no content for that frame". An empty passage list is a valid
//! terminal state, not an error.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The embedding point cannot be read directly (cross-origin or no
    /// content document) and no channel is available.
    #[error("frame not accessible: {0}")]
    Inaccessible(String),

    /// A channel request exceeded its deadline.
    #[error("frame request timed out after {0} ms")]
    Timeout(u64),

    /// Explicit error payload carried by a channel response.
    #[error("remote frame error: {0}")]
    Remote(String),

    /// The channel closed before a response arrived.
    #[error("frame channel closed")]
    ChannelClosed,

    /// A channel request named a method the responder does not implement.
    /// The only failure surfaced to a channel caller as an explicit
    /// failure response.
    #[error("unknown method: {0}")]
    UnknownMethod(String),
}
