//! Cross-frame coordination: discovery, extraction, and document-order
//! merge of embedded sub-document content.

pub mod aggregator;
pub mod channel;
pub mod merge;

pub use aggregator::{FrameAccess, SubDocumentDescriptor, discover_frames};
pub use channel::{FrameChannel, FrameConnection, OutboundFrame};
