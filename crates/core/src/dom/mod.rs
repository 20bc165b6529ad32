//! Arena-allocated document model and node-level predicates.

pub mod document;
pub mod layout;
pub mod node;
pub mod tags;
pub mod text;

pub use document::Document;
pub use node::{FrameOrigin, FrameState, Node, NodeData, NodeId};
pub use tags::TagClass;
