//! Wire types for the lector cross-frame channel.
//!
//! This crate contains the serde-serializable types exchanged between a
//! parent document and the embedded sub-documents it hosts. These types
//! represent the "protocol layer" - the shapes of data as they appear on
//! the wire, whatever transport carries them.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization
//! * 1:1 with the wire: camelCase field names, internally tagged envelope
//! * Stable: Changes only when the wire protocol changes
//!
//! The request/response correlation logic lives in `lector-core`.

pub mod frame;
pub mod message;

pub use frame::*;
pub use message::*;
