//! Narration extraction engine.
//!
//! Given a structured-document tree (a page plus any embedded sub-documents
//! it hosts), this crate produces the ordered sequence of text passages a
//! human would want read aloud - skipping navigation, decoration, and
//! boilerplate - with embedded-frame content spliced back in at the position
//! the embedding element occupies.
//!
//! The pipeline is: block detection ([`extract::finder`]) -> statistical
//! boilerplate trim ([`extract::trimmer`]) -> heading context
//! ([`extract::headings`]) -> passage rendering ([`extract::render`]),
//! coordinated across frame boundaries by [`frames`] and cached per session
//! by [`cache`]. The [`session::ExtractionSession`] type ties it together
//! and exposes the inbound command surface.

pub mod cache;
pub mod config;
pub mod dom;
pub mod error;
pub mod extract;
pub mod frames;
pub mod math;
pub mod session;
pub mod snapshot;

pub use cache::SessionCache;
pub use config::ExtractOptions;
pub use error::{Error, Result};
pub use session::{ExtractionSession, Visibility};
