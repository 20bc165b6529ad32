//! Frame identity.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Identity of one frame, as reported over the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameInfo {
    pub is_main_frame: bool,
    pub frame_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

const FRAME_ID_LEN: usize = 9;
const FRAME_ID_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Mint an opaque session-scoped frame identifier.
///
/// Nine lowercase base-36 characters. Uniqueness is best-effort per session;
/// request correlation uses request IDs, not frame IDs, so a collision is
/// harmless.
pub fn mint_frame_id() -> String {
    let mut rng = rand::thread_rng();
    (0..FRAME_ID_LEN)
        .map(|_| FRAME_ID_CHARSET[rng.gen_range(0..FRAME_ID_CHARSET.len())] as char)
        .collect()
}
