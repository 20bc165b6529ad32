//! Channel message envelope and payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Method name for requesting a frame's passage list.
pub const METHOD_GET_FRAME_TEXTS: &str = "getFrameTexts";

/// Method name for requesting a frame's identity.
pub const METHOD_GET_FRAME_INFO: &str = "getFrameInfo";

/// Discriminated envelope for messages crossing the frame boundary.
///
/// On the wire:
/// ```json
/// {"type": "request", "requestId": 7, "method": "getFrameTexts", "index": 0, "quietly": false}
/// {"type": "response", "requestId": 7, "success": true, "data": ["Hello world."]}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FrameMessage {
    Request(FrameRequest),
    Response(FrameResponse),
}

/// Request sent to an embedded frame.
///
/// `method` is carried as a string rather than an enum so that a responder
/// can report an unknown method by name instead of failing to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRequest {
    /// Correlation ID, unique per session. Responses echo it back.
    pub request_id: u64,
    /// Method name, e.g. [`METHOD_GET_FRAME_TEXTS`].
    pub method: String,
    /// Narration index being requested.
    pub index: usize,
    /// Suppress per-extraction info logging in the responder.
    #[serde(default)]
    pub quietly: bool,
}

/// Response from an embedded frame, matched to its request by `request_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResponse {
    pub request_id: u64,
    pub success: bool,
    /// Payload on success (absent means empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error message on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FrameResponse {
    /// Build a success response carrying `data`.
    pub fn success(request_id: u64, data: Value) -> Self {
        Self { request_id, success: true, data: Some(data), error: None }
    }

    /// Build a failure response carrying an error message.
    pub fn failure(request_id: u64, error: impl Into<String>) -> Self {
        Self { request_id, success: false, data: None, error: Some(error.into()) }
    }
}
