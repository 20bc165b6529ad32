//! Request/response correlation over the frame boundary.
//!
//! The engine only requires *some* channel with timeout semantics; the
//! [`FrameChannel`] trait is that seam. [`FrameConnection`] is the
//! in-process implementation: it mints sequential request IDs, parks each
//! caller on a oneshot keyed by ID, and discards responses that arrive
//! after their request timed out (the pending entry is removed at timeout,
//! so a late response finds nothing to complete).

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use lector_protocol::{FrameMessage, FrameRequest, FrameResponse};

use crate::error::{Error, Result};

/// Request/response channel to embedded frames.
#[async_trait]
pub trait FrameChannel: Send + Sync {
    /// Invoke `method` on the frame identified by `frame_id` and await the
    /// correlated response payload. `Ok(None)` means success with no data.
    async fn request(
        &self,
        frame_id: &str,
        method: &str,
        index: usize,
        quietly: bool,
    ) -> Result<Option<Value>>;
}

/// Outbound message addressed to one frame, for the transport to deliver.
#[derive(Debug, Clone)]
pub struct OutboundFrame {
    pub frame_id: String,
    pub message: FrameMessage,
}

/// In-process frame channel.
pub struct FrameConnection {
    last_id: AtomicU64,
    pending: Mutex<HashMap<u64, oneshot::Sender<FrameResponse>>>,
    outbound: mpsc::UnboundedSender<OutboundFrame>,
    timeout: Duration,
}

impl FrameConnection {
    /// Create a connection and the receiver the transport drains.
    pub fn new(timeout: Duration) -> (Arc<Self>, mpsc::UnboundedReceiver<OutboundFrame>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let connection = Arc::new(Self {
            last_id: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
            outbound,
            timeout,
        });
        (connection, rx)
    }

    /// Feed one response arriving from the transport. Responses are matched
    /// strictly by request ID; unmatched or late ones are discarded.
    pub fn handle_response(&self, response: FrameResponse) {
        match self.pending.lock().remove(&response.request_id) {
            Some(sender) => {
                let _ = sender.send(response);
            }
            None => debug!(
                target: "lector.frames",
                request_id = response.request_id,
                "discarding unmatched or late response"
            ),
        }
    }
}

#[async_trait]
impl FrameChannel for FrameConnection {
    async fn request(
        &self,
        frame_id: &str,
        method: &str,
        index: usize,
        quietly: bool,
    ) -> Result<Option<Value>> {
        let request_id = self.last_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(request_id, tx);

        let message = FrameMessage::Request(FrameRequest {
            request_id,
            method: method.to_string(),
            index,
            quietly,
        });
        if self.outbound.send(OutboundFrame { frame_id: frame_id.to_string(), message }).is_err() {
            self.pending.lock().remove(&request_id);
            return Err(Error::ChannelClosed);
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(response)) => {
                if response.success {
                    Ok(response.data)
                } else {
                    Err(Error::Remote(
                        response.error.unwrap_or_else(|| "unknown frame error".to_string()),
                    ))
                }
            }
            Ok(Err(_)) => {
                self.pending.lock().remove(&request_id);
                Err(Error::ChannelClosed)
            }
            Err(_) => {
                // Unregister so the dispatcher discards the late response.
                self.pending.lock().remove(&request_id);
                Err(Error::Timeout(self.timeout.as_millis() as u64))
            }
        }
    }
}
