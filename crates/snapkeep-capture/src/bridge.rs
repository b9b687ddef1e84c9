//! Surface message bridge.
//!
//! Browser-style surfaces run capture UI in one execution context and
//! the pipeline in another. This bridge is the explicit async
//! request/response channel between them: every request resolves
//! exactly once, and a consumer that goes away simply discards the late
//! response.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::debug;

use snapkeep_core::UploadError;

use crate::sources::area::Region;

/// How long a presence probe waits before assuming no capture surface
/// is active on the page.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(300);

/// Messages a surface can send across the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CaptureAction {
    /// Presence check; a live responder answers with success.
    Ping,
    /// Begin interactive area selection in the page context.
    StartAreaSelection,
    /// The user finished selecting an area.
    AreaSelected { region: Region },
    /// Crop a full-viewport screenshot data URL to a region.
    CropImage { image_data: String, region: Region },
    /// Save the current text selection.
    SaveText { selection: String },
    /// Save an image by its source URL.
    SaveImage { src_url: String },
}

/// Single-resolution outcome of a bridge request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BridgeResponse {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// A request in flight: the action plus its one-shot reply slot.
#[derive(Debug)]
pub struct BridgeRequest {
    pub action: CaptureAction,
    reply: oneshot::Sender<BridgeResponse>,
}

impl BridgeRequest {
    /// Resolve the request. If the requester already went away, the
    /// response is silently discarded.
    pub fn respond(self, response: BridgeResponse) {
        if self.reply.send(response).is_err() {
            debug!("Bridge response discarded; requester is gone");
        }
    }
}

/// Requester half of the bridge.
#[derive(Clone)]
pub struct CaptureBridge {
    tx: mpsc::Sender<BridgeRequest>,
}

/// Create a bridge and the responder's request stream.
pub fn channel(capacity: usize) -> (CaptureBridge, mpsc::Receiver<BridgeRequest>) {
    let (tx, rx) = mpsc::channel(capacity);
    (CaptureBridge { tx }, rx)
}

impl CaptureBridge {
    /// Send an action and await its single response. The response is
    /// asynchronous by construction; the responder may answer long
    /// after this call started.
    pub async fn request(&self, action: CaptureAction) -> Result<BridgeResponse, UploadError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(BridgeRequest {
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| {
                UploadError::InvalidCapture("capture surface is not available".to_string())
            })?;

        reply_rx.await.map_err(|_| {
            UploadError::InvalidCapture("capture surface dropped the request".to_string())
        })
    }

    /// Check whether a capture surface is already active, falling back
    /// to "absent" when nothing answers within `wait`.
    pub async fn probe(&self, wait: Duration) -> bool {
        match timeout(wait, self.request(CaptureAction::Ping)).await {
            Ok(Ok(response)) => response.success,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_resolves_with_the_responders_answer() {
        let (bridge, mut requests) = channel(4);

        tokio::spawn(async move {
            while let Some(request) = requests.recv().await {
                match &request.action {
                    CaptureAction::SaveText { selection } => {
                        let data = serde_json::json!({ "length": selection.len() });
                        request.respond(BridgeResponse::ok(data));
                    }
                    _ => request.respond(BridgeResponse::err("unsupported")),
                }
            }
        });

        let response = bridge
            .request(CaptureAction::SaveText {
                selection: "Hello world".into(),
            })
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.data.unwrap()["length"], 11);
    }

    #[tokio::test]
    async fn probe_falls_back_to_absent_on_timeout() {
        // Keep the receiver alive but never answer.
        let (bridge, _requests) = channel(1);
        assert!(!bridge.probe(Duration::from_millis(50)).await);
    }

    #[tokio::test]
    async fn probe_sees_a_live_surface() {
        let (bridge, mut requests) = channel(1);
        tokio::spawn(async move {
            if let Some(request) = requests.recv().await {
                assert_eq!(request.action, CaptureAction::Ping);
                request.respond(BridgeResponse::ok(serde_json::json!({ "pong": true })));
            }
        });

        assert!(bridge.probe(PROBE_TIMEOUT).await);
    }

    #[tokio::test]
    async fn late_response_is_discarded_not_an_error() {
        let (bridge, mut requests) = channel(1);

        let pending = tokio::spawn(async move {
            bridge
                .request(CaptureAction::StartAreaSelection)
                .await
        });
        let request = requests.recv().await.unwrap();

        // Consumer gives up before the responder answers.
        pending.abort();
        let _ = pending.await;

        // Responding after the requester is gone must not panic.
        request.respond(BridgeResponse::ok(serde_json::json!({})));
    }

    #[test]
    fn actions_serialize_with_an_action_tag() {
        let action = CaptureAction::SaveImage {
            src_url: "https://example.com/a.png".into(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action"], "saveImage");
        assert_eq!(json["src_url"], "https://example.com/a.png");
    }
}
