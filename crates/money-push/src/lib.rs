//! # Money Push
//!
//! Background push-message handling for the Money App client.
//!
//! The push worker runs in its own context, independent of the offline
//! worker: payloads arrive on a channel, and each well-formed one is
//! rendered as a platform notification through a [`NotificationSink`].
//! There is no retry and no deduplication; a malformed payload produces no
//! notification and is only visible in the logs.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Icon attached to every displayed notification.
pub const NOTIFICATION_ICON: &str = "/icons/icon-192x192.png";

/// Errors that can occur while handling push messages.
#[derive(Error, Debug)]
pub enum PushError {
    /// Payload arrived without the expected notification field.
    #[error("Malformed push payload: {0}")]
    MalformedPayload(String),

    #[error("Payload decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Notification display failed: {0}")]
    DisplayFailed(String),
}

/// The notification part of a push payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationBody {
    pub title: String,
    pub body: String,
}

/// A background push payload, as consumed from the messaging service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushPayload {
    /// Expected shape; absence makes the payload malformed.
    #[serde(default)]
    pub notification: Option<NotificationBody>,
}

impl PushPayload {
    /// Decode a payload from its wire form.
    pub fn from_json(json: &str) -> Result<Self, PushError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A notification ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Fixed icon path.
    pub icon: &'static str,
}

/// Platform notification surface.
///
/// The application supplies a real implementation; [`LogSink`] stands in
/// for hosts without one.
pub trait NotificationSink: Send + Sync {
    /// Display a notification.
    fn show(&self, notification: Notification) -> Result<(), PushError>;
}

/// Sink that logs notifications instead of displaying them.
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn show(&self, notification: Notification) -> Result<(), PushError> {
        info!(
            title = %notification.title,
            body = %notification.body,
            icon = notification.icon,
            "Notification"
        );
        Ok(())
    }
}

/// The push worker context.
pub struct PushWorker {
    sink: Arc<dyn NotificationSink>,
}

impl PushWorker {
    /// Create a worker displaying through the given sink.
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Handle one background message: extract title and body, display.
    pub fn on_background_message(&self, payload: &PushPayload) -> Result<(), PushError> {
        let body = payload.notification.as_ref().ok_or_else(|| {
            PushError::MalformedPayload("missing notification field".to_string())
        })?;

        debug!(title = %body.title, "Background message received");
        self.sink.show(Notification {
            title: body.title.clone(),
            body: body.body.clone(),
            icon: NOTIFICATION_ICON,
        })
    }

    /// Drain payloads from the channel until it closes.
    ///
    /// Failures are logged and the loop carries on; from the user's
    /// perspective a bad payload simply shows nothing.
    pub async fn run(&self, mut rx: mpsc::Receiver<PushPayload>) {
        while let Some(payload) = rx.recv().await {
            if let Err(err) = self.on_background_message(&payload) {
                warn!(error = %err, "Push message dropped");
            }
        }
        debug!("Push channel closed, worker exiting");
    }
}

/// Message addressing, as produced by the backend sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A single device registration token.
    Token(String),
    /// A topic; "all" is the broadcast topic.
    Topic(String),
}

/// An outgoing message, the producing side of the payload contract.
#[derive(Debug, Clone)]
pub struct Message {
    pub target: Target,
    pub notification: NotificationBody,
}

impl Message {
    /// Address a single device.
    pub fn to_token(token: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            target: Target::Token(token.into()),
            notification: NotificationBody {
                title: title.into(),
                body: body.into(),
            },
        }
    }

    /// Broadcast to every subscriber of the "all" topic.
    pub fn broadcast(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            target: Target::Topic("all".to_string()),
            notification: NotificationBody {
                title: title.into(),
                body: body.into(),
            },
        }
    }

    /// The payload a receiving worker will see.
    pub fn payload(&self) -> PushPayload {
        PushPayload {
            notification: Some(self.notification.clone()),
        }
    }
}
