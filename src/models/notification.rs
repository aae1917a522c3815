//! Notification audit log model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    /// The message was accepted by the sender.
    Sent,
    /// The sender reported a failure.
    Failed,
}

/// One append-only audit row per delivery attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationLog {
    /// Unique identifier.
    pub id: Uuid,
    /// The employee the message was addressed to.
    pub employee_id: Uuid,
    /// Recipient email address.
    pub recipient_email: String,
    /// Message subject.
    pub subject: String,
    /// Message body.
    pub message: String,
    /// Delivery outcome.
    pub status: NotificationStatus,
    /// When the attempt was made.
    pub sent_at: DateTime<Utc>,
    /// Error detail for failed attempts.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_message: Option<String>,
}
