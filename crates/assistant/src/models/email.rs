//! Email record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for an email (stable within a session)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailId(pub String);

impl EmailId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EmailId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EmailId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for EmailId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable snapshot of an unread email as reported by the remote store
///
/// Records are replaced wholesale on every refresh; nothing in this struct
/// is patched locally. All local workflow state lives in the draft overlay
/// keyed by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: EmailId,
    /// Sender, as formatted by the server (e.g. "John Doe <john@example.com>")
    pub from: String,
    /// Recipient address
    pub to: String,
    pub subject: String,
    /// Short plain-text preview of the body
    pub snippet: String,
    /// Full body, HTML or plain text; may be empty
    pub body: String,
    /// When the email was received. `None` means the server reported no
    /// date; it must render as unknown, never as the epoch.
    pub date: Option<DateTime<Utc>>,
}

impl EmailRecord {
    /// Convert an epoch-millisecond wire timestamp into a date.
    ///
    /// Out-of-range values are treated the same as an absent date.
    pub fn date_from_millis(millis: Option<i64>) -> Option<DateTime<Utc>> {
        millis.and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms))
    }
}
