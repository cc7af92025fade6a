//! Remote mail gateway
//!
//! This module provides:
//! - The `RemoteMailGateway` trait the workflow controller depends on
//! - Wire types for the assistant backend's HTTP/JSON contract
//! - An HTTP implementation over ureq

mod http;

pub use http::HttpMailGateway;

use crate::error::GatewayError;
use crate::models::{EmailId, EmailRecord, User};

/// User context attached to a reply-generation request
#[derive(Debug, Clone)]
pub struct ReplyContext {
    pub profession: String,
    pub display_name: String,
}

impl From<&User> for ReplyContext {
    fn from(user: &User) -> Self {
        Self {
            profession: user.profession.clone(),
            display_name: user.display_name.clone(),
        }
    }
}

/// Transport wrapper over the four remote mail operations
///
/// Implementations hold no workflow state. Every method is a fallible
/// network call with no local retry; callers decide what to re-invoke.
pub trait RemoteMailGateway: Send + Sync {
    /// Check whether the user's mail account is linked.
    ///
    /// `Ok(false)` is a redirect signal for the caller, not an error.
    fn check_authorized(&self) -> Result<bool, GatewayError>;

    /// Fetch the server's unread set, most recent first.
    ///
    /// An empty inbox is `Ok(vec![])`, never an error.
    fn list_unread(&self) -> Result<Vec<EmailRecord>, GatewayError>;

    /// Request an AI-authored reply suggestion for one email.
    ///
    /// Idempotent from the caller's perspective: a second call simply
    /// produces a fresh suggestion.
    fn generate_reply(&self, id: &EmailId, ctx: &ReplyContext) -> Result<String, GatewayError>;

    /// Submit a reply. On success the server will eventually drop the email
    /// from its unread set, but the very next `list_unread` may still
    /// contain it; callers provisionally assume success.
    fn send_reply(&self, id: &EmailId, text: &str) -> Result<(), GatewayError>;
}

/// Assistant backend wire types
pub mod api {
    use serde::{Deserialize, Serialize};

    use crate::models::{EmailId, EmailRecord};

    /// Response from `GET /check-auth`
    #[derive(Debug, Deserialize)]
    pub struct CheckAuthResponse {
        pub success: bool,
        #[serde(default)]
        pub authenticated: bool,
        pub error: Option<String>,
    }

    /// Response from `GET /unread`
    #[derive(Debug, Deserialize)]
    pub struct UnreadResponse {
        pub success: bool,
        pub messages: Option<Vec<UnreadMessage>>,
        pub error: Option<String>,
    }

    /// One unread email on the wire
    #[derive(Debug, Deserialize)]
    pub struct UnreadMessage {
        pub id: String,
        #[serde(default)]
        pub from: String,
        #[serde(default)]
        pub to: String,
        #[serde(default)]
        pub subject: String,
        #[serde(default)]
        pub snippet: String,
        #[serde(default)]
        pub body: String,
        /// Epoch milliseconds; absent when the server found no Date header
        pub date: Option<i64>,
    }

    impl From<UnreadMessage> for EmailRecord {
        fn from(msg: UnreadMessage) -> Self {
            let date = EmailRecord::date_from_millis(msg.date);
            EmailRecord {
                id: EmailId::new(msg.id),
                from: msg.from,
                to: msg.to,
                subject: msg.subject,
                snippet: msg.snippet,
                body: msg.body,
                date,
            }
        }
    }

    /// Body of `POST /generate-reply`
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GenerateReplyRequest<'a> {
        pub email_id: &'a str,
        pub user_context: &'a str,
        pub user_name: &'a str,
    }

    /// Response from `POST /generate-reply`
    #[derive(Debug, Deserialize)]
    pub struct GenerateReplyResponse {
        pub success: bool,
        pub reply: Option<String>,
        pub error: Option<String>,
    }

    /// Body of `POST /send-reply`
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SendReplyRequest<'a> {
        pub email_id: &'a str,
        pub reply_text: &'a str,
    }

    /// Response from `POST /send-reply`
    #[derive(Debug, Deserialize)]
    pub struct SendReplyResponse {
        pub success: bool,
        pub error: Option<String>,
    }

}
