//! HTTP/JSON mail gateway
//!
//! Talks to the assistant backend over its `{success, ...}` envelope
//! protocol. Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use log::debug;
use std::time::Duration;
use url::Url;

use super::api::{
    CheckAuthResponse, GenerateReplyRequest, GenerateReplyResponse, SendReplyRequest,
    SendReplyResponse, UnreadResponse,
};
use super::{RemoteMailGateway, ReplyContext};
use crate::config::AssistantConfig;
use crate::error::GatewayError;
use crate::models::{EmailId, EmailRecord};

/// HTTP implementation of [`RemoteMailGateway`]
pub struct HttpMailGateway {
    agent: ureq::Agent,
    base: Url,
}

impl HttpMailGateway {
    /// Create a gateway for the given base URL (e.g.
    /// `http://127.0.0.1:5000/api/email`), with a transport-level timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // A trailing slash makes Url::join treat the last path segment as a
        // directory instead of replacing it.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalized)
            .with_context(|| format!("Invalid gateway base URL: {}", base_url))?;

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Ok(Self { agent, base })
    }

    /// Create a gateway from loaded configuration.
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        // base is guaranteed to be a valid joinable URL by the constructor
        self.base
            .join(path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("{}{}", self.base, path))
    }
}

impl RemoteMailGateway for HttpMailGateway {
    fn check_authorized(&self) -> Result<bool, GatewayError> {
        let url = self.endpoint("check-auth");
        debug!("GET {}", url);

        let mut response = self.agent.get(&url).call().map_err(map_transport)?;
        let body: CheckAuthResponse = response
            .body_mut()
            .read_json()
            .map_err(invalid_response)?;

        if !body.success {
            return Err(GatewayError::server(envelope_error(body.error)));
        }
        Ok(body.authenticated)
    }

    fn list_unread(&self) -> Result<Vec<EmailRecord>, GatewayError> {
        let url = self.endpoint("unread");
        debug!("GET {}", url);

        let mut response = self.agent.get(&url).call().map_err(map_transport)?;
        let body: UnreadResponse = response
            .body_mut()
            .read_json()
            .map_err(invalid_response)?;

        if !body.success {
            return Err(GatewayError::server(envelope_error(body.error)));
        }

        // A missing list means an empty inbox, not a failure.
        let messages = body.messages.unwrap_or_default();
        Ok(messages.into_iter().map(EmailRecord::from).collect())
    }

    fn generate_reply(&self, id: &EmailId, ctx: &ReplyContext) -> Result<String, GatewayError> {
        let url = self.endpoint("generate-reply");
        debug!("POST {} (email {})", url, id);

        let request = GenerateReplyRequest {
            email_id: id.as_str(),
            user_context: &ctx.profession,
            user_name: &ctx.display_name,
        };

        let mut response = self
            .agent
            .post(&url)
            .send_json(&request)
            .map_err(|e| map_id_transport(e, id))?;
        let body: GenerateReplyResponse = response
            .body_mut()
            .read_json()
            .map_err(invalid_response)?;

        if !body.success {
            return Err(GatewayError::server(envelope_error(body.error)));
        }
        body.reply
            .ok_or_else(|| GatewayError::server("Reply missing from response"))
    }

    fn send_reply(&self, id: &EmailId, text: &str) -> Result<(), GatewayError> {
        let url = self.endpoint("send-reply");
        debug!("POST {} (email {})", url, id);

        let request = SendReplyRequest {
            email_id: id.as_str(),
            reply_text: text,
        };

        let mut response = self
            .agent
            .post(&url)
            .send_json(&request)
            .map_err(|e| map_id_transport(e, id))?;
        let body: SendReplyResponse = response
            .body_mut()
            .read_json()
            .map_err(invalid_response)?;

        if !body.success {
            return Err(GatewayError::server(envelope_error(body.error)));
        }
        Ok(())
    }
}

/// Map a ureq error from an operation that does not reference one email.
fn map_transport(err: ureq::Error) -> GatewayError {
    match err {
        ureq::Error::StatusCode(code) => {
            GatewayError::server(format!("Server returned HTTP {}", code))
        }
        other => GatewayError::network(other.to_string()),
    }
}

/// Map a ureq error from a per-email operation, where 404 means the email
/// vanished server-side and 400 means the request was rejected outright.
fn map_id_transport(err: ureq::Error, id: &EmailId) -> GatewayError {
    match err {
        ureq::Error::StatusCode(404) => GatewayError::NotFound {
            id: id.as_str().to_string(),
        },
        ureq::Error::StatusCode(400) => GatewayError::Validation {
            message: format!("Server rejected request for email {}", id),
        },
        other => map_transport(other),
    }
}

fn invalid_response(err: ureq::Error) -> GatewayError {
    GatewayError::server(format!("Invalid response body: {}", err))
}

fn envelope_error(error: Option<String>) -> String {
    error.unwrap_or_else(|| "Unknown server error".to_string())
}
