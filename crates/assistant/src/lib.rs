//! Assistant crate - Client-side core of the Replyflow email assistant
//!
//! This crate provides the UI-independent email workflow:
//! - Domain models (EmailRecord, DraftOverlay, User)
//! - Remote mail gateway trait and HTTP/JSON implementation
//! - In-memory draft store with per-email status tracking
//! - Workflow controller orchestrating refresh, reply generation and send
//! - Auth provider seam and session lifecycle management
//!
//! The crate has zero UI dependencies and uses synchronous HTTP (ureq) to
//! stay executor-agnostic; a UI shell drives it from its own worker threads.

pub mod auth;
pub mod config;
pub mod drafts;
pub mod error;
pub mod gateway;
pub mod models;
pub mod workflow;

pub use auth::{AuthEvent, AuthHandler, AuthProvider, AuthSubscription, SessionManager};
pub use config::AssistantConfig;
pub use drafts::{DraftOverlay, DraftStore, GenerationStatus, SendStatus};
pub use error::{AuthError, GatewayError};
pub use gateway::{HttpMailGateway, RemoteMailGateway, ReplyContext};
pub use models::{EmailId, EmailRecord, User};
pub use workflow::{InitOutcome, WorkflowController, WorkflowStatus};
