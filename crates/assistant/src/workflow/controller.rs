//! Workflow controller for the email reply loop
//!
//! One controller owns the workflow state of one authenticated session:
//! the current unread set, the selection, and the draft overlays. Gateway
//! calls are blocking; callers drive operations from their own threads and
//! the controller serializes what must not overlap (generate/send per
//! email id, refresh application order). No lock is held across a gateway
//! call. Where both locks are needed, the session state lock is always
//! taken before the draft store's; draft mutations keyed by an email id
//! happen under the state lock so a concurrent refresh cannot prune the
//! id in between.

use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

use crate::drafts::{DraftOverlay, DraftStore, SendStatus};
use crate::error::GatewayError;
use crate::gateway::{RemoteMailGateway, ReplyContext};
use crate::models::{EmailId, EmailRecord, User};

/// Global workflow status observed by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStatus {
    Idle,
    Loading,
    Error,
}

/// Result of [`WorkflowController::initialize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Mail account linked; the unread set has been fetched.
    Ready,
    /// The caller must route the user through the mail-provider
    /// authorization flow before the workflow can start.
    AuthorizationRequired,
    /// The authorization probe itself failed; see `last_error`.
    Failed,
}

/// Session-wide mutable state behind one lock
struct SessionState {
    /// Unread set in server order (most recent first)
    emails: Vec<EmailRecord>,
    /// Always resolves into `emails`, or is `None`
    selected_id: Option<EmailId>,
    global_status: WorkflowStatus,
    last_error: Option<String>,
    /// Sequence number of the most recently issued refresh; a completing
    /// refresh with an older sequence is stale and gets discarded.
    refresh_seq: u64,
}

/// Stateful controller for the unread/generate/send workflow
pub struct WorkflowController {
    gateway: Arc<dyn RemoteMailGateway>,
    user: User,
    drafts: DraftStore,
    state: RwLock<SessionState>,
    /// Ids with a generate or send currently in flight
    busy: Mutex<HashSet<EmailId>>,
}

impl WorkflowController {
    /// Create a controller for an authenticated session.
    pub fn new(gateway: Arc<dyn RemoteMailGateway>, user: User) -> Self {
        Self {
            gateway,
            user,
            drafts: DraftStore::new(),
            state: RwLock::new(SessionState {
                emails: Vec::new(),
                selected_id: None,
                global_status: WorkflowStatus::Idle,
                last_error: None,
                refresh_seq: 0,
            }),
            busy: Mutex::new(HashSet::new()),
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Probe mail authorization and, if linked, fetch the unread set.
    pub fn initialize(&self) -> InitOutcome {
        info!("Initializing workflow for {}", self.user.display_name);

        match self.gateway.check_authorized() {
            Ok(true) => {
                self.refresh();
                InitOutcome::Ready
            }
            Ok(false) => {
                info!("Mail account not linked; authorization required");
                InitOutcome::AuthorizationRequired
            }
            Err(err) => {
                warn!("Authorization check failed: {}", err);
                let mut state = self.state.write().unwrap();
                state.global_status = WorkflowStatus::Error;
                state.last_error = Some(err.to_string());
                InitOutcome::Failed
            }
        }
    }

    /// Re-fetch the unread set and reconcile local state with it.
    ///
    /// On failure the previous emails stay visible (stale-but-available
    /// beats empty) and the global status reports the error. If a newer
    /// refresh was issued while this one was in flight, its response is
    /// discarded untouched.
    pub fn refresh(&self) {
        let seq = {
            let mut state = self.state.write().unwrap();
            state.refresh_seq += 1;
            state.global_status = WorkflowStatus::Loading;
            state.refresh_seq
        };

        let result = self.gateway.list_unread();

        let mut state = self.state.write().unwrap();
        if state.refresh_seq != seq {
            debug!("Discarding stale refresh response (seq {})", seq);
            return;
        }

        match result {
            Ok(emails) => {
                info!("Refreshed unread set: {} emails", emails.len());

                let selection_gone = state
                    .selected_id
                    .as_ref()
                    .is_some_and(|sel| !emails.iter().any(|e| &e.id == sel));
                if selection_gone {
                    state.selected_id = None;
                }

                let valid: HashSet<EmailId> = emails.iter().map(|e| e.id.clone()).collect();
                state.emails = emails;
                state.global_status = WorkflowStatus::Idle;
                state.last_error = None;
                // Prune while still holding the state lock so no overlay
                // outlives its email.
                self.drafts.prune(&valid);
            }
            Err(err) => {
                warn!("Refresh failed: {}", err);
                state.global_status = WorkflowStatus::Error;
                state.last_error = Some(err.to_string());
            }
        }
    }

    /// Select an email from the unread set. Silently ignores unknown ids.
    pub fn select_email(&self, id: &EmailId) {
        let mut state = self.state.write().unwrap();
        if !state.emails.iter().any(|e| &e.id == id) {
            debug!("Ignoring selection of unknown email {}", id);
            return;
        }
        state.selected_id = Some(id.clone());
        self.drafts.get_or_create(id);
    }

    /// Request an AI reply suggestion for an email in the unread set.
    ///
    /// A failure is scoped to this email's overlay and never blocks the
    /// rest of the inbox. Re-entrant calls for the same id while one is in
    /// flight are rejected as no-ops.
    pub fn generate_reply(&self, id: &EmailId) {
        if !self.begin_busy(id) {
            debug!("Generate for {} already in flight; ignoring", id);
            return;
        }
        if !self.apply_if_present(id, |drafts| drafts.mark_generating(id)) {
            debug!("Ignoring generate for unknown email {}", id);
            self.end_busy(id);
            return;
        }
        info!("Generating reply for email {}", id);

        let ctx = ReplyContext::from(&self.user);
        let result = self.gateway.generate_reply(id, &ctx);

        match result {
            Ok(reply) => {
                if !self.apply_if_present(id, |drafts| drafts.set_generated(id, reply)) {
                    // Pruned while the request was in flight
                    self.drafts.remove(id);
                }
            }
            Err(GatewayError::NotFound { .. }) => {
                info!("Email {} vanished server-side; dropping locally", id);
                self.drop_email(id);
            }
            Err(err) => {
                warn!("Reply generation for {} failed: {}", id, err);
                if !self.apply_if_present(id, |drafts| {
                    drafts.mark_generation_failed(id, err.to_string())
                }) {
                    self.drafts.remove(id);
                }
            }
        }

        self.end_busy(id);
    }

    /// Overwrite the composed reply text for an email. No network effect.
    pub fn update_draft_text(&self, id: &EmailId, text: impl Into<String>) {
        self.apply_if_present(id, |drafts| drafts.set_edited_reply(id, text));
    }

    /// Submit the composed reply for an email.
    ///
    /// A blank draft is a local precondition failure: no network call is
    /// made and no status changes. On success the overlay is marked sent
    /// and a refresh converges local state with the server; on failure the
    /// draft text stays intact for a retry.
    pub fn send_reply(&self, id: &EmailId) {
        let Some(overlay) = self.drafts.overlay(id) else {
            debug!("Ignoring send for email {} with no draft", id);
            return;
        };
        if overlay.send_status == SendStatus::Sent {
            debug!("Reply for email {} already sent; ignoring", id);
            return;
        }
        if overlay.edited_reply.trim().is_empty() {
            debug!("Ignoring send for email {} with empty draft", id);
            return;
        }

        if !self.begin_busy(id) {
            debug!("Send for {} already in flight; ignoring", id);
            return;
        }
        if !self.apply_if_present(id, |drafts| drafts.mark_sending(id)) {
            debug!("Ignoring send for unknown email {}", id);
            self.end_busy(id);
            return;
        }
        info!("Sending reply for email {}", id);

        let result = self.gateway.send_reply(id, &overlay.edited_reply);

        match result {
            Ok(()) => {
                if !self.apply_if_present(id, |drafts| drafts.mark_sent(id)) {
                    self.drafts.remove(id);
                }
                self.end_busy(id);
                // Converge with the server; its unread set may lag behind
                // the send, so the overlay survives until the id drops out.
                self.refresh();
                return;
            }
            Err(GatewayError::NotFound { .. }) => {
                info!("Email {} vanished server-side; dropping locally", id);
                self.drop_email(id);
            }
            Err(err) => {
                warn!("Send for {} failed: {}", id, err);
                if !self.apply_if_present(id, |drafts| {
                    drafts.mark_send_failed(id, err.to_string())
                }) {
                    self.drafts.remove(id);
                }
            }
        }

        self.end_busy(id);
    }

    // ========================================================================
    // Observable state
    // ========================================================================

    /// Current unread set, server order preserved.
    pub fn emails(&self) -> Vec<EmailRecord> {
        self.state.read().unwrap().emails.clone()
    }

    pub fn selected_id(&self) -> Option<EmailId> {
        self.state.read().unwrap().selected_id.clone()
    }

    /// The selected email record, if any.
    pub fn selected(&self) -> Option<EmailRecord> {
        let state = self.state.read().unwrap();
        let id = state.selected_id.as_ref()?;
        state.emails.iter().find(|e| &e.id == id).cloned()
    }

    pub fn status(&self) -> WorkflowStatus {
        self.state.read().unwrap().global_status
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.read().unwrap().last_error.clone()
    }

    /// Snapshot of the draft overlay for an email, if one exists.
    pub fn overlay(&self, id: &EmailId) -> Option<DraftOverlay> {
        self.drafts.overlay(id)
    }

    /// Whether the reply for an email has been submitted successfully.
    pub fn is_sent(&self, id: &EmailId) -> bool {
        self.drafts
            .overlay(id)
            .is_some_and(|o| o.send_status == SendStatus::Sent)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Run a draft mutation only while the email is still in the unread
    /// set. The state lock is held across the mutation, so a refresh on
    /// another thread cannot prune the id between the check and the
    /// write. Returns false, without mutating, when the id is gone.
    fn apply_if_present(&self, id: &EmailId, apply: impl FnOnce(&DraftStore)) -> bool {
        let state = self.state.read().unwrap();
        if !state.emails.iter().any(|e| &e.id == id) {
            return false;
        }
        apply(&self.drafts);
        true
    }

    /// Try to claim the per-id in-flight guard. Returns false if a
    /// generate or send for this id is already running.
    fn begin_busy(&self, id: &EmailId) -> bool {
        self.busy.lock().unwrap().insert(id.clone())
    }

    fn end_busy(&self, id: &EmailId) {
        self.busy.lock().unwrap().remove(id);
    }

    /// Remove an email that no longer exists server-side from all local
    /// state: unread set, selection and overlay.
    fn drop_email(&self, id: &EmailId) {
        let mut state = self.state.write().unwrap();
        state.emails.retain(|e| &e.id != id);
        if state.selected_id.as_ref() == Some(id) {
            state.selected_id = None;
        }
        self.drafts.remove(id);
    }
}
