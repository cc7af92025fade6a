//! Draft overlays and their in-memory store
//!
//! An overlay is the client-local draft/status data layered over one
//! immutable server-provided email record. The store is a pure state
//! container with no I/O; the workflow controller decides when anything
//! in here changes.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::models::EmailId;

/// Status of the AI reply generation for one email
///
/// `Failed -> Generating` (retry) and `Ready -> Generating` (regenerate)
/// are both allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationStatus {
    Idle,
    Generating,
    Ready,
    Failed,
}

/// Status of the reply submission for one email
///
/// `Sent` is terminal; the id is pruned from the active set on the next
/// refresh because a sent email is no longer unread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendStatus {
    Idle,
    Sending,
    Sent,
    Failed,
}

/// Client-local draft state for one email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOverlay {
    /// Last suggestion returned by the generation service
    pub generated_reply: Option<String>,
    /// Text the user is actively composing
    pub edited_reply: String,
    /// Whether the user has typed into `edited_reply` themselves. A fresh
    /// generation only seeds the draft while this is false.
    pub user_edited: bool,
    pub generation_status: GenerationStatus,
    pub send_status: SendStatus,
    /// Message of the most recent generate/send failure for this email
    pub last_error: Option<String>,
}

impl Default for DraftOverlay {
    fn default() -> Self {
        Self {
            generated_reply: None,
            edited_reply: String::new(),
            user_edited: false,
            generation_status: GenerationStatus::Idle,
            send_status: SendStatus::Idle,
            last_error: None,
        }
    }
}

/// In-memory mapping from email id to draft overlay
///
/// Uses a HashMap protected by an RwLock for thread-safe access. Accessors
/// return snapshots; nothing hands out references into the map.
pub struct DraftStore {
    overlays: RwLock<HashMap<EmailId, DraftOverlay>>,
}

impl DraftStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            overlays: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot the overlay for an email, if one exists.
    pub fn overlay(&self, id: &EmailId) -> Option<DraftOverlay> {
        let overlays = self.overlays.read().unwrap();
        overlays.get(id).cloned()
    }

    /// Return the existing overlay for an email, creating a fresh idle one
    /// on first interaction. Returns a snapshot.
    pub fn get_or_create(&self, id: &EmailId) -> DraftOverlay {
        let mut overlays = self.overlays.write().unwrap();
        overlays.entry(id.clone()).or_default().clone()
    }

    /// Record a completed generation.
    ///
    /// Seeds `edited_reply` with the suggestion unless the user has already
    /// typed their own text; a regenerate never clobbers a user edit.
    pub fn set_generated(&self, id: &EmailId, text: impl Into<String>) {
        let text = text.into();
        self.with_overlay(id, |overlay| {
            if !overlay.user_edited {
                overlay.edited_reply = text.clone();
            }
            overlay.generated_reply = Some(text);
            overlay.generation_status = GenerationStatus::Ready;
            overlay.last_error = None;
        });
    }

    /// Overwrite the composed text with what the user typed.
    pub fn set_edited_reply(&self, id: &EmailId, text: impl Into<String>) {
        let text = text.into();
        self.with_overlay(id, |overlay| {
            overlay.edited_reply = text;
            overlay.user_edited = true;
        });
    }

    pub fn mark_generating(&self, id: &EmailId) {
        self.with_overlay(id, |overlay| {
            overlay.generation_status = GenerationStatus::Generating;
            overlay.last_error = None;
        });
    }

    pub fn mark_generation_failed(&self, id: &EmailId, message: impl Into<String>) {
        let message = message.into();
        self.with_overlay(id, |overlay| {
            overlay.generation_status = GenerationStatus::Failed;
            overlay.last_error = Some(message);
        });
    }

    pub fn mark_sending(&self, id: &EmailId) {
        self.with_overlay(id, |overlay| {
            overlay.send_status = SendStatus::Sending;
            overlay.last_error = None;
        });
    }

    pub fn mark_sent(&self, id: &EmailId) {
        self.with_overlay(id, |overlay| {
            overlay.send_status = SendStatus::Sent;
            overlay.last_error = None;
        });
    }

    pub fn mark_send_failed(&self, id: &EmailId, message: impl Into<String>) {
        let message = message.into();
        self.with_overlay(id, |overlay| {
            overlay.send_status = SendStatus::Failed;
            overlay.last_error = Some(message);
        });
    }

    /// Drop overlays whose email is no longer in the unread set.
    pub fn prune(&self, valid_ids: &HashSet<EmailId>) {
        let mut overlays = self.overlays.write().unwrap();
        overlays.retain(|id, _| valid_ids.contains(id));
    }

    /// Remove a single overlay (email vanished server-side).
    pub fn remove(&self, id: &EmailId) {
        let mut overlays = self.overlays.write().unwrap();
        overlays.remove(id);
    }

    /// Number of live overlays
    pub fn len(&self) -> usize {
        self.overlays.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_overlay(&self, id: &EmailId, mutate: impl FnOnce(&mut DraftOverlay)) {
        let mut overlays = self.overlays.write().unwrap();
        mutate(overlays.entry(id.clone()).or_default());
    }
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new()
    }
}
