//! Authenticated user model

use serde::{Deserialize, Serialize};

/// The authenticated user, as reported by the auth provider
///
/// The workflow core only needs the fields that feed reply generation;
/// anything else the identity backend knows stays behind the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Name used to sign generated replies
    pub display_name: String,
    /// Free-form profession/context string guiding the reply tone
    pub profession: String,
}

impl User {
    pub fn new(display_name: impl Into<String>, profession: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            profession: profession.into(),
        }
    }
}
