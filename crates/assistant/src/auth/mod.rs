//! Auth provider seam
//!
//! The workflow core never binds to a concrete identity backend. A shell
//! wires in an [`AuthProvider`] implementation; the core only consumes the
//! current user, an event stream, and sign-out.

mod session;

pub use session::SessionManager;

use crate::error::AuthError;
use crate::models::User;

/// Auth state change delivered to subscribers
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn(User),
    SignedOut,
}

/// Handler invoked on every auth state change
pub type AuthHandler = Box<dyn Fn(AuthEvent) + Send + Sync>;

/// Subscription guard returned by [`AuthProvider::subscribe`]
///
/// Dropping the guard unsubscribes the handler. Providers must stop
/// invoking the handler once its guard is gone.
pub struct AuthSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl AuthSubscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription that requires no teardown (for providers that hand
    /// out handlers with static lifetime, e.g. test fakes).
    pub fn noop() -> Self {
        Self { cancel: None }
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Identity backend contract required by the workflow core
pub trait AuthProvider: Send + Sync {
    /// The currently authenticated user, if any.
    fn current_user(&self) -> Option<User>;

    /// Register a handler for auth state changes.
    fn subscribe(&self, handler: AuthHandler) -> AuthSubscription;

    /// End the session with the identity backend.
    fn sign_out(&self) -> Result<(), AuthError>;
}
