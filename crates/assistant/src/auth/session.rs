//! Session lifecycle management
//!
//! Ties the auth provider to the workflow controller: a controller exists
//! exactly while a session is authenticated, and all of its overlay state
//! is discarded on sign-out. At most one auth subscription is active per
//! manager, and teardown always unsubscribes.

use log::info;
use std::sync::{Arc, Mutex, RwLock, Weak};

use super::{AuthEvent, AuthProvider, AuthSubscription};
use crate::error::AuthError;
use crate::gateway::RemoteMailGateway;
use crate::models::User;
use crate::workflow::WorkflowController;

/// Owns the auth subscription and the per-session workflow controller
pub struct SessionManager {
    auth: Arc<dyn AuthProvider>,
    gateway: Arc<dyn RemoteMailGateway>,
    controller: RwLock<Option<Arc<WorkflowController>>>,
    subscription: Mutex<Option<AuthSubscription>>,
}

impl SessionManager {
    pub fn new(auth: Arc<dyn AuthProvider>, gateway: Arc<dyn RemoteMailGateway>) -> Arc<Self> {
        Arc::new(Self {
            auth,
            gateway,
            controller: RwLock::new(None),
            subscription: Mutex::new(None),
        })
    }

    /// Subscribe to auth changes and start a session if one is already
    /// authenticated. Replaces any previous subscription.
    pub fn init(self: &Arc<Self>) {
        let weak: Weak<Self> = Arc::downgrade(self);
        let subscription = self.auth.subscribe(Box::new(move |event| {
            if let Some(manager) = weak.upgrade() {
                manager.handle_event(event);
            }
        }));
        *self.subscription.lock().unwrap() = Some(subscription);

        if let Some(user) = self.auth.current_user() {
            self.start_session(user);
        }
    }

    /// The controller of the live session, if one exists.
    pub fn controller(&self) -> Option<Arc<WorkflowController>> {
        self.controller.read().unwrap().clone()
    }

    /// Sign out of the identity backend and end the session.
    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.auth.sign_out()?;
        self.end_session();
        Ok(())
    }

    /// Unsubscribe and drop the session. Safe to call more than once.
    pub fn dispose(&self) {
        self.subscription.lock().unwrap().take();
        self.end_session();
    }

    fn handle_event(&self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn(user) => self.start_session(user),
            AuthEvent::SignedOut => self.end_session(),
        }
    }

    fn start_session(&self, user: User) {
        info!("Starting workflow session for {}", user.display_name);
        let controller = Arc::new(WorkflowController::new(self.gateway.clone(), user));
        *self.controller.write().unwrap() = Some(controller);
    }

    fn end_session(&self) {
        let mut controller = self.controller.write().unwrap();
        if controller.take().is_some() {
            info!("Workflow session ended; draft state discarded");
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.dispose();
    }
}
