//! Session state shared between the HTTP wrapper, lifecycle operations and any
//! front end. The store is an explicit value: clone it to share, create a new one
//! to isolate. Only identity metadata lives here; tokens stay in the credential
//! store.

use crate::features::auth::types::User;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

/// Point-in-time view of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Session {
    fn starting() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: true,
            error: None,
        }
    }
}

/// Transitions other components may want to react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    SignedOut,
    /// The session was terminated by an unrecoverable 401; the user has to log
    /// in again.
    LoginRequired,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(Session::starting())),
            events,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Marks an operation as in flight and drops any previous error.
    pub fn begin(&self) {
        self.update(|session| {
            session.is_loading = true;
            session.error = None;
        });
    }

    pub fn authenticate(&self, user: User) {
        self.update(|session| {
            session.user = Some(user);
            session.is_authenticated = true;
            session.is_loading = false;
            session.error = None;
        });
        self.emit(SessionEvent::SignedIn);
    }

    /// Resets to logged out without an error.
    pub fn sign_out(&self) {
        let was_authenticated = self.reset();
        if was_authenticated {
            self.emit(SessionEvent::SignedOut);
        }
    }

    /// Ends an operation with an error; identity is left as it was.
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|session| {
            session.is_loading = false;
            session.error = Some(message);
        });
    }

    /// Ends an operation without touching identity or error.
    pub fn finish(&self) {
        self.update(|session| session.is_loading = false);
    }

    pub fn clear_error(&self) {
        self.update(|session| session.error = None);
    }

    /// Forced logout after a session-fatal error.
    pub fn expire(&self) {
        self.reset();
        self.emit(SessionEvent::LoginRequired);
    }

    fn reset(&self) -> bool {
        let mut was_authenticated = false;
        self.update(|session| {
            was_authenticated = session.is_authenticated;
            session.user = None;
            session.is_authenticated = false;
            session.is_loading = false;
            session.error = None;
        });
        was_authenticated
    }

    fn update(&self, apply: impl FnOnce(&mut Session)) {
        let mut session = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut session);
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
