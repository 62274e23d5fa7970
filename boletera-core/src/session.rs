use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
    Expired,
}

pub type SessionListener = Box<dyn Fn(SessionEvent) + Send + Sync>;

/// Injected session capability. The orchestrator depends on this interface
/// only; how the credential is obtained, stored, or refreshed belongs to the
/// implementing collaborator. Expiry checks are owned by the implementation
/// as well and surface through registered listeners, never through a timer
/// the orchestrator runs itself.
pub trait SessionProvider: Send + Sync {
    fn credential(&self) -> Option<String>;
    fn current_user(&self) -> Option<SessionUser>;
    fn login(&self, credential: String, user: SessionUser, expires_at: Option<DateTime<Utc>>);
    fn logout(&self);
    fn subscribe(&self, listener: SessionListener);
}

/// Fixed-credential double for tests.
pub struct MockSessionProvider {
    state: Mutex<Option<(String, SessionUser)>>,
}

impl MockSessionProvider {
    pub fn logged_in(credential: &str, user: SessionUser) -> Self {
        Self {
            state: Mutex::new(Some((credential.to_string(), user))),
        }
    }

    pub fn logged_out() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }
}

impl SessionProvider for MockSessionProvider {
    fn credential(&self) -> Option<String> {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.as_ref().map(|(c, _)| c.clone()))
    }

    fn current_user(&self) -> Option<SessionUser> {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.as_ref().map(|(_, u)| u.clone()))
    }

    fn login(&self, credential: String, user: SessionUser, _expires_at: Option<DateTime<Utc>>) {
        if let Ok(mut state) = self.state.lock() {
            *state = Some((credential, user));
        }
    }

    fn logout(&self) {
        if let Ok(mut state) = self.state.lock() {
            *state = None;
        }
    }

    fn subscribe(&self, _listener: SessionListener) {}
}
