use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::info;

use boletera_core::session::{SessionEvent, SessionListener, SessionProvider, SessionUser};

struct SessionState {
    credential: String,
    user: SessionUser,
    expires_at: Option<DateTime<Utc>>,
}

/// In-memory `SessionProvider`. Owns the expiry check: callers spawn the
/// watcher task and subscribe for `Expired` events instead of polling the
/// credential themselves.
#[derive(Default)]
pub struct MemorySession {
    state: Mutex<Option<SessionState>>,
    listeners: Mutex<Vec<SessionListener>>,
}

impl MemorySession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn emit(&self, event: SessionEvent) {
        if let Ok(listeners) = self.listeners.lock() {
            for listener in listeners.iter() {
                listener(event);
            }
        }
    }

    /// Clears the session and emits `Expired` when the credential's deadline
    /// has passed. Returns whether an expiry happened.
    pub fn expire_if_due(&self, now: DateTime<Utc>) -> bool {
        let expired = {
            let Ok(mut state) = self.state.lock() else {
                return false;
            };
            match state.as_ref().and_then(|s| s.expires_at) {
                Some(deadline) if deadline <= now => {
                    *state = None;
                    true
                }
                _ => false,
            }
        };

        if expired {
            info!("Session credential expired");
            self.emit(SessionEvent::Expired);
        }
        expired
    }

    /// Periodic expiry check, owned by this collaborator. The orchestrator
    /// only ever observes the resulting events.
    pub fn spawn_expiry_watcher(self: &Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                session.expire_if_due(Utc::now());
            }
        })
    }
}

impl SessionProvider for MemorySession {
    fn credential(&self) -> Option<String> {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.credential.clone()))
    }

    fn current_user(&self) -> Option<SessionUser> {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.user.clone()))
    }

    fn login(&self, credential: String, user: SessionUser, expires_at: Option<DateTime<Utc>>) {
        if let Ok(mut state) = self.state.lock() {
            *state = Some(SessionState {
                credential,
                user,
                expires_at,
            });
        }
        self.emit(SessionEvent::LoggedIn);
    }

    fn logout(&self) {
        if let Ok(mut state) = self.state.lock() {
            *state = None;
        }
        self.emit(SessionEvent::LoggedOut);
    }

    fn subscribe(&self, listener: SessionListener) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(listener);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn operator() -> SessionUser {
        SessionUser {
            id: "op-1".to_string(),
            name: "Operadora".to_string(),
            email: "op@x.cl".to_string(),
            role: "admin".to_string(),
        }
    }

    #[test]
    fn test_login_logout_events() {
        let session = MemorySession::new();
        let events: Arc<Mutex<Vec<SessionEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        session.subscribe(Box::new(move |event| sink.lock().unwrap().push(event)));

        session.login("token-1".to_string(), operator(), None);
        assert_eq!(session.credential().as_deref(), Some("token-1"));
        assert_eq!(session.current_user().unwrap().id, "op-1");

        session.logout();
        assert!(session.credential().is_none());

        assert_eq!(
            *events.lock().unwrap(),
            vec![SessionEvent::LoggedIn, SessionEvent::LoggedOut]
        );
    }

    #[test]
    fn test_expiry_clears_session_and_notifies() {
        let session = MemorySession::new();
        let events: Arc<Mutex<Vec<SessionEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        session.subscribe(Box::new(move |event| sink.lock().unwrap().push(event)));

        let now = Utc::now();
        session.login(
            "token-1".to_string(),
            operator(),
            Some(now + ChronoDuration::minutes(5)),
        );

        // Not due yet.
        assert!(!session.expire_if_due(now));
        assert!(session.credential().is_some());

        assert!(session.expire_if_due(now + ChronoDuration::minutes(6)));
        assert!(session.credential().is_none());
        // A second check is a no-op.
        assert!(!session.expire_if_due(now + ChronoDuration::minutes(7)));

        assert_eq!(
            *events.lock().unwrap(),
            vec![SessionEvent::LoggedIn, SessionEvent::Expired]
        );
    }

    #[test]
    fn test_session_without_deadline_never_expires() {
        let session = MemorySession::new();
        session.login("token-1".to_string(), operator(), None);
        assert!(!session.expire_if_due(Utc::now() + ChronoDuration::days(365)));
        assert!(session.credential().is_some());
    }
}
