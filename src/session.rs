//! Auth session service.
//!
//! Holds the bearer token and the signed-in user's profile, persists the
//! token across runs, and broadcasts sign-in/sign-out transitions so the
//! composition root can react (the original app forced a redirect to the
//! login screen here).

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tokio::sync::watch;

use crate::models::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    SignedOut { expired: bool },
}

struct SessionInner {
    token: RwLock<Option<String>>,
    user: RwLock<Option<User>>,
    token_file: Option<PathBuf>,
    events: watch::Sender<SessionEvent>,
}

#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<SessionInner>,
}

impl AuthSession {
    /// Session backed by a token file; a token left over from a previous run
    /// is picked up so the user stays signed in across invocations.
    pub fn new(token_file: PathBuf) -> Self {
        let token = std::fs::read_to_string(&token_file)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self::build(token, Some(token_file))
    }

    /// Session with no persistence. Used in tests and one-shot tooling.
    pub fn in_memory() -> Self {
        Self::build(None, None)
    }

    fn build(token: Option<String>, token_file: Option<PathBuf>) -> Self {
        let initial = if token.is_some() {
            SessionEvent::SignedIn
        } else {
            SessionEvent::SignedOut { expired: false }
        };
        let (events, _) = watch::channel(initial);
        Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(token),
                user: RwLock::new(None),
                token_file,
                events,
            }),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.inner.token.read().expect("token lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.user.read().expect("user lock poisoned").clone()
    }

    pub fn set_user(&self, user: User) {
        *self.inner.user.write().expect("user lock poisoned") = Some(user);
    }

    /// Record a successful login: keep the token for subsequent requests,
    /// persist it, and announce the transition.
    pub fn store_login(&self, token: String, user: User) {
        self.persist_token(Some(&token));
        *self.inner.token.write().expect("token lock poisoned") = Some(token);
        *self.inner.user.write().expect("user lock poisoned") = Some(user);
        let _ = self.inner.events.send(SessionEvent::SignedIn);
    }

    /// Explicit logout.
    pub fn clear(&self) {
        self.evict(false);
    }

    /// Central 401 path: evict credentials and signal that the session ended
    /// involuntarily. Requests already in flight simply go out without a
    /// token and collect their own 401.
    pub fn expire(&self) {
        self.evict(true);
    }

    fn evict(&self, expired: bool) {
        self.persist_token(None);
        *self.inner.token.write().expect("token lock poisoned") = None;
        *self.inner.user.write().expect("user lock poisoned") = None;
        let _ = self.inner.events.send(SessionEvent::SignedOut { expired });
    }

    pub fn watch(&self) -> watch::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    fn persist_token(&self, token: Option<&str>) {
        let Some(path) = &self.inner.token_file else {
            return;
        };
        let result = match token {
            Some(token) => {
                if let Some(parent) = path.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }
                std::fs::write(path, token)
            }
            None => match std::fs::remove_file(path) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };
        if let Err(e) = result {
            tracing::warn!("Failed to update token file {:?}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn test_user() -> User {
        User {
            id: 1,
            username: "maria".to_string(),
            name: Some("Maria K".to_string()),
            email: "maria@example.edu".to_string(),
            role: Role::Librarian,
        }
    }

    #[test]
    fn login_then_expire_round_trip() {
        let session = AuthSession::in_memory();
        assert!(!session.is_authenticated());

        session.store_login("tok-123".to_string(), test_user());
        assert_eq!(session.token().as_deref(), Some("tok-123"));
        assert_eq!(session.current_user().unwrap().username, "maria");

        session.expire();
        assert!(session.token().is_none());
        assert!(session.current_user().is_none());
        assert_eq!(
            *session.watch().borrow(),
            SessionEvent::SignedOut { expired: true }
        );
    }

    #[test]
    fn logout_is_not_reported_as_expiry() {
        let session = AuthSession::in_memory();
        session.store_login("tok".to_string(), test_user());
        session.clear();
        assert_eq!(
            *session.watch().borrow(),
            SessionEvent::SignedOut { expired: false }
        );
    }

    #[test]
    fn token_survives_a_restart_via_the_token_file() {
        let path = std::env::temp_dir().join(format!("libris-test-{}", uuid::Uuid::new_v4()));

        let session = AuthSession::new(path.clone());
        session.store_login("persisted".to_string(), test_user());
        drop(session);

        let revived = AuthSession::new(path.clone());
        assert_eq!(revived.token().as_deref(), Some("persisted"));

        revived.clear();
        assert!(!path.exists());
        let gone = AuthSession::new(path);
        assert!(gone.token().is_none());
    }
}
