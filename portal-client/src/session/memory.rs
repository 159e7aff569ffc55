use std::sync::{PoisonError, RwLock};

use super::{Session, SessionStore};
use crate::models::{ActiveConsorcio, UserProfile};

/// Volatile store; the session is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    state: RwLock<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            state: RwLock::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn state(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_auth(&self, access_token: String, refresh_token: String, user: Option<UserProfile>) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_auth(access_token, refresh_token, user);
    }

    fn clear_auth(&self) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear_auth();
    }

    fn set_active_consorcio(&self, consorcio: Option<ActiveConsorcio>) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .active_consorcio = consorcio;
    }
}
