//! Session state and the store abstraction the API client reads it through.
//!
//! The client never owns the session: it is handed an `Arc<dyn SessionStore>`
//! at construction, so tests can inject their own and the UI can share the
//! same store.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use crate::models::{ActiveConsorcio, UserProfile};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub active_consorcio: Option<ActiveConsorcio>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Token present but its claims could not be decoded.
    pub fn is_degraded(&self) -> bool {
        self.access_token.is_some() && self.user.is_none()
    }

    /// Re-derive `user` from the access token when it is missing.
    pub(crate) fn rehydrate_user(&mut self) {
        if self.user.is_some() {
            return;
        }
        let Some(token) = self.access_token.as_deref() else {
            return;
        };
        match crate::utils::decode_user_profile(token) {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "User hydrated from token");
                self.user = Some(user);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to decode token on hydration"),
        }
    }

    fn set_auth(&mut self, access_token: String, refresh_token: String, user: Option<UserProfile>) {
        self.access_token = Some(access_token);
        self.refresh_token = Some(refresh_token);
        self.user = user;
    }

    fn clear_auth(&mut self) {
        *self = Session::default();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &self.access_token.as_ref().map(|_| "[redacted]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[redacted]"))
            .field("user", &self.user)
            .field("active_consorcio", &self.active_consorcio)
            .finish()
    }
}

/// Holder of the current session. Reads are synchronous snapshots; the
/// refresh coordinator and login/logout are the only writers.
pub trait SessionStore: Send + Sync {
    fn state(&self) -> Session;

    fn set_auth(&self, access_token: String, refresh_token: String, user: Option<UserProfile>);

    /// Drop tokens, user and the active consorcio.
    fn clear_auth(&self);

    fn set_active_consorcio(&self, consorcio: Option<ActiveConsorcio>);
}
