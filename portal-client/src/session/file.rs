use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use super::{Session, SessionStore};
use crate::models::{ActiveConsorcio, UserProfile};

/// Session persisted as JSON on disk, rewritten after every mutation.
///
/// A missing or unreadable file yields an empty session. On restore, a token
/// without a decoded user gets its user re-derived from the claims.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    state: RwLock<Session>,
}

impl FileSessionStore {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let mut session = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<Session>(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Discarding unreadable session file");
                Session::default()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Session::default(),
            Err(e) => return Err(e),
        };
        session.rehydrate_user();

        Ok(Self {
            path,
            state: RwLock::new(session),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate(&self, apply: impl FnOnce(&mut Session)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut state);
        if let Err(e) = persist(&self.path, &state) {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to persist session");
        }
    }
}

fn persist(path: &Path, session: &Session) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let bytes = serde_json::to_vec_pretty(session).map_err(io::Error::other)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

impl SessionStore for FileSessionStore {
    fn state(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_auth(&self, access_token: String, refresh_token: String, user: Option<UserProfile>) {
        self.mutate(|session| session.set_auth(access_token, refresh_token, user));
    }

    fn clear_auth(&self) {
        self.mutate(Session::clear_auth);
    }

    fn set_active_consorcio(&self, consorcio: Option<ActiveConsorcio>) {
        self.mutate(|session| session.active_consorcio = consorcio);
    }
}
