use anyhow::Context;
use std::sync::Arc;

use crate::api::{ApiClient, ReqwestTransport};
use crate::config::Settings;
use crate::session::{FileSessionStore, MemorySessionStore, SessionStore};

/// Wire the transport and session store described by `settings`.
pub fn build_client(settings: &Settings) -> anyhow::Result<ApiClient> {
    let transport = ReqwestTransport::new(settings.api.base_url.clone(), settings.api.timeout())
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP transport: {}", e))?;

    let session: Arc<dyn SessionStore> = if settings.session.persist {
        let store = FileSessionStore::open(&settings.session.path).with_context(|| {
            format!(
                "Failed to open session file {}",
                settings.session.path.display()
            )
        })?;
        tracing::info!(path = %store.path().display(), "Using persisted session");
        Arc::new(store)
    } else {
        Arc::new(MemorySessionStore::new())
    };

    Ok(ApiClient::new(Arc::new(transport), session))
}
