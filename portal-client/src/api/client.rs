use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

use super::envelope::classify;
use super::error::ApiError;
use super::events::{SessionEvent, SessionEvents};
use super::refresh::{Recovery, RefreshCoordinator, RefreshPhase};
use super::request::ApiRequest;
use super::transport::{OutgoingRequest, Transport};
use crate::services::metrics::record_request;
use crate::session::SessionStore;

/// Authenticated client for the consorcio backend.
///
/// Every call runs through the same stages: attach the bearer, send, classify
/// the envelope, and on an unauthorized first attempt hand over to the
/// refresh coordinator and resend at most once. Cheap to clone; clones share
/// the session, the refresh latch and the event channel.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
    refresh: RefreshCoordinator,
    events: SessionEvents,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<dyn SessionStore>) -> Self {
        let events = SessionEvents::new();
        let refresh =
            RefreshCoordinator::new(Arc::clone(&transport), Arc::clone(&session), events.clone());

        Self {
            inner: Arc::new(ClientInner {
                transport,
                session,
                refresh,
                events,
            }),
        }
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.inner.session
    }

    /// Session lifecycle events. `Expired` and `LoggedOut` mean the UI
    /// should show its login screen.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub async fn refresh_phase(&self) -> RefreshPhase {
        self.inner.refresh.phase().await
    }

    pub(crate) fn refresh(&self) -> &RefreshCoordinator {
        &self.inner.refresh
    }

    pub(crate) fn events(&self) -> &SessionEvents {
        &self.inner.events
    }

    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let data = self.send_value(request).await?;
        serde_json::from_value(data).map_err(|e| {
            tracing::warn!(error = %e, "Response data did not match the expected shape");
            ApiError::Decode(e.to_string())
        })
    }

    /// Dispatch and return the unwrapped `data` as raw JSON.
    #[tracing::instrument(
        name = "api_request",
        skip(self, request),
        fields(method = %request.method, path = %request.path)
    )]
    pub async fn send_value(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let started = Instant::now();
        let result = self.dispatch(&request).await;

        record_request(request.method.as_str(), outcome_label(&result), started.elapsed());
        if let Err(err) = &result {
            log_failure(err);
        }
        result
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let mut request = ApiRequest::new(method, path);
        request.body = body;
        self.send(request).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(ApiRequest::post(path).json(body)?).await
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let bearer = self.bearer_for(request);
        let error = match self.attempt(request, bearer.clone()).await {
            Ok(data) => return Ok(data),
            Err(err) => err,
        };

        if !should_refresh(request, &error) {
            return Err(error);
        }

        match self.inner.refresh.recover(bearer.as_deref()).await {
            Recovery::Retry(token) => {
                tracing::debug!("Resending request with refreshed token");
                // Second and last attempt: its outcome is final.
                self.attempt(request, Some(token)).await
            }
            Recovery::Failed(refresh_error) => Err(refresh_error),
            Recovery::Unavailable => Err(error),
        }
    }

    async fn attempt(&self, request: &ApiRequest, bearer: Option<String>) -> Result<Value, ApiError> {
        let response = self
            .inner
            .transport
            .execute(OutgoingRequest::from_api(request, bearer))
            .await?;
        classify(&response)
    }

    fn bearer_for(&self, request: &ApiRequest) -> Option<String> {
        if request.options.skip_auth {
            return None;
        }
        self.inner.session.state().access_token
    }
}

fn should_refresh(request: &ApiRequest, error: &ApiError) -> bool {
    error.is_unauthorized() && !request.options.skip_auth && !request.is_auth_endpoint()
}

fn outcome_label(result: &Result<Value, ApiError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(err) if err.is_unauthorized() => "unauthorized",
        Err(ApiError::Api(_)) => "api_error",
        Err(ApiError::Transport(_)) => "transport_error",
        Err(_) => "client_error",
    }
}

fn log_failure(err: &ApiError) {
    match err {
        ApiError::Transport(failure) => tracing::error!(
            kind = ?failure.kind,
            status = failure.status,
            request_id = failure.request_id.as_deref(),
            message = %failure.message,
            "API request failed"
        ),
        other => tracing::warn!(
            code = other.code().map(|c| c.as_str()),
            status = other.status(),
            request_id = other.request_id(),
            message = %other.message(),
            "API request rejected"
        ),
    }
}
