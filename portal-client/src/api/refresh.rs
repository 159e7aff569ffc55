//! Single-flight access token refresh.
//!
//! Phases: `Idle -> RefreshInFlight -> Idle` when the refresh succeeds,
//! `Idle -> RefreshInFlight -> LoggedOut` when it fails. Every request that
//! hits a 401 while a refresh is in flight awaits the same shared outcome
//! instead of starting its own, so a single-use refresh token is spent once.
//!
//! The refresh itself runs on a spawned task: a waiting request being dropped
//! never leaves the latch stuck in `RefreshInFlight`.
//!
//! Login and logout bump the latch generation. A refresh that lands after the
//! generation moved on, or after the stored refresh token changed, leaves the
//! session and the phase alone and fails its waiters with `Cancelled`.

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::envelope::classify;
use super::error::{ApiError, TransportFailure};
use super::events::{SessionEvent, SessionEvents};
use super::request::{ApiRequest, REFRESH_PATH};
use super::transport::{OutgoingRequest, Transport};
use crate::services::metrics::record_refresh;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    RefreshInFlight,
    /// Terminal until a new session is stored.
    LoggedOut,
}

type SharedRefresh = Shared<BoxFuture<'static, Result<String, ApiError>>>;

enum RefreshState {
    Idle,
    InFlight(SharedRefresh),
    LoggedOut,
}

struct Latch {
    state: RefreshState,
    /// Identifies the session epoch a refresh was started in.
    generation: u64,
}

/// What a request that failed with 401 should do next.
#[derive(Debug)]
pub(crate) enum Recovery {
    /// Resend once with this access token.
    Retry(String),
    /// The refresh failed; reject with its error.
    Failed(ApiError),
    /// No refresh is possible; reject with the original failure.
    Unavailable,
}

#[derive(Clone)]
pub(crate) struct RefreshCoordinator {
    latch: Arc<Mutex<Latch>>,
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
    events: SessionEvents,
}

impl RefreshCoordinator {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionStore>,
        events: SessionEvents,
    ) -> Self {
        Self {
            latch: Arc::new(Mutex::new(Latch {
                state: RefreshState::Idle,
                generation: 0,
            })),
            transport,
            session,
            events,
        }
    }

    pub(crate) async fn phase(&self) -> RefreshPhase {
        match &self.latch.lock().await.state {
            RefreshState::Idle => RefreshPhase::Idle,
            RefreshState::InFlight(_) => RefreshPhase::RefreshInFlight,
            RefreshState::LoggedOut => RefreshPhase::LoggedOut,
        }
    }

    /// A fresh session was stored by login.
    pub(crate) async fn reset(&self) {
        self.supersede(RefreshState::Idle).await;
    }

    pub(crate) async fn mark_logged_out(&self) {
        self.supersede(RefreshState::LoggedOut).await;
    }

    /// Detach any in-flight refresh from the session.
    async fn supersede(&self, state: RefreshState) {
        let mut latch = self.latch.lock().await;
        latch.generation += 1;
        latch.state = state;
    }

    /// Resolve a 401 that a request got while holding `failed_token`.
    pub(crate) async fn recover(&self, failed_token: Option<&str>) -> Recovery {
        let refresh = {
            let mut latch = self.latch.lock().await;
            let in_flight = match &latch.state {
                RefreshState::InFlight(refresh) => Some(refresh.clone()),
                RefreshState::LoggedOut if !self.session.state().is_authenticated() => {
                    return Recovery::Unavailable;
                }
                RefreshState::LoggedOut | RefreshState::Idle => None,
            };

            match in_flight {
                Some(refresh) => refresh,
                None => {
                    let session = self.session.state();

                    // A refresh already landed after this request was sent.
                    if let Some(current) = session.access_token.as_deref()
                        && failed_token != Some(current)
                    {
                        return Recovery::Retry(current.to_string());
                    }

                    let Some(refresh_token) = session.refresh_token else {
                        tracing::warn!("Access token rejected and no refresh token stored, ending session");
                        self.session.clear_auth();
                        latch.state = RefreshState::LoggedOut;
                        self.events.emit(SessionEvent::Expired);
                        record_refresh("missing_token");
                        return Recovery::Unavailable;
                    };

                    latch.generation += 1;
                    let refresh = self.start(refresh_token, latch.generation);
                    latch.state = RefreshState::InFlight(refresh.clone());
                    refresh
                }
            }
        };

        match refresh.await {
            Ok(token) => Recovery::Retry(token),
            Err(err) => Recovery::Failed(err),
        }
    }

    fn start(&self, refresh_token: String, generation: u64) -> SharedRefresh {
        let coordinator = self.clone();
        let task = tokio::spawn(async move { coordinator.run(refresh_token, generation).await });
        let latch = Arc::clone(&self.latch);

        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(error = %e, "Token refresh task did not complete");
                    let mut latch = latch.lock().await;
                    if latch.generation == generation {
                        latch.state = RefreshState::Idle;
                    }
                    Err(ApiError::Transport(TransportFailure::cancelled(
                        "token refresh was aborted",
                    )))
                }
            }
        }
        .boxed()
        .shared()
    }

    async fn run(&self, refresh_token: String, generation: u64) -> Result<String, ApiError> {
        tracing::info!("Refreshing access token");
        let outcome = self.call_refresh(&refresh_token).await;

        let mut latch = self.latch.lock().await;
        if latch.generation != generation {
            tracing::info!("Session changed during token refresh, discarding the result");
            record_refresh("superseded");
            return Err(superseded());
        }
        if self.session.state().refresh_token.as_deref() != Some(refresh_token.as_str()) {
            tracing::info!("Refresh token replaced during token refresh, discarding the result");
            latch.state = RefreshState::Idle;
            record_refresh("superseded");
            return Err(superseded());
        }

        match outcome {
            Ok(access_token) => {
                let user = self.session.state().user;
                self.session
                    .set_auth(access_token.clone(), refresh_token, user);
                latch.state = RefreshState::Idle;
                record_refresh("success");
                tracing::info!("Access token refreshed");
                Ok(access_token)
            }
            Err(err) => {
                tracing::warn!(
                    code = err.code().map(|c| c.as_str()),
                    status = err.status(),
                    request_id = err.request_id(),
                    error = %err,
                    "Token refresh failed, ending session"
                );
                self.session.clear_auth();
                latch.state = RefreshState::LoggedOut;
                self.events.emit(SessionEvent::Expired);
                record_refresh("failure");
                Err(err)
            }
        }
    }

    async fn call_refresh(&self, refresh_token: &str) -> Result<String, ApiError> {
        let request = ApiRequest::post(REFRESH_PATH)
            .skip_auth()
            .body(json!({ "refresh": refresh_token }));

        let response = self
            .transport
            .execute(OutgoingRequest::from_api(&request, None))
            .await?;

        extract_access_token(&classify(&response)?)
    }
}

fn superseded() -> ApiError {
    ApiError::Transport(TransportFailure::cancelled(
        "session changed while the access token was being refreshed",
    ))
}

/// Accept `{access}` as well as the enveloped `{data: {access}}` shape.
fn extract_access_token(data: &Value) -> Result<String, ApiError> {
    data.get("access")
        .or_else(|| data.get("data").and_then(|inner| inner.get("access")))
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Decode("refresh response did not contain an access token".to_string()))
}
