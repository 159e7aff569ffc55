//! Authenticated request pipeline: envelope contract, bearer injection and
//! single-flight token refresh.

mod client;
mod envelope;
mod error;
mod events;
mod refresh;
mod request;
mod transport;

pub use client::ApiClient;
pub use envelope::{Envelope, ErrorBody, ErrorCode, ResponseMeta};
pub use error::{ApiError, ApiFailure, TransportFailure, TransportFailureKind};
pub use events::SessionEvent;
pub use refresh::RefreshPhase;
pub use request::{ApiRequest, LOGIN_PATH, REFRESH_PATH, RequestOptions};
pub use transport::{OutgoingRequest, RawResponse, ReqwestTransport, Transport};

