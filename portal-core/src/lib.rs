//! portal-core: Shared infrastructure for the consorcio portal client.
pub mod config;
pub mod error;
pub mod observability;

pub use error::CoreError;
pub use tracing;
