pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod session;
pub mod startup;
pub mod utils;

pub use api::{ApiClient, ApiError, ErrorCode, SessionEvent};
pub use session::{Session, SessionStore};
