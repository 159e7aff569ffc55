pub mod jwt;

pub use jwt::{AccessClaims, ClaimsError, decode_access_claims, decode_user_profile};
