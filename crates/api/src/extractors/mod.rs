//! Custom Axum extractors.
//!
//! Extractors for authenticating callers and parsing request data.

pub mod user_auth;
pub mod validated;

pub use user_auth::UserAuth;
pub use validated::{QueryParams, ValidJson};
