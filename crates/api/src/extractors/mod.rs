//! Axum extractors for request authentication.

pub mod profile_auth;

pub use profile_auth::ProfileAuth;
