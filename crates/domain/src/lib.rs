//! Domain layer for Chore Board backend.
//!
//! This crate contains:
//! - Domain models (Family, Profile, Chore, ChoreInstance, ...)
//! - Business logic services (reward math, recurrence expansion, ranking)
//! - Domain error types

pub mod models;
pub mod services;
