//! Shared utilities and common types for Chore Board backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (hashing, secret comparison)
//! - JWT token generation and validation
//! - Common validation logic
//! - Cursor-based pagination helpers

pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod validation;
