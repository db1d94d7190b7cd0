//! HTTP route handlers.

pub mod approvals;
pub mod health;
pub mod instances;
pub mod internal;
pub mod leaderboard;
pub mod notifications;
pub mod time_check;
