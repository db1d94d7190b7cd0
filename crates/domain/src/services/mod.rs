//! Domain services for Chore Board.
//!
//! Services contain business logic that operates on domain models.

pub mod periods;
pub mod progress;
pub mod ranking;
pub mod recurrence;
pub mod rewards;
pub mod time_check;

pub use periods::{period_window, PeriodWindow};

pub use progress::{apply_completion, level_for_points, CompletionProgress, ProfileProgress};

pub use ranking::rank_entries;

pub use rewards::{
    cash_out_reward, points_reward, CashOutInput, CashOutReward, PointsInput, PointsReward,
};

pub use recurrence::{expand_rrule, Frequency, RecurrenceError, RecurrenceRule};

pub use time_check::{assess_reported_time, median_minutes, TimeCheckInput};
