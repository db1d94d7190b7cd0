//! Leaderboard snapshot entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{LeaderboardEntry, LeaderboardSnapshot, Period};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for the leaderboard period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "leaderboard_period", rename_all = "snake_case")]
pub enum PeriodDb {
    Week,
    Month,
    AllTime,
}

impl From<PeriodDb> for Period {
    fn from(period: PeriodDb) -> Self {
        match period {
            PeriodDb::Week => Period::Week,
            PeriodDb::Month => Period::Month,
            PeriodDb::AllTime => Period::AllTime,
        }
    }
}

impl From<Period> for PeriodDb {
    fn from(period: Period) -> Self {
        match period {
            Period::Week => PeriodDb::Week,
            Period::Month => PeriodDb::Month,
            Period::AllTime => PeriodDb::AllTime,
        }
    }
}

/// Database row mapping for the leaderboard_snapshots table.
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardSnapshotEntity {
    pub id: Uuid,
    pub family_id: Uuid,
    pub period: PeriodDb,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub profile_id: Uuid,
    pub points: i64,
    pub chores_completed: i64,
    pub earliest_completion: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LeaderboardSnapshotEntity> for LeaderboardSnapshot {
    fn from(entity: LeaderboardSnapshotEntity) -> Self {
        Self {
            id: entity.id,
            family_id: entity.family_id,
            period: entity.period.into(),
            starts_on: entity.starts_on,
            ends_on: entity.ends_on,
            profile_id: entity.profile_id,
            points: entity.points,
            chores_completed: entity.chores_completed,
            earliest_completion: entity.earliest_completion,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Aggregated approved totals for one claimant inside a window.
#[derive(Debug, Clone, FromRow)]
pub struct AggregatedScoreEntity {
    pub profile_id: Uuid,
    pub points: i64,
    pub chores_completed: i64,
    pub earliest_completion: Option<DateTime<Utc>>,
}

/// Leaderboard row joined with profile details for listing.
///
/// Ranks are assigned after sorting, so the conversion leaves rank at
/// zero.
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardEntryEntity {
    pub profile_id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub points: i64,
    pub chores_completed: i64,
    pub earliest_completion: Option<DateTime<Utc>>,
}

impl From<LeaderboardEntryEntity> for LeaderboardEntry {
    fn from(entity: LeaderboardEntryEntity) -> Self {
        Self {
            rank: 0,
            profile_id: entity.profile_id,
            display_name: entity.display_name,
            avatar_url: entity.avatar_url,
            points: entity.points,
            chores_completed: entity.chores_completed,
            earliest_completion: entity.earliest_completion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_snapshot_entity() -> LeaderboardSnapshotEntity {
        LeaderboardSnapshotEntity {
            id: Uuid::new_v4(),
            family_id: Uuid::new_v4(),
            period: PeriodDb::Week,
            starts_on: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            ends_on: NaiveDate::from_ymd_opt(2025, 3, 16).unwrap(),
            profile_id: Uuid::new_v4(),
            points: 45,
            chores_completed: 4,
            earliest_completion: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_snapshot_entity_to_domain() {
        let entity = create_test_snapshot_entity();
        let snapshot: LeaderboardSnapshot = entity.clone().into();

        assert_eq!(snapshot.id, entity.id);
        assert_eq!(snapshot.family_id, entity.family_id);
        assert_eq!(snapshot.period, Period::Week);
        assert_eq!(snapshot.starts_on, entity.starts_on);
        assert_eq!(snapshot.points, 45);
        assert_eq!(snapshot.chores_completed, 4);
    }

    #[test]
    fn test_entry_entity_starts_unranked() {
        let entity = LeaderboardEntryEntity {
            profile_id: Uuid::new_v4(),
            display_name: "Mia".to_string(),
            avatar_url: None,
            points: 30,
            chores_completed: 3,
            earliest_completion: None,
        };

        let entry: LeaderboardEntry = entity.into();
        assert_eq!(entry.rank, 0);
        assert_eq!(entry.points, 30);
        assert_eq!(entry.display_name, "Mia");
    }

    #[test]
    fn test_period_db_round_trip() {
        for period in [Period::Week, Period::Month, Period::AllTime] {
            let db: PeriodDb = period.into();
            assert_eq!(Period::from(db), period);
        }
    }
}
