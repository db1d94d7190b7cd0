//! Chore template repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ChoreEntity;
use crate::metrics::QueryTimer;

/// Repository for chore template database operations.
#[derive(Clone)]
pub struct ChoreRepository {
    pool: PgPool,
}

impl ChoreRepository {
    /// Creates a new ChoreRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a chore template by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ChoreEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_chore_by_id");
        let result = sqlx::query_as::<_, ChoreEntity>(
            r#"
            SELECT id, family_id, title, description, type AS chore_type, base_points,
                   expected_duration_min, is_recurring, rrule, assignee_id, created_by,
                   active, allow_cash_out, created_at, updated_at
            FROM chores
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the active recurring templates across all families.
    ///
    /// Only templates with a recurrence rule are eligible for spawning.
    pub async fn list_active_recurring(&self) -> Result<Vec<ChoreEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_recurring_chores");
        let result = sqlx::query_as::<_, ChoreEntity>(
            r#"
            SELECT id, family_id, title, description, type AS chore_type, base_points,
                   expected_duration_min, is_recurring, rrule, assignee_id, created_by,
                   active, allow_cash_out, created_at, updated_at
            FROM chores
            WHERE active = TRUE AND is_recurring = TRUE AND rrule IS NOT NULL
            ORDER BY family_id, created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_chore_repository_new() {
        // This is a structural test - we can't test actual database operations without a test DB
    }
}
