//! Profile repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProfileEntity;
use crate::metrics::QueryTimer;

/// Repository for profile-related database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a profile by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_id");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT id, family_id, role, display_name, avatar_url, hourly_rate_cents,
                   total_points, streak_days, last_completion_date, level, badges,
                   created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all profiles in a family, oldest first.
    pub async fn list_for_family(
        &self,
        family_id: Uuid,
    ) -> Result<Vec<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_profiles_for_family");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT id, family_id, role, display_name, avatar_url, hourly_rate_cents,
                   total_points, streak_days, last_completion_date, level, badges,
                   created_at, updated_at
            FROM profiles
            WHERE family_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(family_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the parent profile IDs of a family.
    ///
    /// Used to fan out approval-needed notifications on submission.
    pub async fn list_parent_ids(&self, family_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_parent_profile_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM profiles
            WHERE family_id = $1 AND role = 'parent'
            ORDER BY created_at
            "#,
        )
        .bind(family_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_profile_repository_new() {
        // This is a structural test - we can't test actual database operations without a test DB
    }
}
