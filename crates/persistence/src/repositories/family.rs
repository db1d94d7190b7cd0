//! Family repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::FamilyEntity;
use crate::metrics::QueryTimer;

/// Repository for family-related database operations.
#[derive(Clone)]
pub struct FamilyRepository {
    pool: PgPool,
}

impl FamilyRepository {
    /// Creates a new FamilyRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a family by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FamilyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_family_by_id");
        let result = sqlx::query_as::<_, FamilyEntity>(
            r#"
            SELECT id, name, timezone, plan, settings, created_at, updated_at
            FROM families
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all family IDs, oldest first.
    ///
    /// Used by the leaderboard refresh to walk every family.
    pub async fn list_ids(&self) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_family_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM families
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
