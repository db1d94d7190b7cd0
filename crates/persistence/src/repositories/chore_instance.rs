//! Chore instance repository for database operations.
//!
//! Status transitions are guarded compare-and-swap updates: the WHERE
//! clause names the expected current status and a losing racer sees
//! zero rows instead of overwriting the winner.

use chrono::{DateTime, Utc};
use domain::services::{apply_completion, ProfileProgress};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::entities::{ChoreEntity, ChoreInstanceEntity, InstanceStatusDb, NewNotification};
use crate::metrics::QueryTimer;

/// Query parameters for listing instances with keyset pagination.
#[derive(Debug, Clone)]
pub struct InstanceListQuery {
    pub family_id: Uuid,
    pub status: Option<InstanceStatusDb>,
    /// When set, only instances claimed by or assigned to this profile.
    pub involving: Option<Uuid>,
    pub limit: u32,
    pub cursor_due_at: Option<DateTime<Utc>>,
    pub cursor_id: Option<Uuid>,
}

/// Everything written when an approval is finalized.
#[derive(Debug, Clone)]
pub struct ApprovalFinalization {
    pub instance_id: Uuid,
    pub parent_id: Uuid,
    pub claimant_id: Uuid,
    pub approved_at: DateTime<Utc>,
    pub reason: Option<String>,
    pub points_awarded: i32,
    pub cash_cents: Option<i64>,
    pub audit: serde_json::Value,
    pub notification: NewNotification,
}

/// Everything written when a rejection is finalized.
#[derive(Debug, Clone)]
pub struct RejectionFinalization {
    pub instance_id: Uuid,
    pub parent_id: Uuid,
    pub reason: Option<String>,
    pub notification: NewNotification,
}

/// Repository for chore instance database operations.
#[derive(Clone)]
pub struct ChoreInstanceRepository {
    pool: PgPool,
}

impl ChoreInstanceRepository {
    /// Creates a new ChoreInstanceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find an instance by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ChoreInstanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_instance_by_id");
        let result = sqlx::query_as::<_, ChoreInstanceEntity>(
            r#"
            SELECT id, chore_id, family_id, title, description, type AS chore_type,
                   base_points, expected_duration_min, due_at, assignee_id, status,
                   claimed_by, claimed_at, completed_at, approved_at, approved_by,
                   cash_out_requested, minutes_reported, points_awarded, cash_cents,
                   proof_urls, notes, audit, created_at, updated_at
            FROM chore_instances
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List instances for a family ordered by due date, oldest first.
    ///
    /// Returns the page plus a flag indicating whether more rows exist
    /// past it.
    pub async fn list_for_family(
        &self,
        query: InstanceListQuery,
    ) -> Result<(Vec<ChoreInstanceEntity>, bool), sqlx::Error> {
        let timer = QueryTimer::new("list_instances_for_family");

        // Fetch limit + 1 to determine if more results exist
        let fetch_limit = (query.limit + 1) as i64;

        let instances = sqlx::query_as::<_, ChoreInstanceEntity>(
            r#"
            SELECT id, chore_id, family_id, title, description, type AS chore_type,
                   base_points, expected_duration_min, due_at, assignee_id, status,
                   claimed_by, claimed_at, completed_at, approved_at, approved_by,
                   cash_out_requested, minutes_reported, points_awarded, cash_cents,
                   proof_urls, notes, audit, created_at, updated_at
            FROM chore_instances
            WHERE family_id = $1
              AND ($2::instance_status IS NULL OR status = $2)
              AND ($3::uuid IS NULL OR claimed_by = $3 OR assignee_id = $3)
              AND ($4::timestamptz IS NULL OR (due_at, id) > ($4, $5))
            ORDER BY due_at ASC, id ASC
            LIMIT $6
            "#,
        )
        .bind(query.family_id)
        .bind(query.status)
        .bind(query.involving)
        .bind(query.cursor_due_at)
        // Use the nil UUID as fallback when cursor_id is None but cursor_due_at is Some
        // This ensures keyset pagination works correctly
        .bind(query.cursor_id.unwrap_or_else(Uuid::nil))
        .bind(fetch_limit)
        .fetch_all(&self.pool)
        .await?;

        timer.record();

        // Check if there are more results
        let has_more = instances.len() > query.limit as usize;
        let mut result = instances;
        if has_more {
            result.pop();
        }

        Ok((result, has_more))
    }

    /// List submitted instances awaiting a decision, oldest submission first.
    pub async fn list_pending_for_family(
        &self,
        family_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ChoreInstanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pending_instances");
        let result = sqlx::query_as::<_, ChoreInstanceEntity>(
            r#"
            SELECT id, chore_id, family_id, title, description, type AS chore_type,
                   base_points, expected_duration_min, due_at, assignee_id, status,
                   claimed_by, claimed_at, completed_at, approved_at, approved_by,
                   cash_out_requested, minutes_reported, points_awarded, cash_cents,
                   proof_urls, notes, audit, created_at, updated_at
            FROM chore_instances
            WHERE family_id = $1 AND status = 'submitted'
            ORDER BY completed_at, id
            LIMIT $2
            "#,
        )
        .bind(family_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Claim an open instance for a profile.
    ///
    /// Fails (returns None) when the instance is not open or is assigned
    /// to somebody else.
    pub async fn claim(
        &self,
        instance_id: Uuid,
        profile_id: Uuid,
        claimed_at: DateTime<Utc>,
    ) -> Result<Option<ChoreInstanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("claim_instance");
        let result = sqlx::query_as::<_, ChoreInstanceEntity>(
            r#"
            UPDATE chore_instances
            SET status = 'claimed', claimed_by = $2, claimed_at = $3, updated_at = NOW()
            WHERE id = $1
              AND status = 'open'
              AND (assignee_id IS NULL OR assignee_id = $2)
            RETURNING id, chore_id, family_id, title, description, type AS chore_type,
                      base_points, expected_duration_min, due_at, assignee_id, status,
                      claimed_by, claimed_at, completed_at, approved_at, approved_by,
                      cash_out_requested, minutes_reported, points_awarded, cash_cents,
                      proof_urls, notes, audit, created_at, updated_at
            "#,
        )
        .bind(instance_id)
        .bind(profile_id)
        .bind(claimed_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Submit a claimed instance for review.
    ///
    /// Only the claimant can submit, and only from the claimed status.
    #[allow(clippy::too_many_arguments)]
    pub async fn submit(
        &self,
        instance_id: Uuid,
        profile_id: Uuid,
        completed_at: DateTime<Utc>,
        cash_out_requested: bool,
        minutes_reported: Option<i32>,
        proof_urls: &[String],
        notes: Option<&str>,
    ) -> Result<Option<ChoreInstanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("submit_instance");
        let result = sqlx::query_as::<_, ChoreInstanceEntity>(
            r#"
            UPDATE chore_instances
            SET status = 'submitted', completed_at = $3, cash_out_requested = $4,
                minutes_reported = $5, proof_urls = $6, notes = $7, updated_at = NOW()
            WHERE id = $1 AND status = 'claimed' AND claimed_by = $2
            RETURNING id, chore_id, family_id, title, description, type AS chore_type,
                      base_points, expected_duration_min, due_at, assignee_id, status,
                      claimed_by, claimed_at, completed_at, approved_at, approved_by,
                      cash_out_requested, minutes_reported, points_awarded, cash_cents,
                      proof_urls, notes, audit, created_at, updated_at
            "#,
        )
        .bind(instance_id)
        .bind(profile_id)
        .bind(completed_at)
        .bind(cash_out_requested)
        .bind(minutes_reported)
        .bind(proof_urls)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Minutes reported on recent approved completions of a chore by one
    /// profile, newest first.
    pub async fn history_minutes(
        &self,
        chore_id: Uuid,
        profile_id: Uuid,
        limit: i64,
    ) -> Result<Vec<i32>, sqlx::Error> {
        let timer = QueryTimer::new("instance_history_minutes");
        let result = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT minutes_reported
            FROM chore_instances
            WHERE chore_id = $1
              AND claimed_by = $2
              AND status = 'approved'
              AND minutes_reported IS NOT NULL
            ORDER BY approved_at DESC
            LIMIT $3
            "#,
        )
        .bind(chore_id)
        .bind(profile_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether the chore already has an instance due inside the window.
    ///
    /// The window is half-open: from inclusive, to exclusive.
    pub async fn exists_in_window(
        &self,
        chore_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("instance_exists_in_window");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM chore_instances
                WHERE chore_id = $1 AND due_at >= $2 AND due_at < $3
            )
            "#,
        )
        .bind(chore_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a new open instance copied from a chore template.
    pub async fn insert_from_template(
        &self,
        template: &ChoreEntity,
        due_at: DateTime<Utc>,
    ) -> Result<ChoreInstanceEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_instance_from_template");
        let result = sqlx::query_as::<_, ChoreInstanceEntity>(
            r#"
            INSERT INTO chore_instances (chore_id, family_id, title, description, type,
                                         base_points, expected_duration_min, due_at,
                                         assignee_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'open')
            RETURNING id, chore_id, family_id, title, description, type AS chore_type,
                      base_points, expected_duration_min, due_at, assignee_id, status,
                      claimed_by, claimed_at, completed_at, approved_at, approved_by,
                      cash_out_requested, minutes_reported, points_awarded, cash_cents,
                      proof_urls, notes, audit, created_at, updated_at
            "#,
        )
        .bind(template.id)
        .bind(template.family_id)
        .bind(&template.title)
        .bind(&template.description)
        .bind(template.chore_type)
        .bind(template.base_points)
        .bind(template.expected_duration_min)
        .bind(due_at)
        .bind(template.assignee_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finalize an approval: flip the instance, record the approval,
    /// fold points into the claimant's progress and queue notifications,
    /// all in one transaction.
    ///
    /// Returns None when the instance was not in the submitted status,
    /// leaving the database untouched.
    pub async fn finalize_approval(
        &self,
        params: ApprovalFinalization,
    ) -> Result<Option<ChoreInstanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("finalize_approval");

        // Zero awards are stored as NULL on both the instance and the
        // approval record
        let points_col = (params.points_awarded > 0).then_some(params.points_awarded);
        let cash_col = params.cash_cents.filter(|cents| *cents > 0);

        let mut tx = self.pool.begin().await?;

        let Some(instance) = sqlx::query_as::<_, ChoreInstanceEntity>(
            r#"
            UPDATE chore_instances
            SET status = 'approved', approved_at = $3, approved_by = $2,
                points_awarded = $4, cash_cents = $5, audit = $6, updated_at = NOW()
            WHERE id = $1 AND status = 'submitted'
            RETURNING id, chore_id, family_id, title, description, type AS chore_type,
                      base_points, expected_duration_min, due_at, assignee_id, status,
                      claimed_by, claimed_at, completed_at, approved_at, approved_by,
                      cash_out_requested, minutes_reported, points_awarded, cash_cents,
                      proof_urls, notes, audit, created_at, updated_at
            "#,
        )
        .bind(params.instance_id)
        .bind(params.parent_id)
        .bind(params.approved_at)
        .bind(points_col)
        .bind(cash_col)
        .bind(&params.audit)
        .fetch_optional(&mut *tx)
        .await?
        else {
            timer.record();
            return Ok(None);
        };

        sqlx::query(
            r#"
            INSERT INTO approvals (instance_id, parent_id, action, reason, points_awarded, cash_cents)
            VALUES ($1, $2, 'approved', $3, $4, $5)
            "#,
        )
        .bind(params.instance_id)
        .bind(params.parent_id)
        .bind(params.reason.as_deref())
        .bind(points_col)
        .bind(cash_col)
        .execute(&mut *tx)
        .await?;

        // Row lock so concurrent approvals for the same claimant serialize
        let row = sqlx::query(
            r#"
            SELECT total_points, streak_days, last_completion_date, level
            FROM profiles
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(params.claimant_id)
        .fetch_one(&mut *tx)
        .await?;

        let current = ProfileProgress {
            total_points: row.get("total_points"),
            streak_days: row.get("streak_days"),
            last_completion_date: row.get("last_completion_date"),
            level: row.get("level"),
        };
        let progress = apply_completion(
            current,
            params.points_awarded,
            params.approved_at.date_naive(),
        );

        sqlx::query(
            r#"
            UPDATE profiles
            SET total_points = $2, streak_days = $3, last_completion_date = $4,
                level = $5, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(params.claimant_id)
        .bind(progress.total_points)
        .bind(progress.streak_days)
        .bind(progress.last_completion_date)
        .bind(progress.level)
        .execute(&mut *tx)
        .await?;

        insert_notification(&mut tx, &params.notification).await?;

        if progress.leveled_up {
            let level_up = NewNotification {
                profile_id: params.claimant_id,
                kind: crate::entities::NotificationKindDb::LevelUp,
                title: "Level up!".to_string(),
                body: format!("You reached level {}", progress.level),
                payload: serde_json::json!({ "level": progress.level }),
            };
            insert_notification(&mut tx, &level_up).await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(Some(instance))
    }

    /// Finalize a rejection: flip the instance, record the decision and
    /// queue the claimant's notification in one transaction.
    ///
    /// Returns None when the instance was not in the submitted status.
    pub async fn finalize_rejection(
        &self,
        params: RejectionFinalization,
    ) -> Result<Option<ChoreInstanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("finalize_rejection");
        let mut tx = self.pool.begin().await?;

        let Some(instance) = sqlx::query_as::<_, ChoreInstanceEntity>(
            r#"
            UPDATE chore_instances
            SET status = 'rejected', updated_at = NOW()
            WHERE id = $1 AND status = 'submitted'
            RETURNING id, chore_id, family_id, title, description, type AS chore_type,
                      base_points, expected_duration_min, due_at, assignee_id, status,
                      claimed_by, claimed_at, completed_at, approved_at, approved_by,
                      cash_out_requested, minutes_reported, points_awarded, cash_cents,
                      proof_urls, notes, audit, created_at, updated_at
            "#,
        )
        .bind(params.instance_id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            timer.record();
            return Ok(None);
        };

        sqlx::query(
            r#"
            INSERT INTO approvals (instance_id, parent_id, action, reason)
            VALUES ($1, $2, 'rejected', $3)
            "#,
        )
        .bind(params.instance_id)
        .bind(params.parent_id)
        .bind(params.reason.as_deref())
        .execute(&mut *tx)
        .await?;

        insert_notification(&mut tx, &params.notification).await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(instance))
    }
}

async fn insert_notification(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    notification: &NewNotification,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO notifications (profile_id, type, title, body, payload)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(notification.profile_id)
    .bind(notification.kind)
    .bind(&notification.title)
    .bind(&notification.body)
    .bind(&notification.payload)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_chore_instance_repository_new() {
        // This is a structural test - we can't test actual database operations without a test DB
    }
}
