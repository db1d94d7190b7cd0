//! Notification repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{NewNotification, NotificationEntity};
use crate::metrics::QueryTimer;

/// Repository for notification database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one notification.
    pub async fn insert(
        &self,
        notification: &NewNotification,
    ) -> Result<NotificationEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_notification");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            INSERT INTO notifications (profile_id, type, title, body, payload)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, profile_id, type AS kind, title, body, payload, read, created_at
            "#,
        )
        .bind(notification.profile_id)
        .bind(notification.kind)
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(&notification.payload)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a batch of notifications in one transaction.
    pub async fn insert_many(
        &self,
        notifications: &[NewNotification],
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("insert_notifications");
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;
        for notification in notifications {
            let result = sqlx::query(
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
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;
        timer.record();
        Ok(inserted)
    }

    /// List a profile's notifications, newest first.
    pub async fn list_for_profile(
        &self,
        profile_id: Uuid,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_notifications_for_profile");
        let result = if unread_only {
            sqlx::query_as::<_, NotificationEntity>(
                r#"
                SELECT id, profile_id, type AS kind, title, body, payload, read, created_at
                FROM notifications
                WHERE profile_id = $1 AND read = FALSE
                ORDER BY created_at DESC
                LIMIT $2
                "#,
            )
            .bind(profile_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, NotificationEntity>(
                r#"
                SELECT id, profile_id, type AS kind, title, body, payload, read, created_at
                FROM notifications
                WHERE profile_id = $1
                ORDER BY created_at DESC
                LIMIT $2
                "#,
            )
            .bind(profile_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        };
        timer.record();
        result
    }

    /// Mark one notification as read.
    ///
    /// Scoped to the owning profile so one member cannot clear another's.
    pub async fn mark_read(
        &self,
        notification_id: Uuid,
        profile_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("mark_notification_read");
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read = TRUE
            WHERE id = $1 AND profile_id = $2
            "#,
        )
        .bind(notification_id)
        .bind(profile_id)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Mark all of a profile's notifications as read.
    pub async fn mark_all_read(&self, profile_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_all_notifications_read");
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read = TRUE
            WHERE profile_id = $1 AND read = FALSE
            "#,
        )
        .bind(profile_id)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected());
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_notification_repository_new() {
        // This is a structural test - we can't test actual database operations without a test DB
    }
}
