use crate::error::CoreError;
use crate::models::{NewReminder, Reminder, ReminderKind};
use crate::repository::{ReminderRepository, SqliteRepository};
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};

#[async_trait]
impl ReminderRepository for SqliteRepository {
    async fn schedule_reminder(&self, reminder: NewReminder) -> Result<Reminder, CoreError> {
        if let Some(minutes) = reminder.repeat_minutes {
            if minutes <= 0 {
                return Err(CoreError::InvalidInput(
                    "Reminder repeat interval must be a positive number of minutes".to_string(),
                ));
            }
            next_trigger(reminder.trigger_at, minutes)?;
        }

        let mut tx = self.pool().begin().await?;

        let target = reminder.kind.entity_kind();
        let sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?", target.table());
        let exists: i64 = sqlx::query_scalar(&sql)
            .bind(reminder.entity_id)
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(CoreError::NotFound(format!("{} {}", target, reminder.entity_id)));
        }

        let id = Self::next_id_in_transaction(&mut tx, "reminders").await?;
        let created = sqlx::query_as(
            r#"INSERT INTO reminders (id, kind, entity_id, trigger_at, repeat_minutes, message)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *"#,
        )
        .bind(id)
        .bind(reminder.kind)
        .bind(reminder.entity_id)
        .bind(reminder.trigger_at)
        .bind(reminder.repeat_minutes)
        .bind(reminder.message)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn cancel_reminders(&self, kind: ReminderKind, entity_id: i64) -> Result<u64, CoreError> {
        let mut conn = self.pool().acquire().await?;
        Self::cancel_reminders_in_transaction(&mut conn, kind, entity_id).await
    }

    async fn find_reminders(&self) -> Result<Vec<Reminder>, CoreError> {
        let reminders = sqlx::query_as("SELECT * FROM reminders ORDER BY trigger_at, id")
            .fetch_all(self.pool())
            .await?;
        Ok(reminders)
    }

    async fn find_reminders_for(&self, kind: ReminderKind, entity_id: i64) -> Result<Vec<Reminder>, CoreError> {
        let reminders = sqlx::query_as(
            "SELECT * FROM reminders WHERE kind = ? AND entity_id = ? ORDER BY trigger_at, id",
        )
        .bind(kind)
        .bind(entity_id)
        .fetch_all(self.pool())
        .await?;
        Ok(reminders)
    }

    async fn find_reminders_due(&self, until: NaiveDateTime) -> Result<Vec<Reminder>, CoreError> {
        let reminders = sqlx::query_as(
            "SELECT * FROM reminders WHERE trigger_at <= ? ORDER BY trigger_at, id",
        )
        .bind(until)
        .fetch_all(self.pool())
        .await?;
        Ok(reminders)
    }

    async fn acknowledge_reminder(&self, id: i64) -> Result<Option<Reminder>, CoreError> {
        let mut tx = self.pool().begin().await?;

        let reminder: Reminder = sqlx::query_as("SELECT * FROM reminders WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("reminder {}", id)))?;

        let next = match reminder.repeat_minutes {
            Some(minutes) => {
                let trigger_at = next_trigger(reminder.trigger_at, minutes)?;
                sqlx::query("UPDATE reminders SET trigger_at = ? WHERE id = ?")
                    .bind(trigger_at)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                Some(Reminder {
                    trigger_at,
                    ..reminder
                })
            }
            None => {
                sqlx::query("DELETE FROM reminders WHERE id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                None
            }
        };

        tx.commit().await?;
        Ok(next)
    }
}

/// `trigger_at` moved forward by `minutes`, rejecting intervals chrono cannot represent.
fn next_trigger(trigger_at: NaiveDateTime, minutes: i64) -> Result<NaiveDateTime, CoreError> {
    Duration::try_minutes(minutes)
        .and_then(|interval| trigger_at.checked_add_signed(interval))
        .ok_or_else(|| {
            CoreError::InvalidInput(format!(
                "Reminder repeat interval of {} minutes is out of range",
                minutes
            ))
        })
}
