use crate::error::CoreError;
use crate::models::{Entity, EntityKind, ReminderKind};
use crate::query::Query;
use crate::repository::query_builder::SqlQueryBuilder;
use crate::repository::{DeletionSummary, RecordRepository, SqliteRepository};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use std::collections::VecDeque;

#[async_trait]
impl RecordRepository for SqliteRepository {
    async fn add<E: Entity>(&self, mut entity: E) -> Result<E, CoreError> {
        entity.validate()?;
        let mut tx = self.pool().begin().await?;

        let id = Self::next_id_in_transaction(&mut tx, E::KIND.table()).await?;
        entity.set_id(id);
        Self::insert_in_transaction(&mut tx, &entity).await?;

        tx.commit().await?;
        tracing::debug!(kind = %E::KIND, id, "added record");
        Ok(entity)
    }

    async fn find_by_id<E: Entity>(&self, id: i64) -> Result<Option<E>, CoreError> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", E::KIND.table());
        let entity = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(entity)
    }

    async fn get<E: Entity>(&self, id: i64) -> Result<E, CoreError> {
        self.find_by_id::<E>(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("{} {}", E::KIND, id)))
    }

    async fn find_all<E: Entity>(&self) -> Result<Vec<E>, CoreError> {
        let sql = format!("SELECT * FROM {} ORDER BY id", E::KIND.table());
        let entities = sqlx::query_as(&sql).fetch_all(self.pool()).await?;
        Ok(entities)
    }

    async fn find<E: Entity>(&self, query: &Query) -> Result<Vec<E>, CoreError> {
        let mut query_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT * FROM {} WHERE ", E::KIND.table()));
        SqlQueryBuilder::build_sql_where_clause(E::KIND, query.predicate(), &mut query_builder)?;
        query_builder.push(" ORDER BY id");

        let entities = query_builder
            .build_query_as::<E>()
            .fetch_all(self.pool())
            .await?;
        Ok(entities)
    }

    async fn replace<E: Entity>(&self, entity: E) -> Result<E, CoreError> {
        entity.validate()?;
        let mut tx = self.pool().begin().await?;

        let removed = Self::delete_row_in_transaction(&mut tx, E::KIND, entity.id()).await?;
        if removed == 0 {
            return Err(CoreError::NotFound(format!("{} {}", E::KIND, entity.id())));
        }
        if let Some(reminder_kind) = E::KIND.reminder_kind() {
            Self::cancel_reminders_in_transaction(&mut tx, reminder_kind, entity.id()).await?;
        }
        Self::insert_in_transaction(&mut tx, &entity).await?;

        tx.commit().await?;
        tracing::debug!(kind = %E::KIND, id = entity.id(), "replaced record");
        Ok(entity)
    }

    async fn delete(&self, kind: EntityKind, id: i64) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;

        let removed = Self::delete_row_in_transaction(&mut tx, kind, id).await?;
        if removed == 0 {
            return Err(CoreError::NotFound(format!("{} {}", kind, id)));
        }
        Self::clear_weak_references_in_transaction(&mut tx, kind, id).await?;
        if let Some(reminder_kind) = kind.reminder_kind() {
            Self::cancel_reminders_in_transaction(&mut tx, reminder_kind, id).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_with_references(
        &self,
        kind: EntityKind,
        id: i64,
    ) -> Result<DeletionSummary, CoreError> {
        let mut tx = self.pool().begin().await?;

        let doomed = Self::collect_subtree(&mut tx, kind, id).await?;
        let mut summary = DeletionSummary::default();

        // Children were queued after their parents, so walking backwards
        // removes every row before the row that owns it.
        for &(kind, id) in doomed.iter().rev() {
            summary.references_cleared +=
                Self::clear_weak_references_in_transaction(&mut tx, kind, id).await?;
            if let Some(reminder_kind) = kind.reminder_kind() {
                summary.reminders_cancelled +=
                    Self::cancel_reminders_in_transaction(&mut tx, reminder_kind, id).await?;
            }
            let removed = Self::delete_row_in_transaction(&mut tx, kind, id).await?;
            tracing::debug!(kind = %kind, id, removed, "cascade delete");
            summary.record(kind, removed);
        }

        tx.commit().await?;
        Ok(summary)
    }

    async fn next_id(&self, kind: EntityKind) -> Result<i64, CoreError> {
        let mut conn = self.pool().acquire().await?;
        Self::next_id_in_transaction(&mut conn, kind.table()).await
    }

    async fn count(&self, kind: EntityKind) -> Result<i64, CoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(self.pool()).await?;
        Ok(count)
    }
}

impl SqliteRepository {
    /// `max(id) + 1`, or 1 for an empty table.
    pub(crate) async fn next_id_in_transaction(
        conn: &mut SqliteConnection,
        table: &str,
    ) -> Result<i64, CoreError> {
        let sql = format!("SELECT COALESCE(MAX(id), 0) + 1 FROM {}", table);
        let id: i64 = sqlx::query_scalar(&sql).fetch_one(&mut *conn).await?;
        Ok(id)
    }

    async fn insert_in_transaction<E: Entity>(
        conn: &mut SqliteConnection,
        entity: &E,
    ) -> Result<(), CoreError> {
        let kind = E::KIND;
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "INSERT INTO {} ({}) ",
            kind.table(),
            kind.columns().join(", ")
        ));
        query_builder.push_values(std::iter::once(entity), |mut row, entity| {
            entity.bind_values(&mut row);
        });
        query_builder.build().execute(&mut *conn).await?;
        Ok(())
    }

    async fn delete_row_in_transaction(
        conn: &mut SqliteConnection,
        kind: EntityKind,
        id: i64,
    ) -> Result<u64, CoreError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", kind.table());
        let result = sqlx::query(&sql).bind(id).execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    /// Sets optional links to the row to `NULL`, returning how many were cleared.
    async fn clear_weak_references_in_transaction(
        conn: &mut SqliteConnection,
        kind: EntityKind,
        id: i64,
    ) -> Result<u64, CoreError> {
        let mut cleared = 0;
        for (referrer, column) in kind.weak_references() {
            let sql = format!(
                "UPDATE {} SET {} = NULL WHERE {} = ?",
                referrer.table(),
                column,
                column
            );
            let result = sqlx::query(&sql).bind(id).execute(&mut *conn).await?;
            cleared += result.rows_affected();
        }
        Ok(cleared)
    }

    pub(crate) async fn cancel_reminders_in_transaction(
        conn: &mut SqliteConnection,
        kind: ReminderKind,
        entity_id: i64,
    ) -> Result<u64, CoreError> {
        let result = sqlx::query("DELETE FROM reminders WHERE kind = ? AND entity_id = ?")
            .bind(kind)
            .bind(entity_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Breadth-first list of `(kind, id)` for the root and every row it owns,
    /// parents before children. Children are found by foreign key value, so
    /// rows left behind by an earlier single-row delete of the root are
    /// still reached.
    async fn collect_subtree(
        conn: &mut SqliteConnection,
        kind: EntityKind,
        id: i64,
    ) -> Result<Vec<(EntityKind, i64)>, CoreError> {
        let mut visited = Vec::new();
        let mut queue = VecDeque::from([(kind, id)]);
        while let Some((kind, id)) = queue.pop_front() {
            visited.push((kind, id));
            for (child, column) in kind.children() {
                let sql = format!(
                    "SELECT id FROM {} WHERE {} = ? ORDER BY id",
                    child.table(),
                    column
                );
                let child_ids: Vec<i64> = sqlx::query_scalar(&sql)
                    .bind(id)
                    .fetch_all(&mut *conn)
                    .await?;
                queue.extend(child_ids.into_iter().map(|child_id| (*child, child_id)));
            }
        }
        Ok(visited)
    }
}
