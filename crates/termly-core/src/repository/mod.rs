use crate::agenda::{AgendaGroup, Dated};
use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    Assignment, DayOfWeek, Entity, EntityKind, Exam, NewReminder, Reminder, ReminderKind,
};
use crate::query::Query;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use std::fmt;

pub mod agenda;
pub mod query_builder;
pub mod records;
pub mod reminders;
pub mod schedule;

// Traits are defined in this module and implemented in respective domain modules

/// Rows removed by [`RecordRepository::delete_with_references`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionSummary {
    pub removed: BTreeMap<EntityKind, u64>,
    /// Optional references (such as an event's subject) set to `NULL`.
    pub references_cleared: u64,
    pub reminders_cancelled: u64,
}

impl DeletionSummary {
    pub fn removed(&self, kind: EntityKind) -> u64 {
        self.removed.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.removed.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub(crate) fn record(&mut self, kind: EntityKind, rows: u64) {
        if rows > 0 {
            *self.removed.entry(kind).or_insert(0) += rows;
        }
    }
}

impl fmt::Display for DeletionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "nothing removed");
        }
        let parts: Vec<String> = self
            .removed
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind))
            .collect();
        write!(f, "removed {}", parts.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AgendaKind {
    Assignment,
    Exam,
    Event,
}

impl AgendaKind {
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            AgendaKind::Assignment => EntityKind::Assignment,
            AgendaKind::Exam => EntityKind::Exam,
            AgendaKind::Event => EntityKind::Event,
        }
    }
}

/// One line of the agenda: an assignment, exam or event of a timetable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaEntry {
    pub kind: AgendaKind,
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub subject_name: Option<String>,
    /// Completion percentage, assignments only.
    pub progress: Option<i64>,
}

impl Dated for AgendaEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// A class time resolved against its detail, class and subject.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ScheduledClass {
    pub class_time_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub subject_name: String,
    pub abbreviation: Option<String>,
    pub color_id: i64,
    pub module_name: Option<String>,
    pub day: DayOfWeek,
    pub week_number: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: Option<String>,
    pub building: Option<String>,
    pub teacher: Option<String>,
}

/// CRUD and cascade deletion for every entity kind
#[async_trait]
pub trait RecordRepository {
    /// Inserts `entity` under the next free id and returns it with that id.
    async fn add<E: Entity>(&self, entity: E) -> Result<E, CoreError>;
    async fn find_by_id<E: Entity>(&self, id: i64) -> Result<Option<E>, CoreError>;
    /// Like [`find_by_id`](Self::find_by_id), with a missing row reported as `NotFound`.
    async fn get<E: Entity>(&self, id: i64) -> Result<E, CoreError>;
    async fn find_all<E: Entity>(&self) -> Result<Vec<E>, CoreError>;
    async fn find<E: Entity>(&self, query: &Query) -> Result<Vec<E>, CoreError>;
    /// Deletes the row with `entity.id()` and inserts `entity` in its place.
    async fn replace<E: Entity>(&self, entity: E) -> Result<E, CoreError>;
    /// Deletes a single row without touching its descendants.
    async fn delete(&self, kind: EntityKind, id: i64) -> Result<(), CoreError>;
    /// Deletes a row and everything it owns. Deleting a missing row is a no-op.
    async fn delete_with_references(
        &self,
        kind: EntityKind,
        id: i64,
    ) -> Result<DeletionSummary, CoreError>;
    async fn next_id(&self, kind: EntityKind) -> Result<i64, CoreError>;
    async fn count(&self, kind: EntityKind) -> Result<i64, CoreError>;
}

/// Dated items of a timetable
#[async_trait]
pub trait AgendaRepository {
    async fn find_assignments_for_timetable(&self, timetable_id: i64) -> Result<Vec<Assignment>, CoreError>;
    async fn find_exams_for_timetable(&self, timetable_id: i64) -> Result<Vec<Exam>, CoreError>;
    async fn agenda(
        &self,
        timetable_id: i64,
        today: NaiveDate,
        include_completed: bool,
    ) -> Result<Vec<AgendaGroup<AgendaEntry>>, CoreError>;
}

/// Per-day view of a timetable's class times
#[async_trait]
pub trait ScheduleRepository {
    async fn class_times_on(&self, timetable_id: i64, date: NaiveDate) -> Result<Vec<ScheduledClass>, CoreError>;
}

#[async_trait]
pub trait ReminderRepository {
    async fn schedule_reminder(&self, reminder: NewReminder) -> Result<Reminder, CoreError>;
    async fn cancel_reminders(&self, kind: ReminderKind, entity_id: i64) -> Result<u64, CoreError>;
    async fn find_reminders(&self) -> Result<Vec<Reminder>, CoreError>;
    async fn find_reminders_for(&self, kind: ReminderKind, entity_id: i64) -> Result<Vec<Reminder>, CoreError>;
    async fn find_reminders_due(&self, until: NaiveDateTime) -> Result<Vec<Reminder>, CoreError>;
    /// Marks a reminder as fired. Repeating reminders move to their next
    /// trigger and are returned; one-shot reminders are removed.
    async fn acknowledge_reminder(&self, id: i64) -> Result<Option<Reminder>, CoreError>;
}

/// Main repository trait that composes all domain traits
pub trait Repository:
    RecordRepository +
    AgendaRepository +
    ScheduleRepository +
    ReminderRepository
{
}

/// SQLite implementation of the repository pattern
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_and_display() {
        let mut summary = DeletionSummary::default();
        assert!(summary.is_empty());
        assert_eq!(summary.to_string(), "nothing removed");

        summary.record(EntityKind::Subject, 1);
        summary.record(EntityKind::Class, 2);
        summary.record(EntityKind::Class, 1);
        summary.record(EntityKind::Exam, 0);

        assert_eq!(summary.removed(EntityKind::Class), 3);
        assert_eq!(summary.removed(EntityKind::Exam), 0);
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.to_string(), "removed 1 subject, 3 class");
    }
}
