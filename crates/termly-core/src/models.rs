use crate::error::CoreError;
use crate::query::{Record, Value};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::query_builder::Separated;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Sqlite};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest week rotation a timetable may declare.
pub const MAX_WEEK_ROTATIONS: i64 = 4;

// ============================================================================
// Entity kinds and the ownership tree
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Timetable,
    Subject,
    Term,
    Class,
    ClassDetail,
    ClassTime,
    Assignment,
    Exam,
    Event,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Timetable,
        EntityKind::Subject,
        EntityKind::Term,
        EntityKind::Class,
        EntityKind::ClassDetail,
        EntityKind::ClassTime,
        EntityKind::Assignment,
        EntityKind::Exam,
        EntityKind::Event,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Timetable => "timetables",
            EntityKind::Subject => "subjects",
            EntityKind::Term => "terms",
            EntityKind::Class => "classes",
            EntityKind::ClassDetail => "class_details",
            EntityKind::ClassTime => "class_times",
            EntityKind::Assignment => "assignments",
            EntityKind::Exam => "exams",
            EntityKind::Event => "events",
        }
    }

    /// Column names in insert order. `id` is always first.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Timetable => &["id", "name", "start_date", "end_date", "week_rotations"],
            EntityKind::Subject => &["id", "timetable_id", "name", "abbreviation", "color_id"],
            EntityKind::Term => &["id", "timetable_id", "name", "start_date", "end_date"],
            EntityKind::Class => &["id", "subject_id", "module_name", "start_date", "end_date"],
            EntityKind::ClassDetail => &["id", "class_id", "room", "building", "teacher"],
            EntityKind::ClassTime => &[
                "id",
                "class_detail_id",
                "day",
                "week_number",
                "start_time",
                "end_time",
            ],
            EntityKind::Assignment => &[
                "id",
                "class_id",
                "title",
                "detail",
                "due_date",
                "completion_progress",
            ],
            EntityKind::Exam => &[
                "id",
                "subject_id",
                "module_name",
                "date",
                "start_time",
                "duration",
                "seat",
                "room",
                "resit",
            ],
            EntityKind::Event => &[
                "id",
                "timetable_id",
                "title",
                "detail",
                "start_date_time",
                "end_date_time",
                "location",
                "subject_id",
            ],
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns().contains(&name)
    }

    /// Owned children as `(child kind, foreign key column on the child)`.
    pub fn children(&self) -> &'static [(EntityKind, &'static str)] {
        match self {
            EntityKind::Timetable => &[
                (EntityKind::Subject, "timetable_id"),
                (EntityKind::Term, "timetable_id"),
                (EntityKind::Event, "timetable_id"),
            ],
            EntityKind::Subject => &[
                (EntityKind::Class, "subject_id"),
                (EntityKind::Exam, "subject_id"),
            ],
            EntityKind::Class => &[
                (EntityKind::ClassDetail, "class_id"),
                (EntityKind::Assignment, "class_id"),
            ],
            EntityKind::ClassDetail => &[(EntityKind::ClassTime, "class_detail_id")],
            EntityKind::Term
            | EntityKind::ClassTime
            | EntityKind::Assignment
            | EntityKind::Exam
            | EntityKind::Event => &[],
        }
    }

    /// Non-owning references to this kind, cleared instead of deleted.
    pub fn weak_references(&self) -> &'static [(EntityKind, &'static str)] {
        match self {
            EntityKind::Subject => &[(EntityKind::Event, "subject_id")],
            _ => &[],
        }
    }

    /// The owning parent as `(parent kind, foreign key column on self)`.
    pub fn parent(&self) -> Option<(EntityKind, &'static str)> {
        EntityKind::ALL.iter().find_map(|kind| {
            kind.children()
                .iter()
                .find(|(child, _)| child == self)
                .map(|(_, fk)| (*kind, *fk))
        })
    }

    pub fn reminder_kind(&self) -> Option<ReminderKind> {
        match self {
            EntityKind::ClassTime => Some(ReminderKind::Class),
            EntityKind::Assignment => Some(ReminderKind::Assignment),
            EntityKind::Exam => Some(ReminderKind::Exam),
            EntityKind::Event => Some(ReminderKind::Event),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Timetable => "timetable",
            EntityKind::Subject => "subject",
            EntityKind::Term => "term",
            EntityKind::Class => "class",
            EntityKind::ClassDetail => "class-detail",
            EntityKind::ClassTime => "class-time",
            EntityKind::Assignment => "assignment",
            EntityKind::Exam => "exam",
            EntityKind::Event => "event",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid entity kind: {0}")]
pub struct ParseEntityKindError(String);

impl FromStr for EntityKind {
    type Err = ParseEntityKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('_', "-");
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseEntityKindError(s.to_string()))
    }
}

/// A persisted row of one of the nine entity tables.
pub trait Entity:
    Record + for<'r> FromRow<'r, SqliteRow> + Serialize + Clone + fmt::Debug + Send + Sync + Unpin + 'static
{
    const KIND: EntityKind;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// Checks domain invariants before the row is written.
    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }

    /// Pushes one bind per entry of [`EntityKind::columns`], in the same order.
    fn bind_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>);
}

fn require_non_empty(what: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidInput(format!("{} must not be empty", what)));
    }
    Ok(())
}

fn require_ordered<T: PartialOrd + fmt::Display>(what: &str, start: T, end: T) -> Result<(), CoreError> {
    if start > end {
        return Err(CoreError::InvalidInput(format!(
            "{} starts ({}) after it ends ({})",
            what, start, end
        )));
    }
    Ok(())
}

// ============================================================================
// Day of week / reminder kind
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
            DayOfWeek::Sunday => Weekday::Sun,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid day of week: {0}")]
pub struct ParseDayOfWeekError(String);

impl FromStr for DayOfWeek {
    type Err = ParseDayOfWeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Weekday>()
            .map(DayOfWeek::from)
            .map_err(|_| ParseDayOfWeekError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    /// Keyed by class-time id.
    Class,
    Exam,
    Assignment,
    Event,
}

impl ReminderKind {
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            ReminderKind::Class => EntityKind::ClassTime,
            ReminderKind::Exam => EntityKind::Exam,
            ReminderKind::Assignment => EntityKind::Assignment,
            ReminderKind::Event => EntityKind::Event,
        }
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReminderKind::Class => "class",
            ReminderKind::Exam => "exam",
            ReminderKind::Assignment => "assignment",
            ReminderKind::Event => "event",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid reminder kind: {0}")]
pub struct ParseReminderKindError(String);

impl FromStr for ReminderKind {
    type Err = ParseReminderKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "class" => Ok(ReminderKind::Class),
            "exam" => Ok(ReminderKind::Exam),
            "assignment" => Ok(ReminderKind::Assignment),
            "event" => Ok(ReminderKind::Event),
            _ => Err(ParseReminderKindError(s.to_string())),
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Timetable {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Number of distinct weeks in the rotation (1 = every week is the same).
    pub week_rotations: i64,
}

impl Record for Timetable {
    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.into(),
            "name" => self.name.clone().into(),
            "start_date" => self.start_date.into(),
            "end_date" => self.end_date.into(),
            "week_rotations" => self.week_rotations.into(),
            _ => return None,
        })
    }
}

impl Entity for Timetable {
    const KIND: EntityKind = EntityKind::Timetable;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("Timetable name", &self.name)?;
        require_ordered("Timetable", self.start_date, self.end_date)?;
        if !(1..=MAX_WEEK_ROTATIONS).contains(&self.week_rotations) {
            return Err(CoreError::InvalidInput(format!(
                "Week rotations must be between 1 and {}, got {}",
                MAX_WEEK_ROTATIONS, self.week_rotations
            )));
        }
        Ok(())
    }

    fn bind_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.name.clone())
            .push_bind(self.start_date)
            .push_bind(self.end_date)
            .push_bind(self.week_rotations);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: i64,
    pub timetable_id: i64,
    pub name: String,
    pub abbreviation: Option<String>,
    pub color_id: i64,
}

impl Record for Subject {
    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.into(),
            "timetable_id" => self.timetable_id.into(),
            "name" => self.name.clone().into(),
            "abbreviation" => self.abbreviation.clone().into(),
            "color_id" => self.color_id.into(),
            _ => return None,
        })
    }
}

impl Entity for Subject {
    const KIND: EntityKind = EntityKind::Subject;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("Subject name", &self.name)
    }

    fn bind_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.timetable_id)
            .push_bind(self.name.clone())
            .push_bind(self.abbreviation.clone())
            .push_bind(self.color_id);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Term {
    pub id: i64,
    pub timetable_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Term {
    /// Builds a term, rejecting one that ends before it starts.
    pub fn new(
        timetable_id: i64,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, CoreError> {
        let term = Self {
            id: 0,
            timetable_id,
            name: name.into(),
            start_date,
            end_date,
        };
        term.validate()?;
        Ok(term)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

impl Record for Term {
    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.into(),
            "timetable_id" => self.timetable_id.into(),
            "name" => self.name.clone().into(),
            "start_date" => self.start_date.into(),
            "end_date" => self.end_date.into(),
            _ => return None,
        })
    }
}

impl Entity for Term {
    const KIND: EntityKind = EntityKind::Term;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("Term name", &self.name)?;
        require_ordered("Term", self.start_date, self.end_date)
    }

    fn bind_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.timetable_id)
            .push_bind(self.name.clone())
            .push_bind(self.start_date)
            .push_bind(self.end_date);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Class {
    pub id: i64,
    pub subject_id: i64,
    pub module_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Class {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

impl Record for Class {
    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.into(),
            "subject_id" => self.subject_id.into(),
            "module_name" => self.module_name.clone().into(),
            "start_date" => self.start_date.into(),
            "end_date" => self.end_date.into(),
            _ => return None,
        })
    }
}

impl Entity for Class {
    const KIND: EntityKind = EntityKind::Class;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_ordered("Class", self.start_date, self.end_date)
    }

    fn bind_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.subject_id)
            .push_bind(self.module_name.clone())
            .push_bind(self.start_date)
            .push_bind(self.end_date);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ClassDetail {
    pub id: i64,
    pub class_id: i64,
    pub room: Option<String>,
    pub building: Option<String>,
    pub teacher: Option<String>,
}

impl Record for ClassDetail {
    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.into(),
            "class_id" => self.class_id.into(),
            "room" => self.room.clone().into(),
            "building" => self.building.clone().into(),
            "teacher" => self.teacher.clone().into(),
            _ => return None,
        })
    }
}

impl Entity for ClassDetail {
    const KIND: EntityKind = EntityKind::ClassDetail;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn bind_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.class_id)
            .push_bind(self.room.clone())
            .push_bind(self.building.clone())
            .push_bind(self.teacher.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ClassTime {
    pub id: i64,
    pub class_detail_id: i64,
    pub day: DayOfWeek,
    /// Which week of the timetable's rotation this time belongs to, starting at 1.
    pub week_number: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Record for ClassTime {
    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.into(),
            "class_detail_id" => self.class_detail_id.into(),
            "day" => self.day.as_str().into(),
            "week_number" => self.week_number.into(),
            "start_time" => self.start_time.into(),
            "end_time" => self.end_time.into(),
            _ => return None,
        })
    }
}

impl Entity for ClassTime {
    const KIND: EntityKind = EntityKind::ClassTime;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.start_time >= self.end_time {
            return Err(CoreError::InvalidInput(format!(
                "Class time must end after it starts ({} - {})",
                self.start_time.format("%H:%M"),
                self.end_time.format("%H:%M")
            )));
        }
        if !(1..=MAX_WEEK_ROTATIONS).contains(&self.week_number) {
            return Err(CoreError::InvalidInput(format!(
                "Week number must be between 1 and {}, got {}",
                MAX_WEEK_ROTATIONS, self.week_number
            )));
        }
        Ok(())
    }

    fn bind_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.class_detail_id)
            .push_bind(self.day)
            .push_bind(self.week_number)
            .push_bind(self.start_time)
            .push_bind(self.end_time);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: i64,
    pub class_id: i64,
    pub title: String,
    pub detail: Option<String>,
    pub due_date: NaiveDate,
    /// Percentage complete, 0 to 100.
    pub completion_progress: i64,
}

impl Assignment {
    pub fn is_complete(&self) -> bool {
        self.completion_progress >= 100
    }
}

impl Record for Assignment {
    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.into(),
            "class_id" => self.class_id.into(),
            "title" => self.title.clone().into(),
            "detail" => self.detail.clone().into(),
            "due_date" => self.due_date.into(),
            "completion_progress" => self.completion_progress.into(),
            _ => return None,
        })
    }
}

impl Entity for Assignment {
    const KIND: EntityKind = EntityKind::Assignment;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("Assignment title", &self.title)?;
        if !(0..=100).contains(&self.completion_progress) {
            return Err(CoreError::InvalidInput(format!(
                "Completion progress must be between 0 and 100, got {}",
                self.completion_progress
            )));
        }
        Ok(())
    }

    fn bind_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.class_id)
            .push_bind(self.title.clone())
            .push_bind(self.detail.clone())
            .push_bind(self.due_date)
            .push_bind(self.completion_progress);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Exam {
    pub id: i64,
    pub subject_id: i64,
    pub module_name: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    /// Length in minutes.
    pub duration: i64,
    pub seat: Option<String>,
    pub room: Option<String>,
    pub resit: bool,
}

impl Exam {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }
}

impl Record for Exam {
    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.into(),
            "subject_id" => self.subject_id.into(),
            "module_name" => self.module_name.clone().into(),
            "date" => self.date.into(),
            "start_time" => self.start_time.into(),
            "duration" => self.duration.into(),
            "seat" => self.seat.clone().into(),
            "room" => self.room.clone().into(),
            "resit" => self.resit.into(),
            _ => return None,
        })
    }
}

impl Entity for Exam {
    const KIND: EntityKind = EntityKind::Exam;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.duration <= 0 {
            return Err(CoreError::InvalidInput(format!(
                "Exam duration must be positive, got {} minutes",
                self.duration
            )));
        }
        Ok(())
    }

    fn bind_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.subject_id)
            .push_bind(self.module_name.clone())
            .push_bind(self.date)
            .push_bind(self.start_time)
            .push_bind(self.duration)
            .push_bind(self.seat.clone())
            .push_bind(self.room.clone())
            .push_bind(self.resit);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub timetable_id: i64,
    pub title: String,
    pub detail: Option<String>,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
    pub location: Option<String>,
    /// Optional, non-owning link to a subject of the same timetable.
    pub subject_id: Option<i64>,
}

impl Record for Event {
    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.into(),
            "timetable_id" => self.timetable_id.into(),
            "title" => self.title.clone().into(),
            "detail" => self.detail.clone().into(),
            "start_date_time" => self.start_date_time.into(),
            "end_date_time" => self.end_date_time.into(),
            "location" => self.location.clone().into(),
            "subject_id" => self.subject_id.into(),
            _ => return None,
        })
    }
}

impl Entity for Event {
    const KIND: EntityKind = EntityKind::Event;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("Event title", &self.title)?;
        require_ordered("Event", self.start_date_time, self.end_date_time)
    }

    fn bind_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.timetable_id)
            .push_bind(self.title.clone())
            .push_bind(self.detail.clone())
            .push_bind(self.start_date_time)
            .push_bind(self.end_date_time)
            .push_bind(self.location.clone())
            .push_bind(self.subject_id);
    }
}

// ============================================================================
// Reminders
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    pub id: i64,
    pub kind: ReminderKind,
    pub entity_id: i64,
    pub trigger_at: NaiveDateTime,
    /// When set, the reminder fires again this many minutes after each trigger.
    pub repeat_minutes: Option<i64>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct NewReminder {
    pub kind: ReminderKind,
    pub entity_id: i64,
    pub trigger_at: NaiveDateTime,
    pub repeat_minutes: Option<i64>,
    pub message: String,
}
