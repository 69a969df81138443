//! # Termly Core Library
//!
//! Storage and scheduling logic for a student's timetable: subjects, terms,
//! classes and their weekly times, assignments, exams and events.
//!
//! ## Features
//!
//! - **Parameterized Filters**: predicates are values bound as SQL parameters,
//!   never concatenated strings, and can be evaluated in memory as well
//! - **Ownership-Aware Deletion**: deleting a timetable, subject, class or
//!   class detail removes everything it owns in one transaction
//! - **Agenda Buckets**: dated items grouped under Overdue, Today, Tomorrow,
//!   This Week, Next Week, This Month and Later
//! - **Week Rotation**: timetables that alternate between up to four weekly
//!   layouts
//! - **Reminders**: reminders stored alongside the rows they refer to and
//!   cancelled when those rows go away
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Entities, entity kinds and the ownership tree
//! - [`query`]: Predicates and the query builder
//! - [`repository`]: Data access layer with Repository pattern
//! - [`agenda`]: Date-bucket classification
//! - [`schedule`]: Week rotation
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use termly_core::{
//!     db,
//!     models::{EntityKind, Subject, Timetable},
//!     query::Predicate,
//!     repository::{RecordRepository, SqliteRepository},
//! };
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::establish_connection("termly.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!
//!     let timetable = repo
//!         .add(Timetable {
//!             id: 0,
//!             name: "Year 2".to_string(),
//!             start_date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
//!             end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
//!             week_rotations: 2,
//!         })
//!         .await?;
//!
//!     let subjects: Vec<Subject> = repo
//!         .find(&Predicate::equal("timetable_id", timetable.id).into())
//!         .await?;
//!     println!("{} has {} subjects", timetable.name, subjects.len());
//!
//!     let summary = repo
//!         .delete_with_references(EntityKind::Timetable, timetable.id)
//!         .await?;
//!     println!("removed {} rows", summary.total());
//!     Ok(())
//! }
//! ```

pub mod agenda;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod repository;
pub mod schedule;
