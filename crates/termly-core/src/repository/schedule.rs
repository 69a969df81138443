use crate::error::CoreError;
use crate::models::{DayOfWeek, Timetable};
use crate::repository::{RecordRepository, ScheduleRepository, ScheduledClass, SqliteRepository};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

#[async_trait]
impl ScheduleRepository for SqliteRepository {
    async fn class_times_on(&self, timetable_id: i64, date: NaiveDate) -> Result<Vec<ScheduledClass>, CoreError> {
        let timetable: Timetable = self.get(timetable_id).await?;
        if !timetable.is_active_on(date) {
            return Ok(Vec::new());
        }

        let week_number = timetable.week_number_on(date);
        let day = DayOfWeek::from(date.weekday());
        tracing::debug!(timetable_id, %date, week_number, %day, "loading schedule");

        let classes = sqlx::query_as(
            r#"SELECT
                ct.id AS class_time_id,
                c.id AS class_id,
                s.id AS subject_id,
                s.name AS subject_name,
                s.abbreviation,
                s.color_id,
                c.module_name,
                ct.day,
                ct.week_number,
                ct.start_time,
                ct.end_time,
                d.room,
                d.building,
                d.teacher
            FROM class_times ct
            INNER JOIN class_details d ON ct.class_detail_id = d.id
            INNER JOIN classes c ON d.class_id = c.id
            INNER JOIN subjects s ON c.subject_id = s.id
            WHERE s.timetable_id = ?
              AND ct.day = ?
              AND ct.week_number = ?
              AND c.start_date <= ?
              AND c.end_date >= ?
            ORDER BY ct.start_time, s.name, ct.id"#,
        )
        .bind(timetable_id)
        .bind(day)
        .bind(week_number)
        .bind(date)
        .bind(date)
        .fetch_all(self.pool())
        .await?;
        Ok(classes)
    }
}
