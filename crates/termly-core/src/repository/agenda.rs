use crate::agenda::{group_by_bucket, AgendaGroup};
use crate::error::CoreError;
use crate::models::{Assignment, Exam};
use crate::repository::{AgendaEntry, AgendaKind, AgendaRepository, SqliteRepository};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

#[async_trait]
impl AgendaRepository for SqliteRepository {
    async fn find_assignments_for_timetable(&self, timetable_id: i64) -> Result<Vec<Assignment>, CoreError> {
        let assignments = sqlx::query_as(
            r#"SELECT a.* FROM assignments a
            INNER JOIN classes c ON a.class_id = c.id
            INNER JOIN subjects s ON c.subject_id = s.id
            WHERE s.timetable_id = ?
            ORDER BY a.due_date, a.title"#,
        )
        .bind(timetable_id)
        .fetch_all(self.pool())
        .await?;
        Ok(assignments)
    }

    async fn find_exams_for_timetable(&self, timetable_id: i64) -> Result<Vec<Exam>, CoreError> {
        let exams = sqlx::query_as(
            r#"SELECT e.* FROM exams e
            INNER JOIN subjects s ON e.subject_id = s.id
            WHERE s.timetable_id = ?
            ORDER BY e.date, e.start_time"#,
        )
        .bind(timetable_id)
        .fetch_all(self.pool())
        .await?;
        Ok(exams)
    }

    async fn agenda(
        &self,
        timetable_id: i64,
        today: NaiveDate,
        include_completed: bool,
    ) -> Result<Vec<AgendaGroup<AgendaEntry>>, CoreError> {
        let mut entries = Vec::new();

        let assignments: Vec<(i64, String, NaiveDate, i64, String)> = sqlx::query_as(
            r#"SELECT a.id, a.title, a.due_date, a.completion_progress, s.name
            FROM assignments a
            INNER JOIN classes c ON a.class_id = c.id
            INNER JOIN subjects s ON c.subject_id = s.id
            WHERE s.timetable_id = ?"#,
        )
        .bind(timetable_id)
        .fetch_all(self.pool())
        .await?;
        entries.extend(
            assignments
                .into_iter()
                .filter(|(_, _, _, progress, _)| include_completed || *progress < 100)
                .map(|(id, title, date, progress, subject)| AgendaEntry {
                    kind: AgendaKind::Assignment,
                    id,
                    title,
                    date,
                    time: None,
                    subject_name: Some(subject),
                    progress: Some(progress),
                }),
        );

        let exams: Vec<(i64, Option<String>, NaiveDate, NaiveTime, bool, String)> = sqlx::query_as(
            r#"SELECT e.id, e.module_name, e.date, e.start_time, e.resit, s.name
            FROM exams e
            INNER JOIN subjects s ON e.subject_id = s.id
            WHERE s.timetable_id = ?"#,
        )
        .bind(timetable_id)
        .fetch_all(self.pool())
        .await?;
        entries.extend(exams.into_iter().map(|(id, module, date, time, resit, subject)| {
            let mut title = module.unwrap_or_else(|| subject.clone());
            if resit {
                title.push_str(" (resit)");
            }
            AgendaEntry {
                kind: AgendaKind::Exam,
                id,
                title,
                date,
                time: Some(time),
                subject_name: Some(subject),
                progress: None,
            }
        }));

        let events: Vec<(i64, String, NaiveDateTime, Option<String>)> = sqlx::query_as(
            r#"SELECT ev.id, ev.title, ev.start_date_time, s.name
            FROM events ev
            LEFT JOIN subjects s ON ev.subject_id = s.id
            WHERE ev.timetable_id = ?"#,
        )
        .bind(timetable_id)
        .fetch_all(self.pool())
        .await?;
        entries.extend(events.into_iter().map(|(id, title, starts_at, subject)| AgendaEntry {
            kind: AgendaKind::Event,
            id,
            title,
            date: starts_at.date(),
            time: Some(starts_at.time()),
            subject_name: subject,
            progress: None,
        }));

        tracing::debug!(timetable_id, entries = entries.len(), "building agenda");
        Ok(group_by_bucket(entries, today))
    }
}
