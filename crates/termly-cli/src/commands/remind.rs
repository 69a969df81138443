use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use owo_colors::{OwoColorize, Style};
use termly_core::models::{
    Assignment, Class, ClassDetail, ClassTime, Event, Exam, NewReminder, ReminderKind, Subject,
    Timetable,
};
use termly_core::repository::Repository;

use crate::cli::{RemindCommand, RemindersCommand};
use crate::config::Config;
use crate::parser::parse_date_time;
use crate::util::{date_context, now};
use crate::views::table::display_reminders;

const MINUTES_PER_WEEK: i64 = 7 * 24 * 60;

/// Default trigger, message and repeat interval for a reminder on an entity.
struct ReminderTarget {
    starts_at: NaiveDateTime,
    message: String,
    repeat_minutes: Option<i64>,
}

pub async fn add_reminder(repo: &impl Repository, command: RemindCommand, config: &Config) -> Result<()> {
    let ctx = date_context(config);
    let lead = lead_time(config.reminder_lead_minutes)?;
    let target = target_of(repo, command.kind, command.id, ctx.now, lead).await?;

    let trigger_at = match command.at {
        Some(at) => parse_date_time(&at, ctx.now, ctx.dialect)?,
        None => shift(target.starts_at, -lead)?,
    };

    let reminder = repo
        .schedule_reminder(NewReminder {
            kind: command.kind,
            entity_id: command.id,
            trigger_at,
            repeat_minutes: command.every.or(target.repeat_minutes),
            message: command.message.unwrap_or(target.message),
        })
        .await?;

    println!(
        "{} Reminder {} set for {}",
        "✓".style(Style::new().green().bold()),
        reminder.id.to_string().yellow(),
        reminder.trigger_at.format("%Y-%m-%d %H:%M").to_string().cyan()
    );
    if let Some(minutes) = reminder.repeat_minutes {
        println!("  {} repeats every {} minutes", "→".style(Style::new().blue()), minutes);
    }
    Ok(())
}

async fn target_of(
    repo: &impl Repository,
    kind: ReminderKind,
    id: i64,
    now: NaiveDateTime,
    lead: Duration,
) -> Result<ReminderTarget> {
    let target = match kind {
        ReminderKind::Exam => {
            let exam: Exam = repo.get(id).await?;
            let subject: Subject = repo.get(exam.subject_id).await?;
            ReminderTarget {
                starts_at: exam.starts_at(),
                message: format!("{} exam at {}", subject.name, exam.start_time.format("%H:%M")),
                repeat_minutes: None,
            }
        }
        ReminderKind::Event => {
            let event: Event = repo.get(id).await?;
            ReminderTarget {
                starts_at: event.start_date_time,
                message: format!("{} at {}", event.title, event.start_date_time.format("%H:%M")),
                repeat_minutes: None,
            }
        }
        ReminderKind::Assignment => {
            let assignment: Assignment = repo.get(id).await?;
            // The day before the due date, at nine, plus the configured lead.
            let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);
            ReminderTarget {
                starts_at: shift((assignment.due_date - Duration::days(1)).and_time(nine), lead)?,
                message: format!("'{}' is due {}", assignment.title, assignment.due_date),
                repeat_minutes: None,
            }
        }
        ReminderKind::Class => {
            let time: ClassTime = repo.get(id).await?;
            let detail: ClassDetail = repo.get(time.class_detail_id).await?;
            let class: Class = repo.get(detail.class_id).await?;
            let subject: Subject = repo.get(class.subject_id).await?;
            let timetable: Timetable = repo.get(subject.timetable_id).await?;

            let cycle_days = 7 * timetable.week_rotations.max(1);
            let starts_at = (0..=cycle_days)
                .map(|offset| now.date() + Duration::days(offset))
                .filter(|date| time.occurs_on(&timetable, *date))
                .map(|date| date.and_time(time.start_time))
                .find(|starts_at| starts_at.checked_sub_signed(lead).is_some_and(|at| at > now))
                .ok_or_else(|| anyhow!("Class time {} has no upcoming occurrence", id))?;

            ReminderTarget {
                starts_at,
                message: format!(
                    "{} at {}{}",
                    subject.name,
                    time.start_time.format("%H:%M"),
                    detail.room.map(|room| format!(" in {}", room)).unwrap_or_default()
                ),
                repeat_minutes: Some(MINUTES_PER_WEEK * timetable.week_rotations.max(1)),
            }
        }
    };
    Ok(target)
}

/// The configured lead as a duration, rejecting values chrono cannot represent.
fn lead_time(minutes: i64) -> Result<Duration> {
    Duration::try_minutes(minutes)
        .ok_or_else(|| anyhow!("reminder_lead_minutes of {} is out of range", minutes))
}

fn shift(at: NaiveDateTime, by: Duration) -> Result<NaiveDateTime> {
    at.checked_add_signed(by)
        .ok_or_else(|| anyhow!("Reminder time {} moved by {} is out of range", at, by))
}

pub async fn manage_reminders(repo: &impl Repository, command: RemindersCommand) -> Result<()> {
    let now = now();

    if let Some(id) = command.ack {
        match repo.acknowledge_reminder(id).await? {
            Some(next) => println!(
                "Reminder {} acknowledged, next at {}",
                id,
                next.trigger_at.format("%Y-%m-%d %H:%M")
            ),
            None => println!("Reminder {} dismissed", id),
        }
        return Ok(());
    }

    let reminders = if command.due {
        repo.find_reminders_due(now).await?
    } else {
        repo.find_reminders().await?
    };
    display_reminders(&reminders, now);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, 2)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    #[test]
    fn test_lead_time_shifts_trigger() {
        let lead = lead_time(15).unwrap();
        assert_eq!(shift(at(9, 0), -lead).unwrap(), at(8, 45));
        assert_eq!(shift(at(9, 0), lead).unwrap(), at(9, 15));
    }

    #[test]
    fn test_out_of_range_lead_is_an_error() {
        assert!(lead_time(i64::MAX / 2).is_err());

        let lead = lead_time(i64::MAX / 60_000_000).unwrap();
        assert!(shift(at(9, 0), lead).is_err());
        assert!(shift(at(9, 0), -lead).is_err());
    }
}
