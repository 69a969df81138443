use anyhow::Result;
use chrono::Duration;
use owo_colors::{OwoColorize, Style};
use termly_core::models::{
    Assignment, Class, ClassDetail, ClassTime, Entity, Event, Exam, Subject, Term, Timetable,
};
use termly_core::repository::Repository;

use crate::cli::{
    AddAssignmentCommand, AddClassCommand, AddCommand, AddDetailCommand, AddEventCommand,
    AddExamCommand, AddSubcommand, AddSubjectCommand, AddTermCommand, AddTimeCommand,
    AddTimetableCommand,
};
use crate::config::Config;
use crate::parser::{parse_date, parse_date_time, parse_time};
use crate::util::{date_context, resolve_timetable_id};

pub async fn add_record(
    repo: &impl Repository,
    command: AddCommand,
    timetable: Option<i64>,
    config: &Config,
) -> Result<()> {
    match command.command {
        AddSubcommand::Timetable(command) => add_timetable(repo, command, config).await,
        AddSubcommand::Subject(command) => add_subject(repo, command, timetable, config).await,
        AddSubcommand::Term(command) => add_term(repo, command, timetable, config).await,
        AddSubcommand::Class(command) => add_class(repo, command, config).await,
        AddSubcommand::Detail(command) => add_detail(repo, command).await,
        AddSubcommand::Time(command) => add_time(repo, command).await,
        AddSubcommand::Assignment(command) => add_assignment(repo, command, config).await,
        AddSubcommand::Exam(command) => add_exam(repo, command, config).await,
        AddSubcommand::Event(command) => add_event(repo, command, timetable, config).await,
    }
}

fn report<E: Entity>(entity: &E, label: &str) {
    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    println!(
        "{} Added {}: {}",
        "✓".style(success_style),
        E::KIND,
        label.bright_white().bold()
    );
    println!(
        "  {} ID: {}",
        "→".style(info_style),
        entity.id().to_string().yellow()
    );
}

async fn add_timetable(
    repo: &impl Repository,
    command: AddTimetableCommand,
    config: &Config,
) -> Result<()> {
    let ctx = date_context(config);
    let timetable = Timetable {
        id: 0,
        name: command.name,
        start_date: parse_date(&command.start, ctx.now, ctx.dialect)?,
        end_date: parse_date(&command.end, ctx.now, ctx.dialect)?,
        week_rotations: command.rotations,
    };
    let timetable = repo.add(timetable).await?;
    report(&timetable, &timetable.name);
    Ok(())
}

async fn add_subject(
    repo: &impl Repository,
    command: AddSubjectCommand,
    timetable: Option<i64>,
    config: &Config,
) -> Result<()> {
    let subject = Subject {
        id: 0,
        timetable_id: resolve_timetable_id(repo, timetable, config).await?,
        name: command.name,
        abbreviation: command.abbreviation,
        color_id: command.color,
    };
    let subject = repo.add(subject).await?;
    report(&subject, &subject.name);
    Ok(())
}

async fn add_term(
    repo: &impl Repository,
    command: AddTermCommand,
    timetable: Option<i64>,
    config: &Config,
) -> Result<()> {
    let ctx = date_context(config);
    let term = Term::new(
        resolve_timetable_id(repo, timetable, config).await?,
        command.name,
        parse_date(&command.start, ctx.now, ctx.dialect)?,
        parse_date(&command.end, ctx.now, ctx.dialect)?,
    )?;
    let term = repo.add(term).await?;
    report(&term, &term.name);
    Ok(())
}

async fn add_class(repo: &impl Repository, command: AddClassCommand, config: &Config) -> Result<()> {
    let ctx = date_context(config);
    let subject: Subject = repo.get(command.subject).await?;
    let timetable: Timetable = repo.get(subject.timetable_id).await?;

    let start_date = match command.start {
        Some(start) => parse_date(&start, ctx.now, ctx.dialect)?,
        None => timetable.start_date,
    };
    let end_date = match command.end {
        Some(end) => parse_date(&end, ctx.now, ctx.dialect)?,
        None => timetable.end_date,
    };

    let class = repo
        .add(Class {
            id: 0,
            subject_id: subject.id,
            module_name: command.module,
            start_date,
            end_date,
        })
        .await?;
    let label = class.module_name.clone().unwrap_or(subject.name);
    report(&class, &label);
    Ok(())
}

async fn add_detail(repo: &impl Repository, command: AddDetailCommand) -> Result<()> {
    let class: Class = repo.get(command.class).await?;
    let detail = repo
        .add(ClassDetail {
            id: 0,
            class_id: class.id,
            room: command.room,
            building: command.building,
            teacher: command.teacher,
        })
        .await?;
    let label = detail
        .room
        .clone()
        .or_else(|| detail.teacher.clone())
        .unwrap_or_else(|| format!("class {}", class.id));
    report(&detail, &label);
    Ok(())
}

async fn add_time(repo: &impl Repository, command: AddTimeCommand) -> Result<()> {
    let detail: ClassDetail = repo.get(command.detail).await?;
    let time = repo
        .add(ClassTime {
            id: 0,
            class_detail_id: detail.id,
            day: command.day,
            week_number: command.week,
            start_time: parse_time(&command.start)?,
            end_time: parse_time(&command.end)?,
        })
        .await?;
    let label = format!(
        "{} {}-{}",
        time.day,
        time.start_time.format("%H:%M"),
        time.end_time.format("%H:%M")
    );
    report(&time, &label);
    Ok(())
}

async fn add_assignment(
    repo: &impl Repository,
    command: AddAssignmentCommand,
    config: &Config,
) -> Result<()> {
    let ctx = date_context(config);
    let class: Class = repo.get(command.class).await?;
    let assignment = repo
        .add(Assignment {
            id: 0,
            class_id: class.id,
            title: command.title,
            detail: command.detail,
            due_date: parse_date(&command.due, ctx.now, ctx.dialect)?,
            completion_progress: 0,
        })
        .await?;
    report(&assignment, &assignment.title);
    println!(
        "  {} Due: {}",
        "→".style(Style::new().blue()),
        assignment.due_date.to_string().cyan()
    );
    Ok(())
}

async fn add_exam(repo: &impl Repository, command: AddExamCommand, config: &Config) -> Result<()> {
    let ctx = date_context(config);
    let subject: Subject = repo.get(command.subject).await?;
    let exam = repo
        .add(Exam {
            id: 0,
            subject_id: subject.id,
            module_name: command.module,
            date: parse_date(&command.date, ctx.now, ctx.dialect)?,
            start_time: parse_time(&command.at)?,
            duration: command.duration,
            seat: command.seat,
            room: command.room,
            resit: command.resit,
        })
        .await?;
    let label = exam.module_name.clone().unwrap_or(subject.name);
    report(&exam, &label);
    Ok(())
}

async fn add_event(
    repo: &impl Repository,
    command: AddEventCommand,
    timetable: Option<i64>,
    config: &Config,
) -> Result<()> {
    let ctx = date_context(config);
    let timetable_id = resolve_timetable_id(repo, timetable, config).await?;
    if let Some(subject_id) = command.subject {
        let _: Subject = repo.get(subject_id).await?;
    }

    let start = parse_date_time(&command.start, ctx.now, ctx.dialect)?;
    let end = match command.end {
        Some(end) => parse_date_time(&end, ctx.now, ctx.dialect)?,
        None => start + Duration::hours(1),
    };

    let event = repo
        .add(Event {
            id: 0,
            timetable_id,
            title: command.title,
            detail: command.detail,
            start_date_time: start,
            end_date_time: end,
            location: command.location,
            subject_id: command.subject,
        })
        .await?;
    report(&event, &event.title);
    Ok(())
}
