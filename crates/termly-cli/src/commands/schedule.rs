use anyhow::Result;
use termly_core::repository::Repository;

use crate::cli::ScheduleCommand;
use crate::config::Config;
use crate::parser::parse_date;
use crate::util::{date_context, resolve_timetable_id};
use crate::views::table::display_schedule;

pub async fn show_schedule(
    repo: &impl Repository,
    command: ScheduleCommand,
    timetable: Option<i64>,
    config: &Config,
) -> Result<()> {
    let ctx = date_context(config);
    let date = match command.date {
        Some(date) => parse_date(&date, ctx.now, ctx.dialect)?,
        None => ctx.now.date(),
    };
    let timetable_id = resolve_timetable_id(repo, timetable, config).await?;

    let classes = repo.class_times_on(timetable_id, date).await?;
    if command.json {
        println!("{}", serde_json::to_string_pretty(&classes)?);
    } else {
        display_schedule(&classes, date);
    }
    Ok(())
}
