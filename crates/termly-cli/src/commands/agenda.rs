use anyhow::Result;
use termly_core::repository::Repository;

use crate::cli::AgendaCommand;
use crate::config::Config;
use crate::parser::parse_date;
use crate::util::{date_context, resolve_timetable_id};
use crate::views::table::display_agenda;

pub async fn show_agenda(
    repo: &impl Repository,
    command: AgendaCommand,
    timetable: Option<i64>,
    config: &Config,
) -> Result<()> {
    let ctx = date_context(config);
    let today = match command.date {
        Some(date) => parse_date(&date, ctx.now, ctx.dialect)?,
        None => ctx.now.date(),
    };
    let timetable_id = resolve_timetable_id(repo, timetable, config).await?;

    let groups = repo.agenda(timetable_id, today, command.all).await?;
    tracing::debug!(timetable_id, %today, groups = groups.len(), "built agenda");

    if command.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        display_agenda(&groups, today);
    }
    Ok(())
}
