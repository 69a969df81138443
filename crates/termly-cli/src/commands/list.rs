use anyhow::Result;
use termly_core::models::{
    Assignment, Class, ClassDetail, ClassTime, Entity, EntityKind, Event, Exam, Subject, Term,
    Timetable,
};
use termly_core::query::Query;
use termly_core::repository::Repository;

use crate::cli::ListCommand;
use crate::config::Config;
use crate::query_parser;
use crate::util::date_context;
use crate::views::table::{display_records, TableRow};

pub async fn list_records(repo: &impl Repository, command: ListCommand, config: &Config) -> Result<()> {
    let query = if command.query.trim().is_empty() {
        None
    } else {
        Some(query_parser::parse_query(&command.query, date_context(config))?)
    };
    let query = query.as_ref();

    match command.kind {
        EntityKind::Timetable => list_as::<Timetable>(repo, query, command.json).await,
        EntityKind::Subject => list_as::<Subject>(repo, query, command.json).await,
        EntityKind::Term => list_as::<Term>(repo, query, command.json).await,
        EntityKind::Class => list_as::<Class>(repo, query, command.json).await,
        EntityKind::ClassDetail => list_as::<ClassDetail>(repo, query, command.json).await,
        EntityKind::ClassTime => list_as::<ClassTime>(repo, query, command.json).await,
        EntityKind::Assignment => list_as::<Assignment>(repo, query, command.json).await,
        EntityKind::Exam => list_as::<Exam>(repo, query, command.json).await,
        EntityKind::Event => list_as::<Event>(repo, query, command.json).await,
    }
}

async fn list_as<E: Entity + TableRow>(
    repo: &impl Repository,
    query: Option<&Query>,
    json: bool,
) -> Result<()> {
    let records: Vec<E> = match query {
        Some(query) => repo.find(query).await?,
        None => repo.find_all().await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        display_records(&records, E::KIND.table());
    }
    Ok(())
}
