use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDateTime};
use termly_core::error::CoreError;
use termly_core::models::Timetable;
use termly_core::repository::Repository;

use crate::config::Config;
use crate::query_parser::DateContext;

/// Picks the timetable a command works on: `--timetable`, then the configured
/// default, then the only timetable in the database.
pub async fn resolve_timetable_id(
    repo: &impl Repository,
    explicit: Option<i64>,
    config: &Config,
) -> Result<i64> {
    if let Some(id) = explicit.or(config.default_timetable) {
        let timetable: Timetable = repo.get(id).await?;
        return Ok(timetable.id);
    }

    let timetables: Vec<Timetable> = repo.find_all().await?;
    match timetables.as_slice() {
        [only] => Ok(only.id),
        [] => Err(anyhow!(CoreError::InvalidInput(
            "No timetable exists yet. Create one with 'termly add timetable'.".to_string()
        ))),
        _ => Err(anyhow!(CoreError::InvalidInput(
            "Several timetables exist. Pass --timetable <ID> or set default_timetable.".to_string()
        ))),
    }
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn date_context(config: &Config) -> DateContext {
    DateContext {
        now: now(),
        dialect: config.date_dialect.into(),
    }
}
