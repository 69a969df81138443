use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_english::{parse_date_string, Dialect};

const TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M%p", "%I:%M %p"];
const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parses `2024-06-01` or an English expression such as `tomorrow` or `next friday`.
pub fn parse_date(input: &str, now: NaiveDateTime, dialect: Dialect) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
        return Ok(date);
    }
    parse_english(input, now, dialect)
        .map(|dt| dt.date())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", input, e))
}

pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let input = input.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(input, format).ok())
        .ok_or_else(|| anyhow!("Failed to parse time '{}': expected HH:MM", input))
}

pub fn parse_date_time(input: &str, now: NaiveDateTime, dialect: Dialect) -> Result<NaiveDateTime> {
    let trimmed = input.trim();
    if let Some(dt) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
    {
        return Ok(dt);
    }
    parse_english(input, now, dialect)
        .map_err(|e| anyhow!("Failed to parse date and time '{}': {}", input, e))
}

fn parse_english(input: &str, now: NaiveDateTime, dialect: Dialect) -> Result<NaiveDateTime> {
    parse_date_string(input, Utc.from_utc_datetime(&now), dialect)
        .map(|dt| dt.naive_utc())
        .map_err(|e| anyhow!("{}", e))
}
