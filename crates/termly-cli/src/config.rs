use figment::{Figment, providers::{Format, Serialized, Toml, Env}};
use serde::{Deserialize, Serialize};

/// Settings merged from `config.toml` and `TERMLY_`-prefixed environment variables.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Path of the SQLite database file
    pub database_path: String,
    /// Timetable used when `--timetable` is not given
    pub default_timetable: Option<i64>,
    /// Minutes before a class, exam or event that `remind` triggers by default
    pub reminder_lead_minutes: i64,
    /// How ambiguous dates such as `03/04` are read
    pub date_dialect: DateDialect,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DateDialect {
    /// Day first
    Uk,
    /// Month first
    Us,
}

impl From<DateDialect> for chrono_english::Dialect {
    fn from(dialect: DateDialect) -> Self {
        match dialect {
            DateDialect::Uk => chrono_english::Dialect::Uk,
            DateDialect::Us => chrono_english::Dialect::Us,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "termly.db".to_string(),
            default_timetable: None,
            reminder_lead_minutes: 15,
            date_dialect: DateDialect::Uk,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("TERMLY_"))
    }
}
