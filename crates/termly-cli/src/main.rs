use clap::Parser;
use owo_colors::{OwoColorize, Style};
use termly_core::db;
use termly_core::error::CoreError;
use termly_core::repository::SqliteRepository;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod query_parser;
mod util;
mod views;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TERMLY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = cli::Cli::parse();

    let config = config::Config::new().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid configuration, using defaults");
        config::Config::default()
    });
    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    let repository = SqliteRepository::new(db_pool);

    let timetable = cli.timetable;

    let result = match cli.command {
        cli::Commands::Add(command) => {
            commands::add::add_record(&repository, command, timetable, &config).await
        }
        cli::Commands::List(command) => {
            commands::list::list_records(&repository, command, &config).await
        }
        cli::Commands::Delete(command) => {
            commands::delete::delete_record(&repository, command).await
        }
        cli::Commands::Progress(command) => {
            commands::progress::set_progress(&repository, command).await
        }
        cli::Commands::Agenda(command) => {
            commands::agenda::show_agenda(&repository, command, timetable, &config).await
        }
        cli::Commands::Schedule(command) => {
            commands::schedule::show_schedule(&repository, command, timetable, &config).await
        }
        cli::Commands::Remind(command) => {
            commands::remind::add_reminder(&repository, command, &config).await
        }
        cli::Commands::Reminders(command) => {
            commands::remind::manage_reminders(&repository, command).await
        }
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    match err.downcast_ref::<CoreError>() {
        Some(CoreError::NotFound(s)) => {
            eprintln!("{} Not found: {}", "Error:".style(error_style), s.yellow());
        }
        Some(CoreError::InvalidInput(s)) => {
            eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
        }
        Some(core_error @ (CoreError::Database(_) | CoreError::Migration(_))) => {
            eprintln!("{} {}", "Error:".style(error_style), core_error);
            if let Some(source) = std::error::Error::source(core_error) {
                eprintln!("  caused by: {}", source);
            }
        }
        _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
    }
}
