use anyhow::{anyhow, Result};
use dialoguer::Confirm;
use owo_colors::{OwoColorize, Style};
use termly_core::error::CoreError;
use termly_core::repository::Repository;

use crate::cli::DeleteCommand;

pub async fn delete_record(repo: &impl Repository, command: DeleteCommand) -> Result<()> {
    let DeleteCommand { kind, id, force, only } = command;

    if !force {
        let prompt = if only || kind.children().is_empty() {
            format!("Are you sure you want to delete {} {}?", kind, id)
        } else {
            format!(
                "Are you sure you want to delete {} {} and everything it owns?",
                kind, id
            )
        };
        let confirmation = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    let success_style = Style::new().green().bold();
    if only {
        repo.delete(kind, id).await?;
        println!("{} Deleted {} {}", "✓".style(success_style), kind, id);
        return Ok(());
    }

    let summary = repo.delete_with_references(kind, id).await?;
    if summary.is_empty() {
        return Err(anyhow!(CoreError::NotFound(format!("{} {}", kind, id))));
    }

    println!("{} Deleted {} {}: {}", "✓".style(success_style), kind, id, summary);
    if summary.references_cleared > 0 {
        println!(
            "  {} {} event link(s) to it cleared",
            "→".style(Style::new().blue()),
            summary.references_cleared
        );
    }
    if summary.reminders_cancelled > 0 {
        println!(
            "  {} {} reminder(s) cancelled",
            "→".style(Style::new().blue()),
            summary.reminders_cancelled
        );
    }
    Ok(())
}
