use anyhow::Result;
use termly_core::models::Assignment;
use termly_core::repository::Repository;

use crate::cli::ProgressCommand;

pub async fn set_progress(repo: &impl Repository, command: ProgressCommand) -> Result<()> {
    let mut assignment: Assignment = repo.get(command.id).await?;
    assignment.completion_progress = command.percent;
    let assignment = repo.replace(assignment).await?;

    if assignment.is_complete() {
        println!("Completed assignment: '{}'", assignment.title);
    } else {
        println!(
            "Assignment '{}' is {}% complete",
            assignment.title, assignment.completion_progress
        );
    }
    Ok(())
}
