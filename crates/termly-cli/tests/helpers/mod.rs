#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test harness for running CLI commands with temporary databases
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("termly").expect("Failed to find termly binary");

        // Run inside the temp dir so no stray config.toml is picked up
        cmd.current_dir(self.temp_dir.path());
        cmd.env("TERMLY_DATABASE_PATH", &self.db_path);
        cmd.env_remove("TERMLY_DEFAULT_TIMETABLE");

        cmd
    }

    pub fn db_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs a command expected to print JSON and parses its stdout
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.command().args(args).output().expect("Failed to run termly");
        assert!(
            output.status.success(),
            "command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("stdout is not valid JSON")
    }
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Creates a two-week timetable (week 1 starts Monday 2024-09-02) holding
    /// one subject with one class, one detail and a Monday 09:00 slot.
    pub fn school_year(harness: &CliTestHarness) {
        harness.run_success(&[
            "add", "timetable", "Year 2",
            "--start", "2024-09-02",
            "--end", "2025-06-30",
            "--rotations", "2",
        ]);
        harness.run_success(&["add", "subject", "Mathematics", "--abbreviation", "MA", "--color", "2"]);
        harness.run_success(&["add", "class", "--subject", "1", "--module", "Linear Algebra"]);
        harness.run_success(&["add", "detail", "--class", "1", "--room", "B12", "--teacher", "Dr Reyes"]);
        harness.run_success(&[
            "add", "time",
            "--detail", "1",
            "--day", "mon",
            "--start", "09:00",
            "--end", "10:30",
        ]);
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check if output indicates a record was added
    pub fn record_added(kind: &str) -> impl Predicate<str> {
        predicate::str::contains(format!("Added {}", kind))
    }

    /// Predicate to check for error messages
    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
