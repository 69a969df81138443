/// CLI integration tests for termly
///
/// These tests exercise the binary as a black box against a temporary database.
use predicates::prelude::*;

mod helpers;
use helpers::{assertions, CliTestHarness, TestFixtures};

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("timetable"))
        .stdout(predicate::str::contains("agenda"));

    harness
        .run_success(&["--version"])
        .stdout(predicate::str::contains("termly"));

    harness
        .run_failure(&["invalid-command"])
        .stderr(assertions::has_error());
}

#[test]
fn test_add_and_list_records() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["add", "timetable", "Year 1", "--start", "2024-09-02", "--end", "2025-06-30"])
        .stdout(assertions::record_added("timetable"));
    harness
        .run_success(&["add", "subject", "Physics"])
        .stdout(assertions::record_added("subject"));
    harness
        .run_success(&["add", "subject", "Chemistry", "--color", "3"])
        .stdout(assertions::record_added("subject"));

    let subjects = harness.run_json(&["list", "subject", "--json"]);
    let subjects = subjects.as_array().expect("array of subjects");
    assert_eq!(subjects.len(), 2);
    assert_eq!(subjects[0]["id"], 1);
    assert_eq!(subjects[0]["name"], "Physics");
    assert_eq!(subjects[1]["id"], 2);
    assert_eq!(subjects[1]["timetable_id"], 1);

    harness
        .run_success(&["list", "subject"])
        .stdout(predicate::str::contains("Chemistry"));
}

#[test]
fn test_add_rejects_invalid_records() {
    let harness = CliTestHarness::new();

    // Ends before it starts
    harness
        .run_failure(&["add", "timetable", "Backwards", "--start", "2025-06-30", "--end", "2024-09-02"])
        .stderr(predicate::str::contains("Invalid input"));

    // No timetable to attach the subject to
    harness
        .run_failure(&["add", "subject", "Orphan"])
        .stderr(predicate::str::contains("No timetable exists"));

    // Parent class does not exist
    harness.run_success(&["add", "timetable", "Year 1", "--start", "2024-09-02", "--end", "2025-06-30"]);
    harness
        .run_failure(&["add", "assignment", "Essay", "--class", "7", "--due", "2024-10-01"])
        .stderr(predicate::str::contains("Not found"));

    harness
        .run_failure(&["add", "time", "--detail", "1", "--day", "funday", "--start", "09:00", "--end", "10:00"])
        .stderr(assertions::has_error());
}

#[test]
fn test_list_with_filters() {
    let harness = CliTestHarness::new();
    TestFixtures::school_year(&harness);
    harness.run_success(&["add", "assignment", "Problem sheet 1", "--class", "1", "--due", "2024-09-20"]);
    harness.run_success(&["add", "assignment", "Problem sheet 2", "--class", "1", "--due", "2024-10-04"]);
    harness.run_success(&["add", "assignment", "Coursework", "--class", "1", "--due", "2024-11-15"]);

    let early = harness.run_json(&["list", "assignment", "due_date<2024-10-01", "--json"]);
    assert_eq!(early.as_array().map(Vec::len), Some(1));
    assert_eq!(early[0]["title"], "Problem sheet 1");

    let either = harness.run_json(&[
        "list",
        "assignment",
        "title=\"Coursework\" or due_date=2024-10-04",
        "--json",
    ]);
    assert_eq!(either.as_array().map(Vec::len), Some(2));

    let none = harness.run_json(&["list", "assignment", "class_id!=1", "--json"]);
    assert_eq!(none.as_array().map(Vec::len), Some(0));

    harness
        .run_success(&["list", "assignment", "class_id=99"])
        .stdout(predicate::str::contains("No assignments found"));
}

#[test]
fn test_list_rejects_bad_filters() {
    let harness = CliTestHarness::new();
    TestFixtures::school_year(&harness);

    harness
        .run_failure(&["list", "subject", "name="])
        .stderr(assertions::has_error());
    harness
        .run_failure(&["list", "subject", "favourite_colour=blue"])
        .stderr(predicate::str::contains("Invalid input"));
    harness
        .run_failure(&["list", "spaceship"])
        .stderr(assertions::has_error());
}

#[test]
fn test_cascade_delete() {
    let harness = CliTestHarness::new();
    TestFixtures::school_year(&harness);
    harness.run_success(&["add", "assignment", "Problem sheet 1", "--class", "1", "--due", "2024-09-20"]);
    harness.run_success(&["add", "exam", "--subject", "1", "--date", "2025-01-14", "--at", "09:30"]);
    harness.run_success(&["add", "event", "Open day", "--start", "2024-10-03 08:00", "--subject", "1"]);

    harness
        .run_success(&["delete", "subject", "1", "--force"])
        .stdout(predicate::str::contains("Deleted subject 1"))
        .stdout(predicate::str::contains("1 class-time"))
        .stdout(predicate::str::contains("event link"));

    for kind in ["subject", "class", "class-detail", "class-time", "assignment", "exam"] {
        let rows = harness.run_json(&["list", kind, "--json"]);
        assert_eq!(rows.as_array().map(Vec::len), Some(0), "{} rows left", kind);
    }

    // The event belongs to the timetable, only its subject link is cleared
    let events = harness.run_json(&["list", "event", "--json"]);
    assert_eq!(events.as_array().map(Vec::len), Some(1));
    assert!(events[0]["subject_id"].is_null());

    harness
        .run_failure(&["delete", "subject", "1", "--force"])
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_delete_only_keeps_children() {
    let harness = CliTestHarness::new();
    TestFixtures::school_year(&harness);

    harness
        .run_success(&["delete", "class-detail", "1", "--force", "--only"])
        .stdout(predicate::str::contains("Deleted class-detail 1"));

    let times = harness.run_json(&["list", "class-time", "--json"]);
    assert_eq!(times.as_array().map(Vec::len), Some(1));

    harness
        .run_failure(&["delete", "class-detail", "1", "--force", "--only"])
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_progress() {
    let harness = CliTestHarness::new();
    TestFixtures::school_year(&harness);
    harness.run_success(&["add", "assignment", "Lab report", "--class", "1", "--due", "2024-09-20"]);

    harness
        .run_success(&["progress", "1", "40"])
        .stdout(predicate::str::contains("40% complete"));
    harness
        .run_success(&["progress", "1", "100"])
        .stdout(predicate::str::contains("Completed assignment"));
    harness
        .run_failure(&["progress", "1", "140"])
        .stderr(predicate::str::contains("Invalid input"));

    let assignments = harness.run_json(&["list", "assignment", "--json"]);
    assert_eq!(assignments[0]["id"], 1);
    assert_eq!(assignments[0]["completion_progress"], 100);
}

#[test]
fn test_agenda_groups_by_bucket() {
    let harness = CliTestHarness::new();
    TestFixtures::school_year(&harness);
    harness.run_success(&["add", "assignment", "Late sheet", "--class", "1", "--due", "2024-09-05"]);
    harness.run_success(&["add", "assignment", "Lab report", "--class", "1", "--due", "2024-09-11"]);
    harness.run_success(&["add", "exam", "--subject", "1", "--date", "2024-09-17", "--at", "09:30", "--resit"]);
    harness.run_success(&["add", "event", "Open day", "--start", "2024-12-03 08:00"]);

    // 2024-09-10 is a Tuesday
    let agenda = harness.run_json(&["agenda", "--date", "2024-09-10", "--json"]);
    let agenda = agenda.as_array().expect("array of groups");
    let buckets: Vec<&str> = agenda
        .iter()
        .filter_map(|group| group["bucket"].as_str())
        .collect();
    assert_eq!(buckets, vec!["Overdue", "Tomorrow", "NextWeek", "Later"]);
    assert_eq!(agenda[2]["items"][0]["kind"], "exam");
    assert_eq!(agenda[2]["items"][0]["title"], "Mathematics (resit)");

    harness.run_success(&["progress", "1", "100"]);
    let agenda = harness.run_json(&["agenda", "--date", "2024-09-10", "--json"]);
    assert_eq!(agenda[0]["bucket"], "Tomorrow");

    let agenda = harness.run_json(&["agenda", "--date", "2024-09-10", "--all", "--json"]);
    assert_eq!(agenda[0]["bucket"], "Overdue");

    harness
        .run_success(&["agenda", "--date", "2024-09-10"])
        .stdout(predicate::str::contains("Lab report"));
}

#[test]
fn test_schedule_follows_week_rotation() {
    let harness = CliTestHarness::new();
    TestFixtures::school_year(&harness);

    // Monday of week 1
    let classes = harness.run_json(&["schedule", "--date", "2024-09-02", "--json"]);
    assert_eq!(classes.as_array().map(Vec::len), Some(1));
    assert_eq!(classes[0]["subject_name"], "Mathematics");
    assert_eq!(classes[0]["room"], "B12");

    // Monday of week 2
    let classes = harness.run_json(&["schedule", "--date", "2024-09-09", "--json"]);
    assert_eq!(classes.as_array().map(Vec::len), Some(0));

    harness
        .run_success(&["schedule", "--date", "2024-09-03"])
        .stdout(predicate::str::contains("No classes"));
}

#[test]
fn test_several_timetables_need_a_choice() {
    let harness = CliTestHarness::new();
    TestFixtures::school_year(&harness);
    harness.run_success(&["add", "timetable", "Year 3", "--start", "2025-09-01", "--end", "2026-06-30"]);

    harness
        .run_failure(&["schedule", "--date", "2024-09-02"])
        .stderr(predicate::str::contains("Several timetables"));

    let classes = harness.run_json(&["--timetable", "1", "schedule", "--date", "2024-09-02", "--json"]);
    assert_eq!(classes.as_array().map(Vec::len), Some(1));

    harness
        .command()
        .env("TERMLY_DEFAULT_TIMETABLE", "2")
        .args(["add", "subject", "Statistics"])
        .assert()
        .success();
    let subjects = harness.run_json(&["list", "subject", "name=Statistics", "--json"]);
    assert_eq!(subjects[0]["timetable_id"], 2);
}

#[test]
fn test_reminders() {
    let harness = CliTestHarness::new();
    TestFixtures::school_year(&harness);
    harness.run_success(&["add", "exam", "--subject", "1", "--date", "2025-01-14", "--at", "09:30"]);

    harness
        .run_success(&["remind", "exam", "1", "--at", "2024-09-01 08:00", "--message", "Revise"])
        .stdout(predicate::str::contains("Reminder"));
    harness
        .run_success(&["remind", "class", "1", "--at", "2024-09-02 08:45", "--every", "20160"])
        .stdout(predicate::str::contains("repeats every 20160 minutes"));
    harness
        .run_failure(&["remind", "event", "9", "--at", "2024-09-01 08:00"])
        .stderr(predicate::str::contains("Not found"));

    harness
        .run_success(&["reminders", "--due"])
        .stdout(predicate::str::contains("Revise"));

    harness
        .run_success(&["reminders", "--ack", "1"])
        .stdout(predicate::str::contains("dismissed"));
    harness
        .run_success(&["reminders", "--ack", "2"])
        .stdout(predicate::str::contains("next at 2024-09-16 08:45"));

    // Deleting the class time cancels its remaining reminder
    harness
        .run_success(&["delete", "class-time", "1", "--force"])
        .stdout(predicate::str::contains("reminder(s) cancelled"));
    harness
        .run_success(&["reminders"])
        .stdout(predicate::str::contains("No reminders found"));
}
