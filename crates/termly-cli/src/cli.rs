use clap::{Parser, Subcommand};
use termly_core::models::{DayOfWeek, EntityKind, ReminderKind};

/// Termly: a timetable, agenda and reminder manager for students
#[derive(Parser, Debug)]
#[command(name = "termly", author, version, about, long_about = None)]
pub struct Cli {
    /// Timetable to work on (defaults to `default_timetable` from the config)
    #[arg(long, short = 'T', global = true)]
    pub timetable: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a timetable, subject, term, class, class detail, class time, assignment, exam or event
    Add(AddCommand),
    /// List records of one kind, optionally filtered
    List(ListCommand),
    /// Delete a record and everything it owns
    Delete(DeleteCommand),
    /// Set the completion progress of an assignment
    Progress(ProgressCommand),
    /// Show assignments, exams and events grouped by due date
    Agenda(AgendaCommand),
    /// Show the classes on a given day
    Schedule(ScheduleCommand),
    /// Schedule a reminder
    Remind(RemindCommand),
    /// List or acknowledge reminders
    Reminders(RemindersCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    #[command(subcommand)]
    pub command: AddSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AddSubcommand {
    /// Add a timetable
    Timetable(AddTimetableCommand),
    /// Add a subject to the current timetable
    Subject(AddSubjectCommand),
    /// Add a term to the current timetable
    Term(AddTermCommand),
    /// Add a class to a subject
    Class(AddClassCommand),
    /// Add a room/teacher detail to a class
    Detail(AddDetailCommand),
    /// Add a weekly time slot to a class detail
    Time(AddTimeCommand),
    /// Add an assignment to a class
    Assignment(AddAssignmentCommand),
    /// Add an exam to a subject
    Exam(AddExamCommand),
    /// Add an event to the current timetable
    Event(AddEventCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddTimetableCommand {
    /// The name of the timetable
    pub name: String,
    /// First day of the timetable
    #[arg(long)]
    pub start: String,
    /// Last day of the timetable
    #[arg(long)]
    pub end: String,
    /// Number of alternating weeks (1-4)
    #[arg(long, default_value_t = 1)]
    pub rotations: i64,
}

#[derive(Parser, Debug, Clone)]
pub struct AddSubjectCommand {
    /// The name of the subject
    pub name: String,
    /// Short name shown in the schedule
    #[arg(long, short)]
    pub abbreviation: Option<String>,
    /// Colour index used by views
    #[arg(long, default_value_t = 0)]
    pub color: i64,
}

#[derive(Parser, Debug, Clone)]
pub struct AddTermCommand {
    /// The name of the term
    pub name: String,
    #[arg(long)]
    pub start: String,
    #[arg(long)]
    pub end: String,
}

#[derive(Parser, Debug, Clone)]
pub struct AddClassCommand {
    /// The ID of the subject the class belongs to
    #[arg(long)]
    pub subject: i64,
    /// Module or course name
    #[arg(long, short)]
    pub module: Option<String>,
    /// First day the class runs (defaults to the timetable start)
    #[arg(long)]
    pub start: Option<String>,
    /// Last day the class runs (defaults to the timetable end)
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddDetailCommand {
    /// The ID of the class
    #[arg(long)]
    pub class: i64,
    #[arg(long)]
    pub room: Option<String>,
    #[arg(long)]
    pub building: Option<String>,
    #[arg(long)]
    pub teacher: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddTimeCommand {
    /// The ID of the class detail
    #[arg(long)]
    pub detail: i64,
    /// Day of the week (mon, tue, ...)
    #[arg(long)]
    pub day: DayOfWeek,
    /// Start time (HH:MM)
    #[arg(long)]
    pub start: String,
    /// End time (HH:MM)
    #[arg(long)]
    pub end: String,
    /// Week of the rotation this slot belongs to
    #[arg(long, default_value_t = 1)]
    pub week: i64,
}

#[derive(Parser, Debug, Clone)]
pub struct AddAssignmentCommand {
    /// The title of the assignment
    pub title: String,
    /// The ID of the class
    #[arg(long)]
    pub class: i64,
    /// Due date (e.g. '2024-06-01', 'next friday')
    #[arg(long, short)]
    pub due: String,
    /// Longer description
    #[arg(long)]
    pub detail: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddExamCommand {
    /// The ID of the subject
    #[arg(long)]
    pub subject: i64,
    /// Exam date
    #[arg(long)]
    pub date: String,
    /// Start time (HH:MM)
    #[arg(long)]
    pub at: String,
    /// Length in minutes
    #[arg(long, default_value_t = 60)]
    pub duration: i64,
    #[arg(long, short)]
    pub module: Option<String>,
    #[arg(long)]
    pub seat: Option<String>,
    #[arg(long)]
    pub room: Option<String>,
    /// Mark the exam as a resit
    #[arg(long)]
    pub resit: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct AddEventCommand {
    /// The title of the event
    pub title: String,
    /// Start (e.g. '2024-10-03 08:00')
    #[arg(long)]
    pub start: String,
    /// End (defaults to one hour after the start)
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub detail: Option<String>,
    /// Optional subject the event relates to
    #[arg(long)]
    pub subject: Option<i64>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Kind of record (timetable, subject, term, class, class-detail, class-time, assignment, exam, event)
    pub kind: EntityKind,
    /// A filter query string (e.g., "due_date<=friday and (class_id=3 or class_id=4)")
    #[clap(default_value = "")]
    pub query: String,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// Kind of record to delete
    pub kind: EntityKind,
    /// The ID of the record to delete
    pub id: i64,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
    /// Delete only this row, leaving anything it owns in place
    #[arg(long)]
    pub only: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ProgressCommand {
    /// The ID of the assignment
    pub id: i64,
    /// Percentage complete (0-100)
    pub percent: i64,
}

#[derive(Parser, Debug, Clone)]
pub struct AgendaCommand {
    /// Day to treat as today
    #[arg(long)]
    pub date: Option<String>,
    /// Include finished assignments
    #[arg(long, short)]
    pub all: bool,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ScheduleCommand {
    /// Day to show (defaults to today)
    #[arg(long)]
    pub date: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct RemindCommand {
    /// What the reminder is for (class, exam, assignment, event)
    pub kind: ReminderKind,
    /// ID of the class time, exam, assignment or event
    pub id: i64,
    /// When to trigger (defaults to `reminder_lead_minutes` before the start)
    #[arg(long)]
    pub at: Option<String>,
    /// Repeat every N minutes
    #[arg(long)]
    pub every: Option<i64>,
    /// Message to show
    #[arg(long, short)]
    pub message: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct RemindersCommand {
    /// Only reminders due now
    #[arg(long)]
    pub due: bool,
    /// Acknowledge the reminder with this ID
    #[arg(long, conflicts_with = "due")]
    pub ack: Option<i64>,
}
