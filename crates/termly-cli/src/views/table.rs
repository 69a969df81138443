use chrono::{NaiveDate, NaiveDateTime};
use chrono_humanize::HumanTime;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use termly_core::agenda::{AgendaGroup, Bucket};
use termly_core::models::{
    Assignment, Class, ClassDetail, ClassTime, Event, Exam, Reminder, Subject, Term, Timetable,
};
use termly_core::repository::{AgendaEntry, AgendaKind, ScheduledClass};

const SUBJECT_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::Red,
];

fn subject_color(color_id: i64) -> Color {
    SUBJECT_COLORS[color_id.rem_euclid(SUBJECT_COLORS.len() as i64) as usize]
}

fn optional(value: &Option<String>) -> Cell {
    match value {
        Some(v) => Cell::new(v),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}

/// Relative description of `date` as seen from `today`, e.g. "in 3 days".
fn relative(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "today".to_string();
    }
    HumanTime::from(date - today).to_string()
}

/// A record that can be shown as one row of a `termly list` table.
pub trait TableRow {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Row;
}

pub fn display_records<T: TableRow>(records: &[T], what: &str) {
    if records.is_empty() {
        println!("No {} found.", what);
        return;
    }

    let mut table = Table::new();
    table.set_header(T::headers());
    for record in records {
        table.add_row(record.row());
    }
    println!("{table}");
}

impl TableRow for Timetable {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Start", "End", "Weeks"]
    }

    fn row(&self) -> Row {
        Row::from(vec![
            Cell::new(self.id),
            Cell::new(&self.name).add_attribute(Attribute::Bold),
            Cell::new(self.start_date),
            Cell::new(self.end_date),
            Cell::new(self.week_rotations),
        ])
    }
}

impl TableRow for Subject {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Short", "Timetable"]
    }

    fn row(&self) -> Row {
        Row::from(vec![
            Cell::new(self.id),
            Cell::new(&self.name).fg(subject_color(self.color_id)),
            optional(&self.abbreviation),
            Cell::new(self.timetable_id),
        ])
    }
}

impl TableRow for Term {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Start", "End", "Timetable"]
    }

    fn row(&self) -> Row {
        Row::from(vec![
            Cell::new(self.id),
            Cell::new(&self.name),
            Cell::new(self.start_date),
            Cell::new(self.end_date),
            Cell::new(self.timetable_id),
        ])
    }
}

impl TableRow for Class {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Subject", "Module", "Start", "End"]
    }

    fn row(&self) -> Row {
        Row::from(vec![
            Cell::new(self.id),
            Cell::new(self.subject_id),
            optional(&self.module_name),
            Cell::new(self.start_date),
            Cell::new(self.end_date),
        ])
    }
}

impl TableRow for ClassDetail {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Class", "Room", "Building", "Teacher"]
    }

    fn row(&self) -> Row {
        Row::from(vec![
            Cell::new(self.id),
            Cell::new(self.class_id),
            optional(&self.room),
            optional(&self.building),
            optional(&self.teacher),
        ])
    }
}

impl TableRow for ClassTime {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Detail", "Day", "Week", "Start", "End"]
    }

    fn row(&self) -> Row {
        Row::from(vec![
            Cell::new(self.id),
            Cell::new(self.class_detail_id),
            Cell::new(self.day),
            Cell::new(self.week_number),
            Cell::new(self.start_time.format("%H:%M")),
            Cell::new(self.end_time.format("%H:%M")),
        ])
    }
}

impl TableRow for Assignment {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Title", "Class", "Due", "Progress"]
    }

    fn row(&self) -> Row {
        let mut title = Cell::new(&self.title);
        if self.is_complete() {
            title = title.add_attribute(Attribute::CrossedOut).fg(Color::DarkGrey);
        }
        Row::from(vec![
            Cell::new(self.id),
            title,
            Cell::new(self.class_id),
            Cell::new(self.due_date),
            Cell::new(format!("{}%", self.completion_progress)),
        ])
    }
}

impl TableRow for Exam {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Subject", "Module", "Date", "Start", "Minutes", "Room", "Seat", "Resit"]
    }

    fn row(&self) -> Row {
        Row::from(vec![
            Cell::new(self.id),
            Cell::new(self.subject_id),
            optional(&self.module_name),
            Cell::new(self.date),
            Cell::new(self.start_time.format("%H:%M")),
            Cell::new(self.duration),
            optional(&self.room),
            optional(&self.seat),
            Cell::new(if self.resit { "yes" } else { "no" }),
        ])
    }
}

impl TableRow for Event {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Title", "Start", "End", "Location", "Subject"]
    }

    fn row(&self) -> Row {
        Row::from(vec![
            Cell::new(self.id),
            Cell::new(&self.title),
            Cell::new(self.start_date_time.format("%Y-%m-%d %H:%M")),
            Cell::new(self.end_date_time.format("%Y-%m-%d %H:%M")),
            optional(&self.location),
            self.subject_id
                .map_or_else(|| Cell::new("-").fg(Color::DarkGrey), Cell::new),
        ])
    }
}

pub fn display_reminders(reminders: &[Reminder], now: NaiveDateTime) {
    if reminders.is_empty() {
        println!("No reminders found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "For", "Trigger", "Repeat", "Message"]);

    for reminder in reminders {
        let trigger = format!(
            "{} ({})",
            reminder.trigger_at.format("%Y-%m-%d %H:%M"),
            HumanTime::from(reminder.trigger_at - now)
        );
        let trigger = if reminder.trigger_at <= now {
            Cell::new(trigger).fg(Color::Red)
        } else {
            Cell::new(trigger)
        };
        table.add_row(vec![
            Cell::new(reminder.id),
            Cell::new(format!("{} {}", reminder.kind, reminder.entity_id)),
            trigger,
            Cell::new(
                reminder
                    .repeat_minutes
                    .map_or_else(|| "once".to_string(), |m| format!("every {} min", m)),
            ),
            Cell::new(&reminder.message),
        ]);
    }
    println!("{table}");
}

fn bucket_color(bucket: Bucket) -> Color {
    match bucket {
        Bucket::Overdue => Color::Red,
        Bucket::Today => Color::Yellow,
        Bucket::Tomorrow => Color::Green,
        _ => Color::Reset,
    }
}

pub fn display_agenda(groups: &[AgendaGroup<AgendaEntry>], today: NaiveDate) {
    if groups.is_empty() {
        println!("Nothing on the agenda.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["When", "Kind", "ID", "Title", "Subject", "Due"]);

    for group in groups {
        for (index, entry) in group.items.iter().enumerate() {
            let when = if index == 0 {
                Cell::new(group.bucket.display_name())
                    .fg(bucket_color(group.bucket))
                    .add_attribute(Attribute::Bold)
            } else {
                Cell::new("")
            };

            let mut title = entry.title.clone();
            if let Some(progress) = entry.progress {
                title.push_str(&format!(" [{}%]", progress));
            }
            let title = match entry.kind {
                AgendaKind::Exam => Cell::new(title).add_attribute(Attribute::Bold),
                _ => Cell::new(title),
            };

            let due = match entry.time {
                Some(time) => format!("{} {}", relative(entry.date, today), time.format("%H:%M")),
                None => relative(entry.date, today),
            };

            table.add_row(vec![
                when,
                Cell::new(entry.kind.entity_kind()),
                Cell::new(entry.id),
                title,
                optional(&entry.subject_name),
                Cell::new(due),
            ]);
        }
    }
    println!("{table}");
}

pub fn display_schedule(classes: &[ScheduledClass], date: NaiveDate) {
    if classes.is_empty() {
        println!("No classes on {}.", date.format("%A %Y-%m-%d"));
        return;
    }

    println!("{}", date.format("%A %Y-%m-%d"));
    let mut table = Table::new();
    table.set_header(vec!["Time", "Subject", "Module", "Room", "Teacher"]);

    for class in classes {
        let subject = class.abbreviation.as_deref().unwrap_or(&class.subject_name);
        let room = match (&class.room, &class.building) {
            (Some(room), Some(building)) => Some(format!("{}, {}", room, building)),
            (room, building) => room.clone().or_else(|| building.clone()),
        };
        table.add_row(vec![
            Cell::new(format!(
                "{}-{}",
                class.start_time.format("%H:%M"),
                class.end_time.format("%H:%M")
            )),
            Cell::new(subject).fg(subject_color(class.color_id)),
            optional(&class.module_name),
            optional(&room),
            optional(&class.teacher),
        ]);
    }
    println!("{table}");
}
