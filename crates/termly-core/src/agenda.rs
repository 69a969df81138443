//! Grouping of dated items under agenda headers.
//!
//! Every date falls into exactly one [`Bucket`] relative to `today`. The rules
//! are evaluated in order, so earlier rules win:
//!
//! 1. before today: [`Bucket::Overdue`]
//! 2. today: [`Bucket::Today`]
//! 3. today + 1 day: [`Bucket::Tomorrow`]
//! 4. same ISO week as today: [`Bucket::ThisWeek`]
//! 5. the ISO week of today + 7 days: [`Bucket::NextWeek`]
//! 6. same calendar month and year: [`Bucket::ThisMonth`]
//! 7. anything else: [`Bucket::Later`]
//!
//! Weeks start on Monday. When today is a Sunday, tomorrow is reported as
//! `Tomorrow` and the remaining days of the following week as `NextWeek`.

use crate::models::{Assignment, Event, Exam};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Header an agenda item is listed under. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bucket {
    Overdue,
    Today,
    Tomorrow,
    ThisWeek,
    NextWeek,
    ThisMonth,
    Later,
}

impl Bucket {
    pub const ALL: [Bucket; 7] = [
        Bucket::Overdue,
        Bucket::Today,
        Bucket::Tomorrow,
        Bucket::ThisWeek,
        Bucket::NextWeek,
        Bucket::ThisMonth,
        Bucket::Later,
    ];

    pub fn classify(date: NaiveDate, today: NaiveDate) -> Bucket {
        if date < today {
            Bucket::Overdue
        } else if date == today {
            Bucket::Today
        } else if Some(date) == today.succ_opt() {
            Bucket::Tomorrow
        } else if date.iso_week() == today.iso_week() {
            Bucket::ThisWeek
        } else if Self::is_next_week(date, today) {
            Bucket::NextWeek
        } else if date.year() == today.year() && date.month() == today.month() {
            Bucket::ThisMonth
        } else {
            Bucket::Later
        }
    }

    fn is_next_week(date: NaiveDate, today: NaiveDate) -> bool {
        today
            .checked_add_signed(Duration::days(7))
            .map_or(false, |next| next.iso_week() == date.iso_week())
    }

    /// Sort priority, 0 for the most urgent header.
    pub fn priority(&self) -> u8 {
        *self as u8
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Bucket::Overdue => "Overdue",
            Bucket::Today => "Today",
            Bucket::Tomorrow => "Tomorrow",
            Bucket::ThisWeek => "This Week",
            Bucket::NextWeek => "Next Week",
            Bucket::ThisMonth => "This Month",
            Bucket::Later => "Later",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Something that can be placed on an agenda.
pub trait Dated {
    fn date(&self) -> NaiveDate;
    fn title(&self) -> &str;
}

impl Dated for Assignment {
    fn date(&self) -> NaiveDate {
        self.due_date
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl Dated for Exam {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn title(&self) -> &str {
        self.module_name.as_deref().unwrap_or("")
    }
}

impl Dated for Event {
    fn date(&self) -> NaiveDate {
        self.start_date_time.date()
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// Orders items by date, then by title.
pub fn chronological<T: Dated + ?Sized>(a: &T, b: &T) -> Ordering {
    a.date()
        .cmp(&b.date())
        .then_with(|| a.title().cmp(b.title()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaGroup<T> {
    pub bucket: Bucket,
    pub items: Vec<T>,
}

/// Groups items by bucket. Only non-empty groups are returned, most urgent
/// first, each sorted with [`chronological`].
pub fn group_by_bucket<T: Dated>(
    items: impl IntoIterator<Item = T>,
    today: NaiveDate,
) -> Vec<AgendaGroup<T>> {
    let mut groups: Vec<AgendaGroup<T>> = Bucket::ALL
        .into_iter()
        .map(|bucket| AgendaGroup {
            bucket,
            items: Vec::new(),
        })
        .collect();

    for item in items {
        let bucket = Bucket::classify(item.date(), today);
        groups[bucket.priority() as usize].items.push(item);
    }

    groups.retain(|group| !group.items.is_empty());
    for group in &mut groups {
        group.items.sort_by(|a, b| chronological(a, b));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Item(NaiveDate, &'static str);

    impl Dated for Item {
        fn date(&self) -> NaiveDate {
            self.0
        }

        fn title(&self) -> &str {
            self.1
        }
    }

    #[rstest]
    #[case(date(2024, 6, 9), Bucket::Overdue)]
    #[case(date(2024, 6, 10), Bucket::Today)]
    #[case(date(2024, 6, 11), Bucket::Tomorrow)]
    #[case(date(2024, 6, 14), Bucket::ThisWeek)]
    #[case(date(2024, 6, 16), Bucket::ThisWeek)]
    #[case(date(2024, 6, 17), Bucket::NextWeek)]
    #[case(date(2024, 6, 23), Bucket::NextWeek)]
    #[case(date(2024, 6, 25), Bucket::ThisMonth)]
    #[case(date(2024, 8, 1), Bucket::Later)]
    fn classify_relative_to_a_monday(#[case] d: NaiveDate, #[case] expected: Bucket) {
        assert_eq!(Bucket::classify(d, date(2024, 6, 10)), expected);
    }

    #[rstest]
    #[case(date(2024, 6, 17), Bucket::Tomorrow)]
    #[case(date(2024, 6, 18), Bucket::NextWeek)]
    #[case(date(2024, 6, 23), Bucket::NextWeek)]
    #[case(date(2024, 6, 24), Bucket::ThisMonth)]
    fn sunday_hands_monday_to_tomorrow(#[case] d: NaiveDate, #[case] expected: Bucket) {
        assert_eq!(Bucket::classify(d, date(2024, 6, 16)), expected);
    }

    #[test]
    fn next_week_crosses_the_year_boundary() {
        // 2024-12-30 is the Monday of ISO week 2025-W01.
        let today = date(2024, 12, 27);
        assert_eq!(Bucket::classify(date(2024, 12, 29), today), Bucket::ThisWeek);
        assert_eq!(Bucket::classify(date(2025, 1, 2), today), Bucket::NextWeek);
        assert_eq!(Bucket::classify(date(2025, 1, 6), today), Bucket::Later);
    }

    #[test]
    fn priorities_follow_display_order() {
        let priorities: Vec<u8> = Bucket::ALL.iter().map(Bucket::priority).collect();
        assert_eq!(priorities, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(Bucket::ThisWeek.to_string(), "This Week");
    }

    #[test]
    fn groups_are_sorted_and_skip_empty_buckets() {
        let today = date(2024, 6, 10);
        let groups = group_by_bucket(
            vec![
                Item(date(2024, 8, 1), "Report"),
                Item(date(2024, 6, 1), "Lab"),
                Item(date(2024, 6, 10), "Quiz"),
                Item(date(2024, 6, 10), "Essay"),
                Item(date(2024, 5, 20), "Reading"),
            ],
            today,
        );
        let buckets: Vec<Bucket> = groups.iter().map(|g| g.bucket).collect();
        assert_eq!(buckets, vec![Bucket::Overdue, Bucket::Today, Bucket::Later]);
        let overdue: Vec<&str> = groups[0].items.iter().map(|i| i.1).collect();
        assert_eq!(overdue, vec!["Reading", "Lab"]);
        let due_today: Vec<&str> = groups[1].items.iter().map(|i| i.1).collect();
        assert_eq!(due_today, vec!["Essay", "Quiz"]);
    }

    proptest! {
        #[test]
        fn classify_is_total_and_exclusive(day_offset in -800i64..800, today_offset in 0i64..3000) {
            let today = date(2020, 1, 1) + Duration::days(today_offset);
            let d = today + Duration::days(day_offset);
            let bucket = Bucket::classify(d, today);
            prop_assert_eq!(Bucket::ALL.iter().filter(|b| **b == bucket).count(), 1);
            prop_assert_eq!(bucket == Bucket::Overdue, d < today);
        }
    }
}
