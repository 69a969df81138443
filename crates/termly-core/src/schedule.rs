//! Week rotation.
//!
//! A timetable with `week_rotations = N` labels calendar weeks 1, 2, ..., N,
//! 1, 2, ... starting from the week that contains its start date. Weeks run
//! Monday to Sunday.

use crate::models::{ClassTime, DayOfWeek, Timetable};
use chrono::{Datelike, Duration, NaiveDate};

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

impl Timetable {
    /// Rotation week (1-based) that `date` falls in. Dates before the start
    /// week count backwards, so the week before week 1 is week N.
    pub fn week_number_on(&self, date: NaiveDate) -> i64 {
        let rotations = self.week_rotations.max(1);
        let weeks = (monday_of(date) - monday_of(self.start_date)).num_weeks();
        weeks.rem_euclid(rotations) + 1
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

impl ClassTime {
    /// Whether this slot occurs on `date` for the given timetable.
    pub fn occurs_on(&self, timetable: &Timetable, date: NaiveDate) -> bool {
        self.day == DayOfWeek::from(date.weekday())
            && self.week_number == timetable.week_number_on(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn timetable(rotations: i64) -> Timetable {
        // 2024-09-04 is a Wednesday; its week starts on Monday 2024-09-02.
        Timetable {
            id: 1,
            name: "Year 2".to_string(),
            start_date: date(2024, 9, 4),
            end_date: date(2025, 6, 30),
            week_rotations: rotations,
        }
    }

    #[rstest]
    #[case(date(2024, 9, 2), 1)]
    #[case(date(2024, 9, 8), 1)]
    #[case(date(2024, 9, 9), 2)]
    #[case(date(2024, 9, 16), 1)]
    #[case(date(2024, 9, 1), 2)]
    #[case(date(2024, 8, 26), 2)]
    #[case(date(2024, 8, 19), 1)]
    fn alternating_weeks(#[case] d: NaiveDate, #[case] expected: i64) {
        assert_eq!(timetable(2).week_number_on(d), expected);
    }

    #[test]
    fn single_rotation_is_always_week_one() {
        let t = timetable(1);
        for offset in -20..40 {
            assert_eq!(t.week_number_on(date(2024, 9, 4) + Duration::weeks(offset)), 1);
        }
    }

    #[test]
    fn four_week_rotation_crosses_year_end() {
        let t = timetable(4);
        // 17 weeks after 2024-09-02.
        assert_eq!(t.week_number_on(date(2024, 12, 30)), 17 % 4 + 1);
        assert_eq!(t.week_number_on(date(2025, 1, 5)), 17 % 4 + 1);
        assert_eq!(t.week_number_on(date(2025, 1, 6)), 18 % 4 + 1);
    }

    #[test]
    fn class_time_occurs_on_matching_day_and_week() {
        let t = timetable(2);
        let slot = ClassTime {
            id: 1,
            class_detail_id: 1,
            day: DayOfWeek::Tuesday,
            week_number: 2,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        };
        assert!(!slot.occurs_on(&t, date(2024, 9, 3)));
        assert!(slot.occurs_on(&t, date(2024, 9, 10)));
        assert!(!slot.occurs_on(&t, date(2024, 9, 11)));
    }

    #[test]
    fn active_range_is_inclusive() {
        let t = timetable(1);
        assert!(t.is_active_on(date(2024, 9, 4)));
        assert!(t.is_active_on(date(2025, 6, 30)));
        assert!(!t.is_active_on(date(2025, 7, 1)));
    }
}
