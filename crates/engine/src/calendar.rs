//! Calendar rules used by weekday-only alarms.
use chrono::{Datelike, NaiveDate, Weekday};

/// National holidays as `(day, month)` pairs. They have no year and are
/// never moved to the nearest working day.
pub const FIXED_HOLIDAYS: [(u32, u32); 8] = [
    (1, 1),
    (21, 4),
    (1, 5),
    (7, 9),
    (12, 10),
    (2, 11),
    (15, 11),
    (25, 12),
];

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_fixed_holiday(date: NaiveDate) -> bool {
    FIXED_HOLIDAYS.contains(&(date.day(), date.month()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn weekend_days() {
        // 2024-06-08 is a Saturday
        assert!(is_weekend(date(2024, 6, 8)));
        assert!(is_weekend(date(2024, 6, 9)));
        assert!(!is_weekend(date(2024, 6, 10)));
        assert!(!is_weekend(date(2024, 6, 14)));
    }

    #[test]
    fn holidays_ignore_year() {
        for (day, month) in FIXED_HOLIDAYS {
            assert!(is_fixed_holiday(date(2023, month, day)));
            assert!(is_fixed_holiday(date(2031, month, day)));
        }
        assert!(!is_fixed_holiday(date(2024, 4, 22)));
        assert!(!is_fixed_holiday(date(2024, 12, 24)));
    }

    #[test]
    fn day_and_month_are_not_swapped() {
        assert!(!is_fixed_holiday(date(2024, 12, 10)));
        assert!(is_fixed_holiday(date(2024, 10, 12)));
    }
}
