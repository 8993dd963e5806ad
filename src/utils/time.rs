use chrono::{Datelike, Days, Local, NaiveDate};

use super::clock::Clock;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// This is the standard way of converting a date to a string in weektally.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Reads a `YYYY-MM-DD` key as a plain calendar date. No timezone is involved, so a key never
/// shifts by a day around midnight.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// Local calendar date according to `clock`.
pub fn local_today(clock: &dyn Clock) -> NaiveDate {
    clock.time().with_timezone(&Local).date_naive()
}

/// Today's key in the local timezone.
pub fn canonical_today(clock: &dyn Clock) -> String {
    date_key(local_today(clock))
}

/// Returns the Monday of the week containing `date`. Sunday belongs to the week that started six
/// days earlier.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday();
    date - Days::new(offset as u64)
}

pub fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date + Days::new(days)
}

/// The 7 keys of the week starting at `week_start`, in ascending order.
pub fn week_dates(week_start: NaiveDate) -> [String; 7] {
    std::array::from_fn(|i| date_key(add_days(week_start, i as u64)))
}

/// True iff `key` falls within `[week_start, week_start + 7 days)`. Keys that don't parse are in
/// no week.
pub fn in_week(key: &str, week_start: NaiveDate) -> bool {
    let Some(date) = parse_date_key(key) else {
        return false;
    };
    date >= week_start && date < add_days(week_start, 7)
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate, TimeZone, Utc, Weekday};

    use crate::utils::clock::FixedClock;

    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_date_key_is_zero_padded() {
        assert_eq!(date_key(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()), "2024-03-05");
        assert_eq!(parse_date_key("2024-03-05"), NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(parse_date_key("2024-3-5x"), None);
        assert_eq!(parse_date_key(""), None);
    }

    #[test]
    fn test_week_start_is_monday() {
        for offset in 0..7 {
            let date = add_days(monday(), offset);
            assert_eq!(week_start(date), monday(), "offset {offset}");
        }
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(sunday.weekday(), Weekday::Sun);
        assert_eq!(week_start(sunday), monday());
        assert_eq!(week_start(add_days(monday(), 7)), add_days(monday(), 7));
    }

    #[test]
    fn test_week_start_across_year_boundary() {
        let wednesday = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(week_start(wednesday), NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
    }

    #[test]
    fn test_week_dates() {
        let dates = week_dates(NaiveDate::from_ymd_opt(2024, 2, 26).unwrap());
        assert_eq!(
            dates,
            [
                "2024-02-26",
                "2024-02-27",
                "2024-02-28",
                "2024-02-29",
                "2024-03-01",
                "2024-03-02",
                "2024-03-03",
            ]
        );
    }

    #[test]
    fn test_week_membership() {
        let mut date = NaiveDate::from_ymd_opt(2023, 12, 20).unwrap();
        while date < NaiveDate::from_ymd_opt(2024, 1, 20).unwrap() {
            let start = week_start(date);
            let key = date_key(date);
            assert!(in_week(&key, start), "{key}");
            assert!(!in_week(&key, add_days(start, 7)), "{key}");
            date = add_days(date, 1);
        }
    }

    #[test]
    fn test_in_week_bounds() {
        assert!(in_week("2024-01-01", monday()));
        assert!(in_week("2024-01-07", monday()));
        assert!(!in_week("2024-01-08", monday()));
        assert!(!in_week("2023-12-31", monday()));
        assert!(!in_week("not a date", monday()));
    }

    #[test]
    fn test_canonical_today_uses_local_calendar() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
        let expected = clock.0.with_timezone(&chrono::Local).date_naive();
        assert_eq!(canonical_today(&clock), date_key(expected));
        assert_eq!(canonical_today(&clock).len(), 10);
    }
}
