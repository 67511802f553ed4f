use chrono::{Datelike, NaiveDate};

/// Maps a calendar date to the (year, week number) pair stamped onto links
/// and digests.
///
/// week = ceil((days_since_jan1 + weekday_of_jan1 + 1) / 7), with Sunday as
/// weekday 0. This is deliberately not ISO-8601: the first partial week of
/// the year counts as week 1 no matter how short it is, and every date of a
/// calendar year belongs to that year (no week 53 spilling into January).
pub fn week_of(date: NaiveDate) -> (i32, u32) {
    // Jan 1 of the same year always exists
    let jan1 = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap();
    let days_since_jan1 = date.ordinal0();
    let jan1_weekday = jan1.weekday().num_days_from_sunday();

    let week = (days_since_jan1 + jan1_weekday + 1 + 6) / 7;
    (date.year(), week)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_jan_first_is_week_one() {
        // 2023-01-01 is a Sunday, 2024-01-01 a Monday, 2022-01-01 a Saturday
        assert_eq!(week_of(ymd(2023, 1, 1)), (2023, 1));
        assert_eq!(week_of(ymd(2024, 1, 1)), (2024, 1));
        assert_eq!(week_of(ymd(2022, 1, 1)), (2022, 1));
    }

    #[test]
    fn test_partial_first_week() {
        // 2022 starts on a Saturday, so week 1 is a single day and the
        // following Sunday already falls into week 2.
        assert_eq!(week_of(ymd(2022, 1, 1)), (2022, 1));
        assert_eq!(week_of(ymd(2022, 1, 2)), (2022, 2));
        assert_eq!(week_of(ymd(2022, 1, 8)), (2022, 2));
        assert_eq!(week_of(ymd(2022, 1, 9)), (2022, 3));
    }

    #[test]
    fn test_stable_within_week() {
        // 2023-01-01 is a Sunday; the first seven days share week 1
        for day in 1..=7 {
            assert_eq!(week_of(ymd(2023, 1, day)), (2023, 1));
        }
        assert_eq!(week_of(ymd(2023, 1, 8)), (2023, 2));
    }

    #[test]
    fn test_deterministic() {
        let d = ymd(2023, 6, 15);
        assert_eq!(week_of(d), week_of(d));
        assert_eq!(week_of(d), (2023, 24));
    }

    #[test]
    fn test_year_end() {
        // 2023-12-31 is a Sunday: days=364, jan1 weekday=0 -> ceil(365/7)=53
        assert_eq!(week_of(ymd(2023, 12, 31)), (2023, 53));
        // the year boundary resets the count
        assert_eq!(week_of(ymd(2024, 1, 1)), (2024, 1));
    }
}
