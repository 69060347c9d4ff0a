//! Calendar-safe time arithmetic on `YYYYMMDDHH` timestamps
//!
//! Valid times are derived from a forecast's base time plus its lead time.
//! The arithmetic is pure integer work against the Gregorian calendar:
//! no timezone database is consulted, so results are identical on every
//! host regardless of locale or DST state.

/// Exact Gregorian leap-year rule
fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the given month, accounting for leap years
fn days_in_month(year: i64, month: i64) -> i64 {
    const DAYS: [i64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 {
        DAYS[1] + if is_leap_year(year) { 1 } else { 0 }
    } else {
        DAYS[(month - 1) as usize]
    }
}

/// Add an hour offset to a `YYYYMMDDHH` timestamp
///
/// Supports arbitrarily large positive or negative offsets. Day, month and
/// year counters are normalized by repeated rollover rather than any
/// calendar library call.
pub fn add_hours(timestamp: i64, hours: i64) -> i64 {
    let mut year = timestamp / 1_000_000;
    let mut month = (timestamp / 10_000) % 100;
    let mut day = (timestamp / 100) % 100;
    let mut hour = timestamp % 100 + hours;

    while hour >= 24 {
        hour -= 24;
        day += 1;
        if day > days_in_month(year, month) {
            day = 1;
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
    }
    while hour < 0 {
        hour += 24;
        day -= 1;
        if day < 1 {
            month -= 1;
            if month < 1 {
                month = 12;
                year -= 1;
            }
            day = days_in_month(year, month);
        }
    }

    year * 1_000_000 + month * 10_000 + day * 100 + hour
}

/// Extract the hour-of-day component from a `YYYYMMDDHH` timestamp
pub fn hour_of_day(timestamp: i64) -> i64 {
    timestamp % 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_addition() {
        assert_eq!(add_hours(2023061500, 6), 2023061506);
        assert_eq!(add_hours(2023061500, 0), 2023061500);
    }

    #[test]
    fn test_day_rollover() {
        assert_eq!(add_hours(2023061523, 1), 2023061600);
        assert_eq!(add_hours(2023061523, 25), 2023061700);
    }

    #[test]
    fn test_month_rollover() {
        assert_eq!(add_hours(2023063023, 1), 2023070100);
        assert_eq!(add_hours(2023013112, 24), 2023020112);
    }

    #[test]
    fn test_year_rollover() {
        assert_eq!(add_hours(2023123123, 1), 2024010100);
        assert_eq!(add_hours(2023123100, 48), 2024010200);
    }

    #[test]
    fn test_non_leap_february() {
        assert_eq!(add_hours(2023022823, 1), 2023030100);
    }

    #[test]
    fn test_leap_february() {
        assert_eq!(add_hours(2024022823, 1), 2024022900);
        assert_eq!(add_hours(2024022923, 1), 2024030100);
    }

    #[test]
    fn test_century_leap_rule() {
        // 2000 was a leap year (divisible by 400), 2100 is not
        assert_eq!(add_hours(2000022823, 1), 2000022900);
        assert_eq!(add_hours(2100022823, 1), 2100030100);
    }

    #[test]
    fn test_negative_offsets() {
        assert_eq!(add_hours(2023030100, -1), 2023022823);
        assert_eq!(add_hours(2024030100, -1), 2024022923);
        assert_eq!(add_hours(2023010100, -1), 2022123123);
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            (2023061500_i64, 3_i64),
            (2023123123, 1),
            (2024022800, 48),
            (2023010100, -72),
            (2022063012, 240),
        ];
        for (t, dh) in cases {
            assert_eq!(add_hours(add_hours(t, dh), -dh), t, "t={} dh={}", t, dh);
        }
    }

    #[test]
    fn test_large_offsets() {
        // One non-leap year forward
        assert_eq!(add_hours(2023010100, 365 * 24), 2024010100);
        // One leap year forward
        assert_eq!(add_hours(2024010100, 366 * 24), 2025010100);
    }

    #[test]
    fn test_hour_of_day() {
        assert_eq!(hour_of_day(2023061506), 6);
        assert_eq!(hour_of_day(2023061500), 0);
    }
}
