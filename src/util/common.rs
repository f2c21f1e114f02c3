/*!
A collection of datetime related utility functions.

Everything here is written over plain primitive integers so that it can be
used in `const` context. The civil value types in this crate are thin
wrappers over `i16`/`i8`/`i32` fields, so there is no intermediate
representation to convert through.

# Algorithms

The conversions between Gregorian dates and Unix epoch day numbers use the
standard era decomposition over 400 year cycles:

- https://github.com/cassioneri/eaf/
- https://howardhinnant.github.io/date_algorithms.html
*/

/// Returns true if and only if the given year is a leap year.
///
/// A leap year is a year with 366 days. Typical years have 365 days.
#[inline]
pub(crate) const fn is_leap_year(year: i16) -> bool {
    let d = if year % 25 != 0 { 4 } else { 16 };
    (year % d) == 0
}

/// Returns the number of days in the given year and month.
///
/// This correctly returns `29` when the year is a leap year and the month is
/// February. When the given month is invalid, this returns `0`.
#[inline]
pub(crate) const fn days_in_month(year: i16, month: i8) -> i8 {
    if month < 1 || month > 12 {
        return 0;
    }
    if month == 2 {
        if is_leap_year(year) {
            29
        } else {
            28
        }
    } else {
        30 | (month ^ month >> 3)
    }
}

/// Returns the number of days in the given year.
#[inline]
pub(crate) const fn days_in_year(year: i16) -> i16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Saturates the given day in the month.
///
/// That is, if the day exceeds the maximum number of days in the given year
/// and month, then this returns the maximum. Otherwise, it returns the day
/// given.
#[inline]
pub(crate) const fn saturate_day_in_month(
    year: i16,
    month: i8,
    day: i8,
) -> i8 {
    let max = days_in_month(year, month);
    if day > max {
        max
    } else {
        day
    }
}

/// Converts a Gregorian date to a Unix epoch day number.
///
/// The day `1970-01-01` maps to `0`, earlier days map to negative numbers.
/// The year/month/day given must be a valid date.
#[inline]
pub(crate) const fn days_from_civil(year: i16, month: i8, day: i8) -> i64 {
    let y = if month <= 2 { year as i64 - 1 } else { year as i64 };
    let m = month as i64;
    let d = day as i64;
    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let year_of_era = y - era * 400;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100
        + (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5
        + d
        - 1;
    era * 146_097 + day_of_era - 719_468
}

/// Converts a Unix epoch day number to a Gregorian date.
///
/// This is the inverse of [`days_from_civil`]. The day number given must
/// correspond to a date within the supported civil range.
#[inline]
pub(crate) const fn civil_from_days(days: i64) -> (i16, i8, i8) {
    let days = days + 719_468;
    let era = (if days >= 0 { days } else { days - 146_096 }) / 146_097;
    let day_of_era = days - era * 146_097;
    let year_of_era = (day_of_era - day_of_era / 1_460 + day_of_era / 36_524
        - day_of_era / 146_096)
        / 365;
    let mut year = year_of_era + era * 400;
    let day_of_year =
        day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let mp = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * mp + 2) / 5 + 1) as i8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as i8;
    if month <= 2 {
        year += 1;
    }
    (year as i16, month, day)
}

/// Returns the day of the year, in the range `1..=366`, for the given date.
#[inline]
pub(crate) const fn day_of_year(year: i16, month: i8, day: i8) -> i16 {
    (days_from_civil(year, month, day) - days_from_civil(year, 1, 1) + 1)
        as i16
}

/// Returns the weekday for the given epoch day number, with Monday mapped
/// to `1` and Sunday mapped to `7`.
#[inline]
pub(crate) const fn weekday_from_days(days: i64) -> i8 {
    // 1970-01-01 was a Thursday.
    (((days + 3).rem_euclid(7)) + 1) as i8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_is_leap_year() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(!is_leap_year(2025));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(1800));
        assert!(is_leap_year(1600));
        assert!(is_leap_year(0));
        assert!(!is_leap_year(-1));
        assert!(is_leap_year(-4));
        assert!(!is_leap_year(-100));
        assert!(is_leap_year(400));
        assert!(!is_leap_year(9999));
        assert!(!is_leap_year(-9999));
    }

    #[test]
    fn t_days_in_month() {
        assert_eq!(28, days_in_month(-9999, 2));
        assert_eq!(29, days_in_month(2024, 2));
        assert_eq!(31, days_in_month(2024, 1));
        assert_eq!(30, days_in_month(2024, 4));
        assert_eq!(30, days_in_month(2024, 6));
        assert_eq!(30, days_in_month(2024, 9));
        assert_eq!(30, days_in_month(2024, 11));
        assert_eq!(31, days_in_month(2024, 12));
    }

    #[test]
    fn t_epoch_day_conversion() {
        assert_eq!(0, days_from_civil(1970, 1, 1));
        assert_eq!((1970, 1, 1), civil_from_days(0));
        assert_eq!(-1, days_from_civil(1969, 12, 31));
        assert_eq!((1969, 12, 31), civil_from_days(-1));
        assert_eq!(-4_371_587, days_from_civil(-9999, 1, 1));
        assert_eq!((-9999, 1, 1), civil_from_days(-4_371_587));
        assert_eq!(2_932_896, days_from_civil(9999, 12, 31));
        assert_eq!((9999, 12, 31), civil_from_days(2_932_896));
    }

    #[test]
    fn t_day_of_year() {
        assert_eq!(1, day_of_year(2023, 1, 1));
        assert_eq!(365, day_of_year(2023, 12, 31));
        assert_eq!(366, day_of_year(2024, 12, 31));
        assert_eq!(60, day_of_year(2024, 2, 29));
    }

    #[test]
    fn t_weekday() {
        // 1970-01-01 was a Thursday.
        assert_eq!(4, weekday_from_days(0));
        // 2024-03-11 was a Monday.
        assert_eq!(1, weekday_from_days(days_from_civil(2024, 3, 11)));
        // 1969-12-28 was a Sunday.
        assert_eq!(7, weekday_from_days(days_from_civil(1969, 12, 28)));
    }
}
