use crate::{
    error::Error,
    util::common::{
        civil_from_days, day_of_year, days_from_civil, days_in_month,
        days_in_year, is_leap_year, saturate_day_in_month, weekday_from_days,
    },
};

/// A representation of a civil date in the Gregorian calendar.
///
/// A `Date` value corresponds to a triple of year, month and day. Every
/// `Date` value is guaranteed to be a valid Gregorian calendar date. For
/// example, both `2023-02-29` and `2023-11-31` are invalid and cannot be
/// represented.
///
/// # Civil dates
///
/// A `Date` value behaves without regard to daylight saving time or time
/// zones in general. When doing arithmetic on dates with day counts, days
/// are considered to always be whole calendar days.
///
/// # Comparisons
///
/// The `Date` type provides both `Eq` and `Ord` trait implementations. When
/// a date `d1` occurs before a date `d2`, then `d1 < d2`.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date {
    year: i16,
    month: i8,
    day: i8,
}

impl Date {
    /// The minimum representable Gregorian date, `-9999-01-01`.
    pub const MIN: Date = Date::constant(-9999, 1, 1);

    /// The maximum representable Gregorian date, `9999-12-31`.
    pub const MAX: Date = Date::constant(9999, 12, 31);

    /// The epoch day number of `Date::MIN`.
    pub(crate) const MIN_EPOCH_DAY: i64 = -4_371_587;

    /// The epoch day number of `Date::MAX`.
    pub(crate) const MAX_EPOCH_DAY: i64 = 2_932_896;

    /// Creates a new `Date` value from its component year, month and day
    /// values.
    ///
    /// # Errors
    ///
    /// This returns an error when the given year-month-day does not
    /// correspond to a valid date. Namely, all of the following must be
    /// true:
    ///
    /// * The year must be in the range `-9999..=9999`.
    /// * The month must be in the range `1..=12`.
    /// * The day must be at least `1` and must be at most the number of
    /// days in the corresponding month. So for example, `2024-02-29` is
    /// valid but `2023-02-29` is not.
    #[inline]
    pub fn new(year: i16, month: i8, day: i8) -> Result<Date, Error> {
        if !(-9999..=9999).contains(&year) {
            return Err(Error::range("year", i64::from(year), -9999, 9999));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::range("month", i64::from(month), 1, 12));
        }
        let max_day = days_in_month(year, month);
        if !(1..=max_day).contains(&day) {
            return Err(Error::range(
                "day",
                i64::from(day),
                1,
                i64::from(max_day),
            ));
        }
        Ok(Date { year, month, day })
    }

    /// Creates a new `Date` value in a `const` context.
    ///
    /// # Panics
    ///
    /// This routine panics when [`Date::new`] would return an error.
    #[inline]
    pub const fn constant(year: i16, month: i8, day: i8) -> Date {
        if year < -9999 || year > 9999 {
            panic!("invalid year");
        }
        if month < 1 || month > 12 {
            panic!("invalid month");
        }
        if day < 1 || day > days_in_month(year, month) {
            panic!("invalid day");
        }
        Date { year, month, day }
    }

    /// Creates a `Date` from a Unix epoch day number, where `0` corresponds
    /// to `1970-01-01`.
    ///
    /// # Errors
    ///
    /// This returns an error when the epoch day is outside the range
    /// `Date::MIN..=Date::MAX`.
    #[inline]
    pub fn from_epoch_day(epoch_day: i64) -> Result<Date, Error> {
        if !(Date::MIN_EPOCH_DAY..=Date::MAX_EPOCH_DAY).contains(&epoch_day) {
            return Err(Error::range(
                "epoch day",
                epoch_day,
                Date::MIN_EPOCH_DAY,
                Date::MAX_EPOCH_DAY,
            ));
        }
        let (year, month, day) = civil_from_days(epoch_day);
        Ok(Date { year, month, day })
    }

    /// Creates a `Date` from a year and a day-of-year.
    ///
    /// # Errors
    ///
    /// This returns an error when `day` is not in the range `1..=365` (or
    /// `1..=366` for a leap year), or when the year is out of range.
    #[inline]
    pub fn from_year_day(year: i16, day: i16) -> Result<Date, Error> {
        // Delegate year validation to the Jan-1 construction.
        let first = Date::new(year, 1, 1)?;
        let max = days_in_year(year);
        if !(1..=max).contains(&day) {
            return Err(Error::range(
                "day of year",
                i64::from(day),
                1,
                i64::from(max),
            ));
        }
        let (year, month, day) =
            civil_from_days(first.to_epoch_day() + i64::from(day) - 1);
        Ok(Date { year, month, day })
    }

    /// Returns the year for this date, in the range `-9999..=9999`.
    #[inline]
    pub fn year(self) -> i16 {
        self.year
    }

    /// Returns the month for this date, in the range `1..=12`.
    #[inline]
    pub fn month(self) -> i8 {
        self.month
    }

    /// Returns the day for this date, in the range `1..=31`.
    #[inline]
    pub fn day(self) -> i8 {
        self.day
    }

    /// Returns the era for this date: `1` for the current era (years one
    /// and above) and `0` for the era before it.
    #[inline]
    pub fn era(self) -> i8 {
        if self.year >= 1 {
            1
        } else {
            0
        }
    }

    /// Returns the year within this date's era, always at least `1`.
    ///
    /// For years one and above this is the year itself. For year zero and
    /// below, year `y` maps to year-of-era `1 - y`.
    #[inline]
    pub fn year_of_era(self) -> i16 {
        if self.year >= 1 {
            self.year
        } else {
            1 - self.year
        }
    }

    /// Returns the day of the year for this date, in the range `1..=366`.
    #[inline]
    pub fn day_of_year(self) -> i16 {
        day_of_year(self.year, self.month, self.day)
    }

    /// Returns the weekday of this date, with Monday mapped to `1` and
    /// Sunday mapped to `7`.
    #[inline]
    pub fn weekday(self) -> i8 {
        weekday_from_days(self.to_epoch_day())
    }

    /// Returns true when this date falls in a leap year.
    #[inline]
    pub fn in_leap_year(self) -> bool {
        is_leap_year(self.year)
    }

    /// Returns the number of days in this date's month.
    #[inline]
    pub fn days_in_month(self) -> i8 {
        days_in_month(self.year, self.month)
    }

    /// Returns the number of days in this date's year.
    #[inline]
    pub fn days_in_year(self) -> i16 {
        days_in_year(self.year)
    }

    /// Returns the first day of this date's month.
    #[inline]
    pub fn first_of_month(self) -> Date {
        Date { year: self.year, month: self.month, day: 1 }
    }

    /// Returns the Unix epoch day number for this date, where `0`
    /// corresponds to `1970-01-01`.
    #[inline]
    pub fn to_epoch_day(self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }

    /// Returns the proleptic month for this date, counting months from
    /// year zero. That is, `year * 12 + month - 1`.
    #[inline]
    pub fn proleptic_month(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    /// Adds the given number of days to this date.
    ///
    /// # Errors
    ///
    /// This returns an error when the result would fall outside the range
    /// `Date::MIN..=Date::MAX`.
    #[inline]
    pub fn add_days(self, days: i64) -> Result<Date, Error> {
        let sum = self
            .to_epoch_day()
            .checked_add(days)
            .ok_or_else(|| err!("adding {days} days to {self} overflowed"))?;
        Date::from_epoch_day(sum)
    }

    /// Adds the given number of weeks to this date.
    ///
    /// # Errors
    ///
    /// This returns an error when the result would fall outside the range
    /// `Date::MIN..=Date::MAX`.
    #[inline]
    pub fn add_weeks(self, weeks: i64) -> Result<Date, Error> {
        let days = weeks
            .checked_mul(7)
            .ok_or_else(|| err!("adding {weeks} weeks to {self} overflowed"))?;
        self.add_days(days)
    }

    /// Adds the given number of months to this date.
    ///
    /// When the day of the resulting year-month combination is invalid, it
    /// is clamped to the last day of that month. For example, one month
    /// after `2024-01-31` is `2024-02-29`.
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting year would fall outside the
    /// range `-9999..=9999`.
    #[inline]
    pub fn add_months(self, months: i64) -> Result<Date, Error> {
        let month0 = self
            .proleptic_month()
            .checked_add(months)
            .ok_or_else(|| {
                err!("adding {months} months to {self} overflowed")
            })?;
        let year = month0.div_euclid(12);
        let month = (month0.rem_euclid(12) + 1) as i8;
        if !(-9999..=9999).contains(&year) {
            return Err(Error::range("year", year, -9999, 9999));
        }
        let year = year as i16;
        let day = saturate_day_in_month(year, month, self.day);
        Ok(Date { year, month, day })
    }

    /// Returns the next date, on or after this one, whose weekday matches
    /// the one given (with Monday mapped to `1` and Sunday mapped to `7`).
    ///
    /// # Errors
    ///
    /// This returns an error when `weekday` is not in the range `1..=7`, or
    /// when the result would exceed `Date::MAX`.
    #[inline]
    pub fn next_or_same_weekday(self, weekday: i8) -> Result<Date, Error> {
        if !(1..=7).contains(&weekday) {
            return Err(Error::range("day of week", i64::from(weekday), 1, 7));
        }
        let diff = i64::from(weekday - self.weekday()).rem_euclid(7);
        self.add_days(diff)
    }
}

impl core::fmt::Display for Date {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.year < 0 {
            write!(
                f,
                "-{:04}-{:02}-{:02}",
                -i32::from(self.year),
                self.month,
                self.day
            )
        } else {
            write!(
                f,
                "{:04}-{:02}-{:02}",
                self.year, self.month, self.day
            )
        }
    }
}

impl core::fmt::Debug for Date {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

impl Default for Date {
    fn default() -> Date {
        Date::constant(0, 1, 1)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Date {
    fn arbitrary(g: &mut quickcheck::Gen) -> Date {
        let year = i16::arbitrary(g).rem_euclid(9999 * 2 + 1) - 9999;
        let month = i8::arbitrary(g).rem_euclid(12) + 1;
        let day = i8::arbitrary(g).rem_euclid(31) + 1;
        let day = saturate_day_in_month(year, month, day);
        Date::constant(year, month, day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max() {
        assert_eq!(Date::MIN.to_epoch_day(), Date::MIN_EPOCH_DAY);
        assert_eq!(Date::MAX.to_epoch_day(), Date::MAX_EPOCH_DAY);
        assert_eq!(Date::from_epoch_day(Date::MIN_EPOCH_DAY).unwrap(), Date::MIN);
        assert_eq!(Date::from_epoch_day(Date::MAX_EPOCH_DAY).unwrap(), Date::MAX);
        assert!(Date::from_epoch_day(Date::MIN_EPOCH_DAY - 1).is_err());
        assert!(Date::from_epoch_day(Date::MAX_EPOCH_DAY + 1).is_err());
    }

    #[test]
    fn invalid() {
        assert!(Date::new(2023, 2, 29).is_err());
        assert!(Date::new(2023, 13, 1).is_err());
        assert!(Date::new(2023, 0, 1).is_err());
        assert!(Date::new(2023, 1, 0).is_err());
        assert!(Date::new(10_000, 1, 1).is_err());
        assert!(Date::new(2024, 2, 29).is_ok());
    }

    #[test]
    fn year_day() {
        assert_eq!(
            Date::from_year_day(2024, 60).unwrap(),
            Date::constant(2024, 2, 29)
        );
        assert_eq!(
            Date::from_year_day(2023, 60).unwrap(),
            Date::constant(2023, 3, 1)
        );
        assert!(Date::from_year_day(2023, 366).is_err());
        assert!(Date::from_year_day(2024, 366).is_ok());
        assert!(Date::from_year_day(2024, 0).is_err());
    }

    #[test]
    fn add_months_clamps() {
        let d = Date::constant(2024, 1, 31);
        assert_eq!(d.add_months(1).unwrap(), Date::constant(2024, 2, 29));
        assert_eq!(d.add_months(-2).unwrap(), Date::constant(2023, 11, 30));
        assert_eq!(d.add_months(12).unwrap(), Date::constant(2025, 1, 31));
        assert!(Date::constant(9999, 12, 1).add_months(1).is_err());
    }

    #[test]
    fn weekdays() {
        // 2024-03-11 was a Monday.
        let d = Date::constant(2024, 3, 11);
        assert_eq!(d.weekday(), 1);
        assert_eq!(d.next_or_same_weekday(1).unwrap(), d);
        assert_eq!(
            d.next_or_same_weekday(7).unwrap(),
            Date::constant(2024, 3, 17)
        );
        assert!(d.next_or_same_weekday(8).is_err());
    }

    #[test]
    fn eras() {
        assert_eq!(Date::constant(2024, 1, 1).era(), 1);
        assert_eq!(Date::constant(2024, 1, 1).year_of_era(), 2024);
        assert_eq!(Date::constant(1, 1, 1).year_of_era(), 1);
        assert_eq!(Date::constant(0, 1, 1).era(), 0);
        assert_eq!(Date::constant(0, 1, 1).year_of_era(), 1);
        assert_eq!(Date::constant(-1, 1, 1).year_of_era(), 2);
    }

    quickcheck::quickcheck! {
        fn prop_epoch_day_roundtrip(d: Date) -> bool {
            Date::from_epoch_day(d.to_epoch_day()).unwrap() == d
        }

        fn prop_year_day_roundtrip(d: Date) -> bool {
            Date::from_year_day(d.year(), d.day_of_year()).unwrap() == d
        }

        fn prop_weekday_in_range(d: Date) -> bool {
            (1..=7).contains(&d.weekday())
        }
    }
}
