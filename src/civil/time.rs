use crate::error::Error;

/// The number of nanoseconds in one civil day.
pub(crate) const NANOS_PER_DAY: i64 = 86_400_000_000_000;

/// The number of nanoseconds in one second.
pub(crate) const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// A representation of civil "wall clock" time.
///
/// Conceptually, a `Time` value corresponds to the typical hours and minutes
/// that you might see on a clock. This type also contains the second and
/// fractional subsecond (to nanosecond precision) associated with a time.
///
/// # Civil time
///
/// A `Time` value behaves without regard to daylight saving time or time
/// zones in general. That is, every civil day is exactly
/// `86,400,000,000,000` nanoseconds long; leap seconds cannot be
/// represented. (A resolution pass records a parsed leap second as a flag
/// next to a `Time` with second `59` instead.)
///
/// # Comparisons
///
/// The `Time` type provides both `Eq` and `Ord` trait implementations. When
/// a time `t1` occurs before a time `t2` within a single day, then
/// `t1 < t2`.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Time {
    hour: i8,
    minute: i8,
    second: i8,
    subsec_nanosecond: i32,
}

impl Time {
    /// The minimum representable time, `00:00:00.000000000` (midnight).
    pub const MIN: Time = Time::constant(0, 0, 0, 0);

    /// The maximum representable time, `23:59:59.999999999`.
    pub const MAX: Time = Time::constant(23, 59, 59, 999_999_999);

    /// The time corresponding to midnight. Equivalent to `Time::MIN`, but
    /// semantically distinct.
    pub const fn midnight() -> Time {
        Time::MIN
    }

    /// Creates a new `Time` value from its component hour, minute, second
    /// and fractional nanosecond values.
    ///
    /// # Errors
    ///
    /// This returns an error unless all of the following are true:
    ///
    /// * The hour is in the range `0..=23`.
    /// * The minute is in the range `0..=59`.
    /// * The second is in the range `0..=59`.
    /// * The nanosecond is in the range `0..=999_999_999`.
    #[inline]
    pub fn new(
        hour: i8,
        minute: i8,
        second: i8,
        subsec_nanosecond: i32,
    ) -> Result<Time, Error> {
        if !(0..=23).contains(&hour) {
            return Err(Error::range("hour", i64::from(hour), 0, 23));
        }
        if !(0..=59).contains(&minute) {
            return Err(Error::range("minute", i64::from(minute), 0, 59));
        }
        if !(0..=59).contains(&second) {
            return Err(Error::range("second", i64::from(second), 0, 59));
        }
        if !(0..=999_999_999).contains(&subsec_nanosecond) {
            return Err(Error::range(
                "nanosecond",
                i64::from(subsec_nanosecond),
                0,
                999_999_999,
            ));
        }
        Ok(Time { hour, minute, second, subsec_nanosecond })
    }

    /// Creates a new `Time` value in a `const` context.
    ///
    /// # Panics
    ///
    /// This routine panics when [`Time::new`] would return an error.
    #[inline]
    pub const fn constant(
        hour: i8,
        minute: i8,
        second: i8,
        subsec_nanosecond: i32,
    ) -> Time {
        if hour < 0 || hour > 23 {
            panic!("invalid hour");
        }
        if minute < 0 || minute > 59 {
            panic!("invalid minute");
        }
        if second < 0 || second > 59 {
            panic!("invalid second");
        }
        if subsec_nanosecond < 0 || subsec_nanosecond > 999_999_999 {
            panic!("invalid nanosecond");
        }
        Time { hour, minute, second, subsec_nanosecond }
    }

    /// Creates a `Time` from the number of nanoseconds since midnight.
    ///
    /// # Errors
    ///
    /// This returns an error when the value given is not in the range
    /// `0..=86_399_999_999_999`.
    #[inline]
    pub fn from_nanosecond_of_day(nanosecond: i64) -> Result<Time, Error> {
        if !(0..NANOS_PER_DAY).contains(&nanosecond) {
            return Err(Error::range(
                "nanosecond of day",
                nanosecond,
                0,
                NANOS_PER_DAY - 1,
            ));
        }
        let second_of_day = nanosecond / NANOS_PER_SECOND;
        Ok(Time {
            hour: (second_of_day / 3600) as i8,
            minute: ((second_of_day / 60) % 60) as i8,
            second: (second_of_day % 60) as i8,
            subsec_nanosecond: (nanosecond % NANOS_PER_SECOND) as i32,
        })
    }

    /// Creates a `Time` from the number of seconds since midnight, with a
    /// zero fractional component.
    ///
    /// # Errors
    ///
    /// This returns an error when the value given is not in the range
    /// `0..=86_399`.
    #[inline]
    pub fn from_second_of_day(second: i64) -> Result<Time, Error> {
        if !(0..86_400).contains(&second) {
            return Err(Error::range("second of day", second, 0, 86_399));
        }
        Ok(Time {
            hour: (second / 3600) as i8,
            minute: ((second / 60) % 60) as i8,
            second: (second % 60) as i8,
            subsec_nanosecond: 0,
        })
    }

    /// Returns the hour for this time, in the range `0..=23`.
    #[inline]
    pub fn hour(self) -> i8 {
        self.hour
    }

    /// Returns the minute for this time, in the range `0..=59`.
    #[inline]
    pub fn minute(self) -> i8 {
        self.minute
    }

    /// Returns the second for this time, in the range `0..=59`.
    #[inline]
    pub fn second(self) -> i8 {
        self.second
    }

    /// Returns the fractional nanosecond for this time, in the range
    /// `0..=999_999_999`.
    #[inline]
    pub fn subsec_nanosecond(self) -> i32 {
        self.subsec_nanosecond
    }

    /// Returns the number of seconds since midnight, ignoring the
    /// fractional component. The result is in the range `0..=86_399`.
    #[inline]
    pub fn to_second_of_day(self) -> i64 {
        i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }

    /// Returns the number of minutes since midnight, in the range
    /// `0..=1_439`.
    #[inline]
    pub fn to_minute_of_day(self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }

    /// Returns the number of nanoseconds since midnight, in the range
    /// `0..=86_399_999_999_999`.
    #[inline]
    pub fn to_nanosecond_of_day(self) -> i64 {
        self.to_second_of_day() * NANOS_PER_SECOND
            + i64::from(self.subsec_nanosecond)
    }
}

impl core::fmt::Display for Time {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.subsec_nanosecond != 0 {
            write!(f, ".{:09}", self.subsec_nanosecond)?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Time {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

impl Default for Time {
    fn default() -> Time {
        Time::midnight()
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Time {
    fn arbitrary(g: &mut quickcheck::Gen) -> Time {
        let nanosecond = i64::arbitrary(g).rem_euclid(NANOS_PER_DAY);
        Time::from_nanosecond_of_day(nanosecond).unwrap()
    }
}
