use crate::{
    civil::{Date, Time},
    error::Error,
    tz::Offset,
};

/// A representation of a civil datetime in the Gregorian calendar.
///
/// A `DateTime` value corresponds to a pair of a [`Date`] and a [`Time`].
/// That is, a datetime contains a year, month, day, hour, minute, second and
/// the fractional number of nanoseconds.
///
/// Like the types it is composed of, a `DateTime` behaves without regard to
/// daylight saving time or time zones in general. Placing one on the
/// timeline requires pairing it with an [`Offset`], or resolving it through
/// a [`TimeZone`](crate::tz::TimeZone), which may shift it when it falls in
/// a transition gap.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DateTime {
    date: Date,
    time: Time,
}

impl DateTime {
    /// The minimum representable datetime.
    pub const MIN: DateTime = DateTime { date: Date::MIN, time: Time::MIN };

    /// The maximum representable datetime.
    pub const MAX: DateTime = DateTime { date: Date::MAX, time: Time::MAX };

    /// Creates a new `DateTime` from its constituent date and time.
    #[inline]
    pub fn from_parts(date: Date, time: Time) -> DateTime {
        DateTime { date, time }
    }

    /// Creates a new `DateTime` value in a `const` context.
    ///
    /// # Panics
    ///
    /// This panics when any component is invalid, with the same rules as
    /// [`Date::constant`] and [`Time::constant`].
    #[inline]
    pub const fn constant(
        year: i16,
        month: i8,
        day: i8,
        hour: i8,
        minute: i8,
        second: i8,
        subsec_nanosecond: i32,
    ) -> DateTime {
        DateTime {
            date: Date::constant(year, month, day),
            time: Time::constant(hour, minute, second, subsec_nanosecond),
        }
    }

    /// Creates a `DateTime` from a Unix timestamp in seconds and an offset
    /// from UTC. The fractional component of the result is zero.
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting date would be outside the
    /// range `Date::MIN..=Date::MAX`.
    #[inline]
    pub fn from_timestamp(
        timestamp: i64,
        offset: Offset,
    ) -> Result<DateTime, Error> {
        let local = timestamp
            .checked_add(i64::from(offset.seconds()))
            .ok_or_else(|| {
                err!("applying offset {offset} to timestamp {timestamp} overflowed")
            })?;
        let date = Date::from_epoch_day(local.div_euclid(86_400))?;
        let time = Time::from_second_of_day(local.rem_euclid(86_400))?;
        Ok(DateTime { date, time })
    }

    /// Returns the date component of this datetime.
    #[inline]
    pub fn date(self) -> Date {
        self.date
    }

    /// Returns the time component of this datetime.
    #[inline]
    pub fn time(self) -> Time {
        self.time
    }

    /// Returns this datetime with its date replaced by the one given.
    #[inline]
    pub fn with_date(self, date: Date) -> DateTime {
        DateTime { date, ..self }
    }

    /// Returns the Unix timestamp, in seconds, of this datetime when
    /// interpreted with the given offset from UTC. The fractional
    /// nanosecond component is discarded.
    #[inline]
    pub fn to_timestamp(self, offset: Offset) -> i64 {
        // The min/max timestamps comfortably fit in i64 seconds, so plain
        // arithmetic cannot overflow here.
        self.date.to_epoch_day() * 86_400 + self.time.to_second_of_day()
            - i64::from(offset.seconds())
    }

    /// Adds the given number of seconds to this datetime.
    ///
    /// # Errors
    ///
    /// This returns an error when the result would be outside the
    /// representable datetime range.
    #[inline]
    pub fn add_seconds(self, seconds: i64) -> Result<DateTime, Error> {
        let second_of_day = self
            .time
            .to_second_of_day()
            .checked_add(seconds)
            .ok_or_else(|| {
                err!("adding {seconds} seconds to {self} overflowed")
            })?;
        let date = self.date.add_days(second_of_day.div_euclid(86_400))?;
        let time = Time::from_nanosecond_of_day(
            second_of_day.rem_euclid(86_400) * 1_000_000_000
                + i64::from(self.time.subsec_nanosecond()),
        )?;
        Ok(DateTime { date, time })
    }
}

impl core::fmt::Display for DateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}T{}", self.date, self.time)
    }
}

impl core::fmt::Debug for DateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for DateTime {
    fn arbitrary(g: &mut quickcheck::Gen) -> DateTime {
        DateTime { date: Date::arbitrary(g), time: Time::arbitrary(g) }
    }
}
