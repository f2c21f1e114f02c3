use crate::{
    civil::{Date, DateTime, Time},
    error::Error,
    resolve::{FieldBag, ResolverStyle},
    tz::TimeZone,
};

/// The range of values a field can take, irrespective of any particular
/// date.
///
/// The range is inclusive on both ends. Note that the "outer" range of a
/// field is not necessarily valid for a particular date. For example,
/// `Field::DayOfMonth` has an outer range of `1..=31`, but day `30` is
/// invalid in February.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct ValueRange {
    min: i64,
    max: i64,
}

impl ValueRange {
    /// Creates a new inclusive range of legal values.
    ///
    /// # Panics
    ///
    /// This panics when `min > max`.
    pub const fn new(min: i64, max: i64) -> ValueRange {
        if min > max {
            panic!("invalid value range");
        }
        ValueRange { min, max }
    }

    /// Returns the inclusive minimum of this range.
    pub fn min(self) -> i64 {
        self.min
    }

    /// Returns the inclusive maximum of this range.
    pub fn max(self) -> i64 {
        self.max
    }

    /// Returns true when the given value falls within this range.
    pub fn contains(self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Checks the given value against this range, returning it unchanged
    /// when it is legal and a range error naming `what` otherwise.
    pub fn check(
        self,
        what: impl core::fmt::Display,
        value: i64,
    ) -> Result<i64, Error> {
        if !self.contains(value) {
            return Err(Error::range(what, value, self.min, self.max));
        }
        Ok(value)
    }
}

impl core::fmt::Debug for ValueRange {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// A builtin calendrical or clock field.
///
/// Each field is a named, numerically valued component of a date, a time or
/// an instant. The same point in time can be described through many
/// different combinations of fields; the job of a
/// [`Resolver`](crate::Resolver) is to reconcile whatever combination was
/// parsed into canonical values.
///
/// Fields not covered by this enum can be defined externally by
/// implementing the [`CustomField`] trait.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(usize)]
pub enum Field {
    /// The era: `0` for BCE, `1` for CE.
    Era,
    /// The year within the era, always at least `1`.
    YearOfEra,
    /// The proleptic year, possibly zero or negative.
    Year,
    /// Months counted from year zero: `year * 12 + month - 1`.
    ProlepticMonth,
    /// The month of the year, `1..=12`.
    MonthOfYear,
    /// The day of the month, `1..=31`.
    DayOfMonth,
    /// The day of the year, `1..=366`.
    DayOfYear,
    /// The week within a month, where week one starts on the first day of
    /// the month.
    AlignedWeekOfMonth,
    /// The day within an aligned week of the month, `1..=7`.
    AlignedDayOfWeekInMonth,
    /// The week within a year, where week one starts on January 1st.
    AlignedWeekOfYear,
    /// The day within an aligned week of the year, `1..=7`.
    AlignedDayOfWeekInYear,
    /// The day of the week, with Monday mapped to `1` and Sunday to `7`.
    DayOfWeek,
    /// Days since the Unix epoch `1970-01-01`.
    EpochDay,
    /// `0` for AM, `1` for PM.
    AmPmOfDay,
    /// The hour within AM or PM, `0..=11`.
    HourOfAmPm,
    /// The clock hour within AM or PM, `1..=12`.
    ClockHourOfAmPm,
    /// The hour of the day, `0..=23`.
    HourOfDay,
    /// The clock hour of the day, `1..=24`.
    ClockHourOfDay,
    /// The minute of the hour, `0..=59`.
    MinuteOfHour,
    /// The minute of the day, `0..=1439`.
    MinuteOfDay,
    /// The second of the minute, `0..=59`.
    SecondOfMinute,
    /// The second of the day, `0..=86_399`.
    SecondOfDay,
    /// The millisecond within the second, `0..=999`.
    MilliOfSecond,
    /// The millisecond of the day, `0..=86_399_999`.
    MilliOfDay,
    /// The microsecond within the second, `0..=999_999`.
    MicroOfSecond,
    /// The microsecond of the day, `0..=86_399_999_999`.
    MicroOfDay,
    /// The nanosecond within the second, `0..=999_999_999`.
    NanoOfSecond,
    /// The nanosecond of the day, `0..=86_399_999_999_999`.
    NanoOfDay,
    /// Seconds east of UTC, `-64_800..=64_800`.
    OffsetSeconds,
    /// Seconds since the Unix epoch `1970-01-01T00:00:00Z`.
    InstantSeconds,
}

impl Field {
    /// The number of builtin fields.
    pub(crate) const COUNT: usize = 30;

    /// All builtin fields, in declaration order.
    pub const ALL: [Field; Field::COUNT] = [
        Field::Era,
        Field::YearOfEra,
        Field::Year,
        Field::ProlepticMonth,
        Field::MonthOfYear,
        Field::DayOfMonth,
        Field::DayOfYear,
        Field::AlignedWeekOfMonth,
        Field::AlignedDayOfWeekInMonth,
        Field::AlignedWeekOfYear,
        Field::AlignedDayOfWeekInYear,
        Field::DayOfWeek,
        Field::EpochDay,
        Field::AmPmOfDay,
        Field::HourOfAmPm,
        Field::ClockHourOfAmPm,
        Field::HourOfDay,
        Field::ClockHourOfDay,
        Field::MinuteOfHour,
        Field::MinuteOfDay,
        Field::SecondOfMinute,
        Field::SecondOfDay,
        Field::MilliOfSecond,
        Field::MilliOfDay,
        Field::MicroOfSecond,
        Field::MicroOfDay,
        Field::NanoOfSecond,
        Field::NanoOfDay,
        Field::OffsetSeconds,
        Field::InstantSeconds,
    ];

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Returns a human readable name for this field, e.g. `day-of-month`.
    pub fn name(self) -> &'static str {
        use self::Field::*;
        match self {
            Era => "era",
            YearOfEra => "year-of-era",
            Year => "year",
            ProlepticMonth => "proleptic-month",
            MonthOfYear => "month-of-year",
            DayOfMonth => "day-of-month",
            DayOfYear => "day-of-year",
            AlignedWeekOfMonth => "aligned-week-of-month",
            AlignedDayOfWeekInMonth => "aligned-day-of-week-in-month",
            AlignedWeekOfYear => "aligned-week-of-year",
            AlignedDayOfWeekInYear => "aligned-day-of-week-in-year",
            DayOfWeek => "day-of-week",
            EpochDay => "epoch-day",
            AmPmOfDay => "am-pm-of-day",
            HourOfAmPm => "hour-of-am-pm",
            ClockHourOfAmPm => "clock-hour-of-am-pm",
            HourOfDay => "hour-of-day",
            ClockHourOfDay => "clock-hour-of-day",
            MinuteOfHour => "minute-of-hour",
            MinuteOfDay => "minute-of-day",
            SecondOfMinute => "second-of-minute",
            SecondOfDay => "second-of-day",
            MilliOfSecond => "milli-of-second",
            MilliOfDay => "milli-of-day",
            MicroOfSecond => "micro-of-second",
            MicroOfDay => "micro-of-day",
            NanoOfSecond => "nano-of-second",
            NanoOfDay => "nano-of-day",
            OffsetSeconds => "offset-seconds",
            InstantSeconds => "instant-seconds",
        }
    }

    /// Returns the intrinsic range of legal values for this field.
    ///
    /// The range is the field's "outer" range: a value inside it may still
    /// be invalid for a particular date. For example, day-of-month `31` is
    /// inside the outer range but invalid in April.
    pub fn range(self) -> ValueRange {
        use self::Field::*;
        match self {
            Era => ValueRange::new(0, 1),
            YearOfEra => ValueRange::new(1, 10_000),
            Year => ValueRange::new(-9999, 9999),
            ProlepticMonth => ValueRange::new(-119_988, 119_999),
            MonthOfYear => ValueRange::new(1, 12),
            DayOfMonth => ValueRange::new(1, 31),
            DayOfYear => ValueRange::new(1, 366),
            AlignedWeekOfMonth => ValueRange::new(1, 5),
            AlignedDayOfWeekInMonth => ValueRange::new(1, 7),
            AlignedWeekOfYear => ValueRange::new(1, 53),
            AlignedDayOfWeekInYear => ValueRange::new(1, 7),
            DayOfWeek => ValueRange::new(1, 7),
            EpochDay => {
                ValueRange::new(Date::MIN_EPOCH_DAY, Date::MAX_EPOCH_DAY)
            }
            AmPmOfDay => ValueRange::new(0, 1),
            HourOfAmPm => ValueRange::new(0, 11),
            ClockHourOfAmPm => ValueRange::new(1, 12),
            HourOfDay => ValueRange::new(0, 23),
            ClockHourOfDay => ValueRange::new(1, 24),
            MinuteOfHour => ValueRange::new(0, 59),
            MinuteOfDay => ValueRange::new(0, 1_439),
            SecondOfMinute => ValueRange::new(0, 59),
            SecondOfDay => ValueRange::new(0, 86_399),
            MilliOfSecond => ValueRange::new(0, 999),
            MilliOfDay => ValueRange::new(0, 86_399_999),
            MicroOfSecond => ValueRange::new(0, 999_999),
            MicroOfDay => ValueRange::new(0, 86_399_999_999),
            NanoOfSecond => ValueRange::new(0, 999_999_999),
            NanoOfDay => ValueRange::new(0, 86_399_999_999_999),
            OffsetSeconds => ValueRange::new(-64_800, 64_800),
            InstantSeconds => {
                ValueRange::new(-377_705_116_800, 253_402_300_799)
            }
        }
    }

    /// Returns true when this field is a component of a date.
    pub fn is_date_based(self) -> bool {
        use self::Field::*;
        matches!(
            self,
            Era | YearOfEra
                | Year
                | ProlepticMonth
                | MonthOfYear
                | DayOfMonth
                | DayOfYear
                | AlignedWeekOfMonth
                | AlignedDayOfWeekInMonth
                | AlignedWeekOfYear
                | AlignedDayOfWeekInYear
                | DayOfWeek
                | EpochDay
        )
    }

    /// Returns true when this field is a component of a time of day.
    pub fn is_time_based(self) -> bool {
        use self::Field::*;
        matches!(
            self,
            AmPmOfDay
                | HourOfAmPm
                | ClockHourOfAmPm
                | HourOfDay
                | ClockHourOfDay
                | MinuteOfHour
                | MinuteOfDay
                | SecondOfMinute
                | SecondOfDay
                | MilliOfSecond
                | MilliOfDay
                | MicroOfSecond
                | MicroOfDay
                | NanoOfSecond
                | NanoOfDay
        )
    }

    /// Checks the given value against this field's outer range.
    #[inline]
    pub(crate) fn check(self, value: i64) -> Result<i64, Error> {
        self.range().check(self.name(), value)
    }

    /// Re-derives this field's value from the given date, when this field
    /// is derivable from a date at all.
    pub(crate) fn derive_from_date(self, date: Date) -> Option<i64> {
        use self::Field::*;
        let value = match self {
            Era => i64::from(date.era()),
            YearOfEra => i64::from(date.year_of_era()),
            Year => i64::from(date.year()),
            ProlepticMonth => date.proleptic_month(),
            MonthOfYear => i64::from(date.month()),
            DayOfMonth => i64::from(date.day()),
            DayOfYear => i64::from(date.day_of_year()),
            AlignedWeekOfMonth => (i64::from(date.day()) - 1) / 7 + 1,
            AlignedDayOfWeekInMonth => (i64::from(date.day()) - 1) % 7 + 1,
            AlignedWeekOfYear => (i64::from(date.day_of_year()) - 1) / 7 + 1,
            AlignedDayOfWeekInYear => {
                (i64::from(date.day_of_year()) - 1) % 7 + 1
            }
            DayOfWeek => i64::from(date.weekday()),
            EpochDay => date.to_epoch_day(),
            _ => return None,
        };
        Some(value)
    }

    /// Re-derives this field's value from the given time, when this field
    /// is derivable from a time at all.
    pub(crate) fn derive_from_time(self, time: Time) -> Option<i64> {
        use self::Field::*;
        let hour = i64::from(time.hour());
        let value = match self {
            AmPmOfDay => hour / 12,
            HourOfAmPm => hour % 12,
            ClockHourOfAmPm => {
                if hour % 12 == 0 {
                    12
                } else {
                    hour % 12
                }
            }
            HourOfDay => hour,
            ClockHourOfDay => {
                if hour == 0 {
                    24
                } else {
                    hour
                }
            }
            MinuteOfHour => i64::from(time.minute()),
            MinuteOfDay => time.to_minute_of_day(),
            SecondOfMinute => i64::from(time.second()),
            SecondOfDay => time.to_second_of_day(),
            MilliOfSecond => i64::from(time.subsec_nanosecond()) / 1_000_000,
            MilliOfDay => time.to_nanosecond_of_day() / 1_000_000,
            MicroOfSecond => i64::from(time.subsec_nanosecond()) / 1_000,
            MicroOfDay => time.to_nanosecond_of_day() / 1_000,
            NanoOfSecond => i64::from(time.subsec_nanosecond()),
            NanoOfDay => time.to_nanosecond_of_day(),
            _ => return None,
        };
        Some(value)
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// The result of a field resolving itself.
///
/// A field's self-resolution may consume other fields from the bag and
/// produce a value of any of these kinds. A zoned result binds its time
/// zone to the resolution pass (conflicting with any zone already bound)
/// before degrading to its civil datetime.
#[derive(Clone, Debug)]
pub enum FieldResolution {
    /// A civil date.
    Date(Date),
    /// A civil time.
    Time(Time),
    /// A civil datetime.
    DateTime(DateTime),
    /// A civil datetime with a time zone.
    Zoned(DateTime, TimeZone),
}

/// A read-only view of the partially resolved state of a pass, handed to
/// [`CustomField::resolve`].
#[derive(Clone, Debug)]
pub struct Partial {
    pub(crate) date: Option<Date>,
    pub(crate) time: Option<Time>,
    pub(crate) zone: Option<TimeZone>,
}

impl Partial {
    /// Returns the date resolved so far, if any.
    pub fn date(&self) -> Option<Date> {
        self.date
    }

    /// Returns the time resolved so far, if any.
    pub fn time(&self) -> Option<Time> {
        self.time
    }

    /// Returns the zone bound so far, if any.
    pub fn zone(&self) -> Option<&TimeZone> {
        self.zone.as_ref()
    }
}

/// An externally defined datetime field.
///
/// The builtin [`Field`]s are resolved by the chronology and by the time
/// assembly steps of a resolution pass. Any other field stored in a
/// [`FieldBag`] must implement this trait, and is given the chance to
/// resolve itself during the iterative phase of the pass: its
/// [`resolve`](CustomField::resolve) method may consume fields from the
/// bag (including removing this field's own entry) and produce a
/// [`FieldResolution`].
///
/// Returning `Ok(None)` without removing this field's entry from the bag
/// means "no progress"; the field's value is then cross-checked against
/// the resolved date and time like any builtin leftover, or surfaces
/// unchanged on the [`Resolved`](crate::Resolved) accessor.
///
/// Field identity is the string returned by [`name`](CustomField::name):
/// two `CustomField` values with the same name refer to the same field.
pub trait CustomField: core::fmt::Debug + Send + Sync + 'static {
    /// Returns the name identifying this field.
    fn name(&self) -> &'static str;

    /// Returns the intrinsic range of legal values for this field.
    fn range(&self) -> ValueRange;

    /// Attempts to resolve this field.
    ///
    /// Implementations that make progress must either remove their own
    /// entry from the bag or return a resolution (or both); an
    /// implementation that reports progress forever trips the resolution
    /// loop's change ceiling and fails the pass.
    fn resolve(
        &self,
        bag: &mut FieldBag,
        partial: &Partial,
        style: ResolverStyle,
    ) -> Result<Option<FieldResolution>, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges() {
        assert!(Field::DayOfMonth.range().contains(31));
        assert!(!Field::DayOfMonth.range().contains(32));
        assert!(Field::Year.range().contains(-9999));
        assert!(!Field::Year.range().contains(10_000));
        assert!(Field::NanoOfDay.range().contains(86_399_999_999_999));
        assert!(Field::EpochDay.check(0).is_ok());
        assert!(Field::EpochDay.check(Date::MAX_EPOCH_DAY + 1).is_err());
    }

    #[test]
    fn index_order_matches_all() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i, "for {field}");
        }
    }

    #[test]
    fn derive_date_fields() {
        // 2024-03-11 was a Monday.
        let d = Date::constant(2024, 3, 11);
        assert_eq!(Field::DayOfWeek.derive_from_date(d), Some(1));
        assert_eq!(Field::DayOfYear.derive_from_date(d), Some(71));
        assert_eq!(Field::AlignedWeekOfMonth.derive_from_date(d), Some(2));
        assert_eq!(
            Field::AlignedDayOfWeekInMonth.derive_from_date(d),
            Some(4)
        );
        assert_eq!(Field::ProlepticMonth.derive_from_date(d), Some(24_290));
        assert_eq!(Field::HourOfDay.derive_from_date(d), None);
    }

    #[test]
    fn derive_time_fields() {
        let t = crate::civil::Time::constant(13, 45, 30, 123_456_789);
        assert_eq!(Field::AmPmOfDay.derive_from_time(t), Some(1));
        assert_eq!(Field::HourOfAmPm.derive_from_time(t), Some(1));
        assert_eq!(Field::ClockHourOfAmPm.derive_from_time(t), Some(1));
        assert_eq!(Field::ClockHourOfDay.derive_from_time(t), Some(13));
        assert_eq!(Field::MilliOfSecond.derive_from_time(t), Some(123));
        assert_eq!(Field::MicroOfSecond.derive_from_time(t), Some(123_456));
        assert_eq!(Field::DayOfWeek.derive_from_time(t), None);

        let midnight = crate::civil::Time::midnight();
        assert_eq!(Field::ClockHourOfDay.derive_from_time(midnight), Some(24));
        assert_eq!(Field::ClockHourOfAmPm.derive_from_time(midnight), Some(12));
    }
}
