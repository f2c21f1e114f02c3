use reckon::{
    civil::{Date, DateTime, Time},
    resolve::{
        CustomField, DateQuery, DateTimeQuery, FieldResolution, OffsetQuery,
        Partial, TimestampQuery, ValueRange,
    },
    tz::{Offset, TimeZone, Transition},
    Error, Field, FieldBag, Resolver, ResolverStyle,
};

type Result = anyhow::Result<()>;

/// A two-transition rendition of US Eastern for 2024: DST begins at
/// 2024-03-10T07:00Z and ends at 2024-11-03T06:00Z.
fn us_eastern() -> TimeZone {
    TimeZone::table(
        "America/New_York",
        Offset::constant(-5),
        vec![
            Transition::new(1_710_054_000, Offset::constant(-4)),
            Transition::new(1_730_613_600, Offset::constant(-5)),
        ],
    )
    .unwrap()
}

fn bag(fields: &[(Field, i64)]) -> FieldBag {
    let mut bag = FieldBag::new();
    for &(field, value) in fields {
        bag.set(field, value);
    }
    bag
}

#[test]
fn equivalent_encodings_agree() -> Result {
    // The same instant written four different ways, all in one bag.
    let mut b = bag(&[
        (Field::Year, 2024),
        (Field::MonthOfYear, 3),
        (Field::DayOfMonth, 11),
        (Field::DayOfYear, 71),
        (Field::DayOfWeek, 1),
        (Field::EpochDay, 19_793),
        (Field::SecondOfDay, 34_215),
        (Field::HourOfDay, 9),
        (Field::ClockHourOfAmPm, 9),
        (Field::AmPmOfDay, 0),
    ]);
    b.set_zone_or_check(us_eastern())?;
    let resolved = Resolver::new().style(ResolverStyle::Strict).resolve(b)?;
    assert_eq!(
        resolved.to_datetime()?,
        DateTime::constant(2024, 3, 11, 9, 30, 15, 0)
    );
    let zdt = resolved.to_zoned()?;
    assert_eq!(zdt.offset(), Offset::constant(-4));
    assert_eq!(zdt.timestamp(), resolved.timestamp().unwrap());
    Ok(())
}

#[test]
fn disagreeing_encodings_conflict() -> Result {
    let b = bag(&[
        (Field::Year, 2024),
        (Field::MonthOfYear, 3),
        (Field::DayOfMonth, 11),
        // 2024-03-11 was a Monday, not a Friday.
        (Field::DayOfWeek, 5),
    ]);
    let err = Resolver::new().resolve(b).unwrap_err();
    assert!(err.is_conflict(), "got: {err}");
    Ok(())
}

#[test]
fn styles_differ_on_short_months() -> Result {
    let fields = [
        (Field::Year, 2023),
        (Field::MonthOfYear, 4),
        (Field::DayOfMonth, 31),
    ];
    let strict = Resolver::new().style(ResolverStyle::Strict);
    let smart = Resolver::new().style(ResolverStyle::Smart);
    let lenient = Resolver::new().style(ResolverStyle::Lenient);

    let err = strict.resolve(bag(&fields)).unwrap_err();
    assert!(err.is_range(), "got: {err}");
    assert_eq!(
        smart.resolve(bag(&fields))?.to_date()?,
        Date::constant(2023, 4, 30)
    );
    assert_eq!(
        lenient.resolve(bag(&fields))?.to_date()?,
        Date::constant(2023, 5, 1)
    );
    Ok(())
}

#[test]
fn lenient_rollover_crosses_year() -> Result {
    let resolved = Resolver::new().style(ResolverStyle::Lenient).resolve(bag(
        &[
            (Field::Year, 2023),
            (Field::MonthOfYear, 12),
            (Field::DayOfMonth, 31),
            (Field::HourOfDay, 47),
            (Field::MinuteOfHour, 59),
            (Field::SecondOfMinute, 61),
        ],
    ))?;
    assert_eq!(
        resolved.to_datetime()?,
        DateTime::constant(2024, 1, 2, 0, 0, 1, 0)
    );
    Ok(())
}

#[test]
fn era_requires_strict_agreement() -> Result {
    // Year-of-era without an era: STRICT leaves it unresolved.
    let b = bag(&[
        (Field::YearOfEra, 100),
        (Field::MonthOfYear, 1),
        (Field::DayOfMonth, 1),
    ]);
    let resolved = Resolver::new().style(ResolverStyle::Strict).resolve(b)?;
    assert!(resolved.date().is_none());
    assert_eq!(resolved.get(Field::YearOfEra), Some(100));
    let err = resolved.to_date().unwrap_err();
    assert!(err.is_unresolvable(), "got: {err}");

    // With the era stated, BCE years count backwards from 1.
    let b = bag(&[
        (Field::Era, 0),
        (Field::YearOfEra, 100),
        (Field::MonthOfYear, 1),
        (Field::DayOfMonth, 1),
    ]);
    let resolved = Resolver::new().style(ResolverStyle::Strict).resolve(b)?;
    assert_eq!(resolved.to_date()?, Date::constant(-99, 1, 1));
    Ok(())
}

#[test]
fn instant_round_trips_through_zone() -> Result {
    let timestamp = 1_721_995_200; // 2024-07-26T12:00:00Z
    let mut b = bag(&[(Field::InstantSeconds, timestamp)]);
    b.set_zone_or_check(us_eastern())?;
    let resolved = Resolver::new().resolve(b)?;
    assert_eq!(
        resolved.to_datetime()?,
        DateTime::constant(2024, 7, 26, 8, 0, 0, 0)
    );
    assert_eq!(resolved.timestamp(), Some(timestamp));
    assert_eq!(resolved.to_zoned()?.timestamp(), timestamp);
    Ok(())
}

#[test]
fn instant_cross_checks_against_time_fields() -> Result {
    let mut b = bag(&[
        (Field::InstantSeconds, 1_721_995_200),
        // The instant is 08:00 local, so this conflicts.
        (Field::HourOfDay, 9),
    ]);
    b.set_zone_or_check(us_eastern())?;
    let err = Resolver::new().resolve(b).unwrap_err();
    assert!(err.is_conflict(), "got: {err}");
    Ok(())
}

#[test]
fn gap_datetime_shifts_by_gap_length() -> Result {
    let mut b = bag(&[
        (Field::Year, 2024),
        (Field::MonthOfYear, 3),
        (Field::DayOfMonth, 10),
        (Field::HourOfDay, 2),
        (Field::MinuteOfHour, 15),
    ]);
    b.set_zone_or_check(us_eastern())?;
    let zdt = Resolver::new().resolve(b)?.to_zoned()?;
    assert_eq!(zdt.datetime(), DateTime::constant(2024, 3, 10, 3, 15, 0, 0));
    assert_eq!(zdt.offset(), Offset::constant(-4));
    Ok(())
}

#[test]
fn fold_defaults_to_earlier_offset() -> Result {
    let mut b = bag(&[
        (Field::Year, 2024),
        (Field::MonthOfYear, 11),
        (Field::DayOfMonth, 3),
        (Field::HourOfDay, 1),
        (Field::MinuteOfHour, 30),
    ]);
    b.set_zone_or_check(us_eastern())?;
    let zdt = Resolver::new().resolve(b)?.to_zoned()?;
    assert_eq!(zdt.offset(), Offset::constant(-4));
    assert_eq!(
        zdt.with_later_offset_at_overlap().timestamp() - zdt.timestamp(),
        3_600
    );
    Ok(())
}

#[test]
fn offset_only_gets_fixed_zone() -> Result {
    let b = bag(&[
        (Field::Year, 2024),
        (Field::MonthOfYear, 6),
        (Field::DayOfMonth, 1),
        (Field::HourOfDay, 12),
        (Field::OffsetSeconds, 19_800), // +05:30
    ]);
    let zdt = Resolver::new().resolve(b)?.to_zoned()?;
    assert_eq!(zdt.offset(), Offset::hms(5, 30, 0));
    assert_eq!(
        zdt.timestamp(),
        DateTime::constant(2024, 6, 1, 6, 30, 0, 0)
            .to_timestamp(Offset::UTC)
    );
    Ok(())
}

#[test]
fn no_zone_no_offset_is_unresolvable() -> Result {
    let b = bag(&[
        (Field::Year, 2024),
        (Field::MonthOfYear, 6),
        (Field::DayOfMonth, 1),
        (Field::HourOfDay, 12),
    ]);
    let err = Resolver::new().resolve(b)?.to_zoned().unwrap_err();
    assert!(err.is_unresolvable(), "got: {err}");
    Ok(())
}

#[test]
fn leap_second_marker_survives() -> Result {
    let mut b = bag(&[
        (Field::Year, 2016),
        (Field::MonthOfYear, 12),
        (Field::DayOfMonth, 31),
        (Field::HourOfDay, 23),
        (Field::MinuteOfHour, 59),
        (Field::SecondOfMinute, 59),
    ]);
    b.set_leap_second(true);
    let resolved = Resolver::new().resolve(b)?;
    assert!(resolved.leap_second());
    assert_eq!(
        resolved.to_time()?,
        Time::constant(23, 59, 59, 0)
    );
    Ok(())
}

#[test]
fn snapshot_restore_supports_backtracking() -> Result {
    // A parser tries one alternative, rewinds, then tries another.
    let mut b = FieldBag::new();
    b.set(Field::Year, 2024);
    let snap = b.snapshot();
    b.set_or_check(Field::DayOfYear, 900).unwrap();
    b.restore(snap);
    b.set(Field::MonthOfYear, 3);
    b.set(Field::DayOfMonth, 11);
    let resolved = Resolver::new().resolve(b)?;
    assert_eq!(resolved.to_date()?, Date::constant(2024, 3, 11));
    Ok(())
}

#[test]
fn queries_compose() -> Result {
    let b = bag(&[
        (Field::Year, 2024),
        (Field::MonthOfYear, 3),
        (Field::DayOfMonth, 11),
        (Field::HourOfDay, 9),
        (Field::OffsetSeconds, 3_600),
    ]);
    let resolved = Resolver::new().resolve(b)?;
    assert_eq!(resolved.query(DateQuery), Some(Date::constant(2024, 3, 11)));
    assert_eq!(
        resolved.query(DateTimeQuery),
        Some(DateTime::constant(2024, 3, 11, 9, 0, 0, 0))
    );
    assert_eq!(resolved.query(OffsetQuery), Some(Offset::constant(1)));
    assert_eq!(
        resolved.query(TimestampQuery),
        Some(
            DateTime::constant(2024, 3, 11, 8, 0, 0, 0)
                .to_timestamp(Offset::UTC)
        )
    );
    Ok(())
}

/// A quarter-of-year field, resolving with day-of-quarter into a month
/// and day when both are present.
#[derive(Debug)]
struct Quarter;

#[derive(Debug)]
struct DayOfQuarter;

impl CustomField for Quarter {
    fn name(&self) -> &'static str {
        "quarter-of-year"
    }

    fn range(&self) -> ValueRange {
        ValueRange::new(1, 4)
    }

    fn resolve(
        &self,
        _: &mut FieldBag,
        _: &Partial,
        _: ResolverStyle,
    ) -> core::result::Result<Option<FieldResolution>, Error> {
        // Resolved by the day-of-quarter field.
        Ok(None)
    }
}

impl CustomField for DayOfQuarter {
    fn name(&self) -> &'static str {
        "day-of-quarter"
    }

    fn range(&self) -> ValueRange {
        ValueRange::new(1, 92)
    }

    fn resolve(
        &self,
        bag: &mut FieldBag,
        _: &Partial,
        style: ResolverStyle,
    ) -> core::result::Result<Option<FieldResolution>, Error> {
        let (Some(year), Some(quarter)) =
            (bag.get(Field::Year), bag.get_custom("quarter-of-year"))
        else {
            return Ok(None);
        };
        let Some(day) = bag.get_custom(self.name()) else { return Ok(None) };
        if style != ResolverStyle::Lenient {
            Quarter.range().check("quarter-of-year", quarter)?;
            self.range().check(self.name(), day)?;
        }
        bag.remove(Field::Year);
        bag.remove_custom("quarter-of-year");
        bag.remove_custom(self.name());
        let start = Date::new(year as i16, (quarter as i8 - 1) * 3 + 1, 1)?;
        Ok(Some(FieldResolution::Date(start.add_days(day - 1)?)))
    }
}

#[test]
fn custom_quarter_fields_resolve_together() -> Result {
    let mut b = bag(&[(Field::Year, 2024)]);
    b.set_custom_or_check(std::sync::Arc::new(Quarter), 2)?;
    b.set_custom_or_check(std::sync::Arc::new(DayOfQuarter), 42)?;
    let resolved = Resolver::new().resolve(b)?;
    // Day 42 of Q2 2024: April has 30 days, so May 12.
    assert_eq!(resolved.to_date()?, Date::constant(2024, 5, 12));
    assert_eq!(resolved.get_custom("quarter-of-year"), None);
    Ok(())
}

#[test]
fn custom_field_without_anchor_is_left_over() -> Result {
    // No year in the bag, so day-of-quarter cannot make progress.
    let mut b = FieldBag::new();
    b.set_custom_or_check(std::sync::Arc::new(Quarter), 2)?;
    b.set_custom_or_check(std::sync::Arc::new(DayOfQuarter), 42)?;
    let resolved = Resolver::new().resolve(b)?;
    assert!(resolved.date().is_none());
    assert_eq!(resolved.get_custom("quarter-of-year"), Some(2));
    assert_eq!(resolved.get_custom("day-of-quarter"), Some(42));
    Ok(())
}
