use crate::{
    civil::Date,
    error::Error,
    resolve::{Field, FieldBag, ResolverStyle},
    util::common,
};

/// A calendar system that knows how to combine date fields into a [`Date`].
///
/// Resolution consults the chronology bound to the bag, falling back to
/// [`Iso`] when none is bound. `resolve_date` must consume from the bag
/// every field it combines, and leave alone any field it does not
/// understand. It returns `Ok(None)` when the bag does not hold enough
/// fields to determine a date.
pub trait Chronology: core::fmt::Debug + Send + Sync + 'static {
    /// Returns the name identifying this chronology.
    fn name(&self) -> &'static str;

    /// Attempts to combine the date fields in the bag into a date.
    fn resolve_date(
        &self,
        bag: &mut FieldBag,
        style: ResolverStyle,
    ) -> Result<Option<Date>, Error>;
}

/// The ISO-8601 chronology, i.e., the proleptic Gregorian calendar.
///
/// This is the only chronology provided by this crate and the default when
/// a bag has none bound.
///
/// Date fields are combined by precedence. An `epoch-day` trumps
/// everything. Otherwise a `proleptic-month` is first split into year and
/// month, an `era`/`year-of-era` pair is turned into a proleptic year, and
/// then the most complete group of fields anchored on `year` wins:
/// month/day, then day-of-year, then the aligned week combinations, each
/// falling back to the next. Fields of an incomplete group stay in the bag
/// untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct Iso;

impl Chronology for Iso {
    fn name(&self) -> &'static str {
        "ISO"
    }

    fn resolve_date(
        &self,
        bag: &mut FieldBag,
        style: ResolverStyle,
    ) -> Result<Option<Date>, Error> {
        if let Some(epoch_day) = bag.remove(Field::EpochDay) {
            // Calendar-correct in every style, since leniency cannot give
            // an out-of-range day a second meaning.
            return Date::from_epoch_day(epoch_day).map(Some);
        }
        resolve_proleptic_month(bag, style)?;
        resolve_year_of_era(bag, style)?;
        if !bag.contains(Field::Year) {
            return Ok(None);
        }
        if bag.contains(Field::MonthOfYear) && bag.contains(Field::DayOfMonth)
        {
            return resolve_ymd(bag, style).map(Some);
        }
        if bag.contains(Field::DayOfYear) {
            return resolve_yd(bag, style).map(Some);
        }
        if bag.contains(Field::MonthOfYear)
            && bag.contains(Field::AlignedWeekOfMonth)
        {
            if bag.contains(Field::AlignedDayOfWeekInMonth) {
                return resolve_ymaa(bag, style).map(Some);
            }
            if bag.contains(Field::DayOfWeek) {
                return resolve_ymad(bag, style).map(Some);
            }
        }
        if bag.contains(Field::AlignedWeekOfYear) {
            if bag.contains(Field::AlignedDayOfWeekInYear) {
                return resolve_yaa(bag, style).map(Some);
            }
            if bag.contains(Field::DayOfWeek) {
                return resolve_yad(bag, style).map(Some);
            }
        }
        Ok(None)
    }
}

/// Splits a proleptic month into year and month-of-year, merging them with
/// any year and month already in the bag.
fn resolve_proleptic_month(
    bag: &mut FieldBag,
    style: ResolverStyle,
) -> Result<(), Error> {
    let Some(pm) = bag.remove(Field::ProlepticMonth) else { return Ok(()) };
    if style != ResolverStyle::Lenient {
        Field::ProlepticMonth.check(pm)?;
    }
    bag.set_or_check(Field::MonthOfYear, pm.rem_euclid(12) + 1)?;
    bag.set_or_check(Field::Year, pm.div_euclid(12))?;
    Ok(())
}

/// Turns an era and year-of-era into a proleptic year.
///
/// With an era in the bag, the mapping is exact: era 1 keeps the
/// year-of-era, era 0 maps it to `1 - year-of-era`, anything else is an
/// error. Without an era, SMART and LENIENT assume the current era, while
/// STRICT refuses to guess: if a proleptic year is also present it decides
/// the era, otherwise the year-of-era is left in the bag untouched.
fn resolve_year_of_era(
    bag: &mut FieldBag,
    style: ResolverStyle,
) -> Result<(), Error> {
    let Some(yoe) = bag.get(Field::YearOfEra) else { return Ok(()) };
    let checked_yoe = || -> Result<i64, Error> {
        if style != ResolverStyle::Lenient {
            Field::YearOfEra.check(yoe)?;
        }
        Ok(yoe)
    };
    let bce_year = |yoe: i64| -> Result<i64, Error> {
        1i64.checked_sub(yoe)
            .ok_or_else(|| err!("year for year-of-era {yoe} overflowed"))
    };
    if let Some(era) = bag.remove(Field::Era) {
        bag.remove(Field::YearOfEra);
        let year = match era {
            1 => checked_yoe()?,
            0 => bce_year(checked_yoe()?)?,
            _ => return Err(Error::range(Field::Era.name(), era, 0, 1)),
        };
        return bag.set_or_check(Field::Year, year);
    }
    if style == ResolverStyle::Strict {
        // No era asserted. Only merge when a proleptic year already pins
        // down which era was meant.
        let Some(year) = bag.get(Field::Year) else {
            // The value stays in the bag unresolved, but it still has to
            // be in range.
            checked_yoe()?;
            return Ok(());
        };
        bag.remove(Field::YearOfEra);
        let implied =
            if year > 0 { checked_yoe()? } else { bce_year(checked_yoe()?)? };
        return bag.set_or_check(Field::Year, implied);
    }
    bag.remove(Field::YearOfEra);
    bag.set_or_check(Field::Year, checked_yoe()?)
}

fn take_year(bag: &mut FieldBag) -> Result<i16, Error> {
    // The proleptic year is range checked in every style. Leniency can
    // reinterpret an out-of-range month or day, but a year out of range
    // denotes nothing.
    let year = bag.remove(Field::Year).expect("year is present");
    Ok(Field::Year.check(year)? as i16)
}

fn take_checked(bag: &mut FieldBag, field: Field) -> Result<i64, Error> {
    let value = bag.remove(field).expect("field is present");
    field.check(value)
}

fn take_minus_one(bag: &mut FieldBag, field: Field) -> Result<i64, Error> {
    let value = bag.remove(field).expect("field is present");
    value
        .checked_sub(1)
        .ok_or_else(|| err!("value {value} for {field} overflowed"))
}

fn resolve_ymd(
    bag: &mut FieldBag,
    style: ResolverStyle,
) -> Result<Date, Error> {
    let year = take_year(bag)?;
    if style == ResolverStyle::Lenient {
        let months = take_minus_one(bag, Field::MonthOfYear)?;
        let days = take_minus_one(bag, Field::DayOfMonth)?;
        return Date::new(year, 1, 1)?.add_months(months)?.add_days(days);
    }
    let month = take_checked(bag, Field::MonthOfYear)? as i8;
    let mut day = take_checked(bag, Field::DayOfMonth)? as i8;
    if style == ResolverStyle::Smart {
        day = common::saturate_day_in_month(year, month, day);
    }
    Date::new(year, month, day)
}

fn resolve_yd(
    bag: &mut FieldBag,
    style: ResolverStyle,
) -> Result<Date, Error> {
    let year = take_year(bag)?;
    if style == ResolverStyle::Lenient {
        let days = take_minus_one(bag, Field::DayOfYear)?;
        return Date::new(year, 1, 1)?.add_days(days);
    }
    // Day 366 of a common year fails the calendar-correct constructor
    // even though it passes the outer range.
    let day = take_checked(bag, Field::DayOfYear)? as i16;
    Date::from_year_day(year, day)
}

fn resolve_ymaa(
    bag: &mut FieldBag,
    style: ResolverStyle,
) -> Result<Date, Error> {
    let year = take_year(bag)?;
    if style == ResolverStyle::Lenient {
        let months = take_minus_one(bag, Field::MonthOfYear)?;
        let weeks = take_minus_one(bag, Field::AlignedWeekOfMonth)?;
        let days = take_minus_one(bag, Field::AlignedDayOfWeekInMonth)?;
        return Date::new(year, 1, 1)?
            .add_months(months)?
            .add_weeks(weeks)?
            .add_days(days);
    }
    let month = take_checked(bag, Field::MonthOfYear)? as i8;
    let week = take_checked(bag, Field::AlignedWeekOfMonth)?;
    let dow = take_checked(bag, Field::AlignedDayOfWeekInMonth)?;
    let date = Date::new(year, month, 1)?
        .add_days((week - 1) * 7 + (dow - 1))?;
    if style == ResolverStyle::Strict && date.month() != month {
        return Err(err!(
            "aligned week {week} resolved to {date}, \
             which is outside month {month}"
        ));
    }
    Ok(date)
}

fn resolve_ymad(
    bag: &mut FieldBag,
    style: ResolverStyle,
) -> Result<Date, Error> {
    let year = take_year(bag)?;
    if style == ResolverStyle::Lenient {
        let months = take_minus_one(bag, Field::MonthOfYear)?;
        let weeks = take_minus_one(bag, Field::AlignedWeekOfMonth)?;
        let dow = bag.remove(Field::DayOfWeek).expect("field is present");
        return resolve_aligned(Date::new(year, 1, 1)?, months, weeks, dow);
    }
    let month = take_checked(bag, Field::MonthOfYear)? as i8;
    let week = take_checked(bag, Field::AlignedWeekOfMonth)?;
    let dow = take_checked(bag, Field::DayOfWeek)? as i8;
    let date = Date::new(year, month, 1)?
        .add_days((week - 1) * 7)?
        .next_or_same_weekday(dow)?;
    if style == ResolverStyle::Strict && date.month() != month {
        return Err(err!(
            "aligned week {week} and weekday {dow} resolved to {date}, \
             which is outside month {month}"
        ));
    }
    Ok(date)
}

fn resolve_yaa(
    bag: &mut FieldBag,
    style: ResolverStyle,
) -> Result<Date, Error> {
    let year = take_year(bag)?;
    if style == ResolverStyle::Lenient {
        let weeks = take_minus_one(bag, Field::AlignedWeekOfYear)?;
        let days = take_minus_one(bag, Field::AlignedDayOfWeekInYear)?;
        return Date::new(year, 1, 1)?.add_weeks(weeks)?.add_days(days);
    }
    let week = take_checked(bag, Field::AlignedWeekOfYear)?;
    let dow = take_checked(bag, Field::AlignedDayOfWeekInYear)?;
    let date = Date::new(year, 1, 1)?
        .add_days((week - 1) * 7 + (dow - 1))?;
    if style == ResolverStyle::Strict && date.year() != year {
        return Err(err!(
            "aligned week {week} resolved to {date}, \
             which is outside year {year}"
        ));
    }
    Ok(date)
}

fn resolve_yad(
    bag: &mut FieldBag,
    style: ResolverStyle,
) -> Result<Date, Error> {
    let year = take_year(bag)?;
    if style == ResolverStyle::Lenient {
        let weeks = take_minus_one(bag, Field::AlignedWeekOfYear)?;
        let dow = bag.remove(Field::DayOfWeek).expect("field is present");
        return resolve_aligned(Date::new(year, 1, 1)?, 0, weeks, dow);
    }
    let week = take_checked(bag, Field::AlignedWeekOfYear)?;
    let dow = take_checked(bag, Field::DayOfWeek)? as i8;
    let date = Date::new(year, 1, 1)?
        .add_days((week - 1) * 7)?
        .next_or_same_weekday(dow)?;
    if style == ResolverStyle::Strict && date.year() != year {
        return Err(err!(
            "aligned week {week} and weekday {dow} resolved to {date}, \
             which is outside year {year}"
        ));
    }
    Ok(date)
}

/// Lenient aligned resolution where the day-of-week itself may be out of
/// range: whole weeks are folded out of it by floor division, so weekday 0
/// means "one week back, then Sunday".
fn resolve_aligned(
    base: Date,
    months: i64,
    weeks: i64,
    dow: i64,
) -> Result<Date, Error> {
    let date = base.add_months(months)?.add_weeks(weeks)?;
    let shifted = dow
        .checked_sub(1)
        .ok_or_else(|| err!("value {dow} for day-of-week overflowed"))?;
    let date = date.add_weeks(shifted.div_euclid(7))?;
    date.next_or_same_weekday((shifted.rem_euclid(7) + 1) as i8)
}

#[cfg(test)]
mod tests {
    use crate::resolve::ResolverStyle::*;

    use super::*;

    fn bag(fields: &[(Field, i64)]) -> FieldBag {
        let mut bag = FieldBag::new();
        for &(field, value) in fields {
            bag.set(field, value);
        }
        bag
    }

    fn resolve(
        fields: &[(Field, i64)],
        style: ResolverStyle,
    ) -> Result<Option<Date>, Error> {
        Iso.resolve_date(&mut bag(fields), style)
    }

    #[test]
    fn epoch_day_trumps_everything() {
        let mut b = bag(&[
            (Field::EpochDay, 19_723),
            (Field::Year, 1999),
            (Field::MonthOfYear, 1),
            (Field::DayOfMonth, 1),
        ]);
        let date = Iso.resolve_date(&mut b, Strict).unwrap().unwrap();
        assert_eq!(date, Date::constant(2024, 1, 1));
        // The year/month/day group is left behind for cross-checking.
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn ymd() {
        let got = resolve(
            &[
                (Field::Year, 2024),
                (Field::MonthOfYear, 2),
                (Field::DayOfMonth, 29),
            ],
            Strict,
        );
        assert_eq!(got.unwrap(), Some(Date::constant(2024, 2, 29)));
    }

    #[test]
    fn ymd_smart_clamps_day() {
        let fields = [
            (Field::Year, 2023),
            (Field::MonthOfYear, 2),
            (Field::DayOfMonth, 31),
        ];
        assert_eq!(
            resolve(&fields, Smart).unwrap(),
            Some(Date::constant(2023, 2, 28))
        );
        let err = resolve(&fields, Strict).unwrap_err();
        assert!(err.is_range(), "got: {err}");
    }

    #[test]
    fn ymd_lenient_overflows() {
        // Month 14 of 2023 is February 2024; day 0 walks one day back.
        assert_eq!(
            resolve(
                &[
                    (Field::Year, 2023),
                    (Field::MonthOfYear, 14),
                    (Field::DayOfMonth, 1),
                ],
                Lenient,
            )
            .unwrap(),
            Some(Date::constant(2024, 2, 1))
        );
        assert_eq!(
            resolve(
                &[
                    (Field::Year, 2024),
                    (Field::MonthOfYear, 3),
                    (Field::DayOfMonth, 0),
                ],
                Lenient,
            )
            .unwrap(),
            Some(Date::constant(2024, 2, 29))
        );
    }

    #[test]
    fn year_out_of_range_in_every_style() {
        for style in [Strict, Smart, Lenient] {
            let err = resolve(
                &[
                    (Field::Year, 10_000),
                    (Field::MonthOfYear, 1),
                    (Field::DayOfMonth, 1),
                ],
                style,
            )
            .unwrap_err();
            assert!(err.is_range(), "style {style:?} got: {err}");
        }
    }

    #[test]
    fn day_of_year() {
        assert_eq!(
            resolve(&[(Field::Year, 2024), (Field::DayOfYear, 366)], Smart)
                .unwrap(),
            Some(Date::constant(2024, 12, 31))
        );
        // 2023 is a common year.
        let err = resolve(&[(Field::Year, 2023), (Field::DayOfYear, 366)], Smart)
            .unwrap_err();
        assert!(err.is_range(), "got: {err}");
        assert_eq!(
            resolve(&[(Field::Year, 2023), (Field::DayOfYear, 366)], Lenient)
                .unwrap(),
            Some(Date::constant(2024, 1, 1))
        );
    }

    #[test]
    fn month_day_beats_day_of_year() {
        let mut b = bag(&[
            (Field::Year, 2024),
            (Field::MonthOfYear, 5),
            (Field::DayOfMonth, 6),
            (Field::DayOfYear, 200),
        ]);
        let date = Iso.resolve_date(&mut b, Smart).unwrap().unwrap();
        assert_eq!(date, Date::constant(2024, 5, 6));
        assert!(b.contains(Field::DayOfYear));
    }

    #[test]
    fn day_of_year_beats_aligned_month_weeks() {
        let mut b = bag(&[
            (Field::Year, 2024),
            (Field::MonthOfYear, 3),
            (Field::AlignedWeekOfMonth, 2),
            (Field::AlignedDayOfWeekInMonth, 4),
            (Field::DayOfYear, 71),
        ]);
        let date = Iso.resolve_date(&mut b, Smart).unwrap().unwrap();
        assert_eq!(date, Date::constant(2024, 3, 11));
        // The aligned month group is left behind for cross-checking.
        assert!(b.contains(Field::AlignedWeekOfMonth));

        // A day-of-year out of its range fails even when the aligned
        // month group could have produced a date.
        let err = resolve(
            &[
                (Field::Year, 2024),
                (Field::MonthOfYear, 1),
                (Field::AlignedWeekOfMonth, 1),
                (Field::AlignedDayOfWeekInMonth, 1),
                (Field::DayOfYear, 400),
            ],
            Smart,
        )
        .unwrap_err();
        assert!(err.is_range(), "got: {err}");
    }

    #[test]
    fn proleptic_month_splits() {
        // 24_290 = 2024 * 12 + 2.
        assert_eq!(
            resolve(
                &[(Field::ProlepticMonth, 24_290), (Field::DayOfMonth, 11)],
                Strict,
            )
            .unwrap(),
            Some(Date::constant(2024, 3, 11))
        );
        // A conflicting explicit month is caught by the merge.
        let err = resolve(
            &[
                (Field::ProlepticMonth, 24_290),
                (Field::MonthOfYear, 4),
                (Field::DayOfMonth, 11),
            ],
            Strict,
        )
        .unwrap_err();
        assert!(err.is_conflict(), "got: {err}");
    }

    #[test]
    fn proleptic_month_negative() {
        // -1 is December of year -1 (2 BCE).
        assert_eq!(
            resolve(
                &[(Field::ProlepticMonth, -1), (Field::DayOfMonth, 25)],
                Strict,
            )
            .unwrap(),
            Some(Date::constant(-1, 12, 25))
        );
    }

    #[test]
    fn era_and_year_of_era() {
        let fields = |era| {
            [
                (Field::Era, era),
                (Field::YearOfEra, 5),
                (Field::MonthOfYear, 1),
                (Field::DayOfMonth, 1),
            ]
        };
        assert_eq!(
            resolve(&fields(1), Strict).unwrap(),
            Some(Date::constant(5, 1, 1))
        );
        assert_eq!(
            resolve(&fields(0), Strict).unwrap(),
            Some(Date::constant(-4, 1, 1))
        );
        let err = resolve(&fields(2), Strict).unwrap_err();
        assert!(err.is_range(), "got: {err}");
    }

    #[test]
    fn year_of_era_without_era() {
        let fields = [
            (Field::YearOfEra, 1987),
            (Field::MonthOfYear, 6),
            (Field::DayOfMonth, 30),
        ];
        // SMART and LENIENT assume the current era.
        for style in [Smart, Lenient] {
            assert_eq!(
                resolve(&fields, style).unwrap(),
                Some(Date::constant(1987, 6, 30)),
                "style {style:?}"
            );
        }
        // STRICT refuses to guess and leaves the fields alone.
        let mut b = bag(&fields);
        assert_eq!(Iso.resolve_date(&mut b, Strict).unwrap(), None);
        assert_eq!(b.get(Field::YearOfEra), Some(1987));
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn year_of_era_out_of_range_in_strict() {
        // STRICT leaves a year-of-era without an era unresolved, but an
        // out-of-range value is still an error rather than a leftover.
        let err = resolve(
            &[
                (Field::YearOfEra, -5),
                (Field::MonthOfYear, 1),
                (Field::DayOfMonth, 1),
            ],
            Strict,
        )
        .unwrap_err();
        assert!(err.is_range(), "got: {err}");
    }

    #[test]
    fn year_of_era_with_proleptic_year_strict() {
        // A proleptic year decides which era the year-of-era was in.
        let mut b = bag(&[
            (Field::Year, -4),
            (Field::YearOfEra, 5),
            (Field::MonthOfYear, 1),
            (Field::DayOfMonth, 1),
        ]);
        let date = Iso.resolve_date(&mut b, Strict).unwrap().unwrap();
        assert_eq!(date, Date::constant(-4, 1, 1));

        let err = Iso
            .resolve_date(
                &mut bag(&[
                    (Field::Year, 4),
                    (Field::YearOfEra, 5),
                    (Field::MonthOfYear, 1),
                    (Field::DayOfMonth, 1),
                ]),
                Strict,
            )
            .unwrap_err();
        assert!(err.is_conflict(), "got: {err}");
    }

    #[test]
    fn aligned_week_of_month() {
        // 2024-03-01 is a Friday. Week 2, aligned day 4 is 2024-03-11.
        let fields = [
            (Field::Year, 2024),
            (Field::MonthOfYear, 3),
            (Field::AlignedWeekOfMonth, 2),
            (Field::AlignedDayOfWeekInMonth, 4),
        ];
        assert_eq!(
            resolve(&fields, Strict).unwrap(),
            Some(Date::constant(2024, 3, 11))
        );
    }

    #[test]
    fn aligned_week_of_month_spill() {
        // Week 5 day 5 of February 2023 lands in March.
        let fields = [
            (Field::Year, 2023),
            (Field::MonthOfYear, 2),
            (Field::AlignedWeekOfMonth, 5),
            (Field::AlignedDayOfWeekInMonth, 5),
        ];
        assert!(resolve(&fields, Strict).is_err());
        assert_eq!(
            resolve(&fields, Smart).unwrap(),
            Some(Date::constant(2023, 3, 5))
        );
    }

    #[test]
    fn aligned_week_with_weekday() {
        // Week 2 of March 2024 starts on the 8th (a Friday); the next or
        // same Monday is the 11th.
        let fields = [
            (Field::Year, 2024),
            (Field::MonthOfYear, 3),
            (Field::AlignedWeekOfMonth, 2),
            (Field::DayOfWeek, 1),
        ];
        assert_eq!(
            resolve(&fields, Smart).unwrap(),
            Some(Date::constant(2024, 3, 11))
        );
    }

    #[test]
    fn aligned_week_of_year() {
        // Week 11 of 2024 starts on day 71, which is 2024-03-11 (Monday).
        let fields = [
            (Field::Year, 2024),
            (Field::AlignedWeekOfYear, 11),
            (Field::AlignedDayOfWeekInYear, 1),
        ];
        assert_eq!(
            resolve(&fields, Strict).unwrap(),
            Some(Date::constant(2024, 3, 11))
        );
        let with_dow = [
            (Field::Year, 2024),
            (Field::AlignedWeekOfYear, 11),
            (Field::DayOfWeek, 3),
        ];
        assert_eq!(
            resolve(&with_dow, Smart).unwrap(),
            Some(Date::constant(2024, 3, 13))
        );
    }

    #[test]
    fn lenient_weekday_folds_weeks() {
        // Weekday 0 in lenient aligned resolution means the Sunday before
        // the aligned week.
        let fields = [
            (Field::Year, 2024),
            (Field::AlignedWeekOfYear, 11),
            (Field::DayOfWeek, 0),
        ];
        assert_eq!(
            resolve(&fields, Lenient).unwrap(),
            Some(Date::constant(2024, 3, 10))
        );
    }

    #[test]
    fn incomplete_groups_resolve_to_nothing() {
        let mut b = bag(&[(Field::Year, 2024), (Field::DayOfMonth, 15)]);
        assert_eq!(Iso.resolve_date(&mut b, Smart).unwrap(), None);
        assert_eq!(b.len(), 2);

        let mut b = bag(&[(Field::MonthOfYear, 3), (Field::DayOfMonth, 15)]);
        assert_eq!(Iso.resolve_date(&mut b, Smart).unwrap(), None);
        assert_eq!(b.len(), 2);
    }
}
