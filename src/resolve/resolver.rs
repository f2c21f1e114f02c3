use alloc::vec::Vec;

use crate::{
    civil::{
        time::{NANOS_PER_DAY, NANOS_PER_SECOND},
        Date, DateTime, Time,
    },
    error::{Error, ErrorContext},
    resolve::{Chronology, Field, FieldBag, FieldResolution, Iso, Partial},
    tz::{Offset, TimeZone},
    zoned::Zoned,
};

/// The number of updates a single resolution pass may make to a field bag
/// before it is declared non-terminating. Well behaved fields converge in
/// a handful of updates; this ceiling exists to turn a buggy
/// [`CustomField`](crate::CustomField) into an error instead of a hang.
const RESOLVE_CHANGE_LIMIT: u32 = 50;

/// How leniently field values are interpreted during resolution.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ResolverStyle {
    /// Every field value must be in range and calendar-correct.
    Strict,
    /// Like `Strict`, but a day-of-month one past the end of a short month
    /// is clamped to the month's last day, `24:00:00` means midnight of
    /// the next day, and a missing era defaults to the current one.
    Smart,
    /// Out of range values are interpreted as arithmetic offsets from a
    /// base, so month `14` of 2023 is February 2024 and hour `25` is one
    /// in the morning of the next day. The proleptic year is the one
    /// value that must always be in range.
    Lenient,
}

/// Reconciles a [`FieldBag`] into at most one date, one time and one zone.
///
/// A resolver is cheap to construct and reusable. The default style is
/// [`ResolverStyle::Smart`].
///
/// # Example
///
/// ```
/// use reckon::{Field, FieldBag, Resolver};
///
/// let mut bag = FieldBag::new();
/// bag.set(Field::Year, 2024);
/// bag.set(Field::MonthOfYear, 3);
/// bag.set(Field::DayOfMonth, 11);
/// bag.set(Field::HourOfDay, 9);
///
/// let resolved = Resolver::new().resolve(bag)?;
/// assert_eq!(resolved.to_datetime()?.to_string(), "2024-03-11T09:00:00");
/// # Ok::<(), reckon::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Resolver {
    style: ResolverStyle,
    restrict: Option<Vec<Field>>,
    change_limit: u32,
}

impl Default for Resolver {
    fn default() -> Resolver {
        Resolver::new()
    }
}

impl Resolver {
    /// Creates a new resolver with the `Smart` style and no field
    /// restriction.
    pub fn new() -> Resolver {
        Resolver {
            style: ResolverStyle::Smart,
            restrict: None,
            change_limit: RESOLVE_CHANGE_LIMIT,
        }
    }

    /// Sets the style of this resolver.
    pub fn style(self, style: ResolverStyle) -> Resolver {
        Resolver { style, ..self }
    }

    /// Restricts resolution to the given builtin fields.
    ///
    /// Any other builtin field is dropped from the bag before resolution
    /// starts. This is useful when a format parses, say, a day-of-week
    /// purely for display and its value should not constrain (or
    /// conflict with) the resolved date. Custom fields are always
    /// retained.
    pub fn restrict(mut self, fields: &[Field]) -> Resolver {
        self.restrict = Some(fields.to_vec());
        self
    }

    #[cfg(test)]
    pub(crate) fn change_limit(self, change_limit: u32) -> Resolver {
        Resolver { change_limit, ..self }
    }

    /// Resolves the given bag.
    ///
    /// Resolution combines the bag's fields by precedence into at most
    /// one date and one time, gives every custom field a chance to
    /// resolve itself, cross-checks whatever fields remain against the
    /// result and, when a zone or offset is known, derives the instant.
    /// Fields that took part are consumed; fields that could not
    /// contribute survive on the returned [`Resolved`] value.
    ///
    /// # Errors
    ///
    /// This returns an error when two fields assert contradictory values,
    /// when a value is out of range for the style, or when a custom field
    /// keeps reporting progress past an internal ceiling.
    pub fn resolve(&self, mut bag: FieldBag) -> Result<Resolved, Error> {
        if let Some(ref keep) = self.restrict {
            for field in Field::ALL {
                if !keep.contains(&field) {
                    bag.remove(field);
                }
            }
        }
        trace!("resolving {bag:?} with style {:?}", self.style);
        let state = State {
            bag,
            style: self.style,
            change_limit: self.change_limit,
            date: None,
            time: None,
            excess_days: 0,
        };
        state.resolve()
    }
}

/// The mutable state of one resolution pass.
struct State {
    bag: FieldBag,
    style: ResolverStyle,
    change_limit: u32,
    date: Option<Date>,
    time: Option<Time>,
    excess_days: i64,
}

impl State {
    fn resolve(mut self) -> Result<Resolved, Error> {
        self.resolve_builtin()?;
        self.resolve_custom()?;
        self.resolve_time_defaults()?;
        self.cross_check()?;
        self.apply_excess_days()?;
        self.fill_fractions();
        self.derive_instant()?;
        trace!(
            "resolved date={:?} time={:?} leftover={:?}",
            self.date,
            self.time,
            self.bag,
        );
        Ok(Resolved {
            bag: self.bag,
            date: self.date,
            time: self.time,
            excess_days: self.excess_days,
        })
    }

    fn resolve_builtin(&mut self) -> Result<(), Error> {
        self.resolve_instant_fields()?;
        self.resolve_date_fields()?;
        self.resolve_time_fields()
    }

    /// When the instant is known and a zone or offset can place it, turns
    /// `instant-seconds` into date fields and a second-of-day.
    fn resolve_instant_fields(&mut self) -> Result<(), Error> {
        if !self.bag.contains(Field::InstantSeconds) {
            return Ok(());
        }
        let tz = if let Some(tz) = self.bag.zone() {
            tz.clone()
        } else if let Some(seconds) = self.bag.get(Field::OffsetSeconds) {
            TimeZone::fixed(Offset::from_seconds(seconds)?)
        } else {
            return Ok(());
        };
        let timestamp = self
            .bag
            .remove(Field::InstantSeconds)
            .expect("instant-seconds is present");
        Field::InstantSeconds.check(timestamp)?;
        let offset = tz.to_offset(timestamp);
        let dt = DateTime::from_timestamp(timestamp, offset).context(err!(
            "instant {timestamp} has no representable civil datetime \
             in time zone {}",
            tz.name(),
        ))?;
        trace!("instant {timestamp} is {dt} in {}", tz.name());
        self.update_check_date(dt.date())?;
        self.bag
            .set_or_check(Field::SecondOfDay, dt.time().to_second_of_day())
    }

    fn resolve_date_fields(&mut self) -> Result<(), Error> {
        let resolved = match self.bag.chronology().cloned() {
            Some(chronology) => {
                chronology.resolve_date(&mut self.bag, self.style)?
            }
            None => Iso.resolve_date(&mut self.bag, self.style)?,
        };
        if let Some(date) = resolved {
            self.update_check_date(date)?;
        }
        Ok(())
    }

    /// Folds the many encodings of a time of day towards the canonical
    /// quadruple of hour, minute, second and nanosecond, which is then
    /// combined when complete. Every merge goes through the bag's
    /// conflict check, so two encodings that disagree fail here.
    fn resolve_time_fields(&mut self) -> Result<(), Error> {
        use self::Field::*;

        let lenient = self.style == ResolverStyle::Lenient;
        if let Some(ch) = self.bag.remove(ClockHourOfDay) {
            if self.style == ResolverStyle::Strict
                || (self.style == ResolverStyle::Smart && ch != 0)
            {
                ClockHourOfDay.check(ch)?;
            }
            self.bag.set_or_check(HourOfDay, if ch == 24 { 0 } else { ch })?;
        }
        if let Some(ch) = self.bag.remove(ClockHourOfAmPm) {
            if self.style == ResolverStyle::Strict
                || (self.style == ResolverStyle::Smart && ch != 0)
            {
                ClockHourOfAmPm.check(ch)?;
            }
            self.bag
                .set_or_check(HourOfAmPm, if ch == 12 { 0 } else { ch })?;
        }
        if self.bag.contains(AmPmOfDay) && self.bag.contains(HourOfAmPm) {
            let ap =
                self.bag.remove(AmPmOfDay).expect("am-pm-of-day is present");
            let hap = self
                .bag
                .remove(HourOfAmPm)
                .expect("hour-of-am-pm is present");
            if !lenient {
                AmPmOfDay.check(ap)?;
                HourOfAmPm.check(hap)?;
            }
            let hod = scale_add(ap, 12, hap, HourOfDay)?;
            self.bag.set_or_check(HourOfDay, hod)?;
        }
        if let Some(nod) = self.bag.remove(NanoOfDay) {
            if !lenient {
                NanoOfDay.check(nod)?;
            }
            self.bag.set_or_check(SecondOfDay, nod / NANOS_PER_SECOND)?;
            self.bag.set_or_check(NanoOfSecond, nod % NANOS_PER_SECOND)?;
        }
        if let Some(cod) = self.bag.remove(MicroOfDay) {
            if !lenient {
                MicroOfDay.check(cod)?;
            }
            self.bag.set_or_check(SecondOfDay, cod / 1_000_000)?;
            self.bag.set_or_check(MicroOfSecond, cod % 1_000_000)?;
        }
        if let Some(lod) = self.bag.remove(MilliOfDay) {
            if !lenient {
                MilliOfDay.check(lod)?;
            }
            self.bag.set_or_check(SecondOfDay, lod / 1_000)?;
            self.bag.set_or_check(MilliOfSecond, lod % 1_000)?;
        }
        if let Some(sod) = self.bag.remove(SecondOfDay) {
            if !lenient {
                SecondOfDay.check(sod)?;
            }
            self.bag.set_or_check(HourOfDay, sod / 3_600)?;
            self.bag.set_or_check(MinuteOfHour, (sod / 60) % 60)?;
            self.bag.set_or_check(SecondOfMinute, sod % 60)?;
        }
        if let Some(mod_) = self.bag.remove(MinuteOfDay) {
            if !lenient {
                MinuteOfDay.check(mod_)?;
            }
            self.bag.set_or_check(HourOfDay, mod_ / 60)?;
            self.bag.set_or_check(MinuteOfHour, mod_ % 60)?;
        }
        if self.bag.contains(MicroOfSecond) && self.bag.contains(NanoOfSecond)
        {
            let cos = self
                .bag
                .remove(MicroOfSecond)
                .expect("micro-of-second is present");
            if !lenient {
                MicroOfSecond.check(cos)?;
            }
            let nos =
                self.bag.get(NanoOfSecond).expect("nano-of-second is present");
            let merged = scale_add(cos, 1_000, nos % 1_000, NanoOfSecond)?;
            self.bag.set_or_check(NanoOfSecond, merged)?;
        }
        if self.bag.contains(MilliOfSecond) && self.bag.contains(NanoOfSecond)
        {
            let los = self
                .bag
                .remove(MilliOfSecond)
                .expect("milli-of-second is present");
            if !lenient {
                MilliOfSecond.check(los)?;
            }
            let nos =
                self.bag.get(NanoOfSecond).expect("nano-of-second is present");
            let merged =
                scale_add(los, 1_000_000, nos % 1_000_000, NanoOfSecond)?;
            self.bag.set_or_check(NanoOfSecond, merged)?;
        }
        if self.bag.contains_all(&[
            HourOfDay,
            MinuteOfHour,
            SecondOfMinute,
            NanoOfSecond,
        ]) {
            let hod = self.bag.remove(HourOfDay).expect("checked above");
            let moh = self.bag.remove(MinuteOfHour).expect("checked above");
            let som = self.bag.remove(SecondOfMinute).expect("checked above");
            let nos = self.bag.remove(NanoOfSecond).expect("checked above");
            self.resolve_time(hod, moh, som, nos)?;
        }
        Ok(())
    }

    /// Combines the canonical quadruple into a time of day.
    fn resolve_time(
        &mut self,
        hod: i64,
        moh: i64,
        som: i64,
        nos: i64,
    ) -> Result<(), Error> {
        if self.style == ResolverStyle::Lenient {
            let total = total_nanos(hod, moh, som, nos).ok_or_else(|| {
                err!(
                    "time of {hod}h {moh}m {som}s {nos}ns \
                     overflows a nanosecond total"
                )
            })?;
            let excess = total.div_euclid(NANOS_PER_DAY);
            let time =
                Time::from_nanosecond_of_day(total.rem_euclid(NANOS_PER_DAY))?;
            return self.update_check_time(time, excess);
        }
        let moh = Field::MinuteOfHour.check(moh)?;
        let nos = Field::NanoOfSecond.check(nos)?;
        if self.style == ResolverStyle::Smart
            && hod == 24
            && moh == 0
            && som == 0
            && nos == 0
        {
            // End-of-day midnight: the clock reads 24:00:00 and the date
            // rolls forward one day.
            return self.update_check_time(Time::midnight(), 1);
        }
        let hod = Field::HourOfDay.check(hod)?;
        let som = Field::SecondOfMinute.check(som)?;
        let time = Time::new(hod as i8, moh as i8, som as i8, nos as i32)?;
        self.update_check_time(time, 0)
    }

    /// Gives every custom field a chance to resolve itself, restarting the
    /// scan whenever one reports progress. A field that reports progress
    /// forever trips the change ceiling.
    fn resolve_custom(&mut self) -> Result<(), Error> {
        if self.bag.custom_len() == 0 {
            return Ok(());
        }
        let mut changes = 0u32;
        'scan: loop {
            let mut i = 0;
            while i < self.bag.custom_len() {
                let (field, _) = self.bag.custom_at(i);
                let partial = self.partial();
                let resolution =
                    field.resolve(&mut self.bag, &partial, self.style)?;
                let progressed = match resolution {
                    Some(resolution) => {
                        trace!(
                            "custom field {} produced {resolution:?}",
                            field.name(),
                        );
                        self.merge(resolution)?;
                        true
                    }
                    // Removing its own entry counts as progress too.
                    None => !self.bag.contains_custom(field.name()),
                };
                if progressed {
                    changes += 1;
                    if changes >= self.change_limit {
                        return Err(Error::non_terminating(self.change_limit));
                    }
                    continue 'scan;
                }
                i += 1;
            }
            break;
        }
        if changes > 0 {
            // A resolution may have re-stocked the bag with builtin
            // fields, so fold them again.
            self.resolve_builtin()?;
        }
        Ok(())
    }

    fn merge(&mut self, resolution: FieldResolution) -> Result<(), Error> {
        match resolution {
            FieldResolution::Date(date) => self.update_check_date(date),
            FieldResolution::Time(time) => self.update_check_time(time, 0),
            FieldResolution::DateTime(dt) => {
                self.update_check_date(dt.date())?;
                self.update_check_time(dt.time(), 0)
            }
            FieldResolution::Zoned(dt, tz) => {
                self.bag.set_zone_or_check(tz)?;
                self.update_check_date(dt.date())?;
                self.update_check_time(dt.time(), 0)
            }
        }
    }

    fn partial(&self) -> Partial {
        Partial {
            date: self.date,
            time: self.time,
            zone: self.bag.zone().cloned(),
        }
    }

    /// Builds a time from an hour with the smaller units defaulted to
    /// zero. A second without a minute (or a nanosecond without a second)
    /// cannot be defaulted and leaves everything in the bag.
    fn resolve_time_defaults(&mut self) -> Result<(), Error> {
        use self::Field::*;

        if self.time.is_none() {
            if let Some(los) = self.bag.remove(MilliOfSecond) {
                if self.bag.contains(MicroOfSecond) {
                    let cos = self
                        .bag
                        .get(MicroOfSecond)
                        .expect("micro-of-second is present");
                    let micros =
                        scale_add(los, 1_000, cos % 1_000, MicroOfSecond)?;
                    self.bag.set_or_check(MicroOfSecond, micros)?;
                    self.bag.remove(MicroOfSecond);
                    let nanos = scale_add(micros, 1_000, 0, NanoOfSecond)?;
                    self.bag.set(NanoOfSecond, nanos);
                } else {
                    let nanos = scale_add(los, 1_000_000, 0, NanoOfSecond)?;
                    self.bag.set(NanoOfSecond, nanos);
                }
            } else if let Some(cos) = self.bag.remove(MicroOfSecond) {
                let nanos = scale_add(cos, 1_000, 0, NanoOfSecond)?;
                self.bag.set(NanoOfSecond, nanos);
            }
            if let Some(hod) = self.bag.get(HourOfDay) {
                let moh = self.bag.get(MinuteOfHour);
                let som = self.bag.get(SecondOfMinute);
                let nos = self.bag.get(NanoOfSecond);
                if (moh.is_none() && (som.is_some() || nos.is_some()))
                    || (moh.is_some() && som.is_none() && nos.is_some())
                {
                    return Ok(());
                }
                self.bag.remove(HourOfDay);
                self.bag.remove(MinuteOfHour);
                self.bag.remove(SecondOfMinute);
                self.bag.remove(NanoOfSecond);
                self.resolve_time(
                    hod,
                    moh.unwrap_or(0),
                    som.unwrap_or(0),
                    nos.unwrap_or(0),
                )?;
            }
        }
        if self.style != ResolverStyle::Lenient && !self.bag.builtin_is_empty()
        {
            for field in Field::ALL {
                if !field.is_time_based() {
                    continue;
                }
                if let Some(value) = self.bag.get(field) {
                    field.check(value)?;
                }
            }
        }
        Ok(())
    }

    /// Verifies every leftover field against the resolved date and time.
    /// A field whose value can be re-derived and matches is consumed; a
    /// mismatch is a conflict. Fields that cannot be re-derived (offsets,
    /// custom fields) are left alone.
    fn cross_check(&mut self) -> Result<(), Error> {
        if let Some(date) = self.date {
            for field in Field::ALL {
                let Some(stored) = self.bag.get(field) else { continue };
                let Some(derived) = field.derive_from_date(date) else {
                    continue;
                };
                if derived != stored {
                    return Err(Error::conflict(
                        field.name(),
                        stored,
                        derived,
                        Some(alloc::format!("{date}")),
                    ));
                }
                self.bag.remove(field);
            }
        }
        if let Some(time) = self.time {
            for field in Field::ALL {
                let Some(stored) = self.bag.get(field) else { continue };
                let Some(derived) = field.derive_from_time(time) else {
                    continue;
                };
                if derived != stored {
                    return Err(Error::conflict(
                        field.name(),
                        stored,
                        derived,
                        Some(alloc::format!("{time}")),
                    ));
                }
                self.bag.remove(field);
            }
        }
        Ok(())
    }

    fn apply_excess_days(&mut self) -> Result<(), Error> {
        if self.excess_days == 0 || self.time.is_none() {
            return Ok(());
        }
        if let Some(date) = self.date {
            let shifted = date.add_days(self.excess_days)?;
            trace!(
                "carrying {} excess days: {date} becomes {shifted}",
                self.excess_days,
            );
            self.date = Some(shifted);
            self.excess_days = 0;
        }
        Ok(())
    }

    /// When the seconds are known but no time was assembled, the
    /// fractional fields default so that queries for them succeed.
    fn fill_fractions(&mut self) {
        use self::Field::*;

        if self.time.is_some() {
            return;
        }
        if !self.bag.contains(InstantSeconds)
            && !self.bag.contains(SecondOfDay)
            && !self.bag.contains(SecondOfMinute)
        {
            return;
        }
        if let Some(nos) = self.bag.get(NanoOfSecond) {
            self.bag.set(MicroOfSecond, nos / 1_000);
            self.bag.set(MilliOfSecond, nos / 1_000_000);
        } else {
            self.bag.set(NanoOfSecond, 0);
            self.bag.set(MicroOfSecond, 0);
            self.bag.set(MilliOfSecond, 0);
        }
    }

    /// When a full datetime and an offset or zone are known, derives the
    /// instant. An explicit offset beats the zone.
    fn derive_instant(&mut self) -> Result<(), Error> {
        let (Some(date), Some(time)) = (self.date, self.time) else {
            return Ok(());
        };
        let dt = DateTime::from_parts(date, time);
        if let Some(seconds) = self.bag.get(Field::OffsetSeconds) {
            let offset = Offset::from_seconds(seconds)?;
            self.bag.set(Field::InstantSeconds, dt.to_timestamp(offset));
        } else if let Some(tz) = self.bag.zone().cloned() {
            let zdt = tz.to_ambiguous(dt).compatible()?;
            self.bag.set(Field::InstantSeconds, zdt.timestamp());
        }
        Ok(())
    }

    fn update_check_date(&mut self, date: Date) -> Result<(), Error> {
        match self.date {
            None => {
                self.date = Some(date);
                Ok(())
            }
            Some(existing) if existing == date => Ok(()),
            Some(existing) => {
                Err(Error::conflict("resolved date", existing, date, None))
            }
        }
    }

    fn update_check_time(
        &mut self,
        time: Time,
        excess_days: i64,
    ) -> Result<(), Error> {
        match self.time {
            None => {
                self.time = Some(time);
                self.excess_days = excess_days;
                Ok(())
            }
            Some(existing) => {
                if existing != time {
                    return Err(Error::conflict(
                        "resolved time",
                        existing,
                        time,
                        None,
                    ));
                }
                if self.excess_days != 0
                    && excess_days != 0
                    && self.excess_days != excess_days
                {
                    return Err(Error::conflict(
                        "excess days",
                        self.excess_days,
                        excess_days,
                        None,
                    ));
                }
                self.excess_days = excess_days;
                Ok(())
            }
        }
    }
}

fn total_nanos(hod: i64, moh: i64, som: i64, nos: i64) -> Option<i64> {
    let mut total = hod.checked_mul(3_600 * NANOS_PER_SECOND)?;
    total = total.checked_add(moh.checked_mul(60 * NANOS_PER_SECOND)?)?;
    total = total.checked_add(som.checked_mul(NANOS_PER_SECOND)?)?;
    total.checked_add(nos)
}

fn scale_add(
    value: i64,
    scale: i64,
    addend: i64,
    target: Field,
) -> Result<i64, Error> {
    value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(addend))
        .ok_or_else(|| {
            err!("value {value} overflowed while converting to {target}")
        })
}

/// The outcome of a resolution pass.
///
/// At most one date, one time and one zone were determined; whichever
/// fields could not contribute are still accessible through
/// [`Resolved::get`]. The `to_*` conversions require their component to
/// have been determined and report an unresolvable error otherwise.
#[derive(Clone, Debug)]
pub struct Resolved {
    bag: FieldBag,
    date: Option<Date>,
    time: Option<Time>,
    excess_days: i64,
}

impl Resolved {
    /// Returns the resolved date, if one was determined.
    pub fn date(&self) -> Option<Date> {
        self.date
    }

    /// Returns the resolved time, if one was determined.
    pub fn time(&self) -> Option<Time> {
        self.time
    }

    /// Returns the resolved datetime, if both a date and a time were
    /// determined.
    pub fn datetime(&self) -> Option<DateTime> {
        Some(DateTime::from_parts(self.date?, self.time?))
    }

    /// Returns the zone that was bound during resolution, if any.
    pub fn zone(&self) -> Option<&TimeZone> {
        self.bag.zone()
    }

    /// Returns the offset that was resolved, if any. A leftover offset
    /// value outside the legal range yields `None`.
    pub fn offset(&self) -> Option<Offset> {
        let seconds = self.bag.get(Field::OffsetSeconds)?;
        Offset::from_seconds(seconds).ok()
    }

    /// Returns the instant, in Unix seconds, if one was derived.
    pub fn timestamp(&self) -> Option<i64> {
        self.bag.get(Field::InstantSeconds)
    }

    /// Returns the number of days the resolved time overflowed by, when a
    /// time like `24:00` or a lenient hour `25` rolled past midnight but
    /// there was no date to carry the overflow into.
    pub fn excess_days(&self) -> i64 {
        self.excess_days
    }

    /// Returns true when the source bag described a leap second.
    pub fn leap_second(&self) -> bool {
        self.bag.leap_second()
    }

    /// Returns the value of the given field, either left over from
    /// resolution or re-derived from the resolved date or time.
    pub fn get(&self, field: Field) -> Option<i64> {
        self.bag
            .get(field)
            .or_else(|| self.date.and_then(|d| field.derive_from_date(d)))
            .or_else(|| self.time.and_then(|t| field.derive_from_time(t)))
    }

    /// Returns true when [`Resolved::get`] would return a value for the
    /// given field.
    pub fn is_supported(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Returns the leftover value of the custom field with the given
    /// name, if any.
    pub fn get_custom(&self, name: &str) -> Option<i64> {
        self.bag.get_custom(name)
    }

    /// Runs the given query against this resolution outcome.
    pub fn query<Q: Query>(&self, query: Q) -> Option<Q::Output> {
        query.query(self)
    }

    /// Returns the resolved date.
    ///
    /// # Errors
    ///
    /// This returns an unresolvable error when no date was determined.
    pub fn to_date(&self) -> Result<Date, Error> {
        self.date.ok_or_else(|| {
            Error::unresolvable(alloc::format!(
                "no complete date, leftover fields: {:?}",
                self.bag,
            ))
        })
    }

    /// Returns the resolved time.
    ///
    /// # Errors
    ///
    /// This returns an unresolvable error when no time was determined.
    pub fn to_time(&self) -> Result<Time, Error> {
        self.time.ok_or_else(|| {
            Error::unresolvable(alloc::format!(
                "no complete time, leftover fields: {:?}",
                self.bag,
            ))
        })
    }

    /// Returns the resolved datetime.
    ///
    /// # Errors
    ///
    /// This returns an unresolvable error when either the date or the
    /// time is missing.
    pub fn to_datetime(&self) -> Result<DateTime, Error> {
        Ok(DateTime::from_parts(self.to_date()?, self.to_time()?))
    }

    /// Places the resolved datetime on the timeline.
    ///
    /// When both a zone and an offset were resolved and the offset is one
    /// the zone considers valid for the datetime, the offset picks the
    /// interpretation (this is how a parsed fold instant keeps its
    /// intended meaning). When the offset is not valid for the zone, the
    /// offset is trusted to name an instant and that instant is
    /// reinterpreted under the zone's rules. With only a zone, gaps shift
    /// forward and folds take the earlier interpretation. With only an
    /// offset, the result is in a fixed zone at that offset.
    ///
    /// # Errors
    ///
    /// This returns an unresolvable error when the datetime is incomplete
    /// or when neither a zone nor an offset is available.
    pub fn to_zoned(&self) -> Result<Zoned, Error> {
        let dt = self.to_datetime()?;
        let offset = self
            .bag
            .get(Field::OffsetSeconds)
            .map(Offset::from_seconds)
            .transpose()?;
        let Some(tz) = self.bag.zone().cloned() else {
            let Some(offset) = offset else {
                return Err(Error::unresolvable(
                    "no time zone or offset to place the datetime with",
                ));
            };
            return Ok(Zoned::new(dt, offset, TimeZone::fixed(offset)));
        };
        match offset {
            Some(offset) if tz.is_valid_offset(dt, offset) => {
                Ok(Zoned::new(dt, offset, tz))
            }
            Some(offset) => {
                // The offset names an instant even if it disagrees with
                // the zone's rules. Trust the instant.
                let timestamp = dt.to_timestamp(offset);
                let actual = tz.to_offset(timestamp);
                let shifted = DateTime::from_timestamp(timestamp, actual)?;
                let time = Time::from_nanosecond_of_day(
                    shifted.time().to_second_of_day() * NANOS_PER_SECOND
                        + i64::from(dt.time().subsec_nanosecond()),
                )?;
                Ok(Zoned::new(
                    DateTime::from_parts(shifted.date(), time),
                    actual,
                    tz,
                ))
            }
            None => tz.to_ambiguous(dt).compatible(),
        }
    }
}

/// A typed question to ask of a [`Resolved`] value.
///
/// The unit structs in this module cover the common questions; downstream
/// code can implement the trait to extract domain types of its own.
pub trait Query {
    /// The type this query produces.
    type Output;

    /// Extracts this query's output, or `None` when the resolution did
    /// not determine enough.
    fn query(&self, resolved: &Resolved) -> Option<Self::Output>;
}

/// Queries the resolved civil date.
#[derive(Clone, Copy, Debug)]
pub struct DateQuery;

impl Query for DateQuery {
    type Output = Date;
    fn query(&self, resolved: &Resolved) -> Option<Date> {
        resolved.date()
    }
}

/// Queries the resolved civil time.
#[derive(Clone, Copy, Debug)]
pub struct TimeQuery;

impl Query for TimeQuery {
    type Output = Time;
    fn query(&self, resolved: &Resolved) -> Option<Time> {
        resolved.time()
    }
}

/// Queries the resolved civil datetime.
#[derive(Clone, Copy, Debug)]
pub struct DateTimeQuery;

impl Query for DateTimeQuery {
    type Output = DateTime;
    fn query(&self, resolved: &Resolved) -> Option<DateTime> {
        resolved.datetime()
    }
}

/// Queries the bound time zone.
#[derive(Clone, Copy, Debug)]
pub struct ZoneQuery;

impl Query for ZoneQuery {
    type Output = TimeZone;
    fn query(&self, resolved: &Resolved) -> Option<TimeZone> {
        resolved.zone().cloned()
    }
}

/// Queries the resolved offset from UTC.
#[derive(Clone, Copy, Debug)]
pub struct OffsetQuery;

impl Query for OffsetQuery {
    type Output = Offset;
    fn query(&self, resolved: &Resolved) -> Option<Offset> {
        resolved.offset()
    }
}

/// Queries the derived instant, in Unix seconds.
#[derive(Clone, Copy, Debug)]
pub struct TimestampQuery;

impl Query for TimestampQuery {
    type Output = i64;
    fn query(&self, resolved: &Resolved) -> Option<i64> {
        resolved.timestamp()
    }
}
