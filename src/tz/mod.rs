/*!
Time zones and UTC offsets.

A [`TimeZone`] maps between civil datetimes and instants on the timeline.
The mapping is not a bijection: when clocks are moved forward, a range of
civil datetimes is skipped (a "gap"), and when clocks are moved back, a
range of civil datetimes repeats (a "fold", sometimes called an overlap).
[`TimeZone::to_ambiguous`] exposes the full answer for a civil datetime,
and [`Ambiguous`] provides the disambiguation policies for turning that
answer into a [`Zoned`](crate::Zoned) value.

Three kinds of time zone exist: UTC, fixed offset zones and explicit
transition-table zones built via [`TimeZone::table`]. Loading TZif data
from a system time zone database is out of scope for this crate; callers
with real rule data are expected to project it into a transition table.
*/

use alloc::{boxed::Box, string::ToString, sync::Arc, vec::Vec};

use crate::{
    civil::DateTime,
    error::{Error, ErrorContext},
    zoned::Zoned,
};

pub use self::offset::Offset;

mod offset;

/// A representation of a time zone.
///
/// A `TimeZone` is an immutable value. Cloning it is cheap: the rule data,
/// when present, lives behind an `Arc` that is shared by all clones. There
/// is no process-global cache of time zones in this crate; callers that
/// want interning should hold clones of the values they construct.
#[derive(Clone)]
pub struct TimeZone {
    kind: Option<Arc<TimeZoneKind>>,
}

impl TimeZone {
    /// The UTC time zone.
    pub const UTC: TimeZone = TimeZone { kind: None };

    /// Creates a time zone with a fixed offset from UTC.
    ///
    /// The zone's name is the display form of the offset, e.g. `+05:30`.
    pub fn fixed(offset: Offset) -> TimeZone {
        if offset == Offset::UTC {
            return TimeZone::UTC;
        }
        let fixed = TimeZoneFixed::new(offset);
        let kind = TimeZoneKind::Fixed(fixed);
        TimeZone { kind: Some(Arc::new(kind)) }
    }

    /// Creates a time zone from an explicit table of offset transitions.
    ///
    /// `base` is the offset in effect before the first transition. Each
    /// transition takes effect at the given Unix timestamp (in seconds),
    /// switching the zone to the transition's offset.
    ///
    /// # Errors
    ///
    /// This returns an error when the transitions are not sorted by
    /// strictly increasing timestamp.
    pub fn table(
        name: &str,
        base: Offset,
        transitions: Vec<Transition>,
    ) -> Result<TimeZone, Error> {
        let table = TimeZoneTable::new(name, base, transitions)?;
        let kind = TimeZoneKind::Table(table);
        Ok(TimeZone { kind: Some(Arc::new(kind)) })
    }

    /// Returns a human readable name for this time zone.
    pub fn name(&self) -> &str {
        let Some(ref kind) = self.kind else { return "UTC" };
        match **kind {
            TimeZoneKind::Fixed(ref tz) => tz.name(),
            TimeZoneKind::Table(ref tz) => tz.name(),
        }
    }

    /// Returns the offset in effect at the given Unix timestamp (in
    /// seconds).
    pub fn to_offset(&self, timestamp: i64) -> Offset {
        let Some(ref kind) = self.kind else { return Offset::UTC };
        match **kind {
            TimeZoneKind::Fixed(ref tz) => tz.offset(),
            TimeZoneKind::Table(ref tz) => tz.to_offset(timestamp),
        }
    }

    /// Returns the possibly ambiguous mapping of the given civil datetime
    /// onto the timeline in this time zone.
    pub fn to_ambiguous(&self, dt: DateTime) -> Ambiguous {
        let kind = match self.kind {
            None => AmbiguousKind::Unambiguous { offset: Offset::UTC },
            Some(ref kind) => match **kind {
                TimeZoneKind::Fixed(ref tz) => {
                    AmbiguousKind::Unambiguous { offset: tz.offset() }
                }
                TimeZoneKind::Table(ref tz) => tz.to_ambiguous_kind(dt),
            },
        };
        Ambiguous::new(self.clone(), dt, kind)
    }

    /// Returns true when the given offset is a valid interpretation of the
    /// given civil datetime in this time zone.
    ///
    /// For a datetime in a gap there are no valid offsets. For a datetime
    /// in a fold there are exactly two.
    pub fn is_valid_offset(&self, dt: DateTime, offset: Offset) -> bool {
        match *self.to_ambiguous(dt).kind() {
            AmbiguousKind::Unambiguous { offset: valid } => valid == offset,
            AmbiguousKind::Gap { .. } => false,
            AmbiguousKind::Fold { before, after } => {
                offset == before || offset == after
            }
        }
    }

    fn fixed_offset(&self) -> Option<Offset> {
        let Some(ref kind) = self.kind else { return Some(Offset::UTC) };
        match **kind {
            TimeZoneKind::Fixed(ref tz) => Some(tz.offset()),
            _ => None,
        }
    }
}

impl core::fmt::Debug for TimeZone {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_tuple("TimeZone").field(&self.name()).finish()
    }
}

impl Eq for TimeZone {}

/// When two time zones are equal, they are guaranteed to produce the same
/// offsets in all cases.
///
/// The inverse is not necessarily true: two transition tables with
/// identical contents but separate allocations do not compare equal.
impl PartialEq for TimeZone {
    fn eq(&self, rhs: &TimeZone) -> bool {
        match (self.fixed_offset(), rhs.fixed_offset()) {
            (Some(off1), Some(off2)) => return off1 == off2,
            (None, Some(_)) => return false,
            (Some(_), None) => return false,
            _ => {}
        }
        // Neither is fixed, so both kinds must be present.
        Arc::ptr_eq(self.kind.as_ref().unwrap(), rhs.kind.as_ref().unwrap())
    }
}

#[derive(Debug)]
enum TimeZoneKind {
    Fixed(TimeZoneFixed),
    Table(TimeZoneTable),
}

#[derive(Clone)]
struct TimeZoneFixed {
    offset: Offset,
    name: Box<str>,
}

impl TimeZoneFixed {
    fn new(offset: Offset) -> TimeZoneFixed {
        let name = offset.to_string().into();
        TimeZoneFixed { offset, name }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn offset(&self) -> Offset {
        self.offset
    }
}

impl core::fmt::Debug for TimeZoneFixed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_tuple("Fixed").field(&self.offset()).finish()
    }
}

/// A single offset change in a transition-table time zone.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Transition {
    timestamp: i64,
    offset: Offset,
}

impl Transition {
    /// Creates a transition that takes effect at the given Unix timestamp
    /// (in seconds) and switches the zone to the given offset.
    pub fn new(timestamp: i64, offset: Offset) -> Transition {
        Transition { timestamp, offset }
    }
}

struct TimeZoneTable {
    name: Box<str>,
    base: Offset,
    transitions: Vec<Transition>,
}

impl TimeZoneTable {
    fn new(
        name: &str,
        base: Offset,
        transitions: Vec<Transition>,
    ) -> Result<TimeZoneTable, Error> {
        for window in transitions.windows(2) {
            if window[0].timestamp >= window[1].timestamp {
                return Err(err!(
                    "time zone {name} has unsorted transitions: \
                     {} does not precede {}",
                    window[0].timestamp,
                    window[1].timestamp,
                ));
            }
        }
        Ok(TimeZoneTable { name: name.to_string().into(), base, transitions })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_offset(&self, timestamp: i64) -> Offset {
        let i = self
            .transitions
            .partition_point(|t| t.timestamp <= timestamp);
        if i == 0 {
            self.base
        } else {
            self.transitions[i - 1].offset
        }
    }

    fn to_ambiguous_kind(&self, dt: DateTime) -> AmbiguousKind {
        // Seconds of the civil datetime since the epoch, as if it were UTC.
        let local = dt.to_timestamp(Offset::UTC);
        let mut prev = self.base;
        for t in self.transitions.iter() {
            let start_before = t.timestamp + i64::from(prev.seconds());
            let start_after = t.timestamp + i64::from(t.offset.seconds());
            if t.offset > prev {
                // Clocks moved forward. Civil times in
                // [start_before, start_after) were skipped.
                if local < start_before {
                    return AmbiguousKind::Unambiguous { offset: prev };
                }
                if local < start_after {
                    return AmbiguousKind::Gap {
                        before: prev,
                        after: t.offset,
                    };
                }
            } else if t.offset < prev {
                // Clocks moved backward. Civil times in
                // [start_after, start_before) occur twice.
                if local < start_after {
                    return AmbiguousKind::Unambiguous { offset: prev };
                }
                if local < start_before {
                    return AmbiguousKind::Fold {
                        before: prev,
                        after: t.offset,
                    };
                }
            }
            prev = t.offset;
        }
        AmbiguousKind::Unambiguous { offset: prev }
    }
}

impl core::fmt::Debug for TimeZoneTable {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_tuple("Table").field(&self.name()).finish()
    }
}

/// A possibly ambiguous mapping of a civil datetime onto the timeline.
///
/// A value of this type is produced by [`TimeZone::to_ambiguous`]. It
/// captures the civil datetime given, the time zone that was asked, and
/// whether the mapping is unambiguous, in a gap or in a fold. Callers pick
/// one of the policy methods to turn it into a [`Zoned`] value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ambiguous {
    tz: TimeZone,
    dt: DateTime,
    kind: AmbiguousKind,
}

/// The result of mapping a civil datetime onto the timeline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AmbiguousKind {
    /// The offset for a particular civil datetime and time zone is
    /// unambiguous.
    ///
    /// This is the overwhelmingly common case. In general, the only time
    /// this case does not occur is when there is a transition to a
    /// different time zone (rare) or to/from daylight saving time (occurs
    /// for one hour twice a year in many geographic locations).
    Unambiguous {
        /// The only possible offset for the civil datetime given.
        offset: Offset,
    },
    /// The civil datetime falls in a gap: clocks jumped forward over it,
    /// so it never occurred.
    Gap {
        /// The offset in effect immediately before the gap.
        before: Offset,
        /// The offset in effect immediately after the gap.
        after: Offset,
    },
    /// The civil datetime falls in a fold: clocks were set back, so it
    /// occurred twice.
    Fold {
        /// The offset in effect the first time the civil datetime occurred.
        before: Offset,
        /// The offset in effect the second time the civil datetime
        /// occurred.
        after: Offset,
    },
}

impl Ambiguous {
    pub(crate) fn new(
        tz: TimeZone,
        dt: DateTime,
        kind: AmbiguousKind,
    ) -> Ambiguous {
        Ambiguous { tz, dt, kind }
    }

    /// Returns the time zone that was asked.
    pub fn time_zone(&self) -> &TimeZone {
        &self.tz
    }

    /// Returns the civil datetime that was mapped.
    pub fn datetime(&self) -> DateTime {
        self.dt
    }

    /// Returns the kind of mapping found.
    pub fn kind(&self) -> &AmbiguousKind {
        &self.kind
    }

    /// Returns true when the mapping is a gap or a fold.
    pub fn is_ambiguous(&self) -> bool {
        !matches!(self.kind, AmbiguousKind::Unambiguous { .. })
    }

    /// Disambiguates with the "compatible" policy.
    ///
    /// A datetime in a gap is shifted forward by the length of the gap and
    /// takes the offset in effect after the transition. A datetime in a
    /// fold keeps its civil time and takes the earlier ("before") offset.
    ///
    /// # Errors
    ///
    /// This returns an error when shifting a datetime across a gap
    /// overflows the representable civil datetime range.
    pub fn compatible(self) -> Result<Zoned, Error> {
        match self.kind {
            AmbiguousKind::Unambiguous { offset } => {
                Ok(Zoned::new(self.dt, offset, self.tz))
            }
            AmbiguousKind::Gap { before, after } => {
                let length =
                    i64::from(after.seconds()) - i64::from(before.seconds());
                let dt = self.dt.add_seconds(length).with_context(|| {
                    Error::gap_overflow(alloc::format!(
                        "shifting {} forward across a {length} second \
                         transition gap in time zone {} overflowed",
                        self.dt,
                        self.tz.name(),
                    ))
                })?;
                Ok(Zoned::new(dt, after, self.tz))
            }
            AmbiguousKind::Fold { before, .. } => {
                Ok(Zoned::new(self.dt, before, self.tz))
            }
        }
    }

    /// Like [`Ambiguous::compatible`], except that when the datetime falls
    /// in a fold and the preferred offset given is one of the two valid
    /// offsets, the preferred offset is used.
    ///
    /// A preferred offset that is not valid for the datetime is ignored.
    /// Gaps are handled exactly as in `compatible`.
    pub fn preferring(
        self,
        preferred: Option<Offset>,
    ) -> Result<Zoned, Error> {
        if let AmbiguousKind::Fold { before, after } = self.kind {
            if let Some(preferred) = preferred {
                if preferred == before || preferred == after {
                    return Ok(Zoned::new(self.dt, preferred, self.tz));
                }
            }
        }
        self.compatible()
    }

    /// Disambiguates towards the earlier instant.
    ///
    /// A datetime in a fold takes the "before" offset (its first
    /// occurrence). A datetime in a gap takes the "after" offset, which
    /// places it before the gap on the timeline.
    pub fn earlier(self) -> Result<Zoned, Error> {
        let offset = match self.kind {
            AmbiguousKind::Unambiguous { offset } => offset,
            AmbiguousKind::Gap { after, .. } => after,
            AmbiguousKind::Fold { before, .. } => before,
        };
        Ok(Zoned::new(self.dt, offset, self.tz))
    }

    /// Disambiguates towards the later instant.
    ///
    /// A datetime in a fold takes the "after" offset (its second
    /// occurrence). A datetime in a gap takes the "before" offset, which
    /// places it after the gap on the timeline.
    pub fn later(self) -> Result<Zoned, Error> {
        let offset = match self.kind {
            AmbiguousKind::Unambiguous { offset } => offset,
            AmbiguousKind::Gap { before, .. } => before,
            AmbiguousKind::Fold { after, .. } => after,
        };
        Ok(Zoned::new(self.dt, offset, self.tz))
    }

    /// Requires the mapping to be unambiguous, returning an error when the
    /// datetime falls in a gap or a fold.
    pub fn unambiguous(self) -> Result<Zoned, Error> {
        match self.kind {
            AmbiguousKind::Unambiguous { offset } => {
                Ok(Zoned::new(self.dt, offset, self.tz))
            }
            AmbiguousKind::Gap { before, after } => Err(err!(
                "civil datetime {} is ambiguous in time zone {}: it falls \
                 in a gap between offsets {before} and {after}",
                self.dt,
                self.tz.name(),
            )),
            AmbiguousKind::Fold { before, after } => Err(err!(
                "civil datetime {} is ambiguous in time zone {}: it falls \
                 in a fold between offsets {before} and {after}",
                self.dt,
                self.tz.name(),
            )),
        }
    }
}
