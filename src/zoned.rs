use crate::{
    civil::{Date, DateTime, Time},
    tz::{AmbiguousKind, Offset, TimeZone},
};

/// A civil datetime paired with the time zone and offset that place it on
/// the timeline.
///
/// A `Zoned` value is always internally consistent: its offset is one that
/// its time zone considers valid for its civil datetime (or, for a
/// datetime reconstructed from an instant, the offset in effect at that
/// instant). Values of this type are produced by the disambiguation
/// policies on [`crate::tz::Ambiguous`] and by
/// [`crate::Resolved::to_zoned`]; they are never constructed from raw
/// parts by callers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Zoned {
    dt: DateTime,
    offset: Offset,
    tz: TimeZone,
}

impl Zoned {
    pub(crate) fn new(dt: DateTime, offset: Offset, tz: TimeZone) -> Zoned {
        Zoned { dt, offset, tz }
    }

    /// Returns the civil datetime of this value.
    #[inline]
    pub fn datetime(&self) -> DateTime {
        self.dt
    }

    /// Returns the civil date of this value.
    #[inline]
    pub fn date(&self) -> Date {
        self.dt.date()
    }

    /// Returns the civil time of this value.
    #[inline]
    pub fn time(&self) -> Time {
        self.dt.time()
    }

    /// Returns the offset from UTC of this value.
    #[inline]
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Returns the time zone of this value.
    #[inline]
    pub fn time_zone(&self) -> &TimeZone {
        &self.tz
    }

    /// Returns the Unix timestamp, in seconds, of this value. The
    /// fractional nanosecond component of the civil time is discarded.
    #[inline]
    pub fn timestamp(&self) -> i64 {
        self.dt.to_timestamp(self.offset)
    }

    /// When this value's civil datetime falls in a fold (clocks set back),
    /// returns the same civil datetime interpreted with the earlier of the
    /// two valid offsets. Otherwise returns this value unchanged.
    pub fn with_earlier_offset_at_overlap(&self) -> Zoned {
        match *self.tz.to_ambiguous(self.dt).kind() {
            AmbiguousKind::Fold { before, .. } => {
                Zoned { offset: before, ..self.clone() }
            }
            _ => self.clone(),
        }
    }

    /// When this value's civil datetime falls in a fold (clocks set back),
    /// returns the same civil datetime interpreted with the later of the
    /// two valid offsets. Otherwise returns this value unchanged.
    pub fn with_later_offset_at_overlap(&self) -> Zoned {
        match *self.tz.to_ambiguous(self.dt).kind() {
            AmbiguousKind::Fold { after, .. } => {
                Zoned { offset: after, ..self.clone() }
            }
            _ => self.clone(),
        }
    }
}

impl core::fmt::Display for Zoned {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}{}[{}]", self.dt, self.offset, self.tz.name())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::{civil::DateTime, tz::testzones};

    use super::*;

    #[test]
    fn overlap_offset_switching() {
        let tz = testzones::us_eastern_2024();
        let dt = DateTime::constant(2024, 11, 3, 1, 30, 0, 0);
        let zdt = tz.to_ambiguous(dt).compatible().unwrap();
        assert_eq!(zdt.offset(), Offset::constant(-4));

        let later = zdt.with_later_offset_at_overlap();
        assert_eq!(later.offset(), Offset::constant(-5));
        assert_eq!(later.datetime(), dt);
        // The two interpretations are one hour apart on the timeline.
        assert_eq!(later.timestamp() - zdt.timestamp(), 3_600);

        let earlier = later.with_earlier_offset_at_overlap();
        assert_eq!(earlier, zdt);
    }

    #[test]
    fn overlap_switching_is_noop_outside_fold() {
        let tz = testzones::us_eastern_2024();
        let dt = DateTime::constant(2024, 7, 4, 12, 0, 0, 0);
        let zdt = tz.to_ambiguous(dt).compatible().unwrap();
        assert_eq!(zdt.with_earlier_offset_at_overlap(), zdt);
        assert_eq!(zdt.with_later_offset_at_overlap(), zdt);
    }

    #[test]
    fn timestamp() {
        let zdt = Zoned::new(
            DateTime::constant(1970, 1, 1, 0, 0, 0, 0),
            Offset::constant(2),
            TimeZone::fixed(Offset::constant(2)),
        );
        assert_eq!(zdt.timestamp(), -7_200);
        assert_eq!(zdt.to_string(), "1970-01-01T00:00:00+02[+02]");
    }
}
