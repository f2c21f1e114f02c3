use crate::error::Error;

/// Represents a fixed time zone offset.
///
/// Negative offsets correspond to time zones west of the prime meridian,
/// while positive offsets correspond to time zones east of the prime
/// meridian. Equivalently, in all cases, `civil-time - offset = UTC`.
///
/// # Display format
///
/// This type implements the `core::fmt::Display` trait. It will convert the
/// offset to a string format in the form `{sign}{hours}[:{minutes}[:{seconds}]]`,
/// where `minutes` and `seconds` are only present when non-zero. For
/// example, `-05`, `+05:30` and `+00:19:32`.
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Offset {
    seconds: i32,
}

impl Offset {
    /// The minimum possible time zone offset, `-18:00`.
    pub const MIN: Offset = Offset { seconds: -64_800 };

    /// The maximum possible time zone offset, `+18:00`.
    pub const MAX: Offset = Offset { seconds: 64_800 };

    /// The offset corresponding to UTC. That is, no offset at all.
    ///
    /// This is defined to always be equivalent to `Offset::ZERO`, but it is
    /// semantically distinct. This ought to be used when UTC is desired
    /// specifically, while `Offset::ZERO` ought to be used when one wants
    /// to express "no offset."
    pub const UTC: Offset = Offset::ZERO;

    /// The offset corresponding to no offset at all.
    pub const ZERO: Offset = Offset { seconds: 0 };

    /// Creates a new time zone offset in a `const` context from a given
    /// number of hours.
    ///
    /// The fallible non-const version of this constructor is
    /// [`Offset::from_seconds`].
    ///
    /// # Panics
    ///
    /// This routine panics when the given number of hours is out of range.
    /// Namely, `hours` must be in the range `-18..=18`.
    #[inline]
    pub const fn constant(hours: i8) -> Offset {
        if hours < -18 || hours > 18 {
            panic!("invalid offset hours");
        }
        Offset { seconds: hours as i32 * 3_600 }
    }

    /// Creates a new time zone offset in a `const` context from a given
    /// number of seconds.
    ///
    /// # Panics
    ///
    /// This routine panics when the given number of seconds is out of
    /// range. The range is `-64_800..=64_800` (`-18:00..=+18:00`).
    #[inline]
    pub const fn constant_seconds(seconds: i32) -> Offset {
        if seconds < -64_800 || seconds > 64_800 {
            panic!("invalid offset seconds");
        }
        Offset { seconds }
    }

    /// Creates a new time zone offset from a given number of hours, minutes
    /// and seconds, in a `const` context.
    ///
    /// The sign of `hours` is applied to the whole offset, so
    /// `Offset::hms(-5, 30, 0)` is `-05:30`.
    ///
    /// # Panics
    ///
    /// This routine panics when the resulting offset is out of range.
    #[inline]
    pub const fn hms(hours: i8, minutes: i8, seconds: i8) -> Offset {
        let sign = if hours < 0 { -1 } else { 1 };
        let magnitude = (hours as i32).unsigned_abs() as i32 * 3_600
            + minutes as i32 * 60
            + seconds as i32;
        Offset::constant_seconds(sign * magnitude)
    }

    /// Creates a new time zone offset from a given number of seconds.
    ///
    /// # Errors
    ///
    /// This returns an error when `seconds` is not in the range
    /// `-64_800..=64_800`.
    #[inline]
    pub fn from_seconds(seconds: i64) -> Result<Offset, Error> {
        if !(-64_800..=64_800).contains(&seconds) {
            return Err(Error::range("offset seconds", seconds, -64_800, 64_800));
        }
        Ok(Offset { seconds: seconds as i32 })
    }

    /// Returns this offset as a number of seconds east of UTC.
    #[inline]
    pub fn seconds(self) -> i32 {
        self.seconds
    }
}

impl core::fmt::Display for Offset {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let sign = if self.seconds < 0 { '-' } else { '+' };
        let magnitude = self.seconds.unsigned_abs();
        let (hours, minutes, seconds) =
            (magnitude / 3_600, (magnitude / 60) % 60, magnitude % 60);
        write!(f, "{sign}{hours:02}")?;
        if minutes != 0 || seconds != 0 {
            write!(f, ":{minutes:02}")?;
        }
        if seconds != 0 {
            write!(f, ":{seconds:02}")?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Offset {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display() {
        assert_eq!(Offset::constant(-5).to_string(), "-05");
        assert_eq!(Offset::constant_seconds(-18_060).to_string(), "-05:01");
        assert_eq!(Offset::constant_seconds(-18_062).to_string(), "-05:01:02");
        assert_eq!(Offset::hms(5, 30, 0).to_string(), "+05:30");
        assert_eq!(Offset::constant(0).to_string(), "+00");
        assert_eq!(Offset::MIN.to_string(), "-18");
        assert_eq!(Offset::MAX.to_string(), "+18");
    }

    #[test]
    fn from_seconds() {
        assert_eq!(Offset::from_seconds(3_600).unwrap(), Offset::constant(1));
        assert!(Offset::from_seconds(64_801).is_err());
        assert!(Offset::from_seconds(-64_801).is_err());
    }

    #[test]
    fn hms_sign() {
        assert_eq!(Offset::hms(-5, 30, 0).seconds(), -19_800);
        assert_eq!(Offset::hms(5, 30, 0).seconds(), 19_800);
    }
}
