use alloc::{string::ToString, sync::Arc, vec::Vec};

use crate::{
    error::Error,
    resolve::{Chronology, CustomField, Field},
    tz::TimeZone,
};

/// An unordered collection of field values, the input to resolution.
///
/// A bag is typically populated by a parser: each recognized component of
/// the input is stored as a `(field, value)` pair, without any judgment
/// about whether the values are in range or mutually consistent. The bag
/// may also carry a time zone, a chronology and a leap second marker.
/// Judgment is the business of [`Resolver::resolve`](crate::Resolver),
/// which consumes a bag and reconciles its contents.
///
/// Storing a value for a field that is already present is a conflict
/// unless the values are equal. [`FieldBag::set`] overwrites silently and
/// is meant for the rare caller that wants replacement semantics;
/// [`FieldBag::set_or_check`] is the choke point everything else goes
/// through.
#[derive(Clone, Default)]
pub struct FieldBag {
    values: [Option<i64>; Field::COUNT],
    custom: Vec<(Arc<dyn CustomField>, i64)>,
    zone: Option<TimeZone>,
    chronology: Option<Arc<dyn Chronology>>,
    leap_second: bool,
}

impl FieldBag {
    /// Creates an empty bag.
    pub fn new() -> FieldBag {
        FieldBag::default()
    }

    /// Stores a value for the given field, overwriting any previous value.
    pub fn set(&mut self, field: Field, value: i64) {
        self.values[field.index()] = Some(value);
    }

    /// Stores a value for the given field.
    ///
    /// # Errors
    ///
    /// This returns a conflict error when the field already has a
    /// different value. Storing an equal value is a no-op.
    pub fn set_or_check(
        &mut self,
        field: Field,
        value: i64,
    ) -> Result<(), Error> {
        match self.values[field.index()] {
            None => {
                self.values[field.index()] = Some(value);
                Ok(())
            }
            Some(existing) if existing == value => Ok(()),
            Some(existing) => Err(Error::conflict(
                field.name(),
                existing,
                value,
                None,
            )),
        }
    }

    /// Returns the value stored for the given field, if any.
    #[inline]
    pub fn get(&self, field: Field) -> Option<i64> {
        self.values[field.index()]
    }

    /// Returns true when the given field has a value in this bag.
    #[inline]
    pub fn contains(&self, field: Field) -> bool {
        self.values[field.index()].is_some()
    }

    /// Returns true when every one of the given fields has a value.
    pub fn contains_all(&self, fields: &[Field]) -> bool {
        fields.iter().all(|&f| self.contains(f))
    }

    /// Removes and returns the value stored for the given field, if any.
    pub fn remove(&mut self, field: Field) -> Option<i64> {
        self.values[field.index()].take()
    }

    /// Returns an iterator over the builtin fields currently present.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|&f| self.contains(f))
    }

    /// Returns the number of field values in this bag, custom fields
    /// included.
    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
            + self.custom.len()
    }

    /// Returns true when this bag holds no field values at all. A zone,
    /// chronology or leap second marker does not count.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn builtin_is_empty(&self) -> bool {
        self.values.iter().all(|v| v.is_none())
    }

    /// Stores a value for a custom field.
    ///
    /// # Errors
    ///
    /// As with [`FieldBag::set_or_check`], storing a second, different
    /// value for a field with the same name is a conflict.
    pub fn set_custom_or_check(
        &mut self,
        field: Arc<dyn CustomField>,
        value: i64,
    ) -> Result<(), Error> {
        for (existing_field, existing) in self.custom.iter() {
            if existing_field.name() != field.name() {
                continue;
            }
            if *existing != value {
                return Err(Error::conflict(
                    field.name(),
                    *existing,
                    value,
                    None,
                ));
            }
            return Ok(());
        }
        self.custom.push((field, value));
        Ok(())
    }

    /// Returns the value stored for the custom field with the given name.
    pub fn get_custom(&self, name: &str) -> Option<i64> {
        self.custom
            .iter()
            .find(|(f, _)| f.name() == name)
            .map(|&(_, value)| value)
    }

    /// Returns true when a custom field with the given name is present.
    pub fn contains_custom(&self, name: &str) -> bool {
        self.custom.iter().any(|(f, _)| f.name() == name)
    }

    /// Removes and returns the value of the custom field with the given
    /// name, if present.
    pub fn remove_custom(&mut self, name: &str) -> Option<i64> {
        let i = self.custom.iter().position(|(f, _)| f.name() == name)?;
        Some(self.custom.remove(i).1)
    }

    pub(crate) fn custom_len(&self) -> usize {
        self.custom.len()
    }

    pub(crate) fn custom_at(&self, i: usize) -> (Arc<dyn CustomField>, i64) {
        let (ref field, value) = self.custom[i];
        (Arc::clone(field), value)
    }

    /// Binds a time zone to this bag.
    ///
    /// # Errors
    ///
    /// This returns a conflict error when a different zone is already
    /// bound.
    pub fn set_zone_or_check(&mut self, tz: TimeZone) -> Result<(), Error> {
        match self.zone {
            None => {
                self.zone = Some(tz);
                Ok(())
            }
            Some(ref existing) if *existing == tz => Ok(()),
            Some(ref existing) => Err(Error::conflict(
                "time zone",
                existing.name().to_string(),
                tz.name().to_string(),
                None,
            )),
        }
    }

    /// Returns the time zone bound to this bag, if any.
    pub fn zone(&self) -> Option<&TimeZone> {
        self.zone.as_ref()
    }

    /// Binds a chronology to this bag. When none is bound, resolution uses
    /// the ISO chronology.
    ///
    /// # Errors
    ///
    /// This returns a conflict error when a chronology with a different
    /// name is already bound.
    pub fn set_chronology_or_check(
        &mut self,
        chronology: Arc<dyn Chronology>,
    ) -> Result<(), Error> {
        match self.chronology {
            None => {
                self.chronology = Some(chronology);
                Ok(())
            }
            Some(ref existing) if existing.name() == chronology.name() => {
                Ok(())
            }
            Some(ref existing) => Err(Error::conflict(
                "chronology",
                existing.name().to_string(),
                chronology.name().to_string(),
                None,
            )),
        }
    }

    /// Returns the chronology bound to this bag, if any.
    pub fn chronology(&self) -> Option<&Arc<dyn Chronology>> {
        self.chronology.as_ref()
    }

    /// Marks this bag as describing a leap second.
    ///
    /// A parser that reads `23:59:60` cannot store second `60` directly,
    /// since `second-of-minute` only ranges to `59`. The convention is to
    /// store second `59` and set this marker; it survives resolution and
    /// is reported by [`Resolved::leap_second`](crate::Resolved).
    pub fn set_leap_second(&mut self, yes: bool) {
        self.leap_second = yes;
    }

    /// Returns true when this bag is marked as describing a leap second.
    pub fn leap_second(&self) -> bool {
        self.leap_second
    }

    /// Captures the current state of this bag, to be undone later with
    /// [`FieldBag::restore`]. Useful for parsers that try alternatives.
    pub fn snapshot(&self) -> FieldBagSnapshot {
        FieldBagSnapshot(self.clone())
    }

    /// Rewinds this bag to a previously captured state.
    pub fn restore(&mut self, snapshot: FieldBagSnapshot) {
        *self = snapshot.0;
    }
}

impl core::fmt::Debug for FieldBag {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut map = f.debug_map();
        for field in self.fields() {
            map.entry(&field.name(), &self.get(field).unwrap());
        }
        for (field, value) in self.custom.iter() {
            map.entry(&field.name(), value);
        }
        map.finish()?;
        if let Some(ref tz) = self.zone {
            write!(f, " in {}", tz.name())?;
        }
        Ok(())
    }
}

/// A saved state of a [`FieldBag`], created by [`FieldBag::snapshot`].
#[derive(Debug)]
pub struct FieldBagSnapshot(FieldBag);
