/*!
reckon is a calendrical field resolution engine.

A datetime parser rarely gets to produce a datetime directly. What it
actually extracts is a pile of loosely related field values: a year here,
a day-of-week there, maybe a second-of-day, maybe an offset. This crate
takes that pile, a [`FieldBag`], and reconciles it into at most one civil
[`Date`](civil::Date), one civil [`Time`](civil::Time) and one
[`TimeZone`](tz::TimeZone), catching every internal contradiction along
the way.

# Example

```
use reckon::{Field, FieldBag, Resolver};

let mut bag = FieldBag::new();
bag.set(Field::Year, 2024);
bag.set(Field::DayOfYear, 71);
bag.set(Field::SecondOfDay, 34_215);

let resolved = Resolver::new().resolve(bag)?;
assert_eq!(resolved.to_datetime()?.to_string(), "2024-03-11T09:30:15");
# Ok::<(), reckon::Error>(())
```

A bag holding both a day-of-year and a year/month/day that disagree, or
an hour that contradicts a second-of-day, resolves to an error rather
than silently preferring one side. How forgiving resolution is about out
of range values is controlled by [`ResolverStyle`].

# Crate features

* **std** (enabled by default) - Implements `std::error::Error` for this
  crate's error type. Everything else works without it, although an
  allocator is always required: field bags and error messages allocate.
* **logging** - Emits trace level messages describing resolution passes
  via the `log` crate.
*/

#![no_std]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub use crate::{
    error::Error,
    resolve::{
        Chronology, CustomField, Field, FieldBag, FieldBagSnapshot,
        FieldResolution, Iso, Partial, Query, Resolved, Resolver,
        ResolverStyle, ValueRange,
    },
    zoned::Zoned,
};

#[macro_use]
mod logging;
#[macro_use]
mod error;

pub mod civil;
pub mod resolve;
pub mod tz;
mod util;
mod zoned;
