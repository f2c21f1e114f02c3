/*!
The field resolution engine.

Parsing a datetime string yields an unordered bag of field values, not a
datetime: the same moment can be written as a year/month/day, a
day-of-year, an aligned week, a second-of-day or an instant, and nothing
stops an input from saying several of these at once, or from saying them
inconsistently. The types in this module reconcile such a [`FieldBag`]
into at most one civil date, one civil time and one time zone.

The entry point is [`Resolver::resolve`]. A pass runs in phases: instant
fields are localized first, then the chronology combines date fields by
precedence, then the many time encodings are folded into the canonical
hour/minute/second/nanosecond quadruple. Custom fields then resolve
themselves iteratively until a fixed point (with a ceiling that turns a
non-terminating field into an error). Whatever fields remain are
cross-checked against the result and either consumed or reported as
conflicts, and finally the instant is derived when an offset or zone can
place the datetime on the timeline.

How forgiving all of this is depends on the [`ResolverStyle`].
*/

pub use self::{
    bag::{FieldBag, FieldBagSnapshot},
    chronology::{Chronology, Iso},
    field::{CustomField, Field, FieldResolution, Partial, ValueRange},
    resolver::{
        DateQuery, DateTimeQuery, OffsetQuery, Query, Resolved, Resolver,
        ResolverStyle, TimeQuery, TimestampQuery, ZoneQuery,
    },
};

mod bag;
mod chronology;
mod field;
mod resolver;
