/*!
Civil (or "local") datetime value types.

The types in this module are representations of Gregorian calendar dates
and clock times without regard to any time zone. They are the currency of
the field resolution engine in [`crate::resolve`]: a resolution pass boils a
bag of parsed fields down to at most one [`Date`] and one [`Time`], and only
then consults time zone rules to place the combination on the timeline.

All types here are immutable, `Copy` and freely shareable across threads.
*/

pub use self::{date::Date, datetime::DateTime, time::Time};

mod date;
mod datetime;
pub(crate) mod time;
