use alloc::{string::String, sync::Arc};

/// A macro for "ad hoc" error construction from a format string.
macro_rules! err {
    ($($tt:tt)*) => {{
        crate::error::Error::adhoc(format_args!($($tt)*))
    }}
}

/// An error that can occur in this crate.
///
/// The most common kinds of errors are conflicts (two parsed fields assert
/// two different values for the same thing) and range errors (a field value
/// that is outside the range supported for that field). But other errors
/// exist as well:
///
/// * A resolution pass that cannot make progress because too few fields are
/// present.
/// * A field whose self-resolution never terminates.
/// * Arithmetic overflow while shifting a civil datetime across a time zone
/// transition gap.
///
/// # Design
///
/// This crate follows the "One True God Error Type Pattern," where only one
/// error type exists for a variety of different operations. Finer grained
/// error types proved difficult in the face of composition, since almost
/// every failure here surfaces at the same place: the caller of a resolution
/// pass.
///
/// Introspection is limited to the `Error::is_*` predicates, which classify
/// an error by the cause families that matter to callers. No error in this
/// crate is retryable.
#[derive(Clone)]
pub struct Error {
    /// The internal representation of an error.
    ///
    /// This is in an `Arc` to make an `Error` cloneable. It also makes
    /// clones cheap and keeps the size of `Error` itself to one word.
    inner: Arc<ErrorInner>,
}

#[derive(Clone, Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

#[derive(Clone)]
enum ErrorKind {
    /// An ad hoc error message.
    Adhoc(String),
    /// A field value outside of its allowed range.
    Range {
        /// The thing that was out of range, e.g. `day-of-month`.
        what: String,
        given: i64,
        min: i64,
        max: i64,
    },
    /// Two different values asserted for the same field, or two different
    /// dates/times resolved from independent field groups.
    Conflict {
        /// What conflicted, e.g. a field name, or `date` or `time`.
        what: String,
        existing: String,
        asserted: String,
        /// The object the asserted value was derived from, if any.
        derived_from: Option<String>,
    },
    /// Insufficient information to answer a query about a resolution result.
    Unresolvable(String),
    /// The resolution loop hit its change ceiling without reaching a fixed
    /// point.
    NonTerminating { limit: u32 },
    /// Arithmetic overflow while shifting a civil datetime across a time
    /// zone transition gap.
    GapOverflow(String),
}

impl Error {
    /// Creates a new "ad hoc" error value.
    ///
    /// Callers inside the crate should generally use the `err!` macro.
    pub(crate) fn adhoc(message: impl core::fmt::Display) -> Error {
        Error::from(ErrorKind::Adhoc(alloc::format!("{message}")))
    }

    /// Creates an error indicating that `given` is out of the inclusive
    /// range `min..=max` for `what`.
    pub(crate) fn range(
        what: impl core::fmt::Display,
        given: i64,
        min: i64,
        max: i64,
    ) -> Error {
        Error::from(ErrorKind::Range {
            what: alloc::format!("{what}"),
            given,
            min,
            max,
        })
    }

    /// Creates an error indicating that two different values were asserted
    /// for `what`.
    ///
    /// `derived_from`, when present, names the object the asserted value
    /// was re-derived from (e.g. a resolved date during cross-checking).
    pub(crate) fn conflict(
        what: impl core::fmt::Display,
        existing: impl core::fmt::Display,
        asserted: impl core::fmt::Display,
        derived_from: Option<String>,
    ) -> Error {
        Error::from(ErrorKind::Conflict {
            what: alloc::format!("{what}"),
            existing: alloc::format!("{existing}"),
            asserted: alloc::format!("{asserted}"),
            derived_from,
        })
    }

    /// Creates an error for a query that cannot be answered from the fields
    /// that were resolved.
    pub(crate) fn unresolvable(message: impl core::fmt::Display) -> Error {
        Error::from(ErrorKind::Unresolvable(alloc::format!("{message}")))
    }

    /// Creates an error indicating that the resolution loop was still
    /// changing the field bag after `limit` updates.
    pub(crate) fn non_terminating(limit: u32) -> Error {
        Error::from(ErrorKind::NonTerminating { limit })
    }

    /// Creates an error for overflow while shifting across a gap.
    pub(crate) fn gap_overflow(message: impl core::fmt::Display) -> Error {
        Error::from(ErrorKind::GapOverflow(alloc::format!("{message}")))
    }

    /// Returns true when this error is a conflict between two asserted or
    /// derived values.
    pub fn is_conflict(&self) -> bool {
        matches!(self.root().inner.kind, ErrorKind::Conflict { .. })
    }

    /// Returns true when this error originated as a result of a field value
    /// being out of its allowed range.
    pub fn is_range(&self) -> bool {
        matches!(self.root().inner.kind, ErrorKind::Range { .. })
    }

    /// Returns true when this error indicates that a query could not be
    /// answered because too few fields were resolved.
    pub fn is_unresolvable(&self) -> bool {
        matches!(self.root().inner.kind, ErrorKind::Unresolvable(_))
    }

    /// Returns true when this error indicates that a field's self-resolution
    /// never reached a fixed point.
    pub fn is_non_terminating(&self) -> bool {
        matches!(self.root().inner.kind, ErrorKind::NonTerminating { .. })
    }

    /// Returns true when this error originated from arithmetic overflow
    /// while shifting a civil datetime across a time zone gap.
    pub fn is_gap_overflow(&self) -> bool {
        matches!(self.root().inner.kind, ErrorKind::GapOverflow(_))
    }

    /// Attaches `self` as the cause of the error given, returning the error
    /// given as the top of the new chain.
    ///
    /// The error given is expected to have no cause of its own.
    pub(crate) fn context(self, consequent: Error) -> Error {
        debug_assert!(
            consequent.inner.cause.is_none(),
            "context errors should not have their own cause",
        );
        let inner =
            ErrorInner { kind: consequent.inner.kind.clone(), cause: Some(self) };
        Error { inner: Arc::new(inner) }
    }

    /// Returns the "root" error in this error's cause chain. When there is
    /// no cause, then this is the root.
    fn root(&self) -> &Error {
        let mut err = self;
        while let Some(ref cause) = err.inner.cause {
            err = cause;
        }
        err
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}", self.inner.kind)?;
        let mut cause = self.inner.cause.as_ref();
        while let Some(err) = cause {
            write!(f, ": {}", err.inner.kind)?;
            cause = err.inner.cause.as_ref();
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error")
                .field("kind", &self.inner.kind)
                .field("cause", &self.inner.cause)
                .finish()
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            ErrorKind::Adhoc(ref msg) => write!(f, "{msg}"),
            ErrorKind::Range { ref what, given, min, max } => {
                write!(
                    f,
                    "parameter '{what}' with value {given} \
                     is not in the required range of {min}..={max}",
                )
            }
            ErrorKind::Conflict {
                ref what,
                ref existing,
                ref asserted,
                ref derived_from,
            } => {
                write!(
                    f,
                    "conflict found: {what} {existing} differs from {asserted}",
                )?;
                if let Some(ref from) = *derived_from {
                    write!(f, " derived from {from}")?;
                }
                Ok(())
            }
            ErrorKind::Unresolvable(ref msg) => write!(f, "{msg}"),
            ErrorKind::NonTerminating { limit } => {
                write!(
                    f,
                    "field resolution failed to reach a fixed point after \
                     {limit} updates to the field bag, which indicates a \
                     field with an incorrectly implemented resolve method",
                )
            }
            ErrorKind::GapOverflow(ref msg) => write!(f, "{msg}"),
        }
    }
}

impl core::fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

/// A simple trait to encapsulate automatic conversion to `Error`.
///
/// This is used to provide `context` and `with_context` on `Result` values
/// inside this crate.
pub(crate) trait ErrorContext<T> {
    /// Attach the given error as context to the error, if any, in `self`.
    fn context(self, consequent: Error) -> Result<T, Error>;

    /// Like `context`, but builds the error lazily.
    fn with_context<F: FnOnce() -> Error>(self, f: F) -> Result<T, Error>;
}

impl<T> ErrorContext<T> for Result<T, Error> {
    fn context(self, consequent: Error) -> Result<T, Error> {
        self.map_err(|err| err.context(consequent))
    }

    fn with_context<F: FnOnce() -> Error>(self, f: F) -> Result<T, Error> {
        self.map_err(|err| err.context(f()))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { inner: Arc::new(ErrorInner { kind, cause: None }) }
    }
}
