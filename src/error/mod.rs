use std::sync::Arc;

pub(crate) mod arith;
pub(crate) mod field;
pub(crate) mod limit;
pub(crate) mod tz;
pub(crate) mod zoned;

pub use self::limit::LimitBound;

/// An error that can occur in this crate.
///
/// The most common errors are a field value being out of its legal range,
/// an instant falling outside the range of a limited chronology and
/// arithmetic overflow. Other errors exist as well:
///
/// * A local datetime that does not exist in a time zone because it falls
/// inside a gap created by an offset transition.
/// * A field value that could not be set because the result would land in
/// such a gap.
/// * Time zone lookup and offset parsing failures.
///
/// # Introspection is limited
///
/// Other than implementing the [`std::error::Error`] trait, the
/// [`core::fmt::Debug`] trait and the [`core::fmt::Display`] trait, this
/// error type provides a handful of predicates like [`Error::is_overflow`]
/// and [`Error::is_limit_exceeded`]. The predicates always look at the root
/// cause of an error, so context added on top of an error never changes
/// what it reports.
///
/// # Design
///
/// Only one error type exists for all operations in this crate. Field
/// decorators compose arbitrarily, so a single operation may fail for
/// reasons originating in any layer. Finer grained error types would
/// force every layer to wrap the errors of every other layer.
#[derive(Clone)]
pub struct Error {
    /// The internal representation of an error.
    ///
    /// This is in an `Arc` to make an `Error` cheap to clone and to keep
    /// its size to one word, since nearly every field operation returns a
    /// `Result<T, Error>`.
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Creates a new error value from `core::fmt::Arguments`.
    ///
    /// This is useful for implementations of [`Calendar`](crate::chrono::Calendar)
    /// or [`ZoneRules`](crate::tz::ZoneRules) outside of this crate that need
    /// to report their own failures.
    ///
    /// # Example
    ///
    /// ```
    /// use chronology::Error;
    ///
    /// let err = Error::from_args(format_args!("something failed"));
    /// assert_eq!(err.to_string(), "something failed");
    /// ```
    pub fn from_args<'a>(message: core::fmt::Arguments<'a>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::from_args(message)))
    }

    /// Returns true when this error was caused by arithmetic overflowing
    /// the range of a 64-bit millisecond instant (or a 32-bit field value).
    ///
    /// # Example
    ///
    /// ```
    /// use chronology::Chronology;
    ///
    /// let chrono = Chronology::iso();
    /// let err = chrono.hours().add(i64::MAX - 10, 1).unwrap_err();
    /// assert!(err.is_overflow());
    /// ```
    pub fn is_overflow(&self) -> bool {
        matches!(*self.root().kind(), ErrorKind::Arith(_))
    }

    /// Returns true when a value given for a field was outside of the
    /// field's legal range, or could not be applied at all.
    ///
    /// This also returns true for errors where [`Error::is_zone_transition`]
    /// is true, since those are a specialization of an illegal field value.
    ///
    /// # Example
    ///
    /// ```
    /// use chronology::Chronology;
    ///
    /// let chrono = Chronology::iso();
    /// assert!(chrono.month_of_year().set(0, 13).unwrap_err().is_field_value());
    /// ```
    pub fn is_field_value(&self) -> bool {
        use self::field::Error as FieldError;
        use self::zoned::Error as ZonedError;

        matches!(
            *self.root().kind(),
            ErrorKind::Field(
                FieldError::ValueOutOfRange { .. }
                    | FieldError::InvalidText { .. }
            ) | ErrorKind::Zoned(ZonedError::Transition { .. })
        )
    }

    /// Returns true when an operation was attempted on a field that the
    /// chronology does not support.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            *self.root().kind(),
            ErrorKind::Field(self::field::Error::Unsupported { .. })
        )
    }

    /// Returns true when a local datetime could not be converted to an
    /// instant because it does not exist in the time zone.
    pub fn is_illegal_instant(&self) -> bool {
        matches!(
            *self.root().kind(),
            ErrorKind::Tz(self::tz::Error::IllegalInstant { .. })
        )
    }

    /// Returns true when setting a field in a zoned chronology failed
    /// because the requested local value falls into a gap created by an
    /// offset transition.
    pub fn is_zone_transition(&self) -> bool {
        matches!(
            *self.root().kind(),
            ErrorKind::Zoned(self::zoned::Error::Transition { .. })
        )
    }

    /// Returns true when an instant fell outside the range supported by a
    /// limited chronology.
    pub fn is_limit_exceeded(&self) -> bool {
        self.limit_bound().is_some()
    }

    /// Returns which bound of a limited chronology was violated, if this
    /// error was caused by an instant falling outside of one.
    ///
    /// # Example
    ///
    /// ```
    /// use chronology::{Chronology, LimitBound};
    ///
    /// let limited = Chronology::limit(&Chronology::iso(), Some(0), None)?;
    /// let err = limited.year().get(-1).unwrap_err();
    /// assert_eq!(err.limit_bound(), Some(LimitBound::Below));
    ///
    /// # Ok::<(), chronology::Error>(())
    /// ```
    pub fn limit_bound(&self) -> Option<LimitBound> {
        match *self.root().kind() {
            ErrorKind::Limit(self::limit::Error::Exceeded {
                bound, ..
            }) => Some(bound),
            _ => None,
        }
    }

    /// Returns true when a limited chronology could not be built because
    /// its lower limit does not come before its upper limit.
    pub fn is_invalid_range(&self) -> bool {
        matches!(
            *self.root().kind(),
            ErrorKind::Limit(self::limit::Error::InvalidRange { .. })
        )
    }
}

impl Error {
    #[cfg_attr(feature = "perf-inline", inline(always))]
    pub(crate) fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        match Arc::get_mut(&mut err.inner) {
            Some(inner) => {
                assert!(
                    inner.cause.is_none(),
                    "cause of consequence must be `None`"
                );
                inner.cause = Some(self);
                err
            }
            // A shared consequent can't be mutated, so rebuild it from its
            // rendered message instead of losing the causal chain.
            None => {
                let kind = ErrorKind::Adhoc(AdhocError::from_args(
                    format_args!("{}", err.kind()),
                ));
                Error {
                    inner: Arc::new(ErrorInner { kind, cause: Some(self) }),
                }
            }
        }
    }

    /// Returns the root error in this chain.
    fn root(&self) -> &Error {
        let mut err = self;
        while let Some(ref cause) = err.inner.cause {
            err = cause;
        }
        err
    }

    /// Returns a chain of error values.
    ///
    /// This starts with the most recent error added to the chain. That is,
    /// the highest level context. The last error in the chain is always the
    /// "root" cause.
    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.cause.as_ref()?;
            Some(err)
        }))
    }

    /// Returns the kind of this error.
    fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
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

/// The underlying kind of a [`Error`].
#[derive(Debug)]
enum ErrorKind {
    Adhoc(AdhocError),
    Arith(self::arith::Error),
    Field(self::field::Error),
    Limit(self::limit::Error),
    Tz(self::tz::Error),
    Zoned(self::zoned::Error),
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match *self {
            Adhoc(ref msg) => msg.fmt(f),
            Arith(ref err) => err.fmt(f),
            Field(ref err) => err.fmt(f),
            Limit(ref err) => err.fmt(f),
            Tz(ref err) => err.fmt(f),
            Zoned(ref err) => err.fmt(f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { inner: Arc::new(ErrorInner { kind, cause: None }) }
    }
}

/// A generic error message.
///
/// This supports the `Error::from_args` public API, which permits callers
/// plugging their own calendars or zone rules into this crate to manifest
/// their own `Error` values from an arbitrary message.
struct AdhocError {
    message: Box<str>,
}

impl AdhocError {
    fn from_args<'a>(message: core::fmt::Arguments<'a>) -> AdhocError {
        AdhocError { message: message.to_string().into_boxed_str() }
    }
}

impl std::error::Error for AdhocError {}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.message, f)
    }
}

impl core::fmt::Debug for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.message, f)
    }
}

/// A simple trait to encapsulate automatic conversion to `Error`.
///
/// This trait basically exists to make `Error::context` work without needing
/// to rely on public `From` impls for the internal structured error types.
pub(crate) trait IntoError {
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

/// A trait for contextualizing error values.
///
/// This makes it easy to contextualize either `Error` or `Result<T, Error>`.
/// Specifically, in the latter case, it absolves one of the need to call
/// `map_err` everywhere one wants to add context to an error.
pub(crate) trait ErrorContext<T, E> {
    /// Contextualize the given consequent error with this (`self`) error as
    /// the cause.
    ///
    /// This is equivalent to saying that "consequent is caused by self."
    fn context(self, consequent: impl IntoError) -> Result<T, Error>;

    /// Like `context`, but hides error construction within a closure.
    ///
    /// The closure avoids paying the cost of contextual error creation in
    /// the happy path.
    fn with_context<C: IntoError>(
        self,
        consequent: impl FnOnce() -> C,
    ) -> Result<T, Error>;
}

impl<T, E> ErrorContext<T, E> for Result<T, E>
where
    E: IntoError,
{
    #[cfg_attr(feature = "perf-inline", inline(always))]
    fn context(self, consequent: impl IntoError) -> Result<T, Error> {
        self.map_err(|err| err.into_error().context(consequent))
    }

    #[cfg_attr(feature = "perf-inline", inline(always))]
    fn with_context<C: IntoError>(
        self,
        consequent: impl FnOnce() -> C,
    ) -> Result<T, Error> {
        self.map_err(|err| err.into_error().context(consequent()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // We test that our 'Error' type is the size we expect. This isn't an API
    // guarantee, but if the size increases, we really want to make sure we
    // decide to do that intentionally. Nearly every field operation returns
    // a `Result<T, Error>`.
    #[test]
    fn error_size() {
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn context_keeps_root_predicates() {
        let root: Error = arith::Error::AddOffset.into();
        let err = root.context(Error::from_args(format_args!("outer")));
        assert!(err.is_overflow());
        insta::assert_snapshot!(
            err,
            @"outer: adding time zone offset caused overflow",
        );
    }

    #[test]
    fn result_context_goes_through_error() {
        let result: Result<(), Error> = Err(arith::Error::Subtract.into());
        let err = result
            .with_context(|| Error::from_args(format_args!("lazy")))
            .context(Error::from_args(format_args!("eager")))
            .unwrap_err();
        assert!(err.is_overflow());
        insta::assert_snapshot!(
            err,
            @"eager: lazy: integer overflow when subtracting",
        );
    }

    #[test]
    fn context_with_shared_consequent() {
        let consequent = Error::from_args(format_args!("shared"));
        let _keep = consequent.clone();
        let root: Error = arith::Error::Multiply.into();
        let err = root.context(consequent);
        assert!(err.is_overflow());
        insta::assert_snapshot!(
            err,
            @"shared: integer overflow when multiplying",
        );
    }
}
