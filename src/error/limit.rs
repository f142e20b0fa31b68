use crate::{chrono::Chronology, error, tz::DateTimeZone, util::common::DisplayInstant};

/// The bound of a limited chronology that an instant fell outside of.
///
/// This is returned by [`Error::limit_bound`](crate::Error::limit_bound).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LimitBound {
    /// The instant was before the inclusive lower limit.
    Below,
    /// The instant was at or after the exclusive upper limit.
    Above,
}

impl core::fmt::Display for LimitBound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            LimitBound::Below => f.write_str("below"),
            LimitBound::Above => f.write_str("above"),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Error {
    Exceeded {
        bound: LimitBound,
        label: Option<&'static str>,
        limit: i64,
        base: Chronology,
    },
    InvalidRange {
        lower: i64,
        upper: i64,
    },
    Rezone {
        zone: DateTimeZone,
    },
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Limit(err).into()
    }
}

impl error::IntoError for Error {
    fn into_error(self) -> error::Error {
        self.into()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::Error::*;

        match *self {
            Exceeded { bound, label, limit, ref base } => {
                f.write_str("the ")?;
                if let Some(label) = label {
                    write!(f, "{label} ")?;
                }
                let extreme = match bound {
                    LimitBound::Below => "minimum",
                    LimitBound::Above => "maximum",
                };
                write!(
                    f,
                    "instant is {bound} the supported {extreme} of \
                     {limit} ({base})",
                    limit = DisplayInstant::zoned(limit, base.zone()),
                )
            }
            InvalidRange { lower, upper } => write!(
                f,
                "the lower limit {lower} must come before \
                 the upper limit {upper}",
                lower = DisplayInstant::utc(lower),
                upper = DisplayInstant::utc(upper),
            ),
            Rezone { ref zone } => write!(
                f,
                "failed to re-express chronology limits in time zone {zone}",
                zone = zone.id(),
            ),
        }
    }
}
