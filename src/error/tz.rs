use crate::{error, tz::DateTimeZone, util::common::DisplayInstant};

#[derive(Clone, Debug)]
pub(crate) enum Error {
    GlobalAlreadyInstalled,
    IllegalInstant { local: i64, zone: DateTimeZone },
    InvalidOffset { given: Box<str> },
    OffsetMinutes { minutes: i32 },
    OffsetTooLarge { millis: i64 },
    ProviderEmpty,
    ProviderInvalidUtc,
    ProviderMissingUtc,
    UnknownId { id: Box<str> },
    UnsortedTransitions { previous: i64, next: i64 },
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Tz(err).into()
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
            GlobalAlreadyInstalled => f.write_str(
                "the global zone context was already initialized",
            ),
            IllegalInstant { local, ref zone } => write!(
                f,
                "illegal instant due to time zone offset transition: \
                 {local} ({zone})",
                local = DisplayInstant::local(local),
                zone = zone.id(),
            ),
            InvalidOffset { ref given } => {
                write!(f, "invalid time zone offset {given:?}")
            }
            OffsetMinutes { minutes } => {
                write!(f, "offset minutes out of range: {minutes}")
            }
            OffsetTooLarge { millis } => write!(
                f,
                "offset of {millis} milliseconds is too large, it must be \
                 strictly within 24 hours",
            ),
            ProviderEmpty => {
                f.write_str("zone provider does not list any time zone ids")
            }
            ProviderInvalidUtc => f.write_str(
                "zone provider resolves \"UTC\" to a non-canonical zone",
            ),
            ProviderMissingUtc => {
                f.write_str("zone provider does not support \"UTC\"")
            }
            UnknownId { ref id } => {
                write!(f, "the time zone id {id:?} is not recognised")
            }
            UnsortedTransitions { previous, next } => write!(
                f,
                "zone transitions must be strictly increasing, \
                 but {next} follows {previous}",
            ),
        }
    }
}
