use crate::{error, tz::DateTimeZone, util::common::DisplayInstant};

#[derive(Clone, Debug)]
pub(crate) enum Error {
    DateTimeToUtc,
    Transition {
        name: &'static str,
        value: i32,
        local: i64,
        zone: DateTimeZone,
    },
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Zoned(err).into()
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
            DateTimeToUtc => f.write_str(
                "failed to convert local datetime to an instant \
                 in zoned chronology",
            ),
            Transition { name, value, local, ref zone } => write!(
                f,
                "value {value} for {name} is illegal due to time zone \
                 offset transition: {local} ({zone})",
                local = DisplayInstant::local(local),
                zone = zone.id(),
            ),
        }
    }
}
