use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    InvalidText { name: &'static str, text: Box<str> },
    Unsupported { name: &'static str },
    ValueOutOfRange { name: &'static str, value: i64, min: i64, max: i64 },
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Field(err).into()
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
            InvalidText { name, ref text } => {
                write!(f, "value {text:?} for {name} is not supported")
            }
            Unsupported { name } => {
                write!(f, "{name} field is not supported")
            }
            ValueOutOfRange { name, value, min, max } => write!(
                f,
                "value {value} for {name} must be in the range [{min},{max}]",
            ),
        }
    }
}
