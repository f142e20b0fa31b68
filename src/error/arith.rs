use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    Add,
    AddOffset,
    Multiply,
    Negate,
    Subtract,
    SubtractOffset,
    ToInt { value: i64 },
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::Arith(err).into()
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
            Add => f.write_str("integer overflow when adding"),
            AddOffset => {
                f.write_str("adding time zone offset caused overflow")
            }
            Multiply => f.write_str("integer overflow when multiplying"),
            Negate => f.write_str("integer overflow when negating"),
            Subtract => f.write_str("integer overflow when subtracting"),
            SubtractOffset => {
                f.write_str("subtracting time zone offset caused overflow")
            }
            ToInt { value } => write!(
                f,
                "value {value} is too large to fit in a 32-bit integer",
            ),
        }
    }
}
