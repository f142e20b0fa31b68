/*!
Duration and date-time fields.

A [`DurationField`] measures and applies amounts of one unit (days, hours,
months, ...) to millisecond instants. A [`DateTimeField`] reads and writes
one calendar component (day-of-month, hour-of-day, ...) of an instant. A
[`Chronology`](crate::Chronology) is nothing more than a bag of these
fields, and decorating a chronology means wrapping every one of them.

Fields are shared through the [`DurationFieldRef`] and [`DateTimeFieldRef`]
handles. Handles compare and hash by identity: two handles are equal only
when they point at the same field instance. Chronology assembly relies on
this to decorate a field shared by several slots exactly once.

This module also provides the generic field shapes calendars are built
from, such as [`PreciseDateTimeField`] for fixed-length time units and
[`DividedDateTimeField`] for centuries.
*/

use std::sync::Arc;

use crate::{
    error::field::Error as E,
    util::arith::{self, to_i32},
    Error,
};

pub use self::{
    datetime::{
        DividedDateTimeField, PreciseDateTimeField, RemainderDateTimeField,
        SingleEraDateTimeField, UnsupportedDateTimeField,
        ZeroIsMaxDateTimeField,
    },
    duration::{
        CalendarUnit, ImpreciseDurationField, MillisDurationField,
        PreciseDurationField, ScaledDurationField, UnsupportedDurationField,
    },
    types::{DateTimeFieldType, DurationFieldType},
};

mod datetime;
mod duration;
mod types;

/// A capability for measuring and applying durations of one unit.
///
/// All instants are milliseconds since 1970-01-01T00:00:00Z. Implementations
/// must be immutable once built.
pub trait DurationField: core::fmt::Debug + Send + Sync + 'static {
    /// Returns the unit this field measures.
    fn field_type(&self) -> DurationFieldType;

    /// Returns the name of the unit this field measures.
    fn name(&self) -> &'static str {
        self.field_type().name()
    }

    /// Returns false only for the sentinel fields used to fill slots a
    /// chronology does not provide.
    fn is_supported(&self) -> bool {
        true
    }

    /// Returns true when every unit of this field is exactly
    /// [`unit_millis`](DurationField::unit_millis) long.
    fn is_precise(&self) -> bool;

    /// Returns the length of one unit in milliseconds.
    ///
    /// Imprecise fields return an average length.
    fn unit_millis(&self) -> i64;

    /// Converts a millisecond duration, measured starting at `instant`, to
    /// a number of whole units.
    fn value(&self, duration: i64, instant: i64) -> Result<i32, Error> {
        to_i32(self.value_as_i64(duration, instant)?)
    }

    /// Like [`value`](DurationField::value), but without narrowing.
    fn value_as_i64(&self, duration: i64, instant: i64) -> Result<i64, Error>;

    /// Converts a number of units, applied at `instant`, to milliseconds.
    fn millis(&self, value: i64, instant: i64) -> Result<i64, Error>;

    /// Adds an amount of this unit to an instant.
    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error>;

    /// Subtracts an amount of this unit from an instant.
    fn subtract(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        self.add(instant, arith::neg(amount)?)
    }

    /// Returns how many whole units `subtrahend` must be moved by to reach
    /// `minuend` without overshooting it.
    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i32, Error> {
        to_i32(self.difference_as_i64(minuend, subtrahend)?)
    }

    /// Like [`difference`](DurationField::difference), but without narrowing.
    fn difference_as_i64(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64, Error>;
}

/// A capability for reading and writing one calendar component of an
/// instant.
///
/// Most operations have defaults expressed in terms of a few required
/// methods, so a new field shape only implements what makes it special.
pub trait DateTimeField: core::fmt::Debug + Send + Sync + 'static {
    /// Returns the component this field reads.
    fn field_type(&self) -> DateTimeFieldType;

    /// Returns the name of the component this field reads.
    fn name(&self) -> &'static str {
        self.field_type().name()
    }

    /// Returns false only for the sentinel fields used to fill slots a
    /// chronology does not provide.
    fn is_supported(&self) -> bool {
        true
    }

    /// Returns true when `set` accepts out of range values and carries them
    /// into larger fields.
    fn is_lenient(&self) -> bool {
        false
    }

    /// Returns the value of this field at the given instant.
    fn get(&self, instant: i64) -> Result<i32, Error>;

    /// Returns the value of this field at the given instant as text.
    fn as_text(&self, instant: i64) -> Result<String, Error> {
        Ok(self.text_for_value(self.get(instant)?))
    }

    /// Returns the text form of a value of this field.
    fn text_for_value(&self, value: i32) -> String {
        value.to_string()
    }

    /// Parses the text form of a value of this field.
    fn value_for_text(&self, text: &str) -> Result<i32, Error> {
        text.parse::<i32>().map_err(|_| {
            E::InvalidText { name: self.name(), text: text.into() }.into()
        })
    }

    /// Returns the length of the longest text form of this field.
    fn maximum_text_len(&self) -> usize {
        let max = self.maximum_value().to_string().len();
        let min = self.minimum_value().to_string().len();
        max.max(min)
    }

    /// Adds an amount of this field's unit, carrying into larger fields.
    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        self.duration_field().add(instant, amount)
    }

    /// Adds an amount to this field, wrapping within its range at `instant`
    /// and leaving larger fields untouched.
    fn add_wrap_field(&self, instant: i64, amount: i32) -> Result<i64, Error> {
        let current = self.get(instant)?;
        let min = self.minimum_value_at(instant)?;
        let max = self.maximum_value_at(instant)?;
        self.set(instant, arith::wrapped_value(current, amount, min, max)?)
    }

    /// Returns the whole number of this field's units between two instants.
    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i32, Error> {
        self.duration_field().difference(minuend, subtrahend)
    }

    /// Like [`difference`](DateTimeField::difference), but without
    /// narrowing.
    fn difference_as_i64(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64, Error> {
        self.duration_field().difference_as_i64(minuend, subtrahend)
    }

    /// Returns the instant with this field set to `value`.
    fn set(&self, instant: i64, value: i32) -> Result<i64, Error>;

    /// Like [`set`](DateTimeField::set), but the value is given as text.
    fn set_text(&self, instant: i64, text: &str) -> Result<i64, Error> {
        let value = self.value_for_text(text)?;
        self.set(instant, value)
    }

    /// Returns the unit this field counts in.
    fn duration_field(&self) -> DurationFieldRef;

    /// Returns the unit this field cycles within, if it is bounded.
    fn range_duration_field(&self) -> Option<DurationFieldRef>;

    /// Returns the unit that leap values of this field add, if any.
    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        None
    }

    /// Returns true when the value at `instant` is a leap value, like
    /// February in a leap year.
    fn is_leap(&self, _instant: i64) -> Result<bool, Error> {
        Ok(false)
    }

    /// Returns the number of leap units the value at `instant` carries.
    fn leap_amount(&self, _instant: i64) -> Result<i32, Error> {
        Ok(0)
    }

    /// Returns the smallest value this field ever takes.
    fn minimum_value(&self) -> i32;

    /// Returns the smallest value this field takes near `instant`.
    fn minimum_value_at(&self, _instant: i64) -> Result<i32, Error> {
        Ok(self.minimum_value())
    }

    /// Returns the largest value this field ever takes.
    fn maximum_value(&self) -> i32;

    /// Returns the largest value this field takes near `instant`.
    fn maximum_value_at(&self, _instant: i64) -> Result<i32, Error> {
        Ok(self.maximum_value())
    }

    /// Returns the start of the unit of this field containing `instant`.
    fn round_floor(&self, instant: i64) -> Result<i64, Error>;

    /// Returns the start of the next unit of this field, unless `instant`
    /// already starts one.
    fn round_ceiling(&self, instant: i64) -> Result<i64, Error> {
        let floor = self.round_floor(instant)?;
        if floor != instant {
            self.add(floor, 1)
        } else {
            Ok(floor)
        }
    }

    /// Rounds to the nearest unit boundary, preferring the floor on ties.
    fn round_half_floor(&self, instant: i64) -> Result<i64, Error> {
        let (floor, ceiling) = self.floor_and_ceiling(instant)?;
        let from_floor = i128::from(instant) - i128::from(floor);
        let to_ceiling = i128::from(ceiling) - i128::from(instant);
        Ok(if from_floor <= to_ceiling { floor } else { ceiling })
    }

    /// Rounds to the nearest unit boundary, preferring the ceiling on ties.
    fn round_half_ceiling(&self, instant: i64) -> Result<i64, Error> {
        let (floor, ceiling) = self.floor_and_ceiling(instant)?;
        let from_floor = i128::from(instant) - i128::from(floor);
        let to_ceiling = i128::from(ceiling) - i128::from(instant);
        Ok(if to_ceiling <= from_floor { ceiling } else { floor })
    }

    /// Rounds to the nearest unit boundary, preferring the boundary with an
    /// even field value on ties.
    fn round_half_even(&self, instant: i64) -> Result<i64, Error> {
        let (floor, ceiling) = self.floor_and_ceiling(instant)?;
        let from_floor = i128::from(instant) - i128::from(floor);
        let to_ceiling = i128::from(ceiling) - i128::from(instant);
        if from_floor < to_ceiling {
            Ok(floor)
        } else if from_floor > to_ceiling {
            Ok(ceiling)
        } else if self.get(ceiling)? & 1 == 0 {
            Ok(ceiling)
        } else {
            Ok(floor)
        }
    }

    /// Returns the milliseconds elapsed since the floor of `instant`.
    fn remainder(&self, instant: i64) -> Result<i64, Error> {
        arith::sub(instant, self.round_floor(instant)?)
    }

    #[doc(hidden)]
    fn floor_and_ceiling(&self, instant: i64) -> Result<(i64, i64), Error> {
        Ok((self.round_floor(instant)?, self.round_ceiling(instant)?))
    }
}

macro_rules! define_field_ref {
    ($(#[$doc:meta])* $name:ident, $trait:ident) => {
        $(#[$doc])*
        #[derive(Clone)]
        pub struct $name(Arc<dyn $trait>);

        impl $name {
            /// Wraps a field in a new shared handle.
            pub fn new(field: impl $trait) -> $name {
                $name(Arc::new(field))
            }

            /// Returns true when both handles point at the same field.
            pub fn ptr_eq(a: &$name, b: &$name) -> bool {
                a.addr() == b.addr()
            }

            fn addr(&self) -> usize {
                Arc::as_ptr(&self.0) as *const () as usize
            }
        }

        impl core::ops::Deref for $name {
            type Target = dyn $trait;

            fn deref(&self) -> &(dyn $trait + 'static) {
                &*self.0
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                core::fmt::Debug::fmt(&*self.0, f)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &$name) -> bool {
                $name::ptr_eq(self, other)
            }
        }

        impl Eq for $name {}

        impl core::hash::Hash for $name {
            fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
                self.addr().hash(state);
            }
        }
    };
}

define_field_ref!(
    /// A shared handle to a [`DurationField`].
    ///
    /// Equality and hashing are by identity.
    DurationFieldRef,
    DurationField
);

define_field_ref!(
    /// A shared handle to a [`DateTimeField`].
    ///
    /// Equality and hashing are by identity.
    DateTimeFieldRef,
    DateTimeField
);

/// Returns an error when `value` is outside of `min..=max` for the named
/// field.
#[cfg_attr(feature = "perf-inline", inline(always))]
pub(crate) fn verify_bounds(
    name: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), Error> {
    if value < min || value > max {
        return Err(out_of_range(name, value, min, max));
    }
    Ok(())
}

#[cold]
#[inline(never)]
fn out_of_range(name: &'static str, value: i64, min: i64, max: i64) -> Error {
    E::ValueOutOfRange { name, value, min, max }.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_compare_by_identity() {
        let a = DurationFieldRef::new(PreciseDurationField::new(
            DurationFieldType::Hours,
            3_600_000,
        ));
        let b = DurationFieldRef::new(PreciseDurationField::new(
            DurationFieldType::Hours,
            3_600_000,
        ));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn bounds_message() {
        let err = verify_bounds("month-of-year", 13, 1, 12).unwrap_err();
        assert!(err.is_field_value());
        insta::assert_snapshot!(
            err,
            @"value 13 for month-of-year must be in the range [1,12]",
        );
    }
}
