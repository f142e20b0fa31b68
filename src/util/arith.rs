/*!
Checked arithmetic on millisecond instants and field values.

Every instant in this crate is an `i64` count of milliseconds, and nearly
every operation on one can overflow near the extremes. These helpers turn
overflow into an [`Error`] instead of a wrap or a panic.
*/

use crate::{error::arith::Error as E, Error};

#[cfg_attr(feature = "perf-inline", inline(always))]
pub(crate) fn add(a: i64, b: i64) -> Result<i64, Error> {
    a.checked_add(b).ok_or_else(|| E::Add.into())
}

#[cfg_attr(feature = "perf-inline", inline(always))]
pub(crate) fn sub(a: i64, b: i64) -> Result<i64, Error> {
    a.checked_sub(b).ok_or_else(|| E::Subtract.into())
}

#[cfg_attr(feature = "perf-inline", inline(always))]
pub(crate) fn mul(a: i64, b: i64) -> Result<i64, Error> {
    a.checked_mul(b).ok_or_else(|| E::Multiply.into())
}

#[inline]
pub(crate) fn neg(a: i64) -> Result<i64, Error> {
    a.checked_neg().ok_or_else(|| E::Negate.into())
}

/// Narrows an `i64` to an `i32`, failing when it does not fit.
#[inline]
pub(crate) fn to_i32(value: i64) -> Result<i32, Error> {
    i32::try_from(value).map_err(|_| E::ToInt { value }.into())
}

/// Returns `current + amount` wrapped into the inclusive range `min..=max`.
///
/// This is the arithmetic behind "add with wrap" operations, where adding
/// to a field rolls it over within its range rather than carrying into a
/// larger field.
pub(crate) fn wrapped_value(
    current: i32,
    amount: i32,
    min: i32,
    max: i32,
) -> Result<i32, Error> {
    let value = i64::from(current) + i64::from(amount);
    let range = i64::from(max) - i64::from(min) + 1;
    to_i32(i64::from(min) + (value - i64::from(min)).rem_euclid(range))
}

/// Returns the instant at the start of the `unit` sized period containing
/// `instant`, counting periods from the epoch.
#[inline]
pub(crate) fn floor_to(instant: i64, unit: i64) -> Result<i64, Error> {
    sub(instant, instant.rem_euclid(unit))
}

/// Returns the instant at the start of the next `unit` sized period, unless
/// `instant` already starts one.
#[inline]
pub(crate) fn ceil_to(instant: i64, unit: i64) -> Result<i64, Error> {
    let floor = floor_to(instant, unit)?;
    if floor == instant {
        Ok(floor)
    } else {
        add(floor, unit)
    }
}
