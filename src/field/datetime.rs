use std::sync::OnceLock;

use crate::{
    error::field::Error as E,
    field::{
        verify_bounds, DateTimeField, DateTimeFieldRef, DateTimeFieldType,
        DurationFieldRef, ScaledDurationField, UnsupportedDurationField,
    },
    util::arith,
    Error,
};

/// A date-time field over fixed-length units cycling within a fixed-length
/// range, such as hour-of-day (hours within a day).
#[derive(Debug)]
pub struct PreciseDateTimeField {
    ty: DateTimeFieldType,
    unit: DurationFieldRef,
    range: DurationFieldRef,
    unit_millis: i64,
    range_count: i32,
}

impl PreciseDateTimeField {
    /// Creates a precise field counting `unit` within `range`.
    ///
    /// # Panics
    ///
    /// When either duration field is imprecise, or `range` is not a whole
    /// multiple (of at least two) of `unit`.
    pub fn new(
        ty: DateTimeFieldType,
        unit: DurationFieldRef,
        range: DurationFieldRef,
    ) -> PreciseDateTimeField {
        assert!(unit.is_precise(), "unit duration field must be precise");
        assert!(range.is_precise(), "range duration field must be precise");
        let unit_millis = unit.unit_millis();
        assert!(unit_millis > 0, "unit length must be positive");
        let range_millis = range.unit_millis();
        assert!(
            range_millis % unit_millis == 0,
            "range must be a whole number of units",
        );
        let range_count = range_millis / unit_millis;
        assert!(
            (2..=i64::from(i32::MAX)).contains(&range_count),
            "range must hold between 2 and i32::MAX units",
        );
        let range_count = range_count as i32;
        PreciseDateTimeField { ty, unit, range, unit_millis, range_count }
    }
}

impl DateTimeField for PreciseDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.ty
    }

    fn get(&self, instant: i64) -> Result<i32, Error> {
        let units = instant.div_euclid(self.unit_millis);
        // The remainder is below `range_count`, which fits in an `i32`.
        Ok(units.rem_euclid(i64::from(self.range_count)) as i32)
    }

    fn add_wrap_field(&self, instant: i64, amount: i32) -> Result<i64, Error> {
        let current = self.get(instant)?;
        let wrapped =
            arith::wrapped_value(current, amount, 0, self.range_count - 1)?;
        let delta = i64::from(wrapped) - i64::from(current);
        arith::add(instant, delta * self.unit_millis)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64, Error> {
        verify_bounds(
            self.name(),
            i64::from(value),
            0,
            i64::from(self.range_count - 1),
        )?;
        let delta = i64::from(value) - i64::from(self.get(instant)?);
        arith::add(instant, delta * self.unit_millis)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.unit.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.range.clone())
    }

    fn minimum_value(&self) -> i32 {
        0
    }

    fn maximum_value(&self) -> i32 {
        self.range_count - 1
    }

    fn round_floor(&self, instant: i64) -> Result<i64, Error> {
        arith::floor_to(instant, self.unit_millis)
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64, Error> {
        arith::ceil_to(instant, self.unit_millis)
    }

    fn remainder(&self, instant: i64) -> Result<i64, Error> {
        Ok(instant.rem_euclid(self.unit_millis))
    }
}

/// Wraps a zero-based field so that zero reads as its maximum plus one,
/// turning hour-of-day (`0..=23`) into clock-hour-of-day (`1..=24`).
#[derive(Debug)]
pub struct ZeroIsMaxDateTimeField {
    field: DateTimeFieldRef,
    ty: DateTimeFieldType,
}

impl ZeroIsMaxDateTimeField {
    /// Creates a field of type `ty` reading `field` with zero as maximum.
    ///
    /// # Panics
    ///
    /// When the minimum of `field` is not zero.
    pub fn new(
        field: DateTimeFieldRef,
        ty: DateTimeFieldType,
    ) -> ZeroIsMaxDateTimeField {
        assert_eq!(field.minimum_value(), 0, "wrapped field must be zero based");
        ZeroIsMaxDateTimeField { field, ty }
    }
}

impl DateTimeField for ZeroIsMaxDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.ty
    }

    fn get(&self, instant: i64) -> Result<i32, Error> {
        let value = self.field.get(instant)?;
        Ok(if value == 0 { self.maximum_value() } else { value })
    }

    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        self.field.add(instant, amount)
    }

    fn add_wrap_field(&self, instant: i64, amount: i32) -> Result<i64, Error> {
        self.field.add_wrap_field(instant, amount)
    }

    fn difference_as_i64(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64, Error> {
        self.field.difference_as_i64(minuend, subtrahend)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64, Error> {
        let max = self.maximum_value();
        verify_bounds(self.name(), i64::from(value), 1, i64::from(max))?;
        self.field.set(instant, if value == max { 0 } else { value })
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.field.duration_field()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        self.field.range_duration_field()
    }

    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        self.field.leap_duration_field()
    }

    fn is_leap(&self, instant: i64) -> Result<bool, Error> {
        self.field.is_leap(instant)
    }

    fn leap_amount(&self, instant: i64) -> Result<i32, Error> {
        self.field.leap_amount(instant)
    }

    fn minimum_value(&self) -> i32 {
        1
    }

    fn maximum_value(&self) -> i32 {
        self.field.maximum_value() + 1
    }

    fn maximum_value_at(&self, instant: i64) -> Result<i32, Error> {
        Ok(self.field.maximum_value_at(instant)? + 1)
    }

    fn round_floor(&self, instant: i64) -> Result<i64, Error> {
        self.field.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64, Error> {
        self.field.round_ceiling(instant)
    }

    fn remainder(&self, instant: i64) -> Result<i64, Error> {
        self.field.remainder(instant)
    }
}

/// Divides the values of a field by a fixed divisor, like century-of-era
/// from year-of-era.
#[derive(Debug)]
pub struct DividedDateTimeField {
    field: DateTimeFieldRef,
    ty: DateTimeFieldType,
    divisor: i32,
    duration: DurationFieldRef,
    min: i32,
    max: i32,
}

impl DividedDateTimeField {
    /// Creates a field of type `ty` whose values are those of `field`
    /// divided by `divisor`, rounding towards negative infinity.
    ///
    /// # Panics
    ///
    /// When `divisor` is less than `2`.
    pub fn new(
        field: DateTimeFieldRef,
        ty: DateTimeFieldType,
        divisor: i32,
    ) -> DividedDateTimeField {
        assert!(divisor > 1, "divisor must be greater than one");
        let duration = DurationFieldRef::new(ScaledDurationField::new(
            field.duration_field(),
            ty.duration_type(),
            divisor,
        ));
        let min = field.minimum_value().div_euclid(divisor);
        let max = field.maximum_value().div_euclid(divisor);
        DividedDateTimeField { field, ty, divisor, duration, min, max }
    }

    /// Returns the field being divided.
    pub fn wrapped_field(&self) -> &DateTimeFieldRef {
        &self.field
    }

    /// Returns the divisor.
    pub fn divisor(&self) -> i32 {
        self.divisor
    }
}

impl DateTimeField for DividedDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.ty
    }

    fn get(&self, instant: i64) -> Result<i32, Error> {
        Ok(self.field.get(instant)?.div_euclid(self.divisor))
    }

    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        self.field.add(instant, arith::mul(amount, i64::from(self.divisor))?)
    }

    fn add_wrap_field(&self, instant: i64, amount: i32) -> Result<i64, Error> {
        let current = self.get(instant)?;
        self.set(
            instant,
            arith::wrapped_value(current, amount, self.min, self.max)?,
        )
    }

    fn difference_as_i64(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64, Error> {
        let diff = self.field.difference_as_i64(minuend, subtrahend)?;
        Ok(diff / i64::from(self.divisor))
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64, Error> {
        verify_bounds(
            self.name(),
            i64::from(value),
            i64::from(self.min),
            i64::from(self.max),
        )?;
        let remainder = self.field.get(instant)?.rem_euclid(self.divisor);
        let wrapped = i64::from(value) * i64::from(self.divisor)
            + i64::from(remainder);
        self.field.set(instant, arith::to_i32(wrapped)?)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.duration.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        self.field.range_duration_field()
    }

    fn minimum_value(&self) -> i32 {
        self.min
    }

    fn maximum_value(&self) -> i32 {
        self.max
    }

    fn round_floor(&self, instant: i64) -> Result<i64, Error> {
        let start = self.get(instant)? * self.divisor;
        self.field.round_floor(self.field.set(instant, start)?)
    }
}

/// The remainder left over by a [`DividedDateTimeField`], like
/// year-of-century from year-of-era.
#[derive(Debug)]
pub struct RemainderDateTimeField {
    field: DateTimeFieldRef,
    ty: DateTimeFieldType,
    divisor: i32,
    range: DurationFieldRef,
}

impl RemainderDateTimeField {
    /// Creates a field of type `ty` reading what `divided` leaves over.
    pub fn new(
        divided: &DividedDateTimeField,
        ty: DateTimeFieldType,
    ) -> RemainderDateTimeField {
        RemainderDateTimeField {
            field: divided.wrapped_field().clone(),
            ty,
            divisor: divided.divisor(),
            range: divided.duration_field(),
        }
    }
}

impl DateTimeField for RemainderDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.ty
    }

    fn get(&self, instant: i64) -> Result<i32, Error> {
        Ok(self.field.get(instant)?.rem_euclid(self.divisor))
    }

    fn add_wrap_field(&self, instant: i64, amount: i32) -> Result<i64, Error> {
        let current = self.get(instant)?;
        self.set(
            instant,
            arith::wrapped_value(current, amount, 0, self.divisor - 1)?,
        )
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64, Error> {
        verify_bounds(
            self.name(),
            i64::from(value),
            0,
            i64::from(self.divisor - 1),
        )?;
        let divided = self.field.get(instant)?.div_euclid(self.divisor);
        let wrapped =
            i64::from(divided) * i64::from(self.divisor) + i64::from(value);
        self.field.set(instant, arith::to_i32(wrapped)?)
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.field.duration_field()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        Some(self.range.clone())
    }

    fn minimum_value(&self) -> i32 {
        0
    }

    fn maximum_value(&self) -> i32 {
        self.divisor - 1
    }

    fn round_floor(&self, instant: i64) -> Result<i64, Error> {
        self.field.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64, Error> {
        self.field.round_ceiling(instant)
    }

    fn remainder(&self, instant: i64) -> Result<i64, Error> {
        self.field.remainder(instant)
    }
}

/// An era field for calendars with exactly one era.
///
/// The value is always `1`, and the only era spans every representable
/// instant, so rounding goes to the extremes of the time-line.
#[derive(Debug)]
pub struct SingleEraDateTimeField {
    text: &'static str,
}

impl SingleEraDateTimeField {
    /// Creates a single era field whose era is named `text`.
    pub fn new(text: &'static str) -> SingleEraDateTimeField {
        SingleEraDateTimeField { text }
    }
}

impl DateTimeField for SingleEraDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::Era
    }

    fn get(&self, _: i64) -> Result<i32, Error> {
        Ok(1)
    }

    fn text_for_value(&self, _: i32) -> String {
        self.text.to_string()
    }

    fn value_for_text(&self, text: &str) -> Result<i32, Error> {
        if text.eq_ignore_ascii_case(self.text) || text == "1" {
            return Ok(1);
        }
        Err(E::InvalidText { name: self.name(), text: text.into() }.into())
    }

    fn maximum_text_len(&self) -> usize {
        self.text.len()
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64, Error> {
        verify_bounds(self.name(), i64::from(value), 1, 1)?;
        Ok(instant)
    }

    fn duration_field(&self) -> DurationFieldRef {
        UnsupportedDurationField::instance(
            DateTimeFieldType::Era.duration_type(),
        )
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        None
    }

    fn minimum_value(&self) -> i32 {
        1
    }

    fn maximum_value(&self) -> i32 {
        1
    }

    fn round_floor(&self, _: i64) -> Result<i64, Error> {
        Ok(i64::MIN)
    }

    fn round_ceiling(&self, _: i64) -> Result<i64, Error> {
        Ok(i64::MAX)
    }

    fn round_half_floor(&self, _: i64) -> Result<i64, Error> {
        Ok(i64::MIN)
    }

    fn round_half_ceiling(&self, _: i64) -> Result<i64, Error> {
        Ok(i64::MIN)
    }

    fn round_half_even(&self, _: i64) -> Result<i64, Error> {
        Ok(i64::MIN)
    }
}

/// The sentinel date-time field for slots a chronology does not provide.
///
/// It reports itself as unsupported, and every operation on it fails.
/// Its minimum and maximum are reported as `0`. There is one shared
/// instance per field type.
#[derive(Debug)]
pub struct UnsupportedDateTimeField {
    ty: DateTimeFieldType,
    duration: DurationFieldRef,
}

impl UnsupportedDateTimeField {
    /// Returns the shared unsupported field for the given type.
    pub fn instance(ty: DateTimeFieldType) -> DateTimeFieldRef {
        static CACHE: OnceLock<Vec<DateTimeFieldRef>> = OnceLock::new();
        let cache = CACHE.get_or_init(|| {
            DateTimeFieldType::ALL
                .into_iter()
                .map(|ty| {
                    let duration =
                        UnsupportedDurationField::instance(ty.duration_type());
                    DateTimeFieldRef::new(UnsupportedDateTimeField {
                        ty,
                        duration,
                    })
                })
                .collect()
        });
        cache[ty.index()].clone()
    }

    #[cold]
    #[inline(never)]
    fn unsupported(&self) -> Error {
        E::Unsupported { name: self.ty.name() }.into()
    }
}

impl DateTimeField for UnsupportedDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.ty
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn get(&self, _: i64) -> Result<i32, Error> {
        Err(self.unsupported())
    }

    fn as_text(&self, _: i64) -> Result<String, Error> {
        Err(self.unsupported())
    }

    fn value_for_text(&self, _: &str) -> Result<i32, Error> {
        Err(self.unsupported())
    }

    fn add(&self, _: i64, _: i64) -> Result<i64, Error> {
        Err(self.unsupported())
    }

    fn add_wrap_field(&self, _: i64, _: i32) -> Result<i64, Error> {
        Err(self.unsupported())
    }

    fn difference_as_i64(&self, _: i64, _: i64) -> Result<i64, Error> {
        Err(self.unsupported())
    }

    fn set(&self, _: i64, _: i32) -> Result<i64, Error> {
        Err(self.unsupported())
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.duration.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        None
    }

    fn is_leap(&self, _: i64) -> Result<bool, Error> {
        Err(self.unsupported())
    }

    fn leap_amount(&self, _: i64) -> Result<i32, Error> {
        Err(self.unsupported())
    }

    fn minimum_value(&self) -> i32 {
        0
    }

    fn minimum_value_at(&self, _: i64) -> Result<i32, Error> {
        Err(self.unsupported())
    }

    fn maximum_value(&self) -> i32 {
        0
    }

    fn maximum_value_at(&self, _: i64) -> Result<i32, Error> {
        Err(self.unsupported())
    }

    fn round_floor(&self, _: i64) -> Result<i64, Error> {
        Err(self.unsupported())
    }

    fn round_ceiling(&self, _: i64) -> Result<i64, Error> {
        Err(self.unsupported())
    }

    fn remainder(&self, _: i64) -> Result<i64, Error> {
        Err(self.unsupported())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{DurationFieldType, PreciseDurationField};

    fn precise(ty: DurationFieldType, millis: i64) -> DurationFieldRef {
        DurationFieldRef::new(PreciseDurationField::new(ty, millis))
    }

    fn hour_of_day() -> DateTimeFieldRef {
        DateTimeFieldRef::new(PreciseDateTimeField::new(
            DateTimeFieldType::HourOfDay,
            precise(DurationFieldType::Hours, 3_600_000),
            precise(DurationFieldType::Days, 86_400_000),
        ))
    }

    #[test]
    fn precise_get_before_epoch() {
        let field = hour_of_day();
        assert_eq!(field.get(0).unwrap(), 0);
        assert_eq!(field.get(-1).unwrap(), 23);
        assert_eq!(field.get(-3_600_000).unwrap(), 23);
        assert_eq!(field.get(-3_600_001).unwrap(), 22);
        assert_eq!(field.round_floor(-1).unwrap(), -3_600_000);
        assert_eq!(field.remainder(-1).unwrap(), 3_599_999);
    }

    #[test]
    fn precise_wrap_does_not_carry() {
        let field = hour_of_day();
        let at_23 = 23 * 3_600_000;
        assert_eq!(field.add_wrap_field(at_23, 2).unwrap(), 3_600_000);
        assert_eq!(field.add(at_23, 2).unwrap(), 25 * 3_600_000);
        let err = field.set(0, 24).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"value 24 for hour-of-day must be in the range [0,23]",
        );
    }

    #[test]
    fn zero_is_max() {
        let clock = ZeroIsMaxDateTimeField::new(
            hour_of_day(),
            DateTimeFieldType::ClockhourOfDay,
        );
        assert_eq!(clock.get(0).unwrap(), 24);
        assert_eq!(clock.get(3_600_000).unwrap(), 1);
        assert_eq!(clock.set(3_600_000, 24).unwrap(), 0);
        assert_eq!(clock.minimum_value(), 1);
        assert_eq!(clock.maximum_value(), 24);
        assert!(clock.set(0, 0).unwrap_err().is_field_value());
    }

    #[test]
    fn divided_and_remainder_of_hours() {
        let divided = DividedDateTimeField::new(
            hour_of_day(),
            DateTimeFieldType::HalfdayOfDay,
            12,
        );
        let remainder = RemainderDateTimeField::new(
            &divided,
            DateTimeFieldType::HourOfHalfday,
        );
        let at_13 = 13 * 3_600_000;
        assert_eq!(divided.get(at_13).unwrap(), 1);
        assert_eq!(remainder.get(at_13).unwrap(), 1);
        assert_eq!(divided.set(at_13, 0).unwrap(), 3_600_000);
        assert_eq!(remainder.set(at_13, 11).unwrap(), 23 * 3_600_000);
        assert_eq!(divided.round_floor(at_13 + 5).unwrap(), 12 * 3_600_000);
        assert_eq!(divided.duration_field().unit_millis(), 43_200_000);
    }

    #[test]
    fn single_era() {
        let era = SingleEraDateTimeField::new("BE");
        assert_eq!(era.get(i64::MIN).unwrap(), 1);
        assert_eq!(era.round_floor(0).unwrap(), i64::MIN);
        assert_eq!(era.round_ceiling(0).unwrap(), i64::MAX);
        assert_eq!(era.as_text(0).unwrap(), "BE");
        assert_eq!(era.set_text(42, "be").unwrap(), 42);
        assert!(era.set(0, 0).unwrap_err().is_field_value());
        assert!(!era.duration_field().is_supported());
    }

    #[test]
    fn unsupported_instances_are_shared() {
        let a = UnsupportedDateTimeField::instance(DateTimeFieldType::Weekyear);
        let b = UnsupportedDateTimeField::instance(DateTimeFieldType::Weekyear);
        assert_eq!(a, b);
        assert!(!a.is_supported());
        assert!(a.get(0).unwrap_err().is_unsupported());
        assert_eq!(a.duration_field().field_type(), DurationFieldType::Weekyears);
    }
}
