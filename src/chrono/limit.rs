use std::sync::Arc;

use crate::{
    chrono::{fields::FieldDecorator, Chronology},
    error::limit::{Error as E, LimitBound},
    field::{
        DateTimeField, DateTimeFieldRef, DateTimeFieldType, DurationField,
        DurationFieldRef, DurationFieldType,
    },
    Error,
};

/// The limits of a limited chronology, shared by all of its fields.
#[derive(Debug)]
pub(super) struct Limits {
    pub(super) base: Chronology,
    pub(super) lower: Option<i64>,
    pub(super) upper: Option<i64>,
}

impl Limits {
    pub(super) fn new(
        base: Chronology,
        lower: Option<i64>,
        upper: Option<i64>,
    ) -> Limits {
        Limits { base, lower, upper }
    }

    /// Fails when `instant` is before the lower limit or at or after the
    /// upper limit. The label names the instant in the error message.
    #[cfg_attr(feature = "perf-inline", inline(always))]
    pub(super) fn check(
        &self,
        instant: i64,
        label: Option<&'static str>,
    ) -> Result<(), Error> {
        if let Some(lower) = self.lower {
            if instant < lower {
                return Err(self.exceeded(LimitBound::Below, label, lower));
            }
        }
        if let Some(upper) = self.upper {
            if instant >= upper {
                return Err(self.exceeded(LimitBound::Above, label, upper));
            }
        }
        Ok(())
    }

    #[cold]
    #[inline(never)]
    fn exceeded(
        &self,
        bound: LimitBound,
        label: Option<&'static str>,
        limit: i64,
    ) -> Error {
        E::Exceeded { bound, label, limit, base: self.base.clone() }.into()
    }

    /// Checks the input, runs `op` and checks its result.
    fn checked(
        &self,
        instant: i64,
        op: impl FnOnce(i64) -> Result<i64, Error>,
    ) -> Result<i64, Error> {
        self.check(instant, None)?;
        let result = op(instant)?;
        self.check(result, Some("resulting"))?;
        Ok(result)
    }

    fn check_difference(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<(), Error> {
        self.check(minuend, Some("minuend"))?;
        self.check(subtrahend, Some("subtrahend"))
    }
}

pub(super) struct LimitDecorator {
    limits: Arc<Limits>,
}

impl LimitDecorator {
    pub(super) fn new(limits: Arc<Limits>) -> LimitDecorator {
        LimitDecorator { limits }
    }
}

impl FieldDecorator for LimitDecorator {
    fn duration(&self, field: DurationFieldRef) -> DurationFieldRef {
        DurationFieldRef::new(LimitDurationField {
            field,
            limits: Arc::clone(&self.limits),
        })
    }

    fn date_time(
        &self,
        field: DateTimeFieldRef,
        duration: DurationFieldRef,
        range: Option<DurationFieldRef>,
        leap: Option<DurationFieldRef>,
    ) -> DateTimeFieldRef {
        DateTimeFieldRef::new(LimitDateTimeField {
            field,
            limits: Arc::clone(&self.limits),
            duration,
            range,
            leap,
        })
    }
}

#[derive(Debug)]
struct LimitDurationField {
    field: DurationFieldRef,
    limits: Arc<Limits>,
}

impl DurationField for LimitDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.field.field_type()
    }

    fn is_precise(&self) -> bool {
        self.field.is_precise()
    }

    fn unit_millis(&self) -> i64 {
        self.field.unit_millis()
    }

    fn value_as_i64(&self, duration: i64, instant: i64) -> Result<i64, Error> {
        self.limits.check(instant, None)?;
        self.field.value_as_i64(duration, instant)
    }

    fn millis(&self, value: i64, instant: i64) -> Result<i64, Error> {
        self.limits.check(instant, None)?;
        self.field.millis(value, instant)
    }

    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        self.limits.checked(instant, |instant| self.field.add(instant, amount))
    }

    fn difference_as_i64(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64, Error> {
        self.limits.check_difference(minuend, subtrahend)?;
        self.field.difference_as_i64(minuend, subtrahend)
    }
}

#[derive(Debug)]
struct LimitDateTimeField {
    field: DateTimeFieldRef,
    limits: Arc<Limits>,
    duration: DurationFieldRef,
    range: Option<DurationFieldRef>,
    leap: Option<DurationFieldRef>,
}

impl DateTimeField for LimitDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.field.field_type()
    }

    fn is_lenient(&self) -> bool {
        self.field.is_lenient()
    }

    fn get(&self, instant: i64) -> Result<i32, Error> {
        self.limits.check(instant, None)?;
        self.field.get(instant)
    }

    fn as_text(&self, instant: i64) -> Result<String, Error> {
        self.limits.check(instant, None)?;
        self.field.as_text(instant)
    }

    fn text_for_value(&self, value: i32) -> String {
        self.field.text_for_value(value)
    }

    fn value_for_text(&self, text: &str) -> Result<i32, Error> {
        self.field.value_for_text(text)
    }

    fn maximum_text_len(&self) -> usize {
        self.field.maximum_text_len()
    }

    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        self.limits.checked(instant, |instant| self.field.add(instant, amount))
    }

    fn add_wrap_field(&self, instant: i64, amount: i32) -> Result<i64, Error> {
        self.limits.checked(instant, |instant| {
            self.field.add_wrap_field(instant, amount)
        })
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i32, Error> {
        self.limits.check_difference(minuend, subtrahend)?;
        self.field.difference(minuend, subtrahend)
    }

    fn difference_as_i64(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64, Error> {
        self.limits.check_difference(minuend, subtrahend)?;
        self.field.difference_as_i64(minuend, subtrahend)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64, Error> {
        self.limits.checked(instant, |instant| self.field.set(instant, value))
    }

    fn set_text(&self, instant: i64, text: &str) -> Result<i64, Error> {
        self.limits.checked(instant, |instant| self.field.set_text(instant, text))
    }

    fn duration_field(&self) -> DurationFieldRef {
        self.duration.clone()
    }

    fn range_duration_field(&self) -> Option<DurationFieldRef> {
        self.range.clone()
    }

    fn leap_duration_field(&self) -> Option<DurationFieldRef> {
        self.leap.clone()
    }

    fn is_leap(&self, instant: i64) -> Result<bool, Error> {
        self.limits.check(instant, None)?;
        self.field.is_leap(instant)
    }

    fn leap_amount(&self, instant: i64) -> Result<i32, Error> {
        self.limits.check(instant, None)?;
        self.field.leap_amount(instant)
    }

    fn minimum_value(&self) -> i32 {
        self.field.minimum_value()
    }

    fn minimum_value_at(&self, instant: i64) -> Result<i32, Error> {
        self.limits.check(instant, None)?;
        self.field.minimum_value_at(instant)
    }

    fn maximum_value(&self) -> i32 {
        self.field.maximum_value()
    }

    fn maximum_value_at(&self, instant: i64) -> Result<i32, Error> {
        self.limits.check(instant, None)?;
        self.field.maximum_value_at(instant)
    }

    fn round_floor(&self, instant: i64) -> Result<i64, Error> {
        self.limits.checked(instant, |instant| self.field.round_floor(instant))
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64, Error> {
        self.limits.checked(instant, |instant| self.field.round_ceiling(instant))
    }

    fn round_half_floor(&self, instant: i64) -> Result<i64, Error> {
        self.limits.checked(instant, |instant| {
            self.field.round_half_floor(instant)
        })
    }

    fn round_half_ceiling(&self, instant: i64) -> Result<i64, Error> {
        self.limits.checked(instant, |instant| {
            self.field.round_half_ceiling(instant)
        })
    }

    fn round_half_even(&self, instant: i64) -> Result<i64, Error> {
        self.limits.checked(instant, |instant| {
            self.field.round_half_even(instant)
        })
    }

    fn remainder(&self, instant: i64) -> Result<i64, Error> {
        self.limits.check(instant, None)?;
        self.field.remainder(instant)
    }
}

#[cfg(test)]
mod tests {
    use crate::tz::{testdata::*, DateTimeZone};

    use super::*;

    fn limited() -> Chronology {
        Chronology::limit(&Chronology::iso(), Some(1_000), Some(5_000)).unwrap()
    }

    #[test]
    fn reads_inside_and_outside() {
        let chrono = limited();
        let below = chrono.second_of_minute().get(999).unwrap_err();
        assert_eq!(below.limit_bound(), Some(LimitBound::Below));
        let above = chrono.second_of_minute().get(5_000).unwrap_err();
        assert_eq!(above.limit_bound(), Some(LimitBound::Above));
        assert_eq!(chrono.second_of_minute().get(4_999).unwrap(), 4);
        assert_eq!(chrono.second_of_minute().get(1_000).unwrap(), 1);
        insta::assert_snapshot!(
            below,
            @"the instant is below the supported minimum of 1970-01-01T00:00:01.000Z (ISOChronology[UTC])",
        );
    }

    #[test]
    fn results_are_checked() {
        let chrono = limited();
        let err = chrono.seconds().add(4_000, 1).unwrap_err();
        assert!(err.is_limit_exceeded());
        insta::assert_snapshot!(
            err,
            @"the resulting instant is above the supported maximum of 1970-01-01T00:00:05.000Z (ISOChronology[UTC])",
        );
        assert_eq!(chrono.seconds().add(3_000, 1).unwrap(), 4_000);
        assert_eq!(chrono.second_of_minute().round_floor(1_500).unwrap(), 1_000);
        let err = chrono.hour_of_day().round_floor(1_500).unwrap_err();
        assert_eq!(err.limit_bound(), Some(LimitBound::Below));
        assert_eq!(chrono.second_of_minute().round_ceiling(1_500).unwrap(), 2_000);
        // The remainder is a duration, not an instant.
        assert_eq!(chrono.second_of_minute().remainder(1_500).unwrap(), 500);
    }

    #[test]
    fn difference_labels_operands() {
        let chrono = limited();
        let err = chrono.seconds().difference(4_000, 0).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"the subtrahend instant is below the supported minimum of 1970-01-01T00:00:01.000Z (ISOChronology[UTC])",
        );
        let err = chrono.second_of_minute().difference(6_000, 2_000).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"the minuend instant is above the supported maximum of 1970-01-01T00:00:05.000Z (ISOChronology[UTC])",
        );
        assert_eq!(chrono.seconds().difference(4_000, 1_000).unwrap(), 3);
    }

    #[test]
    fn root_conversions() {
        let iso = Chronology::iso();
        let chrono = Chronology::limit(&iso, Some(0), None).unwrap();
        let err = chrono.date_time_millis(1969, 12, 31, 0).unwrap_err();
        assert_eq!(err.limit_bound(), Some(LimitBound::Below));
        assert_eq!(chrono.date_time_millis(1970, 1, 1, 5).unwrap(), 5);
        let err = chrono.with_time_millis(-1, 0, 0, 0, 0).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"the instant is below the supported minimum of 1970-01-01T00:00:00.000Z (ISOChronology[UTC])",
        );
    }

    #[test]
    fn invalid_range() {
        let iso = Chronology::iso();
        let err = Chronology::limit(&iso, Some(5), Some(5)).unwrap_err();
        assert!(err.is_invalid_range());
        insta::assert_snapshot!(
            err,
            @"the lower limit 1970-01-01T00:00:00.005Z must come before the upper limit 1970-01-01T00:00:00.005Z",
        );
        assert!(Chronology::limit(&iso, None, None).is_ok());
    }

    #[test]
    fn unsupported_fields_stay_shared() {
        let chrono = limited();
        assert!(!chrono.eras().is_supported());
        assert_eq!(chrono.eras(), Chronology::iso().eras());
    }

    #[test]
    fn decorated_fields_point_into_the_set() {
        let chrono = limited();
        assert_eq!(chrono.hour_of_day().duration_field(), *chrono.hours());
        assert_eq!(
            chrono.hour_of_day().range_duration_field().as_ref(),
            Some(chrono.days()),
        );
        assert_eq!(chrono.clockhour_of_day().duration_field(), *chrono.hours());
    }

    #[test]
    fn rezoning_keeps_wall_clock_limits() {
        let plus2 = DateTimeZone::for_offset_hours(2).unwrap();
        let zoned = Chronology::iso_in(plus2);
        // 1970-01-01T02:00 local at +02:00.
        let chrono = Chronology::limit(&zoned, Some(0), None).unwrap();
        let utc = chrono.with_utc().unwrap();
        assert_eq!(utc.lower_limit(), Some(2 * HOUR));
        assert_eq!(utc.base(), Some(&Chronology::iso()));
        assert_eq!(chrono.with_utc().unwrap(), utc);

        let in_london = chrono.with_zone(london()).unwrap();
        assert_eq!(in_london.lower_limit(), Some(2 * HOUR));
        assert!(chrono.with_zone(zoned.zone().clone()).unwrap() == chrono);
    }

    #[test]
    fn rezoning_can_fail() {
        let plus1 = DateTimeZone::for_offset_hours(1).unwrap();
        let zoned = Chronology::iso_in(plus1);
        let chrono = Chronology::limit(&zoned, None, Some(i64::MAX)).unwrap();
        let err = chrono.with_utc().unwrap_err();
        assert!(err.is_overflow());
        insta::assert_snapshot!(
            err,
            @"failed to re-express chronology limits in time zone UTC: adding time zone offset caused overflow",
        );
    }
}
