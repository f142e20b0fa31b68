use crate::{
    chrono::fields::FieldDecorator,
    error::{
        arith::Error as ArithError, tz::Error as TzError, zoned::Error as E,
        ErrorContext,
    },
    field::{
        DateTimeField, DateTimeFieldRef, DateTimeFieldType, DurationField,
        DurationFieldRef, DurationFieldType,
    },
    tz::DateTimeZone,
    util::{arith, common::MILLIS_PER_HALFDAY},
    Error,
};

/// Converts a local reading to UTC for the root conversions of a zoned
/// chronology.
///
/// Unlike field writes, a root conversion landing in a gap is an error.
pub(super) fn local_to_utc(zone: &DateTimeZone, local: i64) -> Result<i64, Error> {
    let offset = zone.offset_from_local(local);
    let utc = local
        .checked_sub(i64::from(offset))
        .ok_or_else(|| Error::from(ArithError::SubtractOffset))
        .context(E::DateTimeToUtc)?;
    if offset != zone.offset(utc) {
        return Err(TzError::IllegalInstant { local, zone: zone.clone() })
            .context(E::DateTimeToUtc);
    }
    Ok(utc)
}

/// Units shorter than this are added on the UTC time-line, so that adding
/// an hour always moves an instant by exactly one hour. Longer units are
/// added to the local reading.
fn is_time_unit(field: &DurationFieldRef) -> bool {
    field.unit_millis() < MILLIS_PER_HALFDAY
}

/// Returns the offset at `instant`, failing if adding it would overflow.
fn offset_to_add(zone: &DateTimeZone, instant: i64) -> Result<i64, Error> {
    let offset = i64::from(zone.offset(instant));
    instant.checked_add(offset).ok_or(ArithError::AddOffset)?;
    Ok(offset)
}

/// Returns the offset to subtract from a local reading, failing if
/// subtracting it would overflow.
fn offset_from_local_to_subtract(
    zone: &DateTimeZone,
    local: i64,
) -> Result<i64, Error> {
    let offset = i64::from(zone.offset_from_local(local));
    local.checked_sub(offset).ok_or(ArithError::SubtractOffset)?;
    Ok(offset)
}

pub(super) struct ZonedDecorator {
    zone: DateTimeZone,
}

impl ZonedDecorator {
    pub(super) fn new(zone: DateTimeZone) -> ZonedDecorator {
        ZonedDecorator { zone }
    }
}

impl FieldDecorator for ZonedDecorator {
    fn duration(&self, field: DurationFieldRef) -> DurationFieldRef {
        DurationFieldRef::new(ZonedDurationField {
            time_unit: is_time_unit(&field),
            field,
            zone: self.zone.clone(),
        })
    }

    fn date_time(
        &self,
        field: DateTimeFieldRef,
        duration: DurationFieldRef,
        range: Option<DurationFieldRef>,
        leap: Option<DurationFieldRef>,
    ) -> DateTimeFieldRef {
        DateTimeFieldRef::new(ZonedDateTimeField {
            time_unit: is_time_unit(&duration),
            field,
            zone: self.zone.clone(),
            duration,
            range,
            leap,
        })
    }
}

/// A duration field measured against the local readings of a zone.
#[derive(Debug)]
struct ZonedDurationField {
    field: DurationFieldRef,
    time_unit: bool,
    zone: DateTimeZone,
}

impl DurationField for ZonedDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.field.field_type()
    }

    fn is_precise(&self) -> bool {
        if self.time_unit {
            self.field.is_precise()
        } else {
            self.field.is_precise() && self.zone.is_fixed()
        }
    }

    fn unit_millis(&self) -> i64 {
        self.field.unit_millis()
    }

    fn value_as_i64(&self, duration: i64, instant: i64) -> Result<i64, Error> {
        self.field.value_as_i64(duration, self.zone.utc_to_local(instant)?)
    }

    fn millis(&self, value: i64, instant: i64) -> Result<i64, Error> {
        self.field.millis(value, self.zone.utc_to_local(instant)?)
    }

    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        let offset = offset_to_add(&self.zone, instant)?;
        let local = self.field.add(instant + offset, amount)?;
        let offset = if self.time_unit {
            offset
        } else {
            offset_from_local_to_subtract(&self.zone, local)?
        };
        local.checked_sub(offset).ok_or_else(|| ArithError::SubtractOffset.into())
    }

    fn difference_as_i64(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64, Error> {
        let offset = offset_to_add(&self.zone, subtrahend)?;
        let minuend_offset = if self.time_unit {
            offset
        } else {
            offset_to_add(&self.zone, minuend)?
        };
        self.field.difference_as_i64(
            minuend.checked_add(minuend_offset).ok_or(ArithError::AddOffset)?,
            subtrahend + offset,
        )
    }
}

/// A date-time field reading and writing the local values of a zone.
#[derive(Debug)]
struct ZonedDateTimeField {
    field: DateTimeFieldRef,
    time_unit: bool,
    zone: DateTimeZone,
    duration: DurationFieldRef,
    range: Option<DurationFieldRef>,
    leap: Option<DurationFieldRef>,
}

impl ZonedDateTimeField {
    /// Applies `op` to the local reading of `instant` and converts the
    /// result back to UTC.
    ///
    /// Fields counting in time units apply `op` to the instant shifted by
    /// its offset, and shift back by the same offset.
    fn local_op(
        &self,
        instant: i64,
        op: impl FnOnce(i64) -> Result<i64, Error>,
    ) -> Result<i64, Error> {
        if self.time_unit {
            let offset = offset_to_add(&self.zone, instant)?;
            let local = op(instant + offset)?;
            return local.checked_sub(offset).ok_or_else(|| {
                ArithError::SubtractOffset.into()
            });
        }
        let local = op(self.zone.utc_to_local(instant)?)?;
        self.zone.local_to_utc(local, false)
    }

    /// Like `local_op`, but a date field's rounded reading keeps the offset
    /// of `instant` whenever that offset still fits it, so the rounded
    /// instant stays on the same side of an overlap.
    fn round_op(
        &self,
        instant: i64,
        op: impl FnOnce(i64) -> Result<i64, Error>,
    ) -> Result<i64, Error> {
        if self.time_unit {
            return self.local_op(instant, op);
        }
        let local = op(self.zone.utc_to_local(instant)?)?;
        self.zone.local_to_utc_near(local, false, instant)
    }
}

impl DateTimeField for ZonedDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.field.field_type()
    }

    fn is_lenient(&self) -> bool {
        self.field.is_lenient()
    }

    fn get(&self, instant: i64) -> Result<i32, Error> {
        self.field.get(self.zone.utc_to_local(instant)?)
    }

    fn as_text(&self, instant: i64) -> Result<String, Error> {
        self.field.as_text(self.zone.utc_to_local(instant)?)
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
        self.local_op(instant, |local| self.field.add(local, amount))
    }

    fn add_wrap_field(&self, instant: i64, amount: i32) -> Result<i64, Error> {
        self.local_op(instant, |local| self.field.add_wrap_field(local, amount))
    }

    fn difference_as_i64(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64, Error> {
        let offset = offset_to_add(&self.zone, subtrahend)?;
        let minuend_offset = if self.time_unit {
            offset
        } else {
            offset_to_add(&self.zone, minuend)?
        };
        self.field.difference_as_i64(
            minuend.checked_add(minuend_offset).ok_or(ArithError::AddOffset)?,
            subtrahend + offset,
        )
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i32, Error> {
        arith::to_i32(self.difference_as_i64(minuend, subtrahend)?)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64, Error> {
        let local = self.field.set(self.zone.utc_to_local(instant)?, value)?;
        let result = self.zone.local_to_utc(local, false)?;
        if self.get(result)? != value {
            return Err(E::Transition {
                name: self.name(),
                value,
                local,
                zone: self.zone.clone(),
            }
            .into());
        }
        Ok(result)
    }

    fn set_text(&self, instant: i64, text: &str) -> Result<i64, Error> {
        // A lenient set may legitimately read back differently, so the
        // result is not verified.
        let local = self.zone.utc_to_local(instant)?;
        let local = self.field.set_text(local, text)?;
        self.zone.local_to_utc(local, false)
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
        self.field.is_leap(self.zone.utc_to_local(instant)?)
    }

    fn leap_amount(&self, instant: i64) -> Result<i32, Error> {
        self.field.leap_amount(self.zone.utc_to_local(instant)?)
    }

    fn minimum_value(&self) -> i32 {
        self.field.minimum_value()
    }

    fn minimum_value_at(&self, instant: i64) -> Result<i32, Error> {
        self.field.minimum_value_at(self.zone.utc_to_local(instant)?)
    }

    fn maximum_value(&self) -> i32 {
        self.field.maximum_value()
    }

    fn maximum_value_at(&self, instant: i64) -> Result<i32, Error> {
        self.field.maximum_value_at(self.zone.utc_to_local(instant)?)
    }

    fn round_floor(&self, instant: i64) -> Result<i64, Error> {
        self.round_op(instant, |local| self.field.round_floor(local))
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64, Error> {
        self.round_op(instant, |local| self.field.round_ceiling(local))
    }

    fn remainder(&self, instant: i64) -> Result<i64, Error> {
        self.field.remainder(self.zone.utc_to_local(instant)?)
    }
}
