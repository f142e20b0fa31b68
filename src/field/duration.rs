use std::sync::OnceLock;

use crate::{
    error::field::Error as E,
    field::{DurationField, DurationFieldRef, DurationFieldType},
    util::arith,
    Error,
};

/// The duration field for milliseconds, the unit instants are counted in.
#[derive(Debug)]
pub struct MillisDurationField(());

impl MillisDurationField {
    /// Returns the shared millisecond field.
    pub fn instance() -> DurationFieldRef {
        static INSTANCE: OnceLock<DurationFieldRef> = OnceLock::new();
        INSTANCE
            .get_or_init(|| DurationFieldRef::new(MillisDurationField(())))
            .clone()
    }
}

impl DurationField for MillisDurationField {
    fn field_type(&self) -> DurationFieldType {
        DurationFieldType::Millis
    }

    fn is_precise(&self) -> bool {
        true
    }

    fn unit_millis(&self) -> i64 {
        1
    }

    fn value_as_i64(&self, duration: i64, _: i64) -> Result<i64, Error> {
        Ok(duration)
    }

    fn millis(&self, value: i64, _: i64) -> Result<i64, Error> {
        Ok(value)
    }

    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        arith::add(instant, amount)
    }

    fn difference_as_i64(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64, Error> {
        arith::sub(minuend, subtrahend)
    }
}

/// A duration field whose every unit is the same number of milliseconds.
#[derive(Debug)]
pub struct PreciseDurationField {
    ty: DurationFieldType,
    unit: i64,
}

impl PreciseDurationField {
    /// Creates a precise field of the given type and unit length.
    ///
    /// # Panics
    ///
    /// When `unit_millis` is not positive.
    pub fn new(ty: DurationFieldType, unit_millis: i64) -> PreciseDurationField {
        assert!(unit_millis > 0, "unit length must be positive");
        PreciseDurationField { ty, unit: unit_millis }
    }
}

impl DurationField for PreciseDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.ty
    }

    fn is_precise(&self) -> bool {
        true
    }

    fn unit_millis(&self) -> i64 {
        self.unit
    }

    fn value_as_i64(&self, duration: i64, _: i64) -> Result<i64, Error> {
        Ok(duration / self.unit)
    }

    fn millis(&self, value: i64, _: i64) -> Result<i64, Error> {
        arith::mul(value, self.unit)
    }

    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        arith::add(instant, arith::mul(amount, self.unit)?)
    }

    fn difference_as_i64(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64, Error> {
        Ok(arith::sub(minuend, subtrahend)? / self.unit)
    }
}

/// A duration field counting in multiples of another duration field, like
/// centuries in terms of years.
#[derive(Debug)]
pub struct ScaledDurationField {
    field: DurationFieldRef,
    ty: DurationFieldType,
    scalar: i64,
}

impl ScaledDurationField {
    /// Creates a field whose unit is `scalar` units of `field`.
    ///
    /// # Panics
    ///
    /// When `scalar` is less than `2`.
    pub fn new(
        field: DurationFieldRef,
        ty: DurationFieldType,
        scalar: i32,
    ) -> ScaledDurationField {
        assert!(scalar > 1, "scalar must be greater than one");
        ScaledDurationField { field, ty, scalar: i64::from(scalar) }
    }
}

impl DurationField for ScaledDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.ty
    }

    fn is_supported(&self) -> bool {
        self.field.is_supported()
    }

    fn is_precise(&self) -> bool {
        self.field.is_precise()
    }

    fn unit_millis(&self) -> i64 {
        self.field.unit_millis().saturating_mul(self.scalar)
    }

    fn value_as_i64(&self, duration: i64, instant: i64) -> Result<i64, Error> {
        Ok(self.field.value_as_i64(duration, instant)? / self.scalar)
    }

    fn millis(&self, value: i64, instant: i64) -> Result<i64, Error> {
        self.field.millis(arith::mul(value, self.scalar)?, instant)
    }

    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        self.field.add(instant, arith::mul(amount, self.scalar)?)
    }

    fn difference_as_i64(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64, Error> {
        Ok(self.field.difference_as_i64(minuend, subtrahend)? / self.scalar)
    }
}

/// The calendar arithmetic behind an [`ImpreciseDurationField`].
///
/// Units like months and years have no fixed length, so adding them and
/// measuring them is delegated to the calendar that defines them.
pub trait CalendarUnit: core::fmt::Debug + Send + Sync + 'static {
    /// Adds an amount of this unit to an instant.
    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error>;

    /// Returns how many whole units `subtrahend` must be moved by to reach
    /// `minuend` without overshooting it.
    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64, Error>;
}

/// A duration field whose units vary in length, like months.
#[derive(Debug)]
pub struct ImpreciseDurationField<U> {
    ty: DurationFieldType,
    average_millis: i64,
    unit: U,
}

impl<U: CalendarUnit> ImpreciseDurationField<U> {
    /// Creates an imprecise field driven by `unit`, reporting
    /// `average_millis` as its unit length.
    pub fn new(
        ty: DurationFieldType,
        average_millis: i64,
        unit: U,
    ) -> ImpreciseDurationField<U> {
        ImpreciseDurationField { ty, average_millis, unit }
    }
}

impl<U: CalendarUnit> DurationField for ImpreciseDurationField<U> {
    fn field_type(&self) -> DurationFieldType {
        self.ty
    }

    fn is_precise(&self) -> bool {
        false
    }

    fn unit_millis(&self) -> i64 {
        self.average_millis
    }

    fn value_as_i64(&self, duration: i64, instant: i64) -> Result<i64, Error> {
        self.unit.difference(arith::add(instant, duration)?, instant)
    }

    fn millis(&self, value: i64, instant: i64) -> Result<i64, Error> {
        arith::sub(self.unit.add(instant, value)?, instant)
    }

    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        self.unit.add(instant, amount)
    }

    fn difference_as_i64(
        &self,
        minuend: i64,
        subtrahend: i64,
    ) -> Result<i64, Error> {
        self.unit.difference(minuend, subtrahend)
    }
}

/// The sentinel duration field for units a chronology does not support.
///
/// It reports itself as unsupported, and every operation on it fails.
/// There is one shared instance per duration type.
#[derive(Debug)]
pub struct UnsupportedDurationField {
    ty: DurationFieldType,
}

impl UnsupportedDurationField {
    /// Returns the shared unsupported field for the given type.
    pub fn instance(ty: DurationFieldType) -> DurationFieldRef {
        static CACHE: OnceLock<Vec<DurationFieldRef>> = OnceLock::new();
        let cache = CACHE.get_or_init(|| {
            DurationFieldType::ALL
                .into_iter()
                .map(|ty| DurationFieldRef::new(UnsupportedDurationField { ty }))
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

impl DurationField for UnsupportedDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.ty
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn is_precise(&self) -> bool {
        true
    }

    fn unit_millis(&self) -> i64 {
        0
    }

    fn value_as_i64(&self, _: i64, _: i64) -> Result<i64, Error> {
        Err(self.unsupported())
    }

    fn millis(&self, _: i64, _: i64) -> Result<i64, Error> {
        Err(self.unsupported())
    }

    fn add(&self, _: i64, _: i64) -> Result<i64, Error> {
        Err(self.unsupported())
    }

    fn difference_as_i64(&self, _: i64, _: i64) -> Result<i64, Error> {
        Err(self.unsupported())
    }
}
