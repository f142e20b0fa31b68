use std::collections::HashMap;

use crate::{
    chrono::Chronology,
    field::{
        DateTimeFieldRef, DateTimeFieldType, DurationFieldRef,
        DurationFieldType, UnsupportedDateTimeField, UnsupportedDurationField,
    },
};

/// The bag of field slots a calendar fills in when a chronology is
/// assembled.
///
/// There is one slot per [`DurationFieldType`] and one per
/// [`DateTimeFieldType`]. A [`Calendar`](crate::chrono::Calendar) populates
/// whichever slots it supports in its
/// [`assemble`](crate::chrono::Calendar::assemble) hook. Slots left empty
/// are filled with the unsupported sentinel fields once assembly is done.
///
/// Fields are slotted by their own type, so a field always lands in the
/// slot named by its [`field_type`](crate::field::DateTimeField::field_type).
///
/// # Example
///
/// ```
/// use chronology::{
///     chrono::{Calendar, Fields, IsoCalendar},
///     field::{DateTimeFieldRef, DateTimeFieldType, SingleEraDateTimeField},
///     Chronology,
/// };
///
/// #[derive(Debug)]
/// struct CommonEra;
///
/// impl Calendar for CommonEra {
///     fn id(&self) -> &str {
///         "CommonEra"
///     }
///
///     fn assemble(&self, fields: &mut Fields) {
///         IsoCalendar::new().assemble(fields);
///         fields.set_date_time(DateTimeFieldRef::new(
///             SingleEraDateTimeField::new("CE"),
///         ));
///     }
/// }
///
/// let chrono = Chronology::from_calendar(CommonEra);
/// assert_eq!(chrono.era().as_text(0)?, "CE");
/// assert_eq!(chrono.to_string(), "CommonEraChronology[UTC]");
///
/// # Ok::<(), chronology::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Fields {
    durations: [Option<DurationFieldRef>; DurationFieldType::COUNT],
    date_times: [Option<DateTimeFieldRef>; DateTimeFieldType::COUNT],
}

impl Fields {
    /// Creates a bag with every slot empty.
    pub fn new() -> Fields {
        Fields::default()
    }

    /// Puts a duration field into the slot for its type.
    pub fn set_duration(&mut self, field: DurationFieldRef) {
        let slot = field.field_type().index();
        self.durations[slot] = Some(field);
    }

    /// Puts a date-time field into the slot for its type.
    pub fn set_date_time(&mut self, field: DateTimeFieldRef) {
        let slot = field.field_type().index();
        self.date_times[slot] = Some(field);
    }

    /// Returns the duration field in the given slot, if filled.
    pub fn duration(&self, ty: DurationFieldType) -> Option<&DurationFieldRef> {
        self.durations[ty.index()].as_ref()
    }

    /// Returns the date-time field in the given slot, if filled.
    pub fn date_time(&self, ty: DateTimeFieldType) -> Option<&DateTimeFieldRef> {
        self.date_times[ty.index()].as_ref()
    }

    /// Returns a bag holding every supported field of `chrono`.
    pub(crate) fn copy_from(chrono: &Chronology) -> Fields {
        let mut fields = Fields::new();
        for ty in DurationFieldType::ALL {
            let field = chrono.duration_field(ty);
            if field.is_supported() {
                fields.durations[ty.index()] = Some(field.clone());
            }
        }
        for ty in DateTimeFieldType::ALL {
            let field = chrono.date_time_field(ty);
            if field.is_supported() {
                fields.date_times[ty.index()] = Some(field.clone());
            }
        }
        fields
    }

    /// Replaces every supported field with its decorated counterpart.
    ///
    /// Duration slots are decorated first, then date-time slots. A field
    /// reachable from several slots, or from a date-time field's duration,
    /// range or leap references, is decorated exactly once.
    pub(crate) fn decorate(&mut self, decorator: &dyn FieldDecorator) {
        let mut cache = DecorationCache::new(decorator);
        for slot in self.durations.iter_mut() {
            if let Some(field) = slot.as_mut() {
                *field = cache.duration(field);
            }
        }
        for slot in self.date_times.iter_mut() {
            if let Some(field) = slot.as_mut() {
                *field = cache.date_time(field);
            }
        }
    }

    /// Fills empty slots with unsupported sentinels and returns the slots.
    pub(crate) fn freeze(
        self,
    ) -> (
        [DurationFieldRef; DurationFieldType::COUNT],
        [DateTimeFieldRef; DateTimeFieldType::COUNT],
    ) {
        let Fields { durations, date_times } = self;
        let mut durations = durations.into_iter();
        let durations = core::array::from_fn(|i| {
            durations.next().flatten().unwrap_or_else(|| {
                UnsupportedDurationField::instance(DurationFieldType::ALL[i])
            })
        });
        let mut date_times = date_times.into_iter();
        let date_times = core::array::from_fn(|i| {
            date_times.next().flatten().unwrap_or_else(|| {
                UnsupportedDateTimeField::instance(DateTimeFieldType::ALL[i])
            })
        });
        (durations, date_times)
    }
}

/// Wraps individual fields when a decorating chronology is assembled.
///
/// Only supported fields are ever passed in.
pub(crate) trait FieldDecorator {
    fn duration(&self, field: DurationFieldRef) -> DurationFieldRef;

    /// Wraps a date-time field. Its duration, range and leap fields have
    /// already been decorated.
    fn date_time(
        &self,
        field: DateTimeFieldRef,
        duration: DurationFieldRef,
        range: Option<DurationFieldRef>,
        leap: Option<DurationFieldRef>,
    ) -> DateTimeFieldRef;
}

/// Maps original fields to their decorated counterparts for the duration
/// of one assembly.
///
/// Keys are field handles, which hash and compare by identity.
struct DecorationCache<'a> {
    decorator: &'a dyn FieldDecorator,
    durations: HashMap<DurationFieldRef, DurationFieldRef>,
    date_times: HashMap<DateTimeFieldRef, DateTimeFieldRef>,
}

impl<'a> DecorationCache<'a> {
    fn new(decorator: &'a dyn FieldDecorator) -> DecorationCache<'a> {
        DecorationCache {
            decorator,
            durations: HashMap::new(),
            date_times: HashMap::new(),
        }
    }

    fn duration(&mut self, field: &DurationFieldRef) -> DurationFieldRef {
        if !field.is_supported() {
            return field.clone();
        }
        if let Some(decorated) = self.durations.get(field) {
            return decorated.clone();
        }
        let decorated = self.decorator.duration(field.clone());
        self.durations.insert(field.clone(), decorated.clone());
        decorated
    }

    fn date_time(&mut self, field: &DateTimeFieldRef) -> DateTimeFieldRef {
        if !field.is_supported() {
            return field.clone();
        }
        if let Some(decorated) = self.date_times.get(field) {
            return decorated.clone();
        }
        let duration = self.duration(&field.duration_field());
        let range = field.range_duration_field().map(|f| self.duration(&f));
        let leap = field.leap_duration_field().map(|f| self.duration(&f));
        let decorated =
            self.decorator.date_time(field.clone(), duration, range, leap);
        self.date_times.insert(field.clone(), decorated.clone());
        decorated
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::field::{PreciseDateTimeField, PreciseDurationField};

    use super::*;

    /// Counts how often each kind of field is wrapped, and wraps nothing.
    #[derive(Default)]
    struct Counting {
        durations: AtomicUsize,
        date_times: AtomicUsize,
    }

    impl FieldDecorator for Counting {
        fn duration(&self, field: DurationFieldRef) -> DurationFieldRef {
            self.durations.fetch_add(1, Ordering::Relaxed);
            DurationFieldRef::new(PreciseDurationField::new(
                field.field_type(),
                field.unit_millis(),
            ))
        }

        fn date_time(
            &self,
            field: DateTimeFieldRef,
            duration: DurationFieldRef,
            range: Option<DurationFieldRef>,
            _leap: Option<DurationFieldRef>,
        ) -> DateTimeFieldRef {
            self.date_times.fetch_add(1, Ordering::Relaxed);
            let range = range.unwrap_or_else(|| field.duration_field());
            DateTimeFieldRef::new(PreciseDateTimeField::new(
                field.field_type(),
                duration,
                range,
            ))
        }
    }

    fn precise(ty: DurationFieldType, millis: i64) -> DurationFieldRef {
        DurationFieldRef::new(PreciseDurationField::new(ty, millis))
    }

    #[test]
    fn shared_fields_decorate_once() {
        let hours = precise(DurationFieldType::Hours, 3_600_000);
        let days = precise(DurationFieldType::Days, 86_400_000);
        let mut fields = Fields::new();
        fields.set_duration(hours.clone());
        fields.set_duration(days.clone());
        fields.set_date_time(DateTimeFieldRef::new(PreciseDateTimeField::new(
            DateTimeFieldType::HourOfDay,
            hours.clone(),
            days.clone(),
        )));

        let counting = Counting::default();
        fields.decorate(&counting);
        assert_eq!(counting.durations.load(Ordering::Relaxed), 2);
        assert_eq!(counting.date_times.load(Ordering::Relaxed), 1);

        let decorated_hours =
            fields.duration(DurationFieldType::Hours).unwrap().clone();
        assert_ne!(decorated_hours, hours);
        let hour_of_day =
            fields.date_time(DateTimeFieldType::HourOfDay).unwrap();
        assert_eq!(hour_of_day.duration_field(), decorated_hours);
        assert_eq!(
            hour_of_day.range_duration_field().unwrap(),
            *fields.duration(DurationFieldType::Days).unwrap(),
        );
    }

    #[test]
    fn freeze_fills_unsupported() {
        let mut fields = Fields::new();
        fields.set_duration(precise(DurationFieldType::Hours, 3_600_000));
        let (durations, date_times) = fields.freeze();
        assert!(durations[DurationFieldType::Hours.index()].is_supported());
        assert_eq!(
            durations[DurationFieldType::Eras.index()],
            UnsupportedDurationField::instance(DurationFieldType::Eras),
        );
        assert!(date_times.iter().all(|f| !f.is_supported()));
        assert_eq!(
            date_times[DateTimeFieldType::Era.index()].field_type(),
            DateTimeFieldType::Era,
        );
    }
}
