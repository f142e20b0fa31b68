/*!
Chronologies: calendar systems assembled from fields.

A [`Chronology`] is a frozen set of duration and date-time fields, one per
slot, plus the root conversions from calendar values to instants. There are
three kinds:

* A root chronology, assembled from a [`Calendar`] such as
[`IsoCalendar`]. It always works in UTC.
* A zoned chronology, built with [`Chronology::zoned`]. Its fields read and
write local wall-clock values while every instant going in or out stays UTC.
* A limited chronology, built with [`Chronology::limit`]. Its fields reject
instants outside of an inclusive lower and exclusive upper limit.

The two decorating kinds wrap every field of the chronology they are built
from, so they compose: a limited zoned chronology checks its limits against
UTC instants and reads local values.

# Example

```
use chronology::{tz::DateTimeZone, Chronology};

let plus2 = DateTimeZone::for_offset_hours(2)?;
let chrono = Chronology::iso_in(plus2);
// Midnight UTC is 02:00 at +02:00.
assert_eq!(chrono.hour_of_day().get(0)?, 2);
assert_eq!(chrono.to_string(), "ZonedChronology[ISOChronology[UTC], +02:00]");

// 2024-07-01T09:30 local is 07:30 UTC.
let instant = chrono.date_time_millis_hms(2024, 7, 1, 9, 30, 0, 0)?;
assert_eq!(instant, 1_719_819_000_000);

# Ok::<(), chronology::Error>(())
```
*/

use std::sync::{Arc, OnceLock};

use crate::{
    error::{limit::Error as LimitError, ErrorContext},
    field::{
        DateTimeFieldRef, DateTimeFieldType, DurationFieldRef,
        DurationFieldType,
    },
    tz::{DateTimeZone, ZoneContext},
    util::common::DisplayInstant,
    Error,
};

pub use self::{calendar::Calendar, fields::Fields, iso::IsoCalendar};

use self::{limit::Limits, zoned::ZonedDecorator};

mod calendar;
mod fields;
mod iso;
mod limit;
mod zoned;

/// A calendar system: a complete set of fields plus root conversions.
///
/// # A `Chronology` is cheap to clone
///
/// A chronology is immutable once assembled and shared through an `Arc`,
/// so cloning it and sending it across threads is cheap.
///
/// # Equality
///
/// Root chronologies are equal when their calendar identifiers are equal.
/// Zoned chronologies are equal when their base chronologies and zones are
/// equal, and limited chronologies when their base chronologies and both
/// limits are equal. Hashing is consistent with this.
///
/// # Example
///
/// ```
/// use chronology::Chronology;
///
/// let iso = Chronology::iso();
/// let a = Chronology::limit(&iso, Some(1_000), Some(5_000))?;
/// let b = Chronology::limit(&iso, Some(1_000), Some(5_000))?;
/// assert_eq!(a, b);
///
/// assert!(a.second_of_minute().get(4_999).is_ok());
/// assert!(a.second_of_minute().get(5_000).is_err());
///
/// # Ok::<(), chronology::Error>(())
/// ```
#[derive(Clone)]
pub struct Chronology {
    inner: Arc<ChronologyInner>,
}

struct ChronologyInner {
    kind: ChronologyKind,
    durations: [DurationFieldRef; DurationFieldType::COUNT],
    date_times: [DateTimeFieldRef; DateTimeFieldType::COUNT],
}

enum ChronologyKind {
    Base(Arc<dyn Calendar>),
    Zoned { base: Chronology, zone: DateTimeZone },
    Limit { limits: Arc<Limits>, utc: OnceLock<Chronology> },
}

impl Chronology {
    /// Returns the shared ISO chronology in UTC.
    pub fn iso() -> Chronology {
        static ISO: OnceLock<Chronology> = OnceLock::new();
        ISO.get_or_init(|| Chronology::from_calendar(IsoCalendar::new()))
            .clone()
    }

    /// Returns the ISO chronology in the given zone.
    ///
    /// For [`DateTimeZone::UTC`], this is [`Chronology::iso`].
    pub fn iso_in(zone: DateTimeZone) -> Chronology {
        let iso = Chronology::iso();
        if zone.is_utc() {
            return iso;
        }
        Chronology::zoned_utc(iso, zone)
    }

    /// Returns the ISO chronology in the default zone of `ctx`.
    ///
    /// # Example
    ///
    /// ```
    /// use chronology::{tz::{DateTimeZone, UtcProvider, ZoneContext}, Chronology};
    ///
    /// let plus3 = DateTimeZone::for_offset_hours(3)?;
    /// let ctx = ZoneContext::new(UtcProvider::new())?.with_default_zone(plus3);
    /// assert_eq!(Chronology::iso_default(&ctx).hour_of_day().get(0)?, 3);
    /// assert_eq!(Chronology::iso_default(ZoneContext::global()), Chronology::iso());
    ///
    /// # Ok::<(), chronology::Error>(())
    /// ```
    pub fn iso_default(ctx: &ZoneContext) -> Chronology {
        Chronology::iso_in(ctx.default_zone().clone())
    }

    /// Returns the ISO chronology in the zone `ctx` resolves `id` to.
    pub fn iso_for_id(ctx: &ZoneContext, id: &str) -> Result<Chronology, Error> {
        Ok(Chronology::iso_in(ctx.for_id(id)?))
    }

    /// Assembles a root chronology from a calendar.
    pub fn from_calendar(calendar: impl Calendar) -> Chronology {
        let mut fields = Fields::new();
        calendar.assemble(&mut fields);
        trace!("assembled chronology for calendar {}", calendar.id());
        Chronology::from_parts(ChronologyKind::Base(Arc::new(calendar)), fields)
    }

    /// Returns a chronology over `base` that reads and writes local
    /// wall-clock values in `zone`.
    ///
    /// `base` is first re-projected to UTC. Unlike
    /// [`with_zone`](Chronology::with_zone), this always builds a zoned
    /// chronology, even for UTC.
    pub fn zoned(
        base: &Chronology,
        zone: DateTimeZone,
    ) -> Result<Chronology, Error> {
        Ok(Chronology::zoned_utc(base.with_utc()?, zone))
    }

    fn zoned_utc(base: Chronology, zone: DateTimeZone) -> Chronology {
        let mut fields = Fields::copy_from(&base);
        fields.decorate(&ZonedDecorator::new(zone.clone()));
        trace!("assembled zoned chronology over {base} in {zone}");
        Chronology::from_parts(ChronologyKind::Zoned { base, zone }, fields)
    }

    /// Returns a chronology over `base` that only accepts instants in
    /// `lower..upper`.
    ///
    /// A missing limit leaves that side unbounded. The limits are instants
    /// whose wall-clock reading is taken in the zone of `base`.
    ///
    /// # Errors
    ///
    /// When both limits are given and `lower >= upper`.
    pub fn limit(
        base: &Chronology,
        lower: Option<i64>,
        upper: Option<i64>,
    ) -> Result<Chronology, Error> {
        if let (Some(lower), Some(upper)) = (lower, upper) {
            if lower >= upper {
                return Err(LimitError::InvalidRange { lower, upper }.into());
            }
        }
        let limits = Arc::new(Limits::new(base.clone(), lower, upper));
        let mut fields = Fields::copy_from(base);
        fields.decorate(&limit::LimitDecorator::new(Arc::clone(&limits)));
        trace!(
            "assembled limit chronology over {base} \
             (lower: {lower:?}, upper: {upper:?})",
        );
        let kind = ChronologyKind::Limit { limits, utc: OnceLock::new() };
        Ok(Chronology::from_parts(kind, fields))
    }

    fn from_parts(kind: ChronologyKind, fields: Fields) -> Chronology {
        let (durations, date_times) = fields.freeze();
        Chronology {
            inner: Arc::new(ChronologyInner { kind, durations, date_times }),
        }
    }

    /// Returns the zone this chronology reads local values in.
    ///
    /// Root chronologies are in UTC, and limited chronologies are in the
    /// zone of the chronology they limit.
    pub fn zone(&self) -> &DateTimeZone {
        static UTC: DateTimeZone = DateTimeZone::UTC;

        match self.inner.kind {
            ChronologyKind::Base(_) => &UTC,
            ChronologyKind::Zoned { ref zone, .. } => zone,
            ChronologyKind::Limit { ref limits, .. } => limits.base.zone(),
        }
    }

    /// Returns the chronology this one decorates, or `None` for a root
    /// chronology.
    pub fn base(&self) -> Option<&Chronology> {
        match self.inner.kind {
            ChronologyKind::Base(_) => None,
            ChronologyKind::Zoned { ref base, .. } => Some(base),
            ChronologyKind::Limit { ref limits, .. } => Some(&limits.base),
        }
    }

    /// Returns the calendar of a root chronology.
    pub fn calendar(&self) -> Option<&dyn Calendar> {
        match self.inner.kind {
            ChronologyKind::Base(ref calendar) => Some(&**calendar),
            _ => None,
        }
    }

    /// Returns the inclusive lower limit of a limited chronology.
    pub fn lower_limit(&self) -> Option<i64> {
        match self.inner.kind {
            ChronologyKind::Limit { ref limits, .. } => limits.lower,
            _ => None,
        }
    }

    /// Returns the exclusive upper limit of a limited chronology.
    pub fn upper_limit(&self) -> Option<i64> {
        match self.inner.kind {
            ChronologyKind::Limit { ref limits, .. } => limits.upper,
            _ => None,
        }
    }

    /// Returns an equivalent chronology in UTC.
    pub fn with_utc(&self) -> Result<Chronology, Error> {
        self.with_zone(DateTimeZone::UTC)
    }

    /// Returns an equivalent chronology that reads local values in `zone`.
    ///
    /// A limited chronology re-expresses its limits so that they keep the
    /// same wall-clock reading in the new zone.
    ///
    /// # Errors
    ///
    /// When re-expressing the limits of a limited chronology overflows, or
    /// moves them so that the lower limit no longer comes first.
    pub fn with_zone(&self, zone: DateTimeZone) -> Result<Chronology, Error> {
        if *self.zone() == zone {
            return Ok(self.clone());
        }
        match self.inner.kind {
            ChronologyKind::Base(_) => Ok(Chronology::zoned_utc(self.clone(), zone)),
            ChronologyKind::Zoned { ref base, .. } => {
                if zone.is_utc() {
                    Ok(base.clone())
                } else {
                    Ok(Chronology::zoned_utc(base.clone(), zone))
                }
            }
            ChronologyKind::Limit { ref limits, ref utc } => {
                if !zone.is_utc() {
                    return self.rezone_limits(limits, zone);
                }
                if let Some(chrono) = utc.get() {
                    return Ok(chrono.clone());
                }
                let chrono = self.rezone_limits(limits, zone)?;
                Ok(utc.get_or_init(|| chrono).clone())
            }
        }
    }

    fn rezone_limits(
        &self,
        limits: &Limits,
        zone: DateTimeZone,
    ) -> Result<Chronology, Error> {
        let old = self.zone();
        let keep_local = |bound: Option<i64>| {
            bound.map(|instant| old.millis_keep_local(&zone, instant)).transpose()
        };
        let rezoned = keep_local(limits.lower).and_then(|lower| {
            let upper = keep_local(limits.upper)?;
            let base = limits.base.with_zone(zone.clone())?;
            Chronology::limit(&base, lower, upper)
        });
        rezoned.with_context(|| LimitError::Rezone { zone: zone.clone() })
    }

    /// Returns the duration field in the given slot.
    pub fn duration_field(&self, ty: DurationFieldType) -> &DurationFieldRef {
        &self.inner.durations[ty.index()]
    }

    /// Returns the date-time field in the given slot.
    pub fn date_time_field(&self, ty: DateTimeFieldType) -> &DateTimeFieldRef {
        &self.inner.date_times[ty.index()]
    }

    /// Returns the instant for a date and a millisecond of the day.
    ///
    /// # Errors
    ///
    /// When a value is out of range, the local date-time does not exist in
    /// the zone of this chronology, or the instant is outside of its limits.
    pub fn date_time_millis(
        &self,
        year: i32,
        month: i32,
        day: i32,
        millis_of_day: i32,
    ) -> Result<i64, Error> {
        match self.inner.kind {
            ChronologyKind::Base(ref calendar) => {
                calendar.date_time_millis(self, year, month, day, millis_of_day)
            }
            ChronologyKind::Zoned { ref base, ref zone } => {
                let local =
                    base.date_time_millis(year, month, day, millis_of_day)?;
                zoned::local_to_utc(zone, local)
            }
            ChronologyKind::Limit { ref limits, .. } => {
                let instant = limits.base.date_time_millis(
                    year,
                    month,
                    day,
                    millis_of_day,
                )?;
                limits.check(instant, Some("resulting"))?;
                Ok(instant)
            }
        }
    }

    /// Returns the instant for a date and a time of day.
    ///
    /// # Errors
    ///
    /// Same as [`date_time_millis`](Chronology::date_time_millis).
    pub fn date_time_millis_hms(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64, Error> {
        match self.inner.kind {
            ChronologyKind::Base(ref calendar) => calendar.date_time_millis_hms(
                self, year, month, day, hour, minute, second, millis,
            ),
            ChronologyKind::Zoned { ref base, ref zone } => {
                let local = base.date_time_millis_hms(
                    year, month, day, hour, minute, second, millis,
                )?;
                zoned::local_to_utc(zone, local)
            }
            ChronologyKind::Limit { ref limits, .. } => {
                let instant = limits.base.date_time_millis_hms(
                    year, month, day, hour, minute, second, millis,
                )?;
                limits.check(instant, Some("resulting"))?;
                Ok(instant)
            }
        }
    }

    /// Returns `instant` with its local time of day replaced.
    ///
    /// # Errors
    ///
    /// Same as [`date_time_millis`](Chronology::date_time_millis). A limited
    /// chronology also rejects an `instant` outside of its limits.
    pub fn with_time_millis(
        &self,
        instant: i64,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64, Error> {
        match self.inner.kind {
            ChronologyKind::Base(ref calendar) => calendar
                .with_time_millis(self, instant, hour, minute, second, millis),
            ChronologyKind::Zoned { ref base, ref zone } => {
                let local = zone.utc_to_local(instant)?;
                let local = base
                    .with_time_millis(local, hour, minute, second, millis)?;
                zoned::local_to_utc(zone, local)
            }
            ChronologyKind::Limit { ref limits, .. } => {
                limits.check(instant, None)?;
                let instant = limits
                    .base
                    .with_time_millis(instant, hour, minute, second, millis)?;
                limits.check(instant, Some("resulting"))?;
                Ok(instant)
            }
        }
    }
}

macro_rules! slot_accessors {
    ($getter:ident, $ref:ty, $ty:ident, $($name:ident => $variant:ident,)*) => {
        impl Chronology {
            $(
                #[doc = concat!(
                    "Returns the `", stringify!($name), "` field.",
                )]
                #[inline]
                pub fn $name(&self) -> &$ref {
                    self.$getter($ty::$variant)
                }
            )*
        }
    };
}

slot_accessors!(
    duration_field, DurationFieldRef, DurationFieldType,
    eras => Eras,
    centuries => Centuries,
    years => Years,
    months => Months,
    weekyears => Weekyears,
    weeks => Weeks,
    days => Days,
    halfdays => Halfdays,
    hours => Hours,
    minutes => Minutes,
    seconds => Seconds,
    millis => Millis,
);

slot_accessors!(
    date_time_field, DateTimeFieldRef, DateTimeFieldType,
    year => Year,
    year_of_era => YearOfEra,
    year_of_century => YearOfCentury,
    century_of_era => CenturyOfEra,
    era => Era,
    day_of_week => DayOfWeek,
    day_of_month => DayOfMonth,
    day_of_year => DayOfYear,
    month_of_year => MonthOfYear,
    week_of_weekyear => WeekOfWeekyear,
    weekyear => Weekyear,
    weekyear_of_century => WeekyearOfCentury,
    millis_of_second => MillisOfSecond,
    millis_of_day => MillisOfDay,
    second_of_minute => SecondOfMinute,
    second_of_day => SecondOfDay,
    minute_of_hour => MinuteOfHour,
    minute_of_day => MinuteOfDay,
    hour_of_day => HourOfDay,
    hour_of_halfday => HourOfHalfday,
    clockhour_of_day => ClockhourOfDay,
    clockhour_of_halfday => ClockhourOfHalfday,
    halfday_of_day => HalfdayOfDay,
);

impl PartialEq for Chronology {
    fn eq(&self, other: &Chronology) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        match (&self.inner.kind, &other.inner.kind) {
            (ChronologyKind::Base(a), ChronologyKind::Base(b)) => {
                a.id() == b.id()
            }
            (
                ChronologyKind::Zoned { base: b1, zone: z1 },
                ChronologyKind::Zoned { base: b2, zone: z2 },
            ) => z1 == z2 && b1 == b2,
            (
                ChronologyKind::Limit { limits: l1, .. },
                ChronologyKind::Limit { limits: l2, .. },
            ) => {
                l1.lower == l2.lower && l1.upper == l2.upper && l1.base == l2.base
            }
            _ => false,
        }
    }
}

impl Eq for Chronology {}

impl core::hash::Hash for Chronology {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        match self.inner.kind {
            ChronologyKind::Base(ref calendar) => {
                0u8.hash(state);
                calendar.id().hash(state);
            }
            ChronologyKind::Zoned { ref base, ref zone } => {
                1u8.hash(state);
                base.hash(state);
                zone.hash(state);
            }
            ChronologyKind::Limit { ref limits, .. } => {
                2u8.hash(state);
                limits.base.hash(state);
                limits.lower.hash(state);
                limits.upper.hash(state);
            }
        }
    }
}

impl core::fmt::Display for Chronology {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.inner.kind {
            ChronologyKind::Base(ref calendar) => {
                write!(f, "{}Chronology[UTC]", calendar.id())
            }
            ChronologyKind::Zoned { ref base, ref zone } => {
                write!(f, "ZonedChronology[{base}, {}]", zone.id())
            }
            ChronologyKind::Limit { ref limits, .. } => {
                write!(f, "LimitChronology[{}, ", limits.base)?;
                write_limit(f, limits.lower)?;
                f.write_str(", ")?;
                write_limit(f, limits.upper)?;
                f.write_str("]")
            }
        }
    }
}

fn write_limit(
    f: &mut core::fmt::Formatter,
    limit: Option<i64>,
) -> core::fmt::Result {
    match limit {
        None => f.write_str("NoLimit"),
        Some(instant) => write!(f, "{}", DisplayInstant::utc(instant)),
    }
}

impl core::fmt::Debug for Chronology {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Chronology({self})")
    }
}

#[cfg(test)]
mod tests {
    use crate::tz::testdata::*;

    use super::*;

    #[test]
    fn display() {
        let iso = Chronology::iso();
        insta::assert_snapshot!(iso, @"ISOChronology[UTC]");
        let zoned = Chronology::iso_in(london());
        insta::assert_snapshot!(
            zoned,
            @"ZonedChronology[ISOChronology[UTC], Test/London]",
        );
        let limited = Chronology::limit(&zoned, Some(0), None).unwrap();
        insta::assert_snapshot!(
            limited,
            @"LimitChronology[ZonedChronology[ISOChronology[UTC], Test/London], 1970-01-01T00:00:00.000Z, NoLimit]",
        );
        insta::assert_debug_snapshot!(iso, @"Chronology(ISOChronology[UTC])");
    }

    #[test]
    fn zone_and_base() {
        let iso = Chronology::iso();
        assert!(iso.zone().is_utc());
        assert!(iso.base().is_none());
        assert_eq!(iso.calendar().map(|c| c.id()), Some("ISO"));

        let zoned = Chronology::iso_in(new_york());
        assert_eq!(*zoned.zone(), new_york());
        assert_eq!(zoned.base(), Some(&iso));
        assert!(zoned.calendar().is_none());

        let limited = Chronology::limit(&zoned, None, Some(0)).unwrap();
        assert_eq!(*limited.zone(), new_york());
        assert_eq!(limited.base(), Some(&zoned));
        assert_eq!(limited.lower_limit(), None);
        assert_eq!(limited.upper_limit(), Some(0));
    }

    #[test]
    fn with_zone_reprojection() {
        let iso = Chronology::iso();
        assert_eq!(iso.with_utc().unwrap(), iso);
        let zoned = iso.with_zone(london()).unwrap();
        assert_eq!(zoned, Chronology::iso_in(london()));
        assert_eq!(zoned.with_zone(london()).unwrap(), zoned);
        assert_eq!(zoned.with_utc().unwrap(), iso);
        let other = zoned.with_zone(new_york()).unwrap();
        assert_eq!(*other.zone(), new_york());
        assert_eq!(other.base(), Some(&iso));

        // Zoning a zoned chronology zones its UTC base instead.
        let twice = Chronology::zoned(&zoned, new_york()).unwrap();
        assert_eq!(twice, other);
        // Explicit zoning never short circuits UTC.
        let utc = Chronology::zoned(&iso, DateTimeZone::UTC).unwrap();
        assert_ne!(utc, iso);
        assert!(utc.zone().is_utc());
    }

    #[test]
    fn equality_and_hash() {
        use std::collections::HashSet;

        let iso = Chronology::iso();
        let fresh = Chronology::from_calendar(IsoCalendar::new());
        assert_eq!(iso, fresh);
        let a = Chronology::limit(&iso, Some(1_000), Some(5_000)).unwrap();
        let b = Chronology::limit(&fresh, Some(1_000), Some(5_000)).unwrap();
        let c = Chronology::limit(&iso, Some(1_000), None).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, iso);
        assert_eq!(Chronology::iso_in(london()), Chronology::iso_in(london()));
        assert_ne!(Chronology::iso_in(london()), Chronology::iso_in(new_york()));

        let set: HashSet<Chronology> = [a, b, c, iso].into();
        assert_eq!(set.len(), 3);
    }
}
