/*!
Time zones and the local/UTC conversions decorators are built on.

A [`DateTimeZone`] answers a handful of questions about a region's rules:
what offset applies at an instant, what the standard offset is, and when the
offset next (or last) changes. Everything else, including converting a local
wall-clock reading back to an instant in the presence of gaps and overlaps,
is derived from those answers.

Zone rules are pluggable through the [`ZoneRules`] trait. Fixed offsets are
built in, and [`TransitionRules`] provides a precalculated transition table.
Lookups by identifier go through a [`ZoneContext`], which bundles a
[`ZoneProvider`] with a default zone.
*/

use std::sync::Arc;

use crate::{
    error::{arith::Error as ArithError, tz::Error as E},
    Error,
};

pub use self::{
    offset::{parse_offset, print_offset},
    provider::{MemoryProvider, UtcProvider, ZoneContext, ZoneProvider},
    transitions::{Transition, TransitionRules},
};

mod offset;
mod provider;
mod transitions;

/// The rules of a time zone.
///
/// This is the capability a zone provider supplies. Instants are
/// milliseconds since 1970-01-01T00:00:00Z and offsets are milliseconds to
/// add to UTC to get local time.
pub trait ZoneRules: core::fmt::Debug + Send + Sync + 'static {
    /// Returns the offset in effect at `instant`.
    fn offset(&self, instant: i64) -> i32;

    /// Returns the standard (non-daylight-saving) offset at `instant`.
    fn standard_offset(&self, instant: i64) -> i32;

    /// Returns the first transition strictly after `instant`, or `instant`
    /// itself when there are no later transitions.
    fn next_transition(&self, instant: i64) -> i64;

    /// Returns the last millisecond before the most recent transition at or
    /// before `instant`, or `instant` itself when there is none.
    fn previous_transition(&self, instant: i64) -> i64;

    /// Returns true when the offset never changes.
    fn is_fixed(&self) -> bool;
}

/// A time zone: a set of rules mapping instants to offsets from UTC.
///
/// # A `DateTimeZone` is cheap to clone
///
/// A `DateTimeZone` is a pointer-sized handle. UTC needs no allocation at
/// all, and every other zone is shared through atomic reference counting.
///
/// # Time zone equality
///
/// Two zones are equal when they have the same identifier and the same kind
/// of rules. For fixed offset zones, the offsets must also match. Zones
/// coming from rules are compared by identifier alone, so a provider must
/// never hand out two different rule sets under one identifier.
///
/// # Example
///
/// ```
/// use chronology::tz::DateTimeZone;
///
/// let zone = DateTimeZone::for_offset_hours_minutes(-2, 30)?;
/// assert_eq!(zone.id(), "-02:30");
/// assert_eq!(zone.offset(0), -(2 * 3_600_000 + 30 * 60_000));
/// assert!(zone.is_fixed());
///
/// # Ok::<(), chronology::Error>(())
/// ```
#[derive(Clone)]
pub struct DateTimeZone {
    /// `None` is UTC.
    inner: Option<Arc<ZoneInner>>,
}

#[derive(Debug)]
struct ZoneInner {
    id: Box<str>,
    kind: ZoneKind,
}

#[derive(Debug)]
enum ZoneKind {
    Fixed { offset: i32, standard: i32 },
    Rules(Arc<dyn ZoneRules>),
}

impl DateTimeZone {
    /// The canonical UTC zone.
    pub const UTC: DateTimeZone = DateTimeZone { inner: None };

    /// Returns the zone with a fixed offset of the given number of
    /// milliseconds.
    ///
    /// A zero offset returns [`DateTimeZone::UTC`]. Other offsets are
    /// cached, so repeated requests for the same offset share one zone.
    /// The offset must be strictly within 24 hours.
    pub fn fixed(offset_millis: i32) -> Result<DateTimeZone, Error> {
        offset::fixed_offset_zone(offset_millis)
    }

    /// Returns the fixed offset zone for a whole number of hours.
    pub fn for_offset_hours(hours: i32) -> Result<DateTimeZone, Error> {
        DateTimeZone::for_offset_hours_minutes(hours, 0)
    }

    /// Returns the fixed offset zone for the given hours and minutes.
    ///
    /// The minutes must be in `0..=59`. When the hours are negative, the
    /// minutes make the offset more negative, so `(-2, 30)` is `-02:30`.
    pub fn for_offset_hours_minutes(
        hours: i32,
        minutes: i32,
    ) -> Result<DateTimeZone, Error> {
        if hours == 0 && minutes == 0 {
            return Ok(DateTimeZone::UTC);
        }
        if !(0..=59).contains(&minutes) {
            return Err(E::OffsetMinutes { minutes }.into());
        }
        let hours_in_minutes = i64::from(hours) * 60;
        let total_minutes = if hours_in_minutes < 0 {
            hours_in_minutes - i64::from(minutes)
        } else {
            hours_in_minutes + i64::from(minutes)
        };
        let millis = total_minutes
            .checked_mul(60_000)
            .ok_or(E::OffsetTooLarge { millis: i64::MAX })?;
        let millis = offset::checked_offset(millis)?;
        DateTimeZone::fixed(millis)
    }

    /// Returns a fixed zone under a caller-chosen identifier.
    ///
    /// Unlike [`DateTimeZone::fixed`], this is not cached. It is meant for
    /// providers that expose named fixed zones like `"EST"`.
    pub fn fixed_named(
        id: &str,
        offset_millis: i32,
        standard_offset_millis: i32,
    ) -> Result<DateTimeZone, Error> {
        let offset = offset::checked_offset(i64::from(offset_millis))?;
        let standard =
            offset::checked_offset(i64::from(standard_offset_millis))?;
        Ok(DateTimeZone::from_kind(
            id,
            ZoneKind::Fixed { offset, standard },
        ))
    }

    /// Returns a zone governed by the given rules.
    pub fn from_rules(id: &str, rules: impl ZoneRules) -> DateTimeZone {
        DateTimeZone::from_kind(id, ZoneKind::Rules(Arc::new(rules)))
    }

    fn from_kind(id: &str, kind: ZoneKind) -> DateTimeZone {
        DateTimeZone { inner: Some(Arc::new(ZoneInner { id: id.into(), kind })) }
    }

    /// Returns the identifier of this zone, e.g. `"UTC"` or `"+02:00"`.
    pub fn id(&self) -> &str {
        match self.inner {
            None => "UTC",
            Some(ref inner) => &inner.id,
        }
    }

    /// Returns true if and only if this is the canonical UTC zone.
    pub fn is_utc(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns the offset in milliseconds in effect at `instant`.
    #[cfg_attr(feature = "perf-inline", inline(always))]
    pub fn offset(&self, instant: i64) -> i32 {
        match self.inner.as_deref() {
            None => 0,
            Some(ZoneInner { kind: ZoneKind::Fixed { offset, .. }, .. }) => {
                *offset
            }
            Some(ZoneInner { kind: ZoneKind::Rules(rules), .. }) => {
                rules.offset(instant)
            }
        }
    }

    /// Returns the standard offset in milliseconds at `instant`.
    pub fn standard_offset(&self, instant: i64) -> i32 {
        match self.inner.as_deref() {
            None => 0,
            Some(ZoneInner {
                kind: ZoneKind::Fixed { standard, .. }, ..
            }) => *standard,
            Some(ZoneInner { kind: ZoneKind::Rules(rules), .. }) => {
                rules.standard_offset(instant)
            }
        }
    }

    /// Returns true when the offset at `instant` is the standard offset.
    pub fn is_standard_offset(&self, instant: i64) -> bool {
        self.offset(instant) == self.standard_offset(instant)
    }

    /// Returns true when this zone's offset never changes.
    pub fn is_fixed(&self) -> bool {
        match self.inner.as_deref() {
            None => true,
            Some(ZoneInner { kind: ZoneKind::Fixed { .. }, .. }) => true,
            Some(ZoneInner { kind: ZoneKind::Rules(rules), .. }) => {
                rules.is_fixed()
            }
        }
    }

    /// Returns the first offset transition strictly after `instant`, or
    /// `instant` when there is none.
    pub fn next_transition(&self, instant: i64) -> i64 {
        match self.inner.as_deref() {
            Some(ZoneInner { kind: ZoneKind::Rules(rules), .. }) => {
                rules.next_transition(instant)
            }
            _ => instant,
        }
    }

    /// Returns the last millisecond before the most recent offset
    /// transition at or before `instant`, or `instant` when there is none.
    pub fn previous_transition(&self, instant: i64) -> i64 {
        match self.inner.as_deref() {
            Some(ZoneInner { kind: ZoneKind::Rules(rules), .. }) => {
                rules.previous_transition(instant)
            }
            _ => instant,
        }
    }

    /// Converts an instant to the local wall-clock millis of this zone.
    #[cfg_attr(feature = "perf-inline", inline(always))]
    pub fn utc_to_local(&self, instant: i64) -> Result<i64, Error> {
        let offset = self.offset(instant);
        instant
            .checked_add(i64::from(offset))
            .ok_or_else(|| ArithError::AddOffset.into())
    }

    /// Returns the offset to subtract from a local wall-clock reading to get
    /// the instant it denotes.
    ///
    /// Near a transition the local reading is ambiguous or missing. In a
    /// gap this returns the offset from before the transition, so that the
    /// reading maps to an instant after the gap. In an overlap it returns
    /// the offset found by probing with the offset at the local reading
    /// itself.
    pub fn offset_from_local(&self, local: i64) -> i32 {
        if self.is_utc() {
            return 0;
        }
        let offset_local = self.offset(local);
        let adjusted = local.saturating_sub(i64::from(offset_local));
        let offset_adjusted = self.offset(adjusted);
        if offset_local < offset_adjusted {
            let next_local = self.next_transition(adjusted);
            let next_adjusted = self.next_transition(
                local.saturating_sub(i64::from(offset_adjusted)),
            );
            if next_local != next_adjusted {
                return offset_local;
            }
        }
        offset_adjusted
    }

    /// Converts a local wall-clock reading of this zone to an instant.
    ///
    /// When the reading falls in a gap, `strict` conversions fail with an
    /// illegal instant error. Non-strict conversions use the offset from
    /// before the gap, landing after it. The gap check is always performed
    /// for zones whose offset at the reading is negative, and otherwise only
    /// for strict conversions.
    pub fn local_to_utc(&self, local: i64, strict: bool) -> Result<i64, Error> {
        let offset_local = self.offset(local);
        let mut offset =
            self.offset(local.saturating_sub(i64::from(offset_local)));
        if offset_local != offset && (strict || offset_local < 0) {
            let next_local = self
                .next_transition(local.saturating_sub(i64::from(offset_local)));
            let next_adjusted =
                self.next_transition(local.saturating_sub(i64::from(offset)));
            if next_local != next_adjusted {
                if strict {
                    return Err(E::IllegalInstant {
                        local,
                        zone: self.clone(),
                    }
                    .into());
                }
                offset = offset_local;
            }
        }
        local
            .checked_sub(i64::from(offset))
            .ok_or_else(|| ArithError::SubtractOffset.into())
    }

    /// Like `local_to_utc`, but prefers the offset in effect at `original`
    /// when that offset maps back to the same local reading.
    ///
    /// An ambiguous reading in an overlap therefore resolves to the same
    /// side of the overlap as `original`.
    pub fn local_to_utc_near(
        &self,
        local: i64,
        strict: bool,
        original: i64,
    ) -> Result<i64, Error> {
        let offset = self.offset(original);
        if let Some(utc) = local.checked_sub(i64::from(offset)) {
            if self.offset(utc) == offset {
                return Ok(utc);
            }
        }
        self.local_to_utc(local, strict)
    }

    /// Returns the instant in `new_zone` with the same local wall-clock
    /// reading that `instant` has in this zone.
    pub fn millis_keep_local(
        &self,
        new_zone: &DateTimeZone,
        instant: i64,
    ) -> Result<i64, Error> {
        if self == new_zone {
            return Ok(instant);
        }
        let local = self.utc_to_local(instant)?;
        local
            .checked_sub(i64::from(new_zone.offset_from_local(local)))
            .ok_or_else(|| ArithError::SubtractOffset.into())
    }
}

impl Default for DateTimeZone {
    fn default() -> DateTimeZone {
        DateTimeZone::UTC
    }
}

impl core::fmt::Debug for DateTimeZone {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.inner.as_deref() {
            None => f.debug_tuple("UTC").finish(),
            Some(ZoneInner { id, kind: ZoneKind::Fixed { offset, .. } }) => f
                .debug_tuple("Fixed")
                .field(id)
                .field(offset)
                .finish(),
            Some(ZoneInner { id, kind: ZoneKind::Rules(rules) }) => {
                f.debug_tuple("Rules").field(id).field(rules).finish()
            }
        }
    }
}

impl core::fmt::Display for DateTimeZone {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.id())
    }
}

impl PartialEq for DateTimeZone {
    fn eq(&self, other: &DateTimeZone) -> bool {
        match (self.inner.as_ref(), other.inner.as_ref()) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                if Arc::ptr_eq(a, b) {
                    return true;
                }
                if a.id != b.id {
                    return false;
                }
                match (&a.kind, &b.kind) {
                    (
                        ZoneKind::Fixed { offset: o1, standard: s1 },
                        ZoneKind::Fixed { offset: o2, standard: s2 },
                    ) => o1 == o2 && s1 == s2,
                    (ZoneKind::Rules(_), ZoneKind::Rules(_)) => true,
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

impl Eq for DateTimeZone {}

impl core::hash::Hash for DateTimeZone {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}
