/*!
A calendar field engine with pluggable calendar systems and composable time
zone and range decorators.

Instants are plain `i64` milliseconds since `1970-01-01T00:00:00Z`. Calendar
knowledge lives in *fields*: a [`field::DurationField`] measures and applies
amounts of one unit (days, months), while a [`field::DateTimeField`] reads
and writes one component of an instant (day-of-month, hour-of-day). A
[`Chronology`] is a frozen set of these fields, one per slot, together with
the conversions from calendar values to instants.

Chronologies come in three kinds:

* Root chronologies, assembled from a [`Calendar`] like [`IsoCalendar`].
Root chronologies work in UTC.
* Zoned chronologies, which decorate every field of a root chronology so that
values are read and written in local wall-clock time of a
[`tz::DateTimeZone`], with explicit handling of daylight saving gaps and
overlaps.
* Limited chronologies, which decorate every field so that instants outside
of an inclusive lower and exclusive upper limit are rejected.

# Example

This shows how a zoned chronology handles the spring forward gap in New
York, where 02:00 local time jumps straight to 03:00.

```
use chronology::{
    tz::{DateTimeZone, Transition, TransitionRules},
    Chronology,
};

const HOUR: i32 = 3_600_000;
// 2024-03-10T07:00:00Z, when New York springs forward.
const SPRING: i64 = 1_710_054_000_000;

let rules = TransitionRules::new(
    -5 * HOUR,
    -5 * HOUR,
    vec![Transition::new(SPRING, -4 * HOUR, -5 * HOUR)],
)?;
let zone = DateTimeZone::from_rules("Test/New_York", rules);
let chrono = Chronology::iso_in(zone);

// Adding an hour to 01:30 local lands on 03:30 local.
let before = SPRING - 1_800_000;
assert_eq!(chrono.hour_of_day().get(before)?, 1);
let after = chrono.hours().add(before, 1)?;
assert_eq!(chrono.hour_of_day().get(after)?, 3);

// Setting the hour to 2 would land in the gap, so it fails.
let err = chrono.hour_of_day().set(before, 2).unwrap_err();
assert!(err.is_zone_transition());

# Ok::<(), chronology::Error>(())
```

# Crate features

* **logging** - Emits log messages through the [`log`] crate while
assembling chronologies and caching zones.
* **serde** - Provides `Serialize` and `Deserialize` impls for
[`tz::DateTimeZone`] and the field type enums.
* **perf-inline** (enabled by default) - Forcefully inlines the hot range
checks of limited chronologies and the offset arithmetic of zoned ones.

[`log`]: https://docs.rs/log
*/

#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_debug_implementations)]

pub use crate::{
    chrono::{Calendar, Chronology, Fields, IsoCalendar},
    error::{Error, LimitBound},
};

#[macro_use]
mod logging;

pub mod chrono;
mod error;
pub mod field;
#[cfg(feature = "serde")]
mod serde_impls;
pub mod tz;
mod util;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decorators_compose() {
        let _ = env_logger::try_init();

        let zone = tz::DateTimeZone::for_offset_hours(-3).unwrap();
        let zoned = Chronology::iso_in(zone);
        let limited = Chronology::limit(&zoned, Some(0), None).unwrap();
        // The limit applies to UTC instants, so local values before the
        // epoch are still readable.
        assert_eq!(limited.year().get(0).unwrap(), 1969);
        assert!(limited.year().get(-1).unwrap_err().is_limit_exceeded());
        assert_eq!(limited.base(), Some(&zoned));
        assert_eq!(limited.zone(), zoned.zone());
    }
}
