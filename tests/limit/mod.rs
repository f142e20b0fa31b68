use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use chronology::{tz::DateTimeZone, Chronology, LimitBound};

use crate::{new_york, Result, NEW_YORK_SPRING};

fn hash(chrono: &Chronology) -> u64 {
    let mut hasher = DefaultHasher::new();
    chrono.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn reads_are_bounded() -> Result {
    let chrono = Chronology::limit(&Chronology::iso(), Some(1000), Some(5000))?;
    let field = chrono.second_of_minute();
    assert_eq!(field.get(4999)?, 4);
    let below = field.get(999).unwrap_err();
    assert_eq!(below.limit_bound(), Some(LimitBound::Below));
    let above = field.get(5000).unwrap_err();
    assert_eq!(above.limit_bound(), Some(LimitBound::Above));
    insta::assert_snapshot!(
        above,
        @"the instant is above the supported maximum of 1970-01-01T00:00:05.000Z (ISOChronology[UTC])",
    );
    Ok(())
}

#[test]
fn every_slot_is_bounded() -> Result {
    let chrono = Chronology::limit(&Chronology::iso(), Some(0), Some(1_000_000))?;
    for ty in chronology::field::DateTimeFieldType::ALL {
        let field = chrono.date_time_field(ty);
        if !field.is_supported() {
            continue;
        }
        for outside in [-1, 1_000_000] {
            assert!(field.get(outside).unwrap_err().is_limit_exceeded(), "{ty}");
            let min = field.minimum_value();
            assert!(
                field.set(outside, min).unwrap_err().is_limit_exceeded(),
                "{ty}",
            );
            assert!(
                field.round_floor(outside).unwrap_err().is_limit_exceeded(),
                "{ty}",
            );
            assert!(
                field.add_wrap_field(outside, 1).unwrap_err().is_limit_exceeded(),
                "{ty}",
            );
        }
        field.get(999_999)?;
    }
    for ty in chronology::field::DurationFieldType::ALL {
        let field = chrono.duration_field(ty);
        if !field.is_supported() {
            continue;
        }
        assert!(field.add(-1, 0).unwrap_err().is_limit_exceeded(), "{ty}");
    }
    Ok(())
}

#[test]
fn results_must_stay_inside() -> Result {
    let chrono = Chronology::limit(&Chronology::iso(), Some(0), Some(10_000))?;
    assert_eq!(chrono.seconds().add(0, 9)?, 9_000);
    let err = chrono.seconds().add(0, 10).unwrap_err();
    assert_eq!(err.limit_bound(), Some(LimitBound::Above));
    insta::assert_snapshot!(
        err,
        @"the resulting instant is above the supported maximum of 1970-01-01T00:00:10.000Z (ISOChronology[UTC])",
    );
    Ok(())
}

#[test]
fn equal_limits_are_equal() -> Result {
    let iso = Chronology::iso();
    let a = Chronology::limit(&iso, Some(1000), Some(5000))?;
    let b = Chronology::limit(&iso, Some(1000), Some(5000))?;
    assert_eq!(a, b);
    assert_eq!(hash(&a), hash(&b));
    let c = Chronology::limit(&iso, Some(1000), None)?;
    assert_ne!(a, c);
    assert_eq!(c.upper_limit(), None);
    assert_eq!(
        c.to_string(),
        "LimitChronology[ISOChronology[UTC], 1970-01-01T00:00:01.000Z, NoLimit]",
    );
    Ok(())
}

#[test]
fn errors_show_limits_in_local_time() -> Result {
    let plus2 = Chronology::iso_in(DateTimeZone::for_offset_hours(2)?);
    let chrono = Chronology::limit(&plus2, Some(0), Some(3_600_000))?;
    insta::assert_snapshot!(
        chrono.hour_of_day().get(-1).unwrap_err(),
        @"the instant is below the supported minimum of 1970-01-01T02:00:00.000+02:00 (ZonedChronology[ISOChronology[UTC], +02:00])",
    );

    let zoned = Chronology::iso_in(new_york());
    let chrono = Chronology::limit(&zoned, None, Some(NEW_YORK_SPRING))?;
    insta::assert_snapshot!(
        chrono.days().add(NEW_YORK_SPRING - 1, 1).unwrap_err(),
        @"the resulting instant is above the supported maximum of 2024-03-10T03:00:00.000-04:00 (ZonedChronology[ISOChronology[UTC], America/New_York])",
    );
    Ok(())
}

#[test]
fn limits_over_a_zone() -> Result {
    let zoned = Chronology::iso_in(new_york());
    // The lower limit is one hour into summer time.
    let lower = NEW_YORK_SPRING + 3_600_000;
    let chrono = Chronology::limit(&zoned, Some(lower), None)?;
    assert_eq!(chrono.hour_of_day().get(lower)?, 4);
    assert!(chrono.hour_of_day().set(lower, 3).unwrap_err().is_limit_exceeded());

    // Re-expressed in UTC, the limit keeps its wall-clock reading.
    let utc = chrono.with_zone(DateTimeZone::UTC)?;
    assert_eq!(utc.lower_limit(), Some(lower - 4 * 3_600_000));
    assert_eq!(utc.base(), Some(&Chronology::iso()));
    assert_eq!(chrono.with_utc()?, utc);
    Ok(())
}
