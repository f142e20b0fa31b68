use chronology::{tz::DateTimeZone, Chronology};

use crate::{
    london, new_york, Logger, Result, HOUR, LONDON_FALL, LONDON_SPRING,
    NEW_YORK_FALL, NEW_YORK_SPRING,
};

const MINUTE: i64 = 60_000;
const HOURS: i64 = HOUR as i64;

#[test]
fn fixed_offset_reads_local_values() -> Result {
    let _ = Logger::init();

    let zone = DateTimeZone::for_offset_hours(2)?;
    let chrono = Chronology::iso_in(zone);
    assert_eq!(chrono.hour_of_day().get(0)?, 2);
    assert_eq!(chrono.day_of_month().get(0)?, 1);
    assert_eq!(chrono.hour_of_day().round_floor(1)?, 0);
    assert!(chrono.hours().is_precise());
    assert!(chrono.days().is_precise());
    Ok(())
}

#[test]
fn gap_is_resolved_forward() -> Result {
    let zone = london();
    // 01:30 local on the day London springs forward does not exist.
    let local = LONDON_SPRING + 30 * MINUTE;
    let err = zone.local_to_utc(local, true).unwrap_err();
    assert!(err.is_illegal_instant());
    insta::assert_snapshot!(
        err,
        @"illegal instant due to time zone offset transition: 2024-03-31T01:30:00.000 (Europe/London)",
    );

    // Leniently, it reads as 02:30 local.
    let instant = zone.local_to_utc(local, false)?;
    let chrono = Chronology::iso_in(zone);
    assert_eq!(chrono.hour_of_day().get(instant)?, 2);
    assert_eq!(chrono.minute_of_hour().get(instant)?, 30);
    Ok(())
}

#[test]
fn days_keep_wall_clock_across_transitions() -> Result {
    let chrono = Chronology::iso_in(new_york());
    // Noon local the day before each transition.
    for noon in [NEW_YORK_SPRING - 14 * HOURS, NEW_YORK_FALL - 14 * HOURS] {
        assert_eq!(chrono.hour_of_day().get(noon)?, 12);
        let next = chrono.days().add(noon, 1)?;
        assert_eq!(chrono.hour_of_day().get(next)?, 12);
        assert_eq!(chrono.days().add(next, -1)?, noon);
        assert_eq!(chrono.days().difference(next, noon)?, 1);
    }
    // The spring day is 23 hours long and the fall day 25.
    let noon = NEW_YORK_SPRING - 14 * HOURS;
    assert_eq!(chrono.days().add(noon, 1)? - noon, 23 * HOURS);
    let noon = NEW_YORK_FALL - 14 * HOURS;
    assert_eq!(chrono.days().add(noon, 1)? - noon, 25 * HOURS);
    assert!(!chrono.days().is_precise());
    Ok(())
}

#[test]
fn hours_keep_elapsed_time() -> Result {
    let chrono = Chronology::iso_in(london());
    let before = LONDON_FALL - 30 * MINUTE;
    // 01:30 BST, then 01:30 GMT an hour later.
    let after = chrono.hours().add(before, 1)?;
    assert_eq!(after - before, HOURS);
    assert_eq!(chrono.hour_of_day().get(before)?, 1);
    assert_eq!(chrono.hour_of_day().get(after)?, 1);
    assert_eq!(chrono.hours().difference(after, before)?, 1);
    Ok(())
}

#[test]
fn set_into_gap_is_rejected() -> Result {
    let chrono = Chronology::iso_in(new_york());
    let before = NEW_YORK_SPRING - 30 * MINUTE;
    let err = chrono.hour_of_day().set(before, 2).unwrap_err();
    assert!(err.is_zone_transition());
    assert!(err.is_field_value());
    // Other hours are fine.
    let four = chrono.hour_of_day().set(before, 4)?;
    assert_eq!(four, NEW_YORK_SPRING + 90 * MINUTE);
    Ok(())
}

#[test]
fn month_arithmetic_in_zone() -> Result {
    let chrono = Chronology::iso_in(london());
    let jan31 = chrono.date_time_millis_hms(2024, 1, 31, 9, 0, 0, 0)?;
    let feb29 = chrono.months().add(jan31, 1)?;
    assert_eq!(chrono.day_of_month().get(feb29)?, 29);
    // April is in summer time, but 09:00 stays 09:00.
    let apr30 = chrono.months().add(jan31, 3)?;
    assert_eq!(chrono.day_of_month().get(apr30)?, 30);
    assert_eq!(chrono.hour_of_day().get(apr30)?, 9);
    assert_eq!(chrono.months().difference(apr30, jan31)?, 3);
    Ok(())
}

#[test]
fn zoned_of_zoned_reprojects() -> Result {
    let london = Chronology::iso_in(london());
    let in_new_york = london.with_zone(new_york())?;
    assert_eq!(in_new_york.base(), Some(&Chronology::iso()));
    assert_eq!(in_new_york.zone().id(), "America/New_York");
    let again = Chronology::zoned(&london, new_york())?;
    assert_eq!(again, in_new_york);
    assert_eq!(london.with_utc()?, Chronology::iso());
    Ok(())
}

quickcheck::quickcheck! {
    fn prop_days_round_trip_local(instant: i64) -> quickcheck::TestResult {
        // Stay within a few centuries of the transitions.
        let instant = NEW_YORK_SPRING + instant % (200 * 365 * 24 * HOURS);
        let chrono = Chronology::iso_in(new_york());
        let next = match chrono.days().add(instant, 1) {
            Ok(next) => next,
            Err(_) => return quickcheck::TestResult::discard(),
        };
        let hour = chrono.hour_of_day().get(instant).unwrap();
        // Landing in the spring gap moves the wall clock forward.
        if chrono.hour_of_day().get(next).unwrap() != hour {
            return quickcheck::TestResult::discard();
        }
        let back = chrono.days().add(next, -1).unwrap();
        quickcheck::TestResult::from_bool(
            chrono.hour_of_day().get(back).unwrap() == hour,
        )
    }
}
