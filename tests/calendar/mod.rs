use chronology::{
    field::{
        DateTimeFieldRef, DateTimeFieldType, DurationFieldRef,
        DurationFieldType, MillisDurationField, PreciseDateTimeField,
        PreciseDurationField, SingleEraDateTimeField,
    },
    tz::DateTimeZone,
    Calendar, Chronology, Fields, IsoCalendar,
};

use crate::{london, Result, LONDON_SPRING};

/// The ISO calendar with a single era, relying on the default root
/// conversions.
#[derive(Debug)]
struct CommonEra;

impl Calendar for CommonEra {
    fn id(&self) -> &str {
        "CommonEra"
    }

    fn assemble(&self, fields: &mut Fields) {
        IsoCalendar::new().assemble(fields);
        fields.set_date_time(DateTimeFieldRef::new(SingleEraDateTimeField::new(
            "CE",
        )));
    }
}

/// A calendar that only knows the time of day.
#[derive(Debug)]
struct Clock;

impl Calendar for Clock {
    fn id(&self) -> &str {
        "Clock"
    }

    fn assemble(&self, fields: &mut Fields) {
        let millis = MillisDurationField::instance();
        let seconds = DurationFieldRef::new(PreciseDurationField::new(
            DurationFieldType::Seconds,
            1_000,
        ));
        let minutes = DurationFieldRef::new(PreciseDurationField::new(
            DurationFieldType::Minutes,
            60_000,
        ));
        fields.set_duration(millis.clone());
        fields.set_duration(seconds.clone());
        fields.set_duration(minutes.clone());
        fields.set_date_time(DateTimeFieldRef::new(PreciseDateTimeField::new(
            DateTimeFieldType::MillisOfSecond,
            millis,
            seconds.clone(),
        )));
        fields.set_date_time(DateTimeFieldRef::new(PreciseDateTimeField::new(
            DateTimeFieldType::SecondOfMinute,
            seconds,
            minutes,
        )));
    }
}

#[test]
fn default_conversions_match_iso() -> Result {
    let iso = Chronology::iso();
    let common = Chronology::from_calendar(CommonEra);
    assert_ne!(common, iso);
    assert_eq!(common.calendar().map(|c| c.id()), Some("CommonEra"));
    for (y, m, d, millis) in [(2024, 2, 29, 0), (1969, 12, 31, 86_399_999), (1, 1, 1, 5)] {
        assert_eq!(
            common.date_time_millis(y, m, d, millis)?,
            iso.date_time_millis(y, m, d, millis)?,
        );
    }
    assert_eq!(
        common.date_time_millis_hms(2024, 7, 1, 9, 30, 0, 0)?,
        iso.date_time_millis_hms(2024, 7, 1, 9, 30, 0, 0)?,
    );
    assert_eq!(common.with_time_millis(1, 6, 0, 0, 0)?, 21_600_000);
    assert!(common.date_time_millis(2023, 2, 29, 0).unwrap_err().is_field_value());
    assert_eq!(common.era().as_text(0)?, "CE");
    Ok(())
}

#[test]
fn default_conversions_in_zone() -> Result {
    let common = Chronology::zoned(&Chronology::from_calendar(CommonEra), london())?;
    // 01:30 on 2024-03-31 is in the gap.
    let err = common.date_time_millis_hms(2024, 3, 31, 1, 30, 0, 0).unwrap_err();
    assert!(err.is_illegal_instant());
    let instant = common.date_time_millis_hms(2024, 3, 31, 3, 0, 0, 0)?;
    assert_eq!(instant, LONDON_SPRING + 3_600_000);
    assert_eq!(common.to_string(), "ZonedChronology[CommonEraChronology[UTC], Europe/London]");
    Ok(())
}

#[test]
fn partial_calendars() -> Result {
    let clock = Chronology::from_calendar(Clock);
    assert_eq!(clock.second_of_minute().get(61_000)?, 1);
    assert!(!clock.year().is_supported());
    assert!(!clock.hours().is_supported());
    let err = clock.date_time_millis(2024, 1, 1, 0).unwrap_err();
    assert!(err.is_unsupported());
    insta::assert_snapshot!(err, @"year field is not supported");

    // Unsupported fields pass through decoration untouched.
    let zoned = Chronology::zoned(&clock, DateTimeZone::for_offset_hours(1)?)?;
    assert!(!zoned.year().is_supported());
    assert_eq!(zoned.second_of_minute().get(61_000)?, 1);
    Ok(())
}
