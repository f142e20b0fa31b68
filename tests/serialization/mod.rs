use chronology::{
    field::{DateTimeFieldType, DurationFieldType},
    tz::DateTimeZone,
};

use crate::Result;

#[test]
fn zones_and_field_types() -> Result {
    let zone = DateTimeZone::for_offset_hours_minutes(5, 30)?;
    let json = serde_json::to_string(&(zone.clone(), DateTimeFieldType::DayOfWeek))?;
    assert_eq!(json, r#"["+05:30","day-of-week"]"#);
    let (back, ty): (DateTimeZone, DateTimeFieldType) = serde_json::from_str(&json)?;
    assert_eq!(back, zone);
    assert_eq!(ty, DateTimeFieldType::DayOfWeek);

    let all: Vec<DurationFieldType> = serde_json::from_str(
        &serde_json::to_string(&DurationFieldType::ALL)?,
    )?;
    assert_eq!(all, DurationFieldType::ALL);

    // The global context only knows UTC and fixed offsets.
    assert!(serde_json::from_str::<DateTimeZone>(r#""Europe/London""#).is_err());
    Ok(())
}
