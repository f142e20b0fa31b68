use chronology::{
    tz::{DateTimeZone, MemoryProvider, UtcProvider, ZoneContext},
    Chronology,
};

use crate::{london, new_york, Logger, Result, HOUR};

#[test]
fn memory_provider_lookups() -> Result {
    let _ = Logger::init();

    let provider =
        MemoryProvider::new().with_zone(london()).with_zone(new_york());
    let ctx = ZoneContext::new(provider)?.with_default_zone(new_york());
    assert_eq!(ctx.default_zone().id(), "America/New_York");
    assert_eq!(
        ctx.available_ids().into_iter().collect::<Vec<_>>(),
        vec!["America/New_York", "Europe/London", "UTC"],
    );
    assert_eq!(ctx.for_id("Europe/London")?.id(), "Europe/London");
    assert!(ctx.for_id("UTC")?.is_utc());
    assert_eq!(ctx.for_id("-02:30")?.offset(0), -2 * HOUR - HOUR / 2);
    insta::assert_snapshot!(
        ctx.for_id("Europe/Paris").unwrap_err(),
        @r###"the time zone id "Europe/Paris" is not recognised"###,
    );

    let chrono = Chronology::iso_default(&ctx);
    assert_eq!(chrono, Chronology::iso_in(new_york()));
    assert_eq!(chrono.hour_of_day().get(0)?, 19);
    let chrono = Chronology::iso_for_id(&ctx, "Europe/London")?;
    assert_eq!(chrono.zone().id(), "Europe/London");
    assert!(Chronology::iso_for_id(&ctx, "UTC")?.zone().is_utc());
    assert!(Chronology::iso_for_id(&ctx, "Europe/Paris").is_err());
    Ok(())
}

#[test]
fn fixed_offsets() -> Result {
    let zone = DateTimeZone::for_offset_hours_minutes(-2, 30)?;
    assert_eq!(zone.id(), "-02:30");
    assert_eq!(zone.to_string(), "-02:30");
    assert_eq!(zone.offset(0), -2 * 3_600_000 - 30 * 60_000);
    assert!(zone.is_fixed());
    // Fixed offset zones are cached.
    assert_eq!(zone, DateTimeZone::fixed(-9_000_000)?);
    assert!(DateTimeZone::for_offset_hours(0)?.is_utc());
    assert!(DateTimeZone::for_offset_hours(24).is_err());
    Ok(())
}

#[test]
fn global_context_cannot_be_replaced_once_used() -> Result {
    assert!(ZoneContext::global().for_id("UTC")?.is_utc());
    let ctx = ZoneContext::new(UtcProvider::new())?;
    let err = ZoneContext::install(ctx).unwrap_err();
    insta::assert_snapshot!(
        err,
        @"the global zone context was already initialized",
    );
    Ok(())
}
