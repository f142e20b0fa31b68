use crate::{
    chrono::{Chronology, Fields},
    Error,
};

/// A calendar system that a root [`Chronology`] is assembled from.
///
/// A calendar supplies the leaf fields of a chronology in UTC. Time zone
/// and range behavior are layered on top by the decorating chronologies
/// ([`Chronology::zoned`] and [`Chronology::limit`]), so a calendar never
/// deals with offsets.
///
/// The root conversions have defaults that go through the assembled
/// fields. Calendars may override them with faster direct calculations.
pub trait Calendar: core::fmt::Debug + Send + Sync + 'static {
    /// Returns the identifier of this calendar, like `"ISO"`.
    ///
    /// Root chronologies compare equal when their calendar identifiers are
    /// equal.
    fn id(&self) -> &str;

    /// Populates the slots this calendar supports.
    fn assemble(&self, fields: &mut Fields);

    /// Returns the instant for a date and a millisecond of the day.
    ///
    /// `chrono` is the chronology assembled from this calendar.
    fn date_time_millis(
        &self,
        chrono: &Chronology,
        year: i32,
        month: i32,
        day: i32,
        millis_of_day: i32,
    ) -> Result<i64, Error> {
        let instant = chrono.year().set(0, year)?;
        let instant = chrono.month_of_year().set(instant, month)?;
        let instant = chrono.day_of_month().set(instant, day)?;
        chrono.millis_of_day().set(instant, millis_of_day)
    }

    /// Returns the instant for a date and a time of day.
    fn date_time_millis_hms(
        &self,
        chrono: &Chronology,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64, Error> {
        let instant = chrono.year().set(0, year)?;
        let instant = chrono.month_of_year().set(instant, month)?;
        let instant = chrono.day_of_month().set(instant, day)?;
        let instant = chrono.hour_of_day().set(instant, hour)?;
        let instant = chrono.minute_of_hour().set(instant, minute)?;
        let instant = chrono.second_of_minute().set(instant, second)?;
        chrono.millis_of_second().set(instant, millis)
    }

    /// Returns `instant` with its time of day replaced.
    fn with_time_millis(
        &self,
        chrono: &Chronology,
        instant: i64,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64, Error> {
        let instant = chrono.hour_of_day().set(instant, hour)?;
        let instant = chrono.minute_of_hour().set(instant, minute)?;
        let instant = chrono.second_of_minute().set(instant, second)?;
        chrono.millis_of_second().set(instant, millis)
    }
}
