use crate::{
    chrono::{Calendar, Chronology, Fields},
    field::{verify_bounds, CalendarUnit, DateTimeFieldType},
    util::{
        arith,
        common::{
            civil_from_days, days_from_civil, days_in_month, MILLIS_PER_DAY,
            MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
        },
    },
    Error,
};

mod fields;

/// The smallest year the ISO calendar supports.
pub(crate) const MIN_YEAR: i32 = -292_275_054;
/// The largest year the ISO calendar supports.
pub(crate) const MAX_YEAR: i32 = 292_278_993;

/// The average length of a Gregorian year, 365.2425 days.
const AVERAGE_MILLIS_PER_YEAR: i64 = 31_556_952_000;
/// The average length of a Gregorian month.
const AVERAGE_MILLIS_PER_MONTH: i64 = AVERAGE_MILLIS_PER_YEAR / 12;

/// The ISO-8601 calendar system in UTC.
///
/// This is the proleptic Gregorian calendar. Weeks start on Monday, and
/// week 1 of a weekyear is the week containing its first Thursday.
/// Century-of-era and year-of-century are zero based, so 2024 is year 24 of
/// century 20. The era is `BC` for years `0` and below, and `AD` otherwise.
///
/// Use [`Chronology::iso`] for the shared chronology assembled from this
/// calendar.
///
/// # Example
///
/// ```
/// use chronology::Chronology;
///
/// let iso = Chronology::iso();
/// let instant = iso.date_time_millis(2024, 12, 30, 0)?;
/// assert_eq!(iso.weekyear().get(instant)?, 2025);
/// assert_eq!(iso.week_of_weekyear().get(instant)?, 1);
/// assert_eq!(iso.day_of_week().get(instant)?, 1);
/// assert_eq!(iso.century_of_era().get(instant)?, 20);
/// assert_eq!(iso.era().as_text(instant)?, "AD");
///
/// # Ok::<(), chronology::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct IsoCalendar(());

impl IsoCalendar {
    /// Creates the ISO calendar.
    pub fn new() -> IsoCalendar {
        IsoCalendar(())
    }
}

impl Calendar for IsoCalendar {
    fn id(&self) -> &str {
        "ISO"
    }

    fn assemble(&self, fields: &mut Fields) {
        fields::assemble(fields);
    }

    fn date_time_millis(
        &self,
        _: &Chronology,
        year: i32,
        month: i32,
        day: i32,
        millis_of_day: i32,
    ) -> Result<i64, Error> {
        let days = checked_days(year, month, day)?;
        let millis_of_day = i64::from(millis_of_day);
        verify_bounds(
            DateTimeFieldType::MillisOfDay.name(),
            millis_of_day,
            0,
            MILLIS_PER_DAY - 1,
        )?;
        instant_of(days, millis_of_day)
    }

    fn date_time_millis_hms(
        &self,
        _: &Chronology,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64, Error> {
        let days = checked_days(year, month, day)?;
        instant_of(days, checked_time(hour, minute, second, millis)?)
    }

    fn with_time_millis(
        &self,
        _: &Chronology,
        instant: i64,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64, Error> {
        let time = checked_time(hour, minute, second, millis)?;
        instant_of(day_number(instant), time)
    }
}

/// Returns the days since the epoch of a validated date.
fn checked_days(year: i32, month: i32, day: i32) -> Result<i64, Error> {
    use self::DateTimeFieldType::*;

    let (year, month, day) = (i64::from(year), i64::from(month), i64::from(day));
    verify_year(year)?;
    verify_bounds(MonthOfYear.name(), month, 1, 12)?;
    verify_bounds(DayOfMonth.name(), day, 1, days_in_month(year, month))?;
    Ok(days_from_civil(year, month, day))
}

/// Returns the millisecond of the day of a validated time of day.
fn checked_time(
    hour: i32,
    minute: i32,
    second: i32,
    millis: i32,
) -> Result<i64, Error> {
    use self::DateTimeFieldType::*;

    let (hour, minute) = (i64::from(hour), i64::from(minute));
    let (second, millis) = (i64::from(second), i64::from(millis));
    verify_bounds(HourOfDay.name(), hour, 0, 23)?;
    verify_bounds(MinuteOfHour.name(), minute, 0, 59)?;
    verify_bounds(SecondOfMinute.name(), second, 0, 59)?;
    verify_bounds(MillisOfSecond.name(), millis, 0, 999)?;
    Ok(hour * MILLIS_PER_HOUR
        + minute * MILLIS_PER_MINUTE
        + second * MILLIS_PER_SECOND
        + millis)
}

fn verify_year(year: i64) -> Result<(), Error> {
    verify_bounds(
        DateTimeFieldType::Year.name(),
        year,
        i64::from(MIN_YEAR),
        i64::from(MAX_YEAR),
    )
}

fn day_number(instant: i64) -> i64 {
    instant.div_euclid(MILLIS_PER_DAY)
}

fn instant_of(days: i64, millis_of_day: i64) -> Result<i64, Error> {
    arith::add(arith::mul(days, MILLIS_PER_DAY)?, millis_of_day)
}

/// An instant broken down into its ISO date and millisecond of the day.
#[derive(Clone, Copy, Debug)]
struct Civil {
    year: i64,
    month: i64,
    day: i64,
    millis_of_day: i64,
}

impl Civil {
    fn from_instant(instant: i64) -> Civil {
        let (year, month, day) = civil_from_days(day_number(instant));
        let millis_of_day = instant.rem_euclid(MILLIS_PER_DAY);
        Civil { year, month, day, millis_of_day }
    }

    /// Returns the instant, clamping the day to the length of the month.
    fn to_instant(self) -> Result<i64, Error> {
        let day = self.day.min(days_in_month(self.year, self.month));
        instant_of(days_from_civil(self.year, self.month, day), self.millis_of_day)
    }
}

/// Returns `instant` moved to `year`, keeping the month, day and time of
/// day. February 29 becomes February 28 in a common year.
fn with_year(instant: i64, year: i64) -> Result<i64, Error> {
    verify_year(year)?;
    Civil { year, ..Civil::from_instant(instant) }.to_instant()
}

/// Returns the ISO day of the week, `1` for Monday through `7` for Sunday.
fn day_of_week(days: i64) -> i64 {
    // 1970-01-01 was a Thursday.
    (days + 3).rem_euclid(7) + 1
}

/// Returns the day number of the Monday starting week 1 of `weekyear`.
fn weekyear_start(weekyear: i64) -> i64 {
    let jan4 = days_from_civil(weekyear, 1, 4);
    jan4 - (day_of_week(jan4) - 1)
}

fn weeks_in_weekyear(weekyear: i64) -> i64 {
    (weekyear_start(weekyear + 1) - weekyear_start(weekyear)) / 7
}

/// Returns the weekyear and week of the weekyear a day falls in.
fn week_date(days: i64) -> (i64, i64) {
    let (year, _, _) = civil_from_days(days);
    let weekyear = if days < weekyear_start(year) {
        year - 1
    } else if days >= weekyear_start(year + 1) {
        year + 1
    } else {
        year
    };
    (weekyear, (days - weekyear_start(weekyear)) / 7 + 1)
}

/// Returns `instant` moved to `weekyear`, keeping the week (clamped to the
/// weeks of the new weekyear), the day of the week and the time of day.
fn with_weekyear(instant: i64, weekyear: i64) -> Result<i64, Error> {
    verify_bounds(
        DateTimeFieldType::Weekyear.name(),
        weekyear,
        i64::from(MIN_YEAR),
        i64::from(MAX_YEAR),
    )?;
    let days = day_number(instant);
    let (_, week) = week_date(days);
    let week = week.min(weeks_in_weekyear(weekyear));
    let days =
        weekyear_start(weekyear) + (week - 1) * 7 + day_of_week(days) - 1;
    instant_of(days, instant.rem_euclid(MILLIS_PER_DAY))
}

/// Corrects an estimate of the whole units between two instants so that
/// adding it to `subtrahend` does not overshoot `minuend`.
///
/// The estimate must count calendar boundaries crossed, which overshoots by
/// at most one.
fn settle_difference(
    unit: &impl CalendarUnit,
    estimate: i64,
    minuend: i64,
    subtrahend: i64,
) -> Result<i64, Error> {
    let mut diff = estimate;
    if minuend >= subtrahend {
        while diff > 0 && unit.add(subtrahend, diff)? > minuend {
            diff -= 1;
        }
    } else {
        while diff < 0 && unit.add(subtrahend, diff)? < minuend {
            diff += 1;
        }
    }
    Ok(diff)
}

#[derive(Debug)]
struct YearsUnit;

impl CalendarUnit for YearsUnit {
    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        if amount == 0 {
            return Ok(instant);
        }
        let year = Civil::from_instant(instant).year;
        with_year(instant, arith::add(year, amount)?)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64, Error> {
        let estimate = Civil::from_instant(minuend).year
            - Civil::from_instant(subtrahend).year;
        settle_difference(self, estimate, minuend, subtrahend)
    }
}

#[derive(Debug)]
struct MonthsUnit;

impl MonthsUnit {
    fn months_since_epoch_year(civil: Civil) -> i64 {
        civil.year * 12 + (civil.month - 1)
    }
}

impl CalendarUnit for MonthsUnit {
    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        if amount == 0 {
            return Ok(instant);
        }
        let civil = Civil::from_instant(instant);
        let total =
            arith::add(MonthsUnit::months_since_epoch_year(civil), amount)?;
        let year = total.div_euclid(12);
        verify_year(year)?;
        Civil { year, month: total.rem_euclid(12) + 1, ..civil }.to_instant()
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64, Error> {
        let estimate =
            MonthsUnit::months_since_epoch_year(Civil::from_instant(minuend))
                - MonthsUnit::months_since_epoch_year(Civil::from_instant(
                    subtrahend,
                ));
        settle_difference(self, estimate, minuend, subtrahend)
    }
}

#[derive(Debug)]
struct WeekyearsUnit;

impl CalendarUnit for WeekyearsUnit {
    fn add(&self, instant: i64, amount: i64) -> Result<i64, Error> {
        if amount == 0 {
            return Ok(instant);
        }
        let (weekyear, _) = week_date(day_number(instant));
        with_weekyear(instant, arith::add(weekyear, amount)?)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64, Error> {
        let estimate = week_date(day_number(minuend)).0
            - week_date(day_number(subtrahend)).0;
        settle_difference(self, estimate, minuend, subtrahend)
    }
}
