/*!
A collection of calendar related utility functions.

# Algorithms

The conversions between a count of days since the Unix epoch and a
proleptic Gregorian year, month and day use the "civil from days" family of
algorithms, which work in 400 year eras so that every year is handled with
plain integer arithmetic:
- https://howardhinnant.github.io/date_algorithms.html
*/

use crate::tz::{print_offset, DateTimeZone};

pub(crate) const MILLIS_PER_SECOND: i64 = 1_000;
pub(crate) const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub(crate) const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub(crate) const MILLIS_PER_HALFDAY: i64 = 12 * MILLIS_PER_HOUR;
pub(crate) const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
pub(crate) const MILLIS_PER_WEEK: i64 = 7 * MILLIS_PER_DAY;

/// Returns true if and only if the given year is a leap year.
///
/// A leap year is a year with 366 days. Typical years have 365 days.
#[inline]
pub(crate) const fn is_leap_year(year: i64) -> bool {
    let d = if year % 25 != 0 { 4 } else { 16 };
    (year % d) == 0
}

/// Returns the number of days in the given year and month.
///
/// This correctly returns `29` when the year is a leap year and the month is
/// February. The month must be in the range `1..=12`.
#[inline]
pub(crate) const fn days_in_month(year: i64, month: i64) -> i64 {
    if month == 2 {
        if is_leap_year(year) {
            29
        } else {
            28
        }
    } else {
        30 | (month ^ month >> 3)
    }
}

/// Returns the number of days in the given year.
#[inline]
pub(crate) const fn days_in_year(year: i64) -> i64 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Returns the number of days since 1970-01-01 for the given proleptic
/// Gregorian date.
///
/// The month must be in `1..=12` and the day in `1..=31`. The result is
/// exact for every year representable as a millisecond instant.
pub(crate) const fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// The inverse of `days_from_civil`: returns the year, month and day for
/// the given number of days since 1970-01-01.
pub(crate) const fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400;
    (if month <= 2 { year + 1 } else { year }, month, day)
}

/// Renders a millisecond instant as an ISO 8601 datetime in the proleptic
/// Gregorian calendar.
///
/// This is only used for error messages and diagnostics, so it always
/// renders through the ISO calendar regardless of any chronology involved.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DisplayInstant {
    millis: i64,
    utc: bool,
    offset: Option<i32>,
}

impl DisplayInstant {
    /// Renders an instant on the UTC time-line, with a trailing `Z`.
    pub(crate) fn utc(millis: i64) -> DisplayInstant {
        DisplayInstant { millis, utc: true, offset: None }
    }

    /// Renders a local wall-clock reading, without any offset.
    pub(crate) fn local(millis: i64) -> DisplayInstant {
        DisplayInstant { millis, utc: false, offset: None }
    }

    /// Renders an instant as its reading in `zone`, followed by the offset.
    ///
    /// In UTC, or when the reading would overflow, this is the same as
    /// `utc`.
    pub(crate) fn zoned(millis: i64, zone: &DateTimeZone) -> DisplayInstant {
        let offset = zone.offset(millis);
        match millis.checked_add(i64::from(offset)) {
            Some(local) if !zone.is_utc() => {
                DisplayInstant { millis: local, utc: false, offset: Some(offset) }
            }
            _ => DisplayInstant::utc(millis),
        }
    }
}

impl core::fmt::Display for DisplayInstant {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let days = self.millis.div_euclid(MILLIS_PER_DAY);
        let mut rem = self.millis.rem_euclid(MILLIS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        let hour = rem / MILLIS_PER_HOUR;
        rem %= MILLIS_PER_HOUR;
        let minute = rem / MILLIS_PER_MINUTE;
        rem %= MILLIS_PER_MINUTE;
        let second = rem / MILLIS_PER_SECOND;
        let millis = rem % MILLIS_PER_SECOND;
        if year < 0 {
            write!(f, "-{:04}", -year)?;
        } else {
            write!(f, "{year:04}")?;
        }
        write!(
            f,
            "-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}.{millis:03}",
        )?;
        if self.utc {
            f.write_str("Z")?;
        } else if let Some(offset) = self.offset {
            f.write_str(&print_offset(offset))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_is_leap_year() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(!is_leap_year(2025));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(1800));
        assert!(!is_leap_year(1700));
        assert!(is_leap_year(1600));
        assert!(is_leap_year(0));
        assert!(!is_leap_year(-1));
        assert!(!is_leap_year(-2));
        assert!(!is_leap_year(-3));
        assert!(is_leap_year(-4));
        assert!(!is_leap_year(-100));
        assert!(!is_leap_year(-200));
        assert!(!is_leap_year(-300));
        assert!(is_leap_year(400));
        assert!(!is_leap_year(9999));
        assert!(!is_leap_year(-9999));
    }

    #[test]
    fn t_days_in_month() {
        assert_eq!(28, days_in_month(-9999, 2));
        assert_eq!(29, days_in_month(2024, 2));
        assert_eq!(31, days_in_month(2024, 1));
        assert_eq!(30, days_in_month(2024, 4));
        assert_eq!(31, days_in_month(2024, 7));
        assert_eq!(31, days_in_month(2024, 8));
        assert_eq!(30, days_in_month(2024, 11));
        assert_eq!(31, days_in_month(2024, 12));
    }

    #[test]
    fn civil_epoch() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(days_from_civil(2024, 1, 1), 19_723);
        assert_eq!(days_from_civil(2000, 3, 1), 11_017);
        assert_eq!(civil_from_days(-1), (1969, 12, 31));
        assert_eq!(civil_from_days(19_723 + 59), (2024, 2, 29));
    }

    #[test]
    fn display() {
        insta::assert_snapshot!(
            DisplayInstant::utc(0),
            @"1970-01-01T00:00:00.000Z",
        );
        insta::assert_snapshot!(
            DisplayInstant::local(-1),
            @"1969-12-31T23:59:59.999",
        );
        let minus = DateTimeZone::for_offset_hours_minutes(-5, 30).unwrap();
        insta::assert_snapshot!(
            DisplayInstant::zoned(0, &minus),
            @"1969-12-31T18:30:00.000-05:30",
        );
        insta::assert_snapshot!(
            DisplayInstant::zoned(0, &DateTimeZone::UTC),
            @"1970-01-01T00:00:00.000Z",
        );
        insta::assert_snapshot!(
            DisplayInstant::utc(1_711_846_800_000),
            @"2024-03-31T01:00:00.000Z",
        );
    }

    quickcheck::quickcheck! {
        fn prop_civil_roundtrip(days: i32) -> bool {
            let days = i64::from(days);
            let (y, m, d) = civil_from_days(days);
            days_from_civil(y, m, d) == days
        }
    }
}
