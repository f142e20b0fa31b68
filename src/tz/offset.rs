use std::{
    collections::HashMap,
    sync::{OnceLock, RwLock},
};

use crate::{
    error::tz::Error as E,
    tz::{DateTimeZone, ZoneKind},
    Error,
};

/// Offsets must be strictly within one day.
const MAX_OFFSET_MILLIS: i64 = 86_400_000 - 1;

/// Returns the offset as an `i32` when it is strictly within 24 hours.
pub(crate) fn checked_offset(millis: i64) -> Result<i32, Error> {
    if !(-MAX_OFFSET_MILLIS..=MAX_OFFSET_MILLIS).contains(&millis) {
        return Err(E::OffsetTooLarge { millis }.into());
    }
    // Just checked that it's within a day, so it fits.
    Ok(millis as i32)
}

/// Returns the cached fixed offset zone for the given offset.
///
/// The cache is keyed by the printed form of the offset, which is also the
/// identifier of the zone.
pub(crate) fn fixed_offset_zone(offset: i32) -> Result<DateTimeZone, Error> {
    static CACHE: OnceLock<RwLock<HashMap<String, DateTimeZone>>> =
        OnceLock::new();

    if offset == 0 {
        return Ok(DateTimeZone::UTC);
    }
    let offset = checked_offset(i64::from(offset))?;
    let id = print_offset(offset);
    let cache = CACHE.get_or_init(|| RwLock::new(HashMap::new()));
    {
        let map = cache.read().unwrap_or_else(|err| err.into_inner());
        if let Some(zone) = map.get(&id) {
            return Ok(zone.clone());
        }
    }
    let mut map = cache.write().unwrap_or_else(|err| err.into_inner());
    let zone = map
        .entry(id)
        .or_insert_with_key(|id| {
            debug!("caching fixed offset time zone {id}");
            DateTimeZone::from_kind(
                id,
                ZoneKind::Fixed { offset, standard: offset },
            )
        })
        .clone();
    Ok(zone)
}

/// Formats an offset in milliseconds as `[+-]HH:MM[:SS[.mmm]]`.
///
/// Seconds are only printed when non-zero, and milliseconds only when
/// non-zero.
///
/// # Example
///
/// ```
/// use chronology::tz::print_offset;
///
/// assert_eq!(print_offset(0), "+00:00");
/// assert_eq!(print_offset(-9_000_000), "-02:30");
/// assert_eq!(print_offset(3_723_004), "+01:02:03.004");
/// ```
pub fn print_offset(offset: i32) -> String {
    let sign = if offset < 0 { '-' } else { '+' };
    let mut rem = i64::from(offset).abs();
    let hours = rem / 3_600_000;
    rem %= 3_600_000;
    let minutes = rem / 60_000;
    rem %= 60_000;
    let mut out = format!("{sign}{hours:02}:{minutes:02}");
    if rem == 0 {
        return out;
    }
    let seconds = rem / 1_000;
    out.push_str(&format!(":{seconds:02}"));
    let millis = rem % 1_000;
    if millis != 0 {
        out.push_str(&format!(".{millis:03}"));
    }
    out
}

/// Parses an offset written as `[+-]HH[:MM[:SS[.mmm]]]` into milliseconds.
///
/// The colons may be omitted, as in `+0530`. The offset must be strictly
/// within 24 hours.
///
/// # Example
///
/// ```
/// use chronology::tz::parse_offset;
///
/// assert_eq!(parse_offset("+05:30")?, 19_800_000);
/// assert_eq!(parse_offset("-0230")?, -9_000_000);
/// assert_eq!(parse_offset("+01:02:03.004")?, 3_723_004);
/// assert!(parse_offset("05:30").is_err());
///
/// # Ok::<(), chronology::Error>(())
/// ```
pub fn parse_offset(given: &str) -> Result<i32, Error> {
    parse_offset_impl(given.as_bytes())
        .ok_or_else(|| E::InvalidOffset { given: given.into() }.into())
        .and_then(checked_offset)
}

fn parse_offset_impl(bytes: &[u8]) -> Option<i64> {
    let (&sign, mut rest) = bytes.split_first()?;
    let negative = match sign {
        b'+' => false,
        b'-' => true,
        _ => return None,
    };
    let hours = take_digits(&mut rest, 2)?;
    let mut minutes = 0;
    let mut seconds = 0;
    let mut millis = 0;
    let colons = rest.first() == Some(&b':');
    if !rest.is_empty() {
        take_separator(&mut rest, colons)?;
        minutes = take_digits(&mut rest, 2)?;
    }
    if !rest.is_empty() {
        take_separator(&mut rest, colons)?;
        seconds = take_digits(&mut rest, 2)?;
    }
    if !rest.is_empty() {
        let (&dot, after) = rest.split_first()?;
        if dot != b'.' {
            return None;
        }
        rest = after;
        millis = take_digits(&mut rest, 3)?;
    }
    if !rest.is_empty() || minutes > 59 || seconds > 59 {
        return None;
    }
    let total =
        hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis;
    Some(if negative { -total } else { total })
}

fn take_separator(rest: &mut &[u8], colons: bool) -> Option<()> {
    if colons {
        let (&colon, after) = rest.split_first()?;
        if colon != b':' {
            return None;
        }
        *rest = after;
    }
    Some(())
}

fn take_digits(rest: &mut &[u8], len: usize) -> Option<i64> {
    if rest.len() < len {
        return None;
    }
    let (digits, after) = rest.split_at(len);
    let mut value = 0;
    for &byte in digits {
        if !byte.is_ascii_digit() {
            return None;
        }
        value = value * 10 + i64::from(byte - b'0');
    }
    *rest = after;
    Some(value)
}
