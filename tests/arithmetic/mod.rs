use chronology::{
    field::{DateTimeFieldType, DurationFieldType},
    Chronology, Error,
};

use crate::{
    london, new_york, LONDON_FALL, LONDON_SPRING, NEW_YORK_FALL,
    NEW_YORK_SPRING,
};

const DAY: i64 = 86_400_000;

const PRECISE: [DurationFieldType; 4] = [
    DurationFieldType::Hours,
    DurationFieldType::Minutes,
    DurationFieldType::Seconds,
    DurationFieldType::Millis,
];

/// UTC, two zones with transitions, and a limited view of one of them.
fn chronologies() -> Vec<Chronology> {
    let limited = Chronology::limit(
        &Chronology::iso_in(london()),
        Some(LONDON_SPRING - 60 * DAY),
        Some(LONDON_FALL + 60 * DAY),
    )
    .unwrap();
    vec![
        Chronology::iso(),
        Chronology::iso_in(london()),
        Chronology::iso_in(new_york()),
        limited,
    ]
}

/// Returns an instant within about three weeks of one of the transitions.
fn near_transition(pick: u8, seconds: i32) -> i64 {
    let transitions =
        [LONDON_SPRING, LONDON_FALL, NEW_YORK_SPRING, NEW_YORK_FALL];
    transitions[usize::from(pick % 4)] + i64::from(seconds % 2_000_000) * 1_000
}

/// Errors a rounding is allowed to report: results past a limit, or far
/// enough out that the offset no longer fits.
fn is_out_of_reach(err: &Error) -> bool {
    err.is_limit_exceeded() || err.is_overflow()
}

#[test]
fn precise_units_cross_transitions_exactly() -> crate::Result {
    for chrono in chronologies() {
        // 00:30 before London springs forward, and 01:30 before New York
        // falls back.
        for start in [LONDON_SPRING - 1_800_000, NEW_YORK_FALL - 1_800_000] {
            assert_eq!(chrono.hours().add(start, 2)?, start + 7_200_000);
            assert_eq!(chrono.minutes().add(start, 90)?, start + 5_400_000);
            assert_eq!(chrono.hours().difference(start + 7_200_000, start)?, 2);
        }
    }
    Ok(())
}

quickcheck::quickcheck! {
    fn prop_precise_add_is_exact_and_invertible(
        pick: u8,
        seconds: i32,
        amount: i8
    ) -> bool {
        let instant = near_transition(pick, seconds);
        let amount = i64::from(amount);
        chronologies().iter().all(|chrono| {
            PRECISE.into_iter().all(|ty| {
                let field = chrono.duration_field(ty);
                let Ok(there) = field.add(instant, amount) else {
                    return false;
                };
                there - instant == amount * field.unit_millis()
                    && field.add(there, -amount).ok() == Some(instant)
                    && field.difference_as_i64(there, instant).ok()
                        == Some(amount)
            })
        })
    }

    fn prop_rounding_brackets_instant(pick: u8, seconds: i32) -> bool {
        let instant = near_transition(pick, seconds);
        chronologies().iter().all(|chrono| {
            DateTimeFieldType::ALL.into_iter().all(|ty| {
                let field = chrono.date_time_field(ty);
                if !field.is_supported() {
                    return true;
                }
                match (field.round_floor(instant), field.round_ceiling(instant)) {
                    (Ok(floor), Ok(ceiling)) => {
                        floor <= instant
                            && instant <= ceiling
                            && (floor == instant) == (ceiling == instant)
                    }
                    (Err(err), _) | (_, Err(err)) => is_out_of_reach(&err),
                }
            })
        })
    }
}
