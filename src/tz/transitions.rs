use crate::{error::tz::Error as E, tz::ZoneRules, Error};

/// A single change of offset in a [`TransitionRules`] table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Transition {
    at: i64,
    offset: i32,
    standard_offset: i32,
}

impl Transition {
    /// Creates a transition that, starting at instant `at`, puts `offset`
    /// (and `standard_offset` as the standard offset) into effect.
    pub fn new(at: i64, offset: i32, standard_offset: i32) -> Transition {
        Transition { at, offset, standard_offset }
    }

    /// Returns the instant this transition takes effect.
    pub fn at(&self) -> i64 {
        self.at
    }

    /// Returns the offset in effect from this transition onward.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Returns the standard offset in effect from this transition onward.
    pub fn standard_offset(&self) -> i32 {
        self.standard_offset
    }
}

/// Zone rules backed by a precalculated table of transitions.
///
/// Before the first transition the initial offsets apply. After the last
/// one, its offsets apply forever.
///
/// # Example
///
/// ```
/// use chronology::tz::{DateTimeZone, Transition, TransitionRules};
///
/// let rules = TransitionRules::new(0, 0, vec![
///     Transition::new(1_000, 3_600_000, 0),
/// ])?;
/// let zone = DateTimeZone::from_rules("Example/Summer", rules);
/// assert_eq!(zone.offset(999), 0);
/// assert_eq!(zone.offset(1_000), 3_600_000);
/// assert_eq!(zone.next_transition(0), 1_000);
///
/// # Ok::<(), chronology::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct TransitionRules {
    initial_offset: i32,
    initial_standard_offset: i32,
    transitions: Vec<Transition>,
}

impl TransitionRules {
    /// Creates rules from initial offsets and a table of transitions.
    ///
    /// The transitions must be in strictly increasing order of instant.
    pub fn new(
        initial_offset: i32,
        initial_standard_offset: i32,
        transitions: Vec<Transition>,
    ) -> Result<TransitionRules, Error> {
        for pair in transitions.windows(2) {
            if pair[0].at >= pair[1].at {
                return Err(E::UnsortedTransitions {
                    previous: pair[0].at,
                    next: pair[1].at,
                }
                .into());
            }
        }
        Ok(TransitionRules {
            initial_offset,
            initial_standard_offset,
            transitions,
        })
    }

    /// Returns the transition in effect at `instant`, if any has happened.
    fn in_effect(&self, instant: i64) -> Option<&Transition> {
        let after = self.transitions.partition_point(|t| t.at <= instant);
        after.checked_sub(1).map(|i| &self.transitions[i])
    }
}

impl ZoneRules for TransitionRules {
    fn offset(&self, instant: i64) -> i32 {
        self.in_effect(instant).map_or(self.initial_offset, |t| t.offset)
    }

    fn standard_offset(&self, instant: i64) -> i32 {
        self.in_effect(instant)
            .map_or(self.initial_standard_offset, |t| t.standard_offset)
    }

    fn next_transition(&self, instant: i64) -> i64 {
        let next = self.transitions.partition_point(|t| t.at <= instant);
        self.transitions.get(next).map_or(instant, |t| t.at)
    }

    fn previous_transition(&self, instant: i64) -> i64 {
        match self.in_effect(instant) {
            Some(t) if t.at > i64::MIN => t.at - 1,
            _ => instant,
        }
    }

    fn is_fixed(&self) -> bool {
        self.transitions.iter().all(|t| {
            t.offset == self.initial_offset
                && t.standard_offset == self.initial_standard_offset
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsorted_rejected() {
        let err = TransitionRules::new(
            0,
            0,
            vec![Transition::new(10, 1, 0), Transition::new(10, 2, 0)],
        )
        .unwrap_err();
        insta::assert_snapshot!(
            err,
            @"zone transitions must be strictly increasing, but 10 follows 10",
        );
    }

    #[test]
    fn lookups() {
        let rules = TransitionRules::new(
            -5,
            -5,
            vec![Transition::new(100, -4, -5), Transition::new(200, -5, -5)],
        )
        .unwrap();
        assert_eq!(rules.offset(99), -5);
        assert_eq!(rules.offset(100), -4);
        assert_eq!(rules.offset(199), -4);
        assert_eq!(rules.offset(200), -5);
        assert_eq!(rules.standard_offset(150), -5);
        assert_eq!(rules.next_transition(i64::MIN), 100);
        assert_eq!(rules.next_transition(100), 200);
        assert_eq!(rules.next_transition(200), 200);
        assert_eq!(rules.previous_transition(100), 99);
        assert_eq!(rules.previous_transition(150), 99);
        assert_eq!(rules.previous_transition(99), 99);
        assert!(!rules.is_fixed());
    }

    #[test]
    fn empty_table_is_fixed() {
        let rules = TransitionRules::new(3_600_000, 0, vec![]).unwrap();
        assert!(rules.is_fixed());
        assert_eq!(rules.offset(0), 3_600_000);
        assert_eq!(rules.next_transition(7), 7);
    }
}
