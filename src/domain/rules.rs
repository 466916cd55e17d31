/// Round rules: how many icons a round may use, and how a guess is scored.
///
/// Scoring is purely positional: slot `i` counts when `guess[i] == target[i]`.
/// Nothing here knows about game phases; callers decide when to ask.

use crate::domain::catalog::{self, Icon};
use crate::error::GameError;

pub const DEFAULT_MIN_ICONS: usize = 3;
pub const DEFAULT_MAX_ICONS: usize = 7;

/// Inclusive bounds on the selection size.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SelectionLimits {
    pub min: usize,
    pub max: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        SelectionLimits { min: DEFAULT_MIN_ICONS, max: DEFAULT_MAX_ICONS }
    }
}

impl SelectionLimits {
    /// Limits that can actually be satisfied from the catalog.
    pub fn is_sane(&self) -> bool {
        self.min >= 1 && self.min <= self.max && self.max <= catalog::ICONS.len()
    }

    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }

    pub fn validate(&self, count: usize) -> Result<(), GameError> {
        if self.contains(count) {
            Ok(())
        } else {
            Err(GameError::SelectionRange { selected: count, min: self.min, max: self.max })
        }
    }
}

/// Number of slots whose icon matches the target at the same index.
pub fn score(guess: &[Icon], target: &[Icon]) -> usize {
    guess.iter().zip(target).filter(|(g, t)| g == t).count()
}

/// A guess solves the round when every slot matches.
pub fn is_solved(guess: &[Icon], target: &[Icon]) -> bool {
    guess.len() == target.len() && score(guess, target) == target.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOG: Icon = "🐶";
    const CAT: Icon = "🐱";
    const PANDA: Icon = "🐼";

    #[test]
    fn default_limits() {
        let l = SelectionLimits::default();
        assert!(!l.contains(2));
        assert!(l.contains(3));
        assert!(l.contains(7));
        assert!(!l.contains(8));
        assert!(l.is_sane());
    }

    #[test]
    fn validate_reports_bounds() {
        let l = SelectionLimits::default();
        assert!(l.validate(5).is_ok());
        match l.validate(1) {
            Err(GameError::SelectionRange { selected, min, max }) => {
                assert_eq!((selected, min, max), (1, 3, 7));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(l.validate(9).is_err());
    }

    #[test]
    fn insane_limits() {
        assert!(!SelectionLimits { min: 0, max: 4 }.is_sane());
        assert!(!SelectionLimits { min: 5, max: 4 }.is_sane());
        assert!(!SelectionLimits { min: 3, max: 33 }.is_sane());
    }

    #[test]
    fn score_exact_match() {
        let target = [PANDA, DOG, CAT];
        assert_eq!(score(&[PANDA, DOG, CAT], &target), 3);
        assert!(is_solved(&[PANDA, DOG, CAT], &target));
    }

    #[test]
    fn score_partial() {
        let target = [PANDA, DOG, CAT];
        assert_eq!(score(&[DOG, PANDA, CAT], &target), 1);
        assert!(!is_solved(&[DOG, PANDA, CAT], &target));
    }

    #[test]
    fn score_none() {
        let target = [PANDA, DOG, CAT];
        assert_eq!(score(&[DOG, CAT, PANDA], &target), 0);
    }

    #[test]
    fn score_counts_per_index_with_duplicates() {
        let target = [DOG, DOG, CAT];
        assert_eq!(score(&[DOG, CAT, DOG], &target), 1);
        assert_eq!(score(&[DOG, DOG, CAT], &target), 3);
    }

    #[test]
    fn short_guess_never_solves() {
        let target = [PANDA, DOG, CAT];
        assert!(!is_solved(&[PANDA, DOG], &target));
    }
}
