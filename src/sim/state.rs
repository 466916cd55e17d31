/// GameState: the selection, the hidden order and the attempt log of one round.
///
/// Invariants kept by the methods below:
///   - `target_order` is a permutation of `selected_icons` once a round starts
///   - `guess_log.len() == attempt_number`
///   - `is_game_won` only goes false → true, except through `reset` / `start_round`
///   - the selection only changes while no round is started

use std::fmt;

use crate::domain::catalog::Icon;
use crate::domain::rules::{self, SelectionLimits};
use crate::domain::shuffle::Shuffler;
use crate::domain::tray::GuessTray;
use crate::error::GameError;

/// One submission, frozen at the time it was scored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessResult {
    pub guess: Vec<Icon>,
    pub correct_count: usize,
    pub attempt_number: u32,
}

impl fmt::Display for GuessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Guess {}: {} - {} correct",
            self.attempt_number,
            self.guess.join(" "),
            self.correct_count,
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameState {
    selected_icons: Vec<Icon>,
    target_order: Vec<Icon>,
    /// Newest first.
    guess_log: Vec<GuessResult>,
    attempt_number: u32,
    is_game_started: bool,
    is_game_won: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_icons(&self) -> &[Icon] {
        &self.selected_icons
    }

    pub fn is_selected(&self, icon: &str) -> bool {
        self.selected_icons.iter().any(|i| *i == icon)
    }

    pub fn target_order(&self) -> &[Icon] {
        &self.target_order
    }

    pub fn guess_log(&self) -> &[GuessResult] {
        &self.guess_log
    }

    pub fn attempt_number(&self) -> u32 {
        self.attempt_number
    }

    pub fn is_game_started(&self) -> bool {
        self.is_game_started
    }

    pub fn is_game_won(&self) -> bool {
        self.is_game_won
    }

    /// Whether a submission would be accepted right now.
    pub fn can_submit(&self) -> bool {
        self.is_game_started && !self.is_game_won
    }

    /// Add the icon if absent, remove it if present. Selection order is kept.
    /// Ignored once a round has started; returns whether the selection changed.
    pub fn toggle_icon_selection(&mut self, icon: Icon) -> bool {
        if self.is_game_started {
            return false;
        }
        match self.selected_icons.iter().position(|i| *i == icon) {
            Some(pos) => {
                self.selected_icons.remove(pos);
            }
            None => self.selected_icons.push(icon),
        }
        true
    }

    /// Validate the selection size, fix a hidden order and hand back the
    /// starting tray (an independent shuffle of the same icons).
    /// On error nothing changes.
    pub fn start_round(
        &mut self,
        limits: &SelectionLimits,
        shuffler: &mut Shuffler,
    ) -> Result<GuessTray, GameError> {
        limits.validate(self.selected_icons.len())?;

        self.target_order = shuffler.shuffled(&self.selected_icons);
        self.is_game_started = true;
        self.attempt_number = 0;
        self.guess_log.clear();
        self.is_game_won = false;

        Ok(GuessTray::new(shuffler.shuffled(&self.target_order)))
    }

    /// Score the guess, log it at the front and update the win flag.
    /// Returns `None` (and changes nothing) when submission is closed.
    pub fn submit_guess(&mut self, guess: &[Icon]) -> Option<&GuessResult> {
        if !self.can_submit() {
            return None;
        }
        debug_assert_eq!(guess.len(), self.target_order.len());

        let correct_count = rules::score(guess, &self.target_order);
        self.attempt_number += 1;
        self.guess_log.insert(0, GuessResult {
            guess: guess.to_vec(),
            correct_count,
            attempt_number: self.attempt_number,
        });
        if rules::is_solved(guess, &self.target_order) {
            self.is_game_won = true;
        }
        self.guess_log.first()
    }

    /// Back to the initial empty state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
