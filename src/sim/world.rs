/// WorldState: everything one widget instance owns.
///
/// Holds the single GameState + GuessTray pair, the RNG used for rounds,
/// and the presentation-side bits the renderer reads (cursors, toast, tick).
/// There is exactly one owner; all mutation goes through `sim::round`.

use crate::config::GameConfig;
use crate::domain::catalog::{self, Icon};
use crate::domain::rules::SelectionLimits;
use crate::domain::shuffle::Shuffler;
use crate::domain::tray::GuessTray;
use crate::sim::event::{Notice, NoticeLevel};
use crate::sim::state::GameState;

/// Screen-level phase, derived from the game flags.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Selecting,
    Guessing,
    Won,
}

pub struct WorldState {
    pub game: GameState,
    pub tray: GuessTray,
    pub limits: SelectionLimits,
    pub shuffler: Shuffler,

    /// Selection grid cursor (row, col).
    pub select_cursor: (usize, usize),
    /// Tray slot under the keyboard/gamepad cursor.
    pub tray_cursor: usize,

    pub message: String,
    pub message_level: NoticeLevel,
    pub message_timer: u32,
    pub toast_ticks: u32,
}

impl WorldState {
    pub fn new(limits: SelectionLimits, shuffler: Shuffler) -> Self {
        WorldState {
            game: GameState::new(),
            tray: GuessTray::default(),
            limits,
            shuffler,
            select_cursor: (0, 0),
            tray_cursor: 0,
            message: String::new(),
            message_level: NoticeLevel::Info,
            message_timer: 0,
            toast_ticks: 60,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let mut world = Self::new(config.round.limits, Shuffler::new(config.round.seed));
        world.toast_ticks = config.display.toast_ticks;
        world
    }

    pub fn phase(&self) -> Phase {
        if !self.game.is_game_started() {
            Phase::Selecting
        } else if self.game.is_game_won() {
            Phase::Won
        } else {
            Phase::Guessing
        }
    }

    /// Icon under the selection cursor.
    pub fn cursor_icon(&self) -> Option<Icon> {
        catalog::at(self.select_cursor.0, self.select_cursor.1)
    }

    /// Show a toast. A zero duration keeps it until replaced.
    pub fn set_message(&mut self, notice: Notice, ticks: u32) {
        self.message = notice.text;
        self.message_level = notice.level;
        self.message_timer = ticks;
    }

    pub fn clear_message(&mut self) {
        self.message.clear();
        self.message_timer = 0;
    }

    /// Advance the UI clock by one tick and expire the toast.
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> WorldState {
        WorldState::new(SelectionLimits::default(), Shuffler::from_seed(0))
    }

    #[test]
    fn phase_follows_game_flags() {
        let mut w = world();
        assert_eq!(w.phase(), Phase::Selecting);
        for &icon in &catalog::ICONS[..3] {
            w.game.toggle_icon_selection(icon);
        }
        let target = {
            let WorldState { game, limits, shuffler, .. } = &mut w;
            game.start_round(limits, shuffler).expect("valid");
            game.target_order().to_vec()
        };
        assert_eq!(w.phase(), Phase::Guessing);
        w.game.submit_guess(&target);
        assert_eq!(w.phase(), Phase::Won);
    }

    #[test]
    fn toast_expires() {
        let mut w = world();
        w.set_message(Notice { level: NoticeLevel::Info, text: "hi".into() }, 2);
        w.tick();
        assert_eq!(w.message, "hi");
        w.tick();
        assert!(w.message.is_empty());
    }

    #[test]
    fn sticky_toast_survives_ticks() {
        let mut w = world();
        w.set_message(Notice { level: NoticeLevel::Warning, text: "stay".into() }, 0);
        for _ in 0..100 {
            w.tick();
        }
        assert_eq!(w.message, "stay");
    }

    #[test]
    fn cursor_icon_reads_catalog() {
        let mut w = world();
        w.select_cursor = (2, 3);
        assert_eq!(w.cursor_icon(), Some("🎮"));
    }
}
