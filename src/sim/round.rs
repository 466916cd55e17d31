/// Round operations: the only entry points that mutate a WorldState.
///
/// Every operation returns the events it produced. Index arguments coming
/// from the presentation layer are bounds-checked here; an out-of-range
/// index is dropped with a debug log rather than reaching the tray.

use tracing::{debug, info, warn};

use crate::domain::catalog::Icon;
use crate::error::GameError;
use super::event::GameEvent;
use super::world::WorldState;

// ══════════════════════════════════════════════════════════════
// Selection & round control
// ══════════════════════════════════════════════════════════════

pub fn toggle_icon(world: &mut WorldState, icon: Icon) -> Vec<GameEvent> {
    if !world.game.toggle_icon_selection(icon) {
        debug!(icon, "selection locked while a round is running");
        return vec![];
    }
    let selected = world.game.is_selected(icon);
    debug!(icon, selected, count = world.game.selected_icons().len(), "icon toggled");
    vec![GameEvent::IconToggled { icon, selected }]
}

pub fn start_round(world: &mut WorldState) -> Vec<GameEvent> {
    let WorldState { game, limits, shuffler, .. } = &mut *world;
    match game.start_round(limits, shuffler) {
        Ok(tray) => {
            world.tray = tray;
            world.tray_cursor = 0;
            world.clear_message();
            let icons = world.tray.len();
            info!(icons, "round started");
            vec![GameEvent::RoundStarted { icons }]
        }
        Err(GameError::SelectionRange { selected, min, max }) => {
            warn!(selected, min, max, "selection size out of range");
            vec![GameEvent::SelectionRejected { selected, min, max }]
        }
    }
}

pub fn submit_guess(world: &mut WorldState) -> Vec<GameEvent> {
    let total = world.game.target_order().len();
    if world.tray.len() != total {
        debug!(tray = world.tray.len(), total, "tray does not match the round");
        return vec![];
    }
    let Some(result) = world.game.submit_guess(world.tray.icons()) else {
        debug!("submission closed");
        return vec![];
    };
    let attempt = result.attempt_number;
    let correct = result.correct_count;
    info!(attempt, correct, total, "{result}");

    let mut events = vec![GameEvent::GuessScored { attempt, correct, total }];
    if world.game.is_game_won() {
        info!(attempts = attempt, "round won");
        events.push(GameEvent::RoundWon { attempts: attempt });
    }
    events
}

pub fn reset_game(world: &mut WorldState) -> Vec<GameEvent> {
    world.game.reset();
    world.tray = Default::default();
    world.tray_cursor = 0;
    world.select_cursor = (0, 0);
    world.clear_message();
    info!("game reset");
    vec![GameEvent::GameReset]
}

// ══════════════════════════════════════════════════════════════
// Tray editing (drag-and-drop)
// ══════════════════════════════════════════════════════════════

pub fn begin_move(world: &mut WorldState, source: usize) -> Vec<GameEvent> {
    if !world.tray.is_valid_index(source) {
        debug!(source, len = world.tray.len(), "begin_move out of range");
        return vec![];
    }
    world.tray.begin_move(source);
    debug!(source, "item lifted");
    vec![GameEvent::ItemLifted { index: source }]
}

pub fn complete_move(world: &mut WorldState, target: usize) -> Vec<GameEvent> {
    if !world.tray.is_valid_index(target) {
        debug!(target, len = world.tray.len(), "complete_move out of range");
        return vec![];
    }
    match world.tray.complete_move(target) {
        Some((from, to)) => {
            debug!(from, to, "item dropped");
            vec![GameEvent::ItemDropped { from, to }]
        }
        None => vec![],
    }
}

pub fn cancel_move(world: &mut WorldState) -> Vec<GameEvent> {
    match world.tray.cancel_move() {
        Some(index) => {
            debug!(index, "move cancelled");
            vec![GameEvent::MoveCancelled { index }]
        }
        None => vec![],
    }
}

/// Keyboard-style drag: lift the slot under the cursor, or drop onto it.
pub fn pick_or_drop(world: &mut WorldState) -> Vec<GameEvent> {
    let cursor = world.tray_cursor;
    if world.tray.dragging().is_some() {
        complete_move(world, cursor)
    } else {
        begin_move(world, cursor)
    }
}

// ══════════════════════════════════════════════════════════════
// Cursor movement
// ══════════════════════════════════════════════════════════════

pub fn move_tray_cursor(world: &mut WorldState, delta: isize) {
    if world.tray.is_empty() {
        return;
    }
    let len = world.tray.len();
    world.tray_cursor = (world.tray_cursor as isize + delta).clamp(0, len as isize - 1) as usize;
}

pub fn move_select_cursor(world: &mut WorldState, d_row: isize, d_col: isize) {
    use crate::domain::catalog::{self, ROW_LEN};
    let rows = catalog::rows() as isize;
    let (r, c) = world.select_cursor;
    let r = (r as isize + d_row).rem_euclid(rows) as usize;
    let c = (c as isize + d_col).rem_euclid(ROW_LEN as isize) as usize;
    if catalog::at(r, c).is_some() {
        world.select_cursor = (r, c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::SelectionLimits;
    use crate::domain::shuffle::Shuffler;
    use crate::domain::tray::GuessTray;
    use crate::sim::world::Phase;

    const DOG: Icon = "🐶";
    const CAT: Icon = "🐱";
    const PANDA: Icon = "🐼";
    const FOX: Icon = "🦊";

    fn world() -> WorldState {
        WorldState::new(SelectionLimits::default(), Shuffler::from_seed(42))
    }

    fn started(icons: &[Icon]) -> WorldState {
        let mut w = world();
        for &i in icons {
            toggle_icon(&mut w, i);
        }
        let events = start_round(&mut w);
        assert_eq!(events, vec![GameEvent::RoundStarted { icons: icons.len() }]);
        w
    }

    fn sorted(icons: &[Icon]) -> Vec<Icon> {
        let mut v = icons.to_vec();
        v.sort_unstable();
        v
    }

    #[test]
    fn toggle_reports_state() {
        let mut w = world();
        assert_eq!(toggle_icon(&mut w, DOG), vec![GameEvent::IconToggled { icon: DOG, selected: true }]);
        assert_eq!(toggle_icon(&mut w, DOG), vec![GameEvent::IconToggled { icon: DOG, selected: false }]);
    }

    #[test]
    fn toggle_silent_during_round() {
        let mut w = started(&[DOG, CAT, PANDA]);
        assert!(toggle_icon(&mut w, FOX).is_empty());
        assert_eq!(w.game.selected_icons().len(), 3);
    }

    #[test]
    fn start_rejected_with_two_icons() {
        let mut w = world();
        toggle_icon(&mut w, DOG);
        toggle_icon(&mut w, CAT);
        let events = start_round(&mut w);
        assert_eq!(events, vec![GameEvent::SelectionRejected { selected: 2, min: 3, max: 7 }]);
        assert_eq!(w.phase(), Phase::Selecting);
        assert!(w.tray.is_empty());
    }

    #[test]
    fn start_rejected_with_eight_icons() {
        let mut w = world();
        for &i in &crate::domain::catalog::ICONS[..8] {
            toggle_icon(&mut w, i);
        }
        let events = start_round(&mut w);
        assert!(matches!(events[0], GameEvent::SelectionRejected { selected: 8, .. }));
        assert!(!w.game.is_game_started());
    }

    #[test]
    fn started_tray_is_permutation_of_target() {
        let w = started(&[DOG, CAT, PANDA, FOX]);
        assert_eq!(sorted(w.tray.icons()), sorted(w.game.target_order()));
        assert_eq!(sorted(w.game.target_order()), sorted(&[DOG, CAT, PANDA, FOX]));
    }

    #[test]
    fn submit_winning_tray() {
        let mut w = started(&[DOG, CAT, PANDA]);
        w.tray = GuessTray::new(w.game.target_order().to_vec());
        let events = submit_guess(&mut w);
        assert_eq!(events, vec![
            GameEvent::GuessScored { attempt: 1, correct: 3, total: 3 },
            GameEvent::RoundWon { attempts: 1 },
        ]);
        assert_eq!(w.phase(), Phase::Won);
        // Submission is closed after the win
        assert!(submit_guess(&mut w).is_empty());
    }

    #[test]
    fn tray_still_editable_after_win() {
        let mut w = started(&[DOG, CAT, PANDA]);
        w.tray = GuessTray::new(w.game.target_order().to_vec());
        submit_guess(&mut w);
        assert!(!begin_move(&mut w, 0).is_empty());
        assert!(!complete_move(&mut w, 2).is_empty());
        assert!(w.game.is_game_won());
    }

    #[test]
    fn drag_gesture_reorders() {
        let mut w = started(&[DOG, CAT, PANDA, FOX]);
        w.tray = GuessTray::new(vec!["A", "B", "C", "D"]);
        assert_eq!(begin_move(&mut w, 0), vec![GameEvent::ItemLifted { index: 0 }]);
        assert_eq!(complete_move(&mut w, 2), vec![GameEvent::ItemDropped { from: 0, to: 2 }]);
        assert_eq!(w.tray.icons(), &["B", "C", "A", "D"]);
    }

    #[test]
    fn out_of_range_indices_ignored() {
        let mut w = started(&[DOG, CAT, PANDA]);
        let before = w.tray.clone();
        assert!(begin_move(&mut w, 3).is_empty());
        begin_move(&mut w, 0);
        assert!(complete_move(&mut w, 9).is_empty());
        // The drag is still live; a valid drop still works
        assert_eq!(w.tray.dragging(), Some(0));
        assert!(!complete_move(&mut w, 0).is_empty());
        assert_eq!(w.tray.icons(), before.icons());
    }

    #[test]
    fn cancel_reports_only_live_drags() {
        let mut w = started(&[DOG, CAT, PANDA]);
        assert!(cancel_move(&mut w).is_empty());
        begin_move(&mut w, 1);
        assert_eq!(cancel_move(&mut w), vec![GameEvent::MoveCancelled { index: 1 }]);
    }

    #[test]
    fn pick_or_drop_with_cursor() {
        let mut w = started(&[DOG, CAT, PANDA, FOX]);
        w.tray = GuessTray::new(vec!["A", "B", "C", "D"]);
        w.tray_cursor = 3;
        pick_or_drop(&mut w);
        move_tray_cursor(&mut w, -2);
        pick_or_drop(&mut w);
        assert_eq!(w.tray.icons(), &["A", "D", "B", "C"]);
    }

    #[test]
    fn tray_cursor_clamps() {
        let mut w = started(&[DOG, CAT, PANDA]);
        move_tray_cursor(&mut w, -5);
        assert_eq!(w.tray_cursor, 0);
        move_tray_cursor(&mut w, 10);
        assert_eq!(w.tray_cursor, 2);
    }

    #[test]
    fn select_cursor_wraps() {
        let mut w = world();
        move_select_cursor(&mut w, -1, -1);
        assert_eq!(w.select_cursor, (3, 7));
        move_select_cursor(&mut w, 1, 1);
        assert_eq!(w.select_cursor, (0, 0));
    }

    #[test]
    fn reset_from_any_state() {
        let mut w = started(&[DOG, CAT, PANDA]);
        submit_guess(&mut w);
        begin_move(&mut w, 1);
        assert_eq!(reset_game(&mut w), vec![GameEvent::GameReset]);
        assert_eq!(w.phase(), Phase::Selecting);
        assert!(w.game.selected_icons().is_empty());
        assert!(w.game.target_order().is_empty());
        assert!(w.game.guess_log().is_empty());
        assert_eq!(w.game.attempt_number(), 0);
        assert!(w.tray.is_empty());
        assert_eq!(w.tray.dragging(), None);
    }
}
