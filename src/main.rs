/// Entry point and event loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use sim::event::GameEvent;
use sim::round;
use sim::world::{Phase, WorldState};
use ui::gamepad::{Dir, GamepadState};
use ui::input::{InputState, Pointer};
use ui::renderer::{self, Renderer};
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    init_logging(&config);

    let mut world = WorldState::from_config(&config);
    info!(
        min = world.limits.min,
        max = world.limits.max,
        seeded = config.round.seed.is_some(),
        "session starting"
    );

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Icon Order!");
    if world.game.is_game_won() {
        println!("Last round solved in {} attempts.", world.game.attempt_number());
    }
}

/// Install a file-backed tracing subscriber when `general.log_file` is set.
/// Stderr belongs to the alternate screen, so without a file nothing is logged.
fn init_logging(config: &GameConfig) {
    let Some(path) = &config.log_file else { return };
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not open log file {}: {e}", path.display());
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    info!(gamepad = gp.connected, "input ready");
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.display.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) {
            break;
        }

        let mut events = handle_keys(world, &kb, &gp);
        events.extend(handle_pointer(world, &kb.pointer));
        process_events(world, sound, &events);

        if last_tick.elapsed() >= tick_rate {
            world.tick();
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Toasts and sound cues for whatever the operations reported.
fn process_events(world: &mut WorldState, sound: Option<&SoundEngine>, events: &[GameEvent]) {
    for event in events {
        if let Some(notice) = event.notice() {
            let ticks = world.toast_ticks;
            world.set_message(notice, ticks);
        }
        let Some(sfx) = sound else { continue };
        match event {
            GameEvent::IconToggled { .. } => sfx.play_toggle(),
            GameEvent::SelectionRejected { .. } => sfx.play_reject(),
            GameEvent::ItemLifted { .. } => sfx.play_lift(),
            GameEvent::ItemDropped { .. } => sfx.play_drop(),
            GameEvent::GuessScored { correct, total, .. } if correct < total => {
                sfx.play_score(*correct, *total)
            }
            GameEvent::RoundWon { .. } => sfx.play_win(),
            _ => {}
        }
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_PICK: &[KeyCode] = &[KeyCode::Char(' ')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
const KEYS_CANCEL: &[KeyCode] = &[KeyCode::Esc];
const KEYS_NEW: &[KeyCode] = &[KeyCode::Char('n'), KeyCode::Char('N')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Cursor steps from keyboard and gamepad this frame, as (d_row, d_col).
fn nav_steps(kb: &InputState, gp: &GamepadState) -> Vec<(isize, isize)> {
    let mut steps = Vec::new();
    if kb.any_pressed(KEYS_UP) { steps.push((-1, 0)); }
    if kb.any_pressed(KEYS_DOWN) { steps.push((1, 0)); }
    if kb.any_pressed(KEYS_LEFT) { steps.push((0, -1)); }
    if kb.any_pressed(KEYS_RIGHT) { steps.push((0, 1)); }
    for d in gp.nav() {
        steps.push(match d {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        });
    }
    steps
}

fn handle_keys(world: &mut WorldState, kb: &InputState, gp: &GamepadState) -> Vec<GameEvent> {
    let pick = kb.any_pressed(KEYS_PICK) || gp.confirm_pressed();
    let confirm = kb.any_pressed(KEYS_CONFIRM) || gp.submit_pressed();
    let cancel = kb.any_pressed(KEYS_CANCEL) || gp.cancel_pressed();
    let new_game = kb.any_pressed(KEYS_NEW) || gp.new_game_pressed();

    let mut events = Vec::new();
    match world.phase() {
        // ── Selection grid ──
        Phase::Selecting => {
            for (dr, dc) in nav_steps(kb, gp) {
                round::move_select_cursor(world, dr, dc);
            }
            if pick {
                if let Some(icon) = world.cursor_icon() {
                    events.extend(round::toggle_icon(world, icon));
                }
            }
            if confirm {
                events.extend(round::start_round(world));
            }
        }

        // ── Tray (editable after a win; submit is gated in the controller) ──
        Phase::Guessing | Phase::Won => {
            for (_, dc) in nav_steps(kb, gp) {
                round::move_tray_cursor(world, dc);
            }
            if cancel {
                events.extend(round::cancel_move(world));
            }
            if pick {
                events.extend(round::pick_or_drop(world));
            }
            if confirm {
                events.extend(round::submit_guess(world));
            }
            if new_game {
                events.extend(round::reset_game(world));
            }
        }
    }
    events
}

/// Mouse: click toggles on the grid; press/release on the tray is a drag.
fn handle_pointer(world: &mut WorldState, gestures: &[Pointer]) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for &g in gestures {
        match world.phase() {
            Phase::Selecting => {
                if let Pointer::Down { col, row } = g {
                    if let Some(cell) = renderer::catalog_cell_at(col, row) {
                        world.select_cursor = cell;
                        if let Some(icon) = world.cursor_icon() {
                            events.extend(round::toggle_icon(world, icon));
                        }
                    }
                }
            }
            Phase::Guessing | Phase::Won => {
                let len = world.tray.len();
                match g {
                    Pointer::Down { col, row } => {
                        if let Some(slot) = renderer::tray_slot_at(col, row, len) {
                            world.tray_cursor = slot;
                            events.extend(round::begin_move(world, slot));
                        }
                    }
                    Pointer::Drag { col, row } => {
                        if let Some(slot) = renderer::tray_slot_at(col, row, len) {
                            world.tray_cursor = slot;
                        }
                    }
                    Pointer::Up { col, row } => {
                        if world.tray.dragging().is_none() {
                            continue;
                        }
                        match renderer::tray_slot_at(col, row, len) {
                            Some(slot) => {
                                world.tray_cursor = slot;
                                events.extend(round::complete_move(world, slot));
                            }
                            None => events.extend(round::cancel_move(world)),
                        }
                    }
                }
            }
        }
    }
    events
}
