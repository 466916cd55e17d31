/// Terminal input collector.
///
/// Drains every pending crossterm event once per frame and keeps:
///   - key presses (Press and Repeat; Release is ignored)
///   - mouse button down/drag/up, used for drag-and-drop on the tray
///
/// Mouse reporting must be enabled by the renderer (`EnableMouseCapture`).

use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEventKind,
};

/// Left-button mouse gesture, in terminal cell coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pointer {
    Down { col: u16, row: u16 },
    Drag { col: u16, row: u16 },
    Up { col: u16, row: u16 },
}

pub struct InputState {
    /// Keys pressed during the most recent drain_events() call.
    presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier checks.
    pub raw_events: Vec<KeyEvent>,

    /// Mouse gestures, in arrival order.
    pub pointer: Vec<Pointer>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            pointer: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        self.raw_events.clear();
        self.pointer.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    self.raw_events.push(key);
                    self.presses.push(key.code);
                }
                Ok(Event::Mouse(m)) => {
                    let (col, row) = (m.column, m.row);
                    let gesture = match m.kind {
                        MouseEventKind::Down(MouseButton::Left) => Pointer::Down { col, row },
                        MouseEventKind::Drag(MouseButton::Left) => Pointer::Drag { col, row },
                        MouseEventKind::Up(MouseButton::Left) => Pointer::Up { col, row },
                        _ => continue,
                    };
                    self.pointer.push(gesture);
                }
                _ => {}
            }
        }
    }

    /// Was this key pressed this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.presses.contains(&code)
    }

    /// Convenience: was any of these keys pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
