/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Move cursor
///   A                     →  Toggle icon / pick up / drop
///   B                     →  Cancel drag
///   Start                 →  Start round / submit guess
///   Select                →  New game

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Cursor direction, from D-pad or stick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    submit: Vec<Btn>,
    new_game: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm:  vec![Btn::A],
            cancel:   vec![Btn::B],
            submit:   vec![Btn::Start],
            new_game: vec![Btn::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Buttons that went down since the last update().
    pressed: Vec<Btn>,
    /// Directions that went active since the last update().
    nav: Vec<Dir>,

    /// Stick direction currently held, for edge detection.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_dir: Option<Dir>,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_x: f32,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,

    action_map: ActionMap,
    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(_) => (None, false),
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            pressed: Vec::with_capacity(4),
            nav: Vec::with_capacity(4),
            stick_dir: None,
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let map = &mut self.action_map;
        let cf = parse_list(&cfg.confirm);
        if !cf.is_empty() { map.confirm = cf; }
        let ca = parse_list(&cfg.cancel);
        if !ca.is_empty() { map.cancel = ca; }
        let sb = parse_list(&cfg.submit);
        if !sb.is_empty() { map.submit = sb; }
        let ng = parse_list(&cfg.new_game);
        if !ng.is_empty() { map.new_game = ng; }
    }

    pub fn update(&mut self) {
        self.pressed.clear();
        self.nav.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.press(btn);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => { self.connected = true; }
                EventType::Disconnected => {
                    self.connected = false;
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                    self.stick_dir = None;
                }
                _ => {}
            }
        }

        // Stick acts like a D-pad: one step per deflection
        let dir = if self.stick_x < -STICK_DEADZONE {
            Some(Dir::Left)
        } else if self.stick_x > STICK_DEADZONE {
            Some(Dir::Right)
        } else if self.stick_y > STICK_DEADZONE {
            Some(Dir::Up)
        } else if self.stick_y < -STICK_DEADZONE {
            Some(Dir::Down)
        } else {
            None
        };
        if dir != self.stick_dir {
            if let Some(d) = dir {
                self.nav.push(d);
            }
            self.stick_dir = dir;
        }
    }

    #[cfg(feature = "gamepad")]
    fn press(&mut self, gilrs_btn: Button) {
        // D-pad handled separately (not in Btn enum)
        let dir = match gilrs_btn {
            Button::DPadUp    => Some(Dir::Up),
            Button::DPadDown  => Some(Dir::Down),
            Button::DPadLeft  => Some(Dir::Left),
            Button::DPadRight => Some(Dir::Right),
            _ => None,
        };
        if let Some(d) = dir {
            self.nav.push(d);
            return;
        }
        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.pressed.push(btn);
        }
    }

    // ── Action queries (config-driven) ──

    fn any_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|b| self.pressed.contains(b))
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_pressed(&self.action_map.confirm)
    }
    pub fn cancel_pressed(&self) -> bool {
        self.any_pressed(&self.action_map.cancel)
    }
    pub fn submit_pressed(&self) -> bool {
        self.any_pressed(&self.action_map.submit)
    }
    pub fn new_game_pressed(&self) -> bool {
        self.any_pressed(&self.action_map.new_game)
    }

    /// Cursor steps requested this frame.
    pub fn nav(&self) -> &[Dir] {
        &self.nav
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names_parse() {
        assert_eq!(Btn::from_name("a"), Some(Btn::A));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("rb"), Some(Btn::R1));
        assert_eq!(Btn::from_name("Z"), None);
    }

    #[test]
    fn config_overrides_mapping() {
        let mut gp = GamepadState::new();
        gp.load_button_config(&GamepadConfig {
            confirm: vec!["X".into()],
            cancel: vec!["nonsense".into()],
            submit: vec!["R1".into(), "Start".into()],
            new_game: vec![],
        });
        assert_eq!(gp.action_map.confirm, vec![Btn::X]);
        // Unparseable or empty lists keep the defaults
        assert_eq!(gp.action_map.cancel, vec![Btn::B]);
        assert_eq!(gp.action_map.submit, vec![Btn::R1, Btn::Start]);
        assert_eq!(gp.action_map.new_game, vec![Btn::Select]);
    }

    #[test]
    fn presses_map_to_actions() {
        let mut gp = GamepadState::new();
        gp.pressed.push(Btn::Start);
        assert!(gp.submit_pressed());
        assert!(!gp.confirm_pressed());
        gp.update();
        assert!(!gp.submit_pressed());
    }

    #[test]
    #[cfg(not(feature = "gamepad"))]
    fn stub_reports_no_pad_and_no_nav() {
        let mut gp = GamepadState::new();
        gp.update();
        assert!(!gp.connected);
        assert!(gp.nav().is_empty());
    }
}
