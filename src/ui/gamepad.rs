/// Gamepad input through gilrs.
///
/// Button names for each action come from `[gamepad]` in config.toml.
/// Movement is always the D-pad or the left stick.
///
/// Without the `gamepad` feature this is an always-disconnected stub with
/// the same API.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
use log::info;

use ashgate::config::GamepadConfig;
use ashgate::domain::entity::FrameInput;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Held (continuous) plus just-pressed (edge) state.
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

impl BtnState {
    fn set(&mut self, held: bool) {
        if held && !self.held {
            self.just_pressed = true;
        }
        self.held = held;
    }
}

/// One direction, fed by both the D-pad and the stick.
#[derive(Clone, Copy, Debug, Default)]
struct DirState {
    dpad: BtnState,
    stick: BtnState,
}

impl DirState {
    fn held(&self) -> bool {
        self.dpad.held || self.stick.held
    }

    fn just_pressed(&self) -> bool {
        self.dpad.just_pressed || self.stick.just_pressed
    }

    fn clear_edges(&mut self) {
        self.dpad.just_pressed = false;
        self.stick.just_pressed = false;
    }
}

struct ActionMap {
    jump: Vec<Btn>,
    restart: Vec<Btn>,
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            jump: vec![Btn::A, Btn::B],
            restart: vec![Btn::Y],
            confirm: vec![Btn::Start, Btn::A],
            cancel: vec![Btn::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; BTN_COUNT],
    up: DirState,
    down: DirState,
    left: DirState,
    right: DirState,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick: (f32, f32),

    action_map: ActionMap,
    connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                log::warn!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        if connected {
            info!("gamepad connected");
        }

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs,
            buttons: [BtnState::default(); BTN_COUNT],
            up: DirState::default(),
            down: DirState::default(),
            left: DirState::default(),
            right: DirState::default(),
            stick: (0.0, 0.0),
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Apply the configured button names. Unknown names are skipped; an
    /// action whose list ends up empty keeps its default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn apply(target: &mut Vec<Btn>, names: &[String]) {
            let parsed: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if !parsed.is_empty() {
                *target = parsed;
            }
        }
        let map = &mut self.action_map;
        apply(&mut map.jump, &cfg.jump);
        apply(&mut map.restart, &cfg.restart);
        apply(&mut map.confirm, &cfg.confirm);
        apply(&mut map.cancel, &cfg.cancel);
    }

    /// Poll pending gamepad events. Call once per frame.
    pub fn update(&mut self) {
        for b in &mut self.buttons {
            b.just_pressed = false;
        }
        for d in [&mut self.up, &mut self.down, &mut self.left, &mut self.right] {
            d.clear_edges();
        }

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let Some(gilrs) = &mut self.gilrs else { return };
        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => self.set_button(btn, false),
                EventType::AxisChanged(Axis::LeftStickX, v, _) => self.stick.0 = v,
                EventType::AxisChanged(Axis::LeftStickY, v, _) => self.stick.1 = v,
                EventType::Connected => {
                    info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }

        let (x, y) = self.stick;
        self.left.stick.set(x < -STICK_DEADZONE);
        self.right.stick.set(x > STICK_DEADZONE);
        self.up.stick.set(y > STICK_DEADZONE);
        self.down.stick.set(y < -STICK_DEADZONE);
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, btn: Button, held: bool) {
        match btn {
            Button::DPadUp => self.up.dpad.set(held),
            Button::DPadDown => self.down.dpad.set(held),
            Button::DPadLeft => self.left.dpad.set(held),
            Button::DPadRight => self.right.dpad.set(held),
            other => {
                if let Some(b) = Btn::from_gilrs(other) {
                    self.buttons[b as usize].set(held);
                }
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn release_all(&mut self) {
        self.buttons = [BtnState::default(); BTN_COUNT];
        self.up = DirState::default();
        self.down = DirState::default();
        self.left = DirState::default();
        self.right = DirState::default();
        self.stick = (0.0, 0.0);
    }

    // ── Action queries ──

    fn any_held(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].held)
    }

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].just_pressed)
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.confirm)
    }

    pub fn cancel_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.cancel)
    }

    pub fn menu_up_pressed(&self) -> bool {
        self.up.just_pressed()
    }

    pub fn menu_down_pressed(&self) -> bool {
        self.down.just_pressed()
    }

    /// The gamepad's contribution to this frame's simulation input.
    pub fn frame_input(&self) -> FrameInput {
        if !self.connected {
            return FrameInput::default();
        }
        FrameInput {
            left: self.left.held(),
            right: self.right.held(),
            jump_pressed: self.any_just_pressed(&self.action_map.jump),
            jump_held: self.any_held(&self.action_map.jump),
            restart: self.any_just_pressed(&self.action_map.restart),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names() {
        assert_eq!(Btn::from_name("south"), Some(Btn::A));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("LT"), None);
    }

    #[test]
    fn edge_only_on_transition() {
        let mut s = BtnState::default();
        s.set(true);
        assert!(s.just_pressed && s.held);
        s.just_pressed = false;
        s.set(true);
        assert!(!s.just_pressed);
        s.set(false);
        assert!(!s.held);
    }

    #[test]
    fn config_overrides_defaults() {
        let mut pad = GamepadState::new();
        pad.load_button_config(&GamepadConfig {
            jump: vec!["X".into(), "bogus".into()],
            restart: vec!["bogus".into()],
            confirm: vec![],
            cancel: vec!["Start".into()],
        });
        assert_eq!(pad.action_map.jump, vec![Btn::X]);
        assert_eq!(pad.action_map.restart, vec![Btn::Y]);
        assert_eq!(pad.action_map.cancel, vec![Btn::Start]);

        pad.connected = true;
        pad.buttons[Btn::X as usize].set(true);
        let frame = pad.frame_input();
        assert!(frame.jump_pressed && frame.jump_held && !frame.restart);
    }
}
