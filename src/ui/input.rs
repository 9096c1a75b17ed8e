/// Keyboard input: held keys, fresh presses, and the action table.
///
/// Movement and jump-height control need "is the key still down?", while
/// jump start, restart and menu navigation need "was it pressed this
/// frame?". Both come from the same per-frame drain of crossterm events.
///
/// Terminals without the keyboard enhancement protocol never report key
/// releases, so a key counts as released once no Press/Repeat event has
/// arrived for `HOLD_TIMEOUT`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use ashgate::domain::entity::FrameInput;

const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

// ── Action table ──

pub const LEFT_KEYS: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const RIGHT_KEYS: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const JUMP_KEYS: &[KeyCode] = &[
    KeyCode::Char('z'), KeyCode::Char('Z'),
    KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W'),
    KeyCode::Char(' '),
];
pub const RESTART_KEYS: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
pub const QUIT_KEYS: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];
pub const PAUSE_KEYS: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P')];
pub const CONFIRM_KEYS: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' '), KeyCode::Char('z'), KeyCode::Char('Z')];
pub const MENU_UP_KEYS: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
pub const MENU_DOWN_KEYS: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];

pub struct InputState {
    last_active: HashMap<KeyCode, Instant>,
    /// Keys that went from released to held during the last drain.
    fresh_presses: Vec<KeyCode>,
    pub raw_events: Vec<KeyEvent>,
    /// Set when the terminal confirmed it reports Release events.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.apply(key, Instant::now());
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn apply(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {}
            _ => {
                if !self.is_held_at(key.code, now) {
                    self.fresh_presses.push(key.code);
                }
                self.last_active.insert(key.code, now);
            }
        }
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        let now = Instant::now();
        codes.iter().any(|c| self.is_held_at(*c, now))
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C'))
        })
    }

    pub fn esc_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| k.code == KeyCode::Esc && k.kind != KeyEventKind::Release)
    }

    /// The keyboard's contribution to this frame's simulation input.
    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            left: self.any_held(LEFT_KEYS),
            right: self.any_held(RIGHT_KEYS),
            jump_pressed: self.any_pressed(JUMP_KEYS),
            jump_held: self.any_held(JUMP_KEYS),
            restart: self.any_pressed(RESTART_KEYS),
        }
    }

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .is_some_and(|t| now.duration_since(*t) < HOLD_TIMEOUT)
    }
}
