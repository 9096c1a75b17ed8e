/// Level transitions: a fade timer plus the level it leads to.
///
/// The timer runs 0 → 1 while a switch is queued (exit animation) and
/// 1 → 0 otherwise (enter animation). The switch itself happens once the
/// exit animation has fully played. A queued target cannot be changed.

/// Timer change per tick.
pub const TIMER_STEP: f32 = 0.02;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneSwitch {
    timer: f32,
    next_level: Option<usize>,
}

impl SceneSwitch {
    pub fn new() -> Self {
        SceneSwitch::default()
    }

    pub fn tick(&mut self) {
        let dir = if self.next_level.is_some() { 1.0 } else { -1.0 };
        self.timer = (self.timer + dir * TIMER_STEP).clamp(0.0, 1.0);
    }

    /// Level to switch to, once the exit animation has finished.
    pub fn should_switch_to(&self) -> Option<usize> {
        self.next_level.filter(|_| self.timer >= 1.0)
    }

    /// Start the exit animation. Returns false if a switch is already queued.
    pub fn queue(&mut self, level: usize) -> bool {
        if self.next_level.is_some() {
            return false;
        }
        self.next_level = Some(level);
        true
    }

    /// Start the enter animation (fully covered, fading out).
    pub fn enter(&mut self) {
        self.timer = 1.0;
        self.next_level = None;
    }

    /// Cover fraction for renderers, 0 = clear, 1 = fully covered.
    pub fn coverage(&self) -> f32 {
        self.timer
    }
}
