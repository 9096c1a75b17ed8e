/// Entities: Player, Lamp, Gate, SpikeBlock.
/// Each owns a `Motion` and hands it to the mover once per tick.
/// Timers are one-way: 0 = not started, then they only count up.

use glam::{IVec2, Vec2};

use super::mover::Motion;
use super::tile::TILE_SIZE;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Frame input: held controls plus edge-triggered presses.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    /// Jump went down this frame.
    pub jump_pressed: bool,
    /// Jump is held.
    pub jump_held: bool,
    pub restart: bool,
}

impl FrameInput {
    /// Horizontal control: -1, 0 or 1.
    pub fn horizontal(&self) -> i32 {
        self.right as i32 - self.left as i32
    }
}

#[derive(Clone, Debug, Default)]
pub struct Player {
    pub motion: Motion,
    /// Velocity one and two ticks ago (before this tick's control).
    pub prev_vel: Vec2,
    pub prev2_vel: Vec2,
    pub facing: Facing,
    pub ground: bool,
    pub prev_ground: bool,
    pub walk_timer: u32,
    pub death_timer: u32,
}

impl Player {
    pub fn new(pos: IVec2) -> Self {
        Player { motion: Motion::at(pos), ..Player::default() }
    }

    pub fn pos(&self) -> IVec2 {
        self.motion.pos
    }

    pub fn is_alive(&self) -> bool {
        self.death_timer == 0
    }

    /// Start the death latch. Returns false if already dead.
    pub fn kill(&mut self) -> bool {
        if self.death_timer > 0 {
            return false;
        }
        self.death_timer = 1;
        true
    }
}

#[derive(Clone, Debug, Default)]
pub struct Lamp {
    pub motion: Motion,
    pub lit: bool,
    /// Where the lamp was when it caught fire (start of the flame's trip to the gate).
    pub flame_pos: IVec2,
}

impl Lamp {
    pub fn new(pos: IVec2) -> Self {
        Lamp { motion: Motion::at(pos), ..Lamp::default() }
    }

    pub fn pos(&self) -> IVec2 {
        self.motion.pos
    }
}

#[derive(Clone, Debug, Default)]
pub struct Gate {
    pub motion: Motion,
    /// Starts when the last lamp is lit.
    pub ready_timer: u32,
    /// Starts when the player enters the ignited gate.
    pub finish_timer: u32,
}

impl Gate {
    pub fn new(pos: IVec2) -> Self {
        Gate { motion: Motion::at(pos), ..Gate::default() }
    }

    pub fn pos(&self) -> IVec2 {
        self.motion.pos
    }

    pub fn is_finished(&self) -> bool {
        self.finish_timer > 0
    }
}

/// A falling column of `height` spike tiles. `pos` is the center of the bottom tile.
#[derive(Clone, Debug)]
pub struct SpikeBlock {
    pub motion: Motion,
    pub height: i32,
    pub ground: bool,
    pub prev_ground: bool,
}

impl SpikeBlock {
    pub fn new(pos: IVec2, height: i32) -> Self {
        SpikeBlock {
            motion: Motion::at(pos),
            height: height.max(1),
            ground: true,
            prev_ground: true,
        }
    }

    pub fn pos(&self) -> IVec2 {
        self.motion.pos
    }

    /// Does the block cover this pixel?
    pub fn pixel_touches(&self, pixel: IVec2) -> bool {
        let half = TILE_SIZE / 2;
        let top_left = self.pos() - IVec2::new(half, half + (self.height - 1) * TILE_SIZE);
        let bottom_right = self.pos() + half;
        pixel.cmpge(top_left).all() && pixel.cmplt(bottom_right).all()
    }
}
