/// WorldState: the complete snapshot of a running game.
///
/// ## Ownership
///
/// The world owns the grid and every body. Nothing else holds references
/// into it between ticks; spike siblings are plain indices (`SpikeGroups`).
/// The RNG lives here too and is handed to the corruption automaton
/// explicitly each tick.
///
/// ## Camera / Viewport
///
/// World coordinates and screen coordinates are separate:
///   - `camera`: viewport into the world in tile units (top-left + size)
///   - Renderer maps: `screen(sx, sy) = tile(camera.x + sx, camera.y + sy)`
///   - Camera follows the player with a dead-zone approach
///   - Maps smaller than the viewport are centered

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::domain::entity::{Gate, Lamp, Player, SpikeBlock};
use crate::domain::grid::{pixel_to_tile, Grid};
use crate::domain::physics::SpikeGroups;
use crate::sim::transition::SceneSwitch;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Playing,
    GameComplete,
}

/// Camera: a viewport into the world.
///
/// `(x, y)` is the tile coordinate of the top-left visible cell.
/// `(view_w, view_h)` is how many tiles fit in the viewport.
/// These are computed from terminal size and set during `render()`.
#[derive(Clone, Debug, Default)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
    pub view_w: i32,
    pub view_h: i32,
}

impl Camera {
    pub fn new() -> Self {
        Camera::default()
    }

    /// Follow a target tile with a dead zone (inner 60% of the viewport).
    pub fn follow(&mut self, target: IVec2, world: IVec2) {
        if self.view_w <= 0 || self.view_h <= 0 { return; }
        self.x = follow_axis(self.x, target.x, self.view_w, world.x);
        self.y = follow_axis(self.y, target.y, self.view_h, world.y);
    }

    /// Snap directly to center on a tile (no dead zone).
    /// Used on level load.
    pub fn center_on(&mut self, target: IVec2, world: IVec2) {
        if self.view_w <= 0 || self.view_h <= 0 { return; }
        self.x = center_axis(target.x, self.view_w, world.x);
        self.y = center_axis(target.y, self.view_h, world.y);
    }

    /// Convert a world tile to a viewport cell, if visible.
    pub fn world_to_view(&self, tile: IVec2) -> Option<(u16, u16)> {
        let vx = tile.x - self.x;
        let vy = tile.y - self.y;
        if vx >= 0 && vx < self.view_w && vy >= 0 && vy < self.view_h {
            Some((vx as u16, vy as u16))
        } else {
            None
        }
    }
}

fn follow_axis(cam: i32, target: i32, view: i32, world: i32) -> i32 {
    // Map fits: center it
    if world <= view {
        return -((view - world) / 2);
    }
    let margin = view / 5;
    let low = cam + margin;
    let high = cam + view - margin - 1;
    let cam = if target < low {
        target - margin
    } else if target > high {
        target - view + margin + 1
    } else {
        cam
    };
    cam.clamp(0, world - view)
}

fn center_axis(target: i32, view: i32, world: i32) -> i32 {
    if world <= view {
        return -((view - world) / 2);
    }
    (target - view / 2).clamp(0, world - view)
}

pub struct WorldState {
    // ── Level ──
    pub grid: Grid,
    pub current_level: usize,
    pub total_levels: usize,
    pub level_name: String,

    // ── Bodies ──
    pub player: Player,
    pub gate: Gate,
    pub lamps: Vec<Lamp>,
    /// Ordered lowest first (largest y), so stacks settle bottom-up.
    pub spikes: Vec<SpikeBlock>,
    pub spike_groups: SpikeGroups,

    // ── Simulation ──
    pub switch: SceneSwitch,
    pub rng: Pcg32,
    pub tick: u64,

    // ── Meta ──
    pub phase: Phase,
    pub paused: bool,
    /// Highest level reached, as saved in the progress file.
    pub best_level: usize,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
    pub camera: Camera,
    pub title_cursor: usize,
}

// ── Construction ──

impl WorldState {
    pub fn new(seed: u64) -> Self {
        WorldState {
            grid: Grid::new(1, 1),
            current_level: 0,
            total_levels: 0,
            level_name: String::new(),
            player: Player::default(),
            gate: Gate::default(),
            lamps: vec![],
            spikes: vec![],
            spike_groups: SpikeGroups::default(),
            switch: SceneSwitch::new(),
            rng: Pcg32::seed_from_u64(seed),
            tick: 0,
            phase: Phase::Title,
            paused: false,
            best_level: 0,
            message: String::new(),
            message_timer: 0,
            camera: Camera::new(),
            title_cursor: 0,
        }
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Count down the message; clears it when time runs out.
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }

    /// Tile the player is in.
    pub fn player_tile(&self) -> IVec2 {
        pixel_to_tile(self.player.pos())
    }

    /// Are all lamps lit? (Vacuously true for a lampless level.)
    pub fn all_lamps_lit(&self) -> bool {
        self.lamps.iter().all(|l| l.lit)
    }
}
