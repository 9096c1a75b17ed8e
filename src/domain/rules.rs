/// Body rules: tuning constants, player control, proximity triggers.
///
/// Pure functions over entity state. They decide velocities and report
/// what happened; the step pipeline turns reports into events.
///
/// ## Player Control Table
///
/// ┌──────────────────────────────────────┬──────────────────────────────┐
/// │ Condition                             │ Effect                       │
/// ├──────────────────────────────────────┼──────────────────────────────┤
/// │ horizontal input h ≠ 0 (can control)  │ vel.x += 0.4·h, |vel.x| ≤ 1.5│
/// │ no horizontal input, on ground        │ vel.x → 0 by 0.4             │
/// │ no horizontal input, in air           │ vel.x → 0 by 0.3             │
/// │ ground, can control, jump pressed     │ vel.y = -3.5, Jumped         │
/// │ in air, rising, jump not held         │ vel.y += 0.25                │
/// │ ground, !prev_ground, prev2.y ≥ 1.5   │ Landed                       │
/// └──────────────────────────────────────┴──────────────────────────────┘
///
/// "Can control" = alive and the gate is not entered.

use glam::IVec2;

use super::entity::{Facing, FrameInput, Player};
use super::tile::TILE_SIZE;

// ── Tuning ──

pub const GRAVITY: f32 = 0.1;
pub const EXTRA_GRAVITY_TO_STOP_JUMP: f32 = 0.25;
pub const WALK_SPEED: f32 = 1.5;
pub const WALK_ACC: f32 = 0.4;
pub const WALK_DEC: f32 = 0.4;
pub const WALK_DEC_AIR: f32 = 0.3;
pub const JUMP_SPEED: f32 = 3.5;
pub const MIN_LANDING_VEL: f32 = 1.5;

pub const DEATH_ANIM_LEN: u32 = 20;
/// Death timer value past which the level restarts.
pub const RESTART_DELAY: u32 = 60;

pub const LAMP_HITBOX_HALF_X: i32 = 6;
pub const LAMP_HITBOX_HALF_Y_UP: i32 = 2;
pub const LAMP_HITBOX_HALF_Y_DOWN: i32 = 10;

pub const GATE_ANIM_DELAY: u32 = 30;
pub const GATE_ANIM_LEN: u32 = 90;
pub const GATE_HITBOX_HALF: i32 = 6;
pub const GATE_FINISH_ANIM_LEN: u32 = 120;
pub const GATE_TRANSITION_DELAY: u32 = 60;
pub const GATE_CENTER_OFFSET: IVec2 = IVec2::new(0, -6);

// ── Player control ──

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlOutcome {
    pub jumped: bool,
    pub landed: bool,
}

/// Apply one tick of walking and jumping. Expects `ground`, `prev_ground`
/// and the velocity history to be up to date for this tick.
pub fn control_player(player: &mut Player, input: &FrameInput, can_control: bool) -> ControlOutcome {
    let mut out = ControlOutcome::default();
    let vel = &mut player.motion.vel;

    let h = if can_control { input.horizontal() } else { 0 };
    if h != 0 {
        vel.x = (vel.x + WALK_ACC * h as f32).clamp(-WALK_SPEED, WALK_SPEED);
        player.facing = if h < 0 { Facing::Left } else { Facing::Right };
        player.walk_timer += 1;
    } else {
        player.walk_timer = 0;
        let dec = if player.ground { WALK_DEC } else { WALK_DEC_AIR };
        if vel.x.abs() <= dec {
            vel.x = 0.0;
        } else {
            vel.x -= vel.x.signum() * dec;
        }
    }

    if player.ground && can_control && input.jump_pressed {
        vel.y = -JUMP_SPEED;
        out.jumped = true;
    }
    if !player.ground && vel.y < 0.0 && !input.jump_held {
        vel.y += EXTRA_GRAVITY_TO_STOP_JUMP;
    }
    if player.ground && !player.prev_ground && player.prev2_vel.y >= MIN_LANDING_VEL {
        out.landed = true;
    }
    out
}

// ── Map edges ──

/// Left, right or bottom edge crossed by more than half a tile.
/// The top edge is open.
pub fn fell_off_map(pos: IVec2, pixel_size: IVec2) -> bool {
    let margin = TILE_SIZE / 2;
    pos.cmpge(pixel_size + margin).any() || pos.x < -margin
}

// ── Proximity ──

pub fn lamp_in_reach(lamp_pos: IVec2, player_pos: IVec2) -> bool {
    let d = lamp_pos - player_pos;
    d.x.abs() <= LAMP_HITBOX_HALF_X && d.y >= -LAMP_HITBOX_HALF_Y_DOWN && d.y <= LAMP_HITBOX_HALF_Y_UP
}

pub fn gate_in_reach(gate_pos: IVec2, player_pos: IVec2) -> bool {
    let d = (player_pos - gate_pos).abs();
    d.x <= GATE_HITBOX_HALF && d.y <= GATE_HITBOX_HALF
}

/// The gate accepts the player once the ignition animation is over.
pub fn gate_is_open(ready_timer: u32) -> bool {
    ready_timer > GATE_ANIM_DELAY + GATE_ANIM_LEN
}

/// How far the lamp flames have traveled toward the gate, 0..=1.
pub fn flame_progress(ready_timer: u32) -> f32 {
    (ready_timer.saturating_sub(GATE_ANIM_DELAY) as f32 / GATE_ANIM_LEN as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn grounded() -> Player {
        let mut p = Player::new(IVec2::ZERO);
        p.ground = true;
        p.prev_ground = true;
        p
    }

    fn input(left: bool, right: bool, jump_pressed: bool, jump_held: bool) -> FrameInput {
        FrameInput { left, right, jump_pressed, jump_held, restart: false }
    }

    #[test]
    fn walk_accelerates_to_cap() {
        let mut p = grounded();
        let right = input(false, true, false, false);
        for _ in 0..10 {
            control_player(&mut p, &right, true);
        }
        assert_eq!(p.motion.vel.x, WALK_SPEED);
        assert_eq!(p.walk_timer, 10);
        assert_eq!(p.facing, Facing::Right);
    }

    #[test]
    fn release_decelerates_slower_in_air() {
        let idle = FrameInput::default();

        let mut p = grounded();
        p.motion.vel.x = 1.0;
        control_player(&mut p, &idle, true);
        assert!((p.motion.vel.x - 0.6).abs() < 1e-6);
        assert_eq!(p.walk_timer, 0);

        let mut p = Player::new(IVec2::ZERO);
        p.motion.vel.x = -1.0;
        control_player(&mut p, &idle, true);
        assert!((p.motion.vel.x + 0.7).abs() < 1e-6);

        p.motion.vel.x = 0.2;
        control_player(&mut p, &idle, true);
        assert_eq!(p.motion.vel.x, 0.0);
    }

    #[test]
    fn jump_needs_ground_and_control() {
        let jump = input(false, false, true, true);

        let mut p = grounded();
        let out = control_player(&mut p, &jump, true);
        assert!(out.jumped);
        assert_eq!(p.motion.vel.y, -JUMP_SPEED);

        let mut p = grounded();
        assert!(!control_player(&mut p, &jump, false).jumped);

        let mut p = Player::new(IVec2::ZERO);
        assert!(!control_player(&mut p, &jump, true).jumped);
    }

    #[test]
    fn releasing_jump_cuts_ascent() {
        let mut p = Player::new(IVec2::ZERO);
        p.motion.vel.y = -2.0;
        control_player(&mut p, &input(false, false, false, true), true);
        assert_eq!(p.motion.vel.y, -2.0);
        control_player(&mut p, &FrameInput::default(), true);
        assert_eq!(p.motion.vel.y, -1.75);
    }

    #[test]
    fn landing_uses_velocity_from_two_ticks_ago() {
        let mut p = grounded();
        p.prev_ground = false;
        p.prev2_vel = Vec2::new(0.0, 1.5);
        assert!(control_player(&mut p, &FrameInput::default(), true).landed);

        let mut p = grounded();
        p.prev_ground = false;
        p.prev2_vel = Vec2::new(0.0, 1.4);
        assert!(!control_player(&mut p, &FrameInput::default(), true).landed);
    }

    #[test]
    fn map_edges() {
        let size = IVec2::new(120, 60);
        assert!(!fell_off_map(IVec2::new(-6, 30), size));
        assert!(fell_off_map(IVec2::new(-7, 30), size));
        assert!(fell_off_map(IVec2::new(126, 30), size));
        assert!(fell_off_map(IVec2::new(60, 66), size));
        assert!(!fell_off_map(IVec2::new(60, -500), size));
    }

    #[test]
    fn lamp_reach_is_asymmetric() {
        let lamp = IVec2::new(100, 100);
        assert!(lamp_in_reach(lamp, IVec2::new(106, 110)));
        assert!(!lamp_in_reach(lamp, IVec2::new(107, 100)));
        assert!(!lamp_in_reach(lamp, IVec2::new(100, 111)));
        assert!(lamp_in_reach(lamp, IVec2::new(100, 98)));
        assert!(!lamp_in_reach(lamp, IVec2::new(100, 97)));
    }

    #[test]
    fn gate_opens_after_animation() {
        assert!(!gate_is_open(GATE_ANIM_DELAY + GATE_ANIM_LEN));
        assert!(gate_is_open(GATE_ANIM_DELAY + GATE_ANIM_LEN + 1));
        assert_eq!(flame_progress(10), 0.0);
        assert_eq!(flame_progress(1000), 1.0);
        assert!(gate_in_reach(IVec2::ZERO, IVec2::new(6, -6)));
        assert!(!gate_in_reach(IVec2::ZERO, IVec2::new(7, 0)));
    }
}
