/// Discrete mover: the one motion integrator every body goes through.
///
/// Velocity is continuous, position is whole pixels. Each tick the
/// (clamped) velocity plus the carried-over lag is rounded to a pixel
/// step, and the remainder becomes the new lag. The step is then walked
/// one pixel at a time, alternating axes, asking the body's solidity
/// predicate before every pixel. A body can't tunnel, and position
/// carries no float error; only the bounded lag term does.

use glam::{IVec2, Vec2};

/// Motion state owned by a body. The mover borrows it for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Motion {
    pub pos: IVec2,
    pub vel: Vec2,
    pub lag: Vec2,
}

impl Motion {
    pub fn at(pos: IVec2) -> Self {
        Motion { pos, ..Motion::default() }
    }
}

/// Per-body integration limits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limits {
    /// Max upward speed (vertical velocity is clamped to `-up..=down`).
    pub up: f32,
    /// Max downward speed.
    pub down: f32,
    /// Lag decays toward zero by this much each tick.
    pub lag_decay: f32,
}

impl Default for Limits {
    fn default() -> Self {
        Limits { up: 2.5, down: 3.5, lag_decay: 0.05 }
    }
}

/// Directions that were blocked during one integration call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blocked {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Blocked {
    fn mark(&mut self, axis: usize, sign: i32) {
        match (axis, sign > 0) {
            (0, false) => self.left = true,
            (0, true) => self.right = true,
            (_, false) => self.up = true,
            (_, true) => self.down = true,
        }
    }

    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// Integrate one tick of motion.
///
/// `solid_at(pos, offset)` answers whether the body, sitting at `pos`,
/// would overlap solid geometry after moving by `offset`.
pub fn integrate<F>(motion: &mut Motion, limits: &Limits, mut solid_at: F) -> Blocked
where
    F: FnMut(IVec2, IVec2) -> bool,
{
    let mut blocked = Blocked::default();

    let mut clamped = motion.vel;
    clamped.y = clamped.y.clamp(-limits.up, limits.down);

    let eff = clamped + motion.lag;
    let mut step = eff.round().as_ivec2();
    motion.lag = eff - step.as_vec2();

    for i in 0..2 {
        if motion.lag[i].abs() > limits.lag_decay {
            motion.lag[i] -= motion.lag[i].signum() * limits.lag_decay;
        } else {
            motion.lag[i] = 0.0;
        }
    }

    while step != IVec2::ZERO {
        for i in 0..2 {
            if step[i] == 0 {
                continue;
            }
            let s = step[i].signum();
            let mut offset = IVec2::ZERO;
            offset[i] = s;

            if !solid_at(motion.pos, offset) {
                motion.pos[i] += s;
                step[i] -= s;
            } else {
                step[i] = 0;
                blocked.mark(i, s);
                // Pushing into the wall stops dead; an opposite velocity is kept.
                let pushing = motion.vel[i] * s as f32 > 0.0;
                if pushing {
                    motion.vel[i] = 0.0;
                }
                if motion.lag[i] * s as f32 > 0.0 {
                    motion.lag[i] = 0.0;
                }
            }
        }
    }

    blocked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(_: IVec2, _: IVec2) -> bool {
        false
    }

    /// Solid for every x >= `wall_x` (a point body).
    fn wall_at(wall_x: i32) -> impl Fn(IVec2, IVec2) -> bool {
        move |pos, offset| (pos + offset).x >= wall_x
    }

    #[test]
    fn zero_velocity_never_moves() {
        let mut m = Motion::at(IVec2::new(5, 7));
        for _ in 0..1000 {
            let b = integrate(&mut m, &Limits::default(), open);
            assert!(!b.any());
        }
        assert_eq!(m.pos, IVec2::new(5, 7));
        assert_eq!(m.lag, Vec2::ZERO);
    }

    #[test]
    fn stops_adjacent_to_wall() {
        let mut m = Motion::at(IVec2::new(0, 0));
        m.vel = Vec2::new(3.5, 0.0);
        let b = integrate(&mut m, &Limits::default(), wall_at(2));
        assert_eq!(m.pos, IVec2::new(1, 0));
        assert!(b.right);
        assert_eq!(m.vel.x, 0.0);
        // Rounding 3.5 up leaves -0.5, decayed to -0.45; it points away from the wall.
        assert!((m.lag.x + 0.45).abs() < 1e-5);
    }

    #[test]
    fn lag_away_from_wall_survives_a_block() {
        let mut m = Motion::at(IVec2::new(0, 0));
        m.vel = Vec2::new(1.6, 0.0);
        let b = integrate(&mut m, &Limits::default(), wall_at(2));
        // Two pixels requested, one taken; the -0.4 remainder decays to -0.35.
        assert!(b.right);
        assert_eq!(m.pos, IVec2::new(1, 0));
        assert_eq!(m.vel.x, 0.0);
        assert!((m.lag.x + 0.35).abs() < 1e-5);
    }

    #[test]
    fn lag_into_wall_is_cleared() {
        let mut m = Motion::at(IVec2::new(1, 0));
        m.vel = Vec2::new(1.0, 0.0);
        m.lag = Vec2::new(0.45, 0.0);
        let b = integrate(&mut m, &Limits::default(), wall_at(2));
        assert!(b.right);
        assert_eq!(m.pos, IVec2::new(1, 0));
        assert_eq!(m.vel.x, 0.0);
        assert_eq!(m.lag.x, 0.0);
    }

    #[test]
    fn opposite_velocity_survives_a_block() {
        // Lag pushes into the wall while velocity points away.
        let mut m = Motion::at(IVec2::new(1, 0));
        m.vel = Vec2::new(-0.4, 0.0);
        m.lag = Vec2::new(1.0, 0.0);
        integrate(&mut m, &Limits::default(), wall_at(2));
        assert_eq!(m.pos, IVec2::new(1, 0));
        assert_eq!(m.vel.x, -0.4);
        assert!(m.lag.x < 0.0);
    }

    #[test]
    fn vertical_velocity_is_clamped() {
        let mut m = Motion::at(IVec2::ZERO);
        m.vel = Vec2::new(0.0, 10.0);
        integrate(&mut m, &Limits::default(), open);
        // 3.5 rounds away from zero.
        assert_eq!(m.pos.y, 4);
        assert_eq!(m.vel.y, 10.0);

        let mut m = Motion::at(IVec2::ZERO);
        m.vel = Vec2::new(0.0, -10.0);
        integrate(&mut m, &Limits::default(), open);
        assert_eq!(m.pos.y, -3);
    }

    #[test]
    fn horizontal_velocity_is_not_clamped() {
        let mut m = Motion::at(IVec2::ZERO);
        m.vel = Vec2::new(9.0, 0.0);
        integrate(&mut m, &Limits::default(), open);
        assert_eq!(m.pos.x, 9);
    }

    #[test]
    fn never_enters_solid() {
        // Floor at y >= 20, walls at x <= -10 and x >= 10.
        let solid = |p: IVec2| p.y >= 20 || p.x <= -10 || p.x >= 10;
        let mut m = Motion::at(IVec2::ZERO);
        let inputs = [
            Vec2::new(3.0, 3.5),
            Vec2::new(-7.3, 1.2),
            Vec2::new(12.0, -2.0),
            Vec2::new(-0.6, 30.0),
            Vec2::new(4.4, 0.1),
        ];
        for tick in 0..500 {
            m.vel = inputs[tick % inputs.len()];
            integrate(&mut m, &Limits::default(), |pos, off| solid(pos + off));
            assert!(!solid(m.pos), "entered solid at {}", m.pos);
        }
    }

    #[test]
    fn long_run_average_matches_velocity() {
        for v in [0.3_f32, 0.5, 0.7, 1.25, 1.5, 2.0, -0.3, -1.5] {
            let mut m = Motion::at(IVec2::ZERO);
            let ticks = 10_000;
            for _ in 0..ticks {
                m.vel = Vec2::new(v, 0.0);
                integrate(&mut m, &Limits::default(), open);
            }
            let avg = m.pos.x as f32 / ticks as f32;
            assert!((avg - v).abs() < 0.01, "v={v} avg={avg}");
            assert!(m.lag.x.abs() < 1.0);
        }
    }

    #[test]
    fn diagonal_slides_along_floor() {
        // Floor at y >= 3: vertical stops, horizontal continues.
        let mut m = Motion::at(IVec2::new(0, 0));
        m.vel = Vec2::new(3.0, 3.0);
        let b = integrate(&mut m, &Limits::default(), |pos, off| (pos + off).y >= 3);
        assert_eq!(m.pos, IVec2::new(3, 2));
        assert!(b.down && !b.right);
        assert_eq!(m.vel, Vec2::new(3.0, 0.0));
    }
}
