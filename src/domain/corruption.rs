/// Corruption automaton: one full-grid pass per tick.
///
/// Processing order within a tick:
///   1. Spread: mature cells (stage > 1, older than `SPREAD_DELAY`)
///      corrupt their 4 neighbors to `stage - 1`
///   2. Damage: corrupted non-air cells accrue damage; stage >= 4 may smolder
///   3. Explode: cells past `EXPLOSION_DAMAGE` turn to air and ignite
///      their neighbors at full stage
///   4. Time: the grid clock advances
///
/// Spread sources and explosions are collected before anything is written,
/// so the result never depends on scan order. Stages only ever go up
/// (`Grid::corrupt` takes the max), except the reset of an exploded cell.

use glam::IVec2;
use rand::Rng;

use super::grid::{Grid, DIR4, MAX_CORRUPTION_STAGE};
use super::tile::Tile;

/// Ticks a cell must be corrupted before it spreads.
pub const SPREAD_DELAY: u32 = 15;
/// Stage from which a cell takes damage and can explode.
pub const EXPLOSION_STAGE: i32 = 4;
/// A cell explodes once its damage exceeds this.
pub const EXPLOSION_DAMAGE: u32 = 180;
/// Smolder chance per tick, multiplied by `stage - EXPLOSION_STAGE + 1`.
pub const SMOLDER_CHANCE_PER_STAGE: f64 = 0.02;

/// Effect requests produced by one automaton tick, in tile coordinates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorruptionReport {
    pub smolders: Vec<IVec2>,
    pub explosions: Vec<IVec2>,
}

/// Advance the automaton by one tick.
pub fn tick<R: Rng>(grid: &mut Grid, rng: &mut R) -> CorruptionReport {
    let mut report = CorruptionReport::default();

    spread(grid);
    accrue_damage(grid, rng, &mut report);
    for &pos in &report.explosions {
        explode(grid, pos);
    }
    grid.advance_time();

    report
}

fn spread(grid: &mut Grid) {
    let time = grid.time();
    let sources: Vec<(IVec2, i32)> = grid
        .iter()
        .filter(|(_, c)| c.corruption_stage > 1 && time.saturating_sub(c.corruption_start_time) >= SPREAD_DELAY)
        .map(|(pos, c)| (pos, c.corruption_stage))
        .collect();

    for (pos, stage) in sources {
        for dir in DIR4 {
            grid.corrupt(pos + dir, stage - 1);
        }
    }
}

fn accrue_damage<R: Rng>(grid: &mut Grid, rng: &mut R, report: &mut CorruptionReport) {
    let positions: Vec<IVec2> = grid
        .iter()
        .filter(|(_, c)| c.tile != Tile::Air && c.is_corrupted())
        .map(|(pos, _)| pos)
        .collect();

    for pos in positions {
        let Some(cell) = grid.cell_mut(pos) else { continue };
        cell.visual_damage += 1;

        if cell.corruption_stage < EXPLOSION_STAGE {
            continue;
        }
        cell.damage += 1;

        let chance = SMOLDER_CHANCE_PER_STAGE * (cell.corruption_stage - EXPLOSION_STAGE + 1) as f64;
        if rng.random_bool(chance.min(1.0)) {
            report.smolders.push(pos);
        }
        if cell.damage > EXPLOSION_DAMAGE {
            report.explosions.push(pos);
        }
    }
}

fn explode(grid: &mut Grid, pos: IVec2) {
    if !grid.destroy(pos) {
        return;
    }
    for dir in DIR4 {
        grid.corrupt(pos + dir, MAX_CORRUPTION_STAGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::testing::grid_from;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    fn run(grid: &mut Grid, ticks: usize, rng: &mut Pcg32) -> CorruptionReport {
        let mut all = CorruptionReport::default();
        for _ in 0..ticks {
            let r = tick(grid, rng);
            all.smolders.extend(r.smolders);
            all.explosions.extend(r.explosions);
        }
        all
    }

    #[test]
    fn clock_advances_each_tick() {
        let mut g = grid_from(&["..."]);
        let mut r = rng();
        run(&mut g, 5, &mut r);
        assert_eq!(g.time(), 6);
    }

    #[test]
    fn spread_waits_for_delay() {
        let mut g = grid_from(&["###"]);
        let mut r = rng();
        g.corrupt(IVec2::new(1, 0), 3);

        run(&mut g, SPREAD_DELAY as usize, &mut r);
        assert_eq!(g.stage_at(IVec2::new(0, 0)), 0);
        assert_eq!(g.stage_at(IVec2::new(2, 0)), 0);

        run(&mut g, 1, &mut r);
        assert_eq!(g.stage_at(IVec2::new(0, 0)), 2);
        assert_eq!(g.stage_at(IVec2::new(2, 0)), 2);
        assert_eq!(g.stage_at(IVec2::new(1, 0)), 3);
    }

    #[test]
    fn stage_one_does_not_spread() {
        let mut g = grid_from(&["##"]);
        let mut r = rng();
        g.corrupt(IVec2::new(0, 0), 1);
        run(&mut g, 100, &mut r);
        assert_eq!(g.stage_at(IVec2::new(1, 0)), 0);
    }

    #[test]
    fn spread_skips_uncorruptable_tiles() {
        let mut g = grid_from(&[
            "=^=",
            "#\"#",
            "=.=",
        ]);
        let mut r = rng();
        g.corrupt(IVec2::new(1, 1), 3);
        run(&mut g, 40, &mut r);

        for (pos, cell) in g.iter() {
            if !cell.tile.is_corruptable() {
                assert_eq!(cell.corruption_stage, 0, "{:?} at {pos}", cell.tile);
            }
        }
        assert_eq!(g.stage_at(IVec2::new(0, 1)), 2);
        assert_eq!(g.stage_at(IVec2::new(2, 1)), 2);
    }

    #[test]
    fn stages_never_decrease_without_explosion() {
        let mut g = grid_from(&[
            "#####",
            "#####",
            "#####",
        ]);
        let mut r = rng();
        g.corrupt(IVec2::new(0, 0), 3);
        g.corrupt(IVec2::new(4, 2), 2);

        let mut prev: Vec<i32> = g.iter().map(|(_, c)| c.corruption_stage).collect();
        for _ in 0..120 {
            let report = tick(&mut g, &mut r);
            assert!(report.explosions.is_empty());
            let now: Vec<i32> = g.iter().map(|(_, c)| c.corruption_stage).collect();
            for (a, b) in prev.iter().zip(&now) {
                assert!(b >= a);
            }
            prev = now;
        }
    }

    #[test]
    fn low_stage_cells_take_visual_damage_only() {
        let mut g = grid_from(&["#"]);
        let mut r = rng();
        g.corrupt(IVec2::ZERO, EXPLOSION_STAGE - 1);
        let report = run(&mut g, 10, &mut r);
        let c = g.cell(IVec2::ZERO).unwrap();
        assert_eq!(c.visual_damage, 10);
        assert_eq!(c.damage, 0);
        assert!(report.smolders.is_empty());
    }

    #[test]
    fn cell_explodes_after_threshold() {
        let mut g = grid_from(&[
            "=#=",
            "#\"#",
            "=#=",
        ]);
        let mut r = rng();
        let center = IVec2::new(1, 1);
        g.corrupt(center, EXPLOSION_STAGE);
        let report = run(&mut g, EXPLOSION_DAMAGE as usize, &mut r);
        assert!(report.explosions.is_empty());
        assert_eq!(g.cell(center).unwrap().damage, EXPLOSION_DAMAGE);

        let report = tick(&mut g, &mut r);
        assert_eq!(report.explosions, vec![center]);

        let c = g.cell(center).unwrap();
        assert_eq!(c.tile, Tile::Air);
        assert_eq!(c.corruption_stage, 0);
        assert_eq!(c.damage, 0);
        for dir in DIR4 {
            assert_eq!(g.stage_at(center + dir), MAX_CORRUPTION_STAGE);
        }
        // Corners are walls and stay clean.
        assert_eq!(g.stage_at(IVec2::new(0, 0)), 0);
    }

    #[test]
    fn explosion_raises_already_corrupted_neighbors() {
        let mut g = grid_from(&[
            "=#=",
            "#\"#",
            "=#=",
        ]);
        let mut r = rng();
        let center = IVec2::new(1, 1);
        for (dir, stage) in DIR4.into_iter().zip([2, 3, 2, 3]) {
            g.corrupt(center + dir, stage);
        }
        let started: Vec<u32> = DIR4
            .iter()
            .map(|&dir| g.cell(center + dir).unwrap().corruption_start_time)
            .collect();
        g.corrupt(center, EXPLOSION_STAGE);

        let report = run(&mut g, EXPLOSION_DAMAGE as usize + 1, &mut r);
        assert_eq!(report.explosions, vec![center]);
        assert_eq!(g.tile_at(center), Tile::Air);
        for (dir, start) in DIR4.into_iter().zip(started) {
            let c = g.cell(center + dir).unwrap();
            assert_eq!(c.corruption_stage, MAX_CORRUPTION_STAGE);
            assert_eq!(c.corruption_start_time, start);
        }
    }

    #[test]
    fn explosions_chain() {
        let mut g = grid_from(&["##"]);
        let mut r = rng();
        g.corrupt(IVec2::new(0, 0), MAX_CORRUPTION_STAGE);

        let report = run(&mut g, 600, &mut r);
        assert_eq!(report.explosions.len(), 2);
        assert_eq!(g.tile_at(IVec2::new(0, 0)), Tile::Air);
        assert_eq!(g.tile_at(IVec2::new(1, 0)), Tile::Air);
    }

    #[test]
    fn smolder_only_at_high_stage() {
        let mut g = grid_from(&["#"]);
        let mut r = rng();
        g.corrupt(IVec2::ZERO, MAX_CORRUPTION_STAGE);
        let report = run(&mut g, 150, &mut r);
        assert!(!report.smolders.is_empty());
        assert!(report.smolders.iter().all(|&p| p == IVec2::ZERO));
    }
}
