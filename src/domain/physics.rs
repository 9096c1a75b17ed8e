/// Hitbox layer: every body's solidity predicate, built from point samples.
///
/// ## Architecture
///
/// Bodies never ask the grid about areas. Each body carries a small set of
/// hitpoints (offsets from its position); a body is "solid at offset" if
/// ANY hitpoint, shifted by the offset, lands in a solid pixel.
///
///   - Player:     4 corners, (-4,-5) .. (3,4)
///   - Lamp:       1 point, (0, 12)
///   - Gate:       1 point, (0, 6)
///   - SpikeBlock: 2 points, (0, 5) and (0, -8 - (h-1)*12).
///                 The first one also hits sibling blocks in the same column.
///
/// Lethality uses the same corners (the spike-block check shrinks x by 2).

use std::collections::BTreeMap;

use glam::IVec2;

use super::entity::SpikeBlock;
use super::grid::{pixel_to_tile, Grid};
use super::tile::TILE_SIZE;

// ══════════════════════════════════════════════════════════════
// Hitpoints
// ══════════════════════════════════════════════════════════════

pub const PLAYER_HITBOX_A: IVec2 = IVec2::new(-4, -5);
pub const PLAYER_HITBOX_B: IVec2 = IVec2::new(3, 4);
/// Spike blocks are a bit more forgiving horizontally.
pub const SPIKE_HITBOX_SHRINK_X: i32 = 2;

pub const LAMP_HITPOINT: IVec2 = IVec2::new(0, 12);
pub const GATE_HITPOINT: IVec2 = IVec2::new(0, 6);

/// Corners of the player hitbox, optionally grown (or shrunk, if negative) per axis.
pub fn player_corners(grow: IVec2) -> [IVec2; 4] {
    let a = PLAYER_HITBOX_A - grow;
    let b = PLAYER_HITBOX_B + grow;
    [IVec2::new(a.x, a.y), IVec2::new(b.x, a.y), IVec2::new(a.x, b.y), IVec2::new(b.x, b.y)]
}

/// Spike block hitpoints. The first is the bottom one.
pub fn spike_hitpoints(height: i32) -> [IVec2; 2] {
    // -8 rather than -6 lets a block hang from a ceiling.
    [IVec2::new(0, 5), IVec2::new(0, -8 - (height - 1) * TILE_SIZE)]
}

// ══════════════════════════════════════════════════════════════
// Solidity predicates (fed to the mover)
// ══════════════════════════════════════════════════════════════

pub fn player_solid_at(grid: &Grid, pos: IVec2, offset: IVec2) -> bool {
    player_corners(IVec2::ZERO)
        .iter()
        .any(|&c| grid.pixel_is_solid(pos + offset + c))
}

/// Single-hitpoint bodies (lamps, the gate).
pub fn point_solid_at(grid: &Grid, hitpoint: IVec2, pos: IVec2, offset: IVec2) -> bool {
    grid.pixel_is_solid(pos + hitpoint + offset)
}

/// Spike block `index` at `pos`: grid hit, or its bottom point inside a sibling.
pub fn spike_solid_at(
    grid: &Grid,
    spikes: &[SpikeBlock],
    siblings: &[usize],
    index: usize,
    pos: IVec2,
    offset: IVec2,
) -> bool {
    let [bottom, top] = spike_hitpoints(spikes[index].height);
    if grid.pixel_is_solid(pos + bottom + offset) || grid.pixel_is_solid(pos + top + offset) {
        return true;
    }
    let probe = pos + bottom + offset;
    siblings
        .iter()
        .filter(|&&other| other != index)
        .any(|&other| spikes[other].pixel_touches(probe))
}

// ══════════════════════════════════════════════════════════════
// Lethality
// ══════════════════════════════════════════════════════════════

/// Any player corner inside a lethal tile.
pub fn player_touches_lethal_tile(grid: &Grid, pos: IVec2) -> bool {
    player_corners(IVec2::ZERO)
        .iter()
        .any(|&c| grid.pixel_is_lethal(pos + c))
}

/// Any (x-shrunk) player corner inside a spike block.
pub fn player_touches_spike_block(spikes: &[SpikeBlock], pos: IVec2) -> bool {
    let corners = player_corners(IVec2::new(-SPIKE_HITBOX_SHRINK_X, 0));
    spikes
        .iter()
        .any(|s| corners.iter().any(|&c| s.pixel_touches(pos + c)))
}

/// Tiles the player corrupts this tick: its corners grown by one pixel.
pub fn player_corruption_tiles(pos: IVec2) -> [IVec2; 4] {
    player_corners(IVec2::ONE).map(|c| pixel_to_tile(pos + c))
}

// ══════════════════════════════════════════════════════════════
// Spike groups
// ══════════════════════════════════════════════════════════════

/// Spike blocks sharing a column, as indices into the world's spike list.
/// Built once at load; blocks never move horizontally.
#[derive(Clone, Debug, Default)]
pub struct SpikeGroups {
    columns: BTreeMap<i32, Vec<usize>>,
}

impl SpikeGroups {
    /// Group by column. Within a column, indices keep the order of `spikes`.
    pub fn build(spikes: &[SpikeBlock]) -> Self {
        let mut columns: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (i, s) in spikes.iter().enumerate() {
            columns.entry(s.pos().x).or_default().push(i);
        }
        SpikeGroups { columns }
    }

    /// All blocks in the column (including the asking block itself).
    pub fn column(&self, x: i32) -> &[usize] {
        self.columns.get(&x).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::testing::grid_from;

    #[test]
    fn player_corners_cover_hitbox() {
        let c = player_corners(IVec2::ZERO);
        assert!(c.contains(&IVec2::new(-4, -5)));
        assert!(c.contains(&IVec2::new(3, 4)));
        let grown = player_corners(IVec2::ONE);
        assert!(grown.contains(&IVec2::new(-5, -6)));
        assert!(grown.contains(&IVec2::new(4, 5)));
    }

    #[test]
    fn player_stands_on_floor() {
        let g = grid_from(&[
            "...",
            "===",
        ]);
        // Bottom corners at y = 11 are just above the floor row (y 12..24).
        let pos = IVec2::new(18, 7);
        assert!(!player_solid_at(&g, pos, IVec2::ZERO));
        assert!(player_solid_at(&g, pos, IVec2::new(0, 1)));
        assert!(!player_solid_at(&g, pos, IVec2::new(1, 0)));
    }

    #[test]
    fn lethal_tiles_kill_through_corners() {
        let g = grid_from(&[
            "...",
            ".^.",
        ]);
        assert!(player_touches_lethal_tile(&g, IVec2::new(18, 10)));
        assert!(!player_touches_lethal_tile(&g, IVec2::new(18, 6)));
        // Off to the side the corners straddle column 0 only.
        assert!(!player_touches_lethal_tile(&g, IVec2::new(6, 10)));
    }

    #[test]
    fn spike_block_kill_box_is_shrunk() {
        let spikes = vec![SpikeBlock::new(IVec2::new(18, 18), 1)];
        // Block covers x 12..24. Player at x = 27: unshrunk left corner at 23, shrunk at 25.
        assert!(!player_touches_spike_block(&spikes, IVec2::new(27, 18)));
        assert!(player_touches_spike_block(&spikes, IVec2::new(25, 18)));
    }

    #[test]
    fn corruption_tiles_reach_one_pixel_out() {
        // Bottom corners grown by one pixel dip into the next row.
        let tiles = player_corruption_tiles(IVec2::new(18, 7));
        assert!(tiles.contains(&IVec2::new(1, 1)));
        assert!(tiles.contains(&IVec2::new(1, 0)));
    }

    #[test]
    fn spike_rests_on_sibling() {
        let g = grid_from(&[
            ".",
            ".",
            ".",
            "=",
        ]);
        let spikes = vec![
            SpikeBlock::new(IVec2::new(6, 30), 1),
            SpikeBlock::new(IVec2::new(6, 18), 1),
        ];
        let groups = SpikeGroups::build(&spikes);
        let column = groups.column(6);
        assert_eq!(column, &[0, 1]);

        // Lower block sits on the wall row.
        assert!(spike_solid_at(&g, &spikes, column, 0, spikes[0].pos(), IVec2::new(0, 1)));
        // Upper block's bottom point reaches the lower block's top edge.
        assert!(spike_solid_at(&g, &spikes, column, 1, spikes[1].pos(), IVec2::new(0, 1)));
        assert!(!spike_solid_at(&g, &spikes, column, 1, spikes[1].pos(), IVec2::new(0, -1)));
    }

    #[test]
    fn groups_split_by_column() {
        let spikes = vec![
            SpikeBlock::new(IVec2::new(6, 6), 1),
            SpikeBlock::new(IVec2::new(18, 6), 2),
            SpikeBlock::new(IVec2::new(6, 30), 1),
        ];
        let groups = SpikeGroups::build(&spikes);
        assert_eq!(groups.column(6), &[0, 2]);
        assert_eq!(groups.column(18), &[1]);
        assert!(groups.column(30).is_empty());
        assert!(groups.column(99).is_empty());
    }
}
