/// The tile grid: cells plus the corruption time base.
///
/// Cells are stored row-major, origin top-left. Positions are `IVec2` in
/// tile units unless a function says "pixel". Out-of-range queries never
/// fail: they read as empty, non-solid space.

use glam::IVec2;
use rand::Rng;
use thiserror::Error;

use super::tile::{lookup, Tile, TILE_SIZE};

/// Highest corruption stage (a freshly ignited cell).
pub const MAX_CORRUPTION_STAGE: i32 = 6;
/// Ticks of `visual_damage` per visual sub-stage.
pub const VISUAL_STAGE_LEN: u32 = 15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub tile: Tile,
    /// Per-cell random value, drawn once at load. Visual variety only.
    pub random: u8,
    /// 0 = clean, `MAX_CORRUPTION_STAGE` = fully corrupted.
    pub corruption_stage: i32,
    /// `Grid::time()` when the cell first got corrupted. 0 = never.
    pub corruption_start_time: u32,
    pub damage: u32,
    pub visual_damage: u32,
}

impl Cell {
    pub fn new(tile: Tile) -> Self {
        Cell { tile, ..Cell::default() }
    }

    pub fn is_corrupted(&self) -> bool {
        self.corruption_stage > 0
    }

    /// Sprite frame for the corruption overlay, `0..MAX_CORRUPTION_STAGE`.
    /// Grows with `visual_damage`, capped by the cell's stage.
    pub fn visual_stage(&self) -> i32 {
        if self.corruption_stage == 0 {
            return 0;
        }
        let by_damage = (self.visual_damage / VISUAL_STAGE_LEN).min(MAX_CORRUPTION_STAGE as u32) as i32;
        by_damage.min(self.corruption_stage - 1).max(0)
    }

    /// Reset to clean air (after an explosion).
    fn clear(&mut self) {
        let random = self.random;
        *self = Cell { random, ..Cell::new(Tile::Air) };
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("level grid is empty")]
    Empty,
    #[error("row {row} has {actual} tiles, expected {expected}")]
    Ragged { row: usize, expected: usize, actual: usize },
    #[error("invalid tile index {index} at ({x}, {y})")]
    InvalidTile { index: i32, x: usize, y: usize },
}

#[derive(Clone, Debug)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    /// Tick counter. Starts at 1, `0` is reserved for "never".
    time: u32,
}

// ── Construction ──

impl Grid {
    /// Empty (all-air) grid.
    pub fn new(width: usize, height: usize) -> Self {
        Grid {
            width: width as i32,
            height: height as i32,
            cells: vec![Cell::default(); width * height],
            time: 1,
        }
    }

    /// Build a grid from parsed tile indices (row-major).
    /// Every row must have the same length and every index must name a tile.
    pub fn from_indices<R: Rng>(rows: &[Vec<i32>], rng: &mut R) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut grid = Grid::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::Ragged { row: y, expected: width, actual: row.len() });
            }
            for (x, &index) in row.iter().enumerate() {
                let tile = lookup(index).map_err(|_| GridError::InvalidTile { index, x, y })?.tile;
                let cell = &mut grid.cells[y * width + x];
                cell.tile = tile;
                cell.random = rng.random();
            }
        }
        Ok(grid)
    }
}

// ── Queries ──

impl Grid {
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Grid size in tiles.
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    /// Grid size in pixels.
    pub fn pixel_size(&self) -> IVec2 {
        self.size() * TILE_SIZE
    }

    pub fn time(&self) -> u32 {
        self.time
    }

    #[inline]
    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    #[inline]
    fn index(&self, pos: IVec2) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.y * self.width + pos.x) as usize)
    }

    pub fn cell(&self, pos: IVec2) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, pos: IVec2) -> Option<&mut Cell> {
        let i = self.index(pos)?;
        Some(&mut self.cells[i])
    }

    /// Tile at a tile position; out of range reads as air.
    pub fn tile_at(&self, pos: IVec2) -> Tile {
        self.cell(pos).map_or(Tile::Air, |c| c.tile)
    }

    /// Corruption stage at a tile position; out of range reads as clean.
    pub fn stage_at(&self, pos: IVec2) -> i32 {
        self.cell(pos).map_or(0, |c| c.corruption_stage)
    }

    /// Iterate all cells with their tile positions, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, &Cell)> + '_ {
        let w = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (IVec2::new(i as i32 % w, i as i32 / w), c))
    }

    /// Is the pixel at `pos` inside a solid tile? Outside the grid is open space.
    pub fn pixel_is_solid(&self, pos: IVec2) -> bool {
        self.tile_at(pixel_to_tile(pos)).is_solid()
    }

    /// Is the pixel at `pos` inside a lethal tile?
    pub fn pixel_is_lethal(&self, pos: IVec2) -> bool {
        self.tile_at(pixel_to_tile(pos)).is_lethal()
    }
}

// ── Mutation ──

impl Grid {
    pub fn set_tile(&mut self, pos: IVec2, tile: Tile) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.tile = tile;
        }
    }

    /// Raise the corruption of the cell at `pos` to `stage`.
    ///
    /// Never lowers a stage. No-op for out-of-range cells, non-positive
    /// stages and tiles that cannot be corrupted. Returns whether the
    /// cell changed.
    pub fn corrupt(&mut self, pos: IVec2, stage: i32) -> bool {
        if stage <= 0 {
            return false;
        }
        let stage = stage.min(MAX_CORRUPTION_STAGE);
        let time = self.time;
        let Some(cell) = self.cell_mut(pos) else {
            return false;
        };
        if cell.corruption_stage >= stage || !cell.tile.is_corruptable() {
            return false;
        }
        if cell.corruption_stage == 0 {
            cell.corruption_start_time = time;
        }
        cell.corruption_stage = stage;
        true
    }

    /// Turn the cell into clean air. Returns false if out of range.
    pub(crate) fn destroy(&mut self, pos: IVec2) -> bool {
        match self.cell_mut(pos) {
            Some(cell) => {
                cell.clear();
                true
            }
            None => false,
        }
    }

    pub(crate) fn advance_time(&mut self) {
        self.time += 1;
    }
}

/// Tile containing a pixel (floor division, so negative pixels map left/up).
#[inline]
pub fn pixel_to_tile(pos: IVec2) -> IVec2 {
    IVec2::new(pos.x.div_euclid(TILE_SIZE), pos.y.div_euclid(TILE_SIZE))
}

/// Pixel at the center of a tile.
#[inline]
pub fn tile_center(tile: IVec2) -> IVec2 {
    tile * TILE_SIZE + TILE_SIZE / 2
}

/// The four orthogonal neighbor offsets.
pub const DIR4: [IVec2; 4] = [IVec2::new(1, 0), IVec2::new(0, 1), IVec2::new(-1, 0), IVec2::new(0, -1)];
