/// Tile types and their physical properties.
///
/// The catalog is a dense table indexed 1:1 by `Tile as usize`.
/// Gameplay code asks the catalog, never matches on tiles directly,
/// so tile semantics stay centralized here.

use thiserror::Error;

/// Pixel size of one grid tile.
pub const TILE_SIZE: i32 = 12;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Air,
    Wall,      // Solid, indestructible
    Dirt,      // Solid + corruptable
    Grass,     // Solid + corruptable
    Spike,     // Lethal
    SpikeDown, // Lethal, hangs from ceilings
}

impl Tile {
    pub const COUNT: usize = 6;

    pub const ALL: [Tile; Tile::COUNT] = [
        Tile::Air,
        Tile::Wall,
        Tile::Dirt,
        Tile::Grass,
        Tile::Spike,
        Tile::SpikeDown,
    ];

    /// Tile for a raw level index, or `None` if the index is out of range.
    pub fn from_index(index: i32) -> Option<Tile> {
        usize::try_from(index).ok().and_then(|i| Tile::ALL.get(i).copied())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn info(self) -> &'static TileInfo {
        &TILE_INFO[self.index()]
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self.info().solid
    }

    #[inline]
    pub fn is_lethal(self) -> bool {
        self.info().lethal
    }

    #[inline]
    pub fn is_corruptable(self) -> bool {
        self.info().corruptable
    }
}

/// How a renderer should draw a tile. Never read by gameplay code.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileVisual {
    Invisible,
    /// One of `count` random variants from sprite row `row`.
    Random { row: u8, count: u8 },
    /// Merges with same-kind neighbors (see `merges_with`).
    Merged { row: u8 },
    /// Merges horizontally, random variant otherwise.
    HorMergedRandom { row: u8, count: u8 },
}

impl TileVisual {
    /// Should tile `a` visually connect to neighbor `b`?
    pub fn merges_with(a: Tile, b: Tile) -> bool {
        if a == Tile::Dirt && (b == Tile::Wall || b == Tile::Grass) {
            return true;
        }
        a == b
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TileInfo {
    pub tile: Tile,
    pub solid: bool,
    pub lethal: bool,
    pub corruptable: bool,
    pub visual: TileVisual,
}

static TILE_INFO: [TileInfo; Tile::COUNT] = [
    TileInfo { tile: Tile::Air,       solid: false, lethal: false, corruptable: false, visual: TileVisual::Invisible },
    TileInfo { tile: Tile::Wall,      solid: true,  lethal: false, corruptable: false, visual: TileVisual::Random { row: 0, count: 4 } },
    TileInfo { tile: Tile::Dirt,      solid: true,  lethal: false, corruptable: true,  visual: TileVisual::Merged { row: 1 } },
    TileInfo { tile: Tile::Grass,     solid: true,  lethal: false, corruptable: true,  visual: TileVisual::HorMergedRandom { row: 2, count: 3 } },
    TileInfo { tile: Tile::Spike,     solid: false, lethal: true,  corruptable: false, visual: TileVisual::Random { row: 3, count: 2 } },
    TileInfo { tile: Tile::SpikeDown, solid: false, lethal: true,  corruptable: false, visual: TileVisual::Random { row: 4, count: 2 } },
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("tile catalog has {actual} entries, but the tile enum has {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("tile catalog entry {index} describes {found:?}")]
    SlotMismatch { index: usize, found: Tile },
    #[error("invalid tile index: {0}")]
    InvalidIndex(i32),
}

/// Check that the catalog and the enum are in lockstep.
/// Called once at startup, before any level is built.
pub fn validate_catalog() -> Result<(), CatalogError> {
    validate_table(&TILE_INFO)
}

fn validate_table(table: &[TileInfo]) -> Result<(), CatalogError> {
    if table.len() != Tile::COUNT {
        return Err(CatalogError::SizeMismatch { expected: Tile::COUNT, actual: table.len() });
    }
    for (index, info) in table.iter().enumerate() {
        if info.tile.index() != index {
            return Err(CatalogError::SlotMismatch { index, found: info.tile });
        }
    }
    Ok(())
}

/// Catalog lookup by raw index.
pub fn lookup(index: i32) -> Result<&'static TileInfo, CatalogError> {
    Tile::from_index(index)
        .map(Tile::info)
        .ok_or(CatalogError::InvalidIndex(index))
}
