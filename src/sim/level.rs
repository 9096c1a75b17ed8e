/// Level loader.
///
/// ## Sources (priority order):
///   1. `levels/` directory (individual `.txt` files, sorted by file name)
///   2. Built-in embedded levels
///
/// ## Single-level format (`.txt`):
///   Line 1: `# Level Name`
///   Lines: map rows (short rows are padded with air)
///
/// ## Tile legend:
///   ' ' / '.' = Air          '=' = Wall (indestructible)
///   '#' = Dirt               '"' = Grass
///   '^' = Spike              'v' = Hanging spike
///
/// ## Markers (the tile under a marker is air):
///   'P' = Player             'G' = Gate
///   'L' = Lamp               'S' = Spike block
///   '2'..'9' = Spike block that tall; the marker is its bottom tile
///
/// Loading goes text → `LevelDef` (rows) → `ParsedLevel` (tile indices +
/// named points) → world. The last step is the only one that knows about
/// bodies; everything before it is plain data.

use std::path::Path;

use glam::IVec2;
use log::{info, warn};
use thiserror::Error;

use crate::config::GameConfig;
use crate::domain::entity::{Gate, Lamp, Player, SpikeBlock};
use crate::domain::grid::{pixel_to_tile, tile_center, Grid, GridError};
use crate::domain::physics::SpikeGroups;
use crate::domain::tile::Tile;
use crate::sim::world::{Phase, WorldState};

/// Lamps hang this far above their tile center.
const LAMP_OFFSET: IVec2 = IVec2::new(0, -7);

/// Runtime level data (owned strings, loaded from file or embedded).
#[derive(Clone, Debug)]
pub struct LevelDef {
    pub name: String,
    pub rows: Vec<String>,
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("unknown map character {ch:?} at ({x}, {y})")]
    UnknownChar { ch: char, x: usize, y: usize },
    #[error("missing point `{0}`")]
    MissingPoint(String),
    #[error("point `{name}` appears {count} times, expected once")]
    DuplicatePoint { name: String, count: usize },
    #[error("bad spike height suffix `{0}`")]
    BadSpikeSuffix(String),
}

// ══════════════════════════════════════════════════════════════
// Named points
// ══════════════════════════════════════════════════════════════

/// Named pixel positions from the map, in file order.
#[derive(Clone, Debug, Default)]
pub struct PointLayer {
    points: Vec<(String, IVec2)>,
}

impl PointLayer {
    pub fn push(&mut self, name: &str, pos: IVec2) {
        self.points.push((name.to_string(), pos));
    }

    /// The one point with this name.
    pub fn single(&self, name: &str) -> Result<IVec2, LevelError> {
        let found = self.list(name);
        match found.as_slice() {
            [pos] => Ok(*pos),
            [] => Err(LevelError::MissingPoint(name.to_string())),
            many => Err(LevelError::DuplicatePoint { name: name.to_string(), count: many.len() }),
        }
    }

    /// All points with exactly this name.
    pub fn list(&self, name: &str) -> Vec<IVec2> {
        self.points.iter().filter(|(n, _)| n == name).map(|&(_, p)| p).collect()
    }

    /// Points whose name starts with `prefix`, with the rest of the name.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, IVec2)> + 'a {
        self.points
            .iter()
            .filter_map(move |(n, p)| n.strip_prefix(prefix).map(|suffix| (suffix, *p)))
    }
}

/// A level as plain data: tile indices plus named points.
#[derive(Clone, Debug)]
pub struct ParsedLevel {
    pub name: String,
    pub tiles: Vec<Vec<i32>>,
    pub points: PointLayer,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Levels from the configured directory, or the embedded set.
pub fn available_levels(config: &GameConfig) -> Vec<LevelDef> {
    let dir = &config.levels_dir;
    if dir.is_dir() {
        let mut levels = load_from_directory(dir);
        if !levels.is_empty() {
            levels.sort_by(|a, b| a.0.cmp(&b.0));
            info!("loaded {} levels from {}", levels.len(), dir.display());
            return levels.into_iter().map(|(_, def)| def).collect();
        }
        warn!("no levels in {}, using built-in levels", dir.display());
    }
    embedded_levels()
}

/// Load a level into the world state.
/// Past the last level the game is complete.
pub fn load_level(world: &mut WorldState, levels: &[LevelDef], level_idx: usize) -> Result<(), LevelError> {
    let Some(def) = levels.get(level_idx) else {
        info!("no level {level_idx}, game complete");
        world.phase = Phase::GameComplete;
        return Ok(());
    };

    let parsed = parse_rows(def)?;
    let grid = Grid::from_indices(&parsed.tiles, &mut world.rng)?;

    let player = Player::new(parsed.points.single("player")?);
    let gate = Gate::new(parsed.points.single("gate")?);
    let lamps: Vec<Lamp> = parsed
        .points
        .list("lamp")
        .into_iter()
        .map(|p| Lamp::new(snap_to_tile(p) + LAMP_OFFSET))
        .collect();

    let mut spikes = vec![];
    for (suffix, p) in parsed.points.with_prefix("spike") {
        spikes.push(SpikeBlock::new(snap_to_tile(p), spike_height(suffix)?));
    }
    // Lowest first: a block below always moves before the one resting on it.
    spikes.sort_by(|a, b| b.pos().y.cmp(&a.pos().y));
    let spike_groups = SpikeGroups::build(&spikes);

    world.grid = grid;
    world.player = player;
    world.gate = gate;
    world.lamps = lamps;
    world.spikes = spikes;
    world.spike_groups = spike_groups;
    world.current_level = level_idx;
    world.total_levels = levels.len();
    world.level_name = parsed.name.clone();
    world.tick = 0;
    world.paused = false;
    world.phase = Phase::Playing;
    world.switch.enter();
    world.set_message(&parsed.name, 90);

    let size = world.grid.size();
    let player_tile = world.player_tile();
    world.camera.center_on(player_tile, size);

    info!(
        "level {} \"{}\": {}x{} tiles, {} lamps, {} spike blocks",
        level_idx + 1,
        parsed.name,
        size.x,
        size.y,
        world.lamps.len(),
        world.spikes.len()
    );
    Ok(())
}

/// Turn map rows into tile indices and named points.
pub fn parse_rows(def: &LevelDef) -> Result<ParsedLevel, LevelError> {
    let mut tiles = Vec::with_capacity(def.rows.len());
    let mut points = PointLayer::default();

    for (y, row) in def.rows.iter().enumerate() {
        let mut line = Vec::with_capacity(row.len());
        for (x, ch) in row.chars().enumerate() {
            let tile = match ch {
                ' ' | '.' => Tile::Air,
                '=' => Tile::Wall,
                '#' => Tile::Dirt,
                '"' => Tile::Grass,
                '^' => Tile::Spike,
                'v' => Tile::SpikeDown,
                _ => {
                    let name = match ch {
                        'P' => "player".to_string(),
                        'G' => "gate".to_string(),
                        'L' => "lamp".to_string(),
                        'S' => "spike".to_string(),
                        '2'..='9' => format!("spike{ch}"),
                        _ => return Err(LevelError::UnknownChar { ch, x, y }),
                    };
                    points.push(&name, tile_center(IVec2::new(x as i32, y as i32)));
                    Tile::Air
                }
            };
            line.push(tile.index() as i32);
        }
        tiles.push(line);
    }

    Ok(ParsedLevel { name: def.name.clone(), tiles, points })
}

fn snap_to_tile(pos: IVec2) -> IVec2 {
    tile_center(pixel_to_tile(pos))
}

/// `spike` is one tile tall, `spikeN` is N tiles tall.
fn spike_height(suffix: &str) -> Result<i32, LevelError> {
    if suffix.is_empty() {
        return Ok(1);
    }
    match suffix.parse::<i32>() {
        Ok(h) if h >= 1 => Ok(h),
        _ => Err(LevelError::BadSpikeSuffix(suffix.to_string())),
    }
}

// ══════════════════════════════════════════════════════════════
// Single-level file parsing
// ══════════════════════════════════════════════════════════════

/// Parse a single level from text content.
pub fn parse_level_file(content: &str) -> Option<LevelDef> {
    let mut name = String::new();
    let mut rows = vec![];

    for line in content.lines() {
        if line.starts_with('#') && name.is_empty() && rows.is_empty() && is_name_line(line) {
            name = line[1..].trim().to_string();
        } else {
            rows.push(line.trim_end_matches('\r').to_string());
        }
    }

    while rows.last().is_some_and(|r| r.trim().is_empty()) {
        rows.pop();
    }

    if rows.is_empty() {
        return None;
    }

    let max_width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    for row in &mut rows {
        let len = row.chars().count();
        if len < max_width {
            row.extend(std::iter::repeat(' ').take(max_width - len));
        }
    }

    if name.is_empty() {
        name = "Untitled".to_string();
    }

    Some(LevelDef { name, rows })
}

/// Distinguish `# Level Name` from `#####` (a row of dirt).
/// A name line starts with `#` and contains at least one letter.
fn is_name_line(line: &str) -> bool {
    line[1..].chars().any(|c| c.is_alphabetic())
}

// ══════════════════════════════════════════════════════════════
// Directory loading (individual .txt files)
// ══════════════════════════════════════════════════════════════

fn load_from_directory(dir: &Path) -> Vec<(String, LevelDef)> {
    let mut results = vec![];

    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!("cannot read {}: {e}", dir.display());
            return results;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "txt") {
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    if let Some(def) = parse_level_file(&content) {
                        let filename = path.file_name()
                            .unwrap_or_default()
                            .to_string_lossy()
                            .to_string();
                        results.push((filename, def));
                    }
                }
                Err(e) => warn!("cannot read {}: {e}", path.display()),
            }
        }
    }

    results
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback levels
// ══════════════════════════════════════════════════════════════

pub fn embedded_levels() -> Vec<LevelDef> {
    vec![
        make_embedded("First Spark", &[
            "========================",
            "=                      =",
            "=                      =",
            "=           L          =",
            "=         \"\"\"\"\"        =",
            "=                    G =",
            "= P          L    ======",
            "=\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"======",
            "=#################======",
            "========================",
        ]),
        make_embedded("Falling Teeth", &[
            "============================",
            "=                          =",
            "=  P                       =",
            "=\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"   =",
            "=   S         S            =",
            "=        2                 =",
            "=  L                    G  =",
            "=     ^^^         ^^^      =",
            "============================",
        ]),
        make_embedded("Stack and Burn", &[
            "==============================",
            "=                            =",
            "= P              L           =",
            "=\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"\"  =",
            "=    S      S                =",
            "=    S                       =",
            "=                  3         =",
            "=  L                     G   =",
            "=\"\"\"\"\"\"\"\"\"\"=========\"\"\"\"\"\"\"\"\"=",
            "==============================",
        ]),
    ]
}

fn make_embedded(name: &str, map: &[&str]) -> LevelDef {
    LevelDef {
        name: name.to_string(),
        rows: map.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(rows: &[&str]) -> LevelDef {
        make_embedded("test", rows)
    }

    #[test]
    fn embedded_levels_all_load() {
        let levels = embedded_levels();
        assert!(!levels.is_empty());
        for i in 0..levels.len() {
            let mut world = WorldState::new(1);
            load_level(&mut world, &levels, i).unwrap_or_else(|e| panic!("level {i}: {e}"));
            assert_eq!(world.phase, Phase::Playing);
            assert!(!world.lamps.is_empty(), "level {i} has no lamps");
            let w = levels[i].rows[0].chars().count();
            assert!(levels[i].rows.iter().all(|r| r.chars().count() == w), "level {i} is ragged");
        }
    }

    #[test]
    fn past_last_level_completes_game() {
        let mut world = WorldState::new(1);
        load_level(&mut world, &embedded_levels(), 99).unwrap();
        assert_eq!(world.phase, Phase::GameComplete);
    }

    #[test]
    fn markers_become_points_on_air() {
        let parsed = parse_rows(&def(&[
            "P.G",
            "L3S",
        ]))
        .unwrap();
        assert!(parsed.tiles.iter().flatten().all(|&t| t == Tile::Air.index() as i32));
        assert_eq!(parsed.points.single("player").unwrap(), IVec2::new(6, 6));
        assert_eq!(parsed.points.single("gate").unwrap(), IVec2::new(30, 6));
        let spikes: Vec<(&str, IVec2)> = parsed.points.with_prefix("spike").collect();
        assert_eq!(spikes, vec![("3", IVec2::new(18, 18)), ("", IVec2::new(30, 18))]);
    }

    #[test]
    fn missing_and_duplicate_points_are_errors() {
        let mut world = WorldState::new(1);
        let err = load_level(&mut world, &[def(&["P  ", "==="])], 0).unwrap_err();
        assert!(matches!(err, LevelError::MissingPoint(ref n) if n == "gate"));

        let err = load_level(&mut world, &[def(&["PGP", "==="])], 0).unwrap_err();
        assert!(matches!(err, LevelError::DuplicatePoint { count: 2, .. }));
    }

    #[test]
    fn unknown_characters_are_rejected() {
        let err = parse_rows(&def(&["P?G"])).unwrap_err();
        assert!(matches!(err, LevelError::UnknownChar { ch: '?', x: 1, y: 0 }));
    }

    #[test]
    fn ragged_rows_are_a_grid_error() {
        let mut world = WorldState::new(1);
        let err = load_level(&mut world, &[def(&["PG", "==="])], 0).unwrap_err();
        assert!(matches!(err, LevelError::Grid(GridError::Ragged { row: 1, .. })));
    }

    #[test]
    fn spike_suffixes() {
        assert_eq!(spike_height("").unwrap(), 1);
        assert_eq!(spike_height("4").unwrap(), 4);
        assert!(spike_height("0").is_err());
        assert!(spike_height("x").is_err());
    }

    #[test]
    fn spikes_are_ordered_lowest_first() {
        let mut world = WorldState::new(1);
        let level = def(&[
            "S  ",
            "S  ",
            "  S",
            "PG ",
            "===",
        ]);
        load_level(&mut world, &[level], 0).unwrap();
        let ys: Vec<i32> = world.spikes.iter().map(|s| s.pos().y).collect();
        assert_eq!(ys, vec![30, 18, 6]);
        assert_eq!(world.spike_groups.column(6), &[1, 2]);
    }

    #[test]
    fn lamps_hang_above_tile_center() {
        let mut world = WorldState::new(1);
        load_level(&mut world, &[def(&["PGL", "==="])], 0).unwrap();
        assert_eq!(world.lamps[0].pos(), IVec2::new(30, -1));
    }

    #[test]
    fn level_file_parsing() {
        let text = "# My Level\n#####\n P G\n\n\n";
        let def = parse_level_file(text).unwrap();
        assert_eq!(def.name, "My Level");
        assert_eq!(def.rows, vec!["#####".to_string(), " P G ".to_string()]);
        assert!(parse_level_file("# Only a name\n").is_none());
    }
}
