/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into the `front` buffer
///   2. Compare each glyph with the `back` buffer (previous frame)
///   3. Only emit terminal commands for glyphs that changed
///   4. Batch everything with `queue!`, flush once
///   5. Swap front/back
///
/// One grid tile is two terminal columns by one row. Bodies are drawn at
/// the tile containing their pixel position.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use glam::IVec2;

use ashgate::domain::entity::{Facing, SpikeBlock};
use ashgate::domain::grid::{pixel_to_tile, Grid, MAX_CORRUPTION_STAGE};
use ashgate::domain::rules::{self, DEATH_ANIM_LEN, GATE_CENTER_OFFSET};
use ashgate::domain::tile::TileVisual;
use ashgate::sim::world::{Phase, WorldState};

type Rgb = (u8, u8, u8);

const BASE_BG: Rgb = (18, 16, 22);
const EMBER_FG: Rgb = (255, 130, 30);
const EMBER_BG: Rgb = (90, 22, 10);
const HUD_BG: Rgb = (40, 24, 20);
const MSG_BG: Rgb = (200, 150, 50);

fn rgb((r, g, b): Rgb) -> Color {
    Color::Rgb { r, g, b }
}

fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

// ── Glyph: one terminal cell of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    const BLANK: Glyph = Glyph { ch: ' ', fg: Color::White, bg: Color::Rgb { r: BASE_BG.0, g: BASE_BG.1, b: BASE_BG.2 } };

    /// Never equal to a real glyph: forces a full repaint.
    const INVALID: Glyph = Glyph { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Rgb, bg: Rgb) -> Self {
        Glyph { ch, fg: rgb(fg), bg: rgb(bg) }
    }
}

// ── FrameBuffer ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Glyph::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Glyph::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Glyph::BLANK);
    }

    fn invalidate(&mut self) {
        self.cells.fill(Glyph::INVALID);
    }

    fn set(&mut self, x: usize, y: usize, glyph: Glyph) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = glyph;
        }
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Glyph::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Rgb, bg: Rgb) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Glyph::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Rgb) {
        for x in 0..self.width {
            self.set(x, y, Glyph::new(' ', bg, bg));
        }
    }

    /// Set both columns of a map tile.
    fn set_tile(&mut self, col: usize, row: usize, pair: [char; 2], fg: Rgb, bg: Rgb) {
        self.set(col, row, Glyph::new(pair[0], fg, bg));
        self.set(col + 1, row, Glyph::new(pair[1], fg, bg));
    }

    /// Background color currently at a position, for bodies drawn over tiles.
    fn bg_at(&self, x: usize, y: usize) -> Rgb {
        match self.get(x, y).bg {
            Color::Rgb { r, g, b } => (r, g, b),
            _ => BASE_BG,
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Tile sprites
// ══════════════════════════════════════════════════════════════

/// Sprite rows, indexed by the `row` of a `TileVisual`.
const SPRITES: [&[[char; 2]]; 5] = [
    &[['█', '█'], ['█', '▓'], ['▓', '█'], ['▓', '▓']],  // wall
    &[['▓', '▓'], ['▀', '▀']],                          // dirt: inner, surface
    &[['"', '"'], ['\'', '"'], [',', '\'']],            // grass
    &[['^', '^'], ['▲', '▲']],                          // spikes
    &[['v', 'v'], ['▼', '▼']],                          // hanging spikes
];

const ROW_COLORS: [(Rgb, Rgb); 5] = [
    ((120, 120, 130), (62, 60, 70)),
    ((125, 85, 50), (78, 50, 30)),
    ((100, 185, 70), (78, 50, 30)),
    ((220, 220, 230), BASE_BG),
    ((220, 220, 230), BASE_BG),
];

/// Glyph pair and colors for one grid tile. `tick` drives ember flicker.
fn tile_sprite(grid: &Grid, pos: IVec2, tick: u64) -> ([char; 2], Rgb, Rgb) {
    let Some(cell) = grid.cell(pos) else {
        return ([' ', ' '], BASE_BG, BASE_BG);
    };
    let variant = |row: u8, count: u8| {
        let sprites = SPRITES[row as usize];
        sprites[cell.random as usize % count.max(1) as usize % sprites.len()]
    };

    let (pair, (fg, bg)) = match cell.tile.info().visual {
        TileVisual::Invisible => return ([' ', ' '], BASE_BG, BASE_BG),
        TileVisual::Random { row, count } => (variant(row, count), ROW_COLORS[row as usize]),
        TileVisual::Merged { row } => {
            let above = grid.tile_at(pos - IVec2::Y);
            let surface = !TileVisual::merges_with(cell.tile, above);
            (SPRITES[row as usize][surface as usize], ROW_COLORS[row as usize])
        }
        TileVisual::HorMergedRandom { row, count } => {
            let mut pair = variant(row, count);
            if !TileVisual::merges_with(cell.tile, grid.tile_at(pos + IVec2::X)) {
                pair[1] = '▝';
            }
            if !TileVisual::merges_with(cell.tile, grid.tile_at(pos - IVec2::X)) {
                pair[0] = '▘';
            }
            (pair, ROW_COLORS[row as usize])
        }
    };

    if !cell.is_corrupted() {
        return (pair, fg, bg);
    }

    let stage = cell.visual_stage();
    let heat = (stage + 1) as f32 / MAX_CORRUPTION_STAGE as f32;
    let flicker = (cell.random as u64 + tick / 6) % 4 == 0;
    let pair = match stage {
        0..=2 => pair,
        3 | 4 => ['▒', '▒'],
        _ if flicker => ['░', '▒'],
        _ => ['▒', '░'],
    };
    (pair, lerp_rgb(fg, EMBER_FG, heat), lerp_rgb(bg, EMBER_BG, heat))
}

/// Tiles a spike block covers, bottom first.
fn spike_tiles(spike: &SpikeBlock) -> impl Iterator<Item = IVec2> {
    let bottom = pixel_to_tile(spike.pos());
    (0..spike.height).map(move |k| bottom - IVec2::new(0, k))
}

// ── Layout ──

const CELL_W: usize = 2;
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    /// Level the camera was last placed for; a change snaps the camera.
    last_level: Option<usize>,
    key_release: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            last_level: None,
            key_release: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(rgb(BASE_BG)),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.invalidate();
        Ok(())
    }

    /// Ask the terminal to report key releases. Returns whether it will.
    pub fn enable_key_release(&mut self) -> bool {
        if !matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
            return false;
        }
        let flags = KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
        self.key_release = execute!(self.writer, PushKeyboardEnhancementFlags(flags)).is_ok();
        self.key_release
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.key_release {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &mut WorldState) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.invalidate();
            queue!(self.writer, SetBackgroundColor(rgb(BASE_BG)), Clear(ClearType::All))?;
        }

        if self.last_phase != Some(world.phase) {
            self.back.invalidate();
            queue!(self.writer, SetBackgroundColor(rgb(BASE_BG)), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        // Viewport: terminal minus HUD, gap, message and help rows.
        let reserved_rows = MAP_ROW + 4;
        let size = world.grid.size();
        world.camera.view_w = ((self.term_w / CELL_W) as i32).min(size.x).max(1);
        world.camera.view_h = (self.term_h.saturating_sub(reserved_rows) as i32).min(size.y).max(1);

        if world.phase == Phase::Playing {
            let target = world.player_tile();
            if self.last_level != Some(world.current_level) {
                world.camera.center_on(target, size);
                self.last_level = Some(world.current_level);
            } else {
                world.camera.follow(target, size);
            }
        }

        self.front.clear();
        match world.phase {
            Phase::Title => self.compose_title(world),
            Phase::Playing => self.compose_game(world),
            Phase::GameComplete => self.compose_game_complete(world),
        }
        if world.paused && world.phase == Phase::Playing {
            self.compose_pause_overlay(world);
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    /// Forget the camera placement so the next frame snaps to the player.
    pub fn reset_camera(&mut self) {
        self.last_level = None;
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = rgb(BASE_BG);
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let glyph = self.front.get(x, y);
                if glyph == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if glyph.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(glyph.fg))?;
                    last_fg = glyph.fg;
                }
                if glyph.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(glyph.bg))?;
                    last_bg = glyph.bg;
                }
                queue!(self.writer, Print(glyph.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ══════════════════════════════════════════════════════════════
    // In-game screen
    // ══════════════════════════════════════════════════════════════

    fn compose_game(&mut self, w: &WorldState) {
        let cam = &w.camera;

        // ── HUD row ──
        let lit = w.lamps.iter().filter(|l| l.lit).count();
        let status = if rules::gate_is_open(w.gate.ready_timer) {
            "GATE OPEN"
        } else if w.gate.ready_timer > 0 {
            "igniting..."
        } else {
            ""
        };
        let hud = format!(
            " Level {}/{}  {:<18} Lamps {}/{}  {} ",
            w.current_level + 1, w.total_levels, w.level_name, lit, w.lamps.len(), status,
        );
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud, (235, 220, 200), HUD_BG);

        // ── Map (camera viewport) ──
        for vy in 0..cam.view_h {
            let row = MAP_ROW + vy as usize;
            if row >= self.front.height { break; }
            for vx in 0..cam.view_w {
                let col = vx as usize * CELL_W;
                if col + 1 >= self.front.width { break; }
                let (pair, fg, bg) = tile_sprite(&w.grid, IVec2::new(cam.x + vx, cam.y + vy), w.tick);
                self.front.set_tile(col, row, pair, fg, bg);
            }
        }

        self.compose_bodies(w);
        self.compose_transition(w);

        // ── Message bar ──
        let msg_row = MAP_ROW + cam.view_h as usize + 1;
        if !w.message.is_empty() && msg_row < self.front.height {
            self.front.fill_row(msg_row, MSG_BG);
            self.front.put_str(0, msg_row, &format!(" * {} ", w.message), (0, 0, 0), MSG_BG);
        }

        // ── Help bar ──
        let help_row = MAP_ROW + cam.view_h as usize + 3;
        if help_row < self.front.height {
            let help = " <-/-> or A/D: Move  Z/Space: Jump  R: Restart  P: Pause  Esc: Title";
            self.front.put_str(0, help_row, help, (100, 100, 110), BASE_BG);
        }
    }

    /// Draw a two-column body sprite at a world tile, keeping the tile's background.
    fn put_body(&mut self, w: &WorldState, tile: IVec2, pair: [char; 2], fg: Rgb) {
        let Some((vx, vy)) = w.camera.world_to_view(tile) else { return };
        let col = vx as usize * CELL_W;
        let row = MAP_ROW + vy as usize;
        let bg = self.front.bg_at(col, row);
        self.front.set_tile(col, row, pair, fg, bg);
    }

    fn compose_bodies(&mut self, w: &WorldState) {
        for spike in &w.spikes {
            for tile in spike_tiles(spike) {
                self.put_body(w, tile, ['▲', '▲'], (200, 200, 215));
            }
        }

        // Gate: dark until the lamps are lit, then glowing, then fading out.
        let gate = &w.gate;
        let gate_color = if gate.is_finished() {
            let fade = gate.finish_timer as f32 / rules::GATE_FINISH_ANIM_LEN as f32;
            lerp_rgb((255, 230, 120), BASE_BG, fade.min(1.0))
        } else if rules::gate_is_open(gate.ready_timer) {
            (255, 200, 80)
        } else {
            (110, 90, 80)
        };
        self.put_body(w, pixel_to_tile(gate.pos()), ['∏', '∏'], gate_color);

        let progress = rules::flame_progress(gate.ready_timer);
        let gate_center = (gate.pos() + GATE_CENTER_OFFSET).as_vec2();
        for lamp in &w.lamps {
            let (pair, color) = if lamp.lit { (['¡', ' '], (255, 190, 60)) } else { (['i', ' '], (140, 120, 100)) };
            self.put_body(w, pixel_to_tile(lamp.pos()), pair, color);

            // Flames travel from each lamp to the gate, then vanish into it.
            if lamp.lit && gate.ready_timer > rules::GATE_ANIM_DELAY && progress < 1.0 {
                let flame = lamp.flame_pos.as_vec2().lerp(gate_center, progress);
                self.put_body(w, pixel_to_tile(flame.round().as_ivec2()), ['*', ' '], (255, 150, 40));
            }
        }

        let player = &w.player;
        let player_tile = pixel_to_tile(player.pos());
        if player.is_alive() && !gate.is_finished() {
            let pair = match player.facing {
                Facing::Left => ['<', '@'],
                Facing::Right => ['@', '>'],
            };
            self.put_body(w, player_tile, pair, (250, 250, 255));
        } else if !player.is_alive() && player.death_timer < DEATH_ANIM_LEN {
            let pair = if player.death_timer < DEATH_ANIM_LEN / 2 { ['\\', '/'] } else { ['.', '.'] };
            self.put_body(w, player_tile, pair, EMBER_FG);
        }
    }

    /// Fade cover for level transitions: rows darken from the top down.
    fn compose_transition(&mut self, w: &WorldState) {
        let coverage = w.switch.coverage();
        if coverage <= 0.0 { return; }
        let view_h = w.camera.view_h.max(0) as usize;
        let view_cols = w.camera.view_w.max(0) as usize * CELL_W;
        let covered = (coverage * view_h as f32).ceil() as usize;
        for vy in 0..covered.min(view_h) {
            for x in 0..view_cols {
                self.front.set(x, MAP_ROW + vy, Glyph::new('░', (40, 30, 30), (8, 6, 8)));
            }
        }
    }

    fn compose_pause_overlay(&mut self, w: &WorldState) {
        let bg: Rgb = (40, 36, 44);
        let view_cols = w.camera.view_w.max(0) as usize * CELL_W;
        let view_rows = w.camera.view_h.max(0) as usize;
        let box_w = 30_usize.min(view_cols);
        let box_h = 7_usize.min(view_rows);
        let box_x = view_cols.saturating_sub(box_w) / 2;
        let box_y = MAP_ROW + view_rows.saturating_sub(box_h) / 2;

        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Glyph::new(' ', bg, bg));
            }
        }
        self.front.put_str(box_x + 9, box_y + 1, ">> PAUSED <<", (255, 220, 50), bg);
        self.front.put_str(box_x + 3, box_y + 3, "P    Resume", (100, 200, 255), bg);
        self.front.put_str(box_x + 3, box_y + 4, "R    Restart level", (100, 200, 255), bg);
        self.front.put_str(box_x + 3, box_y + 5, "Esc  Back to title", (100, 200, 255), bg);
    }

    // ══════════════════════════════════════════════════════════════
    // Menus
    // ══════════════════════════════════════════════════════════════

    fn compose_title(&mut self, w: &WorldState) {
        let title = [
            r"    _        _                 _       ",
            r"   /_\   ___| |__   __ _  __ _| |_ ___ ",
            r"  / _ \ (_-<| '_ \ / _` |/ _` |  _/ -_)",
            r" /_/ \_\/__/|_| |_|\__, |\__,_|\__\___|",
            r"                   |___/               ",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_str(2, 1 + i, line, EMBER_FG, BASE_BG);
        }
        self.front.put_str(6, 7, "everything you touch burns", (180, 140, 110), BASE_BG);

        let continue_label = if w.best_level > 0 {
            format!("Continue (level {})", w.best_level + 1)
        } else {
            "Continue (no save)".to_string()
        };
        let items = [
            "New game".to_string(),
            continue_label,
            "Quit".to_string(),
        ];
        for (i, item) in items.iter().enumerate() {
            let selected = i == w.title_cursor;
            let disabled = i == 1 && w.best_level == 0;
            let color = match (selected, disabled) {
                (true, _) => (255, 220, 80),
                (false, true) => (90, 90, 100),
                (false, false) => (220, 220, 220),
            };
            let marker = if selected { "> " } else { "  " };
            self.front.put_str(8, 10 + i, &format!("{marker}{item}"), color, BASE_BG);
        }

        let info = format!("{} levels", w.total_levels);
        self.front.put_str(8, 14, &info, (100, 100, 110), BASE_BG);

        let help = [
            "Controls",
            "  <-/-> A/D     Move",
            "  Z/Up/Space    Jump (hold for height)",
            "  R  Restart    P  Pause    Esc  Title",
            "Light every lamp, then reach the gate.",
        ];
        for (i, line) in help.iter().enumerate() {
            let color = if i == 0 { (255, 200, 50) } else { (200, 200, 200) };
            self.front.put_str(8, 16 + i, line, color, BASE_BG);
        }

        if !w.message.is_empty() {
            let msg_row = self.front.height.saturating_sub(1);
            if msg_row > 16 + help.len() {
                self.front.fill_row(msg_row, MSG_BG);
                self.front.put_str(0, msg_row, &format!(" * {} ", w.message), (0, 0, 0), MSG_BG);
            }
        }
    }

    fn compose_game_complete(&mut self, w: &WorldState) {
        let box_art = [
            "+--------------------------------+",
            "|   The last gate has burned.    |",
            "+--------------------------------+",
        ];
        for (i, line) in box_art.iter().enumerate() {
            self.front.put_str(4, 4 + i, line, (255, 220, 50), BASE_BG);
        }
        let levels = format!("All {} levels cleared.", w.total_levels);
        self.front.put_str(6, 9, &levels, (235, 235, 235), BASE_BG);
        self.front.put_str(6, 11, "Enter / Esc: back to title", (100, 200, 255), BASE_BG);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ashgate::domain::grid::Cell;
    use ashgate::domain::tile::Tile;

    fn grid(rows: &[&[Tile]]) -> Grid {
        let mut g = Grid::new(rows[0].len(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                g.set_tile(IVec2::new(x as i32, y as i32), *tile);
            }
        }
        g
    }

    #[test]
    fn air_and_out_of_bounds_are_blank() {
        let g = grid(&[&[Tile::Air, Tile::Wall]]);
        assert_eq!(tile_sprite(&g, IVec2::new(0, 0), 0).0, [' ', ' ']);
        assert_eq!(tile_sprite(&g, IVec2::new(5, 5), 0).0, [' ', ' ']);
    }

    #[test]
    fn dirt_surface_differs_from_inner() {
        let g = grid(&[&[Tile::Dirt], &[Tile::Dirt]]);
        assert_eq!(tile_sprite(&g, IVec2::new(0, 0), 0).0, ['▀', '▀']);
        assert_eq!(tile_sprite(&g, IVec2::new(0, 1), 0).0, ['▓', '▓']);
    }

    #[test]
    fn corruption_heats_colors() {
        let mut g = grid(&[&[Tile::Dirt, Tile::Dirt]]);
        g.corrupt(IVec2::new(1, 0), MAX_CORRUPTION_STAGE);
        if let Some(cell) = g.cell_mut(IVec2::new(1, 0)) {
            *cell = Cell { visual_damage: 1000, ..*cell };
        }
        let (_, clean_fg, _) = tile_sprite(&g, IVec2::new(0, 0), 0);
        let (pair, hot_fg, _) = tile_sprite(&g, IVec2::new(1, 0), 0);
        assert_ne!(clean_fg, hot_fg);
        assert!(pair.iter().all(|c| matches!(c, '░' | '▒')));
    }

    #[test]
    fn spike_block_covers_its_height() {
        let spike = SpikeBlock::new(IVec2::new(30, 42), 2);
        let tiles: Vec<IVec2> = spike_tiles(&spike).collect();
        assert_eq!(tiles, vec![IVec2::new(2, 3), IVec2::new(2, 2)]);
    }

    #[test]
    fn color_blend_endpoints() {
        assert_eq!(lerp_rgb((0, 0, 0), (200, 100, 50), 0.0), (0, 0, 0));
        assert_eq!(lerp_rgb((0, 0, 0), (200, 100, 50), 1.0), (200, 100, 50));
    }
}
