/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Screen geometry is fixed (see the layout constants); `catalog_cell_at`
/// and `tray_slot_at` map mouse coordinates back onto it.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::catalog::{self, Category};
use crate::sim::event::NoticeLevel;
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 16],  // up to 16 bytes (emoji + variation selector)
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this char occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so gaps
    /// between rows match the cell color on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 24, g: 26, b: 38 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    /// Sentinel cell used to invalidate the back buffer.
    const INVALID: Cell = Cell {
        ch: [b'?', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn from_char_wide(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::from_char(c, fg, bg);
        cell.wide = true;
        cell
    }

    /// Continuation half of a wide cell; carries the bg so diffs notice changes.
    fn cont(bg: Color) -> Self {
        Cell { ch: [0; 16], ch_len: 0, bg: Self::norm_bg(bg), cont: true, ..Self::BLANK }
    }

    /// Append a combining code point (VS16, ZWJ) to this cell, if it fits.
    fn push_combining(&mut self, c: char) {
        let mut tmp = [0u8; 4];
        let bytes = c.encode_utf8(&mut tmp).as_bytes();
        let start = self.ch_len as usize;
        if start + bytes.len() <= self.ch.len() {
            self.ch[start..start + bytes.len()].copy_from_slice(bytes);
            self.ch_len += bytes.len() as u8;
        }
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or("?")
    }
}

/// Code points the terminal draws two columns wide (the catalog's emoji ranges).
fn is_wide(c: char) -> bool {
    let cp = c as u32;
    cp >= 0x1F000 || (0x2600..=0x27BF).contains(&cp) || (0x2B00..=0x2BFF).contains(&cp)
}

fn is_combining(c: char) -> bool {
    matches!(c, '\u{FE0F}' | '\u{FE0E}' | '\u{200D}')
}

/// Terminal columns a string occupies.
fn text_width(s: &str) -> usize {
    s.chars()
        .filter(|c| !is_combining(*c))
        .map(|c| if is_wide(c) { 2 } else { 1 })
        .sum()
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        if x < self.width && y < self.height {
            Some(&mut self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Write text at (x, y). Emoji take two columns; VS16/ZWJ join the
    /// preceding glyph. Returns the column after the last glyph.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) -> usize {
        let mut cx = x;
        let mut last: Option<usize> = None;
        for ch in s.chars() {
            if is_combining(ch) {
                if let Some(cell) = last.and_then(|lx| self.get_mut(lx, y)) {
                    cell.push_combining(ch);
                }
                continue;
            }
            if is_wide(ch) {
                if cx + 1 >= self.width { break; }
                self.set(cx, y, Cell::from_char_wide(ch, fg, bg));
                self.set(cx + 1, y, Cell::cont(bg));
                last = Some(cx);
                cx += 2;
            } else {
                if cx >= self.width { break; }
                self.set(cx, y, Cell::from_char(ch, fg, bg));
                last = Some(cx);
                cx += 1;
            }
        }
        cx
    }

    fn fill_row(&mut self, y: usize, x0: usize, x1: usize, bg: Color) {
        for x in x0..x1.min(self.width) {
            self.set(x, y, Cell::from_char(' ', Color::White, bg));
        }
    }
}

// ── Layout ──

const HUD_ROW: usize = 0;
const HEADING_ROW: usize = 2;

/// Selection grid: one category per row, two screen rows apart.
const GRID_ROW: usize = 4;
const GRID_ROW_STEP: usize = 2;
const GRID_LABEL_W: usize = 12;
const GRID_X: usize = 2 + GRID_LABEL_W;
/// "[x] 🐶 " = 7 columns per entry
const GRID_CELL_W: usize = 7;

/// Tray: each slot is a 3-row tile, TRAY_SLOT_W columns plus a gap.
const TRAY_ROW: usize = 4;
const TRAY_H: usize = 3;
const TRAY_X: usize = 4;
const TRAY_SLOT_W: usize = 6;
const TRAY_GAP: usize = 2;
const LOG_ROW: usize = TRAY_ROW + TRAY_H + 5;

/// Selection grid cell under a terminal position, as (row, col).
pub fn catalog_cell_at(col: u16, row: u16) -> Option<(usize, usize)> {
    let (x, y) = (col as usize, row as usize);
    if x < GRID_X || y < GRID_ROW || (y - GRID_ROW) % GRID_ROW_STEP != 0 {
        return None;
    }
    let r = (y - GRID_ROW) / GRID_ROW_STEP;
    let c = (x - GRID_X) / GRID_CELL_W;
    catalog::at(r, c).map(|_| (r, c))
}

fn tray_slot_x(index: usize) -> usize {
    TRAY_X + index * (TRAY_SLOT_W + TRAY_GAP)
}

/// Tray slot under a terminal position, for a tray of `len` slots.
pub fn tray_slot_at(col: u16, row: u16, len: usize) -> Option<usize> {
    let (x, y) = (col as usize, row as usize);
    if !(TRAY_ROW..TRAY_ROW + TRAY_H).contains(&y) || x < TRAY_X {
        return None;
    }
    let pitch = TRAY_SLOT_W + TRAY_GAP;
    let index = (x - TRAY_X) / pitch;
    let inside = (x - TRAY_X) % pitch < TRAY_SLOT_W;
    (inside && index < len).then_some(index)
}

// ── Palette ──

const HUD_BG: Color = Color::Rgb { r: 20, g: 40, b: 90 };
const ACCENT: Color = Color::Rgb { r: 0, g: 123, b: 255 };
const HEADING: Color = Color::Rgb { r: 255, g: 210, b: 80 };
const DIM: Color = Color::DarkGrey;
const TILE_BG: Color = Color::Rgb { r: 50, g: 54, b: 74 };
const TILE_CURSOR_BG: Color = Color::Rgb { r: 70, g: 90, b: 140 };
const TILE_LIFTED_BG: Color = Color::Rgb { r: 0, g: 123, b: 255 };
const TILE_WON_BG: Color = Color::Rgb { r: 40, g: 120, b: 60 };
const GRID_CURSOR_BG: Color = Color::Rgb { r: 60, g: 64, b: 96 };

fn notice_colors(level: NoticeLevel) -> (Color, Color) {
    match level {
        NoticeLevel::Info => (Color::White, Color::Rgb { r: 30, g: 100, b: 200 }),
        NoticeLevel::Success => (Color::Black, Color::Rgb { r: 80, g: 200, b: 100 }),
        NoticeLevel::Warning => (Color::Black, Color::Rgb { r: 240, g: 170, b: 40 }),
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
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
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → clear for a clean transition
        let phase = world.phase();
        if self.last_phase != Some(phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(phase);
        }

        self.front.clear();
        self.compose_hud(world);
        match phase {
            Phase::Selecting => self.compose_selection(world),
            Phase::Guessing | Phase::Won => self.compose_round(world),
        }
        self.compose_toast(world);
        self.compose_help(phase);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                // Skip continuation cells (right half of wide emoji)
                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, w: &WorldState) {
        let buf_w = self.front.width;
        self.front.fill_row(HUD_ROW, 0, buf_w, HUD_BG);
        let status = match w.phase() {
            Phase::Selecting => format!(
                "Selected {}  ({}-{})",
                w.game.selected_icons().len(), w.limits.min, w.limits.max,
            ),
            Phase::Guessing => format!("Attempt {}", w.game.attempt_number() + 1),
            Phase::Won => format!("Solved in {}", w.game.attempt_number()),
        };
        let hud = format!(" ◆ ICON ORDER   {status} ");
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    fn compose_selection(&mut self, w: &WorldState) {
        let heading = format!("Choose your Icons ({}-{}):", w.limits.min, w.limits.max);
        self.front.put_str(2, HEADING_ROW, &heading, HEADING, Color::Reset);

        for (r, cat) in Category::ALL.iter().enumerate() {
            let y = GRID_ROW + r * GRID_ROW_STEP;
            self.front.put_str(2, y, cat.label(), DIM, Color::Reset);
            for (c, icon) in cat.icons().iter().enumerate() {
                let x = GRID_X + c * GRID_CELL_W;
                let checked = w.game.is_selected(icon);
                let under_cursor = w.select_cursor == (r, c);
                let bg = if under_cursor { GRID_CURSOR_BG } else { Color::Reset };
                let fg = if checked { ACCENT } else { Color::White };
                self.front.fill_row(y, x, x + GRID_CELL_W - 1, bg);
                let mark = if checked { "[x] " } else { "[ ] " };
                let nx = self.front.put_str(x, y, mark, fg, bg);
                self.front.put_str(nx, y, icon, Color::Reset, bg);
            }
        }

        let info_row = GRID_ROW + catalog::rows() * GRID_ROW_STEP;
        let picked = w.game.selected_icons().join(" ");
        let nx = self.front.put_str(2, info_row, "Selected: ", DIM, Color::Reset);
        self.front.put_str(nx, info_row, &picked, Color::Reset, Color::Reset);

        let count = w.game.selected_icons().len();
        let start_fg = if w.limits.contains(count) { ACCENT } else { DIM };
        self.front.put_str(2, info_row + 2, "▸ ENTER  Start Game", start_fg, Color::Reset);
    }

    fn compose_round(&mut self, w: &WorldState) {
        let won = w.game.is_game_won();
        self.front.put_str(2, HEADING_ROW, "Arrange the icons in the correct order:", HEADING, Color::Reset);

        let lifted = w.tray.dragging();
        for (i, icon) in w.tray.icons().iter().enumerate() {
            let x = tray_slot_x(i);
            let bg = if lifted == Some(i) {
                TILE_LIFTED_BG
            } else if w.tray_cursor == i {
                TILE_CURSOR_BG
            } else if won {
                TILE_WON_BG
            } else {
                TILE_BG
            };
            for dy in 0..TRAY_H {
                self.front.fill_row(TRAY_ROW + dy, x, x + TRAY_SLOT_W, bg);
            }
            let icon_x = x + (TRAY_SLOT_W - text_width(icon)) / 2;
            self.front.put_str(icon_x, TRAY_ROW + 1, icon, Color::Reset, bg);
            let label = format!("{}", i + 1);
            self.front.put_str(x + TRAY_SLOT_W / 2, TRAY_ROW + TRAY_H, &label, DIM, Color::Reset);
        }

        let action_row = TRAY_ROW + TRAY_H + 2;
        if won {
            let msg = format!("★ Solved in {} attempts ★   N  New Game", w.game.attempt_number());
            self.front.put_str(2, action_row, &msg, Color::Rgb { r: 80, g: 220, b: 100 }, Color::Reset);
        } else {
            self.front.put_str(2, action_row, "▸ ENTER  Submit Guess", ACCENT, Color::Reset);
        }

        self.front.put_str(2, LOG_ROW, "Guess Log:", HEADING, Color::Reset);
        let last_row = self.front.height.saturating_sub(3);
        for (i, result) in w.game.guess_log().iter().enumerate() {
            let y = LOG_ROW + 1 + i;
            if y >= last_row { break; }
            let fg = if result.correct_count == result.guess.len() { ACCENT } else { Color::White };
            self.front.put_str(4, y, &result.to_string(), fg, Color::Reset);
        }
    }

    fn compose_toast(&mut self, w: &WorldState) {
        if w.message.is_empty() { return; }
        let row = self.front.height.saturating_sub(2);
        if row <= HEADING_ROW { return; }
        let (fg, bg) = notice_colors(w.message_level);
        let msg = format!(" ◈ {} ", w.message);
        let buf_w = self.front.width;
        self.front.fill_row(row, 0, buf_w, bg);
        self.front.put_str(0, row, &msg, fg, bg);
    }

    fn compose_help(&mut self, phase: Phase) {
        let row = self.front.height.saturating_sub(1);
        let help = match phase {
            Phase::Selecting => " ←↑↓→ Move  SPACE Toggle  ENTER Start  Q Quit  │  Mouse: click to toggle",
            Phase::Guessing => " ←→ Move  SPACE Pick/Drop  ESC Cancel  ENTER Submit  N New  Q Quit  │  Mouse: drag",
            Phase::Won => " ←→ Move  SPACE Pick/Drop  N New Game  Q Quit",
        };
        self.front.put_str(0, row, help, DIM, Color::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ROW_LEN;

    #[test]
    fn emoji_widths() {
        assert_eq!(text_width("🐶"), 2);
        assert_eq!(text_width("✈️"), 2);
        assert_eq!(text_width("ab"), 2);
        assert_eq!(text_width("Guess 1: 🐼"), 11);
    }

    #[test]
    fn put_str_joins_variation_selector() {
        let mut fb = FrameBuffer::new(10, 1);
        let end = fb.put_str(0, 0, "⛵️x", Color::White, Color::Reset);
        assert_eq!(end, 3);
        assert_eq!(fb.get(0, 0).as_str(), "⛵️");
        assert!(fb.get(0, 0).wide);
        assert!(fb.get(1, 0).cont);
        assert_eq!(fb.get(2, 0).as_str(), "x");
    }

    #[test]
    fn put_str_clips_at_edge() {
        let mut fb = FrameBuffer::new(3, 1);
        let end = fb.put_str(0, 0, "a🐶🐱", Color::White, Color::Reset);
        assert_eq!(end, 3);
        assert_eq!(fb.get(0, 0).as_str(), "a");
    }

    #[test]
    fn tray_hit_testing() {
        let y = TRAY_ROW as u16 + 1;
        assert_eq!(tray_slot_at(TRAY_X as u16, y, 4), Some(0));
        assert_eq!(tray_slot_at((TRAY_X + TRAY_SLOT_W - 1) as u16, y, 4), Some(0));
        // Gap between slots
        assert_eq!(tray_slot_at((TRAY_X + TRAY_SLOT_W) as u16, y, 4), None);
        assert_eq!(tray_slot_at(tray_slot_x(3) as u16, y, 4), Some(3));
        // Past the last slot
        assert_eq!(tray_slot_at(tray_slot_x(4) as u16, y, 4), None);
        // Outside the tray rows
        assert_eq!(tray_slot_at(TRAY_X as u16, (TRAY_ROW + TRAY_H) as u16, 4), None);
        assert_eq!(tray_slot_at(0, y, 4), None);
    }

    #[test]
    fn catalog_hit_testing() {
        let y0 = GRID_ROW as u16;
        assert_eq!(catalog_cell_at(GRID_X as u16, y0), Some((0, 0)));
        assert_eq!(catalog_cell_at((GRID_X + GRID_CELL_W * 2 + 3) as u16, y0 + 2), Some((1, 2)));
        // Label column and spacer rows don't hit
        assert_eq!(catalog_cell_at(2, y0), None);
        assert_eq!(catalog_cell_at(GRID_X as u16, y0 + 1), None);
        // Below the grid
        assert_eq!(catalog_cell_at(GRID_X as u16, y0 + 8), None);
        // Right of the last column
        assert_eq!(catalog_cell_at((GRID_X + GRID_CELL_W * ROW_LEN) as u16, y0), None);
    }
}
