/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.
///
/// The world is pixel-based; the terminal is cell-based. One 32px tile maps
/// to 2 terminal columns and 1 terminal row, so entity pixel boxes are
/// projected with px-per-column = tile_size / 2 and px-per-row = tile_size.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{EntityKind, Mode, Visual};
use crate::sim::world::WorldState;
use crate::ui::theme::Theme;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells. Using the
    /// same RGB for Clear and every cell keeps inter-row gap pixels from
    /// showing through as horizontal lines on VTE-based terminals.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 18, b: 28 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer: differs from any real
    /// cell, so every position gets diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
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

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::new(ch, fg, bg));
            cx += 1;
        }
    }
}

// ── Renderer ──

/// Each 32px tile = 2 terminal columns wide.
const CELL_W: usize = 2;

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    player_visual: Visual,
}

impl Renderer {
    pub fn new(theme: &Theme) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            player_visual: theme.player,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
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

        self.front.clear();
        self.compose_game(world);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, w: &WorldState) {
        let buf_w = self.front.width;

        // ── HUD row ──
        let mode = match w.player.mode {
            Mode::Platformer => "PLATFORMER",
            Mode::TopDown => "TOP-DOWN",
        };
        let carrying = if w.rider.is_some() { "  [carrying]" } else { "" };
        let hud = format!(" Mode:{mode}{carrying} ");
        let hud_bg = Color::Rgb { r: 20, g: 20, b: 60 };
        for x in 0..buf_w {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, hud_bg));
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::White, hud_bg);

        // ── Map: tiles first ──
        let px_col = w.grid.tile_size() / CELL_W as f32;
        let px_row = w.grid.tile_size();

        for (i, tile) in w.grid.iter().enumerate() {
            let row = i / w.grid.cols();
            let col = i % w.grid.cols();
            let bg = rgb(tile.visual.color);
            let (glyph, fg) = match tile.kind {
                EntityKind::Background => (' ', Color::White),
                _ => (tile.visual.glyph, Color::Black),
            };
            let ty = MAP_ROW + row;
            let tx = col * CELL_W;
            self.front.set(tx, ty, Cell::new(glyph, fg, bg));
            self.front.set(tx + 1, ty, Cell::new(glyph, fg, bg));
        }

        // ── Movable objects on top of tiles ──
        for m in &w.movables {
            self.fill_px_rect(m.x, m.y, m.width, m.height, m.visual, px_col, px_row);
        }

        // ── Player last ──
        let p = &w.player;
        self.fill_px_rect(p.x, p.y, p.width, p.height, self.player_visual, px_col, px_row);

        // ── Message bar ──
        let msg_row = MAP_ROW + w.grid.rows() + 1;
        if let Some(msg) = w.message() {
            let text = format!(" {msg} ");
            let bar_bg = Color::Rgb { r: 200, g: 180, b: 50 };
            for x in 0..buf_w {
                self.front.set(x, msg_row, Cell::new(' ', Color::Black, bar_bg));
            }
            self.front.put_str(0, msg_row, &text, Color::Black, bar_bg);
        }

        // ── Help bar ──
        let help_row = MAP_ROW + w.grid.rows() + 3;
        let help = " Arrows:Move  Space:Mode  Z:Paint  R:Restart  Q:Quit  │  Pad: A:Jump X:Paint Y:Mode";
        self.front.put_str(0, help_row, help, Color::DarkGrey, Cell::BASE_BG);
    }

    /// Project a pixel box onto terminal cells and fill it with a glyph.
    fn fill_px_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        visual: Visual,
        px_col: f32,
        px_row: f32,
    ) {
        let c0 = (x / px_col).round().max(0.0) as usize;
        let c1 = ((x + w) / px_col).round().max(0.0) as usize;
        let r0 = (y / px_row).round().max(0.0) as usize;
        let r1 = ((y + h) / px_row).round().max(0.0) as usize;
        let fg = rgb(visual.color);
        for row in r0..r1.max(r0 + 1) {
            for col in c0..c1.max(c0 + 1) {
                self.front
                    .set(col, MAP_ROW + row, Cell::new(visual.glyph, fg, Cell::BASE_BG));
            }
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Set explicit base colors at start of frame. Not ResetColor: that
        // is the terminal's native default, which may differ from BASE_BG.
        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell == prev {
                    need_move = true;
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

                queue!(self.writer, Print(cell.ch))?;

                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}
