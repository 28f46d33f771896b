//! Terminal implementation of `Drawer`: double-buffered, diff-based.
//!
//! The menu draws in a fixed 400x224 virtual screen. Every call is mapped
//! onto terminal cells and composed into `front`; `perform_rendering`
//! compares `front` with `back` (the previous flush) and only emits the
//! cells that changed, batched with `queue!` and flushed once.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::engine::{Align, Color, Drawer, FontId, Rect};

pub const VIRTUAL_WIDTH: i32 = 400;
pub const VIRTUAL_HEIGHT: i32 = 224;

const BASE_BG: Rgb = Rgb(22, 22, 35);
const FALLBACK_SIZE: (u16, u16) = (100, 40);

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Rgb(u8, u8, u8);

impl Rgb {
    /// Alpha-blend `color` over `self`.
    fn blend(self, color: Color) -> Rgb {
        let a = color.a.clamp(0.0, 1.0);
        let mix = |under: u8, over: f32| {
            let over = over.clamp(0.0, 1.0) * 255.0;
            (under as f32 * (1.0 - a) + over * a).round() as u8
        };
        Rgb(mix(self.0, color.r), mix(self.1, color.g), mix(self.2, color.b))
    }

    fn term(self) -> style::Color {
        style::Color::Rgb { r: self.0, g: self.1, b: self.2 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Rgb(255, 255, 255), bg: BASE_BG };

    /// Differs from every real cell, so the next flush repaints everything.
    const INVALID: Cell = Cell { ch: '\0', fg: Rgb(255, 0, 255), bg: Rgb(255, 0, 255) };
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

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        if x < self.width && y < self.height {
            self.cells.get_mut(y * self.width + x)
        } else {
            None
        }
    }
}

// ── Virtual screen → terminal mapping ──

/// Converts virtual pixels into terminal cells for a given terminal size.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Grid {
    cols: usize,
    rows: usize,
}

impl Grid {
    fn col(&self, x: i32) -> i32 {
        (x as i64 * self.cols as i64).div_euclid(VIRTUAL_WIDTH as i64) as i32
    }

    fn row(&self, y: i32) -> i32 {
        (y as i64 * self.rows as i64).div_euclid(VIRTUAL_HEIGHT as i64) as i32
    }

    /// Virtual width of one terminal column, rounded up.
    fn glyph_width(&self) -> i32 {
        (VIRTUAL_WIDTH + self.cols as i32 - 1) / self.cols.max(1) as i32
    }

    fn glyph_height(&self) -> i32 {
        (VIRTUAL_HEIGHT + self.rows as i32 - 1) / self.rows.max(1) as i32
    }

    /// Cell range `[c0, c1) x [r0, r1)` covered by a virtual rect.
    fn cells(&self, rect: Rect) -> (i32, i32, i32, i32) {
        (self.col(rect.x), self.col(rect.x + rect.w), self.row(rect.y), self.row(rect.y + rect.h))
    }
}

// ── TerminalDrawer ──

pub struct TerminalDrawer<W: Write = io::Stdout> {
    writer: BufWriter<W>,
    front: FrameBuffer,
    back: FrameBuffer,
    grid: Grid,
    scissors: Vec<Rect>,
    /// Query the terminal size each frame. Off for drawers writing to a buffer.
    track_terminal: bool,
}

impl TerminalDrawer<io::Stdout> {
    pub fn new() -> Self {
        TerminalDrawer::with_writer(io::stdout(), FALLBACK_SIZE.0 as usize, FALLBACK_SIZE.1 as usize, true)
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(BASE_BG.term()),
            Clear(ClearType::All)
        )?;
        self.sync_terminal_size();
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }
}

impl<W: Write> TerminalDrawer<W> {
    fn with_writer(writer: W, cols: usize, rows: usize, track_terminal: bool) -> Self {
        TerminalDrawer {
            writer: BufWriter::with_capacity(16384, writer),
            front: FrameBuffer::new(cols, rows),
            back: FrameBuffer::new(cols, rows),
            grid: Grid { cols, rows },
            scissors: Vec::new(),
            track_terminal,
        }
    }

    /// Start composing a new frame. Picks up terminal resizes.
    pub fn begin_frame(&mut self) {
        if self.track_terminal {
            self.sync_terminal_size();
        }
        self.front.clear();
        self.scissors.clear();
    }

    fn sync_terminal_size(&mut self) {
        let (tw, th) = terminal::size().unwrap_or(FALLBACK_SIZE);
        let (cols, rows) = (tw.max(1) as usize, th.max(1) as usize);
        if cols != self.grid.cols || rows != self.grid.rows {
            log::debug!("terminal resized to {cols}x{rows}");
            self.grid = Grid { cols, rows };
            self.front.resize(cols, rows);
            self.back.resize(cols, rows);
            self.back.cells.fill(Cell::INVALID);
        }
    }

    fn clip(&self) -> Rect {
        self.scissors
            .last()
            .copied()
            .unwrap_or(Rect::new(0, 0, VIRTUAL_WIDTH, VIRTUAL_HEIGHT))
    }

    /// Visit every cell whose top-left corner lies in both `rect` and the clip.
    fn for_cells(&mut self, rect: Rect, mut f: impl FnMut(&mut Cell)) {
        let (c0, c1, r0, r1) = self.grid.cells(rect.intersect(&self.clip()));
        for row in r0.max(0)..r1 {
            for col in c0.max(0)..c1 {
                if let Some(cell) = self.front.get_mut(col as usize, row as usize) {
                    f(cell);
                }
            }
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = None;
        let mut last_bg = None;
        let mut cursor_at: Option<(usize, usize)> = None;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if last_fg != Some(cell.fg) {
                    queue!(self.writer, SetForegroundColor(cell.fg.term()))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    queue!(self.writer, SetBackgroundColor(cell.bg.term()))?;
                    last_bg = Some(cell.bg);
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }
        self.back.cells.copy_from_slice(&self.front.cells);
        self.writer.flush()
    }
}

impl<W: Write> Drawer for TerminalDrawer<W> {
    fn screen_size(&self) -> (i32, i32) {
        (VIRTUAL_WIDTH, VIRTUAL_HEIGHT)
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.for_cells(rect, |cell| cell.bg = cell.bg.blend(color));
    }

    fn print_text(&mut self, font: FontId, rect: Rect, text: &str, align: Align, color: Color) {
        if color.a <= 0.0 || text.is_empty() {
            return;
        }
        let (w, h) = self.text_box_size(font, text);
        let x = rect.x + (align.horizontal() + 1) * (rect.w - w) / 2;
        let y = rect.y + (align.vertical() + 1) * (rect.h - h) / 2;

        let clip = self.clip();
        let row = self.grid.row(y + h / 2);
        let first_col = self.grid.col(x);
        let glyph = self.grid.glyph_width();
        for (i, ch) in text.chars().enumerate() {
            let col = first_col + i as i32;
            let px = x + i as i32 * glyph;
            if row < 0 || col < 0 || !clip.contains(px + glyph / 2, y + h / 2) {
                continue;
            }
            if let Some(cell) = self.front.get_mut(col as usize, row as usize) {
                cell.ch = ch;
                cell.fg = cell.bg.blend(color);
            }
        }
    }

    fn text_width(&self, _font: FontId, text: &str) -> i32 {
        text.chars().count() as i32 * self.grid.glyph_width()
    }

    fn text_box_size(&self, font: FontId, text: &str) -> (i32, i32) {
        (self.text_width(font, text), self.grid.glyph_height())
    }

    fn push_scissor(&mut self, rect: Rect) {
        let clipped = rect.intersect(&self.clip());
        self.scissors.push(clipped);
    }

    fn pop_scissor(&mut self) {
        self.scissors.pop();
    }

    fn perform_rendering(&mut self) {
        if let Err(err) = self.flush_diff() {
            log::warn!("terminal flush failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawer() -> TerminalDrawer<Vec<u8>> {
        TerminalDrawer::with_writer(Vec::new(), 100, 56, false)
    }

    fn row_text(d: &TerminalDrawer<Vec<u8>>, row: usize) -> String {
        (0..d.front.width).map(|x| d.front.get(x, row).ch).collect()
    }

    #[test]
    fn grid_maps_virtual_pixels_to_cells() {
        let grid = Grid { cols: 100, rows: 56 };
        assert_eq!(grid.col(0), 0);
        assert_eq!(grid.col(399), 99);
        assert_eq!(grid.row(223), 55);
        assert_eq!(grid.glyph_width(), 4);
        assert_eq!(grid.glyph_height(), 4);
        assert_eq!(grid.col(-4), -1);
    }

    #[test]
    fn text_is_aligned_in_its_rect() {
        let mut d = drawer();
        d.print_text(FontId::Regular, Rect::new(0, 0, 400, 4), "hi", Align::Center, Color::WHITE);
        assert_eq!(row_text(&d, 0).trim(), "hi");
        assert_eq!(d.front.get(49, 0).ch, 'h');

        d.print_text(FontId::Regular, Rect::new(0, 8, 400, 4), "end", Align::Right, Color::WHITE);
        assert!(row_text(&d, 2).ends_with("end"));
    }

    #[test]
    fn scissor_clips_text_and_rects() {
        let mut d = drawer();
        d.push_scissor(Rect::new(0, 0, 200, 224));
        d.draw_rect(Rect::new(0, 0, 400, 4), Color::rgb(1.0, 0.0, 0.0));
        d.print_text(FontId::Regular, Rect::new(196, 0, 0, 4), "abc", Align::TopLeft, Color::WHITE);
        d.pop_scissor();

        assert_eq!(d.front.get(0, 0).bg, Rgb(255, 0, 0));
        assert_eq!(d.front.get(50, 0).bg, BASE_BG);
        assert_eq!(d.front.get(49, 0).ch, 'a');
        assert_eq!(d.front.get(50, 0).ch, ' ');
    }

    #[test]
    fn nested_scissors_intersect() {
        let mut d = drawer();
        d.push_scissor(Rect::new(0, 0, 200, 224));
        d.push_scissor(Rect::new(100, 0, 300, 224));
        assert_eq!(d.clip(), Rect::new(100, 0, 100, 224));
        d.pop_scissor();
        assert_eq!(d.clip(), Rect::new(0, 0, 200, 224));
    }

    #[test]
    fn translucent_rects_blend() {
        let mut d = drawer();
        d.draw_rect(Rect::new(0, 0, 4, 4), Color::rgba(1.0, 1.0, 1.0, 0.5));
        let bg = d.front.get(0, 0).bg;
        assert!(bg.0 > BASE_BG.0 && bg.0 < 255);
    }

    #[test]
    fn second_flush_writes_only_changes() {
        let mut d = drawer();
        d.back.cells.fill(Cell::INVALID);
        d.begin_frame();
        d.perform_rendering();
        let full = d.writer.get_ref().len();
        assert!(full > 0);

        d.begin_frame();
        d.print_text(FontId::Regular, Rect::new(0, 0, 0, 4), "x", Align::TopLeft, Color::WHITE);
        d.perform_rendering();
        let delta = d.writer.get_ref().len() - full;
        assert!(delta > 0 && delta < full / 10);
    }
}
