use crate::model::{Mode, Rgb, ACID, CURSOR, GRID_H, GRID_W, MENU_BG, PLAY_BG};
use crate::sim::Simulation;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

/// Terminal columns per bead, so the board looks square.
const BEAD_COLS: u16 = 2;
const BOARD_COLS: u16 = GRID_W as u16 * BEAD_COLS;
const BOARD_ROWS: u16 = GRID_H as u16;
/// Board, spacer, status line and the help line.
const FRAME_ROWS: u16 = BOARD_ROWS + 3;

const MENU_TITLE: Rgb = Rgb::from_hex(0x000000);
const MENU_ITEM: Rgb = Rgb::from_hex(0x0000FF);
const MENU_HINT: Rgb = Rgb::from_hex(0x555555);

const HELP: &str = "mouse: hold to rain | arrows+space: keyboard rain | esc menu | q quit";

/* -----------------------------
   Bead board: what the host paints
------------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Bead {
    pub(crate) color: Rgb,
    pub(crate) glyph: Option<(char, Rgb)>,
    /// Stand-in character when colors are off.
    pub(crate) mark: char,
}

impl Bead {
    fn plain(color: Rgb) -> Self {
        Self {
            color,
            glyph: None,
            mark: ' ',
        }
    }
}

pub(crate) struct BeadBoard {
    beads: [[Bead; GRID_W]; GRID_H],
    status: String,
}

impl BeadBoard {
    pub(crate) fn new() -> Self {
        Self {
            beads: [[Bead::plain(Rgb::default()); GRID_W]; GRID_H],
            status: String::new(),
        }
    }

    pub(crate) fn bead(&self, x: usize, y: usize) -> Bead {
        self.beads[y][x]
    }

    pub(crate) fn status(&self) -> &str {
        &self.status
    }

    /// Paints every bead and wipes all glyphs.
    fn fill(&mut self, color: Rgb) {
        for b in self.beads.iter_mut().flatten() {
            *b = Bead::plain(color);
        }
    }

    fn color(&mut self, x: usize, y: usize, color: Rgb, mark: char) {
        let b = &mut self.beads[y][x];
        b.color = color;
        b.mark = mark;
    }

    fn glyph(&mut self, x: usize, y: usize, ch: char, color: Rgb) {
        let b = &mut self.beads[y][x];
        b.glyph = Some((ch, color));
        b.mark = ch;
    }

    fn print(&mut self, x: usize, y: usize, text: &str, color: Rgb) {
        if y >= GRID_H {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let xx = x + i;
            if xx >= GRID_W {
                break;
            }
            self.glyph(xx, y, ch, color);
        }
    }
}

/// Repaints the whole board from the current simulation state.
pub(crate) fn paint(board: &mut BeadBoard, sim: &Simulation) {
    match sim.mode() {
        Mode::Menu => draw_menu(board, sim),
        Mode::Play => draw_play(board, sim),
    }
    board.status = sim.status_text();
}

fn draw_menu(board: &mut BeadBoard, sim: &Simulation) {
    board.fill(MENU_BG);
    board.print(2, 2, "LEVEL SELECT", MENU_TITLE);

    let count = sim.catalog().len();
    let spacing = if count <= 3 { 2 } else { 1 };
    for (i, name) in sim.catalog().names().enumerate() {
        let line = format!("{} = {}", i + 1, name);
        board.print(1, 6 + i * spacing, &line, MENU_ITEM);
    }

    let hint_row = if count <= 3 { 13 } else { 15 };
    board.print(3, hint_row, "ESC = MENU", MENU_HINT);
}

fn draw_play(board: &mut BeadBoard, sim: &Simulation) {
    board.fill(PLAY_BG);
    let legend = sim.catalog().legend();
    for (y, row) in sim.grid().tiles().iter().enumerate() {
        for (x, sym) in row.iter().enumerate() {
            if let Some(color) = legend.color(*sym) {
                board.color(x, y, color, sym.0);
            }
        }
    }
    for p in sim.particles() {
        board.color(p.x, p.y, ACID, '*');
    }

    let rain = sim.rain();
    if !rain.raining {
        board.glyph(rain.origin_x, rain.origin_y, '+', CURSOR);
    }
}

/* -----------------------------
   Terminal cells
------------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn get(&self, x: u16, y: u16) -> Cell {
        self.cells[self.idx(x, y)]
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(
            xx,
            y,
            Cell {
                ch,
                fg,
                bg: Color::Black,
            },
        );
    }
}

/// Where the board sits on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BoardLayout {
    pub(crate) x0: u16,
    pub(crate) y0: u16,
}

impl BoardLayout {
    pub(crate) fn centered(cols: u16, rows: u16) -> Self {
        Self {
            x0: cols.saturating_sub(BOARD_COLS) / 2,
            y0: rows.saturating_sub(FRAME_ROWS) / 2,
        }
    }

    /// Bead under a terminal cell, if any.
    pub(crate) fn hit(&self, col: u16, row: u16) -> Option<(usize, usize)> {
        if col < self.x0 || row < self.y0 {
            return None;
        }
        let (dx, dy) = (col - self.x0, row - self.y0);
        if dx >= BOARD_COLS || dy >= BOARD_ROWS {
            return None;
        }
        Some(((dx / BEAD_COLS) as usize, dy as usize))
    }
}

fn fits(cols: u16, rows: u16) -> bool {
    cols >= BOARD_COLS && rows >= FRAME_ROWS
}

/// Lays the bead board out into terminal cells.
pub(crate) fn compose(
    board: &BeadBoard,
    buf: &mut CellBuffer,
    layout: BoardLayout,
    enable_color: bool,
) {
    buf.clear();
    if !fits(buf.w, buf.h) {
        draw_text(buf, 0, 0, "terminal too small", Color::White);
        return;
    }

    for y in 0..GRID_H {
        for x in 0..GRID_W {
            let bead = board.bead(x, y);
            let cx = layout.x0 + x as u16 * BEAD_COLS;
            let cy = layout.y0 + y as u16;

            let (ch, fg, bg) = if enable_color {
                match bead.glyph {
                    Some((ch, fg)) => (ch, fg.to_color(), bead.color.to_color()),
                    None => (' ', Color::White, bead.color.to_color()),
                }
            } else {
                (bead.mark, Color::White, Color::Black)
            };

            buf.set(cx, cy, Cell { ch, fg, bg });
            let pad = if enable_color || bead.glyph.is_some() { ' ' } else { bead.mark };
            for i in 1..BEAD_COLS {
                buf.set(cx + i, cy, Cell { ch: pad, fg, bg });
            }
        }
    }

    draw_text(buf, layout.x0, layout.y0 + BOARD_ROWS + 1, board.status(), Color::White);
    draw_text(buf, 0, buf.h.saturating_sub(1), HELP, Color::DarkGrey);
}

/* -----------------------------
   Terminal presenter
------------------------------ */

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            DisableMouseCapture,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn layout(&self) -> BoardLayout {
        BoardLayout::centered(self.cols, self.rows)
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.get(x, y);
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelCatalog;
    use crate::sim::Simulation;

    fn sim() -> Simulation {
        Simulation::new(LevelCatalog::builtin().unwrap())
    }

    fn row_text(board: &BeadBoard, y: usize) -> String {
        (0..GRID_W)
            .map(|x| board.bead(x, y).glyph.map(|(ch, _)| ch).unwrap_or(' '))
            .collect()
    }

    #[test]
    fn menu_lists_levels() {
        let s = sim();
        let mut board = BeadBoard::new();
        paint(&mut board, &s);

        assert_eq!(row_text(&board, 2).trim(), "LEVEL SELECT");
        assert_eq!(row_text(&board, 6).trim(), "1 = FLOOR");
        assert_eq!(row_text(&board, 8).trim(), "2 = TREE");
        assert_eq!(row_text(&board, 10).trim(), "3 = MOUNTAIN");
        assert_eq!(row_text(&board, 13).trim(), "ESC = MENU");
        assert_eq!(board.bead(1, 6).glyph, Some(('1', MENU_ITEM)));
        assert_eq!(board.bead(0, 0).color, MENU_BG);
        assert_eq!(board.status(), "Press Num keys from 1-3 to load a level");
    }

    #[test]
    fn play_paints_terrain_and_acid() {
        let mut s = sim();
        s.select_level(0);
        s.on_pointer_down(5, 0);
        s.on_tick();

        let mut board = BeadBoard::new();
        paint(&mut board, &s);
        assert_eq!(board.bead(0, 0).color, PLAY_BG);
        assert_eq!(board.bead(0, 0).glyph, None);
        assert_eq!(board.bead(3, 12).color, Rgb::from_hex(0x777777));
        assert_eq!(board.bead(5, 1).color, ACID);
        assert_eq!(board.bead(5, 1).mark, '*');
        assert_eq!(board.status(), "Game");
    }

    #[test]
    fn returning_to_menu_wipes_play_colors() {
        let mut s = sim();
        s.select_level(1);
        let mut board = BeadBoard::new();
        paint(&mut board, &s);
        s.on_key(crate::sim::Key::Escape);
        paint(&mut board, &s);
        for y in 0..GRID_H {
            for x in 0..GRID_W {
                assert_eq!(board.bead(x, y).color, MENU_BG);
            }
        }
    }

    #[test]
    fn layout_hit_maps_cells_to_beads() {
        let layout = BoardLayout::centered(80, 24);
        assert_eq!(layout, BoardLayout { x0: 24, y0: 2 });
        assert_eq!(layout.hit(24, 2), Some((0, 0)));
        assert_eq!(layout.hit(25, 2), Some((0, 0)));
        assert_eq!(layout.hit(26, 3), Some((1, 1)));
        assert_eq!(layout.hit(55, 17), Some((15, 15)));
        assert_eq!(layout.hit(56, 17), None);
        assert_eq!(layout.hit(30, 18), None);
        assert_eq!(layout.hit(23, 5), None);
    }

    #[test]
    fn compose_places_beads_and_status() {
        let mut s = sim();
        s.select_level(0);
        let mut board = BeadBoard::new();
        paint(&mut board, &s);

        let layout = BoardLayout::centered(40, 20);
        let mut buf = CellBuffer::new(40, 20);
        compose(&board, &mut buf, layout, true);
        let wall = Rgb::from_hex(0x777777).to_color();
        assert_eq!(buf.get(layout.x0, layout.y0 + 10).bg, wall);
        assert_eq!(buf.get(layout.x0 + 1, layout.y0 + 10).bg, wall);
        assert_eq!(buf.get(layout.x0, layout.y0).bg, PLAY_BG.to_color());
        assert_eq!(buf.get(layout.x0, layout.y0 + 17).ch, 'G');

        assert_eq!(buf.get(layout.x0, layout.y0).ch, '+');

        compose(&board, &mut buf, layout, false);
        assert_eq!(buf.get(layout.x0, layout.y0 + 10).ch, '#');
        assert_eq!(buf.get(layout.x0 + 2, layout.y0).ch, ' ');
        assert_eq!(buf.get(layout.x0 + 3, layout.y0 + 10).ch, '#');
    }

    #[test]
    fn compose_reports_small_terminal() {
        let board = BeadBoard::new();
        let mut buf = CellBuffer::new(20, 10);
        compose(&board, &mut buf, BoardLayout::centered(20, 10), true);
        assert_eq!(buf.get(0, 0).ch, 't');
    }
}
