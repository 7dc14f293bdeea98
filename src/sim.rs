use crate::grid::TerrainGrid;
use crate::levels::LevelCatalog;
use crate::model::{Mode, Particle, RainSource, GRID_H, GRID_W, SPAWN_DELAY};

/// Keys the simulation understands; everything else arrives as `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Key {
    Digit(u8),
    Escape,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerAction {
    PointerDown(usize, usize),
    PointerMove(usize, usize),
    PointerUp,
    PointerExit,
    Key(Key),
    NudgeOrigin(i32, i32),
    ToggleRain,
    Quit,
}

/// What one tick did; the host skips redraws for idle ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TickReport {
    pub(crate) spawned: bool,
    pub(crate) fell: usize,
    pub(crate) eroded: usize,
}

enum Fate {
    Fell,
    Eroded,
    Moved(Particle),
}

pub(crate) struct Simulation {
    catalog: LevelCatalog,
    mode: Mode,
    grid: TerrainGrid,
    particles: Vec<Particle>,
    rain: RainSource,
}

impl Simulation {
    pub(crate) fn new(catalog: LevelCatalog) -> Self {
        let empty = catalog.legend().empty_symbol();
        Self {
            catalog,
            mode: Mode::Menu,
            grid: TerrainGrid::blank(empty),
            particles: Vec::new(),
            rain: RainSource::default(),
        }
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub(crate) fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    pub(crate) fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn rain(&self) -> &RainSource {
        &self.rain
    }

    pub(crate) fn status_text(&self) -> String {
        match self.mode {
            Mode::Menu => format!(
                "Press Num keys from 1-{} to load a level",
                self.catalog.len()
            ),
            Mode::Play => "Game".to_string(),
        }
    }

    /* -----------------------------
       Mode transitions
    ------------------------------ */

    /// Back to the level select screen. Safe to call from any mode.
    pub(crate) fn enter_menu(&mut self) {
        self.mode = Mode::Menu;
        self.grid = TerrainGrid::blank(self.catalog.legend().empty_symbol());
        self.clear_session();
    }

    /// Starts level `index`. Returns false, changing nothing, if no such level exists.
    pub(crate) fn load_level(&mut self, index: usize) -> bool {
        let Some(level) = self.catalog.get(index) else {
            return false;
        };
        self.grid = TerrainGrid::load(level, self.catalog.legend().empty_symbol());
        self.mode = Mode::Play;
        self.clear_session();
        true
    }

    /// Level select from the menu; ignored while a level is running.
    pub(crate) fn select_level(&mut self, index: usize) -> bool {
        if self.mode != Mode::Menu {
            return false;
        }
        self.load_level(index)
    }

    fn clear_session(&mut self) {
        self.particles.clear();
        // origin is kept so the keyboard cursor stays where it was
        self.rain.raining = false;
        self.rain.spawn_countdown = 0;
    }

    /* -----------------------------
       Rain source
    ------------------------------ */

    pub(crate) fn begin_rain(&mut self, x: usize, y: usize) {
        if self.mode != Mode::Play || !in_bounds(x, y) {
            return;
        }
        self.rain.raining = true;
        self.rain.origin_x = x;
        self.rain.origin_y = y;
    }

    pub(crate) fn move_origin(&mut self, x: usize, y: usize) {
        if !in_bounds(x, y) {
            return;
        }
        self.rain.origin_x = x;
        self.rain.origin_y = y;
    }

    pub(crate) fn end_rain(&mut self) {
        self.rain.raining = false;
    }

    fn nudge_origin(&mut self, dx: i32, dy: i32) {
        let x = (self.rain.origin_x as i32 + dx).clamp(0, GRID_W as i32 - 1);
        let y = (self.rain.origin_y as i32 + dy).clamp(0, GRID_H as i32 - 1);
        self.move_origin(x as usize, y as usize);
    }

    fn toggle_rain(&mut self) {
        if self.rain.raining {
            self.end_rain();
        } else {
            self.begin_rain(self.rain.origin_x, self.rain.origin_y);
        }
    }

    /* -----------------------------
       Host callbacks
    ------------------------------ */

    pub(crate) fn on_pointer_down(&mut self, x: usize, y: usize) {
        self.begin_rain(x, y);
    }

    pub(crate) fn on_pointer_move(&mut self, x: usize, y: usize) {
        self.move_origin(x, y);
    }

    pub(crate) fn on_pointer_up(&mut self) {
        self.end_rain();
    }

    pub(crate) fn on_pointer_exit(&mut self) {
        self.end_rain();
    }

    pub(crate) fn on_key(&mut self, key: Key) {
        match key {
            Key::Escape => self.enter_menu(),
            Key::Digit(d) if d >= 1 => {
                self.select_level(d as usize - 1);
            }
            _ => {}
        }
    }

    pub(crate) fn on_tick(&mut self) -> TickReport {
        self.tick()
    }

    pub(crate) fn apply(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::PointerDown(x, y) => self.on_pointer_down(x, y),
            PlayerAction::PointerMove(x, y) => self.on_pointer_move(x, y),
            PlayerAction::PointerUp => self.on_pointer_up(),
            PlayerAction::PointerExit => self.on_pointer_exit(),
            PlayerAction::Key(k) => self.on_key(k),
            PlayerAction::NudgeOrigin(dx, dy) => self.nudge_origin(dx, dy),
            PlayerAction::ToggleRain => self.toggle_rain(),
            PlayerAction::Quit => {}
        }
    }

    /* -----------------------------
       Simulation step
    ------------------------------ */

    fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if self.mode != Mode::Play {
            return report;
        }

        // spawn
        if self.rain.raining {
            if self.rain.spawn_countdown == 0 {
                self.particles.push(Particle {
                    x: self.rain.origin_x,
                    y: self.rain.origin_y,
                });
                self.rain.spawn_countdown = SPAWN_DELAY;
                report.spawned = true;
            } else {
                self.rain.spawn_countdown -= 1;
            }
        } else {
            self.rain.spawn_countdown = 0;
        }

        // advance, oldest first; the new set replaces the old one at the end
        let grid = &mut self.grid;
        let mut next = Vec::with_capacity(self.particles.len());
        for p in &self.particles {
            match advance(grid, *p) {
                Fate::Fell => report.fell += 1,
                Fate::Eroded => report.eroded += 1,
                Fate::Moved(p) => next.push(p),
            }
        }
        self.particles = next;

        report
    }
}

fn in_bounds(x: usize, y: usize) -> bool {
    x < GRID_W && y < GRID_H
}

fn advance(grid: &mut TerrainGrid, p: Particle) -> Fate {
    let next_y = p.y + 1;
    if next_y >= grid.height() {
        return Fate::Fell;
    }
    if grid.is_destructible(grid.get(p.x, next_y)) {
        grid.erode(p.x, next_y);
        return Fate::Eroded;
    }
    Fate::Moved(Particle { x: p.x, y: next_y })
}
