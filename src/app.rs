use crate::config::{self, Args, Settings};
use crate::input::{collect_input_nonblocking, InputMapper};
use crate::levels::LevelCatalog;
use crate::render::{compose, paint, BeadBoard, Terminal};
use crate::sim::{PlayerAction, Simulation};
use anyhow::Context;
use std::time::{Duration, Instant};

pub(crate) struct App {
    settings: Settings,
    sim: Simulation,
    board: BeadBoard,
    mapper: InputMapper,
    term: Terminal,
    should_quit: bool,
}

impl App {
    fn init(args: &Args) -> anyhow::Result<Self> {
        let settings = config::resolve(args);

        let catalog = match &settings.levels_path {
            Some(path) => LevelCatalog::load(path)?,
            None => LevelCatalog::builtin().context("built-in levels are malformed")?,
        };

        let mut sim = Simulation::new(catalog);
        if let Some(n) = settings.start_level {
            if n >= 1 {
                sim.select_level(n - 1);
            }
        }

        let term = Terminal::begin()?;

        Ok(Self {
            settings,
            sim,
            board: BeadBoard::new(),
            mapper: InputMapper::default(),
            term,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let sim_step = Duration::from_millis(self.settings.tick_ms);

        let mut last_frame = Instant::now();
        let mut sim_accum = Duration::ZERO;
        let mut dirty = true;
        let mut full_redraw = true;

        while !self.should_quit {
            if self.term.resize_if_needed()? {
                full_redraw = true;
                dirty = true;
            }

            // input
            let layout = self.term.layout();
            let events = collect_input_nonblocking(frame_dt)?;
            for ev in events {
                let Some(action) = self.mapper.map(layout, ev) else {
                    continue;
                };
                if action == PlayerAction::Quit {
                    self.should_quit = true;
                    break;
                }
                self.sim.apply(action);
                dirty = true;
            }

            // sim fixed-step
            let now = Instant::now();
            let real_dt = now.saturating_duration_since(last_frame);
            last_frame = now;
            sim_accum = sim_accum.saturating_add(real_dt);

            while sim_accum >= sim_step {
                let report = self.sim.on_tick();
                sim_accum = sim_accum.saturating_sub(sim_step);
                if report.spawned
                    || report.fell > 0
                    || report.eroded > 0
                    || !self.sim.particles().is_empty()
                {
                    dirty = true;
                }
            }

            // render
            if dirty {
                paint(&mut self.board, &self.sim);
                compose(
                    &self.board,
                    &mut self.term.cur,
                    layout,
                    self.settings.enable_color,
                );
                self.term.present(!full_redraw)?;
                dirty = false;
                full_redraw = false;
            }

            // frame cap
            spin_sleep(frame_dt, now);
        }

        Ok(())
    }
}

pub(crate) fn run(args: Args) -> anyhow::Result<()> {
    let mut app = App::init(&args)?;
    let res = app.run();
    app.term.end()?;
    res
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
