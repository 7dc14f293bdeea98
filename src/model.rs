use std::fmt;

pub(crate) const GRID_W: usize = 16;
pub(crate) const GRID_H: usize = 16;

/// Ticks to wait between two spawned drops while the rain is held.
pub(crate) const SPAWN_DELAY: u32 = 2;

pub(crate) const MENU_BG: Rgb = Rgb::from_hex(0xEBEBEB);
pub(crate) const PLAY_BG: Rgb = Rgb::from_hex(0xCAF6FC);
pub(crate) const ACID: Rgb = Rgb::from_hex(0x0DDE00);
pub(crate) const CURSOR: Rgb = Rgb::from_hex(0x555555);

/// One terrain character as authored in a level row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Symbol(pub(crate) char);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    pub(crate) fn to_color(self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Menu,
    Play,
}

/// A falling drop. It moves one row down per tick; there is no velocity field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Particle {
    pub(crate) x: usize,
    pub(crate) y: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RainSource {
    pub(crate) raining: bool,
    pub(crate) origin_x: usize,
    pub(crate) origin_y: usize,
    pub(crate) spawn_countdown: u32,
}
