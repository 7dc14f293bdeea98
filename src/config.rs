use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Parser, Debug, Clone)]
#[command(name = "acidrain")]
#[command(about = "Hold the mouse over the sky and let acid eat the terrain", long_about = None)]
pub(crate) struct Args {
    /// Milliseconds per simulation tick (fall speed)
    #[arg(long)]
    pub(crate) tick_ms: Option<u64>,

    /// FPS cap for redraws
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// Draw tiles as characters instead of colored blocks
    #[arg(long, default_value_t = false)]
    pub(crate) no_color: bool,

    /// JSON level catalog to play instead of the built-in levels
    #[arg(long)]
    pub(crate) levels: Option<PathBuf>,

    /// Skip the menu and start level N (1-based)
    #[arg(long)]
    pub(crate) level: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) tick_ms: u64,
    pub(crate) fps_cap: u32,
    pub(crate) enable_color: bool,
    pub(crate) levels_path: Option<PathBuf>,
    #[serde(skip)]
    pub(crate) start_level: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // two frames of a 60 Hz host
            tick_ms: 33,
            fps_cap: 60,
            enable_color: true,
            levels_path: None,
            start_level: None,
        }
    }
}

impl Settings {
    /// Command line flags win over the settings file.
    pub(crate) fn apply_args(&mut self, args: &Args) {
        if let Some(ms) = args.tick_ms {
            self.tick_ms = ms;
        }
        if let Some(fps) = args.fps {
            self.fps_cap = fps;
        }
        if args.no_color {
            self.enable_color = false;
        }
        if let Some(path) = &args.levels {
            self.levels_path = Some(path.clone());
        }
        self.start_level = args.level;
        self.tick_ms = self.tick_ms.max(1);
    }
}

pub(crate) fn settings_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "acidrain", "AcidRain")?;
    Some(proj.config_dir().join("settings.json"))
}

/// Missing or malformed settings fall back to defaults. Nothing is ever written back.
pub(crate) fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        if let Ok(v) = serde_json::from_str::<Settings>(&s) {
            return v;
        }
    }
    Settings::default()
}

pub(crate) fn resolve(args: &Args) -> Settings {
    let mut settings = match settings_path() {
        Some(path) => load_settings(&path),
        None => Settings::default(),
    };
    settings.apply_args(args);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_override_settings() {
        let args = Args::parse_from([
            "acidrain",
            "--tick-ms",
            "50",
            "--no-color",
            "--levels",
            "my.json",
            "--level",
            "2",
        ]);
        let mut s = Settings::default();
        s.apply_args(&args);
        assert_eq!(s.tick_ms, 50);
        assert_eq!(s.fps_cap, 60);
        assert!(!s.enable_color);
        assert_eq!(s.levels_path, Some(PathBuf::from("my.json")));
        assert_eq!(s.start_level, Some(2));
    }

    #[test]
    fn zero_tick_is_clamped() {
        let args = Args::parse_from(["acidrain", "--tick-ms", "0"]);
        let mut s = Settings::default();
        s.apply_args(&args);
        assert_eq!(s.tick_ms, 1);
    }

    #[test]
    fn partial_settings_file_uses_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "tick_ms": 100 }"#).unwrap();
        assert_eq!(s.tick_ms, 100);
        assert!(s.enable_color);
        assert_eq!(s.levels_path, None);
    }

    #[test]
    fn missing_settings_file_is_default() {
        let s = load_settings(Path::new("/definitely/not/here/settings.json"));
        assert_eq!(s, Settings::default());
    }
}
