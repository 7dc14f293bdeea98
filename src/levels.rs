use crate::error::CatalogError;
use crate::model::{Rgb, Symbol, GRID_H, GRID_W};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::Path};

/// Base name that marks the symbol particles fall through.
pub(crate) const EMPTY_BASE: &str = "empty";

/// Digit keys 1..9 are the only way to pick a level.
pub(crate) const MAX_LEVELS: usize = 9;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LegendEntry {
    pub(crate) base: String,
    #[serde(default)]
    pub(crate) color: Option<u32>,
}

impl LegendEntry {
    fn new(base: &str, color: Option<u32>) -> Self {
        Self {
            base: base.to_string(),
            color,
        }
    }
}

/// Catalog as authored, before validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct CatalogSource {
    pub(crate) legend: BTreeMap<String, LegendEntry>,
    pub(crate) levels: Vec<LevelSource>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct LevelSource {
    pub(crate) name: String,
    pub(crate) rows: Vec<String>,
}

#[derive(Clone, Debug)]
pub(crate) struct Legend {
    entries: BTreeMap<Symbol, LegendEntry>,
    empty: Symbol,
}

impl Legend {
    pub(crate) fn empty_symbol(&self) -> Symbol {
        self.empty
    }

    pub(crate) fn contains(&self, sym: Symbol) -> bool {
        self.entries.contains_key(&sym)
    }

    pub(crate) fn entry(&self, sym: Symbol) -> &LegendEntry {
        match self.entries.get(&sym) {
            Some(e) => e,
            None => panic!("symbol '{sym}' is not in the legend"),
        }
    }

    /// Display color of a tile; `None` leaves the background showing.
    pub(crate) fn color(&self, sym: Symbol) -> Option<Rgb> {
        self.entry(sym).color.map(Rgb::from_hex)
    }
}

pub(crate) type Tiles = [[Symbol; GRID_W]; GRID_H];

#[derive(Clone, Debug)]
pub(crate) struct Level {
    pub(crate) name: String,
    pub(crate) tiles: Tiles,
}

/// Validated, read-only set of level layouts.
#[derive(Clone, Debug)]
pub(crate) struct LevelCatalog {
    legend: Legend,
    levels: Vec<Level>,
}

impl LevelCatalog {
    pub(crate) fn builtin() -> Result<Self, CatalogError> {
        Self::from_source(builtin_source())
    }

    pub(crate) fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("could not read level file {}", path.display()))?;
        Self::from_json(&s).with_context(|| format!("invalid level file {}", path.display()))
    }

    pub(crate) fn from_json(s: &str) -> Result<Self> {
        let src: CatalogSource = serde_json::from_str(s)?;
        Ok(Self::from_source(src)?)
    }

    pub(crate) fn from_source(src: CatalogSource) -> Result<Self, CatalogError> {
        let mut entries = BTreeMap::new();
        for (key, entry) in src.legend {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => {
                    entries.insert(Symbol(ch), entry);
                }
                _ => return Err(CatalogError::LegendKey(key)),
            }
        }

        let empties: Vec<Symbol> = entries
            .iter()
            .filter(|(_, e)| e.base == EMPTY_BASE)
            .map(|(s, _)| *s)
            .collect();
        if empties.len() != 1 {
            return Err(CatalogError::EmptySymbolCount(empties.len()));
        }
        let legend = Legend {
            entries,
            empty: empties[0],
        };

        if src.levels.is_empty() {
            return Err(CatalogError::NoLevels);
        }
        if src.levels.len() > MAX_LEVELS {
            return Err(CatalogError::TooManyLevels(src.levels.len()));
        }

        let mut levels = Vec::with_capacity(src.levels.len());
        for (li, level) in src.levels.into_iter().enumerate() {
            if level.rows.len() != GRID_H {
                return Err(CatalogError::RowCount {
                    level: li,
                    expected: GRID_H,
                    got: level.rows.len(),
                });
            }
            let mut tiles = [[legend.empty; GRID_W]; GRID_H];
            for (y, row) in level.rows.iter().enumerate() {
                let width = row.chars().count();
                if width != GRID_W {
                    return Err(CatalogError::RowWidth {
                        level: li,
                        row: y,
                        expected: GRID_W,
                        got: width,
                    });
                }
                for (x, ch) in row.chars().enumerate() {
                    let sym = Symbol(ch);
                    if !legend.contains(sym) {
                        return Err(CatalogError::UnknownSymbol {
                            level: li,
                            row: y,
                            col: x,
                            symbol: ch,
                        });
                    }
                    tiles[y][x] = sym;
                }
            }
            levels.push(Level {
                name: level.name,
                tiles,
            });
        }

        Ok(Self { legend, levels })
    }

    pub(crate) fn legend(&self) -> &Legend {
        &self.legend
    }

    pub(crate) fn len(&self) -> usize {
        self.levels.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|l| l.name.as_str())
    }
}

/* -----------------------------
   Built-in levels
------------------------------ */

const FLOOR: [&str; GRID_H] = [
    "................",
    "................",
    "................",
    "................",
    "................",
    "................",
    "................",
    "................",
    "................",
    "................",
    "################",
    "################",
    "################",
    "################",
    "################",
    "################",
];

const TREE: [&str; GRID_H] = [
    "................",
    "................",
    "................",
    "................",
    "......GGG.......",
    ".....GGGGGG.....",
    "....GGGGGGGG....",
    "....GGGGGGGG....",
    "....GGGBGGGG....",
    ".....GGGBG......",
    "......BBBB......",
    "......BBBB......",
    "......BBBB......",
    "......BBBB......",
    "......BBBB......",
    "......BBBB......",
];

const MOUNTAIN: [&str; GRID_H] = [
    "................",
    "...YY...........",
    "..YYYY..........",
    "..YYYY..........",
    "...YY...........",
    "........LL......",
    ".......LLLL.....",
    "......LLLLLL....",
    ".....#LLL#L#L...",
    "...#L#L##L###L..",
    "..#############.",
    ".##############.",
    "################",
    "################",
    "################",
    "################",
];

pub(crate) fn builtin_source() -> CatalogSource {
    let mut legend = BTreeMap::new();
    legend.insert("#".to_string(), LegendEntry::new("wallGray", Some(0x777777)));
    legend.insert(".".to_string(), LegendEntry::new(EMPTY_BASE, None));
    legend.insert("G".to_string(), LegendEntry::new("wallGreen", Some(0x3B6318)));
    legend.insert("B".to_string(), LegendEntry::new("wallBrown", Some(0x7D4B29)));
    legend.insert(
        "L".to_string(),
        LegendEntry::new("wallVeryLightGray", Some(0xFFFFFF)),
    );
    legend.insert("Y".to_string(), LegendEntry::new("wallYellow", Some(0xE5E827)));

    let level = |name: &str, rows: &[&str]| LevelSource {
        name: name.to_string(),
        rows: rows.iter().map(|r| r.to_string()).collect(),
    };

    CatalogSource {
        legend,
        levels: vec![
            level("FLOOR", &FLOOR),
            level("TREE", &TREE),
            level("MOUNTAIN", &MOUNTAIN),
        ],
    }
}
