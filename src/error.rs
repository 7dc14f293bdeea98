//! Error types for level catalog loading

use thiserror::Error;

/// Why a level catalog was rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum CatalogError {
    #[error("catalog has no levels")]
    NoLevels,

    #[error("catalog has {0} levels, at most 9 can be selected with the digit keys")]
    TooManyLevels(usize),

    #[error("legend key {0:?} must be a single character")]
    LegendKey(String),

    #[error("legend needs exactly one empty symbol, found {0}")]
    EmptySymbolCount(usize),

    #[error("level {level}: expected {expected} rows, got {got}")]
    RowCount {
        level: usize,
        expected: usize,
        got: usize,
    },

    #[error("level {level}, row {row}: expected {expected} symbols, got {got}")]
    RowWidth {
        level: usize,
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("level {level}, row {row}, column {col}: symbol '{symbol}' is not in the legend")]
    UnknownSymbol {
        level: usize,
        row: usize,
        col: usize,
        symbol: char,
    },
}
