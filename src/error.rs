//! Error types for the engine

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("board must have {expected} cells, got {got}")]
    InvalidBoardLength { expected: usize, got: usize },

    #[error("invalid marker '{marker}' at cell {index}")]
    InvalidCellMarker { marker: String, index: usize },

    #[error("invalid player '{player}' (expected 'X' or 'O')")]
    InvalidPlayer { player: String },

    #[error("{side} history entry {cell} is not a board cell")]
    HistoryCellOutOfRange { side: &'static str, cell: usize },

    #[error("{side} history holds {len} entries, at most {max} marks may be live")]
    HistoryTooLong { side: &'static str, len: usize, max: usize },

    #[error("{side} history does not match the board at cell {cell}")]
    HistoryMismatch { side: &'static str, cell: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to read config '{path}': {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
