//! Move selection for endless tic-tac-toe, where each side keeps at most
//! three marks and the oldest vanishes when a fourth is placed.

pub mod board;
pub mod difficulty;
pub mod endless;
pub mod engine;
pub mod error;
pub mod min_max;
pub mod protocol;

pub use difficulty::{Difficulty, EngineConfig};
pub use engine::Engine;
pub use error::{Error, Result};
pub use protocol::{Mark, MoveRequest, MoveResponse};
