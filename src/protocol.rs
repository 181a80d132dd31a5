//! Plain request/response values exchanged with the surrounding service.
//! Field names follow the web client (`currentPlayer`, `aiMoves`, ...).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::{debug, warn};

use crate::board::{Board, CELL_COUNT};
use crate::difficulty::Difficulty;
use crate::endless::history::{MoveHistory, MAX_LIVE_MARKS};
use crate::endless::GameState;
use crate::error::{Error, Result};
use crate::min_max::Player;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[derive(EnumString, Display, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// Nine cells, each `"X"`, `"O"` or empty (`null` / `""`).
    pub board: Vec<Option<String>>,
    /// Mark the engine plays.
    pub current_player: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// The engine's live marks, oldest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_moves: Option<Vec<usize>>,
    /// The opponent's live marks, oldest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_moves: Option<Vec<usize>>,
}

/// A validated request: the engine always moves as `Player::Max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub state: GameState,
    pub ai_mark: Mark,
    pub difficulty: Difficulty,
}

impl MoveRequest {
    pub fn ai_mark(&self) -> Result<Mark> {
        Mark::from_str(self.current_player.trim()).map_err(|_| Error::InvalidPlayer {
            player: self.current_player.clone(),
        })
    }

    /// Unknown or missing difficulty falls back to the default tier.
    pub fn difficulty(&self) -> Difficulty {
        match self.difficulty.as_deref().map(str::trim) {
            None | Some("") => Difficulty::default(),
            Some(name) => Difficulty::from_str(name).unwrap_or_else(|_| {
                warn!(difficulty = name, fallback = %Difficulty::default(), "unknown difficulty");
                Difficulty::default()
            }),
        }
    }

    pub fn to_position(&self) -> Result<Position> {
        let ai_mark = self.ai_mark()?;
        let board = self.parse_board(ai_mark)?;
        let ai_history = parse_history("ai", self.ai_moves.as_deref(), &board, Player::Max)?;
        let opponent_history = parse_history("opponent", self.player_moves.as_deref(), &board, Player::Min)?;
        let state = GameState::from_parts(board, ai_history, opponent_history, Player::Max)?;
        Ok(Position { state, ai_mark, difficulty: self.difficulty() })
    }

    fn parse_board(&self, ai_mark: Mark) -> Result<Board> {
        if self.board.len() != CELL_COUNT {
            return Err(Error::InvalidBoardLength { expected: CELL_COUNT, got: self.board.len() });
        }
        let mut board = Board::empty();
        for (index, cell) in self.board.iter().enumerate() {
            let marker = match cell.as_deref().map(str::trim) {
                None | Some("") => continue,
                Some(marker) => marker,
            };
            let mark = Mark::from_str(marker).map_err(|_| Error::InvalidCellMarker {
                marker: marker.to_string(),
                index,
            })?;
            board.cells[index] = Some(if mark == ai_mark { Player::Max } else { Player::Min });
        }
        Ok(board)
    }
}

fn parse_history(side: &'static str, cells: Option<&[usize]>, board: &Board, player: Player) -> Result<MoveHistory> {
    let cells = match cells {
        Some(cells) if !cells.is_empty() => cells.to_vec(),
        _ => {
            // no order known: assume ascending cell order
            let owned = (0..CELL_COUNT).filter(|&cell| board.get(cell) == Some(player)).collect::<Vec<_>>();
            if !owned.is_empty() {
                warn!(side, cells = ?owned, "history missing, reconstructed from board");
            }
            owned
        }
    };
    if let Some(&cell) = cells.iter().find(|&&cell| cell >= CELL_COUNT) {
        return Err(Error::HistoryCellOutOfRange { side, cell });
    }
    if cells.len() > MAX_LIVE_MARKS {
        return Err(Error::HistoryTooLong { side, len: cells.len(), max: MAX_LIVE_MARKS });
    }
    debug!(side, ?cells, "history");
    MoveHistory::from_cells(&cells).ok_or(Error::HistoryTooLong { side, len: cells.len(), max: MAX_LIVE_MARKS })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub move_made: bool,
    /// Chosen cell, [`MoveResponse::NO_MOVE`] if none.
    pub move_index: i32,
    pub next_player: Option<Mark>,
}

impl MoveResponse {
    pub const NO_MOVE: i32 = -1;

    pub fn moved(cell: usize, next_player: Mark) -> Self {
        Self { move_made: true, move_index: cell as i32, next_player: Some(next_player) }
    }

    pub fn no_move(next_player: Option<Mark>) -> Self {
        Self { move_made: false, move_index: Self::NO_MOVE, next_player }
    }

    pub fn cell(&self) -> Option<usize> {
        if self.move_made {
            usize::try_from(self.move_index).ok()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn request(board: [&str; 9], current_player: &str) -> MoveRequest {
        MoveRequest {
            board: board.iter().map(|cell| Some(cell.to_string())).collect(),
            current_player: current_player.to_string(),
            ..MoveRequest::default()
        }
    }

    #[test]
    fn parses_client_json() {
        let json = r#"{
            "board": ["X", null, "O", null, "X", null, null, null, ""],
            "currentPlayer": "O",
            "difficulty": "medium",
            "playerMoves": [0, 4],
            "aiMoves": [2]
        }"#;
        let request: MoveRequest = serde_json::from_str(json).unwrap();
        let position = request.to_position().unwrap();
        assert_eq!(position.ai_mark, Mark::O);
        assert_eq!(position.difficulty, Difficulty::Medium);
        assert_eq!(position.state.to_move, Player::Max);
        assert_eq!(position.state.board.get(2), Some(Player::Max));
        assert_eq!(position.state.board.get(0), Some(Player::Min));
        assert_eq!(position.state.history(Player::Min).iter().collect::<Vec<_>>(), vec![0, 4]);
    }

    #[test]
    fn missing_fields_mean_fresh_game() {
        let request: MoveRequest = serde_json::from_str(r#"{ "board": [null, null, null, null, null, null, null, null, null], "currentPlayer": "x" }"#).unwrap();
        let position = request.to_position().unwrap();
        assert_eq!(position.ai_mark, Mark::X);
        assert_eq!(position.difficulty, Difficulty::Hard);
        assert_eq!(position.state, GameState::start(Player::Max));
    }

    #[test]
    fn unknown_difficulty_is_normalized() {
        let mut r = request(["", "", "", "", "", "", "", "", ""], "X");
        r.difficulty = Some("nightmare".to_string());
        assert_eq!(r.difficulty(), Difficulty::Hard);
        r.difficulty = Some(" Easy ".to_string());
        assert_eq!(r.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn rejects_malformed_boards() {
        let mut short = request(["", "", "", "", "", "", "", "", ""], "X");
        short.board.pop();
        assert!(matches!(short.to_position(), Err(Error::InvalidBoardLength { expected: 9, got: 8 })));

        let bad_marker = request(["", "", "Z", "", "", "", "", "", ""], "X");
        assert!(matches!(bad_marker.to_position(), Err(Error::InvalidCellMarker { index: 2, .. })));

        let bad_player = request(["", "", "", "", "", "", "", "", ""], "?");
        assert!(matches!(bad_player.to_position(), Err(Error::InvalidPlayer { .. })));
    }

    #[test]
    fn reconstructs_missing_history() {
        let r = request(["X", "", "", "", "O", "", "", "", "X"], "O");
        let position = r.to_position().unwrap();
        assert_eq!(position.state.history(Player::Min).iter().collect::<Vec<_>>(), vec![0, 8]);
        assert_eq!(position.state.history(Player::Max).iter().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn rejects_inconsistent_history() {
        let mut r = request(["X", "", "", "", "O", "", "", "", "X"], "O");
        r.player_moves = Some(vec![0, 7]);
        assert!(matches!(r.to_position(), Err(Error::HistoryMismatch { cell: 7, .. })));

        r.player_moves = Some(vec![0, 12]);
        assert!(matches!(r.to_position(), Err(Error::HistoryCellOutOfRange { cell: 12, .. })));

        let crowded = request(["X", "X", "", "X", "O", "", "", "X", ""], "O");
        assert!(matches!(crowded.to_position(), Err(Error::HistoryTooLong { len: 4, .. })));
    }

    #[test]
    fn response_wire_format() {
        let moved = serde_json::to_value(MoveResponse::moved(4, Mark::X)).unwrap();
        assert_eq!(moved, serde_json::json!({ "moveMade": true, "moveIndex": 4, "nextPlayer": "X" }));

        let none = MoveResponse::no_move(None);
        assert_eq!(none.cell(), None);
        assert_eq!(serde_json::to_value(none).unwrap(), serde_json::json!({ "moveMade": false, "moveIndex": -1, "nextPlayer": null }));
    }
}
