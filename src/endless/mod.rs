//! Endless tic-tac-toe: every side keeps at most three marks, the oldest one
//! vanishes when a fourth is placed without completing a line.

pub mod eval;
pub mod history;
pub mod ordering;

use itertools::Itertools;

use crate::board::{Board, CELL_COUNT};
use crate::endless::history::{MoveHistory, MAX_LIVE_MARKS};
use crate::error::{Error, Result};
use crate::min_max::cache::{Cache, HashMapCache};
use crate::min_max::stats::SimpleStats;
use crate::min_max::{Player, Strategy};

/// Score of a decided game before the speed bonus.
pub const WIN_SCORE: i32 = 10_000_000;
/// Bonus per remaining ply, so that quicker wins and slower losses score better.
const DEPTH_WEIGHT: i32 = 100;

/// Search node: board, both move orders and the side to move. `Player::Max`
/// is the side the engine plays for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GameState {
    pub board: Board,
    ai_history: MoveHistory,
    opponent_history: MoveHistory,
    pub to_move: Player,
}

fn side_name(player: Player) -> &'static str {
    match player {
        Player::Max => "ai",
        Player::Min => "opponent",
    }
}

impl GameState {
    pub fn start(to_move: Player) -> Self {
        Self {
            board: Board::empty(),
            ai_history: MoveHistory::new(),
            opponent_history: MoveHistory::new(),
            to_move,
        }
    }

    /// Assembles a state, checking that both histories describe exactly the
    /// marks on the board.
    pub fn from_parts(board: Board, ai_history: MoveHistory, opponent_history: MoveHistory, to_move: Player) -> Result<Self> {
        let state = Self { board, ai_history, opponent_history, to_move };
        for player in [Player::Max, Player::Min] {
            state.check_history(player)?;
        }
        Ok(state)
    }

    fn check_history(&self, player: Player) -> Result<()> {
        let side = side_name(player);
        let history = self.history(player);
        if history.len() > MAX_LIVE_MARKS {
            return Err(Error::HistoryTooLong { side, len: history.len(), max: MAX_LIVE_MARKS });
        }
        if let Some(cell) = history.iter().duplicates().next() {
            return Err(Error::HistoryMismatch { side, cell });
        }
        if let Some(cell) = history.iter().find(|&cell| self.board.get(cell) != Some(player)) {
            return Err(Error::HistoryMismatch { side, cell });
        }
        if let Some(cell) = (0..CELL_COUNT).find(|&cell| self.board.get(cell) == Some(player) && !history.contains(cell)) {
            return Err(Error::HistoryMismatch { side, cell });
        }
        Ok(())
    }

    pub fn history(&self, player: Player) -> &MoveHistory {
        match player {
            Player::Max => &self.ai_history,
            Player::Min => &self.opponent_history,
        }
    }

    fn history_mut(&mut self, player: Player) -> &mut MoveHistory {
        match player {
            Player::Max => &mut self.ai_history,
            Player::Min => &mut self.opponent_history,
        }
    }

    pub fn winner(&self) -> Option<Player> {
        self.board.winner()
    }

    pub fn legal_moves(&self) -> Vec<usize> {
        if self.winner().is_some() {
            return Vec::new();
        }
        self.board.empty_cells()
    }

    /// Places a mark of the side to move on the empty `cell`.
    ///
    /// The winner is determined before the vanish rule runs: a fourth mark
    /// that completes a line keeps all four marks on the board.
    pub fn apply_move(&self, cell: usize) -> GameState {
        debug_assert!(cell < CELL_COUNT && self.board.is_empty_cell(cell), "cell {cell} is not free");
        let mover = self.to_move;
        let mut next = *self;
        next.board.cells[cell] = Some(mover);
        let won = next.board.winner().is_some();

        let history = next.history_mut(mover);
        history.push_back(cell);
        if !won && history.len() > MAX_LIVE_MARKS {
            if let Some(vanished) = history.pop_front() {
                next.board.cells[vanished] = None;
            }
        }
        next.to_move = !mover;
        next
    }
}

/// Search callbacks for endless tic-tac-toe. One instance per search: the
/// cache is never reused across requests.
pub struct EndlessStrategy<CACHE: Cache<GameState, usize> = HashMapCache<GameState, usize>> {
    cache: CACHE,
    pub stats: SimpleStats,
}

impl<CACHE: Cache<GameState, usize>> EndlessStrategy<CACHE> {
    pub fn new(cache: CACHE) -> Self {
        Self { cache, stats: SimpleStats::default() }
    }

    pub fn cached_states(&self) -> usize {
        self.cache.len()
    }
}

impl Default for EndlessStrategy {
    fn default() -> Self {
        Self::new(HashMapCache::default())
    }
}

fn win_score(player: Player, remaining_levels: u8) -> i32 {
    let score = WIN_SCORE + i32::from(remaining_levels) * DEPTH_WEIGHT;
    match player {
        Player::Max => score,
        Player::Min => -score,
    }
}

impl<CACHE: Cache<GameState, usize>> Strategy for EndlessStrategy<CACHE> {
    type State = GameState;
    type Move = usize;
    type Cache = CACHE;
    type Stats = SimpleStats;

    fn possible_moves(&mut self, state: &GameState) -> Vec<usize> {
        ordering::rank_moves(state)
    }

    fn do_move(&mut self, state: &GameState, min_max_move: &usize) -> GameState {
        state.apply_move(*min_max_move)
    }

    fn player(state: &GameState) -> Player {
        state.to_move
    }

    fn terminal_score(&mut self, state: &GameState, remaining_levels: u8) -> Option<i32> {
        state.winner().map(|winner| win_score(winner, remaining_levels))
    }

    fn evaluate(&mut self, state: &GameState) -> i32 {
        eval::evaluate(state)
    }

    fn score_bound(&self, player: Player, remaining_levels: u8) -> i32 {
        win_score(player, remaining_levels)
    }

    fn cache(&mut self) -> &mut CACHE {
        &mut self.cache
    }

    fn stats(&mut self) -> &mut SimpleStats {
        &mut self.stats
    }
}
