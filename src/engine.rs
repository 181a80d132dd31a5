//! Move selection per difficulty tier: optional random move, tactical
//! pre-checks, then a bounded search, then a fallback move.

use std::cmp::Reverse;

use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument, trace, warn};

use crate::difficulty::{Difficulty, EngineConfig, PreCheck};
use crate::endless::{eval, EndlessStrategy, GameState, WIN_SCORE};
use crate::min_max::{alpha_beta, score_possible_moves, to_score_board, Player};
use crate::protocol::{MoveRequest, MoveResponse};

pub struct Engine<R: Rng = ThreadRng> {
    config: EngineConfig,
    rng: R,
}

impl Engine<ThreadRng> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl Default for Engine<ThreadRng> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<R: Rng> Engine<R> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Answers a client request. Malformed requests yield "no move" and are
    /// only logged.
    pub fn respond(&mut self, request: &MoveRequest) -> MoveResponse {
        let position = match request.to_position() {
            Ok(position) => position,
            Err(err) => {
                warn!(%err, "rejecting move request");
                return MoveResponse::no_move(request.ai_mark().ok().map(|mark| mark.opponent()));
            }
        };
        let next_player = position.ai_mark.opponent();
        match self.choose_move(&position.state, position.difficulty) {
            Some(cell) => MoveResponse::moved(cell, next_player),
            None => MoveResponse::no_move(Some(next_player)),
        }
    }

    /// Picks a cell for the side to move, `None` if the game is decided or
    /// the board is full.
    #[instrument(level = "debug", skip(self, state))]
    pub fn choose_move(&mut self, state: &GameState, difficulty: Difficulty) -> Option<usize> {
        let legal = state.legal_moves();
        if legal.is_empty() {
            debug!(winner = ?state.winner(), "no move available");
            return None;
        }
        let tier = self.config.tier(difficulty).clone();

        // gen::<f64>() is in [0, 1): probability 0 never fires, 1 always does
        if tier.random_move_probability > 0.0 && self.rng.gen::<f64>() < tier.random_move_probability {
            let cell = legal.choose(&mut self.rng).copied();
            debug!(?cell, "random move");
            return cell;
        }

        for check in tier.pre_checks {
            if let Some(cell) = pre_check(state, check) {
                debug!(?check, cell, "pre-check move");
                return Some(cell);
            }
        }

        if tier.search_depth > 0 {
            if let Some(cell) = search(state, tier.search_depth) {
                return Some(cell);
            }
            warn!(depth = tier.search_depth, "search produced no move");
        }

        // random tiers stay random, the others take the best one-ply move
        let cell = if tier.random_move_probability > 0.0 {
            legal.choose(&mut self.rng).copied()
        } else {
            best_offensive_move(state)
        };
        debug!(?cell, "fallback move");
        cell
    }

    /// Search score of every empty cell, laid out by board position.
    pub fn score_cells(&self, state: &GameState, difficulty: Difficulty) -> [Option<i32>; 9] {
        if state.legal_moves().is_empty() {
            return [None; 9];
        }
        let depth = self.config.tier(difficulty).search_depth;
        let mut strategy = EndlessStrategy::default();
        let scores = score_possible_moves(&mut strategy, state, depth);
        to_score_board(&scores)
    }
}

fn pre_check(state: &GameState, check: PreCheck) -> Option<usize> {
    let me = state.to_move;
    match check {
        PreCheck::ImmediateWin => state.board.winning_cells(me).first().copied(),
        PreCheck::ImmediateBlock => state.board.winning_cells(!me).first().copied(),
        PreCheck::DoubleThreat => double_threat_cell(state),
    }
}

/// First empty cell on which the opponent would fork: after its placement
/// (and any vanish) it could complete two lines, and only one can be blocked.
fn double_threat_cell(state: &GameState) -> Option<usize> {
    let opponent = !state.to_move;
    let mut as_opponent = *state;
    as_opponent.to_move = opponent;
    state.board.empty_cells().into_iter().find(|&cell| {
        let next = as_opponent.apply_move(cell);
        next.winner().is_none() && next.board.winning_cells(opponent).len() >= 2
    })
}

/// Legal cell whose successor evaluates best for the side to move. Ties keep
/// the lowest cell.
fn best_offensive_move(state: &GameState) -> Option<usize> {
    let mover = state.to_move;
    state.legal_moves().into_iter().min_by_key(|&cell| {
        let next = state.apply_move(cell);
        let score = match next.winner() {
            Some(Player::Max) => WIN_SCORE,
            Some(Player::Min) => -WIN_SCORE,
            None => eval::evaluate(&next),
        };
        match mover {
            Player::Max => Reverse(score),
            Player::Min => Reverse(-score),
        }
    })
}

fn search(state: &GameState, depth: u8) -> Option<usize> {
    let mut strategy = EndlessStrategy::default();
    let result = alpha_beta(&mut strategy, state, depth);
    let stats = &strategy.stats;
    debug!(
        depth,
        score = result.score,
        best_move = ?result.min_max_move,
        nodes = stats.node_count,
        prunes = stats.prune_count,
        cache_hits = stats.cache_hit_count,
        "search finished"
    );
    trace!(cached_states = strategy.cached_states(), terminals = stats.terminal_count, scored = stats.state_scored_count);
    result.min_max_move
}
