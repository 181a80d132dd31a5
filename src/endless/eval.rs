//! Static evaluation of frontier states, always from the AI's (`Player::Max`)
//! point of view.
//!
//! A mark that is about to vanish is worth a small fraction of a stable one:
//! a two-in-a-row whose oldest mark disappears on the owner's next placement
//! can never be completed.

use crate::board::{Board, CENTER, CORNERS, WIN_INDICES};
use crate::endless::history::MoveHistory;
use crate::endless::GameState;
use crate::min_max::Player;

const OWN_TWO_STABLE: i32 = 50_000;
const OWN_TWO_VANISHING: i32 = 50;
const OWN_ONE_STABLE: i32 = 500;
const OWN_ONE_VANISHING: i32 = 5;

const OPPONENT_TWO_STABLE: i32 = 60_000;
const OPPONENT_TWO_VANISHING: i32 = 500;
const OPPONENT_ONE_STABLE: i32 = 500;
const OPPONENT_ONE_VANISHING: i32 = 5;

const CENTER_STABLE: i32 = 1_000;
const CENTER_VANISHING: i32 = 50;
const CORNER_STABLE: i32 = 600;
const CORNER_VANISHING: i32 = 30;

const SELF_DESTRUCTING_LINE: i32 = 10_000;
const STABLE_THREAT: i32 = 5_000;

/// How one side occupies a single winning line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineThreat {
    pub pieces: usize,
    /// The line holds the side's next-to-vanish mark.
    pub will_vanish: bool,
}

impl LineThreat {
    pub fn analyze(board: &Board, line: &[usize; 3], player: Player, history: &MoveHistory) -> Self {
        let vanishing = history.next_to_vanish();
        let mut threat = LineThreat { pieces: 0, will_vanish: false };
        for &index in line {
            if board.get(index) == Some(player) {
                threat.pieces += 1;
                threat.will_vanish |= vanishing == Some(index);
            }
        }
        threat
    }
}

/// Lines with two marks of `player`, one empty cell and no mark that is
/// about to vanish.
pub fn count_stable_threats(board: &Board, history: &MoveHistory, player: Player) -> usize {
    let vanishing = history.next_to_vanish();
    WIN_INDICES.iter()
        .filter(|line| {
            let own = line.iter().filter(|&&index| board.get(index) == Some(player)).count();
            let empty = line.iter().filter(|&&index| board.is_empty_cell(index)).count();
            let has_vanishing = line.iter().any(|&index| vanishing == Some(index));
            own == 2 && empty == 1 && !has_vanishing
        })
        .count()
}

pub fn evaluate(state: &GameState) -> i32 {
    let board = &state.board;
    let ai_history = state.history(Player::Max);
    let opponent_history = state.history(Player::Min);
    let ai_vanishing = ai_history.next_to_vanish();

    let mut score = 0;
    for line in WIN_INDICES.iter() {
        let ai = LineThreat::analyze(board, line, Player::Max, ai_history);
        let opponent = LineThreat::analyze(board, line, Player::Min, opponent_history);

        // mixed lines are dead
        if ai.pieces > 0 && opponent.pieces == 0 {
            score += match (ai.pieces, ai.will_vanish) {
                (2, false) => OWN_TWO_STABLE,
                (2, true) => OWN_TWO_VANISHING,
                (1, false) => OWN_ONE_STABLE,
                (1, true) => OWN_ONE_VANISHING,
                _ => 0,
            };
        }
        if opponent.pieces > 0 && ai.pieces == 0 {
            score -= match (opponent.pieces, opponent.will_vanish) {
                (2, false) => OPPONENT_TWO_STABLE,
                (2, true) => OPPONENT_TWO_VANISHING,
                (1, false) => OPPONENT_ONE_STABLE,
                (1, true) => OPPONENT_ONE_VANISHING,
                _ => 0,
            };
        }
    }

    let positional = |index: usize, stable: i32, vanishing: i32| {
        if board.get(index) != Some(Player::Max) {
            0
        } else if ai_vanishing == Some(index) {
            vanishing
        } else {
            stable
        }
    };
    score += positional(CENTER, CENTER_STABLE, CENTER_VANISHING);
    score += CORNERS.iter().map(|&corner| positional(corner, CORNER_STABLE, CORNER_VANISHING)).sum::<i32>();

    if let Some(vanishing) = ai_vanishing {
        let self_destructing = WIN_INDICES.iter()
            .filter(|line| line.contains(&vanishing))
            .filter(|line| line.iter().filter(|&&index| board.get(index) == Some(Player::Max)).count() >= 2)
            .count() as i32;
        score -= self_destructing * SELF_DESTRUCTING_LINE;
    }

    score += count_stable_threats(board, ai_history, Player::Max) as i32 * STABLE_THREAT;
    score -= count_stable_threats(board, opponent_history, Player::Min) as i32 * STABLE_THREAT;
    score
}
