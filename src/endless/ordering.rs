use std::cmp::Reverse;

use itertools::Itertools;

use crate::board::{CENTER, CORNERS, WIN_INDICES};
use crate::endless::eval::{count_stable_threats, LineThreat};
use crate::endless::GameState;

const IMMEDIATE_WIN: i32 = 10_000_000;
const STABLE_THREAT_CREATED: i32 = 100_000;
const STABLE_PAIR: i32 = 50_000;
const VANISHING_PAIR: i32 = 100;
const CENTER_BONUS: i32 = 2_000;
const CORNER_BONUS: i32 = 1_000;

/// Cheap one ply look-ahead score of `cell` for the side to move in `state`.
pub fn move_potential(state: &GameState, cell: usize) -> i32 {
    let mover = state.to_move;
    let next = state.apply_move(cell);
    let history = next.history(mover);

    let mut score = 0;
    if next.board.winner() == Some(mover) {
        score += IMMEDIATE_WIN;
    }
    score += count_stable_threats(&next.board, history, mover) as i32 * STABLE_THREAT_CREATED;
    for line in WIN_INDICES.iter() {
        let threat = LineThreat::analyze(&next.board, line, mover, history);
        if threat.pieces == 2 {
            score += if threat.will_vanish { VANISHING_PAIR } else { STABLE_PAIR };
        }
    }
    if cell == CENTER {
        score += CENTER_BONUS;
    } else if CORNERS.contains(&cell) {
        score += CORNER_BONUS;
    }
    score
}

/// Empty cells ordered by [`move_potential`], best first. Equal scores keep
/// ascending cell order.
pub fn rank_moves(state: &GameState) -> Vec<usize> {
    state.board.empty_cells()
        .into_iter()
        .map(|cell| (cell, move_potential(state, cell)))
        .sorted_by_key(|&(_, potential)| Reverse(potential))
        .map(|(cell, _)| cell)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::endless::test::state;
    use crate::min_max::Player;

    #[test]
    fn winning_move_first() {
        let s = state(&[0, 1], &[4, 8], Player::Max);
        assert_eq!(rank_moves(&s)[0], 2);
    }

    #[test]
    fn opening_prefers_center_then_corners() {
        let s = state(&[], &[], Player::Max);
        assert_eq!(rank_moves(&s), vec![4, 0, 2, 6, 8, 1, 3, 5, 7]);
    }

    #[test]
    fn ranks_for_the_side_to_move() {
        let s = state(&[0, 8], &[3, 4], Player::Min);
        assert_eq!(rank_moves(&s)[0], 5);
    }

    #[test]
    fn only_empty_cells() {
        let s = state(&[0, 4, 7], &[1, 2, 6], Player::Max);
        let mut ranked = rank_moves(&s);
        ranked.sort();
        assert_eq!(ranked, vec![3, 5, 8]);
    }
}
