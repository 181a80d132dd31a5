pub mod cache;
pub mod stats;

use std::fmt::{Debug, Display};
use std::ops::Not;

use crate::min_max::cache::{Cache, CacheEntry, CacheFlag};
use crate::min_max::stats::Stats;

#[derive(Eq, PartialEq, Hash)]
#[derive(Debug, Copy, Clone)]
pub enum Player {
    Min,
    Max,
}

#[derive(Debug, Eq, PartialEq, Clone, Hash)]
pub struct ScoredMove<M> {
    pub score: i32,
    pub min_max_move: M,
}

impl<M> ScoredMove<M> {
    pub fn new(score: i32, min_max_move: M) -> ScoredMove<M> {
        ScoredMove { score, min_max_move }
    }
}

impl Not for Player {
    type Output = Player;

    fn not(self) -> Player {
        match self {
            Player::Min => Player::Max,
            Player::Max => Player::Min,
        }
    }
}

/// Game specific half of the search. Scores are absolute: `Player::Max`
/// prefers larger values, `Player::Min` smaller ones.
pub trait Strategy {
    type State;
    type Move: Copy + Debug;
    type Cache: Cache<Self::State, Self::Move>;
    type Stats: Stats;

    /// Legal moves for the side to move, most promising first.
    fn possible_moves(&mut self, state: &Self::State) -> Vec<Self::Move>;
    fn do_move(&mut self, state: &Self::State, min_max_move: &Self::Move) -> Self::State;
    fn player(state: &Self::State) -> Player;
    /// `Some` when the game is decided in `state`.
    fn terminal_score(&mut self, state: &Self::State, remaining_levels: u8) -> Option<i32>;
    /// Static score of a non-terminal frontier state.
    fn evaluate(&mut self, state: &Self::State) -> i32;

    /// Best score `player` can possibly get from a child searched with
    /// `remaining_levels`. A node stops looking once it reaches this value.
    fn score_bound(&self, player: Player, _remaining_levels: u8) -> i32 {
        match player {
            Player::Max => i32::MAX,
            Player::Min => i32::MIN,
        }
    }

    fn cache(&mut self) -> &mut Self::Cache;
    fn stats(&mut self) -> &mut Self::Stats;
}

/// Searches `state` to `max_level` plies and returns the minimax score
/// together with the best move for the side to move (`None` for terminal
/// or frontier states).
pub fn alpha_beta<STRATEGY: Strategy>(strategy: &mut STRATEGY, state: &STRATEGY::State, max_level: u8) -> ScoredMove<Option<STRATEGY::Move>> {
    alpha_beta_eval(strategy, state, max_level, i32::MIN, i32::MAX)
}

/// Scores every root move with a full window. Slower than [`alpha_beta`],
/// but yields a comparable score for each candidate.
pub fn score_possible_moves<STRATEGY: Strategy>(strategy: &mut STRATEGY, state: &STRATEGY::State, max_level: u8) -> Vec<ScoredMove<STRATEGY::Move>> {
    let pos_moves = strategy.possible_moves(state);
    pos_moves.into_iter().map(|m| {
        let next_state = strategy.do_move(state, &m);
        let score = alpha_beta_eval(strategy, &next_state, max_level.saturating_sub(1), i32::MIN, i32::MAX).score;
        ScoredMove::new(score, m)
    }).collect()
}

fn alpha_beta_eval<STRATEGY: Strategy>(strategy: &mut STRATEGY, state: &STRATEGY::State, remaining_levels: u8, mut alpha: i32, mut beta: i32) -> ScoredMove<Option<STRATEGY::Move>> {
    strategy.stats().record_node();
    if let Some(score) = strategy.terminal_score(state, remaining_levels) {
        strategy.stats().record_terminal();
        return ScoredMove::new(score, None);
    }

    let (alpha_original, beta_original) = (alpha, beta);
    match strategy.cache().lookup(state) {
        Some(entry) if entry.level >= remaining_levels => {
            strategy.stats().record_cache_hit();
            match entry.flag {
                CacheFlag::Exact => return ScoredMove::new(entry.value, entry.best_move),
                CacheFlag::LowerBound => alpha = alpha.max(entry.value),
                CacheFlag::UpperBound => beta = beta.min(entry.value),
            }
            if alpha >= beta {
                return ScoredMove::new(entry.value, entry.best_move);
            }
        }
        _ => strategy.stats().record_cache_miss(),
    }

    let moves = if remaining_levels == 0 {
        Vec::new()
    } else {
        strategy.possible_moves(state)
    };
    if moves.is_empty() {
        strategy.stats().record_state_scored();
        let score = strategy.evaluate(state);
        strategy.cache().cache(state, CacheEntry {
            value: score,
            best_move: None,
            level: remaining_levels,
            flag: CacheFlag::Exact,
        });
        return ScoredMove::new(score, None);
    }

    let player = STRATEGY::player(state);
    let bound = strategy.score_bound(player, remaining_levels - 1);
    let mut best: Option<ScoredMove<STRATEGY::Move>> = None;
    for m in moves {
        let next_state = strategy.do_move(state, &m);
        let score = alpha_beta_eval(strategy, &next_state, remaining_levels - 1, alpha, beta).score;
        let improves = match (&best, player) {
            (None, _) => true,
            (Some(current), Player::Max) => score > current.score,
            (Some(current), Player::Min) => score < current.score,
        };
        if improves {
            best = Some(ScoredMove::new(score, m));
        }

        let best_score = best.as_ref().map_or(score, |b| b.score);
        let reached_bound = match player {
            Player::Max => {
                alpha = alpha.max(best_score);
                best_score >= bound
            }
            Player::Min => {
                beta = beta.min(best_score);
                best_score <= bound
            }
        };
        if beta <= alpha || reached_bound {
            strategy.stats().record_prune();
            break;
        }
    }

    // moves is non-empty, so the loop ran at least once
    let Some(ScoredMove { score, min_max_move }) = best else {
        return ScoredMove::new(strategy.evaluate(state), None);
    };
    let flag = if score <= alpha_original {
        CacheFlag::UpperBound
    } else if score >= beta_original {
        CacheFlag::LowerBound
    } else {
        CacheFlag::Exact
    };
    strategy.cache().cache(state, CacheEntry {
        value: score,
        best_move: Some(min_max_move),
        level: remaining_levels,
        flag,
    });
    ScoredMove::new(score, Some(min_max_move))
}

/// Spreads the scores of cell indexed root moves onto a 3x3 grid.
pub fn to_score_board(scored_moves: &[ScoredMove<usize>]) -> [Option<i32>; 9] {
    let mut scores = [None; 9];
    for m in scored_moves.iter().filter(|m| m.min_max_move < 9) {
        scores[m.min_max_move] = Some(m.score);
    }
    scores
}

pub fn print_3_by_3<E: Display>(scored_board: &[E; 9]) {
    let scores = scored_board;
    eprintln!("{:>9}, {:>9}, {:>9}", scores[0], scores[1], scores[2]);
    eprintln!("{:>9}, {:>9}, {:>9}", scores[3], scores[4], scores[5]);
    eprintln!("{:>9}, {:>9}, {:>9}", scores[6], scores[7], scores[8]);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::min_max::cache::NullCache;
    use crate::min_max::stats::SimpleStats;

    /// Tiny game tree: nodes are indices into `TREE`, leaves carry a score.
    enum Node {
        Leaf(i32),
        Inner(&'static [usize]),
    }

    const TREE: [Node; 10] = [
        Node::Inner(&[1, 2, 3]),
        Node::Inner(&[4, 5]),
        Node::Inner(&[6, 7]),
        Node::Inner(&[8, 9]),
        Node::Leaf(3),
        Node::Leaf(12),
        Node::Leaf(8),
        Node::Leaf(2),
        Node::Leaf(14),
        Node::Leaf(1),
    ];

    #[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
    struct TreeState {
        node: usize,
        player: Player,
    }

    #[derive(Default)]
    struct TreeStrategy {
        cache: NullCache,
        stats: SimpleStats,
    }

    impl Strategy for TreeStrategy {
        type State = TreeState;
        type Move = usize;
        type Cache = NullCache;
        type Stats = SimpleStats;

        fn possible_moves(&mut self, state: &TreeState) -> Vec<usize> {
            match TREE[state.node] {
                Node::Leaf(_) => Vec::new(),
                Node::Inner(children) => children.to_vec(),
            }
        }

        fn do_move(&mut self, state: &TreeState, min_max_move: &usize) -> TreeState {
            TreeState { node: *min_max_move, player: !state.player }
        }

        fn player(state: &TreeState) -> Player {
            state.player
        }

        fn terminal_score(&mut self, _state: &TreeState, _remaining_levels: u8) -> Option<i32> {
            None
        }

        fn evaluate(&mut self, state: &TreeState) -> i32 {
            match TREE[state.node] {
                Node::Leaf(score) => score,
                Node::Inner(_) => 0,
            }
        }

        fn cache(&mut self) -> &mut NullCache {
            &mut self.cache
        }

        fn stats(&mut self) -> &mut SimpleStats {
            &mut self.stats
        }
    }

    #[test]
    fn textbook_tree() {
        let mut strategy = TreeStrategy::default();
        let root = TreeState { node: 0, player: Player::Max };
        let result = alpha_beta(&mut strategy, &root, 5);
        // min(3, 12) = 3, min(8, 2) = 2, min(14, 1) = 1
        assert_eq!(result, ScoredMove::new(3, Some(1)));
        // nodes 2 and 3 fall below alpha = 3 and are cut
        assert!(strategy.stats.prune_count >= 1);
    }

    #[test]
    fn depth_zero_evaluates() {
        let mut strategy = TreeStrategy::default();
        let root = TreeState { node: 4, player: Player::Max };
        assert_eq!(alpha_beta(&mut strategy, &root, 0), ScoredMove::new(3, None));
        assert_eq!(strategy.stats.state_scored_count, 1);
    }

    #[test]
    fn root_moves_scored_individually() {
        let mut strategy = TreeStrategy::default();
        let root = TreeState { node: 0, player: Player::Max };
        let scores = score_possible_moves(&mut strategy, &root, 5);
        assert_eq!(scores, vec![ScoredMove::new(3, 1), ScoredMove::new(2, 2), ScoredMove::new(1, 3)]);
    }

    #[test]
    fn score_board_layout() {
        let board = to_score_board(&[ScoredMove::new(5, 4), ScoredMove::new(-1, 0)]);
        assert_eq!(board[4], Some(5));
        assert_eq!(board[0], Some(-1));
        assert_eq!(board.iter().filter(|s| s.is_none()).count(), 7);
    }
}
