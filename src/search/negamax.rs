//! Negamax search with alpha-beta pruning.
//!
//! Single-threaded, depth-first, with a polled wall-clock ceiling: once the
//! deadline passes, every level returns its best result so far and flags it
//! final, so the driver can fall back to the last completed depth.

use std::time::Instant;

use cozy_chess::{Board, Color, Move};
use log::error;

use crate::board::cozy::{insufficient_material, legal_moves};
use crate::search::cache::EvalCache;
use crate::search::eval::{evaluate_for_white, SOFT_INFINITY};
use crate::search::repetition::{is_threefold, PathHistory};
use crate::EngineError;

/// Outcome of one search invocation: score from the searched side's
/// perspective, the principal variation, and whether deeper search is
/// knowably unproductive. `is_final` is set by game over on the chosen
/// line or by the time ceiling, never by mere depth exhaustion.
#[derive(Debug, Clone, Default)]
pub struct Eval {
    pub score_cp: i32,
    pub line: Vec<Move>,
    pub is_final: bool,
}

/// Root result: the best evaluation plus every root move tied with it, in
/// generator order. The line is never empty.
#[derive(Debug, Clone)]
pub struct RootEval {
    pub eval: Eval,
    pub tied: Vec<Move>,
}

pub struct Searcher {
    cache: EvalCache,
    pub nodes: u64,
    deadline: Option<Instant>,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::with_cache(EvalCache::default())
    }
}

impl Searcher {
    pub fn with_cache(cache: EvalCache) -> Self {
        Self {
            cache,
            nodes: 0,
            deadline: None,
        }
    }

    /// Hard wall-clock ceiling for the current `think` call.
    pub fn set_deadline(&mut self, deadline: Option<Instant>) {
        self.deadline = deadline;
    }

    pub fn cache_mut(&mut self) -> &mut EvalCache {
        &mut self.cache
    }

    fn out_of_time(&self) -> bool {
        self.deadline.map_or(false, |dl| Instant::now() >= dl)
    }

    fn is_game_drawn(board: &Board, real: &[u64], path: &[u64]) -> bool {
        i32::from(board.halfmove_clock()) >= 100
            || insufficient_material(board)
            || is_threefold(real, path, board.hash())
    }

    /// Search every root move and keep the best line. With `keep_ties` the
    /// window is not narrowed between root siblings, so equal-scoring moves
    /// report exact scores and all land in `tied`.
    pub fn search_root(
        &mut self,
        board: &Board,
        real: &[u64],
        depth: u32,
        keep_ties: bool,
    ) -> Result<RootEval, EngineError> {
        let maximize_white = board.side_to_move() == Color::White;
        let moves = legal_moves(board);
        if moves.is_empty() {
            return Err(EngineError::NoLegalMoves);
        }

        let mut path = PathHistory::new();
        let mut alpha = -SOFT_INFINITY;
        let beta = SOFT_INFINITY;
        let mut best: Option<Eval> = None;
        let mut best_move: Option<Move> = None;
        let mut tied: Vec<Move> = Vec::new();
        let mut timed_out = false;

        for mv in moves {
            let mut child = board.clone();
            child.play(mv);
            path.push(child.hash());
            let mut eval = self.negamax(
                &child,
                depth.saturating_sub(1),
                -beta,
                -alpha,
                !maximize_white,
                real,
                &mut path,
            );
            eval.score_cp = -eval.score_cp - path.len() as i32;
            path.pop();

            match best {
                Some(ref b) if eval.score_cp < b.score_cp => {}
                Some(ref b) if eval.score_cp == b.score_cp => tied.push(mv),
                _ => {
                    tied.clear();
                    tied.push(mv);
                    best_move = Some(mv);
                    best = Some(eval);
                }
            }
            if !keep_ties {
                if let Some(ref b) = best {
                    alpha = alpha.max(b.score_cp);
                }
            }
            if self.out_of_time() {
                timed_out = true;
                break;
            }
        }
        debug_assert!(path.is_empty(), "path history must unwind to the root");

        let (mut eval, mv) = match (best, best_move) {
            (Some(e), Some(m)) => (e, m),
            // Unreachable: the move list was non-empty.
            _ => {
                error!("root search finished without a best move: {}", board);
                return Err(EngineError::NoLegalMoves);
            }
        };
        let mut line = Vec::with_capacity(eval.line.len() + 1);
        line.push(mv);
        line.append(&mut eval.line);
        eval.line = line;
        eval.is_final = eval.is_final || timed_out;
        Ok(RootEval { eval, tied })
    }

    fn negamax(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        maximize_white: bool,
        real: &[u64],
        path: &mut PathHistory,
    ) -> Eval {
        self.nodes += 1;

        let moves = legal_moves(board);
        let game_over = moves.is_empty() || Self::is_game_drawn(board, real, path.as_slice());
        let timed_out = self.out_of_time();
        if depth == 0 || game_over || timed_out {
            let white_score = evaluate_for_white(board, real, path.as_slice(), &mut self.cache);
            let score_cp = if maximize_white {
                white_score
            } else {
                -white_score
            };
            return Eval {
                score_cp,
                line: Vec::new(),
                is_final: game_over || timed_out,
            };
        }

        let mut best_score = -SOFT_INFINITY;
        let mut best_move: Option<Move> = None;
        let mut best_line: Vec<Move> = Vec::new();
        let mut best_final = false;
        let mut broke_on_time = false;

        for mv in moves {
            let mut child = board.clone();
            child.play(mv);
            path.push(child.hash());
            let mut eval =
                self.negamax(&child, depth - 1, -beta, -alpha, !maximize_white, real, path);
            // Negamax sign flip, plus a small penalty per ply of path depth:
            // prefer the faster mate, avoid aimless prolongation.
            eval.score_cp = -eval.score_cp - path.len() as i32;
            path.pop();

            if eval.score_cp > best_score {
                best_score = eval.score_cp;
                best_move = Some(mv);
                best_line = eval.line;
                best_final = eval.is_final;
            }
            alpha = alpha.max(best_score);
            if alpha >= beta {
                break;
            }
            if self.out_of_time() {
                broke_on_time = true;
                break;
            }
        }

        let Some(mv) = best_move else {
            // Unreachable past the terminal check; fail loudly rather than
            // corrupt the search.
            error!("no move examined at a non-terminal node: {}", board);
            let white_score = evaluate_for_white(board, real, path.as_slice(), &mut self.cache);
            let score_cp = if maximize_white {
                white_score
            } else {
                -white_score
            };
            return Eval {
                score_cp,
                line: Vec::new(),
                is_final: true,
            };
        };

        let mut line = Vec::with_capacity(best_line.len() + 1);
        line.push(mv);
        line.extend(best_line);
        Eval {
            score_cp: best_score,
            line,
            is_final: best_final || broke_on_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_finds_the_winning_queen_capture() {
        let fen = "k7/8/8/8/8/8/3qQ3/7K w - - 0 1";
        let board = Board::from_fen(fen, false).expect("valid FEN");
        let mut s = Searcher::default();
        let root = s
            .search_root(&board, &[board.hash()], 1, false)
            .expect("root search");
        assert_eq!(format!("{}", root.eval.line[0]), "e2d2");
        assert!(root.eval.score_cp > 0);
    }

    #[test]
    fn terminal_root_is_an_error() {
        // Back-rank mate: black has no moves.
        let board = Board::from_fen("R6k/6pp/8/8/8/8/8/K7 b - - 0 1", false).expect("valid FEN");
        let mut s = Searcher::default();
        let err = s.search_root(&board, &[board.hash()], 3, false).unwrap_err();
        assert!(matches!(err, EngineError::NoLegalMoves));
    }

    #[test]
    fn expired_deadline_flags_the_result_final() {
        let board = Board::default();
        let mut s = Searcher::default();
        s.set_deadline(Some(Instant::now()));
        let root = s
            .search_root(&board, &[board.hash()], 6, false)
            .expect("root search");
        assert!(root.eval.is_final, "expired search must be flagged final");
    }

    #[test]
    fn deeper_search_sees_the_mate_threat() {
        // Black to move; walking into the corner allows Ra8 mate.
        let board = Board::from_fen("3k4/R7/2K5/8/8/8/8/8 b - - 0 1", false).expect("valid FEN");
        let mut s = Searcher::default();
        let root = s
            .search_root(&board, &[board.hash()], 2, false)
            .expect("root search");
        assert_ne!(format!("{}", root.eval.line[0]), "d8c8");
    }
}
