//! Static position evaluation, White-positive centipawns.
//!
//! Scores are memoized by position hash in a bounded cache and a hit is
//! returned unconditionally, so a hash collision silently yields the other
//! position's score. Accepted limitation for a single game's lifetime.
//! Rules-level draws (repetition, fifty-move, insufficient material,
//! stalemate) override everything and are checked before the cache.

use cozy_chess::{Board, Color, Piece, Rank};

use crate::board::cozy::{insufficient_material, is_capture, legal_moves};
use crate::search::cache::EvalCache;
use crate::search::repetition::is_threefold;

/// Mate sentinel: dominates any realizable material sum while staying far
/// from i32 overflow under negation and per-ply penalties.
pub const SOFT_INFINITY: i32 = 1_000_000;
pub const DRAW_SCORE: i32 = 0;

const CHECK_PENALTY: i32 = 50;
const CASTLE_RIGHT_BONUS: i32 = 25;
const PAWN_ADVANCE_PENALTY: i32 = 10;

// Indexed by Piece discriminant: pawn, knight, bishop, rook, queen, king.
const PIECE_VALUES: [i32; 6] = [100, 300, 300, 500, 900, 1000];
// Most legal moves a piece of each type can have from a single square;
// normalizes mobility so piece types stay comparable.
const MAX_ACTIVITY: [i32; 6] = [0, 8, 13, 14, 27, 8];

fn sign(color: Color) -> i32 {
    if color == Color::White {
        1
    } else {
        -1
    }
}

/// Heuristic score for `board` from White's perspective.
///
/// Evaluation order is load-bearing: draw short-circuit, then cache, then
/// checkmate, then the heuristic terms. Terminal mate/draw scores are never
/// stored; heuristic scores are.
pub fn evaluate_for_white(
    board: &Board,
    real_history: &[u64],
    path_history: &[u64],
    cache: &mut EvalCache,
) -> i32 {
    let moves = legal_moves(board);
    let in_check = !board.checkers().is_empty();
    let halfmove = i32::from(board.halfmove_clock());

    let stalemate = moves.is_empty() && !in_check;
    if stalemate
        || halfmove >= 100
        || insufficient_material(board)
        || is_threefold(real_history, path_history, board.hash())
    {
        return DRAW_SCORE;
    }

    if let Some(score) = cache.get(board.hash()) {
        return score;
    }

    if moves.is_empty() {
        // Checkmate: worst case for the side to move.
        return if board.side_to_move() == Color::White {
            -SOFT_INFINITY
        } else {
            SOFT_INFINITY
        };
    }

    let mut score = 0i32;
    if in_check {
        score -= sign(board.side_to_move()) * CHECK_PENALTY;
    }

    for color in Color::ALL {
        let cofactor = sign(color);
        for piece in Piece::ALL {
            let value = PIECE_VALUES[piece as usize];
            for square in board.colors(color) & board.pieces(piece) {
                let mut activity = 0;
                match piece {
                    Piece::King => {
                        // File distance from the center as a crude measure
                        // of exposure.
                        let file = square.file() as i32;
                        score -= cofactor * (10 * file - 35).abs() * 5;
                    }
                    Piece::Pawn => {
                        let target = if color == Color::White {
                            Rank::Eighth
                        } else {
                            Rank::First
                        };
                        let distance = (target as i32 - square.rank() as i32).abs();
                        activity -= PAWN_ADVANCE_PENALTY * distance;
                    }
                    _ => {
                        // Only the side to move has entries on the move
                        // list; the opponent's mobility counts as zero.
                        let from_here =
                            moves.iter().filter(|m| m.from == square).count() as i32;
                        activity += 100 * from_here / MAX_ACTIVITY[piece as usize];
                    }
                }
                score += cofactor * (value + activity);
            }
        }
    }

    let capture_power = moves.iter().filter(|&&m| is_capture(board, m)).count() as i32;
    score += sign(board.side_to_move()) * capture_power;

    for color in Color::ALL {
        let rights = board.castle_rights(color);
        if rights.short.is_some() {
            score += sign(color) * CASTLE_RIGHT_BONUS;
        }
        if rights.long.is_some() {
            score += sign(color) * CASTLE_RIGHT_BONUS;
        }
    }

    // Decay toward the draw score as the fifty-move counter climbs, nudging
    // the stronger side to make progress.
    score -= score.signum() * halfmove;

    cache.put(board.hash(), score);
    score
}
