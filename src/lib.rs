//! oakbot: a chess move-selection engine.
//!
//! Handcrafted evaluation, negamax with alpha-beta pruning, and iterative
//! deepening under a wall-clock budget. Board representation, move
//! generation, position hashing and FEN handling come from `cozy-chess`.

pub mod board;
pub mod search;
pub mod uci;

use thiserror::Error;

/// Library-level failures. Running out of time is never one of them: the
/// search always returns its best completed result instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `think` was called on a position that is already game over.
    #[error("no legal moves at root: the game is already over")]
    NoLegalMoves,
    #[error("invalid FEN '{0}'")]
    InvalidFen(String),
    #[error("illegal move '{0}'")]
    IllegalMove(String),
}
