use std::time::Duration;

use cozy_chess::{GameStatus, Piece};

use oakbot::board::cozy::{flip_fen, legal_moves, Position};
use oakbot::search::clock::TurnClock;
use oakbot::search::driver::{Bot, BotConfig};

fn bot_with_depth(depth: u32, seed: Option<u64>) -> Bot {
    Bot::new(BotConfig {
        max_depth: Some(depth),
        seed,
        ..BotConfig::default()
    })
}

fn long_clock() -> TurnClock {
    TurnClock::with_budget(Duration::from_secs(600))
}

#[test]
fn mate_in_one_is_taken() {
    let fen = "k7/7R/1K6/8/8/8/8/8 w - - 0 1";
    for fen in [fen.to_string(), flip_fen(fen)] {
        for depth in [2u32, 3] {
            let pos = Position::from_fen(&fen).expect("valid FEN");
            let mut bot = bot_with_depth(depth, None);
            let mv = bot.think(&pos, &long_clock()).expect("a move");
            let mut board = pos.board().clone();
            board.play(mv);
            assert_eq!(
                board.status(),
                GameStatus::Won,
                "expected mate after {mv} at depth {depth} in {fen}"
            );
        }
    }
}

#[test]
fn promotion_prefers_the_queen() {
    let fen = "k7/7P/8/8/8/8/8/K7 w - - 0 1";
    for fen in [fen.to_string(), flip_fen(fen)] {
        for depth in [2u32, 3] {
            let pos = Position::from_fen(&fen).expect("valid FEN");
            let mut bot = bot_with_depth(depth, None);
            let mv = bot.think(&pos, &long_clock()).expect("a move");
            assert_eq!(
                mv.promotion,
                Some(Piece::Queen),
                "expected queen promotion at depth {depth} in {fen}, got {mv}"
            );
        }
    }
}

#[test]
fn mate_in_one_is_escaped() {
    // White threatens Ra8 mate if the black king walks to c8.
    let fen = "3k4/R7/2K5/8/8/8/8/8 b - - 0 1";
    for fen in [fen.to_string(), flip_fen(fen)] {
        for seed in [None, Some(42), Some(1337), Some(420)] {
            let pos = Position::from_fen(&fen).expect("valid FEN");
            let mut bot = bot_with_depth(3, seed);
            let mv = bot.think(&pos, &long_clock()).expect("a move");
            let mut board = pos.board().clone();
            board.play(mv);
            for reply in legal_moves(&board) {
                let mut after = board.clone();
                after.play(reply);
                assert_ne!(
                    after.status(),
                    GameStatus::Won,
                    "{mv} (seed {seed:?}) allows mate by {reply} in {fen}"
                );
            }
        }
    }
}

#[test]
fn knight_fork_wins_the_rook() {
    let fen = "k3r3/8/8/1N6/3p4/8/8/K7 w - - 0 1";
    let pos = Position::from_fen(fen).expect("valid FEN");
    let mut bot = bot_with_depth(4, None);
    let mv = bot.think(&pos, &long_clock()).expect("a move");
    let mut board = pos.board().clone();
    board.play(mv);
    // The knight checks on c7 instead of grabbing the pawn right away.
    assert_eq!(board.piece_on(mv.to), Some(Piece::Knight), "got {mv}");
    assert!(
        !board.checkers().is_empty(),
        "expected a forking check, got {mv}"
    );
}
