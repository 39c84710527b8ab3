use cozy_chess::{Board as CozyBoard, Color, Move, Piece, Rank, Square};

use crate::EngineError;

/// Current game state plus the hash history of every position reached so
/// far, the current one included. The history is half of the repetition
/// universe; the search path stack is the other half.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    history: Vec<u64>,
}

impl Position {
    pub fn startpos() -> Self {
        let board = CozyBoard::default();
        let history = vec![board.hash()];
        Self { board, history }
    }

    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        let board = CozyBoard::from_fen(fen, false)
            .map_err(|_| EngineError::InvalidFen(fen.to_string()))?;
        let history = vec![board.hash()];
        Ok(Self { board, history })
    }

    pub fn board(&self) -> &CozyBoard {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn hash(&self) -> u64 {
        self.board.hash()
    }

    /// Hashes of every position played in the real game, current included.
    pub fn repetition_history(&self) -> &[u64] {
        &self.history
    }

    pub fn play(&mut self, mv: Move) -> Result<(), EngineError> {
        if !self.board.is_legal(mv) {
            return Err(EngineError::IllegalMove(format!("{}", mv)));
        }
        self.board.play(mv);
        self.history.push(self.board.hash());
        Ok(())
    }

    pub fn play_uci(&mut self, mv_uci: &str) -> Result<(), EngineError> {
        let mv = find_move_uci(&self.board, mv_uci)
            .ok_or_else(|| EngineError::IllegalMove(mv_uci.to_string()))?;
        self.play(mv)
    }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self, EngineError> {
        let mut pos = Self::startpos();
        for m in moves {
            pos.play_uci(m)?;
        }
        Ok(pos)
    }
}

/// All legal moves, in generator order.
pub fn legal_moves(board: &CozyBoard) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    board.generate_moves(|ml| {
        for m in ml {
            moves.push(m);
        }
        false
    });
    moves
}

/// Locate a legal move matching a UCI string like "e2e4" or "h7h8q".
pub fn find_move_uci(board: &CozyBoard, uci: &str) -> Option<Move> {
    let mut found = None;
    board.generate_moves(|ml| {
        for m in ml {
            if format!("{}", m) == uci {
                found = Some(m);
                break;
            }
        }
        found.is_some()
    });
    found
}

/// A move is a capture when its target square holds an enemy piece, or
/// when a pawn takes en passant onto the vacated square.
pub fn is_capture(board: &CozyBoard, mv: Move) -> bool {
    let stm = board.side_to_move();
    if board.colors(!stm).has(mv.to) {
        return true;
    }
    match board.en_passant() {
        Some(file) => {
            board.piece_on(mv.from) == Some(Piece::Pawn)
                && mv.to == Square::new(file, Rank::Sixth.relative_to(stm))
        }
        None => false,
    }
}

/// King vs king, or king vs king plus a single minor piece.
pub fn insufficient_material(board: &CozyBoard) -> bool {
    let kings = board.pieces(Piece::King);
    let rest = board.occupied() & !kings;
    match rest.len() {
        0 => true,
        1 => {
            let minors = board.pieces(Piece::Knight) | board.pieces(Piece::Bishop);
            rest & minors == rest
        }
        _ => false,
    }
}

/// Mirror a six-field FEN across the horizontal axis: ranks reversed,
/// piece colors swapped, and side to move, castling rights and en-passant
/// square flipped with them.
pub fn flip_fen(fen: &str) -> String {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    debug_assert_eq!(fields.len(), 6, "flip_fen expects a six-field FEN");
    let ranks: Vec<String> = fields[0].split('/').rev().map(swap_case).collect();
    let stm = if fields[1] == "w" { "b" } else { "w" };
    let castling = normalize_castling(&swap_case(fields[2]));
    let ep: String = fields[3]
        .chars()
        .map(|c| match c {
            '3' => '6',
            '6' => '3',
            c => c,
        })
        .collect();
    format!(
        "{} {} {} {} {} {}",
        ranks.join("/"),
        stm,
        castling,
        ep,
        fields[4],
        fields[5]
    )
}

fn swap_case(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else if c.is_ascii_lowercase() {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

fn normalize_castling(s: &str) -> String {
    let mut out = String::new();
    for c in ['K', 'Q', 'k', 'q'] {
        if s.contains(c) {
            out.push(c);
        }
    }
    if out.is_empty() {
        "-".to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_history_has_one_entry() {
        let pos = Position::startpos();
        assert_eq!(pos.repetition_history().len(), 1);
        assert_eq!(pos.repetition_history()[0], pos.hash());
    }

    #[test]
    fn playing_moves_extends_the_history() {
        let moves = ["e2e4".to_string(), "e7e5".to_string()];
        let pos = Position::set_from_start_and_moves(&moves).expect("legal moves");
        assert_eq!(pos.repetition_history().len(), 3);
    }

    #[test]
    fn illegal_uci_move_is_rejected() {
        let mut pos = Position::startpos();
        assert!(pos.play_uci("e2e5").is_err());
    }

    #[test]
    fn flip_fen_twice_is_identity() {
        let fen = "r1b1k1nr/ppppqppp/2n5/2b1P3/8/2N2N2/PPP1PPPP/R1BQKB1R w KQkq - 0 1";
        assert_eq!(flip_fen(&flip_fen(fen)), fen);
    }

    #[test]
    fn flip_fen_swaps_side_and_rights() {
        let fen = "4k3/8/8/8/8/8/8/4K2R w K - 0 1";
        assert_eq!(flip_fen(fen), "4k2r/8/8/8/8/8/8/4K3 b k - 0 1");
    }

    #[test]
    fn bare_kings_are_insufficient_material() {
        let board = CozyBoard::from_fen("k7/8/8/8/8/8/8/K7 w - - 0 1", false).unwrap();
        assert!(insufficient_material(&board));
        let board = CozyBoard::from_fen("k7/8/8/8/8/8/8/KN6 w - - 0 1", false).unwrap();
        assert!(insufficient_material(&board));
        let board = CozyBoard::from_fen("k7/8/8/8/8/8/8/KR6 w - - 0 1", false).unwrap();
        assert!(!insufficient_material(&board));
    }

    #[test]
    fn en_passant_counts_as_a_capture() {
        let board =
            CozyBoard::from_fen("k7/8/8/3pP3/8/8/8/K7 w - d6 0 2", false).expect("valid FEN");
        let take = find_move_uci(&board, "e5d6").expect("en passant is legal");
        assert!(is_capture(&board, take));
        let push = find_move_uci(&board, "e5e6").expect("the push is legal");
        assert!(!is_capture(&board, push));
    }
}
