//! Evaluation seam.
//!
//! The search treats evaluation as a black box behind the [`Evaluator`]
//! trait. Positions are marshalled into two parallel arrays: piece codes and
//! square codes, kings first (slots 0 and 1), terminated by a zero sentinel.
//! This layout lets external evaluators (including trained networks) plug in
//! without knowing anything about the bitboard representation.

use crate::game_state::chess_types::{Color, GameState, PieceKind, ALL_PIECE_KINDS};

/// Piece codes in the evaluator's vocabulary, indexed `[color][piece_kind]`.
/// Light king is 1 and dark king is 7; the value 0 terminates the arrays.
pub const EVAL_PIECE_CODES: [[i32; 6]; 2] = [
    [6, 5, 4, 3, 2, 1],
    [12, 11, 10, 9, 8, 7],
];

/// Remap internal squares (a8 = 0) to the evaluator's convention (a1 = 0).
pub const EVAL_SQUARE_CODES: [i32; 64] = build_eval_square_codes();

const fn build_eval_square_codes() -> [i32; 64] {
    let mut codes = [0i32; 64];
    let mut sq = 0usize;
    while sq < 64 {
        codes[sq] = ((7 - sq as i32 / 8) * 8) + sq as i32 % 8;
        sq += 1;
    }
    codes
}

/// Position evaluation from the side to move's perspective, in centipawns.
pub trait Evaluator: Send + Sync {
    /// `pieces` and `squares` are parallel zero-terminated arrays; slots 0
    /// and 1 always hold the light and dark king.
    fn evaluate(&self, side_to_move: Color, pieces: &[i32], squares: &[i32]) -> i32;
}

/// Marshal `game_state` into the evaluator array layout and score it.
/// The raw score is scaled down as the fifty-move clock advances so the
/// engine steers away from lines that drift toward the draw rule.
pub fn evaluate_position(evaluator: &dyn Evaluator, game_state: &GameState) -> i32 {
    let mut pieces = [0i32; 33];
    let mut squares = [0i32; 33];

    // Kings occupy slots 0 and 1.
    for color in [Color::Light, Color::Dark] {
        let king_bb = game_state.pieces[color.index()][PieceKind::King.index()];
        let king_square = king_bb.trailing_zeros() as usize;
        pieces[color.index()] = EVAL_PIECE_CODES[color.index()][PieceKind::King.index()];
        squares[color.index()] = EVAL_SQUARE_CODES[king_square];
    }

    let mut index = 2usize;
    for color in [Color::Light, Color::Dark] {
        for piece in ALL_PIECE_KINDS {
            if piece == PieceKind::King {
                continue;
            }
            let mut bitboard = game_state.pieces[color.index()][piece.index()];
            while bitboard != 0 {
                let square = bitboard.trailing_zeros() as usize;
                bitboard &= bitboard - 1;
                pieces[index] = EVAL_PIECE_CODES[color.index()][piece.index()];
                squares[index] = EVAL_SQUARE_CODES[square];
                index += 1;
            }
        }
    }
    // pieces[index] stays 0 as the terminator.

    let score = evaluator.evaluate(game_state.side_to_move, &pieces, &squares);
    // Clamped: a clock past 100 must deaden the score, not flip its sign.
    let decay = (100 - game_state.halfmove_clock as i32).max(0);
    score * decay / 100
}

/// Plain material counter. Mostly useful for tests and as a fallback when no
/// external evaluator is configured.
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    fn piece_value(code: i32) -> i32 {
        match code {
            1 | 7 => 0,
            2 | 8 => 900,
            3 | 9 => 500,
            4 | 10 => 330,
            5 | 11 => 320,
            6 | 12 => 100,
            _ => 0,
        }
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, side_to_move: Color, pieces: &[i32], _squares: &[i32]) -> i32 {
        let mut score = 0i32;
        for &code in pieces {
            if code == 0 {
                break;
            }
            let value = Self::piece_value(code);
            if code <= 6 {
                score += value;
            } else {
                score -= value;
            }
        }
        match side_to_move {
            Color::Light => score,
            Color::Dark => -score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::zobrist::ZobristKeys;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn square_codes_flip_rank_and_keep_file() {
        // a8 (internal 0) is 56 in the evaluator convention; h1 is 7.
        assert_eq!(EVAL_SQUARE_CODES[0], 56);
        assert_eq!(EVAL_SQUARE_CODES[63], 7);
        assert_eq!(EVAL_SQUARE_CODES[60], 4); // e1
    }

    #[test]
    fn kings_are_marshalled_into_the_first_two_slots() {
        struct SlotProbe;
        impl Evaluator for SlotProbe {
            fn evaluate(&self, _side: Color, pieces: &[i32], squares: &[i32]) -> i32 {
                assert_eq!(pieces[0], 1);
                assert_eq!(pieces[1], 7);
                assert_eq!(squares[0], 4); // light king on e1
                assert_eq!(squares[1], 60); // dark king on e8
                0
            }
        }
        let keys = ZobristKeys::new();
        let game = parse_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1", &keys).unwrap();
        evaluate_position(&SlotProbe, &game);
    }

    #[test]
    fn material_score_flips_with_side_to_move() {
        let keys = ZobristKeys::new();
        let mut game = parse_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", &keys).unwrap();
        assert_eq!(evaluate_position(&MaterialEvaluator, &game), 500);
        game.side_to_move = Color::Dark;
        assert_eq!(evaluate_position(&MaterialEvaluator, &game), -500);
    }

    #[test]
    fn score_decays_as_the_fifty_move_clock_grows() {
        let keys = ZobristKeys::new();
        let mut game = parse_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", &keys).unwrap();
        game.halfmove_clock = 80;
        assert_eq!(evaluate_position(&MaterialEvaluator, &game), 100);
    }

    #[test]
    fn scores_never_change_sign_past_the_draw_clock() {
        let keys = ZobristKeys::new();
        let mut game = parse_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", &keys).unwrap();
        game.halfmove_clock = 120;
        assert_eq!(evaluate_position(&MaterialEvaluator, &game), 0);
    }
}
