//! Conversions between square indexes, algebraic coordinates, and long
//! algebraic (UCI-style) move notation.

use crate::errors::PositionError;
use crate::game_state::chess_types::{Move, PieceKind, Square};
use crate::moves::move_descriptions::{move_from, move_promotion, move_to};

#[rustfmt::skip]
pub const SQUARE_NAMES: [&str; 64] = [
    "a8", "b8", "c8", "d8", "e8", "f8", "g8", "h8",
    "a7", "b7", "c7", "d7", "e7", "f7", "g7", "h7",
    "a6", "b6", "c6", "d6", "e6", "f6", "g6", "h6",
    "a5", "b5", "c5", "d5", "e5", "f5", "g5", "h5",
    "a4", "b4", "c4", "d4", "e4", "f4", "g4", "h4",
    "a3", "b3", "c3", "d3", "e3", "f3", "g3", "h3",
    "a2", "b2", "c2", "d2", "e2", "f2", "g2", "h2",
    "a1", "b1", "c1", "d1", "e1", "f1", "g1", "h1",
];

#[inline]
pub fn square_to_algebraic(square: Square) -> &'static str {
    SQUARE_NAMES[square as usize]
}

/// Parse a coordinate like `e4` into a square index.
pub fn algebraic_to_square(text: &str) -> Result<Square, PositionError> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(PositionError::BadEnPassantSquare(text.to_string()));
    }
    let file = bytes[0].wrapping_sub(b'a');
    let rank = bytes[1].wrapping_sub(b'1');
    if file > 7 || rank > 7 {
        return Err(PositionError::BadEnPassantSquare(text.to_string()));
    }
    Ok((7 - rank) * 8 + file)
}

fn promotion_char(piece: PieceKind) -> char {
    match piece {
        PieceKind::Queen => 'q',
        PieceKind::Rook => 'r',
        PieceKind::Bishop => 'b',
        PieceKind::Knight => 'n',
        // Other kinds never appear as promotion targets.
        _ => '?',
    }
}

/// Format a move in long algebraic notation, e.g. `e2e4` or `a7a8q`.
pub fn move_to_lan(mv: Move) -> String {
    let from = square_to_algebraic(move_from(mv));
    let to = square_to_algebraic(move_to(mv));
    match move_promotion(mv) {
        Some(piece) => format!("{}{}{}", from, to, promotion_char(piece)),
        None => format!("{}{}", from, to),
    }
}
