//! Packed move encoding.
//!
//! Moves are packed into a `u32` so move lists stay cheap to build, copy,
//! sort, and compare during search:
//!
//! ```text
//! bits  0..=5   source square
//! bits  6..=11  target square
//! bits 12..=14  moving piece code
//! bits 15..=17  promotion piece code (7 = none)
//! bit  18       capture flag
//! bit  19       double pawn push flag
//! bit  20       en passant flag
//! bit  21       castling flag
//! ```

use crate::game_state::chess_types::{Move, PieceKind, Square};

pub const FROM_SHIFT: u32 = 0;
pub const TO_SHIFT: u32 = 6;
pub const PIECE_SHIFT: u32 = 12;
pub const PROMOTION_SHIFT: u32 = 15;

pub const SQUARE_MASK: u32 = 0x3F;
pub const PIECE_MASK: u32 = 0x7;
pub const NO_PIECE_CODE: u32 = 0x7;

pub const FLAG_CAPTURE: u32 = 1 << 18;
pub const FLAG_DOUBLE_PAWN_PUSH: u32 = 1 << 19;
pub const FLAG_EN_PASSANT: u32 = 1 << 20;
pub const FLAG_CASTLING: u32 = 1 << 21;

#[inline]
pub const fn piece_kind_to_code(piece: PieceKind) -> u32 {
    piece.index() as u32
}

#[inline]
pub const fn piece_kind_from_code(code: u32) -> Option<PieceKind> {
    match code {
        0 => Some(PieceKind::Pawn),
        1 => Some(PieceKind::Knight),
        2 => Some(PieceKind::Bishop),
        3 => Some(PieceKind::Rook),
        4 => Some(PieceKind::Queen),
        5 => Some(PieceKind::King),
        _ => None,
    }
}

/// Pack a move. `flags` should be an OR of the `FLAG_*` constants.
#[inline]
pub fn pack_move(
    from: Square,
    to: Square,
    piece: PieceKind,
    promotion: Option<PieceKind>,
    flags: u32,
) -> Move {
    let promo_code = match promotion {
        Some(p) => piece_kind_to_code(p),
        None => NO_PIECE_CODE,
    };
    ((from as u32) << FROM_SHIFT)
        | ((to as u32) << TO_SHIFT)
        | (piece_kind_to_code(piece) << PIECE_SHIFT)
        | (promo_code << PROMOTION_SHIFT)
        | flags
}

#[inline]
pub const fn move_from(mv: Move) -> Square {
    ((mv >> FROM_SHIFT) & SQUARE_MASK) as Square
}

#[inline]
pub const fn move_to(mv: Move) -> Square {
    ((mv >> TO_SHIFT) & SQUARE_MASK) as Square
}

#[inline]
pub const fn move_piece_code(mv: Move) -> u32 {
    (mv >> PIECE_SHIFT) & PIECE_MASK
}

#[inline]
pub fn move_piece(mv: Move) -> PieceKind {
    // A packed move always carries a valid mover code.
    piece_kind_from_code(move_piece_code(mv)).unwrap_or(PieceKind::Pawn)
}

#[inline]
pub const fn move_promotion(mv: Move) -> Option<PieceKind> {
    piece_kind_from_code((mv >> PROMOTION_SHIFT) & PIECE_MASK)
}

#[inline]
pub const fn is_capture(mv: Move) -> bool {
    (mv & FLAG_CAPTURE) != 0
}

#[inline]
pub const fn is_double_pawn_push(mv: Move) -> bool {
    (mv & FLAG_DOUBLE_PAWN_PUSH) != 0
}

#[inline]
pub const fn is_en_passant(mv: Move) -> bool {
    (mv & FLAG_EN_PASSANT) != 0
}

#[inline]
pub const fn is_castling(mv: Move) -> bool {
    (mv & FLAG_CASTLING) != 0
}
