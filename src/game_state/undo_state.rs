//! Reversible move records.
//!
//! Every successful `make_move` returns an `UndoState` capturing exactly the
//! information that cannot be reconstructed from the move itself. Feeding the
//! record back to `unmake_move` restores the position bit for bit, so search
//! never has to copy the whole board.

use crate::game_state::chess_types::{CastlingRights, Move, PieceKind, Square};

/// Snapshot of irreversible state taken just before a move is applied.
#[derive(Debug, Clone, Copy)]
pub struct UndoState {
    pub mv: Move,
    pub captured_piece: Option<PieceKind>,
    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
    pub prev_zobrist_key: u64,
}

/// Smaller record for null moves, which only disturb the en passant square,
/// the side to move, and the hash.
#[derive(Debug, Clone, Copy)]
pub struct NullMoveUndo {
    pub prev_en_passant_square: Option<Square>,
    pub prev_zobrist_key: u64,
}
