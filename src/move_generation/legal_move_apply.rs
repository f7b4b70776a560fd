//! Applying and reverting moves.
//!
//! `make_move` mutates the state in place, updating the Zobrist hash
//! incrementally, and returns `None` after reverting itself when the move
//! would leave the mover's king in check. `unmake_move` restores the position
//! bit for bit from the returned `UndoState`.

use crate::game_state::chess_rules::*;
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::NullMoveUndo;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::moves::attack_tables::AttackTables;
use crate::moves::move_descriptions::*;
use crate::search::zobrist::ZobristKeys;

/// Rook relocation for each castling king destination:
/// (king landing square, rook from, rook to).
const CASTLE_ROOK_MOVES: [(Square, Square, Square); 4] = [
    (G1, H1, F1),
    (C1, A1, D1),
    (G8, H8, F8),
    (C8, A8, D8),
];

/// Apply `mv` for the side to move. Returns the undo record on success, or
/// `None` (with the state already restored) if the move is illegal because it
/// leaves the mover's king attacked.
pub fn make_move(
    game_state: &mut GameState,
    keys: &ZobristKeys,
    tables: &AttackTables,
    mv: Move,
) -> Option<UndoState> {
    let us = game_state.side_to_move;
    let them = us.opposite();
    let from = move_from(mv);
    let to = move_to(mv);
    let piece = move_piece(mv);

    let undo = UndoState {
        mv,
        captured_piece: None,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_square: game_state.en_passant_square,
        prev_halfmove_clock: game_state.halfmove_clock,
        prev_zobrist_key: game_state.zobrist_key,
    };
    let mut undo = undo;

    game_state.repetition_history.push(game_state.zobrist_key);
    game_state.ply += 1;

    // Move the piece, promoting if requested.
    game_state.pieces[us.index()][piece.index()] &= !(1u64 << from);
    game_state.zobrist_key ^= keys.piece_key(us, piece, from);
    let placed = move_promotion(mv).unwrap_or(piece);
    game_state.pieces[us.index()][placed.index()] |= 1u64 << to;
    game_state.zobrist_key ^= keys.piece_key(us, placed, to);

    // Remove any captured piece.
    if is_en_passant(mv) {
        let victim_square = match us {
            Color::Light => to + 8,
            Color::Dark => to - 8,
        };
        game_state.pieces[them.index()][PieceKind::Pawn.index()] &= !(1u64 << victim_square);
        game_state.zobrist_key ^= keys.piece_key(them, PieceKind::Pawn, victim_square);
        undo.captured_piece = Some(PieceKind::Pawn);
    } else if is_capture(mv) {
        if let Some(victim) = game_state.piece_on_square(them, to) {
            game_state.pieces[them.index()][victim.index()] &= !(1u64 << to);
            game_state.zobrist_key ^= keys.piece_key(them, victim, to);
            undo.captured_piece = Some(victim);
        }
    }

    // Relocate the rook on castling.
    if is_castling(mv) {
        for &(king_to, rook_from, rook_to) in &CASTLE_ROOK_MOVES {
            if king_to == to {
                game_state.pieces[us.index()][PieceKind::Rook.index()] &= !(1u64 << rook_from);
                game_state.pieces[us.index()][PieceKind::Rook.index()] |= 1u64 << rook_to;
                game_state.zobrist_key ^= keys.piece_key(us, PieceKind::Rook, rook_from);
                game_state.zobrist_key ^= keys.piece_key(us, PieceKind::Rook, rook_to);
                break;
            }
        }
    }

    // En passant target: clear the old one, set a new one on double pushes.
    if let Some(old_ep) = game_state.en_passant_square.take() {
        game_state.zobrist_key ^= keys.en_passant_key(old_ep);
    }
    if is_double_pawn_push(mv) {
        let ep_square = match us {
            Color::Light => to + 8,
            Color::Dark => to - 8,
        };
        game_state.en_passant_square = Some(ep_square);
        game_state.zobrist_key ^= keys.en_passant_key(ep_square);
    }

    // Castling rights survive only what both endpoints allow.
    game_state.zobrist_key ^= keys.castling_key(game_state.castling_rights);
    game_state.castling_rights &=
        CASTLING_RIGHTS_SURVIVAL[from as usize] & CASTLING_RIGHTS_SURVIVAL[to as usize];
    game_state.zobrist_key ^= keys.castling_key(game_state.castling_rights);

    // Fifty-move clock.
    if piece == PieceKind::Pawn || is_capture(mv) {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock += 1;
    }

    game_state.recalc_occupancy();

    game_state.side_to_move = them;
    game_state.zobrist_key ^= keys.side_key();

    if is_king_in_check(tables, game_state, us) {
        unmake_move(game_state, undo);
        return None;
    }

    Some(undo)
}

/// Revert a move applied by `make_move`.
pub fn unmake_move(game_state: &mut GameState, undo: UndoState) {
    game_state.repetition_history.pop();
    game_state.ply -= 1;

    // The mover is the side that is now NOT to move.
    let us = game_state.side_to_move.opposite();
    let them = game_state.side_to_move;
    game_state.side_to_move = us;

    let mv = undo.mv;
    let from = move_from(mv);
    let to = move_to(mv);
    let piece = move_piece(mv);

    // Put the piece back, removing a promoted piece from the target square.
    let placed = move_promotion(mv).unwrap_or(piece);
    game_state.pieces[us.index()][placed.index()] &= !(1u64 << to);
    game_state.pieces[us.index()][piece.index()] |= 1u64 << from;

    // Restore the captured piece.
    if let Some(victim) = undo.captured_piece {
        let victim_square = if is_en_passant(mv) {
            match us {
                Color::Light => to + 8,
                Color::Dark => to - 8,
            }
        } else {
            to
        };
        game_state.pieces[them.index()][victim.index()] |= 1u64 << victim_square;
    }

    // Undo the castling rook relocation.
    if is_castling(mv) {
        for &(king_to, rook_from, rook_to) in &CASTLE_ROOK_MOVES {
            if king_to == to {
                game_state.pieces[us.index()][PieceKind::Rook.index()] &= !(1u64 << rook_to);
                game_state.pieces[us.index()][PieceKind::Rook.index()] |= 1u64 << rook_from;
                break;
            }
        }
    }

    game_state.castling_rights = undo.prev_castling_rights;
    game_state.en_passant_square = undo.prev_en_passant_square;
    game_state.halfmove_clock = undo.prev_halfmove_clock;
    game_state.zobrist_key = undo.prev_zobrist_key;

    game_state.recalc_occupancy();
}

/// Pass the turn without moving. Clears the en passant square and flips the
/// side to move; the fifty-move clock is left untouched.
pub fn make_null_move(game_state: &mut GameState, keys: &ZobristKeys) -> NullMoveUndo {
    let undo = NullMoveUndo {
        prev_en_passant_square: game_state.en_passant_square,
        prev_zobrist_key: game_state.zobrist_key,
    };

    game_state.repetition_history.push(game_state.zobrist_key);
    game_state.ply += 1;

    if let Some(ep_square) = game_state.en_passant_square.take() {
        game_state.zobrist_key ^= keys.en_passant_key(ep_square);
    }
    game_state.side_to_move = game_state.side_to_move.opposite();
    game_state.zobrist_key ^= keys.side_key();

    undo
}

pub fn unmake_null_move(game_state: &mut GameState, undo: NullMoveUndo) {
    game_state.repetition_history.pop();
    game_state.ply -= 1;
    game_state.side_to_move = game_state.side_to_move.opposite();
    game_state.en_passant_square = undo.prev_en_passant_square;
    game_state.zobrist_key = undo.prev_zobrist_key;
}
