//! Pseudo-legal move generation.
//!
//! Generates every move that obeys piece movement rules without checking
//! whether the mover's king is left in check; that filter happens in
//! `make_move`, which refuses moves that expose the king.

use crate::game_state::chess_rules::*;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::attack_tables::AttackTables;
use crate::moves::move_descriptions::*;

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Generate all pseudo-legal moves for the side to move.
pub fn generate_moves(tables: &AttackTables, game_state: &GameState) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    let us = game_state.side_to_move;
    let them = us.opposite();
    let own_occupancy = game_state.occupancy_by_color[us.index()];
    let enemy_occupancy = game_state.occupancy_by_color[them.index()];

    generate_pawn_moves(tables, game_state, &mut moves);
    generate_castling_moves(tables, game_state, &mut moves);

    for piece in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        let mut bitboard = game_state.pieces[us.index()][piece.index()];
        while bitboard != 0 {
            let from = bitboard.trailing_zeros() as Square;
            bitboard &= bitboard - 1;

            let attacks = match piece {
                PieceKind::Knight => tables.knight_attacks(from),
                PieceKind::Bishop => tables.bishop_attacks(from, game_state.occupancy_all),
                PieceKind::Rook => tables.rook_attacks(from, game_state.occupancy_all),
                PieceKind::Queen => tables.queen_attacks(from, game_state.occupancy_all),
                PieceKind::King => tables.king_attacks(from),
                PieceKind::Pawn => unreachable!(),
            };

            let mut targets = attacks & !own_occupancy;
            while targets != 0 {
                let to = targets.trailing_zeros() as Square;
                targets &= targets - 1;
                let flags = if (enemy_occupancy & (1u64 << to)) != 0 {
                    FLAG_CAPTURE
                } else {
                    0
                };
                moves.push(pack_move(from, to, piece, None, flags));
            }
        }
    }

    moves
}

fn generate_pawn_moves(tables: &AttackTables, game_state: &GameState, moves: &mut Vec<Move>) {
    let us = game_state.side_to_move;
    let them = us.opposite();
    let enemy_occupancy = game_state.occupancy_by_color[them.index()];

    // Light pawns advance toward index 0; dark pawns toward index 63.
    let (push_delta, start_range, promo_range): (i8, _, _) = match us {
        Color::Light => (-8, 48..=55u8, 8..=15u8),
        Color::Dark => (8, 8..=15u8, 48..=55u8),
    };

    let mut pawns = game_state.pieces[us.index()][PieceKind::Pawn.index()];
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        pawns &= pawns - 1;

        let single = (from as i8 + push_delta) as Square;
        if (game_state.occupancy_all & (1u64 << single)) == 0 {
            if promo_range.contains(&from) {
                for promo in PROMOTION_KINDS {
                    moves.push(pack_move(from, single, PieceKind::Pawn, Some(promo), 0));
                }
            } else {
                moves.push(pack_move(from, single, PieceKind::Pawn, None, 0));

                if start_range.contains(&from) {
                    let double = (single as i8 + push_delta) as Square;
                    if (game_state.occupancy_all & (1u64 << double)) == 0 {
                        moves.push(pack_move(
                            from,
                            double,
                            PieceKind::Pawn,
                            None,
                            FLAG_DOUBLE_PAWN_PUSH,
                        ));
                    }
                }
            }
        }

        let mut captures = tables.pawn_attacks(us, from) & enemy_occupancy;
        while captures != 0 {
            let to = captures.trailing_zeros() as Square;
            captures &= captures - 1;
            if promo_range.contains(&from) {
                for promo in PROMOTION_KINDS {
                    moves.push(pack_move(from, to, PieceKind::Pawn, Some(promo), FLAG_CAPTURE));
                }
            } else {
                moves.push(pack_move(from, to, PieceKind::Pawn, None, FLAG_CAPTURE));
            }
        }

        if let Some(ep_square) = game_state.en_passant_square {
            if (tables.pawn_attacks(us, from) & (1u64 << ep_square)) != 0 {
                moves.push(pack_move(
                    from,
                    ep_square,
                    PieceKind::Pawn,
                    None,
                    FLAG_CAPTURE | FLAG_EN_PASSANT,
                ));
            }
        }
    }
}

/// Castling is generated when the right is held, the squares between king and
/// rook are empty, and neither the king's start square nor its transit square
/// is attacked. The landing square is covered by the post-move king safety
/// check like every other move.
fn generate_castling_moves(tables: &AttackTables, game_state: &GameState, moves: &mut Vec<Move>) {
    let us = game_state.side_to_move;
    let them = us.opposite();
    let occupancy = game_state.occupancy_all;
    let rights = game_state.castling_rights;

    let empty = |square: Square| (occupancy & (1u64 << square)) == 0;
    let safe = |square: Square| !is_square_attacked(tables, game_state, square, them);

    match us {
        Color::Light => {
            if (rights & CASTLE_LIGHT_KINGSIDE) != 0
                && empty(F1)
                && empty(G1)
                && safe(E1)
                && safe(F1)
            {
                moves.push(pack_move(E1, G1, PieceKind::King, None, FLAG_CASTLING));
            }
            if (rights & CASTLE_LIGHT_QUEENSIDE) != 0
                && empty(D1)
                && empty(C1)
                && empty(B1)
                && safe(E1)
                && safe(D1)
            {
                moves.push(pack_move(E1, C1, PieceKind::King, None, FLAG_CASTLING));
            }
        }
        Color::Dark => {
            if (rights & CASTLE_DARK_KINGSIDE) != 0
                && empty(F8)
                && empty(G8)
                && safe(E8)
                && safe(F8)
            {
                moves.push(pack_move(E8, G8, PieceKind::King, None, FLAG_CASTLING));
            }
            if (rights & CASTLE_DARK_QUEENSIDE) != 0
                && empty(D8)
                && empty(C8)
                && empty(B8)
                && safe(E8)
                && safe(D8)
            {
                moves.push(pack_move(E8, C8, PieceKind::King, None, FLAG_CASTLING));
            }
        }
    }
}

/// Generate only the capture moves (including en passant). Used by the
/// quiescence search.
pub fn generate_captures(tables: &AttackTables, game_state: &GameState) -> Vec<Move> {
    generate_moves(tables, game_state)
        .into_iter()
        .filter(|&mv| is_capture(mv))
        .collect()
}
