//! Attack queries used to validate moves and detect checks.

use crate::game_state::chess_types::{Color, GameState, PieceKind, Square};
use crate::moves::attack_tables::AttackTables;

/// Locate the king of `color`. The board must contain exactly one.
#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> Square {
    game_state.pieces[color.index()][PieceKind::King.index()].trailing_zeros() as Square
}

/// Is `square` attacked by any piece of `attacker`?
pub fn is_square_attacked(
    tables: &AttackTables,
    game_state: &GameState,
    square: Square,
    attacker: Color,
) -> bool {
    let them = &game_state.pieces[attacker.index()];
    let occupancy = game_state.occupancy_all;

    // A pawn of `attacker` attacks `square` exactly when a pawn of the other
    // color standing on `square` would attack the pawn's square.
    if (tables.pawn_attacks(attacker.opposite(), square) & them[PieceKind::Pawn.index()]) != 0 {
        return true;
    }
    if (tables.knight_attacks(square) & them[PieceKind::Knight.index()]) != 0 {
        return true;
    }
    if (tables.king_attacks(square) & them[PieceKind::King.index()]) != 0 {
        return true;
    }

    let bishop_rays = tables.bishop_attacks(square, occupancy);
    if (bishop_rays & (them[PieceKind::Bishop.index()] | them[PieceKind::Queen.index()])) != 0 {
        return true;
    }
    let rook_rays = tables.rook_attacks(square, occupancy);
    if (rook_rays & (them[PieceKind::Rook.index()] | them[PieceKind::Queen.index()])) != 0 {
        return true;
    }

    false
}

/// Is the king of `color` currently in check?
#[inline]
pub fn is_king_in_check(tables: &AttackTables, game_state: &GameState, color: Color) -> bool {
    is_square_attacked(tables, game_state, king_square(game_state, color), color.opposite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::zobrist::ZobristKeys;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn back_rank_rook_gives_check() {
        let keys = ZobristKeys::new();
        let tables = AttackTables::new();
        let game = parse_fen("R5k1/8/8/8/8/8/8/6K1 b - - 0 1", &keys).unwrap();
        assert!(is_king_in_check(&tables, &game, Color::Dark));
        assert!(!is_king_in_check(&tables, &game, Color::Light));
    }

    #[test]
    fn pawn_attack_direction_depends_on_color() {
        let keys = ZobristKeys::new();
        let tables = AttackTables::new();
        // Light pawn on f6 checks the dark king on g7; the dark pawn on b2
        // checks the light king on a1.
        let game = parse_fen("8/6k1/5P2/8/8/8/1p6/K7 w - - 0 1", &keys).unwrap();
        assert!(is_king_in_check(&tables, &game, Color::Dark));
        assert!(is_king_in_check(&tables, &game, Color::Light));
    }

    #[test]
    fn slider_checks_are_blocked_by_interposed_pieces() {
        let keys = ZobristKeys::new();
        let tables = AttackTables::new();
        let game = parse_fen("R2n2k1/8/8/8/8/8/8/6K1 b - - 0 1", &keys).unwrap();
        assert!(!is_king_in_check(&tables, &game, Color::Dark));
    }

    #[test]
    fn king_square_finds_the_king() {
        let keys = ZobristKeys::new();
        let game = parse_fen("6k1/8/8/8/8/8/8/6K1 w - - 0 1", &keys).unwrap();
        assert_eq!(king_square(&game, Color::Dark), 6);
        assert_eq!(king_square(&game, Color::Light), 62);
    }
}
