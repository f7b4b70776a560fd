//! Rule constants: the standard starting layout, named squares used by
//! castling logic, and the castling-rights survival table.

use crate::game_state::chess_types::{CastlingRights, Square};

pub const STARTING_POSITION_FEN: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// Named squares on the board layout with a8 = 0 and h1 = 63. Only the squares
// that castling bookkeeping touches get names; everything else goes through
// the algebraic helpers.
pub const A8: Square = 0;
pub const B8: Square = 1;
pub const C8: Square = 2;
pub const D8: Square = 3;
pub const E8: Square = 4;
pub const F8: Square = 5;
pub const G8: Square = 6;
pub const H8: Square = 7;
pub const A1: Square = 56;
pub const B1: Square = 57;
pub const C1: Square = 58;
pub const D1: Square = 59;
pub const E1: Square = 60;
pub const F1: Square = 61;
pub const G1: Square = 62;
pub const H1: Square = 63;

/// Which castling rights survive when a given square is touched by a move
/// (as source or target). Intersecting with both endpoints covers king moves,
/// rook moves, and rook captures in one table lookup each.
#[rustfmt::skip]
pub const CASTLING_RIGHTS_SURVIVAL: [CastlingRights; 64] = [
     7, 15, 15, 15,  3, 15, 15, 11,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    13, 15, 15, 15, 12, 15, 15, 14,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::{
        CASTLE_DARK_KINGSIDE, CASTLE_DARK_QUEENSIDE, CASTLE_LIGHT_KINGSIDE,
        CASTLE_LIGHT_QUEENSIDE,
    };

    #[test]
    fn king_home_squares_revoke_both_rights() {
        let all = 0x0F;
        assert_eq!(
            all & CASTLING_RIGHTS_SURVIVAL[E1 as usize],
            all & !(CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE)
        );
        assert_eq!(
            all & CASTLING_RIGHTS_SURVIVAL[E8 as usize],
            all & !(CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE)
        );
    }

    #[test]
    fn rook_home_squares_revoke_one_right() {
        let all = 0x0F;
        assert_eq!(all & CASTLING_RIGHTS_SURVIVAL[H1 as usize], all & !CASTLE_LIGHT_KINGSIDE);
        assert_eq!(all & CASTLING_RIGHTS_SURVIVAL[A1 as usize], all & !CASTLE_LIGHT_QUEENSIDE);
        assert_eq!(all & CASTLING_RIGHTS_SURVIVAL[H8 as usize], all & !CASTLE_DARK_KINGSIDE);
        assert_eq!(all & CASTLING_RIGHTS_SURVIVAL[A8 as usize], all & !CASTLE_DARK_QUEENSIDE);
    }

    #[test]
    fn other_squares_preserve_all_rights() {
        assert_eq!(CASTLING_RIGHTS_SURVIVAL[D8 as usize + 8], 15);
        assert_eq!(CASTLING_RIGHTS_SURVIVAL[27], 15);
    }
}
