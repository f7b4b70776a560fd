//! Zobrist hashing keys and full-board hash computation.
//!
//! Keys are drawn from a seeded PRNG so hashes are stable across runs and
//! across machines. Make/unmake updates the hash incrementally; the full
//! recomputation here exists for position setup and for asserting the
//! incremental updates in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::chess_types::{
    CastlingRights, Color, GameState, PieceKind, Square, ALL_PIECE_KINDS,
};

const ZOBRIST_SEED: u64 = 1_804_289_383;

pub struct ZobristKeys {
    // [color][piece_kind][square]
    piece_square: [[[u64; 64]; 6]; 2],
    // One key per file of a potential en passant target.
    en_passant_file: [u64; 8],
    // One key per castling-rights bitmask value.
    castling: [u64; 16],
    side: u64,
}

impl ZobristKeys {
    pub fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

        let mut piece_square = [[[0u64; 64]; 6]; 2];
        for color in &mut piece_square {
            for piece in color.iter_mut() {
                for square in piece.iter_mut() {
                    *square = rng.gen::<u64>();
                }
            }
        }

        let mut en_passant_file = [0u64; 8];
        for key in &mut en_passant_file {
            *key = rng.gen::<u64>();
        }

        let mut castling = [0u64; 16];
        for key in &mut castling {
            *key = rng.gen::<u64>();
        }

        ZobristKeys {
            piece_square,
            en_passant_file,
            castling,
            side: rng.gen::<u64>(),
        }
    }

    #[inline]
    pub fn piece_key(&self, color: Color, piece: PieceKind, square: Square) -> u64 {
        self.piece_square[color.index()][piece.index()][square as usize]
    }

    #[inline]
    pub fn en_passant_key(&self, square: Square) -> u64 {
        self.en_passant_file[(square % 8) as usize]
    }

    #[inline]
    pub fn castling_key(&self, rights: CastlingRights) -> u64 {
        self.castling[(rights & 0x0F) as usize]
    }

    #[inline]
    pub fn side_key(&self) -> u64 {
        self.side
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a position from scratch. The side key is folded in only when the
/// dark side is to move.
pub fn compute_zobrist_key(keys: &ZobristKeys, game_state: &GameState) -> u64 {
    let mut hash = 0u64;

    for color in [Color::Light, Color::Dark] {
        for piece in ALL_PIECE_KINDS {
            let mut bitboard = game_state.pieces[color.index()][piece.index()];
            while bitboard != 0 {
                let square = bitboard.trailing_zeros() as Square;
                bitboard &= bitboard - 1;
                hash ^= keys.piece_key(color, piece, square);
            }
        }
    }

    if let Some(square) = game_state.en_passant_square {
        hash ^= keys.en_passant_key(square);
    }
    hash ^= keys.castling_key(game_state.castling_rights);
    if game_state.side_to_move == Color::Dark {
        hash ^= keys.side_key();
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_across_instances() {
        let a = ZobristKeys::new();
        let b = ZobristKeys::new();
        assert_eq!(
            a.piece_key(Color::Light, PieceKind::Pawn, 48),
            b.piece_key(Color::Light, PieceKind::Pawn, 48)
        );
        assert_eq!(a.side_key(), b.side_key());
        assert_eq!(a.castling_key(0x0F), b.castling_key(0x0F));
    }

    #[test]
    fn en_passant_keys_depend_only_on_file() {
        let keys = ZobristKeys::new();
        // e3 (index 44) and e6 (index 20) share a file.
        assert_eq!(keys.en_passant_key(44), keys.en_passant_key(20));
        assert_ne!(keys.en_passant_key(44), keys.en_passant_key(45));
    }

    #[test]
    fn side_to_move_changes_the_hash() {
        let keys = ZobristKeys::new();
        let mut game = GameState::new_empty();
        game.pieces[Color::Light.index()][PieceKind::King.index()] = 1u64 << 62;
        game.pieces[Color::Dark.index()][PieceKind::King.index()] = 1u64 << 6;
        game.recalc_occupancy();

        let light = compute_zobrist_key(&keys, &game);
        game.side_to_move = Color::Dark;
        let dark = compute_zobrist_key(&keys, &game);
        assert_eq!(light ^ keys.side_key(), dark);
    }
}
