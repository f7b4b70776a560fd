//! Core incremental board state representation.
//!
//! `GameState` is the central model for the engine. It stores piece bitboards,
//! occupancy caches, turn/state flags, the fifty-move clock, the incremental
//! Zobrist key, and the repetition history of the current line. It is mutated
//! in place by make/unmake and threaded through the whole recursive search.

use crate::game_state::chess_types::*;

/// Incremental game state optimized for fast move making/unmaking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // --- Bitboard representation ---
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    // Occupancy caches, recomputed wholesale after every move.
    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    // --- Side and state flags ---
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    // --- Fifty-move rule clock (half moves) ---
    pub halfmove_clock: u16,

    // --- Incremental hashing ---
    pub zobrist_key: u64,

    // --- Search / repetition support ---
    // Hashes of all ancestor positions of the current line; the current
    // position's hash is not included. Length always equals `ply`.
    pub ply: u16,
    pub repetition_history: Vec<u64>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,

            zobrist_key: 0,

            ply: 0,
            repetition_history: Vec::new(),
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Recompute both per-color occupancies and the full-board union from the
    /// twelve piece sets.
    #[inline]
    pub fn recalc_occupancy(&mut self) {
        self.occupancy_by_color[Color::Light.index()] = self.pieces[Color::Light.index()]
            .iter()
            .copied()
            .fold(0u64, |acc, bb| acc | bb);
        self.occupancy_by_color[Color::Dark.index()] = self.pieces[Color::Dark.index()]
            .iter()
            .copied()
            .fold(0u64, |acc, bb| acc | bb);
        self.occupancy_all = self.occupancy_by_color[Color::Light.index()]
            | self.occupancy_by_color[Color::Dark.index()];
    }

    /// Find which piece kind of `color` sits on `square`, if any.
    #[inline]
    pub fn piece_on_square(&self, color: Color, square: Square) -> Option<PieceKind> {
        let mask = 1u64 << square;
        for piece in ALL_PIECE_KINDS {
            if (self.pieces[color.index()][piece.index()] & mask) != 0 {
                return Some(piece);
            }
        }
        None
    }
}
