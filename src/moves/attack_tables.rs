//! Precomputed attack table construction and lookup.
//!
//! Leaper attacks (pawn, knight, king) are simple per-square masks. Slider
//! attacks (bishop, rook) use magic bitboards: each square stores a mask of
//! relevant blocker squares, and every subset of that mask indexes a dense
//! table of ray attacks through `(blockers * magic) >> (64 - relevant_bits)`.
//! Tables are built once at startup; lookups are branchless multiplies.

use crate::game_state::chess_types::{Color, Square};
use crate::moves::magic_numbers::*;

/// All precomputed attack tables. Build once with [`AttackTables::new`] and
/// share by reference.
pub struct AttackTables {
    pub pawn: [[u64; 64]; 2],
    pub knight: [u64; 64],
    pub king: [u64; 64],
    pub bishop_masks: [u64; 64],
    pub rook_masks: [u64; 64],
    // Dense magic-indexed tables. Boxed to the heap via Vec so the struct
    // stays small enough for test-thread stacks.
    bishop: Vec<[u64; 512]>,
    rook: Vec<[u64; 4096]>,
}

impl AttackTables {
    pub fn new() -> Self {
        let mut tables = AttackTables {
            pawn: [[0; 64]; 2],
            knight: [0; 64],
            king: [0; 64],
            bishop_masks: [0; 64],
            rook_masks: [0; 64],
            bishop: vec![[0; 512]; 64],
            rook: vec![[0; 4096]; 64],
        };

        for square in 0..64u8 {
            tables.pawn[Color::Light.index()][square as usize] =
                mask_pawn_attacks(Color::Light, square);
            tables.pawn[Color::Dark.index()][square as usize] =
                mask_pawn_attacks(Color::Dark, square);
            tables.knight[square as usize] = mask_knight_attacks(square);
            tables.king[square as usize] = mask_king_attacks(square);
        }

        for square in 0..64usize {
            let mask = mask_bishop_relevant_occupancy(square as Square);
            tables.bishop_masks[square] = mask;
            let bits = mask.count_ones();
            for index in 0..(1u32 << bits) {
                let blockers = blocker_subset(index, mask);
                let magic_index = ((blockers.wrapping_mul(BISHOP_MAGICS[square]))
                    >> (64 - BISHOP_RELEVANT_BITS[square])) as usize;
                tables.bishop[square][magic_index] =
                    bishop_attacks_on_the_fly(square as Square, blockers);
            }

            let mask = mask_rook_relevant_occupancy(square as Square);
            tables.rook_masks[square] = mask;
            let bits = mask.count_ones();
            for index in 0..(1u32 << bits) {
                let blockers = blocker_subset(index, mask);
                let magic_index = ((blockers.wrapping_mul(ROOK_MAGICS[square]))
                    >> (64 - ROOK_RELEVANT_BITS[square])) as usize;
                tables.rook[square][magic_index] =
                    rook_attacks_on_the_fly(square as Square, blockers);
            }
        }

        tables
    }

    #[inline]
    pub fn pawn_attacks(&self, color: Color, square: Square) -> u64 {
        self.pawn[color.index()][square as usize]
    }

    #[inline]
    pub fn knight_attacks(&self, square: Square) -> u64 {
        self.knight[square as usize]
    }

    #[inline]
    pub fn king_attacks(&self, square: Square) -> u64 {
        self.king[square as usize]
    }

    #[inline]
    pub fn bishop_attacks(&self, square: Square, occupancy: u64) -> u64 {
        let sq = square as usize;
        let blockers = occupancy & self.bishop_masks[sq];
        let index =
            (blockers.wrapping_mul(BISHOP_MAGICS[sq]) >> (64 - BISHOP_RELEVANT_BITS[sq])) as usize;
        self.bishop[sq][index]
    }

    #[inline]
    pub fn rook_attacks(&self, square: Square, occupancy: u64) -> u64 {
        let sq = square as usize;
        let blockers = occupancy & self.rook_masks[sq];
        let index =
            (blockers.wrapping_mul(ROOK_MAGICS[sq]) >> (64 - ROOK_RELEVANT_BITS[sq])) as usize;
        self.rook[sq][index]
    }

    #[inline]
    pub fn queen_attacks(&self, square: Square, occupancy: u64) -> u64 {
        self.bishop_attacks(square, occupancy) | self.rook_attacks(square, occupancy)
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

fn mask_pawn_attacks(color: Color, square: Square) -> u64 {
    let bitboard = 1u64 << square;
    match color {
        // Light pawns move toward rank 8, which is toward index 0 here.
        Color::Light => ((bitboard >> 7) & NOT_A_FILE) | ((bitboard >> 9) & NOT_H_FILE),
        Color::Dark => ((bitboard << 9) & NOT_A_FILE) | ((bitboard << 7) & NOT_H_FILE),
    }
}

fn mask_knight_attacks(square: Square) -> u64 {
    let bitboard = 1u64 << square;
    let mut attacks = 0u64;
    attacks |= (bitboard >> 17) & NOT_H_FILE;
    attacks |= (bitboard >> 15) & NOT_A_FILE;
    attacks |= (bitboard >> 10) & NOT_HG_FILE;
    attacks |= (bitboard >> 6) & NOT_AB_FILE;
    attacks |= (bitboard << 17) & NOT_A_FILE;
    attacks |= (bitboard << 15) & NOT_H_FILE;
    attacks |= (bitboard << 10) & NOT_AB_FILE;
    attacks |= (bitboard << 6) & NOT_HG_FILE;
    attacks
}

fn mask_king_attacks(square: Square) -> u64 {
    let bitboard = 1u64 << square;
    let mut attacks = 0u64;
    attacks |= (bitboard >> 7) & NOT_A_FILE;
    attacks |= bitboard >> 8;
    attacks |= (bitboard >> 9) & NOT_H_FILE;
    attacks |= (bitboard >> 1) & NOT_H_FILE;
    attacks |= (bitboard << 1) & NOT_A_FILE;
    attacks |= (bitboard << 7) & NOT_H_FILE;
    attacks |= bitboard << 8;
    attacks |= (bitboard << 9) & NOT_A_FILE;
    attacks
}

/// Bishop blocker mask: ray squares excluding the board edge, since an edge
/// piece can never shorten the attack set.
fn mask_bishop_relevant_occupancy(square: Square) -> u64 {
    let mut attacks = 0u64;
    let tr = (square / 8) as i32;
    let tf = (square % 8) as i32;
    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let (mut r, mut f) = (tr + dr, tf + df);
        while (1..7).contains(&r) && (1..7).contains(&f) {
            attacks |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Rook blocker mask, edge-exclusive like the bishop version.
fn mask_rook_relevant_occupancy(square: Square) -> u64 {
    let mut attacks = 0u64;
    let tr = (square / 8) as i32;
    let tf = (square % 8) as i32;
    for r in (tr + 1)..7 {
        attacks |= 1u64 << (r * 8 + tf);
    }
    for r in 1..tr {
        attacks |= 1u64 << (r * 8 + tf);
    }
    for f in (tf + 1)..7 {
        attacks |= 1u64 << (tr * 8 + f);
    }
    for f in 1..tf {
        attacks |= 1u64 << (tr * 8 + f);
    }
    attacks
}

/// Ray-cast bishop attacks including the first blocker on each diagonal.
fn bishop_attacks_on_the_fly(square: Square, blockers: u64) -> u64 {
    let mut attacks = 0u64;
    let tr = (square / 8) as i32;
    let tf = (square % 8) as i32;
    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let (mut r, mut f) = (tr + dr, tf + df);
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if (bit & blockers) != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Ray-cast rook attacks including the first blocker on each file/rank.
fn rook_attacks_on_the_fly(square: Square, blockers: u64) -> u64 {
    let mut attacks = 0u64;
    let tr = (square / 8) as i32;
    let tf = (square % 8) as i32;
    for (dr, df) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
        let (mut r, mut f) = (tr + dr, tf + df);
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if (bit & blockers) != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Expand subset `index` over the set bits of `mask`: bit `i` of the index
/// decides whether the `i`-th lowest set bit of the mask is occupied.
fn blocker_subset(index: u32, mut mask: u64) -> u64 {
    let mut block = 0u64;
    let mut i = 0;
    while mask != 0 {
        let square = mask.trailing_zeros();
        mask &= mask - 1;
        if (index & (1 << i)) != 0 {
            block |= 1u64 << square;
        }
        i += 1;
    }
    block
}
