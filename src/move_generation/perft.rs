//! Perft: exhaustive legal move counting for validating move generation and
//! make/unmake against known node counts.

use crate::game_state::chess_types::GameState;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::move_generator::generate_moves;
use crate::moves::attack_tables::AttackTables;
use crate::search::zobrist::ZobristKeys;

/// Count leaf nodes of the legal move tree to the given depth.
pub fn perft(
    game_state: &mut GameState,
    tables: &AttackTables,
    keys: &ZobristKeys,
    depth: u32,
) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0u64;
    for mv in generate_moves(tables, game_state) {
        if let Some(undo) = make_move(game_state, keys, tables, mv) {
            nodes += perft(game_state, tables, keys, depth - 1);
            unmake_move(game_state, undo);
        }
    }
    nodes
}
