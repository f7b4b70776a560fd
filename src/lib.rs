//! Crate root module declarations for the Magpie chess engine.
//!
//! This file exposes all top-level subsystems (game state, attack tables,
//! move generation, search, evaluation, and utility helpers) so binaries,
//! tests, and external tooling can import stable module paths.

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod undo_state;
}

pub mod moves {
    pub mod attack_tables;
    pub mod magic_numbers;
    pub mod move_descriptions;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod move_generator;
    pub mod perft;
}

pub mod search {
    pub mod iterative_deepening;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod eval {
    pub mod evaluator;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_parser;
}

pub mod engine;
pub mod errors;
