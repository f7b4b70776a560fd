//! High-level engine facade.
//!
//! Owns the precomputed attack tables, the Zobrist keys, the transposition
//! table, and the current position, and wires them together for callers who
//! just want to load positions, make moves, and search.

use crate::errors::EngineError;
use crate::eval::evaluator::{evaluate_position, Evaluator};
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::{GameState, Move, UndoState};
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::move_generator::generate_moves;
use crate::moves::attack_tables::AttackTables;
use crate::search::iterative_deepening::{
    iterative_deepening_search, SearchConfig, SearchOutcome,
};
use crate::search::transposition_table::TranspositionTable;
use crate::search::zobrist::ZobristKeys;
use crate::utils::fen_parser::parse_fen;

pub struct Engine {
    tables: AttackTables,
    keys: ZobristKeys,
    transposition_table: TranspositionTable,
    game_state: GameState,
    evaluator: Option<Box<dyn Evaluator>>,
}

impl Engine {
    /// Build an engine at the starting position with no evaluator. Move
    /// making and perft work immediately; searching requires an evaluator.
    pub fn new() -> Self {
        let keys = ZobristKeys::new();
        let game_state = parse_fen(STARTING_POSITION_FEN, &keys)
            .expect("the starting position FEN is well formed");
        Engine {
            tables: AttackTables::new(),
            keys,
            transposition_table: TranspositionTable::new(),
            game_state,
            evaluator: None,
        }
    }

    pub fn with_evaluator(evaluator: Box<dyn Evaluator>) -> Self {
        let mut engine = Self::new();
        engine.evaluator = Some(evaluator);
        engine
    }

    pub fn set_evaluator(&mut self, evaluator: Box<dyn Evaluator>) {
        self.evaluator = Some(evaluator);
    }

    /// Replace the current position. The transposition table is cleared
    /// because stored scores are meaningless across unrelated games.
    pub fn load_position(&mut self, fen: &str) -> Result<(), EngineError> {
        self.game_state = parse_fen(fen, &self.keys)?;
        self.transposition_table.clear();
        Ok(())
    }

    #[inline]
    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    #[inline]
    pub fn attack_tables(&self) -> &AttackTables {
        &self.tables
    }

    /// All pseudo-legal moves in the current position; illegal ones are
    /// weeded out when applied.
    pub fn generate_moves(&self) -> Vec<Move> {
        generate_moves(&self.tables, &self.game_state)
    }

    /// Apply a move, returning `None` (position unchanged) if it is illegal.
    pub fn apply_move(&mut self, mv: Move) -> Option<UndoState> {
        make_move(&mut self.game_state, &self.keys, &self.tables, mv)
    }

    pub fn revert_move(&mut self, undo: UndoState) {
        unmake_move(&mut self.game_state, undo);
    }

    pub fn search(&mut self, config: &SearchConfig) -> Result<SearchOutcome, EngineError> {
        let evaluator = self
            .evaluator
            .as_deref()
            .ok_or(EngineError::EvaluatorNotConfigured)?;
        Ok(iterative_deepening_search(
            &mut self.game_state,
            &self.tables,
            &self.keys,
            evaluator,
            &mut self.transposition_table,
            config,
        ))
    }

    /// Static evaluation of the current position from the side to move's
    /// perspective.
    pub fn evaluate(&self) -> Result<i32, EngineError> {
        let evaluator = self
            .evaluator
            .as_deref()
            .ok_or(EngineError::EvaluatorNotConfigured)?;
        Ok(evaluate_position(evaluator, &self.game_state))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::evaluator::MaterialEvaluator;
    use crate::utils::algebraic::move_to_lan;

    #[test]
    fn new_engine_starts_at_the_initial_position() {
        let engine = Engine::new();
        assert_eq!(engine.generate_moves().len(), 20);
    }

    #[test]
    fn searching_without_an_evaluator_fails_cleanly() {
        let mut engine = Engine::new();
        assert_eq!(
            engine.search(&SearchConfig::default()).unwrap_err(),
            EngineError::EvaluatorNotConfigured
        );
    }

    #[test]
    fn apply_and_revert_restore_the_position() {
        let mut engine = Engine::new();
        let before = engine.game_state().clone();
        let mv = engine.generate_moves()[0];
        let undo = engine.apply_move(mv).unwrap();
        assert_ne!(engine.game_state(), &before);
        engine.revert_move(undo);
        assert_eq!(engine.game_state(), &before);
    }

    #[test]
    fn full_workflow_finds_a_mate() {
        let mut engine = Engine::with_evaluator(Box::new(MaterialEvaluator));
        engine
            .load_position("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1")
            .unwrap();
        let outcome = engine
            .search(&SearchConfig {
                depth: 2,
                use_transposition_table: true,
            })
            .unwrap();
        assert_eq!(move_to_lan(outcome.best_move.unwrap()), "a1a8");
    }

    #[test]
    fn evaluate_reflects_material_balance() {
        let mut engine = Engine::with_evaluator(Box::new(MaterialEvaluator));
        engine
            .load_position("4k3/8/8/8/8/8/8/R3K3 w - - 0 1")
            .unwrap();
        assert_eq!(engine.evaluate().unwrap(), 500);
    }
}
