//! Iterative deepening alpha-beta search.
//!
//! The driver searches depth 1, 2, ... up to the configured depth, reusing
//! the previous iteration's principal variation for move ordering and
//! narrowing the window around the last score. Inside, a fail-hard negamax
//! with quiescence, null-move pruning, late move reductions, principal
//! variation search, killer/history ordering, and a transposition table.

use log::{debug, info};

use crate::eval::evaluator::{evaluate_position, Evaluator};
use crate::game_state::chess_types::{GameState, Move, PieceKind};
use crate::move_generation::legal_move_apply::{
    make_move, make_null_move, unmake_move, unmake_null_move,
};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::move_generator::{generate_captures, generate_moves};
use crate::moves::attack_tables::AttackTables;
use crate::moves::move_descriptions::*;
use crate::search::transposition_table::{Bound, TranspositionTable, TtEntry};
use crate::search::zobrist::ZobristKeys;
use crate::utils::algebraic::move_to_lan;

/// Score bounds. Mate scores live between `MATE_SCORE` and `MATE_VALUE`;
/// anything beyond `MATE_SCORE` in magnitude is a forced mate, with the
/// distance to mate encoded in the difference from `MATE_VALUE`.
pub const MAX_VAL: i32 = 50_000;
pub const MATE_VALUE: i32 = 49_000;
pub const MATE_SCORE: i32 = 48_000;

pub const MAX_PLY: usize = 64;

const ASPIRATION_WINDOW: i32 = 50;
// Late move reductions kick in after this many moves at this minimum depth.
const FULL_DEPTH_MOVES: usize = 4;
const REDUCTION_LIMIT: u8 = 3;

const PV_MOVE_SCORE: i32 = 20_000;
const CAPTURE_SCORE_OFFSET: i32 = 10_000;
const FIRST_KILLER_SCORE: i32 = 9_000;
const SECOND_KILLER_SCORE: i32 = 8_000;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub depth: u8,
    pub use_transposition_table: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 4,
            use_transposition_table: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best_move: Option<Move>,
    pub score: i32,
    pub nodes: u64,
    pub reached_depth: u8,
    pub principal_variation: Vec<Move>,
}

/// Has the current position already occurred earlier in the line?
#[inline]
pub fn is_repetition(game_state: &GameState) -> bool {
    game_state
        .repetition_history
        .iter()
        .any(|&hash| hash == game_state.zobrist_key)
}

/// Victim-major capture ordering: any victim outranks any attacker bonus, so
/// queen takes pawn scores below pawn takes queen.
#[inline]
fn mvv_lva(attacker: PieceKind, victim: PieceKind) -> i32 {
    100 * (victim.index() as i32 + 1) + (5 - attacker.index() as i32)
}

struct Searcher<'a> {
    tables: &'a AttackTables,
    keys: &'a ZobristKeys,
    evaluator: &'a dyn Evaluator,
    tt: &'a mut TranspositionTable,
    use_tt: bool,

    nodes: u64,
    ply: usize,
    killer_moves: [[Move; MAX_PLY]; 2],
    history_moves: [[[i32; 64]; 6]; 2],
    pv_table: [[Move; MAX_PLY]; MAX_PLY],
    pv_length: [usize; MAX_PLY],
    follow_pv: bool,
    score_pv: bool,
}

impl<'a> Searcher<'a> {
    fn new(
        tables: &'a AttackTables,
        keys: &'a ZobristKeys,
        evaluator: &'a dyn Evaluator,
        tt: &'a mut TranspositionTable,
        use_tt: bool,
    ) -> Self {
        Searcher {
            tables,
            keys,
            evaluator,
            tt,
            use_tt,
            nodes: 0,
            ply: 0,
            killer_moves: [[0; MAX_PLY]; 2],
            history_moves: [[[0; 64]; 6]; 2],
            pv_table: [[0; MAX_PLY]; MAX_PLY],
            pv_length: [0; MAX_PLY],
            follow_pv: false,
            score_pv: false,
        }
    }

    fn probe_tt(&mut self, key: u64, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        if !self.use_tt {
            return None;
        }
        let entry = self.tt.probe(key, depth)?;
        // Mate scores are stored relative to the storing node; rebase them to
        // the probing node's distance from the root.
        let mut score = entry.score;
        if score < -MATE_SCORE {
            score += self.ply as i32;
        } else if score > MATE_SCORE {
            score -= self.ply as i32;
        }
        match entry.bound {
            Bound::Exact => Some(score),
            Bound::Upper if score <= alpha => Some(alpha),
            Bound::Lower if score >= beta => Some(beta),
            _ => None,
        }
    }

    fn store_tt(&mut self, key: u64, depth: u8, mut score: i32, bound: Bound) {
        if !self.use_tt {
            return;
        }
        if score < -MATE_SCORE {
            score -= self.ply as i32;
        } else if score > MATE_SCORE {
            score += self.ply as i32;
        }
        self.tt.store(TtEntry {
            key,
            depth,
            score,
            bound,
        });
    }

    /// When following the principal variation, keep doing so only if the PV
    /// move of this ply is actually available here.
    fn enable_pv_scoring(&mut self, moves: &[Move]) {
        self.follow_pv = false;
        if moves.iter().any(|&mv| mv == self.pv_table[0][self.ply]) {
            self.score_pv = true;
            self.follow_pv = true;
        }
    }

    fn score_move(&mut self, game_state: &GameState, mv: Move) -> i32 {
        if self.score_pv && mv == self.pv_table[0][self.ply] {
            self.score_pv = false;
            return PV_MOVE_SCORE;
        }

        if is_capture(mv) {
            let victim = if is_en_passant(mv) {
                PieceKind::Pawn
            } else {
                game_state
                    .piece_on_square(game_state.side_to_move.opposite(), move_to(mv))
                    .unwrap_or(PieceKind::Pawn)
            };
            return mvv_lva(move_piece(mv), victim) + CAPTURE_SCORE_OFFSET;
        }

        if mv == self.killer_moves[0][self.ply] {
            FIRST_KILLER_SCORE
        } else if mv == self.killer_moves[1][self.ply] {
            SECOND_KILLER_SCORE
        } else {
            let side = game_state.side_to_move.index();
            self.history_moves[side][move_piece(mv).index()][move_to(mv) as usize]
        }
    }

    fn sort_moves(&mut self, game_state: &GameState, moves: &mut Vec<Move>) {
        let mut scored: Vec<(i32, Move)> = moves
            .iter()
            .map(|&mv| (self.score_move(game_state, mv), mv))
            .collect();
        scored.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        moves.clear();
        moves.extend(scored.into_iter().map(|(_, mv)| mv));
    }

    fn quiescence(&mut self, game_state: &mut GameState, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;

        if self.ply > MAX_PLY - 1 {
            return evaluate_position(self.evaluator, game_state);
        }

        let in_check = is_king_in_check(self.tables, game_state, game_state.side_to_move);

        if !in_check {
            let evaluation = evaluate_position(self.evaluator, game_state);
            if evaluation >= beta {
                return beta;
            }
            if evaluation > alpha {
                alpha = evaluation;
            }
        }

        // In check there is no standing pat: every evasion is examined so a
        // mate cannot hide behind the capture filter.
        let mut moves = if in_check {
            generate_moves(self.tables, game_state)
        } else {
            generate_captures(self.tables, game_state)
        };
        self.sort_moves(game_state, &mut moves);

        let mut legal_moves_found = 0usize;
        for mv in moves {
            let undo = match make_move(game_state, self.keys, self.tables, mv) {
                Some(undo) => undo,
                None => continue,
            };
            legal_moves_found += 1;
            self.ply += 1;
            let score = -self.quiescence(game_state, -beta, -alpha);
            self.ply -= 1;
            unmake_move(game_state, undo);

            if score > alpha {
                alpha = score;
                if score >= beta {
                    return beta;
                }
            }
        }

        if in_check && legal_moves_found == 0 {
            return -MATE_VALUE + self.ply as i32;
        }

        alpha
    }

    fn negamax(&mut self, game_state: &mut GameState, depth: u8, mut alpha: i32, beta: i32) -> i32 {
        let mut bound = Bound::Upper;

        if self.ply > 0 && (is_repetition(game_state) || game_state.halfmove_clock >= 100) {
            return 0;
        }

        let pv_node = beta - alpha > 1;
        if self.ply > 0 && !pv_node {
            if let Some(score) = self.probe_tt(game_state.zobrist_key, depth, alpha, beta) {
                return score;
            }
        }

        // The ply cap must come before any killer/PV bookkeeping: those
        // arrays are indexed by ply.
        if self.ply > MAX_PLY - 1 {
            return evaluate_position(self.evaluator, game_state);
        }

        self.pv_length[self.ply] = self.ply;

        if depth == 0 {
            return self.quiescence(game_state, alpha, beta);
        }

        self.nodes += 1;

        let in_check = is_king_in_check(self.tables, game_state, game_state.side_to_move);
        let depth = if in_check { depth + 1 } else { depth };

        // Null move pruning: give the opponent a free move and see whether
        // the position still fails high on a reduced search.
        if depth >= 3 && !in_check && self.ply > 0 {
            let undo = make_null_move(game_state, self.keys);
            self.ply += 1;
            let score = -self.negamax(game_state, depth - 3, -beta, -beta + 1);
            self.ply -= 1;
            unmake_null_move(game_state, undo);
            if score >= beta {
                return beta;
            }
        }

        let mut moves = generate_moves(self.tables, game_state);
        if self.follow_pv {
            self.enable_pv_scoring(&moves);
        }
        self.sort_moves(game_state, &mut moves);

        let mut legal_moves_found = 0usize;
        let mut moves_searched = 0usize;

        for mv in moves {
            let undo = match make_move(game_state, self.keys, self.tables, mv) {
                Some(undo) => undo,
                None => continue,
            };
            legal_moves_found += 1;
            self.ply += 1;

            let score = if moves_searched == 0 {
                -self.negamax(game_state, depth - 1, -beta, -alpha)
            } else {
                // Late move reductions for quiet moves deep in the list,
                // re-searched at full depth through a null window on
                // improvement, then through the full window (PVS).
                let mut score = if moves_searched >= FULL_DEPTH_MOVES
                    && depth >= REDUCTION_LIMIT
                    && !in_check
                    && !is_capture(mv)
                    && move_promotion(mv).is_none()
                {
                    -self.negamax(game_state, depth - 2, -alpha - 1, -alpha)
                } else {
                    alpha + 1
                };
                if score > alpha {
                    score = -self.negamax(game_state, depth - 1, -alpha - 1, -alpha);
                    if score > alpha && score < beta {
                        score = -self.negamax(game_state, depth - 1, -beta, -alpha);
                    }
                }
                score
            };

            self.ply -= 1;
            unmake_move(game_state, undo);
            moves_searched += 1;

            if score > alpha {
                bound = Bound::Exact;
                if !is_capture(mv) {
                    let side = game_state.side_to_move.index();
                    self.history_moves[side][move_piece(mv).index()][move_to(mv) as usize] +=
                        depth as i32;
                }
                alpha = score;

                self.pv_table[self.ply][self.ply] = mv;
                if self.ply + 1 < MAX_PLY {
                    for i in (self.ply + 1)..self.pv_length[self.ply + 1] {
                        self.pv_table[self.ply][i] = self.pv_table[self.ply + 1][i];
                    }
                    self.pv_length[self.ply] = self.pv_length[self.ply + 1];
                } else {
                    // Children at the ply cap return statically and leave no
                    // line behind; the variation ends with this move.
                    self.pv_length[self.ply] = self.ply + 1;
                }

                if score >= beta {
                    self.store_tt(game_state.zobrist_key, depth, beta, Bound::Lower);
                    if !is_capture(mv) {
                        self.killer_moves[1][self.ply] = self.killer_moves[0][self.ply];
                        self.killer_moves[0][self.ply] = mv;
                    }
                    return beta;
                }
            }
        }

        if legal_moves_found == 0 {
            if in_check {
                return -MATE_VALUE + self.ply as i32;
            }
            return 0;
        }

        self.store_tt(game_state.zobrist_key, depth, alpha, bound);
        alpha
    }
}

/// Run an iterative deepening search to `config.depth` and report the best
/// line found.
pub fn iterative_deepening_search(
    game_state: &mut GameState,
    tables: &AttackTables,
    keys: &ZobristKeys,
    evaluator: &dyn Evaluator,
    tt: &mut TranspositionTable,
    config: &SearchConfig,
) -> SearchOutcome {
    let mut searcher = Searcher::new(tables, keys, evaluator, tt, config.use_transposition_table);

    let mut outcome = SearchOutcome {
        best_move: None,
        score: 0,
        nodes: 0,
        reached_depth: 0,
        principal_variation: Vec::new(),
    };

    let mut alpha = -MAX_VAL;
    let mut beta = MAX_VAL;

    for current_depth in 1..=config.depth.max(1) {
        searcher.follow_pv = true;
        let mut score = searcher.negamax(game_state, current_depth, alpha, beta);

        // Aspiration window miss: redo this depth with the full window so
        // every completed iteration reports a trustworthy score.
        if score <= alpha || score >= beta {
            debug!(
                "aspiration window ({}, {}) failed at depth {}, re-searching",
                alpha, beta, current_depth
            );
            alpha = -MAX_VAL;
            beta = MAX_VAL;
            searcher.follow_pv = true;
            score = searcher.negamax(game_state, current_depth, alpha, beta);
        }

        alpha = score - ASPIRATION_WINDOW;
        beta = score + ASPIRATION_WINDOW;

        outcome.score = score;
        outcome.nodes = searcher.nodes;
        outcome.reached_depth = current_depth;
        outcome.principal_variation = searcher.pv_table[0][..searcher.pv_length[0]].to_vec();
        outcome.best_move = outcome.principal_variation.first().copied();

        let pv_line: Vec<String> = outcome
            .principal_variation
            .iter()
            .map(|&mv| move_to_lan(mv))
            .collect();
        info!(
            "depth {} score {} nodes {} pv {}",
            current_depth,
            score,
            searcher.nodes,
            pv_line.join(" ")
        );
    }

    outcome
}

/// Mate-in-`n` from the winning side's point of view.
#[inline]
pub fn mate_in(plies_to_mate: i32) -> i32 {
    MATE_VALUE - plies_to_mate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::evaluator::MaterialEvaluator;
    use crate::move_generation::legal_move_apply::make_move;
    use crate::moves::move_descriptions::pack_move;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::fen_parser::parse_fen;

    fn search(fen: &str, config: &SearchConfig) -> SearchOutcome {
        let keys = ZobristKeys::new();
        let tables = AttackTables::new();
        let mut game = parse_fen(fen, &keys).unwrap();
        let mut tt = TranspositionTable::new_with_entries(10_000);
        iterative_deepening_search(
            &mut game,
            &tables,
            &keys,
            &MaterialEvaluator,
            &mut tt,
            config,
        )
    }

    fn lan(outcome: &SearchOutcome) -> String {
        move_to_lan(outcome.best_move.expect("search should find a move"))
    }

    #[test]
    fn finds_back_rank_mate_in_one_at_depth_one() {
        let config = SearchConfig {
            depth: 1,
            use_transposition_table: false,
        };
        let outcome = search("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", &config);
        assert_eq!(lan(&outcome), "a1a8");
        assert!(outcome.score > MATE_SCORE);
        assert_eq!(outcome.score, mate_in(1));
    }

    #[test]
    fn finds_mate_at_higher_depth_with_the_table_enabled() {
        let outcome = search("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", &SearchConfig::default());
        assert_eq!(lan(&outcome), "a1a8");
        assert!(outcome.score > MATE_SCORE);
    }

    #[test]
    fn stalemate_scores_zero_with_no_best_move() {
        let config = SearchConfig {
            depth: 3,
            use_transposition_table: false,
        };
        let outcome = search("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", &config);
        assert_eq!(outcome.score, 0);
        assert!(outcome.best_move.is_none());
    }

    #[test]
    fn lines_hitting_the_fifty_move_rule_score_zero() {
        let config = SearchConfig {
            depth: 2,
            use_transposition_table: false,
        };
        let outcome = search("k7/8/8/8/8/8/8/K6R w - - 99 1", &config);
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn repetition_is_detected_after_a_shuffle_returns() {
        let keys = ZobristKeys::new();
        let tables = AttackTables::new();
        let mut game = parse_fen("k7/8/8/8/8/8/8/K6R w - - 0 1", &keys).unwrap();
        assert!(!is_repetition(&game));

        let shuffle = [
            ("h1", "h2", PieceKind::Rook),
            ("a8", "b8", PieceKind::King),
            ("h2", "h1", PieceKind::Rook),
            ("b8", "a8", PieceKind::King),
        ];
        for (from, to, piece) in shuffle {
            let mv = pack_move(
                algebraic_to_square(from).unwrap(),
                algebraic_to_square(to).unwrap(),
                piece,
                None,
                0,
            );
            make_move(&mut game, &keys, &tables, mv).unwrap();
        }
        assert!(is_repetition(&game));
    }

    #[test]
    fn frames_entered_at_the_ply_cap_return_a_static_score() {
        let keys = ZobristKeys::new();
        let tables = AttackTables::new();
        let mut game = parse_fen("k7/8/8/8/8/8/8/K5Q1 w - - 0 1", &keys).unwrap();

        let mut tt = TranspositionTable::new_with_entries(10_000);
        let mut searcher = Searcher::new(&tables, &keys, &MaterialEvaluator, &mut tt, false);
        searcher.ply = MAX_PLY;
        let score = searcher.negamax(&mut game, 6, -MAX_VAL, MAX_VAL);
        assert_eq!(
            score,
            crate::eval::evaluator::evaluate_position(&MaterialEvaluator, &game)
        );

        // Same cap in quiescence.
        searcher.ply = MAX_PLY;
        let score = searcher.quiescence(&mut game, -MAX_VAL, MAX_VAL);
        assert_eq!(
            score,
            crate::eval::evaluator::evaluate_position(&MaterialEvaluator, &game)
        );
    }

    #[test]
    fn losing_side_escapes_into_a_repetition_for_a_draw_score() {
        let keys = ZobristKeys::new();
        let tables = AttackTables::new();
        // Bare king against king and rook; the defender shuffles back to the
        // starting square so a repeat of the earlier position is one move away.
        let mut game = parse_fen("k7/8/8/8/8/8/8/K6R b - - 0 1", &keys).unwrap();
        let shuffle = [
            ("a8", "b8", PieceKind::King),
            ("h1", "h2", PieceKind::Rook),
            ("b8", "a8", PieceKind::King),
            ("h2", "h1", PieceKind::Rook),
        ];
        for (from, to, piece) in shuffle {
            let mv = pack_move(
                algebraic_to_square(from).unwrap(),
                algebraic_to_square(to).unwrap(),
                piece,
                None,
                0,
            );
            make_move(&mut game, &keys, &tables, mv).unwrap();
        }

        let mut tt = TranspositionTable::new_with_entries(10_000);
        let outcome = iterative_deepening_search(
            &mut game,
            &tables,
            &keys,
            &MaterialEvaluator,
            &mut tt,
            &SearchConfig {
                depth: 2,
                use_transposition_table: false,
            },
        );
        // Any other king move concedes the material deficit; repeating the
        // position scores an exact 0.
        assert_eq!(outcome.score, 0);
        assert_eq!(lan(&outcome), "a8b8");
    }

    #[test]
    fn hanging_queen_is_taken_with_and_without_the_table() {
        let fen = "3q3k/8/8/8/8/8/8/3R2K1 w - - 0 1";
        let with_tt = search(
            fen,
            &SearchConfig {
                depth: 3,
                use_transposition_table: true,
            },
        );
        let without_tt = search(
            fen,
            &SearchConfig {
                depth: 3,
                use_transposition_table: false,
            },
        );
        assert_eq!(lan(&with_tt), "d1d8");
        assert_eq!(lan(&with_tt), lan(&without_tt));
        assert_eq!(with_tt.score, without_tt.score);
    }

    #[test]
    fn deeper_searches_keep_the_obvious_recapture() {
        // Trading queens is forced; the search must not leave the queen
        // hanging at any iteration.
        let config = SearchConfig {
            depth: 4,
            use_transposition_table: true,
        };
        let outcome = search("3qk3/8/8/8/8/8/8/3QK3 b - - 0 1", &config);
        assert_eq!(lan(&outcome), "d8d1");
        assert_eq!(outcome.reached_depth, 4);
        assert!(outcome.nodes > 0);
    }
}
