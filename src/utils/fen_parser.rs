//! FEN parsing.
//!
//! Produces a fully initialized [`GameState`]: piece bitboards, occupancy
//! caches, and the Zobrist hash are all computed before the state is
//! returned, so a parsed position is immediately searchable.

use crate::errors::PositionError;
use crate::game_state::chess_types::*;
use crate::search::zobrist::{compute_zobrist_key, ZobristKeys};
use crate::utils::algebraic::algebraic_to_square;

fn piece_from_char(c: char) -> Result<(Color, PieceKind), PositionError> {
    let color = if c.is_ascii_uppercase() {
        Color::Light
    } else {
        Color::Dark
    };
    let kind = match c.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return Err(PositionError::BadPieceChar(c)),
    };
    Ok((color, kind))
}

/// Parse a six-field FEN string into a game state.
pub fn parse_fen(fen: &str, keys: &ZobristKeys) -> Result<GameState, PositionError> {
    let mut fields = fen.split_whitespace();
    let board = fields
        .next()
        .ok_or(PositionError::MissingField("board layout"))?;
    let side = fields
        .next()
        .ok_or(PositionError::MissingField("side to move"))?;
    let castling = fields
        .next()
        .ok_or(PositionError::MissingField("castling rights"))?;
    let en_passant = fields
        .next()
        .ok_or(PositionError::MissingField("en passant square"))?;
    let halfmove = fields
        .next()
        .ok_or(PositionError::MissingField("halfmove clock"))?;
    let _fullmove = fields
        .next()
        .ok_or(PositionError::MissingField("fullmove number"))?;

    let mut game_state = GameState::new_empty();

    // Board layout: ranks from 8 down to 1, which matches the a8 = 0 indexing
    // directly.
    let ranks: Vec<&str> = board.split('/').collect();
    if ranks.len() != 8 {
        return Err(PositionError::MalformedBoard(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }
    for (rank_index, rank) in ranks.iter().enumerate() {
        let mut file = 0u8;
        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
                if file > 8 {
                    return Err(PositionError::MalformedBoard(format!(
                        "rank '{}' overflows 8 files",
                        rank
                    )));
                }
            } else {
                let (color, kind) = piece_from_char(c)?;
                if file > 7 {
                    return Err(PositionError::MalformedBoard(format!(
                        "rank '{}' overflows 8 files",
                        rank
                    )));
                }
                let square = rank_index as u8 * 8 + file;
                game_state.pieces[color.index()][kind.index()] |= 1u64 << square;
                file += 1;
            }
        }
        if file != 8 {
            return Err(PositionError::MalformedBoard(format!(
                "rank '{}' covers {} files",
                rank, file
            )));
        }
    }

    game_state.side_to_move = match side {
        "w" => Color::Light,
        "b" => Color::Dark,
        other => return Err(PositionError::BadSideToMove(other.to_string())),
    };

    if castling != "-" {
        for c in castling.chars() {
            game_state.castling_rights |= match c {
                'K' => CASTLE_LIGHT_KINGSIDE,
                'Q' => CASTLE_LIGHT_QUEENSIDE,
                'k' => CASTLE_DARK_KINGSIDE,
                'q' => CASTLE_DARK_QUEENSIDE,
                _ => return Err(PositionError::BadCastlingChar(c)),
            };
        }
    }

    game_state.en_passant_square = match en_passant {
        "-" => None,
        text => Some(algebraic_to_square(text)?),
    };

    game_state.halfmove_clock = halfmove
        .parse::<u16>()
        .map_err(|_| PositionError::BadClock(halfmove.to_string()))?;

    game_state.recalc_occupancy();
    game_state.zobrist_key = compute_zobrist_key(keys, &game_state);

    Ok(game_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::{STARTING_POSITION_FEN, E1, E8};

    #[test]
    fn starting_position_parses_completely() {
        let keys = ZobristKeys::new();
        let game = parse_fen(STARTING_POSITION_FEN, &keys).unwrap();

        assert_eq!(game.side_to_move, Color::Light);
        assert_eq!(game.castling_rights, 0x0F);
        assert_eq!(game.en_passant_square, None);
        assert_eq!(game.halfmove_clock, 0);
        assert_eq!(game.occupancy_all.count_ones(), 32);
        assert_eq!(game.piece_on_square(Color::Light, E1), Some(PieceKind::King));
        assert_eq!(game.piece_on_square(Color::Dark, E8), Some(PieceKind::King));
        assert_eq!(
            game.pieces[Color::Light.index()][PieceKind::Pawn.index()].count_ones(),
            8
        );
        assert_eq!(game.zobrist_key, compute_zobrist_key(&keys, &game));
        assert_ne!(game.zobrist_key, 0);
    }

    #[test]
    fn en_passant_and_clocks_are_read() {
        let keys = ZobristKeys::new();
        let game = parse_fen(
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 4 2",
            &keys,
        )
        .unwrap();
        assert_eq!(game.side_to_move, Color::Dark);
        assert_eq!(game.en_passant_square, Some(44)); // e3
        assert_eq!(game.halfmove_clock, 4);
    }

    #[test]
    fn partial_castling_rights_parse() {
        let keys = ZobristKeys::new();
        let game = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1", &keys).unwrap();
        assert_eq!(
            game.castling_rights,
            CASTLE_LIGHT_KINGSIDE | CASTLE_DARK_QUEENSIDE
        );
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        let keys = ZobristKeys::new();
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/8 w - -", &keys),
            Err(PositionError::MissingField("halfmove clock"))
        ));
        assert!(matches!(
            parse_fen("9/8/8/8/8/8/8/8 w - - 0 1", &keys),
            Err(PositionError::MalformedBoard(_))
        ));
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/8 x - - 0 1", &keys),
            Err(PositionError::BadSideToMove(_))
        ));
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/8 w Kx - 0 1", &keys),
            Err(PositionError::BadCastlingChar('x'))
        ));
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/8 w - e9 0 1", &keys),
            Err(PositionError::BadEnPassantSquare(_))
        ));
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/8 w - - x 1", &keys),
            Err(PositionError::BadClock(_))
        ));
        assert!(matches!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1", &keys),
            Err(PositionError::MalformedBoard(_))
        ));
    }

    #[test]
    fn runaway_digit_runs_are_rejected_not_wrapped() {
        let keys = ZobristKeys::new();
        // A digit run long enough to wrap an eight-bit accumulator must fail
        // like any other over-wide rank.
        assert!(matches!(
            parse_fen(
                "999999999999999999999999999999/8/8/8/8/8/8/8 w - - 0 1",
                &keys
            ),
            Err(PositionError::MalformedBoard(_))
        ));
        assert!(matches!(
            parse_fen("44p/8/8/8/8/8/8/8 w - - 0 1", &keys),
            Err(PositionError::MalformedBoard(_))
        ));
    }
}
