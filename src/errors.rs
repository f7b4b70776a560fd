//! Error types surfaced by position parsing and the engine facade.

use std::error::Error;
use std::fmt;

/// Errors produced while parsing FEN strings or algebraic coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    MissingField(&'static str),
    BadPieceChar(char),
    MalformedBoard(String),
    BadSideToMove(String),
    BadCastlingChar(char),
    BadEnPassantSquare(String),
    BadClock(String),
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::MissingField(field) => {
                write!(f, "FEN string is missing the {} field", field)
            }
            PositionError::BadPieceChar(c) => write!(f, "unknown piece character '{}'", c),
            PositionError::MalformedBoard(detail) => {
                write!(f, "malformed board layout: {}", detail)
            }
            PositionError::BadSideToMove(field) => {
                write!(f, "side to move must be 'w' or 'b', got '{}'", field)
            }
            PositionError::BadCastlingChar(c) => {
                write!(f, "unknown castling rights character '{}'", c)
            }
            PositionError::BadEnPassantSquare(field) => {
                write!(f, "bad en passant square '{}'", field)
            }
            PositionError::BadClock(field) => write!(f, "bad clock value '{}'", field),
        }
    }
}

impl Error for PositionError {}

/// Errors from the engine facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    InvalidPosition(PositionError),
    EvaluatorNotConfigured,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidPosition(err) => write!(f, "invalid position: {}", err),
            EngineError::EvaluatorNotConfigured => {
                write!(f, "no evaluator configured; searching requires one")
            }
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EngineError::InvalidPosition(err) => Some(err),
            EngineError::EvaluatorNotConfigured => None,
        }
    }
}

impl From<PositionError> for EngineError {
    fn from(err: PositionError) -> Self {
        EngineError::InvalidPosition(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_identify_the_offending_input() {
        let err = PositionError::BadPieceChar('x');
        assert!(err.to_string().contains('x'));
        let err = EngineError::from(PositionError::MissingField("side to move"));
        assert!(err.to_string().contains("side to move"));
    }
}
