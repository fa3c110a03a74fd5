use std::path::PathBuf;

/// Domain errors for the rules engine.
///
/// Only construction, validation and persistence can fail. Gameplay input
/// (clicking an empty square, an enemy piece, an unreachable tile) is
/// absorbed by the session and never reported through this type.
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("piece name must not be empty")]
    EmptyPieceName,

    #[error("invalid piece name: {0:?}")]
    InvalidPieceName(String),

    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("position ({row}, {col}) is outside the board")]
    OutOfBounds { row: i32, col: i32 },

    #[error("player must start with 16 pieces, got {0}")]
    WrongPieceCount(usize),

    #[error("saved game {} already exists", .0.display())]
    SaveCollision(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = ChessError::OutOfBounds { row: -1, col: 2 };
        assert_eq!(err.to_string(), "position (-1, 2) is outside the board");
        assert_eq!(
            ChessError::InvalidPieceName("bl".into()).to_string(),
            "invalid piece name: \"bl\""
        );
    }
}
