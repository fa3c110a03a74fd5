use crate::error::{ChessError, Result};
use crate::piece::{Color, Piece, PieceId};

pub const STARTING_PIECES: usize = 16;

/// One side of the game. The roster is never edited piece by piece: after
/// every move the game state rescans the board and replaces it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub color: Color,
    pieces: Vec<PieceId>,
}

impl Player {
    pub fn new(color: Color, pieces: Vec<PieceId>) -> Result<Self> {
        if pieces.len() != STARTING_PIECES {
            return Err(ChessError::WrongPieceCount(pieces.len()));
        }
        Ok(Player { color, pieces })
    }

    /// Player with whatever roster a set-up position gives it.
    pub(crate) fn with_roster(color: Color, pieces: Vec<PieceId>) -> Self {
        Player { color, pieces }
    }

    pub fn pieces(&self) -> &[PieceId] {
        &self.pieces
    }

    pub fn owns(&self, id: PieceId) -> bool {
        self.pieces.contains(&id)
    }

    pub(crate) fn refresh(&mut self, pieces: Vec<PieceId>) {
        self.pieces = pieces;
    }

    /// Material on the board, recomputed from the arena each call.
    pub fn score(&self, arena: &[Piece]) -> u32 {
        self.pieces
            .iter()
            .map(|id| arena[id.0].piece_type.value())
            .sum()
    }
}
