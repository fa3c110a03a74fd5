use serde::{Deserialize, Serialize};

use crate::piece::Position;

/// Extra board change a move carries besides relocating the mover.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum MoveEffect {
    Quiet,
    /// The enemy pawn on `captured` is removed.
    EnPassant { captured: Position },
    /// The rook standing on `rook_from` goes to `rook_to`.
    Castle { rook_from: Position, rook_to: Position },
}

/// A move of whatever piece stands on `from`, together with the side effect
/// that has to be applied with it.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub effect: MoveEffect,
}

impl Move {
    pub fn quiet(from: Position, to: Position) -> Self {
        Move {
            from,
            to,
            effect: MoveEffect::Quiet,
        }
    }

    /// Tracker notation, e.g. `"E2->E4"`.
    pub fn notation(&self) -> String {
        format!("{}->{}", self.from, self.to)
    }
}
