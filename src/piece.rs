use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChessError, Result};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "w" => Ok(Color::White),
            "b" => Ok(Color::Black),
            other => Err(ChessError::InvalidColor(other.to_string())),
        }
    }

    pub fn code(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Row a pawn of this color promotes on.
    pub fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Row direction this color's pawns advance in.
    pub fn pawn_direction(self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn home_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
    Pawn,
}

impl PieceType {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'r' => Some(PieceType::Rook),
            'h' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            'p' => Some(PieceType::Pawn),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            PieceType::Rook => 'r',
            PieceType::Knight => 'h',
            PieceType::Bishop => 'b',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
            PieceType::Pawn => 'p',
        }
    }

    /// Material value; the king is not counted.
    pub fn value(self) -> u32 {
        match self {
            PieceType::Pawn => 1,
            PieceType::Knight | PieceType::Bishop => 3,
            PieceType::Rook => 5,
            PieceType::Queen => 9,
            PieceType::King => 0,
        }
    }

    pub fn is_minor(self) -> bool {
        matches!(self, PieceType::Knight | PieceType::Bishop)
    }
}

/// A square on the board. Row 0 is Black's home rank, column 0 is file A.
///
/// Both coordinates are always in `0..8`; the only ways to build one are the
/// validating constructors.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "(i32, i32)", into = "(i32, i32)")]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Result<Self> {
        if Self::is_valid(row, col) {
            Ok(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(ChessError::OutOfBounds { row, col })
        }
    }

    /// Callers guarantee both coordinates are below 8.
    pub(crate) const fn from_indices(row: u8, col: u8) -> Self {
        Position { row, col }
    }

    pub fn is_valid(row: i32, col: i32) -> bool {
        (0..8).contains(&row) && (0..8).contains(&col)
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// The square `(dr, dc)` away, if it is still on the board.
    pub fn offset(self, dr: i32, dc: i32) -> Option<Self> {
        Self::new(self.row as i32 + dr, self.col as i32 + dc).ok()
    }

    /// Every square, row-major from A8.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Position { row, col }))
    }
}

impl TryFrom<(i32, i32)> for Position {
    type Error = ChessError;

    fn try_from((row, col): (i32, i32)) -> Result<Self> {
        Position::new(row, col)
    }
}

impl From<Position> for (i32, i32) {
    fn from(pos: Position) -> Self {
        (pos.row as i32, pos.col as i32)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'A' + self.col) as char;
        let rank = (b'8' - self.row) as char;
        write!(f, "{file}{rank}")
    }
}

/// Stable handle of a piece in a game's piece arena.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct PieceId(pub(crate) usize);

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    position: Position,
    move_count: u32,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color, position: Position) -> Self {
        Piece {
            piece_type,
            color,
            position,
            move_count: 0,
        }
    }

    /// Build a piece from its two-letter name (`"wk"`, `"bh"`, ...) and a raw
    /// coordinate pair.
    pub fn from_name(name: &str, row: i32, col: i32) -> Result<Self> {
        if name.is_empty() {
            return Err(ChessError::EmptyPieceName);
        }
        let mut chars = name.chars();
        let (Some(c), Some(t), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ChessError::InvalidPieceName(name.to_string()));
        };
        let color = Color::from_code(&c.to_string())
            .map_err(|_| ChessError::InvalidPieceName(name.to_string()))?;
        let piece_type =
            PieceType::from_code(t).ok_or_else(|| ChessError::InvalidPieceName(name.to_string()))?;
        Ok(Piece::new(piece_type, color, Position::new(row, col)?))
    }

    pub fn name(&self) -> String {
        self.to_string()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn has_moved(&self) -> bool {
        self.move_count > 0
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Fallible form of [`Piece::set_position`] for raw coordinates. On error
    /// the piece keeps its current square.
    pub fn try_set_position(&mut self, row: i32, col: i32) -> Result<()> {
        self.position = Position::new(row, col)?;
        Ok(())
    }

    /// Move to `position` and count the move.
    pub(crate) fn relocate(&mut self, position: Position) {
        self.position = position;
        self.move_count += 1;
    }

    pub(crate) fn promote(&mut self, piece_type: PieceType) {
        self.piece_type = piece_type;
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.code(), self.piece_type.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_from_valid_name() {
        let piece = Piece::from_name("bk", 1, 5).unwrap();
        assert_eq!(piece.name(), "bk");
        assert_eq!(piece.color, Color::Black);
        assert_eq!(piece.piece_type, PieceType::King);
        assert_eq!(piece.move_count(), 0);
    }

    #[test]
    fn piece_rejects_bad_construction() {
        assert!(matches!(Piece::from_name("", 1, 1), Err(ChessError::EmptyPieceName)));
        assert!(matches!(
            Piece::from_name("bk", 1, 8),
            Err(ChessError::OutOfBounds { row: 1, col: 8 })
        ));
        assert!(matches!(
            Piece::from_name("bl", 1, 2),
            Err(ChessError::InvalidPieceName(_))
        ));
        assert!(matches!(
            Piece::from_name("xk", 1, 2),
            Err(ChessError::InvalidPieceName(_))
        ));
        assert!(Piece::from_name("wkk", 1, 2).is_err());
    }

    #[test]
    fn set_position_rejects_out_of_bounds_and_keeps_square() {
        let mut piece = Piece::from_name("wk", 1, 2).unwrap();
        assert!(piece.try_set_position(-1, 2).is_err());
        assert_eq!(piece.position(), Position::new(1, 2).unwrap());
        piece.try_set_position(0, 7).unwrap();
        assert_eq!(piece.position(), Position::new(0, 7).unwrap());
        assert_eq!(piece.move_count(), 0, "setting a square is not a move");
    }

    #[test]
    fn position_bounds() {
        for (row, col) in [(0, 0), (2, 6), (7, 7), (0, 7), (7, 0)] {
            assert!(Position::is_valid(row, col));
        }
        for (row, col) in [(-1, 0), (0, -1), (8, 0), (0, 8), (8, 8), (-1, -1)] {
            assert!(!Position::is_valid(row, col));
            assert!(Position::try_from((row, col)).is_err());
        }
    }

    #[test]
    fn position_display_uses_ranks_from_black_side() {
        assert_eq!(Position::new(0, 0).unwrap().to_string(), "A8");
        assert_eq!(Position::new(7, 7).unwrap().to_string(), "H1");
    }

    #[test]
    fn position_deserialize_checks_bounds() {
        let pos: Position = serde_json::from_str("[3,4]").unwrap();
        assert_eq!((pos.row(), pos.col()), (3, 4));
        assert!(serde_json::from_str::<Position>("[3,9]").is_err());
    }

    #[test]
    fn color_codes() {
        assert_eq!(Color::from_code("w").unwrap(), Color::White);
        assert!(Color::from_code("asd").is_err());
        assert_eq!(Color::Black.opposite(), Color::White);
    }
}
