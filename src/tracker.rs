use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::board::GameState;
use crate::error::{ChessError, Result};
use crate::piece::{Color, Piece, Position};

/// Repetitions of one position that end the game.
pub const REPETITION_LIMIT: usize = 3;

/// One full move: White's half-move and Black's reply (empty until played).
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct MoveRecord {
    pub white: String,
    pub black: String,
}

/// History of the game: the move list shown to players and the board
/// positions used to spot repetitions.
#[derive(Clone, Debug, Default)]
pub struct MoveTracker {
    move_record: Vec<MoveRecord>,
    board_positions: Vec<String>,
}

impl MoveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_record(&self) -> &[MoveRecord] {
        &self.move_record
    }

    pub fn board_positions(&self) -> &[String] {
        &self.board_positions
    }

    /// Record `piece` going to `destination`. Call this before the move is
    /// applied, while the piece still stands on its origin square.
    pub fn record_move(&mut self, piece: &Piece, destination: Position, mover: Color) {
        let notation = format!(
            "{}->{}",
            Self::pos_to_string(piece.position()),
            Self::pos_to_string(destination)
        );
        match mover {
            Color::White => self.move_record.push(MoveRecord {
                white: notation,
                black: String::new(),
            }),
            Color::Black => match self.move_record.last_mut() {
                Some(last) if last.black.is_empty() => last.black = notation,
                // Black opened the game from a set-up position.
                _ => self.move_record.push(MoveRecord {
                    white: String::new(),
                    black: notation,
                }),
            },
        }
    }

    pub fn pos_to_string(pos: Position) -> String {
        pos.to_string()
    }

    pub fn record_board(&mut self, state: &GameState) {
        self.board_positions.push(state.board_string());
    }

    /// Has any recorded position occurred [`REPETITION_LIMIT`] times?
    pub fn is_repetition(&self) -> bool {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for board in &self.board_positions {
            let count = seen.entry(board.as_str()).or_insert(0);
            *count += 1;
            if *count >= REPETITION_LIMIT {
                return true;
            }
        }
        false
    }

    /// Write the move list as a plain-text table.
    pub fn write_table<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Num \t | White \t | Black")?;
        for (index, record) in self.move_record.iter().enumerate() {
            writeln!(out, "{}.\t\t | {} \t | {}", index + 1, record.white, record.black)?;
        }
        Ok(())
    }

    /// Save the move list into `dir` under a `DD.MM.YYYY_HH.MM.SS.txt` name.
    /// An existing file with that name is never overwritten.
    pub fn save_move_record(&self, dir: &Path) -> Result<PathBuf> {
        let file_name = chrono::Local::now()
            .format("%d.%m.%Y_%H.%M.%S.txt")
            .to_string();
        self.save_move_record_as(dir, &file_name)
    }

    fn save_move_record_as(&self, dir: &Path, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(file_name);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                warn!(path = %path.display(), "saved game already exists");
                return Err(ChessError::SaveCollision(path));
            }
            Err(err) => return Err(err.into()),
        };
        self.write_table(&mut file)?;
        info!(path = %path.display(), moves = self.move_record.len(), "saved move record");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: i32, col: i32) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn starts_empty() {
        let tracker = MoveTracker::new();
        assert!(tracker.move_record().is_empty());
        assert!(tracker.board_positions().is_empty());
    }

    #[test]
    fn pos_to_string_corners() {
        assert_eq!(MoveTracker::pos_to_string(pos(0, 0)), "A8");
        assert_eq!(MoveTracker::pos_to_string(pos(0, 7)), "H8");
        assert_eq!(MoveTracker::pos_to_string(pos(7, 0)), "A1");
        assert_eq!(MoveTracker::pos_to_string(pos(7, 7)), "H1");
    }

    #[test]
    fn white_opens_a_pair_black_fills_it() {
        let mut tracker = MoveTracker::new();
        tracker.record_move(&Piece::from_name("wk", 0, 0).unwrap(), pos(1, 0), Color::White);
        assert_eq!(tracker.move_record().len(), 1);
        assert_eq!(tracker.move_record()[0].white, "A8->A7");
        assert_eq!(tracker.move_record()[0].black, "");

        tracker.record_move(&Piece::from_name("bp", 1, 4).unwrap(), pos(3, 4), Color::Black);
        assert_eq!(tracker.move_record().len(), 1);
        assert_eq!(tracker.move_record()[0].black, "E7->E5");
    }

    #[test]
    fn black_first_opens_its_own_pair() {
        let mut tracker = MoveTracker::new();
        tracker.record_move(&Piece::from_name("bp", 1, 4).unwrap(), pos(2, 4), Color::Black);
        assert_eq!(
            tracker.move_record(),
            &[MoveRecord {
                white: String::new(),
                black: "E7->E6".into()
            }]
        );
    }

    #[test]
    fn repetition_needs_three_identical_positions() {
        let mut tracker = MoveTracker::new();
        let start = GameState::new();
        let mut other = GameState::new();
        other.remove_piece(pos(0, 0));

        tracker.record_board(&start);
        tracker.record_board(&other);
        tracker.record_board(&start);
        assert!(!tracker.is_repetition());
        tracker.record_board(&other);
        tracker.record_board(&start);
        assert!(tracker.is_repetition());
    }

    #[test]
    fn table_format() {
        let mut tracker = MoveTracker::new();
        tracker.record_move(&Piece::from_name("wp", 6, 4).unwrap(), pos(4, 4), Color::White);
        tracker.record_move(&Piece::from_name("bp", 1, 4).unwrap(), pos(3, 4), Color::Black);
        let mut out = Vec::new();
        tracker.write_table(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Num \t | White \t | Black\n1.\t\t | E2->E4 \t | E7->E5\n"
        );
    }

    #[test]
    fn saving_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = MoveTracker::new();
        let path = tracker.save_move_record_as(dir.path(), "game.txt").unwrap();
        assert!(path.exists());
        assert!(matches!(
            tracker.save_move_record_as(dir.path(), "game.txt"),
            Err(ChessError::SaveCollision(_))
        ));
    }

    #[test]
    fn saved_file_name_is_a_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = MoveTracker::new().save_move_record(&dir.path().join("saved_games")).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert_eq!(name.len(), "16.10.2026_12.00.00.txt".len());
        assert!(name.ends_with(".txt"));
        assert!(chrono::NaiveDateTime::parse_from_str(&name[..19], "%d.%m.%Y_%H.%M.%S").is_ok());
    }
}
