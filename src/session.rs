//! Turn loop glue between the rules engine and its front end.
//!
//! `GameSession` owns one [`GameState`] and one [`MoveTracker`], turns
//! pick-up / drop events on board squares into moves, and keeps the
//! check and game-over status the renderer shows. Bad input (an empty
//! square, an enemy piece, an unreachable tile) only clears the selection.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::GameState;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::piece::{Color, Piece, PieceId, Position};
use crate::tracker::{MoveRecord, MoveTracker};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Winner {
    White,
    Black,
    Draw,
}

impl From<Color> for Winner {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::White => f.write_str("White"),
            Winner::Black => f.write_str("Black"),
            Winner::Draw => f.write_str("Draw"),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum EndType {
    Checkmate,
    Stalemate,
    #[serde(rename = "Move repetition")]
    MoveRepetition,
    #[serde(rename = "Not enough mate material")]
    InsufficientMaterial,
}

impl fmt::Display for EndType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndType::Checkmate => f.write_str("Checkmate"),
            EndType::Stalemate => f.write_str("Stalemate"),
            EndType::MoveRepetition => f.write_str("Move repetition"),
            EndType::InsufficientMaterial => f.write_str("Not enough mate material"),
        }
    }
}

/// Game-over summary for the renderer. `winner` and `end_type` are set
/// exactly when `is_over` is.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct GameOverData {
    pub is_over: bool,
    pub winner: Option<Winner>,
    pub end_type: Option<EndType>,
}

impl GameOverData {
    fn ended(winner: Winner, end_type: EndType) -> Self {
        GameOverData {
            is_over: true,
            winner: Some(winner),
            end_type: Some(end_type),
        }
    }
}

/// Everything a front end needs to draw one frame.
#[derive(Serialize, Debug)]
pub struct BoardSnapshot {
    pub squares: Vec<Vec<Option<Piece>>>,
    pub current_turn: Color,
    pub in_check: bool,
    pub check_square: Option<Position>,
    pub highlights: Vec<Position>,
    pub move_record: Vec<MoveRecord>,
    pub white_score: u32,
    pub black_score: u32,
    pub game_over: GameOverData,
}

pub struct GameSession {
    config: SessionConfig,
    state: GameState,
    tracker: MoveTracker,
    held: Option<PieceId>,
    valid_tiles: Vec<Position>,
    in_check: bool,
    game_over: GameOverData,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        Self::from_state(config, GameState::new())
    }

    /// Start a session from an arbitrary set-up position with an empty move
    /// record.
    pub fn from_state(config: SessionConfig, state: GameState) -> Self {
        GameSession {
            config,
            in_check: state.check_if_player_in_check(),
            state,
            tracker: MoveTracker::new(),
            held: None,
            valid_tiles: Vec::new(),
            game_over: GameOverData::default(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tracker(&self) -> &MoveTracker {
        &self.tracker
    }

    pub fn move_record(&self) -> &[MoveRecord] {
        self.tracker.move_record()
    }

    pub fn game_over(&self) -> &GameOverData {
        &self.game_over
    }

    pub fn is_in_check(&self) -> bool {
        self.in_check
    }

    pub fn held_piece(&self) -> Option<&Piece> {
        self.held.map(|id| self.state.piece(id))
    }

    pub fn valid_tiles(&self) -> &[Position] {
        &self.valid_tiles
    }

    /// Pick up the piece on `pos`. Returns whether a piece is now held.
    pub fn pick_up(&mut self, pos: Position) -> bool {
        self.clear_selection();
        if self.game_over.is_over || !self.state.is_current_player_piece(pos) {
            return false;
        }
        let Some(id) = self.state.piece_id_at(pos) else {
            return false;
        };
        self.valid_tiles = self.state.piece_valid_tiles(self.state.piece(id));
        self.held = Some(id);
        debug!(square = %pos, tiles = self.valid_tiles.len(), "piece picked up");
        true
    }

    /// Drop the held piece on `pos`. Returns whether a move was made; any
    /// drop that is not a legal move just releases the piece.
    pub fn drop_at(&mut self, pos: Position) -> bool {
        let held = self.held;
        let legal = self.valid_tiles.contains(&pos);
        self.clear_selection();
        let Some(id) = held else {
            return false;
        };
        if !legal || self.game_over.is_over {
            return false;
        }

        let mover = self.state.current_turn();
        self.tracker.record_move(self.state.piece(id), pos, mover);
        self.state.move_piece(id, pos);
        self.tracker.record_board(&self.state);
        self.update_status();
        true
    }

    /// Convenience for front ends that report whole clicks: pick up and drop
    /// in one call.
    pub fn play(&mut self, from: Position, to: Position) -> bool {
        self.pick_up(from) && self.drop_at(to)
    }

    fn clear_selection(&mut self) {
        self.held = None;
        self.valid_tiles.clear();
    }

    fn update_status(&mut self) {
        let side = self.state.current_turn();
        self.in_check = self.state.check_if_player_in_check();

        let ended = if !self.state.has_legal_move(side) {
            if self.in_check {
                Some(GameOverData::ended(side.opposite().into(), EndType::Checkmate))
            } else {
                Some(GameOverData::ended(Winner::Draw, EndType::Stalemate))
            }
        } else if self.tracker.is_repetition() {
            Some(GameOverData::ended(Winner::Draw, EndType::MoveRepetition))
        } else if self.state.is_material_draw() {
            Some(GameOverData::ended(Winner::Draw, EndType::InsufficientMaterial))
        } else {
            None
        };

        if let Some(data) = ended {
            info!(
                winner = ?data.winner,
                end_type = ?data.end_type,
                moves = self.tracker.move_record().len(),
                "game over"
            );
            self.game_over = data;
        }
    }

    /// Squares to mark for the renderer: the held piece's destinations, plus
    /// every square the opponent can reach when debug highlighting is on.
    pub fn highlights(&self) -> Vec<Position> {
        let mut tiles = self.valid_tiles.clone();
        if self.config.debug_highlights {
            tiles.extend(self.state.find_all_opponent_moves().into_iter().map(|mv| mv.to));
            tiles.sort();
            tiles.dedup();
        }
        tiles
    }

    /// King square of the side to move while it is in check.
    pub fn check_highlight(&self) -> Option<Position> {
        if self.in_check {
            self.state.king_position(self.state.current_turn())
        } else {
            None
        }
    }

    pub fn score_difference(&self, color: Color) -> i32 {
        self.state.score_difference(color)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let squares = (0..8)
            .map(|row| {
                (0..8)
                    .map(|col| {
                        Position::new(row, col)
                            .ok()
                            .and_then(|pos| self.state.pos_to_piece(pos).copied())
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        BoardSnapshot {
            squares,
            current_turn: self.state.current_turn(),
            in_check: self.in_check,
            check_square: self.check_highlight(),
            highlights: self.highlights(),
            move_record: self.tracker.move_record().to_vec(),
            white_score: self.state.score(Color::White),
            black_score: self.state.score(Color::Black),
            game_over: self.game_over.clone(),
        }
    }

    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot())
    }

    /// Write the move list to the configured save directory.
    pub fn save_game(&self) -> Result<PathBuf> {
        self.tracker.save_move_record(&self.config.save_dir)
    }

    /// Start over from the initial position. The configuration is kept.
    pub fn restart(&mut self) {
        info!("new game");
        self.state = GameState::new();
        self.tracker = MoveTracker::new();
        self.clear_selection();
        self.in_check = false;
        self.game_over = GameOverData::default();
    }

    /// Handle the restart / save buttons of the front end. Saving happens
    /// before restarting so the finished game is the one written out.
    pub fn press_buttons(&mut self, restart: bool, save: bool) -> Result<Option<PathBuf>> {
        let saved = if save { Some(self.save_game()?) } else { None };
        if restart {
            self.restart();
        }
        Ok(saved)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
