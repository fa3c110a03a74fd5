pub mod board;
pub mod config;
pub mod error;
pub mod moves;
pub mod piece;
pub mod player;
pub mod session;
pub mod tracker;

pub use board::{GameState, MoveFilter};
pub use config::SessionConfig;
pub use error::{ChessError, Result};
pub use moves::{Move, MoveEffect};
pub use piece::{Color, Piece, PieceId, PieceType, Position};
pub use player::Player;
pub use session::{BoardSnapshot, EndType, GameOverData, GameSession, Winner};
pub use tracker::{MoveRecord, MoveTracker};
