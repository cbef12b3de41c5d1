pub mod core;
pub mod engine;
pub mod uci;

pub use crate::core::{Board, Color, Move, Piece, PieceType, Position};
pub use engine::{Difficulty, GameState, LegalityEngine, SearchEngine, evaluate};
pub use uci::UCI;
