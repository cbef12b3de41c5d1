//! Core chess types and representations
//!
//! This module contains the fundamental building blocks of the chess engine:
//! - Mailbox board, pieces and positions
//! - Move and undo record types
//! - FEN import/export
//! - Network message codec

pub mod board;
pub mod fen;
pub mod moves;
pub mod wire;

pub use board::{Board, CastlingRights, Color, Piece, PieceType, Position};
pub use fen::{Fen, FenError, STARTING_FEN};
pub use moves::{Move, MoveRecord};
pub use wire::{MessageTag, NetMessage, WireError};
