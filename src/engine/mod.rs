//! Chess engine components
//!
//! This module contains the core engine functionality:
//! - Mailbox move generation and attack detection
//! - Game rules, history and game state
//! - Material and piece-square evaluation
//! - Alpha-beta search

pub mod eval;
pub mod legality;
pub mod movegen;
pub mod search;

pub use eval::{evaluate, piece_value};
pub use legality::{GameState, LegalityEngine};
pub use movegen::{PromotionPolicy, perft};
pub use search::{Difficulty, MATE_SCORE, SearchEngine, SearchOutcome, SearchStats};
