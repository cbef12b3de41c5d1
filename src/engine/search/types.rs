//! Difficulty tiers, search stats, outcome and score constants.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::moves::Move;

/// Base score for a mate; shorter mates score closer to it.
pub const MATE_SCORE: i32 = 100_000;
pub const DRAW_SCORE: i32 = 0;
/// Scores at least this far from zero are mates.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 64;

/// Search strength, a fixed search depth per tier
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Plies searched at this tier
    pub const fn depth(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
            Difficulty::Expert => 4,
        }
    }

    pub const fn from_depth(depth: u8) -> Option<Self> {
        match depth {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            4 => Some(Difficulty::Expert),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty '{0}' (expected Easy, Medium, Hard, Expert or 1-4)")]
pub struct DifficultyParseError(pub String);

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(depth) = trimmed.parse::<u8>() {
            return Difficulty::from_depth(depth).ok_or_else(|| DifficultyParseError(s.to_string()));
        }
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DifficultyParseError(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
}

/// Result of one root search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Chosen move, or [`Move::NULL`] when the side has no legal move
    pub best_move: Move,
    /// Score of the chosen move from the searching side's view
    pub score: i32,
    pub depth: u8,
    /// Root moves that shared the best score
    pub tied: usize,
    pub stats: SearchStats,
}

impl SearchOutcome {
    pub fn is_mate_score(&self) -> bool {
        self.score.abs() >= MATE_THRESHOLD
    }

    /// Moves until mate, negative when the searching side is mated
    pub fn mate_in(&self) -> Option<i32> {
        if !self.is_mate_score() {
            return None;
        }
        let plies = MATE_SCORE - self.score.abs();
        let moves = (plies + 1) / 2;
        Some(if self.score > 0 { moves } else { -moves })
    }
}
