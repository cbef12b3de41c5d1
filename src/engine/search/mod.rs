//! Search: fixed-depth alpha-beta with random tie-breaking at the root.

mod alphabeta;
mod ordering;
mod searcher;
mod types;

pub use searcher::SearchEngine;
pub use types::{
    DRAW_SCORE, Difficulty, DifficultyParseError, MATE_SCORE, MATE_THRESHOLD, SearchOutcome,
    SearchStats,
};
