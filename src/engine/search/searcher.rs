//! SearchEngine: root move selection, difficulty and tie-break randomness.

use log::{debug, trace};
use rand::SeedableRng;
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;

use crate::core::board::{Color, PieceType};
use crate::core::moves::Move;
use crate::engine::legality::LegalityEngine;

use super::alphabeta::simulate_move;
use super::types::{Difficulty, SearchOutcome, SearchStats};

pub struct SearchEngine {
    difficulty: Difficulty,
    rng: StdRng,
    pub(super) stats: SearchStats,
    pub(super) ai_color: Color,
    pub(super) max_depth: i32,
}

impl SearchEngine {
    /// Medium difficulty, tie-breaks seeded from system randomness
    pub fn new() -> Self {
        Self::with_seed(rand::random::<u64>())
    }

    /// Medium difficulty with reproducible tie-breaks
    pub fn with_seed(seed: u64) -> Self {
        SearchEngine {
            difficulty: Difficulty::default(),
            rng: StdRng::seed_from_u64(seed),
            stats: SearchStats::default(),
            ai_color: Color::White,
            max_depth: Difficulty::default().depth() as i32,
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Best move for `color`, or [`Move::NULL`] if it has none
    pub fn find_best_move(&mut self, rules: &LegalityEngine, color: Color) -> Move {
        self.search(rules, color).best_move
    }

    /// Search at the configured difficulty
    pub fn search(&mut self, rules: &LegalityEngine, color: Color) -> SearchOutcome {
        self.search_depth(rules, color, self.difficulty.depth())
    }

    /// Search `depth` plies (at least one) for `color` without touching `rules`.
    ///
    /// Every root move is scored through the minimizing reply. Moves sharing
    /// the best score are picked from uniformly at random.
    pub fn search_depth(&mut self, rules: &LegalityEngine, color: Color, depth: u8) -> SearchOutcome {
        let depth = depth.max(1);
        self.stats = SearchStats::default();
        self.ai_color = color;
        self.max_depth = i32::from(depth);

        let candidates = rules.all_legal_moves(color);
        let Some(&fallback) = candidates.first() else {
            debug!("no legal move for {}", color);
            return SearchOutcome {
                best_move: Move::NULL,
                score: 0,
                depth,
                tied: 0,
                stats: self.stats,
            };
        };

        let root = rules.board();
        let mut best_score = i32::MIN;
        let mut tied: Vec<Move> = Vec::new();

        for mv in candidates {
            // Under-promotions collapse onto the queen promotion
            if matches!(mv.promotion, Some(p) if p != PieceType::Queen) {
                continue;
            }
            let mut child = root.clone();
            if !simulate_move(&mut child, mv, color) {
                continue;
            }
            // One below the best keeps equal scores exact
            let alpha = best_score.saturating_sub(1);
            let score = self.minimax(&child, color.opposite(), self.max_depth - 1, alpha, i32::MAX, false);
            trace!("root {} scored {}", mv, score);

            if score > best_score {
                best_score = score;
                tied.clear();
                tied.push(mv);
            } else if score == best_score {
                tied.push(mv);
            }
        }

        let best_move = match tied.len() {
            0 => fallback,
            1 => tied[0],
            n => match Uniform::new(0, n) {
                Ok(dist) => tied[dist.sample(&mut self.rng)],
                Err(_) => tied[0],
            },
        };
        let score = if tied.is_empty() { 0 } else { best_score };

        debug!(
            "{} search depth {} chose {} score {} ({} tied, {} nodes)",
            color,
            depth,
            best_move,
            score,
            tied.len(),
            self.stats.nodes
        );

        SearchOutcome {
            best_move,
            score,
            depth,
            tied: tied.len(),
            stats: self.stats,
        }
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}
