//! Fixed-depth minimax with alpha-beta pruning.
//!
//! Scores are always from the searching side's point of view: the searching
//! side maximizes, its opponent minimizes. Every child is searched on its own
//! copy of the board.

use crate::core::board::{Board, Color};
use crate::core::moves::Move;
use crate::engine::eval::evaluate;
use crate::engine::movegen::{self, PromotionPolicy};

use super::ordering;
use super::searcher::SearchEngine;
use super::types::{DRAW_SCORE, MATE_SCORE};

/// Play `mv` for `color` on `board`. False if it leaves `color` in check.
pub(super) fn simulate_move(board: &mut Board, mv: Move, color: Color) -> bool {
    board.make_move(mv).is_some() && !movegen::is_in_check(board, color)
}

impl SearchEngine {
    /// Score for the side to move having no legal move
    pub(super) fn terminal_score(&self, board: &Board, turn: Color, depth: i32, maximizing: bool) -> i32 {
        if !movegen::is_in_check(board, turn) {
            return DRAW_SCORE;
        }
        let mate = MATE_SCORE - (self.max_depth - depth);
        if maximizing { -mate } else { mate }
    }

    pub(super) fn minimax(
        &mut self,
        board: &Board,
        turn: Color,
        depth: i32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.stats.nodes += 1;

        let mut moves = movegen::legal_moves(board, turn, PromotionPolicy::QueenOnly);
        if moves.is_empty() {
            return self.terminal_score(board, turn, depth, maximizing);
        }
        if depth <= 0 {
            return evaluate(board, self.ai_color);
        }

        ordering::order_moves(board, &mut moves);

        if maximizing {
            let mut max_eval = i32::MIN;
            for mv in moves {
                let mut child = board.clone();
                if !simulate_move(&mut child, mv, turn) {
                    continue;
                }
                let eval = self.minimax(&child, turn.opposite(), depth - 1, alpha, beta, false);
                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            max_eval
        } else {
            let mut min_eval = i32::MAX;
            for mv in moves {
                let mut child = board.clone();
                if !simulate_move(&mut child, mv, turn) {
                    continue;
                }
                let eval = self.minimax(&child, turn.opposite(), depth - 1, alpha, beta, true);
                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            min_eval
        }
    }
}
