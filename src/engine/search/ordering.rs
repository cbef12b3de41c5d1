//! Move ordering: promotions and valuable captures first.

use crate::core::board::Board;
use crate::core::moves::Move;
use crate::engine::eval::{QUEEN_VALUE, piece_value};

const PROMOTION_BONUS: i32 = QUEEN_VALUE;

/// Ordering key; higher is searched earlier
pub(super) fn move_score(board: &Board, mv: &Move) -> i32 {
    let mut score = 0;
    if let Some(victim) = board.piece(mv.to) {
        score += 10 * piece_value(victim.piece_type);
    }
    if mv.is_promotion() {
        score += PROMOTION_BONUS;
    }
    score
}

/// Sort descending by [`move_score`], keeping generation order among equals
pub(super) fn order_moves(board: &Board, moves: &mut [Move]) {
    moves.sort_by_cached_key(|mv| std::cmp::Reverse(move_score(board, mv)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::board::{Color, Piece, PieceType, Position};

    #[test]
    fn test_captures_sorted_by_victim() {
        let mut board = Board::empty();
        board.set_piece(Position::new(4, 4), Piece::new(PieceType::Queen, Color::White));
        board.set_piece(Position::new(4, 7), Piece::new(PieceType::Rook, Color::Black));
        board.set_piece(Position::new(1, 4), Piece::new(PieceType::Queen, Color::Black));

        let quiet = Move::new(Position::new(4, 4), Position::new(5, 4));
        let takes_rook = Move::new_capture(Position::new(4, 4), Position::new(4, 7));
        let takes_queen = Move::new_capture(Position::new(4, 4), Position::new(1, 4));
        let mut moves = vec![quiet, takes_rook, takes_queen];
        order_moves(&board, &mut moves);
        assert_eq!(moves, vec![takes_queen, takes_rook, quiet]);
    }

    #[test]
    fn test_promotion_bonus() {
        let mut board = Board::empty();
        board.set_piece(Position::new(1, 0), Piece::new(PieceType::Pawn, Color::White));
        let promo = Move::new_promotion(Position::new(1, 0), Position::new(0, 0), PieceType::Queen, false);
        assert_eq!(move_score(&board, &promo), 900);
    }
}
