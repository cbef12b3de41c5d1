//! Move generation on a mailbox board
//!
//! Generation works in two stages:
//! - pseudo-legal moves follow piece movement rules (castling path and
//!   attack conditions included) without checking the mover's own king
//! - legal moves are the pseudo-legal moves that do not leave the mover's
//!   king attacked, tested by make/unmake on a scratch board
//!
//! Every function here is a pure function of the board it is given, so the
//! game layer and the search share one generator.

use crate::core::board::{
    Board, Color, KING_START_COL, KINGSIDE_KING_COL, Piece, PieceType, Position,
    QUEENSIDE_KING_COL,
};
use crate::core::moves::Move;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Which promotion pieces the generator emits
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PromotionPolicy {
    /// Queen, Rook, Bishop, Knight
    All,
    /// Queen only (search generator)
    QueenOnly,
}

impl PromotionPolicy {
    fn pieces(self) -> &'static [PieceType] {
        match self {
            PromotionPolicy::All => &PieceType::PROMOTIONS,
            PromotionPolicy::QueenOnly => &PieceType::PROMOTIONS[..1],
        }
    }
}

/// Check if `target` is attacked by any piece of color `by`.
///
/// Pawns attack diagonally forward only; sliders stop at the first occupied
/// square.
pub fn is_attacked(board: &Board, target: Position, by: Color) -> bool {
    if !target.is_valid() {
        return false;
    }
    let is_attacker = |pos: Position, kind: PieceType| {
        matches!(board.piece(pos), Some(p) if p.color == by && p.piece_type == kind)
    };

    // A pawn of `by` attacks one row forward in its own direction
    let pawn_row = -by.pawn_direction();
    if is_attacker(target.offset(pawn_row, -1), PieceType::Pawn)
        || is_attacker(target.offset(pawn_row, 1), PieceType::Pawn)
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(dr, dc)| is_attacker(target.offset(dr, dc), PieceType::Knight))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(dr, dc)| is_attacker(target.offset(dr, dc), PieceType::King))
    {
        return true;
    }

    slider_attacks(board, target, by, &DIAGONALS, PieceType::Bishop)
        || slider_attacks(board, target, by, &ORTHOGONALS, PieceType::Rook)
}

fn slider_attacks(
    board: &Board,
    target: Position,
    by: Color,
    directions: &[(i8, i8)],
    kind: PieceType,
) -> bool {
    for &(dr, dc) in directions {
        let mut pos = target.offset(dr, dc);
        while pos.is_valid() {
            if let Some(piece) = board.piece(pos) {
                if piece.color == by
                    && (piece.piece_type == kind || piece.piece_type == PieceType::Queen)
                {
                    return true;
                }
                break;
            }
            pos = pos.offset(dr, dc);
        }
    }
    false
}

/// Check if the king of `color` is attacked. A missing king counts as in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.find_king(color) {
        Some(king) => is_attacked(board, king, color.opposite()),
        None => true,
    }
}

/// Pseudo-legal moves of the piece on `from`; empty for an empty square
pub fn pseudo_legal_moves_from(board: &Board, from: Position, policy: PromotionPolicy) -> Vec<Move> {
    let mut moves = Vec::new();
    if let Some(piece) = board.piece(from) {
        push_piece_moves(board, from, piece, policy, &mut moves);
    }
    moves
}

/// Pseudo-legal moves of every piece of `color`, in row-major piece order
pub fn pseudo_legal_moves(board: &Board, color: Color, policy: PromotionPolicy) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    for (from, piece) in board.occupied().filter(|(_, p)| p.color == color) {
        push_piece_moves(board, from, piece, policy, &mut moves);
    }
    moves
}

fn push_piece_moves(
    board: &Board,
    from: Position,
    piece: Piece,
    policy: PromotionPolicy,
    moves: &mut Vec<Move>,
) {
    match piece.piece_type {
        PieceType::Pawn => push_pawn_moves(board, from, piece.color, policy, moves),
        PieceType::Knight => push_step_moves(board, from, piece.color, &KNIGHT_OFFSETS, moves),
        PieceType::Bishop => push_slider_moves(board, from, piece.color, &DIAGONALS, moves),
        PieceType::Rook => push_slider_moves(board, from, piece.color, &ORTHOGONALS, moves),
        PieceType::Queen => {
            push_slider_moves(board, from, piece.color, &DIAGONALS, moves);
            push_slider_moves(board, from, piece.color, &ORTHOGONALS, moves);
        }
        PieceType::King => {
            push_step_moves(board, from, piece.color, &KING_OFFSETS, moves);
            if !piece.has_moved {
                push_castling_moves(board, from, piece.color, moves);
            }
        }
    }
}

fn push_pawn_moves(
    board: &Board,
    from: Position,
    us: Color,
    policy: PromotionPolicy,
    moves: &mut Vec<Move>,
) {
    let dir = us.pawn_direction();
    let push_to = |moves: &mut Vec<Move>, to: Position, is_capture: bool| {
        if to.row == us.promotion_row() {
            for &piece in policy.pieces() {
                moves.push(Move::new_promotion(from, to, piece, is_capture));
            }
        } else if is_capture {
            moves.push(Move::new_capture(from, to));
        } else {
            moves.push(Move::new(from, to));
        }
    };

    // Single and double pushes
    let one = from.offset(dir, 0);
    if one.is_valid() && board.is_empty(one) {
        push_to(moves, one, false);
        let two = from.offset(2 * dir, 0);
        if from.row == us.pawn_start_row() && board.is_empty(two) {
            moves.push(Move::new(from, two));
        }
    }

    // Diagonal captures and en passant
    for dc in [-1, 1] {
        let to = from.offset(dir, dc);
        if !to.is_valid() {
            continue;
        }
        match board.piece(to) {
            Some(target) if target.color != us => push_to(moves, to, true),
            Some(_) => {}
            None => {
                if board.en_passant_target() == Some(to) {
                    let behind = Position::new(from.row, to.col);
                    if matches!(board.piece(behind),
                        Some(p) if p.color != us && p.piece_type == PieceType::Pawn)
                    {
                        moves.push(Move::new_en_passant(from, to));
                    }
                }
            }
        }
    }
}

fn push_step_moves(
    board: &Board,
    from: Position,
    us: Color,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in offsets {
        let to = from.offset(dr, dc);
        if !to.is_valid() {
            continue;
        }
        match board.piece(to) {
            None => moves.push(Move::new(from, to)),
            Some(p) if p.color != us => moves.push(Move::new_capture(from, to)),
            Some(_) => {}
        }
    }
}

fn push_slider_moves(
    board: &Board,
    from: Position,
    us: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(dr, dc) in directions {
        let mut to = from.offset(dr, dc);
        while to.is_valid() {
            match board.piece(to) {
                None => moves.push(Move::new(from, to)),
                Some(p) => {
                    if p.color != us {
                        moves.push(Move::new_capture(from, to));
                    }
                    break;
                }
            }
            to = to.offset(dr, dc);
        }
    }
}

fn push_castling_moves(board: &Board, king: Position, us: Color, moves: &mut Vec<Move>) {
    let them = us.opposite();
    if king != Position::new(us.back_row(), KING_START_COL) || is_attacked(board, king, them) {
        return;
    }
    let row = king.row;
    let unmoved_rook = |col: i8| {
        matches!(board.piece_at(row, col),
            Some(p) if p.piece_type == PieceType::Rook && p.color == us && !p.has_moved)
    };
    let empty = |cols: &[i8]| cols.iter().all(|&c| board.is_empty(Position::new(row, c)));
    let safe = |cols: &[i8]| {
        cols.iter()
            .all(|&c| !is_attacked(board, Position::new(row, c), them))
    };

    if board.can_castle_kingside(us) && unmoved_rook(7) && empty(&[5, 6]) && safe(&[5, 6]) {
        moves.push(Move::new_castling(king, Position::new(row, KINGSIDE_KING_COL)));
    }
    if board.can_castle_queenside(us) && unmoved_rook(0) && empty(&[1, 2, 3]) && safe(&[2, 3]) {
        moves.push(Move::new_castling(king, Position::new(row, QUEENSIDE_KING_COL)));
    }
}

/// Apply `mv` to `board`, report whether `color`'s king is attacked, and revert.
pub fn leaves_in_check(board: &mut Board, mv: Move, color: Color) -> bool {
    match board.make_move(mv) {
        Some(record) => {
            let in_check = is_in_check(board, color);
            board.unmake_move(&record);
            in_check
        }
        None => true,
    }
}

fn retain_legal(board: &Board, color: Color, moves: Vec<Move>) -> Vec<Move> {
    let mut scratch = board.clone();
    moves
        .into_iter()
        .filter(|&mv| !leaves_in_check(&mut scratch, mv, color))
        .collect()
}

/// Legal moves of the piece on `from`, whatever the side to move
pub fn legal_moves_from(board: &Board, from: Position, policy: PromotionPolicy) -> Vec<Move> {
    match board.piece(from) {
        Some(piece) => retain_legal(board, piece.color, pseudo_legal_moves_from(board, from, policy)),
        None => Vec::new(),
    }
}

/// All legal moves of `color`
pub fn legal_moves(board: &Board, color: Color, policy: PromotionPolicy) -> Vec<Move> {
    retain_legal(board, color, pseudo_legal_moves(board, color, policy))
}

/// True if `color` has at least one legal move
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    let mut scratch = board.clone();
    pseudo_legal_moves(board, color, PromotionPolicy::QueenOnly)
        .into_iter()
        .any(|mv| !leaves_in_check(&mut scratch, mv, color))
}

/// Count leaf nodes of the legal move tree to `depth`
pub fn perft(board: &Board, color: Color, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(board, color, PromotionPolicy::All);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut scratch = board.clone();
    let mut nodes = 0;
    for mv in moves {
        if let Some(record) = scratch.make_move(mv) {
            nodes += perft(&scratch, color.opposite(), depth - 1);
            scratch.unmake_move(&record);
        }
    }
    nodes
}
