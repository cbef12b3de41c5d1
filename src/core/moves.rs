//! Move representation
//!
//! A move names its source and destination squares and carries the flags the
//! board needs to execute it:
//! - optional promotion piece
//! - capture, castling and en passant markers
//!
//! [`MoveRecord`] holds the state needed to revert a move exactly.

use super::board::{CastlingRights, Piece, PieceType, Position};
use std::fmt;

/// A chess move
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub promotion: Option<PieceType>,
    pub is_capture: bool,
    pub is_castling: bool,
    pub is_en_passant: bool,
}

impl Move {
    /// The "no move" sentinel: both squares invalid, no flags
    pub const NULL: Move = Move {
        from: Position::INVALID,
        to: Position::INVALID,
        promotion: None,
        is_capture: false,
        is_castling: false,
        is_en_passant: false,
    };

    /// Create a quiet move
    #[inline]
    pub const fn new(from: Position, to: Position) -> Self {
        Move {
            from,
            to,
            promotion: None,
            is_capture: false,
            is_castling: false,
            is_en_passant: false,
        }
    }

    /// Create a capture move
    #[inline]
    pub const fn new_capture(from: Position, to: Position) -> Self {
        Move {
            is_capture: true,
            ..Move::new(from, to)
        }
    }

    /// Create a promotion move
    #[inline]
    pub const fn new_promotion(
        from: Position,
        to: Position,
        piece: PieceType,
        is_capture: bool,
    ) -> Self {
        Move {
            promotion: Some(piece),
            is_capture,
            ..Move::new(from, to)
        }
    }

    /// Create an en passant move
    #[inline]
    pub const fn new_en_passant(from: Position, to: Position) -> Self {
        Move {
            is_capture: true,
            is_en_passant: true,
            ..Move::new(from, to)
        }
    }

    /// Create a castling move (king squares)
    #[inline]
    pub const fn new_castling(from: Position, to: Position) -> Self {
        Move {
            is_castling: true,
            ..Move::new(from, to)
        }
    }

    /// Check if this is the null move (either square off the board)
    #[inline]
    pub const fn is_null(self) -> bool {
        !self.from.is_valid() || !self.to.is_valid()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    /// Same squares and promotion piece, ignoring flags
    #[inline]
    pub fn same_squares(self, other: Move) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }

    /// Convert to UCI notation (e.g., "e2e4", "e7e8q")
    pub fn to_uci(self) -> String {
        if self.is_null() {
            return "0000".to_string();
        }
        let promo = self.promotion.map(PieceType::to_char);
        match promo {
            Some(p) => format!("{}{}{}", self.from, self.to, p),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// Parse squares and promotion from UCI notation.
    ///
    /// Flags are left unset; resolve the result against the legal move list
    /// to obtain a playable move.
    pub fn from_uci(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }

        let from = Position::from_algebraic(&s[0..2])?;
        let to = Position::from_algebraic(&s[2..4])?;

        if s.len() == 5 {
            let promo = match s.chars().nth(4)? {
                'n' | 'N' => PieceType::Knight,
                'b' | 'B' => PieceType::Bishop,
                'r' | 'R' => PieceType::Rook,
                'q' | 'Q' => PieceType::Queen,
                _ => return None,
            };
            Some(Move::new_promotion(from, to, promo, false))
        } else {
            Some(Move::new(from, to))
        }
    }
}

impl Default for Move {
    fn default() -> Self {
        Move::NULL
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// Everything needed to undo one move
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveRecord {
    pub mv: Move,
    /// The mover as it stood before the move (type, color, moved flag)
    pub moved_piece: Piece,
    /// Captured piece and the square it stood on (differs from `mv.to` for en passant)
    pub captured: Option<(Piece, Position)>,
    /// The castling rook before the move
    pub rook: Option<Piece>,
    pub en_passant: Option<Position>,
    pub castling: CastlingRights,
    /// Half-move clock before the move; filled in by the game layer
    pub halfmove_clock: u16,
}
