//! FEN import and export
//!
//! The mailbox board tracks a moved flag per piece while FEN only records
//! castling rights, so parsing derives the flags:
//! - a king on its home square is unmoved if its side keeps any right
//! - a rook on a corner square is unmoved if the matching right is present
//! - a pawn is unmoved on its starting row

use super::board::{Board, CastlingRights, Color, Piece, PieceType, Position};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// FEN of the standard starting position
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("invalid FEN: expected at least 4 fields, found {0}")]
    FieldCount(usize),
    #[error("invalid FEN: expected 8 ranks, found {0}")]
    RankCount(usize),
    #[error("invalid FEN: rank {rank} does not describe 8 files")]
    RankLength { rank: usize },
    #[error("invalid FEN: unknown piece '{0}'")]
    Piece(char),
    #[error("invalid FEN: invalid side to move '{0}'")]
    SideToMove(String),
    #[error("invalid FEN: unknown castling right '{0}'")]
    Castling(char),
    #[error("invalid FEN: invalid en passant square '{0}'")]
    EnPassant(String),
    #[error("invalid FEN: invalid move counter '{0}'")]
    Counter(String),
}

/// A parsed FEN record
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Fen {
    pub board: Board,
    pub side_to_move: Color,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

impl Fen {
    /// Parse a board from FEN notation. The two move counters are optional.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::FieldCount(parts.len()));
        }

        let mut board = Board::empty();

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }
        for (row, rank) in ranks.iter().enumerate() {
            let mut col: usize = 0;
            for c in rank.chars() {
                match c {
                    '1'..='8' => col += (c as usize) - ('0' as usize),
                    _ => {
                        let piece = Piece::from_char(c).ok_or(FenError::Piece(c))?;
                        if col >= 8 {
                            return Err(FenError::RankLength { rank: 8 - row });
                        }
                        board.set_piece(Position::new(row as i8, col as i8), piece);
                        col += 1;
                    }
                }
            }
            if col != 8 {
                return Err(FenError::RankLength { rank: 8 - row });
            }
        }

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        let mut castling = 0u8;
        for c in parts[2].chars() {
            match c {
                'K' => castling |= CastlingRights::WHITE_KINGSIDE,
                'Q' => castling |= CastlingRights::WHITE_QUEENSIDE,
                'k' => castling |= CastlingRights::BLACK_KINGSIDE,
                'q' => castling |= CastlingRights::BLACK_QUEENSIDE,
                '-' => {}
                _ => return Err(FenError::Castling(c)),
            }
        }
        let rights = CastlingRights::new(castling);
        board.set_castling_rights(rights);

        if parts[3] != "-" {
            let square = Position::from_algebraic(parts[3])
                .ok_or_else(|| FenError::EnPassant(parts[3].to_string()))?;
            board.set_en_passant_target(square);
        }

        let halfmove_clock = match parts.get(4) {
            Some(s) => s.parse().map_err(|_| FenError::Counter(s.to_string()))?,
            None => 0,
        };
        let fullmove_number = match parts.get(5) {
            Some(s) => s.parse().map_err(|_| FenError::Counter(s.to_string()))?,
            None => 1,
        };

        derive_moved_flags(&mut board, rights);

        Ok(Fen {
            board,
            side_to_move,
            halfmove_clock,
            fullmove_number,
        })
    }
}

fn derive_moved_flags(board: &mut Board, rights: CastlingRights) {
    let pieces: Vec<(Position, Piece)> = board.occupied().collect();
    for (pos, mut piece) in pieces {
        let color = piece.color;
        let home = pos.row == color.back_row();
        piece.has_moved = match piece.piece_type {
            PieceType::Pawn => pos.row != color.pawn_start_row(),
            PieceType::King => {
                !(home
                    && pos.col == 4
                    && (rights.can_castle_kingside(color) || rights.can_castle_queenside(color)))
            }
            PieceType::Rook => match pos.col {
                7 if home => !rights.can_castle_kingside(color),
                0 if home => !rights.can_castle_queenside(color),
                _ => true,
            },
            _ => false,
        };
        board.set_piece(pos, piece);
    }
}

impl FromStr for Fen {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fen::parse(s)
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            let mut empty = 0;
            for col in 0..8 {
                match self.board.piece_at(row, col) {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{}", empty)?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.to_char())?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{}", empty)?;
            }
            if row < 7 {
                write!(f, "/")?;
            }
        }

        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        write!(f, " {} ", side)?;

        let rights = self.board.castling_rights();
        if rights == CastlingRights::NONE {
            write!(f, "-")?;
        } else {
            for (flag, c) in [
                (CastlingRights::WHITE_KINGSIDE, 'K'),
                (CastlingRights::WHITE_QUEENSIDE, 'Q'),
                (CastlingRights::BLACK_KINGSIDE, 'k'),
                (CastlingRights::BLACK_QUEENSIDE, 'q'),
            ] {
                if rights.has(flag) {
                    write!(f, "{}", c)?;
                }
            }
        }

        match self.board.en_passant_target() {
            Some(sq) => write!(f, " {}", sq)?,
            None => write!(f, " -")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_fen_matches_initialized_board() {
        let fen = Fen::parse(STARTING_FEN).unwrap();
        assert_eq!(fen.board, Board::startpos());
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.to_string(), STARTING_FEN);
    }

    #[test]
    fn test_moved_flags_follow_castling_rights() {
        let fen = Fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").unwrap();
        let board = &fen.board;
        assert!(!board.piece_at(7, 4).unwrap().has_moved);
        assert!(!board.piece_at(7, 7).unwrap().has_moved);
        assert!(board.piece_at(7, 0).unwrap().has_moved);
        assert!(board.piece_at(0, 7).unwrap().has_moved);
        assert!(!board.piece_at(0, 0).unwrap().has_moved);
    }

    #[test]
    fn test_short_rank_is_rejected() {
        let err = Fen::parse("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(err, Err(FenError::RankLength { rank: 7 }));
    }
}
