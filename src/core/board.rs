//! Chess board representation
//!
//! This module provides the core board representation: an 8x8 mailbox of
//! optional pieces, the en passant target and the four castling rights.
//! Row 0 is Black's back rank, row 7 is White's; column 0 is the a-file.

use super::moves::{Move, MoveRecord};
use std::fmt;

/// Board coordinate as (row, col).
///
/// Coordinates outside 0..8 are representable so that callers can step off
/// the board while scanning; check [`Position::is_valid`] before use.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    /// Sentinel used for "no square" (both coordinates -1).
    pub const INVALID: Position = Position { row: -1, col: -1 };

    #[inline]
    pub const fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.row >= 0 && self.row < 8 && self.col >= 0 && self.col < 8
    }

    #[inline]
    pub const fn offset(self, d_row: i8, d_col: i8) -> Self {
        Position::new(self.row + d_row, self.col + d_col)
    }

    #[inline]
    const fn index(self) -> Option<usize> {
        if self.is_valid() {
            Some((self.row as usize) * 8 + self.col as usize)
        } else {
            None
        }
    }

    /// Parse a square from algebraic notation (e.g., "e4")
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file < 8 && rank < 8 {
            Some(Position::new(7 - rank as i8, file as i8))
        } else {
            None
        }
    }

    /// Convert to algebraic notation
    pub fn to_algebraic(self) -> String {
        if !self.is_valid() {
            return "-".to_string();
        }
        let file = (b'a' + self.col as u8) as char;
        let rank = (b'8' - self.row as u8) as char;
        format!("{}{}", file, rank)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

/// Piece color
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Row delta of a pawn push (-1 for white, +1 for black)
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn pawn_start_row(self) -> i8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn promotion_row(self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Row holding this color's king and rooks at the start
    #[inline]
    pub const fn back_row(self) -> i8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;
    fn not(self) -> Self::Output {
        self.opposite()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Piece type
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum PieceType {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Promotion choices, strongest first
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Get the character representation of the piece type
    pub const fn to_char(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    /// Parse piece type from character
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceType::Bishop | PieceType::Rook | PieceType::Queen)
    }
}

/// A colored piece together with its moved flag.
///
/// Empty squares are `None` at the board level, so a `Piece` always names a
/// real piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    pub has_moved: bool,
}

impl Piece {
    /// A piece that has not moved yet
    #[inline]
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Piece {
            piece_type,
            color,
            has_moved: false,
        }
    }

    #[inline]
    pub const fn moved(self) -> Self {
        Piece {
            has_moved: true,
            ..self
        }
    }

    /// Get the character representation (uppercase for white, lowercase for black)
    pub fn to_char(self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parse a piece from character
    pub fn from_char(c: char) -> Option<Self> {
        let piece_type = PieceType::from_char(c)?;
        let color = if c.is_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(piece_type, color))
    }

    /// Unicode chess symbol
    pub const fn glyph(self) -> char {
        match (self.color, self.piece_type) {
            (Color::White, PieceType::King) => '\u{2654}',
            (Color::White, PieceType::Queen) => '\u{2655}',
            (Color::White, PieceType::Rook) => '\u{2656}',
            (Color::White, PieceType::Bishop) => '\u{2657}',
            (Color::White, PieceType::Knight) => '\u{2658}',
            (Color::White, PieceType::Pawn) => '\u{2659}',
            (Color::Black, PieceType::King) => '\u{265A}',
            (Color::Black, PieceType::Queen) => '\u{265B}',
            (Color::Black, PieceType::Rook) => '\u{265C}',
            (Color::Black, PieceType::Bishop) => '\u{265D}',
            (Color::Black, PieceType::Knight) => '\u{265E}',
            (Color::Black, PieceType::Pawn) => '\u{265F}',
        }
    }
}

/// Castling rights
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 1;
    pub const WHITE_QUEENSIDE: u8 = 2;
    pub const BLACK_KINGSIDE: u8 = 4;
    pub const BLACK_QUEENSIDE: u8 = 8;
    pub const ALL: CastlingRights = CastlingRights(0xF);

    #[inline]
    pub const fn new(rights: u8) -> Self {
        CastlingRights(rights & 0xF)
    }

    #[inline]
    pub const fn has(self, right: u8) -> bool {
        (self.0 & right) != 0
    }

    #[inline]
    pub fn remove(&mut self, right: u8) {
        self.0 &= !right;
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn flag(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => Self::WHITE_KINGSIDE,
            (Color::White, false) => Self::WHITE_QUEENSIDE,
            (Color::Black, true) => Self::BLACK_KINGSIDE,
            (Color::Black, false) => Self::BLACK_QUEENSIDE,
        }
    }

    pub fn can_castle_kingside(self, color: Color) -> bool {
        self.has(Self::flag(color, true))
    }

    pub fn can_castle_queenside(self, color: Color) -> bool {
        self.has(Self::flag(color, false))
    }

    /// The right tied to a rook home square, if `pos` is one
    pub fn rook_home_right(pos: Position) -> Option<u8> {
        match (pos.row, pos.col) {
            (7, 0) => Some(Self::WHITE_QUEENSIDE),
            (7, 7) => Some(Self::WHITE_KINGSIDE),
            (0, 0) => Some(Self::BLACK_QUEENSIDE),
            (0, 7) => Some(Self::BLACK_KINGSIDE),
            _ => None,
        }
    }
}

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// King column at the start and the castling destination columns
pub const KING_START_COL: i8 = 4;
pub const KINGSIDE_KING_COL: i8 = 6;
pub const QUEENSIDE_KING_COL: i8 = 2;

/// Rook squares (from, to) for a castling king move
pub fn castling_rook_squares(king_from: Position, king_to: Position) -> (Position, Position) {
    if king_to.col > king_from.col {
        (
            Position::new(king_from.row, 7),
            Position::new(king_from.row, 5),
        )
    } else {
        (
            Position::new(king_from.row, 0),
            Position::new(king_from.row, 3),
        )
    }
}

/// The chess board state
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    en_passant: Option<Position>,
    castling: CastlingRights,
}

impl Board {
    /// Create a new empty board with all castling rights disabled
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
            en_passant: None,
            castling: CastlingRights::NONE,
        }
    }

    /// Create a board holding the starting position
    pub fn startpos() -> Self {
        let mut board = Board::empty();
        board.initialize();
        board
    }

    /// Reset to the standard starting arrangement with every castling right
    pub fn initialize(&mut self) {
        self.clear();
        for col in 0..8 {
            self.squares[col] = Some(Piece::new(BACK_RANK[col], Color::Black));
            self.squares[8 + col] = Some(Piece::new(PieceType::Pawn, Color::Black));
            self.squares[48 + col] = Some(Piece::new(PieceType::Pawn, Color::White));
            self.squares[56 + col] = Some(Piece::new(BACK_RANK[col], Color::White));
        }
        self.castling = CastlingRights::ALL;
    }

    /// Empty every square and drop all castling rights
    pub fn clear(&mut self) {
        self.squares = [None; 64];
        self.en_passant = None;
        self.castling = CastlingRights::NONE;
    }

    /// Piece on a square; `None` for empty or off-board squares
    #[inline]
    pub fn piece(&self, pos: Position) -> Option<Piece> {
        pos.index().and_then(|i| self.squares[i])
    }

    #[inline]
    pub fn piece_at(&self, row: i8, col: i8) -> Option<Piece> {
        self.piece(Position::new(row, col))
    }

    #[inline]
    pub fn is_empty(&self, pos: Position) -> bool {
        self.piece(pos).is_none()
    }

    /// Put a piece on the board, replacing whatever was there
    pub fn set_piece(&mut self, pos: Position, piece: Piece) {
        self.put(pos, Some(piece));
    }

    /// Remove a piece from the board
    pub fn remove_piece(&mut self, pos: Position) -> Option<Piece> {
        let i = pos.index()?;
        self.squares[i].take()
    }

    fn put(&mut self, pos: Position, piece: Option<Piece>) {
        if let Some(i) = pos.index() {
            self.squares[i] = piece;
        }
    }

    /// Relocate a piece and mark it as moved. No legality checking.
    pub fn move_piece(&mut self, from: Position, to: Position) {
        if !to.is_valid() {
            return;
        }
        if let Some(piece) = self.remove_piece(from) {
            self.put(to, Some(piece.moved()));
        }
    }

    /// Square of the king of `color`, scanning in row-major order
    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.occupied()
            .find(|(_, p)| p.piece_type == PieceType::King && p.color == color)
            .map(|(pos, _)| pos)
    }

    /// Squares occupied by `color`, in row-major order
    pub fn find_pieces(&self, color: Color) -> Vec<Position> {
        self.occupied()
            .filter(|(_, p)| p.color == color)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Iterate over occupied squares in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.squares.iter().enumerate().filter_map(|(i, sq)| {
            sq.map(|p| (Position::new((i / 8) as i8, (i % 8) as i8), p))
        })
    }

    #[inline]
    pub fn en_passant_target(&self) -> Option<Position> {
        self.en_passant
    }

    pub fn set_en_passant_target(&mut self, pos: Position) {
        self.en_passant = pos.is_valid().then_some(pos);
    }

    pub fn clear_en_passant_target(&mut self) {
        self.en_passant = None;
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn set_castling_rights(&mut self, rights: CastlingRights) {
        self.castling = rights;
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.castling.can_castle_kingside(color)
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.castling.can_castle_queenside(color)
    }

    pub fn disable_castling(&mut self, color: Color, kingside: bool) {
        self.castling.remove(CastlingRights::flag(color, kingside));
    }

    /// Execute a move's board mechanics and return what is needed to revert it.
    ///
    /// Handles en passant removal, the castling rook, promotion, the en passant
    /// target and castling rights. Legality is the caller's business; `None`
    /// means the source square was empty and nothing changed.
    pub fn make_move(&mut self, mv: Move) -> Option<MoveRecord> {
        if !mv.to.is_valid() {
            return None;
        }
        let moved_piece = self.piece(mv.from)?;
        let color = moved_piece.color;
        let en_passant = self.en_passant;
        let castling = self.castling;

        let capture_square = if mv.is_en_passant {
            Position::new(mv.from.row, mv.to.col)
        } else {
            mv.to
        };
        let captured = self.piece(capture_square).map(|p| (p, capture_square));
        if mv.is_en_passant {
            self.remove_piece(capture_square);
        }

        let mut rook = None;
        self.move_piece(mv.from, mv.to);
        if mv.is_castling {
            let (rook_from, rook_to) = castling_rook_squares(mv.from, mv.to);
            rook = self.piece(rook_from);
            self.move_piece(rook_from, rook_to);
            self.disable_castling(color, true);
            self.disable_castling(color, false);
        } else if let Some(promotion) = mv.promotion {
            self.put(mv.to, Some(Piece::new(promotion, color).moved()));
        }

        self.en_passant = None;
        if moved_piece.piece_type == PieceType::Pawn && (mv.to.row - mv.from.row).abs() == 2 {
            self.en_passant = Some(Position::new((mv.from.row + mv.to.row) / 2, mv.from.col));
        }

        match moved_piece.piece_type {
            PieceType::King => {
                self.disable_castling(color, true);
                self.disable_castling(color, false);
            }
            PieceType::Rook => {
                if let Some(right) = CastlingRights::rook_home_right(mv.from) {
                    if mv.from.row == color.back_row() {
                        self.castling.remove(right);
                    }
                }
            }
            _ => {}
        }
        if let Some((victim, square)) = captured {
            if victim.piece_type == PieceType::Rook && square.row == victim.color.back_row() {
                if let Some(right) = CastlingRights::rook_home_right(square) {
                    self.castling.remove(right);
                }
            }
        }

        Some(MoveRecord {
            mv,
            moved_piece,
            captured,
            rook,
            en_passant,
            castling,
            halfmove_clock: 0,
        })
    }

    /// Exactly revert a move previously applied with [`Board::make_move`]
    pub fn unmake_move(&mut self, record: &MoveRecord) {
        let mv = record.mv;
        if mv.is_castling {
            let (rook_from, rook_to) = castling_rook_squares(mv.from, mv.to);
            self.put(rook_to, None);
            self.put(rook_from, record.rook);
        }
        self.put(mv.to, None);
        self.put(mv.from, Some(record.moved_piece));
        if let Some((piece, square)) = record.captured {
            self.put(square, Some(piece));
        }
        self.en_passant = record.en_passant;
        self.castling = record.castling;
    }

    /// Check if the position is a draw by insufficient material
    pub fn is_insufficient_material(&self) -> bool {
        let pieces: Vec<(Position, Piece)> = self
            .occupied()
            .filter(|(_, p)| p.piece_type != PieceType::King)
            .collect();

        match pieces.as_slice() {
            // King vs King
            [] => true,
            // King + minor piece vs King
            [(_, p)] => matches!(p.piece_type, PieceType::Knight | PieceType::Bishop),
            // King + Bishop vs King + Bishop (same color bishops)
            [(a, pa), (b, pb)] => {
                pa.piece_type == PieceType::Bishop
                    && pb.piece_type == PieceType::Bishop
                    && pa.color != pb.color
                    && (a.row + a.col) % 2 == (b.row + b.col) % 2
            }
            _ => false,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for row in 0..8 {
            write!(f, "  {} ", 8 - row)?;
            for col in 0..8 {
                match self.piece_at(row, col) {
                    Some(piece) => write!(f, "{} ", piece.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "    a b c d e f g h")?;
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)?;
        write!(
            f,
            "  en passant: {}  castling: {:04b}",
            self.en_passant.unwrap_or(Position::INVALID),
            self.castling.raw()
        )
    }
}
