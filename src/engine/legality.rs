//! Game rules on top of the board
//!
//! [`LegalityEngine`] owns the live board, the side to move, the move history
//! and the move counters. It answers legality queries, applies and reverts
//! moves, and classifies the game state. Failures are reported through return
//! values and never change state.

use crate::core::board::{Board, Color, PieceType, Position};
use crate::core::fen::{Fen, FenError};
use crate::core::moves::{Move, MoveRecord};
use crate::engine::movegen::{self, PromotionPolicy};
use log::debug;
use std::fmt;

/// Classification of the position for the side to move
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    MainMenu,
    Playing,
    Check,
    Checkmate,
    Stalemate,
    // The rules only derive the four states above. These are set by
    // whatever layer runs menus, clocks and draw offers.
    Draw,
    WhiteTimeout,
    BlackTimeout,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameState::MainMenu => "main menu",
            GameState::Playing => "playing",
            GameState::Check => "check",
            GameState::Checkmate => "checkmate",
            GameState::Stalemate => "stalemate",
            GameState::Draw => "draw",
            GameState::WhiteTimeout => "white timeout",
            GameState::BlackTimeout => "black timeout",
        };
        write!(f, "{}", name)
    }
}

/// Rule authority for one game
#[derive(Clone, Debug)]
pub struct LegalityEngine {
    board: Board,
    current_turn: Color,
    history: Vec<MoveRecord>,
    halfmove_clock: u16,
    fullmove_number: u16,
}

impl LegalityEngine {
    /// Starting position, White to move
    pub fn new() -> Self {
        Self::with_board(Board::startpos(), Color::White)
    }

    /// Wrap an arbitrary board with the given side to move and empty history
    pub fn with_board(board: Board, current_turn: Color) -> Self {
        LegalityEngine {
            board,
            current_turn,
            history: Vec::new(),
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fen = Fen::parse(fen)?;
        Ok(LegalityEngine {
            board: fen.board,
            current_turn: fen.side_to_move,
            history: Vec::new(),
            halfmove_clock: fen.halfmove_clock,
            fullmove_number: fen.fullmove_number,
        })
    }

    pub fn to_fen(&self) -> String {
        Fen {
            board: self.board.clone(),
            side_to_move: self.current_turn,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_string()
    }

    /// Back to the starting position with an empty history
    pub fn reset(&mut self) {
        *self = LegalityEngine::new();
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Applied moves, oldest first
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|r| r.mv)
    }

    /// Legal moves of the piece on `pos`; empty unless it belongs to the side to move
    pub fn legal_moves(&self, pos: Position) -> Vec<Move> {
        match self.board.piece(pos) {
            Some(piece) if piece.color == self.current_turn => {
                movegen::legal_moves_from(&self.board, pos, PromotionPolicy::All)
            }
            _ => Vec::new(),
        }
    }

    /// Every legal move of `color`, whoever is to move
    pub fn all_legal_moves(&self, color: Color) -> Vec<Move> {
        movegen::legal_moves(&self.board, color, PromotionPolicy::All)
    }

    /// The generated legal move matching `mv`'s squares and promotion
    pub fn find_legal_move(&self, mv: Move) -> Option<Move> {
        if !mv.from.is_valid() || !mv.to.is_valid() {
            return None;
        }
        self.legal_moves(mv.from)
            .into_iter()
            .find(|legal| legal.to == mv.to && legal.promotion == mv.promotion)
    }

    pub fn is_legal_move(&self, mv: Move) -> bool {
        self.find_legal_move(mv).is_some()
    }

    /// Check if `mv` would leave the mover's own king attacked
    pub fn would_be_in_check(&self, mv: Move) -> bool {
        let Some(piece) = self.board.piece(mv.from) else {
            return true;
        };
        let mut scratch = self.board.clone();
        movegen::leaves_in_check(&mut scratch, mv, piece.color)
    }

    /// Apply a legal move. Returns false and changes nothing otherwise.
    ///
    /// The generated move is applied rather than `mv` itself, so flags from an
    /// untrusted source cannot alter the board mechanics.
    pub fn make_move(&mut self, mv: Move) -> bool {
        let Some(legal) = self.find_legal_move(mv) else {
            debug!("rejected illegal move {} for {}", mv, self.current_turn);
            return false;
        };
        let Some(mut record) = self.board.make_move(legal) else {
            return false;
        };

        record.halfmove_clock = self.halfmove_clock;
        let resets_clock = record.moved_piece.piece_type == PieceType::Pawn || record.captured.is_some();
        self.halfmove_clock = if resets_clock {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        if self.current_turn == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.history.push(record);
        self.current_turn = self.current_turn.opposite();
        true
    }

    /// Revert the last move. Returns false when there is nothing to undo.
    pub fn undo_move(&mut self) -> bool {
        let Some(record) = self.history.pop() else {
            debug!("undo requested with empty history");
            return false;
        };
        self.board.unmake_move(&record);
        self.current_turn = self.current_turn.opposite();
        self.halfmove_clock = record.halfmove_clock;
        if self.current_turn == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_sub(1);
        }
        true
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        movegen::is_in_check(&self.board, color)
    }

    pub fn is_attacked(&self, pos: Position, by: Color) -> bool {
        movegen::is_attacked(&self.board, pos, by)
    }

    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !movegen::has_legal_move(&self.board, color)
    }

    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !movegen::has_legal_move(&self.board, color)
    }

    /// State for the side to move: checkmate, then stalemate, then check
    pub fn game_state(&self) -> GameState {
        let color = self.current_turn;
        let in_check = self.is_in_check(color);
        let can_move = movegen::has_legal_move(&self.board, color);
        match (in_check, can_move) {
            (true, false) => GameState::Checkmate,
            (false, false) => GameState::Stalemate,
            (true, true) => GameState::Check,
            (false, true) => GameState::Playing,
        }
    }
}

impl Default for LegalityEngine {
    fn default() -> Self {
        Self::new()
    }
}
