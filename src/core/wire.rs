//! Network message codec
//!
//! Messages between two peers are flat big-endian records that start with a
//! 32-bit tag. A move travels as eight fields after the tag: four 32-bit
//! coordinates, a 32-bit promotion code and three one-byte flags. Receivers
//! replay decoded moves through the legality layer, which rejects anything
//! malformed that survives decoding.

use super::board::{Color, PieceType, Position};
use super::moves::Move;
use thiserror::Error;

/// Message tags as sent on the wire
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(i32)]
pub enum MessageTag {
    Move = 1,
    ColorAssign = 2,
    Ready = 3,
    Resign = 4,
    Disconnect = 5,
}

impl MessageTag {
    pub fn from_i32(tag: i32) -> Option<Self> {
        match tag {
            1 => Some(MessageTag::Move),
            2 => Some(MessageTag::ColorAssign),
            3 => Some(MessageTag::Ready),
            4 => Some(MessageTag::Resign),
            5 => Some(MessageTag::Disconnect),
            _ => None,
        }
    }
}

/// Encoded length of a move message, tag included
pub const MOVE_MESSAGE_LEN: usize = 4 + 5 * 4 + 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("message truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },
    #[error("unknown message tag {0}")]
    UnknownTag(i32),
    #[error("coordinate {0} out of range")]
    Coordinate(i32),
    #[error("unknown promotion code {0}")]
    Promotion(i32),
    #[error("unknown color code {0}")]
    Color(i32),
    #[error("invalid boolean byte {0:#04x}")]
    Bool(u8),
    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),
}

/// A message exchanged between two networked players
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NetMessage {
    Move(Move),
    /// Server to client; `None` means no color assigned
    ColorAssign(Option<Color>),
    Ready,
    Resign,
    Disconnect,
}

impl NetMessage {
    pub fn tag(&self) -> MessageTag {
        match self {
            NetMessage::Move(_) => MessageTag::Move,
            NetMessage::ColorAssign(_) => MessageTag::ColorAssign,
            NetMessage::Ready => MessageTag::Ready,
            NetMessage::Resign => MessageTag::Resign,
            NetMessage::Disconnect => MessageTag::Disconnect,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(MOVE_MESSAGE_LEN);
        out.extend_from_slice(&(self.tag() as i32).to_be_bytes());
        match self {
            NetMessage::Move(mv) => {
                for coord in [mv.from.row, mv.from.col, mv.to.row, mv.to.col] {
                    out.extend_from_slice(&i32::from(coord).to_be_bytes());
                }
                out.extend_from_slice(&promotion_code(mv.promotion).to_be_bytes());
                out.extend([
                    u8::from(mv.is_capture),
                    u8::from(mv.is_castling),
                    u8::from(mv.is_en_passant),
                ]);
            }
            NetMessage::ColorAssign(color) => {
                out.extend_from_slice(&color_code(*color).to_be_bytes());
            }
            NetMessage::Ready | NetMessage::Resign | NetMessage::Disconnect => {}
        }
        out
    }

    /// Decode exactly one message from `bytes`
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut reader = Reader { bytes, pos: 0 };
        let tag = reader.i32()?;
        let message = match MessageTag::from_i32(tag).ok_or(WireError::UnknownTag(tag))? {
            MessageTag::Move => {
                let from_row = reader.coordinate()?;
                let from_col = reader.coordinate()?;
                let to_row = reader.coordinate()?;
                let to_col = reader.coordinate()?;
                let promotion = promotion_from_code(reader.i32()?)?;
                let is_capture = reader.bool()?;
                let is_castling = reader.bool()?;
                let is_en_passant = reader.bool()?;
                NetMessage::Move(Move {
                    from: Position::new(from_row, from_col),
                    to: Position::new(to_row, to_col),
                    promotion,
                    is_capture,
                    is_castling,
                    is_en_passant,
                })
            }
            MessageTag::ColorAssign => NetMessage::ColorAssign(color_from_code(reader.i32()?)?),
            MessageTag::Ready => NetMessage::Ready,
            MessageTag::Resign => NetMessage::Resign,
            MessageTag::Disconnect => NetMessage::Disconnect,
        };
        match bytes.len() - reader.pos {
            0 => Ok(message),
            n => Err(WireError::TrailingBytes(n)),
        }
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let end = self.pos + N;
        let slice = self.bytes.get(self.pos..end).ok_or(WireError::Truncated {
            needed: end,
            available: self.bytes.len(),
        })?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(slice);
        self.pos = end;
        Ok(buf)
    }

    fn i32(&mut self) -> Result<i32, WireError> {
        Ok(i32::from_be_bytes(self.take::<4>()?))
    }

    /// Board coordinates, or -1 for the null move
    fn coordinate(&mut self) -> Result<i8, WireError> {
        let value = self.i32()?;
        if (-1..8).contains(&value) {
            Ok(value as i8)
        } else {
            Err(WireError::Coordinate(value))
        }
    }

    fn bool(&mut self) -> Result<bool, WireError> {
        match self.take::<1>()?[0] {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(WireError::Bool(b)),
        }
    }
}

fn promotion_code(piece: Option<PieceType>) -> i32 {
    piece.map_or(0, |p| p.index() as i32 + 1)
}

fn promotion_from_code(code: i32) -> Result<Option<PieceType>, WireError> {
    match code {
        0 => Ok(None),
        1..=6 => Ok(Some(PieceType::ALL[(code - 1) as usize])),
        _ => Err(WireError::Promotion(code)),
    }
}

fn color_code(color: Option<Color>) -> i32 {
    match color {
        None => 0,
        Some(Color::White) => 1,
        Some(Color::Black) => 2,
    }
}

fn color_from_code(code: i32) -> Result<Option<Color>, WireError> {
    match code {
        0 => Ok(None),
        1 => Ok(Some(Color::White)),
        2 => Ok(Some(Color::Black)),
        _ => Err(WireError::Color(code)),
    }
}
