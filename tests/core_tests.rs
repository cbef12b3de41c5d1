//! Core Module Tests
//!
//! Tests for board, moves, FEN and the network message codec.

use mailbox_chess::core::board::{Board, CastlingRights, Color, Piece, PieceType, Position};
use mailbox_chess::core::fen::{Fen, FenError, STARTING_FEN};
use mailbox_chess::core::moves::Move;
use mailbox_chess::core::wire::{MOVE_MESSAGE_LEN, NetMessage, WireError};
use test_case::test_case;

fn pos(s: &str) -> Position {
    Position::from_algebraic(s).unwrap()
}

// ============================================================================
// Position Tests
// ============================================================================

#[test_case("a8", 0, 0; "a8 is the top left")]
#[test_case("h1", 7, 7; "h1 is the bottom right")]
#[test_case("e2", 6, 4; "e2")]
#[test_case("d5", 3, 3; "d5")]
fn test_position_algebraic(name: &str, row: i8, col: i8) {
    let p = Position::from_algebraic(name).unwrap();
    assert_eq!(p, Position::new(row, col));
    assert_eq!(p.to_algebraic(), name);
}

#[test]
fn test_position_validity() {
    assert!(Position::new(0, 0).is_valid());
    assert!(Position::new(7, 7).is_valid());
    assert!(!Position::new(8, 0).is_valid());
    assert!(!Position::new(0, -1).is_valid());
    assert!(!Position::INVALID.is_valid());
    assert_eq!(Position::from_algebraic("i1"), None);
    assert_eq!(Position::from_algebraic("a9"), None);
    assert_eq!(Position::from_algebraic("a"), None);
}

// ============================================================================
// Piece Tests
// ============================================================================

#[test]
fn test_piece_chars() {
    let wk = Piece::new(PieceType::King, Color::White);
    let bn = Piece::new(PieceType::Knight, Color::Black);
    assert_eq!(wk.to_char(), 'K');
    assert_eq!(bn.to_char(), 'n');
    assert_eq!(Piece::from_char('Q'), Some(Piece::new(PieceType::Queen, Color::White)));
    assert_eq!(Piece::from_char('x'), None);
    assert_eq!(wk.glyph(), '\u{2654}');
    assert_eq!(bn.glyph(), '\u{265E}');
}

#[test]
fn test_color_opposite() {
    assert_eq!(Color::White.opposite(), Color::Black);
    assert_eq!(!Color::Black, Color::White);
}

// ============================================================================
// Board Tests
// ============================================================================

#[test]
fn test_initialize_layout() {
    let board = Board::startpos();
    assert_eq!(
        board.piece(pos("e1")),
        Some(Piece::new(PieceType::King, Color::White))
    );
    assert_eq!(
        board.piece(pos("d8")),
        Some(Piece::new(PieceType::Queen, Color::Black))
    );
    for col in 0..8 {
        assert_eq!(board.piece_at(1, col).map(|p| p.piece_type), Some(PieceType::Pawn));
        assert_eq!(board.piece_at(6, col).map(|p| p.color), Some(Color::White));
        for row in 2..6 {
            assert!(board.piece_at(row, col).is_none());
        }
    }
    assert_eq!(board.castling_rights(), CastlingRights::ALL);
    assert_eq!(board.en_passant_target(), None);
    assert_eq!(board.find_pieces(Color::White).len(), 16);
    assert_eq!(board.find_pieces(Color::Black).len(), 16);
}

#[test]
fn test_clear() {
    let mut board = Board::startpos();
    board.set_en_passant_target(pos("e3"));
    board.clear();
    assert_eq!(board, Board::empty());
    assert!(!board.can_castle_kingside(Color::White));
}

#[test]
fn test_find_king() {
    let board = Board::startpos();
    assert_eq!(board.find_king(Color::White), Some(pos("e1")));
    assert_eq!(board.find_king(Color::Black), Some(pos("e8")));
    assert_eq!(Board::empty().find_king(Color::White), None);
}

#[test]
fn test_find_pieces_row_major() {
    let board = Board::startpos();
    let black = board.find_pieces(Color::Black);
    assert_eq!(black[0], Position::new(0, 0));
    assert_eq!(black[8], Position::new(1, 0));
    assert!(black.windows(2).all(|w| (w[0].row, w[0].col) < (w[1].row, w[1].col)));
}

#[test]
fn test_out_of_range_access() {
    let mut board = Board::startpos();
    assert_eq!(board.piece(Position::new(-1, 3)), None);
    assert_eq!(board.piece_at(8, 8), None);
    let before = board.clone();
    board.set_piece(Position::new(9, 0), Piece::new(PieceType::Queen, Color::White));
    assert_eq!(board, before);
}

#[test]
fn test_move_piece_marks_moved() {
    let mut board = Board::startpos();
    board.move_piece(pos("g1"), pos("f3"));
    assert!(board.piece(pos("g1")).is_none());
    let knight = board.piece(pos("f3")).unwrap();
    assert_eq!(knight.piece_type, PieceType::Knight);
    assert!(knight.has_moved);
}

#[test]
fn test_remove_piece() {
    let mut board = Board::startpos();
    let removed = board.remove_piece(pos("d1"));
    assert_eq!(removed.map(|p| p.piece_type), Some(PieceType::Queen));
    assert!(board.is_empty(pos("d1")));
    assert_eq!(board.remove_piece(pos("d4")), None);
}

#[test]
fn test_castling_rights_only_shrink() {
    let mut board = Board::startpos();
    board.disable_castling(Color::White, true);
    assert!(!board.can_castle_kingside(Color::White));
    assert!(board.can_castle_queenside(Color::White));
    board.disable_castling(Color::White, true);
    assert!(!board.can_castle_kingside(Color::White));
    assert!(board.can_castle_kingside(Color::Black));
}

#[test]
fn test_make_unmake_double_push() {
    let mut board = Board::startpos();
    let before = board.clone();
    let record = board.make_move(Move::new(pos("e2"), pos("e4"))).unwrap();
    assert_eq!(board.en_passant_target(), Some(pos("e3")));
    board.unmake_move(&record);
    assert_eq!(board, before);
}

#[test]
fn test_make_unmake_castling_restores_flags() {
    let mut board = Fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap().board;
    let before = board.clone();
    let record = board
        .make_move(Move::new_castling(pos("e1"), pos("c1")))
        .unwrap();
    assert_eq!(board.piece(pos("d1")).map(|p| p.piece_type), Some(PieceType::Rook));
    assert!(board.is_empty(pos("a1")));
    assert!(!board.can_castle_queenside(Color::White));
    assert!(!board.can_castle_kingside(Color::White));
    board.unmake_move(&record);
    assert_eq!(board, before);
    assert!(!board.piece(pos("a1")).unwrap().has_moved);
}

#[test]
fn test_capturing_home_rook_clears_right() {
    let mut board = Fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap().board;
    board.make_move(Move::new_capture(pos("a1"), pos("a8"))).unwrap();
    assert!(!board.can_castle_queenside(Color::White));
    assert!(!board.can_castle_queenside(Color::Black));
    assert!(board.can_castle_kingside(Color::Black));
    assert!(board.can_castle_kingside(Color::White));
}

#[test]
fn test_make_move_from_empty_square() {
    let mut board = Board::startpos();
    assert!(board.make_move(Move::new(pos("e4"), pos("e5"))).is_none());
    assert_eq!(board, Board::startpos());
}

#[test_case("8/8/8/4k3/8/8/4K3/8 w - - 0 1", true; "bare kings")]
#[test_case("8/8/8/4k3/8/8/4K3/5N2 w - - 0 1", true; "king and knight")]
#[test_case("8/8/8/4k3/8/8/4K3/5B2 w - - 0 1", true; "king and bishop")]
#[test_case("8/8/8/3bk3/8/8/4K3/5B2 w - - 0 1", true; "same colored bishops")]
#[test_case("8/8/8/2b1k3/8/8/4K3/5B2 w - - 0 1", false; "opposite colored bishops")]
#[test_case("8/8/8/4k3/8/8/4K3/4Q3 w - - 0 1", false; "king and queen")]
#[test_case("8/8/8/4k3/8/8/4KP2/8 w - - 0 1", false; "king and pawn")]
fn test_insufficient_material(fen: &str, expected: bool) {
    let board = Fen::parse(fen).unwrap().board;
    assert_eq!(board.is_insufficient_material(), expected);
}

// ============================================================================
// Move Tests
// ============================================================================

#[test]
fn test_move_uci_round_trip() {
    let mv = Move::from_uci("e2e4").unwrap();
    assert_eq!(mv.from, pos("e2"));
    assert_eq!(mv.to, pos("e4"));
    assert_eq!(mv.promotion, None);
    assert_eq!(mv.to_uci(), "e2e4");

    let promo = Move::from_uci("a7a8n").unwrap();
    assert_eq!(promo.promotion, Some(PieceType::Knight));
    assert_eq!(promo.to_string(), "a7a8n");
}

#[test]
fn test_move_uci_rejects_garbage() {
    assert_eq!(Move::from_uci("e2"), None);
    assert_eq!(Move::from_uci("e2e9"), None);
    assert_eq!(Move::from_uci("e7e8k"), None);
    assert_eq!(Move::from_uci("e2e4e5"), None);
}

#[test]
fn test_null_move() {
    assert!(Move::NULL.is_null());
    assert_eq!(Move::NULL.from, Position::INVALID);
    assert_eq!(Move::NULL.to_uci(), "0000");
    assert!(!Move::new(pos("e2"), pos("e4")).is_null());
}

// ============================================================================
// FEN Tests
// ============================================================================

#[test_case(STARTING_FEN; "startpos")]
#[test_case("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"; "kiwipete")]
#[test_case("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3"; "en passant")]
#[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1"; "partial castling")]
#[test_case("8/8/8/4k3/8/8/4K3/4Q3 b - - 12 40"; "endgame with counters")]
fn test_fen_round_trip(fen: &str) {
    assert_eq!(Fen::parse(fen).unwrap().to_string(), fen);
}

#[test]
fn test_fen_counters_optional() {
    let fen = Fen::parse("8/8/8/4k3/8/8/4K3/8 w - -").unwrap();
    assert_eq!(fen.halfmove_clock, 0);
    assert_eq!(fen.fullmove_number, 1);
}

#[test_case("8/8/8 w - -", FenError::RankCount(3); "too few ranks")]
#[test_case("8/8/8/8/8/8/8/8 w", FenError::FieldCount(2); "too few fields")]
#[test_case("8/8/8/4x3/8/8/8/8 w - -", FenError::Piece('x'); "bad piece")]
#[test_case("8/8/8/4k3/8/8/8/8 x - -", FenError::SideToMove("x".into()); "bad side")]
#[test_case("8/8/8/4k3/8/8/8/8 w KX -", FenError::Castling('X'); "bad castling")]
#[test_case("8/8/8/4k3/8/8/8/8 w - z9", FenError::EnPassant("z9".into()); "bad en passant")]
#[test_case("8/8/8/4k3/8/8/8/8 w - - x 1", FenError::Counter("x".into()); "bad counter")]
#[test_case("8p/8/8/4k3/8/8/8/8 w - -", FenError::RankLength { rank: 8 }; "long rank")]
fn test_fen_errors(fen: &str, expected: FenError) {
    assert_eq!(Fen::parse(fen), Err(expected));
}

// ============================================================================
// Wire Tests
// ============================================================================

#[test]
fn test_wire_move_round_trip() {
    let moves = [
        Move::new(pos("e2"), pos("e4")),
        Move::new_capture(pos("d4"), pos("e5")),
        Move::new_en_passant(pos("e5"), pos("d6")),
        Move::new_castling(pos("e1"), pos("g1")),
        Move::new_promotion(pos("b7"), pos("a8"), PieceType::Knight, true),
    ];
    for mv in moves {
        let bytes = NetMessage::Move(mv).encode();
        assert_eq!(bytes.len(), MOVE_MESSAGE_LEN);
        assert_eq!(NetMessage::decode(&bytes), Ok(NetMessage::Move(mv)));
    }
}

#[test]
fn test_wire_control_messages() {
    for msg in [
        NetMessage::Ready,
        NetMessage::Resign,
        NetMessage::Disconnect,
        NetMessage::ColorAssign(Some(Color::Black)),
        NetMessage::ColorAssign(None),
    ] {
        assert_eq!(NetMessage::decode(&msg.encode()), Ok(msg));
    }
    assert_eq!(NetMessage::Resign.encode(), vec![0, 0, 0, 4]);
    assert_eq!(
        NetMessage::ColorAssign(Some(Color::White)).encode(),
        vec![0, 0, 0, 2, 0, 0, 0, 1]
    );
}

#[test]
fn test_wire_errors() {
    assert_eq!(
        NetMessage::decode(&[0, 0]),
        Err(WireError::Truncated { needed: 4, available: 2 })
    );
    assert_eq!(NetMessage::decode(&[0, 0, 0, 9]), Err(WireError::UnknownTag(9)));
    assert_eq!(
        NetMessage::decode(&[0, 0, 0, 2, 0, 0, 0, 3]),
        Err(WireError::Color(3))
    );
    assert_eq!(
        NetMessage::decode(&[0, 0, 0, 3, 0]),
        Err(WireError::TrailingBytes(1))
    );

    let mut bytes = NetMessage::Move(Move::new(pos("e2"), pos("e4"))).encode();
    bytes[7] = 8;
    assert_eq!(NetMessage::decode(&bytes), Err(WireError::Coordinate(8)));

    let mut bytes = NetMessage::Move(Move::new(pos("e2"), pos("e4"))).encode();
    bytes[23] = 7;
    assert_eq!(NetMessage::decode(&bytes), Err(WireError::Promotion(7)));
}
