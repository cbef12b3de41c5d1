//! UCI Protocol Tests
//!
//! These tests drive the front end line by line and check what it prints.

use mailbox_chess::core::fen::STARTING_FEN;
use mailbox_chess::core::moves::Move;
use mailbox_chess::engine::search::Difficulty;
use mailbox_chess::uci::UCI;

fn send(uci: &mut UCI, line: &str) -> String {
    let mut out = Vec::new();
    assert!(uci.handle_line(line, &mut out).unwrap());
    String::from_utf8(out).unwrap()
}

fn bestmove(output: &str) -> &str {
    output
        .lines()
        .find_map(|line| line.strip_prefix("bestmove "))
        .unwrap()
}

// ============================================================================
// Handshake Tests
// ============================================================================

#[test]
fn test_uci_handshake() {
    let mut uci = UCI::with_seed(1);
    let out = send(&mut uci, "uci");
    assert!(out.starts_with("id name mailbox_chess"));
    assert!(out.contains("option name Difficulty type combo default Medium"));
    assert!(out.contains("option name Seed type spin"));
    assert_eq!(out.lines().last(), Some("uciok"));
}

#[test]
fn test_isready() {
    let mut uci = UCI::with_seed(1);
    assert_eq!(send(&mut uci, "isready"), "readyok\n");
}

#[test]
fn test_blank_and_unknown_lines_are_ignored() {
    let mut uci = UCI::with_seed(1);
    assert_eq!(send(&mut uci, "   "), "");
    assert_eq!(send(&mut uci, "xyzzy"), "");
    assert_eq!(uci.rules().to_fen(), STARTING_FEN);
}

#[test]
fn test_quit_stops_the_loop() {
    let mut uci = UCI::with_seed(1);
    let mut out = Vec::new();
    assert!(!uci.handle_line("quit", &mut out).unwrap());
}

#[test]
fn test_run_with_reads_until_quit() {
    let mut uci = UCI::with_seed(1);
    let input = "isready\nquit\nisready\n".as_bytes();
    let mut out = Vec::new();
    uci.run_with(input, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "readyok\n");
}

// ============================================================================
// Position Tests
// ============================================================================

#[test]
fn test_position_startpos_with_moves() {
    let mut uci = UCI::with_seed(1);
    send(&mut uci, "position startpos moves e2e4 e7e5");
    assert_eq!(
        uci.rules().to_fen(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
    );
}

#[test]
fn test_position_fen() {
    let mut uci = UCI::with_seed(1);
    let fen = "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 3 20";
    send(&mut uci, &format!("position fen {}", fen));
    assert_eq!(uci.rules().to_fen(), fen);

    send(&mut uci, &format!("position fen {} moves e8c8", fen));
    assert_eq!(
        uci.rules().to_fen(),
        "2kr3r/8/8/8/8/8/8/R3K2R w KQ - 4 21"
    );
}

#[test]
fn test_position_stops_at_illegal_move() {
    let mut uci = UCI::with_seed(1);
    send(&mut uci, "position startpos moves e2e4 e7e4 d2d4");
    assert_eq!(
        uci.rules().to_fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );
    assert_eq!(uci.rules().history().len(), 1);
}

#[test]
fn test_ucinewgame_resets() {
    let mut uci = UCI::with_seed(1);
    send(&mut uci, "position startpos moves g1f3");
    send(&mut uci, "ucinewgame");
    assert_eq!(uci.rules().to_fen(), STARTING_FEN);
    assert!(uci.rules().history().is_empty());
}

// ============================================================================
// Search Tests
// ============================================================================

#[test]
fn test_go_depth_plays_legal_move() {
    let mut uci = UCI::with_seed(7);
    send(&mut uci, "position startpos moves e2e4");
    let out = send(&mut uci, "go depth 1");
    assert!(out.contains("info depth 1 score cp"));
    let mv = Move::from_uci(bestmove(&out)).unwrap();
    assert!(uci.rules().is_legal_move(mv));
}

#[test]
fn test_go_reports_mate() {
    let mut uci = UCI::with_seed(7);
    send(&mut uci, "position fen 6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    let out = send(&mut uci, "go depth 2");
    assert!(out.contains("info depth 2 score mate 1"));
    assert_eq!(bestmove(&out), "a1a8");
}

#[test]
fn test_go_depth_is_clamped() {
    let mut uci = UCI::with_seed(7);
    send(&mut uci, "position fen 6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    let out = send(&mut uci, "go depth 30");
    assert!(out.contains("info depth 4 "));
}

#[test]
fn test_go_without_moves_prints_null() {
    let mut uci = UCI::with_seed(7);
    send(&mut uci, "position fen 8/8/8/8/8/6q1/5k2/7K w - - 0 1");
    let out = send(&mut uci, "go");
    assert_eq!(out, "bestmove 0000\n");
}

#[test]
fn test_go_does_not_change_position() {
    let mut uci = UCI::with_seed(3);
    send(&mut uci, "position startpos");
    send(&mut uci, "go depth 2");
    assert_eq!(uci.rules().to_fen(), STARTING_FEN);
}

// ============================================================================
// Option Tests
// ============================================================================

#[test]
fn test_setoption_difficulty() {
    let mut uci = UCI::with_seed(1);
    assert_eq!(uci.difficulty(), Difficulty::Medium);
    send(&mut uci, "setoption name Difficulty value Hard");
    assert_eq!(uci.difficulty(), Difficulty::Hard);
    send(&mut uci, "setoption name Difficulty value 1");
    assert_eq!(uci.difficulty(), Difficulty::Easy);
    send(&mut uci, "setoption name Difficulty value Impossible");
    assert_eq!(uci.difficulty(), Difficulty::Easy);
}

#[test]
fn test_setoption_seed_is_reproducible() {
    let pick = |seed: u64| {
        let mut uci = UCI::with_seed(0);
        send(&mut uci, &format!("setoption name Seed value {}", seed));
        send(&mut uci, "setoption name Difficulty value Easy");
        send(&mut uci, "position startpos");
        bestmove(&send(&mut uci, "go")).to_string()
    };
    let first = pick(11);
    assert_eq!(pick(11), first);
    assert!(first == "b1c3" || first == "g1f3");
}

// ============================================================================
// Debug Command Tests
// ============================================================================

#[test]
fn test_display_command() {
    let mut uci = UCI::with_seed(1);
    let out = send(&mut uci, "d");
    assert!(out.contains("a b c d e f g h"));
    assert!(out.contains(&format!("Fen: {}", STARTING_FEN)));
    assert!(out.contains("State: playing"));
}

#[test]
fn test_eval_command() {
    let mut uci = UCI::with_seed(1);
    let out = send(&mut uci, "eval");
    assert!(out.starts_with("Evaluation: 0 cp"));
}

#[test]
fn test_perft_command() {
    let mut uci = UCI::with_seed(1);
    let out = send(&mut uci, "perft 2");
    assert!(out.starts_with("Nodes: 400 ("));
}

#[test]
fn test_undo_command() {
    let mut uci = UCI::with_seed(1);
    assert_eq!(send(&mut uci, "undo"), "nothing to undo\n");
    send(&mut uci, "position startpos moves d2d4");
    assert_eq!(send(&mut uci, "undo"), format!("Fen: {}\n", STARTING_FEN));
}
