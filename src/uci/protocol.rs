use crate::core::moves::Move;
use crate::engine::eval::evaluate;
use crate::engine::legality::LegalityEngine;
use crate::engine::movegen::perft;
use crate::engine::search::{Difficulty, SearchEngine, SearchOutcome};
use log::{info, warn};
use std::io::{self, BufRead, Write};
use vampirc_uci::uci::UciSearchControl;
use vampirc_uci::{UciMessage, parser};

pub struct UCI {
    rules: LegalityEngine,
    engine: SearchEngine,
}

impl UCI {
    pub fn new() -> Self {
        UCI {
            rules: LegalityEngine::new(),
            engine: SearchEngine::new(),
        }
    }

    /// Front end with reproducible tie-breaks
    pub fn with_seed(seed: u64) -> Self {
        UCI {
            rules: LegalityEngine::new(),
            engine: SearchEngine::with_seed(seed),
        }
    }

    /// Current game (for tests).
    pub fn rules(&self) -> &LegalityEngine {
        &self.rules
    }

    pub fn difficulty(&self) -> Difficulty {
        self.engine.difficulty()
    }

    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        self.run_with(stdin.lock(), &mut stdout)
    }

    /// Process commands from `input` until `quit` or end of input
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let keep_going = self.handle_line(&line, out)?;
            out.flush()?;
            if !keep_going {
                break;
            }
        }
        Ok(())
    }

    /// Handle one command line. Returns false on `quit`.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<bool> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(true);
        }

        match parser::parse_one(line) {
            UciMessage::Uci => self.cmd_uci(out)?,
            UciMessage::IsReady => writeln!(out, "readyok")?,
            UciMessage::SetOption { name, value } => {
                self.apply_setoption(name.trim(), value.as_deref());
            }
            UciMessage::UciNewGame => self.cmd_ucinewgame(),
            UciMessage::Position { startpos, fen, moves } => {
                let fen_str = fen.as_ref().map(|f| f.as_str());
                let move_strs: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                let refs: Vec<&str> = move_strs.iter().map(String::as_str).collect();
                self.apply_position(startpos, fen_str, &refs);
            }
            UciMessage::Go { search_control, .. } => {
                let depth = go_depth(search_control.as_ref());
                self.do_go(depth, out)?;
            }
            // Searches are synchronous, nothing to interrupt
            UciMessage::Stop => {}
            UciMessage::Quit => return Ok(false),
            UciMessage::Unknown(ref s, _) => {
                let parts: Vec<&str> = s.split_whitespace().collect();
                if let Some(&first) = parts.first() {
                    match first {
                        "d" | "display" => self.cmd_display(out)?,
                        "eval" => self.cmd_eval(out)?,
                        "perft" => self.cmd_perft(&parts, out)?,
                        "undo" => self.cmd_undo(out)?,
                        _ => info!("ignoring unknown command '{}'", s.trim()),
                    }
                }
            }
            _ => {}
        }
        Ok(true)
    }

    fn cmd_uci<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name mailbox_chess {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "id author mailbox_chess developers")?;
        writeln!(out)?;
        writeln!(
            out,
            "option name Difficulty type combo default {} var Easy var Medium var Hard var Expert",
            Difficulty::default()
        )?;
        writeln!(out, "option name Seed type spin default 0 min 0 max 2147483647")?;
        writeln!(out, "uciok")
    }

    fn apply_setoption(&mut self, name: &str, value: Option<&str>) {
        let opt = name.to_lowercase().replace([' ', '_'], "");
        let value = value.unwrap_or("").trim();
        match opt.as_str() {
            "difficulty" => match value.parse::<Difficulty>() {
                Ok(difficulty) => {
                    info!("difficulty set to {}", difficulty);
                    self.engine.set_difficulty(difficulty);
                }
                Err(err) => warn!("{}", err),
            },
            "seed" => match value.parse::<u64>() {
                Ok(seed) => {
                    info!("tie-break seed set to {}", seed);
                    self.engine.reseed(seed);
                }
                Err(_) => warn!("invalid seed '{}'", value),
            },
            _ => info!("ignoring unknown option '{}'", name),
        }
    }

    pub fn cmd_ucinewgame(&mut self) {
        info!("new game");
        self.rules.reset();
    }

    /// Set up a position then play `move_strs`, stopping at the first illegal move.
    fn apply_position(&mut self, startpos: bool, fen: Option<&str>, move_strs: &[&str]) {
        if startpos {
            self.rules = LegalityEngine::new();
        } else if let Some(fen_str) = fen {
            match LegalityEngine::from_fen(fen_str) {
                Ok(rules) => self.rules = rules,
                Err(err) => {
                    warn!("{}", err);
                    return;
                }
            }
        }

        for &s in move_strs {
            let played = Move::from_uci(s).is_some_and(|mv| self.rules.make_move(mv));
            if !played {
                warn!("illegal move {} in position command", s);
                break;
            }
        }
        info!("position {}", self.rules.to_fen());
    }

    /// Search the current position and print the result.
    ///
    /// `depth` overrides the difficulty tier for this search only.
    fn do_go<W: Write>(&mut self, depth: Option<u8>, out: &mut W) -> io::Result<()> {
        let color = self.rules.current_turn();
        let outcome = match depth {
            Some(d) => self.engine.search_depth(&self.rules, color, d),
            None => self.engine.search(&self.rules, color),
        };
        if !outcome.best_move.is_null() {
            writeln!(
                out,
                "info depth {} score {} nodes {}",
                outcome.depth,
                format_score(&outcome),
                outcome.stats.nodes
            )?;
        }
        writeln!(out, "bestmove {}", outcome.best_move)
    }

    fn cmd_display<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.rules.board())?;
        writeln!(out, "Fen: {}", self.rules.to_fen())?;
        writeln!(out, "State: {}", self.rules.game_state())
    }

    fn cmd_eval<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let turn = self.rules.current_turn();
        let score = evaluate(self.rules.board(), turn);
        writeln!(out, "Evaluation: {} cp", score)?;
        writeln!(out, "(Positive = {} advantage)", turn)
    }

    fn cmd_perft<W: Write>(&self, parts: &[&str], out: &mut W) -> io::Result<()> {
        let depth: u32 = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);
        let start = std::time::Instant::now();
        let nodes = perft(self.rules.board(), self.rules.current_turn(), depth);
        let elapsed = start.elapsed();
        let nps = if elapsed.as_millis() > 0 {
            nodes as u128 * 1000 / elapsed.as_millis()
        } else {
            0
        };
        writeln!(out, "Nodes: {} ({} ms, {} nps)", nodes, elapsed.as_millis(), nps)
    }

    fn cmd_undo<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if self.rules.undo_move() {
            writeln!(out, "Fen: {}", self.rules.to_fen())
        } else {
            writeln!(out, "nothing to undo")
        }
    }
}

/// `go depth N` limited to the supported tiers; everything else searches at the configured tier
fn go_depth(search_control: Option<&UciSearchControl>) -> Option<u8> {
    let max = Difficulty::Expert.depth();
    search_control
        .and_then(|sc| sc.depth)
        .map(|d| d.clamp(1, max))
}

fn format_score(outcome: &SearchOutcome) -> String {
    match outcome.mate_in() {
        Some(n) => format!("mate {}", n),
        None => format!("cp {}", outcome.score),
    }
}

impl Default for UCI {
    fn default() -> Self {
        Self::new()
    }
}
