//! The terminal driver (spec.md §6): board printing, move reading, the
//! `undo` token, and an `ai <depth>` extension for exercising `Search` from
//! the one binary this crate ships. Grounded in the teacher's
//! `ltp_server/mod.rs` REPL loop and `ltp_server/options.rs` (clap) config.

use std::io::Write;

use clap::Parser;

use crate::prelude::*;
use crate::search::Search;

/// CLI configuration (spec.md §2 ambient addition), mirroring the teacher's
/// `LTPServerOptions`.
#[derive(Clone, Debug, Parser)]
pub struct EngineOptions {
    /// Search depth used by the `ai` command when none is given explicitly.
    #[arg(short, long, default_value_t = 4)]
    pub depth: u32,

    #[arg(short, long)]
    pub log_level: Option<String>,
}

/// Owns the one live `Game` and drives it from stdin (spec.md §6). Exit
/// codes are the caller's concern (`main.rs`): this loop only ever returns
/// `Err` on I/O failure, per spec.md §6 "non-zero only on I/O failure".
pub struct Driver {
    game: Game,
    search: Search,
    default_depth: u32,
}

impl Driver {
    pub fn new(default_depth: u32) -> Driver {
        Driver { game: Game::default(), search: Search::new(), default_depth }
    }

    pub fn run(&mut self) -> Result<()> {
        print!("{}", self.game.pretty());
        std::io::stdout().flush()?;

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let mut line = String::new();
            if std::io::stdin().read_line(&mut line)? == 0 {
                return Ok(()); // EOF: normal termination.
            }
            let cmd = line.trim();
            if cmd.is_empty() {
                continue;
            }
            if cmd.eq_ignore_ascii_case("quit") || cmd.eq_ignore_ascii_case("exit") {
                return Ok(());
            }

            match self.apply(cmd) {
                Ok(()) => {
                    print!("{}", self.game.pretty());
                    match self.game.game_state() {
                        GameState::RedWon => println!("RED_WON"),
                        GameState::BlackWon => println!("BLACK_WON"),
                        GameState::Ongoing => {}
                    }
                    std::io::stdout().flush()?;
                }
                Err(msg) => {
                    log::warn!("rejected command {cmd:?}: {msg}");
                    println!("{msg}");
                    std::io::stdout().flush()?;
                }
            }
        }
    }

    /// Dispatches one command line. A rejection is reported as a plain
    /// string, never a panic — per spec.md §7, only invariant violations are
    /// fatal, and a mistyped command or illegal move is an expected rejection
    /// that re-prompts without changing state.
    fn apply(&mut self, cmd: &str) -> std::result::Result<(), String> {
        if cmd.eq_ignore_ascii_case("undo") {
            return if self.game.undo_move() { Ok(()) } else { Err("nothing to undo".to_string()) };
        }

        if let Some(rest) = cmd.strip_prefix("ai") {
            let rest = rest.trim();
            let depth = if rest.is_empty() {
                self.default_depth
            } else {
                rest.parse::<u32>().map_err(|e| format!("bad depth {rest:?}: {e}"))?
            };
            let result = self.search.search(&mut self.game, depth, i32::MIN, i32::MAX);
            return match result.best_move {
                Some(mv) if self.game.make_move(mv.from, mv.to) => Ok(()),
                Some(_) => Err("search proposed an illegal move".to_string()),
                None => Err("no legal moves for the active side".to_string()),
            };
        }

        let mv: MoveNotation = cmd.parse().map_err(|e: Error| e.to_string())?;
        if self.game.make_move(mv.from, mv.to) {
            Ok(())
        } else {
            Err(format!("illegal move: {cmd}"))
        }
    }
}
