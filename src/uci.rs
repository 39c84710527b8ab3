use std::io::{self, BufRead};
use std::time::Duration;

use crate::board::cozy::Position;
use crate::search::clock::TurnClock;
use crate::search::driver::Bot;

pub struct UciEngine {
    pos: Position,
    bot: Bot,
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UciEngine {
    pub fn new() -> Self {
        Self {
            pos: Position::startpos(),
            bot: Bot::default(),
        }
    }

    fn cmd_uci(&self) {
        println!("id name oakbot");
        println!("id author oakbot");
        println!("uciok");
    }

    fn cmd_isready(&self) {
        println!("readyok");
    }

    fn cmd_ucinewgame(&mut self) {
        // The cache lives one game; a new game gets a fresh bot.
        self.pos = Position::startpos();
        self.bot = Bot::new(self.bot.cfg);
    }

    fn cmd_position(&mut self, args: &str) {
        // Supports: 'position startpos [moves ...]' and 'position fen <fen> [moves ...]'
        let mut tokens = args.split_whitespace();
        match tokens.next() {
            Some("startpos") => {
                self.pos = Position::startpos();
                if let Some("moves") = tokens.next() {
                    for m in tokens {
                        if self.pos.play_uci(m).is_err() {
                            break;
                        }
                    }
                }
            }
            Some("fen") => {
                let fen_fields: Vec<&str> = tokens.by_ref().take(6).collect();
                if fen_fields.len() == 6 {
                    if let Ok(p) = Position::from_fen(&fen_fields.join(" ")) {
                        self.pos = p;
                    }
                }
                if let Some("moves") = tokens.next() {
                    for m in tokens {
                        if self.pos.play_uci(m).is_err() {
                            break;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn cmd_go(&mut self, args: &str) {
        let mut movetime: Option<u64> = None;
        let mut depth: Option<u32> = None;
        let mut tokens = args.split_whitespace();
        while let Some(tok) = tokens.next() {
            match tok {
                "depth" => {
                    depth = tokens.next().and_then(|s| s.parse::<u32>().ok());
                }
                "movetime" => {
                    movetime = tokens.next().and_then(|s| s.parse::<u64>().ok());
                }
                _ => {}
            }
        }
        let clock = match movetime {
            Some(ms) => TurnClock::with_budget(Duration::from_millis(ms)),
            None => TurnClock::start(),
        };
        let saved_depth = self.bot.cfg.max_depth;
        if depth.is_some() {
            self.bot.cfg.max_depth = depth;
        }
        let picked = self.bot.think(&self.pos, &clock);
        self.bot.cfg.max_depth = saved_depth;
        match picked {
            Ok(mv) => println!("bestmove {}", mv),
            Err(e) => {
                log::error!("search failed: {e}");
                println!("bestmove 0000");
            }
        }
    }

    pub fn run_loop(&mut self) {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(s) => s.trim().to_string(),
                Err(_) => break,
            };
            if line.is_empty() {
                continue;
            }
            if line == "uci" {
                self.cmd_uci();
                continue;
            }
            if line == "isready" {
                self.cmd_isready();
                continue;
            }
            if line == "ucinewgame" {
                self.cmd_ucinewgame();
                continue;
            }
            if line == "quit" {
                break;
            }
            if let Some(rest) = line.strip_prefix("position ") {
                self.cmd_position(rest);
                continue;
            }
            if line == "go" {
                self.cmd_go("");
                continue;
            }
            if let Some(rest) = line.strip_prefix("go ") {
                self.cmd_go(rest);
                continue;
            }
        }
    }
}
