use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use oakbot::board::cozy::Position;
use oakbot::search::clock::TurnClock;
use oakbot::search::driver::{Bot, BotConfig};
use oakbot::uci::UciEngine;

#[derive(Parser, Debug)]
#[command(version, about = "Chess move selection with iterative-deepening alpha-beta search", long_about = None)]
struct Args {
    /// Run as a UCI engine on stdin/stdout
    #[arg(long)]
    uci: bool,

    /// Position to analyze (startpos when omitted)
    #[arg(long)]
    fen: Option<String>,

    /// Per-move time budget in milliseconds
    #[arg(long, default_value_t = 4000)]
    movetime: u64,

    /// Cap the deepening at this depth
    #[arg(long)]
    depth: Option<u32>,

    /// Seed for tie-breaking among equally scored root moves
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.uci {
        let mut engine = UciEngine::new();
        engine.run_loop();
        return Ok(());
    }

    let pos = match &args.fen {
        Some(fen) => {
            Position::from_fen(fen).with_context(|| format!("bad position '{fen}'"))?
        }
        None => Position::startpos(),
    };

    let cfg = BotConfig {
        max_depth: args.depth,
        seed: args.seed,
        ..BotConfig::default()
    };
    let mut bot = Bot::new(cfg);
    let clock = TurnClock::with_budget(Duration::from_millis(args.movetime));
    let mv = bot.think(&pos, &clock)?;
    println!(
        "bestmove {} ({} nodes in {} ms)",
        mv,
        bot.nodes(),
        clock.elapsed_millis()
    );
    Ok(())
}
