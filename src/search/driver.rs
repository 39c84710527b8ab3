//! Iterative deepening driver.
//!
//! Repeatedly searches at increasing depth, committing each iteration that
//! finishes inside the time limits. A deeper attempt cut off by the clock
//! is discarded and the last committed result answers instead.

use std::time::{Duration, Instant};

use cozy_chess::Move;
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::cozy::Position;
use crate::search::cache::EvalCache;
use crate::search::clock::TurnClock;
use crate::search::negamax::{RootEval, Searcher};
use crate::EngineError;

#[derive(Debug, Clone, Copy)]
pub struct BotConfig {
    /// First deepening iteration.
    pub start_depth: u32,
    /// Stop deepening past this depth, keeping the last committed result.
    pub max_depth: Option<u32>,
    /// Seed for root tie-breaking; `None` always plays the first best move.
    pub seed: Option<u64>,
    /// Hard per-move time ceiling, independent of the host's budget.
    pub hard_ceiling: Duration,
    pub cache_entries: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            start_depth: 2,
            max_depth: None,
            seed: None,
            hard_ceiling: Duration::from_millis(4000),
            cache_entries: 1 << 16,
        }
    }
}

/// One bot instance. Configuration, evaluation cache and search state live
/// for a single game; a new game gets a new `Bot`.
pub struct Bot {
    pub cfg: BotConfig,
    searcher: Searcher,
    rng: Option<SmallRng>,
    committed_depth: Option<u32>,
    last_iteration_nodes: u64,
}

impl Default for Bot {
    fn default() -> Self {
        Self::new(BotConfig::default())
    }
}

impl Bot {
    pub fn new(cfg: BotConfig) -> Self {
        let searcher = Searcher::with_cache(EvalCache::with_capacity_entries(cfg.cache_entries));
        let rng = cfg.seed.map(SmallRng::seed_from_u64);
        Self {
            cfg,
            searcher,
            rng,
            committed_depth: None,
            last_iteration_nodes: 0,
        }
    }

    /// Total nodes visited over the bot's lifetime.
    pub fn nodes(&self) -> u64 {
        self.searcher.nodes
    }

    /// Nodes visited by the most recent deepening iteration alone.
    pub fn last_iteration_nodes(&self) -> u64 {
        self.last_iteration_nodes
    }

    /// Depth of the last iteration that finished inside the time limits
    /// during the most recent `think`. `None` when even the first iteration
    /// was cut off and its partial result had to stand in.
    pub fn committed_depth(&self) -> Option<u32> {
        self.committed_depth
    }

    /// Pick a move for the current position within the clock's budget.
    ///
    /// Deepens from `start_depth` until the result is final, the clock or
    /// the hard ceiling runs out, or `max_depth` is reached. The root
    /// position must have at least one legal move; a game-over root is the
    /// caller's precondition violation and surfaces as `NoLegalMoves`.
    pub fn think(&mut self, pos: &Position, clock: &TurnClock) -> Result<Move, EngineError> {
        let limit = match clock.remaining() {
            Some(rem) => rem.min(self.cfg.hard_ceiling),
            None => self.cfg.hard_ceiling,
        };
        let deadline = Instant::now() + limit;
        self.searcher.set_deadline(Some(deadline));

        let keep_ties = self.rng.is_some();
        let mut committed: Option<RootEval> = None;
        self.committed_depth = None;
        let mut depth = self
            .cfg
            .start_depth
            .max(1)
            .min(self.cfg.max_depth.unwrap_or(u32::MAX));
        loop {
            self.searcher.cache_mut().bump_generation();
            let nodes_before = self.searcher.nodes;
            let started = Instant::now();
            let result =
                self.searcher
                    .search_root(pos.board(), pos.repetition_history(), depth, keep_ties);
            let result = match result {
                Ok(r) => r,
                Err(e) => {
                    self.searcher.set_deadline(None);
                    return Err(e);
                }
            };
            let timed_out = clock.expired() || Instant::now() >= deadline;
            self.last_iteration_nodes = self.searcher.nodes - nodes_before;
            info!(
                "depth {} score {}cp nodes {} in {}ms line {}",
                depth,
                result.eval.score_cp,
                self.last_iteration_nodes,
                started.elapsed().as_millis(),
                format_line(&result.eval.line),
            );
            let is_final = result.eval.is_final;
            if timed_out {
                // A cut-off iteration is discarded; its shallow result only
                // stands in when nothing ever completed.
                if committed.is_none() {
                    committed = Some(result);
                }
                break;
            }
            committed = Some(result);
            self.committed_depth = Some(depth);
            if is_final {
                break;
            }
            if self.cfg.max_depth.is_some_and(|max| depth >= max) {
                break;
            }
            depth += 1;
        }
        self.searcher.set_deadline(None);

        let result = committed.ok_or(EngineError::NoLegalMoves)?;
        Ok(self.pick_root_move(result))
    }

    /// Equal-scoring root moves are interchangeable. With a seeded RNG the
    /// choice is uniform among them; otherwise the first best move stands.
    fn pick_root_move(&mut self, result: RootEval) -> Move {
        if let Some(rng) = self.rng.as_mut() {
            if result.tied.len() > 1 {
                let idx = rng.gen_range(0..result.tied.len());
                return result.tied[idx];
            }
        }
        // search_root guarantees a non-empty line.
        result.eval.line[0]
    }
}

fn format_line(line: &[Move]) -> String {
    line.iter()
        .map(|m| format!("{}", m))
        .collect::<Vec<_>>()
        .join(" ")
}
