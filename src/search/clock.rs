use std::time::{Duration, Instant};

/// Wall clock for a single move. Polled by the search, never blocks.
#[derive(Clone, Copy, Debug)]
pub struct TurnClock {
    started: Instant,
    budget: Option<Duration>,
}

impl TurnClock {
    /// A clock with no budget; only the engine's hard ceiling applies.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            budget: None,
        }
    }

    pub fn with_budget(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget: Some(budget),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    pub fn expired(&self) -> bool {
        self.budget.map_or(false, |b| self.elapsed() >= b)
    }

    /// Budget left this turn, if one was set.
    pub fn remaining(&self) -> Option<Duration> {
        self.budget.map(|b| b.saturating_sub(self.elapsed()))
    }
}
