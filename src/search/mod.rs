pub mod cache;
pub mod clock;
pub mod driver;
pub mod eval;
pub mod negamax;
pub mod repetition;
