mod engine;
mod options;

pub use engine::{Direction, Outcome, Phase, Tick, TimerEngine};
pub use options::TimerOptions;
