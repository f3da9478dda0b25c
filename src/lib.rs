//! Spaced-repetition scheduling engine.
//!
//! A pure transform from (current item state, review outcome, now) to the
//! next item state: updated difficulty, memory stability, forecast
//! retrievability, mastery estimate, learning phase, and the next review
//! date. The engine performs no I/O and never reads a clock; the caller
//! supplies `now` explicitly and owns persistence of the returned snapshot,
//! including serializing writes per item to avoid lost updates.
//!
//! ## Modules
//! - `types`: item learning state, review outcomes, learning phases
//! - `config`: tunable scheduling parameters with validated defaults
//! - `engine`: the review transform, state initialization, due-item selection
//! - `error`: structural validation failures for the checked entry point

pub mod config;
pub mod engine;
pub mod error;
pub mod types;

pub use config::SchedulerConfig;
pub use engine::{
    compute_next_state, compute_next_state_checked, initialize_item_state, select_due,
};
pub use error::EngineError;
pub use types::{ItemLearningState, LearningPhase, ReviewOutcome};
