use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty assigned to an item on first exposure.
pub const INITIAL_DIFFICULTY: f64 = 0.5;

/// Memory-trace stability assigned on first exposure.
pub const INITIAL_STABILITY: f64 = 1.0;

/// Recall-probability estimate assigned on first exposure.
pub const INITIAL_RETRIEVABILITY: f64 = 0.9;

/// Days until the first scheduled review of a new item.
pub const INITIAL_INTERVAL_DAYS: u32 = 1;

/// Scheduling state for one learning item, per learner.
///
/// Every field is replaced on each review; the engine never retains the
/// previous value, so the caller must atomically swap the stored snapshot
/// for the returned one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemLearningState {
    /// Composite estimate of how well-known the item is (0-1).
    pub mastery_level: f64,
    /// Total review attempts, including the one just applied.
    pub times_encountered: u32,
    /// Attempts answered correctly; never exceeds `times_encountered`.
    pub times_correct: u32,
    /// Intrinsic difficulty estimate (0-1, higher is harder).
    pub difficulty: f64,
    /// Memory-trace strength (0.1-5.0); larger decays slower.
    pub stability: f64,
    /// Forecast probability of recall at the next scheduled review (0-1).
    pub retrievability: f64,
    /// Days until the next scheduled review, never below 1.
    pub review_interval: u32,
    /// `now + review_interval` days at the moment of computation.
    pub next_review: DateTime<Utc>,
    pub learning_phase: LearningPhase,
}

impl ItemLearningState {
    /// State for an item at first exposure. Called once per (learner, item);
    /// the persistence layer is responsible for not re-initializing an
    /// existing record.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            mastery_level: 0.0,
            times_encountered: 0,
            times_correct: 0,
            difficulty: INITIAL_DIFFICULTY,
            stability: INITIAL_STABILITY,
            retrievability: INITIAL_RETRIEVABILITY,
            review_interval: INITIAL_INTERVAL_DAYS,
            next_review: now + Duration::days(i64::from(INITIAL_INTERVAL_DAYS)),
            learning_phase: LearningPhase::New,
        }
    }
}

/// Coarse progression bucket gating interval growth and how much raw
/// accuracy is trusted toward mastery. Ordered `New -> Learning -> Review ->
/// Mastered`; any failure drops the item back to `Learning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningPhase {
    New,
    Learning,
    Review,
    Mastered,
}

/// One review attempt. Ephemeral input, not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub is_correct: bool,
    pub response_time_ms: i64,
    /// Self-reported recall confidence, nominal range [1,5].
    pub confidence: f64,
    /// Self-reported perceived difficulty, nominal range [1,5].
    pub difficulty_rating: f64,
}

impl Default for ReviewOutcome {
    fn default() -> Self {
        Self {
            is_correct: false,
            response_time_ms: 3000,
            confidence: 3.0,
            difficulty_rating: 3.0,
        }
    }
}
