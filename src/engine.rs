//! The review transform.
//!
//! `compute_next_state` maps (current item state, review outcome, now) to
//! the next item state through five staged calculations executed in fixed
//! order: encounter bookkeeping, difficulty update, ephemeral ease factor,
//! interval/phase transition, then stability, retrievability, and mastery.
//! Later stages depend on earlier results, so the order is load-bearing.
//!
//! Every stage clamps its result; arbitrary finite inputs produce bounded
//! output. `compute_next_state_checked` instead rejects structurally
//! inconsistent input up front.

use chrono::{DateTime, Duration, Utc};

use crate::config::{
    DifficultyConfig, EaseConfig, IntervalConfig, MasteryConfig, SchedulerConfig, StabilityConfig,
};
use crate::error::EngineError;
use crate::types::{ItemLearningState, LearningPhase, ReviewOutcome};

/// Neutral midpoint of the self-reported [1,5] scales.
const NEUTRAL_SELF_REPORT: f64 = 3.0;

/// State for an item at first exposure. `now` is an explicit argument; the
/// engine never reads a system clock.
pub fn initialize_item_state(now: DateTime<Utc>) -> ItemLearningState {
    ItemLearningState::new(now)
}

/// Apply one review outcome to an item's scheduling state.
///
/// Pure and total: identical arguments yield bit-identical results, and all
/// bounded fields stay within their documented ranges. Out-of-range
/// self-reports degrade gracefully through clamping rather than failing.
pub fn compute_next_state(
    current: &ItemLearningState,
    outcome: &ReviewOutcome,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> ItemLearningState {
    let times_encountered = current.times_encountered.saturating_add(1);
    let times_correct = current
        .times_correct
        .saturating_add(u32::from(outcome.is_correct))
        .min(times_encountered);
    let accuracy = f64::from(times_correct) / f64::from(times_encountered);

    let difficulty = update_difficulty(current.difficulty, outcome, &config.difficulty);
    let ease = ease_factor(outcome, difficulty, accuracy, &config.ease);
    let (review_interval, learning_phase) = next_interval_and_phase(
        current.learning_phase,
        current.review_interval,
        outcome.is_correct,
        times_encountered,
        ease,
        &config.interval,
    );
    let stability = update_stability(current.stability, outcome, review_interval, &config.stability);
    let retrievability =
        forecast_retrievability(stability, difficulty, review_interval, &config.stability);
    let mastery_level = estimate_mastery(
        accuracy,
        times_encountered,
        learning_phase,
        stability,
        &config.mastery,
    );

    if learning_phase != current.learning_phase {
        tracing::debug!(
            from = ?current.learning_phase,
            to = ?learning_phase,
            interval_days = review_interval,
            "learning phase transition"
        );
    }

    ItemLearningState {
        mastery_level,
        times_encountered,
        times_correct,
        difficulty,
        stability,
        retrievability,
        review_interval,
        next_review: now + Duration::days(i64::from(review_interval)),
        learning_phase,
    }
}

/// `compute_next_state` behind a fail-fast structural check.
///
/// Rejects inconsistent counters, non-finite numbers, and negative response
/// times before stage 1 runs. Never mutates the input to repair it.
pub fn compute_next_state_checked(
    current: &ItemLearningState,
    outcome: &ReviewOutcome,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> Result<ItemLearningState, EngineError> {
    validate_state(current)?;
    validate_outcome(outcome)?;
    Ok(compute_next_state(current, outcome, now, config))
}

/// Order-preserving filter of the items due at `now` (inclusive boundary).
pub fn select_due<'a>(
    items: &'a [ItemLearningState],
    now: DateTime<Utc>,
) -> Vec<&'a ItemLearningState> {
    items.iter().filter(|item| item.next_review <= now).collect()
}

fn validate_state(state: &ItemLearningState) -> Result<(), EngineError> {
    if state.times_correct > state.times_encountered {
        return Err(EngineError::InconsistentCounts {
            correct: state.times_correct,
            encountered: state.times_encountered,
        });
    }
    if state.review_interval == 0 {
        return Err(EngineError::ZeroInterval);
    }
    for (field, value) in [
        ("masteryLevel", state.mastery_level),
        ("difficulty", state.difficulty),
        ("stability", state.stability),
        ("retrievability", state.retrievability),
    ] {
        if !value.is_finite() {
            return Err(EngineError::NonFinite { field, value });
        }
    }
    Ok(())
}

fn validate_outcome(outcome: &ReviewOutcome) -> Result<(), EngineError> {
    if outcome.response_time_ms < 0 {
        return Err(EngineError::NegativeResponseTime(outcome.response_time_ms));
    }
    for (field, value) in [
        ("confidence", outcome.confidence),
        ("difficultyRating", outcome.difficulty_rating),
    ] {
        if !value.is_finite() {
            return Err(EngineError::NonFinite { field, value });
        }
    }
    Ok(())
}

/// Stage 2: intrinsic difficulty drift. Failures cost more than successes
/// gain; response time and both self-reports nudge the estimate.
fn update_difficulty(difficulty: f64, outcome: &ReviewOutcome, cfg: &DifficultyConfig) -> f64 {
    let step = if outcome.is_correct {
        -cfg.correct_step
    } else {
        cfg.incorrect_step
    };
    let time_adjust = ((outcome.response_time_ms as f64 - cfg.response_time_baseline_ms)
        / cfg.response_time_divisor_ms)
        .clamp(-cfg.response_time_adjust_cap, cfg.response_time_adjust_cap);

    (difficulty + step + time_adjust
        - (outcome.confidence - NEUTRAL_SELF_REPORT) * cfg.confidence_weight
        + (outcome.difficulty_rating - NEUTRAL_SELF_REPORT) * cfg.self_rating_weight)
        .clamp(0.0, 1.0)
}

/// Stage 3: per-call interval-growth multiplier. Not persisted; recomputed
/// from the updated difficulty and lifetime accuracy on every review.
fn ease_factor(outcome: &ReviewOutcome, difficulty: f64, accuracy: f64, cfg: &EaseConfig) -> f64 {
    let mut ease = cfg.base;
    if outcome.is_correct {
        ease += cfg.confidence_bonus_per_unit * outcome.confidence;
    } else {
        ease -= cfg.fail_penalty_base - cfg.fail_penalty_linear * difficulty
            + cfg.fail_penalty_quadratic * difficulty * difficulty;
    }
    if accuracy > cfg.high_accuracy_threshold {
        ease += cfg.high_accuracy_bonus;
    }
    if accuracy < cfg.low_accuracy_threshold {
        ease -= cfg.low_accuracy_penalty;
    }
    ease.clamp(cfg.min, cfg.max)
}

/// Stage 4: interval and phase state machine. Any failure resets to
/// short-interval relearning regardless of prior phase; success transitions
/// depend on the phase before this review.
fn next_interval_and_phase(
    phase: LearningPhase,
    previous_interval: u32,
    is_correct: bool,
    times_encountered: u32,
    ease: f64,
    cfg: &IntervalConfig,
) -> (u32, LearningPhase) {
    if !is_correct {
        return (1, LearningPhase::Learning);
    }

    let (days, next_phase) = match phase {
        LearningPhase::New => (1, LearningPhase::Learning),
        LearningPhase::Learning => {
            if times_encountered < cfg.graduating_encounters {
                (cfg.learning_repeat_days, LearningPhase::Learning)
            } else {
                (
                    round_days(cfg.graduation_base_days * ease),
                    LearningPhase::Review,
                )
            }
        }
        LearningPhase::Review => {
            let days = round_days(f64::from(previous_interval) * ease);
            if days >= cfg.mastery_threshold_days && times_encountered >= cfg.mastery_min_encounters
            {
                (days, LearningPhase::Mastered)
            } else {
                (days, LearningPhase::Review)
            }
        }
        LearningPhase::Mastered => {
            let days =
                round_days(f64::from(previous_interval) * ease.min(cfg.mastered_ease_cap));
            (days.min(cfg.max_interval_days), LearningPhase::Mastered)
        }
    };

    (days.max(1), next_phase)
}

fn round_days(days: f64) -> u32 {
    // Saturating float-to-int cast; inputs are clamped upstream so this only
    // guards the extremes.
    days.round() as u32
}

/// Stage 5a: memory-trace strength. Fast responses and longer earned
/// intervals both reinforce, each separately capped; a failure decays the
/// trace immediately.
fn update_stability(
    stability: f64,
    outcome: &ReviewOutcome,
    interval_days: u32,
    cfg: &StabilityConfig,
) -> f64 {
    if outcome.is_correct {
        let time_bonus = ((cfg.fast_response_window_ms - outcome.response_time_ms as f64)
            / cfg.fast_response_window_ms
            * cfg.fast_response_bonus_cap)
            .max(0.0);
        let interval_bonus = (f64::from(interval_days) / cfg.interval_bonus_unit_days
            * cfg.interval_bonus_per_unit)
            .min(cfg.interval_bonus_cap);
        (stability + cfg.correct_gain + time_bonus + interval_bonus).clamp(cfg.min, cfg.max)
    } else {
        (stability * cfg.failure_retention).clamp(cfg.min, cfg.max)
    }
}

/// Stage 5b: exponential-decay recall forecast. The decay horizon is the
/// newly scheduled interval, so this estimates recall probability at the
/// next review rather than at the present moment.
fn forecast_retrievability(
    stability: f64,
    difficulty: f64,
    interval_days: u32,
    cfg: &StabilityConfig,
) -> f64 {
    let decay = cfg.decay_rate / (stability * (1.0 + difficulty));
    (-decay * f64::from(interval_days)).exp().clamp(0.0, 1.0)
}

/// Stage 6: composite mastery estimate. The phase weight gates how much raw
/// accuracy is trusted; stability above its initial baseline adds.
fn estimate_mastery(
    accuracy: f64,
    times_encountered: u32,
    phase: LearningPhase,
    stability: f64,
    cfg: &MasteryConfig,
) -> f64 {
    let experience = (f64::from(times_encountered) / cfg.experience_unit_encounters)
        .min(cfg.experience_bonus_cap);
    let weight = match phase {
        LearningPhase::New => cfg.phase_weight_new,
        LearningPhase::Learning => cfg.phase_weight_learning,
        LearningPhase::Review => cfg.phase_weight_review,
        LearningPhase::Mastered => cfg.phase_weight_mastered,
    };

    ((accuracy + experience) * weight + (stability - cfg.stability_baseline) * cfg.stability_weight)
        .clamp(0.0, 1.0)
}
