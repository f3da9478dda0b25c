//! Tunable scheduling parameters.
//!
//! Defaults carry the reference behavior; callers that deserialize a partial
//! config get defaults for anything omitted. `validate` rejects configs that
//! would break the engine's bounded-output guarantees.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    pub difficulty: DifficultyConfig,
    pub ease: EaseConfig,
    pub interval: IntervalConfig,
    pub stability: StabilityConfig,
    pub mastery: MasteryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DifficultyConfig {
    /// Step subtracted after a correct answer.
    pub correct_step: f64,
    /// Step added after an incorrect answer; failures cost more than
    /// successes gain.
    pub incorrect_step: f64,
    /// Response time treated as neutral (neither penalty nor bonus).
    pub response_time_baseline_ms: f64,
    /// Milliseconds of deviation per unit of difficulty adjustment.
    pub response_time_divisor_ms: f64,
    /// Magnitude cap on the response-time adjustment, either direction.
    pub response_time_adjust_cap: f64,
    /// Difficulty drop per point of self-reported confidence above neutral.
    pub confidence_weight: f64,
    /// Difficulty rise per point of self-rated difficulty above neutral.
    pub self_rating_weight: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            correct_step: 0.1,
            incorrect_step: 0.2,
            response_time_baseline_ms: 3000.0,
            response_time_divisor_ms: 10000.0,
            response_time_adjust_cap: 0.1,
            confidence_weight: 0.05,
            self_rating_weight: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EaseConfig {
    pub base: f64,
    pub min: f64,
    pub max: f64,
    /// Bonus per point of self-reported confidence on a correct answer.
    pub confidence_bonus_per_unit: f64,
    /// Failure penalty is `base - linear * d + quadratic * d^2` where `d` is
    /// the updated difficulty: harder items are expected to be missed, so
    /// the penalty softens as difficulty rises.
    pub fail_penalty_base: f64,
    pub fail_penalty_linear: f64,
    pub fail_penalty_quadratic: f64,
    pub high_accuracy_threshold: f64,
    pub high_accuracy_bonus: f64,
    pub low_accuracy_threshold: f64,
    pub low_accuracy_penalty: f64,
}

impl Default for EaseConfig {
    fn default() -> Self {
        Self {
            base: 2.5,
            min: 1.3,
            max: 5.0,
            confidence_bonus_per_unit: 0.02,
            fail_penalty_base: 0.8,
            fail_penalty_linear: 0.28,
            fail_penalty_quadratic: 0.02,
            high_accuracy_threshold: 0.8,
            high_accuracy_bonus: 0.05,
            low_accuracy_threshold: 0.6,
            low_accuracy_penalty: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntervalConfig {
    /// Interval while an item repeats inside the learning phase.
    pub learning_repeat_days: u32,
    /// Encounters required before a learning item graduates to review.
    pub graduating_encounters: u32,
    /// Base days multiplied by the ease factor at graduation.
    pub graduation_base_days: f64,
    /// Interval at or above which a review item can become mastered.
    pub mastery_threshold_days: u32,
    /// Encounters required before a review item can become mastered.
    pub mastery_min_encounters: u32,
    /// Ease factor ceiling applied to already-mastered items.
    pub mastered_ease_cap: f64,
    /// Hard ceiling on mastered-item intervals.
    pub max_interval_days: u32,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            learning_repeat_days: 3,
            graduating_encounters: 3,
            graduation_base_days: 6.0,
            mastery_threshold_days: 30,
            mastery_min_encounters: 5,
            mastered_ease_cap: 2.0,
            max_interval_days: 180,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StabilityConfig {
    pub min: f64,
    pub max: f64,
    /// Base gain on a correct answer.
    pub correct_gain: f64,
    /// Responses faster than this window earn a stability bonus.
    pub fast_response_window_ms: f64,
    /// Bonus for an instantaneous response; scales down linearly to zero at
    /// the window edge.
    pub fast_response_bonus_cap: f64,
    /// Days of earned interval per unit of interval bonus.
    pub interval_bonus_unit_days: f64,
    pub interval_bonus_per_unit: f64,
    pub interval_bonus_cap: f64,
    /// Fraction of stability retained after a failure.
    pub failure_retention: f64,
    /// Exponential decay rate for the retrievability forecast (ln 2, so
    /// `stability * (1 + difficulty)` reads as a half-life in days).
    pub decay_rate: f64,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 5.0,
            correct_gain: 0.1,
            fast_response_window_ms: 5000.0,
            fast_response_bonus_cap: 0.1,
            interval_bonus_unit_days: 30.0,
            interval_bonus_per_unit: 0.1,
            interval_bonus_cap: 0.2,
            failure_retention: 0.8,
            decay_rate: 0.693,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MasteryConfig {
    /// Encounters per unit of experience bonus.
    pub experience_unit_encounters: f64,
    pub experience_bonus_cap: f64,
    /// Phase weights gate how much raw accuracy is trusted.
    pub phase_weight_new: f64,
    pub phase_weight_learning: f64,
    pub phase_weight_review: f64,
    pub phase_weight_mastered: f64,
    /// Stability above this baseline contributes positively, below it
    /// subtracts.
    pub stability_baseline: f64,
    pub stability_weight: f64,
}

impl Default for MasteryConfig {
    fn default() -> Self {
        Self {
            experience_unit_encounters: 20.0,
            experience_bonus_cap: 0.2,
            phase_weight_new: 0.1,
            phase_weight_learning: 0.3,
            phase_weight_review: 0.7,
            phase_weight_mastered: 1.0,
            stability_baseline: 1.0,
            stability_weight: 0.1,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), String> {
        // DifficultyConfig
        if self.difficulty.correct_step < 0.0 || self.difficulty.incorrect_step < 0.0 {
            return Err("difficulty steps must be >= 0".to_string());
        }
        if self.difficulty.response_time_divisor_ms <= 0.0 {
            return Err("difficulty.response_time_divisor_ms must be > 0".to_string());
        }
        if self.difficulty.response_time_adjust_cap < 0.0 {
            return Err("difficulty.response_time_adjust_cap must be >= 0".to_string());
        }

        // EaseConfig
        if self.ease.min <= 0.0 || self.ease.min >= self.ease.max {
            return Err("ease.min must be > 0 and < ease.max".to_string());
        }
        if !(self.ease.min..=self.ease.max).contains(&self.ease.base) {
            return Err("ease.base must be within [ease.min, ease.max]".to_string());
        }
        if !(0.0..=1.0).contains(&self.ease.high_accuracy_threshold)
            || !(0.0..=1.0).contains(&self.ease.low_accuracy_threshold)
        {
            return Err("ease accuracy thresholds must be in [0,1]".to_string());
        }
        if self.ease.low_accuracy_threshold > self.ease.high_accuracy_threshold {
            return Err(
                "ease.low_accuracy_threshold must be <= ease.high_accuracy_threshold".to_string(),
            );
        }

        // IntervalConfig
        if self.interval.learning_repeat_days == 0 {
            return Err("interval.learning_repeat_days must be >= 1".to_string());
        }
        if self.interval.graduating_encounters == 0 {
            return Err("interval.graduating_encounters must be >= 1".to_string());
        }
        if self.interval.graduation_base_days <= 0.0 {
            return Err("interval.graduation_base_days must be > 0".to_string());
        }
        if self.interval.mastered_ease_cap <= 0.0 {
            return Err("interval.mastered_ease_cap must be > 0".to_string());
        }
        if self.interval.max_interval_days < self.interval.mastery_threshold_days {
            return Err(
                "interval.max_interval_days must be >= interval.mastery_threshold_days".to_string(),
            );
        }

        // StabilityConfig
        if self.stability.min <= 0.0 || self.stability.min >= self.stability.max {
            return Err("stability.min must be > 0 and < stability.max".to_string());
        }
        if self.stability.fast_response_window_ms <= 0.0 {
            return Err("stability.fast_response_window_ms must be > 0".to_string());
        }
        if self.stability.interval_bonus_unit_days <= 0.0 {
            return Err("stability.interval_bonus_unit_days must be > 0".to_string());
        }
        if self.stability.failure_retention <= 0.0 || self.stability.failure_retention > 1.0 {
            return Err("stability.failure_retention must be in (0,1]".to_string());
        }
        if self.stability.decay_rate <= 0.0 {
            return Err("stability.decay_rate must be > 0".to_string());
        }

        // MasteryConfig
        if self.mastery.experience_unit_encounters <= 0.0 {
            return Err("mastery.experience_unit_encounters must be > 0".to_string());
        }
        for (name, weight) in [
            ("phase_weight_new", self.mastery.phase_weight_new),
            ("phase_weight_learning", self.mastery.phase_weight_learning),
            ("phase_weight_review", self.mastery.phase_weight_review),
            ("phase_weight_mastered", self.mastery.phase_weight_mastered),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(format!("mastery.{name} must be in [0,1]"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SchedulerConfig::default();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = SchedulerConfig::default();
        cfg.ease.min = 10.0;
        assert!(cfg.validate().is_err());

        let mut cfg = SchedulerConfig::default();
        cfg.mastery.phase_weight_review = 2.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let cfg: SchedulerConfig =
            serde_json::from_str(r#"{"interval":{"maxIntervalDays":365}}"#).unwrap();
        assert_eq!(cfg.interval.max_interval_days, 365);
        assert_eq!(cfg.interval.mastery_threshold_days, 30);
        assert!(cfg.validate().is_ok());
    }
}
