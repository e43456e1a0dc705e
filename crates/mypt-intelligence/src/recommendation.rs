// ABOUTME: Heuristic calorie/step recommendation used when the text-generation service fails
// ABOUTME: Goal adjustment policy and days-to-target arithmetic shared by prompt and progress views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mypt_core::constants::{fallback, progress};
use mypt_core::models::AiSummaryResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a suggested goal weight may replace the current one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalAdjustmentPolicy {
    /// Keep `max(suggested, current)`; the goal is never lowered
    #[default]
    NeverLower,
    /// Take the suggestion as-is
    Unrestricted,
}

impl GoalAdjustmentPolicy {
    /// Resolve the goal weight to store given a suggestion
    ///
    /// A non-finite suggestion always keeps the current goal.
    #[must_use]
    pub fn apply(self, suggested: f64, current: f64) -> f64 {
        if !suggested.is_finite() {
            return current;
        }
        match self {
            Self::NeverLower => suggested.max(current),
            Self::Unrestricted => suggested,
        }
    }

    /// Configuration string for this policy
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NeverLower => "never_lower",
            Self::Unrestricted => "unrestricted",
        }
    }
}

impl FromStr for GoalAdjustmentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "never_lower" => Ok(Self::NeverLower),
            "unrestricted" => Ok(Self::Unrestricted),
            other => Err(format!(
                "unknown goal policy '{other}' (expected never_lower or unrestricted)"
            )),
        }
    }
}

impl fmt::Display for GoalAdjustmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round to the nearest integer with halves going toward positive infinity
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Deterministic targets derived from the gap between current and goal weight
///
/// Each kilogram above goal removes calories and adds steps; the step target
/// is capped. The goal weight is returned unchanged.
#[must_use]
pub fn heuristic_recommendation(current_weight: f64, goal_weight: f64) -> AiSummaryResult {
    let gap = current_weight - goal_weight;
    AiSummaryResult {
        summary: fallback::ENCOURAGEMENT.to_owned(),
        new_goal_weight: goal_weight,
        recommended_calories: round_half_up(
            fallback::CALORIES_PER_KG.mul_add(-gap, fallback::BASE_CALORIES),
        ),
        recommended_steps: (fallback::BASE_STEPS + round_half_up(gap * fallback::STEPS_PER_KG))
            .min(fallback::MAX_STEPS),
    }
}

/// Whole days from `now` until midnight UTC at the start of `target`, rounded up
///
/// Negative once the target has passed.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn days_to_target(target: NaiveDate, now: DateTime<Utc>) -> i64 {
    let target_start = target.and_time(NaiveTime::MIN).and_utc();
    let millis = (target_start - now).num_milliseconds() as f64;
    (millis / progress::MILLIS_PER_DAY).ceil() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fallback_for_ten_kg_above_goal() {
        let result = heuristic_recommendation(80.0, 70.0);
        assert_eq!(result.recommended_calories, 1500);
        assert_eq!(result.recommended_steps, 10_000);
        assert!((result.new_goal_weight - 70.0).abs() < f64::EPSILON);
        assert!(result.summary.starts_with("Based on your recent activity"));
    }

    #[test]
    fn test_fallback_caps_steps() {
        let result = heuristic_recommendation(100.0, 70.0);
        assert_eq!(result.recommended_steps, 12_000);
        assert_eq!(result.recommended_calories, 500);
    }

    #[test]
    fn test_fallback_below_goal_raises_calories() {
        let result = heuristic_recommendation(68.0, 70.0);
        assert_eq!(result.recommended_calories, 2100);
        assert_eq!(result.recommended_steps, 7600);
    }

    #[test]
    fn test_round_half_up_matches_js_math_round() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(1999.4), 1999);
    }

    #[test]
    fn test_never_lower_policy_keeps_higher_goal() {
        let policy = GoalAdjustmentPolicy::default();
        assert!((policy.apply(68.0, 70.0) - 70.0).abs() < f64::EPSILON);
        assert!((policy.apply(72.0, 70.0) - 72.0).abs() < f64::EPSILON);
        assert!((policy.apply(f64::NAN, 70.0) - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unrestricted_policy_takes_suggestion() {
        let policy: GoalAdjustmentPolicy = "Unrestricted".parse().unwrap();
        assert!((policy.apply(68.0, 70.0) - 68.0).abs() < f64::EPSILON);
        assert_eq!("never-lower".parse::<GoalAdjustmentPolicy>(), Ok(GoalAdjustmentPolicy::NeverLower));
        assert!("sometimes".parse::<GoalAdjustmentPolicy>().is_err());
    }

    #[test]
    fn test_days_to_target_rounds_up_partial_days() {
        let target = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(days_to_target(target, now), 9);

        let midnight = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(days_to_target(target, midnight), 9);

        let after = Utc.with_ymd_and_hms(2025, 6, 12, 6, 0, 0).unwrap();
        assert_eq!(days_to_target(target, after), -2);
    }
}
