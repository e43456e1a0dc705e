// ABOUTME: Application constants for targets, status thresholds, and recommendation heuristics
// ABOUTME: Single source for every magic number the calculations and store depend on
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Application constants organized by domain

/// Daily target defaults used whenever a profile leaves a target unset
pub mod targets {
    /// Default daily calorie target (kcal)
    pub const DEFAULT_DAILY_CALORIES: u32 = 2000;
    /// Default daily step target
    pub const DEFAULT_DAILY_STEPS: u32 = 8000;
}

/// Calendar status thresholds
///
/// Calorie thresholds are surpluses over the target; step thresholds are
/// deficits under the target. Reaching a threshold (>=) triggers the tier.
pub mod calendar {
    /// Calorie surplus that marks a day red
    pub const RED_CALORIE_SURPLUS: i64 = 500;
    /// Step deficit that marks a day red
    pub const RED_STEP_DEFICIT: i64 = 5000;
    /// Calorie surplus that marks a day orange
    pub const ORANGE_CALORIE_SURPLUS: i64 = 200;
    /// Step deficit that marks a day orange
    pub const ORANGE_STEP_DEFICIT: i64 = 2000;
    /// Days in a calendar week
    pub const DAYS_PER_WEEK: u32 = 7;
}

/// Heuristic recommendation used when the text-generation service fails
pub mod fallback {
    /// Calorie baseline before the weight-gap adjustment
    pub const BASE_CALORIES: f64 = 2000.0;
    /// Calories removed per kilogram above goal
    pub const CALORIES_PER_KG: f64 = 50.0;
    /// Step baseline before the weight-gap adjustment
    pub const BASE_STEPS: i64 = 8000;
    /// Steps added per kilogram above goal
    pub const STEPS_PER_KG: f64 = 200.0;
    /// Ceiling on the recommended step target
    pub const MAX_STEPS: i64 = 12_000;
    /// Canned summary returned with heuristic targets
    pub const ENCOURAGEMENT: &str = "Based on your recent activity, you're making progress toward your goal. \
Continue with consistent effort and healthy habits.\n\nRecommendations:\n\
\u{2022} Maintain a balanced diet\n\
\u{2022} Stay active with regular exercise\n\
\u{2022} Monitor your progress weekly\n\
\u{2022} Stay hydrated and get adequate sleep";
}

/// Goal progress and schedule tracking
pub mod progress {
    /// Milliseconds per day, for days-to-target arithmetic
    pub const MILLIS_PER_DAY: f64 = 86_400_000.0;
    /// Planning horizon used for time-based progress
    pub const PLANNING_HORIZON_DAYS: i64 = 365;
    /// Weight progress may trail time progress by this many percentage points
    pub const ON_TRACK_TOLERANCE_PERCENT: f64 = 10.0;
    /// Upper bound on goal progress percentage
    pub const MAX_PROGRESS_PERCENT: f64 = 100.0;
}

/// Defaults used to pre-fill a new daily entry
pub mod entry_defaults {
    /// Neutral mood score
    pub const MOOD: u8 = 3;
    /// Neutral energy score
    pub const ENERGY: u8 = 3;
    /// Weight used when neither history nor profile is available (kg)
    pub const WEIGHT_KG: f64 = 70.0;
}

/// Accepted ranges for stored values
pub mod limits {
    /// Minimum score for mood, energy and activity level
    pub const MIN_SCORE: u8 = 1;
    /// Maximum score for mood, energy and activity level
    pub const MAX_SCORE: u8 = 5;
    /// Minimum accepted height (cm)
    pub const MIN_HEIGHT_CM: f64 = 100.0;
    /// Maximum accepted height (cm)
    pub const MAX_HEIGHT_CM: f64 = 250.0;
    /// Minimum accepted weight (kg)
    pub const MIN_WEIGHT_KG: f64 = 0.0;
    /// Maximum accepted weight (kg)
    pub const MAX_WEIGHT_KG: f64 = 300.0;
}

/// Names of the persisted records in an exported state document
pub mod storage {
    /// Record holding the user profile
    pub const PROFILE_RECORD: &str = "healthAssistant_profile";
    /// Record holding the date-keyed entry map
    pub const ENTRIES_RECORD: &str = "healthAssistant_entries";
}

/// Text-generation request defaults
pub mod llm {
    /// Token limit for a summary completion
    pub const DEFAULT_MAX_TOKENS: u32 = 1000;
}

/// Service identity used in logs and health responses
pub mod service_names {
    /// Server service name
    pub const MYPT_SERVER: &str = "mypt-server";
}
