// ABOUTME: Goal progress, latest weight, and daily target calculations
// ABOUTME: Also builds pre-filled entries for the daily log and quick weight log
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Duration, NaiveDate, Utc};
use mypt_core::constants::{entry_defaults, progress, targets};
use mypt_core::models::{DailyEntry, DailyTargets, EntryCollection, UserProfile};
use serde::{Deserialize, Serialize};

use crate::recommendation::days_to_target;

/// Share of the weight-change goal achieved so far
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// Percentage of the goal achieved, clamped to 0..=100
    pub progress: f64,
    /// Kilograms still between the latest weight and the goal
    pub remaining: f64,
}

/// Schedule tracking shown alongside a summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStatus {
    /// Latest logged weight, or the start weight with no entries
    pub current_weight: f64,
    /// Kilograms moved away from the start weight
    pub weight_lost: f64,
    /// Kilograms still to go
    pub remaining: f64,
    /// Goal progress; unlike [`GoalProgress`] this may exceed 100
    pub progress_percent: f64,
    /// Whole days until the target date, never negative
    pub days_remaining: i64,
    /// Share of the planning horizon already elapsed
    pub time_progress_percent: f64,
    /// Whether weight progress is within tolerance of time progress
    pub on_track: bool,
}

/// Weight of the chronologically most recent entry, else the start weight
#[must_use]
pub fn latest_weight(profile: &UserProfile, entries: &EntryCollection) -> f64 {
    entries.latest().map_or(profile.weight, |entry| entry.weight)
}

/// Percentage of the weight-change goal achieved and the kilograms remaining
///
/// A profile whose start weight equals its goal weight always reports zero
/// progress.
#[must_use]
pub fn goal_progress(profile: &UserProfile, entries: &EntryCollection) -> GoalProgress {
    let current = latest_weight(profile, entries);
    GoalProgress {
        progress: unclamped_progress(profile, current).min(progress::MAX_PROGRESS_PERCENT),
        remaining: (current - profile.goal_weight).abs(),
    }
}

/// Active daily targets, resolving each unset field to its default
#[must_use]
pub fn daily_targets(profile: &UserProfile) -> DailyTargets {
    DailyTargets {
        calories: profile
            .target_calories
            .unwrap_or(targets::DEFAULT_DAILY_CALORIES),
        steps: profile.target_steps.unwrap_or(targets::DEFAULT_DAILY_STEPS),
    }
}

/// Compare weight progress with elapsed time over the planning horizon
///
/// The profile is on track while its weight progress trails time progress by
/// no more than the tolerance.
#[must_use]
pub fn progress_status(
    profile: &UserProfile,
    entries: &EntryCollection,
    now: DateTime<Utc>,
) -> ProgressStatus {
    let current_weight = latest_weight(profile, entries);
    let progress_percent = unclamped_progress(profile, current_weight);

    let horizon = progress::PLANNING_HORIZON_DAYS;
    let days_remaining = days_to_target(profile.target_date, now).max(0);
    #[allow(clippy::cast_precision_loss)]
    let time_progress_percent = (horizon - days_remaining) as f64 / horizon as f64 * 100.0;

    ProgressStatus {
        current_weight,
        weight_lost: (profile.weight - current_weight).abs(),
        remaining: (current_weight - profile.goal_weight).abs(),
        progress_percent,
        days_remaining,
        time_progress_percent,
        on_track: progress_percent
            >= time_progress_percent - progress::ON_TRACK_TOLERANCE_PERCENT,
    }
}

/// Pre-filled values for the daily log form
///
/// Returns the stored entry when one exists. Otherwise scores are neutral,
/// calories and steps match the active targets, and the weight carries over
/// from the previous day, falling back to the start weight and then a fixed
/// default.
#[must_use]
pub fn entry_template(
    date: NaiveDate,
    profile: Option<&UserProfile>,
    entries: &EntryCollection,
) -> DailyEntry {
    if let Some(existing) = entries.get(date) {
        return existing.clone();
    }

    let targets = profile.map(daily_targets).unwrap_or_default();
    let weight = date
        .checked_sub_signed(Duration::days(1))
        .and_then(|previous| entries.get(previous))
        .map(|entry| entry.weight)
        .or_else(|| profile.map(|p| p.weight))
        .unwrap_or(entry_defaults::WEIGHT_KG);

    DailyEntry {
        date,
        mood: entry_defaults::MOOD,
        energy: entry_defaults::ENERGY,
        calories: targets.calories,
        steps: targets.steps,
        weight,
    }
}

/// Entry to store when only a weight is logged for a date
///
/// Keeps every other field of an existing entry.
#[must_use]
pub fn weight_log_entry(date: NaiveDate, weight: f64, entries: &EntryCollection) -> DailyEntry {
    entries.get(date).map_or_else(
        || DailyEntry {
            date,
            mood: entry_defaults::MOOD,
            energy: entry_defaults::ENERGY,
            calories: targets::DEFAULT_DAILY_CALORIES,
            steps: targets::DEFAULT_DAILY_STEPS,
            weight,
        },
        |existing| DailyEntry {
            weight,
            ..existing.clone()
        },
    )
}

fn unclamped_progress(profile: &UserProfile, current_weight: f64) -> f64 {
    let total_to_lose = (profile.weight - profile.goal_weight).abs();
    if total_to_lose > 0.0 {
        (profile.weight - current_weight).abs() / total_to_lose * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::iter;
    use mypt_core::models::Sex;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn profile(start: f64, goal: f64) -> UserProfile {
        UserProfile {
            height: 175.0,
            sex: Sex::Male,
            weight: start,
            activity_level: 3,
            goal_weight: goal,
            target_date: date(12, 31),
            target_calories: None,
            target_steps: None,
        }
    }

    fn entry(day: NaiveDate, weight: f64) -> DailyEntry {
        DailyEntry {
            date: day,
            mood: 4,
            energy: 2,
            calories: 1800,
            steps: 7000,
            weight,
        }
    }

    #[test]
    fn test_latest_weight_falls_back_to_start_weight() {
        let p = profile(82.0, 70.0);
        assert!((latest_weight(&p, &EntryCollection::new()) - 82.0).abs() < f64::EPSILON);

        let entries: EntryCollection = vec![entry(date(3, 5), 79.0), entry(date(3, 1), 81.0)]
            .into_iter()
            .collect();
        assert!((latest_weight(&p, &entries) - 79.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_goal_progress_zero_when_start_equals_goal() {
        let p = profile(75.0, 75.0);
        for weight in [60.0, 75.0, 90.0] {
            let entries: EntryCollection = iter::once(entry(date(3, 1), weight)).collect();
            let result = goal_progress(&p, &entries);
            assert!(result.progress.abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_goal_progress_monotonic_and_clamped() {
        let p = profile(80.0, 70.0);
        let mut last = -1.0;
        for tenth in 0..=150 {
            let weight = 80.0 - f64::from(tenth) / 10.0;
            let entries: EntryCollection = iter::once(entry(date(3, 1), weight)).collect();
            let result = goal_progress(&p, &entries);
            assert!(result.progress >= last);
            assert!(result.progress <= 100.0);
            last = result.progress;
        }
        assert!((last - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_goal_progress_halfway() {
        let p = profile(80.0, 70.0);
        let entries: EntryCollection = iter::once(entry(date(3, 1), 75.0)).collect();
        let result = goal_progress(&p, &entries);
        assert!((result.progress - 50.0).abs() < 1e-9);
        assert!((result.remaining - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_targets_defaults_and_stored_values() {
        let mut p = profile(80.0, 70.0);
        assert_eq!(
            daily_targets(&p),
            DailyTargets {
                calories: 2000,
                steps: 8000
            }
        );

        p.target_calories = Some(1700);
        p.target_steps = Some(11_000);
        assert_eq!(
            daily_targets(&p),
            DailyTargets {
                calories: 1700,
                steps: 11_000
            }
        );

        p.target_steps = None;
        assert_eq!(daily_targets(&p).steps, 8000);
        assert_eq!(daily_targets(&p).calories, 1700);
    }

    #[test]
    fn test_progress_status_on_track_near_start_of_horizon() {
        let p = profile(80.0, 70.0);
        let entries: EntryCollection = iter::once(entry(date(3, 1), 78.0)).collect();
        // 300 days before the target date
        let now = Utc.with_ymd_and_hms(2025, 3, 6, 0, 0, 0).unwrap();

        let status = progress_status(&p, &entries, now);
        assert_eq!(status.days_remaining, 300);
        assert!((status.weight_lost - 2.0).abs() < 1e-9);
        assert!((status.progress_percent - 20.0).abs() < 1e-9);
        assert!(status.on_track);
    }

    #[test]
    fn test_progress_status_behind_when_time_runs_out() {
        let p = profile(80.0, 70.0);
        let entries: EntryCollection = iter::once(entry(date(3, 1), 79.0)).collect();
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();

        let status = progress_status(&p, &entries, now);
        assert_eq!(status.days_remaining, 0);
        assert!((status.time_progress_percent - 100.0).abs() < 1e-9);
        assert!(!status.on_track);
    }

    #[test]
    fn test_progress_percent_not_clamped_past_goal() {
        let p = profile(80.0, 70.0);
        let entries: EntryCollection = iter::once(entry(date(3, 1), 65.0)).collect();
        let now = Utc.with_ymd_and_hms(2025, 3, 6, 0, 0, 0).unwrap();
        assert!((progress_status(&p, &entries, now).progress_percent - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_entry_template_prefers_existing_entry() {
        let existing = entry(date(4, 2), 77.7);
        let entries: EntryCollection = iter::once(existing.clone()).collect();
        assert_eq!(entry_template(date(4, 2), None, &entries), existing);
    }

    #[test]
    fn test_entry_template_weight_fallback_chain() {
        let mut p = profile(83.0, 70.0);
        p.target_calories = Some(1600);
        let entries: EntryCollection = iter::once(entry(date(4, 1), 78.5)).collect();

        let carried = entry_template(date(4, 2), Some(&p), &entries);
        assert!((carried.weight - 78.5).abs() < f64::EPSILON);
        assert_eq!(carried.calories, 1600);
        assert_eq!(carried.steps, 8000);
        assert_eq!((carried.mood, carried.energy), (3, 3));

        let from_profile = entry_template(date(4, 10), Some(&p), &entries);
        assert!((from_profile.weight - 83.0).abs() < f64::EPSILON);

        let bare = entry_template(date(4, 10), None, &EntryCollection::new());
        assert!((bare.weight - 70.0).abs() < f64::EPSILON);
        assert_eq!(bare.calories, 2000);
    }

    #[test]
    fn test_weight_log_keeps_other_fields() {
        let entries: EntryCollection = iter::once(entry(date(5, 1), 80.0)).collect();
        let updated = weight_log_entry(date(5, 1), 79.2, &entries);
        assert_eq!(updated.calories, 1800);
        assert_eq!(updated.mood, 4);
        assert!((updated.weight - 79.2).abs() < f64::EPSILON);

        let fresh = weight_log_entry(date(5, 2), 79.0, &entries);
        assert_eq!((fresh.mood, fresh.energy, fresh.calories, fresh.steps), (3, 3, 2000, 8000));
    }
}
