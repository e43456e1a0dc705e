// ABOUTME: Daily adherence status (red/orange/green/none) from an entry and the active targets
// ABOUTME: Builds month calendars and checks whether a week has been fully logged
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{Datelike, Duration, NaiveDate};
use mypt_core::constants::calendar;
use mypt_core::errors::{AppError, AppResult};
use mypt_core::models::{DailyEntry, DailyTargets, EntryCollection, UserProfile};
use serde::{Deserialize, Serialize};

use crate::health_calculations::daily_targets;

/// Adherence colour for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    /// Far off target
    Red,
    /// Somewhat off target
    Orange,
    /// On target
    Green,
    /// Nothing to classify
    None,
}

/// One day of a month view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    /// Calendar date
    pub date: NaiveDate,
    /// Adherence status
    pub status: DayStatus,
    /// Whether this is the caller's current date
    pub is_today: bool,
    /// Whether this is the profile's target date
    pub is_target_date: bool,
    /// Logged entry, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<DailyEntry>,
}

/// Classify an entry against the targets
///
/// The red tier is checked before orange; within a tier either the calorie
/// surplus or the step deficit is enough.
#[must_use]
pub fn classify_day(entry: &DailyEntry, targets: DailyTargets) -> DayStatus {
    let calories_diff = i64::from(entry.calories) - i64::from(targets.calories);
    let steps_diff = i64::from(targets.steps) - i64::from(entry.steps);

    if calories_diff >= calendar::RED_CALORIE_SURPLUS || steps_diff >= calendar::RED_STEP_DEFICIT {
        DayStatus::Red
    } else if calories_diff >= calendar::ORANGE_CALORIE_SURPLUS
        || steps_diff >= calendar::ORANGE_STEP_DEFICIT
    {
        DayStatus::Orange
    } else {
        DayStatus::Green
    }
}

/// Status for a date, `None` when there is no profile or no entry
#[must_use]
pub fn day_status(
    profile: Option<&UserProfile>,
    entries: &EntryCollection,
    date: NaiveDate,
) -> DayStatus {
    match (profile, entries.get(date)) {
        (Some(profile), Some(entry)) => classify_day(entry, daily_targets(profile)),
        _ => DayStatus::None,
    }
}

/// Every day of a month with its status and flags
///
/// # Errors
///
/// Returns `InvalidInput` if `year`/`month` do not name a calendar month.
pub fn month_calendar(
    year: i32,
    month: u32,
    profile: Option<&UserProfile>,
    entries: &EntryCollection,
    today: NaiveDate,
) -> AppResult<Vec<CalendarDay>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::invalid_input(format!("{year}-{month} is not a valid month")))?;
    let target_date = profile.map(|p| p.target_date);

    Ok(first
        .iter_days()
        .take_while(|date| date.month() == month)
        .map(|date| CalendarDay {
            date,
            status: day_status(profile, entries, date),
            is_today: date == today,
            is_target_date: target_date == Some(date),
            entry: entries.get(date).cloned(),
        })
        .collect())
}

/// Whether all seven days starting at `week_start` have entries
#[must_use]
pub fn is_complete_week(entries: &EntryCollection, week_start: NaiveDate) -> bool {
    (0..i64::from(calendar::DAYS_PER_WEEK)).all(|offset| {
        week_start
            .checked_add_signed(Duration::days(offset))
            .is_some_and(|date| entries.contains(date))
    })
}
