// ABOUTME: Health calculations, calendar status classification, and recommendation heuristics
// ABOUTME: Pure computation crate with no I/O; every function takes its clock explicitly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # `MyPT` Intelligence
//!
//! Pure functions over a [`UserProfile`](mypt_core::models::UserProfile) and
//! its [`EntryCollection`](mypt_core::models::EntryCollection):
//!
//! - **`health_calculations`**: latest weight, goal progress, daily targets,
//!   schedule tracking and entry pre-fill
//! - **`calendar_status`**: red/orange/green adherence per day and month views
//! - **`recommendation`**: heuristic fallback targets, goal adjustment policy,
//!   days-to-target arithmetic

/// Weight progress, daily targets, and entry pre-fill
pub mod health_calculations;

/// Per-day adherence status and month calendar
pub mod calendar_status;

/// Fallback recommendation and goal adjustment policy
pub mod recommendation;

pub use calendar_status::{classify_day, day_status, is_complete_week, month_calendar, CalendarDay, DayStatus};
pub use health_calculations::{
    daily_targets, entry_template, goal_progress, latest_weight, progress_status,
    weight_log_entry, GoalProgress, ProgressStatus,
};
pub use recommendation::{days_to_target, heuristic_recommendation, round_half_up, GoalAdjustmentPolicy};
