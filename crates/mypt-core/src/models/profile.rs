// ABOUTME: User profile model with sex, activity level, goal weight and optional daily targets
// ABOUTME: Validation bounds mirror the sign-up form limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{limits, targets};
use crate::errors::{AppError, AppResult};

/// Biological sex as captured at sign-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    /// Male
    Male,
    /// Female
    Female,
}

impl Sex {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted user attributes driving target calculations
///
/// `weight` is the start weight recorded at sign-up; the current weight is
/// always derived from the most recent daily entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Height in centimetres
    pub height: f64,
    /// Biological sex
    pub sex: Sex,
    /// Start weight in kilograms
    pub weight: f64,
    /// Activity level from 1 (sedentary) to 5 (super active)
    pub activity_level: u8,
    /// Goal weight in kilograms
    pub goal_weight: f64,
    /// Date by which the goal should be reached
    pub target_date: NaiveDate,
    /// Daily calorie target, when one has been set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_calories: Option<u32>,
    /// Daily step target, when one has been set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_steps: Option<u32>,
}

impl UserProfile {
    /// Check every field against the accepted ranges
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` naming the first offending field.
    pub fn validate(&self) -> AppResult<()> {
        check_range("height", self.height, limits::MIN_HEIGHT_CM, limits::MAX_HEIGHT_CM)?;
        check_range("weight", self.weight, limits::MIN_WEIGHT_KG, limits::MAX_WEIGHT_KG)?;
        check_range(
            "goalWeight",
            self.goal_weight,
            limits::MIN_WEIGHT_KG,
            limits::MAX_WEIGHT_KG,
        )?;
        check_score("activityLevel", self.activity_level)
    }

    /// Human-readable label for the activity level
    #[must_use]
    pub const fn activity_label(&self) -> &'static str {
        match self.activity_level {
            1 => "Sedentary",
            2 => "Lightly Active",
            3 => "Moderately Active",
            4 => "Very Active",
            _ => "Super Active",
        }
    }
}

/// Calorie and step goals used to classify a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTargets {
    /// Daily calorie goal (kcal)
    pub calories: u32,
    /// Daily step goal
    pub steps: u32,
}

impl Default for DailyTargets {
    fn default() -> Self {
        Self {
            calories: targets::DEFAULT_DAILY_CALORIES,
            steps: targets::DEFAULT_DAILY_STEPS,
        }
    }
}

pub(crate) fn check_range(field: &str, value: f64, min: f64, max: f64) -> AppResult<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(AppError::out_of_range(field, value, min, max))
    }
}

pub(crate) fn check_score(field: &str, value: u8) -> AppResult<()> {
    if (limits::MIN_SCORE..=limits::MAX_SCORE).contains(&value) {
        Ok(())
    } else {
        Err(AppError::out_of_range(
            field,
            value,
            f64::from(limits::MIN_SCORE),
            f64::from(limits::MAX_SCORE),
        ))
    }
}
