// ABOUTME: Request and result types for the AI weekly summary contract
// ABOUTME: Field names match the JSON body of POST /api/get-summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{deserialize_optional_date, EntryCollection, Sex, UserProfile};

/// Structured recommendation produced for one summary request
///
/// Ephemeral: nothing is persisted until the user accepts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSummaryResult {
    /// Free-text analysis
    pub summary: String,
    /// Suggested goal weight (kg)
    pub new_goal_weight: f64,
    /// Suggested daily calorie target
    pub recommended_calories: i64,
    /// Suggested daily step target
    pub recommended_steps: i64,
}

/// Inputs the summary prompt is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    /// Entries covered by the summary (may be empty at sign-up)
    #[serde(default)]
    pub entries: EntryCollection,
    /// First day of the summarized window
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub week_start: Option<NaiveDate>,
    /// Most recent logged weight (kg)
    pub current_weight: f64,
    /// Goal weight (kg)
    pub goal_weight: f64,
    /// Weight at sign-up (kg)
    pub start_weight: f64,
    /// Goal date, if set
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub target_date: Option<NaiveDate>,
    /// Height (cm)
    pub height: f64,
    /// Biological sex
    pub sex: Sex,
    /// Activity level 1-5
    pub activity_level: u8,
}

impl SummaryRequest {
    /// Build a request from a stored profile and the entries to summarize
    #[must_use]
    pub fn from_profile(
        profile: &UserProfile,
        entries: EntryCollection,
        week_start: NaiveDate,
        current_weight: f64,
    ) -> Self {
        Self {
            entries,
            week_start: Some(week_start),
            current_weight,
            goal_weight: profile.goal_weight,
            start_weight: profile.weight,
            target_date: Some(profile.target_date),
            height: profile.height,
            sex: profile.sex,
            activity_level: profile.activity_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_empty_target_date_and_entries() {
        let json = r#"{
            "entries": {},
            "weekStart": "2025-03-01",
            "currentWeight": 80,
            "goalWeight": 70,
            "startWeight": 80,
            "targetDate": "",
            "height": 175,
            "sex": "female",
            "activityLevel": 2
        }"#;
        let request: SummaryRequest = serde_json::from_str(json).unwrap();

        assert!(request.entries.is_empty());
        assert!(request.target_date.is_none());
        assert_eq!(request.week_start, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(request.sex, Sex::Female);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = AiSummaryResult {
            summary: "x".into(),
            new_goal_weight: 68.0,
            recommended_calories: 1800,
            recommended_steps: 9000,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["newGoalWeight"], 68.0);
        assert_eq!(json["recommendedSteps"], 9000);
    }
}
