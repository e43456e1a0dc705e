// ABOUTME: Prompt construction for AI weekly summaries
// ABOUTME: Embeds profile fields, recent entries as JSON, and derived progress figures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use mypt_intelligence::days_to_target;
use std::fmt::Write;

use crate::models::{SummaryRequest, DATE_FORMAT};

const PERSONA: &str = "You are a professional AI personal trainer and nutritionist. \
Analyze this health data and provide personalized recommendations.";

const INSTRUCTIONS: &str = r#"Provide a comprehensive analysis including:
1. Progress assessment
2. Specific recommendations for diet and exercise
3. Motivation and encouragement
4. Suggested daily calorie target
5. Suggested daily step target
6. Any goal weight adjustments if needed

Respond in JSON format:
{
  "summary": "detailed analysis and recommendations",
  "newGoalWeight": number,
  "recommendedCalories": number,
  "recommendedSteps": number
}"#;

/// Build the single user message sent to the text-generation service
#[must_use]
pub fn build_summary_prompt(request: &SummaryRequest, now: DateTime<Utc>) -> String {
    let target_date = request.target_date.map_or_else(
        || "not set".to_owned(),
        |date| date.format(DATE_FORMAT).to_string(),
    );
    let days_to_target = request.target_date.map_or_else(
        || "unknown".to_owned(),
        |date| days_to_target(date, now).to_string(),
    );
    let entries_json =
        serde_json::to_string_pretty(&request.entries).unwrap_or_else(|_| "{}".to_owned());

    let mut prompt = String::with_capacity(1024 + entries_json.len());
    prompt.push_str(PERSONA);
    prompt.push_str("\n\nUser Profile:\n");
    // Writing to a String cannot fail
    let _ = writeln!(prompt, "- Current Weight: {}kg", request.current_weight);
    let _ = writeln!(prompt, "- Goal Weight: {}kg", request.goal_weight);
    let _ = writeln!(prompt, "- Start Weight: {}kg", request.start_weight);
    let _ = writeln!(prompt, "- Height: {}cm", request.height);
    let _ = writeln!(prompt, "- Sex: {}", request.sex);
    let _ = writeln!(prompt, "- Activity Level: {}/5", request.activity_level);
    let _ = writeln!(prompt, "- Target Date: {target_date}");

    prompt.push_str("\nRecent Activity Data:\n");
    prompt.push_str(&entries_json);

    prompt.push_str("\n\nProgress Summary:\n");
    let _ = writeln!(
        prompt,
        "- Weight Lost: {:.1}kg",
        request.start_weight - request.current_weight
    );
    let _ = writeln!(
        prompt,
        "- Remaining to Goal: {:.1}kg",
        request.current_weight - request.goal_weight
    );
    let _ = writeln!(prompt, "- Days to Target: {days_to_target}");

    prompt.push('\n');
    prompt.push_str(INSTRUCTIONS);
    prompt
}
