// ABOUTME: Extracts the JSON recommendation embedded in free-form model output
// ABOUTME: Brace-depth scan that respects JSON strings; prose around the object is kept separately
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::{Map, Value};

/// Model output split into its JSON object and the prose around it
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedReply {
    /// The first balanced `{...}` that parses as a JSON object
    pub object: Map<String, Value>,
    /// Text outside the object with Markdown code fences removed; empty if none
    pub prose: String,
}

/// Recommendation fields read leniently from the model's JSON object
///
/// Numbers may arrive as JSON numbers or numeric strings; anything else is
/// treated as missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRecommendation {
    /// `summary` field
    pub summary: Option<String>,
    /// `newGoalWeight` field
    pub new_goal_weight: Option<f64>,
    /// `recommendedCalories` field
    pub recommended_calories: Option<f64>,
    /// `recommendedSteps` field
    pub recommended_steps: Option<f64>,
}

impl ParsedRecommendation {
    /// Read the recommendation fields out of a JSON object
    #[must_use]
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            summary: object
                .get("summary")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            new_goal_weight: number_field(object, "newGoalWeight"),
            recommended_calories: number_field(object, "recommendedCalories"),
            recommended_steps: number_field(object, "recommendedSteps"),
        }
    }
}

fn number_field(object: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match object.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|n| n.is_finite())
}

/// Find the first JSON object in `text` and separate it from the prose
///
/// Candidate objects are located by brace depth, ignoring braces inside
/// string literals. A balanced candidate that is not valid JSON (say, braces
/// in prose) is skipped and the scan resumes at the next `{`.
#[must_use]
pub fn extract_reply(text: &str) -> Option<ExtractedReply> {
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        let Some(end) = balanced_object_end(text, start) else {
            search_from = start + 1;
            continue;
        };

        if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(&text[start..end]) {
            let prose = surrounding_prose(&text[..start], &text[end..]);
            return Some(ExtractedReply { object, prose });
        }
        search_from = start + 1;
    }

    None
}

/// Byte index one past the `}` closing the object opened at `start`
fn balanced_object_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (i, b) in text.bytes().enumerate().skip(start) {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match b {
                b'\\' => escape = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn surrounding_prose(before: &str, after: &str) -> String {
    [before, after]
        .into_iter()
        .map(strip_code_fences)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Drop Markdown fence lines (```` ``` ```` and ```` ```json ````) and trim
fn strip_code_fences(segment: &str) -> String {
    segment
        .lines()
        .map(|line| {
            let trimmed = line.trim();
            trimmed.strip_prefix("```").map_or(line, |rest| {
                if rest.chars().all(char::is_alphanumeric) {
                    ""
                } else {
                    line
                }
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}
