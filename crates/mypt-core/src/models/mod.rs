// ABOUTME: Core data models for the MyPT health tracking service
// ABOUTME: Re-exports UserProfile, DailyEntry, EntryCollection and AI summary types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! The profile and the date-keyed entry collection are the source of truth
//! for every calculation; the summary types describe the contract with the
//! text-generation service. JSON field names are camelCase so that stored
//! state and HTTP payloads keep the shape the web client already uses.

mod entry;
mod profile;
mod summary;

pub use entry::{DailyEntry, EntryCollection};
pub use profile::{DailyTargets, Sex, UserProfile};
pub use summary::{AiSummaryResult, SummaryRequest};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Wire format for calendar dates (`YYYY-MM-DD`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Deserialize an optional date where an empty string means "not set"
///
/// # Errors
///
/// Returns a deserialization error if the string is non-empty and not a
/// `YYYY-MM-DD` date.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
