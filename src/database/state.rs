// ABOUTME: Export and import of a user's records as the two-record JSON document the web client stores
// ABOUTME: Import validates everything first, then replaces profile and entries in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::entries::write_entry;
use super::profiles::write_profile;
use super::Database;
use crate::errors::AppResult;
use crate::logging::AppLogger;
use crate::models::{EntryCollection, UserProfile};
use serde::{Deserialize, Serialize};

/// A user's complete persisted state
///
/// Serializes as `{"healthAssistant_profile": {...} | null,
/// "healthAssistant_entries": {"YYYY-MM-DD": {...}}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Profile record; `null` before sign-up
    #[serde(rename = "healthAssistant_profile", default)]
    pub profile: Option<UserProfile>,
    /// Date-keyed entry record
    #[serde(rename = "healthAssistant_entries", default)]
    pub entries: EntryCollection,
}

impl Database {
    /// Snapshot a user's profile and entries
    ///
    /// # Errors
    ///
    /// Returns an error if either query fails
    pub async fn export_state(&self, user_id: &str) -> AppResult<PersistedState> {
        Ok(PersistedState {
            profile: self.get_profile(user_id).await?,
            entries: self.get_entries(user_id).await?,
        })
    }

    /// Replace a user's profile and entries with `state`
    ///
    /// A `null` profile removes the stored profile.
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` if any record is invalid (nothing is written),
    /// or a database error
    pub async fn import_state(&self, user_id: &str, state: &PersistedState) -> AppResult<()> {
        if let Some(profile) = &state.profile {
            profile.validate()?;
        }
        for entry in &state.entries {
            entry.validate()?;
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM daily_entries WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if let Some(profile) = &state.profile {
            write_profile(&mut tx, user_id, profile).await?;
        }
        for entry in &state.entries {
            write_entry(&mut tx, user_id, entry).await?;
        }

        tx.commit().await?;

        AppLogger::log_database_operation("import", "user_state", user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::storage;
    use serde_json::{json, Map};

    #[test]
    fn test_state_uses_named_records() {
        let state = PersistedState::default();
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value[storage::PROFILE_RECORD], json!(null));
        assert_eq!(value[storage::ENTRIES_RECORD], json!({}));
        assert_eq!(value.as_object().map(Map::len), Some(2));
    }

    #[test]
    fn test_state_deserializes_client_document() {
        let doc = json!({
            "healthAssistant_profile": {
                "height": 175,
                "sex": "female",
                "weight": 80,
                "activityLevel": 3,
                "goalWeight": 70,
                "targetDate": "2025-12-31"
            },
            "healthAssistant_entries": {
                "2025-06-01": {
                    "date": "2025-06-01",
                    "mood": 4,
                    "energy": 3,
                    "calories": 1900,
                    "steps": 9000,
                    "weight": 79.5
                }
            }
        });

        let state: PersistedState = serde_json::from_value(doc).unwrap();
        assert!(state.profile.is_some());
        assert_eq!(state.entries.len(), 1);
    }
}
