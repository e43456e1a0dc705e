// ABOUTME: Profile persistence: one row per user, replaced wholesale on every save
// ABOUTME: Validates profile ranges before writing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{Sex, UserProfile};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};

impl Database {
    pub(super) async fn migrate_profiles(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_profiles (
                user_id TEXT PRIMARY KEY,
                height REAL NOT NULL,
                sex TEXT NOT NULL CHECK (sex IN ('male', 'female')),
                weight REAL NOT NULL,
                activity_level INTEGER NOT NULL,
                goal_weight REAL NOT NULL,
                target_date TEXT NOT NULL,
                target_calories INTEGER,
                target_steps INTEGER,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Create or replace a user's profile
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for invalid fields, or a database error
    pub async fn upsert_profile(&self, user_id: &str, profile: &UserProfile) -> AppResult<()> {
        profile.validate()?;

        let mut tx = self.pool.begin().await?;
        write_profile(&mut tx, user_id, profile).await?;
        tx.commit().await?;

        AppLogger::log_database_operation("upsert", "user_profiles", user_id);
        Ok(())
    }

    /// Get a user's profile, if one has been created
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row cannot be decoded
    pub async fn get_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query(
            r"
            SELECT height, sex, weight, activity_level, goal_weight, target_date,
                   target_calories, target_steps
            FROM user_profiles WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_profile).transpose()
    }

    /// Get a user's profile or fail with `ResourceNotFound`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the user has no profile
    pub async fn require_profile(&self, user_id: &str) -> AppResult<UserProfile> {
        self.get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Profile for user {user_id}")))
    }
}

pub(super) async fn write_profile(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: &str,
    profile: &UserProfile,
) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO user_profiles (
            user_id, height, sex, weight, activity_level, goal_weight, target_date,
            target_calories, target_steps, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, CURRENT_TIMESTAMP)
        ON CONFLICT(user_id) DO UPDATE SET
            height = $2,
            sex = $3,
            weight = $4,
            activity_level = $5,
            goal_weight = $6,
            target_date = $7,
            target_calories = $8,
            target_steps = $9,
            updated_at = CURRENT_TIMESTAMP
        ",
    )
    .bind(user_id)
    .bind(profile.height)
    .bind(profile.sex.as_str())
    .bind(profile.weight)
    .bind(profile.activity_level)
    .bind(profile.goal_weight)
    .bind(profile.target_date)
    .bind(profile.target_calories)
    .bind(profile.target_steps)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

fn row_to_profile(row: &SqliteRow) -> AppResult<UserProfile> {
    let sex: String = row.try_get("sex")?;
    let sex = Sex::parse(&sex)
        .ok_or_else(|| AppError::database(format!("Stored profile has unknown sex '{sex}'")))?;

    Ok(UserProfile {
        height: row.try_get("height")?,
        sex,
        weight: row.try_get("weight")?,
        activity_level: row.try_get("activity_level")?,
        goal_weight: row.try_get("goal_weight")?,
        target_date: row.try_get("target_date")?,
        target_calories: row.try_get("target_calories")?,
        target_steps: row.try_get("target_steps")?,
    })
}
