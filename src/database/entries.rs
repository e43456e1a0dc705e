// ABOUTME: Daily entry persistence keyed by (user, date); saving a date again overwrites it
// ABOUTME: Loads a user's full entry collection or a date range of it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::Database;
use crate::errors::AppResult;
use crate::logging::AppLogger;
use crate::models::{DailyEntry, EntryCollection};
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};

impl Database {
    pub(super) async fn migrate_entries(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS daily_entries (
                user_id TEXT NOT NULL,
                entry_date TEXT NOT NULL,
                mood INTEGER NOT NULL,
                energy INTEGER NOT NULL,
                calories INTEGER NOT NULL,
                steps INTEGER NOT NULL,
                weight REAL NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (user_id, entry_date)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Save the entry for its date, replacing any existing entry for that date
    ///
    /// Returns `true` when an existing entry was overwritten.
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for invalid fields, or a database error
    pub async fn upsert_entry(&self, user_id: &str, entry: &DailyEntry) -> AppResult<bool> {
        entry.validate()?;

        let mut tx = self.pool.begin().await?;
        let existed =
            sqlx::query("SELECT 1 FROM daily_entries WHERE user_id = $1 AND entry_date = $2")
                .bind(user_id)
                .bind(entry.date)
                .fetch_optional(&mut *tx)
                .await?
                .is_some();
        write_entry(&mut tx, user_id, entry).await?;
        tx.commit().await?;

        AppLogger::log_database_operation(
            if existed { "overwrite" } else { "insert" },
            "daily_entries",
            user_id,
        );
        Ok(existed)
    }

    /// Get the entry for one date
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_entry(&self, user_id: &str, date: NaiveDate) -> AppResult<Option<DailyEntry>> {
        let row = sqlx::query(
            r"
            SELECT entry_date, mood, energy, calories, steps, weight
            FROM daily_entries WHERE user_id = $1 AND entry_date = $2
            ",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_entry).transpose()
    }

    /// Get every entry the user has logged
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_entries(&self, user_id: &str) -> AppResult<EntryCollection> {
        let rows = sqlx::query(
            r"
            SELECT entry_date, mood, energy, calories, steps, weight
            FROM daily_entries WHERE user_id = $1
            ORDER BY entry_date
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_entry).collect()
    }

    /// Get entries with `start <= date <= end`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_entries_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<EntryCollection> {
        let rows = sqlx::query(
            r"
            SELECT entry_date, mood, energy, calories, steps, weight
            FROM daily_entries
            WHERE user_id = $1 AND entry_date >= $2 AND entry_date <= $3
            ORDER BY entry_date
            ",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_entry).collect()
    }
}

pub(super) async fn write_entry(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: &str,
    entry: &DailyEntry,
) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO daily_entries (user_id, entry_date, mood, energy, calories, steps, weight, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, CURRENT_TIMESTAMP)
        ON CONFLICT(user_id, entry_date) DO UPDATE SET
            mood = $3,
            energy = $4,
            calories = $5,
            steps = $6,
            weight = $7,
            updated_at = CURRENT_TIMESTAMP
        ",
    )
    .bind(user_id)
    .bind(entry.date)
    .bind(entry.mood)
    .bind(entry.energy)
    .bind(entry.calories)
    .bind(entry.steps)
    .bind(entry.weight)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

fn row_to_entry(row: &SqliteRow) -> AppResult<DailyEntry> {
    Ok(DailyEntry {
        date: row.try_get("entry_date")?,
        mood: row.try_get("mood")?,
        energy: row.try_get("energy")?,
        calories: row.try_get("calories")?,
        steps: row.try_get("steps")?,
        weight: row.try_get("weight")?,
    })
}
