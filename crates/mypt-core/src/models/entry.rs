// ABOUTME: Daily entry model and the date-keyed entry collection
// ABOUTME: The collection guarantees at most one entry per calendar date
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

use super::profile::{check_range, check_score};
use crate::constants::limits;
use crate::errors::AppResult;

/// One calendar day's logged mood, energy, calories, steps and weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// Calendar date this entry belongs to
    pub date: NaiveDate,
    /// Mood score from 1 to 5
    pub mood: u8,
    /// Energy score from 1 to 5
    pub energy: u8,
    /// Calories consumed (kcal)
    pub calories: u32,
    /// Steps walked
    pub steps: u32,
    /// Body weight in kilograms
    pub weight: f64,
}

impl DailyEntry {
    /// Check scores and weight against the accepted ranges
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` naming the first offending field.
    pub fn validate(&self) -> AppResult<()> {
        check_score("mood", self.mood)?;
        check_score("energy", self.energy)?;
        check_range("weight", self.weight, limits::MIN_WEIGHT_KG, limits::MAX_WEIGHT_KG)
    }
}

/// Mapping from calendar date to daily entry
///
/// Backed by a `BTreeMap`, so iteration is chronological and the most recent
/// entry is the last one. Serializes as a JSON object keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<NaiveDate, DailyEntry>")]
pub struct EntryCollection(BTreeMap<NaiveDate, DailyEntry>);

impl EntryCollection {
    /// Create an empty collection
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert or overwrite the entry for its date, returning the previous one
    pub fn insert(&mut self, entry: DailyEntry) -> Option<DailyEntry> {
        self.0.insert(entry.date, entry)
    }

    /// Entry for a date, if logged
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<&DailyEntry> {
        self.0.get(&date)
    }

    /// Whether a date has an entry
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains_key(&date)
    }

    /// Chronologically most recent entry
    #[must_use]
    pub fn latest(&self) -> Option<&DailyEntry> {
        self.0.values().next_back()
    }

    /// Entries for `days` consecutive dates starting at `start`
    #[must_use]
    pub fn window(&self, start: NaiveDate, days: u32) -> Self {
        let end = start + Duration::days(i64::from(days));
        Self(
            self.0
                .range(start..end)
                .map(|(date, entry)| (*date, entry.clone()))
                .collect(),
        )
    }

    /// Number of logged days
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been logged
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in chronological order
    pub fn iter(&self) -> btree_map::Values<'_, NaiveDate, DailyEntry> {
        self.0.values()
    }
}

impl TryFrom<BTreeMap<NaiveDate, DailyEntry>> for EntryCollection {
    type Error = String;

    fn try_from(map: BTreeMap<NaiveDate, DailyEntry>) -> Result<Self, Self::Error> {
        if let Some((key, entry)) = map.iter().find(|(key, entry)| **key != entry.date) {
            return Err(format!(
                "entry keyed {key} carries date {}; keys must match entry dates",
                entry.date
            ));
        }
        Ok(Self(map))
    }
}

impl FromIterator<DailyEntry> for EntryCollection {
    fn from_iter<I: IntoIterator<Item = DailyEntry>>(iter: I) -> Self {
        Self(iter.into_iter().map(|entry| (entry.date, entry)).collect())
    }
}

impl<'a> IntoIterator for &'a EntryCollection {
    type Item = &'a DailyEntry;
    type IntoIter = btree_map::Values<'a, NaiveDate, DailyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.values()
    }
}
