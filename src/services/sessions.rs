// ABOUTME: Per-user AI summary request state machine: Idle, Requesting, Succeeded, Failed
// ABOUTME: Rejects overlapping requests so at most one summary is in flight per user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use super::summary::{SummaryOutcome, SummarySource};
use crate::errors::{AppError, AppResult};
use crate::models::AiSummaryResult;

/// Where a user's most recent summary request stands
#[derive(Debug, Clone, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SummaryState {
    /// No request made since the server started
    #[default]
    Idle,
    /// A request is in flight
    Requesting {
        /// Identifier of the in-flight request
        request_id: Uuid,
        /// When it started
        started_at: DateTime<Utc>,
    },
    /// The last request produced a result (from the model or the fallback)
    Succeeded {
        /// Identifier of the finished request
        request_id: Uuid,
        /// Which path produced the result
        source: SummarySource,
        /// The recommendation
        result: AiSummaryResult,
        /// When it finished
        finished_at: DateTime<Utc>,
    },
    /// The last request could not produce a result
    Failed {
        /// Identifier of the finished request
        request_id: Uuid,
        /// What went wrong
        error: String,
        /// When it finished
        finished_at: DateTime<Utc>,
    },
}

impl SummaryState {
    /// Whether a request is in flight
    #[must_use]
    pub const fn is_requesting(&self) -> bool {
        matches!(self, Self::Requesting { .. })
    }

    /// The result of the last successful request, if that is the current state
    #[must_use]
    pub const fn succeeded_result(&self) -> Option<&AiSummaryResult> {
        match self {
            Self::Succeeded { result, .. } => Some(result),
            _ => None,
        }
    }
}

/// Summary request state for every user
///
/// Entries are never evicted: one small state per user who has requested a
/// summary, kept so a later accept can reuse the last result. The map grows
/// with the user base, like the profile table, and resets on restart.
#[derive(Debug, Default)]
pub struct SummarySessions {
    states: DashMap<String, SummaryState>,
}

impl SummarySessions {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a user (`Idle` if never requested)
    #[must_use]
    pub fn state(&self, user_id: &str) -> SummaryState {
        self.states
            .get(user_id)
            .map(|state| state.value().clone())
            .unwrap_or_default()
    }

    /// Move a user to `Requesting`
    ///
    /// # Errors
    ///
    /// Returns `ResourceLocked` if a request is already in flight for the user
    pub fn begin(&self, user_id: &str) -> AppResult<SummaryTicket<'_>> {
        let request_id = Uuid::new_v4();
        let requesting = SummaryState::Requesting {
            request_id,
            started_at: Utc::now(),
        };

        match self.states.entry(user_id.to_owned()) {
            Entry::Occupied(entry) if entry.get().is_requesting() => {
                warn!(user.id = %user_id, "Rejected overlapping summary request");
                return Err(AppError::locked(format!(
                    "A summary request is already in progress for user {user_id}"
                )));
            }
            Entry::Occupied(mut entry) => {
                entry.insert(requesting);
            }
            Entry::Vacant(entry) => {
                entry.insert(requesting);
            }
        }

        debug!(user.id = %user_id, request.id = %request_id, "Summary request started");
        Ok(SummaryTicket {
            sessions: self,
            user_id: user_id.to_owned(),
            request_id,
            finished: false,
        })
    }

    fn finish(&self, user_id: &str, request_id: Uuid, state: SummaryState) {
        // Only the request that owns the Requesting slot may move it on
        if let Some(mut current) = self.states.get_mut(user_id) {
            if matches!(*current, SummaryState::Requesting { request_id: id, .. } if id == request_id)
            {
                *current = state;
            }
        }
    }
}

/// Proof that a user's summary request is in flight
///
/// Dropping the ticket without finishing it (the HTTP request was cancelled)
/// moves the user to `Failed` so later requests are not locked out.
#[derive(Debug)]
pub struct SummaryTicket<'a> {
    sessions: &'a SummarySessions,
    user_id: String,
    request_id: Uuid,
    finished: bool,
}

impl SummaryTicket<'_> {
    /// Identifier of this request
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Record the outcome and move to `Succeeded`
    pub fn succeed(mut self, outcome: &SummaryOutcome) {
        self.finished = true;
        self.sessions.finish(
            &self.user_id,
            self.request_id,
            SummaryState::Succeeded {
                request_id: self.request_id,
                source: outcome.source.clone(),
                result: outcome.result.clone(),
                finished_at: Utc::now(),
            },
        );
    }

    /// Record the error and move to `Failed`
    pub fn fail(mut self, error: &AppError) {
        self.finished = true;
        self.sessions
            .finish(&self.user_id, self.request_id, self.failed_state(error.to_string()));
    }

    fn failed_state(&self, error: String) -> SummaryState {
        SummaryState::Failed {
            request_id: self.request_id,
            error,
            finished_at: Utc::now(),
        }
    }
}

impl Drop for SummaryTicket<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let state = self.failed_state("Summary request was cancelled".to_owned());
            self.sessions.finish(&self.user_id, self.request_id, state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn outcome() -> SummaryOutcome {
        SummaryOutcome {
            result: AiSummaryResult {
                summary: "ok".to_owned(),
                new_goal_weight: 70.0,
                recommended_calories: 1800,
                recommended_steps: 9000,
            },
            source: SummarySource::Model,
        }
    }

    #[test]
    fn test_idle_by_default() {
        let sessions = SummarySessions::new();
        assert!(matches!(sessions.state("u1"), SummaryState::Idle));
    }

    #[test]
    fn test_overlapping_request_is_locked() {
        let sessions = SummarySessions::new();
        let ticket = sessions.begin("u1").unwrap();
        assert!(sessions.state("u1").is_requesting());

        let err = sessions.begin("u1").unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceLocked);

        // Other users are unaffected
        let other = sessions.begin("u2").unwrap();
        other.succeed(&outcome());

        ticket.succeed(&outcome());
        assert_eq!(
            sessions.state("u1").succeeded_result().map(|r| r.recommended_steps),
            Some(9000)
        );
        assert!(sessions.begin("u1").is_ok());
    }

    #[test]
    fn test_failure_is_recorded() {
        let sessions = SummarySessions::new();
        let ticket = sessions.begin("u1").unwrap();
        ticket.fail(&AppError::not_found("Profile for user u1"));
        match sessions.state("u1") {
            SummaryState::Failed { error, .. } => assert!(error.contains("not found")),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn test_dropped_ticket_releases_lock() {
        let sessions = SummarySessions::new();
        drop(sessions.begin("u1").unwrap());
        assert!(matches!(sessions.state("u1"), SummaryState::Failed { .. }));
        assert!(sessions.begin("u1").is_ok());
    }

    #[test]
    fn test_one_retained_state_per_user() {
        let sessions = SummarySessions::new();
        for _ in 0..3 {
            sessions.begin("u1").unwrap().succeed(&outcome());
        }
        sessions.begin("u2").unwrap().fail(&AppError::not_found("Profile"));

        assert_eq!(sessions.states.len(), 2);
        assert!(sessions.state("u1").succeeded_result().is_some());
    }

    #[test]
    fn test_state_serializes_with_tag() {
        let sessions = SummarySessions::new();
        sessions.begin("u1").unwrap().succeed(&outcome());
        let value = serde_json::to_value(sessions.state("u1")).unwrap();
        assert_eq!(value["state"], "succeeded");
        assert_eq!(value["result"]["recommendedCalories"], 1800);
        assert!(value["requestId"].is_string());
        assert!(value["finishedAt"].is_string());
    }
}
