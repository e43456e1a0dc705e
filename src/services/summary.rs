// ABOUTME: AI summary client: prompt, single model call, reply normalization and heuristic fallback
// ABOUTME: Also applies accepted summaries and sign-up target seeding to stored profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # AI Summary Client
//!
//! One attempt per request, no retries. Both failure kinds (the call itself
//! failing, or the reply carrying no JSON object) are answered with the
//! deterministic heuristic, so callers always receive a result; the
//! [`SummarySource`] says which path produced it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::response_parser::{extract_reply, ParsedRecommendation};
use super::sessions::SummarySessions;
use crate::constants::{calendar, fallback, targets as default_targets};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::intelligence::{
    daily_targets, heuristic_recommendation, latest_weight, round_half_up, GoalAdjustmentPolicy,
};
use crate::llm::{build_summary_prompt, ChatRequest, LlmProvider};
use crate::logging::AppLogger;
use crate::models::{AiSummaryResult, DailyTargets, EntryCollection, SummaryRequest, UserProfile};

/// Why the model's answer could not be used
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The text-generation service was unreachable, refused, or errored
    #[error("text-generation service failed: {0}")]
    Transport(String),
    /// The reply contained no parseable JSON object
    #[error("model reply contained no JSON object")]
    MalformedResponse {
        /// The reply text as received
        raw: String,
    },
}

impl SummaryError {
    /// Classification recorded on fallback outcomes
    #[must_use]
    pub const fn reason(&self) -> FallbackReason {
        match self {
            Self::Transport(_) => FallbackReason::Transport,
            Self::MalformedResponse { .. } => FallbackReason::MalformedResponse,
        }
    }
}

/// Failure class behind a fallback result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// See [`SummaryError::Transport`]
    Transport,
    /// See [`SummaryError::MalformedResponse`]
    MalformedResponse,
}

/// Which path produced a summary result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummarySource {
    /// Parsed from the model's reply
    Model,
    /// Heuristic used in place of the model's reply
    Fallback {
        /// Failure class
        reason: FallbackReason,
        /// Error message
        detail: String,
    },
}

impl SummarySource {
    /// Short label for logs
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Fallback {
                reason: FallbackReason::Transport,
                ..
            } => "fallback_transport",
            Self::Fallback {
                reason: FallbackReason::MalformedResponse,
                ..
            } => "fallback_malformed",
        }
    }
}

/// A summary result and where it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryOutcome {
    /// The recommendation
    pub result: AiSummaryResult,
    /// Model or fallback
    pub source: SummarySource,
}

/// Profile stored at sign-up and the summary its targets were seeded from
#[derive(Debug, Clone, Serialize)]
pub struct SignupOutcome {
    /// Stored profile with seeded targets
    pub profile: UserProfile,
    /// Summary used for seeding
    pub summary: SummaryOutcome,
}

/// AI summary client
pub struct SummaryService {
    provider: Option<Arc<dyn LlmProvider>>,
    max_tokens: u32,
    goal_policy: GoalAdjustmentPolicy,
    sessions: SummarySessions,
}

impl SummaryService {
    /// Create a client; `None` provider means every request takes the fallback
    #[must_use]
    pub fn new(
        provider: Option<Arc<dyn LlmProvider>>,
        max_tokens: u32,
        goal_policy: GoalAdjustmentPolicy,
    ) -> Self {
        Self {
            provider,
            max_tokens,
            goal_policy,
            sessions: SummarySessions::new(),
        }
    }

    /// Configured goal adjustment policy
    #[must_use]
    pub const fn goal_policy(&self) -> GoalAdjustmentPolicy {
        self.goal_policy
    }

    /// Per-user request state
    #[must_use]
    pub const fn sessions(&self) -> &SummarySessions {
        &self.sessions
    }

    /// Whether a text-generation provider is configured
    #[must_use]
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Produce a recommendation for `request`
    ///
    /// `targets` are the active daily targets, used in place of missing or
    /// non-positive calorie/step suggestions.
    pub async fn generate(
        &self,
        request: &SummaryRequest,
        targets: DailyTargets,
        now: DateTime<Utc>,
    ) -> SummaryOutcome {
        let prompt = build_summary_prompt(request, now);
        let normalized = match self.request_completion(prompt).await {
            Ok(text) => self.normalize(&text, request, targets),
            Err(e) => Err(e),
        };

        match normalized {
            Ok(result) => SummaryOutcome {
                result,
                source: SummarySource::Model,
            },
            Err(error) => {
                warn!(reason = ?error.reason(), "Using heuristic summary fallback: {error}");
                SummaryOutcome {
                    result: fallback_result(request, &error),
                    source: SummarySource::Fallback {
                        reason: error.reason(),
                        detail: error.to_string(),
                    },
                }
            }
        }
    }

    async fn request_completion(&self, prompt: String) -> Result<String, SummaryError> {
        let Some(provider) = &self.provider else {
            return Err(SummaryError::Transport(
                "no text-generation provider configured".to_owned(),
            ));
        };

        let request = ChatRequest::new(prompt).with_max_tokens(self.max_tokens);

        let response = provider
            .complete(&request)
            .await
            .map_err(|e| SummaryError::Transport(e.to_string()))?;

        debug!(
            provider = provider.name(),
            model = %response.model,
            total_tokens = response.usage.as_ref().map(|usage| usage.total_tokens),
            finish_reason = response.finish_reason.as_deref(),
            "Summary completion received"
        );
        Ok(response.content)
    }

    /// Turn the model's reply into a recommendation
    ///
    /// Prose around the JSON object becomes the summary when present.
    /// Missing or non-positive numbers fall back to the current goal weight
    /// and `targets`; a suggested goal weight passes through the goal policy.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` when the reply has no JSON object
    pub fn normalize(
        &self,
        text: &str,
        request: &SummaryRequest,
        targets: DailyTargets,
    ) -> Result<AiSummaryResult, SummaryError> {
        let reply = extract_reply(text).ok_or_else(|| SummaryError::MalformedResponse {
            raw: text.to_owned(),
        })?;
        let parsed = ParsedRecommendation::from_object(&reply.object);

        let summary = if reply.prose.is_empty() {
            parsed
                .summary
                .unwrap_or_else(|| fallback::ENCOURAGEMENT.to_owned())
        } else {
            reply.prose
        };

        let new_goal_weight = parsed
            .new_goal_weight
            .filter(|weight| *weight > 0.0)
            .map_or(request.goal_weight, |weight| {
                self.goal_policy.apply(weight, request.goal_weight)
            });

        Ok(AiSummaryResult {
            summary,
            new_goal_weight,
            recommended_calories: positive_rounded(parsed.recommended_calories)
                .unwrap_or_else(|| i64::from(targets.calories)),
            recommended_steps: positive_rounded(parsed.recommended_steps)
                .unwrap_or_else(|| i64::from(targets.steps)),
        })
    }

    /// Summarize a stored user's current week (today plus the next six days)
    ///
    /// # Errors
    ///
    /// Returns `ResourceLocked` while another request for the user is in
    /// flight, `ResourceNotFound` without a profile, or a database error
    #[instrument(skip(self, database), fields(user.id = %user_id))]
    pub async fn summarize_user(
        &self,
        database: &Database,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<SummaryOutcome> {
        let ticket = self.sessions.begin(user_id)?;
        let started = Instant::now();

        match self.summarize_stored(database, user_id, now).await {
            Ok(outcome) => {
                record_outcome(user_id, &outcome, started);
                ticket.succeed(&outcome);
                Ok(outcome)
            }
            Err(e) => {
                ticket.fail(&e);
                Err(e)
            }
        }
    }

    async fn summarize_stored(
        &self,
        database: &Database,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<SummaryOutcome> {
        let profile = database.require_profile(user_id).await?;
        let entries = database.get_entries(user_id).await?;
        let today = now.date_naive();

        let request = SummaryRequest::from_profile(
            &profile,
            entries.window(today, calendar::DAYS_PER_WEEK),
            today,
            latest_weight(&profile, &entries),
        );
        Ok(self.generate(&request, daily_targets(&profile), now).await)
    }

    /// Store a new profile with targets seeded from an initial summary
    ///
    /// The summary is requested with no entries and the start weight as the
    /// current weight.
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for an invalid profile (before any model
    /// call), `ResourceLocked` while another request is in flight, or a
    /// database error
    #[instrument(skip(self, database, profile), fields(user.id = %user_id))]
    pub async fn signup(
        &self,
        database: &Database,
        user_id: &str,
        profile: UserProfile,
        now: DateTime<Utc>,
    ) -> AppResult<SignupOutcome> {
        profile.validate()?;
        let ticket = self.sessions.begin(user_id)?;
        let started = Instant::now();
        let today = now.date_naive();

        let request =
            SummaryRequest::from_profile(&profile, EntryCollection::new(), today, profile.weight);
        let summary = self.generate(&request, daily_targets(&profile), now).await;
        record_outcome(user_id, &summary, started);

        let seeded = seed_targets(&profile, &summary.result);
        if let Err(e) = database.upsert_profile(user_id, &seeded).await {
            ticket.fail(&e);
            return Err(e);
        }
        ticket.succeed(&summary);

        Ok(SignupOutcome {
            profile: seeded,
            summary,
        })
    }

    /// Write an accepted summary into the user's profile
    ///
    /// Without an explicit `result`, the user's last successful summary is
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` without a profile or a summary to accept,
    /// `ValueOutOfRange` if the accepted values are invalid, or a database error
    #[instrument(skip(self, database, result), fields(user.id = %user_id))]
    pub async fn accept(
        &self,
        database: &Database,
        user_id: &str,
        result: Option<AiSummaryResult>,
    ) -> AppResult<UserProfile> {
        let profile = database.require_profile(user_id).await?;
        let result = match result {
            Some(result) => result,
            None => self
                .sessions
                .state(user_id)
                .succeeded_result()
                .cloned()
                .ok_or_else(|| AppError::not_found(format!("Summary to accept for user {user_id}")))?,
        };

        let updated = apply_accepted_summary(&profile, &result, self.goal_policy);
        database.upsert_profile(user_id, &updated).await?;
        info!(
            goal_weight = updated.goal_weight,
            target_calories = ?updated.target_calories,
            target_steps = ?updated.target_steps,
            "Accepted AI summary"
        );
        Ok(updated)
    }
}

/// Heuristic result for a failed request
///
/// An unparseable reply is still shown to the user as the summary text.
#[must_use]
pub fn fallback_result(request: &SummaryRequest, error: &SummaryError) -> AiSummaryResult {
    let mut result = heuristic_recommendation(request.current_weight, request.goal_weight);
    if let SummaryError::MalformedResponse { raw } = error {
        let raw = raw.trim();
        if !raw.is_empty() {
            raw.clone_into(&mut result.summary);
        }
    }
    result
}

/// Profile after accepting `result`
///
/// The goal weight passes through `policy`; non-positive suggestions leave the
/// corresponding profile field unchanged.
#[must_use]
pub fn apply_accepted_summary(
    profile: &UserProfile,
    result: &AiSummaryResult,
    policy: GoalAdjustmentPolicy,
) -> UserProfile {
    let goal_weight = if result.new_goal_weight > 0.0 {
        policy.apply(result.new_goal_weight, profile.goal_weight)
    } else {
        profile.goal_weight
    };

    UserProfile {
        goal_weight,
        target_calories: positive_u32(result.recommended_calories).or(profile.target_calories),
        target_steps: positive_u32(result.recommended_steps).or(profile.target_steps),
        ..profile.clone()
    }
}

/// Profile with targets taken from a sign-up summary, defaulting non-positive values
#[must_use]
pub fn seed_targets(profile: &UserProfile, result: &AiSummaryResult) -> UserProfile {
    UserProfile {
        target_calories: Some(
            positive_u32(result.recommended_calories)
                .unwrap_or(default_targets::DEFAULT_DAILY_CALORIES),
        ),
        target_steps: Some(
            positive_u32(result.recommended_steps).unwrap_or(default_targets::DEFAULT_DAILY_STEPS),
        ),
        ..profile.clone()
    }
}

fn positive_rounded(value: Option<f64>) -> Option<i64> {
    value.map(round_half_up).filter(|v| *v > 0)
}

fn positive_u32(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|v| *v > 0)
}

fn record_outcome(user_id: &str, outcome: &SummaryOutcome, started: Instant) {
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    AppLogger::log_summary_event(user_id, outcome.source.label(), duration_ms);
}

/// Log a summary produced without a stored user
pub fn record_anonymous_outcome(outcome: &SummaryOutcome, started: Instant) {
    record_outcome("anonymous", outcome, started);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sex;
    use chrono::NaiveDate;

    const TARGETS: DailyTargets = DailyTargets {
        calories: 2000,
        steps: 8000,
    };

    fn request() -> SummaryRequest {
        SummaryRequest {
            entries: EntryCollection::new(),
            week_start: NaiveDate::from_ymd_opt(2025, 6, 2),
            current_weight: 80.0,
            goal_weight: 70.0,
            start_weight: 85.0,
            target_date: NaiveDate::from_ymd_opt(2025, 12, 31),
            height: 175.0,
            sex: Sex::Male,
            activity_level: 3,
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            height: 175.0,
            sex: Sex::Male,
            weight: 85.0,
            activity_level: 3,
            goal_weight: 70.0,
            target_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            target_calories: None,
            target_steps: None,
        }
    }

    fn service(policy: GoalAdjustmentPolicy) -> SummaryService {
        SummaryService::new(None, 1000, policy)
    }

    #[test]
    fn test_normalize_uses_prose_as_summary() {
        let text = r#"Great job! {"summary":"x","newGoalWeight":72,"recommendedCalories":1800.4,"recommendedSteps":9000} Keep going!"#;
        let result = service(GoalAdjustmentPolicy::NeverLower)
            .normalize(text, &request(), TARGETS)
            .unwrap();
        assert_eq!(result.summary, "Great job!\n\nKeep going!");
        assert!((result.new_goal_weight - 72.0).abs() < f64::EPSILON);
        assert_eq!(result.recommended_calories, 1800);
        assert_eq!(result.recommended_steps, 9000);
    }

    #[test]
    fn test_normalize_falls_back_to_json_summary_and_targets() {
        let text = r#"{"summary":"Solid week.","recommendedCalories":0}"#;
        let result = service(GoalAdjustmentPolicy::NeverLower)
            .normalize(text, &request(), TARGETS)
            .unwrap();
        assert_eq!(result.summary, "Solid week.");
        assert!((result.new_goal_weight - 70.0).abs() < f64::EPSILON);
        assert_eq!(result.recommended_calories, 2000);
        assert_eq!(result.recommended_steps, 8000);
    }

    #[test]
    fn test_normalize_applies_goal_policy() {
        let text = r#"{"summary":"s","newGoalWeight":65}"#;
        let never_lower = service(GoalAdjustmentPolicy::NeverLower)
            .normalize(text, &request(), TARGETS)
            .unwrap();
        assert!((never_lower.new_goal_weight - 70.0).abs() < f64::EPSILON);

        let unrestricted = service(GoalAdjustmentPolicy::Unrestricted)
            .normalize(text, &request(), TARGETS)
            .unwrap();
        assert!((unrestricted.new_goal_weight - 65.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_without_json_is_malformed() {
        let err = service(GoalAdjustmentPolicy::NeverLower)
            .normalize("I can't do that.", &request(), TARGETS)
            .unwrap_err();
        assert_eq!(err.reason(), FallbackReason::MalformedResponse);
    }

    #[tokio::test]
    async fn test_generate_without_provider_uses_heuristic() {
        let outcome = service(GoalAdjustmentPolicy::NeverLower)
            .generate(&request(), TARGETS, Utc::now())
            .await;
        assert_eq!(outcome.result.recommended_calories, 1500);
        assert_eq!(outcome.result.recommended_steps, 10_000);
        assert!((outcome.result.new_goal_weight - 70.0).abs() < f64::EPSILON);
        assert_eq!(outcome.result.summary, fallback::ENCOURAGEMENT);
        assert_eq!(outcome.source.label(), "fallback_transport");
    }

    #[test]
    fn test_malformed_fallback_keeps_reply_text() {
        let error = SummaryError::MalformedResponse {
            raw: "  Eat more greens.  ".to_owned(),
        };
        let result = fallback_result(&request(), &error);
        assert_eq!(result.summary, "Eat more greens.");
        assert_eq!(result.recommended_calories, 1500);
    }

    #[test]
    fn test_accept_respects_policy_and_ignores_non_positive() {
        let result = AiSummaryResult {
            summary: String::new(),
            new_goal_weight: 66.0,
            recommended_calories: 1750,
            recommended_steps: -5,
        };
        let updated =
            apply_accepted_summary(&profile(), &result, GoalAdjustmentPolicy::NeverLower);
        assert!((updated.goal_weight - 70.0).abs() < f64::EPSILON);
        assert_eq!(updated.target_calories, Some(1750));
        assert_eq!(updated.target_steps, None);

        let updated =
            apply_accepted_summary(&profile(), &result, GoalAdjustmentPolicy::Unrestricted);
        assert!((updated.goal_weight - 66.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_seed_targets_defaults_non_positive() {
        let result = AiSummaryResult {
            summary: String::new(),
            new_goal_weight: 70.0,
            recommended_calories: 0,
            recommended_steps: 11_000,
        };
        let seeded = seed_targets(&profile(), &result);
        assert_eq!(seeded.target_calories, Some(2000));
        assert_eq!(seeded.target_steps, Some(11_000));
    }
}
