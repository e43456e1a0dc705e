// ABOUTME: Scripted text-generation provider for tests that must not reach the network
// ABOUTME: Replays queued replies or errors and records every request it receives

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use async_trait::async_trait;
use mypt_server::errors::AppError;
use mypt_server::llm::{ChatRequest, ChatResponse, LlmProvider};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Provider that answers from a fixed script
///
/// Each call pops the next scripted reply; an exhausted script behaves like
/// an unreachable service. With a gate, calls block until the gate is
/// notified, which lets tests observe a request while it is in flight.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, AppError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedProvider {
    /// Provider that returns `replies` in order
    pub fn new(replies: Vec<Result<String, AppError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Provider that always returns the same text once
    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_owned())])
    }

    /// Provider whose single call fails like an unreachable service
    pub fn failing() -> Self {
        Self::new(vec![Err(AppError::external_unavailable(
            "scripted",
            "connection refused",
        ))])
    }

    /// Block each call until `gate` is notified
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Prompt text of the most recent request
    pub fn last_prompt(&self) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|request| request.prompt.clone())
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted (test)"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let reply = self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(AppError::external_unavailable(
                "scripted",
                "no scripted reply left",
            ))
        })?;

        Ok(ChatResponse {
            content: reply,
            model: "scripted-model".to_owned(),
            usage: None,
            finish_reason: Some("stop".to_owned()),
        })
    }
}
