//! Fakes shared by unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{GenerationError, ProviderError};
use crate::illustration::{GenerationJob, ImageJobService, PollStatus};
use crate::providers::{CompletionRequest, LlmProvider};

/// Replays canned outputs and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    pub outputs: Mutex<Vec<String>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
    pub calls: AtomicUsize,
    pub vision: bool,
}

impl ScriptedProvider {
    pub fn replying(outputs: &[&str]) -> Self {
        Self {
            outputs: Mutex::new(outputs.iter().rev().map(|s| s.to_string()).collect()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    fn supports_vision(&self) -> bool {
        self.vision
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.outputs
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| ProviderError::MalformedResponse("no scripted output".to_string()))
    }
}

/// Image service that answers polls from a script, then stays "Pending".
#[derive(Default)]
pub struct ScriptedJobService {
    pub statuses: Mutex<VecDeque<PollStatus>>,
    pub prompts: Mutex<Vec<String>>,
    pub polls: AtomicUsize,
    pub fail_polls: AtomicBool,
}

impl ScriptedJobService {
    pub fn with_statuses(statuses: Vec<PollStatus>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ImageJobService for ScriptedJobService {
    async fn submit(&self, prompt: &str) -> Result<GenerationJob, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(GenerationJob {
            id: "job-1".to_string(),
            polling_url: "https://x/poll".to_string(),
        })
    }

    async fn poll(&self, _job: &GenerationJob) -> Result<PollStatus, GenerationError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if self.fail_polls.load(Ordering::SeqCst) {
            return Err(GenerationError::MalformedResponse("scripted failure".to_string()));
        }
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| PollStatus::Pending("Pending".to_string())))
    }
}
