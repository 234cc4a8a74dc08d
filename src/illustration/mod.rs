//! Recipe illustrations: a language model writes the image prompt, then an
//! asynchronous image service renders it behind a submit/poll protocol.

mod bfl;
mod poll;

pub use bfl::BflClient;
pub use poll::{poll_until_ready, PollPolicy};

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use crate::error::{GenerationError, ImportError};
use crate::model::Recipe;
use crate::prompt;
use crate::providers::{CompletionRequest, LlmProvider, Message};

/// Handle returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    pub id: String,
    pub polling_url: String,
}

/// Outcome of a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    /// Terminal success with the image reference
    Ready(String),
    /// Terminal failure; `body` is the full response
    Failed { status: String, body: String },
    /// Any other status, e.g. "Pending" or "Submitted"
    Pending(String),
}

/// Submit/poll image-generation backend.
#[async_trait]
pub trait ImageJobService: Send + Sync {
    async fn submit(&self, prompt: &str) -> Result<GenerationJob, GenerationError>;

    async fn poll(&self, job: &GenerationJob) -> Result<PollStatus, GenerationError>;
}

pub struct IllustrationGenerator {
    provider: Arc<dyn LlmProvider>,
    service: Arc<dyn ImageJobService>,
    policy: PollPolicy,
}

impl IllustrationGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, service: Arc<dyn ImageJobService>) -> Self {
        Self {
            provider,
            service,
            policy: PollPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Ask the model for an image prompt. The reply is used as-is.
    pub async fn image_prompt(&self, recipe: &Recipe) -> Result<String, GenerationError> {
        let request = CompletionRequest::new(vec![
            Message::system(prompt::ILLUSTRATION_SYSTEM),
            Message::user(prompt::illustration_user(recipe)),
        ]);

        let image_prompt = self.provider.complete(&request).await?;
        debug!("Generated image prompt: {}", image_prompt);
        Ok(image_prompt)
    }

    /// Render an illustration for `recipe` and return the image URL.
    pub async fn generate_illustration(&self, recipe: &Recipe) -> Result<String, ImportError> {
        let image_prompt = self.image_prompt(recipe).await?;
        let job = self.service.submit(&image_prompt).await?;
        debug!("Submitted generation {} ({})", job.id, job.polling_url);

        let image_url = poll_until_ready(self.service.as_ref(), &job, &self.policy).await?;
        Ok(image_url)
    }
}
