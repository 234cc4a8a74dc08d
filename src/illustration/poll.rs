use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::Instant;

use super::{GenerationJob, ImageJobService, PollStatus};
use crate::config::ImageGenerationConfig;
use crate::error::GenerationError;

/// Bounds on the polling phase of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Fixed wait before every poll, no backoff
    pub interval: Duration,
    pub max_attempts: u32,
    /// Wall-clock limit across all polls
    pub deadline: Duration,
}

impl PollPolicy {
    pub fn from_config(config: &ImageGenerationConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.poll_interval_ms),
            max_attempts: config.max_attempts,
            deadline: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from_config(&ImageGenerationConfig::default())
    }
}

/// Poll `job` until it is ready, failed, or out of time or attempts.
///
/// Dropping the returned future stops polling at its next suspension point.
pub async fn poll_until_ready(
    service: &dyn ImageJobService,
    job: &GenerationJob,
    policy: &PollPolicy,
) -> Result<String, GenerationError> {
    let started = Instant::now();
    match tokio::time::timeout(policy.deadline, poll_loop(service, job, policy)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            let elapsed = started.elapsed();
            warn!("Generation {} timed out after {:?}", job.id, elapsed);
            Err(GenerationError::Timeout { elapsed })
        }
    }
}

async fn poll_loop(
    service: &dyn ImageJobService,
    job: &GenerationJob,
    policy: &PollPolicy,
) -> Result<String, GenerationError> {
    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;

        match service.poll(job).await? {
            PollStatus::Ready(image_url) => {
                info!("Generation {} ready after {} polls", job.id, attempt);
                return Ok(image_url);
            }
            PollStatus::Failed { status, body } => {
                warn!("Generation {} ended with {}: {}", job.id, status, body);
                return Err(GenerationError::Failed { status, body });
            }
            PollStatus::Pending(status) => {
                debug!("Generation {} poll {}: {}", job.id, attempt, status);
            }
        }
    }

    warn!(
        "Generation {} not ready after {} polls",
        job.id, policy.max_attempts
    );
    Err(GenerationError::AttemptsExhausted {
        attempts: policy.max_attempts,
    })
}
