use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{GenerationJob, ImageJobService, PollStatus};
use crate::config::ImageGenerationConfig;
use crate::error::{GenerationError, ImportError};

/// Black Forest Labs image API client.
pub struct BflClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: String,
    polling_url: String,
}

#[derive(Debug, Deserialize)]
struct PollResponse {
    status: String,
    result: Option<PollResult>,
}

#[derive(Debug, Deserialize)]
struct PollResult {
    sample: Option<String>,
}

impl BflClient {
    pub fn new(config: &ImageGenerationConfig, timeout: Duration) -> Result<Self, ImportError> {
        // Try config first, then fall back to environment variable; blank counts as missing
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("BFL_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ImportError::Configuration("BFL_API_KEY not found in config or environment".into())
            })?;

        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .map_err(GenerationError::from)?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            model,
        }
    }
}

#[async_trait]
impl ImageJobService for BflClient {
    async fn submit(&self, prompt: &str) -> Result<GenerationJob, GenerationError> {
        let url = format!("{}/v1/{}", self.base_url, self.model);
        debug!("Submitting generation to {}", url);

        let response = self
            .client
            .post(&url)
            .header("accept", "application/json")
            .header("x-key", &self.api_key)
            .json(&json!({ "prompt": prompt }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Submission {
                status: status.as_u16(),
                body,
            });
        }

        let submitted: SubmitResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::MalformedResponse(format!("{e}: {body}")))?;

        Ok(GenerationJob {
            id: submitted.id,
            polling_url: submitted.polling_url,
        })
    }

    async fn poll(&self, job: &GenerationJob) -> Result<PollStatus, GenerationError> {
        let response = self
            .client
            .get(&job.polling_url)
            .query(&[("id", job.id.as_str())])
            .header("accept", "application/json")
            .header("x-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Failed {
                status: format!("HTTP {}", status.as_u16()),
                body,
            });
        }

        let polled: PollResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::MalformedResponse(format!("{e}: {body}")))?;

        match polled.status.as_str() {
            "Ready" => polled
                .result
                .and_then(|r| r.sample)
                .map(PollStatus::Ready)
                .ok_or_else(|| {
                    GenerationError::MalformedResponse(format!("Ready without result.sample: {body}"))
                }),
            "Error" | "Failed" => Ok(PollStatus::Failed {
                status: polled.status,
                body,
            }),
            _ => Ok(PollStatus::Pending(polled.status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client(server: &Server) -> BflClient {
        BflClient::with_base_url(
            "test-key".to_string(),
            server.url(),
            "flux-kontext-pro".to_string(),
        )
    }

    fn job(server: &Server) -> GenerationJob {
        GenerationJob {
            id: "abc".to_string(),
            polling_url: format!("{}/v1/get_result", server.url()),
        }
    }

    #[tokio::test]
    async fn test_submit() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/flux-kontext-pro")
            .match_header("x-key", "test-key")
            .match_header("accept", "application/json")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({"prompt": "pop art soup"})))
            .with_status(200)
            .with_body(r#"{"id": "abc", "polling_url": "https://api.bfl.ai/v1/get_result?id=abc"}"#)
            .create_async()
            .await;

        let job = client(&server).submit("pop art soup").await.unwrap();
        assert_eq!(job.id, "abc");
        assert_eq!(job.polling_url, "https://api.bfl.ai/v1/get_result?id=abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/flux-kontext-pro")
            .with_status(402)
            .with_body(r#"{"detail": "Insufficient credits"}"#)
            .create_async()
            .await;

        let result = client(&server).submit("prompt").await;
        match result {
            Err(GenerationError::Submission { status, body }) => {
                assert_eq!(status, 402);
                assert!(body.contains("Insufficient credits"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_unparseable() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/flux-kontext-pro")
            .with_status(200)
            .with_body(r#"{"status": "queued"}"#)
            .create_async()
            .await;

        let result = client(&server).submit("prompt").await;
        assert!(matches!(result, Err(GenerationError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_poll_statuses() {
        let mut server = Server::new_async().await;
        let client = client(&server);
        let job = job(&server);

        let pending = server
            .mock("GET", "/v1/get_result")
            .match_query(Matcher::UrlEncoded("id".into(), "abc".into()))
            .match_header("x-key", "test-key")
            .with_status(200)
            .with_body(r#"{"id": "abc", "status": "Pending", "result": null}"#)
            .create_async()
            .await;
        assert_eq!(
            client.poll(&job).await.unwrap(),
            PollStatus::Pending("Pending".to_string())
        );
        pending.assert_async().await;
        pending.remove_async().await;

        let ready = server
            .mock("GET", "/v1/get_result")
            .match_query(Matcher::UrlEncoded("id".into(), "abc".into()))
            .with_status(200)
            .with_body(r#"{"id": "abc", "status": "Ready", "result": {"sample": "https://x/y.png"}}"#)
            .create_async()
            .await;
        assert_eq!(
            client.poll(&job).await.unwrap(),
            PollStatus::Ready("https://x/y.png".to_string())
        );
        ready.remove_async().await;

        let _failed = server
            .mock("GET", "/v1/get_result")
            .match_query(Matcher::UrlEncoded("id".into(), "abc".into()))
            .with_status(200)
            .with_body(r#"{"id": "abc", "status": "Error", "details": "moderated"}"#)
            .create_async()
            .await;
        match client.poll(&job).await.unwrap() {
            PollStatus::Failed { status, body } => {
                assert_eq!(status, "Error");
                assert!(body.contains("moderated"));
            }
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ready_without_sample_is_malformed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/get_result")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status": "Ready"}"#)
            .create_async()
            .await;

        let result = client(&server).poll(&job(&server)).await;
        assert!(matches!(result, Err(GenerationError::MalformedResponse(_))));
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let config = ImageGenerationConfig {
            api_key: Some("  ".to_string()),
            ..ImageGenerationConfig::default()
        };
        let result = BflClient::new(&config, Duration::from_secs(5));
        assert!(matches!(result, Err(ImportError::Configuration(_))));
    }
}
