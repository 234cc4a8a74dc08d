use super::ScrapeError;
use log::debug;
use reqwest::Client;
use std::time::Duration;

pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status(status.as_u16()));
        }
        let html = response.text().await?;
        debug!("Fetched {} bytes from {}", html.len(), url);
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipe")
            .match_header("user-agent", "TestAgent/1.0")
            .with_status(200)
            .with_body("<html></html>")
            .create_async()
            .await;

        let fetcher = RequestFetcher::new(Duration::from_secs(5), "TestAgent/1.0").unwrap();
        let html = fetcher
            .fetch(&format!("{}/recipe", server.url()))
            .await
            .unwrap();
        assert_eq!(html, "<html></html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = RequestFetcher::new(Duration::from_secs(5), "TestAgent/1.0").unwrap();
        let result = fetcher.fetch(&format!("{}/gone", server.url())).await;
        assert!(matches!(result, Err(ScrapeError::Status(404))));
    }
}
