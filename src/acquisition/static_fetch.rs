//! Plain HTTP acquisition of the forecast page.
//!
//! Not a browser -- one GET with a realistic user agent. No retry and no
//! client-side deadline: a failure here just moves the resolver on, and
//! callers that need a bound put one around the whole resolution.

use crate::config::ScrapeConfig;
use anyhow::{bail, Context, Result};
use url::Url;

/// HTTP fetcher for the static acquisition path.
#[derive(Clone)]
pub struct StaticFetcher {
    client: reqwest::Client,
    source_url: String,
}

impl StaticFetcher {
    /// Build a fetcher from scrape configuration. Infallible: a client
    /// that cannot be configured falls back to reqwest defaults.
    pub fn new(config: &ScrapeConfig) -> Self {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(&config.user_agent)
            .build()
            .unwrap_or_default();

        Self {
            client,
            source_url: config.source_url.clone(),
        }
    }

    /// Fetch the forecast page once. Transport errors and non-2xx statuses
    /// both surface as `Err`.
    pub async fn fetch(&self) -> Result<String> {
        let url = Url::parse(&self.source_url)
            .with_context(|| format!("invalid source url: {}", self.source_url))?;

        tracing::debug!("static fetch: GET {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("source returned {status} for {url}");
        }

        response.text().await.context("reading response body")
    }

    /// URL the fetcher targets.
    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(uri: String) -> ScrapeConfig {
        ScrapeConfig {
            source_url: uri,
            ..ScrapeConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_body_on_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("臺北市 降雨機率：75%"))
            .mount(&server)
            .await;

        let fetcher = StaticFetcher::new(&config_for(format!("{}/forecast", server.uri())));
        let body = fetcher.fetch().await.unwrap();
        assert!(body.contains("降雨機率"));
    }

    #[tokio::test]
    async fn test_fetch_errors_on_500_without_retrying() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = StaticFetcher::new(&config_for(server.uri()));
        assert!(fetcher.fetch().await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_errors_on_invalid_url() {
        let fetcher = StaticFetcher::new(&config_for("not a url".to_string()));
        assert!(fetcher.fetch().await.is_err());
    }
}
