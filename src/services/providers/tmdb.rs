//! TMDB (The Movie Database) provider
//!
//! Uses the movie search endpoint: GET {api_url}/search/movie with the title
//! as `query`. Adult results are excluded.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::TmdbSearchResponse,
    services::providers::PosterProvider,
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    /// Creates a provider whose requests give up after `timeout`
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbProvider {
    async fn search_poster_path(&self, title: &str) -> AppResult<Option<String>> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search title cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/search/movie", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", title),
                ("include_adult", "false"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let search: TmdbSearchResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::debug!(response = %response_text, "Raw TMDB API response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })?;

        let poster_path = search.first_poster_path().map(str::to_string);

        tracing::info!(
            title = %title,
            results = search.results.len(),
            found = poster_path.is_some(),
            provider = "tmdb",
            "Poster search completed"
        );

        Ok(poster_path)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn provider_for(server: &MockServer, timeout: Duration) -> TmdbProvider {
        TmdbProvider::new("test_key".to_string(), format!("{}/", server.uri()), timeout).unwrap()
    }

    #[tokio::test]
    async fn test_sends_expected_query_and_returns_first_poster() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("api_key", "test_key"))
            .and(query_param("query", "Inception"))
            .and(query_param("include_adult", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [
                    {"id": 1, "title": "Inception", "poster_path": null},
                    {"id": 27205, "title": "Inception", "poster_path": "/inception.jpg"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, Duration::from_secs(5));
        let result = assert_ok!(provider.search_poster_path("Inception").await);

        assert_eq!(result.as_deref(), Some("/inception.jpg"));
    }

    #[tokio::test]
    async fn test_empty_results_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;

        let provider = provider_for(&server, Duration::from_secs(5));
        let result = assert_ok!(provider.search_poster_path("Nothing").await);

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_error_status_is_external_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let provider = provider_for(&server, Duration::from_secs(5));
        let result = provider.search_poster_path("Inception").await;

        assert!(matches!(result, Err(AppError::ExternalApi(msg)) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_malformed_body_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let provider = provider_for(&server, Duration::from_secs(5));
        assert_err!(provider.search_poster_path("Inception").await);
    }

    #[tokio::test]
    async fn test_timeout_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"results": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let provider = provider_for(&server, Duration::from_millis(50));
        let result = provider.search_poster_path("Inception").await;

        assert!(matches!(result, Err(AppError::HttpClient(e)) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_blank_title_rejected() {
        let provider =
            TmdbProvider::new("k".to_string(), "http://test.local".to_string(), Duration::from_secs(1))
                .unwrap();
        assert!(matches!(
            provider.search_poster_path("  ").await,
            Err(AppError::InvalidInput(_))
        ));
    }
}
