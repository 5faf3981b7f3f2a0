use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::TmdbConfig;
use crate::services::poster::{EnrichmentError, PosterSource};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub poster_path: Option<String>,
}

/// Movie search against The Movie Database (v3 API).
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("Marquee/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build TMDB HTTP client: {e}"))?;

        Ok(Self::with_client(client, config))
    }

    #[must_use]
    pub fn with_client(client: Client, config: &TmdbConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn search_url(&self, title: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/search/movie", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("query", title);
        Ok(url)
    }

    pub async fn search_movies(&self, title: &str) -> Result<Vec<SearchResult>> {
        let url = self.search_url(title)?;

        debug!("Searching TMDB for: {}", title);

        let response: SearchResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.results)
    }
}

/// Poster of the first result, if it has one.
fn first_poster(results: Vec<SearchResult>) -> Option<String> {
    results
        .into_iter()
        .next()
        .and_then(|r| r.poster_path)
        .filter(|p| !p.is_empty())
}

#[async_trait::async_trait]
impl PosterSource for TmdbClient {
    async fn find_poster(&self, title: &str) -> Result<Option<String>, EnrichmentError> {
        let results = self
            .search_movies(title)
            .await
            .map_err(|e| EnrichmentError::Unavailable(e.to_string()))?;

        Ok(first_poster(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> TmdbClient {
        TmdbClient::with_client(
            Client::new(),
            &TmdbConfig {
                base_url: base_url.to_string(),
                api_key: "abc123".to_string(),
                ..TmdbConfig::default()
            },
        )
    }

    #[test]
    fn test_search_url_encodes_title() {
        let url = client("https://api.themoviedb.org/3/")
            .search_url("Crouching Tiger & Hidden Dragon")
            .unwrap();

        assert_eq!(url.path(), "/3/search/movie");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("api_key".to_string(), "abc123".to_string()),
                (
                    "query".to_string(),
                    "Crouching Tiger & Hidden Dragon".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_first_poster_only() {
        let body = r#"{
            "page": 1,
            "results": [
                {"id": 27205, "title": "Inception", "poster_path": "/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg"},
                {"id": 1, "title": "Inception 2", "poster_path": "/other.jpg"}
            ],
            "total_results": 2
        }"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();

        assert_eq!(
            first_poster(response.results).as_deref(),
            Some("/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg")
        );
    }

    #[test]
    fn test_null_or_missing_poster() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"results": [{"id": 5, "title": "x", "poster_path": null}]}"#)
                .unwrap();
        assert_eq!(first_poster(response.results), None);

        let empty: SearchResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(first_poster(empty.results), None);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        let client = client("http://127.0.0.1:9");
        let result = client.find_poster("Inception").await;
        assert!(matches!(result, Err(EnrichmentError::Unavailable(_))));
    }
}
