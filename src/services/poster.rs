//! Best-effort poster lookup run before a movie is persisted.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::movie::Movie;

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Poster lookup unavailable: {0}")]
    Unavailable(String),
}

/// External source of poster artwork, searched by title.
#[async_trait::async_trait]
pub trait PosterSource: Send + Sync {
    /// Returns the poster path of the best match, `None` when nothing matched.
    async fn find_poster(&self, title: &str) -> Result<Option<String>, EnrichmentError>;
}

#[derive(Clone, Default)]
pub struct PosterEnricher {
    source: Option<Arc<dyn PosterSource>>,
}

impl PosterEnricher {
    #[must_use]
    pub fn new(source: Arc<dyn PosterSource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    #[must_use]
    pub const fn disabled() -> Self {
        Self { source: None }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.source.is_some()
    }

    /// Fills an empty poster from the source. Never fails: lookup errors are
    /// logged and the movie is returned unchanged.
    pub async fn enrich(&self, mut movie: Movie) -> Movie {
        if movie.has_poster() {
            return movie;
        }

        let Some(source) = &self.source else {
            return movie;
        };

        match source.find_poster(&movie.title).await {
            Ok(Some(poster)) => {
                debug!(title = %movie.title, %poster, "Poster found");
                movie.poster = poster;
            }
            Ok(None) => debug!(title = %movie.title, "No poster match"),
            Err(e) => warn!(title = %movie.title, error = %e, "Skipping poster enrichment"),
        }

        movie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSource {
        result: Option<&'static str>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(result: Option<&'static str>, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                result,
                fail,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl PosterSource for FixedSource {
        async fn find_poster(&self, _title: &str) -> Result<Option<String>, EnrichmentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(EnrichmentError::Unavailable("connection refused".to_string()));
            }
            Ok(self.result.map(str::to_string))
        }
    }

    fn movie() -> Movie {
        Movie::new("Inception", NaiveDate::from_ymd_opt(2010, 7, 16).unwrap())
    }

    #[tokio::test]
    async fn test_fills_missing_poster() {
        let source = FixedSource::new(Some("/inception.jpg"), false);
        let enricher = PosterEnricher::new(source.clone());

        let enriched = enricher.enrich(movie()).await;
        assert_eq!(enriched.poster, "/inception.jpg");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_existing_poster_skips_lookup() {
        let source = FixedSource::new(Some("/other.jpg"), false);
        let enricher = PosterEnricher::new(source.clone());

        let mut with_poster = movie();
        with_poster.poster = "/kept.jpg".to_string();

        let enriched = enricher.enrich(with_poster).await;
        assert_eq!(enriched.poster, "/kept.jpg");
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_leaves_movie_unchanged() {
        let enricher = PosterEnricher::new(FixedSource::new(None, true));

        let original = movie();
        let enriched = enricher.enrich(original.clone()).await;
        assert_eq!(enriched, original);
    }

    #[tokio::test]
    async fn test_no_match_and_disabled() {
        let enriched = PosterEnricher::new(FixedSource::new(None, false))
            .enrich(movie())
            .await;
        assert!(!enriched.has_poster());

        let disabled = PosterEnricher::disabled();
        assert!(!disabled.is_enabled());
        assert!(!disabled.enrich(movie()).await.has_poster());
    }
}
