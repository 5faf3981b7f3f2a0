//! Domain service for the movie catalog.
//!
//! Reads delegate to the store. Writes run the pipeline
//! validate → enrich-if-missing → persist.

use thiserror::Error;

use crate::constants;
use crate::db::StoreError;
use crate::domain::{GenreId, MovieId};
use crate::models::genre::Genre;
use crate::models::movie::Movie;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid movie data: {0}")]
    InvalidData(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound(format!("{entity} {id}")),
            StoreError::ConstraintViolation(msg) => Self::ConstraintViolation(msg),
            e @ StoreError::Timeout { .. } => Self::Timeout(e.to_string()),
            StoreError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// # Examples
///
/// ```rust,ignore
/// use marquee::services::{CatalogError, MovieService};
/// use marquee::domain::MovieId;
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn MovieService>) -> Result<(), CatalogError> {
///     let movie = service.get_movie(MovieId::new(1)).await?;
///     println!("{} ({})", movie.title, movie.year);
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no movie has `id`.
    async fn get_movie(&self, id: MovieId) -> Result<Movie, CatalogError>;

    /// Movies ordered by title, restricted to `genre` when given.
    async fn list_movies(&self, genre: Option<GenreId>) -> Result<Vec<Movie>, CatalogError>;

    async fn list_genres(&self) -> Result<Vec<Genre>, CatalogError>;

    /// Inserts when `movie.id` is new, otherwise updates. `genre_ids`
    /// replaces the movie's links when present.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidData`] if the movie fails validation
    /// - [`CatalogError::NotFound`] when updating an id that does not exist
    async fn save_movie(
        &self,
        movie: Movie,
        genre_ids: Option<Vec<GenreId>>,
    ) -> Result<MovieId, CatalogError>;

    /// Succeeds for ids that do not exist.
    async fn delete_movie(&self, id: MovieId) -> Result<(), CatalogError>;
}

/// Checks the fields clients are expected to fill.
pub fn validate_movie(movie: &Movie) -> Result<(), CatalogError> {
    if movie.title.trim().is_empty() {
        return Err(CatalogError::InvalidData("title must not be empty".to_string()));
    }

    if movie.runtime < 0 {
        return Err(CatalogError::InvalidData(format!(
            "runtime must not be negative, got {}",
            movie.runtime
        )));
    }

    if !(constants::rating::MIN..=constants::rating::MAX).contains(&movie.rating) {
        return Err(CatalogError::InvalidData(format!(
            "rating must be between {} and {}, got {}",
            constants::rating::MIN,
            constants::rating::MAX,
            movie.rating
        )));
    }

    Ok(())
}
