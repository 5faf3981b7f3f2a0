//! `SeaORM` implementation of the `MovieService` trait.

use async_trait::async_trait;
use tracing::debug;

use crate::db::Store;
use crate::domain::{GenreId, MovieId};
use crate::models::genre::Genre;
use crate::models::movie::Movie;
use crate::services::movie_service::{CatalogError, MovieService, validate_movie};
use crate::services::poster::PosterEnricher;

pub struct SeaOrmMovieService {
    store: Store,
    enricher: PosterEnricher,
}

impl SeaOrmMovieService {
    #[must_use]
    pub const fn new(store: Store, enricher: PosterEnricher) -> Self {
        Self { store, enricher }
    }
}

#[async_trait]
impl MovieService for SeaOrmMovieService {
    async fn get_movie(&self, id: MovieId) -> Result<Movie, CatalogError> {
        Ok(self.store.get_movie(id).await?)
    }

    async fn list_movies(&self, genre: Option<GenreId>) -> Result<Vec<Movie>, CatalogError> {
        Ok(self.store.list_movies(genre).await?)
    }

    async fn list_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        Ok(self.store.list_genres().await?)
    }

    async fn save_movie(
        &self,
        mut movie: Movie,
        genre_ids: Option<Vec<GenreId>>,
    ) -> Result<MovieId, CatalogError> {
        validate_movie(&movie)?;
        movie.sync_year();

        let movie = self.enricher.enrich(movie).await;

        if movie.id.is_new() {
            let id = self
                .store
                .insert_movie(&movie, genre_ids.as_deref())
                .await?;
            return Ok(id);
        }

        let matched = self
            .store
            .update_movie(&movie, genre_ids.as_deref())
            .await?;
        if !matched {
            debug!(movie_id = %movie.id, "Update matched no row");
            return Err(CatalogError::NotFound(format!("movie {}", movie.id)));
        }

        Ok(movie.id)
    }

    async fn delete_movie(&self, id: MovieId) -> Result<(), CatalogError> {
        Ok(self.store.delete_movie(id).await?)
    }
}
