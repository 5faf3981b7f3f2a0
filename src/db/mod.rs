use std::future::Future;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::domain::{GenreId, MovieId};
use crate::models::genre::Genre;
use crate::models::movie::{GenreMap, Movie};

pub mod migrator;
pub mod repositories;

use repositories::movie::MovieRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("{operation} exceeded its {limit:?} deadline")]
    Timeout {
        operation: &'static str,
        limit: Duration,
    },

    #[error("Database error: {0}")]
    Database(#[source] DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(
                SqlErr::UniqueConstraintViolation(msg) | SqlErr::ForeignKeyConstraintViolation(msg),
            ) => Self::ConstraintViolation(msg),
            _ => Self::Database(err),
        }
    }
}

/// Runs `fut` under `limit`. Elapsing drops the future, which rolls back any
/// transaction it still owns.
pub async fn with_deadline<T, F>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, DbErr>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout { operation, limit }),
    }
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
    query_timeout: Duration,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::connect(&DatabaseConfig {
            url: db_url.to_string(),
            ..DatabaseConfig::default()
        })
        .await
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if config.url.starts_with("sqlite:") && !config.url.contains(":memory:") {
            let path_str = config
                .url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            config.min_connections, config.max_connections
        );

        Ok(Self {
            conn,
            query_timeout: Duration::from_secs(config.query_timeout_seconds),
        })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub const fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    fn movie_repo(&self) -> MovieRepository {
        MovieRepository::new(self.conn.clone())
    }

    fn movie_genre_repo(&self) -> repositories::movie_genre::MovieGenreRepository {
        repositories::movie_genre::MovieGenreRepository::new(self.conn.clone())
    }

    fn genre_repo(&self) -> repositories::genre::GenreRepository {
        repositories::genre::GenreRepository::new(self.conn.clone())
    }

    async fn deadline<T, F>(&self, operation: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        with_deadline(operation, self.query_timeout, fut).await
    }

    // ========== Movies ==========

    pub async fn get_movie(&self, id: MovieId) -> Result<Movie, StoreError> {
        let model = self
            .deadline("get_movie", self.movie_repo().find(id.value()))
            .await?
            .ok_or(StoreError::NotFound {
                entity: "movie",
                id: id.value(),
            })?;

        let genres = self.genres_for_movie_or_empty(model.id).await;
        Ok(MovieRepository::map_model_to_movie(model, genres))
    }

    /// Movies ordered by title. Genre maps come from one batched query; if
    /// that fails each movie is loaded separately, and a movie whose genres
    /// still cannot be read is returned with an empty map.
    pub async fn list_movies(&self, genre: Option<GenreId>) -> Result<Vec<Movie>, StoreError> {
        let models = self
            .deadline(
                "list_movies",
                self.movie_repo().list(genre.map(|g| g.value())),
            )
            .await?;

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let repo = self.movie_genre_repo();
        let mut batched = match self.deadline("load_genres", repo.genres_for_movies(&ids)).await {
            Ok(map) => Some(map),
            Err(e) => {
                warn!(error = %e, count = ids.len(), "Batched genre load failed, loading per movie");
                None
            }
        };

        let mut movies = Vec::with_capacity(models.len());
        for model in models {
            let genres = match batched.as_mut() {
                Some(map) => map.remove(&model.id).unwrap_or_default(),
                None => self.genres_for_movie_or_empty(model.id).await,
            };
            movies.push(MovieRepository::map_model_to_movie(model, genres));
        }

        Ok(movies)
    }

    async fn genres_for_movie_or_empty(&self, movie_id: i32) -> GenreMap {
        match self
            .deadline(
                "load_genres",
                self.movie_genre_repo().genres_for_movie(movie_id),
            )
            .await
        {
            Ok(genres) => genres,
            Err(e) => {
                warn!(movie_id, error = %e, "Failed to load genres, returning movie without them");
                GenreMap::new()
            }
        }
    }

    /// `genre_ids = None` leaves links untouched; `Some(&[])` clears them.
    pub async fn insert_movie(
        &self,
        movie: &Movie,
        genre_ids: Option<&[GenreId]>,
    ) -> Result<MovieId, StoreError> {
        if !movie.id.is_new() {
            return Err(StoreError::ConstraintViolation(format!(
                "movie {} already has an id",
                movie.id
            )));
        }

        let genre_ids = genre_ids.map(raw_ids);
        let id = self
            .deadline(
                "insert_movie",
                self.movie_repo().insert(movie, genre_ids.as_deref()),
            )
            .await?;

        info!(movie_id = id, title = %movie.title, "Inserted movie");
        Ok(MovieId::new(id))
    }

    /// Returns `false` when no row has `movie.id`.
    pub async fn update_movie(
        &self,
        movie: &Movie,
        genre_ids: Option<&[GenreId]>,
    ) -> Result<bool, StoreError> {
        let genre_ids = genre_ids.map(raw_ids);
        let affected = self
            .deadline(
                "update_movie",
                self.movie_repo().update(movie, genre_ids.as_deref()),
            )
            .await?;

        if affected > 0 {
            info!(movie_id = %movie.id, "Updated movie");
        }
        Ok(affected > 0)
    }

    /// Idempotent: deleting an unknown id succeeds.
    pub async fn delete_movie(&self, id: MovieId) -> Result<(), StoreError> {
        let affected = self
            .deadline("delete_movie", self.movie_repo().delete(id.value()))
            .await?;

        if affected > 0 {
            info!(movie_id = %id, "Deleted movie");
        }
        Ok(())
    }

    // ========== Genres ==========

    pub async fn list_genres(&self) -> Result<Vec<Genre>, StoreError> {
        self.deadline("list_genres", self.genre_repo().list()).await
    }
}

fn raw_ids(ids: &[GenreId]) -> Vec<i32> {
    ids.iter().map(|id| id.value()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deadline_elapses_into_timeout() {
        let result: Result<(), StoreError> = with_deadline(
            "stalled",
            Duration::from_millis(20),
            std::future::pending::<Result<(), DbErr>>(),
        )
        .await;

        match result {
            Err(StoreError::Timeout { operation, limit }) => {
                assert_eq!(operation, "stalled");
                assert_eq!(limit, Duration::from_millis(20));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_deadline_passes_through_results() {
        let ok = with_deadline("quick", Duration::from_secs(1), async { Ok::<_, DbErr>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = with_deadline("broken", Duration::from_secs(1), async {
            Err::<(), _>(DbErr::Custom("boom".to_string()))
        })
        .await;
        assert!(matches!(err, Err(StoreError::Database(_))));
    }

    #[tokio::test]
    async fn test_memory_store_seeds_genres() {
        let store = Store::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..DatabaseConfig::default()
        })
        .await
        .unwrap();

        store.ping().await.unwrap();
        let genres = store.list_genres().await.unwrap();
        assert!(genres.iter().any(|g| g.genre_name == "Drama"));
        assert!(
            genres
                .windows(2)
                .all(|pair| pair[0].genre_name <= pair[1].genre_name)
        );
    }
}
