use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::types::lenient_string;
use super::{ApiError, AppState, Envelope, MovieResponse, MoviesResponse, OkResponse};
use crate::domain::{GenreId, MovieId};
use crate::models::movie::Movie;

/// Body of `POST /v1/admin/editmovie`. Numeric fields arrive as strings
/// from the web client; `id` "0" (or empty) creates a new movie.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub runtime: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rating: String,
    #[serde(default)]
    pub mpaa_rating: String,
    #[serde(default)]
    pub poster: String,
    /// Replaces the movie's genres when present.
    #[serde(default)]
    pub genre_ids: Option<Vec<GenreId>>,
}

impl MoviePayload {
    pub fn into_movie(self) -> Result<(Movie, Option<Vec<GenreId>>), ApiError> {
        let Self {
            id,
            title,
            description,
            release_date,
            runtime,
            rating,
            mpaa_rating,
            poster,
            genre_ids,
        } = self;

        let release_date = NaiveDate::parse_from_str(release_date.trim(), "%Y-%m-%d")
            .map_err(|_| {
                ApiError::validation(format!(
                    "releaseDate must be formatted YYYY-MM-DD, got '{release_date}'"
                ))
            })?;

        let mut movie = Movie::new(title, release_date);
        movie.id = MovieId::new(parse_int("id", &id)?);
        movie.description = description;
        movie.runtime = parse_int("runtime", &runtime)?;
        movie.rating = parse_int("rating", &rating)?;
        movie.mpaa_rating = mpaa_rating;
        movie.poster = poster;

        Ok((movie, genre_ids))
    }
}

fn parse_int(field: &str, value: &str) -> Result<i32, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }

    value
        .parse()
        .map_err(|_| ApiError::validation(format!("{field} must be an integer, got '{value}'")))
}

/// `GET /v1/movie/{id}`
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MovieResponse>, ApiError> {
    let movie = state.movies().get_movie(MovieId::new(id)).await?;
    Ok(Json(MovieResponse { movie }))
}

/// `GET /v1/movies`
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MoviesResponse>, ApiError> {
    let movies = state.movies().list_movies(None).await?;
    Ok(Json(MoviesResponse { movies }))
}

/// `GET /v1/movies/{genre_id}`
pub async fn list_movies_by_genre(
    State(state): State<Arc<AppState>>,
    Path(genre_id): Path<i32>,
) -> Result<Json<MoviesResponse>, ApiError> {
    let movies = state
        .movies()
        .list_movies(Some(GenreId::new(genre_id)))
        .await?;
    Ok(Json(MoviesResponse { movies }))
}

/// `POST /v1/admin/editmovie`
///
/// Updates keep the stored poster unless the payload carries a new one.
pub async fn edit_movie(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MoviePayload>,
) -> Result<Json<Envelope<OkResponse>>, ApiError> {
    let (mut movie, genre_ids) = payload.into_movie()?;

    if !movie.id.is_new() && !movie.has_poster() {
        let existing = state.movies().get_movie(movie.id).await?;
        movie.poster = existing.poster;
    }

    let id = state.movies().save_movie(movie, genre_ids).await?;
    debug!(movie_id = %id, "Saved movie");

    Ok(Json(Envelope::new(OkResponse::ok())))
}

/// `DELETE /v1/admin/deletemovie/{id}`
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.movies().delete_movie(MovieId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_with_string_fields() {
        let payload: MoviePayload = serde_json::from_str(
            r#"{
                "id": "0",
                "title": "Inception",
                "description": "Dreams within dreams",
                "releaseDate": "2010-07-16",
                "runtime": "148",
                "rating": "9",
                "mpaaRating": "PG-13"
            }"#,
        )
        .unwrap();

        let (movie, genre_ids) = payload.into_movie().unwrap();
        assert!(movie.id.is_new());
        assert_eq!(movie.year, 2010);
        assert_eq!(movie.runtime, 148);
        assert_eq!(movie.rating, 9);
        assert_eq!(movie.mpaa_rating, "PG-13");
        assert!(genre_ids.is_none());
    }

    #[test]
    fn test_payload_with_numbers_and_genres() {
        let payload: MoviePayload = serde_json::from_str(
            r#"{"id": 4, "title": "Alien", "releaseDate": "1979-05-25",
                "runtime": 117, "rating": 8, "genreIds": [5, 10]}"#,
        )
        .unwrap();

        let (movie, genre_ids) = payload.into_movie().unwrap();
        assert_eq!(movie.id, MovieId::new(4));
        assert_eq!(movie.runtime, 117);
        assert_eq!(
            genre_ids,
            Some(vec![GenreId::new(5), GenreId::new(10)])
        );
    }

    #[test]
    fn test_payload_rejects_bad_date_and_numbers() {
        let bad_date: MoviePayload =
            serde_json::from_str(r#"{"title": "x", "releaseDate": "16/07/2010"}"#).unwrap();
        assert!(matches!(
            bad_date.into_movie(),
            Err(ApiError::ValidationError(_))
        ));

        let bad_runtime: MoviePayload = serde_json::from_str(
            r#"{"title": "x", "releaseDate": "2010-07-16", "runtime": "long"}"#,
        )
        .unwrap();
        assert!(bad_runtime.into_movie().is_err());
    }
}
