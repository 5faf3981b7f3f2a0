use serde::{Deserialize, Deserializer, Serialize};

use crate::models::genre::Genre;
use crate::models::movie::Movie;

/// `{"error": {"message": ...}}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorMessage,
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorMessage {
                message: message.into(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub movie: Movie,
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize)]
pub struct GenresResponse {
    pub genres: Vec<Genre>,
}

/// Payload under a `response` key, as returned by sign-in and admin writes.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub response: T,
}

impl<T> Envelope<T> {
    pub const fn new(response: T) -> Self {
        Self { response }
    }
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
    pub message: String,
}

impl OkResponse {
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            ok: true,
            message: String::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub environment: String,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Accepts `"148"` as well as `148`; `null` becomes an empty string.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(s)) => s,
        Some(Scalar::Integer(n)) => n.to_string(),
        Some(Scalar::Float(n)) => n.to_string(),
        None => String::new(),
    })
}
