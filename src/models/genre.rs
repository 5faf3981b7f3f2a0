use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::Serialize;

use crate::domain::GenreId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub id: GenreId,
    pub genre_name: String,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}

/// One `movies_genres` row joined with its genre's name.
#[derive(Debug, Clone, FromQueryResult)]
pub struct GenreLinkRow {
    pub link_id: i32,
    pub movie_id: i32,
    pub genre_name: String,
}
