use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::MovieId;

/// Genre names attached to a movie, keyed by the id of the `movies_genres`
/// link row (not the genre id).
pub type GenreMap = BTreeMap<i32, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub description: String,
    pub year: i32,
    pub release_date: NaiveDate,
    pub runtime: i32,
    pub rating: i32,
    pub mpaa_rating: String,
    pub poster: String,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
    pub genres: GenreMap,
}

impl Movie {
    /// Builds an unsaved movie; `year` follows `release_date`.
    #[must_use]
    pub fn new(title: impl Into<String>, release_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: MovieId::default(),
            title: title.into(),
            description: String::new(),
            year: release_date.year(),
            release_date,
            runtime: 0,
            rating: 0,
            mpaa_rating: String::new(),
            poster: String::new(),
            created_at: now,
            updated_at: now,
            genres: GenreMap::new(),
        }
    }

    #[must_use]
    pub fn has_poster(&self) -> bool {
        !self.poster.is_empty()
    }

    /// Re-derives `year` after `release_date` changed.
    pub fn sync_year(&mut self) {
        self.year = self.release_date.year();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_movie_derives_year_and_is_unsaved() {
        let date = NaiveDate::from_ymd_opt(2010, 7, 16).unwrap();
        let movie = Movie::new("Inception", date);

        assert!(movie.id.is_new());
        assert_eq!(movie.year, 2010);
        assert!(!movie.has_poster());
        assert!(movie.genres.is_empty());
    }

    #[test]
    fn movie_serializes_with_camel_case_and_link_keyed_genres() {
        let date = NaiveDate::from_ymd_opt(1999, 3, 31).unwrap();
        let mut movie = Movie::new("The Matrix", date);
        movie.mpaa_rating = "R".to_string();
        movie.genres.insert(4, "Action".to_string());

        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["releaseDate"], "1999-03-31");
        assert_eq!(json["mpaaRating"], "R");
        assert_eq!(json["genres"]["4"], "Action");
        assert!(json.get("createdAt").is_none());
    }
}
