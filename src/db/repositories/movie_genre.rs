//! Relation loading between movies and genres.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter,
    QuerySelect, RelationTrait, Select, Set,
};

use crate::entities::{genres, movies_genres, prelude::*};
use crate::models::genre::GenreLinkRow;
use crate::models::movie::GenreMap;

pub struct MovieGenreRepository {
    conn: DatabaseConnection,
}

impl MovieGenreRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// `movies_genres` joined to `genres`, projected onto [`GenreLinkRow`].
    /// No ordering is applied.
    fn linked_genres() -> Select<MoviesGenres> {
        MoviesGenres::find()
            .select_only()
            .column_as(movies_genres::Column::Id, "link_id")
            .column(movies_genres::Column::MovieId)
            .column(genres::Column::GenreName)
            .join(JoinType::InnerJoin, movies_genres::Relation::Genres.def())
    }

    pub async fn genres_for_movie(&self, movie_id: i32) -> Result<GenreMap, DbErr> {
        let rows = Self::linked_genres()
            .filter(movies_genres::Column::MovieId.eq(movie_id))
            .into_model::<GenreLinkRow>()
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.link_id, row.genre_name))
            .collect())
    }

    /// Loads the links of every movie in `movie_ids` with a single query.
    /// Movies without links are absent from the result.
    pub async fn genres_for_movies(
        &self,
        movie_ids: &[i32],
    ) -> Result<HashMap<i32, GenreMap>, DbErr> {
        if movie_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = Self::linked_genres()
            .filter(movies_genres::Column::MovieId.is_in(movie_ids.iter().copied()))
            .into_model::<GenreLinkRow>()
            .all(&self.conn)
            .await?;

        let mut grouped: HashMap<i32, GenreMap> = HashMap::with_capacity(movie_ids.len());
        for row in rows {
            grouped
                .entry(row.movie_id)
                .or_default()
                .insert(row.link_id, row.genre_name);
        }

        Ok(grouped)
    }

    /// Replaces the links of `movie_id` with one link per distinct genre id.
    /// Runs on the caller's connection so it can share a transaction with
    /// the movie row write.
    pub async fn replace_for_movie<C>(conn: &C, movie_id: i32, genre_ids: &[i32]) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        Self::delete_for_movie(conn, movie_id).await?;

        let mut distinct: Vec<i32> = Vec::with_capacity(genre_ids.len());
        for id in genre_ids {
            if !distinct.contains(id) {
                distinct.push(*id);
            }
        }

        if distinct.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let links = distinct.into_iter().map(|genre_id| movies_genres::ActiveModel {
            movie_id: Set(movie_id),
            genre_id: Set(genre_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        });

        MoviesGenres::insert_many(links).exec(conn).await?;
        Ok(())
    }

    pub async fn delete_for_movie<C>(conn: &C, movie_id: i32) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = MoviesGenres::delete_many()
            .filter(movies_genres::Column::MovieId.eq(movie_id))
            .exec(conn)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn count_for_movie(&self, movie_id: i32) -> Result<u64, DbErr> {
        use sea_orm::PaginatorTrait;

        MoviesGenres::find()
            .filter(movies_genres::Column::MovieId.eq(movie_id))
            .count(&self.conn)
            .await
    }
}
