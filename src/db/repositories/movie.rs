use chrono::Utc;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::movie_genre::MovieGenreRepository;
use crate::domain::MovieId;
use crate::entities::{movies, movies_genres, prelude::*};
use crate::models::movie::{GenreMap, Movie};

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    #[must_use]
    pub fn map_model_to_movie(model: movies::Model, genres: GenreMap) -> Movie {
        Movie {
            id: MovieId::new(model.id),
            title: model.title,
            description: model.description,
            year: model.year,
            release_date: model.release_date,
            runtime: model.runtime,
            rating: model.rating,
            mpaa_rating: model.mpaa_rating,
            poster: model.poster.unwrap_or_default(),
            created_at: model.created_at,
            updated_at: model.updated_at,
            genres,
        }
    }

    pub async fn find(&self, id: i32) -> Result<Option<movies::Model>, DbErr> {
        Movies::find_by_id(id).one(&self.conn).await
    }

    /// All movies ordered by title, optionally restricted to movies linked
    /// to `genre_id`.
    pub async fn list(&self, genre_id: Option<i32>) -> Result<Vec<movies::Model>, DbErr> {
        let mut query = Movies::find().order_by_asc(movies::Column::Title);

        if let Some(genre_id) = genre_id {
            query = query.filter(
                movies::Column::Id.in_subquery(
                    Query::select()
                        .column(movies_genres::Column::MovieId)
                        .from(MoviesGenres)
                        .and_where(movies_genres::Column::GenreId.eq(genre_id))
                        .to_owned(),
                ),
            );
        }

        query.all(&self.conn).await
    }

    /// Inserts the movie row and, when `genre_ids` is given, its genre links
    /// in one transaction. Returns the assigned id.
    pub async fn insert(&self, movie: &Movie, genre_ids: Option<&[i32]>) -> Result<i32, DbErr> {
        let now = Utc::now();
        let txn = self.conn.begin().await?;

        let active_model = movies::ActiveModel {
            title: Set(movie.title.clone()),
            description: Set(movie.description.clone()),
            year: Set(movie.year),
            release_date: Set(movie.release_date),
            rating: Set(movie.rating),
            runtime: Set(movie.runtime),
            mpaa_rating: Set(movie.mpaa_rating.clone()),
            poster: Set(Some(movie.poster.clone())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let id = Movies::insert(active_model).exec(&txn).await?.last_insert_id;

        if let Some(genre_ids) = genre_ids {
            MovieGenreRepository::replace_for_movie(&txn, id, genre_ids).await?;
        }

        txn.commit().await?;
        Ok(id)
    }

    /// Overwrites every mutable column of the row matching `movie.id`.
    /// Links are only replaced when the row exists and `genre_ids` is given.
    /// Returns the number of matched rows.
    pub async fn update(&self, movie: &Movie, genre_ids: Option<&[i32]>) -> Result<u64, DbErr> {
        let txn = self.conn.begin().await?;

        let result = Movies::update_many()
            .col_expr(movies::Column::Title, Expr::value(movie.title.clone()))
            .col_expr(
                movies::Column::Description,
                Expr::value(movie.description.clone()),
            )
            .col_expr(movies::Column::Year, Expr::value(movie.year))
            .col_expr(movies::Column::ReleaseDate, Expr::value(movie.release_date))
            .col_expr(movies::Column::Runtime, Expr::value(movie.runtime))
            .col_expr(movies::Column::Rating, Expr::value(movie.rating))
            .col_expr(
                movies::Column::MpaaRating,
                Expr::value(movie.mpaa_rating.clone()),
            )
            .col_expr(movies::Column::Poster, Expr::value(Some(movie.poster.clone())))
            .col_expr(movies::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(movies::Column::Id.eq(movie.id.value()))
            .exec(&txn)
            .await?;

        if result.rows_affected > 0
            && let Some(genre_ids) = genre_ids
        {
            MovieGenreRepository::replace_for_movie(&txn, movie.id.value(), genre_ids).await?;
        }

        txn.commit().await?;
        Ok(result.rows_affected)
    }

    /// Removes the movie and its links. Deleting a missing id is not an
    /// error; the returned count is 0.
    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        let txn = self.conn.begin().await?;

        MovieGenreRepository::delete_for_movie(&txn, id).await?;
        let result = Movies::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected)
    }
}
