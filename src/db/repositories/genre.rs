use crate::domain::GenreId;
use crate::entities::{genres, prelude::*};
use crate::models::genre::Genre;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};

pub struct GenreRepository {
    conn: DatabaseConnection,
}

impl GenreRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model_to_genre(model: genres::Model) -> Genre {
        Genre {
            id: GenreId::new(model.id),
            genre_name: model.genre_name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    pub async fn list(&self) -> Result<Vec<Genre>, DbErr> {
        let rows = Genres::find()
            .order_by_asc(genres::Column::GenreName)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model_to_genre).collect())
    }
}
