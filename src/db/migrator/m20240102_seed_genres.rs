use crate::entities::{genres, prelude::*};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const SEED_GENRES: &[&str] = &[
    "Drama",
    "Crime",
    "Action",
    "Comic Book",
    "Sci-Fi",
    "Mystery",
    "Adventure",
    "Comedy",
    "Romance",
    "Horror",
    "Thriller",
    "Animation",
    "Fantasy",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now();

        let mut insert = Query::insert();
        insert.into_table(Genres).columns([
            genres::Column::GenreName,
            genres::Column::CreatedAt,
            genres::Column::UpdatedAt,
        ]);
        for name in SEED_GENRES {
            insert.values_panic([(*name).into(), now.into(), now.into()]);
        }

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Genres)
            .and_where(Expr::col(genres::Column::GenreName).is_in(SEED_GENRES.iter().copied()))
            .to_owned();

        manager.exec_stmt(delete).await?;

        Ok(())
    }
}
