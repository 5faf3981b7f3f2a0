use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub year: i32,
    pub release_date: Date,
    pub rating: i32,
    pub runtime: i32,
    pub mpaa_rating: String,
    /// Legacy rows may carry NULL; read back as an empty poster.
    pub poster: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movies_genres::Entity")]
    MoviesGenres,
}

impl Related<super::movies_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MoviesGenres.def()
    }
}

impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        super::movies_genres::Relation::Genres.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::movies_genres::Relation::Movies.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
