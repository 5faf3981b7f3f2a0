use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "genres")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub genre_name: String,
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

impl ActiveModelBehavior for ActiveModel {}
