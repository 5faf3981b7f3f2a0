pub use super::genres::Entity as Genres;
pub use super::movies::Entity as Movies;
pub use super::movies_genres::Entity as MoviesGenres;
