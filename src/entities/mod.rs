pub mod prelude;

pub mod genres;
pub mod movies;
pub mod movies_genres;
