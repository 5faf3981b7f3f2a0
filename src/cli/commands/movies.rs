//! List movies command handler

use crate::config::Config;
use crate::db::Store;
use crate::domain::GenreId;

pub async fn cmd_list_movies(config: &Config, genre: Option<i32>) -> anyhow::Result<()> {
    let store = Store::connect(&config.database).await?;
    let movies = store.list_movies(genre.map(GenreId::new)).await?;

    if movies.is_empty() {
        println!("No movies in the catalog.");
        return Ok(());
    }

    println!("Movies ({} total)", movies.len());
    println!("{:-<70}", "");

    for movie in movies {
        let genres: Vec<&str> = movie.genres.values().map(String::as_str).collect();
        let genres = if genres.is_empty() {
            "-".to_string()
        } else {
            genres.join(", ")
        };

        println!("{} ({}) [{}]", movie.title, movie.year, movie.mpaa_rating);
        println!(
            "  ID: {} | Runtime: {} min | Rating: {}/10 | Genres: {}",
            movie.id, movie.runtime, movie.rating, genres
        );
    }

    Ok(())
}
