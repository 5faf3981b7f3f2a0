mod hash_password;
mod movies;

pub use hash_password::cmd_hash_password;
pub use movies::cmd_list_movies;
