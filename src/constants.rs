pub mod timeouts {

    pub const QUERY_SECONDS: u64 = 3;

    pub const POSTER_LOOKUP_SECONDS: u64 = 5;
}

pub mod tokens {

    pub const TTL_HOURS: i64 = 24;

    pub const DEFAULT_DOMAIN: &str = "mydomain.com";
}

pub mod tmdb {

    pub const API_BASE: &str = "https://api.themoviedb.org/3";
}

pub mod rating {

    pub const MIN: i32 = 1;

    pub const MAX: i32 = 10;
}
