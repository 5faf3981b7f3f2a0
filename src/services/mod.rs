pub mod auth_service;
pub use auth_service::{AuthError, AuthService, Credential, CredentialLookup, StaticCredentials};

pub mod auth_service_impl;
pub use auth_service_impl::JwtAuthService;

pub mod movie_service;
pub use movie_service::{CatalogError, MovieService};

pub mod movie_service_impl;
pub use movie_service_impl::SeaOrmMovieService;

pub mod poster;
pub use poster::{EnrichmentError, PosterEnricher, PosterSource};

pub mod token;
pub use token::{Claims, TokenSigner};
