use std::sync::Arc;
use tracing::info;

use crate::clients::tmdb::TmdbClient;
use crate::config::{Config, TmdbConfig};
use crate::db::Store;
use crate::services::{
    AuthService, JwtAuthService, MovieService, PosterEnricher, SeaOrmMovieService,
    StaticCredentials, TokenSigner,
};

/// Poster lookups only run when an API key is configured.
fn build_poster_enricher(config: &TmdbConfig) -> anyhow::Result<PosterEnricher> {
    if config.api_key.is_empty() {
        info!("TMDB API key not set, poster enrichment disabled");
        return Ok(PosterEnricher::disabled());
    }

    let client = TmdbClient::new(config)?;
    Ok(PosterEnricher::new(Arc::new(client)))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub movie_service: Arc<dyn MovieService>,

    pub auth_service: Arc<dyn AuthService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::connect(&config.database).await?;
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let enricher = build_poster_enricher(&config.tmdb)?;
        let movie_service = Arc::new(SeaOrmMovieService::new(store.clone(), enricher))
            as Arc<dyn MovieService>;

        let credentials = Arc::new(StaticCredentials::from_config(&config.security.admin));
        let auth_service = Arc::new(JwtAuthService::new(
            credentials,
            TokenSigner::from_config(&config.security),
            &config.security,
        )?) as Arc<dyn AuthService>;

        Ok(Self {
            config: Arc::new(config),
            store,
            movie_service,
            auth_service,
        })
    }
}
