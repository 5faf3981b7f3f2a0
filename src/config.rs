use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub database: DatabaseConfig,

    pub server: ServerConfig,

    pub tmdb: TmdbConfig,

    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Reported by `/status`, e.g. "development" or "production".
    pub environment: String,

    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (0 = number of CPU cores)
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `sqlite:` or `postgres://` connection string.
    pub url: String,

    pub max_connections: u32,

    pub min_connections: u32,

    /// Deadline for a single store operation.
    pub query_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/marquee.db".to_string(),
            max_connections: 5,
            min_connections: 1,
            query_timeout_seconds: constants::timeouts::QUERY_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 4000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub base_url: String,

    /// Poster lookups are skipped when empty.
    pub api_key: String,

    pub request_timeout_seconds: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: constants::tmdb::API_BASE.to_string(),
            api_key: String::new(),
            request_timeout_seconds: constants::timeouts::POSTER_LOOKUP_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Shared HMAC secret for signing and verifying tokens.
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Used as both issuer and audience of issued tokens.
    pub token_domain: String,

    pub token_ttl_hours: i64,

    /// Argon2 memory cost in KiB for newly hashed passwords
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,

    pub admin: AdminCredentialConfig,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_domain: constants::tokens::DEFAULT_DOMAIN.to_string(),
            token_ttl_hours: constants::tokens::TTL_HOURS,
            argon2_memory_cost_kib: 19 * 1024,
            argon2_time_cost: 2,
            argon2_parallelism: 1,
            admin: AdminCredentialConfig::default(),
        }
    }
}

/// The single pre-provisioned account allowed to sign in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminCredentialConfig {
    pub user_id: i32,

    pub email: String,

    /// Argon2 PHC string, see `marquee hash-password`.
    pub password_hash: String,
}

impl Default for AdminCredentialConfig {
    fn default() -> Self {
        Self {
            user_id: 10,
            email: "me@here.com".to_string(),
            password_hash: String::new(),
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies `.env`/environment
    /// overrides.
    pub fn load() -> Result<Self> {
        load_dotenv();

        let mut config = Self::load_file()?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies `API_*` environment variables on top of the file config.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("API_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("API_PORT is not a valid port: {port}"))?;
        }
        if let Some(env) = lookup("API_ENV") {
            self.general.environment = env;
        }
        if let Some(dsn) = lookup("API_DB_DSN") {
            self.database.url = dsn;
        }
        if let Some(secret) = lookup("API_JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Some(key) = lookup("API_TMDB_KEY") {
            self.tmdb.api_key = key;
        }
        if let Some(email) = lookup("API_ADMIN_EMAIL") {
            self.security.admin.email = email;
        }
        if let Some(hash) = lookup("API_ADMIN_PASSWORD_HASH") {
            self.security.admin.password_hash = hash;
        }
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("marquee").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".marquee").join("config.toml"));
        }

        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.database.query_timeout_seconds == 0 {
            anyhow::bail!("Database query timeout must be > 0");
        }

        if self.server.enabled && self.security.jwt_secret.is_empty() {
            anyhow::bail!("JWT secret must be set when the server is enabled (API_JWT_SECRET)");
        }

        if self.security.token_ttl_hours <= 0 {
            anyhow::bail!("Token lifetime must be > 0 hours");
        }

        Ok(())
    }
}

/// `.env.local` wins over `.env`; neither is required.
fn load_dotenv() {
    if Path::new(".env.local").exists() {
        let _ = dotenvy::from_filename(".env.local");
    } else {
        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.query_timeout_seconds, 3);
        assert_eq!(config.security.token_ttl_hours, 24);
        assert_eq!(config.security.token_domain, "mydomain.com");
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert!(config.tmdb.api_key.is_empty());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [database]
            url = "postgres://localhost/movies"
            query_timeout_seconds = 5
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.database.url, "postgres://localhost/movies");
        assert_eq!(config.database.query_timeout_seconds, 5);

        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_secret_is_not_serialized() {
        let mut config = Config::default();
        config.security.jwt_secret = "super-secret".to_string();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[security]"));
        assert!(!toml_str.contains("super-secret"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("API_PORT", "4100"),
            ("API_ENV", "production"),
            ("API_DB_DSN", "postgres://db/movies"),
            ("API_JWT_SECRET", "s3cret"),
            ("API_TMDB_KEY", "tmdb-key"),
        ]);

        let mut config = Config::default();
        config
            .apply_env_overrides(|key| vars.get(key).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.server.port, 4100);
        assert_eq!(config.general.environment, "production");
        assert_eq!(config.database.url, "postgres://db/movies");
        assert_eq!(config.security.jwt_secret, "s3cret");
        assert_eq!(config.tmdb.api_key, "tmdb-key");
        assert_eq!(config.security.admin.email, "me@here.com");
    }

    #[test]
    fn test_invalid_port_override_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(|key| {
            (key == "API_PORT").then(|| "not-a-port".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_err(), "missing secret must be rejected");

        config.security.jwt_secret = "secret".to_string();
        assert!(config.validate().is_ok());

        config.database.query_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}
