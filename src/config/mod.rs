use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Public base URL used to build `shortUrl` in shorten responses.
    /// Empty means the bare short code is returned.
    pub base_url: String,
    /// Capacity of the click-event channel between the redirect path and
    /// the background writer.
    pub event_buffer_size: usize,
    pub collision_policy: CollisionPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// What to do when random code generation keeps hitting occupied codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Proceed with the last generated code after the retry budget runs
    /// out. The create itself is still conflict-checked, so a lost race
    /// yields a 409 rather than an overwrite.
    Proceed,
    /// Fail the request instead of risking a conflict.
    Fail,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://./linklet.db".to_string());
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(5);

        let base_url = std::env::var("BASE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_default();

        let event_buffer_size = std::env::var("EVENT_BUFFER_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(10_000);

        let collision_policy = match std::env::var("COLLISION_POLICY")
            .unwrap_or_else(|_| "proceed".to_string())
            .to_lowercase()
            .as_str()
        {
            "fail" => CollisionPolicy::Fail,
            "proceed" => CollisionPolicy::Proceed,
            other => {
                tracing::warn!(
                    "Unknown COLLISION_POLICY '{other}', falling back to 'proceed'. Supported values: proceed, fail"
                );
                CollisionPolicy::Proceed
            }
        };

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            base_url,
            event_buffer_size,
            collision_policy,
        })
    }
}
