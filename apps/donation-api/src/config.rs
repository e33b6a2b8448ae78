/// Where submissions and admin accounts are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL through the Diesel async pool.
    Postgres,
    /// Process-local maps. Data is lost on restart.
    Memory,
}

/// Donation API configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage backend selected with `STORAGE`.
    pub storage: StorageBackend,
    /// PostgreSQL connection string. Required when `storage` is `Postgres`.
    pub database_url: Option<String>,
    /// Shared HS256 secret for admin access tokens.
    pub secret_key: String,
    /// Lifetime of issued access tokens, in minutes.
    pub access_token_ttl_minutes: i64,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// CORS origins. Empty means any origin.
    pub allowed_origins: Vec<String>,
    /// Period of the `stats_update` broadcast. `0` disables it.
    pub stats_broadcast_interval_secs: u64,
    /// Password given to the `admin` account when it is first seeded.
    pub default_admin_password: String,
    /// Serve Swagger UI at `/docs`.
    pub enable_docs: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Panics with a descriptive message if a required variable is missing.
    pub fn from_env() -> Self {
        let storage = match std::env::var("STORAGE").ok().as_deref() {
            None | Some("") | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => panic!("STORAGE must be `postgres` or `memory`, got `{other}`"),
        };

        let database_url = match storage {
            StorageBackend::Postgres => Some(required_var("DATABASE_URL")),
            StorageBackend::Memory => std::env::var("DATABASE_URL").ok(),
        };

        Self {
            storage,
            database_url,
            secret_key: required_var("SECRET_KEY"),
            access_token_ttl_minutes: parsed_var("ACCESS_TOKEN_TTL_MINUTES", 30),
            port: parsed_var("PORT", 8000),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .map(|v| split_origins(&v))
                .unwrap_or_default(),
            stats_broadcast_interval_secs: parsed_var("STATS_BROADCAST_INTERVAL_SECS", 0),
            default_admin_password: std::env::var("DEFAULT_ADMIN_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "admin".to_string()),
            enable_docs: std::env::var("ENABLE_DOCS")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

fn required_var(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} env var is required"))
}

fn parsed_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_origins_drops_blanks_and_whitespace() {
        let origins = split_origins(" https://a.example ,, https://b.example,");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn split_origins_of_empty_string_is_empty() {
        assert!(split_origins("").is_empty());
    }
}
