use std::path::PathBuf;

use reelshelf_core::assets::{PosterCleanup, DEFAULT_PUBLIC_PREFIX};

use crate::auth::jwt::JwtConfig;

/// Default multipart body limit (10 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory poster files are written to and served from.
    pub upload_dir: PathBuf,
    /// Path prefix of issued poster references and of the static route.
    pub upload_public_prefix: String,
    /// Maximum request body size for uploads, in bytes.
    pub max_upload_bytes: usize,
    /// What happens to superseded and deleted poster files.
    pub poster_cleanup: PosterCleanup,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Account ensured at startup, if configured.
    pub default_user: Option<DefaultUserConfig>,
}

/// Credentials of the account seeded at startup.
#[derive(Clone)]
pub struct DefaultUserConfig {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for DefaultUserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultUserConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                  |
    /// |--------------------------|--------------------------|
    /// | `HOST`                   | `0.0.0.0`                |
    /// | `PORT`                   | `3001`                   |
    /// | `CORS_ORIGINS`           | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                     |
    /// | `UPLOAD_DIR`             | `./uploads`              |
    /// | `UPLOAD_PUBLIC_PREFIX`   | `/uploads`               |
    /// | `MAX_UPLOAD_BYTES`       | `10485760`               |
    /// | `POSTER_CLEANUP`         | `retain`                 |
    /// | `DEFAULT_USER_EMAIL`     | unset                    |
    /// | `DEFAULT_USER_PASSWORD`  | unset                    |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");

        let port: u16 = var("PORT", "3001")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = var("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir = PathBuf::from(var("UPLOAD_DIR", "./uploads"));
        let upload_public_prefix = normalize_prefix(&var("UPLOAD_PUBLIC_PREFIX", DEFAULT_PUBLIC_PREFIX));

        let max_upload_bytes: usize = lookup("MAX_UPLOAD_BYTES")
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let poster_cleanup: PosterCleanup = var("POSTER_CLEANUP", "retain")
            .parse()
            .unwrap_or_else(|e| panic!("POSTER_CLEANUP is invalid: {e}"));

        let default_user = match (lookup("DEFAULT_USER_EMAIL"), lookup("DEFAULT_USER_PASSWORD")) {
            (Some(email), Some(password)) => Some(DefaultUserConfig { email, password }),
            (None, None) => None,
            _ => panic!("DEFAULT_USER_EMAIL and DEFAULT_USER_PASSWORD must be set together"),
        };

        let jwt = JwtConfig::from_lookup(&lookup);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upload_dir,
            upload_public_prefix,
            max_upload_bytes,
            poster_cleanup,
            jwt,
            default_user,
        }
    }
}

/// Ensure a leading `/` and no trailing `/`; an empty prefix falls back to
/// the default.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        DEFAULT_PUBLIC_PREFIX.to_string()
    } else {
        format!("/{trimmed}")
    }
}
