use std::time::Duration;

use teckel_core::inventory::DEFAULT_LIST_CACHE_TTL;

use crate::auth::jwt::JwtConfig;

/// Default request body limit (multipart image uploads included).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 4 * 1024 * 1024;

/// Business name used when `BUSINESS_NAME` is not set.
const DEFAULT_BUSINESS_NAME: &str = "Royal Teckel Home";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development, except
/// the JWT secret.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted request body in bytes (default: 4 MiB).
    pub max_upload_bytes: usize,
    /// Lifetime of the cached dog listing (default: 30 s, `0` disables).
    pub list_cache_ttl: Duration,
    /// JWT session verification settings.
    pub jwt: JwtConfig,
    /// Public contact details exposed to the site.
    pub site: SiteConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3001`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MAX_UPLOAD_BYTES`     | `4194304`                  |
    /// | `LIST_CACHE_TTL_SECS`  | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let list_cache_ttl = std::env::var("LIST_CACHE_TTL_SECS")
            .map(|v| Duration::from_secs(v.parse().expect("LIST_CACHE_TTL_SECS must be a valid u64")))
            .unwrap_or(DEFAULT_LIST_CACHE_TTL);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            list_cache_ttl,
            jwt: JwtConfig::from_env(),
            site: SiteConfig::from_env(),
        }
    }
}

/// Contact details shown on the public site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub business_name: String,
    pub public_email: Option<String>,
    /// International number, e.g. `+33 6 12 34 56 78`.
    pub public_whatsapp_number: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            business_name: DEFAULT_BUSINESS_NAME.to_string(),
            public_email: None,
            public_whatsapp_number: None,
        }
    }
}

impl SiteConfig {
    /// | Env Var                  | Default             |
    /// |--------------------------|---------------------|
    /// | `BUSINESS_NAME`          | `Royal Teckel Home` |
    /// | `PUBLIC_EMAIL`           | unset               |
    /// | `PUBLIC_WHATSAPP_NUMBER` | unset               |
    pub fn from_env() -> Self {
        let var = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            business_name: var("BUSINESS_NAME").unwrap_or_else(|| DEFAULT_BUSINESS_NAME.into()),
            public_email: var("PUBLIC_EMAIL"),
            public_whatsapp_number: var("PUBLIC_WHATSAPP_NUMBER"),
        }
    }

    /// `https://wa.me/<digits>` chat link for the configured number.
    pub fn whatsapp_url(&self) -> Option<String> {
        let digits: String = self
            .public_whatsapp_number
            .as_deref()?
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        (!digits.is_empty()).then(|| format!("https://wa.me/{digits}"))
    }
}
