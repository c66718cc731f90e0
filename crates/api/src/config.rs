//! Application configuration loaded from environment variables.

use inventory_store::DEFAULT_LOW_STOCK_THRESHOLD;
use reporting::DayBoundary;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `ADMIN_USERNAME` / `ADMIN_PASSWORD`: seeded account (default: `admin` / `admin123`)
/// - `INVENTORY_TIMEZONE`: `local`, `utc` or an IANA zone name (default: `local`)
/// - `LOW_STOCK_THRESHOLD`: low-stock cutoff (default: `5`)
///
/// Unparsable values keep the default and are reported by [`Config::warnings`].
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub admin_username: String,
    pub admin_password: String,
    pub day_boundary: DayBoundary,
    pub low_stock_threshold: u32,
    warnings: Vec<String>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = var("HOST") {
            config.host = host;
        }
        if let Some(level) = var("RUST_LOG") {
            config.log_level = level;
        }
        if let Some(username) = var("ADMIN_USERNAME") {
            config.admin_username = username;
        }
        if let Some(password) = var("ADMIN_PASSWORD") {
            config.admin_password = password;
        }

        if let Some(port) = var("PORT") {
            match port.trim().parse() {
                Ok(p) => config.port = p,
                Err(_) => config.warn("PORT", &port),
            }
        }
        if let Some(format) = var("LOG_FORMAT") {
            match format.trim().to_ascii_lowercase().as_str() {
                "text" => config.log_format = LogFormat::Text,
                "json" => config.log_format = LogFormat::Json,
                _ => config.warn("LOG_FORMAT", &format),
            }
        }
        if let Some(zone) = var("INVENTORY_TIMEZONE") {
            match zone.parse() {
                Ok(boundary) => config.day_boundary = boundary,
                Err(_) => config.warn("INVENTORY_TIMEZONE", &zone),
            }
        }
        if let Some(threshold) = var("LOW_STOCK_THRESHOLD") {
            match threshold.trim().parse() {
                Ok(t) => config.low_stock_threshold = t,
                Err(_) => config.warn("LOW_STOCK_THRESHOLD", &threshold),
            }
        }

        config
    }

    fn warn(&mut self, key: &str, value: &str) {
        self.warnings
            .push(format!("ignoring invalid {key}={value:?}, using the default"));
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Problems found while loading, to be logged once tracing is up.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            day_boundary: DayBoundary::Local,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            warnings: Vec::new(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"<redacted>")
            .field("day_boundary", &self.day_boundary)
            .field("low_stock_threshold", &self.low_stock_threshold)
            .finish()
    }
}
