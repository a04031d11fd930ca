use std::env;
use std::path::PathBuf;

const DEFAULT_DATABASE_URL: &str = "sqlite://var/photo-contest.db?mode=rwc";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_MEDIA_DIR: &str = "var/media";
const DEFAULT_RELEASE_DIR: &str = "var/releases";
const DEFAULT_RELEASE_MIME_TYPES: &str = "application/pdf,image/jpeg,image/png";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 11 << 20;
const DEFAULT_ENTRY_LIMIT: u64 = 3;
const DEFAULT_SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_address: String,
    /// Uploaded originals and derivatives; served publicly under `/media`.
    pub media_dir: PathBuf,
    /// Signed release documents. Never served; keep it outside `media_dir`.
    pub release_dir: PathBuf,
    pub release_mime_types: Vec<String>,
    pub max_upload_bytes: usize,
    pub entry_limit: u64,
    /// How long a SQLite writer waits for the lock held by a submission
    /// that is still rendering its derivatives.
    pub sqlite_busy_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
        let media_dir = PathBuf::from(env::var("MEDIA_DIR").unwrap_or_else(|_| DEFAULT_MEDIA_DIR.to_string()));
        let release_dir = PathBuf::from(env::var("RELEASE_DIR").unwrap_or_else(|_| DEFAULT_RELEASE_DIR.to_string()));
        if release_dir.starts_with(&media_dir) {
            return Err(ConfigError::Invalid {
                name: "RELEASE_DIR",
                value: release_dir.display().to_string(),
            });
        }
        let release_mime_types = parse_mime_list(
            &env::var("RELEASE_MIME_TYPES").unwrap_or_else(|_| DEFAULT_RELEASE_MIME_TYPES.to_string()),
        );
        if release_mime_types.is_empty() {
            return Err(ConfigError::Invalid {
                name: "RELEASE_MIME_TYPES",
                value: String::new(),
            });
        }

        Ok(Self {
            database_url,
            jwt_secret,
            bind_address,
            media_dir,
            release_dir,
            release_mime_types,
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            entry_limit: parse_var("CONTEST_ENTRY_LIMIT", DEFAULT_ENTRY_LIMIT)?,
            sqlite_busy_timeout_secs: parse_var("SQLITE_BUSY_TIMEOUT_SECS", DEFAULT_SQLITE_BUSY_TIMEOUT_SECS)?,
        })
    }

    /// Defaults for everything except the secret, used by tests and tooling.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: jwt_secret.into(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            media_dir: PathBuf::from(DEFAULT_MEDIA_DIR),
            release_dir: PathBuf::from(DEFAULT_RELEASE_DIR),
            release_mime_types: parse_mime_list(DEFAULT_RELEASE_MIME_TYPES),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            entry_limit: DEFAULT_ENTRY_LIMIT,
            sqlite_busy_timeout_secs: DEFAULT_SQLITE_BUSY_TIMEOUT_SECS,
        }
    }
}

fn parse_mime_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|m| m.trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty())
        .collect()
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
