use anyhow::Result;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Which object store backend the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    S3,
    Memory,
}

impl FromStr for StorageProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(StorageProvider::S3),
            "memory" => Ok(StorageProvider::Memory),
            other => Err(format!("unknown storage provider '{}' (expected s3 or memory)", other)),
        }
    }
}

impl fmt::Display for StorageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageProvider::S3 => write!(f, "s3"),
            StorageProvider::Memory => write!(f, "memory"),
        }
    }
}

/// What the multi-file count enumerates.
///
/// `Prefix` only counts `<prefix>_*.json` keys. `Bucket` counts every key in
/// the bucket, so unrelated objects inflate the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountScope {
    #[default]
    Prefix,
    Bucket,
}

impl FromStr for CountScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefix" => Ok(CountScope::Prefix),
            "bucket" => Ok(CountScope::Bucket),
            other => Err(format!("unknown count scope '{}' (expected prefix or bucket)", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_access_key_id: Option<String>,
    pub s3_secret_access_key: Option<String>,
    pub s3_session_token: Option<String>,
    pub s3_endpoint: Option<String>,
    pub csv_object_key: String,
    pub record_prefix: String,
    pub count_scope: CountScope,
    pub timeout_secs: u64,
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::S3,
            s3_bucket: String::new(),
            s3_region: "us-east-1".to_string(),
            s3_access_key_id: None,
            s3_secret_access_key: None,
            s3_session_token: None,
            s3_endpoint: None,
            csv_object_key: "personas.csv".to_string(),
            record_prefix: "persona".to_string(),
            count_scope: CountScope::Prefix,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();
        let storage_defaults = defaults.storage;

        let provider: StorageProvider = env::var("STORAGE_PROVIDER")
            .unwrap_or_else(|_| storage_defaults.provider.to_string())
            .parse()
            .map_err(anyhow::Error::msg)?;
        let s3_bucket = env::var("S3_BUCKET").unwrap_or_default();
        if provider == StorageProvider::S3 && s3_bucket.trim().is_empty() {
            anyhow::bail!("S3_BUCKET must be set when STORAGE_PROVIDER=s3");
        }

        let config = Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| defaults.server.port.to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or(defaults.server.host),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .map(|origins| {
                        origins
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or(defaults.server.cors_allowed_origins),
            },
            storage: StorageConfig {
                provider,
                s3_bucket: if s3_bucket.is_empty() {
                    "local".to_string()
                } else {
                    s3_bucket
                },
                s3_region: env::var("S3_REGION").unwrap_or(storage_defaults.s3_region),
                s3_access_key_id: env::var("AWS_ACCESS_KEY_ID").ok(),
                s3_secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
                s3_session_token: env::var("AWS_SESSION_TOKEN").ok(),
                s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|e| !e.trim().is_empty()),
                csv_object_key: env::var("CSV_OBJECT_KEY").unwrap_or(storage_defaults.csv_object_key),
                record_prefix: env::var("RECORD_PREFIX").unwrap_or(storage_defaults.record_prefix),
                count_scope: env::var("COUNT_SCOPE")
                    .unwrap_or_else(|_| "prefix".to_string())
                    .parse()
                    .map_err(anyhow::Error::msg)?,
                timeout_secs: env::var("STORE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| storage_defaults.timeout_secs.to_string())
                    .parse()?,
            },
            logging: LoggingConfig {
                log_dir: env::var("LOG_DIR").ok().map(PathBuf::from),
            },
        };

        if config.storage.timeout_secs == 0 {
            anyhow::bail!("STORE_TIMEOUT_SECS must be greater than zero");
        }

        Ok(config)
    }
}
