//! Configuration management for Blob Admin

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Default cap on an upload request body (64 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted `uploadBlobs` request body, in bytes
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    /// Process-local store, contents are lost on restart
    Memory,
    Minio,
    R2,
    S3,
    B2,
}

impl FromStr for StorageProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageProvider::Memory),
            "minio" => Ok(StorageProvider::Minio),
            "r2" => Ok(StorageProvider::R2),
            "s3" => Ok(StorageProvider::S3),
            "b2" => Ok(StorageProvider::B2),
            other => Err(ConfigError::Invalid {
                var: "STORAGE_PROVIDER",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// JSON file mapping session tokens to users
    pub sessions_file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            storage: StorageConfig {
                provider: StorageProvider::Memory,
                endpoint: "http://localhost:9000".to_string(),
                bucket: "blobs".to_string(),
                access_key: "admin".to_string(),
                secret_key: "password123".to_string(),
                region: Some("us-east-1".to_string()),
            },
            auth: AuthConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let provider: StorageProvider = env::var("STORAGE_PROVIDER")
            .unwrap_or_else(|_| "memory".to_string())
            .parse()?;

        // S3 settings are only mandatory when an S3-compatible backend is selected
        let s3_var = |name: &'static str, fallback: &str| -> Result<String, ConfigError> {
            match env::var(name) {
                Ok(value) => Ok(value),
                Err(_) if provider == StorageProvider::Memory => Ok(fallback.to_string()),
                Err(_) => Err(ConfigError::Missing(name)),
            }
        };

        let port = match env::var("SERVER_PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: "SERVER_PORT",
                value,
            })?,
            Err(_) => defaults.server.port,
        };

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: "MAX_UPLOAD_BYTES",
                value,
            })?,
            Err(_) => defaults.server.max_upload_bytes,
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port,
                max_upload_bytes,
            },
            storage: StorageConfig {
                provider,
                endpoint: s3_var("S3_ENDPOINT", &defaults.storage.endpoint)?,
                bucket: s3_var("S3_BUCKET", &defaults.storage.bucket)?,
                access_key: s3_var("S3_ACCESS_KEY", &defaults.storage.access_key)?,
                secret_key: s3_var("S3_SECRET_KEY", &defaults.storage.secret_key)?,
                region: env::var("S3_REGION").ok().or(defaults.storage.region),
            },
            auth: AuthConfig {
                sessions_file: env::var("AUTH_SESSIONS_FILE").ok().map(PathBuf::from),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_memory_store() {
        let config = Config::default();
        assert_eq!(config.storage.provider, StorageProvider::Memory);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_upload_bytes, 64 * 1024 * 1024);
        assert!(config.auth.sessions_file.is_none());
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("memory".parse::<StorageProvider>().unwrap(), StorageProvider::Memory);
        assert_eq!("R2".parse::<StorageProvider>().unwrap(), StorageProvider::R2);
        assert_eq!("minio".parse::<StorageProvider>().unwrap(), StorageProvider::Minio);

        let err = "ftp".parse::<StorageProvider>().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "STORAGE_PROVIDER", .. }));
    }
}
