use std::env;

/// Default archive size ceiling (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Default ceiling on one decompressed archive entry (100 MiB)
pub const DEFAULT_MAX_ENTRY_BYTES: usize = 100 * 1024 * 1024;

/// Default recognized image extensions, without the leading dot
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,

    // JWT
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,

    // Admin credentials checked at login
    pub admin: AdminCredentials,

    // Ingestion
    pub max_upload_bytes: usize,
    pub max_entry_bytes: usize,
    pub image_extensions: Vec<String>,

    // Object storage
    pub storage: StorageConfig,

    // Server
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    S3 {
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: Option<String>,
    },
    Local {
        root: String,
        public_base_url: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        Ok(Self {
            // Database
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,

            // JWT
            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("JWT_EXPIRATION_HOURS"))?,

            admin: AdminCredentials {
                email: env::var("ADMIN_EMAIL").map_err(|_| ConfigError::Missing("ADMIN_EMAIL"))?,
                password: env::var("ADMIN_PASSWORD")
                    .map_err(|_| ConfigError::Missing("ADMIN_PASSWORD"))?,
            },

            // Ingestion
            max_upload_bytes: match env::var("MAX_UPLOAD_BYTES") {
                Ok(value) => value
                    .parse()
                    .map_err(|_| ConfigError::Invalid("MAX_UPLOAD_BYTES"))?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            max_entry_bytes: match env::var("MAX_ENTRY_BYTES") {
                Ok(value) => value
                    .parse()
                    .map_err(|_| ConfigError::Invalid("MAX_ENTRY_BYTES"))?,
                Err(_) => DEFAULT_MAX_ENTRY_BYTES,
            },
            image_extensions: match env::var("IMAGE_EXTENSIONS") {
                Ok(value) => parse_extensions(&value)
                    .ok_or(ConfigError::Invalid("IMAGE_EXTENSIONS"))?,
                Err(_) => default_image_extensions(),
            },

            storage: storage_from_env(&host, port)?,

            // Server
            host,
            port,
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                Ok("pretty") | Err(_) => LogFormat::Pretty,
                Ok(_) => return Err(ConfigError::Invalid("LOG_FORMAT")),
            },
        })
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn storage_from_env(host: &str, port: u16) -> Result<StorageConfig, ConfigError> {
    let public_base_url = env::var("PUBLIC_BASE_URL").ok();

    match env::var("STORAGE_BACKEND").as_deref() {
        Ok("s3") | Err(_) => Ok(StorageConfig::S3 {
            bucket: env::var("S3_BUCKET").map_err(|_| ConfigError::Missing("S3_BUCKET"))?,
            region: env::var("S3_REGION").unwrap_or_else(|_| "auto".to_string()),
            endpoint_url: env::var("S3_ENDPOINT").ok(),
            public_base_url,
        }),
        Ok("local") => Ok(StorageConfig::Local {
            root: env::var("LOCAL_STORAGE_PATH").unwrap_or_else(|_| "./data/objects".to_string()),
            public_base_url: public_base_url
                .unwrap_or_else(|| format!("http://{}:{}/objects", host, port)),
        }),
        Ok(_) => Err(ConfigError::Invalid("STORAGE_BACKEND")),
    }
}

pub fn default_image_extensions() -> Vec<String> {
    DEFAULT_IMAGE_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

/// Parse a comma-separated extension list ("jpg, .PNG") into lower-cased
/// extensions without the leading dot. Returns `None` when nothing usable is left.
pub fn parse_extensions(raw: &str) -> Option<Vec<String>> {
    let mut extensions: Vec<String> = Vec::new();
    for ext in raw.split(',') {
        let ext = ext.trim().trim_start_matches('.').to_lowercase();
        if !ext.is_empty() && !extensions.contains(&ext) {
            extensions.push(ext);
        }
    }

    if extensions.is_empty() {
        None
    } else {
        Some(extensions)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extensions_normalizes() {
        let parsed = parse_extensions(" .JPG, png ,,webp, .png").unwrap();
        assert_eq!(parsed, vec!["jpg", "png", "webp"]);
    }

    #[test]
    fn test_parse_extensions_rejects_empty_list() {
        assert!(parse_extensions(" , . ,").is_none());
    }

    #[test]
    fn test_default_extensions() {
        let defaults = default_image_extensions();
        assert_eq!(defaults.len(), 6);
        assert!(defaults.contains(&"svg".to_string()));
    }
}
