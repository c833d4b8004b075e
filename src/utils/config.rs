use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use config::{Config as ConfigLib, ConfigError, Environment, File};

use crate::core::biometry::BiometryPolicy;
use crate::utils::error::{AppError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub biometry: BiometryConfig,
    #[serde(default)]
    pub defeso: DefesoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Directory for the rolling log file; console only when unset.
    pub log_dir: Option<String>,
    /// Origin of the PWA front end allowed through CORS.
    pub allowed_origin: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub path: String,
    pub encryption_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BiometryConfig {
    #[serde(default)]
    pub policy: BiometryPolicy,
    pub model_load_timeout_secs: u64,
    /// Frames polled before a capture attempt gives up. Unlimited when unset.
    pub capture_frame_budget: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefesoConfig {
    pub default_region: String,
    pub cache_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            log_level: "info".to_string(),
            log_dir: None,
            allowed_origin: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "data/seguro-defeso.redb".to_string(),
            encryption_key: "change-me".to_string(),
        }
    }
}

impl Default for BiometryConfig {
    fn default() -> Self {
        Self {
            policy: BiometryPolicy::default(),
            model_load_timeout_secs: 30,
            capture_frame_budget: None,
        }
    }
}

impl Default for DefesoConfig {
    fn default() -> Self {
        Self {
            default_region: "Norte - Bacia Amazônica".to_string(),
            cache_ttl_secs: 86_400,
        }
    }
}

impl Config {
    /// Loads `config/default` and `config/local` relative to the working
    /// directory, then `SEGURO_*` environment overrides.
    pub fn new() -> Result<Self> {
        Self::load_from(Path::new("config"))
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        let policy = BiometryPolicy::default();

        let config = ConfigLib::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8787)?
            .set_default("server.log_level", "info")?
            .set_default("storage.path", "data/seguro-defeso.redb")?
            .set_default("storage.encryption_key", "")?
            .set_default("biometry.model_load_timeout_secs", 30)?
            .set_default("biometry.policy.match_threshold", policy.match_threshold)?
            .set_default("biometry.policy.min_face_width_ratio", policy.min_face_width_ratio)?
            .set_default("biometry.policy.max_face_width_ratio", policy.max_face_width_ratio)?
            .set_default("biometry.policy.min_aspect_ratio", policy.min_aspect_ratio)?
            .set_default("biometry.policy.max_aspect_ratio", policy.max_aspect_ratio)?
            .set_default("biometry.policy.max_center_offset", policy.max_center_offset)?
            .set_default("biometry.policy.min_detection_score", policy.min_detection_score)?
            .set_default("biometry.policy.required_streak", policy.required_streak)?
            .set_default("biometry.policy.failure_penalty", policy.failure_penalty)?
            .set_default("biometry.policy.descriptor_length", policy.descriptor_length as u32)?
            .set_default("defeso.default_region", "Norte - Bacia Amazônica")?
            .set_default("defeso.cache_ttl_secs", 86_400)?

            // Load from config files
            .add_source(File::from(dir.join("default")).required(false))
            .add_source(File::from(dir.join("local")).required(false))

            // Override with environment variables (e.g., SEGURO_SERVER__PORT)
            .add_source(
                Environment::with_prefix("SEGURO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )

            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config("Invalid port number".into()));
        }

        if self.storage.encryption_key.is_empty() {
            return Err(AppError::Config("storage.encryption_key must be set".into()));
        }

        if self.biometry.model_load_timeout_secs == 0 {
            return Err(AppError::Config(
                "biometry.model_load_timeout_secs must be greater than 0".into(),
            ));
        }
        self.biometry.policy.validate().map_err(AppError::Config)?;

        if self.defeso.cache_ttl_secs == 0 {
            return Err(AppError::Config("defeso.cache_ttl_secs must be greater than 0".into()));
        }

        Ok(())
    }

    pub fn get_model_load_timeout(&self) -> Duration {
        Duration::from_secs(self.biometry.model_load_timeout_secs)
    }

    pub fn get_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.defeso.cache_ttl_secs)
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        AppError::Config(error.to_string())
    }
}
