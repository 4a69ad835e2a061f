use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::HarnessError;

/// Name of the file the service reads its configuration from
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Settings that control how the harness drives the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessSettings {
    pub service_bin: PathBuf,
    pub ping_attempts: u32,
    pub ping_interval_ms: u64,
}

impl HarnessSettings {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("WEBSENTRY_BIN") {
            self.service_bin = PathBuf::from(v);
        }
        if let Ok(v) = env::var("WEBSENTRY_PING_ATTEMPTS") {
            self.ping_attempts = v.parse().unwrap_or(self.ping_attempts);
        }
        if let Ok(v) = env::var("WEBSENTRY_PING_INTERVAL_MS") {
            self.ping_interval_ms = v.parse().unwrap_or(self.ping_interval_ms);
        }

        self
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval_ms)
    }
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            service_bin: PathBuf::from("./websentry"),
            ping_attempts: 4,
            ping_interval_ms: 500,
        }
    }
}

// Global singleton settings - resolved once at startup
pub static SETTINGS: Lazy<HarnessSettings> = Lazy::new(HarnessSettings::from_env);

pub fn settings() -> &'static HarnessSettings {
    &SETTINGS
}

/// Configuration file consumed by the WebSentry service.
///
/// Key names follow the service's own config loader, including its
/// `crosAllowOrigins` spelling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub release_mode: bool,
    pub addr: String,
    pub database: DatabaseDescriptor,
    pub verification_email: EmailDescriptor,
    pub file_storage_path: PathBuf,
    pub slave_key: String,
    pub token_secret_key: String,
    pub backend_url: String,
    pub cros_allow_origins: Vec<String>,
    #[serde(rename = "forwardedByClientIP")]
    pub forwarded_by_client_ip: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseDescriptor {
    pub data_source_name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailDescriptor {
    pub server: String,
    pub port: u16,
    pub email: String,
    pub password: String,
}

impl ServiceConfig {
    /// Fixed test configuration pointing the service at `db` and `port`
    pub fn for_test(output_dir: &Path, db: &str, port: u16) -> Self {
        Self {
            release_mode: false,
            addr: format!("127.0.0.1:{}", port),
            database: DatabaseDescriptor {
                data_source_name: db.to_string(),
                kind: "postgres".to_string(),
            },
            verification_email: EmailDescriptor {
                server: "your_smtp_server".to_string(),
                port: 587,
                email: "example@example.com".to_string(),
                password: "password".to_string(),
            },
            file_storage_path: output_dir.to_path_buf(),
            slave_key: "testkey".to_string(),
            token_secret_key: "secretkey".to_string(),
            backend_url: format!("http://127.0.0.1:{}/", port),
            cros_allow_origins: vec!["*".to_string()],
            forwarded_by_client_ip: true,
        }
    }
}

/// Write `config.json` into `output_dir` and return its path
pub fn build_config(output_dir: &Path, db: &str, port: u16) -> Result<PathBuf, HarnessError> {
    let config = ServiceConfig::for_test(output_dir, db, port);
    let path = output_dir.join(CONFIG_FILE_NAME);

    let file = std::fs::File::create(&path)?;
    serde_json::to_writer(file, &config)?;

    tracing::debug!(path = %path.display(), "Wrote service config");
    Ok(path)
}
