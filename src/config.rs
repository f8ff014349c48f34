use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit config file path.
pub const CONFIG_PATH_ENV: &str = "NOTEKEEPER_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub session: SessionConfig,

    pub security: SecurityConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Tokio worker threads; 0 means one per core.
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/notekeeper.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Sets the `Secure` attribute on the session cookie. Disable for plain-HTTP development.
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            secure_cookies: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// Sessions persisted in the `sessions` table
    Database,
    /// Process-local sessions, lost on restart
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub backend: SessionBackend,

    pub cookie_name: String,

    /// Sessions expire after this many minutes without a request.
    pub inactivity_minutes: u32,

    /// How often expired rows are purged from the database backend.
    pub cleanup_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::Database,
            cookie_name: "notekeeper.sid".to_string(),
            inactivity_minutes: 60,
            cleanup_interval_seconds: 15 * 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2id memory cost in KiB.
    pub argon2_memory_cost_kib: u32,

    /// Argon2id iteration count.
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "notekeeper".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Config {
    /// Load the first config file found in [`Self::config_paths`], or defaults.
    pub fn load() -> Result<Self> {
        match Self::config_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration");
                Self::load_from_path(&path)
            }
            None => {
                info!("No configuration file found, falling back to defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;

        toml::from_str(&raw).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create {}", dir.display()))?;
        }

        let rendered = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path, rendered)
            .with_context(|| format!("Cannot write {}", path.display()))?;
        Ok(())
    }

    /// Search order: `$NOTEKEEPER_CONFIG`, `./config.toml`, the platform config
    /// directory, then `~/.notekeeper/config.toml`.
    #[must_use]
    pub fn config_paths() -> Vec<PathBuf> {
        let explicit = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let platform = dirs::config_dir().map(|d| d.join("notekeeper").join("config.toml"));
        let home = dirs::home_dir().map(|d| d.join(".notekeeper").join("config.toml"));

        explicit
            .into_iter()
            .chain(std::iter::once(PathBuf::from(DEFAULT_CONFIG_FILE)))
            .chain(platform)
            .chain(home)
            .collect()
    }

    /// Write a default `config.toml` into the working directory.
    /// Returns `false` when one is already there.
    pub fn create_default_if_missing() -> Result<bool> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            return Ok(false);
        }

        Self::default().save_to_path(path)?;
        info!(path = %path.display(), "Wrote default configuration");
        Ok(true)
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.trim().is_empty() {
            bail!("general.database_path must not be empty");
        }
        if self.general.min_db_connections > self.general.max_db_connections {
            bail!("general.min_db_connections exceeds general.max_db_connections");
        }
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.session.inactivity_minutes == 0 {
            bail!("session.inactivity_minutes must be at least 1");
        }
        if self.session.cookie_name.trim().is_empty() {
            bail!("session.cookie_name must not be empty");
        }
        Ok(())
    }
}
