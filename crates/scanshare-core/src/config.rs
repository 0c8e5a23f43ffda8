//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/scanshare/config.toml)
//! 3. Environment variables (SCANSHARE_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "SCANSHARE";

/// Default origin of share links
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Default QR image service endpoint
pub const DEFAULT_QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Default QR image edge length in pixels
pub const DEFAULT_QR_SIZE: u32 = 300;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (stored lists, debug log)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Origin that share links are built on (scheme + host [+ port])
    #[serde(default = "default_origin")]
    pub origin: String,

    /// QR image service endpoint
    #[serde(default = "default_qr_service_url")]
    pub qr_service_url: String,

    /// QR image edge length in pixels
    #[serde(default = "default_qr_size")]
    pub qr_size: u32,

    /// Log file for the editor TUI (defaults to {data_dir}/debug.log)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            origin: default_origin(),
            qr_service_url: default_qr_service_url(),
            qr_size: default_qr_size(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SCANSHARE_DATA_DIR, SCANSHARE_ORIGIN, ...)
    /// 2. Config file (~/.config/scanshare/config.toml or SCANSHARE_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config
            .validate()
            .with_context(|| format!("Invalid config file: {:?}", path))?;
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject values no share link can be built from
    fn validate(&self) -> Result<()> {
        if self.qr_size == 0 {
            bail!("qr_size must be greater than 0");
        }
        if self.qr_service_url.trim().is_empty() {
            bail!("qr_service_url cannot be empty");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // SCANSHARE_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // SCANSHARE_ORIGIN
        if let Ok(val) = std::env::var(format!("{}_ORIGIN", ENV_PREFIX)) {
            if !val.is_empty() {
                self.origin = val;
            }
        }

        // SCANSHARE_QR_SERVICE_URL
        if let Ok(val) = std::env::var(format!("{}_QR_SERVICE_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.qr_service_url = val;
            }
        }

        // SCANSHARE_QR_SIZE (ignored unless a positive integer)
        if let Ok(val) = std::env::var(format!("{}_QR_SIZE", ENV_PREFIX)) {
            if let Ok(size) = val.parse::<u32>() {
                if size > 0 {
                    self.qr_size = size;
                }
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with SCANSHARE_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scanshare")
            .join("config.toml")
    }

    /// Get the directory holding stored lists
    pub fn lists_dir(&self) -> PathBuf {
        self.data_dir.join("lists")
    }

    /// Get the log file path for the editor TUI
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("debug.log"))
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scanshare")
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

fn default_qr_service_url() -> String {
    DEFAULT_QR_SERVICE_URL.to_string()
}

fn default_qr_size() -> u32 {
    DEFAULT_QR_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "SCANSHARE_DATA_DIR",
        "SCANSHARE_ORIGIN",
        "SCANSHARE_QR_SERVICE_URL",
        "SCANSHARE_QR_SIZE",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.origin, DEFAULT_ORIGIN);
        assert_eq!(config.qr_service_url, DEFAULT_QR_SERVICE_URL);
        assert_eq!(config.qr_size, 300);
        assert!(config.log_file.is_none());
        assert!(config.data_dir.ends_with("scanshare"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config {
            data_dir: PathBuf::from("/data/scanshare"),
            ..Config::default()
        };

        assert_eq!(config.lists_dir(), PathBuf::from("/data/scanshare/lists"));
        assert_eq!(config.log_path(), PathBuf::from("/data/scanshare/debug.log"));

        let config = Config {
            log_file: Some(PathBuf::from("/tmp/scanshare.log")),
            ..config
        };
        assert_eq!(config.log_path(), PathBuf::from("/tmp/scanshare.log"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("SCANSHARE_DATA_DIR", "/tmp/scanshare-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/scanshare-test"));
    }

    #[test]
    fn test_env_override_origin() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("SCANSHARE_ORIGIN", "https://lists.example.com");
        config.apply_env_overrides();
        assert_eq!(config.origin, "https://lists.example.com");

        // Empty string keeps the current value
        env::set_var("SCANSHARE_ORIGIN", "");
        config.apply_env_overrides();
        assert_eq!(config.origin, "https://lists.example.com");
    }

    #[test]
    fn test_env_override_qr_size() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("SCANSHARE_QR_SIZE", "512");
        config.apply_env_overrides();
        assert_eq!(config.qr_size, 512);

        env::set_var("SCANSHARE_QR_SIZE", "0");
        config.apply_env_overrides();
        assert_eq!(config.qr_size, 512);

        env::set_var("SCANSHARE_QR_SIZE", "huge");
        config.apply_env_overrides();
        assert_eq!(config.qr_size, 512);
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/scanshare"),
            origin: "https://share.example.com".to_string(),
            qr_service_url: DEFAULT_QR_SERVICE_URL.to_string(),
            qr_size: 256,
            log_file: None,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("origin"));
        assert!(toml_str.contains("qr_size"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.origin, config.origin);
        assert_eq!(parsed.qr_size, config.qr_size);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            origin = "https://example.com"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.origin, "https://example.com");
        // Unset keys fall back to defaults
        assert_eq!(config.qr_size, DEFAULT_QR_SIZE);
        assert_eq!(config.qr_service_url, DEFAULT_QR_SERVICE_URL);
    }

    #[test]
    fn test_rejects_zero_qr_size() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            format!("data_dir = {:?}\nqr_size = 0\n", temp_dir.path().join("data")),
        )
        .unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("qr_size must be greater than 0"));
        assert!(Config::load_from_str("qr_size = 0").is_err());
        assert!(Config::load_from_str("qr_service_url = \"\"").is_err());

        // A valid env override still wins over the bad file value
        env::set_var("SCANSHARE_QR_SIZE", "200");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.qr_size, 200);
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("SCANSHARE_DATA_DIR", temp_dir.path().join("data"));

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.origin, DEFAULT_ORIGIN);
        assert!(config.data_dir.is_dir());
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            origin: "https://saved.example.com".to_string(),
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.origin, "https://saved.example.com");
        assert_eq!(loaded.data_dir, config.data_dir);
    }
}
