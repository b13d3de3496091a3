//! Configuration file persistence for Markpane
//!
//! This module handles loading and saving configuration files to
//! platform-specific directories with robust error handling and
//! graceful fallback to defaults.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "markpane";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Temporary file name used during atomic writes
const CONFIG_BACKUP_NAME: &str = "config.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\markpane\`
/// - **macOS**: `~/Library/Application Support/markpane/`
/// - **Linux**: `~/.config/markpane/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined
/// (e.g., if the HOME environment variable is not set).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load configuration from the default config file location.
///
/// Missing, empty, or corrupted files all yield `Settings::default()`;
/// corruption is logged as a warning.
pub fn load_config() -> Settings {
    get_config_dir()
        .and_then(|dir| load_config_from(&dir))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Load and sanitize the configuration stored in `config_dir`.
pub fn load_config_from(config_dir: &Path) -> Result<Settings> {
    let config_path = config_dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(Settings::default());
    }

    debug!("Loading config from: {}", config_path.display());

    let contents = fs::read_to_string(&config_path).map_err(|e| Error::ConfigLoad {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            config_path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse config file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!(
        "Configuration loaded successfully from {}",
        config_path.display()
    );
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save configuration to the default config file location.
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to(&get_config_dir()?, settings)
}

/// Save configuration into `config_dir`, creating it when needed.
///
/// The JSON is written to a sibling temporary file first and then renamed
/// over the real file, so a crash mid-write never leaves a truncated config.
pub fn save_config_to(config_dir: &Path, settings: &Settings) -> Result<()> {
    if !config_dir.exists() {
        debug!("Creating config directory: {}", config_dir.display());
        fs::create_dir_all(config_dir).map_err(|e| Error::ConfigSave {
            path: config_dir.to_path_buf(),
            source: Box::new(e),
        })?;
    }

    let config_path = config_dir.join(CONFIG_FILE_NAME);
    let backup_path = config_dir.join(CONFIG_BACKUP_NAME);

    debug!("Saving config to: {}", config_path.display());

    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&backup_path, &config_path).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    info!(
        "Configuration saved successfully to {}",
        config_path.display()
    );
    Ok(())
}

/// Save configuration, logging instead of returning errors.
///
/// Returns `true` if the save was successful.
pub fn save_config_silent(settings: &Settings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Theme, ViewMode};
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) {
        fs::create_dir_all(dir).expect("Failed to create config dir");
        fs::write(dir.join(CONFIG_FILE_NAME), content).expect("Failed to write config");
    }

    #[test]
    fn test_get_config_dir_ends_with_app_name() {
        if let Ok(path) = get_config_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = load_config_from(temp.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "   \n");
        let settings = load_config_from(temp.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_partial_config() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), r#"{"theme": "dark", "unknown_field": 3}"#);

        let settings = load_config_from(temp.path()).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.sync_scroll_enabled);
    }

    #[test]
    fn test_load_corrupted_config_is_parse_error() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "{ invalid json }");

        let result = load_config_from(temp.path());
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_load_sanitizes_values() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), r#"{"font_size": 4.0, "sync_settle_timeout_ms": 0}"#);

        let settings = load_config_from(temp.path()).unwrap();
        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);
        assert_eq!(
            settings.sync_settle_timeout_ms,
            Settings::MIN_SETTLE_TIMEOUT_MS
        );
    }

    #[test]
    fn test_save_creates_directory_and_roundtrips() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join(APP_NAME);
        let original = Settings {
            theme: Theme::Dark,
            view_mode: ViewMode::Preview,
            split_ratio: 0.4,
            ..Settings::default()
        };

        save_config_to(&dir, &original).unwrap();

        assert!(dir.join(CONFIG_FILE_NAME).exists());
        assert!(!dir.join(CONFIG_BACKUP_NAME).exists());
        assert_eq!(load_config_from(&dir).unwrap(), original);
    }

    #[test]
    fn test_save_overwrites_previous_config() {
        let temp = TempDir::new().unwrap();
        save_config_to(temp.path(), &Settings::default()).unwrap();

        let updated = Settings {
            theme: Theme::Dark,
            ..Settings::default()
        };
        save_config_to(temp.path(), &updated).unwrap();

        assert_eq!(load_config_from(temp.path()).unwrap().theme, Theme::Dark);
    }

    #[test]
    fn test_load_config_graceful_fallback() {
        // Whatever is on disk, the public API never fails
        let settings = load_config();
        assert!(settings.font_size >= Settings::MIN_FONT_SIZE);
    }
}
