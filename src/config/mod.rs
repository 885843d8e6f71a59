//! User preferences for the shell, stored as JSON under the application home.

use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::{Result, SignoutError};
use crate::utils::paths::{app_data_dir, ensure_dir};

const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Keys accepted by `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "screen_reader_mode",
    "high_contrast_mode",
    "quiet_mode",
    "log_filter",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub screen_reader_mode: bool,
    pub high_contrast_mode: bool,
    pub quiet_mode: bool,
    /// Extra `tracing` directive, e.g. `signout_core=debug`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Config {
    /// Updates one preference from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key.to_ascii_lowercase().as_str() {
            "screen_reader_mode" => self.screen_reader_mode = parse_flag(key, value)?,
            "high_contrast_mode" => self.high_contrast_mode = parse_flag(key, value)?,
            "quiet_mode" => self.quiet_mode = parse_flag(key, value)?,
            "log_filter" => {
                self.log_filter = if value.is_empty() || value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            other => {
                return Err(SignoutError::Config(format!(
                    "unknown config key `{}` (expected one of: {})",
                    other,
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(SignoutError::Config(format!(
            "`{}` expects on/off, got `{}`",
            key, value
        ))),
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Reads the preferences, falling back to defaults when no file exists.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_keeps_preferences() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().join("nested")).unwrap();
        let mut config = Config::default();
        config.set("high_contrast_mode", "on").unwrap();
        config.set("log_filter", "signout_core=debug").unwrap();
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert!(loaded.high_contrast_mode);
        assert_eq!(loaded.log_filter.as_deref(), Some("signout_core=debug"));
        assert!(!manager.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_flags() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("colour", "on"),
            Err(SignoutError::Config(ref msg)) if msg.contains("unknown config key")
        ));
        assert!(config.set("quiet_mode", "maybe").is_err());
        assert_eq!(config, Config::default());
    }
}
