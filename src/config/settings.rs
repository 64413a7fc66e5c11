//! Settings Module
//!
//! Loads ldm settings (database location, sysfs root, output style) from
//! `settings.kdl` in the ldm config directory:
//!
//! ```kdl
//! settings {
//!     modalias-dir "/usr/share/linux-driver-management/modaliases"
//!     sysfs-root "/sys"
//!     color "auto"
//!     format "table"
//! }
//! ```
//!
//! A missing file means defaults. Settings are only read, never written.

use crate::constants::{DEFAULT_MODALIAS_DIR, DEFAULT_SYSFS_ROOT};
use crate::error::{LdmError, Result};
use crate::utils::paths;
use kdl::{KdlDocument, KdlNode};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const VALID_KEYS: &[&str] = &["modalias-dir", "sysfs-root", "color", "format"];

/// Settings manager
#[derive(Debug, Clone)]
pub struct Settings {
    settings_file: PathBuf,
    values: HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(paths::settings_file()?)
    }

    /// Load settings from `path`, or use defaults if it does not exist
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let settings_file = path.into();

        let values = if settings_file.exists() {
            parse_settings(&settings_file)?
        } else {
            Self::defaults()
        };

        Ok(Self {
            settings_file,
            values,
        })
    }

    /// Get a setting value
    pub fn get(&self, key: &str) -> Option<&String> {
        self.values.get(key)
    }

    /// Get all settings
    pub fn all(&self) -> &HashMap<String, String> {
        &self.values
    }

    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    pub fn modalias_dir(&self) -> PathBuf {
        PathBuf::from(self.value_or("modalias-dir", DEFAULT_MODALIAS_DIR))
    }

    pub fn sysfs_root(&self) -> PathBuf {
        PathBuf::from(self.value_or("sysfs-root", DEFAULT_SYSFS_ROOT))
    }

    pub fn color(&self) -> &str {
        self.value_or("color", "auto")
    }

    pub fn format(&self) -> &str {
        self.value_or("format", "table")
    }

    fn value_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values.get(key).map(String::as_str).unwrap_or(default)
    }

    /// Validate setting key
    fn validate_key(key: &str) -> Result<()> {
        if !VALID_KEYS.contains(&key) {
            return Err(LdmError::Config(format!(
                "Unknown setting: '{}'. Valid settings: {}",
                key,
                VALID_KEYS.join(", ")
            )));
        }

        Ok(())
    }

    /// Validate setting value
    fn validate_value(key: &str, value: &str) -> Result<()> {
        let valid: &[&str] = match key {
            "color" => &["auto", "always", "never"],
            "format" => &["table", "json"],
            _ => {
                if value.trim().is_empty() {
                    return Err(LdmError::Config(format!("Setting '{}' cannot be empty", key)));
                }
                return Ok(());
            }
        };

        if !valid.contains(&value) {
            return Err(LdmError::Config(format!(
                "Invalid value for '{}': '{}'. Valid: {}",
                key,
                value,
                valid.join(", ")
            )));
        }

        Ok(())
    }

    /// Get default settings
    fn defaults() -> HashMap<String, String> {
        let mut defaults = HashMap::new();
        defaults.insert("modalias-dir".to_string(), DEFAULT_MODALIAS_DIR.to_string());
        defaults.insert("sysfs-root".to_string(), DEFAULT_SYSFS_ROOT.to_string());
        defaults.insert("color".to_string(), "auto".to_string());
        defaults.insert("format".to_string(), "table".to_string());
        defaults
    }
}

/// Parse settings from KDL file
///
/// Keys may sit at the top level or inside a `settings { }` block.
fn parse_settings(path: &Path) -> Result<HashMap<String, String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        LdmError::Config(format!("Failed to read settings '{}': {}", path.display(), e))
    })?;

    let doc = KdlDocument::parse(&content).map_err(|e| {
        LdmError::Config(format!("Failed to parse settings '{}': {}", path.display(), e))
    })?;

    let mut values = Settings::defaults();

    for node in doc.nodes() {
        if node.name().value() == "settings" {
            if let Some(children) = node.children() {
                for child in children.nodes() {
                    read_setting(child, &mut values)?;
                }
            }
        } else {
            read_setting(node, &mut values)?;
        }
    }

    Ok(values)
}

fn read_setting(node: &KdlNode, values: &mut HashMap<String, String>) -> Result<()> {
    let key = node.name().value();
    Settings::validate_key(key)?;

    let value = get_first_string(node)
        .ok_or_else(|| LdmError::Config(format!("Setting '{}' needs a string value", key)))?;
    Settings::validate_value(key, &value)?;

    values.insert(key.to_string(), value);
    Ok(())
}

/// Get first string value from a KDL node
fn get_first_string(node: &KdlNode) -> Option<String> {
    if let Some(entry) = node.entries().first()
        && let Some(val) = entry.value().as_string()
    {
        return Some(val.to_string());
    }
    None
}
