//! Tool settings
//!
//! Settings are read from a TOML file with one table per tool:
//!
//! ```toml
//! [share]
//! enabled = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use share_model::flags;

use crate::{Error, Result};

/// Settings of the share tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareSettings {
    /// Master switch of every interception point; read once at startup
    #[serde(default)]
    pub enabled: bool,
}

/// Settings file layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub share: ShareSettings,
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load settings from a file
    ///
    /// # Errors
    ///
    /// Returns `SettingsNotFound` if the file does not exist, or a TOML error
    /// if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::SettingsNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

/// Where a setting is stored by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingScope {
    World,
    Client,
}

/// Registration data of one setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingDescriptor {
    pub key: &'static str,
    pub name: String,
    pub hint: String,
    pub scope: SettingScope,
    pub default: bool,
    pub requires_reload: bool,
}

impl ShareSettings {
    /// Settings the tool registers with the host
    pub fn descriptors() -> Vec<SettingDescriptor> {
        vec![SettingDescriptor {
            key: "enabled",
            name: format!("{}.settings.{}.enabled.name", flags::MODULE_ID, flags::TOOL),
            hint: format!("{}.settings.{}.enabled.hint", flags::MODULE_ID, flags::TOOL),
            scope: SettingScope::World,
            default: false,
            requires_reload: true,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_disabled_by_default() {
        assert!(!ShareSettings::default().enabled);
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
        assert_eq!(Settings::from_toml("[share]\n").unwrap(), Settings::default());
    }

    #[test]
    fn test_load_and_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        let settings = Settings {
            share: ShareSettings { enabled: true },
        };

        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Settings::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(Error::SettingsNotFound { .. })));
    }

    #[test]
    fn test_invalid_value() {
        assert!(Settings::from_toml("[share]\nenabled = \"yes\"").is_err());
    }

    #[test]
    fn test_enabled_requires_reload() {
        let descriptors = ShareSettings::descriptors();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].key, "enabled");
        assert!(descriptors[0].requires_reload);
        assert!(!descriptors[0].default);
        assert_eq!(descriptors[0].name, "toolbelt.settings.share.enabled.name");
    }
}
