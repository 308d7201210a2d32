use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HydrateError, Result};

/// User-level configuration loaded from `~/.config/ssm-hydrate/config.toml`.
///
/// Every field is a fallback for the matching command-line flag.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    /// AWS profile used to reach Parameter Store.
    pub profile: Option<String>,

    /// Region the store client talks to unless a lookup names another one.
    pub region: Option<String>,
}

impl UserConfig {
    /// Overlay command-line values on top of the file values.
    pub fn merge(self, profile: Option<String>, region: Option<String>) -> Self {
        Self {
            profile: profile.or(self.profile),
            region: region.or(self.region),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ssm-hydrate").join("config.toml"))
}

/// Load user configuration from the XDG config directory.
///
/// Returns `Ok(None)` if the config file does not exist.
/// Returns `Err` if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<Option<UserConfig>> {
    match config_path() {
        Some(path) => load_user_config_from(&path),
        None => Ok(None),
    }
}

pub fn load_user_config_from(path: &Path) -> Result<Option<UserConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| HydrateError::Io {
        context: format!("reading user config {}", path.display()),
        source: e,
    })?;

    let config: UserConfig = toml::from_str(&content).map_err(|e| HydrateError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    log::debug!("loaded user config from {}", path.display());
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_user_config() {
        let toml_str = r#"
profile = "staging"
region = "eu-west-1"
"#;
        let config: UserConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.profile.as_deref(), Some("staging"));
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn parse_empty_config() {
        let config: UserConfig = toml::from_str("").unwrap();
        assert_eq!(config, UserConfig::default());
    }

    #[test]
    fn parse_unknown_key_errors() {
        let result: std::result::Result<UserConfig, _> = toml::from_str("decrypt = false");
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let config = UserConfig {
            profile: Some("file".into()),
            region: Some("eu-west-1".into()),
        };
        let merged = config.merge(Some("flag".into()), None);
        assert_eq!(merged.profile.as_deref(), Some("flag"));
        assert_eq!(merged.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn load_missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_user_config_from(&dir.path().join("config.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn load_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid [[ toml").unwrap();

        let err = load_user_config_from(&path).unwrap_err();
        assert!(matches!(err, HydrateError::ConfigParse { .. }));
    }

    #[test]
    fn load_user_config_does_not_fail_without_file() {
        let result = load_user_config();
        assert!(result.is_ok());
    }
}
