use crate::jobs::LookupNaming;
use crate::service::Namespace;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Default file name looked up next to the store
pub const CONFIG_FILE: &str = "sekoia-setup.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Setup tool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupConfig {
    /// Namespace the generated saved searches live in. The app owns every
    /// saved search in it: each run deletes and rebuilds all of them.
    #[serde(default)]
    pub namespace: Namespace,
    #[serde(default)]
    pub lookup_naming: LookupNaming,
    /// Set `is_configured = true` in app.conf once setup succeeds
    #[serde(default)]
    pub mark_configured: bool,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            namespace: Namespace::default(),
            lookup_naming: LookupNaming::default(),
            mark_configured: false,
        }
    }
}

/// Read the configuration file
pub async fn read_config(config_path: &Path) -> Result<Option<SetupConfig>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(config_path).await?;
    let config: SetupConfig = serde_json::from_str(&content)?;
    Ok(Some(config))
}

/// Write the configuration file
pub async fn write_config(config_path: &Path, config: &SetupConfig) -> Result<(), ConfigError> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(config_path, content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: SetupConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SetupConfig::default());
        assert_eq!(config.namespace.owner, "nobody");
        assert_eq!(config.namespace.app, "sekoia.io");
        assert_eq!(config.namespace.sharing, "app");
        assert_eq!(config.lookup_naming, LookupNaming::Ordinal);
        assert!(!config.mark_configured);
    }

    #[test]
    fn test_camel_case_keys() {
        let config: SetupConfig =
            serde_json::from_str(r#"{"lookupNaming": "stable", "markConfigured": true}"#).unwrap();
        assert_eq!(config.lookup_naming, LookupNaming::Stable);
        assert!(config.mark_configured);
    }

    #[tokio::test]
    async fn test_read_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        assert!(read_config(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        let config = SetupConfig {
            lookup_naming: LookupNaming::Stable,
            ..SetupConfig::default()
        };

        write_config(&path, &config).await.unwrap();
        assert_eq!(read_config(&path).await.unwrap(), Some(config));
    }
}
