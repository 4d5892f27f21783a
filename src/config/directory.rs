//! Directory configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Where user contexts, classes and schools come from.
///
/// With a `base_url` the HTTP directory is used; otherwise an in-memory
/// directory, optionally seeded from `seed_path`.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// JSON seed file for the in-memory directory
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

impl DirectoryConfig {
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|u| !u.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = self.base_url() {
            reqwest::Url::parse(url)
                .map_err(|e| ValidationError::InvalidDirectoryUrl(e.to_string()))?;
        }
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidDirectoryTimeout);
        }
        Ok(())
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout(),
            seed_path: None,
        }
    }
}

fn default_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_defaults_to_in_memory() {
        let config = DirectoryConfig::default();
        assert!(config.base_url().is_none());
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_relative_url_is_rejected() {
        let config = DirectoryConfig {
            base_url: Some("directory.internal/api".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidDirectoryUrl(_))
        ));
    }

    #[test]
    fn test_timeout_bounds() {
        let config = DirectoryConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
