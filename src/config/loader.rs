//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the SIT policy
//! from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{SitError, SitResult};

use super::types::SitPolicy;

/// Loads and provides access to the SIT policy.
///
/// # Directory Structure
///
/// ```text
/// config/sit/
/// └── policy.yaml   # Thresholds and grace period
/// ```
///
/// # Example
///
/// ```no_run
/// use sit_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/sit").unwrap();
/// println!("Conversion offered at {} days", loader.customer_expense_threshold_days());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policy: SitPolicy,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns `ConfigNotFound` if `policy.yaml` is missing and
    /// `ConfigParseError` if it is not valid YAML for [`SitPolicy`].
    pub fn load<P: AsRef<Path>>(path: P) -> SitResult<Self> {
        let policy_path = path.as_ref().join("policy.yaml");
        let policy = Self::load_yaml::<SitPolicy>(&policy_path)?;

        if policy.customer_expense_threshold_days < 0 || policy.grace_period_days < 0 {
            return Err(SitError::ConfigParseError {
                path: policy_path.display().to_string(),
                message: "day counts must not be negative".to_string(),
            });
        }

        Ok(Self { policy })
    }

    /// Wraps an already-built policy.
    pub fn from_policy(policy: SitPolicy) -> Self {
        Self { policy }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> SitResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| SitError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| SitError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded policy.
    pub fn policy(&self) -> &SitPolicy {
        &self.policy
    }

    /// Remaining days at or below which conversion to customer expense is offered.
    pub fn customer_expense_threshold_days(&self) -> i64 {
        self.policy.customer_expense_threshold_days
    }

    /// Grace period applied after customer contact or requested delivery.
    pub fn grace_period_days(&self) -> i64 {
        self.policy.grace_period_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> &'static str {
        "./config/sit"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.policy().name, "Storage in Transit policy");
        assert_eq!(loader.customer_expense_threshold_days(), 30);
        assert_eq!(loader.grace_period_days(), 5);
    }

    #[test]
    fn test_loaded_policy_matches_default() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let default = SitPolicy::default();
        assert_eq!(
            loader.customer_expense_threshold_days(),
            default.customer_expense_threshold_days
        );
        assert_eq!(loader.grace_period_days(), default.grace_period_days);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(SitError::ConfigNotFound { path }) => {
                assert!(path.contains("policy.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = std::env::temp_dir().join(format!("sit-ledger-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("policy.yaml"), "name: [unterminated").unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).unwrap();

        match result {
            Err(SitError::ConfigParseError { path, .. }) => {
                assert!(path.contains("policy.yaml"));
            }
            _ => panic!("Expected ConfigParseError"),
        }
    }

    #[test]
    fn test_negative_threshold_is_rejected() {
        let dir = std::env::temp_dir().join(format!("sit-ledger-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("policy.yaml"),
            "name: test\nversion: \"1\"\ncustomer_expense_threshold_days: -1\ngrace_period_days: 5\n",
        )
        .unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(result, Err(SitError::ConfigParseError { .. })));
    }
}
