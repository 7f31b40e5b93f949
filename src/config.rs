//! # Runtime Configuration
//!
//! Environment-variable configuration for the binder and the CLI.
//!
//! ## Environment Variables
//!
//! ### `REQBIND_REPEATED_PARAM`
//!
//! Which value a scalar field binds when its parameter is submitted more than
//! once: `first` (default) or `last`.
//!
//! ### `REQBIND_CATALOG`
//!
//! Catalog file used by CLI commands when `--catalog` is not given.
//!
//! ```bash
//! export REQBIND_REPEATED_PARAM=last
//! export REQBIND_CATALOG=catalog/endpoints.yaml
//! reqbind bind --endpoint request_param_v2 --query 'username=kim&age=20'
//! ```

use crate::binder::{BinderConfig, RepeatedParamPolicy};
use std::env;
use std::path::PathBuf;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub repeated: RepeatedParamPolicy,
    pub catalog: Option<PathBuf>,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let repeated = lookup("REQBIND_REPEATED_PARAM")
            .map(|v| RepeatedParamPolicy::parse(&v))
            .unwrap_or_default();
        let catalog = lookup("REQBIND_CATALOG")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        RuntimeConfig { repeated, catalog }
    }

    pub fn binder_config(&self) -> BinderConfig {
        BinderConfig {
            repeated: self.repeated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_lookup(|_| None);
        assert_eq!(config.repeated, RepeatedParamPolicy::First);
        assert!(config.catalog.is_none());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("REQBIND_REPEATED_PARAM", "LAST"),
            ("REQBIND_CATALOG", "catalog/endpoints.yaml"),
        ]
        .into_iter()
        .collect();
        let config = RuntimeConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.binder_config().repeated, RepeatedParamPolicy::Last);
        assert_eq!(config.catalog, Some(PathBuf::from("catalog/endpoints.yaml")));
    }
}
