//! Facade configuration.

use serde::Deserialize;

use crate::probe::PROBE_KEY;

/// Settings applied by [`Storage`](crate::Storage) on top of its store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Prefix for every key, e.g. `"app1"` stores `"theme"` as `"app1:theme"`.
    /// Empty means keys are used verbatim.
    pub namespace: String,
    /// Sentinel key written and removed by availability probes.
    pub probe_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            probe_key: PROBE_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    /// Parses a config from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The namespace as a key prefix, with a trailing `:` separator.
    pub(crate) fn prefix(&self) -> String {
        if self.namespace.is_empty() || self.namespace.ends_with(':') {
            self.namespace.clone()
        } else {
            format!("{}:", self.namespace)
        }
    }
}
