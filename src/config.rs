//! Framework configuration.
//!
//! Controls the behaviour the dispatcher layers around a connector: result
//! post-processing, timeouts and diagnostics. Plain data with defaults that
//! suit most connectors; load it from JSON or assemble it with
//! [`FrameworkConfigBuilder`].
//!
//! ```rust
//! use connector_framework::config::FrameworkConfig;
//! use connector_framework::operations::OperationKind;
//! use std::time::Duration;
//!
//! let config = FrameworkConfig::from_json_str(
//!     r#"{ "deduplicateResults": false, "operationTimeouts": { "Search": 5000 } }"#,
//! )
//! .unwrap();
//! assert!(!config.deduplicate_results);
//! assert_eq!(config.timeout_for(OperationKind::Search), Some(Duration::from_secs(5)));
//! ```

use crate::error::{ConnectorError, ConnectorResult};
use crate::operations::OperationKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Dispatcher behaviour settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameworkConfig {
    /// Re-check search results against the filter in memory.
    pub fallback_filtering: bool,
    /// Drop repeated Uids when a search runs more than one native query.
    pub deduplicate_results: bool,
    /// Trim search results to the requested attributes.
    pub reduce_to_attributes_to_get: bool,
    /// Timeout applied to operations without a specific one.
    #[serde(with = "duration_option_millis")]
    pub default_timeout: Option<Duration>,
    /// Per-operation timeouts, overriding the default.
    #[serde(with = "duration_map_millis")]
    pub operation_timeouts: HashMap<OperationKind, Duration>,
    /// Log a warning when a filter translates into more native queries.
    pub query_count_warning_threshold: usize,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            fallback_filtering: true,
            deduplicate_results: true,
            reduce_to_attributes_to_get: true,
            default_timeout: None,
            operation_timeouts: HashMap::new(),
            query_count_warning_threshold: 16,
        }
    }
}

impl FrameworkConfig {
    pub fn builder() -> FrameworkConfigBuilder {
        FrameworkConfigBuilder::new()
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> ConnectorResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            ConnectorError::InvalidConfiguration {
                message: format!("Malformed framework configuration: {}", e),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Effective timeout for an operation, if any.
    pub fn timeout_for(&self, operation: OperationKind) -> Option<Duration> {
        self.operation_timeouts
            .get(&operation)
            .copied()
            .or(self.default_timeout)
    }

    pub fn validate(&self) -> ConnectorResult<()> {
        if self.default_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConnectorError::InvalidConfiguration {
                message: "Default timeout must be greater than 0".to_string(),
            });
        }

        if let Some((operation, _)) = self
            .operation_timeouts
            .iter()
            .find(|(_, timeout)| timeout.is_zero())
        {
            return Err(ConnectorError::InvalidConfiguration {
                message: format!("Timeout for {} must be greater than 0", operation),
            });
        }

        if self.query_count_warning_threshold == 0 {
            return Err(ConnectorError::InvalidConfiguration {
                message: "Query count warning threshold must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for [`FrameworkConfig`].
#[derive(Debug, Clone, Default)]
pub struct FrameworkConfigBuilder {
    config: FrameworkConfig,
}

impl FrameworkConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fallback_filtering(mut self, enabled: bool) -> Self {
        self.config.fallback_filtering = enabled;
        self
    }

    pub fn deduplicate_results(mut self, enabled: bool) -> Self {
        self.config.deduplicate_results = enabled;
        self
    }

    pub fn reduce_to_attributes_to_get(mut self, enabled: bool) -> Self {
        self.config.reduce_to_attributes_to_get = enabled;
        self
    }

    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout = Some(timeout);
        self
    }

    pub fn operation_timeout(mut self, operation: OperationKind, timeout: Duration) -> Self {
        self.config.operation_timeouts.insert(operation, timeout);
        self
    }

    pub fn query_count_warning_threshold(mut self, threshold: usize) -> Self {
        self.config.query_count_warning_threshold = threshold;
        self
    }

    pub fn build(self) -> ConnectorResult<FrameworkConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Serde module for `Option<Duration>` as milliseconds.
mod duration_option_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<u64>::deserialize(deserializer)?;
        Ok(millis.map(Duration::from_millis))
    }
}

/// Serde module for per-operation durations as milliseconds.
mod duration_map_millis {
    use crate::operations::OperationKind;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::{BTreeMap, HashMap};
    use std::time::Duration;

    pub fn serialize<S>(
        durations: &HashMap<OperationKind, Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        durations
            .iter()
            .map(|(operation, d)| (*operation, u64::try_from(d.as_millis()).unwrap_or(u64::MAX)))
            .collect::<BTreeMap<_, _>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<HashMap<OperationKind, Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = HashMap::<OperationKind, u64>::deserialize(deserializer)?;
        Ok(millis
            .into_iter()
            .map(|(operation, ms)| (operation, Duration::from_millis(ms)))
            .collect())
    }
}
