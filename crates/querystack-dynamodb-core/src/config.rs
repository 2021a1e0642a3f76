//! Expression compiler configuration.
//!
//! The compiler has exactly one tunable: the set of attribute names that back
//! secondary indexes. DynamoDB rejects empty or null values for index key
//! attributes, so SET edits on those fields are dropped when they carry no
//! value. The configuration is passed into every compile call explicitly and
//! is never mutated by the compiler.

use std::env;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Environment variable holding the comma-separated index key names.
pub const INDEX_KEYS_ENV: &str = "DYNAMO_DB_INDEX_KEYS";

/// Expression compiler configuration.
///
/// # Examples
///
/// ```
/// use querystack_dynamodb_core::config::ExpressionConfig;
///
/// let config = ExpressionConfig::builder()
///     .index_keys(vec!["emailIndex".to_owned()])
///     .build();
/// assert!(config.is_index_key("emailIndex"));
/// assert!(!config.is_index_key("email"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionConfig {
    /// Attribute names that must never be written empty.
    #[builder(default)]
    pub index_keys: Vec<String>,
}

impl ExpressionConfig {
    /// Create configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DYNAMO_DB_INDEX_KEYS` | *(empty)* |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let index_keys = lookup(INDEX_KEYS_ENV)
            .map(|raw| parse_list(&raw))
            .unwrap_or_default();
        Self { index_keys }
    }

    /// Returns `true` if `field` is configured as an index key.
    #[must_use]
    pub fn is_index_key(&self, field: &str) -> bool {
        self.index_keys.iter().any(|k| k == field)
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
