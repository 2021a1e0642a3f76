//! The compiled expression object handed to a document client.
//!
//! Field names and casing are a bit-exact contract with DynamoDB's request
//! grammar. Values are plain JSON documents; the store client marshals them
//! into [`AttributeValue`](crate::AttributeValue)s right before submission.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ReturnValue;

/// Compiler output: the expression fragments and substitution maps for one
/// `Query`, `Scan` or `UpdateItem` request.
///
/// Optional fields are omitted when `None`; empty maps are omitted, so a
/// REMOVE-only update carries no `ExpressionAttributeValues` at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryExpression {
    /// The table the request targets.
    pub table_name: String,

    /// Key condition for `Query` (`#id = :id`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_condition_expression: Option<String>,

    /// Equality filters joined by `and`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,

    /// Attributes to return (`#id, #email`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,

    /// Exact-match item key for `UpdateItem`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub key: BTreeMap<String, Value>,

    /// SET and/or REMOVE clauses for `UpdateItem`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_expression: Option<String>,

    /// Alias (`#name`) to attribute name substitutions.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expression_attribute_names: BTreeMap<String, String>,

    /// Placeholder (`:name`) to value substitutions.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expression_attribute_values: BTreeMap<String, Value>,

    /// Attributes returned by `UpdateItem`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValue>,

    /// Pagination start key for `Query` and `Scan`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub exclusive_start_key: BTreeMap<String, Value>,
}

impl QueryExpression {
    /// Every expression string present on this object, in a fixed order.
    pub fn expression_strings(&self) -> impl Iterator<Item = &str> {
        [
            self.key_condition_expression.as_deref(),
            self.filter_expression.as_deref(),
            self.projection_expression.as_deref(),
            self.update_expression.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}
