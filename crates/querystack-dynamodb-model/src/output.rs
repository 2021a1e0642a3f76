//! DynamoDB output types for the operations a compiled expression is submitted as.
//!
//! All output structs use `PascalCase` JSON field naming to match the DynamoDB
//! wire protocol (`awsJson1_0`). The `documents` helpers unmarshal items back
//! into plain JSON so callers never handle attribute values directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attribute_value::AttributeValue;

/// Output for the `PutItem` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemOutput {
    /// The attribute values as they appeared before the `PutItem` operation.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, AttributeValue>,
}

/// Output for the `UpdateItem` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateItemOutput {
    /// The attribute values as they appear before or after the update,
    /// depending on `ReturnValues`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, AttributeValue>,
}

impl UpdateItemOutput {
    /// The returned attributes as a JSON document, if any were returned.
    #[must_use]
    pub fn document(&self) -> Option<Value> {
        (!self.attributes.is_empty()).then(|| item_to_document(&self.attributes))
    }
}

/// Output for the `Query` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryOutput {
    /// An array of item attributes that match the query conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<HashMap<String, AttributeValue>>,

    /// The number of items in the response.
    pub count: i32,

    /// The number of items evaluated before the filter expression was applied.
    pub scanned_count: i32,

    /// The primary key of the item where the query operation stopped. Use this
    /// value as `ExclusiveStartKey` in a subsequent query to continue.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub last_evaluated_key: HashMap<String, AttributeValue>,
}

impl QueryOutput {
    /// The matched items as JSON documents.
    #[must_use]
    pub fn documents(&self) -> Vec<Value> {
        self.items.iter().map(item_to_document).collect()
    }

    /// The continuation token, in the shape query conditions accept as
    /// `lastEvaluatedKey`.
    #[must_use]
    pub fn last_evaluated_document_key(&self) -> Option<serde_json::Map<String, Value>> {
        key_to_document(&self.last_evaluated_key)
    }
}

/// Output for the `Scan` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanOutput {
    /// An array of item attributes that match the scan conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<HashMap<String, AttributeValue>>,

    /// The number of items in the response.
    pub count: i32,

    /// The number of items evaluated before the filter expression was applied.
    pub scanned_count: i32,

    /// The primary key of the item where the scan operation stopped. Use this
    /// value as `ExclusiveStartKey` in a subsequent scan to continue.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub last_evaluated_key: HashMap<String, AttributeValue>,
}

impl ScanOutput {
    /// The matched items as JSON documents.
    #[must_use]
    pub fn documents(&self) -> Vec<Value> {
        self.items.iter().map(item_to_document).collect()
    }

    /// The continuation token, in the shape query conditions accept as
    /// `lastEvaluatedKey`.
    #[must_use]
    pub fn last_evaluated_document_key(&self) -> Option<serde_json::Map<String, Value>> {
        key_to_document(&self.last_evaluated_key)
    }
}

fn item_to_document(item: &HashMap<String, AttributeValue>) -> Value {
    Value::Object(
        item.iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect(),
    )
}

fn key_to_document(
    key: &HashMap<String, AttributeValue>,
) -> Option<serde_json::Map<String, Value>> {
    if key.is_empty() {
        return None;
    }
    Some(key.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
}
