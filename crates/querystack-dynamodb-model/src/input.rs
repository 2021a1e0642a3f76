//! DynamoDB input types for the operations a compiled expression is submitted as.
//!
//! All input structs use `PascalCase` JSON field naming to match the DynamoDB
//! wire protocol (`awsJson1_0`). Optional fields are omitted when `None`,
//! empty `HashMap`s are omitted to produce minimal JSON payloads.
//!
//! A compiled [`QueryExpression`] converts into the matching input with
//! `From`, marshalling its JSON values into [`AttributeValue`]s.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attribute_value::AttributeValue;
use crate::expression::QueryExpression;
use crate::types::ReturnValue;

/// Input for the `PutItem` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemInput {
    /// The name of the table to put the item into.
    pub table_name: String,

    /// A map of attribute name to attribute value, representing the item.
    pub item: HashMap<String, AttributeValue>,

    /// Determines the attributes to return after the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValue>,
}

/// Input for the `UpdateItem` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateItemInput {
    /// The name of the table containing the item to update.
    pub table_name: String,

    /// The primary key of the item to be updated.
    pub key: HashMap<String, AttributeValue>,

    /// An expression that defines one or more attributes to be updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_expression: Option<String>,

    /// Substitution tokens for attribute names in an expression.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,

    /// Substitution tokens for attribute values in an expression.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_values: HashMap<String, AttributeValue>,

    /// Determines the attributes to return after the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValue>,
}

/// Input for the `Query` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryInput {
    /// The name of the table to query.
    pub table_name: String,

    /// The condition that specifies the key values for items to be retrieved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_condition_expression: Option<String>,

    /// A string that contains conditions for filtering the query results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,

    /// A string that identifies the attributes to retrieve from the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,

    /// Substitution tokens for attribute names in an expression.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,

    /// Substitution tokens for attribute values in an expression.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_values: HashMap<String, AttributeValue>,

    /// The primary key of the first item that this operation will evaluate.
    /// Used for pagination.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub exclusive_start_key: HashMap<String, AttributeValue>,
}

/// Input for the `Scan` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanInput {
    /// The name of the table to scan.
    pub table_name: String,

    /// A string that contains conditions for filtering the scan results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<String>,

    /// A string that identifies the attributes to retrieve from the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,

    /// Substitution tokens for attribute names in an expression.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,

    /// Substitution tokens for attribute values in an expression.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_values: HashMap<String, AttributeValue>,

    /// The primary key of the first item that this operation will evaluate.
    /// Used for pagination.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub exclusive_start_key: HashMap<String, AttributeValue>,
}

impl PutItemInput {
    /// Build a `PutItem` request for a JSON document item.
    ///
    /// Returns `None` if `item` is not a JSON object.
    #[must_use]
    pub fn from_document(table_name: impl Into<String>, item: &Value) -> Option<Self> {
        let members = item.as_object()?;
        Some(Self {
            table_name: table_name.into(),
            item: members
                .iter()
                .map(|(k, v)| (k.clone(), AttributeValue::from_json(v)))
                .collect(),
            return_values: Some(ReturnValue::None),
        })
    }
}

impl From<QueryExpression> for UpdateItemInput {
    fn from(expression: QueryExpression) -> Self {
        Self {
            table_name: expression.table_name,
            key: marshal(&expression.key),
            update_expression: expression.update_expression,
            expression_attribute_names: expression.expression_attribute_names.into_iter().collect(),
            expression_attribute_values: marshal(&expression.expression_attribute_values),
            return_values: expression.return_values,
        }
    }
}

impl From<QueryExpression> for QueryInput {
    fn from(expression: QueryExpression) -> Self {
        Self {
            table_name: expression.table_name,
            key_condition_expression: expression.key_condition_expression,
            filter_expression: expression.filter_expression,
            projection_expression: expression.projection_expression,
            expression_attribute_names: expression.expression_attribute_names.into_iter().collect(),
            expression_attribute_values: marshal(&expression.expression_attribute_values),
            exclusive_start_key: marshal(&expression.exclusive_start_key),
        }
    }
}

impl From<QueryExpression> for ScanInput {
    fn from(expression: QueryExpression) -> Self {
        Self {
            table_name: expression.table_name,
            filter_expression: expression.filter_expression,
            projection_expression: expression.projection_expression,
            expression_attribute_names: expression.expression_attribute_names.into_iter().collect(),
            expression_attribute_values: marshal(&expression.expression_attribute_values),
            exclusive_start_key: marshal(&expression.exclusive_start_key),
        }
    }
}

fn marshal(values: &BTreeMap<String, Value>) -> HashMap<String, AttributeValue> {
    values
        .iter()
        .map(|(k, v)| (k.clone(), AttributeValue::from_json(v)))
        .collect()
}
