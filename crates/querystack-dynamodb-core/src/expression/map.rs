//! The intermediate representation threaded through the compiler stages.
//!
//! An [`ExpressionMap`] is created per compile call, moved through every
//! stage of one pipeline, and dropped once the accumulated
//! [`QueryExpression`] has been taken out of it. Stages only ever add to it.

use querystack_dynamodb_model::{FieldMap, Operation, QueryConditions, QueryExpression, WhereValue};
use serde_json::Value;

use crate::config::ExpressionConfig;
use crate::error::{ExpressionError, ExpressionResult};

/// The primary key entry of a where clause.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PrimaryKey {
    pub key: String,
    pub value: Value,
}

/// A where clause split into its primary key and AND-filter entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct WhereClause {
    pub primary: Option<PrimaryKey>,
    pub and: Vec<(String, Value)>,
}

impl WhereClause {
    pub fn and_keys(&self) -> impl Iterator<Item = &str> {
        self.and.iter().map(|(k, _)| k.as_str())
    }

    /// Primary key first, then AND-filter keys, in where-clause order.
    pub fn all_keys(&self) -> impl Iterator<Item = &str> {
        self.primary
            .iter()
            .map(|p| p.key.as_str())
            .chain(self.and_keys())
    }
}

/// One update or remove entry, resolved once from its edit descriptor.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldEdit {
    /// `#k = :k`
    Scalar(Value),
    /// `#k = list_append(if_not_exists(#k, :emptyList), :k)`
    ListAppend(Vec<Value>),
    /// `#k[i] = :k`
    ListIndexWrite { index: u64, value: Value },
    /// `REMOVE #k[i]`
    ListIndexRemove(u64),
    /// `REMOVE #k`
    FieldRemove,
}

/// Classified update or remove edits in field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EditSet {
    pub entries: Vec<(String, FieldEdit)>,
}

impl EditSet {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ExpressionMap<'a> {
    pub conditions: &'a QueryConditions,
    pub config: &'a ExpressionConfig,
    pub where_clause: WhereClause,
    pub update: Option<EditSet>,
    pub remove: Option<EditSet>,
    /// Raw `SET ...` / `REMOVE ...` fragments, in join order.
    pub update_expressions: Vec<String>,
    pub expression: QueryExpression,
}

impl<'a> ExpressionMap<'a> {
    pub fn new(conditions: &'a QueryConditions, config: &'a ExpressionConfig) -> Self {
        Self {
            conditions,
            config,
            where_clause: WhereClause::default(),
            update: None,
            remove: None,
            update_expressions: Vec::new(),
            expression: QueryExpression::default(),
        }
    }

    pub fn operation(&self) -> ExpressionResult<Operation> {
        self.conditions
            .operation
            .ok_or(ExpressionError::MissingOperation)
    }

    pub fn where_entries(&self) -> ExpressionResult<&'a FieldMap<WhereValue>> {
        self.conditions
            .where_clause
            .as_ref()
            .ok_or(ExpressionError::MissingWhere)
    }

    pub fn primary(&self) -> ExpressionResult<&PrimaryKey> {
        self.where_clause
            .primary
            .as_ref()
            .ok_or(ExpressionError::MissingPrimaryKey)
    }
}
