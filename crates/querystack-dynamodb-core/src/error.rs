//! Error types for expression compilation and store submission.
//!
//! Every compiler error is a caller-input error: it is raised by the stage
//! that detects it, aborts the pipeline, and is never worth retrying.

use querystack_dynamodb_model::Operation;

/// Errors raised while compiling query conditions into an expression.
#[derive(Debug, thiserror::Error)]
pub enum ExpressionError {
    /// No conditions were supplied at all.
    #[error("Missing query conditions")]
    MissingConditions,

    /// The conditions could not be decoded.
    #[error("Invalid query conditions: {0}")]
    InvalidConditions(#[from] serde_json::Error),

    /// `tableName` is absent.
    #[error("Missing tableName in query conditions")]
    MissingTableName,

    /// `where` is absent.
    #[error("Query conditions is missing where clause")]
    MissingWhere,

    /// `operation` is absent.
    #[error("Missing operation type in query conditions")]
    MissingOperation,

    /// A query or update where clause has no entry marked primary.
    #[error("Missing primary key in where clause")]
    MissingPrimaryKey,

    /// More than one where entry is marked primary.
    #[error("Multiple primary keys in where clause: {first}, {second}")]
    MultiplePrimaryKeys {
        /// The first primary field found.
        first: String,
        /// The second primary field found.
        second: String,
    },

    /// The where clause uses a logical operator the compiler does not implement.
    #[error("Unsupported where operator: {0}")]
    UnsupportedOperator(String),

    /// An update operation supplies neither `update` nor `remove`.
    #[error("Missing update or remove section for an update operation")]
    MissingEditPayload,

    /// An `update` map resolved to zero entries.
    #[error("Missing update properties and values")]
    EmptyUpdate,

    /// A `remove` map resolved to zero entries.
    #[error("Missing remove properties and values")]
    EmptyRemove,

    /// A SET edit carries nothing to write.
    #[error("Missing value property for key: {key}")]
    MissingEditValue {
        /// The offending field.
        key: String,
    },

    /// A list index is negative.
    #[error("Invalid list index {index} for key: {key}")]
    InvalidListIndex {
        /// The offending field.
        key: String,
        /// The index supplied.
        index: i64,
    },

    /// A SET field would bind the same placeholder as the list-append default.
    #[error("Field {key} collides with reserved placeholder {placeholder}")]
    ReservedPlaceholder {
        /// The offending field.
        key: String,
        /// The placeholder it collides with.
        placeholder: &'static str,
    },

    /// A field name cannot be expressed as an alias token.
    #[error("Invalid field name: {0:?}")]
    InvalidFieldName(String),

    /// The update stage reached assembly with no SET or REMOVE clause.
    #[error("Missing update expressions")]
    MissingUpdateExpressions,

    /// An expression references an alias with no name substitution.
    #[error("Unresolved expression attribute name: {0}")]
    UnresolvedName(String),

    /// An expression references a placeholder with no value substitution.
    #[error("Unresolved expression attribute value: {0}")]
    UnresolvedValue(String),

    /// A name substitution is not referenced by any expression.
    #[error("Value provided in ExpressionAttributeNames unused in expressions: {0}")]
    UnusedName(String),

    /// A value substitution is not referenced by any expression.
    #[error("Value provided in ExpressionAttributeValues unused in expressions: {0}")]
    UnusedValue(String),
}

/// Convenience result type for the expression compiler.
pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Errors raised by the document store client.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The conditions failed to compile.
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    /// The conditions were compiled for a different operation than the one invoked.
    #[error("conditions target {found} but {expected} was invoked")]
    OperationMismatch {
        /// The operation the store call performs.
        expected: Operation,
        /// The operation named by the conditions.
        found: Operation,
    },

    /// An item to put is not a JSON object.
    #[error("item must be a JSON object")]
    InvalidItem,

    /// The backend returned an attribute shape that has no JSON document form.
    #[error("unsupported attribute type in response: {0}")]
    UnsupportedAttribute(String),

    /// The backend call failed.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Convenience result type for the document store client.
pub type StoreResult<T> = Result<T, StoreError>;

/// A failure reported by [`log_lifecycle`](crate::lifecycle::log_lifecycle).
///
/// The message carries the error id that was logged, so a caller-facing error
/// can be matched to its log line.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct LifecycleError {
    /// The id logged alongside the failure.
    pub error_id: uuid::Uuid,
    /// `Error: Failed to <action>. [<custom>. ]Error Id: <id>. <cause>`
    pub message: String,
}
