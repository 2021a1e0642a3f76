//! DynamoDB expression compilation.
//!
//! This module turns [`QueryConditions`] into a [`QueryExpression`]. The
//! pipeline is:
//!
//! 1. **Validation**: Reject conditions missing a table name, where clause or operation.
//! 2. **Classification**: Split `where` into primary key and AND filters, and
//!    resolve every `update`/`remove` entry into a tagged field edit.
//! 3. **Assembly**: Emit key, filter, projection and update fragments together
//!    with the alias and placeholder maps they reference.
//! 4. **Reference check**: Every alias and placeholder must resolve, and every
//!    substitution must be used.
//!
//! Each operation runs its own fixed list of stages.

mod keys;
mod map;
mod names;
mod pipeline;
mod predicates;
mod projection;
pub mod references;
mod update;
mod values;
mod where_clause;

use querystack_dynamodb_model::{QueryConditions, QueryExpression};
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::ExpressionConfig;
use crate::error::{ExpressionError, ExpressionResult};

use self::map::ExpressionMap;

pub use references::{ExpressionReferences, collect_references, verify_references};

/// Compile `conditions` into the expression object for its operation.
///
/// # Examples
///
/// ```
/// use querystack_dynamodb_core::{ExpressionConfig, compile};
/// use querystack_dynamodb_model::{Operation, QueryConditions, WhereValue};
///
/// let conditions = QueryConditions::new("Users", Operation::Query)
///     .with_where("id", WhereValue::primary("u1"));
/// let expression = compile(&conditions, &ExpressionConfig::default()).unwrap();
/// assert_eq!(expression.key_condition_expression.as_deref(), Some("#id = :id"));
/// ```
pub fn compile(
    conditions: &QueryConditions,
    config: &ExpressionConfig,
) -> ExpressionResult<QueryExpression> {
    let stages = pipeline::stages_for(conditions.operation);
    debug!(
        operation = ?conditions.operation,
        table = ?conditions.table_name,
        stages = stages.len(),
        "compiling query conditions"
    );

    let map = stages
        .iter()
        .try_fold(ExpressionMap::new(conditions, config), |map, (name, stage)| {
            trace!(stage = name, "running expression stage");
            stage(map)
        })?;
    Ok(map.expression)
}

/// Compile conditions supplied as an untyped JSON value.
///
/// `null` is reported as missing conditions rather than a decode error.
pub fn compile_value(
    conditions: Value,
    config: &ExpressionConfig,
) -> ExpressionResult<QueryExpression> {
    if conditions.is_null() {
        return Err(ExpressionError::MissingConditions);
    }
    let conditions: QueryConditions = serde_json::from_value(conditions)?;
    compile(&conditions, config)
}

/// Compile conditions supplied as a JSON document.
pub fn compile_json(
    conditions: &str,
    config: &ExpressionConfig,
) -> ExpressionResult<QueryExpression> {
    if conditions.trim().is_empty() {
        return Err(ExpressionError::MissingConditions);
    }
    let conditions: Value = serde_json::from_str(conditions)?;
    compile_value(conditions, config)
}
