//! Per-operation stage lists and the stages that belong to no builder.

use querystack_dynamodb_model::Operation;

use super::keys::{add_pagination_key, build_key_condition_expression, build_update_key_expression};
use super::map::ExpressionMap;
use super::names::build_attribute_names;
use super::projection::build_projection_expression;
use super::references::check_references;
use super::update::{
    build_remove_expression, build_set_expression, classify_remove_edits, classify_update_edits,
    combine_update_expressions,
};
use super::values::build_attribute_values;
use super::where_clause::{build_filter_expression, classify_where};
use crate::error::{ExpressionError, ExpressionResult};

/// A pure transformation of the expression map.
pub(crate) type Stage = for<'a> fn(ExpressionMap<'a>) -> ExpressionResult<ExpressionMap<'a>>;

const SCAN: &[(&str, Stage)] = &[
    ("validate_conditions", validate_conditions),
    ("add_table_name", add_table_name),
    ("add_pagination_key", add_pagination_key),
    ("classify_where", classify_where),
    ("build_filter_expression", build_filter_expression),
    ("build_attribute_names", build_attribute_names),
    ("build_attribute_values", build_attribute_values),
    ("build_projection_expression", build_projection_expression),
    ("check_references", check_references),
];

const QUERY: &[(&str, Stage)] = &[
    ("validate_conditions", validate_conditions),
    ("add_table_name", add_table_name),
    ("add_pagination_key", add_pagination_key),
    ("classify_where", classify_where),
    ("build_key_condition_expression", build_key_condition_expression),
    ("build_filter_expression", build_filter_expression),
    ("build_attribute_names", build_attribute_names),
    ("build_attribute_values", build_attribute_values),
    ("build_projection_expression", build_projection_expression),
    ("check_references", check_references),
];

const UPDATE: &[(&str, Stage)] = &[
    ("validate_conditions", validate_conditions),
    ("add_table_name", add_table_name),
    ("classify_where", classify_where),
    ("classify_update_edits", classify_update_edits),
    ("classify_remove_edits", classify_remove_edits),
    ("build_update_key_expression", build_update_key_expression),
    ("build_attribute_names", build_attribute_names),
    ("build_attribute_values", build_attribute_values),
    ("build_set_expression", build_set_expression),
    ("build_remove_expression", build_remove_expression),
    ("combine_update_expressions", combine_update_expressions),
    ("add_return_values", add_return_values),
    ("check_references", check_references),
];

/// Conditions without an operation only get as far as validation.
const VALIDATE_ONLY: &[(&str, Stage)] = &[("validate_conditions", validate_conditions)];

/// The stages run for `operation`, in order.
pub(crate) fn stages_for(operation: Option<Operation>) -> &'static [(&'static str, Stage)] {
    match operation {
        Some(Operation::Scan) => SCAN,
        Some(Operation::Query) => QUERY,
        Some(Operation::Update) => UPDATE,
        None => VALIDATE_ONLY,
    }
}

/// Reject conditions missing a table name, where clause or operation.
pub(crate) fn validate_conditions(map: ExpressionMap<'_>) -> ExpressionResult<ExpressionMap<'_>> {
    let conditions = map.conditions;
    if conditions.table_name.as_deref().is_none_or(str::is_empty) {
        return Err(ExpressionError::MissingTableName);
    }
    if conditions.where_clause.is_none() {
        return Err(ExpressionError::MissingWhere);
    }
    if conditions.operation.is_none() {
        return Err(ExpressionError::MissingOperation);
    }
    Ok(map)
}

pub(crate) fn add_table_name(mut map: ExpressionMap<'_>) -> ExpressionResult<ExpressionMap<'_>> {
    map.expression.table_name = map
        .conditions
        .table_name
        .clone()
        .ok_or(ExpressionError::MissingTableName)?;
    Ok(map)
}

/// Copy `returnValues` through verbatim.
pub(crate) fn add_return_values(mut map: ExpressionMap<'_>) -> ExpressionResult<ExpressionMap<'_>> {
    map.expression.return_values = map.conditions.return_values;
    Ok(map)
}
