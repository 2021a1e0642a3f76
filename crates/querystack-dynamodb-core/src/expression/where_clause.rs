//! Where-clause classification and the filter expression built from it.

use querystack_dynamodb_model::Operation;

use super::map::{ExpressionMap, PrimaryKey, WhereClause};
use super::predicates::{is_where_field, validate_field_name};
use crate::error::{ExpressionError, ExpressionResult};

/// Split `where` into its primary key and AND-filter entries.
///
/// Scans have no primary key concept: every field becomes a filter. Queries
/// and updates require exactly one entry marked primary.
pub(crate) fn classify_where(mut map: ExpressionMap<'_>) -> ExpressionResult<ExpressionMap<'_>> {
    let operation = map.operation()?;
    let mut clause = WhereClause::default();

    for (key, entry) in map.where_entries()?.iter() {
        if !is_where_field(key)? {
            continue;
        }

        if operation != Operation::Scan && entry.is_primary() {
            if let Some(existing) = &clause.primary {
                return Err(ExpressionError::MultiplePrimaryKeys {
                    first: existing.key.clone(),
                    second: key.to_owned(),
                });
            }
            // An update's primary key only lands in `Key`, never in an expression.
            if operation == Operation::Query {
                validate_field_name(key)?;
            }
            clause.primary = Some(PrimaryKey {
                key: key.to_owned(),
                value: entry.value().clone(),
            });
        } else {
            validate_field_name(key)?;
            clause.and.push((key.to_owned(), entry.value().clone()));
        }
    }

    if operation != Operation::Scan && clause.primary.is_none() {
        return Err(ExpressionError::MissingPrimaryKey);
    }

    map.where_clause = clause;
    Ok(map)
}

/// Emit `FilterExpression` joining every AND-filter equality with `and`.
pub(crate) fn build_filter_expression(
    mut map: ExpressionMap<'_>,
) -> ExpressionResult<ExpressionMap<'_>> {
    if map.where_clause.and.is_empty() {
        return Ok(map);
    }

    let filter = map
        .where_clause
        .and_keys()
        .map(|key| format!("#{key} = :{key}"))
        .collect::<Vec<_>>()
        .join(" and ");
    map.expression.filter_expression = Some(filter);
    Ok(map)
}
