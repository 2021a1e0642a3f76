//! `ExpressionAttributeValues`: one `:name -> value` placeholder per compared
//! or written field.

use std::collections::BTreeMap;

use querystack_dynamodb_model::Operation;
use serde_json::Value;

use super::map::{ExpressionMap, FieldEdit};
use crate::error::ExpressionResult;

/// Placeholder defaulting a missing list before `list_append`.
pub(crate) const EMPTY_LIST_PLACEHOLDER: &str = ":emptyList";

/// Bind a placeholder for every value the operation's expressions reference.
///
/// REMOVE edits reference aliases only, so a remove-only update produces no
/// values at all.
pub(crate) fn build_attribute_values(
    mut map: ExpressionMap<'_>,
) -> ExpressionResult<ExpressionMap<'_>> {
    let mut values = BTreeMap::new();

    match map.operation()? {
        Operation::Query => {
            let primary = map.primary()?;
            values.insert(placeholder(&primary.key), primary.value.clone());
            bind_filters(&map, &mut values);
        }
        Operation::Scan => bind_filters(&map, &mut values),
        Operation::Update => {
            for (key, edit) in map.update.iter().flat_map(|edits| &edits.entries) {
                match edit {
                    FieldEdit::Scalar(value) | FieldEdit::ListIndexWrite { value, .. } => {
                        values.insert(placeholder(key), value.clone());
                    }
                    FieldEdit::ListAppend(items) => {
                        values.insert(placeholder(key), Value::Array(items.clone()));
                        values.insert(EMPTY_LIST_PLACEHOLDER.to_owned(), Value::Array(Vec::new()));
                    }
                    FieldEdit::ListIndexRemove(_) | FieldEdit::FieldRemove => {}
                }
            }
        }
    }

    map.expression.expression_attribute_values = values;
    Ok(map)
}

fn bind_filters(map: &ExpressionMap<'_>, values: &mut BTreeMap<String, Value>) {
    for (key, value) in &map.where_clause.and {
        values.insert(placeholder(key), value.clone());
    }
}

pub(crate) fn placeholder(key: &str) -> String {
    format!(":{key}")
}
