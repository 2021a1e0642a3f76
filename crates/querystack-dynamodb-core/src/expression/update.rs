//! Update edits: classification of the `update`/`remove` maps and the
//! `UpdateExpression` assembled from them.
//!
//! Every edit is resolved into a [`FieldEdit`] exactly once, here; the value
//! and alias stages only read the resolved form.

use querystack_dynamodb_model::{EditDescriptor, EditEntry, EditMap, Operation};
use serde_json::Value;

use super::map::{EditSet, ExpressionMap, FieldEdit};
use super::predicates::{is_editable_field, keeps_index_key, validate_field_name};
use super::values::{EMPTY_LIST_PLACEHOLDER, placeholder};
use crate::error::{ExpressionError, ExpressionResult};
use crate::filters::omit;

/// Key carried inside an object value to address a list element in place.
const INLINE_INDEX_KEY: &str = "index";

/// Resolve `update` into SET edits.
///
/// Fails when an update operation carries neither `update` nor `remove`, or
/// when a supplied `update` map has nothing left after filtering.
pub(crate) fn classify_update_edits(
    mut map: ExpressionMap<'_>,
) -> ExpressionResult<ExpressionMap<'_>> {
    let conditions = map.conditions;
    if map.operation()? == Operation::Update
        && conditions.update.is_none()
        && conditions.remove.is_none()
    {
        return Err(ExpressionError::MissingEditPayload);
    }
    let Some(update) = &conditions.update else {
        return Ok(map);
    };

    let mut entries = Vec::with_capacity(update.len());
    for entry in editable_entries(update) {
        let (key, edit) = entry?;
        let edit = edit.as_ref();
        if !keeps_index_key(map.config, key, edit.and_then(EditEntry::value)) {
            continue;
        }
        entries.push((key.to_owned(), resolve_set(key, edit.and_then(EditEntry::descriptor))?));
    }

    if entries.is_empty() {
        return Err(ExpressionError::EmptyUpdate);
    }
    check_empty_list_placeholder(&entries)?;
    map.update = Some(EditSet { entries });
    Ok(map)
}

/// Resolve `remove` into REMOVE edits.
pub(crate) fn classify_remove_edits(
    mut map: ExpressionMap<'_>,
) -> ExpressionResult<ExpressionMap<'_>> {
    let conditions = map.conditions;
    let Some(remove) = &conditions.remove else {
        return Ok(map);
    };

    let entries = editable_entries(remove)
        .map(|entry| {
            let (key, edit) = entry?;
            let edit = edit.as_ref().and_then(EditEntry::descriptor);
            Ok((key.to_owned(), resolve_remove(key, edit)?))
        })
        .collect::<ExpressionResult<Vec<_>>>()?;

    if entries.is_empty() {
        return Err(ExpressionError::EmptyRemove);
    }
    map.remove = Some(EditSet { entries });
    Ok(map)
}

/// Append the `SET ...` fragment.
pub(crate) fn build_set_expression(
    mut map: ExpressionMap<'_>,
) -> ExpressionResult<ExpressionMap<'_>> {
    let Some(update) = &map.update else {
        return Ok(map);
    };

    let clauses = update
        .entries
        .iter()
        .filter_map(|(key, edit)| set_clause(key, edit))
        .collect::<Vec<_>>();
    if !clauses.is_empty() {
        let fragment = format!("SET {}", clauses.join(", "));
        map.update_expressions.push(fragment);
    }
    Ok(map)
}

/// Append the `REMOVE ...` fragment.
pub(crate) fn build_remove_expression(
    mut map: ExpressionMap<'_>,
) -> ExpressionResult<ExpressionMap<'_>> {
    let Some(remove) = &map.remove else {
        return Ok(map);
    };

    let clauses = remove
        .entries
        .iter()
        .filter_map(|(key, edit)| remove_clause(key, edit))
        .collect::<Vec<_>>();
    if !clauses.is_empty() {
        let fragment = format!("REMOVE {}", clauses.join(", "));
        map.update_expressions.push(fragment);
    }
    Ok(map)
}

/// Join the accumulated fragments, SET first, into `UpdateExpression`.
pub(crate) fn combine_update_expressions(
    mut map: ExpressionMap<'_>,
) -> ExpressionResult<ExpressionMap<'_>> {
    if map.update_expressions.is_empty() {
        return Err(ExpressionError::MissingUpdateExpressions);
    }
    map.expression.update_expression = Some(map.update_expressions.join(" "));
    Ok(map)
}

fn editable_entries(
    edits: &EditMap,
) -> impl Iterator<Item = ExpressionResult<(&str, &Option<EditEntry>)>> {
    edits
        .iter()
        .filter(|(key, _)| is_editable_field(key))
        .map(|(key, edit)| validate_field_name(key).map(|()| (key, edit)))
}

/// A list append binds `:emptyList`, so no SET field may claim that placeholder.
fn check_empty_list_placeholder(entries: &[(String, FieldEdit)]) -> ExpressionResult<()> {
    if !entries
        .iter()
        .any(|(_, edit)| matches!(edit, FieldEdit::ListAppend(_)))
    {
        return Ok(());
    }
    match entries
        .iter()
        .find(|(key, _)| placeholder(key) == EMPTY_LIST_PLACEHOLDER)
    {
        Some((key, _)) => Err(ExpressionError::ReservedPlaceholder {
            key: key.clone(),
            placeholder: EMPTY_LIST_PLACEHOLDER,
        }),
        None => Ok(()),
    }
}

fn resolve_set(key: &str, edit: Option<&EditDescriptor>) -> ExpressionResult<FieldEdit> {
    let missing_value = || ExpressionError::MissingEditValue {
        key: key.to_owned(),
    };
    let edit = edit.ok_or_else(missing_value)?;
    let value = edit.value.clone().ok_or_else(missing_value)?;

    if edit.append {
        if let Value::Array(items) = value {
            return Ok(FieldEdit::ListAppend(items));
        }
        return Ok(FieldEdit::Scalar(value));
    }
    if let Some(index) = edit.index {
        return Ok(FieldEdit::ListIndexWrite {
            index: list_index(key, index)?,
            value,
        });
    }
    if let Some(index) = inline_index(&value) {
        return Ok(FieldEdit::ListIndexWrite {
            index: list_index(key, index)?,
            value: omit(&value, &[INLINE_INDEX_KEY]),
        });
    }
    Ok(FieldEdit::Scalar(value))
}

fn resolve_remove(key: &str, edit: Option<&EditDescriptor>) -> ExpressionResult<FieldEdit> {
    match edit.and_then(|e| e.index) {
        Some(index) => Ok(FieldEdit::ListIndexRemove(list_index(key, index)?)),
        None => Ok(FieldEdit::FieldRemove),
    }
}

fn inline_index(value: &Value) -> Option<i64> {
    value.as_object()?.get(INLINE_INDEX_KEY)?.as_i64()
}

fn list_index(key: &str, index: i64) -> ExpressionResult<u64> {
    u64::try_from(index).map_err(|_| ExpressionError::InvalidListIndex {
        key: key.to_owned(),
        index,
    })
}

fn set_clause(key: &str, edit: &FieldEdit) -> Option<String> {
    match edit {
        FieldEdit::Scalar(_) => Some(format!("#{key} = :{key}")),
        FieldEdit::ListAppend(_) => Some(format!(
            "#{key} = list_append(if_not_exists(#{key}, {EMPTY_LIST_PLACEHOLDER}), :{key})"
        )),
        FieldEdit::ListIndexWrite { index, .. } => Some(format!("#{key}[{index}] = :{key}")),
        FieldEdit::ListIndexRemove(_) | FieldEdit::FieldRemove => None,
    }
}

fn remove_clause(key: &str, edit: &FieldEdit) -> Option<String> {
    match edit {
        FieldEdit::ListIndexRemove(index) => Some(format!("#{key}[{index}]")),
        FieldEdit::FieldRemove => Some(format!("#{key}")),
        FieldEdit::Scalar(_) | FieldEdit::ListAppend(_) | FieldEdit::ListIndexWrite { .. } => None,
    }
}
