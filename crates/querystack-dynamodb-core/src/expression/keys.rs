//! Key expressions: the key condition for queries, the exact item key for
//! updates, and the pagination start key for reads.

use super::map::ExpressionMap;
use crate::error::ExpressionResult;

/// Emit `KeyConditionExpression = "#<pk> = :<pk>"`.
pub(crate) fn build_key_condition_expression(
    mut map: ExpressionMap<'_>,
) -> ExpressionResult<ExpressionMap<'_>> {
    map.where_entries()?;
    let key = &map.primary()?.key;
    map.expression.key_condition_expression = Some(format!("#{key} = :{key}"));
    Ok(map)
}

/// Emit `Key = { <pk>: <value> }` addressing exactly one item.
pub(crate) fn build_update_key_expression(
    mut map: ExpressionMap<'_>,
) -> ExpressionResult<ExpressionMap<'_>> {
    let primary = map.primary()?.clone();
    map.expression.key.insert(primary.key, primary.value);
    Ok(map)
}

/// Copy a caller-supplied continuation token into `ExclusiveStartKey`.
pub(crate) fn add_pagination_key(
    mut map: ExpressionMap<'_>,
) -> ExpressionResult<ExpressionMap<'_>> {
    if let Some(start) = &map.conditions.last_evaluated_key {
        map.expression.exclusive_start_key = start
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
    }
    Ok(map)
}
