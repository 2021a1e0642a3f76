//! Small helpers for filtering field names and trimming JSON documents.

use serde_json::Value;

/// Build a predicate that rejects any name contained in `exclude`.
///
/// Pair it with `Iterator::filter` over names, or over `(name, value)`
/// entries by projecting the name first.
///
/// # Examples
///
/// ```
/// use querystack_dynamodb_core::filters::filter_from_list;
///
/// let exclude_eggs = filter_from_list(&["eggs"]);
/// let kept: Vec<&str> = ["bacon", "eggs", "toast"]
///     .into_iter()
///     .filter(|name| exclude_eggs(name))
///     .collect();
/// assert_eq!(kept, vec!["bacon", "toast"]);
/// ```
pub fn filter_from_list<'a>(exclude: &'a [&'a str]) -> impl Fn(&str) -> bool + 'a {
    move |name| !exclude.contains(&name)
}

/// Return a copy of `value` without the given top-level keys.
///
/// Anything that is not a JSON object is returned unchanged.
#[must_use]
pub fn omit(value: &Value, keys: &[&str]) -> Value {
    match value {
        Value::Object(members) => Value::Object(
            members
                .iter()
                .filter(|(k, _)| !keys.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Recursively drop object members whose value is `null`, `false`, `""` or `0`.
///
/// Arrays and scalars are returned unchanged; nested objects are trimmed too.
#[must_use]
pub fn remove_empty_keys(value: &Value) -> Value {
    match value {
        Value::Object(members) => Value::Object(
            members
                .iter()
                .filter(|(_, v)| !is_empty_value(v))
                .map(|(k, v)| (k.clone(), remove_empty_keys(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}
