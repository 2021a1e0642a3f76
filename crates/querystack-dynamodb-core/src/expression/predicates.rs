//! Predicates deciding which fields survive into an expression.

use serde_json::Value;

use crate::config::ExpressionConfig;
use crate::error::{ExpressionError, ExpressionResult};
use crate::filters::filter_from_list;

/// Logical operator keys reserved in `where`.
const WHERE_OPERATORS: &[&str] = &["and", "or"];

/// Operators the compiler knows how to compose.
const SUPPORTED_OPERATORS: &[&str] = &["and"];

/// Edit keys that are never written through an update.
const RESERVED_EDIT_KEYS: &[&str] = &["type"];

/// The sigil marking an attribute name alias.
pub(crate) const NAME_SIGIL: char = '#';

/// Decide whether a `where` key is a field filter.
///
/// Reserved operator keys are skipped when supported and rejected otherwise.
pub(crate) fn is_where_field(key: &str) -> ExpressionResult<bool> {
    if filter_from_list(WHERE_OPERATORS)(key) {
        return Ok(true);
    }
    if filter_from_list(SUPPORTED_OPERATORS)(key) {
        return Err(ExpressionError::UnsupportedOperator(key.to_owned()));
    }
    Ok(false)
}

/// Returns `true` if an `update`/`remove` key may be edited.
pub(crate) fn is_editable_field(key: &str) -> bool {
    filter_from_list(RESERVED_EDIT_KEYS)(key)
}

/// Returns `false` for a SET edit that would write an empty index key.
///
/// DynamoDB rejects null and empty-string values for attributes that back a
/// secondary index.
pub(crate) fn keeps_index_key(config: &ExpressionConfig, key: &str, value: Option<&Value>) -> bool {
    if !config.is_index_key(key) {
        return true;
    }
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Strip a leading alias sigil, if present.
pub(crate) fn strip_sigil(name: &str) -> &str {
    name.strip_prefix(NAME_SIGIL).unwrap_or(name)
}

/// Ensure `name` can be spliced into an alias or placeholder token.
pub(crate) fn validate_field_name(name: &str) -> ExpressionResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ExpressionError::InvalidFieldName(name.to_owned()))
    }
}
