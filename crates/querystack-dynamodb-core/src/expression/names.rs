//! `ExpressionAttributeNames`: one `#name -> name` alias per referenced field.

use querystack_dynamodb_model::Operation;

use super::map::ExpressionMap;
use super::predicates::{NAME_SIGIL, strip_sigil};
use crate::error::ExpressionResult;

/// The alias entry for `name`; a leading sigil is stripped, never doubled.
pub(crate) fn alias_entry(name: &str) -> (String, String) {
    let bare = strip_sigil(name);
    (format!("{NAME_SIGIL}{bare}"), bare.to_owned())
}

/// Alias every field the operation's expressions reference.
///
/// Queries reference the primary key and filters, scans only filters, and
/// updates only the edited fields (the item key is an exact-match map).
pub(crate) fn build_attribute_names(
    mut map: ExpressionMap<'_>,
) -> ExpressionResult<ExpressionMap<'_>> {
    let keys: Vec<&str> = match map.operation()? {
        Operation::Query => map.where_clause.all_keys().collect(),
        Operation::Scan => map.where_clause.and_keys().collect(),
        Operation::Update => map
            .update
            .iter()
            .chain(map.remove.iter())
            .flat_map(|edits| edits.keys())
            .collect(),
    };

    let names = keys.into_iter().map(alias_entry).collect();
    map.expression.expression_attribute_names = names;
    Ok(map)
}
