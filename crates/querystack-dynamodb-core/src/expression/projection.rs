//! `ProjectionExpression` and the aliases only projection introduces.

use super::map::ExpressionMap;
use super::names::alias_entry;
use super::predicates::{strip_sigil, validate_field_name};
use crate::error::ExpressionResult;

/// Emit `ProjectionExpression = "#f1, #f2"` for the requested fields.
///
/// Fields may be given with or without the alias sigil. Aliases already
/// present are left untouched; duplicates are projected once.
pub(crate) fn build_projection_expression(
    mut map: ExpressionMap<'_>,
) -> ExpressionResult<ExpressionMap<'_>> {
    let conditions = map.conditions;
    let Some(fields) = conditions.fields.as_ref().filter(|f| !f.is_empty()) else {
        return Ok(map);
    };

    let mut projected: Vec<&str> = Vec::with_capacity(fields.len());
    for field in fields {
        let bare = strip_sigil(field);
        validate_field_name(bare)?;
        if !projected.contains(&bare) {
            projected.push(bare);
        }
    }

    let names = &mut map.expression.expression_attribute_names;
    for field in &projected {
        let (alias, name) = alias_entry(field);
        names.entry(alias).or_insert(name);
    }

    map.expression.projection_expression = Some(
        projected
            .iter()
            .map(|field| alias_entry(field).0)
            .collect::<Vec<_>>()
            .join(", "),
    );
    Ok(map)
}
