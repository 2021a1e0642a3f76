//! Alias and placeholder reference checking.
//!
//! DynamoDB rejects a request whose expressions reference an undefined
//! `#name` or `:value`, and equally one that defines a substitution no
//! expression uses. The compiler runs the same check as its last stage so a
//! malformed expression never leaves this crate.

use std::collections::BTreeSet;

use querystack_dynamodb_model::QueryExpression;

use super::map::ExpressionMap;
use crate::error::{ExpressionError, ExpressionResult};

/// The alias and placeholder tokens referenced by an expression's strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionReferences {
    /// `#name` tokens.
    pub names: BTreeSet<String>,
    /// `:value` tokens.
    pub values: BTreeSet<String>,
}

/// Collect every `#name` and `:value` token from `expression`'s strings.
#[must_use]
pub fn collect_references(expression: &QueryExpression) -> ExpressionReferences {
    let mut references = ExpressionReferences::default();
    for text in expression.expression_strings() {
        scan_tokens(text, &mut references);
    }
    references
}

/// Verify that every reference resolves and every substitution is used.
pub fn verify_references(expression: &QueryExpression) -> ExpressionResult<()> {
    let references = collect_references(expression);
    let names = &expression.expression_attribute_names;
    let values = &expression.expression_attribute_values;

    if let Some(name) = references.names.iter().find(|n| !names.contains_key(*n)) {
        return Err(ExpressionError::UnresolvedName(name.clone()));
    }
    if let Some(value) = references.values.iter().find(|v| !values.contains_key(*v)) {
        return Err(ExpressionError::UnresolvedValue(value.clone()));
    }
    if let Some(name) = names.keys().find(|n| !references.names.contains(*n)) {
        return Err(ExpressionError::UnusedName(name.clone()));
    }
    if let Some(value) = values.keys().find(|v| !references.values.contains(*v)) {
        return Err(ExpressionError::UnusedValue(value.clone()));
    }
    Ok(())
}

pub(crate) fn check_references(map: ExpressionMap<'_>) -> ExpressionResult<ExpressionMap<'_>> {
    verify_references(&map.expression)?;
    Ok(map)
}

fn scan_tokens(text: &str, references: &mut ExpressionReferences) {
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c != '#' && c != ':' {
            continue;
        }
        let mut end = start + c.len_utf8();
        while let Some(&(i, next)) = chars.peek() {
            if !is_token_char(next) {
                break;
            }
            end = i + next.len_utf8();
            chars.next();
        }
        if end == start + 1 {
            continue;
        }
        let token = text[start..end].to_owned();
        if c == '#' {
            references.names.insert(token);
        } else {
            references.values.insert(token);
        }
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
