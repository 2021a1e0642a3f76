//! Query conditions: the schema-agnostic description a caller compiles.
//!
//! Conditions arrive as camelCase JSON:
//!
//! ```json
//! {
//!   "tableName": "Users",
//!   "where": { "id": { "primary": true, "value": "u1" } },
//!   "update": { "email": { "value": "e@x.com" } },
//!   "remove": { "spaces": { "index": 3 } },
//!   "operation": "update",
//!   "returnValues": "ALL_NEW"
//! }
//! ```
//!
//! `tableName`, `where` and `operation` are optional at the type level so
//! that the compiler's validation stage, not the decoder, reports which one
//! is missing.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::operations::Operation;
use crate::types::ReturnValue;

/// An insertion-ordered map from field name to `T`.
///
/// Filter clauses and SET clauses are emitted in the order their fields were
/// written, so the JSON object order of `where`, `update` and `remove` must
/// survive decoding. Inserting an existing name replaces its value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> FieldMap<T> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a field, replacing the value of an existing field with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: T) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map contains the field.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for FieldMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for FieldMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<T: Serialize> Serialize for FieldMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FieldMapVisitor(PhantomData))
    }
}

struct FieldMapVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for FieldMapVisitor<T> {
    type Value = FieldMap<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object keyed by field name")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
        let mut fields = FieldMap::new();
        while let Some((name, value)) = map.next_entry::<String, T>()? {
            fields.insert(name, value);
        }
        Ok(fields)
    }
}

/// One entry of the `where` clause.
///
/// A JSON object made only of `value` and an optional boolean `primary` is a
/// keyed record; anything else (scalars, other objects, arrays, `null`) is a
/// plain equality value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WhereValue {
    /// A bare value, as used by scans.
    Plain(Value),
    /// A `{ primary?, value }` record, as used by queries and updates.
    Keyed {
        /// Whether this field is the item's primary key.
        #[serde(skip_serializing_if = "is_false")]
        primary: bool,
        /// The value the field must equal.
        value: Value,
    },
}

impl WhereValue {
    /// Build a primary key record.
    #[must_use]
    pub fn primary(value: impl Into<Value>) -> Self {
        Self::Keyed {
            primary: true,
            value: value.into(),
        }
    }

    /// Build a non-primary equality record.
    #[must_use]
    pub fn equals(value: impl Into<Value>) -> Self {
        Self::Keyed {
            primary: false,
            value: value.into(),
        }
    }

    /// Classify a raw JSON value.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(mut members) if is_keyed_record(&members) => {
                let primary = members
                    .get("primary")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let value = members.remove("value").unwrap_or(Value::Null);
                Self::Keyed { primary, value }
            }
            other => Self::Plain(other),
        }
    }

    /// Returns `true` if this entry is marked as the primary key.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        matches!(self, Self::Keyed { primary: true, .. })
    }

    /// The value the field is compared against.
    #[must_use]
    pub fn value(&self) -> &Value {
        match self {
            Self::Plain(value) | Self::Keyed { value, .. } => value,
        }
    }
}

impl<'de> Deserialize<'de> for WhereValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_json)
    }
}

fn is_keyed_record(members: &serde_json::Map<String, Value>) -> bool {
    members.contains_key("value")
        && members.keys().all(|k| k == "value" || k == "primary")
        && members.get("primary").is_none_or(Value::is_boolean)
}

/// An edit descriptor from the `update` or `remove` map.
///
/// A `null` entry in either map decodes as `None` and means "the whole field".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EditDescriptor {
    /// The value to write. Required for SET edits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// A list position to write or remove in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,

    /// Append the (list) value instead of overwriting the field.
    #[serde(default, skip_serializing_if = "is_false")]
    pub append: bool,
}

impl EditDescriptor {
    /// Overwrite the field with `value`.
    #[must_use]
    pub fn set(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Append `items` to the list field, creating it if missing.
    #[must_use]
    pub fn append(items: Vec<Value>) -> Self {
        Self {
            value: Some(Value::Array(items)),
            append: true,
            ..Self::default()
        }
    }

    /// Overwrite the list element at `index` with `value`.
    #[must_use]
    pub fn at_index(index: i64, value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            index: Some(index),
            ..Self::default()
        }
    }

    /// Address the list element at `index` (used by removals).
    #[must_use]
    pub fn index(index: i64) -> Self {
        Self {
            index: Some(index),
            ..Self::default()
        }
    }
}

/// One `update` or `remove` entry as written by the caller.
///
/// Objects must be edit descriptors. Any other non-null value is kept raw so
/// that index-key suppression can drop it before a SET edit rejects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EditEntry {
    /// A `{ value?, index?, append? }` descriptor.
    Descriptor(EditDescriptor),
    /// A bare scalar or array.
    Raw(Value),
}

impl EditEntry {
    /// The value the entry would write, if any.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Descriptor(edit) => edit.value.as_ref(),
            Self::Raw(value) => Some(value),
        }
    }

    /// The descriptor, unless the entry is a bare value.
    #[must_use]
    pub fn descriptor(&self) -> Option<&EditDescriptor> {
        match self {
            Self::Descriptor(edit) => Some(edit),
            Self::Raw(_) => None,
        }
    }
}

impl From<EditDescriptor> for EditEntry {
    fn from(edit: EditDescriptor) -> Self {
        Self::Descriptor(edit)
    }
}

impl<'de> Deserialize<'de> for EditEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            value @ Value::Object(_) => EditDescriptor::deserialize(value)
                .map(Self::Descriptor)
                .map_err(serde::de::Error::custom),
            other => Ok(Self::Raw(other)),
        }
    }
}

/// Edits keyed by field name; `None` removes or rejects the whole field.
pub type EditMap = FieldMap<Option<EditEntry>>;

/// Compiler input: what to read or change, independent of expression syntax.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryConditions {
    /// The table the operation targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    /// Equality conditions, one of which may be marked primary.
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<FieldMap<WhereValue>>,

    /// SET edits (update operations only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<EditMap>,

    /// REMOVE edits (update operations only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<EditMap>,

    /// Fields to project (scan and query only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    /// The operation to compile for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,

    /// Attributes to return from an update. Only DynamoDB's upper-case
    /// `ReturnValue` names decode; anything else is rejected up front.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_values: Option<ReturnValue>,

    /// Continuation token returned by a previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_evaluated_key: Option<serde_json::Map<String, Value>>,
}

impl QueryConditions {
    /// Start conditions for `operation` against `table_name` with an empty `where`.
    #[must_use]
    pub fn new(table_name: impl Into<String>, operation: Operation) -> Self {
        Self {
            table_name: Some(table_name.into()),
            where_clause: Some(FieldMap::new()),
            operation: Some(operation),
            ..Self::default()
        }
    }

    /// Add a `where` entry.
    #[must_use]
    pub fn with_where(mut self, field: impl Into<String>, value: WhereValue) -> Self {
        self.where_clause
            .get_or_insert_with(FieldMap::new)
            .insert(field, value);
        self
    }

    /// Add a SET edit.
    #[must_use]
    pub fn with_update(mut self, field: impl Into<String>, edit: EditDescriptor) -> Self {
        self.update
            .get_or_insert_with(FieldMap::new)
            .insert(field, Some(edit.into()));
        self
    }

    /// Add a REMOVE edit; `None` removes the whole field.
    #[must_use]
    pub fn with_remove(mut self, field: impl Into<String>, edit: Option<EditDescriptor>) -> Self {
        self.remove
            .get_or_insert_with(FieldMap::new)
            .insert(field, edit.map(EditEntry::from));
        self
    }

    /// Set the projected fields.
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Set the update return values.
    #[must_use]
    pub fn with_return_values(mut self, return_values: ReturnValue) -> Self {
        self.return_values = Some(return_values);
        self
    }

    /// Continue from a previous page's last evaluated key.
    #[must_use]
    pub fn with_last_evaluated_key(mut self, key: serde_json::Map<String, Value>) -> Self {
        self.last_evaluated_key = Some(key);
        self
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}
