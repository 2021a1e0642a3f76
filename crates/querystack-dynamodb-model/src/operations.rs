//! Operation kinds a set of query conditions can be compiled for.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The document-database operation a [`QueryConditions`](crate::QueryConditions)
/// value targets.
///
/// Each kind selects its own compiler pipeline and maps onto exactly one
/// DynamoDB API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Point lookup by primary key (`Query`).
    Query,
    /// Full table scan with equality filters (`Scan`).
    Scan,
    /// Item-addressed SET/REMOVE edits (`UpdateItem`).
    Update,
}

impl Operation {
    /// Returns the lowercase name used in query conditions.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Scan => "scan",
            Self::Update => "update",
        }
    }

    /// Returns the DynamoDB API operation this kind is submitted as.
    #[must_use]
    pub fn api_name(&self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Scan => "Scan",
            Self::Update => "UpdateItem",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
