//! DynamoDB model types for QueryStack.
//!
//! This crate holds the two halves of the expression compiler's contract:
//! the schema-agnostic [`QueryConditions`] a caller describes, and the
//! wire-level [`QueryExpression`] a document client submits. It also carries
//! the low-level `awsJson1_0` request and response shapes the store client
//! marshals into, since DynamoDB's JSON protocol makes serde derives trivial.
// "DynamoDB" appears in virtually every doc comment in this crate.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]
#![allow(missing_docs)]

pub mod attribute_value;
pub mod conditions;
pub mod expression;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;

pub use attribute_value::AttributeValue;
pub use conditions::{EditDescriptor, EditEntry, EditMap, FieldMap, QueryConditions, WhereValue};
pub use expression::QueryExpression;
pub use operations::Operation;
pub use types::ReturnValue;
