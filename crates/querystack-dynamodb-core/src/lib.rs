//! DynamoDB expression compiler and document store client for QueryStack.
//!
//! [`expression::compile`] turns schema-agnostic [`QueryConditions`] into the
//! [`QueryExpression`] a DynamoDB document client submits verbatim.
//! [`store::DynamoTools`] wraps any [`store::DocumentStore`] so callers can go
//! straight from conditions to results.
//!
//! [`QueryConditions`]: querystack_dynamodb_model::QueryConditions
//! [`QueryExpression`]: querystack_dynamodb_model::QueryExpression
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod expression;
pub mod filters;
pub mod lifecycle;
pub mod store;

#[cfg(feature = "aws")]
pub mod aws;

pub use config::ExpressionConfig;
pub use error::{ExpressionError, ExpressionResult, LifecycleError, StoreError, StoreResult};
pub use expression::{compile, compile_json, compile_value};
pub use store::{DocumentStore, DynamoTools};
