//! Document store client.
//!
//! [`DocumentStore`] is the boundary between the compiler and whatever talks
//! to DynamoDB. [`DynamoTools`] sits on top of any store: it compiles query
//! conditions, checks they were written for the operation being invoked, and
//! forwards the marshalled request unchanged.

use querystack_dynamodb_model::input::{PutItemInput, QueryInput, ScanInput, UpdateItemInput};
use querystack_dynamodb_model::output::{PutItemOutput, QueryOutput, ScanOutput, UpdateItemOutput};
use querystack_dynamodb_model::{Operation, QueryConditions, QueryExpression};
use serde_json::Value;
use tracing::debug;

use crate::config::ExpressionConfig;
use crate::error::{ExpressionResult, StoreError, StoreResult};
use crate::expression::compile;

/// The low-level DynamoDB operations a compiled expression is submitted as.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Submit a `Query` request.
    async fn query(&self, input: QueryInput) -> StoreResult<QueryOutput>;

    /// Submit a `Scan` request.
    async fn scan(&self, input: ScanInput) -> StoreResult<ScanOutput>;

    /// Submit an `UpdateItem` request.
    async fn update_item(&self, input: UpdateItemInput) -> StoreResult<UpdateItemOutput>;

    /// Submit a `PutItem` request.
    async fn put_item(&self, input: PutItemInput) -> StoreResult<PutItemOutput>;
}

/// Compile-and-submit helpers over a [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct DynamoTools<S> {
    store: S,
    config: ExpressionConfig,
}

impl<S: DocumentStore> DynamoTools<S> {
    /// Create tools over `store`, compiling with `config`.
    #[must_use]
    pub fn new(store: S, config: ExpressionConfig) -> Self {
        Self { store, config }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The compiler configuration.
    #[must_use]
    pub fn config(&self) -> &ExpressionConfig {
        &self.config
    }

    /// Compile `conditions` without submitting anything.
    pub fn create_expression(&self, conditions: &QueryConditions) -> ExpressionResult<QueryExpression> {
        compile(conditions, &self.config)
    }

    /// Compile and submit a `Query`.
    pub async fn query(&self, conditions: &QueryConditions) -> StoreResult<QueryOutput> {
        let expression = self.compile_for(conditions, Operation::Query)?;
        debug!(?expression, "Dynamo Query Expression");
        self.store.query(expression.into()).await
    }

    /// Compile and submit a `Scan`.
    pub async fn scan(&self, conditions: &QueryConditions) -> StoreResult<ScanOutput> {
        let expression = self.compile_for(conditions, Operation::Scan)?;
        debug!(?expression, "Dynamo Scan Expression");
        self.store.scan(expression.into()).await
    }

    /// Compile and submit an `UpdateItem`.
    pub async fn update(&self, conditions: &QueryConditions) -> StoreResult<UpdateItemOutput> {
        let expression = self.compile_for(conditions, Operation::Update)?;
        debug!(?expression, "Dynamo Update Expression");
        self.store.update_item(expression.into()).await
    }

    /// Put a whole JSON document item, returning no attributes.
    pub async fn put(&self, table_name: &str, item: &Value) -> StoreResult<PutItemOutput> {
        let input = PutItemInput::from_document(table_name, item).ok_or(StoreError::InvalidItem)?;
        debug!(table = table_name, "Dynamo Put Item");
        self.store.put_item(input).await
    }

    fn compile_for(
        &self,
        conditions: &QueryConditions,
        expected: Operation,
    ) -> StoreResult<QueryExpression> {
        if let Some(found) = conditions.operation {
            if found != expected {
                return Err(StoreError::OperationMismatch { expected, found });
            }
        }
        Ok(compile(conditions, &self.config)?)
    }
}
