//! [`DocumentStore`] backed by the AWS SDK DynamoDB client.
//!
//! Only compiled when the `aws` feature is enabled.

use std::collections::HashMap;

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue as SdkAttributeValue;
use querystack_dynamodb_model::{AttributeValue, Operation};
use querystack_dynamodb_model::input::{PutItemInput, QueryInput, ScanInput, UpdateItemInput};
use querystack_dynamodb_model::output::{PutItemOutput, QueryOutput, ScanOutput, UpdateItemOutput};
use querystack_dynamodb_model::types::ReturnValue;

use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;

/// Forwards every request to an [`aws_sdk_dynamodb::Client`].
#[derive(Debug, Clone)]
pub struct AwsDocumentStore {
    client: Client,
}

impl AwsDocumentStore {
    /// Wrap an already configured client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The wrapped client.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait::async_trait]
impl DocumentStore for AwsDocumentStore {
    async fn query(&self, input: QueryInput) -> StoreResult<QueryOutput> {
        let resp = self
            .client
            .query()
            .table_name(input.table_name)
            .set_key_condition_expression(input.key_condition_expression)
            .set_filter_expression(input.filter_expression)
            .set_projection_expression(input.projection_expression)
            .set_expression_attribute_names(non_empty(input.expression_attribute_names))
            .set_expression_attribute_values(non_empty(to_sdk_item(&input.expression_attribute_values)))
            .set_exclusive_start_key(non_empty(to_sdk_item(&input.exclusive_start_key)))
            .send()
            .await
            .map_err(|e| backend(Operation::Query.api_name(), &DisplayErrorContext(e)))?;

        Ok(QueryOutput {
            items: resp.items().iter().map(from_sdk_item).collect::<StoreResult<_>>()?,
            count: resp.count(),
            scanned_count: resp.scanned_count(),
            last_evaluated_key: resp
                .last_evaluated_key()
                .map(from_sdk_item)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    async fn scan(&self, input: ScanInput) -> StoreResult<ScanOutput> {
        let resp = self
            .client
            .scan()
            .table_name(input.table_name)
            .set_filter_expression(input.filter_expression)
            .set_projection_expression(input.projection_expression)
            .set_expression_attribute_names(non_empty(input.expression_attribute_names))
            .set_expression_attribute_values(non_empty(to_sdk_item(&input.expression_attribute_values)))
            .set_exclusive_start_key(non_empty(to_sdk_item(&input.exclusive_start_key)))
            .send()
            .await
            .map_err(|e| backend(Operation::Scan.api_name(), &DisplayErrorContext(e)))?;

        Ok(ScanOutput {
            items: resp.items().iter().map(from_sdk_item).collect::<StoreResult<_>>()?,
            count: resp.count(),
            scanned_count: resp.scanned_count(),
            last_evaluated_key: resp
                .last_evaluated_key()
                .map(from_sdk_item)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    async fn update_item(&self, input: UpdateItemInput) -> StoreResult<UpdateItemOutput> {
        let resp = self
            .client
            .update_item()
            .table_name(input.table_name)
            .set_key(Some(to_sdk_item(&input.key)))
            .set_update_expression(input.update_expression)
            .set_expression_attribute_names(non_empty(input.expression_attribute_names))
            .set_expression_attribute_values(non_empty(to_sdk_item(&input.expression_attribute_values)))
            .set_return_values(input.return_values.map(to_sdk_return_value))
            .send()
            .await
            .map_err(|e| backend(Operation::Update.api_name(), &DisplayErrorContext(e)))?;

        Ok(UpdateItemOutput {
            attributes: resp
                .attributes()
                .map(from_sdk_item)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    async fn put_item(&self, input: PutItemInput) -> StoreResult<PutItemOutput> {
        let resp = self
            .client
            .put_item()
            .table_name(input.table_name)
            .set_item(Some(to_sdk_item(&input.item)))
            .set_return_values(input.return_values.map(to_sdk_return_value))
            .send()
            .await
            .map_err(|e| backend("PutItem", &DisplayErrorContext(e)))?;

        Ok(PutItemOutput {
            attributes: resp
                .attributes()
                .map(from_sdk_item)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

fn backend(operation: &str, err: &dyn std::fmt::Display) -> StoreError {
    StoreError::Backend(anyhow::anyhow!("{operation} failed: {err}"))
}

fn non_empty<V>(map: HashMap<String, V>) -> Option<HashMap<String, V>> {
    (!map.is_empty()).then_some(map)
}

fn to_sdk_return_value(value: ReturnValue) -> aws_sdk_dynamodb::types::ReturnValue {
    aws_sdk_dynamodb::types::ReturnValue::from(value.as_str())
}

fn to_sdk_item(item: &HashMap<String, AttributeValue>) -> HashMap<String, SdkAttributeValue> {
    item.iter().map(|(k, v)| (k.clone(), to_sdk(v))).collect()
}

fn to_sdk(value: &AttributeValue) -> SdkAttributeValue {
    match value {
        AttributeValue::S(s) => SdkAttributeValue::S(s.clone()),
        AttributeValue::N(n) => SdkAttributeValue::N(n.clone()),
        AttributeValue::Bool(b) => SdkAttributeValue::Bool(*b),
        AttributeValue::Null(b) => SdkAttributeValue::Null(*b),
        AttributeValue::L(items) => SdkAttributeValue::L(items.iter().map(to_sdk).collect()),
        AttributeValue::M(members) => SdkAttributeValue::M(to_sdk_item(members)),
    }
}

fn from_sdk_item(
    item: &HashMap<String, SdkAttributeValue>,
) -> StoreResult<HashMap<String, AttributeValue>> {
    item.iter()
        .map(|(k, v)| Ok((k.clone(), from_sdk(v)?)))
        .collect()
}

/// String and number sets come back as lists; binary values have no document form.
fn from_sdk(value: &SdkAttributeValue) -> StoreResult<AttributeValue> {
    Ok(match value {
        SdkAttributeValue::S(s) => AttributeValue::S(s.clone()),
        SdkAttributeValue::N(n) => AttributeValue::N(n.clone()),
        SdkAttributeValue::Bool(b) => AttributeValue::Bool(*b),
        SdkAttributeValue::Null(b) => AttributeValue::Null(*b),
        SdkAttributeValue::L(items) => {
            AttributeValue::L(items.iter().map(from_sdk).collect::<StoreResult<_>>()?)
        }
        SdkAttributeValue::M(members) => AttributeValue::M(from_sdk_item(members)?),
        SdkAttributeValue::Ss(items) => {
            AttributeValue::L(items.iter().cloned().map(AttributeValue::S).collect())
        }
        SdkAttributeValue::Ns(items) => {
            AttributeValue::L(items.iter().cloned().map(AttributeValue::N).collect())
        }
        SdkAttributeValue::B(_) => return Err(StoreError::UnsupportedAttribute("B".to_owned())),
        SdkAttributeValue::Bs(_) => return Err(StoreError::UnsupportedAttribute("BS".to_owned())),
        other => return Err(StoreError::UnsupportedAttribute(format!("{other:?}"))),
    })
}
