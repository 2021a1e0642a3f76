//! DynamoDB integration tests against a running DynamoDB-compatible server.

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::types::{
        AttributeDefinition, KeySchemaElement, KeyType, ScalarAttributeType,
    };
    use querystack_dynamodb_core::aws::AwsDocumentStore;
    use querystack_dynamodb_core::{DynamoTools, ExpressionConfig};
    use querystack_dynamodb_model::{
        EditDescriptor, Operation, QueryConditions, ReturnValue, WhereValue,
    };
    use serde_json::json;

    use crate::{dynamodb_client, test_table_name};

    /// Helper: create a table with a string hash key `id`.
    async fn create_users_table(client: &aws_sdk_dynamodb::Client, table_name: &str) {
        client
            .create_table()
            .table_name(table_name)
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name("id")
                    .key_type(KeyType::Hash)
                    .build()
                    .unwrap(),
            )
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name("id")
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .unwrap(),
            )
            .billing_mode(aws_sdk_dynamodb::types::BillingMode::PayPerRequest)
            .send()
            .await
            .unwrap_or_else(|e| panic!("failed to create table {table_name}: {e}"));
    }

    async fn delete_table(client: &aws_sdk_dynamodb::Client, table_name: &str) {
        client
            .delete_table()
            .table_name(table_name)
            .send()
            .await
            .unwrap_or_else(|e| panic!("failed to delete table {table_name}: {e}"));
    }

    fn tools(client: aws_sdk_dynamodb::Client) -> DynamoTools<AwsDocumentStore> {
        DynamoTools::new(AwsDocumentStore::new(client), ExpressionConfig::default())
    }

    // -----------------------------------------------------------------------
    // Query / Scan
    // -----------------------------------------------------------------------

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_query_item_by_primary_key() {
        let client = dynamodb_client();
        let table = test_table_name("query");
        create_users_table(&client, &table).await;
        let tools = tools(client.clone());

        tools
            .put(&table, &json!({ "id": "u1", "email": "a@x.com", "domain": "x.com" }))
            .await
            .unwrap();
        tools
            .put(&table, &json!({ "id": "u2", "email": "b@x.com", "domain": "x.com" }))
            .await
            .unwrap();

        let conditions = QueryConditions::new(table.as_str(), Operation::Query)
            .with_where("id", WhereValue::primary("u1"))
            .with_fields(["email"]);
        let output = tools.query(&conditions).await.unwrap();

        assert_eq!(output.documents(), vec![json!({ "email": "a@x.com" })]);

        delete_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_scan_with_filters() {
        let client = dynamodb_client();
        let table = test_table_name("scan");
        create_users_table(&client, &table).await;
        let tools = tools(client.clone());

        for (id, domain) in [("u1", "x.com"), ("u2", "y.com"), ("u3", "x.com")] {
            tools
                .put(&table, &json!({ "id": id, "domain": domain, "active": true }))
                .await
                .unwrap();
        }

        let conditions = QueryConditions::new(table.as_str(), Operation::Scan)
            .with_where("domain", WhereValue::Plain(json!("x.com")))
            .with_where("active", WhereValue::Plain(json!(true)));
        let output = tools.scan(&conditions).await.unwrap();

        let mut ids: Vec<_> = output
            .documents()
            .iter()
            .filter_map(|doc| doc["id"].as_str().map(str::to_owned))
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["u1", "u3"]);

        delete_table(&client, &table).await;
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_set_and_remove_fields() {
        let client = dynamodb_client();
        let table = test_table_name("update");
        create_users_table(&client, &table).await;
        let tools = tools(client.clone());

        tools
            .put(
                &table,
                &json!({ "id": "u1", "email": "old@x.com", "spaces": ["s0", "s1", "s2"] }),
            )
            .await
            .unwrap();

        let conditions = QueryConditions::new(table.as_str(), Operation::Update)
            .with_where("id", WhereValue::primary("u1"))
            .with_update("email", EditDescriptor::set("new@x.com"))
            .with_remove("spaces", Some(EditDescriptor::index(1)))
            .with_return_values(ReturnValue::AllNew);
        let output = tools.update(&conditions).await.unwrap();

        assert_eq!(
            output.document().unwrap(),
            json!({ "id": "u1", "email": "new@x.com", "spaces": ["s0", "s2"] })
        );

        delete_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_append_to_missing_list() {
        let client = dynamodb_client();
        let table = test_table_name("append");
        create_users_table(&client, &table).await;
        let tools = tools(client.clone());

        tools.put(&table, &json!({ "id": "u1" })).await.unwrap();

        for tag in ["a", "b"] {
            let conditions = QueryConditions::new(table.as_str(), Operation::Update)
                .with_where("id", WhereValue::primary("u1"))
                .with_update("tags", EditDescriptor::append(vec![json!(tag)]))
                .with_return_values(ReturnValue::UpdatedNew);
            tools.update(&conditions).await.unwrap();
        }

        let conditions = QueryConditions::new(table.as_str(), Operation::Query)
            .with_where("id", WhereValue::primary("u1"));
        let output = tools.query(&conditions).await.unwrap();
        assert_eq!(output.documents()[0]["tags"], json!(["a", "b"]));

        delete_table(&client, &table).await;
    }
}
