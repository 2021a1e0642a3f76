//! `DynamoTools` against a recording store.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use querystack_dynamodb_core::{DynamoTools, ExpressionConfig, StoreError};
    use querystack_dynamodb_model::output::ScanOutput;
    use querystack_dynamodb_model::{
        AttributeValue, EditDescriptor, Operation, QueryConditions, WhereValue,
    };
    use serde_json::{Value, json};

    use crate::{RecordingStore, init_tracing};

    fn page(ids: &[&str], next: Option<&str>) -> ScanOutput {
        let items: Vec<_> = ids
            .iter()
            .map(|id| HashMap::from([("id".to_owned(), AttributeValue::S((*id).to_owned()))]))
            .collect();
        ScanOutput {
            count: i32::try_from(items.len()).unwrap(),
            scanned_count: i32::try_from(items.len()).unwrap(),
            items,
            last_evaluated_key: next
                .map(|id| HashMap::from([("id".to_owned(), AttributeValue::S(id.to_owned()))]))
                .unwrap_or_default(),
        }
    }

    #[tokio::test]
    async fn test_should_scan_every_page_using_continuation_key() {
        init_tracing();
        let store = RecordingStore::default();
        *store.scan_pages.lock().unwrap() = vec![
            page(&["s1", "s2"], Some("s2")),
            page(&["s3"], None),
        ];
        let tools = DynamoTools::new(store, ExpressionConfig::default());

        let mut conditions = QueryConditions::new("Spaces", Operation::Scan)
            .with_where("owner", WhereValue::Plain(json!("u1")));
        let mut documents: Vec<Value> = Vec::new();
        loop {
            let output = tools.scan(&conditions).await.unwrap();
            documents.extend(output.documents());
            match output.last_evaluated_document_key() {
                Some(next) => conditions = conditions.with_last_evaluated_key(next),
                None => break,
            }
        }

        assert_eq!(
            documents,
            vec![json!({ "id": "s1" }), json!({ "id": "s2" }), json!({ "id": "s3" })]
        );

        let scans = tools.store().scans.lock().unwrap();
        assert_eq!(scans.len(), 2);
        assert!(scans[0].exclusive_start_key.is_empty());
        assert_eq!(
            scans[1].exclusive_start_key.get("id"),
            Some(&AttributeValue::S("s2".to_owned()))
        );
        assert_eq!(scans[1].filter_expression.as_deref(), Some("#owner = :owner"));
    }

    #[tokio::test]
    async fn test_should_submit_append_with_empty_list_default() {
        init_tracing();
        let tools = DynamoTools::new(RecordingStore::default(), ExpressionConfig::default());
        let conditions = QueryConditions::new("Users", Operation::Update)
            .with_where("id", WhereValue::primary("u1"))
            .with_update("spaces", EditDescriptor::append(vec![json!("s9")]));

        tools.update(&conditions).await.unwrap();

        let updates = tools.store().updates.lock().unwrap();
        assert_eq!(
            updates[0].expression_attribute_values.get(":emptyList"),
            Some(&AttributeValue::L(Vec::new()))
        );
        assert_eq!(
            updates[0].expression_attribute_values.get(":spaces"),
            Some(&AttributeValue::L(vec![AttributeValue::S("s9".to_owned())]))
        );
    }

    #[tokio::test]
    async fn test_should_submit_indexed_removal() {
        let tools = DynamoTools::new(RecordingStore::default(), ExpressionConfig::default());
        let conditions = QueryConditions::new("Users", Operation::Update)
            .with_where("id", WhereValue::primary("u1"))
            .with_remove("spaces", Some(EditDescriptor::index(0)));

        tools.update(&conditions).await.unwrap();

        let updates = tools.store().updates.lock().unwrap();
        assert_eq!(updates[0].update_expression.as_deref(), Some("REMOVE #spaces[0]"));
        assert!(updates[0].expression_attribute_values.is_empty());
    }

    #[tokio::test]
    async fn test_should_not_submit_invalid_conditions() {
        let tools = DynamoTools::new(RecordingStore::default(), ExpressionConfig::default());
        let conditions = QueryConditions::new("Users", Operation::Query)
            .with_where("email", WhereValue::equals("a@b.c"));

        let err = tools.query(&conditions).await.unwrap_err();
        assert!(matches!(err, StoreError::Expression(_)));
        assert!(tools.store().queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_should_put_nested_document() {
        let tools = DynamoTools::new(RecordingStore::default(), ExpressionConfig::default());
        let item = json!({ "id": "u1", "profile": { "seats": 2, "tags": ["a"] } });

        tools.put("Users", &item).await.unwrap();

        let puts = tools.store().puts.lock().unwrap();
        let profile = puts[0].item.get("profile").unwrap();
        assert_eq!(profile.to_json(), json!({ "seats": 2, "tags": ["a"] }));
    }
}
