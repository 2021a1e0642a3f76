//! End-to-end expression compilation from conditions JSON.

#[cfg(test)]
mod tests {
    use querystack_dynamodb_core::{ExpressionConfig, ExpressionError, compile, compile_json};
    use querystack_dynamodb_model::{QueryExpression, ReturnValue};
    use serde_json::{Value, json};

    fn compile_conditions(conditions: &Value) -> Result<QueryExpression, ExpressionError> {
        compile_json(&conditions.to_string(), &ExpressionConfig::default())
    }

    fn compile_to_json(conditions: &Value) -> Value {
        serde_json::to_value(compile_conditions(conditions).unwrap()).unwrap()
    }

    // -----------------------------------------------------------------------
    // Query
    // -----------------------------------------------------------------------

    #[test]
    fn test_should_compile_single_primary_key_query() {
        let output = compile_to_json(&json!({
            "tableName": "Users",
            "where": { "userId": { "primary": true, "value": "u1" } },
            "operation": "query"
        }));

        assert_eq!(
            output,
            json!({
                "TableName": "Users",
                "KeyConditionExpression": "#userId = :userId",
                "ExpressionAttributeNames": { "#userId": "userId" },
                "ExpressionAttributeValues": { ":userId": "u1" }
            })
        );
    }

    #[test]
    fn test_should_compile_query_with_two_filters() {
        let output = compile_conditions(&json!({
            "tableName": "Users",
            "where": {
                "id": { "primary": true, "value": "V1" },
                "b": { "value": "V3" },
                "a": { "value": "V2" }
            },
            "operation": "query"
        }))
        .unwrap();

        assert_eq!(output.key_condition_expression.as_deref(), Some("#id = :id"));
        assert_eq!(output.filter_expression.as_deref(), Some("#b = :b and #a = :a"));
        assert_eq!(output.expression_attribute_names.len(), 3);
        assert_eq!(output.expression_attribute_values.len(), 3);
        assert_eq!(output.expression_attribute_values[":a"], json!("V2"));
    }

    #[test]
    fn test_should_project_fields_not_otherwise_referenced() {
        let output = compile_to_json(&json!({
            "tableName": "Users",
            "where": { "id": { "primary": true, "value": "u1" } },
            "fields": ["id", "email", "#name"],
            "operation": "query"
        }));

        assert_eq!(output["ProjectionExpression"], json!("#id, #email, #name"));
        assert_eq!(
            output["ExpressionAttributeNames"],
            json!({ "#id": "id", "#email": "email", "#name": "name" })
        );
        assert_eq!(output["ExpressionAttributeValues"], json!({ ":id": "u1" }));
    }

    #[test]
    fn test_should_thread_pagination_key_into_query() {
        let output = compile_to_json(&json!({
            "tableName": "Users",
            "where": { "id": { "primary": true, "value": "u1" } },
            "lastEvaluatedKey": { "id": "u1", "createdAt": 1700000000 },
            "operation": "query"
        }));

        assert_eq!(
            output["ExclusiveStartKey"],
            json!({ "id": "u1", "createdAt": 1_700_000_000 })
        );
    }

    // -----------------------------------------------------------------------
    // Scan
    // -----------------------------------------------------------------------

    #[test]
    fn test_should_compile_scan_with_n_filters() {
        let output = compile_conditions(&json!({
            "tableName": "Spaces",
            "where": { "owner": "u1", "public": true, "seats": 4, "kind": "desk" },
            "operation": "scan"
        }))
        .unwrap();

        assert!(output.key_condition_expression.is_none());
        let filter = output.filter_expression.unwrap();
        assert_eq!(filter.split(" and ").count(), 4);
        assert_eq!(
            filter,
            "#owner = :owner and #public = :public and #seats = :seats and #kind = :kind"
        );
    }

    #[test]
    fn test_should_accept_keyed_records_in_scan() {
        let output = compile_to_json(&json!({
            "tableName": "Spaces",
            "where": { "owner": { "value": "u1" } },
            "operation": "scan"
        }));
        assert_eq!(output["ExpressionAttributeValues"], json!({ ":owner": "u1" }));
    }

    #[test]
    fn test_should_reject_or_composition() {
        let err = compile_conditions(&json!({
            "tableName": "Spaces",
            "where": { "or": { "owner": "u1" } },
            "operation": "scan"
        }))
        .unwrap_err();
        assert!(matches!(err, ExpressionError::UnsupportedOperator(op) if op == "or"));
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    #[test]
    fn test_should_compile_combined_edit_example() {
        let output = compile_to_json(&json!({
            "tableName": "Users",
            "where": { "id": { "primary": true, "value": "u1" } },
            "update": {
                "email": { "value": "e@x.com" },
                "domain": { "value": "d.com" }
            },
            "remove": { "spaces": { "index": 3 } },
            "operation": "update"
        }));

        assert_eq!(
            output,
            json!({
                "TableName": "Users",
                "Key": { "id": "u1" },
                "UpdateExpression": "SET #email = :email, #domain = :domain REMOVE #spaces[3]",
                "ExpressionAttributeNames": {
                    "#email": "email",
                    "#domain": "domain",
                    "#spaces": "spaces"
                },
                "ExpressionAttributeValues": {
                    ":email": "e@x.com",
                    ":domain": "d.com"
                }
            })
        );
    }

    #[test]
    fn test_should_compile_list_append() {
        let output = compile_conditions(&json!({
            "tableName": "Users",
            "where": { "id": { "primary": true, "value": "u1" } },
            "update": { "tags": { "value": ["new"], "append": true } },
            "operation": "update"
        }))
        .unwrap();

        assert_eq!(
            output.update_expression.as_deref(),
            Some("SET #tags = list_append(if_not_exists(#tags, :emptyList), :tags)")
        );
        assert_eq!(output.expression_attribute_values[":tags"], json!(["new"]));
        assert_eq!(output.expression_attribute_values[":emptyList"], json!([]));
    }

    #[test]
    fn test_should_compile_set_with_indexed_remove() {
        let output = compile_conditions(&json!({
            "tableName": "Users",
            "where": { "id": { "primary": true, "value": "u1" } },
            "update": { "a": { "value": 1 } },
            "remove": { "b": { "index": 2 } },
            "operation": "update"
        }))
        .unwrap();

        assert_eq!(output.update_expression.as_deref(), Some("SET #a = :a REMOVE #b[2]"));
        assert_eq!(output.expression_attribute_names.len(), 2);
        assert_eq!(
            output.expression_attribute_values.keys().collect::<Vec<_>>(),
            vec![":a"]
        );
    }

    #[test]
    fn test_should_compile_in_place_list_write() {
        let output = compile_to_json(&json!({
            "tableName": "Users",
            "where": { "id": { "primary": true, "value": "u1" } },
            "update": { "spaces": { "value": { "id": "s1", "role": "owner" }, "index": 1 } },
            "returnValues": "UPDATED_NEW",
            "operation": "update"
        }));

        assert_eq!(output["UpdateExpression"], json!("SET #spaces[1] = :spaces"));
        assert_eq!(
            output["ExpressionAttributeValues"][":spaces"],
            json!({ "id": "s1", "role": "owner" })
        );
        assert_eq!(output["ReturnValues"], json!(ReturnValue::UpdatedNew.as_str()));
    }

    #[test]
    fn test_should_compile_remove_only_update_without_values() {
        let output = compile_to_json(&json!({
            "tableName": "Users",
            "where": { "id": { "primary": true, "value": "u1" } },
            "remove": { "nickname": null },
            "operation": "update"
        }));

        assert_eq!(output["UpdateExpression"], json!("REMOVE #nickname"));
        assert!(output.get("ExpressionAttributeValues").is_none());
    }

    #[test]
    fn test_should_ignore_projection_for_update() {
        let output = compile_to_json(&json!({
            "tableName": "Users",
            "where": { "id": { "primary": true, "value": "u1" } },
            "update": { "a": { "value": 1 } },
            "fields": ["id"],
            "operation": "update"
        }));
        assert!(output.get("ProjectionExpression").is_none());
    }

    #[test]
    fn test_should_drop_empty_index_key_edits() {
        let config = ExpressionConfig::builder()
            .index_keys(vec!["emailIndex".to_owned()])
            .build();
        let conditions = json!({
            "tableName": "Users",
            "where": { "id": { "primary": true, "value": "u1" } },
            "update": {
                "emailIndex": { "value": "" },
                "name": { "value": "Ada" }
            },
            "operation": "update"
        });

        let output = compile_json(&conditions.to_string(), &config).unwrap();
        assert_eq!(output.update_expression.as_deref(), Some("SET #name = :name"));
        assert!(!output.expression_attribute_names.contains_key("#emailIndex"));
    }

    #[test]
    fn test_should_filter_out_index_keys_without_values() {
        let config = ExpressionConfig::builder()
            .index_keys(vec!["indexKeyOne".to_owned(), "indexKeyTwo".to_owned()])
            .build();
        let conditions = json!({
            "tableName": "Users",
            "where": { "id": { "primary": true, "value": "u1" } },
            "update": {
                "indexKeyOne": "",
                "indexKeyTwo": null,
                "email": { "value": "e@x.com" }
            },
            "returnValues": "ALL_NEW",
            "operation": "update"
        });

        let output = compile_json(&conditions.to_string(), &config).unwrap();
        assert_eq!(
            serde_json::to_value(output).unwrap(),
            json!({
                "TableName": "Users",
                "Key": { "id": "u1" },
                "ExpressionAttributeNames": { "#email": "email" },
                "ExpressionAttributeValues": { ":email": "e@x.com" },
                "UpdateExpression": "SET #email = :email",
                "ReturnValues": "ALL_NEW"
            })
        );
    }

    #[test]
    fn test_should_reject_append_sharing_empty_list_placeholder() {
        let err = compile_conditions(&json!({
            "tableName": "Users",
            "where": { "id": { "primary": true, "value": "u1" } },
            "update": { "emptyList": { "value": ["keep-me"], "append": true } },
            "operation": "update"
        }))
        .unwrap_err();
        assert!(matches!(err, ExpressionError::ReservedPlaceholder { key, .. } if key == "emptyList"));
    }

    #[test]
    fn test_should_key_update_by_any_primary_key_name() {
        let output = compile_to_json(&json!({
            "tableName": "Users",
            "where": { "user-id": { "primary": true, "value": "u1" } },
            "update": { "email": { "value": "e@x.com" } },
            "operation": "update"
        }));
        assert_eq!(output["Key"], json!({ "user-id": "u1" }));
        assert_eq!(output["UpdateExpression"], json!("SET #email = :email"));
    }

    // -----------------------------------------------------------------------
    // Errors and determinism
    // -----------------------------------------------------------------------

    #[test]
    fn test_should_report_missing_structure_in_order() {
        let cases = [
            (json!({ "where": {}, "operation": "scan" }), "MissingTableName"),
            (json!({ "tableName": "T", "operation": "scan" }), "MissingWhere"),
            (json!({ "tableName": "T", "where": {} }), "MissingOperation"),
        ];
        for (conditions, expected) in cases {
            let err = compile_conditions(&conditions).unwrap_err();
            assert_eq!(format!("{err:?}"), expected);
        }
    }

    #[test]
    fn test_should_report_missing_primary_key() {
        let err = compile_conditions(&json!({
            "tableName": "Users",
            "where": { "id": null, "email": "x" },
            "operation": "query"
        }))
        .unwrap_err();
        assert!(matches!(err, ExpressionError::MissingPrimaryKey));
    }

    #[test]
    fn test_should_report_missing_edit_payload() {
        let err = compile_conditions(&json!({
            "tableName": "Users",
            "where": { "id": { "primary": true, "value": "u1" } },
            "operation": "update"
        }))
        .unwrap_err();
        assert!(matches!(err, ExpressionError::MissingEditPayload));
    }

    #[test]
    fn test_should_report_index_without_value() {
        let err = compile_conditions(&json!({
            "tableName": "Users",
            "where": { "id": { "primary": true, "value": "u1" } },
            "update": { "spaces": { "index": 3 } },
            "operation": "update"
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing value property for key: spaces");
    }

    #[test]
    fn test_should_compile_identically_twice() {
        let conditions = json!({
            "tableName": "Users",
            "where": {
                "id": { "primary": true, "value": "u1" },
                "zeta": { "value": 1 },
                "alpha": { "value": 2 }
            },
            "fields": ["email"],
            "operation": "query"
        });
        let decoded = serde_json::from_value(conditions).unwrap();
        let config = ExpressionConfig::default();

        let first = serde_json::to_string(&compile(&decoded, &config).unwrap()).unwrap();
        let second = serde_json::to_string(&compile(&decoded, &config).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
