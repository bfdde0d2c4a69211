//! GraphQL-over-HTTP wire types.

use apollo_parser::{cst, Parser};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

/// An operation as sent by a client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Kind of the operation `operationName` selects, or of the only
    /// operation when no name is given.
    ///
    /// `None` when the document has no such operation. Syntax errors are left
    /// to the sub-graph to report.
    pub fn operation_kind(&self) -> Option<OperationKind> {
        let tree = Parser::new(self.query.as_deref()?).parse();
        let document = tree.document();
        let mut operations = document.definitions().filter_map(|definition| match definition {
            cst::Definition::OperationDefinition(operation) => Some(operation),
            _ => None,
        });

        let operation = match self.operation_name.as_deref() {
            Some(name) => operations
                .find(|operation| operation.name().is_some_and(|n| n.text().to_string() == name))?,
            None => {
                let first = operations.next()?;
                if operations.next().is_some() {
                    return None;
                }
                first
            }
        };

        // Shorthand `{ ... }` has no operation type and is a query.
        let kind = operation
            .operation_type()
            .and_then(|op| {
                op.mutation_token()
                    .map(|_| OperationKind::Mutation)
                    .or_else(|| op.subscription_token().map(|_| OperationKind::Subscription))
            })
            .unwrap_or(OperationKind::Query);
        Some(kind)
    }
}

/// A single entry of the `errors` array.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GraphQLError {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: None,
            path: None,
            extensions: None,
        }
    }

    /// Attach an `extensions.code` value.
    pub fn with_code(mut self, code: &str) -> Self {
        self.extensions
            .get_or_insert_with(Map::new)
            .insert("code".to_string(), Value::String(code.to_string()));
        self
    }
}

/// An execution result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphQLResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl GraphQLResponse {
    pub fn from_error(error: GraphQLError) -> Self {
        Self {
            errors: vec![error],
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uses_camel_case() {
        let request: GraphQLRequest = serde_json::from_value(json!({
            "query": "query Me { me { id } }",
            "operationName": "Me",
            "variables": { "first": 3 }
        }))
        .unwrap();

        assert_eq!(request.operation_name.as_deref(), Some("Me"));
        assert_eq!(request.variables.unwrap()["first"], 3);
        assert!(request.extensions.is_none());
    }

    #[test]
    fn test_operation_kind() {
        assert_eq!(
            GraphQLRequest::new("{ me { id } }").operation_kind(),
            Some(OperationKind::Query)
        );
        assert_eq!(
            GraphQLRequest::new("# create\nmutation { createUser(name: \"a\") { id } }")
                .operation_kind(),
            Some(OperationKind::Mutation)
        );
        assert_eq!(
            GraphQLRequest::new("subscription { userAdded { id } }").operation_kind(),
            Some(OperationKind::Subscription)
        );
        assert_eq!(GraphQLRequest::default().operation_kind(), None);
    }

    #[test]
    fn test_operation_kind_selects_by_name() {
        let document = "query Me { me { id } } mutation Rename { rename(name: \"b\") { id } }";

        let mut request = GraphQLRequest::new(document);
        assert_eq!(request.operation_kind(), None);

        request.operation_name = Some("Rename".into());
        assert_eq!(request.operation_kind(), Some(OperationKind::Mutation));

        request.operation_name = Some("Me".into());
        assert_eq!(request.operation_kind(), Some(OperationKind::Query));

        request.operation_name = Some("Missing".into());
        assert_eq!(request.operation_kind(), None);
    }

    #[test]
    fn test_error_response_shape() {
        let response = GraphQLResponse::from_error(
            GraphQLError::new("boom").with_code("SUBGRAPH_UNREACHABLE"),
        );

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "errors": [{ "message": "boom", "extensions": { "code": "SUBGRAPH_UNREACHABLE" } }]
            })
        );
    }

    #[test]
    fn test_response_keeps_error_path() {
        let response: GraphQLResponse = serde_json::from_value(json!({
            "data": null,
            "errors": [{ "message": "nope", "path": ["me"], "locations": [{ "line": 1, "column": 3 }] }]
        }))
        .unwrap();

        assert_eq!(response.errors[0].path, Some(json!(["me"])));
        assert!(response.data.is_none());
    }
}
