//! Axum handlers for the GraphQL endpoint and landing page.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::gateway::{
    Gateway, GatewayError, GraphQLError, GraphQLRequest, GraphQLResponse, OperationKind,
};
use crate::server::plugin::{ServerInfo, ServerPlugin};

/// State shared by the handlers.
#[derive(Clone)]
pub struct ServerState {
    pub gateway: Arc<dyn Gateway>,
    pub plugins: Arc<[Arc<dyn ServerPlugin>]>,
    pub info: ServerInfo,
}

/// Query-string form of an operation (`GET /graphql?query=...`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetParams {
    query: Option<String>,
    operation_name: Option<String>,
    variables: Option<String>,
    extensions: Option<String>,
}

impl GetParams {
    fn into_request(self) -> Result<GraphQLRequest, String> {
        Ok(GraphQLRequest {
            query: self.query,
            operation_name: self.operation_name,
            variables: parse_object("variables", self.variables)?,
            extensions: parse_object("extensions", self.extensions)?,
        })
    }
}

fn parse_object(field: &str, raw: Option<String>) -> Result<Option<Map<String, Value>>, String> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => serde_json::from_str::<Option<Map<String, Value>>>(raw)
            .map_err(|e| format!("`{}` must be a JSON object: {}", field, e)),
    }
}

pub async fn graphql_post(State(state): State<ServerState>, body: Bytes) -> Response {
    match serde_json::from_slice::<GraphQLRequest>(&body) {
        Ok(request) => execute(&state, request).await,
        Err(e) => bad_request(format!("Invalid GraphQL request body: {}", e)),
    }
}

pub async fn graphql_get(
    State(state): State<ServerState>,
    Query(params): Query<GetParams>,
) -> Response {
    let request = match params.into_request() {
        Ok(request) => request,
        Err(message) => return bad_request(message),
    };

    // Mutations over GET could be triggered by a plain link.
    if request.operation_kind() == Some(OperationKind::Mutation) {
        tracing::warn!(operation_name = ?request.operation_name, "Rejected mutation over GET");
        let mut response = graphql_error(
            StatusCode::METHOD_NOT_ALLOWED,
            GraphQLError::new("Mutations can only be sent over HTTP POST")
                .with_code("METHOD_NOT_ALLOWED"),
        );
        response
            .headers_mut()
            .insert(header::ALLOW, header::HeaderValue::from_static("POST"));
        return response;
    }

    execute(&state, request).await
}

pub async fn landing_page(State(state): State<ServerState>) -> Response {
    match state
        .plugins
        .iter()
        .find_map(|plugin| plugin.landing_page(&state.info))
    {
        Some(html) => Html(html).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn execute(state: &ServerState, request: GraphQLRequest) -> Response {
    if request.query.as_deref().map_or(true, |q| q.trim().is_empty()) {
        return bad_request("GraphQL operations must contain a non-empty `query`".to_string());
    }

    match state.gateway.execute(request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            let status = match e {
                GatewayError::NotLoaded | GatewayError::Stopped => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            };
            tracing::warn!(error = %e, status = %status, "Operation failed");
            graphql_error(status, GraphQLError::new(e.to_string()).with_code(e.code()))
        }
    }
}

fn bad_request(message: String) -> Response {
    graphql_error(
        StatusCode::BAD_REQUEST,
        GraphQLError::new(message).with_code("BAD_REQUEST"),
    )
}

fn graphql_error(status: StatusCode, error: GraphQLError) -> Response {
    (status, Json(GraphQLResponse::from_error(error))).into_response()
}
