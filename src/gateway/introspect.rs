//! Sub-graph schema fetch.
//!
//! Each federated service answers `_service { sdl }` with its own type
//! definitions. The gateway asks every service once while loading.

use std::time::Duration;

use serde::Serialize;

use crate::gateway::types::{GraphQLRequest, GraphQLResponse};
use crate::gateway::GatewayError;
use crate::registry::ServiceDescriptor;

/// Query sent to every sub-graph while loading.
pub const SERVICE_DEFINITION_QUERY: &str =
    "query __ApolloGetServiceDefinition__ { _service { sdl } }";

/// The schema one service reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubgraphSchema {
    pub name: String,
    pub url: String,
    pub sdl: String,
}

/// Ask `service` for its SDL.
pub async fn fetch_service_sdl(
    client: &reqwest::Client,
    service: &ServiceDescriptor,
    timeout: Duration,
) -> Result<SubgraphSchema, GatewayError> {
    let fetch_error = |source| GatewayError::SchemaFetch {
        service: service.name.clone(),
        url: service.url.clone(),
        source,
    };

    tracing::debug!(service = %service.name, url = %service.url, "Fetching sub-graph schema");

    let response: GraphQLResponse = client
        .post(&service.url)
        .timeout(timeout)
        .json(&GraphQLRequest::new(SERVICE_DEFINITION_QUERY))
        .send()
        .await
        .map_err(fetch_error)?
        .error_for_status()
        .map_err(fetch_error)?
        .json()
        .await
        .map_err(fetch_error)?;

    let sdl = extract_sdl(&service.name, response)?;

    tracing::debug!(service = %service.name, sdl_bytes = sdl.len(), "Sub-graph schema fetched");

    Ok(SubgraphSchema {
        name: service.name.clone(),
        url: service.url.clone(),
        sdl,
    })
}

/// Pull `data._service.sdl` out of a schema query response.
pub fn extract_sdl(service: &str, response: GraphQLResponse) -> Result<String, GatewayError> {
    if !response.errors.is_empty() {
        let message = response
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(GatewayError::Introspection {
            service: service.to_string(),
            message,
        });
    }

    response
        .data
        .as_ref()
        .and_then(|data| data.pointer("/_service/sdl"))
        .and_then(|sdl| sdl.as_str())
        .filter(|sdl| !sdl.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| GatewayError::MissingSdl {
            service: service.to_string(),
        })
}
