//! End-to-end startup and shutdown of the gateway.

use std::sync::atomic::Ordering;

use serde_json::{json, Value};
use supergraph_gateway::error::StartupError;
use supergraph_gateway::lifecycle::startup;
use supergraph_gateway::server::ServerError;
use supergraph_gateway::{Orchestrator, ServiceDescriptor};

mod common;

#[tokio::test]
async fn test_startup_with_reachable_service() {
    let (subgraph, calls) = common::start_mock_subgraph(common::ACCOUNTS_SDL).await;
    let config = common::config_for(
        vec![ServiceDescriptor::new("accounts", common::subgraph_url(subgraph))],
        0,
    );

    let running = Orchestrator::new(config).run().await.expect("gateway should start");

    assert!(!running.graphql_path().is_empty());
    assert!(running.startup_message().contains(running.graphql_path()));
    assert!(running.startup_message().contains(&running.local_addr().port().to_string()));
    assert_eq!(calls.schema_queries.load(Ordering::SeqCst), 1);

    let res = common::client()
        .post(running.url())
        .json(&json!({ "query": "{ me { id } }" }))
        .send()
        .await
        .expect("gateway unreachable");
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "data": { "echo": "{ me { id } }" } }));
    assert_eq!(calls.operations.load(Ordering::SeqCst), 1);

    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_startup_fails_when_service_unreachable() {
    let dead = common::unused_addr().await;
    let gateway_addr = common::unused_addr().await;
    let config = common::config_for(
        vec![ServiceDescriptor::new("accounts", common::subgraph_url(dead))],
        gateway_addr.port(),
    );

    let err = match Orchestrator::new(config).run().await {
        Ok(_) => panic!("startup should fail"),
        Err(e) => e,
    };
    assert!(matches!(err, StartupError::Server(ServerError::Gateway(_))));
    assert_eq!(err.category(), "upstream-schema");
    assert!(err.to_string().contains("accounts"));

    // The listener binds after the schema fetch, so nothing is left open.
    assert!(tokio::net::TcpStream::connect(gateway_addr).await.is_err());
}

#[tokio::test]
async fn test_run_reports_failure_as_none() {
    let dead = common::unused_addr().await;
    let config = common::config_for(
        vec![ServiceDescriptor::new("accounts", common::subgraph_url(dead))],
        0,
    );

    let logs = common::LogCapture::default();
    let _guard = logs.install();

    assert!(startup::run(config).await.is_none());

    let failures: Vec<Value> = logs
        .events()
        .into_iter()
        .filter(|event| event["message"] == "Gateway failed to start")
        .collect();
    assert_eq!(failures.len(), 1, "expected one failure line");
    assert_eq!(failures[0]["level"], "ERROR");
    assert_eq!(failures[0]["category"], "upstream-schema");
    assert!(failures[0]["error"].as_str().unwrap().contains("accounts"));
}

#[tokio::test]
async fn test_service_list_unchanged_by_startup_cycle() {
    let (accounts, _) = common::start_mock_subgraph(common::ACCOUNTS_SDL).await;
    let (reviews, _) = common::start_mock_subgraph("type Query { reviews: [String] }").await;
    let services = vec![
        ServiceDescriptor::new("accounts", common::subgraph_url(accounts)),
        ServiceDescriptor::new("reviews", common::subgraph_url(reviews)),
    ];
    let snapshot = services.clone();

    let running = Orchestrator::new(common::config_for(services, 0))
        .run()
        .await
        .unwrap();
    let during = running.services().clone();
    running.shutdown().await.unwrap();

    assert_eq!(during.as_slice(), snapshot.as_slice());
    assert_eq!(running.services().as_slice(), snapshot.as_slice());
}

#[tokio::test]
async fn test_landing_page_points_at_endpoint() {
    let (subgraph, _) = common::start_mock_subgraph(common::ACCOUNTS_SDL).await;
    let config = common::config_for(
        vec![ServiceDescriptor::new("accounts", common::subgraph_url(subgraph))],
        0,
    );
    let running = Orchestrator::new(config).run().await.unwrap();

    let res = common::client()
        .get(format!("http://{}/", running.local_addr()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers()["content-type"].to_str().unwrap().starts_with("text/html"));
    assert!(res.headers().contains_key("x-request-id"));
    let html = res.text().await.unwrap();
    assert!(html.contains(&running.url()));

    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_landing_page_can_be_disabled() {
    let (subgraph, _) = common::start_mock_subgraph(common::ACCOUNTS_SDL).await;
    let mut config = common::config_for(
        vec![ServiceDescriptor::new("accounts", common::subgraph_url(subgraph))],
        0,
    );
    config.server.landing_page = false;
    let running = Orchestrator::new(config).run().await.unwrap();

    let res = common::client()
        .get(format!("http://{}/", running.local_addr()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let (subgraph, _) = common::start_mock_subgraph(common::ACCOUNTS_SDL).await;
    let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = common::config_for(
        vec![ServiceDescriptor::new("accounts", common::subgraph_url(subgraph))],
        occupied.local_addr().unwrap().port(),
    );

    let err = match Orchestrator::new(config).run().await {
        Ok(_) => panic!("bind should fail"),
        Err(e) => e,
    };
    assert_eq!(err.category(), "network-bind");
}
