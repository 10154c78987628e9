use anyhow::Result;
use rmcp::{
    model::{CallToolRequestParam, ClientInfo},
    serve_client,
    service::ServiceError,
    ServiceExt,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mallory_mcp::{
    lib::api::{MalloryClient, HEALTH_ENDPOINT, WHOAMI_ENDPOINT},
    server::{config::ApiSection, runtime::MalloryServer},
};

const TEST_KEY: &str = "integration-key-0123456789";

fn api_section(base_url: String) -> ApiSection {
    ApiSection {
        base_url,
        key: None,
        timeout_secs: 5,
        user_agent: "mallory-mcp-integration".into(),
    }
}

fn build_server(mock: &MockServer) -> MalloryServer {
    let client = MalloryClient::new(&api_section(mock.uri()), TEST_KEY.into())
        .expect("client should build");
    MalloryServer::new("mallory-integration".into(), client)
}

#[tokio::test]
async fn health_check_merges_api_and_user_payloads() -> Result<()> {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(HEALTH_ENDPOINT))
        .and(header("authorization", format!("Bearer {TEST_KEY}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path(WHOAMI_ENDPOINT))
        .and(header("authorization", format!("Bearer {TEST_KEY}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "u1",
            "email": "a@b.com",
            "first_name": "Ada",
            "last_name": "Lovelace"
        })))
        .mount(&mock)
        .await;

    let server = build_server(&mock);
    let (server_transport, client_transport) = tokio::io::duplex(4096);
    let server_task = tokio::spawn(async move {
        server.serve(server_transport).await?.waiting().await?;
        Result::<_, anyhow::Error>::Ok(())
    });
    let client = serve_client(ClientInfo::default(), client_transport).await?;

    let call_result = client
        .call_tool(CallToolRequestParam {
            name: "health_check".into(),
            arguments: None,
        })
        .await;

    let _ = client.cancel().await;
    let _ = server_task.await;

    let response = call_result.expect("health_check should return a success response");
    let payload = response
        .structured_content
        .expect("structured_content should exist");
    assert_eq!(
        payload,
        json!({
            "api": { "status": "ok" },
            "user": {
                "uuid": "u1",
                "email": "a@b.com",
                "first_name": "Ada",
                "last_name": "Lovelace"
            }
        })
    );
    Ok(())
}

#[tokio::test]
async fn health_check_degrades_user_when_identity_is_rejected() -> Result<()> {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(HEALTH_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path(WHOAMI_ENDPOINT))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "invalid API key" })),
        )
        .mount(&mock)
        .await;

    let server = build_server(&mock);
    let (server_transport, client_transport) = tokio::io::duplex(4096);
    let server_task = tokio::spawn(async move {
        server.serve(server_transport).await?.waiting().await?;
        Result::<_, anyhow::Error>::Ok(())
    });
    let client = serve_client(ClientInfo::default(), client_transport).await?;

    let call_result = client
        .call_tool(CallToolRequestParam {
            name: "health_check".into(),
            arguments: None,
        })
        .await;

    let _ = client.cancel().await;
    let _ = server_task.await;

    let response = call_result.expect("degraded identity must not fail the call");
    let payload = response
        .structured_content
        .expect("structured_content should exist");
    assert_eq!(payload.get("api"), Some(&json!({ "status": "ok" })));

    let user_error = payload
        .get("user")
        .and_then(|user| user.get("error"))
        .and_then(Value::as_str)
        .expect("user should carry an error message");
    assert!(user_error.contains("401"), "user error: {user_error}");
    assert!(
        user_error.contains("invalid API key"),
        "user error: {user_error}"
    );
    Ok(())
}

#[tokio::test]
async fn health_check_fails_when_health_endpoint_is_down() -> Result<()> {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(HEALTH_ENDPOINT))
        .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
        .mount(&mock)
        .await;
    // The identity call must never happen once the health check has failed.
    Mock::given(method("GET"))
        .and(path(WHOAMI_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "uuid": "u1" })))
        .expect(0)
        .mount(&mock)
        .await;

    let server = build_server(&mock);
    let (server_transport, client_transport) = tokio::io::duplex(4096);
    let server_task = tokio::spawn(async move {
        server.serve(server_transport).await?.waiting().await?;
        Result::<_, anyhow::Error>::Ok(())
    });
    let client = serve_client(ClientInfo::default(), client_transport).await?;

    let call_result = client
        .call_tool(CallToolRequestParam {
            name: "health_check".into(),
            arguments: None,
        })
        .await;

    let _ = client.cancel().await;
    let _ = server_task.await;

    let error = call_result.expect_err("health failure must fail the call");
    match error {
        ServiceError::McpError(inner) => {
            let code = error_field(&inner, "code").and_then(Value::as_str);
            assert_eq!(code, Some("API_HEALTH_FAILED"));
            let retryable = error_field(&inner, "retryable").and_then(Value::as_bool);
            assert_eq!(retryable, Some(true));
            let remediation = error_field(&inner, "remediation")
                .and_then(Value::as_str)
                .unwrap_or_default();
            assert!(!remediation.is_empty(), "remediation should not be empty");
        }
        other => panic!("Unexpected error: {other:?}", other = other),
    }
    Ok(())
}

fn error_field<'a>(error: &'a rmcp::model::ErrorData, key: &str) -> Option<&'a Value> {
    error.data.as_ref().and_then(|data| data.get(key))
}
