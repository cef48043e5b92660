//! JSON-RPC protocol and transport tests.

use super::common::*;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use slate_mcp::http_transport::{HttpTransportState, create_router};
use slate_mcp::protocol::{JsonRpcRequest, codes};
use std::sync::Arc;
use tower::ServiceExt;

pub async fn test_handshake() {
    println!("  🧪 test_handshake");
    let ctx = TestContext::setup().await;

    let response = ctx
        .rpc(
            "initialize",
            Some(json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test", "version": "0"}
            })),
        )
        .await;
    let result = response.result.expect("initialize result");
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "slate");
    assert_eq!(response.id, Some(json!(1)));

    let ack = ctx
        .server
        .handle_request(JsonRpcRequest::notification("notifications/initialized"))
        .await;
    assert!(ack.is_none(), "notifications get no reply");

    let pong = ctx.rpc("ping", None).await;
    assert_eq!(pong.result, Some(json!({})));

    let bye = ctx.rpc("shutdown", None).await;
    assert!(bye.error.is_none());
}

pub async fn test_tools_list() {
    println!("  🧪 test_tools_list");
    let ctx = TestContext::setup().await;

    let response = ctx.rpc("tools/list", None).await;
    let result = response.result.expect("tools/list result");
    let tools = result["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 13);

    for tool in tools {
        assert!(tool["name"].is_string());
        assert!(tool["description"].is_string());
        assert_eq!(tool["inputSchema"]["type"], "object", "{}", tool["name"]);
        assert!(tool["annotations"]["readOnlyHint"].is_boolean());
    }

    let run_select = tools.iter().find(|t| t["name"] == "run_select").unwrap();
    assert_eq!(run_select["annotations"]["readOnlyHint"], true);
    let delete = tools.iter().find(|t| t["name"] == "delete_ticket").unwrap();
    assert_eq!(delete["annotations"]["destructiveHint"], true);
}

pub async fn test_tools_call_success_and_failure() {
    println!("  🧪 test_tools_call_success_and_failure");
    let ctx = TestContext::setup().await;

    let response = ctx
        .rpc(
            "tools/call",
            Some(json!({"name": "add_ticket", "arguments": {"project_id": "web", "title": "Login"}})),
        )
        .await;
    let result = response.result.expect("tools/call result");
    assert_eq!(result["isError"], false);
    assert_eq!(result["content"][0]["type"], "text");
    let text: Value =
        serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(text["title"], "Login");
    assert_eq!(result["structuredContent"], text);

    let response = ctx
        .rpc(
            "tools/call",
            Some(json!({"name": "get_ticket", "arguments": {"id": 77}})),
        )
        .await;
    assert!(response.error.is_none(), "tool failures are not protocol errors");
    let result = response.result.unwrap();
    assert_eq!(result["isError"], true);
    assert_eq!(result["structuredContent"]["error"]["kind"], "not_found");

    // Missing arguments behave like an empty object.
    let response = ctx
        .rpc("tools/call", Some(json!({"name": "list_tables"})))
        .await;
    assert_eq!(
        response.result.unwrap()["structuredContent"],
        json!({"tables": ["tickets", "todos"]})
    );
}

pub async fn test_protocol_errors() {
    println!("  🧪 test_protocol_errors");
    let ctx = TestContext::setup().await;

    let response = ctx.rpc("resources/list", None).await;
    assert_eq!(response.error.unwrap().code, codes::METHOD_NOT_FOUND);

    let response = ctx.rpc("tools/call", None).await;
    assert_eq!(response.error.unwrap().code, codes::INVALID_PARAMS);

    let response = ctx.rpc("tools/call", Some(json!({"arguments": {}}))).await;
    assert_eq!(response.error.unwrap().code, codes::INVALID_PARAMS);

    let response = ctx
        .rpc("tools/call", Some(json!({"name": "drop_database", "arguments": {}})))
        .await;
    assert_eq!(response.error.unwrap().code, codes::INVALID_PARAMS);

    let response = ctx.server.handle_frame(b"[1, 2]").await.unwrap();
    assert_eq!(response.error.unwrap().code, codes::INVALID_REQUEST);
}

async fn post(app: axum::Router, body: &str) -> (StatusCode, Option<Value>) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).ok();
    (status, json)
}

pub async fn test_http_transport() {
    println!("  🧪 test_http_transport");
    let ctx = TestContext::setup().await;
    let request_tx = ctx.server.clone().spawn_handler();
    let state = Arc::new(HttpTransportState::new(request_tx));

    let (status, body) = post(
        create_router(state.clone()),
        r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"add_ticket","arguments":{"project_id":"api","title":"Over HTTP"}}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["id"], 7);
    assert_eq!(body["result"]["isError"], false);

    // Same store behind both transports.
    assert_eq!(ticket_count(&ctx).await, 1);

    let (status, body) = post(
        create_router(state.clone()),
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body.is_none());

    let (status, body) = post(create_router(state), "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"]["code"], codes::PARSE_ERROR);
}

pub async fn run_all_tests() {
    println!("\n🔌 Running Protocol Tests\n");

    test_handshake().await;
    test_tools_list().await;
    test_tools_call_success_and_failure().await;
    test_protocol_errors().await;
    test_http_transport().await;

    println!("\n✅ Protocol tests passed\n");
}
