//! Shared test infrastructure for Slate MCP end-to-end tests.
//!
//! This module provides:
//! - An isolated in-memory store per test context
//! - Shortcuts for tool calls and JSON-RPC round trips
//! - Assertion helpers for tool results

use serde_json::{Value, json};
use slate_core::{McpConfig, QueryConfig};
use slate_mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use slate_mcp::{ExecutionResult, McpServer, ToolExecutor};
use slate_store::Store;

// =============================================================================
// TEST CONTEXT
// =============================================================================

pub struct TestContext {
    pub server: McpServer,
}

impl TestContext {
    /// A server over a fresh, bootstrapped in-memory database.
    pub async fn setup() -> Self {
        Self::with_query(QueryConfig::default()).await
    }

    pub async fn with_query(query: QueryConfig) -> Self {
        let store = Store::in_memory().await.expect("in-memory store");
        let executor = ToolExecutor::new(store, &query);
        Self {
            server: McpServer::new(McpConfig::default(), executor),
        }
    }

    pub fn store(&self) -> &Store {
        self.server.executor().store()
    }

    /// Call a tool directly on the executor.
    pub async fn call(&self, tool: &str, arguments: Value) -> ExecutionResult {
        self.server.executor().execute(tool, arguments).await
    }

    /// Send a JSON-RPC request and expect a reply.
    pub async fn rpc(&self, method: &str, params: Option<Value>) -> JsonRpcResponse {
        self.server
            .handle_request(JsonRpcRequest::new(1, method, params))
            .await
            .expect("requests with an id always get a reply")
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub async fn add_ticket(ctx: &TestContext, project_id: &str, title: &str) -> i64 {
    let result = ctx
        .call("add_ticket", json!({"project_id": project_id, "title": title}))
        .await;
    assert_success(&result, "add_ticket fixture");
    result.payload["id"].as_i64().expect("ticket id")
}

pub async fn add_todo(ctx: &TestContext, ticket_id: i64, description: &str) -> i64 {
    let result = ctx
        .call("add_todo", json!({"ticket_id": ticket_id, "description": description}))
        .await;
    assert_success(&result, "add_todo fixture");
    result.payload["id"].as_i64().expect("todo id")
}

pub async fn ticket_count(ctx: &TestContext) -> usize {
    let result = ctx.call("list_tickets", json!({})).await;
    assert_success(&result, "list_tickets");
    result.payload["tickets"].as_array().map(Vec::len).unwrap_or(0)
}

pub async fn todo_count(ctx: &TestContext, ticket_id: i64) -> usize {
    let result = ctx.call("list_todos", json!({"ticket_id": ticket_id})).await;
    assert_success(&result, "list_todos");
    result.payload["todos"].as_array().map(Vec::len).unwrap_or(0)
}

// =============================================================================
// ASSERTIONS
// =============================================================================

pub fn assert_success(result: &ExecutionResult, msg: &str) {
    assert!(result.success, "{}: {:?}", msg, result);
}

pub fn assert_error_kind(result: &ExecutionResult, kind: &str, msg: &str) {
    assert!(!result.success, "{}: expected {} but call succeeded: {:?}", msg, kind, result);
    assert_eq!(result.error_kind(), Some(kind), "{}: {:?}", msg, result);
}
