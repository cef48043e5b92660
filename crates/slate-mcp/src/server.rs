//! MCP server implementation.
//!
//! This module provides the main MCP server that handles the JSON-RPC
//! handshake, tool discovery and tool execution for both transports.

use crate::error::McpError;
use crate::executor::ToolExecutor;
use crate::http_transport::{HttpServer, PendingRequest};
use crate::protocol::*;
use crate::tools::ToolRegistry;
use serde_json::{Value, json};
use slate_core::{McpConfig, Transport};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Requests buffered between the HTTP listener and the handler task.
const REQUEST_QUEUE_DEPTH: usize = 64;

const INSTRUCTIONS: &str = "Slate tracks tickets and their todos. Use the ticket and todo tools \
for changes; use list_tables, schema and run_select for read-only reporting.";

/// The MCP server.
#[derive(Debug, Clone)]
pub struct McpServer {
    config: McpConfig,
    tools: ToolRegistry,
    executor: ToolExecutor,
}

impl McpServer {
    /// Create a server exposing the built-in tool catalogue.
    pub fn new(config: McpConfig, executor: ToolExecutor) -> Self {
        Self {
            config,
            tools: ToolRegistry::builtin(),
            executor,
        }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn executor(&self) -> &ToolExecutor {
        &self.executor
    }

    /// Start the MCP server on the configured transport.
    pub async fn run(&self) -> Result<(), McpError> {
        match self.config.transport {
            Transport::Stdio => self.run_stdio().await,
            Transport::Http => self.run_http().await,
        }
    }

    /// Serve newline-delimited JSON-RPC on stdin/stdout until stdin closes.
    async fn run_stdio(&self) -> Result<(), McpError> {
        info!(tools = self.tools.len(), "Starting MCP server with stdio transport");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            if let Some(response) = self.handle_frame(line.as_bytes()).await {
                let mut frame = serde_json::to_vec(&response)?;
                frame.push(b'\n');
                stdout.write_all(&frame).await?;
                stdout.flush().await?;
            }
        }

        info!("stdin closed, MCP server stopping");
        Ok(())
    }

    /// Run the server with HTTP transport.
    pub async fn run_http(&self) -> Result<(), McpError> {
        let address = self.config.bind_address();
        info!(%address, tools = self.tools.len(), "Starting MCP server with HTTP transport");

        let request_tx = self.clone().spawn_handler();
        HttpServer::new(address, request_tx).run().await
    }

    /// Move the server into a task that answers requests one at a time.
    ///
    /// The task ends when every sender has been dropped.
    pub fn spawn_handler(self) -> mpsc::Sender<PendingRequest> {
        let (request_tx, mut request_rx) = mpsc::channel::<PendingRequest>(REQUEST_QUEUE_DEPTH);

        tokio::spawn(async move {
            while let Some((request, response_tx)) = request_rx.recv().await {
                let response = self.handle_request(request).await;
                // The HTTP caller may have gone away.
                let _ = response_tx.send(response);
            }
            debug!("MCP request channel closed");
        });

        request_tx
    }

    /// Handle one raw frame. Blank frames are ignored.
    pub async fn handle_frame(&self, frame: &[u8]) -> Option<JsonRpcResponse> {
        if frame.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        match JsonRpcRequest::parse(frame) {
            Ok(request) => self.handle_request(request).await,
            Err(response) => {
                warn!(error = ?response.error, "Rejected malformed JSON-RPC frame");
                Some(response)
            }
        }
    }

    /// Handle a JSON-RPC request. Notifications yield `None`.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id.clone();
        let notification = request.is_notification();
        debug!(method = %request.method, id = ?id, "Handling request");

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "notifications/initialized" | "initialized" => {
                info!("MCP client initialized");
                JsonRpcResponse::success(id, json!({}))
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            "shutdown" => self.handle_shutdown(id),
            _ => JsonRpcResponse::error(
                id,
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        if notification {
            return None;
        }
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ServerInfo {
                name: "slate".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            capabilities: json!({
                "tools": {
                    "listChanged": false
                }
            }),
            instructions: Some(INSTRUCTIONS.to_string()),
        };
        to_response(id, &result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ListToolsResponse {
            tools: self.tools.list().into_iter().cloned().collect(),
        };
        to_response(id, &result)
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        codes::INVALID_PARAMS,
                        format!("Invalid params: {}", e),
                    );
                }
            },
            None => return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing params"),
        };

        if !self.tools.contains(&params.name) {
            return JsonRpcResponse::error(
                id,
                codes::INVALID_PARAMS,
                format!("Tool not found: {}", params.name),
            );
        }

        let result = self.executor.execute(&params.name, params.arguments).await;
        to_response(id, &result.into_response())
    }

    fn handle_shutdown(&self, id: Option<Value>) -> JsonRpcResponse {
        info!("MCP server shutdown requested");
        JsonRpcResponse::success(id, Value::Null)
    }
}

fn to_response<T: serde::Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            codes::INTERNAL_ERROR,
            format!("Failed to encode result: {}", e),
        ),
    }
}
