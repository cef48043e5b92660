//! # slate-mcp
//!
//! MCP (Model Context Protocol) server for Slate.
//!
//! This crate exposes a fixed catalogue of ticket, todo and read-only query
//! tools to AI agents over JSON-RPC 2.0. It supports:
//!
//! - **Typed tool payloads**: unknown fields and wrong types are rejected before storage
//! - **Uniform error bodies**: `{"error": {"kind", "message", "field"?, "retryable"?}}`
//! - **Gated raw reads**: `run_select` passes through the `slate-sql` safety gate
//! - **Multiple Transports**: stdio and HTTP
//!
//! ## Architecture
//!
//! ```text
//! AI Agent
//!       │
//!       │ MCP protocol (initialize / tools/list / tools/call)
//!       ▼
//! ┌──────────────────────┐
//! │  Slate MCP Server    │
//! │  1. Decode payload   │  ← slate-core::request
//! │  2. Validate         │  ← slate-core::validate
//! │  3. Gate raw SQL     │  ← slate-sql
//! │  4. Execute          │  ← slate-store
//! │  5. Shape result     │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!         SQLite
//! ```
//!
//! ## Example Usage
//!
//! ```ignore
//! use slate_core::SlateConfig;
//! use slate_mcp::{McpServer, ToolExecutor};
//! use slate_store::Store;
//!
//! let config = SlateConfig::load("slate.yaml")?;
//! let location = config.storage.resolve(None)?;
//! let store = Store::connect(&location, &config.storage).await?;
//! store.bootstrap().await?;
//!
//! let server = McpServer::new(config.mcp, ToolExecutor::new(store, &config.query));
//! server.run().await?;
//! ```

pub mod error;
pub mod executor;
pub mod http_transport;
pub mod protocol;
pub mod server;
pub mod tool_definitions;
pub mod tools;

pub use error::{McpError, ToolError};
pub use executor::{ExecutionResult, ToolExecutor};
pub use protocol::{
    CallToolParams, CallToolResponse, JsonRpcRequest, JsonRpcResponse, ToolAnnotations,
    ToolContent, ToolDefinition,
};
pub use server::McpServer;
pub use tools::ToolRegistry;
