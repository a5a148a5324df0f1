//! Ragway MCP Server
//!
//! Model Context Protocol server exposing the gateway's operations to AI assistants.

mod protocol;
mod server;
pub mod tools;

pub use protocol::{Content, JsonRpcRequest, JsonRpcResponse, ToolDefinition, ToolResult};
pub use server::{start_server, McpServer};
