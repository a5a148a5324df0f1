//! MCP server implementation

use crate::protocol::*;
use crate::tools;
use anyhow::Result;
use ragway_core::Gateway;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::mpsc;

/// Line-delimited JSON-RPC server.
///
/// Each tool call runs on its own task. Responses are written as they
/// complete and may come back out of request order.
#[derive(Clone)]
pub struct McpServer {
    gateway: Arc<Gateway>,
}

impl McpServer {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Serve stdin/stdout until EOF
    pub async fn run(&self) -> Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = BufWriter::new(tokio::io::stdout());
        self.serve(reader, writer).await
    }

    /// Serve until `reader` is exhausted and every in-flight tool call has answered
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();
        let mut tx = Some(tx);

        loop {
            tokio::select! {
                line = lines.next_line(), if tx.is_some() => {
                    let Some(line) = line? else {
                        // Finished tasks drop their senders; recv yields None after the last one
                        tx = None;
                        continue;
                    };
                    if let Some(ref tx) = tx {
                        if let Some(response) = self.dispatch(line.trim(), tx).await {
                            self.write_response(&mut writer, &response).await?;
                        }
                    }
                }
                Some(response) = rx.recv() => {
                    self.write_response(&mut writer, &response).await?;
                }
                else => break,
            }
        }

        Ok(())
    }

    /// Answer inline, or hand a tool call to its own task and return `None`
    async fn dispatch(
        &self,
        line: &str,
        tx: &mpsc::UnboundedSender<JsonRpcResponse>,
    ) -> Option<JsonRpcResponse> {
        if line.is_empty() {
            return None;
        }

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    &format!("Parse error: {}", e),
                ))
            }
        };

        if request.is_notification() {
            tracing::debug!("Notification {}", request.method);
            return None;
        }

        if request.method == "tools/call" {
            let server = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let response = server.handle_request(&request).await;
                if tx.send(response).is_err() {
                    tracing::warn!("Dropping response to {:?}: writer closed", request.id);
                }
            });
            return None;
        }

        Some(self.handle_request(&request).await)
    }

    async fn write_response<W: AsyncWrite + Unpin>(
        &self,
        writer: &mut W,
        response: &JsonRpcResponse,
    ) -> Result<()> {
        let json = serde_json::to_string(response)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    pub async fn handle_request(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id.clone(), serde_json::json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            _ => JsonRpcResponse::error(
                request.id.clone(),
                error_codes::METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let result = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": "ragway",
                "version": env!("CARGO_PKG_VERSION")
            }
        });
        JsonRpcResponse::success(request.id.clone(), result)
    }

    fn handle_tools_list(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let tools = vec![
            tools::search_tool_definition(self.gateway.config().search.default_max_results),
            tools::health_tool_definition(),
            tools::reseed_tool_definition(),
        ];

        JsonRpcResponse::success(request.id.clone(), serde_json::json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let Some(name) = request.params.get("name").and_then(|v| v.as_str()) else {
            return JsonRpcResponse::error(
                request.id.clone(),
                error_codes::INVALID_PARAMS,
                "Missing tool name",
            );
        };

        let arguments = request
            .params
            .get("arguments")
            .cloned()
            .unwrap_or(serde_json::json!({}));

        let result = match name {
            "search" => tools::handle_search(&self.gateway, arguments).await,
            "health" => tools::handle_health(&self.gateway).await,
            "reseed" => tools::handle_reseed(&self.gateway).await,
            _ => Err(anyhow::anyhow!("Unknown tool: {}", name)),
        };

        let tool_result = result.unwrap_or_else(|e| {
            tracing::error!("Tool {} failed: {}", name, e);
            ToolResult::error(format!("Error: {}", e))
        });

        match serde_json::to_value(tool_result) {
            Ok(value) => JsonRpcResponse::success(request.id.clone(), value),
            Err(e) => JsonRpcResponse::error(
                request.id.clone(),
                error_codes::INTERNAL_ERROR,
                &format!("Unserializable tool result: {}", e),
            ),
        }
    }
}

/// Serve MCP over stdio for `gateway`
pub async fn start_server(gateway: Arc<Gateway>) -> Result<()> {
    let server = McpServer::new(gateway);
    server.run().await
}
