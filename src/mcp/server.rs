//! MCP server - main event loop and request handling
//!
//! - Reads newline-delimited JSON-RPC requests
//! - Routes to the appropriate handler
//! - Writes one response line per request (none for notifications)

use anyhow::Result;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::protocol::*;
use super::tool::{MenuTool, TOOL_NAME};

/// Name reported in the initialize response
pub const SERVER_NAME: &str = "SSAFYMealMenuService";

/// MCP server exposing the menu tool
pub struct McpServer {
    tool: MenuTool,
}

impl McpServer {
    pub fn new(tool: MenuTool) -> Self {
        Self { tool }
    }

    /// Serve over the process's stdin/stdout until EOF
    pub async fn run(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve one JSON-RPC stream until the reader hits EOF
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        tracing::info!(server = SERVER_NAME, "MCP server started, waiting for requests");

        loop {
            line.clear();

            if reader.read_line(&mut line).await? == 0 {
                tracing::info!("EOF received, shutting down");
                break;
            }

            if let Some(response) = self.handle_line(&line).await {
                if let Some(ref error) = response.error {
                    tracing::debug!(target: "bobmenu::mcp", "-> error: {}", error);
                } else {
                    tracing::debug!(target: "bobmenu::mcp", "-> ok");
                }
                write_response(&mut writer, &response).await?;
            }
        }

        Ok(())
    }

    /// Handle one raw input line; None when no response is due
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request");
                return Some(JsonRpcResponse::parse_error(&e.to_string()));
            }
        };

        tracing::debug!(target: "bobmenu::mcp", "<- {} (id={:?})", request.method, request.id);

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        Some(self.handle_request(request).await)
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => tracing::debug!("client initialized"),
            "notifications/cancelled" => tracing::debug!("request cancelled"),
            other => tracing::debug!(method = other, "unknown notification"),
        }
    }

    async fn handle_request(&self, req: JsonRpcRequest) -> JsonRpcResponse {
        let id = req.id.clone();

        let result = match req.method.as_str() {
            "initialize" => self.handle_initialize(),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(req.params).await,
            "ping" => Ok(json!({})),
            method => Err(JsonRpcError::method_not_found(method)),
        };

        match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::error(id, error),
        }
    }

    fn handle_initialize(&self) -> Result<Value, JsonRpcError> {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        serde_json::to_value(result).map_err(|e| JsonRpcError::internal(e.to_string()))
    }

    fn handle_tools_list(&self) -> Result<Value, JsonRpcError> {
        let result = ToolsListResult {
            tools: vec![self.tool.info()],
        };
        serde_json::to_value(result).map_err(|e| JsonRpcError::internal(e.to_string()))
    }

    async fn handle_tools_call(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
        let call: ToolCallParams = serde_json::from_value(params)
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))?;

        if call.name != TOOL_NAME {
            return Err(JsonRpcError::invalid_params(format!("Unknown tool: {}", call.name)));
        }

        tracing::info!(tool = TOOL_NAME, arguments = ?call.arguments, "executing tool");

        let result = self.tool.call_json(call.arguments).await?;
        serde_json::to_value(result).map_err(|e| JsonRpcError::internal(e.to_string()))
    }
}

async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &JsonRpcResponse) -> Result<()> {
    let output = serde_json::to_string(response)?;
    writer.write_all(output.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
