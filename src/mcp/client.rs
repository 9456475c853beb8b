use futures::StreamExt;
use jsonschema::JSONSchema;
use reqwest::header::ACCEPT;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::time::{timeout, Duration};

use crate::config::Config;
use crate::error::{Agent2McpError, Result};

use super::sse::{decode_event, first_json_payload, SseParser};
use super::types::{InitializeResult, JsonRpcRequest, McpTool, ToolListResponse};

// MCP protocol constants
const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
const CLIENT_NAME: &str = "agent2mcp";
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

const SESSION_HEADER: &str = "mcp-session-id";
const ACCEPT_DUAL: &str = "application/json, text/event-stream";

/// Session-holding client for an MCP server speaking JSON-RPC over SSE.
///
/// `initialize` performs the handshake against `POST /sse` and stores the
/// session id the server issues; every tool invocation then goes to
/// `POST /messages` carrying that id as a request header. One instance is
/// one session; methods take `&mut self` and no mutual exclusion is
/// provided for concurrent callers.
pub struct McpSseClient {
    http: reqwest::Client,
    base_url: String,
    stream_timeout: Duration,
    session_id: Option<String>,
    next_id: u64,
    tools: HashMap<String, McpTool>,
}

impl McpSseClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            stream_timeout: Duration::from_secs(config.stream_timeout),
            session_id: None,
            // id 1 is reserved for the initialize request
            next_id: 2,
            tools: HashMap::new(),
        })
    }

    /// The session id issued by the server, once `initialize` has succeeded.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Perform the handshake and store the session id from the response
    /// headers. The response body is advisory; it is scanned for server
    /// info but never fails the handshake.
    pub async fn initialize(&mut self) -> Result<String> {
        let params = json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": CLIENT_NAME,
                "version": CLIENT_VERSION
            }
        });
        let request = JsonRpcRequest::new(1, "initialize", params);

        let response = self
            .http
            .post(format!("{}/sse", self.base_url))
            .header(ACCEPT, ACCEPT_DUAL)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Agent2McpError::Transport {
                status: status.as_u16(),
                message,
            });
        }

        let session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                Agent2McpError::Protocol(
                    "no mcp-session-id header in initialize response".to_string(),
                )
            })?;

        if let Ok(body) = response.text().await {
            scan_server_info(&body);
        }

        self.session_id = Some(session_id.clone());
        Ok(session_id)
    }

    /// Invoke a named tool with an arguments mapping and return the decoded
    /// JSON-RPC response object.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<Value> {
        let session_id = self
            .session_id
            .clone()
            .ok_or_else(|| Agent2McpError::Precondition("session not initialized".to_string()))?;

        // Validate arguments when the tool was discovered; unknown tools
        // skip validation since discovery is optional.
        if let Some(tool) = self.tools.get(name) {
            validate_tool_arguments(tool, &arguments)
                .map_err(Agent2McpError::InvalidArguments)?;
        }

        let request = JsonRpcRequest::new(
            self.next_request_id(),
            "tools/call",
            json!({
                "name": name,
                "arguments": arguments,
            }),
        );

        self.send_message(&session_id, &request).await
    }

    /// Fetch the server's tool list and remember it for argument
    /// validation on later calls.
    pub async fn list_tools(&mut self) -> Result<Vec<McpTool>> {
        let session_id = self
            .session_id
            .clone()
            .ok_or_else(|| Agent2McpError::Precondition("session not initialized".to_string()))?;

        let request = JsonRpcRequest::new(self.next_request_id(), "tools/list", json!({}));
        let response = self.send_message(&session_id, &request).await?;

        let result = response.get("result").cloned().ok_or_else(|| {
            Agent2McpError::Protocol("tools/list response has no result".to_string())
        })?;
        let list: ToolListResponse = serde_json::from_value(result).map_err(|e| {
            Agent2McpError::Protocol(format!("tools/list result is not a tool list: {}", e))
        })?;

        self.tools = list
            .tools
            .iter()
            .map(|tool| (tool.name.clone(), tool.clone()))
            .collect();

        Ok(list.tools)
    }

    /// List all invoices
    pub async fn list_invoices(&mut self) -> Result<Value> {
        self.call_tool("listInvoices", json!({})).await
    }

    /// Get a specific invoice
    pub async fn get_invoice(&mut self, invoice_id: &str) -> Result<Value> {
        self.call_tool("getInvoice", json!({ "invoiceId": invoice_id }))
            .await
    }

    /// Create a new invoice; the given object is passed through as the
    /// tool's arguments mapping
    pub async fn create_invoice(&mut self, invoice: Value) -> Result<Value> {
        self.call_tool("createInvoice", invoice).await
    }

    /// Get the total invoice amount for a date range
    pub async fn total_invoice_amount(
        &mut self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Value> {
        self.call_tool(
            "totalInvoiceAmount",
            json!({ "startDate": start_date, "endDate": end_date }),
        )
        .await
    }

    fn next_request_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    async fn send_message(&self, session_id: &str, request: &JsonRpcRequest) -> Result<Value> {
        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header(ACCEPT, ACCEPT_DUAL)
            .header("MCP-Session-Id", session_id)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Agent2McpError::Transport {
                status: status.as_u16(),
                message,
            });
        }

        self.read_event_payload(response).await
    }

    /// Consume the response body as a byte stream and return the first
    /// SSE event payload that decodes as JSON. Reading stops as soon as a
    /// payload is found; later events in the body are ignored.
    async fn read_event_payload(&self, response: reqwest::Response) -> Result<Value> {
        let mut stream = response.bytes_stream();
        let mut parser = SseParser::new();

        loop {
            match timeout(self.stream_timeout, stream.next()).await {
                Ok(Some(chunk)) => {
                    let chunk = chunk.map_err(Agent2McpError::Network)?;
                    let text = String::from_utf8_lossy(&chunk);
                    for event in parser.feed(&text) {
                        if let Some(payload) = decode_event(&event) {
                            return Ok(payload);
                        }
                    }
                }
                Ok(None) => break,
                Err(_) => return Err(Agent2McpError::Timeout),
            }
        }

        if let Some(event) = parser.finish() {
            if let Some(payload) = decode_event(&event) {
                return Ok(payload);
            }
        }

        Err(Agent2McpError::Protocol(
            "no valid JSON-RPC payload in SSE response".to_string(),
        ))
    }
}

fn validate_tool_arguments(tool: &McpTool, arguments: &Value) -> std::result::Result<(), String> {
    let schema = match JSONSchema::compile(&tool.input_schema) {
        Ok(s) => s,
        Err(e) => return Err(format!("invalid schema for tool '{}': {}", tool.name, e)),
    };

    if let Err(errors) = schema.validate(arguments) {
        let messages: Vec<String> = errors
            .map(|e| format!("{}: {}", e.instance_path, e))
            .collect();
        return Err(messages.join("; "));
    }

    Ok(())
}

/// Lenient scan of a handshake body for the server's initialize result.
/// Diagnostics only; any shape mismatch is ignored.
fn scan_server_info(body: &str) {
    let payload = match serde_json::from_str::<Value>(body) {
        Ok(value) => Some(value),
        Err(_) => first_json_payload(body).ok(),
    };

    if let Some(result) = payload.as_ref().and_then(|p| p.get("result")) {
        if let Ok(init) = serde_json::from_value::<InitializeResult>(result.clone()) {
            tracing::debug!(
                server = %init.server_info.name,
                version = %init.server_info.version,
                protocol = %init.protocol_version,
                "connected to MCP server"
            );
            return;
        }
    }

    tracing::debug!("initialize response body carried no parseable server info");
}
