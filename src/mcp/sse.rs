//! Server-Sent Events framing for MCP response bodies.
//!
//! The server frames each JSON-RPC response as SSE text. Bodies here are
//! finite and one-shot per HTTP response; the client takes the first event
//! whose data decodes as JSON and ignores the rest.

use serde_json::Value;

use crate::error::{Agent2McpError, Result};

/// A single SSE event parsed from a response body.
#[derive(Debug, Clone)]
pub struct SseEvent {
    pub event: Option<String>,
    pub data: String,
}

/// Incremental SSE parser that processes text chunks into events.
pub struct SseParser {
    buffer: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Feed a chunk of text and return any complete events.
    pub fn feed(&mut self, chunk: &str) -> Vec<SseEvent> {
        self.buffer.push_str(chunk);
        let mut events = Vec::new();

        // Complete event blocks are separated by blank lines
        while let Some(pos) = self.buffer.find("\n\n") {
            let block = self.buffer[..pos].to_string();
            self.buffer = self.buffer[pos + 2..].to_string();

            if let Some(event) = Self::parse_block(&block) {
                events.push(event);
            }
        }

        events
    }

    /// Flush a trailing block that was never terminated by a blank line.
    /// Single-event bodies routinely end at `\n` EOF, so this is part of
    /// the normal path, not error recovery.
    pub fn finish(&mut self) -> Option<SseEvent> {
        let block = std::mem::take(&mut self.buffer);
        if block.trim().is_empty() {
            return None;
        }
        Self::parse_block(&block)
    }

    fn parse_block(block: &str) -> Option<SseEvent> {
        let mut event = None;
        let mut data_lines = Vec::new();

        for line in block.lines() {
            if line.starts_with(':') {
                // Comment line, skip
                continue;
            }

            if let Some((field, value)) = line.split_once(':') {
                // Trim one leading space from the value per SSE framing
                let value = value.strip_prefix(' ').unwrap_or(value);
                match field {
                    "event" => event = Some(value.to_string()),
                    "data" => data_lines.push(value.to_string()),
                    _ => {} // Ignore unknown fields
                }
            } else if line == "data" {
                // Field with no value
                data_lines.push(String::new());
            }
        }

        if data_lines.is_empty() {
            return None;
        }

        Some(SseEvent {
            event,
            data: data_lines.join("\n"),
        })
    }
}

impl Default for SseParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an event's data as JSON. Undecodable data is reported through
/// the diagnostic channel and skipped, not treated as fatal.
pub fn decode_event(event: &SseEvent) -> Option<Value> {
    match serde_json::from_str(&event.data) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(data = %event.data, error = %e, "skipping SSE data that is not valid JSON");
            None
        }
    }
}

/// Parse a complete response body and return the first event payload that
/// decodes as JSON. Fails only when no event yields a decodable payload.
pub fn first_json_payload(body: &str) -> Result<Value> {
    let mut parser = SseParser::new();
    let mut events = parser.feed(body);
    if let Some(event) = parser.finish() {
        events.push(event);
    }

    for event in &events {
        if let Some(payload) = decode_event(event) {
            return Ok(payload);
        }
    }

    Err(Agent2McpError::Protocol(
        "no valid JSON-RPC payload in SSE response".to_string(),
    ))
}
