use crate::error::{Agent2McpError, Result};
use serde_json::Value;

/// Extract the text of the first content block from a decoded JSON-RPC
/// tool response
pub fn extract_text(response: &Value) -> Result<Option<String>> {
    let result = response
        .get("result")
        .ok_or_else(|| Agent2McpError::Protocol("no result in response".to_string()))?;

    let content = result
        .get("content")
        .and_then(|c| c.as_array())
        .ok_or_else(|| Agent2McpError::Protocol("no content in result".to_string()))?;

    let first = content
        .first()
        .ok_or_else(|| Agent2McpError::Protocol("empty content array".to_string()))?;

    Ok(first
        .get("text")
        .and_then(|t| t.as_str())
        .map(|s| s.to_string()))
}

/// Surface a JSON-RPC error member if the response carries one
pub fn extract_error(response: &Value) -> Option<(i64, String)> {
    let error = response.get("error")?;
    let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(0);
    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("")
        .to_string();
    Some((code, message))
}
