//! Client library for an MCP server speaking JSON-RPC over Server-Sent
//! Events: a session handshake against `/sse`, tool invocations against
//! `/messages`, and SSE demultiplexing of the response bodies.

pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;

pub use error::{Agent2McpError, Result};
pub use mcp::McpSseClient;
