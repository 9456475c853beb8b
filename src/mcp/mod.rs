pub mod client;
pub mod response;
pub mod sse;
pub mod types;

pub use client::McpSseClient;
pub use sse::{SseEvent, SseParser};
pub use types::McpTool;
