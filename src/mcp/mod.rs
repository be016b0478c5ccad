//! MCP Layer
//!
//! JSON-RPC protocol types, the tool registry, the tool handlers, and
//! the stdio server loop.

pub mod protocol;
pub mod registry;
pub mod server;
pub mod tool_handlers;

pub use registry::{ToolRegistry, create_default_registry};
pub use server::McpServer;
