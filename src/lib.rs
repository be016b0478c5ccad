//! MCP Langfuse Bridge
//!
//! An MCP server over stdio that exposes a Langfuse project's prompt
//! catalog and execution traces. Prompts resolve chat-first with a text
//! fallback and compile `{{variable}}` placeholders from supplied
//! arguments; traces are cached on disk after the first retrieval and
//! can be narrowed by observation index or name.
//!
//! The crate is layered hexagonally:
//!
//! - `ports`: trait seams and contract types shared across layers
//! - `domain`: the three pipelines (catalog lister, prompt resolver,
//!   trace retriever)
//! - `langfuse`: HTTP adapter for the Langfuse REST API
//! - `mcp`: JSON-RPC protocol, tool registry, and the stdio server
//! - `config`: environment-driven settings

pub mod config;
pub mod domain;
pub mod error;
pub mod langfuse;
pub mod mcp;
pub mod ports;

pub use config::{PRODUCTION_LABEL, Settings, load_settings, validate_settings};
pub use domain::{CatalogLister, PromptResolver, TraceCache, TraceFilter, TraceRetriever};
pub use error::{BridgeError, Result};
pub use langfuse::HttpLangfuseClient;
pub use mcp::McpServer;
pub use ports::{LangfuseClient, ToolContext, ToolHandler, TraceStore};
