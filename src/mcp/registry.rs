//! Tool Registry
//!
//! Registration and lookup of the server's tool handlers.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use crate::error::{BridgeError, Result};
use crate::mcp::protocol::{Tool, ToolCallResult};
use crate::ports::{ToolContext, ToolHandler};

/// Registry for tool handlers
#[derive(Default)]
pub struct ToolRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a tool handler
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        self.handlers.insert(handler.name().to_string(), handler);
    }

    /// Get a tool handler by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.handlers.get(name)
    }

    /// Execute a tool by name
    ///
    /// # Errors
    ///
    /// Returns an error if the tool is not found or if execution fails.
    pub async fn execute(
        &self,
        tool_name: &str,
        args: Option<serde_json::Value>,
        ctx: &ToolContext,
    ) -> Result<ToolCallResult> {
        let handler = self
            .get(tool_name)
            .ok_or_else(|| BridgeError::McpUnknownTool {
                tool: tool_name.to_string(),
            })?;

        handler.execute(args, ctx).await
    }

    /// Get all registered tools as MCP Tool definitions
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self
            .handlers
            .values()
            .map(|handler| {
                let schema = handler.schema();
                Tool {
                    name: schema.name.to_string(),
                    description: schema.description.to_string(),
                    input_schema: serde_json::from_str(schema.input_schema)
                        .unwrap_or_else(|_| json!({})),
                }
            })
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Get the number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Create the default registry with the three bridge tools.
#[must_use]
pub fn create_default_registry() -> ToolRegistry {
    use super::tool_handlers::{GetPromptHandler, GetPromptsHandler, GetTraceHandler};

    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(GetPromptsHandler));
    registry.register(Arc::new(GetPromptHandler));
    registry.register(Arc::new(GetTraceHandler));

    registry
}
