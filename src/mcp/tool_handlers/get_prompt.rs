//! Get Prompt Tool Handler
//!
//! Resolves one named prompt with compiled arguments, mirroring the
//! `prompts/get` capability for clients without prompt support.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{BridgeError, Result};
use crate::mcp::protocol::ToolCallResult;
use crate::ports::{ToolContext, ToolHandler, ToolSchema};

/// Arguments for the `get-prompt` tool
#[derive(Debug, Deserialize)]
struct GetPromptArgs {
    name: String,
    #[serde(default)]
    arguments: HashMap<String, String>,
}

/// Get Prompt tool handler
pub struct GetPromptHandler;

impl GetPromptHandler {
    const SCHEMA: &'static str = r#"{
        "type": "object",
        "properties": {
            "name": {
                "type": "string",
                "description": "Name of the prompt to resolve"
            },
            "arguments": {
                "type": "object",
                "description": "Template arguments as string key/value pairs",
                "additionalProperties": {"type": "string"}
            }
        },
        "required": ["name"]
    }"#;
}

#[async_trait]
impl ToolHandler for GetPromptHandler {
    fn name(&self) -> &'static str {
        "get-prompt"
    }

    fn description(&self) -> &'static str {
        "Resolve a named Langfuse prompt (production label) into role-tagged \
         messages. Chat prompts keep their turn structure; text prompts become \
         a single user message. Supplied arguments are compiled into the \
         template, missing ones leave their placeholders untouched."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name(),
            description: self.description(),
            input_schema: Self::SCHEMA,
        }
    }

    async fn execute(&self, args: Option<Value>, ctx: &ToolContext) -> Result<ToolCallResult> {
        let args: GetPromptArgs = match args {
            Some(v) => serde_json::from_value(v)
                .map_err(|e| BridgeError::McpInvalidRequest(e.to_string()))?,
            None => {
                return Err(BridgeError::McpMissingParam {
                    param: "name".to_string(),
                });
            }
        };

        let messages = ctx.resolver.resolve(&args.name, &args.arguments).await?;

        Ok(ToolCallResult::text(serde_json::to_string_pretty(
            &messages,
        )?))
    }
}
