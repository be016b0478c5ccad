//! Get Prompts Tool Handler
//!
//! Lists the remote prompt catalog one page at a time, mirroring the
//! `prompts/list` capability for clients without prompt support.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{BridgeError, Result};
use crate::mcp::protocol::ToolCallResult;
use crate::ports::{ToolContext, ToolHandler, ToolSchema};

/// Arguments for the `get-prompts` tool
#[derive(Debug, Default, Deserialize)]
struct GetPromptsArgs {
    cursor: Option<String>,
}

/// Get Prompts tool handler
pub struct GetPromptsHandler;

impl GetPromptsHandler {
    const SCHEMA: &'static str = r#"{
        "type": "object",
        "properties": {
            "cursor": {
                "type": "string",
                "description": "Pagination cursor from a previous call (omit for the first page)"
            }
        },
        "required": []
    }"#;
}

#[async_trait]
impl ToolHandler for GetPromptsHandler {
    fn name(&self) -> &'static str {
        "get-prompts"
    }

    fn description(&self) -> &'static str {
        "List prompts from the Langfuse catalog (production label). Returns each \
         prompt's name and its discovered template arguments, plus a cursor for \
         the next page when more prompts exist."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name(),
            description: self.description(),
            input_schema: Self::SCHEMA,
        }
    }

    async fn execute(&self, args: Option<Value>, ctx: &ToolContext) -> Result<ToolCallResult> {
        let args: GetPromptsArgs = match args {
            Some(v) => serde_json::from_value(v)
                .map_err(|e| BridgeError::McpInvalidRequest(e.to_string()))?,
            None => GetPromptsArgs::default(),
        };

        let page = ctx.lister.list(args.cursor.as_deref()).await?;

        let prompts: Vec<Value> = page
            .entries
            .iter()
            .map(|summary| {
                json!({
                    "name": summary.name,
                    "arguments": summary
                        .argument_names
                        .iter()
                        .map(|name| json!({"name": name, "required": false}))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();

        let mut listing = json!({ "prompts": prompts });
        if let Some(cursor) = page.next_cursor {
            listing["nextCursor"] = json!(cursor);
        }

        Ok(ToolCallResult::text(serde_json::to_string_pretty(
            &listing,
        )?))
    }
}
