//! Get Trace Tool Handler
//!
//! Retrieves an execution trace through the local cache and narrows it
//! with an index or observation-name filter so the response stays
//! bounded.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::TraceFilter;
use crate::error::{BridgeError, Result};
use crate::mcp::protocol::ToolCallResult;
use crate::ports::{ToolContext, ToolHandler, ToolSchema};

/// Arguments for the `get-trace` tool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetTraceArgs {
    trace_id: String,
    function_name: Option<String>,
    index: Option<u64>,
}

/// Get Trace tool handler
pub struct GetTraceHandler;

impl GetTraceHandler {
    const SCHEMA: &'static str = r#"{
        "type": "object",
        "properties": {
            "traceId": {
                "type": "string",
                "description": "Langfuse trace id to retrieve"
            },
            "functionName": {
                "type": "string",
                "description": "Return only the observation with this exact name"
            },
            "index": {
                "type": "integer",
                "description": "Return only the observation at this position (takes priority over functionName)",
                "minimum": 0
            }
        },
        "required": ["traceId"]
    }"#;
}

#[async_trait]
impl ToolHandler for GetTraceHandler {
    fn name(&self) -> &'static str {
        "get-trace"
    }

    fn description(&self) -> &'static str {
        "Fetch a Langfuse execution trace, cached locally after the first \
         retrieval. Filter by observation index or exact observation name to \
         get one step's input/output; without a filter, large traces come \
         back as a structure summary instead of the raw payload."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name(),
            description: self.description(),
            input_schema: Self::SCHEMA,
        }
    }

    async fn execute(&self, args: Option<Value>, ctx: &ToolContext) -> Result<ToolCallResult> {
        let args: GetTraceArgs = match args {
            Some(v) => serde_json::from_value(v)
                .map_err(|e| BridgeError::McpInvalidRequest(e.to_string()))?,
            None => {
                return Err(BridgeError::McpMissingParam {
                    param: "traceId".to_string(),
                });
            }
        };

        let filter = TraceFilter::from_args(args.function_name, args.index);

        // The retriever catches its own failures and returns an
        // error-flagged result, so this never raises past here.
        Ok(ctx.retriever.get_trace(&args.trace_id, filter).await)
    }
}
