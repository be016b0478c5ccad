//! MCP Server
//!
//! Stdio front-end for the three pipelines. Requests are handled
//! sequentially: one pipeline runs to completion per request, suspending
//! only at its own I/O boundaries.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::config::Settings;
use crate::domain::{CatalogLister, PromptResolver, TraceCache, TraceRetriever};
use crate::error::{BridgeError, Result};
use crate::langfuse::HttpLangfuseClient;
use crate::ports::{LangfuseClient, PromptArgument, ToolCallResult, ToolContext};

use super::protocol::{
    InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    PROTOCOL_VERSION, PromptDefinition, PromptsCapability, PromptsGetParams, PromptsGetResult,
    PromptsListParams, PromptsListResult, SERVER_NAME, SERVER_VERSION,
    SUPPORTED_PROTOCOL_VERSIONS, ServerCapabilities, ServerInfo, ToolCallParams, ToolsCapability,
    ToolsListResult,
};
use super::registry::{ToolRegistry, create_default_registry};

/// MCP server that communicates over stdio.
pub struct McpServer {
    ctx: ToolContext,
    registry: ToolRegistry,
}

impl McpServer {
    /// Create a server backed by the Langfuse REST API.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let client: Arc<dyn LangfuseClient> = Arc::new(HttpLangfuseClient::new(&settings));
        Self::with_client(settings, client)
    }

    /// Create a server around an explicit remote client, e.g. a test double.
    #[must_use]
    pub fn with_client(settings: Settings, client: Arc<dyn LangfuseClient>) -> Self {
        let settings = Arc::new(settings);

        let lister = Arc::new(CatalogLister::new(
            Arc::clone(&client),
            settings.page_size,
        ));
        let resolver = Arc::new(PromptResolver::new(Arc::clone(&client)));
        let retriever = Arc::new(TraceRetriever::new(
            client,
            Arc::new(TraceCache::new(settings.cache_dir.clone())),
            settings.trace_summary_threshold,
        ));

        Self {
            ctx: ToolContext::new(settings, lister, resolver, retriever),
            registry: create_default_registry(),
        }
    }

    /// Run the stdio read loop until the client disconnects.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from stdin or writing to stdout fails.
    pub async fn run(self: Arc<Self>) -> Result<()> {
        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();
        let mut line = String::new();

        info!(server = SERVER_NAME, version = SERVER_VERSION, "MCP server starting");

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                // EOF - client disconnected
                info!("Client disconnected, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            debug!(request = %trimmed, "Received request");

            let response = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    error!(error = %e, "Failed to parse request");
                    Some(JsonRpcResponse::error(
                        None,
                        JsonRpcError::parse_error(format!("Invalid JSON: {e}")),
                    ))
                }
            };

            // Notifications get no response on the wire
            let Some(response) = response else {
                continue;
            };

            let serialized = serde_json::to_string(&response)?;
            debug!(response = %serialized, "Sending response");

            stdout.write_all(serialized.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }

        Ok(())
    }

    /// Dispatch one JSON-RPC request to the matching handler.
    ///
    /// Returns `None` for notifications, which must not be answered.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.method == "initialized" || request.method.starts_with("notifications/") {
            debug!(method = %request.method, "Notification received");
            return None;
        }

        let id = request.id.clone();

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params).await,
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            "prompts/list" => self.handle_prompts_list(id, request.params).await,
            "prompts/get" => self.handle_prompts_get(id, request.params).await,
            _ => {
                error!(method = %request.method, "Unknown method");
                JsonRpcResponse::error(id, JsonRpcError::method_not_found(&request.method))
            }
        };

        Some(response)
    }

    async fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        // Parse initialize params and negotiate the protocol version
        let mut negotiated_version = PROTOCOL_VERSION.to_string();

        if let Some(p) = params {
            match serde_json::from_value::<InitializeParams>(p) {
                Ok(init_params) => {
                    info!(
                        client = %init_params.client_info.name,
                        version = %init_params.client_info.version,
                        protocol = %init_params.protocol_version,
                        "Client connected"
                    );

                    // Echo the client's version if we support it, otherwise
                    // answer with our latest
                    if SUPPORTED_PROTOCOL_VERSIONS.contains(&init_params.protocol_version.as_str())
                    {
                        negotiated_version = init_params.protocol_version.clone();
                    }
                }
                Err(e) => {
                    debug!(error = %e, "Could not parse initialize params (continuing anyway)");
                }
            }
        }

        let result = InitializeResult {
            protocol_version: negotiated_version,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
                prompts: Some(PromptsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
                description: Some(
                    "Langfuse prompt catalog and execution traces over MCP".to_string(),
                ),
            },
            instructions: Some(
                "This server exposes the Langfuse prompt catalog and execution \
                 traces. Use get-prompts to browse available prompts and their \
                 arguments, get-prompt to resolve one into messages, and \
                 get-trace to inspect an execution trace. Large traces come \
                 back as a structure summary; narrow them with the index or \
                 functionName filter."
                    .to_string(),
            ),
        };

        JsonRpcResponse::success_or_serialize_error(id, &result)
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: self.registry.list_tools(),
        };

        JsonRpcResponse::success_or_serialize_error(id, &result)
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(id, JsonRpcError::invalid_params("Missing params"));
        };

        let call_params: ToolCallParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid params: {e}")),
                );
            }
        };

        info!(tool = %call_params.name, "Tool call");

        match self
            .registry
            .execute(&call_params.name, call_params.arguments, &self.ctx)
            .await
        {
            Ok(result) => JsonRpcResponse::success_or_serialize_error(id, &result),
            Err(e) => {
                error!(error = %e, "Tool call failed");
                let error_result = ToolCallResult::error(e.to_string());
                JsonRpcResponse::success_or_serialize_error(id, &error_result)
            }
        }
    }

    async fn handle_prompts_list(
        &self,
        id: Option<Value>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let list_params: PromptsListParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(parsed) => parsed,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("Invalid params: {e}")),
                    );
                }
            },
            None => PromptsListParams::default(),
        };

        match self.ctx.lister.list(list_params.cursor.as_deref()).await {
            Ok(page) => {
                let prompts = page
                    .entries
                    .into_iter()
                    .map(|summary| PromptDefinition {
                        name: summary.name,
                        description: None,
                        arguments: summary
                            .argument_names
                            .into_iter()
                            .map(PromptArgument::optional)
                            .collect(),
                    })
                    .collect();

                let result = PromptsListResult {
                    prompts,
                    next_cursor: page.next_cursor,
                };
                JsonRpcResponse::success_or_serialize_error(id, &result)
            }
            Err(e @ BridgeError::InvalidCursor { .. }) => {
                JsonRpcResponse::error(id, JsonRpcError::invalid_params(e.to_string()))
            }
            Err(e) => {
                error!(error = %e, "Prompt listing failed");
                JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string()))
            }
        }
    }

    async fn handle_prompts_get(
        &self,
        id: Option<Value>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(id, JsonRpcError::invalid_params("Missing params"));
        };

        let get_params: PromptsGetParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid params: {e}")),
                );
            }
        };

        info!(prompt = %get_params.name, "Prompt get");

        match self
            .ctx
            .resolver
            .resolve(&get_params.name, &get_params.arguments)
            .await
        {
            Ok(messages) => {
                let result = PromptsGetResult { messages };
                JsonRpcResponse::success_or_serialize_error(id, &result)
            }
            Err(e) => {
                error!(error = %e, "Prompt get failed");
                JsonRpcResponse::error(id, JsonRpcError::invalid_params(e.to_string()))
            }
        }
    }
}
