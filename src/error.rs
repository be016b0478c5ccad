use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    // Configuration errors
    #[error("Invalid configuration: {field} - {reason}")]
    ConfigInvalid { field: String, reason: String },

    // Catalog errors
    #[error("Invalid cursor: {cursor} (expected a positive page number)")]
    InvalidCursor { cursor: String },

    #[error("Failed to list prompts: {reason}")]
    ListFailure { reason: String },

    // Prompt resolution errors
    #[error("Prompt not resolvable: {name} ({reason})")]
    PromptNotResolvable { name: String, reason: String },

    // Trace retrieval errors
    #[error("Trace {trace_id} has an invalid structure: {reason}")]
    InvalidTraceStructure { trace_id: String, reason: String },

    #[error("Observation index {index} out of bounds, valid range is [0, {max}]")]
    IndexOutOfBounds { index: usize, max: i64 },

    #[error("Failed to cache trace at {path}: {reason}")]
    CacheWriteFailure { path: String, reason: String },

    #[error("Failed to read cached trace at {path}: {reason}")]
    StorageReadFailure { path: String, reason: String },

    #[error("Remote fetch failed: {reason}")]
    RemoteFetchFailure { reason: String },

    // MCP protocol errors
    #[error("MCP invalid request: {0}")]
    McpInvalidRequest(String),

    #[error("MCP missing parameter: {param}")]
    McpMissingParam { param: String },

    #[error("MCP unknown tool: {tool}")]
    McpUnknownTool { tool: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
