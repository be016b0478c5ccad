pub mod langfuse;
pub mod protocol;
pub mod storage;
pub mod tools;

pub use langfuse::{LangfuseClient, PromptKind, PromptListEntry, PromptListPage, PromptVariant};
pub use protocol::{PromptArgument, PromptContent, PromptMessage, ToolCallResult, ToolContent};
pub use storage::TraceStore;
pub use tools::{ToolContext, ToolHandler, ToolSchema};
