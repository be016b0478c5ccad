//! Tool Handler Port
//!
//! This module defines the trait for MCP tool handlers, enabling a
//! plugin-like architecture where each tool can be implemented
//! independently.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::protocol::ToolCallResult;
use crate::config::Settings;
use crate::domain::{CatalogLister, PromptResolver, TraceRetriever};
use crate::error::Result;

/// Schema definition for a tool
#[derive(Debug, Clone)]
pub struct ToolSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: &'static str,
}

/// Context provided to tool handlers during execution.
///
/// Carries the three pipelines; they share nothing beyond the remote
/// client handle and the cache storage they were constructed with.
pub struct ToolContext {
    pub settings: Arc<Settings>,
    pub lister: Arc<CatalogLister>,
    pub resolver: Arc<PromptResolver>,
    pub retriever: Arc<TraceRetriever>,
}

impl ToolContext {
    #[must_use]
    pub fn new(
        settings: Arc<Settings>,
        lister: Arc<CatalogLister>,
        resolver: Arc<PromptResolver>,
        retriever: Arc<TraceRetriever>,
    ) -> Self {
        Self {
            settings,
            lister,
            resolver,
            retriever,
        }
    }
}

/// Trait for tool handlers
///
/// Each tool in the MCP server implements this trait, providing
/// a consistent interface for tool registration and execution.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Get the tool's name (used for routing)
    fn name(&self) -> &'static str;

    /// Get the tool's description
    fn description(&self) -> &'static str;

    /// Get the tool's input schema as a JSON string
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with the given arguments
    ///
    /// # Arguments
    /// * `args` - The tool arguments as a JSON value
    /// * `ctx` - The execution context with dependencies
    ///
    /// # Returns
    /// The tool result, either success or error
    async fn execute(&self, args: Option<Value>, ctx: &ToolContext) -> Result<ToolCallResult>;
}

#[cfg(test)]
pub mod mock {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::TraceCache;
    use crate::ports::LangfuseClient;
    use crate::ports::langfuse::mock::MockLangfuseClient;

    /// Build a test context around a canned client and cache directory.
    #[must_use]
    pub fn create_test_context(client: MockLangfuseClient, cache_dir: PathBuf) -> ToolContext {
        let settings = Settings {
            public_key: "pk-lf-test".to_string(),
            secret_key: "sk-lf-test".to_string(),
            base_url: "https://cloud.langfuse.test".to_string(),
            cache_dir: cache_dir.clone(),
            page_size: 100,
            trace_summary_threshold: 40 * 1024,
        };

        let client: Arc<dyn LangfuseClient> = Arc::new(client);

        ToolContext::new(
            Arc::new(settings.clone()),
            Arc::new(CatalogLister::new(Arc::clone(&client), settings.page_size)),
            Arc::new(PromptResolver::new(Arc::clone(&client))),
            Arc::new(TraceRetriever::new(
                client,
                Arc::new(TraceCache::new(cache_dir)),
                settings.trace_summary_threshold,
            )),
        )
    }
}
