//! Remote Client Port
//!
//! Defines the trait for the Langfuse remote collaborator. The three
//! pipelines depend only on this port, so the HTTP adapter can be swapped
//! for a canned test double.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;

/// Variant kind requested from the remote prompt store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// Multi-turn message template.
    Chat,
    /// Single-block text template.
    Text,
}

impl PromptKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Text => "text",
        }
    }
}

/// One entry of a remote catalog page.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptListEntry {
    pub name: String,
}

/// One page of the remote catalog.
#[derive(Debug, Clone)]
pub struct PromptListPage {
    pub entries: Vec<PromptListEntry>,
    /// Total number of pages the remote reports for the current filter.
    pub total_pages: u32,
}

/// A fetched prompt variant: the remote's type tag plus the raw template
/// payload (message array for chat, plain string for text).
#[derive(Debug, Clone)]
pub struct PromptVariant {
    pub name: String,
    pub kind: String,
    pub prompt: Value,
}

/// Remote catalog, prompt, and trace access.
#[async_trait]
pub trait LangfuseClient: Send + Sync {
    /// Fetch one catalog page filtered to `label`.
    async fn list_prompts(&self, page: u32, limit: u32, label: &str) -> Result<PromptListPage>;

    /// Fetch the production variant of a named prompt, always bypassing any
    /// remote-side cache. `kind` is a hint for stores that distinguish
    /// structured and flat templates; `None` accepts whatever is stored.
    async fn fetch_prompt(&self, name: &str, kind: Option<PromptKind>) -> Result<PromptVariant>;

    /// Fetch a full execution trace by id.
    async fn fetch_trace(&self, trace_id: &str) -> Result<Value>;
}
