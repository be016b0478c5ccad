pub mod catalog;
pub mod resolver;
pub mod template;
pub mod trace;

pub use catalog::{CatalogLister, CatalogPage, PromptSummary};
pub use resolver::{ChatTurn, CompiledPrompt, PromptResolver, Role};
pub use trace::{TraceCache, TraceFilter, TraceRetriever};
