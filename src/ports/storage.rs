//! Trace Store Port
//!
//! Storage handle for the trace cache. The retriever owns no global
//! state; the caller constructs a store and passes it in, which also
//! lets tests substitute a double.

use async_trait::async_trait;

use crate::error::Result;

/// Keyed, write-once trace storage.
#[async_trait]
pub trait TraceStore: Send + Sync {
    /// Read a stored entry.
    ///
    /// # Errors
    ///
    /// A missing entry is `Ok(None)`; any other failure is a
    /// `StorageReadFailure` and must not be masked as a miss.
    async fn read(&self, trace_id: &str) -> Result<Option<String>>;

    /// Persist an entry.
    ///
    /// # Errors
    ///
    /// Returns `CacheWriteFailure`. Callers log and continue; a failed
    /// write never aborts a retrieval that otherwise succeeded.
    async fn write(&self, trace_id: &str, content: &str) -> Result<()>;
}
