//! Integration tests for the on-disk trace cache
//!
//! These tests exercise the write-once cache through the retriever: the
//! first call populates the directory, every later call for the same id is
//! served from disk without touching the remote.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::TempDir;

use mcp_langfuse_bridge::ports::{
    LangfuseClient, PromptKind, PromptListPage, PromptVariant, TraceStore,
};
use mcp_langfuse_bridge::{BridgeError, Result, TraceCache, TraceFilter, TraceRetriever};

/// Remote double that serves one trace and counts how often it is asked.
struct CountingClient {
    trace_id: String,
    trace: Value,
    fetches: AtomicUsize,
}

impl CountingClient {
    fn new(trace_id: &str, trace: Value) -> Self {
        Self {
            trace_id: trace_id.to_string(),
            trace,
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LangfuseClient for CountingClient {
    async fn list_prompts(&self, _page: u32, _limit: u32, _label: &str) -> Result<PromptListPage> {
        Ok(PromptListPage {
            entries: Vec::new(),
            total_pages: 0,
        })
    }

    async fn fetch_prompt(&self, name: &str, _kind: Option<PromptKind>) -> Result<PromptVariant> {
        Err(BridgeError::RemoteFetchFailure {
            reason: format!("prompt '{name}' not found"),
        })
    }

    async fn fetch_trace(&self, trace_id: &str) -> Result<Value> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if trace_id == self.trace_id {
            Ok(self.trace.clone())
        } else {
            Err(BridgeError::RemoteFetchFailure {
                reason: format!("trace '{trace_id}' not found"),
            })
        }
    }
}

fn sample_trace(id: &str) -> Value {
    json!({
        "id": id,
        "observations": [
            {"name": "retrieve", "input": {"query": "x"}, "output": {"hits": 2}},
            {"name": "generate", "input": {"hits": 2}, "output": {"answer": "y"}},
        ],
    })
}

fn retriever(client: Arc<CountingClient>, dir: PathBuf) -> TraceRetriever {
    TraceRetriever::new(client, Arc::new(TraceCache::new(dir)), 40 * 1024)
}

#[tokio::test]
async fn test_first_retrieval_populates_cache_file() {
    let dir = TempDir::new().unwrap();
    let client = Arc::new(CountingClient::new("t-1", sample_trace("t-1")));
    let retriever = retriever(Arc::clone(&client), dir.path().to_path_buf());

    let result = retriever.get_trace("t-1", TraceFilter::None).await;
    assert!(!result.is_error());

    let cache = TraceCache::new(dir.path().to_path_buf());
    let path = cache.path_for("t-1");
    assert!(path.exists());

    let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk["id"], "t-1");
    assert_eq!(client.fetch_count(), 1);
}

#[tokio::test]
async fn test_second_retrieval_served_from_disk() {
    let dir = TempDir::new().unwrap();
    let client = Arc::new(CountingClient::new("t-1", sample_trace("t-1")));

    let first = retriever(Arc::clone(&client), dir.path().to_path_buf())
        .get_trace("t-1", TraceFilter::None)
        .await;

    // A fresh retriever over the same directory must not fetch again
    let second = retriever(Arc::clone(&client), dir.path().to_path_buf())
        .get_trace("t-1", TraceFilter::None)
        .await;

    assert_eq!(client.fetch_count(), 1);
    assert_eq!(first.first_text(), second.first_text());
}

#[tokio::test]
async fn test_cached_record_is_authoritative() {
    let dir = TempDir::new().unwrap();
    let client = Arc::new(CountingClient::new("t-1", sample_trace("t-1")));
    let retriever = retriever(Arc::clone(&client), dir.path().to_path_buf());

    retriever.get_trace("t-1", TraceFilter::None).await;

    // Overwrite the cache entry by hand; the retriever must serve it as-is
    let cache = TraceCache::new(dir.path().to_path_buf());
    let edited = json!({"id": "t-1", "observations": [{"name": "only", "input": 1, "output": 2}]});
    std::fs::write(
        cache.path_for("t-1"),
        serde_json::to_string_pretty(&edited).unwrap(),
    )
    .unwrap();

    let result = retriever.get_trace("t-1", TraceFilter::Name("only".to_string())).await;
    assert!(!result.is_error());
    let payload: Value = serde_json::from_str(result.first_text().unwrap()).unwrap();
    assert_eq!(payload["output"], 2);
    assert_eq!(client.fetch_count(), 1);
}

#[tokio::test]
async fn test_filters_apply_to_cached_traces() {
    let dir = TempDir::new().unwrap();
    let client = Arc::new(CountingClient::new("t-1", sample_trace("t-1")));
    let retriever = retriever(Arc::clone(&client), dir.path().to_path_buf());

    retriever.get_trace("t-1", TraceFilter::None).await;

    let by_index = retriever.get_trace("t-1", TraceFilter::Index(1)).await;
    let payload: Value = serde_json::from_str(by_index.first_text().unwrap()).unwrap();
    assert_eq!(payload["output"]["answer"], "y");

    let out_of_bounds = retriever.get_trace("t-1", TraceFilter::Index(9)).await;
    assert!(out_of_bounds.is_error());
    assert!(out_of_bounds.first_text().unwrap().contains("[0, 1]"));

    assert_eq!(client.fetch_count(), 1);
}

#[tokio::test]
async fn test_trace_id_cannot_escape_cache_directory() {
    let cache_root = TempDir::new().unwrap();
    let cache = TraceCache::new(cache_root.path().to_path_buf());

    let path = cache.path_for("../../etc/passwd");
    assert!(path.starts_with(cache_root.path()));
    assert_eq!(path.file_name().unwrap(), ".._.._etc_passwd.json");
}

#[tokio::test]
async fn test_store_roundtrip() {
    let dir = TempDir::new().unwrap();
    let cache = TraceCache::new(dir.path().join("nested").join("cache"));

    assert!(cache.read("t-9").await.unwrap().is_none());

    // The directory chain is created on first write
    cache.write("t-9", "{\"id\": \"t-9\"}").await.unwrap();
    assert_eq!(
        cache.read("t-9").await.unwrap().as_deref(),
        Some("{\"id\": \"t-9\"}")
    );
}
