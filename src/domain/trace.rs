//! Trace Retriever
//!
//! Fetches execution traces through a write-once file cache and filters
//! them down so a caller never receives an unbounded payload.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::error::{BridgeError, Result};
use crate::ports::{LangfuseClient, ToolCallResult, TraceStore};

/// On-disk trace store, one pretty-printed JSON file per id.
///
/// The directory is created lazily on first write and never torn down. A
/// written entry is treated as immutable and authoritative for its id;
/// there is no invalidation or refresh path. Concurrent writers racing on
/// the same id are not synchronized, the last writer wins.
pub struct TraceCache {
    dir: PathBuf,
}

impl TraceCache {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Deterministic cache path for a trace id. Path separators and other
    /// non-filename characters in the id are flattened so an id can never
    /// escape the cache directory.
    #[must_use]
    pub fn path_for(&self, trace_id: &str) -> PathBuf {
        let safe: String = trace_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

#[async_trait]
impl TraceStore for TraceCache {
    async fn read(&self, trace_id: &str) -> Result<Option<String>> {
        let path = self.path_for(trace_id);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BridgeError::StorageReadFailure {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn write(&self, trace_id: &str, content: &str) -> Result<()> {
        let path = self.path_for(trace_id);
        let write = async {
            tokio::fs::create_dir_all(&self.dir).await?;
            tokio::fs::write(&path, content).await
        };
        write.await.map_err(|e| BridgeError::CacheWriteFailure {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Filter mode for trace retrieval, resolved once at the entry point.
/// Index and name filters are mutually exclusive; index wins when a caller
/// supplies both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceFilter {
    Index(usize),
    Name(String),
    None,
}

impl TraceFilter {
    /// Resolve the raw request inputs into a single filter mode.
    #[must_use]
    pub fn from_args(function_name: Option<String>, index: Option<u64>) -> Self {
        if let Some(index) = index {
            return Self::Index(index as usize);
        }
        match function_name {
            Some(name) => Self::Name(name),
            None => Self::None,
        }
    }
}

/// Retrieves and filters execution traces.
pub struct TraceRetriever {
    client: Arc<dyn LangfuseClient>,
    store: Arc<dyn TraceStore>,
    summary_threshold: usize,
}

impl TraceRetriever {
    #[must_use]
    pub fn new(
        client: Arc<dyn LangfuseClient>,
        store: Arc<dyn TraceStore>,
        summary_threshold: usize,
    ) -> Self {
        Self {
            client,
            store,
            summary_threshold,
        }
    }

    /// Retrieve a trace and apply the given filter.
    ///
    /// This is the pipeline boundary: every failure is caught here, logged,
    /// and returned as an error-flagged result carrying the id, so the
    /// dispatcher always gets a well-formed response.
    pub async fn get_trace(&self, trace_id: &str, filter: TraceFilter) -> ToolCallResult {
        match self.retrieve(trace_id, filter).await {
            Ok(result) => result,
            Err(e) => {
                error!(trace_id = %trace_id, error = %e, "Trace retrieval failed");
                ToolCallResult::error(format!("Failed to retrieve trace {trace_id}: {e}"))
            }
        }
    }

    async fn retrieve(&self, trace_id: &str, filter: TraceFilter) -> Result<ToolCallResult> {
        let record = self.load_record(trace_id).await?;

        let Some(observations) = record.get("observations").and_then(Value::as_array) else {
            let e = BridgeError::InvalidTraceStructure {
                trace_id: trace_id.to_string(),
                reason: "'observations' is missing or not an array".to_string(),
            };
            return Ok(ToolCallResult::error(e.to_string()));
        };

        match filter {
            TraceFilter::Index(index) => Ok(pick_by_index(trace_id, observations, index)),
            TraceFilter::Name(name) => Ok(pick_by_name(trace_id, observations, &name)),
            TraceFilter::None => self.full_or_summary(trace_id, &record, observations),
        }
    }

    /// Cache-or-fetch: a missing cache entry triggers a remote fetch plus a
    /// best-effort write-back; any other storage failure is fatal for the
    /// call.
    async fn load_record(&self, trace_id: &str) -> Result<Value> {
        if let Some(cached) = self.store.read(trace_id).await? {
            debug!(trace_id = %trace_id, "Trace served from cache");
            return Ok(serde_json::from_str(&cached)?);
        }

        let record = self.client.fetch_trace(trace_id).await?;
        info!(trace_id = %trace_id, "Trace fetched from remote");

        let serialized = serde_json::to_string_pretty(&record)?;
        if let Err(e) = self.store.write(trace_id, &serialized).await {
            // Non-fatal: the fetched record is still used.
            warn!(trace_id = %trace_id, error = %e, "Trace cache write failed");
        }

        Ok(record)
    }

    fn full_or_summary(
        &self,
        trace_id: &str,
        record: &Value,
        observations: &[Value],
    ) -> Result<ToolCallResult> {
        let serialized = serde_json::to_string_pretty(record)?;

        if serialized.len() <= self.summary_threshold {
            return Ok(ToolCallResult::text(serialized));
        }

        let summary: Vec<Value> = observations
            .iter()
            .enumerate()
            .map(|(index, obs)| {
                json!({
                    "index": index,
                    "name": obs.get("name").and_then(Value::as_str).unwrap_or(""),
                })
            })
            .collect();

        let text = format!(
            "Trace {trace_id} is {} bytes, above the {} byte limit. \
             Returning the observation structure instead; re-invoke with an \
             index or functionName filter to fetch one observation.\n{}",
            serialized.len(),
            self.summary_threshold,
            serde_json::to_string_pretty(&summary)?
        );

        Ok(ToolCallResult::text(text))
    }
}

fn observation_io(observation: &Value) -> Value {
    json!({
        "input": observation.get("input").cloned().unwrap_or(Value::Null),
        "output": observation.get("output").cloned().unwrap_or(Value::Null),
    })
}

fn pick_by_index(trace_id: &str, observations: &[Value], index: usize) -> ToolCallResult {
    let Some(observation) = observations.get(index) else {
        let e = BridgeError::IndexOutOfBounds {
            index,
            max: observations.len() as i64 - 1,
        };
        return ToolCallResult::error(format!("Trace {trace_id}: {e}"));
    };

    match serde_json::to_string_pretty(&observation_io(observation)) {
        Ok(text) => ToolCallResult::text(text),
        Err(e) => ToolCallResult::error(format!("Failed to serialize observation: {e}")),
    }
}

fn pick_by_name(trace_id: &str, observations: &[Value], name: &str) -> ToolCallResult {
    let matches: Vec<(usize, &Value)> = observations
        .iter()
        .enumerate()
        .filter(|(_, obs)| obs.get("name").and_then(Value::as_str) == Some(name))
        .collect();

    match matches.as_slice() {
        [] => ToolCallResult::text(format!(
            "No observation named '{name}' found in trace {trace_id}."
        )),
        [(_, observation)] => match serde_json::to_string_pretty(&observation_io(observation)) {
            Ok(text) => ToolCallResult::text(text),
            Err(e) => ToolCallResult::error(format!("Failed to serialize observation: {e}")),
        },
        many => {
            let listing: Vec<Value> = many
                .iter()
                .map(|(index, _)| json!({"originalIndex": index, "name": name}))
                .collect();
            let listing_text = serde_json::to_string_pretty(&listing)
                .unwrap_or_else(|e| format!("<serialization error: {e}>"));
            ToolCallResult::text(format!(
                "{} observations named '{name}' found in trace {trace_id}. \
                 Re-invoke with the index parameter to select one.\n{listing_text}",
                many.len()
            ))
        }
    }
}
