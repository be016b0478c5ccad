use std::path::PathBuf;

/// Label that marks the served version of a prompt in the remote catalog.
pub const PRODUCTION_LABEL: &str = "production";

/// Settings for the bridge, resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Langfuse public API key (`LANGFUSE_PUBLIC_KEY`).
    pub public_key: String,

    /// Langfuse secret API key (`LANGFUSE_SECRET_KEY`).
    pub secret_key: String,

    /// Base URL of the Langfuse deployment (`LANGFUSE_BASEURL`),
    /// e.g. `https://cloud.langfuse.com`.
    pub base_url: String,

    /// Directory for the on-disk trace cache (`LANGFUSE_CACHE_DIR`).
    ///
    /// Created lazily on first write; one pretty-printed JSON file per trace.
    pub cache_dir: PathBuf,

    /// Catalog page size used when listing prompts (`LANGFUSE_PAGE_SIZE`).
    pub page_size: u32,

    /// Byte size above which an unfiltered trace is returned as a structure
    /// summary instead of the full payload (`LANGFUSE_TRACE_SUMMARY_THRESHOLD`).
    pub trace_summary_threshold: usize,
}

pub(super) fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("langfuse-traces")
}

pub(super) fn default_page_size() -> u32 {
    100
}

pub(super) fn default_trace_summary_threshold() -> usize {
    40 * 1024
}
