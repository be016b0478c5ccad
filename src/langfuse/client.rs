//! HTTP adapter for the Langfuse public REST API.
//!
//! Implements the `LangfuseClient` port with basic-auth requests against
//! a Langfuse deployment. Every call goes straight to the remote; there
//! is no client-side caching here, so template fetches are always fresh.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{PRODUCTION_LABEL, Settings};
use crate::error::{BridgeError, Result};
use crate::ports::{LangfuseClient, PromptKind, PromptListEntry, PromptListPage, PromptVariant};

/// Langfuse REST client.
pub struct HttpLangfuseClient {
    http: reqwest::Client,
    base_url: String,
    public_key: String,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct ApiPromptList {
    data: Vec<PromptListEntry>,
    meta: ApiListMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiListMeta {
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct ApiPrompt {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    prompt: Value,
}

impl HttpLangfuseClient {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            public_key: settings.public_key.clone(),
            secret_key: settings.secret_key.clone(),
        }
    }

    async fn get_json(&self, url: String, query: &[(&str, String)]) -> Result<Value> {
        debug!(url = %url, "Langfuse API request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .basic_auth(&self.public_key, Some(&self.secret_key))
            .send()
            .await
            .map_err(|e| BridgeError::RemoteFetchFailure {
                reason: format!("request to {url} failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::RemoteFetchFailure {
                reason: format!("HTTP {status} from {url}"),
            });
        }

        response
            .json()
            .await
            .map_err(|e| BridgeError::RemoteFetchFailure {
                reason: format!("invalid JSON from {url}: {e}"),
            })
    }
}

#[async_trait]
impl LangfuseClient for HttpLangfuseClient {
    async fn list_prompts(&self, page: u32, limit: u32, label: &str) -> Result<PromptListPage> {
        let body = self
            .get_json(
                format!("{}/api/public/v2/prompts", self.base_url),
                &[
                    ("page", page.to_string()),
                    ("limit", limit.to_string()),
                    ("label", label.to_string()),
                ],
            )
            .await?;

        let list: ApiPromptList =
            serde_json::from_value(body).map_err(|e| BridgeError::RemoteFetchFailure {
                reason: format!("unexpected prompt list shape: {e}"),
            })?;

        Ok(PromptListPage {
            entries: list.data,
            total_pages: list.meta.total_pages,
        })
    }

    async fn fetch_prompt(&self, name: &str, kind: Option<PromptKind>) -> Result<PromptVariant> {
        if let Some(kind) = kind {
            debug!(prompt = %name, kind = kind.as_str(), "Fetching prompt variant");
        }

        let body = self
            .get_json(
                format!("{}/api/public/v2/prompts/{name}", self.base_url),
                &[("label", PRODUCTION_LABEL.to_string())],
            )
            .await?;

        let prompt: ApiPrompt =
            serde_json::from_value(body).map_err(|e| BridgeError::RemoteFetchFailure {
                reason: format!("unexpected prompt shape for '{name}': {e}"),
            })?;

        Ok(PromptVariant {
            name: prompt.name,
            kind: prompt.kind,
            prompt: prompt.prompt,
        })
    }

    async fn fetch_trace(&self, trace_id: &str) -> Result<Value> {
        self.get_json(
            format!("{}/api/public/traces/{trace_id}", self.base_url),
            &[],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_list_deserialization() {
        let body = serde_json::json!({
            "data": [
                {"name": "summarize", "labels": ["production"], "versions": [3]},
                {"name": "review", "labels": ["production"]},
            ],
            "meta": {"page": 1, "limit": 100, "totalItems": 2, "totalPages": 1},
        });

        let list: ApiPromptList = serde_json::from_value(body).unwrap();
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.data[0].name, "summarize");
        assert_eq!(list.meta.total_pages, 1);
    }

    #[test]
    fn test_prompt_deserialization_keeps_raw_payload() {
        let body = serde_json::json!({
            "name": "review",
            "type": "chat",
            "prompt": [{"role": "user", "content": "hi {{name}}"}],
            "version": 4,
            "labels": ["production"],
        });

        let prompt: ApiPrompt = serde_json::from_value(body).unwrap();
        assert_eq!(prompt.kind, "chat");
        assert!(prompt.prompt.is_array());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let settings = Settings {
            public_key: "pk".to_string(),
            secret_key: "sk".to_string(),
            base_url: "https://cloud.langfuse.com/".to_string(),
            cache_dir: std::env::temp_dir(),
            page_size: 100,
            trace_summary_threshold: 40 * 1024,
        };

        let client = HttpLangfuseClient::new(&settings);
        assert_eq!(client.base_url, "https://cloud.langfuse.com");
    }
}
