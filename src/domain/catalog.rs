//! Catalog Lister
//!
//! Paginates the remote prompt catalog and discovers each entry's template
//! variables, producing a uniform listing page with a continuation cursor.

use std::sync::Arc;

use tracing::{debug, error};

use crate::config::PRODUCTION_LABEL;
use crate::domain::template::extract_variables;
use crate::error::{BridgeError, Result};
use crate::ports::LangfuseClient;

/// A prompt with its discovered argument names. Derived per listing call,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSummary {
    pub name: String,
    pub argument_names: Vec<String>,
}

/// One listing page with an optional continuation cursor.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub entries: Vec<PromptSummary>,
    pub next_cursor: Option<String>,
}

/// Lists the remote catalog with argument discovery.
pub struct CatalogLister {
    client: Arc<dyn LangfuseClient>,
    page_size: u32,
}

impl CatalogLister {
    #[must_use]
    pub fn new(client: Arc<dyn LangfuseClient>, page_size: u32) -> Self {
        Self { client, page_size }
    }

    /// List one catalog page.
    ///
    /// The cursor is an opaque 1-based page number; `None` means the first
    /// page. Every listed entry triggers an independent template fetch with
    /// the remote-side cache bypassed, so a page of N prompts costs N+1
    /// remote calls.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCursor` if the cursor does not parse as a positive
    /// page number, and `ListFailure` for any remote error. Partial results
    /// are never returned.
    pub async fn list(&self, cursor: Option<&str>) -> Result<CatalogPage> {
        let page = parse_cursor(cursor)?;

        let remote_page = self
            .client
            .list_prompts(page, self.page_size, PRODUCTION_LABEL)
            .await
            .map_err(|e| {
                error!(page, error = %e, "Catalog page fetch failed");
                BridgeError::ListFailure {
                    reason: e.to_string(),
                }
            })?;

        let mut entries = Vec::with_capacity(remote_page.entries.len());
        for entry in &remote_page.entries {
            let variant = self
                .client
                .fetch_prompt(&entry.name, None)
                .await
                .map_err(|e| {
                    error!(prompt = %entry.name, error = %e, "Template fetch failed");
                    BridgeError::ListFailure {
                        reason: format!("failed to resolve template for '{}': {e}", entry.name),
                    }
                })?;

            let serialized = serde_json::to_string(&variant.prompt)?;
            let argument_names = extract_variables(&serialized);
            debug!(prompt = %entry.name, arguments = argument_names.len(), "Discovered arguments");

            entries.push(PromptSummary {
                name: entry.name.clone(),
                argument_names,
            });
        }

        let next_cursor = (remote_page.total_pages > page).then(|| (page + 1).to_string());

        Ok(CatalogPage {
            entries,
            next_cursor,
        })
    }
}

fn parse_cursor(cursor: Option<&str>) -> Result<u32> {
    match cursor {
        None => Ok(1),
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(page) if page >= 1 => Ok(page),
            _ => Err(BridgeError::InvalidCursor {
                cursor: raw.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ports::langfuse::mock::MockLangfuseClient;

    fn lister_with(client: MockLangfuseClient, page_size: u32) -> CatalogLister {
        CatalogLister::new(Arc::new(client), page_size)
    }

    // ============== Cursor parsing ==============

    #[test]
    fn test_parse_cursor_none_is_first_page() {
        assert_eq!(parse_cursor(None).unwrap(), 1);
    }

    #[test]
    fn test_parse_cursor_numeric() {
        assert_eq!(parse_cursor(Some("3")).unwrap(), 3);
    }

    #[test]
    fn test_parse_cursor_rejects_non_numeric() {
        let err = parse_cursor(Some("not-a-number")).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidCursor { ref cursor }
            if cursor == "not-a-number"));
    }

    #[test]
    fn test_parse_cursor_rejects_zero() {
        assert!(parse_cursor(Some("0")).is_err());
    }

    #[test]
    fn test_parse_cursor_rejects_negative() {
        assert!(parse_cursor(Some("-2")).is_err());
    }

    // ============== Listing ==============

    #[tokio::test]
    async fn test_list_discovers_arguments_in_order() {
        let mut client = MockLangfuseClient::new();
        client.add_catalog_entry("summarize");
        client.add_variant(
            "summarize",
            None,
            json!("Summarize {{doc}} for {{audience}}, citing {{doc}}"),
        );
        client.total_pages = 1;

        let page = lister_with(client, 100).list(None).await.unwrap();

        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].name, "summarize");
        assert_eq!(page.entries[0].argument_names, vec!["doc", "audience"]);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_list_emits_next_cursor_when_more_pages() {
        let mut client = MockLangfuseClient::new();
        for i in 0..4 {
            let name = format!("p{i}");
            client.add_catalog_entry(&name);
            client.add_variant(&name, None, json!("no vars"));
        }
        client.total_pages = 2;

        let page = lister_with(client, 2).list(None).await.unwrap();

        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.next_cursor.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_list_last_page_has_no_cursor() {
        let mut client = MockLangfuseClient::new();
        for i in 0..4 {
            let name = format!("p{i}");
            client.add_catalog_entry(&name);
            client.add_variant(&name, None, json!("no vars"));
        }
        client.total_pages = 2;

        let page = lister_with(client, 2).list(Some("2")).await.unwrap();

        assert_eq!(page.entries[0].name, "p2");
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_list_remote_failure_becomes_list_failure() {
        let client = MockLangfuseClient::new();
        client.fail_from_now_on();

        let err = lister_with(client, 100).list(None).await.unwrap_err();
        assert!(matches!(err, BridgeError::ListFailure { .. }));
    }

    #[tokio::test]
    async fn test_list_template_fetch_failure_returns_no_partial_page() {
        let mut client = MockLangfuseClient::new();
        client.add_catalog_entry("good");
        client.add_variant("good", None, json!("fine"));
        client.add_catalog_entry("broken"); // no variant registered
        client.total_pages = 1;

        let err = lister_with(client, 100).list(None).await.unwrap_err();
        assert!(matches!(err, BridgeError::ListFailure { ref reason }
            if reason.contains("broken")));
    }

    #[tokio::test]
    async fn test_list_invalid_cursor_fails_before_remote_call() {
        let client = MockLangfuseClient::new();
        client.fail_from_now_on();

        // Cursor validation happens first, so we must see InvalidCursor,
        // not the remote failure.
        let err = lister_with(client, 100).list(Some("abc")).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidCursor { .. }));
    }
}
