//! MCP Protocol Contract Types
//!
//! These types define the contracts used in port trait signatures
//! (`ToolHandler`). They live in the ports layer because they are part of
//! the interface definition, not adapter implementation details.
//!
//! The MCP adapter module re-exports these types via `crate::mcp::protocol`.

use serde::Serialize;
use serde_json::Value;

// ============================================================================
// Tool Contract Types
// ============================================================================

/// MCP Tool Call Result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content block within a tool result.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

impl ToolCallResult {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: None,
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: Some(true),
        }
    }

    /// First text block of the result, if any.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|c| {
            let ToolContent::Text { text } = c;
            text.as_str()
        })
    }

    /// Whether this result carries the error flag.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.is_error == Some(true)
    }
}

// ============================================================================
// Prompt Contract Types
// ============================================================================

/// MCP Prompt Argument definition
#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
}

impl PromptArgument {
    /// An argument discovered from the remote template. The catalog carries
    /// no required/optional metadata, so every argument is optional.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            required: false,
        }
    }
}

/// MCP Prompt Message (part of get response)
#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: PromptContent,
}

/// MCP Prompt Content
#[derive(Debug, Clone, Serialize)]
pub struct PromptContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl PromptMessage {
    /// Create a user message
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: PromptContent {
                content_type: "text".to_string(),
                text: text.into(),
            },
        }
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: PromptContent {
                content_type: "text".to_string(),
                text: text.into(),
            },
        }
    }
}

/// Structured view of a tool result, useful for callers that want to parse
/// the text payload back into JSON.
pub fn result_as_json(result: &ToolCallResult) -> Option<Value> {
    result
        .first_text()
        .and_then(|text| serde_json::from_str(text).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // ToolCallResult tests
    // ========================================================================

    #[test]
    fn test_text_result_structure() {
        let result = ToolCallResult::text("ok");
        assert_eq!(result.content.len(), 1);
        assert_eq!(result.first_text(), Some("ok"));
        assert!(!result.is_error());
    }

    #[test]
    fn test_error_result_has_is_error_true() {
        let result = ToolCallResult::error("fail");
        assert!(result.is_error());
    }

    #[test]
    fn test_text_result_serialization() {
        let result = ToolCallResult::text("hello");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][0]["text"], "hello");
        // isError should be absent (None skipped)
        assert!(json.get("isError").is_none());
    }

    #[test]
    fn test_error_result_serialization() {
        let result = ToolCallResult::error("something broke");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["isError"], true);
        assert_eq!(json["content"][0]["text"], "something broke");
    }

    #[test]
    fn test_result_as_json_parses_payload() {
        let result = ToolCallResult::text(r#"{"count": 3}"#);
        let parsed = result_as_json(&result).unwrap();
        assert_eq!(parsed["count"], 3);
    }

    #[test]
    fn test_result_as_json_none_for_plain_text() {
        let result = ToolCallResult::text("not json at all");
        assert!(result_as_json(&result).is_none());
    }

    // ========================================================================
    // PromptArgument tests
    // ========================================================================

    #[test]
    fn test_optional_argument_not_required() {
        let arg = PromptArgument::optional("city");
        assert_eq!(arg.name, "city");
        assert!(!arg.required);
        assert!(arg.description.is_none());
    }

    #[test]
    fn test_argument_serialization_skips_empty_description() {
        let arg = PromptArgument::optional("city");
        let json = serde_json::to_value(&arg).unwrap();
        assert!(json.get("description").is_none());
        assert_eq!(json["required"], false);
    }

    // ========================================================================
    // PromptMessage tests
    // ========================================================================

    #[test]
    fn test_user_message_role() {
        let msg = PromptMessage::user("hello");
        assert_eq!(msg.role, "user");
        assert_eq!(msg.content.content_type, "text");
        assert_eq!(msg.content.text, "hello");
    }

    #[test]
    fn test_assistant_message_role() {
        let msg = PromptMessage::assistant("response");
        assert_eq!(msg.role, "assistant");
        assert_eq!(msg.content.text, "response");
    }

    #[test]
    fn test_prompt_message_serialization() {
        let msg = PromptMessage::user("summarize this");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"]["type"], "text");
        assert_eq!(json["content"]["text"], "summarize this");
    }
}
