//! Prompt Resolver
//!
//! Fetches one named prompt, preferring the structured (chat) variant and
//! falling back to flat text, compiles the caller's arguments into the
//! template, and normalizes the result into role-tagged messages.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::domain::template::compile;
use crate::error::{BridgeError, Result};
use crate::ports::{LangfuseClient, PromptKind, PromptMessage};

/// Message role after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a compiled chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

/// A compiled prompt, tagged by variant. Produced fresh per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledPrompt {
    Chat(Vec<ChatTurn>),
    Text(String),
}

/// Outcome of a single variant attempt. An unresolved attempt is an
/// expected alternative path, not an exceptional one, so it carries a
/// reason instead of an error.
enum Attempt {
    Resolved(CompiledPrompt),
    Unresolved(String),
}

/// Resolves named prompts into message sequences.
pub struct PromptResolver {
    client: Arc<dyn LangfuseClient>,
}

impl PromptResolver {
    #[must_use]
    pub fn new(client: Arc<dyn LangfuseClient>) -> Self {
        Self { client }
    }

    /// Resolve a prompt into role-tagged messages.
    ///
    /// # Errors
    ///
    /// Returns `PromptNotResolvable` when both the chat and the text
    /// attempt fail; no partial compilation is returned.
    pub async fn resolve(
        &self,
        name: &str,
        arguments: &HashMap<String, String>,
    ) -> Result<Vec<PromptMessage>> {
        let chat_reason = match self.attempt(name, PromptKind::Chat, arguments).await {
            Attempt::Resolved(compiled) => return Ok(normalize(compiled)),
            Attempt::Unresolved(reason) => reason,
        };

        debug!(prompt = %name, reason = %chat_reason, "Chat variant unresolved, trying text");

        match self.attempt(name, PromptKind::Text, arguments).await {
            Attempt::Resolved(compiled) => Ok(normalize(compiled)),
            Attempt::Unresolved(text_reason) => Err(BridgeError::PromptNotResolvable {
                name: name.to_string(),
                reason: format!("chat: {chat_reason}; text: {text_reason}"),
            }),
        }
    }

    async fn attempt(
        &self,
        name: &str,
        kind: PromptKind,
        arguments: &HashMap<String, String>,
    ) -> Attempt {
        let variant = match self.client.fetch_prompt(name, Some(kind)).await {
            Ok(variant) => variant,
            Err(e) => return Attempt::Unresolved(e.to_string()),
        };

        match kind {
            PromptKind::Chat => {
                if variant.kind != "chat" {
                    return Attempt::Unresolved(format!(
                        "expected chat variant, remote returned '{}'",
                        variant.kind
                    ));
                }
                compile_chat(&variant.prompt, arguments)
            }
            PromptKind::Text => compile_text(&variant.prompt, arguments),
        }
    }
}

fn compile_chat(prompt: &Value, arguments: &HashMap<String, String>) -> Attempt {
    let Some(messages) = prompt.as_array() else {
        return Attempt::Unresolved("chat payload is not a message array".to_string());
    };

    let mut turns = Vec::with_capacity(messages.len());
    for message in messages {
        let role = message
            .get("role")
            .and_then(Value::as_str)
            .unwrap_or("user");
        let Some(content) = message.get("content").and_then(Value::as_str) else {
            return Attempt::Unresolved("chat message has no text content".to_string());
        };

        turns.push(ChatTurn {
            role: normalize_role(role),
            text: compile(content, arguments),
        });
    }

    Attempt::Resolved(CompiledPrompt::Chat(turns))
}

fn compile_text(prompt: &Value, arguments: &HashMap<String, String>) -> Attempt {
    match prompt.as_str() {
        Some(template) => Attempt::Resolved(CompiledPrompt::Text(compile(template, arguments))),
        None => Attempt::Unresolved("text payload is not a string".to_string()),
    }
}

/// Remote roles `ai` and `assistant` map to assistant; everything else,
/// including `system`, maps to user.
fn normalize_role(remote_role: &str) -> Role {
    if matches!(remote_role, "ai" | "assistant") {
        Role::Assistant
    } else {
        Role::User
    }
}

fn normalize(compiled: CompiledPrompt) -> Vec<PromptMessage> {
    match compiled {
        CompiledPrompt::Chat(turns) => turns
            .into_iter()
            .map(|turn| match turn.role {
                Role::User => PromptMessage::user(turn.text),
                Role::Assistant => PromptMessage::assistant(turn.text),
            })
            .collect(),
        CompiledPrompt::Text(text) => vec![PromptMessage::user(text)],
    }
}
