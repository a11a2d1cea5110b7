//! Completion-service adapter: message types, declared tools, structured
//! output schemas, and the client trait the agents are written against.
//!
//! Agents receive the client as an explicit `&dyn CompletionClient`, so
//! tests script replies without touching the network.

mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

// ============================================================================
// Conversation Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One (role, content) pair of the conversation sent to the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ============================================================================
// Schemas and Tools
// ============================================================================

/// A named JSON schema the service is constrained to reply with.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

impl OutputSchema {
    /// Derive the schema from a `JsonSchema` type.
    pub fn of<T: JsonSchema>(name: &str) -> Self {
        let schema = schemars::schema_for!(T);
        Self {
            name: name.to_string(),
            schema: serde_json::to_value(schema).expect("schema serialization cannot fail"),
        }
    }
}

/// A named, schema-described callable offered to the service.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON Schema of the tool's arguments.
    pub parameters: Value,
}

/// A tool selection emitted by the service: tool name plus the raw JSON
/// argument string, parsed later against the tool's schema.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub name: String,
    pub arguments: String,
}

/// Outcome of a tool-enabled completion turn.
#[derive(Debug, Clone)]
pub enum CompletionReply {
    /// Free-text assistant reply.
    Text(String),
    /// The service selected one or more declared tools.
    ToolCalls(Vec<ToolCall>),
}

// ============================================================================
// Client Trait
// ============================================================================

/// One blocking round trip per call: no retry, no caching, no streaming.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request a reply constrained to `schema`. Returns the raw JSON value;
    /// callers validate and deserialize via [`request_structured`].
    async fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema: &OutputSchema,
    ) -> Result<Value>;

    /// Free-form chat turn with declared tools; tool choice is left to the
    /// service.
    async fn complete_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<CompletionReply>;
}

/// Run a structured completion and deserialize the validated result.
pub async fn request_structured<T>(
    client: &dyn CompletionClient,
    messages: &[ChatMessage],
    schema_name: &str,
) -> Result<T>
where
    T: DeserializeOwned + JsonSchema,
{
    let schema = OutputSchema::of::<T>(schema_name);
    let value = client.complete_structured(messages, &schema).await?;
    validate_against(&schema.schema, &value)?;
    serde_json::from_value(value).map_err(|e| Error::SchemaValidation(e.to_string()))
}

/// Validate a reply against the declared schema before deserializing.
pub fn validate_against(schema: &Value, instance: &Value) -> Result<()> {
    let validator =
        jsonschema::validator_for(schema).map_err(|e| Error::SchemaValidation(e.to_string()))?;
    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| e.to_string())
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::SchemaValidation(errors.join("; ")))
    }
}

// ============================================================================
// Reply Parsing
// ============================================================================

/// Parse a structured reply's content into JSON.
///
/// Constrained replies are normally clean JSON; the fenced fallback covers
/// services that wrap the payload in markdown anyway.
pub fn parse_json_content(content: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str(content) {
        return Ok(value);
    }
    if let Some(block) = extract_json_block(content) {
        return serde_json::from_str(block)
            .map_err(|e| Error::Completion(format!("reply is not valid JSON: {e}")));
    }
    Err(Error::Completion(
        "reply carried no parseable JSON payload".to_string(),
    ))
}

/// Extract a JSON object from markdown-wrapped reply text: a ```json (or
/// bare ```) fence first, then the outermost braces.
pub fn extract_json_block(text: &str) -> Option<&str> {
    for fence in ["```json", "```"] {
        if let Some(start) = text.find(fence) {
            let body = &text[start + fence.len()..];
            if let Some(end) = body.find("```") {
                let candidate = body[..end].trim();
                if candidate.starts_with('{') {
                    return Some(candidate);
                }
            }
        }
    }

    if let Some(start) = text.find('{')
        && let Some(end) = text.rfind('}')
        && start < end
    {
        return Some(&text[start..=end]);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_labelled_fence() {
        let text = "Here you go:\n```json\n{\"week\": 1}\n```\n";
        assert_eq!(extract_json_block(text), Some(r#"{"week": 1}"#));
    }

    #[test]
    fn test_extract_json_from_bare_fence() {
        let text = "```\n{\"week\": 2}\n```";
        assert_eq!(extract_json_block(text), Some(r#"{"week": 2}"#));
    }

    #[test]
    fn test_extract_raw_json_object() {
        let text = "prefix {\"a\": {\"b\": 1}} suffix";
        assert_eq!(extract_json_block(text), Some(r#"{"a": {"b": 1}}"#));
    }

    #[test]
    fn test_extract_returns_none_without_json() {
        assert_eq!(extract_json_block("no structured payload here"), None);
    }

    #[test]
    fn test_parse_json_content_prefers_direct_parse() {
        let value = parse_json_content(r#"{"score": 80}"#).unwrap();
        assert_eq!(value["score"], 80);
    }

    #[test]
    fn test_parse_json_content_falls_back_to_fence() {
        let value = parse_json_content("text\n```json\n{\"score\": 90}\n```").unwrap();
        assert_eq!(value["score"], 90);
    }

    #[test]
    fn test_parse_json_content_rejects_prose() {
        assert!(matches!(
            parse_json_content("I could not produce a plan."),
            Err(Error::Completion(_))
        ));
    }

    #[test]
    fn test_validate_against_flags_wrong_shape() {
        #[derive(serde::Deserialize, schemars::JsonSchema)]
        struct Reply {
            #[allow(dead_code)]
            score: f64,
        }

        let schema = OutputSchema::of::<Reply>("reply");
        let ok = serde_json::json!({"score": 42.0});
        let bad = serde_json::json!({"score": "high"});
        assert!(validate_against(&schema.schema, &ok).is_ok());
        assert!(matches!(
            validate_against(&schema.schema, &bad),
            Err(Error::SchemaValidation(_))
        ));
    }

    #[test]
    fn test_message_roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }
}
