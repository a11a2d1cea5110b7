//! OpenAI-compatible `chat/completions` transport.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::CompletionConfig;
use crate::error::{Error, Result};

use super::{
    ChatMessage, CompletionClient, CompletionReply, OutputSchema, ToolCall, ToolSpec,
    parse_json_content,
};

/// Client for a hosted OpenAI-compatible completion endpoint.
///
/// Structured calls use a JSON-schema `response_format`; tool calls declare
/// functions with `tool_choice` left to the service.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn from_config(config: &CompletionConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            Error::Completion(format!(
                "environment variable {} is not set",
                config.api_key_env
            ))
        })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Completion(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    async fn send(&self, body: &ChatRequest<'_>) -> Result<WireMessage> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("Requesting completion from {} with model {}", url, body.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Completion("completion request timed out".to_string())
                } else {
                    Error::Completion(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Completion(format!(
                "service returned {status}: {detail}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Completion(format!("malformed completion response: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| Error::Completion("completion response had no choices".to_string()))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema: &OutputSchema,
    ) -> Result<Value> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            response_format: Some(response_format(schema)),
            tools: None,
            tool_choice: None,
        };
        let message = self.send(&request).await?;
        let content = message
            .content
            .ok_or_else(|| Error::Completion("structured reply carried no content".to_string()))?;
        parse_json_content(&content)
    }

    async fn complete_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<CompletionReply> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            response_format: None,
            tools: Some(tools.iter().map(tool_payload).collect()),
            tool_choice: Some("auto"),
        };
        let message = self.send(&request).await?;

        if let Some(calls) = message.tool_calls
            && !calls.is_empty()
        {
            return Ok(CompletionReply::ToolCalls(
                calls
                    .into_iter()
                    .map(|c| ToolCall {
                        name: c.function.name,
                        arguments: c.function.arguments,
                    })
                    .collect(),
            ));
        }

        match message.content {
            Some(text) => Ok(CompletionReply::Text(text)),
            None => Err(Error::Completion(
                "reply carried neither text nor tool calls".to_string(),
            )),
        }
    }
}

/// `response_format` payload constraining the reply to `schema`.
fn response_format(schema: &OutputSchema) -> Value {
    serde_json::json!({
        "type": "json_schema",
        "json_schema": {
            "name": schema.name,
            "schema": schema.schema,
        }
    })
}

/// Function-tool payload in the service's wire format.
fn tool_payload(tool: &ToolSpec) -> Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct WireToolCall {
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}
