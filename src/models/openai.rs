//! OpenAI chat-completions provider.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::{AgentError, AgentResult};
use crate::models::{Completion, Content, Conversation, LanguageModel, Part, Role, TokenUsage};
use crate::tools::{ToolCall, Toolset};

/// Environment variable holding the API key for [`OpenAiChat::from_env`].
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// [`LanguageModel`] backed by the OpenAI chat completions API.
///
/// Also works against OpenAI-compatible endpoints via
/// [`with_base_url`](OpenAiChat::with_base_url).
pub struct OpenAiChat {
    model_name: String,
    api_key: String,
    base_url: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    client: reqwest::Client,
}

impl OpenAiChat {
    pub fn new(model_name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: None,
            max_tokens: None,
            client: reqwest::Client::new(),
        }
    }

    /// Reads the API key from the `OPENAI_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or empty.
    pub fn from_env(model_name: impl Into<String>) -> AgentResult<Self> {
        let api_key =
            std::env::var(API_KEY_ENV).map_err(|_| AgentError::MissingConfiguration {
                field: API_KEY_ENV.to_string(),
            })?;
        if api_key.trim().is_empty() {
            return Err(AgentError::InvalidConfiguration {
                field: API_KEY_ENV.to_string(),
                reason: "value is empty".to_string(),
            });
        }
        Ok(Self::new(model_name, api_key))
    }

    /// Overrides the endpoint URL, for proxies and compatible servers.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    async fn build_payload(
        &self,
        conversation: &Conversation,
        toolset: Option<&Arc<dyn Toolset>>,
    ) -> Value {
        let mut messages = Vec::new();

        if let Some(system) = conversation.system() {
            messages.push(json!({"role": "system", "content": system}));
        }

        for message in conversation.messages() {
            match message.role() {
                Role::System => {
                    if let Some(text) = message.content().joined_texts() {
                        messages.push(json!({"role": "system", "content": text}));
                    }
                }
                Role::User => {
                    if let Some(text) = message.content().joined_texts() {
                        messages.push(json!({"role": "user", "content": text}));
                    }
                }
                Role::Assistant => {
                    let mut entry = json!({"role": "assistant"});
                    if let Some(text) = message.content().joined_texts() {
                        entry["content"] = Value::String(text);
                    } else {
                        entry["content"] = Value::Null;
                    }
                    let calls = message.content().tool_calls();
                    if !calls.is_empty() {
                        entry["tool_calls"] = Value::Array(
                            calls
                                .iter()
                                .map(|call| {
                                    json!({
                                        "id": call.id(),
                                        "type": "function",
                                        "function": {
                                            "name": call.name(),
                                            "arguments": call.arguments().to_string(),
                                        },
                                    })
                                })
                                .collect(),
                        );
                    }
                    messages.push(entry);
                }
                Role::Tool => {
                    for reply in message.content().tool_replies() {
                        let content = if reply.outcome().is_success() {
                            reply.outcome().data().to_string()
                        } else {
                            json!({
                                "error": reply.outcome().error_message().unwrap_or("tool failed")
                            })
                            .to_string()
                        };
                        messages.push(json!({
                            "role": "tool",
                            "tool_call_id": reply.call_id(),
                            "content": content,
                        }));
                    }
                }
            }
        }

        let mut payload = json!({
            "model": self.model_name,
            "messages": messages,
        });

        if let Some(temperature) = self.temperature {
            payload["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            payload["max_tokens"] = json!(max_tokens);
        }

        if let Some(toolset) = toolset {
            let tools: Vec<Value> = toolset
                .tools()
                .await
                .iter()
                .map(|tool| {
                    let spec = tool.spec();
                    json!({
                        "type": "function",
                        "function": {
                            "name": spec.name(),
                            "description": spec.description(),
                            "parameters": spec.parameters(),
                        },
                    })
                })
                .collect();
            if !tools.is_empty() {
                payload["tools"] = Value::Array(tools);
            }
        }

        payload
    }

    fn parse_content(body: &Value) -> Content {
        let mut content = Content::default();

        let message = &body["choices"][0]["message"];

        if let Some(text) = message["content"].as_str() {
            if !text.is_empty() {
                content.push(Part::Text(text.to_string()));
            }
        }

        if let Some(calls) = message["tool_calls"].as_array() {
            for call in calls {
                let id = call["id"].as_str().unwrap_or_default();
                let name = call["function"]["name"].as_str().unwrap_or_default();
                // Arguments arrive string-encoded; tolerate malformed JSON so
                // the tool can surface its own error.
                let arguments = call["function"]["arguments"]
                    .as_str()
                    .and_then(|raw| serde_json::from_str(raw).ok())
                    .unwrap_or(Value::Null);
                content.push(Part::ToolCall(ToolCall::new(id, name, arguments)));
            }
        }

        content
    }

    fn map_error_status(status: reqwest::StatusCode, body: String) -> AgentError {
        match status.as_u16() {
            401 | 403 => AgentError::Authentication {
                provider: "OpenAI".to_string(),
            },
            429 => AgentError::RateLimit {
                provider: "OpenAI".to_string(),
            },
            _ => AgentError::Provider {
                provider: "OpenAI".to_string(),
                message: format!("HTTP {status}: {body}"),
            },
        }
    }

    fn parse_usage(body: &Value) -> TokenUsage {
        let usage = &body["usage"];
        let as_u32 = |v: &Value| v.as_u64().and_then(|n| u32::try_from(n).ok());
        TokenUsage::partial(
            as_u32(&usage["prompt_tokens"]),
            as_u32(&usage["completion_tokens"]),
            as_u32(&usage["total_tokens"]),
        )
    }
}

#[async_trait]
impl LanguageModel for OpenAiChat {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(
        &self,
        conversation: Conversation,
        toolset: Option<Arc<dyn Toolset>>,
    ) -> AgentResult<Completion> {
        let payload = self.build_payload(&conversation, toolset.as_ref()).await;

        tracing::debug!(model = %self.model_name, "sending chat completion request");

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_error_status(status, body));
        }

        let body: Value = response.json().await?;
        let content = Self::parse_content(&body);
        let usage = Self::parse_usage(&body);

        tracing::debug!(
            input_tokens = usage.input_tokens(),
            output_tokens = usage.output_tokens(),
            "received chat completion"
        );

        Ok(Completion::new(content, usage))
    }
}
