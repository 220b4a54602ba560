//! External LLM provider completion calls.
//!
//! OpenAI and Groq share the chat-completions format. Anthropic uses the
//! Messages API, with the system prompt carried outside the message list.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use handson_core::{Error, Result};

use crate::config::LLMConfig;
use crate::types::{CompletionRequest, LLMProvider};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";

/// Something that can answer a prompt with text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Run one completion and return the assistant's text.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Model name used for log lines.
    fn model(&self) -> &str;
}

/// Build the shared HTTP client with a request timeout.
pub fn build_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Error::Http(format!("Failed to build HTTP client: {}", e)))
}

/// Completion backend over a provider's HTTP API.
pub struct HttpChatBackend {
    client: Client,
    provider: LLMProvider,
    model: String,
    api_key: String,
}

impl HttpChatBackend {
    pub fn new(client: Client, provider: LLMProvider, model: String, api_key: String) -> Self {
        Self {
            client,
            provider,
            model,
            api_key,
        }
    }

    /// Build from configuration. A missing credential is a configuration error.
    pub fn from_config(client: Client, config: &LLMConfig) -> Result<Self> {
        let (provider, model, api_key) = config.resolve_provider().ok_or_else(|| {
            Error::Config(format!(
                "No LLM provider configured (preferred: {}). Set OPENAI_API_KEY, \
                 ANTHROPIC_API_KEY or GROQ_API_KEY.",
                config.preferred_provider
            ))
        })?;
        Ok(Self::new(client, provider, model, api_key))
    }

    pub fn provider(&self) -> LLMProvider {
        self.provider
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json");

        request = match self.provider {
            LLMProvider::Anthropic => request
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01"),
            LLMProvider::OpenAI | LLMProvider::Groq => {
                request.header("Authorization", format!("Bearer {}", self.api_key))
            }
        };

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!("API error {}: {}", status, body)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::Http(format!("Invalid response body: {}", e)))
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        debug!(
            "Completion via {} with model {} ({} messages)",
            self.provider,
            self.model,
            request.messages.len()
        );

        match self.provider {
            LLMProvider::OpenAI | LLMProvider::Groq => {
                let url = if self.provider == LLMProvider::Groq {
                    GROQ_URL
                } else {
                    OPENAI_URL
                };
                let body = openai_request_body(&self.model, &request);
                let response = self.post(url, &body).await?;
                parse_openai_response(&response)
            }
            LLMProvider::Anthropic => {
                let body = anthropic_request_body(&self.model, &request);
                let response = self.post(ANTHROPIC_URL, &body).await?;
                parse_anthropic_response(&response)
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Chat-completions request body (OpenAI, Groq).
pub fn openai_request_body(model: &str, request: &CompletionRequest) -> Value {
    let msgs: Vec<Value> = request
        .messages
        .iter()
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();

    json!({
        "model": model,
        "messages": msgs,
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
    })
}

/// Messages API request body (Anthropic).
pub fn anthropic_request_body(model: &str, request: &CompletionRequest) -> Value {
    let system_msg: Option<String> = request
        .messages
        .iter()
        .find(|m| m.role == "system")
        .map(|m| m.content.clone());

    let conv_msgs: Vec<Value> = request
        .messages
        .iter()
        .filter(|m| m.role != "system")
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();

    let mut body = json!({
        "model": model,
        "messages": conv_msgs,
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
    });

    if let Some(sys) = system_msg {
        body["system"] = json!(sys);
    }
    body
}

pub fn parse_openai_response(response: &Value) -> Result<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Llm("Response has no choices[0].message.content".into()))
}

pub fn parse_anthropic_response(response: &Value) -> Result<String> {
    if let Some(msg) = response["error"]["message"].as_str() {
        return Err(Error::Llm(msg.to_string()));
    }

    let blocks = response["content"]
        .as_array()
        .ok_or_else(|| Error::Llm("Response has no content blocks".into()))?;

    let text: String = blocks
        .iter()
        .filter(|b| b["type"] == "text")
        .filter_map(|b| b["text"].as_str())
        .collect();

    Ok(text)
}
