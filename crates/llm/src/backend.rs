//! OpenAI-compatible chat backend

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use vox_core::{
    Error, FinishReason, GenerationResult, LanguageModel, Message, Result, TokenUsage,
    TransportError,
};

/// Connection settings for one OpenAI-compatible chat endpoint
#[derive(Debug, Clone)]
pub struct OpenAiCompatChatConfig {
    pub provider_tag: String,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: usize,
    pub temperature: f32,
    pub timeout_ms: u64,
}

/// Chat backend speaking the OpenAI `/chat/completions` wire format
pub struct OpenAiCompatChat {
    config: OpenAiCompatChatConfig,
    client: Client,
}

impl OpenAiCompatChat {
    /// Build the handle. No network calls are made here.
    pub fn new(config: OpenAiCompatChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Construction(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    fn map_transport(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Transport(TransportError::Timeout(self.config.timeout_ms))
        } else {
            Error::Transport(TransportError::Connection(e.to_string()))
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatChat {
    async fn generate(&self, messages: &[Message]) -> Result<GenerationResult> {
        let start = std::time::Instant::now();

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
            stream: false,
        };

        let mut builder = self.client.post(self.chat_url()).json(&request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(TransportError::Status {
                status: status.as_u16(),
                body,
            }));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Llm(format!("malformed response: {e}")))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Llm("no choices in response".to_string()))?;

        Ok(GenerationResult {
            text: choice.message.content,
            finish_reason: match choice.finish_reason.as_deref() {
                Some("length") => FinishReason::Length,
                _ => FinishReason::Stop,
            },
            usage: parsed
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens)),
            total_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/models", self.config.endpoint.trim_end_matches('/'));
        let mut builder = self.client.get(url);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        matches!(builder.send().await, Ok(resp) if resp.status().is_success())
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider_name(&self) -> &str {
        &self.config.provider_tag
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OpenAiCompatChatConfig {
        OpenAiCompatChatConfig {
            provider_tag: "lmstudio".to_string(),
            endpoint: "http://localhost:1234/v1".to_string(),
            model: "qwen2.5-7b-instruct".to_string(),
            api_key: None,
            max_tokens: 256,
            temperature: 0.7,
            timeout_ms: 1000,
        }
    }

    #[test]
    fn test_chat_url() {
        let backend = OpenAiCompatChat::new(config()).unwrap();
        assert_eq!(
            backend.chat_url(),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn test_identity() {
        let backend = OpenAiCompatChat::new(config()).unwrap();
        assert_eq!(backend.model_name(), "qwen2.5-7b-instruct");
        assert_eq!(backend.provider_name(), "lmstudio");
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{
            "choices": [{"message": {"role": "assistant", "content": "hi"},
                         "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3}
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "hi");
        assert_eq!(parsed.usage.unwrap().completion_tokens, 3);
    }
}
