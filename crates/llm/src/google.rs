//! Gemini chat backend (`generateContent` API)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use vox_core::{
    Error, FinishReason, GenerationResult, LanguageModel, Message, Result, Role, TransportError,
};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for the Gemini chat API
#[derive(Debug, Clone)]
pub struct GoogleChatConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub timeout_ms: u64,
    /// Override for tests; defaults to the public API base
    pub api_base: Option<String>,
}

/// Chat backend for Google's hosted API
pub struct GoogleChat {
    config: GoogleChatConfig,
    client: Client,
}

impl GoogleChat {
    pub fn new(config: GoogleChatConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::Construction(
                "google llm provider requires an api key".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Construction(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn generate_url(&self) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!(
            "{}/models/{}:generateContent?key={}",
            base, self.config.model, self.config.api_key
        )
    }

    fn map_transport(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Transport(TransportError::Timeout(self.config.timeout_ms))
        } else {
            Error::Transport(TransportError::Connection(e.to_string()))
        }
    }

    /// Gemini has no system role; system prompts are folded into
    /// `system_instruction` and the rest mapped user/model.
    fn build_request(&self, messages: &[Message]) -> GenerateContentRequest {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            match message.role {
                Role::System => system_parts.push(GcPart {
                    text: message.content.clone(),
                }),
                Role::User => contents.push(GcContent {
                    role: "user".to_string(),
                    parts: vec![GcPart {
                        text: message.content.clone(),
                    }],
                }),
                Role::Assistant => contents.push(GcContent {
                    role: "model".to_string(),
                    parts: vec![GcPart {
                        text: message.content.clone(),
                    }],
                }),
            }
        }

        GenerateContentRequest {
            system_instruction: if system_parts.is_empty() {
                None
            } else {
                Some(GcSystemInstruction {
                    parts: system_parts,
                })
            },
            contents,
            generation_config: GcGenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            },
        }
    }
}

#[async_trait]
impl LanguageModel for GoogleChat {
    async fn generate(&self, messages: &[Message]) -> Result<GenerationResult> {
        let start = std::time::Instant::now();
        let request = self.build_request(messages);

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(TransportError::Status {
                status: status.as_u16(),
                body,
            }));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Llm(format!("malformed response: {e}")))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::Llm("no candidates in response".to_string()))?;

        let text = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        Ok(GenerationResult {
            text,
            finish_reason: match candidate.finish_reason.as_deref() {
                Some("MAX_TOKENS") => FinishReason::Length,
                _ => FinishReason::Stop,
            },
            usage: None,
            total_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn is_available(&self) -> bool {
        self.generate(&[Message::user("ping")]).await.is_ok()
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider_name(&self) -> &str {
        "google"
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GcSystemInstruction>,
    contents: Vec<GcContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GcGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GcSystemInstruction {
    parts: Vec<GcPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GcContent {
    #[serde(default)]
    role: String,
    parts: Vec<GcPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GcPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GcGenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<GcCandidate>,
}

#[derive(Debug, Deserialize)]
struct GcCandidate {
    content: GcContent,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> GoogleChat {
        GoogleChat::new(GoogleChatConfig {
            api_key: "k".to_string(),
            model: "gemini-1.5-flash".to_string(),
            max_tokens: 256,
            temperature: 0.5,
            timeout_ms: 1000,
            api_base: None,
        })
        .unwrap()
    }

    #[test]
    fn test_requires_api_key() {
        let result = GoogleChat::new(GoogleChatConfig {
            api_key: String::new(),
            model: "m".to_string(),
            max_tokens: 1,
            temperature: 0.0,
            timeout_ms: 1,
            api_base: None,
        });
        assert!(matches!(result, Err(Error::Construction(_))));
    }

    #[test]
    fn test_system_prompt_folded_into_instruction() {
        let request = backend().build_request(&[
            Message::system("be brief"),
            Message::user("hi"),
            Message::assistant("hello"),
        ]);
        assert!(request.system_instruction.is_some());
        assert_eq!(request.contents.len(), 2);
        assert_eq!(request.contents[0].role, "user");
        assert_eq!(request.contents[1].role, "model");
    }
}
