//! Script generation against an OpenAI-compatible chat-completion API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::prompt::{self, Language, SYSTEM_ROLE};

/// Anything that can produce a narration script for one slide.
///
/// The pipeline is generic over this seam so tests can swap in a canned
/// generator without touching the network.
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Generates the raw (unsanitized) narration text for one slide.
    ///
    /// `visual_b64` is the base64 placeholder visual; it is accepted for
    /// parity with the upstream contract but the current prompt asks the
    /// model to infer image content instead of transmitting it.
    async fn generate(
        &self,
        slide_text: &str,
        visual_b64: &str,
        language: Language,
    ) -> Result<String>;
}

/// Chat-completion request body.
#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat-completion response body, reduced to what the pipeline reads.
#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Client for the remote chat-completion service.
#[derive(Debug, Clone)]
pub struct ChatClient {
    config: Arc<ChatConfig>,
    client: Client,
}

impl ChatClient {
    /// Creates a new client from the given configuration.
    pub fn new(config: ChatConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::generation("chat API key is required"));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder
            .build()
            .map_err(|e| Error::generation(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Builds the chat completions URL.
    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Builds the request body for one slide.
    fn build_body(&self, slide_text: &str, language: Language) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_ROLE.to_owned(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt::build_prompt(slide_text, language),
                },
            ],
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl ScriptGenerator for ChatClient {
    async fn generate(
        &self,
        slide_text: &str,
        _visual_b64: &str,
        language: Language,
    ) -> Result<String> {
        let body = self.build_body(slide_text, language);

        let response = self
            .client
            .post(self.chat_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::generation(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::generation(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::generation(text));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| Error::generation(format!("malformed response: {e}, body: {text}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::generation(format!("empty choices in response: {text}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn test_client() -> ChatClient {
        ChatClient::new(ChatConfig::new("test-key")).unwrap()
    }

    mod new {
        use super::*;

        #[test]
        fn rejects_empty_api_key() {
            let err = ChatClient::new(ChatConfig::default()).unwrap_err();
            assert!(matches!(err, Error::Generation(_)));
        }

        #[test]
        fn accepts_key_and_keeps_config() {
            let client = test_client();
            assert_eq!(client.config.model, ChatConfig::DEFAULT_MODEL);
        }
    }

    mod build_body {
        use super::*;

        #[test]
        fn system_turn_carries_fixed_role() {
            let body = test_client().build_body("slide", Language::Zh);
            assert_eq!(body.messages[0].role, "system");
            assert_eq!(body.messages[0].content, SYSTEM_ROLE);
        }

        #[test]
        fn user_turn_embeds_slide_text() {
            let body = test_client().build_body("Loss curves", Language::En);
            assert_eq!(body.messages[1].role, "user");
            assert!(body.messages[1].content.contains("Loss curves"));
        }

        #[test]
        fn serializes_wire_shape() {
            let body = test_client().build_body("x", Language::Zh);
            let json = serde_json::to_value(&body).unwrap();
            assert_eq!(json["model"], "deepseek-chat");
            assert_eq!(json["messages"].as_array().unwrap().len(), 2);
            assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 0.001);
        }
    }

    mod response_parsing {
        use super::*;

        #[test]
        fn deserializes_first_choice_content() {
            let json = r#"{"choices":[{"message":{"role":"assistant","content":"讲稿内容"}}]}"#;
            let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
            assert_eq!(parsed.choices[0].message.content, "讲稿内容");
        }

        #[test]
        fn tolerates_extra_fields() {
            let json = r#"{
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "choices": [{"index": 0, "message": {"content": "ok"}, "finish_reason": "stop"}],
                "usage": {"total_tokens": 42}
            }"#;
            let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
            assert_eq!(parsed.choices[0].message.content, "ok");
        }

        #[test]
        fn missing_choices_is_an_error() {
            let json = r#"{"error": {"message": "bad key"}}"#;
            assert!(serde_json::from_str::<ChatCompletionResponse>(json).is_err());
        }
    }
}
