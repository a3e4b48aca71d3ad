//! Speech synthesis against a token-authenticated TTS service.
//!
//! The remote contract has two quirks that are preserved exactly because
//! they are wire compatibility requirements, not accidents: the payload text
//! must be percent-encoded twice, and success is signalled by the response
//! content-type rather than the status code (errors come back as JSON bodies
//! with a 200 status).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::SpeechConfig;
use crate::error::{Error, Result};

/// Anything that can turn one chunk of text into raw audio bytes.
///
/// The synthesis orchestrator is generic over this seam; tests swap in a
/// canned provider.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Acquires one access token for a whole synthesis request.
    async fn acquire_token(&self) -> Result<String>;

    /// Synthesizes one chunk of text into raw audio bytes.
    async fn synthesize(&self, text: &str, token: &str) -> Result<Vec<u8>>;
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for the remote speech-synthesis service.
#[derive(Debug, Clone)]
pub struct TtsClient {
    config: Arc<SpeechConfig>,
    client: Client,
}

impl TtsClient {
    /// Creates a new client from the given configuration.
    pub fn new(config: SpeechConfig) -> Result<Self> {
        if config.api_key.is_empty() || config.secret_key.is_empty() {
            return Err(Error::auth("speech credentials are required"));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder
            .build()
            .map_err(|e| Error::auth(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Assembles the form body for one chunk.
    ///
    /// The text goes through two rounds of percent-encoding; the remaining
    /// fields are the fixed voice parameters.
    fn build_payload(&self, text: &str, token: &str) -> String {
        let once = urlencoding::encode(text);
        let twice = urlencoding::encode(&once);
        let c = &self.config;
        format!(
            "tex={twice}&tok={token}&cuid={}&ctp=1&lan={}&spd={}&pit={}&vol={}&per={}&aue={}",
            c.cuid, c.language, c.speed, c.pitch, c.volume, c.persona, c.encoding
        )
    }
}

#[async_trait]
impl SpeechProvider for TtsClient {
    async fn acquire_token(&self) -> Result<String> {
        let response = self
            .client
            .post(&self.config.token_url)
            .query(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.api_key.as_str()),
                ("client_secret", self.config.secret_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::auth(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::auth(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::auth(body));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|_| Error::auth(format!("no access_token in response: {body}")))?;
        Ok(parsed.access_token)
    }

    async fn synthesize(&self, text: &str, token: &str) -> Result<Vec<u8>> {
        let payload = self.build_payload(text, token);

        let response = self
            .client
            .post(&self.config.synth_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(payload)
            .send()
            .await
            .map_err(|e| Error::synthesis(e.to_string()))?;

        let is_audio = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("audio"));

        if is_audio {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| Error::synthesis(e.to_string()))?;
            Ok(bytes.to_vec())
        } else {
            let body = response
                .text()
                .await
                .map_err(|e| Error::synthesis(e.to_string()))?;
            Err(Error::synthesis(body))
        }
    }
}
