//! Component configuration.
//!
//! Each pipeline component takes its own explicit config struct at
//! construction; nothing reads process-wide mutable state. The structs also
//! derive serde so a front end can persist them as one [`AppConfig`] document.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for the chat-completion client used for script generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// API key for bearer authentication.
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_chat_base_url")]
    pub base_url: String,
    /// Model identifier.
    #[serde(default = "default_chat_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: Option<u64>,
}

impl ChatConfig {
    /// Default chat-completion base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.deepseek.com/v1";
    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "deepseek-chat";
    /// Default sampling temperature.
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Creates a new configuration with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            temperature: Self::DEFAULT_TEMPERATURE,
            timeout_secs: Some(120),
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Reads from:
    /// - `DEEPSEEK_API_KEY` - Required API key
    /// - `DEEPSEEK_BASE_URL` - Optional base URL
    /// - `DEEPSEEK_MODEL` - Optional model
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DEEPSEEK_API_KEY")
            .map_err(|_| Error::generation("DEEPSEEK_API_KEY environment variable not set"))?;

        let base_url = std::env::var("DEEPSEEK_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_owned());

        let model =
            std::env::var("DEEPSEEK_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_owned());

        Ok(Self {
            api_key,
            base_url,
            model,
            temperature: Self::DEFAULT_TEMPERATURE,
            timeout_secs: Some(120),
        })
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Configuration for the speech-synthesis client.
///
/// Voice parameters map one-to-one onto the synthesis endpoint's form fields
/// (`spd`, `pit`, `vol`, `per`, `aue`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Client id for the credentials exchange.
    #[serde(default)]
    pub api_key: String,
    /// Client secret for the credentials exchange.
    #[serde(default)]
    pub secret_key: String,
    /// OAuth-style token endpoint.
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// Synthesis endpoint.
    #[serde(default = "default_synth_url")]
    pub synth_url: String,
    /// Caller identifier sent as `cuid`.
    #[serde(default = "default_cuid")]
    pub cuid: String,
    /// Synthesis language tag sent as `lan`.
    #[serde(default = "default_lan")]
    pub language: String,
    /// Speaking speed, 0-15.
    #[serde(default = "default_voice_level")]
    pub speed: u8,
    /// Pitch, 0-15.
    #[serde(default = "default_voice_level")]
    pub pitch: u8,
    /// Volume, 0-15.
    #[serde(default = "default_voice_level")]
    pub volume: u8,
    /// Voice persona id sent as `per`.
    #[serde(default = "default_persona")]
    pub persona: u32,
    /// Audio encoding id sent as `aue` (6 = wav).
    #[serde(default = "default_encoding")]
    pub encoding: u8,
    /// Maximum chunk size in encoded bytes.
    #[serde(default = "default_max_chunk_bytes")]
    pub max_chunk_bytes: usize,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: Option<u64>,
}

impl SpeechConfig {
    /// Default token endpoint.
    pub const DEFAULT_TOKEN_URL: &'static str = "https://aip.baidubce.com/oauth/2.0/token";
    /// Default synthesis endpoint.
    pub const DEFAULT_SYNTH_URL: &'static str = "https://tsn.baidu.com/text2audio";

    /// Creates a new configuration with the given credentials.
    #[must_use]
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            token_url: Self::DEFAULT_TOKEN_URL.to_owned(),
            synth_url: Self::DEFAULT_SYNTH_URL.to_owned(),
            cuid: default_cuid(),
            language: default_lan(),
            speed: 5,
            pitch: 5,
            volume: 5,
            persona: 4105,
            encoding: 6,
            max_chunk_bytes: default_max_chunk_bytes(),
            timeout_secs: Some(120),
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Reads from:
    /// - `BAIDU_TTS_API_KEY` - Required client id
    /// - `BAIDU_TTS_SECRET_KEY` - Required client secret
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("BAIDU_TTS_API_KEY")
            .map_err(|_| Error::auth("BAIDU_TTS_API_KEY environment variable not set"))?;
        let secret_key = std::env::var("BAIDU_TTS_SECRET_KEY")
            .map_err(|_| Error::auth("BAIDU_TTS_SECRET_KEY environment variable not set"))?;

        Ok(Self::new(api_key, secret_key))
    }

    /// Sets the token and synthesis endpoints, for local stand-ins.
    #[must_use]
    pub fn with_endpoints(mut self, token_url: impl Into<String>, synth_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self.synth_url = synth_url.into();
        self
    }

    /// Sets the voice persona.
    #[must_use]
    pub const fn with_persona(mut self, persona: u32) -> Self {
        self.persona = persona;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}

/// Output directory layout shared by both operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where rendered script documents are written.
    #[serde(default = "default_script_dir")]
    pub script_dir: PathBuf,
    /// Where placeholder slide images are written.
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,
    /// Where per-page audio artifacts are written.
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
}

impl StorageConfig {
    /// Creates a layout rooted at the given directory.
    #[must_use]
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            script_dir: root.join("scripts"),
            image_dir: root.join("images"),
            audio_dir: root.join("audio"),
        }
    }

    /// Creates every configured directory.
    pub async fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.script_dir, &self.image_dir, &self.audio_dir] {
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::rooted_at("lectern-out")
    }
}

/// Aggregate configuration, persisted as one TOML document by front ends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Script generation settings.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Speech synthesis settings.
    #[serde(default)]
    pub speech: SpeechConfig,
    /// Output directories.
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_chat_base_url() -> String {
    ChatConfig::DEFAULT_BASE_URL.to_owned()
}

fn default_chat_model() -> String {
    ChatConfig::DEFAULT_MODEL.to_owned()
}

fn default_temperature() -> f32 {
    ChatConfig::DEFAULT_TEMPERATURE
}

fn default_timeout() -> Option<u64> {
    Some(120)
}

fn default_token_url() -> String {
    SpeechConfig::DEFAULT_TOKEN_URL.to_owned()
}

fn default_synth_url() -> String {
    SpeechConfig::DEFAULT_SYNTH_URL.to_owned()
}

fn default_cuid() -> String {
    "lectern".to_owned()
}

fn default_lan() -> String {
    "zh".to_owned()
}

fn default_voice_level() -> u8 {
    5
}

fn default_persona() -> u32 {
    4105
}

fn default_encoding() -> u8 {
    6
}

fn default_max_chunk_bytes() -> usize {
    crate::chunk::DEFAULT_MAX_CHUNK_BYTES
}

fn default_script_dir() -> PathBuf {
    PathBuf::from("lectern-out/scripts")
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("lectern-out/images")
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("lectern-out/audio")
}
