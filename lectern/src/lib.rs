//! Lectern - slide decks into narrated audio lectures
//!
//! This crate implements a two-stage pipeline: per-slide narration scripts
//! are generated through a remote chat-completion service, persisted as a
//! page-delimited document, then synthesized page by page through a remote
//! speech service into one audio artifact per page.

pub mod chunk;
pub mod config;
pub mod deck;
pub mod document;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod sanitize;
pub mod tts;

pub use config::{AppConfig, ChatConfig, SpeechConfig, StorageConfig};
pub use document::{PageAudio, PageSpeech};
pub use error::{Error, Result};
pub use llm::{ChatClient, ScriptGenerator};
pub use pipeline::{DeckProcessor, DeckScripts, SynthesisOrchestrator};
pub use prompt::Language;
pub use tts::{SpeechProvider, TtsClient};
