//! The two pipeline operations.
//!
//! [`DeckProcessor`] turns a slide deck into a persisted script document, one
//! narration script per slide. [`SynthesisOrchestrator`] turns that document
//! into per-page audio artifacts.
//!
//! Failure policy is asymmetric by stage and preserved on purpose: script
//! generation isolates failures per page (the error text becomes that page's
//! script and the deck keeps processing), while synthesis is fail-fast (the
//! first failing page aborts the whole request, naming the page). Files
//! already written before a synthesis abort stay on disk; nothing rolls back.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::chunk;
use crate::config::StorageConfig;
use crate::deck::{self, Deck};
use crate::document::{self, PageAudio, PageSpeech};
use crate::error::{Error, Result};
use crate::llm::ScriptGenerator;
use crate::prompt::Language;
use crate::sanitize;
use crate::tts::SpeechProvider;

/// Result of processing one deck: the page scripts and where the rendered
/// document was persisted.
#[derive(Debug, Clone)]
pub struct DeckScripts {
    pages: Vec<PageSpeech>,
    document_path: PathBuf,
}

impl DeckScripts {
    /// The page scripts, in slide order, one entry per slide.
    #[must_use]
    pub fn pages(&self) -> &[PageSpeech] {
        &self.pages
    }

    /// Where the script document was written.
    #[must_use]
    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    /// Consumes the result, returning the page scripts.
    #[must_use]
    pub fn into_pages(self) -> Vec<PageSpeech> {
        self.pages
    }
}

/// Drives per-slide script generation for a whole deck.
#[derive(Debug)]
pub struct DeckProcessor<'a, G> {
    generator: &'a G,
    storage: &'a StorageConfig,
    language: Language,
}

impl<'a, G: ScriptGenerator> DeckProcessor<'a, G> {
    /// Creates a processor over the given generator and output layout.
    #[must_use]
    pub const fn new(generator: &'a G, storage: &'a StorageConfig, language: Language) -> Self {
        Self {
            generator,
            storage,
            language,
        }
    }

    /// Generates a script for every slide of `deck_path` and persists the
    /// rendered document.
    ///
    /// One slide's generation failure never stops the deck: the page keeps
    /// its position and carries the error text as its script. Container-level
    /// failures (wrong extension, unreadable archive) abort before any slide
    /// is processed.
    pub async fn process(&self, deck_path: &Path) -> Result<DeckScripts> {
        let deck = Deck::open(deck_path)?;
        self.storage.ensure_dirs().await?;

        tracing::info!(
            deck = %deck_path.display(),
            slides = deck.len(),
            language = %self.language,
            "generating scripts"
        );

        let mut pages = Vec::with_capacity(deck.len());
        for slide in deck.slides() {
            let script = match self.generate_one(slide).await {
                Ok(script) => script,
                Err(e) => {
                    tracing::warn!(page = slide.index, error = %e, "script generation failed");
                    format!("Page {} generation failed: {e}", slide.index)
                }
            };
            pages.push(PageSpeech::new(slide.index, script));
        }

        let document_path = self
            .storage
            .script_dir
            .join(document_filename(deck_path, self.language));
        tokio::fs::write(&document_path, document::render(&pages)).await?;

        tracing::info!(document = %document_path.display(), "script document written");

        Ok(DeckScripts {
            pages,
            document_path,
        })
    }

    /// Placeholder visual, remote generation, base sanitization for one slide.
    async fn generate_one(&self, slide: &deck::Slide) -> Result<String> {
        let image_path = deck::render_placeholder(&self.storage.image_dir, slide.index)?;
        let visual_b64 = BASE64.encode(tokio::fs::read(&image_path).await?);

        let raw = self
            .generator
            .generate(&slide.text, &visual_b64, self.language)
            .await?;
        Ok(sanitize::clean_script(&raw))
    }
}

/// Output filename for a deck's script document.
fn document_filename(deck_path: &Path, language: Language) -> String {
    let stem = deck_path
        .file_stem()
        .map_or_else(|| "deck".to_owned(), |s| s.to_string_lossy().into_owned());
    format!("{stem}_speech_{language}.txt")
}

/// Drives script-document parsing, chunking and synthesis.
#[derive(Debug)]
pub struct SynthesisOrchestrator<'a, S> {
    provider: &'a S,
    storage: &'a StorageConfig,
    max_chunk_bytes: usize,
}

impl<'a, S: SpeechProvider> SynthesisOrchestrator<'a, S> {
    /// Creates an orchestrator over the given provider and output layout.
    #[must_use]
    pub const fn new(provider: &'a S, storage: &'a StorageConfig, max_chunk_bytes: usize) -> Self {
        Self {
            provider,
            storage,
            max_chunk_bytes,
        }
    }

    /// Synthesizes one audio artifact per page of the script document.
    ///
    /// Aborts before any page work if the document has the wrong extension,
    /// yields no pages, or the access token cannot be acquired. Aborts on the
    /// first page whose synthesis fails, naming that page; artifacts written
    /// before the abort stay on disk.
    pub async fn process(&self, script_path: &Path) -> Result<Vec<PageAudio>> {
        let is_txt = script_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
        if !is_txt {
            return Err(Error::unsupported_media("txt", script_path));
        }

        let content = tokio::fs::read_to_string(script_path).await?;
        let pages = document::parse(&content);
        if pages.is_empty() {
            return Err(Error::Parse);
        }

        // One token for the whole request; failure here means no partial work.
        let token = self.provider.acquire_token().await?;
        self.storage.ensure_dirs().await?;

        tracing::info!(
            document = %script_path.display(),
            pages = pages.len(),
            "synthesizing audio"
        );

        let mut artifacts = Vec::with_capacity(pages.len());
        for (page_index, raw_text) in pages {
            let audio_path = self
                .synthesize_page(page_index, &raw_text, &token)
                .await
                .map_err(|e| {
                    tracing::error!(page = page_index, error = %e, "page synthesis failed");
                    Error::page_synthesis(page_index, &e)
                })?;
            artifacts.push(PageAudio {
                page_index,
                audio_path,
            });
        }

        Ok(artifacts)
    }

    /// Sanitizes, chunks and synthesizes one page into a fresh audio file.
    ///
    /// Chunk audio is appended byte-for-byte in chunk order; this works only
    /// because the configured encoding permits raw concatenation. The file
    /// name carries a random suffix so concurrent requests cannot clobber
    /// each other.
    async fn synthesize_page(&self, page_index: u32, raw_text: &str, token: &str) -> Result<PathBuf> {
        let cleaned = sanitize::clean_for_speech(raw_text);
        let chunks = chunk::split_text(&cleaned, self.max_chunk_bytes);

        let audio_path = self.storage.audio_dir.join(format!(
            "page_{page_index}_{}.wav",
            Uuid::new_v4().simple()
        ));

        let mut file = tokio::fs::File::create(&audio_path).await?;
        for piece in &chunks {
            let audio = self.provider.synthesize(piece, token).await?;
            file.write_all(&audio).await?;
        }
        file.flush().await?;

        tracing::debug!(page = page_index, chunks = chunks.len(), path = %audio_path.display(), "page synthesized");

        Ok(audio_path)
    }
}
