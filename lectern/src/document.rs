//! The page-delimited script document.
//!
//! This is the hand-off artifact between the two pipeline stages: script
//! generation renders one `=== Page N ===` section per slide, and the
//! synthesis side parses those sections back into `(page, text)` pairs.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Narration script for one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpeech {
    /// 1-based page index.
    pub page_index: u32,
    /// Sanitized narration text, or an embedded error message when
    /// generation failed for this page.
    pub speech_script: String,
}

impl PageSpeech {
    /// Creates a page entry.
    #[must_use]
    pub fn new(page_index: u32, speech_script: impl Into<String>) -> Self {
        Self {
            page_index,
            speech_script: speech_script.into(),
        }
    }
}

/// One synthesized audio artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAudio {
    /// 1-based page index.
    pub page_index: u32,
    /// Path of the concatenated audio file.
    pub audio_path: PathBuf,
}

static PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=== Page (\d+) ===\n").expect("page marker pattern"));

/// Renders pages into the delimiter-separated document format.
///
/// Every page yields exactly one section, in input order.
#[must_use]
pub fn render(pages: &[PageSpeech]) -> String {
    let mut out = String::new();
    for page in pages {
        out.push_str(&format!(
            "\n=== Page {} ===\n{}\n",
            page.page_index, page.speech_script
        ));
    }
    out
}

/// Parses a document back into ordered `(page, text)` pairs.
///
/// A page's text spans from just after its marker to just before the next
/// marker or the document end. Sections that are empty after trimming are
/// dropped; absent indices are simply not reported.
#[must_use]
pub fn parse(content: &str) -> Vec<(u32, String)> {
    let markers: Vec<_> = PAGE_MARKER.captures_iter(content).collect();
    let mut pages = Vec::with_capacity(markers.len());

    for (i, captures) in markers.iter().enumerate() {
        let whole = captures.get(0).expect("capture 0 always present");
        let Ok(page_index) = captures[1].parse::<u32>() else {
            continue;
        };
        let start = whole.end();
        let end = markers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(content.len(), |m| m.start());
        let text = content[start..end].trim();
        if !text.is_empty() {
            pages.push((page_index, text.to_owned()));
        }
    }

    pages
}
