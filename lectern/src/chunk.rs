//! Byte-budget-aware text chunking for the synthesis endpoint.
//!
//! The downstream speech service limits payload text by its legacy
//! double-byte encoding, not by Unicode code points, so chunk sizes are
//! measured in GBK bytes with unmappable characters ignored. Splits happen
//! only at sentence-terminal punctuation; a single sentence that alone
//! exceeds the budget is passed through as one oversized chunk rather than
//! subdivided.

use encoding_rs::GBK;

/// Default chunk budget in encoded bytes.
pub const DEFAULT_MAX_CHUNK_BYTES: usize = 500;

/// Sentence-terminal punctuation; the terminator stays with its sentence.
const TERMINATORS: [char; 6] = ['。', '！', '？', '.', '!', '?'];

/// Encoded length of `text` in GBK bytes, ignoring unmappable characters.
#[must_use]
pub fn gbk_len(text: &str) -> usize {
    let mut buf = [0_u8; 4];
    text.chars()
        .map(|c| {
            if c.is_ascii() {
                1
            } else {
                let (bytes, _, unmappable) = GBK.encode(c.encode_utf8(&mut buf));
                if unmappable { 0 } else { bytes.len() }
            }
        })
        .sum()
}

/// Splits `text` into sentences after each terminator.
///
/// The trailing remainder without a terminator is its own sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        if TERMINATORS.contains(&c) {
            let end = idx + c.len_utf8();
            sentences.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Splits cleaned text into chunks bounded by `max_len` GBK bytes.
///
/// Sentences are accumulated greedily; when the next sentence would push the
/// current chunk past the budget, the chunk is closed and the sentence opens
/// the next one. Chunks are trimmed and empty ones dropped; empty input
/// yields no chunks.
#[must_use]
pub fn split_text(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        if gbk_len(&current) + gbk_len(sentence) <= max_len {
            current.push_str(sentence);
        } else {
            push_chunk(&mut chunks, &current);
            current = sentence.to_owned();
        }
    }
    push_chunk(&mut chunks, &current);

    chunks
}

fn push_chunk(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_owned());
    }
}
