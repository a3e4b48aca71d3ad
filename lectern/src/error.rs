//! Error types for the narration pipeline.
//!
//! Failure propagation is deliberately asymmetric by stage: script generation
//! isolates failures per page (the processor embeds the error text as that
//! page's script and keeps going), while audio synthesis is fail-fast (the
//! first failing page aborts the whole request). Both policies live in
//! [`crate::pipeline`]; the variants here carry what each stage needs to
//! report.

use std::path::PathBuf;

/// Result type alias for lectern operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the narration pipeline.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Input file has the wrong extension for the requested operation.
    #[error("unsupported media type: expected a .{expected} file, got {path:?}")]
    UnsupportedMedia {
        /// The extension the operation accepts, without the leading dot.
        expected: &'static str,
        /// The offending input path.
        path: PathBuf,
    },

    /// Remote script generation failed; carries the raw error payload.
    #[error("script generation failed: {0}")]
    Generation(String),

    /// No pages could be recovered from a script document.
    #[error("no pages could be recovered from the script document")]
    Parse,

    /// Access-token acquisition against the speech service failed.
    #[error("token acquisition failed: {0}")]
    Auth(String),

    /// Remote speech synthesis rejected a chunk; carries the response body.
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    /// A page's synthesis failed, aborting the whole request.
    #[error("synthesis failed for page {page}: {message}")]
    PageSynthesis {
        /// 1-based page index of the failing page.
        page: u32,
        /// The underlying synthesis failure.
        message: String,
    },

    /// The slide container could not be read.
    #[error("deck error: {0}")]
    Deck(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an unsupported-media error.
    #[must_use]
    pub fn unsupported_media(expected: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedMedia {
            expected,
            path: path.into(),
        }
    }

    /// Create a generation error carrying the remote payload.
    #[must_use]
    pub fn generation(payload: impl Into<String>) -> Self {
        Self::Generation(payload.into())
    }

    /// Create an auth error.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create a synthesis error carrying the response body.
    #[must_use]
    pub fn synthesis(body: impl Into<String>) -> Self {
        Self::Synthesis(body.into())
    }

    /// Wrap a synthesis failure with the page it aborted on.
    #[must_use]
    pub fn page_synthesis(page: u32, source: &Self) -> Self {
        Self::PageSynthesis {
            page,
            message: source.to_string(),
        }
    }

    /// Create a deck error.
    #[must_use]
    pub fn deck(message: impl Into<String>) -> Self {
        Self::Deck(message.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    mod display {
        use super::*;

        #[test]
        fn unsupported_media_names_extension_and_path() {
            let err = Error::unsupported_media("pptx", "slides.pdf");
            let s = err.to_string();
            assert!(s.contains(".pptx"));
            assert!(s.contains("slides.pdf"));
        }

        #[test]
        fn generation_carries_payload() {
            let err = Error::generation(r#"{"error":"quota exceeded"}"#);
            assert!(err.to_string().contains("quota exceeded"));
        }

        #[test]
        fn page_synthesis_names_page() {
            let inner = Error::synthesis(r#"{"err_no":513}"#);
            let err = Error::page_synthesis(2, &inner);
            let s = err.to_string();
            assert!(s.contains("page 2"));
            assert!(s.contains("513"));
        }

        #[test]
        fn parse_has_fixed_message() {
            assert!(Error::Parse.to_string().contains("no pages"));
        }
    }

    mod conversion {
        use super::*;

        #[test]
        fn from_io_error() {
            let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
            let err: Error = io_err.into();
            assert!(matches!(err, Error::Io(_)));
        }

        #[test]
        fn question_mark_propagates() {
            fn inner() -> std::result::Result<(), std::io::Error> {
                Err(std::io::Error::other("boom"))
            }

            fn outer() -> Result<()> {
                inner()?;
                Ok(())
            }

            assert!(matches!(outer().unwrap_err(), Error::Io(_)));
        }
    }
}
