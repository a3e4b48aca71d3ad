//! Slide-deck reading.
//!
//! The deck container is treated as a black box that yields an ordered
//! sequence of slides with extractable text: a `.pptx` file is a ZIP archive
//! whose `ppt/slides/slideN.xml` entries hold DrawingML, and all narration
//! cares about is the `<a:t>` text runs in shape order. Anything fancier
//! (layouts, masters, embedded media) stays out of scope here.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;

use crate::error::{Error, Result};

/// One slide of a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// 1-based position in the deck.
    pub index: u32,
    /// Newline-joined text of all text runs, in shape enumeration order.
    pub text: String,
}

/// An ordered slide deck.
#[derive(Debug, Clone)]
pub struct Deck {
    slides: Vec<Slide>,
}

static SLIDE_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").expect("slide entry pattern"));

impl Deck {
    /// Opens a `.pptx` file and extracts every slide's text.
    ///
    /// Rejects paths without a `.pptx` extension with
    /// [`Error::UnsupportedMedia`]; container or XML damage surfaces as
    /// [`Error::Deck`].
    pub fn open(path: &Path) -> Result<Self> {
        let is_pptx = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pptx"));
        if !is_pptx {
            return Err(Error::unsupported_media("pptx", path));
        }

        let file = std::fs::File::open(path)?;
        let mut archive =
            zip::ZipArchive::new(file).map_err(|e| Error::deck(format!("not a zip archive: {e}")))?;

        // Entry order inside the archive is arbitrary; the slide number in
        // the entry name is what defines deck order.
        let mut entries: Vec<(u32, String)> = archive
            .file_names()
            .filter_map(|name| {
                let captures = SLIDE_ENTRY.captures(name)?;
                let number = captures[1].parse::<u32>().ok()?;
                Some((number, name.to_owned()))
            })
            .collect();
        entries.sort_unstable_by_key(|(number, _)| *number);

        let mut slides = Vec::with_capacity(entries.len());
        for (position, (_, name)) in entries.iter().enumerate() {
            let mut entry = archive
                .by_name(name)
                .map_err(|e| Error::deck(format!("cannot read {name}: {e}")))?;
            let mut xml = Vec::new();
            entry.read_to_end(&mut xml)?;

            slides.push(Slide {
                index: u32::try_from(position).unwrap_or(u32::MAX).saturating_add(1),
                text: extract_text(&xml)?,
            });
        }

        Ok(Self { slides })
    }

    /// The slides, in deck order.
    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Number of slides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the deck has no slides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Extracts all `<a:t>` text runs from one slide's DrawingML, newline-joined.
fn extract_text(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut text = String::new();
    let mut in_text_run = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => {
                in_text_run = true;
            }
            Ok(Event::Text(e)) if in_text_run => {
                let run = e
                    .unescape()
                    .map_err(|e| Error::deck(format!("bad slide xml text: {e}")))?;
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
                text.push_str(&run);
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"t" => {
                in_text_run = false;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::deck(format!("bad slide xml: {e}"))),
            Ok(_) => {}
        }
        buf.clear();
    }

    Ok(text)
}

/// Placeholder visual dimensions.
const PLACEHOLDER_SIZE: (u32, u32) = (1280, 720);

/// Writes the placeholder visual for one slide and returns its path.
///
/// Real slide rendering is out of scope; downstream consumers get a blank
/// white frame per slide until a renderer exists.
pub fn render_placeholder(image_dir: &Path, slide_index: u32) -> Result<PathBuf> {
    let (width, height) = PLACEHOLDER_SIZE;
    let frame = image::RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));
    let path = image_dir.join(format!("slide_{slide_index}.jpg"));
    frame
        .save(&path)
        .map_err(|e| Error::deck(format!("cannot write placeholder image: {e}")))?;
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::io::Write;

    const SLIDE_XML_NS: &str =
        r#" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#;

    fn slide_xml(lines: &[&str]) -> String {
        let runs: String = lines
            .iter()
            .map(|line| format!("<a:r><a:rPr/><a:t>{line}</a:t></a:r>"))
            .collect();
        format!("<p:sld{SLIDE_XML_NS}><p:txBody><a:p>{runs}</a:p></p:txBody></p:sld>")
    }

    fn write_deck(dir: &Path, slides: &[(&str, String)]) -> PathBuf {
        let path = dir.join("deck.pptx");
        let file = std::fs::File::create(&path).unwrap();
        let mut archive = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();

        for (name, xml) in slides {
            archive.start_file(*name, options).unwrap();
            archive.write_all(xml.as_bytes()).unwrap();
        }
        archive.finish().unwrap();
        path
    }

    mod open {
        use super::*;

        #[test]
        fn rejects_wrong_extension() {
            let err = Deck::open(Path::new("slides.pdf")).unwrap_err();
            assert!(matches!(err, Error::UnsupportedMedia { expected: "pptx", .. }));
        }

        #[test]
        fn extension_check_is_case_insensitive() {
            // The file does not exist, so passing the media check surfaces Io.
            let err = Deck::open(Path::new("missing.PPTX")).unwrap_err();
            assert!(matches!(err, Error::Io(_)));
        }

        #[test]
        fn rejects_garbage_container() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("broken.pptx");
            std::fs::write(&path, b"not a zip at all").unwrap();

            let err = Deck::open(&path).unwrap_err();
            assert!(matches!(err, Error::Deck(_)));
        }

        #[test]
        fn slides_come_back_in_numeric_order() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_deck(
                dir.path(),
                &[
                    ("ppt/slides/slide10.xml", slide_xml(&["tenth"])),
                    ("ppt/slides/slide2.xml", slide_xml(&["second"])),
                    ("ppt/slides/slide1.xml", slide_xml(&["first"])),
                ],
            );

            let deck = Deck::open(&path).unwrap();
            assert_eq!(deck.len(), 3);
            assert_eq!(deck.slides()[0], Slide { index: 1, text: "first".into() });
            assert_eq!(deck.slides()[1], Slide { index: 2, text: "second".into() });
            assert_eq!(deck.slides()[2], Slide { index: 3, text: "tenth".into() });
        }

        #[test]
        fn text_runs_are_newline_joined() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_deck(
                dir.path(),
                &[("ppt/slides/slide1.xml", slide_xml(&["Title", "Body line"]))],
            );

            let deck = Deck::open(&path).unwrap();
            assert_eq!(deck.slides()[0].text, "Title\nBody line");
        }

        #[test]
        fn deck_without_slides_is_empty() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_deck(
                dir.path(),
                &[("ppt/presentation.xml", "<p:presentation/>".to_owned())],
            );

            let deck = Deck::open(&path).unwrap();
            assert!(deck.is_empty());
        }
    }

    mod extract_text {
        use super::*;

        #[test]
        fn unescapes_entities() {
            let xml = slide_xml(&["a &amp; b"]);
            assert_eq!(extract_text(xml.as_bytes()).unwrap(), "a & b");
        }

        #[test]
        fn slide_without_text_yields_empty_string() {
            let xml = format!("<p:sld{SLIDE_XML_NS}><p:txBody/></p:sld>");
            assert_eq!(extract_text(xml.as_bytes()).unwrap(), "");
        }
    }

    mod render_placeholder {
        use super::*;

        #[test]
        fn writes_a_jpeg_per_slide() {
            let dir = tempfile::tempdir().unwrap();
            let path = render_placeholder(dir.path(), 3).unwrap();

            assert!(path.ends_with("slide_3.jpg"));
            let bytes = std::fs::read(&path).unwrap();
            // JPEG SOI marker.
            assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        }
    }
}
