use engine_logging::{engine_debug, engine_warn};
use lopdf::Document;

use crate::decode::decode_text_lossy;
use crate::{ContentKind, ExtractionSummary, SourceDocument};

pub const TRUNCATION_MARKER: &str = "\n\n[... testo tagliato ...]";
pub const EMPTY_TEXT_WARNING: &str = "Testo non estraibile dal PDF (potrebbe essere una scansione).";
pub const EMPTY_SOURCE_TEXT_WARNING: &str = "Il file sorgente non contiene testo.";

/// Warning shown on the page when nothing could be extracted.
pub fn empty_text_warning(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Pdf => EMPTY_TEXT_WARNING,
        ContentKind::Text => EMPTY_SOURCE_TEXT_WARNING,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionLimits {
    pub max_pages: usize,
    pub max_chars: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_pages: 30,
            max_chars: 200_000,
        }
    }
}

/// Bounded plain text of a document.
///
/// `text` is the trimmed, newline-joined page text. It never holds more than
/// `max_chars` characters of source text; when the source was longer it is cut
/// and [`TRUNCATION_MARKER`] is appended. Raw page text is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Pages read in document order, unreadable ones included.
    pub pages_read: usize,
    pub text: String,
    pub total_pages: usize,
    pub is_empty: bool,
    pub truncated: bool,
}

impl ExtractionResult {
    pub fn from_pages(pages: Vec<String>, total_pages: usize, max_chars: usize) -> Self {
        let joined = pages.join("\n");
        let trimmed = joined.trim();
        let is_empty = trimmed.is_empty();
        let (text, truncated) = truncate_to_budget(trimmed, max_chars);
        Self {
            pages_read: pages.len(),
            text,
            total_pages,
            is_empty,
            truncated,
        }
    }

    pub fn summary(&self) -> ExtractionSummary {
        ExtractionSummary {
            pages_read: self.pages_read,
            total_pages: self.total_pages,
            chars: self.text.chars().count(),
            truncated: self.truncated,
            is_empty: self.is_empty,
        }
    }
}

/// Cut `text` to `max_chars` characters (never inside a character) and append
/// the truncation marker when anything was dropped.
pub fn truncate_to_budget(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        None => (text.to_string(), false),
        Some((cut, _)) => (format!("{}{TRUNCATION_MARKER}", &text[..cut]), true),
    }
}

pub trait TextExtractor: Send + Sync {
    /// Best-effort extraction; an unreadable document yields an empty result.
    fn extract(&self, document: &SourceDocument, limits: ExtractionLimits) -> ExtractionResult;
}

/// PDF text through `lopdf`; a page that fails to extract contributes an
/// empty segment instead of aborting the document.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    fn read_pages(&self, bytes: &[u8], max_pages: usize) -> (Vec<String>, usize) {
        let doc = match Document::load_mem(bytes) {
            Ok(doc) => doc,
            Err(err) => {
                engine_warn!("PDF could not be parsed: {err}");
                return (Vec::new(), 0);
            }
        };

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let total = page_numbers.len();
        let pages = page_numbers
            .into_iter()
            .take(max_pages)
            .map(|number| match doc.extract_text(&[number]) {
                Ok(text) => text,
                Err(err) => {
                    engine_warn!("page {number}: text extraction failed: {err}");
                    String::new()
                }
            })
            .collect();
        (pages, total)
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, document: &SourceDocument, limits: ExtractionLimits) -> ExtractionResult {
        let (pages, total) = self.read_pages(&document.bytes, limits.max_pages);
        engine_debug!("read {} of {} PDF pages", pages.len(), total);
        ExtractionResult::from_pages(pages, total, limits.max_chars)
    }
}

/// Plain-text sources are a single page of decoded text.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, document: &SourceDocument, limits: ExtractionLimits) -> ExtractionResult {
        let decoded = decode_text_lossy(&document.bytes, document.metadata.content_type.as_deref());
        engine_debug!("decoded text source as {}", decoded.encoding_label);
        let pages = if limits.max_pages == 0 {
            Vec::new()
        } else {
            vec![decoded.text]
        };
        ExtractionResult::from_pages(pages, 1, limits.max_chars)
    }
}

/// Picks the extractor matching the document kind.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentExtractor {
    pdf: PdfTextExtractor,
    text: PlainTextExtractor,
}

impl TextExtractor for DocumentExtractor {
    fn extract(&self, document: &SourceDocument, limits: ExtractionLimits) -> ExtractionResult {
        match document.kind {
            ContentKind::Pdf => self.pdf.extract(document, limits),
            ContentKind::Text => self.text.extract(document, limits),
        }
    }
}
