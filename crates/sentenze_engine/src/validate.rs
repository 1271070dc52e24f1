use crate::{ContentKind, SourceDocument};

pub const PDF_SIGNATURE: &[u8] = b"%PDF";

const HTML_MARKERS: &[&[u8]] = &[b"<!doctype html", b"<html"];

/// The payload is not the kind of content the source is supposed to serve,
/// typically an HTML error page delivered with status 200.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentMismatchError {
    #[error("empty response body")]
    Empty,
    #[error("not a PDF (Content-Type={content_type})")]
    NotPdf { content_type: String },
    #[error("HTML page where plain text was expected")]
    HtmlPage,
}

/// Accept the document only if it is genuine target content.
pub fn validate(document: &SourceDocument) -> Result<(), ContentMismatchError> {
    validate_bytes(
        &document.bytes,
        document.kind,
        document.metadata.content_type.as_deref(),
    )
}

pub fn validate_bytes(
    bytes: &[u8],
    kind: ContentKind,
    content_type: Option<&str>,
) -> Result<(), ContentMismatchError> {
    let trimmed = bytes.trim_ascii_start();
    if trimmed.is_empty() {
        return Err(ContentMismatchError::Empty);
    }

    match kind {
        ContentKind::Pdf => {
            if trimmed.starts_with(PDF_SIGNATURE) {
                Ok(())
            } else {
                Err(ContentMismatchError::NotPdf {
                    content_type: content_type.unwrap_or_default().to_ascii_lowercase(),
                })
            }
        }
        ContentKind::Text => {
            if looks_like_html(trimmed) {
                Err(ContentMismatchError::HtmlPage)
            } else {
                Ok(())
            }
        }
    }
}

/// Leading whitespace is tolerated before the `%PDF` signature.
pub fn is_probably_pdf(bytes: &[u8]) -> bool {
    bytes.trim_ascii_start().starts_with(PDF_SIGNATURE)
}

fn looks_like_html(trimmed: &[u8]) -> bool {
    HTML_MARKERS.iter().any(|marker| {
        trimmed.len() >= marker.len() && trimmed[..marker.len()].eq_ignore_ascii_case(marker)
    })
}
