use serde::Serialize;
use sha2::{Digest, Sha256};

use sentenze_core::{PublicationDate, RunOutcome};

use crate::{ContentKind, ExtractionSummary};

/// Machine-readable description of a published run. Holds no wall-clock
/// fields, so the same input always serializes to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunManifest {
    pub date: String,
    pub source: String,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub document: DocumentEntry,
    pub extraction: ExtractionEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentEntry {
    pub kind: String,
    pub sha256: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionEntry {
    pub pages_read: usize,
    pub total_pages: usize,
    pub chars: usize,
    pub truncated: bool,
    pub empty: bool,
}

impl RunManifest {
    pub fn new(
        date: PublicationDate,
        source: &str,
        outcome: &RunOutcome,
        kind: ContentKind,
        document: &[u8],
        extraction: ExtractionSummary,
    ) -> Self {
        Self {
            date: date.to_string(),
            source: source.to_string(),
            outcome: outcome.label().to_string(),
            warning: outcome.warning().map(str::to_string),
            document: DocumentEntry {
                kind: match kind {
                    ContentKind::Pdf => "pdf",
                    ContentKind::Text => "text",
                }
                .to_string(),
                sha256: sha256_hex(document),
                bytes: document.len() as u64,
            },
            extraction: ExtractionEntry {
                pages_read: extraction.pages_read,
                total_pages: extraction.total_pages,
                chars: extraction.chars,
                truncated: extraction.truncated,
                empty: extraction.is_empty,
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut hex = String::with_capacity(64);
    for byte in digest.iter() {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
