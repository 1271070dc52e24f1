//! Summary page rendering.
//!
//! The output is a single `<div class="sentenza-wrap">` fragment with its own
//! `<style>` block inside it, so the page survives being injected into another
//! document via `body.innerHTML` as well as being opened standalone. Every
//! interpolated value goes through maud's escaping: extracted text is
//! untrusted input.

use maud::{html, PreEscaped};
use sentenze_core::PublicationDate;

const STYLE: &str = r#"
.sentenza-wrap{font-family:system-ui,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,Arial,sans-serif;max-width:900px;margin:0 auto;line-height:1.6;}
.sentenza-head{margin:0 0 14px 0;}
.sentenza-meta{color:#666;margin:0 0 18px 0;font-size:0.95em;}
.sentenza-links a{display:inline-block;margin-right:12px;}
.sentenza-warning{color:#b00020;background:#fdecea;border:1px solid #f5c2c0;border-radius:8px;padding:10px 14px;}
pre.sentenza-text{white-space:pre-wrap;background:#f6f6f6;padding:16px;border-radius:12px;border:1px solid #e6e6e6;user-select:text;-webkit-user-select:text;-moz-user-select:text;}
"#;

/// Everything the summary page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPage<'a> {
    pub date: PublicationDate,
    pub source: &'a str,
    pub text: &'a str,
    pub warning: Option<&'a str>,
    /// Relative link to the sibling latest document copy.
    pub document_link: &'a str,
    pub document_label: &'a str,
    /// Relative link to the sibling latest page.
    pub page_link: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template failed: {0}")]
    Template(String),
    #[error("manifest serialization failed: {0}")]
    Manifest(#[from] serde_json::Error),
}

pub trait Renderer: Send + Sync {
    fn render(&self, page: &SummaryPage<'_>) -> Result<String, RenderError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MaudRenderer;

impl Renderer for MaudRenderer {
    fn render(&self, page: &SummaryPage<'_>) -> Result<String, RenderError> {
        Ok(render_summary(page))
    }
}

/// Pure and total: same input, same bytes.
pub fn render_summary(page: &SummaryPage<'_>) -> String {
    let markup = html! {
        div class="sentenza-wrap" {
            style { (PreEscaped(STYLE)) }
            h2 class="sentenza-head" { "Riassunto sentenza" }
            p class="sentenza-meta" {
                strong { "Data:" } " " (page.date) " \u{2022} "
                strong { "Fonte:" } " " (page.source)
            }
            p class="sentenza-links" {
                a href=(page.document_link) target="_blank" rel="noopener" { (page.document_label) }
                a href=(page.page_link) target="_blank" rel="noopener" { "Apri HTML" }
            }
            @if let Some(warning) = page.warning {
                p class="sentenza-warning" role="alert" {
                    strong { "Nota:" } " " (warning)
                }
            }
            pre class="sentenza-text" { (page.text) }
        }
    };
    let mut out = markup.into_string();
    out.push('\n');
    out
}
