//! Sentenze engine: the publish pipeline and its I/O.
mod decode;
mod engine;
mod extract;
mod fetch;
mod manifest;
mod persist;
mod pipeline;
mod publish;
mod render;
mod retry;
mod types;
mod validate;

pub use decode::{decode_text, decode_text_lossy, DecodeError, DecodedText};
pub use engine::run_blocking;
pub use extract::{
    empty_text_warning, truncate_to_budget, DocumentExtractor, ExtractionLimits,
    ExtractionResult, PdfTextExtractor, PlainTextExtractor, TextExtractor,
    EMPTY_SOURCE_TEXT_WARNING, EMPTY_TEXT_WARNING, TRUNCATION_MARKER,
};
pub use fetch::{url_preview, FetchSettings, FileSourceProvider, HttpSourceProvider, SourceProvider};
pub use manifest::{sha256_hex, RunManifest};
pub use persist::{
    ensure_output_dir, AtomicFileWriter, PersistError, StagedWrite, WriteStatus, WrittenArtifact,
};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, RunReport};
pub use publish::{
    Artifact, ArtifactStore, PublishCoordinator, PublishError, PublishReport, PublishSet,
};
pub use render::{render_summary, MaudRenderer, RenderError, Renderer, SummaryPage};
pub use retry::{fetch_validated, Fetched, RetryExhausted, RetryPolicy, Sleeper, TokioSleeper};
pub use types::{
    ContentKind, ExtractionSummary, FailureKind, FetchError, FetchMetadata, NoopProgressSink,
    PipelineEvent, ProgressSink, SourceDocument,
};
pub use validate::{is_probably_pdf, validate, validate_bytes, ContentMismatchError, PDF_SIGNATURE};
