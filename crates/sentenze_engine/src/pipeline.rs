use std::path::PathBuf;

use bytes::Bytes;
use engine_logging::{engine_info, engine_warn};
use sentenze_core::{artifact_file_name, ArtifactKind, ArtifactRole, PublicationDate, RunOutcome, Stage};

use crate::extract::{empty_text_warning, DocumentExtractor, ExtractionLimits, TextExtractor};
use crate::fetch::{FetchSettings, SourceProvider};
use crate::manifest::RunManifest;
use crate::persist::{AtomicFileWriter, WrittenArtifact};
use crate::publish::{ArtifactStore, PublishCoordinator, PublishError, PublishSet};
use crate::render::{MaudRenderer, RenderError, Renderer, SummaryPage};
use crate::retry::{fetch_validated, RetryExhausted, RetryPolicy, Sleeper, TokioSleeper};
use crate::{ContentKind, ExtractionSummary, PipelineEvent, ProgressSink};

/// Explicit configuration of one run; nothing below reads the environment.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub out_dir: PathBuf,
    pub limits: ExtractionLimits,
    pub retry: RetryPolicy,
    pub fetch: FetchSettings,
}

impl PipelineConfig {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            limits: ExtractionLimits::default(),
            retry: RetryPolicy::default(),
            fetch: FetchSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub attempts: u32,
    pub extraction: Option<ExtractionSummary>,
    pub published: Vec<WrittenArtifact>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] RetryExhausted),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Fetch(err) if err.is_content_mismatch() => Stage::Validating,
            PipelineError::Fetch(_) => Stage::Fetching,
            PipelineError::Render(_) => Stage::Rendering,
            PipelineError::Publish(_) => Stage::Publishing,
        }
    }

    fn attempts(&self) -> u32 {
        match self {
            PipelineError::Fetch(err) => err.attempts,
            _ => 0,
        }
    }
}

/// download -> validate -> extract -> render -> publish.
///
/// Any failure before the publish stage returns before a single file is
/// touched; the publish stage itself only promotes latest pointers after every
/// dated snapshot is written.
pub struct Pipeline {
    config: PipelineConfig,
    provider: Box<dyn SourceProvider>,
    extractor: Box<dyn TextExtractor>,
    renderer: Box<dyn Renderer>,
    store: Box<dyn ArtifactStore>,
    sleeper: Box<dyn Sleeper>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, provider: Box<dyn SourceProvider>) -> Self {
        let store = AtomicFileWriter::new(config.out_dir.clone());
        Self {
            config,
            provider,
            extractor: Box::new(DocumentExtractor::default()),
            renderer: Box::new(MaudRenderer),
            store: Box::new(store),
            sleeper: Box::new(TokioSleeper),
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_store(mut self, store: Box<dyn ArtifactStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Box<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&self, date: PublicationDate, sink: &dyn ProgressSink) -> RunReport {
        engine_info!("run {} from {}", date, self.provider.describe());
        let report = match self.execute(date, sink).await {
            Ok(report) => report,
            Err(err) => {
                engine_warn!("run {} failed: {}", date, err);
                RunReport {
                    outcome: RunOutcome::Failed {
                        stage: err.stage(),
                        reason: err.to_string(),
                    },
                    attempts: err.attempts(),
                    extraction: None,
                    published: Vec::new(),
                }
            }
        };
        sink.emit(PipelineEvent::Finished(report.outcome.clone()));
        report
    }

    async fn execute(
        &self,
        date: PublicationDate,
        sink: &dyn ProgressSink,
    ) -> Result<RunReport, PipelineError> {
        sink.emit(PipelineEvent::StageStarted(Stage::Fetching));
        let fetched = fetch_validated(
            self.provider.as_ref(),
            &self.config.retry,
            self.sleeper.as_ref(),
            sink,
        )
        .await?;
        let document = fetched.document;

        sink.emit(PipelineEvent::StageStarted(Stage::Extracting));
        let extraction = self.extractor.extract(&document, self.config.limits);
        let summary = extraction.summary();
        sink.emit(PipelineEvent::Extracted(summary));

        let outcome = if extraction.is_empty {
            RunOutcome::Degraded {
                warning: empty_text_warning(document.kind).to_string(),
            }
        } else {
            RunOutcome::Success
        };

        sink.emit(PipelineEvent::StageStarted(Stage::Rendering));
        let document_kind = match document.kind {
            ContentKind::Pdf => ArtifactKind::Pdf,
            ContentKind::Text => ArtifactKind::Text,
        };
        let document_link = format!("./{}", artifact_file_name(document_kind, ArtifactRole::Latest, date));
        let page_link = format!("./{}", artifact_file_name(ArtifactKind::Html, ArtifactRole::Latest, date));
        let page = SummaryPage {
            date,
            source: &document.source,
            text: &extraction.text,
            warning: outcome.warning(),
            document_link: &document_link,
            document_label: match document.kind {
                ContentKind::Pdf => "PDF originale",
                ContentKind::Text => "Testo originale",
            },
            page_link: &page_link,
        };
        let html = self.renderer.render(&page)?;
        let manifest = RunManifest::new(
            date,
            &document.source,
            &outcome,
            document.kind,
            &document.bytes,
            summary,
        )
        .to_json()
        .map_err(RenderError::from)?;

        sink.emit(PipelineEvent::StageStarted(Stage::Publishing));
        // Latest pointers in promotion order: the page last, so a reader of
        // latest.html finds its siblings already updated.
        let set = PublishSet::mirrored(
            date,
            vec![
                (document_kind, document.bytes.clone()),
                (ArtifactKind::Manifest, Bytes::from(manifest)),
                (ArtifactKind::Html, Bytes::from(html)),
            ],
        );
        let published = PublishCoordinator::new(self.store.as_ref()).publish(&set, sink)?;

        Ok(RunReport {
            outcome,
            attempts: fetched.attempts,
            extraction: Some(summary),
            published: published.all().cloned().collect(),
        })
    }
}
