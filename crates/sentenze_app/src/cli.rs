use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use log::LevelFilter;
use sentenze_core::PublicationDate;
use sentenze_engine::{
    ExtractionLimits, FetchSettings, FileSourceProvider, HttpSourceProvider, PipelineConfig,
    RetryPolicy, SourceProvider,
};

/// Download the daily ruling, extract its text and publish a summary page.
#[derive(Parser, Debug)]
#[command(name = "sentenze")]
#[command(version)]
#[command(about = "Publishes the daily court ruling as PDF + HTML summary", long_about = None)]
pub struct Cli {
    /// Direct URL of the ruling PDF; takes precedence over `--source-file`
    #[arg(long, env = "PDF_URL")]
    pub pdf_url: Option<String>,

    /// Local file saved by an external acquisition step (PDF or plain text)
    #[arg(long, env = "SOURCE_FILE")]
    pub source_file: Option<PathBuf>,

    /// Directory receiving the published files
    #[arg(long, env = "OUT_DIR", default_value = "sentenze")]
    pub out_dir: PathBuf,

    /// Maximum number of PDF pages read
    #[arg(long, env = "MAX_PAGES", default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_pages: u64,

    /// Maximum number of characters kept from the extracted text
    #[arg(long, env = "MAX_CHARS", default_value_t = 200_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_chars: u64,

    /// Request timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT", default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub http_timeout: u64,

    /// Total download attempts
    #[arg(long, env = "HTTP_RETRIES", default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub http_retries: u32,

    /// Backoff before the second attempt, doubled for each further one
    #[arg(long, env = "RETRY_BASE_DELAY_MS", default_value_t = 1_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub retry_base_delay_ms: u64,

    /// Largest accepted download in bytes
    #[arg(long, env = "MAX_BYTES", default_value_t = 50 * 1024 * 1024, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_bytes: u64,

    /// Publication date (YYYY-MM-DD); defaults to today in Europe/Rome
    #[arg(long, env = "RUN_DATE")]
    pub date: Option<PublicationDate>,

    /// Also write logs to this file
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log verbosity: off, error, warn, info, debug or trace
    #[arg(long, env = "LOG_LEVEL", default_value = "warn", value_parser = parse_level)]
    pub log_level: LevelFilter,
}

impl Cli {
    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::new(self.out_dir.clone());
        config.limits = ExtractionLimits {
            max_pages: usize::try_from(self.max_pages).unwrap_or(usize::MAX),
            max_chars: usize::try_from(self.max_chars).unwrap_or(usize::MAX),
        };
        config.retry = RetryPolicy::new(
            self.http_retries,
            Duration::from_millis(self.retry_base_delay_ms),
        );
        config.fetch = FetchSettings {
            request_timeout: Duration::from_secs(self.http_timeout),
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        };
        config
    }

    /// A blank `PDF_URL` counts as unset; otherwise the URL wins over a file.
    pub fn source_provider(&self, fetch: FetchSettings) -> Result<Box<dyn SourceProvider>> {
        let url = self
            .pdf_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty());
        match (url, &self.source_file) {
            (Some(url), _) => Ok(Box::new(HttpSourceProvider::new(url, fetch))),
            (None, Some(path)) => Ok(Box::new(FileSourceProvider::new(path))),
            (None, None) => bail!("no source configured: set PDF_URL or SOURCE_FILE"),
        }
    }

    pub fn run_date(&self) -> PublicationDate {
        self.date.unwrap_or_else(PublicationDate::today)
    }
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level `{raw}`"))
}
