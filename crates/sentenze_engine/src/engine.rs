use std::io;

use sentenze_core::PublicationDate;

use crate::pipeline::{Pipeline, RunReport};
use crate::ProgressSink;

/// Drive one pipeline run to completion on a single-threaded runtime.
pub fn run_blocking(
    pipeline: &Pipeline,
    date: PublicationDate,
    sink: &dyn ProgressSink,
) -> Result<RunReport, io::Error> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(pipeline.run(date, sink)))
}
