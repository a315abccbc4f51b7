//! JSON-lines batch processing of [`TrackingJob`]s.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::job::{JobDefaults, TrackingJob};
use super::process_job;

/// Outcome counts of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Jobs written to the output
    pub accepted: usize,
    /// Jobs dropped for an invalid tracking config
    pub skipped: usize,
}

/// Read one job per line, writing a [`TrackedEmail`](super::TrackedEmail) line per accepted job.
///
/// Blank lines are ignored. Jobs with an invalid config are logged with their
/// line number and skipped. Only read, write and JSON syntax errors fail the
/// batch.
pub fn run_batch<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    defaults: &JobDefaults,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("Failed to read line {line_number}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let job: TrackingJob = serde_json::from_str(&line)
            .with_context(|| format!("Invalid job JSON on line {line_number}"))?;

        match process_job(job, defaults) {
            Ok(tracked) => {
                let json =
                    serde_json::to_string(&tracked).context("Failed to serialize result")?;
                writeln!(writer, "{json}").context("Failed to write output")?;
                summary.accepted += 1;
            }
            Err(e) => {
                warn!(line = line_number, error = %e, "batch_job_skipped");
                summary.skipped += 1;
            }
        }
    }

    writer.flush().context("Failed to write output")?;

    info!(
        accepted = summary.accepted,
        skipped = summary.skipped,
        "batch_complete"
    );

    Ok(summary)
}
