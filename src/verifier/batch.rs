use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::mx::LookupMx;
use crate::smtp_verify::RecipientProbe;

use super::outcome::Outcome;
use super::pipeline::Verifier;

/// Fatal errors of a run. Per-address failures never end up here.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("cannot open input file {}: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot create output file {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("reading input failed: {source}")]
    Read {
        #[source]
        source: io::Error,
    },
    #[error("writing output failed: {source}")]
    Write {
        #[source]
        source: io::Error,
    },
}

/// Per-outcome counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub accepted: usize,
    pub malformed: usize,
    pub syntax_invalid: usize,
    pub domain_unresolvable: usize,
    pub smtp_rejected: usize,
    pub smtp_unreachable: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        self.processed += 1;
        let counter = match outcome {
            Outcome::Accepted { .. } => &mut self.accepted,
            Outcome::MalformedAddress { .. } => &mut self.malformed,
            Outcome::SyntaxInvalid { .. } => &mut self.syntax_invalid,
            Outcome::DomainUnresolvable { .. } => &mut self.domain_unresolvable,
            Outcome::SmtpRejected { .. } => &mut self.smtp_rejected,
            Outcome::SmtpUnreachable { .. } => &mut self.smtp_unreachable,
        };
        *counter += 1;
    }

    pub fn skipped(&self) -> usize {
        self.processed - self.accepted
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} accepted, {} skipped (malformed {}, syntax {}, dns {}, rejected {}, unreachable {})",
            self.processed,
            self.accepted,
            self.skipped(),
            self.malformed,
            self.syntax_invalid,
            self.domain_unresolvable,
            self.smtp_rejected,
            self.smtp_unreachable
        )
    }
}

/// Verify every line of `input` and write accepted addresses to `output`,
/// one per line, flushing after each.
///
/// Lines are decoded lossily so a stray invalid byte only affects its own
/// line. Only I/O errors on `input` or `output` abort the run.
pub fn run_batch<R, P, I, W>(
    verifier: &Verifier<R, P>,
    mut input: I,
    output: &mut W,
) -> Result<BatchSummary, BatchError>
where
    R: LookupMx,
    P: RecipientProbe,
    I: BufRead,
    W: Write,
{
    let mut summary = BatchSummary::default();
    let mut raw = Vec::new();
    let mut line_no = 0usize;

    loop {
        raw.clear();
        let read = input
            .read_until(b'\n', &mut raw)
            .map_err(|source| BatchError::Read { source })?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let line = String::from_utf8_lossy(&raw);
        let address = line.trim();
        let outcome = verifier.verify(address);
        summary.record(&outcome);

        if outcome.is_accepted() {
            tracing::info!(line = line_no, "{address}: {outcome}");
            tracing::info!("Adding {address} to the output file.");
            writeln!(output, "{address}")
                .and_then(|()| output.flush())
                .map_err(|source| BatchError::Write { source })?;
        } else {
            tracing::info!(line = line_no, "{address}: {outcome}, skipped");
        }
    }

    tracing::info!("{summary}");
    Ok(summary)
}

/// Open `input_path`, create or truncate `output_path`, then [`run_batch`].
pub fn run_files<R, P>(
    verifier: &Verifier<R, P>,
    input_path: &Path,
    output_path: &Path,
) -> Result<BatchSummary, BatchError>
where
    R: LookupMx,
    P: RecipientProbe,
{
    let input = File::open(input_path).map_err(|source| BatchError::OpenInput {
        path: input_path.to_path_buf(),
        source,
    })?;
    let mut output = File::create(output_path).map_err(|source| BatchError::CreateOutput {
        path: output_path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        input = %input_path.display(),
        output = %output_path.display(),
        "files opened"
    );
    run_batch(verifier, BufReader::new(input), &mut output)
}
