//! Batch orchestration
//!
//! Runs the page interleaver over a set of named input documents and
//! packages the results for download: one input yields a direct PDF, two or
//! more yield a single deflate-compressed zip archive. Per-file failures
//! never abort the batch; the failing file is left out of the archive and
//! recorded in the outcome so the host can tell the user what is missing.

pub mod state;

pub use state::{step, Command, Event, SessionState};

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ArchiveError;
use crate::interleave::interleave_blank_pages;

/// Media type for a single processed document.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";
/// Media type for a zipped batch.
pub const ZIP_MEDIA_TYPE: &str = "application/zip";
/// Fixed name of the archive offered for multi-file batches.
pub const ARCHIVE_NAME: &str = "processed_pdfs.zip";

/// A named PDF byte buffer presented for processing.
#[derive(Debug, Clone)]
pub struct InputDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// A result ready to be offered to the user.
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

/// One input that could not be processed.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub file_name: String,
    pub reason: String,
}

/// What a batch run produced: at most one download, plus the inputs that
/// had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub download: Option<Download>,
    pub failures: Vec<BatchFailure>,
}

/// Derive the output filename for a processed document.
///
/// Exactly one trailing `.pdf` is stripped before the suffix goes on:
/// `report.pdf` becomes `report_add_blank.pdf`, `a.b.pdf` becomes
/// `a.b_add_blank.pdf`, and a name without the extension keeps its stem.
pub fn derived_name(original: &str) -> String {
    let stem = original.strip_suffix(".pdf").unwrap_or(original);
    format!("{}_add_blank.pdf", stem)
}

/// Process every input in presentation order and package the results.
///
/// Zero inputs produce no download. Exactly one input produces a direct
/// PDF download, or no download at all if that input fails. Two or more
/// inputs always produce an archive holding the successful outputs.
pub fn process_batch(inputs: &[InputDocument]) -> Result<BatchOutcome, ArchiveError> {
    let mut outcome = BatchOutcome::default();

    match inputs {
        [] => {}
        [single] => {
            log::info!("Processing {}", single.name);
            match interleave_blank_pages(&single.bytes) {
                Ok(bytes) => {
                    outcome.download = Some(Download {
                        file_name: derived_name(&single.name),
                        media_type: PDF_MEDIA_TYPE,
                        bytes,
                    });
                }
                Err(err) => outcome.failures.push(BatchFailure {
                    file_name: single.name.clone(),
                    reason: err.to_string(),
                }),
            }
        }
        many => {
            let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

            for input in many {
                log::info!("Processing {}", input.name);
                match interleave_blank_pages(&input.bytes) {
                    Ok(bytes) => {
                        let name = derived_name(&input.name);
                        zip.start_file(name.clone(), options)
                            .map_err(|source| ArchiveError::Entry { name, source })?;
                        zip.write_all(&bytes)?;
                    }
                    Err(err) => {
                        log::warn!("Skipping {}: {}", input.name, err);
                        outcome.failures.push(BatchFailure {
                            file_name: input.name.clone(),
                            reason: err.to_string(),
                        });
                    }
                }
            }

            let buffer = zip.finish().map_err(ArchiveError::Finalize)?;
            outcome.download = Some(Download {
                file_name: ARCHIVE_NAME.to_string(),
                media_type: ZIP_MEDIA_TYPE,
                bytes: buffer.into_inner(),
            });
        }
    }

    Ok(outcome)
}

/// One upload-to-download interaction, driven by the state machine in
/// [`state`]. Owns the current file set and runs the batch when commanded.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    inputs: Vec<InputDocument>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Replace the uploaded file set. Refused while a batch is running, in
    /// which case the current inputs are kept.
    pub fn set_inputs(&mut self, inputs: Vec<InputDocument>) -> Command {
        if self.state == SessionState::Processing {
            return Command::None;
        }
        let (state, command) = step(self.state, Event::FileSetChanged { count: inputs.len() });
        self.state = state;
        self.inputs = inputs;
        command
    }

    /// The user asked for processing; returns `Command::RunBatch` when the
    /// session is ready, otherwise a no-op.
    pub fn trigger(&mut self) -> Command {
        let (state, command) = step(self.state, Event::ProcessTriggered);
        self.state = state;
        command
    }

    /// Run the batch to completion. Only meaningful after [`Self::trigger`]
    /// returned `Command::RunBatch`; in any other state this is a no-op
    /// returning an empty outcome.
    pub fn run(&mut self) -> Result<BatchOutcome, ArchiveError> {
        if self.state != SessionState::Processing {
            return Ok(BatchOutcome::default());
        }
        let outcome = process_batch(&self.inputs)?;
        let (state, _) = step(self.state, Event::ProcessingFinished);
        self.state = state;
        Ok(outcome)
    }
}
