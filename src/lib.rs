//! Insert a blank page after every page of one or more PDFs.
//!
//! The crate splits into a pure transform and an orchestration layer:
//! [`interleave_blank_pages`] turns one PDF byte buffer into another with
//! doubled page count, and [`process_batch`] runs that transform over a set
//! of named inputs, returning either a single PDF or a zip archive plus the
//! list of inputs that failed. The upload/process/download control flow is
//! modeled as a pure state machine in [`batch::state`], so any host (the
//! bundled CLI, a web handler, tests) can drive it.
//!
//! # Example
//!
//! ```no_run
//! use pdf_interleave::{process_batch, InputDocument};
//!
//! let inputs = vec![InputDocument {
//!     name: "report.pdf".to_string(),
//!     bytes: std::fs::read("report.pdf").unwrap(),
//! }];
//!
//! let outcome = process_batch(&inputs).unwrap();
//! let download = outcome.download.expect("processing failed");
//! assert_eq!(download.file_name, "report_add_blank.pdf");
//! std::fs::write(&download.file_name, &download.bytes).unwrap();
//! ```

pub mod batch;
pub mod cli;
pub mod error;
pub mod interleave;

pub use batch::{
    derived_name, process_batch, BatchFailure, BatchOutcome, Command, Download, Event,
    InputDocument, Session, SessionState, ARCHIVE_NAME, PDF_MEDIA_TYPE, ZIP_MEDIA_TYPE,
};
pub use error::{ArchiveError, InterleaveError};
pub use interleave::{interleave_blank_pages, page_count};
