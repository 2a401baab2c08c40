use thiserror::Error;

/// Failures in the page interleaving transform.
///
/// Parsing and page-tree access surface `lopdf::Error`; serialization goes
/// through a `Write` target and surfaces `std::io::Error`.
#[derive(Error, Debug)]
pub enum InterleaveError {
    #[error("Failed to parse PDF: {0}")]
    Parse(lopdf::Error),

    #[error("Failed to serialize PDF: {0}")]
    Serialize(std::io::Error),
}

/// Failures while packaging batch results into a zip archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to add archive entry {name}: {source}")]
    Entry {
        name: String,
        source: zip::result::ZipError,
    },

    #[error("Failed to finalize archive: {0}")]
    Finalize(zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
