use thiserror::Error;

/// Errors that abort a report run.
///
/// Everything upstream of writing the output (missing inputs, malformed
/// records, unparsable timestamps) degrades to defaults instead of failing.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode dashboard document: {0}")]
    Encode(#[from] serde_json::Error),
}
