//! Reading raw marketplace documents and writing the dashboard document.

use std::path::Path;

use mpdash_core::Marketplace;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::ReportError;
use crate::types::{OzonRawDocument, RawDocument, WbRawDocument};

/// Loads one marketplace's raw document.
///
/// A missing or unparsable file means the marketplace has no data for this
/// run; it is logged and reported as `None` rather than failing the run.
#[must_use]
pub fn load_raw_document(path: &Path, marketplace: Marketplace) -> Option<RawDocument> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(
                %marketplace,
                path = %path.display(),
                error = %e,
                "raw document unavailable; marketplace will be reported as No Data"
            );
            return None;
        }
    };

    let parsed = match marketplace {
        Marketplace::Wildberries => {
            serde_json::from_str::<WbRawDocument>(&contents).map(RawDocument::Wildberries)
        }
        Marketplace::Ozon => {
            serde_json::from_str::<OzonRawDocument>(&contents).map(RawDocument::Ozon)
        }
    };

    match parsed {
        Ok(document) => Some(document),
        Err(e) => {
            tracing::warn!(
                %marketplace,
                path = %path.display(),
                error = %e,
                "raw document is not valid JSON of the expected shape; skipping"
            );
            None
        }
    }
}

/// Renders a value as pretty JSON with 4-space indentation and a trailing
/// newline. Non-ASCII text is written as-is.
///
/// # Errors
///
/// Returns [`ReportError::Encode`] if serialization fails.
pub fn render_json<T: Serialize>(value: &T) -> Result<Vec<u8>, ReportError> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

/// Writes `value` to `path` as rendered by [`render_json`], creating the
/// parent directory if needed.
///
/// # Errors
///
/// Returns [`ReportError::Encode`] if serialization fails, or
/// [`ReportError::Io`] if the directory or file cannot be written.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ReportError> {
    let bytes = render_json(value)?;
    let io_err = |source| ReportError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, bytes).map_err(io_err)
}
