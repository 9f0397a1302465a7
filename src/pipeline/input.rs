//! Input handling: read the selected file and check it looks like a PDF.
//!
//! The header check runs before pdfium is involved so that an obviously
//! wrong file (an image, a Word document, an empty file) fails fast with a
//! readable message, even on hosts where pdfium is not installed.

use crate::error::LoadError;
use std::path::Path;
use tracing::debug;

/// The only MIME type the file chooser offers.
pub const PDF_MIME: &str = "application/pdf";

/// PDF header marker.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Readers tolerate junk before the header within this many bytes.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Whether `bytes` carry a `%PDF-` header within the first 1024 bytes.
pub fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

/// Fail with [`LoadError::Decode`] unless `bytes` look like a PDF.
pub fn check_pdf_header(bytes: &[u8]) -> Result<(), LoadError> {
    if has_pdf_header(bytes) {
        return Ok(());
    }
    let detail = if bytes.is_empty() {
        "file is empty".to_string()
    } else {
        let head = &bytes[..bytes.len().min(4)];
        format!("missing %PDF- header (first bytes: {head:?})")
    };
    Err(LoadError::Decode { detail })
}

/// Read a local file into memory, mapping I/O failures to [`LoadError`].
pub async fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => LoadError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => LoadError::FileRead {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Display name of a selected file: its file name, or `document.pdf`.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "document.pdf".to_string())
}
