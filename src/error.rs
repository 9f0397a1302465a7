//! Error types for the pdf-canvas library.
//!
//! Every failure of a load attempt is fatal to that attempt: a document with
//! a missing page would break page ordering on the canvas, so there is no
//! per-page error channel. [`LoadError`] is the single error type returned by
//! the loader, the host and the export helpers.
//!
//! The three core failure classes are:
//!
//! * [`LoadError::Decode`]: the bytes are not a PDF pdfium can open.
//! * [`LoadError::Render`]: one page could not be rasterised or encoded.
//! * [`LoadError::Environment`]: the rendering engine itself is unavailable.
//!
//! The remaining variants cover reading the selected file, configuration and
//! writing exported JSON.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf-canvas library.
#[derive(Debug, Error)]
pub enum LoadError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Selected file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but reading it failed midway.
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The bytes are not a PDF, are corrupt, or need a (different) password.
    #[error("Could not decode PDF: {detail}")]
    Decode { detail: String },

    /// A page could not be rasterised or encoded. Fatal to the whole load.
    #[error("Rendering failed for page {page}: {detail}")]
    Render { page: usize, detail: String },

    /// A required rendering primitive is unavailable.
    #[error(
        "Rendering environment unavailable: {0}\n\n\
PDFium could not be loaded. You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place the platform pdfium library in the working directory.\n\
  • Install pdfium system-wide.\n"
    )]
    Environment(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the exported JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// 1-indexed page number the error is attached to, if any.
    pub fn page(&self) -> Option<usize> {
        match self {
            LoadError::Render { page, .. } => Some(*page),
            _ => None,
        }
    }
}
