//! JSON export of a loaded document for out-of-process annotation surfaces.

use crate::document::DocumentDescriptor;
use crate::error::LoadError;
use std::path::Path;

/// Serialise a descriptor to JSON. Page images are embedded as data URLs;
/// the raw PDF bytes are not included.
pub fn to_json(document: &DocumentDescriptor, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(document)
    } else {
        serde_json::to_string(document)
    }
}

/// Write a descriptor as JSON to `path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn write_json(
    document: &DocumentDescriptor,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), LoadError> {
    let path = path.as_ref();
    let write_err = |source: std::io::Error| LoadError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let json = to_json(document, pretty).map_err(|e| write_err(e.into()))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    Ok(())
}
