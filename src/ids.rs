//! Identifier allocation for the annotation surface.
//!
//! Every page carries an asset id (the image resource) and a shape id (the
//! drawable placed on the canvas). The loader only allocates them; their
//! format belongs to the annotation surface, so allocation goes through the
//! injected [`IdGenerator`].

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a page's image asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a page's drawable shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Allocates unique identifiers in the annotation surface's namespace.
///
/// Called from the blocking render thread, hence `Send + Sync`. Every call
/// must return a fresh identifier.
pub trait IdGenerator: Send + Sync {
    fn asset_id(&self) -> AssetId;
    fn shape_id(&self) -> ShapeId;
}

/// Random v4 UUIDs with `asset:` / `shape:` record prefixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn asset_id(&self) -> AssetId {
        AssetId(format!("asset:{}", Uuid::new_v4().simple()))
    }

    fn shape_id(&self) -> ShapeId {
        ShapeId(format!("shape:{}", Uuid::new_v4().simple()))
    }
}
