//! The document model handed to the annotation surface.
//!
//! A [`DocumentDescriptor`] is built once by the loader and never mutated
//! afterwards; the host shares it behind an `Arc` for the editing session.

use crate::ids::{AssetId, ShapeId};
use crate::pipeline::encode;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// Placement rectangle of a page, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// One rendered page placed on the canvas.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// PNG data URL of the rendered page.
    pub image: String,
    pub bounds: Bounds,
    pub asset_id: AssetId,
    pub shape_id: ShapeId,
    /// Mean luma of the rendered page is above 128.
    pub light_background: bool,
}

impl Page {
    /// Decoded PNG bytes of [`Page::image`].
    pub fn png_bytes(&self) -> Option<Vec<u8>> {
        encode::decode_data_url(&self.image).map(|(_, bytes)| bytes)
    }
}

/// One imported PDF.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentDescriptor {
    /// Display name, usually the selected file's name.
    pub name: String,
    /// Pages in source order.
    pub pages: Vec<Page>,
    /// The original PDF bytes.
    #[serde(rename = "sourceLen", serialize_with = "serialize_len")]
    pub source: Arc<[u8]>,
}

impl DocumentDescriptor {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Width of the widest page; every page is centred on it.
    pub fn widest_width(&self) -> f64 {
        self.pages
            .iter()
            .map(|p| p.bounds.width)
            .fold(0.0, f64::max)
    }

    /// Bottom edge of the last page.
    pub fn total_height(&self) -> f64 {
        self.pages.last().map(|p| p.bounds.bottom()).unwrap_or(0.0)
    }
}

fn serialize_len<S: Serializer>(source: &Arc<[u8]>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(source.len() as u64)
}
