//! # pdf-canvas
//!
//! Import a PDF onto an infinite canvas for a drawing/annotation surface.
//!
//! Every page is rasterised with pdfium, classified as light or dark from its
//! own pixels, encoded as a PNG data URL, and placed in a vertical stack
//! centred on the widest page. The result is a [`DocumentDescriptor`] the
//! annotation surface can materialise without touching the file system.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Input       %PDF- header check (fails fast on non-PDFs)
//!  ├─ 2. Render      pdfium, one page at a time, spawn_blocking
//!  ├─ 3. Brightness  BT.601 luma of the mean page colour, > 128 = light
//!  ├─ 4. Encode      PNG → base64 data URL
//!  └─ 5. Layout      stack with 32-unit gaps, centre on the widest page
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_canvas::{DocumentLoader, LoadConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LoadConfig::builder().device_pixel_ratio(2.0).build()?;
//!     let loader = DocumentLoader::new(config);
//!     let doc = loader.load_file("document.pdf").await?;
//!     for page in &doc.pages {
//!         println!("{} {:?} light={}", page.shape_id, page.bounds, page.light_background);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Interactive front-ends wrap the loader in a [`PresentationHost`], which
//! tracks the picking/editing phase and the busy indicator.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2canvas` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod host;
pub mod ids;
pub mod loader;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{LoadConfig, LoadConfigBuilder, PAGE_SPACING, VISUAL_SCALE};
pub use document::{Bounds, DocumentDescriptor, Page};
pub use error::LoadError;
pub use host::{
    AnnotationSurface, FileChooser, HostObserver, Phase, PresentationHost, SelectedFile,
    SelectionOutcome, TracingObserver,
};
pub use ids::{AssetId, IdGenerator, ShapeId, UuidIdGenerator};
pub use loader::DocumentLoader;
pub use pipeline::render::{PageRasterizer, PdfDecoder, PdfiumDecoder, Surface, Viewport};
pub use progress::{LoadProgressCallback, NoopProgressCallback, ProgressCallback};
