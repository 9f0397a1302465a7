//! The document loader: PDF bytes in, [`DocumentDescriptor`] out.
//!
//! ## Why strictly sequential?
//!
//! Rendering pages in parallel would finish sooner but keep several
//! oversampled rasters alive at once. Pages are processed one after another
//! (render, classify, encode, place) on a single blocking worker, so peak
//! memory is one page's raster plus the encoded PNGs collected so far.
//! Page `i + 1` is never rendered before page `i` has been classified and
//! encoded.

use crate::config::{LoadConfig, PAGE_SPACING};
use crate::document::{DocumentDescriptor, Page};
use crate::error::LoadError;
use crate::ids::{IdGenerator, UuidIdGenerator};
use crate::pipeline::render::{PageRasterizer, PdfDecoder, PdfiumDecoder, Surface, Viewport};
use crate::pipeline::{brightness, encode, input, layout};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Loads PDFs into canvas-ready documents.
///
/// Cheap to clone; the decoder and id generator are shared.
#[derive(Clone)]
pub struct DocumentLoader {
    decoder: Arc<dyn PdfDecoder>,
    ids: Arc<dyn IdGenerator>,
    config: LoadConfig,
}

impl DocumentLoader {
    /// Loader backed by pdfium, allocating UUID-based identifiers.
    pub fn new(config: LoadConfig) -> Self {
        Self::with_components(
            Arc::new(PdfiumDecoder::new()),
            Arc::new(UuidIdGenerator),
            config,
        )
    }

    /// Loader with an explicit decoder and identifier scheme.
    pub fn with_components(
        decoder: Arc<dyn PdfDecoder>,
        ids: Arc<dyn IdGenerator>,
        config: LoadConfig,
    ) -> Self {
        Self {
            decoder,
            ids,
            config,
        }
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Decode, render, classify and lay out every page of a PDF.
    ///
    /// `raw` becomes the descriptor's `source`; the decoder works on a copy.
    ///
    /// # Errors
    /// - [`LoadError::Decode`] — not a PDF, corrupt, or password problems
    /// - [`LoadError::Render`] — any page failed; no partial document
    /// - [`LoadError::Environment`] — pdfium unavailable or the render task died
    pub async fn load_document(
        &self,
        name: impl Into<String>,
        raw: impl Into<Arc<[u8]>>,
    ) -> Result<DocumentDescriptor, LoadError> {
        let start = Instant::now();
        let name = name.into();
        let source: Arc<[u8]> = raw.into();
        info!("Loading '{}' ({} bytes)", name, source.len());

        input::check_pdf_header(&source)?;

        let decoder = Arc::clone(&self.decoder);
        let ids = Arc::clone(&self.ids);
        let config = self.config.clone();
        let bytes = source.to_vec();

        let pages = tokio::task::spawn_blocking(move || {
            render_document(decoder.as_ref(), ids.as_ref(), &config, bytes)
        })
        .await
        .map_err(|e| LoadError::Environment(format!("Render task panicked: {e}")))??;

        info!(
            "Loaded '{}': {} pages in {}ms",
            name,
            pages.len(),
            start.elapsed().as_millis()
        );

        Ok(DocumentDescriptor {
            name,
            pages,
            source,
        })
    }

    /// Read a local PDF and load it under its file name.
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<DocumentDescriptor, LoadError> {
        let path = path.as_ref();
        let bytes = input::read_file(path).await?;
        self.load_document(input::display_name(path), bytes).await
    }

    /// Synchronous wrapper around [`load_document`](Self::load_document).
    ///
    /// Creates a temporary tokio runtime internally; do not call from inside
    /// an async context.
    pub fn load_document_sync(
        &self,
        name: impl Into<String>,
        raw: impl Into<Arc<[u8]>>,
    ) -> Result<DocumentDescriptor, LoadError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| LoadError::Environment(format!("Failed to create tokio runtime: {e}")))?
            .block_on(self.load_document(name, raw))
    }
}

/// Blocking decode-and-render pass over a whole document.
pub fn render_document(
    decoder: &dyn PdfDecoder,
    ids: &dyn IdGenerator,
    config: &LoadConfig,
    bytes: Vec<u8>,
) -> Result<Vec<Page>, LoadError> {
    let mut pages = Vec::new();
    decoder.decode(bytes, config.password.as_deref(), &mut |document| {
        pages = rasterize_pages(document, ids, config)?;
        Ok(())
    })?;
    Ok(pages)
}

fn rasterize_pages(
    document: &mut dyn PageRasterizer,
    ids: &dyn IdGenerator,
    config: &LoadConfig,
) -> Result<Vec<Page>, LoadError> {
    let total = document.page_count();
    let progress = config.progress_callback.as_ref();
    if let Some(cb) = progress {
        cb.on_load_start(total);
    }

    let scale = config.render_scale();
    let mut surface = Surface::new();
    let mut stack = layout::PageStack::new(PAGE_SPACING);
    let mut pages = Vec::with_capacity(total);

    for index in 0..total {
        let page_num = index + 1;

        let (width_pt, height_pt) = document.page_size(index)?;
        let viewport = Viewport::for_page(width_pt, height_pt, scale);
        // The previous page is encoded; drop its pixels before rendering.
        surface.release();
        document.render_into(index, &viewport, &mut surface)?;

        let light_background =
            brightness::is_light_background(surface.pixels(), config.sample_stride);
        let (width, height) = viewport.layout_size(config.device_pixel_ratio);
        let asset_id = ids.asset_id();
        let shape_id = ids.shape_id();

        let image = encode::encode_data_url(surface.image()).map_err(|e| LoadError::Render {
            page: page_num,
            detail: format!("PNG encoding failed: {e}"),
        })?;

        let bounds = stack.place(width, height);
        debug!(
            "Page {}/{}: {:.1}x{:.1} at y={:.1}, light={}",
            page_num, total, width, height, bounds.y, light_background
        );

        pages.push(Page {
            image,
            bounds,
            asset_id,
            shape_id,
            light_background,
        });

        if let Some(cb) = progress {
            cb.on_page_rendered(page_num, total, light_background);
        }
    }

    surface.release();

    layout::center_horizontally(pages.iter_mut().map(|p| &mut p.bounds), stack.widest());

    if let Some(cb) = progress {
        cb.on_load_complete(total);
    }

    Ok(pages)
}
