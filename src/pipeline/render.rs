//! PDF rasterisation: decode a byte buffer and render pages into a surface.
//!
//! ## Why a visitor?
//!
//! A pdfium `PdfDocument` borrows the `Pdfium` binding that opened it, and
//! neither may leave the thread that created them. [`PdfDecoder::decode`]
//! therefore hands the opened document to a callback instead of returning
//! it: the loader runs the whole decode-and-render pass inside one
//! `spawn_blocking` task and nothing pdfium-owned ever crosses a thread.
//!
//! ## Why one surface?
//!
//! A page rendered at 1.5× oversampling on a high-density display can take
//! tens of megabytes. Pages are rendered one at a time into a single
//! [`Surface`]. The loader empties it before each render, and pdfium's
//! bitmap is copied into the surface's own buffer and dropped straight
//! away, so only one page's pixels are alive at any moment.

use crate::error::LoadError;
use image::{Rgba, RgbaImage};
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Pixel-space rectangle and scale used to rasterise one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Scaled page width in device pixels (fractional).
    pub width: f64,
    /// Scaled page height in device pixels (fractional).
    pub height: f64,
    pub scale: f64,
}

impl Viewport {
    /// Viewport of a page measured in PDF points, scaled by `scale`.
    pub fn for_page(width_pt: f64, height_pt: f64, scale: f64) -> Self {
        Self {
            width: width_pt * scale,
            height: height_pt * scale,
            scale,
        }
    }

    /// Raster width: the viewport truncated to whole pixels, at least 1.
    pub fn pixel_width(&self) -> u32 {
        (self.width.floor() as u32).max(1)
    }

    /// Raster height: the viewport truncated to whole pixels, at least 1.
    pub fn pixel_height(&self) -> u32 {
        (self.height.floor() as u32).max(1)
    }

    /// Placement size in layout units, independent of display density.
    pub fn layout_size(&self, device_pixel_ratio: f64) -> (f64, f64) {
        (
            self.width / device_pixel_ratio,
            self.height / device_pixel_ratio,
        )
    }
}

/// Scratch RGBA render target shared by every page of one load.
#[derive(Debug)]
pub struct Surface {
    image: RgbaImage,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// An empty 0 × 0 surface.
    pub fn new() -> Self {
        Self {
            image: RgbaImage::new(0, 0),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Copy a BGRA raster with `stride` bytes per row into the surface's own
    /// buffer as RGBA.
    ///
    /// Returns `false`, leaving the surface released, when `bgra` is too
    /// short for `width × height`.
    pub fn load_bgra(&mut self, width: u32, height: u32, stride: usize, bgra: &[u8]) -> bool {
        let row_len = width as usize * 4;
        let rows = height as usize;
        if rows == 0 || row_len == 0 || stride < row_len || bgra.len() < stride * rows.saturating_sub(1) + row_len {
            self.release();
            return false;
        }

        let mut buf = std::mem::take(&mut self.image).into_raw();
        buf.clear();
        buf.reserve(row_len * rows);
        for row in bgra.chunks(stride).take(rows) {
            for px in row[..row_len].chunks_exact(4) {
                buf.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
            }
        }
        match RgbaImage::from_raw(width, height, buf) {
            Some(image) => {
                self.image = image;
                true
            }
            None => false,
        }
    }

    /// Resize to `width × height` and paint every pixel `color`.
    ///
    /// The existing allocation is reused when it is large enough.
    pub fn fill(&mut self, width: u32, height: u32, color: [u8; 4]) {
        let mut buf = std::mem::take(&mut self.image).into_raw();
        buf.clear();
        buf.reserve(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            buf.extend_from_slice(&color);
        }
        self.image = RgbaImage::from_raw(width, height, buf)
            .unwrap_or_else(|| RgbaImage::from_pixel(width, height, Rgba(color)));
    }

    /// Drop the pixel buffer and shrink to 0 × 0.
    pub fn release(&mut self) {
        self.image = RgbaImage::new(0, 0);
    }

    pub fn is_released(&self) -> bool {
        self.image.width() == 0 && self.image.height() == 0 && self.image.as_raw().capacity() == 0
    }
}

/// An opened PDF whose pages can be rasterised in any order.
///
/// Indices are 0-based. Errors are reported as [`LoadError::Render`] with the
/// 1-indexed page number.
pub trait PageRasterizer {
    fn page_count(&self) -> usize;

    /// Page size in PDF points.
    fn page_size(&self, index: usize) -> Result<(f64, f64), LoadError>;

    /// Render page `index` into `surface`, sized to the viewport's pixel
    /// dimensions.
    fn render_into(
        &mut self,
        index: usize,
        viewport: &Viewport,
        surface: &mut Surface,
    ) -> Result<(), LoadError>;
}

/// Opens PDF bytes and hands the decoded document to `visit`.
///
/// `bytes` is an owned copy; the decoder may consume it.
pub trait PdfDecoder: Send + Sync {
    fn decode(
        &self,
        bytes: Vec<u8>,
        password: Option<&str>,
        visit: &mut dyn FnMut(&mut dyn PageRasterizer) -> Result<(), LoadError>,
    ) -> Result<(), LoadError>;
}

/// [`PdfDecoder`] backed by the pdfium C library.
///
/// Binding order: the explicit library path (or `PDFIUM_LIB_PATH`), then the
/// platform library in the working directory, then the system library.
#[derive(Debug, Clone, Default)]
pub struct PdfiumDecoder {
    library_path: Option<PathBuf>,
}

impl PdfiumDecoder {
    /// Decoder honouring `PDFIUM_LIB_PATH`.
    pub fn new() -> Self {
        Self {
            library_path: std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from),
        }
    }

    /// Decoder bound to the pdfium library at `path`.
    pub fn with_library_path(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
        }
    }

    /// Whether a pdfium library can be bound from this process.
    pub fn is_available(&self) -> bool {
        self.bind().is_ok()
    }

    fn bind(&self) -> Result<Pdfium, LoadError> {
        let mut failures = Vec::new();

        if let Some(path) = &self.library_path {
            match Pdfium::bind_to_library(path) {
                Ok(bindings) => return Ok(Pdfium::new(bindings)),
                Err(e) => {
                    warn!(
                        "Could not load pdfium from {}: {e:?}; trying fallbacks",
                        path.display()
                    );
                    failures.push(format!("{}: {e:?}", path.display()));
                }
            }
        }

        let local = PathBuf::from(Pdfium::pdfium_platform_library_name_at_path("./"));
        match Pdfium::bind_to_library(&local) {
            Ok(bindings) => return Ok(Pdfium::new(bindings)),
            Err(e) => failures.push(format!("{}: {e:?}", local.display())),
        }

        match Pdfium::bind_to_system_library() {
            Ok(bindings) => Ok(Pdfium::new(bindings)),
            Err(e) => {
                failures.push(format!("system library: {e:?}"));
                Err(LoadError::Environment(failures.join("; ")))
            }
        }
    }
}

impl PdfDecoder for PdfiumDecoder {
    fn decode(
        &self,
        bytes: Vec<u8>,
        password: Option<&str>,
        visit: &mut dyn FnMut(&mut dyn PageRasterizer) -> Result<(), LoadError>,
    ) -> Result<(), LoadError> {
        let pdfium = self.bind()?;

        let document = pdfium
            .load_pdf_from_byte_vec(bytes, password)
            .map_err(|e| decode_error(&e, password.is_some()))?;

        let mut pages = PdfiumPages { document };
        info!("PDF decoded: {} pages", pages.page_count());
        visit(&mut pages)
    }
}

fn decode_error(e: &PdfiumError, password_given: bool) -> LoadError {
    let err_str = format!("{e:?}");
    let detail = if err_str.contains("Password") || err_str.contains("password") {
        if password_given {
            "wrong password".to_string()
        } else {
            "document is encrypted and requires a password".to_string()
        }
    } else {
        err_str
    };
    LoadError::Decode { detail }
}

struct PdfiumPages<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumPages<'a> {
    fn page(&self, index: usize) -> Result<PdfPage<'a>, LoadError> {
        self.document
            .pages()
            .get(index as u16)
            .map_err(|e| LoadError::Render {
                page: index + 1,
                detail: format!("{e:?}"),
            })
    }
}

impl PageRasterizer for PdfiumPages<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_size(&self, index: usize) -> Result<(f64, f64), LoadError> {
        let page = self.page(index)?;
        Ok((f64::from(page.width().value), f64::from(page.height().value)))
    }

    fn render_into(
        &mut self,
        index: usize,
        viewport: &Viewport,
        surface: &mut Surface,
    ) -> Result<(), LoadError> {
        let page = self.page(index)?;

        let render_config = PdfRenderConfig::new()
            .set_target_width(viewport.pixel_width() as i32)
            .set_target_height(viewport.pixel_height() as i32)
            .set_format(PdfBitmapFormat::BGRA);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| LoadError::Render {
                page: index + 1,
                detail: format!("{e:?}"),
            })?;

        let width = bitmap.width().max(0) as u32;
        let height = bitmap.height().max(0) as u32;
        let bgra = bitmap.as_raw_bytes();
        let stride = if height == 0 {
            0
        } else {
            bgra.len() / height as usize
        };
        if !surface.load_bgra(width, height, stride, &bgra) {
            return Err(LoadError::Render {
                page: index + 1,
                detail: format!(
                    "pdfium returned {} bytes for a {width}x{height} bitmap",
                    bgra.len()
                ),
            });
        }
        debug!(
            "Rendered page {} → {}x{} px",
            index + 1,
            surface.width(),
            surface.height()
        );
        Ok(())
    }
}
