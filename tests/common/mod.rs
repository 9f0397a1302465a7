//! Shared fakes for integration tests: an in-memory PDF decoder whose pages
//! are solid colours of known size, and a deterministic id generator.

#![allow(dead_code)]

use pdf_canvas::{
    AssetId, IdGenerator, LoadConfig, LoadError, PageRasterizer, PdfDecoder, ShapeId, Surface,
    Viewport,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Minimal bytes that pass the header check.
pub const PDF_BYTES: &[u8] = b"%PDF-1.7\n% synthetic\n";

#[derive(Debug, Clone, Copy)]
pub struct SyntheticPage {
    /// Page size in PDF points.
    pub width_pt: f64,
    pub height_pt: f64,
    pub color: [u8; 4],
}

impl SyntheticPage {
    pub fn new(width_pt: f64, height_pt: f64, color: [u8; 4]) -> Self {
        Self {
            width_pt,
            height_pt,
            color,
        }
    }

    /// A page whose layout size at dpr 1 is `width × height`.
    pub fn with_layout_size(width: f64, height: f64, color: [u8; 4]) -> Self {
        Self::new(width / pdf_canvas::VISUAL_SCALE, height / pdf_canvas::VISUAL_SCALE, color)
    }
}

/// What the fake decoder saw.
#[derive(Debug, Default)]
pub struct DecoderLog {
    pub decoded_lengths: Vec<usize>,
    pub passwords: Vec<Option<String>>,
    pub rendered: Vec<usize>,
    pub surface_sizes: Vec<(u32, u32)>,
    /// Bytes the surface still held when each render started.
    pub held_at_start: Vec<usize>,
}

pub struct SyntheticDecoder {
    pages: Vec<SyntheticPage>,
    fail_decode: bool,
    unavailable: bool,
    fail_render_at: Option<usize>,
    delay: Duration,
    pub log: Arc<Mutex<DecoderLog>>,
}

impl SyntheticDecoder {
    pub fn new(pages: Vec<SyntheticPage>) -> Self {
        Self {
            pages,
            fail_decode: false,
            unavailable: false,
            fail_render_at: None,
            delay: Duration::ZERO,
            log: Arc::default(),
        }
    }

    pub fn failing_decode() -> Self {
        Self {
            fail_decode: true,
            ..Self::new(vec![])
        }
    }

    /// Behaves like a host without a rendering engine.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(vec![])
        }
    }

    pub fn failing_render_at(mut self, index: usize) -> Self {
        self.fail_render_at = Some(index);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl PdfDecoder for SyntheticDecoder {
    fn decode(
        &self,
        bytes: Vec<u8>,
        password: Option<&str>,
        visit: &mut dyn FnMut(&mut dyn PageRasterizer) -> Result<(), LoadError>,
    ) -> Result<(), LoadError> {
        std::thread::sleep(self.delay);
        if self.unavailable {
            return Err(LoadError::Environment(
                "libpdfium.so: cannot open shared object file".into(),
            ));
        }
        {
            let mut log = self.log.lock().unwrap();
            log.decoded_lengths.push(bytes.len());
            log.passwords.push(password.map(str::to_string));
        }
        if self.fail_decode {
            return Err(LoadError::Decode {
                detail: "xref table is corrupt".into(),
            });
        }
        let mut doc = SyntheticDocument {
            pages: &self.pages,
            fail_render_at: self.fail_render_at,
            log: &self.log,
        };
        visit(&mut doc)
    }
}

struct SyntheticDocument<'a> {
    pages: &'a [SyntheticPage],
    fail_render_at: Option<usize>,
    log: &'a Mutex<DecoderLog>,
}

impl PageRasterizer for SyntheticDocument<'_> {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, index: usize) -> Result<(f64, f64), LoadError> {
        let p = self.pages[index];
        Ok((p.width_pt, p.height_pt))
    }

    fn render_into(
        &mut self,
        index: usize,
        viewport: &Viewport,
        surface: &mut Surface,
    ) -> Result<(), LoadError> {
        self.log
            .lock()
            .unwrap()
            .held_at_start
            .push(surface.pixels().len());
        if self.fail_render_at == Some(index) {
            return Err(LoadError::Render {
                page: index + 1,
                detail: "unsupported content stream".into(),
            });
        }
        surface.fill(
            viewport.pixel_width(),
            viewport.pixel_height(),
            self.pages[index].color,
        );
        let mut log = self.log.lock().unwrap();
        log.rendered.push(index);
        log.surface_sizes.push((surface.width(), surface.height()));
        Ok(())
    }
}

/// `asset:N` / `shape:N` from one shared counter.
#[derive(Default)]
pub struct SequentialIds(AtomicUsize);

impl IdGenerator for SequentialIds {
    fn asset_id(&self) -> AssetId {
        AssetId::new(format!("asset:{}", self.0.fetch_add(1, Ordering::SeqCst)))
    }

    fn shape_id(&self) -> ShapeId {
        ShapeId::new(format!("shape:{}", self.0.fetch_add(1, Ordering::SeqCst)))
    }
}

/// Route library logs to the test harness; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn loader_for(decoder: SyntheticDecoder) -> pdf_canvas::DocumentLoader {
    loader_with_config(decoder, LoadConfig::default())
}

pub fn loader_with_config(
    decoder: SyntheticDecoder,
    config: LoadConfig,
) -> pdf_canvas::DocumentLoader {
    init_tracing();
    pdf_canvas::DocumentLoader::with_components(
        Arc::new(decoder),
        Arc::new(SequentialIds::default()),
        config,
    )
}

pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "{what}: expected {expected}, got {actual}"
    );
}
