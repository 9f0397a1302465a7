//! Progress-callback trait for per-page load events.
//!
//! Inject an [`Arc<dyn LoadProgressCallback>`] via
//! [`crate::config::LoadConfigBuilder::progress_callback`] to receive events
//! as the loader renders each page. Pages are rendered strictly in order on a
//! blocking worker thread, so the callback is invoked from that thread; the
//! trait is `Send + Sync` for that reason.
//!
//! # Example
//!
//! ```rust
//! use pdf_canvas::{LoadConfig, LoadProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct LightPages {
//!     light: AtomicUsize,
//! }
//!
//! impl LoadProgressCallback for LightPages {
//!     fn on_page_rendered(&self, _page_num: usize, _total: usize, light_background: bool) {
//!         if light_background {
//!             self.light.fetch_add(1, Ordering::SeqCst);
//!         }
//!     }
//! }
//!
//! let config = LoadConfig::builder()
//!     .progress_callback(Arc::new(LightPages { light: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the loader as it renders each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait LoadProgressCallback: Send + Sync {
    /// Called once after the PDF is decoded, before any page is rendered.
    fn on_load_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page has been rasterised, classified and encoded.
    ///
    /// # Arguments
    /// * `page_num`         — 1-indexed page number
    /// * `total_pages`      — total pages in the document
    /// * `light_background` — brightness classification of that page
    fn on_page_rendered(&self, page_num: usize, total_pages: usize, light_background: bool) {
        let _ = (page_num, total_pages, light_background);
    }

    /// Called once after every page has been laid out.
    fn on_load_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl LoadProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::LoadConfig`].
pub type ProgressCallback = Arc<dyn LoadProgressCallback>;
