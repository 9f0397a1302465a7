//! Pipeline stages for turning a PDF into canvas pages.
//!
//! Each submodule implements exactly one transformation step, so each is
//! independently testable and the rendering backend can be swapped without
//! touching the arithmetic stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ brightness ──▶ encode ──▶ layout
//! (bytes)   (pdfium)   (luma)         (PNG URL)  (stack + centre)
//! ```
//!
//! 1. [`input`]      — read the selected file and check the `%PDF-` header
//! 2. [`render`]     — decode with pdfium and rasterise one page at a time
//!    into a reused [`render::Surface`]
//! 3. [`brightness`] — classify the rendered page as light or dark
//! 4. [`encode`]     — PNG-encode the surface into a base64 data URL
//! 5. [`layout`]     — stack pages vertically, then centre them on the
//!    widest page

pub mod brightness;
pub mod encode;
pub mod input;
pub mod layout;
pub mod render;
