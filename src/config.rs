//! Configuration for loading a PDF onto the canvas.
//!
//! Page geometry is governed by two fixed constants, [`PAGE_SPACING`] and
//! [`VISUAL_SCALE`], which are not configurable. What varies
//! between hosts is captured in [`LoadConfig`], built via its
//! [`LoadConfigBuilder`]:
//!
//! * the display's device pixel ratio,
//! * the brightness sampling stride,
//! * an optional PDF user password,
//! * an optional progress callback.

use crate::error::LoadError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Vertical gap between consecutive pages, in layout units.
pub const PAGE_SPACING: f64 = 32.0;

/// Oversampling factor applied on top of the device pixel ratio so pages
/// stay sharp when the annotation surface zooms in.
pub const VISUAL_SCALE: f64 = 1.5;

/// Configuration for a single [`crate::DocumentLoader`].
///
/// # Example
/// ```rust
/// use pdf_canvas::LoadConfig;
///
/// let config = LoadConfig::builder()
///     .device_pixel_ratio(2.0)
///     .sample_stride(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.render_scale(), 3.0);
/// ```
#[derive(Clone)]
pub struct LoadConfig {
    /// Physical pixels per layout unit on the target display. Default: 1.0.
    ///
    /// Pages are rendered at `device_pixel_ratio × VISUAL_SCALE` and laid out
    /// at `viewport ÷ device_pixel_ratio`, so layout units stay
    /// device-independent while the raster matches the screen density.
    pub device_pixel_ratio: f64,

    /// Sample every n-th pixel when classifying page brightness. Default: 1.
    ///
    /// 1 reads every pixel. Larger strides trade a little accuracy for speed
    /// on large oversampled rasters; the luma formula and threshold are the
    /// same either way.
    pub sample_stride: usize,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Receives per-page events while the document is rendered.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            sample_stride: 1,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for LoadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadConfig")
            .field("device_pixel_ratio", &self.device_pixel_ratio)
            .field("sample_stride", &self.sample_stride)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn LoadProgressCallback>"),
            )
            .finish()
    }
}

impl LoadConfig {
    /// Create a new builder for `LoadConfig`.
    pub fn builder() -> LoadConfigBuilder {
        LoadConfigBuilder {
            config: Self::default(),
        }
    }

    /// Scale factor handed to the rasteriser.
    pub fn render_scale(&self) -> f64 {
        self.device_pixel_ratio * VISUAL_SCALE
    }
}

/// Builder for [`LoadConfig`].
#[derive(Debug)]
pub struct LoadConfigBuilder {
    config: LoadConfig,
}

impl LoadConfigBuilder {
    /// Finite ratios are clamped to 0.25–8.0; anything else is rejected by
    /// [`build`](Self::build).
    pub fn device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.config.device_pixel_ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio.clamp(0.25, 8.0)
        } else {
            ratio
        };
        self
    }

    /// Zero is rejected by [`build`](Self::build).
    pub fn sample_stride(mut self, stride: usize) -> Self {
        self.config.sample_stride = stride;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<LoadConfig, LoadError> {
        let c = &self.config;
        if !c.device_pixel_ratio.is_finite() || c.device_pixel_ratio <= 0.0 {
            return Err(LoadError::InvalidConfig(format!(
                "device pixel ratio must be a positive number, got {}",
                c.device_pixel_ratio
            )));
        }
        if c.sample_stride == 0 {
            return Err(LoadError::InvalidConfig(
                "sample stride must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
