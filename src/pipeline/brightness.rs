//! Brightness classification of a rendered page.
//!
//! The annotation surface picks a per-page contrast theme (pen colour, UI
//! chrome) from this classification, so it is computed per page from that
//! page's own pixels. Scanned documents often mix light and dark pages.
//!
//! The classification averages each RGB channel over the sampled pixels,
//! rounds the means to whole channel values, and compares the BT.601 luma of
//! those means against [`LIGHT_THRESHOLD`]. Alpha is ignored.

/// BT.601 luma weights for R, G and B.
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Mean luma strictly above this value counts as a light page.
pub const LIGHT_THRESHOLD: f64 = 128.0;

/// Rounded per-channel means over every `stride`-th RGBA pixel.
///
/// Returns `None` when no pixel was sampled (empty buffer).
pub fn channel_means(rgba: &[u8], stride: usize) -> Option<[f64; 3]> {
    let mut sums = [0u64; 3];
    let mut count = 0u64;

    for px in rgba.chunks_exact(4).step_by(stride.max(1)) {
        sums[0] += u64::from(px[0]);
        sums[1] += u64::from(px[1]);
        sums[2] += u64::from(px[2]);
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let n = count as f64;
    Some(sums.map(|s| (s as f64 / n).round()))
}

/// Perceptual luma of an RGB triplet.
pub fn luma(rgb: [f64; 3]) -> f64 {
    rgb.iter().zip(LUMA_WEIGHTS).map(|(c, w)| c * w).sum()
}

/// Mean luma of an RGBA buffer, or `None` for an empty buffer.
pub fn mean_luma(rgba: &[u8], stride: usize) -> Option<f64> {
    channel_means(rgba, stride).map(luma)
}

/// Classify an RGBA buffer as a light page.
///
/// An empty buffer has no defined luma and is classified as dark.
pub fn is_light_background(rgba: &[u8], stride: usize) -> bool {
    mean_luma(rgba, stride).is_some_and(|l| l > LIGHT_THRESHOLD)
}
