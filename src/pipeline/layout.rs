//! Page placement: vertical stacking and horizontal centring.
//!
//! Layout is two passes. While pages are rendered, [`PageStack::place`]
//! stacks them top to bottom with a fixed gap and remembers the widest page.
//! Once every page is known, [`center_horizontally`] shifts each page so its
//! centre lines up with the centre of the widest one.

use crate::document::Bounds;

/// Running state of the first layout pass.
#[derive(Debug, Clone)]
pub struct PageStack {
    spacing: f64,
    top: f64,
    widest: f64,
}

impl PageStack {
    pub fn new(spacing: f64) -> Self {
        Self {
            spacing,
            top: 0.0,
            widest: 0.0,
        }
    }

    /// Place the next page below the previous one, at `x = 0`.
    pub fn place(&mut self, width: f64, height: f64) -> Bounds {
        let bounds = Bounds::new(0.0, self.top, width, height);
        self.top += height + self.spacing;
        self.widest = self.widest.max(width);
        bounds
    }

    /// Width of the widest page placed so far.
    pub fn widest(&self) -> f64 {
        self.widest
    }
}

/// Second layout pass: `x = (widest - width) / 2` for every page.
pub fn center_horizontally<'a>(bounds: impl IntoIterator<Item = &'a mut Bounds>, widest: f64) {
    for b in bounds {
        b.x = (widest - b.width) / 2.0;
    }
}
