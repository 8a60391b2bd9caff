//! Drawable surface dimensions: fixed or computed on demand.

use std::fmt;

/// Where a viewport dimension comes from.
pub enum Dimension {
    /// A literal size in logical pixels.
    Fixed(u32),
    /// A size computed every time it is read, e.g. bound to the host window.
    Dynamic(Box<dyn Fn() -> f64>),
}

impl Dimension {
    pub fn dynamic(source: impl Fn() -> f64 + 'static) -> Self {
        Self::Dynamic(Box::new(source))
    }

    /// Resolve to a non-negative integer size.
    ///
    /// Dynamic values that are NaN, infinite or negative resolve to 0 and
    /// fractional values are truncated.
    pub fn resolve(&self) -> u32 {
        match self {
            Self::Fixed(value) => *value,
            Self::Dynamic(source) => {
                let value = source();
                if value.is_finite() && value >= 0.0 {
                    value.min(u32::MAX as f64) as u32
                } else {
                    0
                }
            }
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<u32> for Dimension {
    fn from(value: u32) -> Self {
        Self::Fixed(value)
    }
}

/// Size policy of the drawable surface.
#[derive(Debug)]
pub struct Viewport {
    width: Dimension,
    height: Dimension,
    pixel_density: f64,
    last_size: (u32, u32),
}

impl Viewport {
    pub fn new(width: Dimension, height: Dimension, pixel_density: f64) -> Self {
        let mut viewport = Self {
            width,
            height,
            pixel_density: sanitize_density(pixel_density),
            last_size: (0, 0),
        };
        viewport.last_size = viewport.size();
        viewport
    }

    pub fn width(&self) -> u32 {
        self.width.resolve()
    }

    pub fn height(&self) -> u32 {
        self.height.resolve()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Width over height, or `None` while the height is still 0.
    pub fn aspect(&self) -> Option<f32> {
        let (width, height) = self.size();
        (height > 0).then(|| width as f32 / height as f32)
    }

    /// Whether either dimension is computed on demand.
    pub fn is_responsive(&self) -> bool {
        self.width.is_dynamic() || self.height.is_dynamic()
    }

    pub fn pixel_density(&self) -> f64 {
        self.pixel_density
    }

    /// Update the device scale factor reported by the platform.
    pub fn set_pixel_density(&mut self, density: f64) {
        self.pixel_density = sanitize_density(density);
    }

    /// Size recorded by the last resize detection (or at construction).
    pub fn last_size(&self) -> (u32, u32) {
        self.last_size
    }

    /// React to a platform resize signal.
    ///
    /// Returns the new size when the viewport is responsive and the resolved
    /// size differs from the last one seen, `None` otherwise.
    pub fn detect_resize(&mut self) -> Option<(u32, u32)> {
        if !self.is_responsive() {
            return None;
        }

        let size = self.size();
        if size == self.last_size {
            log::trace!("viewport resize ignored, size unchanged at {:?}", size);
            return None;
        }

        log::debug!("viewport resized {:?} -> {:?}", self.last_size, size);
        self.last_size = size;
        Some(size)
    }
}

fn sanitize_density(density: f64) -> f64 {
    if density.is_finite() && density > 0.0 {
        density
    } else {
        1.0
    }
}
