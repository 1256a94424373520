//! How many overlapping avatar discs fit across the frame.

/// Avatar disc diameter in pixels.
pub const AVATAR_SIZE: f64 = 48.0;
/// Horizontal overlap between neighbouring discs in pixels.
pub const AVATAR_OVERLAP: f64 = 16.0;
/// Width of the fade gradients on the left and right edges.
pub const GRADIENT_WIDTH: f64 = 60.0;
/// Full height of the finale banner.
pub const CELEBRATION_HEIGHT: f64 = 80.0;
/// How far the marquee travels once every avatar has settled.
pub const SCROLL_DISTANCE: f64 = 100.0;
/// Extra horizontal headroom so scrolling never reveals an empty tail.
pub const SCROLL_BUFFER: f64 = 100.0;
/// Camera zoom at the start of the video and after the finale spring settles.
pub const ZOOM: f64 = 1.5;

/// Geometry of the avatar strip.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AvatarLayout {
    /// Disc diameter.
    pub size: f64,
    /// Overlap with the previous disc.
    pub overlap: f64,
    /// Camera zoom; visible width shrinks by this factor.
    pub zoom: f64,
    /// Headroom added to the visible width.
    pub scroll_buffer: f64,
}

impl Default for AvatarLayout {
    fn default() -> Self {
        Self {
            size: AVATAR_SIZE,
            overlap: AVATAR_OVERLAP,
            zoom: ZOOM,
            scroll_buffer: SCROLL_BUFFER,
        }
    }
}

impl AvatarLayout {
    /// Horizontal advance of every disc after the first.
    pub fn step(&self) -> f64 {
        self.size - self.overlap
    }

    /// Maximum number of discs that fit in `width` pixels. Always at least 1.
    ///
    /// The first disc takes `size`, each further disc takes `size - overlap`.
    pub fn max_avatars(&self, width: f64) -> u32 {
        if !(width > 0.0) || !width.is_finite() {
            return 1;
        }
        let step = self.step();
        if !(step > 0.0) {
            return 1;
        }
        let zoom = if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        };

        let effective = width / zoom + self.scroll_buffer;
        let additional = ((effective - self.size) / step).floor();
        if !(additional > 0.0) {
            return 1;
        }
        (1.0 + additional).min(f64::from(u32::MAX)) as u32
    }

    /// Pixel width of a strip of `count` discs.
    pub fn strip_width(&self, count: u32) -> f64 {
        if count == 0 {
            return 0.0;
        }
        self.size + f64::from(count - 1) * self.step()
    }
}

/// [`AvatarLayout::max_avatars`] with the default geometry.
pub fn max_avatars(width: f64) -> u32 {
    AvatarLayout::default().max_avatars(width)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/capacity.rs"]
mod tests;
