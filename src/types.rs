// Core types shared by the renderer, sampler and painter.
// Visual expectation: `Surface` is the picture the window shows; everything
// else (cursor, rectangles) is measured in its logical pixels.

use image::{Rgba, RgbaImage, imageops};

/// RGBA8 colour, channel order R, G, B, A.
pub type Color = [u8; 4];

/// The selected point, in surface-logical pixels (fractional after mapping).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: f64,
    pub y: f64,
}

impl Cursor {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Logical centre of a `width` x `height` surface.
    pub fn center_of(width: u32, height: u32) -> Self {
        Self::new(width as f64 / 2.0, height as f64 / 2.0)
    }

    /// Integer pixel the cursor sits on (floor, so -0.5 lands on -1).
    /// A 2D canvas read truncates toward zero instead, which differs for
    /// negative coordinates (5.5 - 10 reads from -4 there, -5 here).
    /// Values beyond the i64 range saturate; NaN maps to 0.
    pub fn pixel(&self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }
}

/// An on-screen rectangle in physical (viewport) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}

/// Raster target the video is copied into. Fixed logical size, RGBA backing store.
#[derive(Clone)]
pub struct Surface {
    image: RgbaImage,
    display: ScreenRect, // where the surface currently sits on screen
}

impl Surface {
    /// Transparent-black surface, displayed 1:1 at the viewport origin until told otherwise.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            display: ScreenRect::new(0.0, 0.0, width as f64, height as f64),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGBA bytes, row-major, `width * height * 4` long.
    pub fn raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn display_bounds(&self) -> ScreenRect {
        self.display
    }

    /// Record where the surface is shown (e.g. after the window was resized).
    pub fn set_display_bounds(&mut self, bounds: ScreenRect) {
        self.display = bounds;
    }

    /// Pixel at (x,y), or None outside the surface.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return None;
        }
        Some(self.image.get_pixel(x as u32, y as u32).0)
    }

    /// Set one pixel; writes outside the surface are dropped.
    #[inline]
    pub fn put_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, Rgba(color));
    }

    /// Copy a frame over the whole surface, scaling it to the logical resolution
    /// when the sizes differ.
    /// Visual: the surface now shows exactly this frame, stretched to fit.
    pub fn draw_frame(&mut self, frame: &RgbaImage) {
        if frame.dimensions() == self.image.dimensions() {
            self.image.copy_from_slice(frame.as_raw());
        } else {
            self.image = imageops::resize(
                frame,
                self.width(),
                self.height(),
                imageops::FilterType::Nearest,
            );
        }
    }

    /// Pack into 0x00RRGGBB words for minifb (alpha dropped).
    pub fn write_0rgb(&self, out: &mut Vec<u32>) {
        out.clear();
        out.extend(self.image.pixels().map(|p| {
            let [r, g, b, _] = p.0;
            ((r as u32) << 16) | ((g as u32) << 8) | b as u32
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cursor_is_surface_center() {
        assert_eq!(Cursor::center_of(1280, 960), Cursor::new(640.0, 480.0));
    }

    #[test]
    fn pixel_floors_and_saturates() {
        assert_eq!(Cursor::new(-0.5, 2.9).pixel(), (-1, 2));
        assert_eq!(Cursor::new(1e19, -1e19).pixel(), (i64::MAX, i64::MIN));
    }

    #[test]
    fn put_pixel_outside_is_ignored() {
        let mut s = Surface::new(4, 4);
        s.put_pixel(-1, 0, [9, 9, 9, 9]);
        s.put_pixel(4, 4, [9, 9, 9, 9]);
        assert!(s.raw().iter().all(|&b| b == 0));
        assert_eq!(s.pixel(4, 0), None);
    }

    #[test]
    fn draw_frame_scales_to_logical_size() {
        let mut s = Surface::new(8, 6);
        let frame = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]));
        s.draw_frame(&frame);
        assert_eq!((s.width(), s.height()), (8, 6));
        assert_eq!(s.pixel(7, 5), Some([10, 20, 30, 255]));
    }

    #[test]
    fn packs_rgb_for_window() {
        let mut s = Surface::new(1, 1);
        s.put_pixel(0, 0, [0x12, 0x34, 0x56, 0xFF]);
        let mut out = Vec::new();
        s.write_0rgb(&mut out);
        assert_eq!(out, vec![0x0012_3456]);
    }
}
