// Software drawing for the cursor indicator.
// Visual effects provided here:
// 1) A yellow "X" over the selected point.
// 2) A square outline showing which pixels the sample event carries.

use crate::types::{Color, Cursor, Surface};

/// Stroke settings of the indicator.
#[derive(Debug, Clone, Copy)]
pub struct OverlayPainter {
    pub stroke_width: u32,
    pub accent: Color,
    /// Side of the outline box; independent of the crosshair half-size.
    pub box_size: u32,
}

impl OverlayPainter {
    pub fn new(stroke_width: u32, accent: Color, box_size: u32) -> Self {
        Self { stroke_width, accent, box_size }
    }

    /// Draw the crosshair (diagonals spanning `size` pixels out from the
    /// cursor) and the outline box anchored at `cursor - size`.
    /// Visual: a thick yellow X inside a yellow square.
    /// Nothing is drawn when the whole indicator lies off the surface.
    pub fn paint(&self, surface: &mut Surface, cursor: Cursor, size: u32) {
        let (cx, cy) = cursor.pixel();
        let s = size as i64;
        let w = self.stroke_width;
        if !self.touches(surface, cx, cy, s) {
            return;
        }

        draw_thick_line(surface, cx - s, cy - s, cx + s, cy + s, w, self.accent);
        draw_thick_line(surface, cx - s, cy + s, cx + s, cy - s, w, self.accent);

        stroke_rect(surface, cx - s, cy - s, self.box_size as i64, self.box_size as i64, w, self.accent);
    }

    /// Does the indicator's bounding box (pen included) overlap the surface?
    fn touches(&self, surface: &Surface, cx: i64, cy: i64, s: i64) -> bool {
        let pen = self.stroke_width as i64;
        let reach = s.max(self.box_size as i64 - s).saturating_add(pen);
        let lo = s.saturating_add(pen);
        let hit = |c: i64, extent: u32| {
            c.saturating_add(reach) >= 0 && c.saturating_sub(lo) < extent as i64
        };
        hit(cx, surface.width()) && hit(cy, surface.height())
    }
}

/// Fill a `width` x `width` square centred on (x,y).
/// Visual: one "dab" of the pen.
#[inline]
fn stamp(fb: &mut Surface, x: i64, y: i64, width: u32, color: Color) {
    let lo = -(width as i64 / 2);
    let hi = lo + width.max(1) as i64;
    for dy in lo..hi {
        for dx in lo..hi {
            fb.put_pixel(x + dx, y + dy, color);
        }
    }
}

/// Draw a line between (x0,y0) and (x1,y1) using Bresenham, stamping a square pen.
/// Visual: a straight line `width` pixels thick appears on top of the video.
fn draw_thick_line(fb: &mut Surface, x0: i64, y0: i64, x1: i64, y1: i64, width: u32, color: Color) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        stamp(fb, x0, y0, width, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Outline of a `w` x `h` rectangle with top-left corner (x,y); the pen is
/// centred on the edges.
fn stroke_rect(fb: &mut Surface, x: i64, y: i64, w: i64, h: i64, width: u32, color: Color) {
    let (x1, y1) = (x + w, y + h);
    draw_thick_line(fb, x, y, x1, y, width, color);
    draw_thick_line(fb, x1, y, x1, y1, width, color);
    draw_thick_line(fb, x1, y1, x, y1, width, color);
    draw_thick_line(fb, x, y1, x, y, width, color);
}
