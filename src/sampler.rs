// Region sampler: reads a fixed square of raw RGBA bytes around the cursor.
// Visual expectation: none, this only reads the surface. What it returns is
// exactly what sits under the indicator box before the indicator is drawn.

use serde::{Deserialize, Serialize};

use crate::types::{Cursor, Surface};

/// What to do with the part of the window that falls outside the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgePolicy {
    /// Outside pixels read as transparent black `[0, 0, 0, 0]`.
    #[default]
    ZeroPad,
    /// Slide the window back inside the surface; only a surface smaller than
    /// the window still leaves zero padding.
    Clamp,
}

#[derive(Debug, Clone, Copy)]
pub struct RegionSampler {
    side: u32,
    policy: EdgePolicy,
}

impl RegionSampler {
    pub fn new(side: u32, policy: EdgePolicy) -> Self {
        Self { side, policy }
    }

    /// Bytes produced by every call to [`RegionSampler::sample`].
    pub fn sample_len(&self) -> usize {
        (self.side as usize) * (self.side as usize) * 4
    }

    /// Top-left corner of the window for this cursor, after the edge policy.
    /// Saturates for cursors far outside the surface (the window then reads
    /// as all zeros under `ZeroPad`).
    pub fn origin(&self, surface: &Surface, cursor: Cursor, half_size: u32) -> (i64, i64) {
        let (cx, cy) = cursor.pixel();
        let x0 = cx.saturating_sub(half_size as i64);
        let y0 = cy.saturating_sub(half_size as i64);
        match self.policy {
            EdgePolicy::ZeroPad => (x0, y0),
            EdgePolicy::Clamp => (
                clamp_start(x0, surface.width(), self.side),
                clamp_start(y0, surface.height(), self.side),
            ),
        }
    }

    /// Copy the `side` x `side` block whose top-left corner is
    /// `(cursor - half_size)`, row by row, RGBA per pixel.
    pub fn sample(&self, surface: &Surface, cursor: Cursor, half_size: u32) -> Vec<u8> {
        let (x0, y0) = self.origin(surface, cursor, half_size);
        let side = self.side as i64;
        let mut out = vec![0u8; self.sample_len()];

        let (w, h) = (surface.width() as i64, surface.height() as i64);
        let stride = w as usize * 4;
        let raw = surface.raw();

        for row in 0..side {
            let y = y0.saturating_add(row);
            if y < 0 || y >= h {
                continue; // whole row stays zero
            }
            // Visible span of this row, in window columns.
            let from = 0i64.saturating_sub(x0).clamp(0, side);
            let to = w.saturating_sub(x0).clamp(0, side);
            if from >= to {
                continue;
            }
            let src = y as usize * stride + (x0 + from) as usize * 4;
            let dst = (row * side + from) as usize * 4;
            let n = (to - from) as usize * 4;
            out[dst..dst + n].copy_from_slice(&raw[src..src + n]);
        }
        out
    }
}

fn clamp_start(start: i64, extent: u32, side: u32) -> i64 {
    let max = extent as i64 - side as i64;
    if max < 0 { 0 } else { start.clamp(0, max) }
}
