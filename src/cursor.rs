// Cursor store + pointer → surface coordinate mapping.
// Visual expectation: clicking anywhere on the shown video moves the crosshair
// to that spot, even when the window shows the surface at another size.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Cursor, ScreenRect};

/// Where a pointer event came from. Both kinds share one mapping path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// A click/tap in viewport pixels.
///
/// `page` is the preferred position; hosts that only know client-relative
/// coordinates leave it `None` and the mapping falls back to `client`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub page: Option<(f64, f64)>,
    pub client: (f64, f64),
    default_prevented: bool,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, page: Option<(f64, f64)>, client: (f64, f64)) -> Self {
        Self { kind, page, client, default_prevented: false }
    }

    /// Event that only carries client coordinates.
    pub fn client_only(kind: PointerKind, x: f64, y: f64) -> Self {
        Self::new(kind, None, (x, y))
    }

    pub fn position(&self) -> (f64, f64) {
        self.page.unwrap_or(self.client)
    }

    /// Ask the host to skip its native handling (selection, scrolling, ...).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Viewport point → surface-logical point. No clamping, but the bounds must
/// have a finite positive size and the result must be a finite point.
pub fn to_surface(px: f64, py: f64, bounds: ScreenRect, width: u32, height: u32) -> Result<Cursor> {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !(usable(bounds.width) && usable(bounds.height)) {
        return Err(Error::DegenerateBounds { width: bounds.width, height: bounds.height });
    }
    let cursor = Cursor::new(
        width as f64 / bounds.width * (px - bounds.left),
        height as f64 / bounds.height * (py - bounds.top),
    );
    if !(cursor.x.is_finite() && cursor.y.is_finite()) {
        return Err(Error::PointerOutOfRange { x: cursor.x, y: cursor.y });
    }
    Ok(cursor)
}

/// Shared handle to the current cursor. Clones point at the same cursor, so a
/// pointer handler on another thread can update what the next tick samples.
#[derive(Debug, Clone)]
pub struct CursorStore {
    inner: Arc<Mutex<Cursor>>,
}

impl CursorStore {
    pub fn new(initial: Cursor) -> Self {
        Self { inner: Arc::new(Mutex::new(initial)) }
    }

    pub fn get(&self) -> Cursor {
        *self.inner.lock()
    }

    pub fn set(&self, cursor: Cursor) {
        *self.inner.lock() = cursor;
    }

    /// Map a pointer event onto the surface and store the result.
    /// The event's default action is always suppressed, even when the
    /// bounds are unusable and the cursor is left alone.
    pub fn set_from_pointer_event(
        &self,
        event: &mut PointerEvent,
        bounds: ScreenRect,
        width: u32,
        height: u32,
    ) -> Result<Cursor> {
        event.prevent_default();
        let (px, py) = event.position();
        let cursor = to_surface(px, py, bounds, width, height)?;
        self.set(cursor);
        debug!(x = cursor.x, y = cursor.y, kind = ?event.kind, "cursor moved");
        Ok(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> ScreenRect {
        ScreenRect::new(100.0, 50.0, 640.0, 480.0)
    }

    #[test]
    fn maps_click_through_css_scaling() {
        let store = CursorStore::new(Cursor::new(0.0, 0.0));
        let mut ev = PointerEvent::new(PointerKind::Mouse, Some((420.0, 290.0)), (0.0, 0.0));
        let c = store.set_from_pointer_event(&mut ev, bounds(), 1280, 960).unwrap();
        assert_eq!(c, Cursor::new(640.0, 480.0));
        assert_eq!(store.get(), c);
        assert!(ev.default_prevented());
    }

    #[test]
    fn falls_back_to_client_coordinates() {
        let store = CursorStore::new(Cursor::new(0.0, 0.0));
        let mut ev = PointerEvent::client_only(PointerKind::Touch, 100.0, 50.0);
        let c = store.set_from_pointer_event(&mut ev, bounds(), 1280, 960).unwrap();
        assert_eq!(c, Cursor::new(0.0, 0.0));
    }

    #[test]
    fn page_wins_over_client() {
        let ev = PointerEvent::new(PointerKind::Mouse, Some((1.0, 2.0)), (3.0, 4.0));
        assert_eq!(ev.position(), (1.0, 2.0));
    }

    #[test]
    fn clicks_outside_are_not_clamped() {
        let c = to_surface(0.0, 0.0, bounds(), 1280, 960).unwrap();
        assert_eq!(c, Cursor::new(-200.0, -100.0));
    }

    #[test]
    fn degenerate_bounds_keep_old_cursor() {
        let store = CursorStore::new(Cursor::new(5.0, 5.0));
        let mut ev = PointerEvent::client_only(PointerKind::Mouse, 10.0, 10.0);
        let res = store.set_from_pointer_event(&mut ev, ScreenRect::new(0.0, 0.0, 0.0, 10.0), 1280, 960);
        assert!(matches!(res, Err(Error::DegenerateBounds { .. })));
        assert_eq!(store.get(), Cursor::new(5.0, 5.0));
        assert!(ev.default_prevented());
    }

    #[test]
    fn nan_negative_and_infinite_bounds_are_rejected() {
        for (w, h) in [(f64::NAN, 480.0), (640.0, -480.0), (f64::INFINITY, 480.0), (-0.0, 480.0)] {
            let res = to_surface(10.0, 10.0, ScreenRect::new(0.0, 0.0, w, h), 1280, 960);
            assert!(matches!(res, Err(Error::DegenerateBounds { .. })), "{w}x{h}");
        }
    }

    #[test]
    fn non_finite_mapping_leaves_cursor_alone() {
        let store = CursorStore::new(Cursor::new(5.0, 5.0));
        // subnormal width: 1280 / 1e-320 overflows to infinity
        let tiny = ScreenRect::new(0.0, 0.0, 1e-320, 1.0);
        let mut ev = PointerEvent::client_only(PointerKind::Mouse, 1.0, 0.5);
        let res = store.set_from_pointer_event(&mut ev, tiny, 1280, 960);
        assert!(matches!(res, Err(Error::PointerOutOfRange { .. })));
        let mut ev = PointerEvent::new(PointerKind::Mouse, Some((f64::NAN, 0.0)), (0.0, 0.0));
        assert!(store.set_from_pointer_event(&mut ev, bounds(), 1280, 960).is_err());
        assert_eq!(store.get(), Cursor::new(5.0, 5.0));
    }

    #[test]
    fn mapping_is_linear() {
        // equal viewport steps give equal surface steps (2x scale here)
        let a = to_surface(200.0, 100.0, bounds(), 1280, 960).unwrap();
        let b = to_surface(210.0, 105.0, bounds(), 1280, 960).unwrap();
        assert_eq!((b.x - a.x, b.y - a.y), (20.0, 10.0));
    }

    #[test]
    fn clones_share_the_cursor() {
        let a = CursorStore::new(Cursor::new(0.0, 0.0));
        let b = a.clone();
        std::thread::spawn(move || b.set(Cursor::new(7.0, 8.0))).join().unwrap();
        assert_eq!(a.get(), Cursor::new(7.0, 8.0));
    }
}
