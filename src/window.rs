// Window that shows the overlay's surface and turns clicks into pointer events.
// Visual effects provided here:
// 1) The surface (video + crosshair), stretched to whatever size the window has.
// 2) Left clicks move the crosshair to the clicked spot.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};
use pixel_probe::{Error, PointerEvent, PointerKind, Result, ScreenRect, Surface};

pub struct Drawer {
    window: Window,      // the on-screen window you see
    screen: Vec<u32>,    // surface packed as 0x00RRGGBB
    was_down: bool,      // left button state last frame, for click edges
}

impl Drawer {
    /// Create a resizable window; the surface is stretched to fill it.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let opts = WindowOptions {
            resize: true,
            scale_mode: ScaleMode::Stretch,
            ..WindowOptions::default()
        };
        let window = Window::new(title, width, height, opts)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window, screen: Vec::new(), was_down: false })
    }

    /// Push the surface to the screen.
    /// Visual: the window immediately displays the new image.
    pub fn present(&mut self, surface: &Surface) -> Result<()> {
        surface.write_0rgb(&mut self.screen);
        self.window
            .update_with_buffer(&self.screen, surface.width() as usize, surface.height() as usize)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Pump window events without redrawing (keeps input alive between ticks).
    pub fn pump(&mut self) {
        self.window.update();
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Space toggles play/pause.
    pub fn space_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::Space, KeyRepeat::No)
    }

    /// Where the surface sits on screen: the whole client area of the window.
    pub fn bounds(&self) -> ScreenRect {
        let (w, h) = self.window.get_size();
        ScreenRect::new(0.0, 0.0, w as f64, h as f64)
    }

    /// A click (button went down this frame), in window coordinates.
    /// minifb only knows window-relative positions, so `page` stays empty.
    pub fn take_click(&mut self) -> Option<PointerEvent> {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let pressed = down && !self.was_down;
        self.was_down = down;
        if !pressed {
            return None;
        }
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| PointerEvent::client_only(PointerKind::Mouse, x as f64, y as f64))
    }
}
