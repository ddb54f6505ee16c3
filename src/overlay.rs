// The sampling overlay: owns the surface, the cursor and the listeners, and
// knows the order of one tick.
// Visual expectation: after `tick`, the surface shows the latest video frame
// with the crosshair on top, and every refresh listener has seen the pixels
// under the crosshair *without* the crosshair in them.

use chrono::Utc;
use tracing::trace;

use crate::config::OverlayConfig;
use crate::cursor::{CursorStore, PointerEvent};
use crate::draw::OverlayPainter;
use crate::error::Result;
use crate::event::{Listener, ListenerId, Listeners, REFRESH, SampleEvent};
use crate::sampler::RegionSampler;
use crate::types::{Cursor, Surface};
use crate::video::VideoSource;

pub struct SamplingOverlay {
    config: OverlayConfig,
    surface: Surface,
    cursor: CursorStore,
    sampler: RegionSampler,
    painter: OverlayPainter,
    listeners: Listeners,
}

impl SamplingOverlay {
    /// Build an overlay with a blank surface and the cursor at its centre.
    /// Fails if the config cannot describe a usable surface.
    pub fn new(config: OverlayConfig) -> Result<Self> {
        config.validate()?;
        let (w, h) = (config.surface_width, config.surface_height);
        Ok(Self {
            surface: Surface::new(w, h),
            cursor: CursorStore::new(Cursor::center_of(w, h)),
            sampler: RegionSampler::new(config.sample_size, config.edge_policy),
            painter: OverlayPainter::new(config.stroke_width, config.accent, config.indicator_box_size),
            listeners: Listeners::default(),
            config,
        })
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Mutable access for hosts that need to update the display bounds.
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Handle to the cursor; clones can be moved to an input thread.
    pub fn cursor(&self) -> &CursorStore {
        &self.cursor
    }

    /// Mouse and touch input both land here.
    pub fn handle_pointer(&mut self, event: &mut PointerEvent) -> Result<Cursor> {
        self.cursor.set_from_pointer_event(
            event,
            self.surface.display_bounds(),
            self.surface.width(),
            self.surface.height(),
        )
    }

    /// Register `callback` for events named `name`. Only `"refresh"` is ever
    /// dispatched; other names are accepted but never fire.
    pub fn add_event_listener<F>(&mut self, name: &str, callback: F) -> ListenerId
    where
        F: FnMut(&SampleEvent) + Send + 'static,
    {
        self.listeners.add(name, Box::new(callback) as Listener)
    }

    pub fn on_refresh<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&SampleEvent) + Send + 'static,
    {
        self.add_event_listener(REFRESH, callback)
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Pixels currently under the sample window (no frame copy, no event).
    pub fn sample(&self) -> Vec<u8> {
        self.sampler.sample(&self.surface, self.cursor.get(), self.config.indicator_half_size)
    }

    /// One tick: copy frame, sample, dispatch, then paint the indicator.
    /// A failed frame copy abandons the tick before anything is dispatched.
    /// Returns how many listeners received the event.
    pub fn tick<V: VideoSource + ?Sized>(&mut self, video: &mut V) -> Result<usize> {
        video.draw_frame(&mut self.surface)?;

        // One snapshot for sampling and painting, so both agree even if
        // another thread moves the cursor mid-tick.
        let cursor = self.cursor.get();
        let half = self.config.indicator_half_size;

        let data = self.sampler.sample(&self.surface, cursor, half);
        let event = SampleEvent::new(data, Utc::now());
        let delivered = self.listeners.dispatch(&event);
        drop(event);

        self.painter.paint(&mut self.surface, cursor, half);
        trace!(x = cursor.x, y = cursor.y, delivered, "tick");
        Ok(delivered)
    }
}
