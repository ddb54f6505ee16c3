//! pixel-probe: copy a live video into a raster surface, let the user click a
//! point on it, and report the pixels around that point on every frame.
//!
//! The pieces, in tick order:
//! - [`video::VideoSource`] draws the current frame into the [`types::Surface`];
//! - [`sampler::RegionSampler`] reads the square around the [`cursor::CursorStore`];
//! - [`event::SampleEvent`] carries those bytes to the `refresh` listeners;
//! - [`draw::OverlayPainter`] draws the crosshair on top, after sampling.
//!
//! [`render::RenderLoop`] repeats that at a fixed cadence while the video plays.

pub mod config;
pub mod cursor;
pub mod draw;
pub mod error;
pub mod event;
pub mod overlay;
pub mod render;
pub mod sampler;
pub mod types;
pub mod video;

pub use config::OverlayConfig;
pub use cursor::{CursorStore, PointerEvent, PointerKind};
pub use error::{Error, Result};
pub use event::{ListenerId, REFRESH, SampleEvent};
pub use overlay::SamplingOverlay;
pub use render::{LoopState, Poll, RenderLoop, StopHandle, Termination};
pub use sampler::{EdgePolicy, RegionSampler};
pub use types::{Color, Cursor, ScreenRect, Surface};
pub use video::{StillSource, VideoSource};
