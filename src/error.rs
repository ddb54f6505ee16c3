// One error type for the whole crate.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The overlay configuration cannot produce a working surface/loop.
    #[error("Config error: {0}")]
    Config(String),

    /// Copying a video frame into the surface failed; the tick is abandoned.
    #[error("Frame copy error: {0}")]
    Frame(String),

    /// The surface's on-screen rectangle has no area, so pointer input cannot be mapped.
    #[error("Display bounds are degenerate: {width}x{height}")]
    DegenerateBounds { width: f64, height: f64 },

    /// Mapping a pointer position produced a non-finite surface point.
    #[error("Pointer maps outside any representable surface point: ({x}, {y})")]
    PointerOutOfRange { x: f64, y: f64 },

    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),

    #[error("Camera init error: {0}")]
    CameraInit(String),

    #[error("Camera frame error: {0}")]
    CameraFrame(String),
}

pub type Result<T> = std::result::Result<T, Error>;
