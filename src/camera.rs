// Opens a camera and plays it into the overlay's surface.
// Visual expectation: when the render loop calls `draw_frame()`, the surface
// shows what the camera sees right now, stretched to the surface size.

use pixel_probe::{Error, Result, Surface, VideoSource};

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use image::{Rgba, RgbaImage};
use tracing::info;

// A small wrapper around nokhwa::Camera that behaves like a playing video.
pub struct CameraSource {
    cam: Camera,
    width: u32,
    height: u32,
    paused: bool,
    ended: bool,
    play_pending: bool,
}

impl CameraSource {
    /// Open camera `index` near the requested resolution and start streaming.
    /// The source starts out playing, so the first poll of the render loop starts it.
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        info!(index, width = actual.width(), height = actual.height(), "camera opened");

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
            paused: false,
            ended: false,
            play_pending: true,
        })
    }

    /// Report the actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Space bar: freeze or resume the feed.
    pub fn toggle(&mut self) {
        if self.ended {
            return;
        }
        self.paused = !self.paused;
        if !self.paused {
            self.play_pending = true;
        }
    }

    /// Grab one frame (blocks until the camera has one) as RGBA.
    fn grab(&mut self) -> Result<RgbaImage> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;
        let rgb = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = rgb.dimensions();
        Ok(RgbaImage::from_fn(w, h, |x, y| {
            let p = rgb.get_pixel(x, y);
            Rgba([p[0], p[1], p[2], 255])
        }))
    }
}

impl VideoSource for CameraSource {
    fn take_play_signal(&mut self) -> bool {
        std::mem::take(&mut self.play_pending)
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn is_ended(&self) -> bool {
        self.ended
    }

    fn draw_frame(&mut self, surface: &mut Surface) -> Result<()> {
        match self.grab() {
            Ok(frame) => {
                surface.draw_frame(&frame);
                Ok(())
            }
            Err(e) => {
                // A camera that stops delivering frames is treated as an ended stream.
                self.ended = true;
                Err(e)
            }
        }
    }
}
