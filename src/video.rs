// Video sources the render loop can pull frames from.
// Visual expectation: whatever a source draws into the surface is what the
// window shows (and what gets sampled) on the next tick.

use std::path::Path;

use image::RgbaImage;

use crate::error::{Error, Result};
use crate::types::Surface;

/// Playback state + frame access the render loop needs from a video.
pub trait VideoSource {
    /// True once per transition into "playing". The loop starts (or restarts
    /// after terminating) only on this signal.
    fn take_play_signal(&mut self) -> bool;

    fn is_paused(&self) -> bool;

    fn is_ended(&self) -> bool;

    /// Copy the current frame over the whole surface at its logical resolution.
    fn draw_frame(&mut self, surface: &mut Surface) -> Result<()>;
}

/// Plays one still image as if it were a video. Useful without a camera and
/// as a scripted source: `with_frame_limit` makes it end after N frames.
pub struct StillSource {
    frame: RgbaImage,
    paused: bool,
    ended: bool,
    play_pending: bool,
    frames_left: Option<u64>,
}

impl StillSource {
    /// Starts paused; call [`StillSource::play`] to emit the play signal.
    pub fn new(frame: RgbaImage) -> Self {
        Self { frame, paused: true, ended: false, play_pending: false, frames_left: None }
    }

    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .map_err(|e| Error::Frame(format!("Open {}: {e}", path.display())))?;
        Ok(Self::new(img.to_rgba8()))
    }

    /// Report `ended` after `frames` more frames have been drawn.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frames_left = Some(frames);
        self
    }

    pub fn play(&mut self) {
        if self.paused && !self.ended {
            self.paused = false;
            self.play_pending = true;
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn toggle(&mut self) {
        if self.paused { self.play() } else { self.pause() }
    }

    /// Swap the picture shown from the next frame on.
    pub fn set_frame(&mut self, frame: RgbaImage) {
        self.frame = frame;
    }
}

impl VideoSource for StillSource {
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
        if self.ended {
            return Err(Error::Frame("source has ended".into()));
        }
        surface.draw_frame(&self.frame);
        if let Some(left) = self.frames_left.as_mut() {
            *left = left.saturating_sub(1);
            if *left == 0 {
                self.ended = true;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn play_signal_fires_once_per_transition() {
        let mut v = StillSource::new(RgbaImage::new(2, 2));
        assert!(!v.take_play_signal());
        v.play();
        assert!(v.take_play_signal());
        assert!(!v.take_play_signal());
        v.play(); // already playing
        assert!(!v.take_play_signal());
        v.pause();
        v.play();
        assert!(v.take_play_signal());
    }

    #[test]
    fn frame_limit_ends_the_source() {
        let mut v = StillSource::new(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]))).with_frame_limit(2);
        v.play();
        let mut s = Surface::new(4, 4);
        v.draw_frame(&mut s).unwrap();
        assert!(!v.is_ended());
        v.draw_frame(&mut s).unwrap();
        assert!(v.is_ended());
        assert!(v.draw_frame(&mut s).is_err());
        assert_eq!(s.pixel(3, 3), Some([1, 2, 3, 255]));
    }

    #[test]
    fn ended_source_cannot_play_again() {
        let mut v = StillSource::new(RgbaImage::new(1, 1)).with_frame_limit(1);
        v.play();
        v.take_play_signal();
        v.draw_frame(&mut Surface::new(1, 1)).unwrap();
        v.pause();
        v.play();
        assert!(!v.take_play_signal());
    }
}
