// Render loop: runs `SamplingOverlay::tick` at a fixed cadence while the
// video plays.
// Visual expectation: the window updates about every 20 ms; pausing the
// video freezes the last painted frame until play is pressed again.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::Result;
use crate::overlay::SamplingOverlay;
use crate::video::VideoSource;

/// Cloneable switch that ends a render loop from anywhere.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the first play signal.
    Idle,
    Running,
    /// Paused, ended, stopped, or a tick failed. A play signal restarts it
    /// unless the stop handle was used.
    Terminated,
}

/// Why a running loop stopped ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Paused,
    Ended,
    Stopped,
}

/// Result of one [`RenderLoop::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// Not running; nothing to do until the video plays.
    Idle,
    /// Running, next tick due after this long.
    Waiting(Duration),
    Ticked,
    /// The loop just stopped; later polls report `Idle`.
    Terminated(Termination),
}

pub struct RenderLoop {
    interval: Duration,
    state: LoopState,
    next_due: Instant,
    ticks: u64,
    stop: StopHandle,
}

impl RenderLoop {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: LoopState::Idle,
            next_due: Instant::now(),
            ticks: 0,
            stop: StopHandle::default(),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Ticks completed since the loop was built.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance the loop without blocking: start on a play signal, tick when
    /// the deadline has passed, terminate quietly on pause/end/stop.
    /// A tick error terminates the loop and is returned as-is.
    pub fn poll<V: VideoSource + ?Sized>(
        &mut self,
        overlay: &mut SamplingOverlay,
        video: &mut V,
        now: Instant,
    ) -> Result<Poll> {
        if self.stop.is_stopped() {
            return Ok(self.terminate(Termination::Stopped));
        }

        if video.take_play_signal() && self.state != LoopState::Running {
            info!(interval_ms = self.interval.as_millis() as u64, "render loop started");
            self.state = LoopState::Running;
            self.next_due = now;
        }

        if self.state != LoopState::Running {
            return Ok(Poll::Idle);
        }
        if now < self.next_due {
            return Ok(Poll::Waiting(self.next_due - now));
        }

        if video.is_ended() {
            return Ok(self.terminate(Termination::Ended));
        }
        if video.is_paused() {
            return Ok(self.terminate(Termination::Paused));
        }

        if let Err(e) = overlay.tick(video) {
            warn!(error = %e, "tick failed, render loop terminated");
            self.state = LoopState::Terminated;
            return Err(e);
        }
        self.ticks += 1;

        self.next_due += self.interval;
        if self.next_due <= now {
            // fell behind; don't burst to catch up
            self.next_due = now + self.interval;
        }
        Ok(Poll::Ticked)
    }

    /// Block until the loop terminates, sleeping between ticks.
    /// `between_ticks` runs after every tick (e.g. to feed pointer input).
    pub fn run<V, F>(
        &mut self,
        overlay: &mut SamplingOverlay,
        video: &mut V,
        mut between_ticks: F,
    ) -> Result<Termination>
    where
        V: VideoSource + ?Sized,
        F: FnMut(&mut SamplingOverlay),
    {
        loop {
            match self.poll(overlay, video, Instant::now())? {
                Poll::Ticked => between_ticks(overlay),
                Poll::Waiting(d) => std::thread::sleep(d),
                Poll::Idle => std::thread::sleep(self.interval),
                Poll::Terminated(reason) => return Ok(reason),
            }
        }
    }

    fn terminate(&mut self, reason: Termination) -> Poll {
        if self.state == LoopState::Terminated {
            return Poll::Idle;
        }
        info!(?reason, ticks = self.ticks, "render loop terminated");
        self.state = LoopState::Terminated;
        Poll::Terminated(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;
    use crate::video::StillSource;
    use image::{Rgba, RgbaImage};
    use std::sync::Mutex;

    fn overlay_with_counter() -> (SamplingOverlay, Arc<Mutex<u32>>) {
        let cfg = OverlayConfig { surface_width: 40, surface_height: 40, ..OverlayConfig::default() };
        let mut o = SamplingOverlay::new(cfg).unwrap();
        let hits = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&hits);
        o.on_refresh(move |_| *sink.lock().unwrap() += 1);
        (o, hits)
    }

    fn video() -> StillSource {
        StillSource::new(RgbaImage::from_pixel(40, 40, Rgba([9, 9, 9, 255])))
    }

    const MS20: Duration = Duration::from_millis(20);

    #[test]
    fn stays_idle_without_play() {
        let (mut o, hits) = overlay_with_counter();
        let mut v = video();
        let mut l = RenderLoop::new(MS20);
        assert_eq!(l.poll(&mut o, &mut v, Instant::now()).unwrap(), Poll::Idle);
        assert_eq!(*hits.lock().unwrap(), 0);
    }

    #[test]
    fn ticks_on_cadence() {
        let (mut o, hits) = overlay_with_counter();
        let mut v = video();
        v.play();
        let mut l = RenderLoop::new(MS20);
        let t0 = Instant::now();
        assert_eq!(l.poll(&mut o, &mut v, t0).unwrap(), Poll::Ticked);
        assert_eq!(
            l.poll(&mut o, &mut v, t0 + Duration::from_millis(5)).unwrap(),
            Poll::Waiting(Duration::from_millis(15))
        );
        assert_eq!(l.poll(&mut o, &mut v, t0 + MS20).unwrap(), Poll::Ticked);
        assert_eq!(*hits.lock().unwrap(), 2);
        assert_eq!(l.ticks(), 2);
    }

    #[test]
    fn pause_terminates_quietly_and_play_restarts() {
        let (mut o, hits) = overlay_with_counter();
        let mut v = video();
        v.play();
        let mut l = RenderLoop::new(MS20);
        let t0 = Instant::now();
        l.poll(&mut o, &mut v, t0).unwrap();

        v.pause();
        assert_eq!(l.poll(&mut o, &mut v, t0 + MS20).unwrap(), Poll::Terminated(Termination::Paused));
        assert_eq!(l.poll(&mut o, &mut v, t0 + MS20 * 2).unwrap(), Poll::Idle);
        assert_eq!(*hits.lock().unwrap(), 1);
        assert_eq!(l.state(), LoopState::Terminated);

        v.play();
        assert_eq!(l.poll(&mut o, &mut v, t0 + MS20 * 3).unwrap(), Poll::Ticked);
        assert_eq!(*hits.lock().unwrap(), 2);
    }

    #[test]
    fn stop_handle_wins_over_play() {
        let (mut o, hits) = overlay_with_counter();
        let mut v = video();
        v.play();
        let mut l = RenderLoop::new(MS20);
        l.stop_handle().stop();
        assert_eq!(
            l.poll(&mut o, &mut v, Instant::now()).unwrap(),
            Poll::Terminated(Termination::Stopped)
        );
        v.pause();
        v.play();
        assert_eq!(l.poll(&mut o, &mut v, Instant::now()).unwrap(), Poll::Idle);
        assert_eq!(*hits.lock().unwrap(), 0);
    }

    #[test]
    fn run_returns_when_video_ends() {
        let (mut o, hits) = overlay_with_counter();
        let mut v = video().with_frame_limit(3);
        v.play();
        let mut l = RenderLoop::new(Duration::from_millis(1));
        let mut between = 0;
        let reason = l.run(&mut o, &mut v, |_| between += 1).unwrap();
        assert_eq!(reason, Termination::Ended);
        assert_eq!(*hits.lock().unwrap(), 3);
        assert_eq!(between, 3);
    }

    #[test]
    fn fallen_behind_loop_does_not_burst() {
        let (mut o, _) = overlay_with_counter();
        let mut v = video();
        v.play();
        let mut l = RenderLoop::new(MS20);
        let t0 = Instant::now();
        l.poll(&mut o, &mut v, t0).unwrap();
        let late = t0 + Duration::from_millis(200);
        assert_eq!(l.poll(&mut o, &mut v, late).unwrap(), Poll::Ticked);
        assert_eq!(l.poll(&mut o, &mut v, late).unwrap(), Poll::Waiting(MS20));
    }
}
