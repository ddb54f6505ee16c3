// What you SEE:
// • Live camera (or a still image with --image) fills the window.
// • A yellow X inside a box marks the sampled pixels; click to move it.
// • SPACE pauses/resumes the feed. ESC quits.
// • Every Nth refresh event is logged with the mean colour under the box.

mod camera;
mod window;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use camera::CameraSource;
use pixel_probe::{
    OverlayConfig, Poll, RenderLoop, SampleEvent, SamplingOverlay, StillSource, Surface,
    VideoSource,
};
use window::Drawer;

#[derive(Parser, Debug)]
#[command(version, about = "Click a point on a live video and stream the pixels around it")]
struct Args {
    /// Camera index (0 = default webcam)
    #[arg(long, default_value_t = 0)]
    camera: u32,

    /// Requested camera width; the window opens at the delivered size
    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Play this image instead of a camera
    #[arg(long)]
    image: Option<PathBuf>,

    /// JSON overlay config (camelCase keys, all optional)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log every Nth sample event
    #[arg(long, default_value_t = 25)]
    print_every: u64,
}

/// Either input, with the pause toggle the keyboard needs.
enum Source {
    Camera(CameraSource),
    Still(StillSource),
}

impl Source {
    fn toggle(&mut self) {
        match self {
            Source::Camera(c) => c.toggle(),
            Source::Still(s) => s.toggle(),
        }
    }
}

impl VideoSource for Source {
    fn take_play_signal(&mut self) -> bool {
        match self {
            Source::Camera(c) => c.take_play_signal(),
            Source::Still(s) => s.take_play_signal(),
        }
    }

    fn is_paused(&self) -> bool {
        match self {
            Source::Camera(c) => c.is_paused(),
            Source::Still(s) => s.is_paused(),
        }
    }

    fn is_ended(&self) -> bool {
        match self {
            Source::Camera(c) => c.is_ended(),
            Source::Still(s) => s.is_ended(),
        }
    }

    fn draw_frame(&mut self, surface: &mut Surface) -> pixel_probe::Result<()> {
        match self {
            Source::Camera(c) => c.draw_frame(surface),
            Source::Still(s) => s.draw_frame(surface),
        }
    }
}

/// Mean R,G,B,A of a sample, for the log line.
fn mean_rgba(ev: &SampleEvent) -> [u8; 4] {
    let n = (ev.data.len() / 4).max(1) as u64;
    let mut sum = [0u64; 4];
    for px in ev.data.chunks_exact(4) {
        for (acc, &c) in sum.iter_mut().zip(px) {
            *acc += c as u64;
        }
    }
    sum.map(|s| (s / n) as u8)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixel_probe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => OverlayConfig::load(path).context("loading overlay config")?,
        None => OverlayConfig::default(),
    };
    let mut overlay = SamplingOverlay::new(config.clone()).context("building overlay")?;

    /* --- Video source ---
       Visual: nothing yet; the source starts "playing" and the loop picks it up. */
    let (mut source, (w, h)) = match &args.image {
        Some(path) => {
            let mut still = StillSource::open(path).context("opening still image")?;
            still.play();
            let size = still_size(&config);
            (Source::Still(still), size)
        }
        None => {
            let cam = CameraSource::new(args.camera, args.width, args.height)
                .context("opening camera")?;
            let size = cam.resolution();
            (Source::Camera(cam), size)
        }
    };
    let mut drawer = Drawer::new("Pixel Probe", w as usize, h as usize)?;

    /* --- Refresh listener ---
       Visual: a log line every `print_every` ticks with the colour under the box. */
    let every = args.print_every.max(1);
    let mut seen = 0u64;
    overlay.on_refresh(move |ev| {
        seen += 1;
        if seen % every == 0 {
            info!(n = seen, bytes = ev.data.len(), mean = ?mean_rgba(ev), time = %ev.time, "refresh");
        }
    });

    let mut render = RenderLoop::new(config.tick_interval());
    info!(
        width = config.surface_width,
        height = config.surface_height,
        "SPACE: pause/play  click: move crosshair  ESC: quit"
    );

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        if drawer.space_pressed_once() {
            source.toggle();
        }

        // The window may have been resized since the last pass.
        overlay.surface_mut().set_display_bounds(drawer.bounds());
        if let Some(mut ev) = drawer.take_click() {
            if let Err(e) = overlay.handle_pointer(&mut ev) {
                warn!(error = %e, "click ignored");
            }
        }

        match render.poll(&mut overlay, &mut source, Instant::now())? {
            Poll::Ticked => drawer.present(overlay.surface())?,
            Poll::Waiting(d) => {
                drawer.pump();
                std::thread::sleep(d.min(Duration::from_millis(5)));
            }
            Poll::Idle | Poll::Terminated(_) => {
                drawer.pump();
                std::thread::sleep(config.tick_interval());
            }
        }
    }

    info!(ticks = render.ticks(), "bye");
    Ok(())
}

/// Window size for still images: half the surface, so clicks go through the
/// scaled mapping just like they do with a camera.
fn still_size(config: &OverlayConfig) -> (u32, u32) {
    ((config.surface_width / 2).max(1), (config.surface_height / 2).max(1))
}
