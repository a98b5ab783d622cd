// What you SEE:
// • Your webcam, mirrored, dimmed to a concert-stage look with blue and green spotlights.
// • Wherever you move, neon light bursts spark, float upward and fade.
// • No camera? A dark idle screen instead; the window still runs.
// • M mutes the soundtrack, P pauses it, H toggles the HUD. ESC quits.

mod audio;
mod camera;
mod cli;
mod compositor;
mod draw;
mod error;
mod motion;
mod particles;
mod scheduler;
mod tuning;
mod types;

use audio::Soundtrack;
use camera::CameraFeed;
use clap::Parser;
use cli::Args;
use draw::{draw_text_5x7, Drawer};
use error::Error;
use rand::SeedableRng;
use rand::rngs::StdRng;
use scheduler::{Scheduler, State};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use types::FrameBuffer;

fn main() -> Result<(), Error> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    /* --- Soundtrack ---
       Audio: loops in the background; a failure just means silence. */
    let mut soundtrack = args.audio.as_deref().and_then(|path| {
        Soundtrack::play_looped(path, args.volume)
            .map_err(|e| warn!("{e}; running without sound"))
            .ok()
    });

    /* --- Camera ---
       Frames arrive on a capture thread; the render loop never waits for them.
       Visual: if this fails the window still opens, showing the idle screen. */
    let cam = match CameraFeed::start(args.camera, args.width, args.height, args.fps) {
        Ok(cam) => Some(cam),
        Err(e) => {
            error!("{e}");
            warn!("camera unavailable, falling back to the idle screen");
            None
        }
    };
    let (w, h) = cam
        .as_ref()
        .map(|c| c.resolution())
        .unwrap_or((args.width, args.height));
    let (w, h) = (w as usize, h as usize);

    let mut drawer = Drawer::new("Neon Stage", w, h)?;

    /* --- Reusable buffers ---
       Visual: `canvas` is the image you actually see; `video` is the latest camera frame. */
    let mut canvas = FrameBuffer::filled(w, h, 0);
    let mut video = FrameBuffer::filled(w, h, 0);

    /* --- Simulation context --- */
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "burst rng seeded");
    let mut sched = Scheduler::new(args.tuning(), StdRng::seed_from_u64(seed));
    if cam.is_some() {
        sched.start();
    }

    /* --- HUD / FPS --- */
    let mut show_hud = args.hud;
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Follow the window size (minimized windows report 0x0; keep the old surface). */
        let (ww, wh) = drawer.size();
        if ww > 0 && wh > 0 && (ww, wh) != (canvas.width, canvas.height) {
            canvas = FrameBuffer::filled(ww, wh, 0);
            sched.resize(ww, wh);
        }

        /* 2) Newest camera frame if one arrived; otherwise the previous one is shown again. */
        if let Some(frame) = cam.as_ref().and_then(CameraFeed::latest) {
            video = frame;
        }

        /* 3) Inputs */
        if drawer.h_pressed_once() { show_hud = !show_hud; }
        if let Some(track) = soundtrack.as_mut() {
            if drawer.m_pressed_once() { track.toggle_mute(); }
            if drawer.p_pressed_once() { track.toggle_pause(); }
        }

        /* 4) One tick: stage, motion, bursts. */
        sched.tick(&video, &mut canvas);

        if show_hud {
            let hud = match sched.state() {
                State::Running => format!("LIVE | {} | P: {}", hud_fps_text, sched.particles().len()),
                State::Idle => String::from("IDLE"),
            };
            draw_text_5x7(&mut canvas, 8, 8, &hud, 0x00_FF_FF_FF);
        }

        /* 5) Present (minifb paces this to the display rate). */
        drawer.present(&canvas)?;

        /* 6) FPS counter, once per second */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            debug!(
                fps = %format!("{fps:.1}"),
                particles = sched.particles().len(),
                clock = sched.clock(),
                "frame rate"
            );
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("window closed, shutting down");
    Ok(())
}
