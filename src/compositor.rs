// Compositor: turns the camera frame into a dim "concert" stage and lays the bursts on top.
// Draw order never changes:
//   1) mirrored video with a slow wobble
//   2) black wash
//   3) blue spotlight (left)   4) green spotlight (right)
//   5) vignette
//   6) particles (halo, optional accent halo, white core)

use crate::draw::{blit_mirrored, fill_alpha, fill_disc, fill_radial_gradient, ColorStop, RadialGradient};
use crate::types::{FrameBuffer, Particle, Rgb};

// Wobble: horizontal sin(clock * 1.2) * 8 px, vertical cos(clock * 0.9) * 4 px.
const WOBBLE_X: (f32, f32) = (1.2, 8.0);
const WOBBLE_Y: (f32, f32) = (0.9, 4.0);

const DARKEN_ALPHA: f32 = 0.65;

const BLUE_SPOT: [ColorStop; 2] = [
    ColorStop { offset: 0.0, color: Rgb::new(0, 190, 255), alpha: 0.35 },
    ColorStop { offset: 1.0, color: Rgb::BLACK, alpha: 0.0 },
];
const GREEN_SPOT: [ColorStop; 2] = [
    ColorStop { offset: 0.0, color: Rgb::new(0, 255, 150), alpha: 0.32 },
    ColorStop { offset: 1.0, color: Rgb::BLACK, alpha: 0.0 },
];
const VIGNETTE: [ColorStop; 2] = [
    ColorStop { offset: 0.0, color: Rgb::BLACK, alpha: 0.0 },
    ColorStop { offset: 1.0, color: Rgb::BLACK, alpha: 0.6 },
];

// Halo sizing and per-layer opacity (all multiplied by life)
const HALO_BASE: f32 = 4.5;
const HALO_PER_ENERGY: f32 = 3.0;
const HALO_ALPHA: f32 = 0.18;
const ACCENT_SCALE: f32 = 1.3;
const ACCENT_ALPHA: f32 = 0.12;
const CORE_ALPHA: f32 = 0.65;

/// Background of the idle screen (camera unavailable).
pub const FALLBACK_BG: u32 = 0x00_06_0A_14;

/// Horizontal and vertical video offset for this clock value.
pub fn wobble(clock: f32) -> (f32, f32) {
    ((clock * WOBBLE_X.0).sin() * WOBBLE_X.1, (clock * WOBBLE_Y.0).cos() * WOBBLE_Y.1)
}

/// Steps 1–5: mirrored video plus the stage grading.
/// Visual: your mirror image, darkened, lit by a blue and a green spotlight, edges fading to black.
pub fn draw_stage(canvas: &mut FrameBuffer, video: &FrameBuffer, clock: f32) {
    let (wx, wy) = wobble(clock);
    blit_mirrored(canvas, video, wx, wy);

    fill_alpha(canvas, Rgb::BLACK, DARKEN_ALPHA);

    let w = canvas.width as f32;
    let h = canvas.height as f32;
    let blue = RadialGradient { cx: w * 0.25, cy: h * 0.3, r0: 0.0, r1: w * 0.7, stops: &BLUE_SPOT };
    fill_radial_gradient(canvas, &blue);
    let green = RadialGradient { cx: w * 0.75, cy: h * 0.4, r0: 0.0, r1: w * 0.7, stops: &GREEN_SPOT };
    fill_radial_gradient(canvas, &green);

    let vignette = RadialGradient { cx: w / 2.0, cy: h / 2.0, r0: w * 0.2, r1: w * 0.9, stops: &VIGNETTE };
    fill_radial_gradient(canvas, &vignette);
}

/// Step 6: every live burst, in collection order.
pub fn draw_particles(canvas: &mut FrameBuffer, particles: &[Particle]) {
    for p in particles {
        let halo = p.radius * (HALO_BASE + p.energy * HALO_PER_ENERGY);
        fill_disc(canvas, p.x, p.y, halo, p.color, HALO_ALPHA * p.life);
        if let Some(accent) = p.accent {
            fill_disc(canvas, p.x, p.y, halo * ACCENT_SCALE, accent, ACCENT_ALPHA * p.life);
        }
        fill_disc(canvas, p.x, p.y, p.radius, Rgb::WHITE, CORE_ALPHA * p.life);
    }
}

/// Static idle screen: solid background, no video and no motion features.
pub fn draw_fallback(canvas: &mut FrameBuffer) {
    canvas.pixels.fill(FALLBACK_BG);
}
