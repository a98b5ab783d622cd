// Window + software drawing utilities.
// Visual effects provided here:
// 1) A resizable window that shows the composited stage.
// 2) Canvas-style primitives: translucent fills, radial gradients, soft discs
//    and a mirrored, scaled video blit, all blended source-over.
// 3) A tiny 5x7 bitmap font to render HUD text on top of the video.

use crate::error::Error;
use crate::types::{FrameBuffer, Rgb};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a resizable window, initially sized to the camera feed.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let opts = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, opts)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        // One tick per display refresh (minifb sleeps inside update to hold this rate).
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new image.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Current drawable size in pixels; changes when the user resizes the window.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we’ll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    // soundtrack mute toggle
    pub fn m_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::M, KeyRepeat::No)
    }

    // soundtrack pause toggle
    pub fn p_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::P, KeyRepeat::No)
    }

    // HUD toggle
    pub fn h_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::H, KeyRepeat::No)
    }
}

/* ---------- Blending ---------- */

/// Source-over blend of `c` at opacity `a` onto an opaque packed pixel.
#[inline]
fn blend(dst: u32, c: Rgb, a: f32) -> u32 {
    let d = Rgb::from_packed(dst);
    let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u8;
    Rgb::new(mix(c.r, d.r), mix(c.g, d.g), mix(c.b, d.b)).packed()
}

/// Translucent fill over the whole surface.
/// Visual: everything underneath gets tinted (or darkened, with black).
pub fn fill_alpha(fb: &mut FrameBuffer, color: Rgb, alpha: f32) {
    let a = alpha.clamp(0.0, 1.0);
    if a <= 0.0 { return; }
    for px in &mut fb.pixels {
        *px = blend(*px, color, a);
    }
}

/* ---------- Radial gradients ---------- */

/// One color stop; `offset` in [0,1] along the gradient, `alpha` in [0,1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgb,
    pub alpha: f32,
}

/// Two concentric circles at (cx,cy): offset 0 at radius `r0`, offset 1 at `r1`.
/// Stops are expected in ascending offset order.
#[derive(Clone, Copy, Debug)]
pub struct RadialGradient<'a> {
    pub cx: f32,
    pub cy: f32,
    pub r0: f32,
    pub r1: f32,
    pub stops: &'a [ColorStop],
}

impl RadialGradient<'_> {
    /// Color + alpha at gradient offset `t` (clamped); stops are interpolated premultiplied,
    /// so fading to transparent black keeps the hue instead of going grey.
    pub fn color_at(&self, t: f32) -> (Rgb, f32) {
        let stops = self.stops;
        let (first, last) = match (stops.first(), stops.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return (Rgb::BLACK, 0.0),
        };
        let t = t.clamp(0.0, 1.0);
        if t <= first.offset { return (first.color, first.alpha); }
        if t >= last.offset { return (last.color, last.alpha); }

        for pair in stops.windows(2) {
            let (s0, s1) = (pair[0], pair[1]);
            if t < s0.offset || t > s1.offset { continue; }
            let span = s1.offset - s0.offset;
            let u = if span > 0.0 { (t - s0.offset) / span } else { 1.0 };

            let a = s0.alpha * (1.0 - u) + s1.alpha * u;
            if a <= 0.0 { return (s1.color, 0.0); }
            let ch = |c0: u8, c1: u8| {
                let pre = c0 as f32 * s0.alpha * (1.0 - u) + c1 as f32 * s1.alpha * u;
                (pre / a).round().clamp(0.0, 255.0) as u8
            };
            let c = Rgb::new(ch(s0.color.r, s1.color.r), ch(s0.color.g, s1.color.g), ch(s0.color.b, s1.color.b));
            return (c, a);
        }
        (last.color, last.alpha)
    }

    /// Gradient offset for a point, measured from the pixel center.
    #[inline]
    fn offset_at(&self, x: f32, y: f32) -> f32 {
        let d = ((x - self.cx).powi(2) + (y - self.cy).powi(2)).sqrt();
        let span = self.r1 - self.r0;
        if span <= 0.0 {
            return if d < self.r0 { 0.0 } else { 1.0 };
        }
        (d - self.r0) / span
    }
}

/// Paint the gradient over the whole surface.
/// Visual: a soft pool of light (or shadow) centered on the gradient.
pub fn fill_radial_gradient(fb: &mut FrameBuffer, g: &RadialGradient) {
    let w = fb.width;
    for (i, px) in fb.pixels.iter_mut().enumerate() {
        let x = (i % w) as f32 + 0.5;
        let y = (i / w) as f32 + 0.5;
        let (c, a) = g.color_at(g.offset_at(x, y));
        if a > 0.0 {
            *px = blend(*px, c, a);
        }
    }
}

/* ---------- Discs ---------- */

/// Filled circle at (cx,cy) with a one-pixel anti-aliased rim.
/// Visual: a round translucent dot; pixels outside the surface are skipped.
pub fn fill_disc(fb: &mut FrameBuffer, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    if radius <= 0.0 || alpha <= 0.0 || fb.width == 0 || fb.height == 0 { return; }

    // Scan just the bounding box, clipped to the surface
    let x0 = (cx - radius - 1.0).floor().max(0.0) as usize;
    let y0 = (cy - radius - 1.0).floor().max(0.0) as usize;
    let x1 = (cx + radius + 1.0).ceil().min(fb.width as f32) as usize;
    let y1 = (cy + radius + 1.0).ceil().min(fb.height as f32) as usize;

    for y in y0..y1 {
        let dy = y as f32 + 0.5 - cy;
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            let d = (dx * dx + dy * dy).sqrt();
            let coverage = (radius - d + 0.5).clamp(0.0, 1.0);
            if coverage <= 0.0 { continue; }
            let idx = y * fb.width + x;
            fb.pixels[idx] = blend(fb.pixels[idx], color, alpha * coverage);
        }
    }
}

/* ---------- Video blit ---------- */

/// Draw `src` stretched over the whole surface, mirrored about the vertical center
/// line, then shifted by (`shift_x`, `shift_y`) in mirrored space.
/// A canvas pixel x shows source column `w - x - shift_x`; row y shows `y - shift_y`.
/// Pixels the shifted image no longer covers are cleared to black, so nothing from the
/// previous tick (old bursts included) leaks into this frame.
/// Visual: a selfie-style mirror with a thin dark band on the side it drifted away from.
pub fn blit_mirrored(fb: &mut FrameBuffer, src: &FrameBuffer, shift_x: f32, shift_y: f32) {
    if src.width == 0 || src.height == 0 {
        fb.pixels.fill(0);
        return;
    }
    let (w, h) = (fb.width as f32, fb.height as f32);
    let sx_scale = src.width as f32 / w;
    let sy_scale = src.height as f32 / h;

    for y in 0..fb.height {
        let dst_row = y * fb.width;
        let v = y as f32 + 0.5 - shift_y;
        if v < 0.0 || v >= h {
            fb.pixels[dst_row..dst_row + fb.width].fill(0);
            continue;
        }
        let sy = ((v * sy_scale) as usize).min(src.height - 1);
        let src_row = sy * src.width;

        for x in 0..fb.width {
            let u = w - (x as f32 + 0.5) - shift_x;
            if u < 0.0 || u >= w {
                fb.pixels[dst_row + x] = 0;
                continue;
            }
            let sx = ((u * sx_scale) as usize).min(src.width - 1);
            fb.pixels[dst_row + x] = src.pixels[src_row + sx];
        }
    }
}

/* ---------- HUD text: "LIVE | FPS: 00.0 | P: 0" or "IDLE" ---------- */

/// Opaque write; coordinates off the canvas are dropped.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Rows of a 5x7 HUD glyph, top to bottom, bit 4 = leftmost column.
/// Only the characters the HUD prints are covered.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // LIVE, IDLE, FPS
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

/// Visual: one HUD glyph, offset-shadowed so it reads over bright bursts.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        // shadow, then ink
        for (ofs, c) in [(1, 0x00000000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx as i32 + ofs, y + ry as i32 + ofs, c);
                    }
                }
            }
        }
    }
}

/// Visual: the status line in the top-left corner, 6 px per character.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}
