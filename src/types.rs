// Core types shared by the sampler, detector, particles and compositor.

/// One rendered frame (or one camera frame) in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb; alpha is always opaque
}

impl FrameBuffer {
    /// A frame of the given size filled with one packed color.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    #[inline]
    pub fn same_size(&self, other: &FrameBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn from_packed(px: u32) -> Self {
        Self {
            r: ((px >> 16) & 0xFF) as u8,
            g: ((px >> 8) & 0xFF) as u8,
            b: (px & 0xFF) as u8,
        }
    }

    #[inline]
    pub fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// A sampled grid point whose color changed more than the threshold since last tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionEvent {
    pub x: usize,
    pub y: usize,
    pub magnitude: u32, // |dR| + |dG| + |dB|, 0..=765
}

/// One glowing burst.
/// Visual: a soft colored halo with a small white core that rises, sways and fades.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32, pub y: f32,   // canvas position in pixels
    pub radius: f32,          // core dot radius (halo is derived from it)
    pub energy: f32,          // 0..1, from motion magnitude
    pub life: f32,            // 1 → 0; removed once it reaches 0
    pub vy: f32,              // px per tick, negative = upward
    pub drift: f32,           // phase of the sideways sway, radians
    pub color: Rgb,           // halo color
    pub accent: Option<Rgb>,  // optional second, larger halo
}
