// Frame sampling + sparse-grid motion detection.
// Visual expectation: wherever something moved between two ticks (a waving hand,
// a turning head) the detector reports grid points there; a still scene reports none.
use crate::tuning::MotionTuning;
use crate::types::{FrameBuffer, MotionEvent};

/// Compares each tick's composited frame with the one before it.
pub struct MotionDetector {
    tuning: MotionTuning,
    current: FrameBuffer,          // latest sample (reused every tick)
    previous: Option<FrameBuffer>, // None on the first tick and right after a resize
}

impl MotionDetector {
    pub fn new(tuning: MotionTuning) -> Self {
        Self {
            tuning,
            current: FrameBuffer { width: 0, height: 0, pixels: Vec::new() },
            previous: None,
        }
    }

    /// Frame Sampler: read back the composited surface into the "current" buffer.
    /// The buffer is reused; a size change reallocates it and drops the previous frame.
    pub fn sample(&mut self, surface: &FrameBuffer) {
        if !self.current.same_size(surface) {
            self.current = surface.clone();
            self.invalidate();
            return;
        }
        self.current.pixels.copy_from_slice(&surface.pixels);
    }

    /// Forget the previous frame; the next comparison is treated as a first tick.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    #[cfg(test)]
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Push motion events for the current sample into `out` (not cleared first).
    /// Nothing is emitted without a previous frame of the same size.
    pub fn detect(&self, out: &mut Vec<MotionEvent>) {
        if let Some(prev) = &self.previous {
            if prev.same_size(&self.current) {
                diff_grid(&self.current, prev, self.tuning, out);
            }
        }
    }

    /// The current sample becomes "previous" for the next tick (buffers are swapped, not copied).
    pub fn commit(&mut self) {
        match &mut self.previous {
            Some(prev) if prev.same_size(&self.current) => {
                std::mem::swap(prev, &mut self.current);
            }
            _ => self.previous = Some(self.current.clone()),
        }
    }
}

/// Walk the sparse grid and report every point whose RGB difference exceeds the threshold.
/// Both frames must share dimensions. Alpha (upper byte) is ignored.
pub fn diff_grid(current: &FrameBuffer, previous: &FrameBuffer, tuning: MotionTuning, out: &mut Vec<MotionEvent>) {
    debug_assert!(current.same_size(previous));
    let step = tuning.step.max(1);
    let w = current.width;

    for y in (0..current.height).step_by(step) {
        for x in (0..w).step_by(step) {
            let i = y * w + x;
            let a = current.pixels[i];
            let b = previous.pixels[i];

            // |dR| + |dG| + |dB|
            let diff = ((a >> 16) & 0xFF).abs_diff((b >> 16) & 0xFF)
                + ((a >> 8) & 0xFF).abs_diff((b >> 8) & 0xFF)
                + (a & 0xFF).abs_diff(b & 0xFF);

            if diff > tuning.threshold {
                out.push(MotionEvent { x, y, magnitude: diff });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn detector() -> MotionDetector {
        MotionDetector::new(Tuning::default().motion)
    }

    #[test]
    fn first_tick_emits_nothing() {
        let mut d = detector();
        let mut out = Vec::new();
        d.sample(&FrameBuffer::filled(100, 80, 0x00_FF_FF_FF));
        d.detect(&mut out);
        assert!(out.is_empty());
        assert!(!d.has_previous());
    }

    #[test]
    fn red_flash_fires_every_grid_point() {
        let mut d = detector();
        let mut out = Vec::new();
        d.sample(&FrameBuffer::filled(100, 80, 0));
        d.commit();
        d.sample(&FrameBuffer::filled(100, 80, 0x00_FF_00_00));
        d.detect(&mut out);

        // x in {0,26,52,78}, y in {0,26,52,78}
        assert_eq!(out.len(), 4 * 4);
        assert!(out.iter().all(|e| e.magnitude == 255));
        assert!(out.iter().all(|e| e.x % 26 == 0 && e.y % 26 == 0));
        assert_eq!(out[5], MotionEvent { x: 26, y: 26, magnitude: 255 });
    }

    #[test]
    fn differences_at_or_below_threshold_are_ignored() {
        let mut out = Vec::new();
        let prev = FrameBuffer::filled(30, 30, 0);
        let at = FrameBuffer::filled(30, 30, 0x00_0D_0D_0C); // 13+13+12 = 38
        diff_grid(&at, &prev, Tuning::default().motion, &mut out);
        assert!(out.is_empty());

        let above = FrameBuffer::filled(30, 30, 0x00_0D_0D_0D); // 39
        diff_grid(&above, &prev, Tuning::default().motion, &mut out);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|e| e.magnitude == 39));
    }

    #[test]
    fn only_grid_points_are_sampled() {
        let mut out = Vec::new();
        let prev = FrameBuffer::filled(52, 52, 0);
        let mut cur = prev.clone();
        cur.pixels[1 * 52 + 1] = 0x00_FF_FF_FF; // off-grid
        cur.pixels[26 * 52 + 26] = 0x00_FF_FF_FF; // on-grid
        diff_grid(&cur, &prev, Tuning::default().motion, &mut out);
        assert_eq!(out, vec![MotionEvent { x: 26, y: 26, magnitude: 765 }]);
    }

    #[test]
    fn alpha_byte_is_ignored() {
        let mut out = Vec::new();
        let prev = FrameBuffer::filled(10, 10, 0x00_20_20_20);
        let cur = FrameBuffer::filled(10, 10, 0xFF_20_20_20);
        diff_grid(&cur, &prev, Tuning::default().motion, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn identical_frames_emit_nothing() {
        let mut d = detector();
        let mut out = Vec::new();
        let frame = FrameBuffer::filled(64, 48, 0x00_40_80_C0);
        for _ in 0..5 {
            d.sample(&frame);
            d.detect(&mut out);
            d.commit();
        }
        assert!(out.is_empty());
    }

    #[test]
    fn resize_drops_previous_frame() {
        let mut d = detector();
        let mut out = Vec::new();
        d.sample(&FrameBuffer::filled(64, 48, 0));
        d.commit();
        assert!(d.has_previous());

        d.sample(&FrameBuffer::filled(32, 32, 0x00_FF_FF_FF));
        assert!(!d.has_previous());
        d.detect(&mut out);
        assert!(out.is_empty());

        // The next tick compares like with like again
        d.commit();
        d.sample(&FrameBuffer::filled(32, 32, 0));
        d.detect(&mut out);
        assert_eq!(out.len(), 4);
    }
}
