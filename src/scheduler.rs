// Frame scheduler: one call to `tick` = one display refresh.
// Holds everything the effect remembers between frames (clock, previous frame, bursts, RNG),
// so nothing lives in globals and a seeded RNG replays a run exactly.
use rand::Rng;
use tracing::{debug, info};

use crate::compositor::{draw_fallback, draw_particles, draw_stage};
use crate::motion::MotionDetector;
use crate::particles::{spawn, ParticleSystem};
use crate::tuning::Tuning;
use crate::types::{FrameBuffer, MotionEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// No camera yet (or it never came up): static fallback screen.
    Idle,
    /// Live video attached: full capture → detect → simulate → render.
    Running,
}

pub struct Scheduler<R: Rng> {
    state: State,
    clock: f32,
    tuning: Tuning,
    detector: MotionDetector,
    particles: ParticleSystem,
    events: Vec<MotionEvent>, // scratch, reused every tick
    rng: R,
}

impl<R: Rng> Scheduler<R> {
    pub fn new(tuning: Tuning, rng: R) -> Self {
        Self {
            state: State::Idle,
            clock: 0.0,
            tuning,
            detector: MotionDetector::new(tuning.motion),
            particles: ParticleSystem::new(tuning.sim),
            events: Vec::new(),
            rng,
        }
    }

    /// A live video stream is attached: Idle → Running. There is no way back.
    pub fn start(&mut self) {
        if self.state == State::Idle {
            info!("video attached, effect running");
            self.state = State::Running;
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    /// The draw surface changed size: the stored frame can no longer be compared.
    pub fn resize(&mut self, width: usize, height: usize) {
        info!(width, height, "surface resized, motion history reset");
        self.detector.invalidate();
    }

    /// Render one tick onto `canvas` from whatever video frame is current.
    /// Visual (running): graded mirror image + new bursts where you moved + older bursts fading.
    /// Visual (idle): solid background only.
    pub fn tick(&mut self, video: &FrameBuffer, canvas: &mut FrameBuffer) {
        if self.state == State::Idle {
            draw_fallback(canvas);
            return;
        }

        self.clock += self.tuning.sim.clock_step;

        // 1–5) video + grading
        draw_stage(canvas, video, self.clock);

        // Capture what we just drew and compare it with last tick
        self.detector.sample(canvas);
        self.events.clear();
        self.detector.detect(&mut self.events);

        for &event in &self.events {
            self.particles.push(spawn(event, &self.tuning.spawn, &mut self.rng));
        }
        if self.particles.take_saturated() {
            debug!(cap = self.tuning.sim.max_particles, "particle cap reached, spawns skipped");
        }

        // Integrate, prune, then draw the survivors on top
        self.particles.update(self.clock);
        draw_particles(canvas, self.particles.particles());

        self.detector.commit();
    }
}
