// Light bursts: motion events become glowing particles that rise, sway and fade.
// Visual outcomes:
// - Each moving spot on camera sparks a small neon halo with a white core.
// - Stronger motion → bigger, brighter, faster-rising bursts that also burn out sooner.
// - The very strongest sometimes carry an extra magenta halo.

use rand::Rng;
use std::f32::consts::TAU;

use crate::tuning::{SimTuning, SpawnTuning};
use crate::types::{MotionEvent, Particle, Rgb};

/// Halo colors, picked uniformly per burst.
pub const NEON_PALETTE: [Rgb; 3] = [
    Rgb::new(0, 255, 170),  // green
    Rgb::new(0, 220, 255),  // cyan
    Rgb::new(40, 190, 255), // blue
];

/// Second halo for some high-energy bursts.
pub const ACCENT: Rgb = Rgb::new(255, 60, 200);

/// Normalized burst strength for a raw pixel difference.
#[inline]
pub fn energy_for(magnitude: u32, t: &SpawnTuning) -> f32 {
    ((magnitude as f32 - t.energy_floor) / t.energy_span).clamp(0.0, 1.0)
}

/// Build exactly one particle for a motion event.
/// Random draws happen in a fixed order (accent roll, palette, jitter x, jitter y, drift),
/// so a seeded `rng` always reproduces the same burst.
pub fn spawn<R: Rng + ?Sized>(event: MotionEvent, t: &SpawnTuning, rng: &mut R) -> Particle {
    let energy = energy_for(event.magnitude, t);

    // The accent roll only happens for high energy
    let accent = (energy > t.accent_energy && rng.random_bool(t.accent_chance)).then_some(ACCENT);
    let color = NEON_PALETTE[rng.random_range(0..NEON_PALETTE.len())];

    let (jx, jy) = if t.jitter > 0.0 {
        (rng.random_range(-t.jitter..=t.jitter), rng.random_range(-t.jitter..=t.jitter))
    } else {
        (0.0, 0.0)
    };

    Particle {
        x: event.x as f32 + jx,
        y: event.y as f32 + jy,
        radius: t.radius_base + energy * t.radius_per_energy,
        energy,
        life: 1.0,
        vy: -t.rise_base - energy * t.rise_per_energy,
        drift: rng.random_range(0.0..TAU),
        color,
        accent,
    }
}

/// Owns every live burst.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    tuning: SimTuning,
    saturated: bool, // hit the cap at least once since the last check
}

impl ParticleSystem {
    /// Visual: no immediate effect; screen unchanged until something spawns.
    pub fn new(tuning: SimTuning) -> Self {
        Self {
            particles: Vec::with_capacity(tuning.max_particles.min(4096)),
            tuning,
            saturated: false,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Add a burst unless the population is at capacity (then the newcomer is dropped).
    /// Returns whether it was kept.
    pub fn push(&mut self, p: Particle) -> bool {
        if self.particles.len() >= self.tuning.max_particles {
            self.saturated = true;
            return false;
        }
        self.particles.push(p);
        true
    }

    /// True once after the cap rejected at least one spawn.
    pub fn take_saturated(&mut self) -> bool {
        std::mem::take(&mut self.saturated)
    }

    /// One tick: rise, sway with the clock, lose life; then drop everything with life <= 0.
    /// Visual: bursts float up in a gentle wave and fade out.
    pub fn update(&mut self, clock: f32) {
        let t = self.tuning;
        for p in &mut self.particles {
            p.y += p.vy;
            p.x += (clock + p.drift).sin() * (t.drift_base + p.energy * t.drift_per_energy);
            p.life -= t.decay.rate(p.energy);
        }
        // Keeps collection order, so rendering stays deterministic.
        self.particles.retain(|p| p.life > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn event(magnitude: u32) -> MotionEvent {
        MotionEvent { x: 26, y: 26, magnitude }
    }

    #[test]
    fn energy_clamps_at_both_ends() {
        let t = Tuning::default().spawn;
        assert_eq!(energy_for(0, &t), 0.0);
        assert_eq!(energy_for(35, &t), 0.0);
        assert!(energy_for(36, &t) > 0.0);
        assert_eq!(energy_for(155, &t), 1.0);
        assert_eq!(energy_for(765, &t), 1.0);
    }

    #[test]
    fn seeded_spawn_from_magnitude_100() {
        let t = Tuning::default().spawn;
        let mut rng = StdRng::seed_from_u64(7);
        let p = spawn(event(100), &t, &mut rng);

        assert!((p.energy - 65.0 / 120.0).abs() < 1e-6);
        assert!((p.x - 26.0).abs() <= 7.0 && (p.y - 26.0).abs() <= 7.0);
        assert!(NEON_PALETTE.contains(&p.color));
        assert_eq!(p.accent, None);
        assert_eq!(p.life, 1.0);
        assert!((p.vy - (-0.3 - p.energy * 0.9)).abs() < 1e-6);
        assert!((0.0..TAU).contains(&p.drift));

        // Same seed, same burst
        let again = spawn(event(100), &t, &mut StdRng::seed_from_u64(7));
        assert_eq!(p, again);
    }

    #[test]
    fn accent_never_at_or_below_threshold_energy() {
        let t = Tuning::default().spawn;
        let mut rng = StdRng::seed_from_u64(1);
        // energy(119) = 0.7 exactly
        for m in [39, 80, 100, 119] {
            for _ in 0..500 {
                let p = spawn(event(m), &t, &mut rng);
                assert!(p.energy <= 0.7);
                assert!(p.accent.is_none());
            }
        }
    }

    #[test]
    fn accent_appears_roughly_a_quarter_of_the_time_at_full_energy() {
        let t = Tuning::default().spawn;
        let mut rng = StdRng::seed_from_u64(42);
        let n = 4000;
        let hits = (0..n).filter(|_| spawn(event(400), &t, &mut rng).accent == Some(ACCENT)).count();
        let share = hits as f32 / n as f32;
        assert!((0.2..0.3).contains(&share), "accent share {share}");
    }

    #[test]
    fn no_jitter_spawns_on_the_grid_point() {
        let mut t = Tuning::default().spawn;
        t.jitter = 0.0;
        let p = spawn(event(200), &t, &mut StdRng::seed_from_u64(3));
        assert_eq!((p.x, p.y), (26.0, 26.0));
    }

    #[test]
    fn life_strictly_decreases_until_removed() {
        let tuning = Tuning::default();
        let mut sys = ParticleSystem::new(tuning.sim);
        let mut rng = StdRng::seed_from_u64(9);
        sys.push(spawn(event(60), &tuning.spawn, &mut rng));
        sys.push(spawn(event(400), &tuning.spawn, &mut rng));

        // drift phase is fixed at spawn, so it identifies a particle across ticks
        let lives = |sys: &ParticleSystem| -> Vec<(f32, f32)> {
            sys.particles().iter().map(|p| (p.drift, p.life)).collect()
        };
        let mut last = lives(&sys);
        let mut clock = 0.0;
        for _ in 0..200 {
            clock += tuning.sim.clock_step;
            sys.update(clock);
            assert!(sys.particles().iter().all(|p| p.life > 0.0));
            let now = lives(&sys);
            for (drift, life) in &now {
                let before = last.iter().find(|(d, _)| d == drift).map(|(_, l)| *l);
                assert!(matches!(before, Some(l) if *life < l));
            }
            last = now;
        }
        assert!(sys.is_empty());
    }

    #[test]
    fn energetic_bursts_rise_faster_and_die_sooner() {
        let tuning = Tuning::default();
        let mut rng = StdRng::seed_from_u64(11);
        let calm = spawn(event(40), &tuning.spawn, &mut rng);
        let wild = spawn(event(300), &tuning.spawn, &mut rng);
        assert!(wild.vy < calm.vy);
        assert!(wild.radius > calm.radius);

        let lifetime = |p: Particle| {
            let mut sys = ParticleSystem::new(tuning.sim);
            sys.push(p);
            let mut ticks = 0;
            while !sys.is_empty() {
                sys.update(0.0);
                ticks += 1;
            }
            ticks
        };
        assert!(lifetime(wild) < lifetime(calm));
    }

    #[test]
    fn flat_decay_lasts_fifty_ticks() {
        let tuning = Tuning::flat_decay();
        let mut sys = ParticleSystem::new(tuning.sim);
        sys.push(spawn(event(300), &tuning.spawn, &mut StdRng::seed_from_u64(5)));
        let mut ticks = 0;
        while !sys.is_empty() {
            sys.update(0.0);
            ticks += 1;
        }
        assert!((49..=51).contains(&ticks), "ticks {ticks}");
    }

    #[test]
    fn capacity_skips_new_spawns() {
        let mut tuning = Tuning::default();
        tuning.sim.max_particles = 3;
        let mut sys = ParticleSystem::new(tuning.sim);
        let mut rng = StdRng::seed_from_u64(2);
        let kept = (0..5).filter(|_| sys.push(spawn(event(100), &tuning.spawn, &mut rng))).count();
        assert_eq!(kept, 3);
        assert_eq!(sys.len(), 3);
        assert!(sys.take_saturated());
        assert!(!sys.take_saturated());
    }

    #[test]
    fn sway_follows_the_clock() {
        let tuning = Tuning::default();
        let mut sys = ParticleSystem::new(tuning.sim);
        let mut p = spawn(event(35), &tuning.spawn, &mut StdRng::seed_from_u64(8));
        p.drift = 0.0;
        p.x = 50.0;
        sys.push(p);
        sys.update(std::f32::consts::FRAC_PI_2); // sin = 1, energy 0 → +0.5 px
        assert!((sys.particles()[0].x - 50.5).abs() < 1e-5);
    }
}
