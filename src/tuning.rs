// The control panel for the simulation core.
// If you want the bursts to behave differently, change the numbers here;
// nothing else in the core hides a magic constant.

/// How fast a particle's life drains each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decay {
    /// `base + energy * per_energy`: energetic bursts burn out faster.
    EnergyScaled { base: f32, per_energy: f32 },
    /// Same drain for every particle.
    Flat(f32),
}

impl Decay {
    #[inline]
    pub fn rate(self, energy: f32) -> f32 {
        match self {
            Decay::EnergyScaled { base, per_energy } => base + energy * per_energy,
            Decay::Flat(rate) => rate,
        }
    }
}

/// Sparse-grid motion sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionTuning {
    /// Grid spacing in pixels, both axes.
    pub step: usize,
    /// A sampled point fires when |dR|+|dG|+|dB| is strictly above this.
    pub threshold: u32,
}

/// Motion event → particle parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnTuning {
    /// energy = clamp((magnitude - energy_floor) / energy_span, 0, 1)
    pub energy_floor: f32,
    pub energy_span: f32,
    /// Uniform position jitter in [-jitter, +jitter] on each axis. 0 disables it.
    pub jitter: f32,
    pub radius_base: f32,
    pub radius_per_energy: f32,
    /// vy = -(rise_base + energy * rise_per_energy)
    pub rise_base: f32,
    pub rise_per_energy: f32,
    /// Accent halo only above this energy...
    pub accent_energy: f32,
    /// ...and then only with this probability.
    pub accent_chance: f64,
}

/// Per-tick integration and population bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimTuning {
    /// Simulation clock increment per tick.
    pub clock_step: f32,
    /// Sway amplitude = drift_base + energy * drift_per_energy (px per tick).
    pub drift_base: f32,
    pub drift_per_energy: f32,
    pub decay: Decay,
    /// New spawns are skipped while this many particles are alive.
    pub max_particles: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    pub motion: MotionTuning,
    pub spawn: SpawnTuning,
    pub sim: SimTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            motion: MotionTuning { step: 26, threshold: 38 },
            spawn: SpawnTuning {
                energy_floor: 35.0,
                energy_span: 120.0,
                jitter: 7.0,
                radius_base: 1.4,
                radius_per_energy: 6.0,
                rise_base: 0.3,
                rise_per_energy: 0.9,
                accent_energy: 0.7,
                accent_chance: 0.25,
            },
            sim: SimTuning {
                clock_step: 0.01,
                drift_base: 0.5,
                drift_per_energy: 1.2,
                decay: Decay::EnergyScaled { base: 0.015, per_energy: 0.02 },
                max_particles: 1500,
            },
        }
    }
}

impl Tuning {
    /// The simplified variant: every particle fades at 0.02 per tick.
    pub fn flat_decay() -> Self {
        let mut t = Self::default();
        t.sim.decay = Decay::Flat(0.02);
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_scaled_decay_grows_with_energy() {
        let d = Tuning::default().sim.decay;
        assert!((d.rate(0.0) - 0.015).abs() < 1e-6);
        assert!((d.rate(1.0) - 0.035).abs() < 1e-6);
    }

    #[test]
    fn flat_decay_ignores_energy() {
        let d = Tuning::flat_decay().sim.decay;
        assert_eq!(d.rate(0.0), d.rate(1.0));
        assert!((d.rate(0.3) - 0.02).abs() < 1e-6);
    }

    #[test]
    fn every_decay_rate_is_positive() {
        for t in [Tuning::default(), Tuning::flat_decay()] {
            for e in [0.0, 0.5, 1.0] {
                assert!(t.sim.decay.rate(e) > 0.0);
            }
        }
    }
}
