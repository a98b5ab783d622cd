// Command-line options. Everything here only picks among fixed tunables or host resources.
use std::path::PathBuf;

use clap::Parser;

use crate::tuning::Tuning;

#[derive(Parser, Debug)]
#[command(name = "neon-stage", version, about = "Webcam concert-lighting overlay with motion-driven light bursts")]
pub struct Args {
    /// Camera index (0 = default webcam)
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Requested capture width (the camera may pick another)
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Requested capture height
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Requested capture frame rate
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Soundtrack to loop while the effect runs
    #[arg(long, value_name = "FILE")]
    pub audio: Option<PathBuf>,

    /// Soundtrack volume, 0.0..=1.0
    #[arg(long, default_value_t = 0.75)]
    pub volume: f32,

    /// Seed for the burst RNG (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Most bursts alive at once; new ones are skipped beyond this
    #[arg(long, default_value_t = 1500)]
    pub max_particles: usize,

    /// Fade every burst at the same rate instead of faster for stronger motion
    #[arg(long)]
    pub flat_decay: bool,

    /// Spawn bursts exactly on the motion grid point
    #[arg(long)]
    pub no_jitter: bool,

    /// Start with the HUD visible (toggle with H)
    #[arg(long)]
    pub hud: bool,
}

impl Args {
    pub fn tuning(&self) -> Tuning {
        let mut t = if self.flat_decay { Tuning::flat_decay() } else { Tuning::default() };
        t.sim.max_particles = self.max_particles;
        if self.no_jitter {
            t.spawn.jitter = 0.0;
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Decay;

    #[test]
    fn defaults_give_canonical_tuning() {
        let args = Args::try_parse_from(["neon-stage"]).unwrap();
        assert_eq!(args.tuning(), Tuning::default());
        assert_eq!((args.width, args.height, args.camera), (640, 480, 0));
        assert!(args.audio.is_none());
        assert!((args.volume - 0.75).abs() < 1e-6);
    }

    #[test]
    fn flags_map_onto_tuning() {
        let args = Args::try_parse_from([
            "neon-stage", "--flat-decay", "--no-jitter", "--max-particles", "200", "--seed", "7",
            "--audio", "song.mp3",
        ])
        .unwrap();
        let t = args.tuning();
        assert_eq!(t.sim.decay, Decay::Flat(0.02));
        assert_eq!(t.spawn.jitter, 0.0);
        assert_eq!(t.sim.max_particles, 200);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.audio.as_deref(), Some(std::path::Path::new("song.mp3")));
    }
}
