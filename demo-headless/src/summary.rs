//! Text summary of particle positions, used in place of a graphical renderer

use pipe_flow_core::{Particle, ParticleRenderer};

/// Bins particles by axial position and remembers the latest frame
pub struct AxialHistogram {
    pipe_length: f64,
    bins: Vec<usize>,
    frames: u64,
    mean_age: f64,
}

impl AxialHistogram {
    /// Histogram with `bin_count` equal slices of `[0, pipe_length]`
    pub fn new(pipe_length: f64, bin_count: usize) -> Self {
        Self {
            pipe_length,
            bins: vec![0; bin_count.max(1)],
            frames: 0,
            mean_age: 0.0,
        }
    }

    /// Counts from the last rendered frame
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Mean particle age in the last frame
    pub fn mean_age(&self) -> f64 {
        self.mean_age
    }

    /// One-line bar made of block characters scaled to the fullest bin
    pub fn sparkline(&self) -> String {
        const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
        let max = self.bins.iter().copied().max().unwrap_or(0).max(1);
        self.bins
            .iter()
            .map(|&count| LEVELS[(count * (LEVELS.len() - 1)) / max])
            .collect()
    }
}

impl ParticleRenderer for AxialHistogram {
    fn render(&mut self, particles: &[Particle]) {
        let n = self.bins.len();
        self.bins.iter_mut().for_each(|b| *b = 0);

        let mut age_sum = 0.0;
        for p in particles {
            // Particles outside [0, L] are pending respawn; clamp them to the end bins
            let fraction = (p.position.z / self.pipe_length).clamp(0.0, 1.0);
            let idx = ((fraction * n as f64) as usize).min(n - 1);
            self.bins[idx] += 1;
            age_sum += p.age;
        }

        self.mean_age = if particles.is_empty() {
            0.0
        } else {
            age_sum / particles.len() as f64
        };
        self.frames += 1;
    }
}
