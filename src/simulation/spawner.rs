//! Wave spawning of a turn's pending genomes.

use std::collections::VecDeque;

use super::genome::Genome;

/// Releases genomes in fixed-size waves on a fixed interval.
///
/// The first wave is released on the first tick; later waves follow every
/// `interval` seconds until the queue is empty.
#[derive(Debug, Clone)]
pub struct WaveSpawner {
    pending: VecDeque<Genome>,
    fish_per_wave: usize,
    interval: f32,
    countdown: f32,
    waves_released: usize,
}

impl WaveSpawner {
    /// Creates a spawner for a generation.
    ///
    /// # Arguments
    ///
    /// * `genomes` - Genomes to release, in order
    /// * `fish_per_wave` - Wave size; values below one are treated as one
    /// * `interval` - Seconds between waves
    pub fn new(genomes: Vec<Genome>, fish_per_wave: usize, interval: f32) -> Self {
        Self {
            pending: genomes.into(),
            fish_per_wave: fish_per_wave.max(1),
            interval: interval.max(0.0),
            countdown: 0.0,
            waves_released: 0,
        }
    }

    /// Advances the wave timer.
    ///
    /// # Returns
    ///
    /// Genomes released during this step, possibly empty.
    pub fn tick(&mut self, dt: f32) -> Vec<Genome> {
        let mut released = Vec::new();
        self.countdown -= dt;
        while self.countdown <= 0.0 && !self.pending.is_empty() {
            let count = self.fish_per_wave.min(self.pending.len());
            released.extend(self.pending.drain(..count));
            self.waves_released += 1;
            self.countdown += self.interval;
        }
        released
    }

    /// Returns true once every genome has been released.
    pub fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    /// Genomes still waiting.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Waves released so far.
    pub fn waves_released(&self) -> usize {
        self.waves_released
    }
}
