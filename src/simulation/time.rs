//! Game speed control.

use serde::{Deserialize, Serialize};

use super::params::TimeParams;

/// Selectable simulation speeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameSpeed {
    /// Nothing advances.
    Paused,
    /// Real time.
    Normal,
    /// Scaled by `faster_scale`.
    Faster,
    /// Scaled by `fastest_scale`.
    Fastest,
}

/// Current speed and accumulated simulation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeControl {
    speed: GameSpeed,
    faster_scale: f32,
    fastest_scale: f32,
    elapsed: f32,
}

impl TimeControl {
    /// Creates a control running at normal speed.
    pub fn new(params: &TimeParams) -> Self {
        Self {
            speed: GameSpeed::Normal,
            faster_scale: params.faster_scale,
            fastest_scale: params.fastest_scale,
            elapsed: 0.0,
        }
    }

    /// Current speed.
    pub fn speed(&self) -> GameSpeed {
        self.speed
    }

    /// Changes the speed.
    pub fn set_speed(&mut self, speed: GameSpeed) {
        self.speed = speed;
    }

    /// Returns true while paused.
    pub fn is_paused(&self) -> bool {
        self.speed == GameSpeed::Paused
    }

    /// Multiplier for the current speed.
    pub fn scale(&self) -> f32 {
        match self.speed {
            GameSpeed::Paused => 0.0,
            GameSpeed::Normal => 1.0,
            GameSpeed::Faster => self.faster_scale,
            GameSpeed::Fastest => self.fastest_scale,
        }
    }

    /// Scales a frame delta and adds it to the elapsed time.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let scaled = dt * self.scale();
        self.elapsed += scaled;
        scaled
    }

    /// Simulation seconds elapsed.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Back to normal speed.
    pub fn reset(&mut self) {
        self.speed = GameSpeed::Normal;
    }
}
