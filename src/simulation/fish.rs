//! Individual fish: genome, kinematics and energy.
//!
//! Fish follow the navigation field with a random perturbation, spend energy
//! in proportion to the impulse they apply over time, and carry the flags gating devices
//! use to avoid re-rolling against the same fish.

use std::sync::Arc;

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::genome::{Genome, Sex, SizePhenotype};
use super::geometric_utils::{
    angle_difference, clamp_magnitude_mut, magnitude, random_in_unit_circle,
};
use super::params::FishParams;

/// Stable handle to a fish inside its school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FishId(pub usize);

/// A simulated fish.
#[derive(Debug, Clone)]
pub struct Fish {
    /// Handle of this fish in the school arena.
    pub id: FishId,
    /// Shared, read-only genome.
    genome: Arc<Genome>,
    /// Position in world space.
    pub pos: Array1<f32>,
    /// Position before the most recent swim step.
    pub prev_pos: Array1<f32>,
    /// Velocity in world units per second.
    pub velocity: Array1<f32>,
    /// Facing angle in radians.
    pub heading: f32,
    /// Remaining energy.
    pub energy: f32,
    /// Seconds since spawn.
    pub age: f32,
    stuck: bool,
    being_caught: bool,
}

impl Fish {
    /// Creates a fish at rest at the given position.
    pub fn new(id: FishId, genome: Arc<Genome>, pos: Array1<f32>, params: &FishParams) -> Self {
        Self {
            id,
            genome,
            prev_pos: pos.clone(),
            pos,
            velocity: Array1::zeros(2),
            heading: std::f32::consts::FRAC_PI_2,
            energy: params.starting_energy,
            age: 0.0,
            stuck: false,
            being_caught: false,
        }
    }

    /// The fish's genome.
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// A shared handle to the genome.
    pub fn genome_arc(&self) -> Arc<Genome> {
        Arc::clone(&self.genome)
    }

    /// Size phenotype of the genome.
    pub fn size(&self) -> SizePhenotype {
        self.genome.size()
    }

    /// Sex phenotype of the genome.
    pub fn sex(&self) -> Sex {
        self.genome.sex()
    }

    /// Moves the fish one tick along the given field vector.
    ///
    /// # Arguments
    ///
    /// * `field` - Flow vector at the fish's current cell
    /// * `params` - Movement and energy settings
    /// * `cell_size` - World length of a grid cell, used to normalize energy use
    /// * `dt` - Time delta in seconds
    /// * `rng` - Source of the random perturbation
    ///
    /// # Returns
    ///
    /// The movement impulse that was applied.
    pub fn swim<R: Rng>(
        &mut self,
        field: &Array1<f32>,
        params: &FishParams,
        cell_size: f32,
        dt: f32,
        rng: &mut R,
    ) -> Array1<f32> {
        let perturbation =
            random_in_unit_circle(rng) * (magnitude(field) * params.random_movement_multiplier);
        let impulse = field + &perturbation;

        self.velocity += &(&impulse * dt);
        clamp_magnitude_mut(&mut self.velocity, params.max_swim_speed);

        self.prev_pos.assign(&self.pos);
        self.pos += &(&self.velocity * dt);

        // turn toward the impulse without snapping
        let impulse_length = magnitude(&impulse);
        if impulse_length > 0.0 {
            let target = impulse[1].atan2(impulse[0]);
            let blend = (params.rotate_speed * dt).min(1.0);
            self.heading += angle_difference(self.heading, target) * blend;
        }

        self.energy -= impulse_length / cell_size * params.energy_usage_rate * dt;
        self.age += dt;

        impulse
    }

    /// Returns true once the fish has used up its energy.
    pub fn out_of_energy(&self) -> bool {
        self.energy <= 0.0
    }

    /// Returns true if a gating device has permanently rejected this fish.
    pub fn is_stuck(&self) -> bool {
        self.stuck
    }

    /// Flags the fish as permanently rejected.
    pub fn set_stuck(&mut self) {
        self.stuck = true;
    }

    /// Returns true while a catch attempt is resolving against this fish.
    pub fn is_being_caught(&self) -> bool {
        self.being_caught
    }

    /// Marks the fish as targeted by a successful catch roll.
    pub fn start_catch(&mut self) {
        self.being_caught = true;
    }

    /// Releases the fish after a catch attempt was cancelled.
    pub fn cancel_catch(&mut self) {
        self.being_caught = false;
    }

    /// Undoes the last swim step and stops the fish.
    pub fn hold_back(&mut self) {
        self.pos.assign(&self.prev_pos);
        self.velocity.fill(0.0);
    }

    /// Moves the fish to a new position without affecting its velocity.
    pub fn teleport(&mut self, pos: Array1<f32>) {
        self.prev_pos.assign(&pos);
        self.pos = pos;
    }
}
