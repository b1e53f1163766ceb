//! Population bookkeeping for one turn.
//!
//! Fish live in an arena indexed by [`FishId`]. Each fish is in exactly one
//! of three sets: active, successful or dead. It leaves the active set once
//! and never comes back, so `active + successful + dead` always equals the
//! number of fish spawned this turn.

use std::collections::BTreeSet;
use std::sync::Arc;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::fish::{Fish, FishId};
use super::genome::{Genome, Sex};
use super::params::FishParams;

/// Why a fish died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Removed by a fishing tower.
    Caught,
    /// Ran out of energy.
    Exhausted,
    /// Still swimming when the run was aborted.
    Aborted,
    /// Left the navigation grid.
    Lost,
}

/// Where a fish stands in the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FishStatus {
    /// Still swimming.
    Active,
    /// Reached the spawning grounds.
    Successful,
    /// Removed for the given reason.
    Dead(DeathCause),
}

/// Set sizes at one moment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    /// Fish still swimming.
    pub active: usize,
    /// Fish at the spawning grounds.
    pub successful: usize,
    /// Fish that died.
    pub dead: usize,
}

impl PopulationCounts {
    /// Sum over all three sets.
    pub fn total(&self) -> usize {
        self.active + self.successful + self.dead
    }
}

/// All fish spawned in the current turn.
#[derive(Debug, Clone, Default)]
pub struct School {
    fish: Vec<Fish>,
    status: Vec<FishStatus>,
    active: BTreeSet<FishId>,
    successful: Vec<FishId>,
    dead: Vec<(FishId, DeathCause)>,
}

impl School {
    /// Creates an empty school.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fish to the active set.
    pub fn spawn(&mut self, genome: Genome, pos: Array1<f32>, params: &FishParams) -> FishId {
        let id = FishId(self.fish.len());
        self.fish.push(Fish::new(id, Arc::new(genome), pos, params));
        self.status.push(FishStatus::Active);
        self.active.insert(id);
        id
    }

    /// Fish by handle.
    pub fn fish(&self, id: FishId) -> Option<&Fish> {
        self.fish.get(id.0)
    }

    /// Mutable fish by handle.
    pub fn fish_mut(&mut self, id: FishId) -> Option<&mut Fish> {
        self.fish.get_mut(id.0)
    }

    /// Every fish spawned this turn, in spawn order.
    pub fn all(&self) -> &[Fish] {
        &self.fish
    }

    /// Status of a fish.
    pub fn status(&self, id: FishId) -> Option<FishStatus> {
        self.status.get(id.0).copied()
    }

    /// Returns true if the fish is still swimming.
    pub fn is_active(&self, id: FishId) -> bool {
        self.active.contains(&id)
    }

    /// Handles of the active fish, in spawn order.
    pub fn active_ids(&self) -> Vec<FishId> {
        self.active.iter().copied().collect()
    }

    /// Active fish, in spawn order.
    pub fn active(&self) -> impl Iterator<Item = &Fish> + '_ {
        self.active.iter().filter_map(|id| self.fish.get(id.0))
    }

    /// Moves an active fish to the successful set.
    ///
    /// # Returns
    ///
    /// `false` if the fish was not active; nothing changes then.
    pub fn mark_successful(&mut self, id: FishId) -> bool {
        if !self.active.remove(&id) {
            return false;
        }
        self.status[id.0] = FishStatus::Successful;
        self.successful.push(id);
        true
    }

    /// Moves an active fish to the dead set.
    ///
    /// # Returns
    ///
    /// `false` if the fish was not active; nothing changes then.
    pub fn mark_dead(&mut self, id: FishId, cause: DeathCause) -> bool {
        if !self.active.remove(&id) {
            return false;
        }
        self.status[id.0] = FishStatus::Dead(cause);
        self.dead.push((id, cause));
        true
    }

    /// Resolves every active fish as dead.
    ///
    /// # Returns
    ///
    /// Number of fish that were resolved.
    pub fn kill_all_active(&mut self, cause: DeathCause) -> usize {
        let ids = self.active_ids();
        ids.into_iter().filter(|&id| self.mark_dead(id, cause)).count()
    }

    /// Number of fish spawned this turn.
    pub fn total_spawned(&self) -> usize {
        self.fish.len()
    }

    /// Current set sizes.
    pub fn counts(&self) -> PopulationCounts {
        PopulationCounts {
            active: self.active.len(),
            successful: self.successful.len(),
            dead: self.dead.len(),
        }
    }

    /// Successful fish of one sex.
    pub fn successful_of_sex(&self, sex: Sex) -> usize {
        self.successful
            .iter()
            .filter_map(|id| self.fish.get(id.0))
            .filter(|fish| fish.sex() == sex)
            .count()
    }

    /// Number of deaths with the given cause.
    pub fn deaths_by(&self, cause: DeathCause) -> usize {
        self.dead.iter().filter(|(_, c)| *c == cause).count()
    }

    /// Checks that the three sets are disjoint and cover every spawned fish.
    pub fn is_consistent(&self) -> bool {
        if self.counts().total() != self.total_spawned() {
            return false;
        }
        let mut seen = vec![false; self.fish.len()];
        let ids = self
            .active
            .iter()
            .copied()
            .chain(self.successful.iter().copied())
            .chain(self.dead.iter().map(|(id, _)| *id));
        for id in ids {
            match seen.get_mut(id.0) {
                Some(flag) if !*flag => *flag = true,
                _ => return false,
            }
        }
        true
    }

    /// Genomes of the active fish.
    pub fn active_genomes(&self) -> Vec<Genome> {
        self.active().map(|fish| *fish.genome()).collect()
    }

    /// Genomes of the successful fish, in arrival order.
    pub fn successful_genomes(&self) -> Vec<Genome> {
        self.genomes_of(self.successful.iter().copied())
    }

    /// Genomes of the dead fish, in order of death.
    pub fn dead_genomes(&self) -> Vec<Genome> {
        self.genomes_of(self.dead.iter().map(|(id, _)| *id))
    }

    fn genomes_of(&self, ids: impl Iterator<Item = FishId>) -> Vec<Genome> {
        ids.filter_map(|id| self.fish.get(id.0))
            .map(|fish| *fish.genome())
            .collect()
    }

    /// Drops every fish from the previous turn.
    pub fn clear(&mut self) {
        self.fish.clear();
        self.status.clear();
        self.active.clear();
        self.successful.clear();
        self.dead.clear();
    }
}
