//! Regulation towers, which act on fishing towers rather than fish.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::fish::Fish;
use super::super::geometric_utils::distance;
use super::super::params::RegulationTowerParams;
use super::super::placement::SiteId;
use super::fishing::FishingTower;
use super::tower::{CatchAttempt, TowerCycle, TowerTick};
use super::{DeviceId, Gate, GateOutcome, PhenotypeRates, roll};

/// What a successful regulation does to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegulationMode {
    /// Disable and remove the fishing tower.
    Kill,
    /// Temporarily scale down its catch rates.
    Slowdown,
}

/// Result of a completed regulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegulationEffect {
    /// The target was disabled and should be removed.
    Disabled,
    /// The target's catch rates were reduced.
    Slowed,
}

/// A tower that periodically shuts down fishing towers in range.
#[derive(Debug, Clone)]
pub struct RegulationTower {
    /// Pad the tower stands on.
    pub site: SiteId,
    /// World position of the tower.
    pub pos: Array1<f32>,
    /// Targeting radius.
    pub effect_radius: f32,
    success_rate: f32,
    mode: RegulationMode,
    slowdown_factors: PhenotypeRates,
    slowdown_duration: f32,
    active: bool,
    cycle: TowerCycle<DeviceId>,
    /// Fishing towers affected by this tower.
    pub regulations: usize,
}

impl RegulationTower {
    /// Creates an inactive tower.
    pub fn new(site: SiteId, pos: Array1<f32>, params: &RegulationTowerParams) -> Self {
        Self {
            site,
            pos,
            effect_radius: params.effect_radius,
            success_rate: params.success_rate,
            mode: params.mode,
            slowdown_factors: params.slowdown_factors,
            slowdown_duration: params.slowdown_duration,
            active: false,
            cycle: TowerCycle::new(params.time_per_apply_effect, params.num_flashes_per_catch),
            regulations: 0,
        }
    }

    /// Starts the firing loop.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// What a hit does.
    pub fn mode(&self) -> RegulationMode {
        self.mode
    }

    /// The attempt in flight, if any.
    pub fn attempt(&self) -> Option<&CatchAttempt<DeviceId>> {
        self.cycle.attempt()
    }

    /// Returns true if a fishing tower is a valid target for this tower.
    pub fn can_target(&self, target: &FishingTower) -> bool {
        target.is_active()
            && !target.is_being_regulated()
            && distance(&self.pos, &target.pos) <= self.effect_radius
    }

    /// Advances the firing cycle by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TowerTick<DeviceId> {
        self.cycle.tick(dt, self.active)
    }

    /// Rolls against a fishing tower and starts the matching attempt.
    ///
    /// # Arguments
    ///
    /// * `target_id` - Handle of the targeted tower
    /// * `target` - The targeted tower
    /// * `rng` - Random number generator
    ///
    /// # Returns
    ///
    /// `true` on a hit. The target is flagged as being regulated until the
    /// attempt completes.
    pub fn try_regulate<R: Rng>(
        &mut self,
        target_id: DeviceId,
        target: &mut FishingTower,
        rng: &mut R,
    ) -> bool {
        if !self.active || self.cycle.is_busy() || !self.can_target(target) {
            return false;
        }

        let hit = roll(self.success_rate, rng);
        self.cycle.begin(target_id, hit);
        if hit {
            target.set_being_regulated(true);
        }
        debug!(target = target_id.0, hit, "regulation tower fired");
        hit
    }

    /// Applies a completed hit to its target.
    pub fn apply_effect(&mut self, target: &mut FishingTower) -> RegulationEffect {
        self.regulations += 1;
        match self.mode {
            RegulationMode::Kill => {
                target.deactivate();
                RegulationEffect::Disabled
            }
            RegulationMode::Slowdown => {
                target.apply_slowdown(self.slowdown_factors, self.slowdown_duration);
                target.set_being_regulated(false);
                RegulationEffect::Slowed
            }
        }
    }

    /// Drops the attempt in flight.
    pub fn cancel_pending(&mut self) {
        self.cycle.cancel();
    }
}

impl Gate for RegulationTower {
    /// Regulation towers never act on fish.
    fn try_gate<R: Rng>(&mut self, _fish: &mut Fish, _rng: &mut R) -> GateOutcome {
        GateOutcome::NoOp
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
