//! Fishing towers.

use ndarray::Array1;
use rand::Rng;
use tracing::debug;

use super::super::fish::{Fish, FishId};
use super::super::geometric_utils::distance;
use super::super::params::FishingTowerParams;
use super::super::placement::SiteId;
use super::tower::{CatchAttempt, TowerCycle, TowerTick};
use super::{Gate, GateOutcome, PhenotypeRates, roll};

/// A temporary penalty on a tower's catch rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slowdown {
    /// Multipliers applied per size class.
    pub factors: PhenotypeRates,
    /// Seconds left before the penalty expires.
    pub remaining: f32,
}

/// A tower that periodically tries to catch one fish in range.
#[derive(Debug, Clone)]
pub struct FishingTower {
    /// Pad the tower stands on.
    pub site: SiteId,
    /// World position of the tower.
    pub pos: Array1<f32>,
    /// Targeting radius.
    pub effect_radius: f32,
    catch_rates: PhenotypeRates,
    slowdown: Option<Slowdown>,
    active: bool,
    being_regulated: bool,
    cycle: TowerCycle<FishId>,
    /// Fish removed by this tower.
    pub catches: usize,
}

impl FishingTower {
    /// Creates an inactive tower.
    pub fn new(site: SiteId, pos: Array1<f32>, params: &FishingTowerParams) -> Self {
        Self {
            site,
            pos,
            effect_radius: params.effect_radius,
            catch_rates: params.catch_rates,
            slowdown: None,
            active: false,
            being_regulated: false,
            cycle: TowerCycle::new(params.time_per_apply_effect, params.num_flashes_per_catch),
            catches: 0,
        }
    }

    /// Starts the firing loop.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Stops the tower and drops its timers.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.cancel_pending();
    }

    /// Catch rates after any active slowdown.
    pub fn effective_rates(&self) -> PhenotypeRates {
        match self.slowdown {
            Some(slowdown) => self.catch_rates.scaled_by(&slowdown.factors),
            None => self.catch_rates,
        }
    }

    /// Applies a slowdown, replacing any previous one.
    pub fn apply_slowdown(&mut self, factors: PhenotypeRates, duration: f32) {
        self.slowdown = Some(Slowdown {
            factors,
            remaining: duration,
        });
    }

    /// The active slowdown, if any.
    pub fn slowdown(&self) -> Option<&Slowdown> {
        self.slowdown.as_ref()
    }

    /// Returns true while a regulation attempt resolves against this tower.
    pub fn is_being_regulated(&self) -> bool {
        self.being_regulated
    }

    /// Sets the regulation flag.
    pub fn set_being_regulated(&mut self, regulated: bool) {
        self.being_regulated = regulated;
    }

    /// The catch attempt in flight, if any.
    pub fn attempt(&self) -> Option<&CatchAttempt<FishId>> {
        self.cycle.attempt()
    }

    /// Fish the attempt in flight is aimed at.
    pub fn pending_target(&self) -> Option<FishId> {
        self.cycle.attempt().map(|attempt| attempt.target)
    }

    /// Returns true if a position is inside the targeting radius.
    pub fn in_range(&self, pos: &Array1<f32>) -> bool {
        distance(&self.pos, pos) <= self.effect_radius
    }

    /// Advances the slowdown and the firing cycle by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TowerTick<FishId> {
        if let Some(slowdown) = self.slowdown.as_mut() {
            slowdown.remaining -= dt;
            if slowdown.remaining <= 0.0 {
                self.slowdown = None;
            }
        }
        self.cycle.tick(dt, self.active)
    }

    /// Records a completed hit.
    pub fn record_catch(&mut self) {
        self.catches += 1;
    }

    /// Drops the attempt in flight, the slowdown and the regulation flag.
    pub fn cancel_pending(&mut self) {
        self.cycle.cancel();
        self.slowdown = None;
        self.being_regulated = false;
    }
}

impl Gate for FishingTower {
    /// Rolls against a targeted fish and starts the matching attempt.
    ///
    /// A hit flags the fish as being caught and reports `Fail`; the fish is
    /// only removed once the attempt completes. A miss reports `Pass`.
    fn try_gate<R: Rng>(&mut self, fish: &mut Fish, rng: &mut R) -> GateOutcome {
        if !self.active || self.cycle.is_busy() || fish.is_being_caught() {
            return GateOutcome::NoOp;
        }

        let rate = self.effective_rates().rate_for(fish.size());
        let hit = roll(rate, rng);
        self.cycle.begin(fish.id, hit);
        debug!(fish = fish.id.0, rate, hit, "fishing tower fired");
        if hit {
            fish.start_catch();
            GateOutcome::Fail
        } else {
            GateOutcome::Pass
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
