//! Dams and dam ladders.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::fish::Fish;
use super::super::geometric_utils::Region;
use super::super::params::{DamParams, DamSiteParams};
use super::super::placement::SiteId;
use super::{Gate, GateOutcome, PhenotypeRates, roll};

/// A ladder attached to a dam. Its rates replace the dam's own table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamLadder {
    /// Crossing rates while the ladder is attached.
    pub rates: PhenotypeRates,
}

/// A passive barrier that fish cross with a size-dependent probability.
///
/// A fish that fails its roll is flagged stuck and is never rolled again;
/// the dam keeps holding it back until it runs out of energy or the run is
/// aborted.
#[derive(Debug, Clone)]
pub struct Dam {
    /// Site the dam was built on.
    pub site: SiteId,
    /// Zone in which fish touch the dam.
    pub contact_zone: Region,
    /// Zone where fish that cross are released.
    pub drop_off: Region,
    crossing_rates: PhenotypeRates,
    ladder: Option<DamLadder>,
    active: bool,
    /// Fish that crossed this dam.
    pub crossings: usize,
    /// Fish that were stuck by this dam.
    pub rejections: usize,
}

impl Dam {
    /// Creates an inactive dam for a site.
    pub fn new(site: SiteId, site_params: &DamSiteParams, params: &DamParams) -> Self {
        Self {
            site,
            contact_zone: site_params.contact_zone,
            drop_off: site_params.drop_off,
            crossing_rates: PhenotypeRates::uniform(params.default_crossing_rate),
            ladder: None,
            active: false,
            crossings: 0,
            rejections: 0,
        }
    }

    /// Replaces the dam's own rate table.
    pub fn with_rates(mut self, rates: PhenotypeRates) -> Self {
        self.crossing_rates = rates;
        self
    }

    /// Starts gating fish.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Attaches a ladder, overriding the crossing rates.
    pub fn attach_ladder(&mut self, ladder: DamLadder) {
        self.ladder = Some(ladder);
    }

    /// Returns true if a ladder is attached.
    pub fn has_ladder(&self) -> bool {
        self.ladder.is_some()
    }

    /// Rates currently used for crossing rolls.
    pub fn effective_rates(&self) -> PhenotypeRates {
        self.ladder.map_or(self.crossing_rates, |ladder| ladder.rates)
    }

    /// Returns true if the fish is touching the dam.
    pub fn in_contact(&self, fish: &Fish) -> bool {
        self.contact_zone.contains(&fish.pos)
    }
}

impl Gate for Dam {
    fn try_gate<R: Rng>(&mut self, fish: &mut Fish, rng: &mut R) -> GateOutcome {
        if !self.active || fish.is_stuck() {
            return GateOutcome::NoOp;
        }

        let rate = self.effective_rates().rate_for(fish.size());
        if roll(rate, rng) {
            fish.teleport(self.drop_off.random_point(rng));
            self.crossings += 1;
            debug!(fish = fish.id.0, rate, "fish crossed dam");
            GateOutcome::Pass
        } else {
            fish.set_stuck();
            self.rejections += 1;
            debug!(fish = fish.id.0, rate, "fish stuck at dam");
            GateOutcome::Fail
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
