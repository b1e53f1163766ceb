//! Probabilistic gating devices.
//!
//! Every device is one variant of [`GatingDevice`] and answers the same
//! [`Gate`] contract. Dams are passive and resolve on contact; fishing and
//! regulation towers are active and fire on a fixed cadence driven by
//! [`tower::TowerLoop`].

pub mod dam;
pub mod fishing;
pub mod regulation;
pub mod tower;

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::fish::Fish;
use super::genome::SizePhenotype;
use super::placement::SiteId;

pub use dam::{Dam, DamLadder};
pub use fishing::FishingTower;
pub use regulation::{RegulationMode, RegulationTower};

/// Probabilities indexed by size phenotype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhenotypeRates {
    /// Rate for small fish.
    pub small: f32,
    /// Rate for medium fish.
    pub medium: f32,
    /// Rate for large fish.
    pub large: f32,
}

impl PhenotypeRates {
    /// Creates a rate table.
    pub fn new(small: f32, medium: f32, large: f32) -> Self {
        Self {
            small,
            medium,
            large,
        }
    }

    /// Same rate for every size class.
    pub fn uniform(rate: f32) -> Self {
        Self::new(rate, rate, rate)
    }

    /// Rate for one size class.
    pub fn rate_for(&self, size: SizePhenotype) -> f32 {
        match size {
            SizePhenotype::Small => self.small,
            SizePhenotype::Medium => self.medium,
            SizePhenotype::Large => self.large,
        }
    }

    /// Element-wise product, clamped to `[0, 1]`.
    pub fn scaled_by(&self, factors: &PhenotypeRates) -> Self {
        Self::new(
            (self.small * factors.small).clamp(0.0, 1.0),
            (self.medium * factors.medium).clamp(0.0, 1.0),
            (self.large * factors.large).clamp(0.0, 1.0),
        )
    }

    /// Returns true if every rate is a valid probability.
    pub fn is_probability(&self) -> bool {
        [self.small, self.medium, self.large]
            .iter()
            .all(|r| (0.0..=1.0).contains(r))
    }
}

/// Result of gating one fish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// The fish got through (crossed the dam, escaped the line).
    Pass,
    /// The fish was rejected (stuck at the dam, hooked by the fisher).
    Fail,
    /// The device did not act on this fish.
    NoOp,
}

/// Draws `u ∈ [0, 1)` and reports success with probability `rate`.
///
/// A rate of `1.0` always succeeds and a rate of `0.0` never does.
pub fn roll<R: Rng>(rate: f32, rng: &mut R) -> bool {
    rng.random::<f32>() < rate
}

/// Common contract for anything that can gate a fish.
pub trait Gate {
    /// Applies the device to a single fish and reports what happened.
    fn try_gate<R: Rng>(&mut self, fish: &mut Fish, rng: &mut R) -> GateOutcome;

    /// Returns true if the device is placed and operating.
    fn is_active(&self) -> bool;
}

/// Stable handle to a placed gating device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(pub usize);

/// Things a player can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    /// A dam on a free dam site.
    Dam,
    /// A ladder on an existing dam.
    DamLadder,
    /// A fishing tower on a free tower pad.
    FishingTower,
    /// A regulation tower on a free tower pad.
    RegulationTower,
}

/// A placed device.
#[derive(Debug, Clone)]
pub enum GatingDevice {
    /// Passive, contact-triggered barrier.
    Dam(Dam),
    /// Active tower that catches fish.
    FishingTower(FishingTower),
    /// Active tower that regulates fishing towers.
    RegulationTower(RegulationTower),
}

impl GatingDevice {
    /// Placement site the device occupies.
    pub fn site(&self) -> SiteId {
        match self {
            Self::Dam(dam) => dam.site,
            Self::FishingTower(tower) => tower.site,
            Self::RegulationTower(tower) => tower.site,
        }
    }

    /// World position of the device.
    pub fn pos(&self) -> Array1<f32> {
        match self {
            Self::Dam(dam) => dam.contact_zone.center(),
            Self::FishingTower(tower) => tower.pos.clone(),
            Self::RegulationTower(tower) => tower.pos.clone(),
        }
    }

    /// Drops every in-flight timer so nothing resolves into the next turn.
    pub fn cancel_pending(&mut self) {
        match self {
            Self::Dam(_) => {}
            Self::FishingTower(tower) => tower.cancel_pending(),
            Self::RegulationTower(tower) => tower.cancel_pending(),
        }
    }
}

impl Gate for GatingDevice {
    fn try_gate<R: Rng>(&mut self, fish: &mut Fish, rng: &mut R) -> GateOutcome {
        match self {
            Self::Dam(dam) => dam.try_gate(fish, rng),
            Self::FishingTower(tower) => tower.try_gate(fish, rng),
            Self::RegulationTower(tower) => tower.try_gate(fish, rng),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            Self::Dam(dam) => dam.is_active(),
            Self::FishingTower(tower) => tower.is_active(),
            Self::RegulationTower(tower) => tower.is_active(),
        }
    }
}
