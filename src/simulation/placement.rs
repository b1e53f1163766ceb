//! Designated placement sites and the validity rules for building on them.
//!
//! Validity is a pure query so viewers can poll it every frame while the
//! player drags a device around; building is a separate step that only
//! mutates after the same check succeeds.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};
use super::gating::{DeviceId, DeviceKind};
use super::geometric_utils::Region;
use super::params::{DamSiteParams, Params};

/// Stable handle to a placement site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId(pub usize);

/// What can be built on a site.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteKind {
    /// A river crossing that takes a dam and later a ladder.
    DamSite(DamSiteParams),
    /// A bank pad that takes one tower.
    TowerPad,
}

/// A single placement site.
#[derive(Debug, Clone)]
pub struct PlacementSite {
    /// Handle of the site.
    pub id: SiteId,
    /// What the site accepts.
    pub kind: SiteKind,
    /// Area that selects the site.
    pub area: Region,
    occupant: Option<DeviceId>,
    has_ladder: bool,
}

impl PlacementSite {
    /// Device built on the site, if any.
    pub fn occupant(&self) -> Option<DeviceId> {
        self.occupant
    }

    /// Returns true if something is built here.
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Returns true if the site's dam carries a ladder.
    pub fn has_ladder(&self) -> bool {
        self.has_ladder
    }

    fn is_dam_site(&self) -> bool {
        matches!(self.kind, SiteKind::DamSite(_))
    }
}

/// All placement sites of a level.
#[derive(Debug, Clone, Default)]
pub struct PlacementMap {
    sites: Vec<PlacementSite>,
}

impl PlacementMap {
    /// Builds the map from the configured dam sites and tower pads.
    pub fn from_params(params: &Params) -> Self {
        let dam_sites = params
            .dam_sites
            .iter()
            .map(|site| (SiteKind::DamSite(site.clone()), site.area));
        let pads = params
            .tower_pads
            .iter()
            .map(|area| (SiteKind::TowerPad, *area));

        let sites = dam_sites
            .chain(pads)
            .enumerate()
            .map(|(index, (kind, area))| PlacementSite {
                id: SiteId(index),
                kind,
                area,
                occupant: None,
                has_ladder: false,
            })
            .collect();
        Self { sites }
    }

    /// All sites.
    pub fn sites(&self) -> &[PlacementSite] {
        &self.sites
    }

    /// Site by handle.
    pub fn site(&self, id: SiteId) -> Option<&PlacementSite> {
        self.sites.get(id.0)
    }

    /// The site under a world position, if any.
    pub fn site_at(&self, point: &Array1<f32>) -> Option<&PlacementSite> {
        self.sites.iter().find(|site| site.area.contains(point))
    }

    /// Returns true if `kind` could be built at `point` right now.
    pub fn placement_valid(&self, kind: DeviceKind, point: &Array1<f32>) -> bool {
        self.target_site(kind, point).is_ok()
    }

    /// Resolves the site a device would be built on.
    ///
    /// # Errors
    ///
    /// `InvalidPlacement` if there is no site under the point, the site takes
    /// a different kind of device, or it is already in use.
    pub fn target_site(&self, kind: DeviceKind, point: &Array1<f32>) -> Result<SiteId> {
        let site = self.site_at(point).ok_or_else(|| {
            SimError::InvalidPlacement(format!(
                "no placement site at ({:.2}, {:.2})",
                point[0], point[1]
            ))
        })?;

        let refusal = match kind {
            DeviceKind::Dam if !site.is_dam_site() => Some("dams need a dam site"),
            DeviceKind::Dam if site.is_occupied() => Some("dam site already has a dam"),
            DeviceKind::DamLadder if !site.is_dam_site() => Some("ladders need a dam site"),
            DeviceKind::DamLadder if !site.is_occupied() => Some("ladders need an existing dam"),
            DeviceKind::DamLadder if site.has_ladder => Some("dam already has a ladder"),
            DeviceKind::FishingTower | DeviceKind::RegulationTower if site.is_dam_site() => {
                Some("towers need a tower pad")
            }
            DeviceKind::FishingTower | DeviceKind::RegulationTower if site.is_occupied() => {
                Some("tower pad already in use")
            }
            _ => None,
        };

        match refusal {
            Some(reason) => Err(SimError::InvalidPlacement(format!(
                "{reason} (site {})",
                site.id.0
            ))),
            None => Ok(site.id),
        }
    }

    /// Records a device on a site.
    pub fn occupy(&mut self, id: SiteId, device: DeviceId) {
        if let Some(site) = self.sites.get_mut(id.0) {
            site.occupant = Some(device);
        }
    }

    /// Records a ladder on a dam site.
    pub fn add_ladder(&mut self, id: SiteId) {
        if let Some(site) = self.sites.get_mut(id.0) {
            site.has_ladder = true;
        }
    }

    /// Frees a site after its device was removed.
    pub fn release(&mut self, id: SiteId) {
        if let Some(site) = self.sites.get_mut(id.0) {
            site.occupant = None;
            site.has_ladder = false;
        }
    }
}
