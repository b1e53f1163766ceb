//! Spatial indexing for tower target queries.
//!
//! Built once per tick from the active fish and the active fishing towers.

use kdtree::KdTree;
use kdtree::distance::squared_euclidean;
use ndarray::Array1;

use super::error::Result;
use super::fish::FishId;
use super::gating::{DeviceId, Gate, GatingDevice};
use super::school::School;

/// Type alias for 2D spatial KD-tree used for neighbor queries.
pub type Tree2D = KdTree<f32, usize, Vec<f32>>;

/// KD-trees over everything towers can target.
pub struct SpatialIndex {
    /// Active fish, keyed by arena index.
    fish: Tree2D,
    /// Active fishing towers, keyed by device index.
    fishing_towers: Tree2D,
}

impl SpatialIndex {
    /// Builds the index from the current school and devices.
    ///
    /// # Arguments
    ///
    /// * `school` - Source of active fish positions
    /// * `devices` - Device slots; empty slots are skipped
    ///
    /// # Returns
    ///
    /// A spatial index or an error if tree building fails.
    pub fn build(school: &School, devices: &[Option<GatingDevice>]) -> Result<Self> {
        let fish = build_tree(school.active().map(|fish| (fish.id.0, fish.pos.to_vec())))?;

        let towers = devices.iter().enumerate().filter_map(|(index, slot)| match slot {
            Some(GatingDevice::FishingTower(tower)) if tower.is_active() => {
                Some((index, tower.pos.to_vec()))
            }
            _ => None,
        });
        let fishing_towers = build_tree(towers)?;

        Ok(Self {
            fish,
            fishing_towers,
        })
    }

    /// Active fish within a radius, nearest first.
    ///
    /// # Arguments
    ///
    /// * `pos` - Center position for the query
    /// * `radius` - Search radius (will be squared internally)
    pub fn query_fish(&self, pos: &Array1<f32>, radius: f32) -> Vec<(f32, FishId)> {
        query(&self.fish, pos, radius)
            .into_iter()
            .map(|(dist, index)| (dist, FishId(index)))
            .collect()
    }

    /// Active fishing towers within a radius, nearest first.
    pub fn query_fishing_towers(&self, pos: &Array1<f32>, radius: f32) -> Vec<(f32, DeviceId)> {
        query(&self.fishing_towers, pos, radius)
            .into_iter()
            .map(|(dist, index)| (dist, DeviceId(index)))
            .collect()
    }
}

fn query(tree: &Tree2D, pos: &Array1<f32>, radius: f32) -> Vec<(f32, usize)> {
    tree.within(&pos.to_vec(), radius.powi(2), &squared_euclidean)
        .unwrap_or_default()
        .into_iter()
        .map(|(dist, &index)| (dist, index))
        .collect()
}

/// Helper function to build a KD-tree from `(key, position)` pairs.
///
/// Positions with a non-finite coordinate cannot be targeted and are left out.
fn build_tree(items: impl Iterator<Item = (usize, Vec<f32>)>) -> Result<Tree2D> {
    let mut tree = KdTree::new(2);
    for (key, pos) in items {
        if !pos.iter().all(|v| v.is_finite()) {
            continue;
        }
        tree.add(pos, key)?;
    }
    Ok(tree)
}
