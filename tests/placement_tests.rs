#![allow(missing_docs)]

use ndarray::Array1;
use salmon_run::simulation::ecosystem::Ecosystem;
use salmon_run::simulation::error::SimError;
use salmon_run::simulation::gating::{DeviceKind, GatingDevice};
use salmon_run::simulation::lifecycle::Phase;
use salmon_run::simulation::params::Params;
use salmon_run::simulation::placement::{PlacementMap, SiteId};

fn point(x: f32, y: f32) -> Array1<f32> {
    Array1::from_vec(vec![x, y])
}

fn create_test_params() -> Params {
    Params {
        seed: Some(42),
        ..Params::default()
    }
}

fn started() -> Ecosystem {
    let mut ecosystem = Ecosystem::new(create_test_params()).unwrap();
    ecosystem.start().unwrap();
    ecosystem
}

const DAM_SITE: [f32; 2] = [10.0, 20.0];
const PAD: [f32; 2] = [1.5, 12.0];
const OTHER_PAD: [f32; 2] = [18.5, 12.0];

#[test]
fn test_site_lookup() {
    let map = PlacementMap::from_params(&create_test_params());
    assert_eq!(map.sites().len(), 5);
    assert_eq!(map.site_at(&point(DAM_SITE[0], DAM_SITE[1])).map(|s| s.id), Some(SiteId(0)));
    assert_eq!(map.site_at(&point(PAD[0], PAD[1])).map(|s| s.id), Some(SiteId(1)));
    assert!(map.site_at(&point(10.0, 5.0)).is_none());
}

#[test]
fn test_validity_rules_on_a_fresh_map() {
    let map = PlacementMap::from_params(&create_test_params());
    let dam_site = point(DAM_SITE[0], DAM_SITE[1]);
    let pad = point(PAD[0], PAD[1]);

    assert!(map.placement_valid(DeviceKind::Dam, &dam_site));
    assert!(!map.placement_valid(DeviceKind::Dam, &pad));
    assert!(!map.placement_valid(DeviceKind::DamLadder, &dam_site));
    assert!(map.placement_valid(DeviceKind::FishingTower, &pad));
    assert!(map.placement_valid(DeviceKind::RegulationTower, &pad));
    assert!(!map.placement_valid(DeviceKind::FishingTower, &dam_site));
    assert!(!map.placement_valid(DeviceKind::FishingTower, &point(10.0, 5.0)));
}

#[test]
fn test_placement_requires_place_phase() {
    let mut ecosystem = Ecosystem::new(create_test_params()).unwrap();
    let dam_site = point(DAM_SITE[0], DAM_SITE[1]);

    assert!(!ecosystem.placement_valid(DeviceKind::Dam, &dam_site));
    assert!(matches!(
        ecosystem.place(DeviceKind::Dam, &dam_site),
        Err(SimError::InvalidPlacement(_))
    ));
    assert_eq!(ecosystem.devices().count(), 0);

    ecosystem.start().unwrap();
    assert_eq!(ecosystem.phase(), Phase::Place);
    assert!(ecosystem.placement_valid(DeviceKind::Dam, &dam_site));
}

#[test]
fn test_validity_query_has_no_side_effects() {
    let ecosystem = started();
    let dam_site = point(DAM_SITE[0], DAM_SITE[1]);
    for _ in 0..10 {
        assert!(ecosystem.placement_valid(DeviceKind::Dam, &dam_site));
    }
    assert_eq!(ecosystem.devices().count(), 0);
    assert!(!ecosystem.placement().sites()[0].is_occupied());
}

#[test]
fn test_dam_then_ladder() {
    let mut ecosystem = started();
    let dam_site = point(DAM_SITE[0], DAM_SITE[1]);

    let dam_id = ecosystem.place(DeviceKind::Dam, &dam_site).unwrap();
    assert!(!ecosystem.placement_valid(DeviceKind::Dam, &dam_site));
    assert!(ecosystem.placement_valid(DeviceKind::DamLadder, &dam_site));

    // a second dam is refused and nothing changes
    assert!(ecosystem.place(DeviceKind::Dam, &dam_site).is_err());
    assert_eq!(ecosystem.devices().count(), 1);

    let ladder_id = ecosystem.place(DeviceKind::DamLadder, &dam_site).unwrap();
    assert_eq!(ladder_id, dam_id);
    assert!(!ecosystem.placement_valid(DeviceKind::DamLadder, &dam_site));
    assert!(ecosystem.place(DeviceKind::DamLadder, &dam_site).is_err());

    match ecosystem.device(dam_id) {
        Some(GatingDevice::Dam(dam)) => {
            assert!(dam.has_ladder());
            assert_eq!(dam.effective_rates(), create_test_params().dam.ladder_rates);
        }
        other => panic!("expected a dam, got {other:?}"),
    }
}

#[test]
fn test_towers_take_one_pad_each() {
    let mut ecosystem = started();
    let pad = point(PAD[0], PAD[1]);
    let other_pad = point(OTHER_PAD[0], OTHER_PAD[1]);

    let fishing = ecosystem.place(DeviceKind::FishingTower, &pad).unwrap();
    assert!(!ecosystem.placement_valid(DeviceKind::RegulationTower, &pad));
    assert!(ecosystem.place(DeviceKind::RegulationTower, &pad).is_err());

    let regulation = ecosystem
        .place(DeviceKind::RegulationTower, &other_pad)
        .unwrap();
    assert_ne!(fishing, regulation);
    assert!(matches!(
        ecosystem.device(fishing),
        Some(GatingDevice::FishingTower(_))
    ));
    assert!(matches!(
        ecosystem.device(regulation),
        Some(GatingDevice::RegulationTower(_))
    ));
    assert_eq!(
        ecosystem.placement().sites()[1].occupant(),
        Some(fishing)
    );
}

#[test]
fn test_no_placement_during_run() {
    let mut ecosystem = started();
    ecosystem.begin_run().unwrap();
    let pad = point(PAD[0], PAD[1]);
    assert!(!ecosystem.placement_valid(DeviceKind::FishingTower, &pad));
    assert!(ecosystem.place(DeviceKind::FishingTower, &pad).is_err());
    assert_eq!(ecosystem.devices().count(), 0);
}
