#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::sync::Arc;

use ndarray::Array1;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use salmon_run::simulation::fish::{Fish, FishId};
use salmon_run::simulation::gating::regulation::RegulationEffect;
use salmon_run::simulation::gating::tower::{CatchAttempt, TowerCycle};
use salmon_run::simulation::gating::{
    Dam, DamLadder, DeviceId, FishingTower, Gate, GateOutcome, PhenotypeRates, RegulationMode,
    RegulationTower, roll,
};
use salmon_run::simulation::genome::Genome;
use salmon_run::simulation::params::Params;
use salmon_run::simulation::placement::SiteId;

fn create_test_fish(id: usize, genome: &str, pos: [f32; 2]) -> Fish {
    let genome: Genome = genome.parse().unwrap();
    Fish::new(
        FishId(id),
        Arc::new(genome),
        Array1::from_vec(pos.to_vec()),
        &Params::default().fish,
    )
}

fn create_test_dam(rate: f32) -> Dam {
    let params = Params::default();
    let mut dam = Dam::new(SiteId(0), &params.dam_sites[0], &params.dam)
        .with_rates(PhenotypeRates::uniform(rate));
    dam.activate();
    dam
}

fn pos(x: f32, y: f32) -> Array1<f32> {
    Array1::from_vec(vec![x, y])
}

#[test]
fn test_roll_edges() {
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..1000 {
        assert!(roll(1.0, &mut rng));
        assert!(!roll(0.0, &mut rng));
    }
}

#[test]
fn test_roll_is_strictly_below_rate() {
    for seed in 0..50 {
        let drawn: f32 = StdRng::seed_from_u64(seed).random();
        assert!((0.0..1.0).contains(&drawn));
        // the same draw succeeds only when the rate lies above it
        assert!(!roll(drawn, &mut StdRng::seed_from_u64(seed)));
        assert!(roll(drawn + f32::EPSILON, &mut StdRng::seed_from_u64(seed)));
    }
}

#[test]
fn test_dam_always_passes_at_rate_one() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut dam = create_test_dam(1.0);

    for id in 0..100 {
        let mut fish = create_test_fish(id, "XY Bb", [10.0, 20.0]);
        assert_eq!(dam.try_gate(&mut fish, &mut rng), GateOutcome::Pass);
        assert!(!fish.is_stuck());
        assert!(dam.drop_off.contains(&fish.pos));
    }
    assert_eq!(dam.crossings, 100);
    assert_eq!(dam.rejections, 0);
}

#[test]
fn test_dam_never_passes_at_rate_zero_and_never_rerolls() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut dam = create_test_dam(0.0);
    let mut fish = create_test_fish(0, "XX BB", [10.0, 20.0]);

    assert_eq!(dam.try_gate(&mut fish, &mut rng), GateOutcome::Fail);
    assert!(fish.is_stuck());

    // a stuck fish is never rolled again, even once the odds change
    dam.attach_ladder(DamLadder {
        rates: PhenotypeRates::uniform(1.0),
    });
    for _ in 0..10 {
        assert_eq!(dam.try_gate(&mut fish, &mut rng), GateOutcome::NoOp);
    }
    assert!(fish.is_stuck());
    assert_eq!(dam.rejections, 1);
    assert_eq!(dam.crossings, 0);
}

#[test]
fn test_inactive_dam_is_noop() {
    let params = Params::default();
    let mut dam = Dam::new(SiteId(0), &params.dam_sites[0], &params.dam);
    let mut fish = create_test_fish(0, "XY bb", [10.0, 20.0]);
    let mut rng = StdRng::seed_from_u64(3);

    assert!(!dam.is_active());
    assert_eq!(dam.try_gate(&mut fish, &mut rng), GateOutcome::NoOp);
    assert!(!fish.is_stuck());
}

#[test]
fn test_ladder_overrides_rates() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut dam = create_test_dam(0.0);
    dam.attach_ladder(DamLadder {
        rates: PhenotypeRates::new(1.0, 0.0, 1.0),
    });
    assert!(dam.has_ladder());

    let mut small = create_test_fish(0, "XX bb", [10.0, 20.0]);
    let mut medium = create_test_fish(1, "XX Bb", [10.0, 20.0]);
    assert_eq!(dam.try_gate(&mut small, &mut rng), GateOutcome::Pass);
    assert_eq!(dam.try_gate(&mut medium, &mut rng), GateOutcome::Fail);
}

#[test]
fn test_dam_pass_frequency_matches_rate() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut dam = create_test_dam(0.3);
    let n = 10_000;
    for id in 0..n {
        let mut fish = create_test_fish(id, "XY Bb", [10.0, 20.0]);
        dam.try_gate(&mut fish, &mut rng);
    }
    let share = dam.crossings as f64 / n as f64;
    assert!((share - 0.3).abs() < 0.02, "pass share {share}");
}

#[test]
fn test_attempt_duration_independent_of_outcome() {
    let hit = CatchAttempt::new(FishId(0), true, 2.0, 3);
    let miss = CatchAttempt::new(FishId(0), false, 2.0, 3);

    assert_eq!(hit.segment_count(), 6);
    assert_eq!(miss.segment_count(), 1);
    assert!((hit.segment_length() - 2.0 / 6.0).abs() < 1e-6);
    assert!((hit.total_duration() - 2.0).abs() < 1e-5);
    assert!((miss.total_duration() - 2.0).abs() < 1e-5);

    for mut attempt in [hit, miss] {
        let mut steps = 0;
        while !attempt.advance(0.25) {
            steps += 1;
            assert!(steps < 100);
        }
        assert_eq!(steps + 1, 8);
    }
}

#[test]
fn test_flash_segments() {
    let mut hit = CatchAttempt::new(FishId(0), true, 2.0, 3);
    assert!(hit.flash_visible());
    hit.advance(0.4);
    assert!(!hit.flash_visible());
    hit.advance(0.3);
    assert!(hit.flash_visible());

    let mut miss = CatchAttempt::new(FishId(0), false, 2.0, 3);
    miss.advance(0.1);
    assert!(!miss.flash_visible());
}

/// Runs a tower that starts an attempt on every firing.
///
/// Returns the ticks on which it fired and the ticks on which an attempt
/// completed.
fn fire_ticks(success: bool) -> (Vec<usize>, Vec<usize>) {
    let mut cycle: TowerCycle<FishId> = TowerCycle::new(2.0, 3);
    let mut fired = Vec::new();
    let mut completed = Vec::new();
    for tick in 1..=48 {
        let step = cycle.tick(0.25, true);
        if let Some(attempt) = step.completed {
            assert_eq!(attempt.success, success);
            assert!(!cycle.is_busy());
            completed.push(tick);
        }
        if step.fire {
            fired.push(tick);
            cycle.begin(FishId(0), success);
        }
    }
    (fired, completed)
}

#[test]
fn test_tower_cadence_same_for_hit_and_miss() {
    let (hit_fires, hit_completions) = fire_ticks(true);
    let (miss_fires, miss_completions) = fire_ticks(false);
    assert_eq!(hit_fires, vec![8, 16, 24, 32, 40, 48]);
    assert_eq!(hit_fires, miss_fires);

    // each attempt resolves on the step the next firing comes due
    assert_eq!(hit_completions, vec![16, 24, 32, 40, 48]);
    assert_eq!(hit_completions, miss_completions);
}

#[test]
fn test_countdown_runs_during_attempt() {
    let mut cycle: TowerCycle<FishId> = TowerCycle::new(1.0, 2);
    for _ in 0..3 {
        assert!(cycle.tick(0.25, true).is_idle());
    }
    assert!(cycle.tick(0.25, true).fire);
    cycle.begin(FishId(3), true);

    cycle.tick(0.5, true);
    assert!(cycle.is_busy());
    assert!((cycle.timer().remaining() - 0.5).abs() < 1e-5);

    let step = cycle.tick(0.5, true);
    assert!(step.fire);
    assert_eq!(step.completed.map(|attempt| attempt.target), Some(FishId(3)));
    assert!(!cycle.is_busy());
}

#[test]
fn test_inactive_cycle_never_fires() {
    let mut cycle: TowerCycle<FishId> = TowerCycle::new(1.0, 2);
    for _ in 0..20 {
        let step = cycle.tick(0.25, false);
        assert!(!step.fire);
        assert!(step.completed.is_none());
    }
}

#[test]
fn test_fishing_tower_catch_and_miss() {
    let params = Params::default();
    let mut rng = StdRng::seed_from_u64(6);

    let mut tower_params = params.fishing_tower.clone();
    tower_params.catch_rates = PhenotypeRates::new(0.0, 0.0, 1.0);
    let mut tower = FishingTower::new(SiteId(1), pos(1.5, 12.0), &tower_params);

    let mut large = create_test_fish(0, "XX BB", [3.0, 12.0]);
    assert_eq!(tower.try_gate(&mut large, &mut rng), GateOutcome::NoOp);

    tower.activate();
    assert_eq!(tower.try_gate(&mut large, &mut rng), GateOutcome::Fail);
    assert!(large.is_being_caught());
    assert_eq!(tower.pending_target(), Some(FishId(0)));

    // busy until the attempt resolves
    let mut small = create_test_fish(1, "XX bb", [3.0, 12.0]);
    assert_eq!(tower.try_gate(&mut small, &mut rng), GateOutcome::NoOp);

    tower.cancel_pending();
    assert_eq!(tower.pending_target(), None);
    assert_eq!(tower.try_gate(&mut small, &mut rng), GateOutcome::Pass);
    assert!(!small.is_being_caught());
}

#[test]
fn test_fishing_tower_range() {
    let params = Params::default();
    let tower = FishingTower::new(SiteId(1), pos(0.0, 0.0), &params.fishing_tower);
    assert!(tower.in_range(&pos(3.0, 4.0)));
    assert!(!tower.in_range(&pos(3.0, 4.1)));
}

#[test]
fn test_regulation_kill_disables_target() {
    let params = Params::default();
    let mut rng = StdRng::seed_from_u64(7);

    let mut reg_params = params.regulation_tower.clone();
    reg_params.success_rate = 1.0;
    reg_params.mode = RegulationMode::Kill;
    let mut regulator = RegulationTower::new(SiteId(2), pos(1.5, 28.0), &reg_params);
    regulator.activate();

    let mut target = FishingTower::new(SiteId(1), pos(1.5, 20.0), &params.fishing_tower);
    target.activate();

    assert!(regulator.can_target(&target));
    assert!(regulator.try_regulate(DeviceId(0), &mut target, &mut rng));
    assert!(target.is_being_regulated());
    assert!(!regulator.can_target(&target));

    assert_eq!(regulator.apply_effect(&mut target), RegulationEffect::Disabled);
    assert!(!target.is_active());
    assert_eq!(regulator.regulations, 1);
}

#[test]
fn test_regulation_slowdown_expires() {
    let params = Params::default();
    let mut rng = StdRng::seed_from_u64(8);

    let mut reg_params = params.regulation_tower.clone();
    reg_params.success_rate = 1.0;
    reg_params.mode = RegulationMode::Slowdown;
    reg_params.slowdown_factors = PhenotypeRates::uniform(0.5);
    reg_params.slowdown_duration = 1.0;
    let mut regulator = RegulationTower::new(SiteId(2), pos(1.5, 28.0), &reg_params);
    regulator.activate();

    let mut target = FishingTower::new(SiteId(1), pos(1.5, 20.0), &params.fishing_tower);
    target.activate();
    let base = target.effective_rates();

    assert!(regulator.try_regulate(DeviceId(0), &mut target, &mut rng));
    assert_eq!(regulator.apply_effect(&mut target), RegulationEffect::Slowed);
    assert!(target.is_active());
    assert!(!target.is_being_regulated());
    assert_eq!(target.effective_rates(), base.scaled_by(&PhenotypeRates::uniform(0.5)));

    for _ in 0..5 {
        target.tick(0.25);
    }
    assert!(target.slowdown().is_none());
    assert_eq!(target.effective_rates(), base);
}

#[test]
fn test_regulation_tower_ignores_fish() {
    let params = Params::default();
    let mut tower = RegulationTower::new(SiteId(2), pos(0.0, 0.0), &params.regulation_tower);
    tower.activate();
    let mut fish = create_test_fish(0, "XY BB", [0.0, 0.0]);
    let mut rng = StdRng::seed_from_u64(9);
    assert_eq!(tower.try_gate(&mut fish, &mut rng), GateOutcome::NoOp);
}

#[test]
fn test_out_of_range_tower_is_not_a_target() {
    let params = Params::default();
    let mut regulator = RegulationTower::new(SiteId(2), pos(0.0, 0.0), &params.regulation_tower);
    regulator.activate();
    let mut far = FishingTower::new(SiteId(1), pos(0.0, 50.0), &params.fishing_tower);
    far.activate();
    assert!(!regulator.can_target(&far));
    let mut rng = StdRng::seed_from_u64(10);
    assert!(!regulator.try_regulate(DeviceId(0), &mut far, &mut rng));
    assert!(regulator.attempt().is_none());
}
