#![allow(missing_docs)]

use rand::SeedableRng;
use rand::rngs::StdRng;
use salmon_run::simulation::genome::{Genome, Locus, Sex};
use salmon_run::simulation::reproduction::{breed_generation, found_generation};

fn genome(text: &str) -> Genome {
    text.parse().expect("valid genome literal")
}

#[test]
fn test_found_generation_size() {
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(found_generation(10, &mut rng).len(), 10);
    assert!(found_generation(0, &mut rng).is_empty());
}

#[test]
fn test_breed_without_pairs_is_empty() {
    let mut rng = StdRng::seed_from_u64(2);

    assert!(breed_generation(&[], 2, 4, &mut rng).is_empty());
    assert!(breed_generation(&[genome("XX Bb")], 2, 4, &mut rng).is_empty());

    let all_female = [genome("XX Bb"), genome("YX bb"), genome("XX BB")];
    assert!(breed_generation(&all_female, 2, 4, &mut rng).is_empty());

    let all_male = [genome("XY Bb"), genome("YY bb")];
    assert!(breed_generation(&all_male, 2, 4, &mut rng).is_empty());
}

#[test]
fn test_breed_offspring_count_bounds() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut parents = Vec::new();
    for _ in 0..5 {
        parents.push(genome("XX Bb"));
        parents.push(genome("XY bB"));
    }

    for _ in 0..50 {
        let offspring = breed_generation(&parents, 2, 4, &mut rng);
        assert!((10..=20).contains(&offspring.len()), "{} offspring", offspring.len());
    }
}

#[test]
fn test_surplus_side_goes_unpaired() {
    let mut rng = StdRng::seed_from_u64(4);
    let parents = [
        genome("XX bb"),
        genome("XY bb"),
        genome("XY BB"),
        genome("YY BB"),
    ];

    // one pair, exactly three offspring
    let offspring = breed_generation(&parents, 3, 3, &mut rng);
    assert_eq!(offspring.len(), 3);
}

#[test]
fn test_offspring_inherit_from_a_real_pair() {
    let mut rng = StdRng::seed_from_u64(5);
    let mother = genome("XX bb");
    let father = genome("XY BB");

    let offspring = breed_generation(&[father, mother], 4, 4, &mut rng);
    assert_eq!(offspring.len(), 4);
    for child in offspring {
        assert!(mother[Locus::Size].contains(child[Locus::Size].maternal));
        assert!(father[Locus::Size].contains(child[Locus::Size].paternal));
        // mother carries only X, so sex depends on the father's allele
        assert_eq!(child[Locus::Sex].maternal, mother[Locus::Sex].maternal);
    }
}

#[test]
fn test_breeding_is_deterministic_for_a_seed() {
    let parents = [
        genome("XX Bb"),
        genome("XY Bb"),
        genome("YX bB"),
        genome("YY bb"),
    ];
    let a = breed_generation(&parents, 1, 5, &mut StdRng::seed_from_u64(9));
    let b = breed_generation(&parents, 1, 5, &mut StdRng::seed_from_u64(9));
    assert_eq!(a, b);
    assert!(a.iter().all(|g| matches!(g.sex(), Sex::Female | Sex::Male)));
}
