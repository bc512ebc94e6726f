use delve_core::mapgen::derive_floor_seed;
use delve_core::{Difficulty, FloorGenerator, GenRng, GenerationConfig, generate_floor};

#[test]
fn identical_seeds_produce_identical_fingerprints() {
    let config = GenerationConfig::default();
    let first = generate_floor(12345, 0, &config).expect("generation succeeds");
    let second = generate_floor(12345, 0, &config).expect("generation succeeds");

    assert_eq!(
        first.fingerprint(),
        second.fingerprint(),
        "identical seeds must produce identical floors"
    );
    assert_eq!(first, second);
}

#[test]
fn levels_of_one_run_differ_from_each_other() {
    let config = GenerationConfig::default();
    let fingerprints: Vec<u64> = (0..4)
        .map(|level| generate_floor(99, level, &config).expect("generation succeeds").fingerprint())
        .collect();

    for (index, fingerprint) in fingerprints.iter().enumerate() {
        assert!(
            !fingerprints[index + 1..].contains(fingerprint),
            "level {index} repeats a later level"
        );
    }
}

#[test]
fn generate_floor_is_the_generator_on_a_derived_seed() {
    let config = GenerationConfig::default().with_size(50, 36);
    let direct = FloorGenerator::new(config.clone())
        .generate(&mut GenRng::from_seed(derive_floor_seed(7, 3)))
        .expect("generation succeeds");
    let convenience = generate_floor(7, 3, &config).expect("generation succeeds");
    assert_eq!(direct.fingerprint(), convenience.fingerprint());
}

#[test]
fn difficulty_changes_the_floor_but_not_the_carve() {
    let easy =
        GenerationConfig { difficulty: Difficulty::Easy.profile(), ..GenerationConfig::default() };
    let hard =
        GenerationConfig { difficulty: Difficulty::Hard.profile(), ..GenerationConfig::default() };
    let easy_floor = generate_floor(5, 0, &easy).expect("generation succeeds");
    let hard_floor = generate_floor(5, 0, &hard).expect("generation succeeds");

    assert_eq!(easy_floor.grid, hard_floor.grid, "carving runs before difficulty is consulted");
    assert!(hard_floor.target_gold > easy_floor.target_gold);
    assert_ne!(easy_floor.fingerprint(), hard_floor.fingerprint());
}
