//! Tests for stage application

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stagetune_core::export::ParameterDiff;
use stagetune_core::stage::{apply_stage, derive_stage, StageProfile};
use stagetune_core::tune::{default_parameters, Category, ParameterStore, Subrole, TuningParameter};

const NAMED_STAGES: [StageProfile; 4] = [
    StageProfile::Stock,
    StageProfile::Stage1,
    StageProfile::Stage2,
    StageProfile::Stage3,
];

fn store_with(params: Vec<TuningParameter>) -> ParameterStore {
    let mut store = ParameterStore::new();
    store.initialize(params).unwrap();
    store
}

/// Random parameter set covering every category and subrole
fn random_parameters(rng: &mut StdRng) -> Vec<TuningParameter> {
    let shapes = [
        (Category::Boost, Subrole::None),
        (Category::Fuel, Subrole::None),
        (Category::Timing, Subrole::None),
        (Category::Limiter, Subrole::Torque),
        (Category::Limiter, Subrole::Speed),
        (Category::Limiter, Subrole::None),
        (Category::Other, Subrole::Egr),
        (Category::Other, Subrole::None),
    ];
    (0..rng.gen_range(1..24))
        .map(|i| {
            let (category, subrole) = shapes[rng.gen_range(0..shapes.len())];
            let original: f64 = rng.gen_range(0.1..5000.0);
            TuningParameter::new(format!("param_{i}"), category, original, "")
                .with_subrole(subrole)
        })
        .collect()
}

fn currents(store: &ParameterStore) -> Vec<f64> {
    store.iter().map(|p| p.current()).collect()
}

#[test]
fn test_stage1_example_round_trip() {
    let mut store = store_with(vec![TuningParameter::new(
        "Turbo Boost Pressure",
        Category::Boost,
        1.2,
        "bar",
    )]);

    apply_stage(&mut store, StageProfile::Stage1);
    assert_eq!(store.get(0).unwrap().current(), 1.38);
    assert_eq!(store.active_stage(), StageProfile::Stage1);

    apply_stage(&mut store, StageProfile::Stock);
    assert_eq!(store.get(0).unwrap().current(), 1.2);
    assert_eq!(store.active_stage(), StageProfile::Stock);
}

#[test]
fn test_default_set_per_stage() {
    let expected = [
        (StageProfile::Stage1, [1.38, 1792.0, 8.93, 0.0, 480.0, 0.0]),
        (StageProfile::Stage2, [1.56, 2000.0, 9.35, 0.0, 540.0, 0.0]),
        (StageProfile::Stage3, [1.74, 2240.0, 9.77, 0.0, 600.0, 0.0]),
    ];
    for (stage, values) in expected {
        let mut store = store_with(default_parameters());
        apply_stage(&mut store, stage);
        assert_eq!(currents(&store), values.to_vec(), "stage {stage}");
    }
}

#[test]
fn test_stage_application_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(0x5747);
    for _ in 0..50 {
        let params = random_parameters(&mut rng);
        for stage in NAMED_STAGES {
            let mut once = store_with(params.clone());
            apply_stage(&mut once, stage);

            let mut twice = store_with(params.clone());
            apply_stage(&mut twice, stage);
            apply_stage(&mut twice, stage);

            assert_eq!(currents(&once), currents(&twice));
        }
    }
}

#[test]
fn test_switching_stages_never_accumulates() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let params = random_parameters(&mut rng);
        let mut direct = store_with(params.clone());
        apply_stage(&mut direct, StageProfile::Stage2);

        let mut hopped = store_with(params);
        apply_stage(&mut hopped, StageProfile::Stage3);
        apply_stage(&mut hopped, StageProfile::Stage1);
        apply_stage(&mut hopped, StageProfile::Stage2);

        assert_eq!(currents(&direct), currents(&hopped));
    }
}

#[test]
fn test_round_trip_to_stock() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let params = random_parameters(&mut rng);
        for stage in [StageProfile::Stage1, StageProfile::Stage2, StageProfile::Stage3] {
            let mut store = store_with(params.clone());
            apply_stage(&mut store, stage);
            apply_stage(&mut store, StageProfile::Stock);

            for param in store.iter() {
                assert_eq!(param.current(), param.original(), "{}", param.name);
            }
            assert!(ParameterDiff::compute(&store).is_empty());
        }
    }
}

#[test]
fn test_stock_clears_manual_edits() {
    let mut store = store_with(default_parameters());
    store.set_current(0, 2.5).unwrap();
    store.set_current(4, 900.0).unwrap();
    assert_eq!(store.active_stage(), StageProfile::Custom);

    apply_stage(&mut store, StageProfile::Stock);
    assert!(!store.is_modified());
    assert_eq!(store.active_stage(), StageProfile::Stock);
}

#[test]
fn test_aggressiveness_is_monotonic() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..50 {
        let params = random_parameters(&mut rng);
        let s1 = derive_stage(&params, StageProfile::Stage1);
        let s2 = derive_stage(&params, StageProfile::Stage2);
        let s3 = derive_stage(&params, StageProfile::Stage3);

        for i in 0..params.len() {
            if matches!(
                params[i].category,
                Category::Boost | Category::Fuel | Category::Timing
            ) {
                assert!(s1[i].current() <= s2[i].current());
                assert!(s2[i].current() <= s3[i].current());
            }
        }
    }
}

#[test]
fn test_custom_is_a_no_op() {
    let mut store = store_with(default_parameters());
    apply_stage(&mut store, StageProfile::Stage2);
    store.set_current(0, 1.7).unwrap();
    let before = currents(&store);

    apply_stage(&mut store, StageProfile::Custom);
    assert_eq!(currents(&store), before);
    assert_eq!(store.active_stage(), StageProfile::Custom);
}

#[test]
fn test_derive_does_not_mutate_input() {
    let params = default_parameters();
    let _ = derive_stage(&params, StageProfile::Stage3);
    assert!(params.iter().all(|p| !p.is_modified()));
}

#[test]
fn test_localized_labels_follow_subrole() {
    let params = vec![
        TuningParameter::new("Hız Sınırlayıcı", Category::Limiter, 250.0, "km/h")
            .with_subrole(Subrole::Speed),
        TuningParameter::new("Tork Sınırlayıcı", Category::Limiter, 400.0, "Nm")
            .with_subrole(Subrole::Torque),
        TuningParameter::new("EGR Valfi", Category::Other, 100.0, "%")
            .with_subrole(Subrole::Egr),
    ];
    let derived = derive_stage(&params, StageProfile::Stage1);
    assert_eq!(derived[0].current(), 0.0);
    assert_eq!(derived[1].current(), 480.0);
    assert_eq!(derived[2].current(), 0.0);
}
