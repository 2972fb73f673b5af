mod common;

use common::synthetic_poses::{embed, random_model, random_pose, random_rotation, seeded};
use nalgebra::Vector3;
use pose_offsets::{OffsetSearch, RigidTransform, SearchParams, StrategyKind};
use rand::Rng;

const TRIALS: u64 = 25;

#[test]
fn intersection_recovers_random_translations() {
    let _ = env_logger::builder().is_test(true).try_init();
    let search = OffsetSearch::new(SearchParams::with_strategy(StrategyKind::Intersection));
    for seed in 0..TRIALS {
        let mut rng = seeded(seed);
        let n = rng.random_range(1..6);
        let model = random_model(&mut rng, n);
        let t = Vector3::new(
            rng.random_range(-20.0..20.0),
            rng.random_range(-20.0..20.0),
            rng.random_range(-20.0..20.0),
        );
        let space = embed(&mut rng, &model, &RigidTransform::from_translation(t), 12);

        let offsets = search.search(&model, &space).unwrap();
        assert!(
            offsets
                .iter()
                .any(|o| (o.offset.translation() - t).norm() < 1e-3),
            "seed {seed}: {t:?} not in {offsets:?}"
        );
    }
}

#[test]
fn composition_recovers_random_rigid_offsets() {
    let search = OffsetSearch::new(SearchParams::with_strategy(StrategyKind::Composition));
    for seed in 0..TRIALS {
        let mut rng = seeded(1_000 + seed);
        let n = rng.random_range(2..6);
        let model = random_model(&mut rng, n);
        let offset = RigidTransform::from_parts(
            Vector3::new(
                rng.random_range(-20.0..20.0),
                rng.random_range(-20.0..20.0),
                rng.random_range(-20.0..20.0),
            ),
            random_rotation(&mut rng),
        );
        let space = embed(&mut rng, &model, &offset, 12);

        let offsets = search.search(&model, &space).unwrap();
        assert!(
            offsets
                .iter()
                .any(|o| o.transform().max_abs_difference(&offset) < 1e-3),
            "seed {seed}: expected offset not found among {} results",
            offsets.len()
        );
    }
}

#[test]
fn noise_only_space_yields_nothing() {
    for strategy in [StrategyKind::Intersection, StrategyKind::Composition] {
        let search = OffsetSearch::new(SearchParams::with_strategy(strategy));
        for seed in 0..TRIALS {
            let mut rng = seeded(5_000 + seed);
            let model = random_model(&mut rng, 3);
            let space = (0..20).map(|_| random_pose(&mut rng, 20.0)).collect();
            let report = search.search_with_report(&model, &space).unwrap();
            assert!(report.is_empty(), "seed {seed} ({strategy})");
        }
    }
}
