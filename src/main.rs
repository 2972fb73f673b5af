use nalgebra::{UnitQuaternion, Vector3};
use pose_offsets::{OffsetSearch, PoseList, RigidTransform, SearchParams, StrategyKind};

fn main() {
    // Demo: a three-pose model placed twice into a cluttered space.
    let yaw = |deg: f32| UnitQuaternion::from_axis_angle(&Vector3::y_axis(), deg.to_radians());
    let model = PoseList::new(vec![
        RigidTransform::identity(),
        RigidTransform::from_translation(Vector3::new(5.0, 0.0, 0.0)),
        RigidTransform::from_parts(Vector3::new(0.0, 0.0, 3.0), yaw(90.0)),
    ]);

    let placement = RigidTransform::from_parts(Vector3::new(10.0, 0.0, -4.0), yaw(30.0));
    let shift = Vector3::new(2.0, 2.0, 2.0);
    let mut space: Vec<RigidTransform> = Vec::new();
    space.extend(model.iter().map(|m| m.translated(&shift)));
    space.extend(model.iter().map(|m| placement.compose(m)));
    space.push(RigidTransform::from_parts(Vector3::new(-3.0, 1.0, 7.0), yaw(45.0)));
    let space = PoseList::new(space);

    for strategy in [StrategyKind::Intersection, StrategyKind::Composition] {
        let search = OffsetSearch::new(SearchParams::with_strategy(strategy));
        match search.search_with_report(&model, &space) {
            Ok(report) => {
                println!(
                    "{strategy}: offsets={} candidates={} total_ms={:.3}",
                    report.offsets.len(),
                    report.trace.generation.candidates,
                    report.trace.timing.total_ms
                );
                for offset in &report.offsets {
                    let t = offset.offset.translation();
                    println!("  translation=({:.3}, {:.3}, {:.3})", t.x, t.y, t.z);
                }
            }
            Err(err) => eprintln!("{strategy}: {err}"),
        }
    }
}
