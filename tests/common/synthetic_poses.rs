use nalgebra::{UnitQuaternion, Vector3};
use pose_offsets::{PoseList, RigidTransform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub fn at(x: f32, y: f32, z: f32) -> RigidTransform {
    RigidTransform::from_translation(Vector3::new(x, y, z))
}

pub fn yawed(x: f32, y: f32, z: f32, yaw_deg: f32) -> RigidTransform {
    RigidTransform::from_parts(
        Vector3::new(x, y, z),
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw_deg.to_radians()),
    )
}

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Uniformly distributed rotation (Shoemake).
pub fn random_rotation(rng: &mut StdRng) -> UnitQuaternion<f32> {
    let u1: f32 = rng.random();
    let u2: f32 = rng.random_range(0.0..std::f32::consts::TAU);
    let u3: f32 = rng.random_range(0.0..std::f32::consts::TAU);
    let a = (1.0 - u1).sqrt();
    let b = u1.sqrt();
    UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(
        b * u3.cos(),
        a * u2.sin(),
        a * u2.cos(),
        b * u3.sin(),
    ))
}

pub fn random_pose(rng: &mut StdRng, extent: f32) -> RigidTransform {
    let position = Vector3::new(
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
    );
    RigidTransform::from_parts(position, random_rotation(rng))
}

/// `n` model poses with random positions and orientations.
pub fn random_model(rng: &mut StdRng, n: usize) -> PoseList {
    (0..n).map(|_| random_pose(rng, 5.0)).collect()
}

/// Every model pose mapped through `offset`, mixed with `noise` unrelated
/// poses in shuffled order.
pub fn embed(
    rng: &mut StdRng,
    model: &PoseList,
    offset: &RigidTransform,
    noise: usize,
) -> PoseList {
    let mut poses: Vec<RigidTransform> = model.iter().map(|m| offset.compose(m)).collect();
    poses.extend((0..noise).map(|_| random_pose(rng, 20.0)));
    poses.shuffle(rng);
    PoseList::new(poses)
}
