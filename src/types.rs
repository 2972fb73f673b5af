//! Core pose types shared by every stage of the offset search.
//!
//! - [`RigidTransform`]: a 4x4 homogeneous placement (rotation + position).
//! - [`PoseList`]: an ordered, read-only collection of placements.
//! - [`Offset`] / [`ValidatedOffset`]: hypothesised and confirmed mappings
//!   from the model frame into the space frame.
use crate::search::StrategyKind;
use nalgebra::{Isometry3, Matrix4, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Number of scalar components in one serialized placement record.
pub const RECORD_LEN: usize = 16;

/// Placement of an object in 3D space stored as a homogeneous matrix.
///
/// Columns 0..3 hold the rotation basis (right, up, forward) and column 3
/// holds the position, matching the layout of the serialized records.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 16]", into = "[f32; 16]")]
pub struct RigidTransform {
    matrix: Matrix4<f32>,
}

impl RigidTransform {
    pub fn from_matrix(matrix: Matrix4<f32>) -> Self {
        Self { matrix }
    }

    pub fn identity() -> Self {
        Self::from_matrix(Matrix4::identity())
    }

    /// Pure translation without rotation.
    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self::from_matrix(Matrix4::new_translation(&translation))
    }

    /// Rotation followed by translation, i.e. `T * R`.
    pub fn from_parts(translation: Vector3<f32>, rotation: UnitQuaternion<f32>) -> Self {
        let iso = Isometry3::from_parts(Translation3::from(translation), rotation);
        Self::from_matrix(iso.to_homogeneous())
    }

    /// Build from sixteen row-major components (`m00, m01, .., m33`).
    pub fn from_row_major(values: &[f32; RECORD_LEN]) -> Self {
        Self::from_matrix(Matrix4::from_row_slice(values))
    }

    /// Sixteen row-major components (`m00, m01, .., m33`).
    pub fn to_row_major(&self) -> [f32; RECORD_LEN] {
        let mut out = [0.0f32; RECORD_LEN];
        for r in 0..4 {
            for c in 0..4 {
                out[r * 4 + c] = self.matrix[(r, c)];
            }
        }
        out
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.matrix
    }

    pub fn position(&self) -> Vector3<f32> {
        Vector3::new(
            self.matrix[(0, 3)],
            self.matrix[(1, 3)],
            self.matrix[(2, 3)],
        )
    }

    /// Third basis column.
    pub fn forward(&self) -> Vector3<f32> {
        self.matrix.fixed_view::<3, 1>(0, 2).into_owned()
    }

    /// Second basis column.
    pub fn up(&self) -> Vector3<f32> {
        self.matrix.fixed_view::<3, 1>(0, 1).into_owned()
    }

    /// Orientation rebuilt from the forward/up basis: the rotation whose
    /// local +Z looks along `forward` with +Y as close to `up` as possible.
    pub fn orientation(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::face_towards(&self.forward(), &self.up())
    }

    /// Same orientation, position shifted by `offset`.
    pub fn translated(&self, offset: &Vector3<f32>) -> Self {
        let mut matrix = self.matrix;
        matrix[(0, 3)] += offset.x;
        matrix[(1, 3)] += offset.y;
        matrix[(2, 3)] += offset.z;
        Self::from_matrix(matrix)
    }

    /// Matrix product `self * other`.
    pub fn compose(&self, other: &RigidTransform) -> Self {
        Self::from_matrix(self.matrix * other.matrix)
    }

    pub fn determinant(&self) -> f32 {
        self.matrix.determinant()
    }

    /// Inverse of the full homogeneous matrix.
    ///
    /// Fails when the matrix is not invertible (zero scale, collapsed basis)
    /// or when inversion would yield non-finite components. Small but
    /// well-conditioned scales invert fine.
    pub fn try_inverse(&self) -> Result<Self, SingularTransformError> {
        let determinant = self.determinant();
        if !determinant.is_finite() {
            return Err(SingularTransformError { determinant });
        }
        let inverse = self
            .matrix
            .try_inverse()
            .ok_or(SingularTransformError { determinant })?;
        if inverse.iter().any(|v| !v.is_finite()) {
            return Err(SingularTransformError { determinant });
        }
        Ok(Self::from_matrix(inverse))
    }

    /// Largest absolute component-wise difference across all 16 entries.
    pub fn max_abs_difference(&self, other: &RigidTransform) -> f32 {
        self.matrix
            .iter()
            .zip(other.matrix.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max)
    }

    pub fn is_finite(&self) -> bool {
        self.matrix.iter().all(|v| v.is_finite())
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: RigidTransform) -> RigidTransform {
        self.compose(&rhs)
    }
}

impl From<[f32; RECORD_LEN]> for RigidTransform {
    fn from(values: [f32; RECORD_LEN]) -> Self {
        Self::from_row_major(&values)
    }
}

impl From<RigidTransform> for [f32; RECORD_LEN] {
    fn from(transform: RigidTransform) -> Self {
        transform.to_row_major()
    }
}

/// The base pose of a composition search could not be inverted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SingularTransformError {
    pub determinant: f32,
}

impl std::fmt::Display for SingularTransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "base transform is not invertible (determinant {:e})",
            self.determinant
        )
    }
}

impl std::error::Error for SingularTransformError {}

/// Raw pose data that cannot be turned into a [`PoseList`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PoseDataError {
    /// Flat buffer length is not a whole number of 16-component records.
    TruncatedRecord { len: usize },
    /// A component is NaN or infinite.
    NonFinite { pose: usize, component: usize },
}

impl std::fmt::Display for PoseDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoseDataError::TruncatedRecord { len } => write!(
                f,
                "pose buffer of {len} values is not a multiple of {RECORD_LEN}"
            ),
            PoseDataError::NonFinite { pose, component } => {
                write!(f, "pose {pose} has a non-finite component m{}{}", component / 4, component % 4)
            }
        }
    }
}

impl std::error::Error for PoseDataError {}

/// Ordered, read-only collection of placements for one side of a match.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseList {
    poses: Vec<RigidTransform>,
}

impl PoseList {
    pub fn new(poses: Vec<RigidTransform>) -> Self {
        Self { poses }
    }

    /// Decode a flat row-major buffer of 16-component records.
    pub fn from_row_major(values: &[f32]) -> Result<Self, PoseDataError> {
        if values.len() % RECORD_LEN != 0 {
            return Err(PoseDataError::TruncatedRecord { len: values.len() });
        }
        let mut poses = Vec::with_capacity(values.len() / RECORD_LEN);
        for (pose, chunk) in values.chunks_exact(RECORD_LEN).enumerate() {
            if let Some(component) = chunk.iter().position(|v| !v.is_finite()) {
                return Err(PoseDataError::NonFinite { pose, component });
            }
            let mut record = [0.0f32; RECORD_LEN];
            record.copy_from_slice(chunk);
            poses.push(RigidTransform::from_row_major(&record));
        }
        Ok(Self { poses })
    }

    /// First pose holding a NaN or infinite component, if any.
    pub fn check_finite(&self) -> Result<(), PoseDataError> {
        for (pose, tf) in self.poses.iter().enumerate() {
            if let Some(component) = tf.to_row_major().iter().position(|v| !v.is_finite()) {
                return Err(PoseDataError::NonFinite { pose, component });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RigidTransform> {
        self.poses.get(index)
    }

    pub fn first(&self) -> Option<&RigidTransform> {
        self.poses.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RigidTransform> {
        self.poses.iter()
    }

    pub fn as_slice(&self) -> &[RigidTransform] {
        &self.poses
    }

    pub fn positions(&self) -> Vec<Vector3<f32>> {
        self.poses.iter().map(RigidTransform::position).collect()
    }
}

impl FromIterator<RigidTransform> for PoseList {
    fn from_iter<I: IntoIterator<Item = RigidTransform>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PoseList {
    type Item = &'a RigidTransform;
    type IntoIter = std::slice::Iter<'a, RigidTransform>;

    fn into_iter(self) -> Self::IntoIter {
        self.poses.iter()
    }
}

/// Hypothesised mapping from model frame to space frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Offset {
    /// Orientation-preserving shift, produced by the intersection strategy.
    Translation(Vector3<f32>),
    /// Full rigid transform, produced by the composition strategy.
    Transform(RigidTransform),
}

impl Offset {
    /// Offset expressed as a homogeneous transform.
    pub fn to_transform(&self) -> RigidTransform {
        match self {
            Offset::Translation(t) => RigidTransform::from_translation(*t),
            Offset::Transform(tf) => *tf,
        }
    }

    /// Map a model pose into the space frame.
    pub fn apply(&self, pose: &RigidTransform) -> RigidTransform {
        match self {
            Offset::Translation(t) => pose.translated(t),
            Offset::Transform(tf) => tf.compose(pose),
        }
    }

    pub fn translation(&self) -> Vector3<f32> {
        match self {
            Offset::Translation(t) => *t,
            Offset::Transform(tf) => tf.position(),
        }
    }
}

/// Offset that mapped every model pose onto some space pose.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedOffset {
    pub offset: Offset,
    pub strategy: StrategyKind,
    /// Space pose the model base pose was anchored to (composition only).
    pub anchor_space_index: Option<usize>,
}

impl ValidatedOffset {
    pub fn transform(&self) -> RigidTransform {
        self.offset.to_transform()
    }
}
