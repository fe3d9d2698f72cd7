use crate::{CameraToCamera, Pose, Projective, WorldPoint, WorldToCamera};
use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use nalgebra::{Matrix3x4, Vector3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A calibrated 3x4 camera matrix `[R | t]`.
///
/// Multiplying a homogeneous [`WorldPoint`] by this matrix gives a vector pointing from the
/// optical center of the camera towards the point. For a spherical camera there is no image
/// plane, so this vector is only meaningful up to a positive scale (its direction is the bearing).
#[derive(Debug, Clone, Copy, PartialEq, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ProjectionMatrix(pub Matrix3x4<f64>);

impl ProjectionMatrix {
    /// The camera located at the world origin, looking down the world axes.
    pub fn identity() -> Self {
        Self(Matrix3x4::identity())
    }

    /// Project the point into the camera, giving the unnormalized bearing towards the point.
    pub fn project(&self, point: WorldPoint) -> Vector3<f64> {
        self.0 * point.homogeneous()
    }
}

impl From<WorldToCamera> for ProjectionMatrix {
    fn from(pose: WorldToCamera) -> Self {
        Self(pose.homogeneous().fixed_rows::<3>(0).into_owned())
    }
}

impl From<CameraToCamera> for ProjectionMatrix {
    /// The projection matrix of camera `B` when camera `A` is treated as the world.
    fn from(pose: CameraToCamera) -> Self {
        WorldToCamera::from(pose).into()
    }
}
