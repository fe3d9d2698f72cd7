use crate::{CameraPoint, CameraToCamera, Pose, ProjectionMatrix, WorldPoint, WorldToCamera};
use core::iter::once;
use nalgebra::UnitVector3;

/// Triangulates a point from two views given their projection matrices and the bearing observed
/// in each of them.
///
/// The result is homogeneous and is never rejected. When the rays are parallel the fourth
/// coordinate will be near zero, and it is up to the caller to handle that.
pub trait TriangulatorProjective {
    fn triangulate_projective(
        &self,
        a_projection: &ProjectionMatrix,
        a: UnitVector3<f64>,
        b_projection: &ProjectionMatrix,
        b: UnitVector3<f64>,
    ) -> Option<WorldPoint>;
}

/// Triangulates a point from two or more observations.
/// Each observation is a [`WorldToCamera`] and the bearing seen from that camera.
pub trait TriangulatorObservations {
    fn triangulate_observations(
        &self,
        pairs: impl Iterator<Item = (WorldToCamera, UnitVector3<f64>)> + Clone,
    ) -> Option<WorldPoint>;
}

/// Takes one relative pose from camera `A` to camera `B` and two bearings `a` and `b` from
/// their respective cameras to triangulate a point from the perspective of camera `A`.
pub trait TriangulatorRelative {
    fn triangulate_relative(
        &self,
        relative_pose: CameraToCamera,
        a: UnitVector3<f64>,
        b: UnitVector3<f64>,
    ) -> Option<CameraPoint>;
}

impl<T> TriangulatorRelative for T
where
    T: TriangulatorObservations,
{
    fn triangulate_relative(
        &self,
        relative_pose: CameraToCamera,
        a: UnitVector3<f64>,
        b: UnitVector3<f64>,
    ) -> Option<CameraPoint> {
        // Camera `A` is the world, so its pose is the identity.
        let b_pose = WorldToCamera::from(relative_pose);
        self.triangulate_observations(
            once((WorldToCamera::identity(), a)).chain(once((b_pose, b))),
        )
        .map(|p| CameraPoint(p.0))
    }
}
