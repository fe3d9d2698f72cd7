use log::{debug, trace};
use omni_core::{CameraToCamera, FeatureMatch, Pose, Projective, TriangulatorRelative};
use omni_equirect::EssentialMatrix;

/// Picks the relative pose out of the four that `essential` decomposes into.
///
/// Every match is triangulated under each candidate pose, and a point counts when its direction
/// agrees with the bearing in both cameras. The candidate with the most such points wins. The
/// translation of the returned pose has unit length.
///
/// Returns `None` if the decomposition fails or no candidate agrees with any match.
///
/// ```
/// use omni_core::nalgebra::{Point3, Rotation3, Vector3};
/// use omni_core::{CameraPoint, CameraToCamera, FeatureMatch, Pose, Projective};
/// use omni_equirect::EssentialMatrix;
/// use omni_geom::{relative_pose::select_pose, triangulation::DltTriangulator};
///
/// let pose = CameraToCamera::from_parts(Vector3::new(0.0, 0.0, 1.0), Rotation3::identity());
/// let matches = [
///     Point3::new(1.0, 0.5, 3.0),
///     Point3::new(-2.0, 1.0, -1.0),
///     Point3::new(0.5, -3.0, 2.0),
/// ]
/// .map(|p| {
///     let a = CameraPoint::from_point(p);
///     FeatureMatch(a.bearing(), pose.transform(a).bearing())
/// });
/// let selected = select_pose(
///     &DltTriangulator::new(),
///     &EssentialMatrix::from(pose),
///     matches.iter().copied(),
/// )
/// .unwrap();
/// assert!((selected.0.translation.vector - Vector3::z()).norm() < 1e-9);
/// ```
pub fn select_pose<T>(
    triangulator: &T,
    essential: &EssentialMatrix,
    matches: impl Iterator<Item = FeatureMatch> + Clone,
) -> Option<CameraToCamera>
where
    T: TriangulatorRelative,
{
    let poses = essential.possible_unscaled_poses(1e-12, 0)?;
    let (pose, count) = poses
        .iter()
        .map(|&pose| {
            let count = matches
                .clone()
                .filter(|&FeatureMatch(a, b)| {
                    triangulator
                        .triangulate_relative(pose, a, b)
                        .map(|point| {
                            point.bearing().dot(&a) > 0.0
                                && pose.transform(point).bearing().dot(&b) > 0.0
                        })
                        .unwrap_or(false)
                })
                .count();
            trace!("{} matches agree with candidate pose {:?}", count, pose);
            (pose, count)
        })
        .max_by_key(|&(_, count)| count)?;
    debug!("selected relative pose agreeing with {} matches", count);
    if count == 0 {
        None
    } else {
        Some(pose)
    }
}
