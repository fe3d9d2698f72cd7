use core::f64::consts::FRAC_PI_2;
use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use num_traits::Float;
use omni_core::{
    nalgebra::{Matrix3, Rotation3, UnitVector3, Vector3, SVD},
    sample_consensus::Model,
    CameraToCamera, ErrorMetric, FeatureMatch, Pose,
};

/// This stores an essential matrix, which is satisfied by the following constraint:
///
/// transpose(b) * E * a = 0
///
/// Where `a` and `b` are the bearings of the same feature seen from spherical cameras `A`
/// and `B`. The matrix is only defined up to scale and sign.
///
/// `E * a` is the normal of the epipolar plane that contains the optical centers of both
/// cameras and the bearing `a`. Every bearing in camera `B` that observes a point along `a`
/// lies on that plane, so it is perpendicular to the normal. For a pinhole camera this is
/// usually measured as a distance to the epipolar line on the image, but bearings of a
/// spherical camera cover the whole sphere, so the angle between `b` and the epipolar plane
/// is used instead (see [`AngularError`]).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
pub struct EssentialMatrix(pub Matrix3<f64>);

impl EssentialMatrix {
    /// Projects the matrix onto the essential manifold, which enforces rank 2 and two equal
    /// singular values.
    ///
    /// This finds the closest essential matrix in frobenius norm: the two largest singular
    /// values are averaged and the smallest one is forced to zero. It is a linear
    /// approximation and does not iterate.
    ///
    /// `max_iterations` of `0` lets the singular value decomposition run until it converges.
    pub fn recondition(self, epsilon: f64, max_iterations: usize) -> Option<Self> {
        // The singular values come back sorted in decreasing order.
        let mut svd = self.try_svd(true, true, epsilon, max_iterations)?;
        let new_singular = (svd.singular_values[0] + svd.singular_values[1]) / 2.0;
        svd.singular_values[0] = new_singular;
        svd.singular_values[1] = new_singular;
        svd.singular_values[2] = 0.0;
        svd.recompose().ok().map(Self)
    }

    /// The angle between `b` and the epipolar plane of `a`, in `[0, π/2]`.
    ///
    /// When `E * a` vanishes there is no epipolar plane and the maximum error is returned.
    pub fn angular_residual(&self, a: &UnitVector3<f64>, b: &UnitVector3<f64>) -> f64 {
        let normal = match (self.0 * a.into_inner()).try_normalize(0.0) {
            Some(normal) => normal,
            None => return FRAC_PI_2,
        };
        let sine = b.dot(&normal) / (b.norm() * normal.norm());
        Float::abs(Float::asin(sine.clamp(-1.0, 1.0)))
    }

    /// Returns two possible rotations for the essential matrix along with a translation
    /// bearing of arbitrary length. The translation's length is unknown and of unknown sign
    /// and must be solved for by using a prior, like the cheirality of triangulated points.
    ///
    /// `epsilon` is the threshold by which the singular value decomposition is considered
    /// complete. `max_iterations` caps the number of iterations; `0` runs until convergence.
    ///
    /// ```
    /// use omni_core::CameraToCamera;
    /// use omni_core::nalgebra::{IsometryMatrix3, Rotation3, Vector3};
    /// use omni_equirect::EssentialMatrix;
    /// let pose = CameraToCamera(IsometryMatrix3::from_parts(
    ///     Vector3::new(-0.8, 0.4, 0.5).into(),
    ///     Rotation3::from_euler_angles(0.2, 0.3, 0.4),
    /// ));
    /// let (rot_a, rot_b, t) = EssentialMatrix::from(pose)
    ///     .possible_rotations_unscaled_translation(1e-12, 0)
    ///     .unwrap();
    /// let a_close = (rot_a.matrix() - pose.0.rotation.matrix()).norm() < 1e-6;
    /// let b_close = (rot_b.matrix() - pose.0.rotation.matrix()).norm() < 1e-6;
    /// assert!(a_close || b_close);
    /// let t_res = 1.0 - t.normalize().dot(&pose.0.translation.vector.normalize()).abs();
    /// assert!(t_res < 1e-6);
    /// ```
    pub fn possible_rotations_unscaled_translation(
        &self,
        epsilon: f64,
        max_iterations: usize,
    ) -> Option<(Rotation3<f64>, Rotation3<f64>, Vector3<f64>)> {
        // `W` from https://en.wikipedia.org/wiki/Essential_matrix#Finding_one_solution.
        let w = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let wt = w.transpose();

        let svd = SVD::try_new(self.0, true, true, epsilon, max_iterations)?;
        let (mut u, mut v_t) = svd.u.zip(svd.v_t)?;

        // The last singular vectors are undetermined since d = (a a 0), so they can be
        // flipped to give both matrices a positive determinant.
        if u.determinant() < 0.0 {
            u.column_mut(2).neg_mut();
        }
        if v_t.determinant() < 0.0 {
            v_t.row_mut(2).neg_mut();
        }

        Some((
            Rotation3::from_matrix_unchecked(u * w * v_t),
            Rotation3::from_matrix_unchecked(u * wt * v_t),
            u.column(2).into_owned(),
        ))
    }

    /// See [`EssentialMatrix::possible_rotations_unscaled_translation`].
    ///
    /// This returns the four relative poses the matrix can decompose into.
    /// Exactly one of them places the observed points in front of both cameras.
    pub fn possible_unscaled_poses(
        &self,
        epsilon: f64,
        max_iterations: usize,
    ) -> Option<[CameraToCamera; 4]> {
        self.possible_rotations_unscaled_translation(epsilon, max_iterations)
            .map(|(rot_a, rot_b, t)| {
                [
                    CameraToCamera::from_parts(t, rot_a),
                    CameraToCamera::from_parts(t, rot_b),
                    CameraToCamera::from_parts(-t, rot_a),
                    CameraToCamera::from_parts(-t, rot_b),
                ]
            })
    }
}

/// Generates the essential matrix `[t]ₓ · R` corresponding to this relative camera pose.
///
/// If a point `a` is transformed using [`Pose::transform`] into a point `b`, then the
/// residual of their bearings under this essential matrix is approximately `0.0`.
impl From<CameraToCamera> for EssentialMatrix {
    fn from(pose: CameraToCamera) -> Self {
        Self(pose.0.translation.vector.cross_matrix() * *pose.0.rotation.matrix())
    }
}

impl Model<FeatureMatch> for EssentialMatrix {
    /// The angular error in radians (see [`AngularError`]).
    fn residual(&self, data: &FeatureMatch) -> f64 {
        let FeatureMatch(a, b) = data;
        self.angular_residual(a, b)
    }
}

/// Scores an essential matrix by the angle, in radians within `[0, π/2]`, between the bearing
/// in the second camera and the epipolar plane of the bearing in the first camera.
///
/// On the sphere the epipolar constraint is an orthogonality condition, so an angle is the
/// natural residual rather than a distance on an image plane.
#[derive(Copy, Clone, Debug, Default)]
pub struct AngularError;

impl ErrorMetric<EssentialMatrix, FeatureMatch> for AngularError {
    fn error(&self, model: &EssentialMatrix, data: &FeatureMatch) -> f64 {
        model.residual(data)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use omni_core::{CameraPoint, Projective};

    fn pose() -> CameraToCamera {
        CameraToCamera::from_parts(
            Vector3::new(0.4, -0.1, 0.9),
            Rotation3::from_euler_angles(0.3, -0.2, 0.5),
        )
    }

    #[test]
    fn recondition_equalizes_singular_values() {
        for _ in 0..100 {
            let mat = EssentialMatrix(Matrix3::new_random()).recondition(1e-12, 0).unwrap();
            let mut singular = [0.0; 3];
            singular.copy_from_slice(mat.0.singular_values().as_slice());
            singular.sort_unstable_by_key(|&n| float_ord::FloatOrd(-n));
            assert_relative_eq!(singular[0], singular[1], epsilon = 1e-9);
            assert!(singular[2].abs() < 1e-9);
        }
    }

    #[test]
    fn recondition_keeps_essential_matrix() {
        let essential = EssentialMatrix::from(pose());
        let reconditioned = essential.recondition(1e-12, 0).unwrap();
        assert_relative_eq!(essential.0, reconditioned.0, epsilon = 1e-9);
    }

    #[test]
    fn angular_error_vanishes_for_true_pose() {
        let pose = pose();
        let essential = EssentialMatrix::from(pose);
        // Spherical cameras see behind themselves, so points on every side are valid.
        for point in [
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-2.0, 0.5, -4.0),
            Vector3::new(0.3, -5.0, 0.2),
        ] {
            let a = CameraPoint::from_point(point.into());
            let b = pose.transform(a);
            let error = AngularError.error(&essential, &FeatureMatch(a.bearing(), b.bearing()));
            assert!(error < 1e-12, "error: {}", error);
        }
    }

    #[test]
    fn angular_error_is_the_angle_to_the_epipolar_plane() {
        // With `E = [z]ₓ`, the epipolar plane of `x` is the xz plane.
        let essential = EssentialMatrix::from(CameraToCamera::from_parts(
            Vector3::z(),
            Rotation3::identity(),
        ));
        let a = UnitVector3::new_normalize(Vector3::x());
        let b = UnitVector3::new_normalize(Vector3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(
            essential.angular_residual(&a, &b),
            core::f64::consts::FRAC_PI_4,
            epsilon = 1e-12
        );
        let b = UnitVector3::new_normalize(Vector3::y());
        assert_relative_eq!(essential.angular_residual(&a, &b), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn angular_error_is_bounded() {
        for _ in 0..100 {
            let essential = EssentialMatrix(Matrix3::new_random());
            let a = UnitVector3::new_normalize(Vector3::new_random() - Vector3::repeat(0.5));
            let b = UnitVector3::new_normalize(Vector3::new_random() - Vector3::repeat(0.5));
            let error = essential.residual(&FeatureMatch(a, b));
            assert!((0.0..=FRAC_PI_2).contains(&error));
        }
    }

    #[test]
    fn degenerate_matrix_gives_maximum_error() {
        let essential = EssentialMatrix(Matrix3::zeros());
        let z = UnitVector3::new_normalize(Vector3::z());
        assert_eq!(essential.residual(&FeatureMatch(z, z)), FRAC_PI_2);
    }

    #[test]
    fn bearing_along_translation_gives_maximum_error() {
        // `E * t` vanishes for `E = [t]ₓ`, so no epipolar plane exists.
        let essential = EssentialMatrix::from(CameraToCamera::from_parts(
            Vector3::z() * 2.0,
            Rotation3::identity(),
        ));
        let a = UnitVector3::new_normalize(Vector3::z());
        let b = UnitVector3::new_normalize(Vector3::x());
        assert_eq!(essential.angular_residual(&a, &b), FRAC_PI_2);
    }

    #[test]
    fn one_pose_is_correct() {
        let pose = pose();
        let poses = EssentialMatrix::from(pose).possible_unscaled_poses(1e-12, 0).unwrap();
        let one_correct = poses.iter().any(|upose| {
            let rotation_residual = (upose.0.rotation.matrix() - pose.0.rotation.matrix()).norm();
            let translation_residual = 1.0
                - upose
                    .0
                    .translation
                    .vector
                    .normalize()
                    .dot(&pose.0.translation.vector.normalize());
            rotation_residual < 1e-6 && translation_residual < 1e-6
        });
        assert!(one_correct);
    }
}
