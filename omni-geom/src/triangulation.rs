use float_ord::FloatOrd;
use omni_core::{
    nalgebra::{DMatrix, Matrix6x4, RowVector4, UnitVector3, Vector3, Vector4},
    Projective, ProjectionMatrix, TriangulatorObservations, TriangulatorProjective, WorldPoint,
    WorldToCamera,
};

/// Based on the linear triangulation method (section 12.2) from "Multiple View Geometry in
/// Computer Vision, Second Edition".
///
/// Each view contributes the three rows of `bearing × (P * X) = 0`. All three are kept since
/// a bearing on the sphere has no preferred image plane to drop a row against. The
/// homogeneous point is the right singular vector of the smallest singular value.
///
/// The point is never rejected. When the rays are parallel the fourth coordinate is near zero,
/// and converting it with [`Projective::euclidean`] gives huge or non-finite coordinates.
///
/// ```
/// use omni_core::nalgebra::{Point3, Rotation3, Vector3};
/// use omni_core::{CameraPoint, CameraToCamera, Pose, Projective, TriangulatorRelative};
/// use omni_geom::triangulation::DltTriangulator;
///
/// let point = CameraPoint::from_point(Point3::new(0.3, 0.1, -2.0));
/// let pose = CameraToCamera::from_parts(Vector3::new(0.1, 0.1, 0.1), Rotation3::new(Vector3::new(0.1, 0.1, 0.1)));
/// let bearing_a = point.bearing();
/// let bearing_b = pose.transform(point).bearing();
/// let triangulated = DltTriangulator::new().triangulate_relative(pose, bearing_a, bearing_b).unwrap();
/// let distance = (point.point().unwrap().coords - triangulated.point().unwrap().coords).norm();
/// assert!(distance < 1e-6);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct DltTriangulator {
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl DltTriangulator {
    /// Creates a `DltTriangulator` with default values.
    ///
    /// Same as calling [`Default::default`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the epsilon used in the SVD solver.
    ///
    /// Default is `1e-12`.
    #[must_use]
    pub fn epsilon(self, epsilon: f64) -> Self {
        Self { epsilon, ..self }
    }

    /// Set the maximum number of iterations for the SVD solver.
    ///
    /// Default is `0`, which iterates until convergence.
    #[must_use]
    pub fn max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    /// Triangulates the euclidean point seen along bearing `a` by the camera `a_projection` and
    /// along bearing `b` by the camera `b_projection`.
    ///
    /// The fourth homogeneous coordinate is divided out without any check. Use
    /// [`TriangulatorProjective::triangulate_projective`] to detect points at infinity.
    pub fn triangulate(
        &self,
        a_projection: &ProjectionMatrix,
        a: UnitVector3<f64>,
        b_projection: &ProjectionMatrix,
        b: UnitVector3<f64>,
    ) -> Option<Vector3<f64>> {
        self.triangulate_projective(a_projection, a, b_projection, b)
            .map(Projective::euclidean)
    }
}

impl Default for DltTriangulator {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            max_iterations: 0,
        }
    }
}

impl TriangulatorProjective for DltTriangulator {
    fn triangulate_projective(
        &self,
        a_projection: &ProjectionMatrix,
        a: UnitVector3<f64>,
        b_projection: &ProjectionMatrix,
        b: UnitVector3<f64>,
    ) -> Option<WorldPoint> {
        let mut design = Matrix6x4::zeros();
        let rows = ray_constraints(a_projection, &a)
            .into_iter()
            .chain(ray_constraints(b_projection, &b));
        for (ix, row) in rows.enumerate() {
            design.row_mut(ix).copy_from(&row);
        }

        let svd = design.try_svd(false, true, self.epsilon, self.max_iterations)?;
        let v_t = svd.v_t?;
        let ix = smallest(svd.singular_values.as_slice())?;
        Some(sign_normalized(v_t.row(ix).transpose()))
    }
}

impl TriangulatorObservations for DltTriangulator {
    /// Stacks three rows per observation. Returns `None` with fewer than two observations.
    fn triangulate_observations(
        &self,
        pairs: impl Iterator<Item = (WorldToCamera, UnitVector3<f64>)> + Clone,
    ) -> Option<WorldPoint> {
        let count = pairs.clone().count();
        if count < 2 {
            return None;
        }

        let mut design = DMatrix::zeros(3 * count, 4);
        for (view, (pose, bearing)) in pairs.enumerate() {
            let projection = ProjectionMatrix::from(pose);
            for (ix, row) in ray_constraints(&projection, &bearing).iter().enumerate() {
                design.row_mut(3 * view + ix).copy_from(row);
            }
        }

        let svd = design.try_svd(false, true, self.epsilon, self.max_iterations)?;
        let v_t = svd.v_t?;
        let ix = smallest(svd.singular_values.as_slice())?;
        Some(sign_normalized(Vector4::from_iterator(
            v_t.row(ix).iter().copied(),
        )))
    }
}

/// The rows of `[bearing]ₓ * P`.
fn ray_constraints(
    projection: &ProjectionMatrix,
    bearing: &UnitVector3<f64>,
) -> [RowVector4<f64>; 3] {
    let p = &projection.0;
    let x = bearing.into_inner();
    [
        p.row(2) * x[1] - p.row(1) * x[2],
        p.row(0) * x[2] - p.row(2) * x[0],
        p.row(1) * x[0] - p.row(0) * x[1],
    ]
}

fn smallest(singular_values: &[f64]) -> Option<usize> {
    singular_values
        .iter()
        .enumerate()
        .min_by_key(|&(_, &n)| FloatOrd(n))
        .map(|(ix, _)| ix)
}

/// Flips the homogeneous point so that its fourth coordinate is non-negative.
fn sign_normalized(homogeneous: Vector4<f64>) -> WorldPoint {
    if homogeneous.w < 0.0 {
        WorldPoint(-homogeneous)
    } else {
        WorldPoint(homogeneous)
    }
}
