use crate::EightPoint;
use omni_core::{nalgebra::UnitVector3, Error, FeatureMatch, PointFittingKernel};
use omni_equirect::AngularError;

/// Estimates the essential matrix between two spherical cameras with [`EightPoint`] and scores
/// it with [`AngularError`].
///
/// This is what a consensus driver samples from: it fits on the indices it is given and
/// measures the error of any stored match.
pub type EssentialKernel = PointFittingKernel<EightPoint, AngularError, FeatureMatch>;

/// Builds an [`EssentialKernel`] with a default [`EightPoint`] from the bearings of two views
/// paired by index.
///
/// Returns [`Error::MismatchedCorrespondences`] if the views hold a different number of bearings.
pub fn essential_kernel(
    a: &[UnitVector3<f64>],
    b: &[UnitVector3<f64>],
) -> Result<EssentialKernel, Error> {
    PointFittingKernel::from_bearings(EightPoint::new(), AngularError, a, b)
}
