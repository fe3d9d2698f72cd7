//! The eight-point algorithm for spherical cameras.
//!
//! Spherical cameras produce bearings on the whole unit sphere rather than points on an image
//! plane, so the epipolar constraint is encoded directly with the bearings instead of
//! normalized image coordinates. This also means no point is ever "behind" the camera.

#![no_std]

extern crate alloc;

mod kernel;

pub use kernel::*;

use arrayvec::ArrayVec;
use float_ord::FloatOrd;
use log::{trace, warn};
use omni_core::{
    nalgebra::{DMatrix, Matrix3, UnitVector3},
    sample_consensus::Estimator,
    Error, FeatureMatch, Solver,
};
use omni_equirect::EssentialMatrix;

/// Number of entries of the essential matrix.
const UNKNOWNS: usize = 9;
const MIN_SAMPLES: usize = 8;

/// One row per match. The system is padded with zero rows up to a square 9x9 matrix so that the
/// full right singular basis is available in the minimal case.
fn encode_epipolar_equation(matches: impl Iterator<Item = FeatureMatch> + Clone) -> DMatrix<f64> {
    let count = matches.clone().count();
    let mut out = DMatrix::zeros(count.max(UNKNOWNS), UNKNOWNS);
    for (i, FeatureMatch(a, b)) in matches.enumerate() {
        let a = a.into_inner();
        let b = b.into_inner();
        for j in 0..3 {
            for k in 0..3 {
                out[(i, 3 * j + k)] = a[j] * b[k];
            }
        }
    }
    out
}

/// Performs the
/// [eight-point algorithm](https://en.wikipedia.org/wiki/Eight-point_algorithm)
/// by Richard Hartley and Andrew Zisserman on the bearings of two spherical cameras.
///
/// Each call produces exactly one essential matrix, which is never rejected. When more than
/// eight matches are given, the least squares solution is projected onto the essential
/// manifold with [`EssentialMatrix::recondition`]. Quality control of the result is left to
/// the residual and the consensus algorithm using it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EightPoint {
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl EightPoint {
    /// Creates an `EightPoint` with default values.
    ///
    /// Same as calling [`Default::default`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the epsilon used in the singular value decomposition.
    ///
    /// Default is `1e-12`.
    #[must_use]
    pub fn epsilon(self, epsilon: f64) -> Self {
        Self { epsilon, ..self }
    }

    /// Set the maximum number of iterations of the singular value decomposition.
    ///
    /// Default is `0`, which iterates until convergence. Any other value may cause
    /// [`EightPoint::from_matches`] to return `None`.
    #[must_use]
    pub fn max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    /// Solves for the essential matrix satisfying `transpose(b) * E * a = 0` for every match.
    ///
    /// # Panics
    ///
    /// Panics if fewer than eight matches are given.
    pub fn from_matches<I>(&self, data: I) -> Option<EssentialMatrix>
    where
        I: Iterator<Item = FeatureMatch> + Clone,
    {
        let count = data.clone().count();
        assert!(
            count >= MIN_SAMPLES,
            "the eight-point algorithm needs at least {} matches, got {}",
            MIN_SAMPLES,
            count
        );
        trace!("solving the epipolar equation of {} matches", count);

        let epipolar_constraint = encode_epipolar_equation(data);
        let svd = epipolar_constraint.try_svd(false, true, self.epsilon, self.max_iterations)?;
        let v_t = svd.v_t?;

        // The right singular vector of the smallest singular value spans the null space.
        let nullspace = svd
            .singular_values
            .iter()
            .enumerate()
            .min_by_key(|&(_, &n)| FloatOrd(n))
            .map(|(ix, _)| v_t.row(ix).into_owned())?;
        let essential = EssentialMatrix(Matrix3::from_iterator(nullspace.iter().copied()));

        if count == MIN_SAMPLES {
            return Some(essential);
        }
        match essential.recondition(self.epsilon, self.max_iterations) {
            Some(reconditioned) => Some(reconditioned),
            None => {
                warn!("failed to recondition the essential matrix of {} matches", count);
                Some(essential)
            }
        }
    }

    /// Same as [`EightPoint::from_matches`], but takes the two views' bearings as separate
    /// slices paired by index.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length or hold fewer than eight bearings.
    pub fn from_bearings(
        &self,
        a: &[UnitVector3<f64>],
        b: &[UnitVector3<f64>],
    ) -> Option<EssentialMatrix> {
        assert_eq!(
            a.len(),
            b.len(),
            "both views must have the same number of bearings"
        );
        self.from_matches(a.iter().zip(b).map(|(&a, &b)| FeatureMatch(a, b)))
    }

    /// Weighted solving is not supported by the eight-point algorithm.
    ///
    /// This always returns [`Error::UnsupportedOperation`].
    pub fn from_weighted_matches<I>(
        &self,
        _data: I,
        _weights: &[f64],
    ) -> Result<EssentialMatrix, Error>
    where
        I: Iterator<Item = FeatureMatch> + Clone,
    {
        Err(Error::UnsupportedOperation {
            solver: "EightPoint",
        })
    }
}

impl Default for EightPoint {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            max_iterations: 0,
        }
    }
}

impl Estimator<FeatureMatch> for EightPoint {
    type Model = EssentialMatrix;
    type ModelIter = ArrayVec<EssentialMatrix, 1>;
    const MIN_SAMPLES: usize = MIN_SAMPLES;

    fn estimate<I>(&self, data: I) -> Self::ModelIter
    where
        I: Iterator<Item = FeatureMatch> + Clone,
    {
        self.from_matches(data).into_iter().collect()
    }
}

impl Solver<FeatureMatch> for EightPoint {
    const MAX_MODELS: usize = 1;

    fn estimate_weighted<I>(&self, data: I, weights: &[f64]) -> Result<Self::ModelIter, Error>
    where
        I: Iterator<Item = FeatureMatch> + Clone,
    {
        self.from_weighted_matches(data, weights)
            .map(|essential| [essential].into())
    }
}
