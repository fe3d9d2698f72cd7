use crate::{Error, FeatureMatch};
use alloc::vec::Vec;
use log::debug;
use nalgebra::UnitVector3;
use sample_consensus::{Estimator, Model};

/// An [`Estimator`] which also states how many models it may produce and whether it can
/// weight its data.
pub trait Solver<Data>: Estimator<Data> {
    /// The maximum number of models produced by a single call to [`Estimator::estimate`].
    const MAX_MODELS: usize;

    /// Same as [`Estimator::estimate`], but every datum carries a weight.
    ///
    /// Solvers that cannot weight their data return [`Error::UnsupportedOperation`].
    fn estimate_weighted<I>(&self, data: I, weights: &[f64]) -> Result<Self::ModelIter, Error>
    where
        I: Iterator<Item = Data> + Clone;
}

/// Scores how well a single datum agrees with a model. Smaller is better.
pub trait ErrorMetric<M, Data> {
    fn error(&self, model: &M, data: &Data) -> f64;
}

/// Uses the [`Model::residual`] of the model as the error.
#[derive(Copy, Clone, Debug, Default)]
pub struct Residual;

impl<M, Data> ErrorMetric<M, Data> for Residual
where
    M: Model<Data>,
{
    fn error(&self, model: &M, data: &Data) -> f64 {
        model.residual(data)
    }
}

/// The contract between a model fitting problem and a robust estimation driver.
///
/// The driver decides which samples to fit and how to score the resulting errors.
/// A kernel only fits and measures, and never mutates its data, so `&Kernel` may be
/// shared between driver threads.
pub trait Kernel {
    type Model;
    type ModelIter: IntoIterator<Item = Self::Model>;

    /// The minimum number of samples [`Kernel::fit`] needs.
    fn min_samples(&self) -> usize;

    /// The maximum number of models [`Kernel::fit`] can return.
    fn max_models(&self) -> usize;

    /// The total number of data the kernel holds.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fits models to the data at `samples`, which index into the whole data set.
    fn fit(&self, samples: &[usize]) -> Self::ModelIter;

    /// The error of the datum at `index` under `model`.
    fn error(&self, model: &Self::Model, index: usize) -> f64;
}

/// A [`Kernel`] composed from a solver `S`, an error metric `M`, and the data `D` they act on.
///
/// ```
/// use omni_core::{Kernel, PointFittingKernel, Residual, Solver, Error};
/// use omni_core::sample_consensus::{Estimator, Model};
///
/// struct Offset(f64);
///
/// impl Model<f64> for Offset {
///     fn residual(&self, data: &f64) -> f64 {
///         (data - self.0).abs()
///     }
/// }
///
/// struct First;
///
/// impl Estimator<f64> for First {
///     type Model = Offset;
///     type ModelIter = Option<Offset>;
///     const MIN_SAMPLES: usize = 1;
///
///     fn estimate<I>(&self, mut data: I) -> Option<Offset>
///     where
///         I: Iterator<Item = f64> + Clone,
///     {
///         data.next().map(Offset)
///     }
/// }
///
/// impl Solver<f64> for First {
///     const MAX_MODELS: usize = 1;
///
///     fn estimate_weighted<I>(&self, _: I, _: &[f64]) -> Result<Option<Offset>, Error>
///     where
///         I: Iterator<Item = f64> + Clone,
///     {
///         Err(Error::UnsupportedOperation { solver: "First" })
///     }
/// }
///
/// let kernel = PointFittingKernel::new(First, Residual, vec![1.0, 4.0, 6.0]);
/// let model = kernel.fit(&[1]).unwrap();
/// assert_eq!(kernel.error(&model, 2), 2.0);
/// ```
#[derive(Clone, Debug)]
pub struct PointFittingKernel<S, M, D> {
    solver: S,
    metric: M,
    data: Vec<D>,
}

impl<S, M, D> PointFittingKernel<S, M, D> {
    /// Takes ownership of `data` for the lifetime of the kernel.
    pub fn new(solver: S, metric: M, data: Vec<D>) -> Self {
        debug!("creating point fitting kernel over {} data", data.len());
        Self {
            solver,
            metric,
            data,
        }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    pub fn data(&self) -> &[D] {
        &self.data
    }
}

impl<S, M> PointFittingKernel<S, M, FeatureMatch> {
    /// Builds the kernel from two sequences of bearings paired by index.
    pub fn from_bearings(
        solver: S,
        metric: M,
        a: &[UnitVector3<f64>],
        b: &[UnitVector3<f64>],
    ) -> Result<Self, Error> {
        let matches = FeatureMatch::zip(a, b).ok_or(Error::MismatchedCorrespondences {
            left: a.len(),
            right: b.len(),
        })?;
        Ok(Self::new(solver, metric, matches.collect()))
    }
}

impl<S, M, D> Kernel for PointFittingKernel<S, M, D>
where
    S: Solver<D>,
    M: ErrorMetric<S::Model, D>,
    D: Clone,
{
    type Model = S::Model;
    type ModelIter = S::ModelIter;

    fn min_samples(&self) -> usize {
        S::MIN_SAMPLES
    }

    fn max_models(&self) -> usize {
        S::MAX_MODELS
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    /// # Panics
    ///
    /// Panics if fewer than [`Kernel::min_samples`] samples are given or if a sample is out of range.
    fn fit(&self, samples: &[usize]) -> S::ModelIter {
        assert!(
            samples.len() >= S::MIN_SAMPLES,
            "fit needs at least {} samples, got {}",
            S::MIN_SAMPLES,
            samples.len()
        );
        self.solver
            .estimate(samples.iter().map(|&ix| self.data[ix].clone()))
    }

    fn error(&self, model: &S::Model, index: usize) -> f64 {
        self.metric.error(model, &self.data[index])
    }
}
