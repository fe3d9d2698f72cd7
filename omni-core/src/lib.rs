//! # Omni Core
//!
//! This library provides the common abstractions and types for relative pose geometry between
//! spherical (omnidirectional) cameras. All of the `omni-*` crates depend on it, which lets the
//! camera model, the solvers, and the triangulators work with each other through the types and
//! traits specified here. This includes bearings, poses, projection matrices, keypoints, and the
//! contract consumed by robust estimation drivers.
//!
//! The crate is `#![no_std]` and only requires an allocator for [`PointFittingKernel`], which owns
//! its correspondences. Downstream crates use `libm` (through `num-traits` and `nalgebra`) for
//! all math that isn't present in `core`.
//!
//! ## Bearings
//!
//! A spherical camera sees in every direction. A pixel of an equirectangular image therefore does
//! not map onto a virtual image plane like it does for a pinhole camera, but onto a point on the
//! unit sphere around the optical center. That unit vector is called a bearing and is represented
//! as [`nalgebra::UnitVector3`]. Bearings are allowed to point behind the camera.
//!
//! ## Estimation
//!
//! Solvers and error metrics are composed into a [`Kernel`], which is the contract that an external
//! robust estimation driver (RANSAC, ARRSAC, a-contrario) uses to fit candidate models on sample
//! subsets and score them against every correspondence. The kernel owns the correspondences and
//! never mutates them, so it can be shared between driver threads. Solvers also implement
//! [`sample_consensus::Estimator`], so any [`sample_consensus::Consensus`] implementation can
//! drive them directly.
//!
//! ## Triangulation
//!
//! Once the relative pose is known, the bearing of the same feature observed in both cameras is
//! used to recover the 3d point. The bearings rarely intersect exactly, so triangulators solve a
//! least squares problem instead.
//!
//! - `p` the point we are trying to triangulate
//! - `a` the bearing on camera A
//! - `b` the bearing on camera B
//! - `O` the optical center of a camera
//!
//! ```text
//!               p-----------b-----O
//!              /
//!             /
//!            a
//!           /
//!          O
//! ```

#![no_std]

extern crate alloc;

mod camera;
mod error;
mod kernel;
mod keypoint;
mod matches;
mod point;
mod pose;
mod projection;
mod triangulation;

pub use camera::*;
pub use error::*;
pub use kernel::*;
pub use keypoint::*;
pub use matches::*;
pub use nalgebra;
pub use point::*;
pub use pose::*;
pub use projection::*;
pub use sample_consensus;
pub use triangulation::*;
