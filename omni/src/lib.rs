//! # `omni`
//!
//! Batteries-included relative pose estimation for spherical (360°) cameras
//!
//! This crate should only be used for documentation/reference and for quickly running a
//! spherical relative pose routine. If you are making a production application, import the
//! dependencies from this crate individually so that you don't have an explosive number of
//! dependencies.
//!
//! All of the basic types are included in the root of the crate. The typical flow is:
//!
//! 1. Convert the pixels of both equirectangular images into bearings with
//!    [`camera::equirect::planar_to_spherical`].
//! 2. Build an [`estimate::EssentialKernel`] over the bearing correspondences, or feed
//!    [`estimate::EightPoint`] directly to a consensus algorithm like
//!    [`consensus::Arrsac`].
//! 3. Pick the relative pose out of the essential matrix with [`geom::select_pose`].
//! 4. Triangulate the matches with [`geom::DltTriangulator`].
//!
//! ## Modules
//! * [`camera`] - the equirectangular camera model to convert pixels into bearings (and back)
//! * [`consensus`] - finding the best estimated model from noisy data
//! * [`estimate`] - estimation of models from data
//! * [`geom`] - triangulation and relative pose selection

#![no_std]

pub use omni_core::{sample_consensus::*, *};

/// Camera models
pub mod camera {
    /// The equirectangular camera model of spherical panoramas
    #[cfg(feature = "omni-equirect")]
    pub use omni_equirect as equirect;
}

/// Consensus algorithms (RANSAC)
pub mod consensus {
    #[cfg(feature = "arrsac")]
    pub use arrsac::Arrsac;
}

/// Estimation algorithms
pub mod estimate {
    #[cfg(feature = "omni-eight-point")]
    pub use omni_eight_point::{essential_kernel, EightPoint, EssentialKernel};
    #[cfg(feature = "omni-equirect")]
    pub use omni_equirect::{AngularError, EssentialMatrix};
}

/// Computational geometry
pub mod geom {
    #[cfg(feature = "omni-geom")]
    pub use omni_geom::{relative_pose::select_pose, triangulation::DltTriangulator};
}
