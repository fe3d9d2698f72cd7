//! This crate plugs into `omni-core` and provides the equirectangular camera model used by
//! spherical (360°) panoramas. It converts pixel coordinates into bearings on the unit sphere
//! and back. It also holds the [`EssentialMatrix`] between two spherical cameras and the
//! [`AngularError`] metric used to score it.
//!
//! The horizontal axis of an equirectangular image spans the full `2π` of longitude and the
//! vertical axis spans `π` of latitude, from the top pole (`y = 0`) to the bottom pole
//! (`y = height`). The `+y` axis of the bearing points to the top pole.

#![no_std]

extern crate alloc;

mod essential;

pub use essential::*;

use alloc::vec::Vec;
use core::f64::consts::PI;
use num_traits::Float;
use omni_core::nalgebra::{Point2, UnitVector3, Vector3};
use omni_core::{CameraModel, ImagePoint, KeyPoint};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// An equirectangular projection of the full sphere onto a `width` x `height` image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct EquirectangularCamera {
    pub width: u32,
    pub height: u32,
}

impl EquirectangularCamera {
    /// Both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "image dimensions must be non-zero");
        Self { width, height }
    }
}

impl CameraModel for EquirectangularCamera {
    /// Maps a pixel onto the unit sphere.
    ///
    /// ```
    /// use omni_core::CameraModel;
    /// use omni_core::nalgebra::Point2;
    /// use omni_equirect::EquirectangularCamera;
    ///
    /// let camera = EquirectangularCamera::new(3600, 1800);
    /// let bearing = camera.calibrate(Point2::new(1800.0, 900.0));
    /// assert!((bearing.z + 1.0).abs() < 1e-12);
    /// ```
    fn calibrate<P>(&self, point: P) -> UnitVector3<f64>
    where
        P: ImagePoint,
    {
        let point = point.image_point();
        let u = point.x / f64::from(self.width);
        let v = point.y / f64::from(self.height);
        let (sin_lat, cos_lat) = Float::sin_cos(v * PI);
        let (sin_lon, cos_lon) = Float::sin_cos(PI * (2.0 * u + 0.5));
        UnitVector3::new_normalize(Vector3::new(
            sin_lat * cos_lon,
            cos_lat,
            sin_lat * sin_lon,
        ))
    }

    /// Maps a bearing back onto the image.
    ///
    /// The horizontal coordinate is wrapped into `[0, width)`. At the poles the longitude is
    /// undefined and an arbitrary column is returned. Only non-finite bearings give `None`.
    fn uncalibrate(&self, bearing: UnitVector3<f64>) -> Option<KeyPoint> {
        let bearing = bearing.into_inner();
        if !bearing.iter().all(|n| n.is_finite()) {
            return None;
        }
        let v = Float::acos(bearing.y.clamp(-1.0, 1.0)) / PI;
        let u = (Float::atan2(bearing.z, bearing.x) / PI - 0.5) / 2.0;
        Some(KeyPoint(Point2::new(
            wrap_column(u, self.width),
            v * f64::from(self.height),
        )))
    }
}

/// Maps a horizontal image fraction of any value into the column range `[0, width)`.
fn wrap_column(u: f64, width: u32) -> f64 {
    let width = f64::from(width);
    let x = (u - Float::floor(u)) * width;
    // Fractions within rounding of one land on the width itself.
    if x >= width {
        0.0
    } else {
        x
    }
}

/// Converts pixel coordinates of a `width` x `height` equirectangular image into bearings on the
/// unit sphere, preserving their order.
pub fn planar_to_spherical<P>(
    points: impl IntoIterator<Item = P>,
    width: u32,
    height: u32,
) -> Vec<UnitVector3<f64>>
where
    P: ImagePoint,
{
    let camera = EquirectangularCamera::new(width, height);
    points
        .into_iter()
        .map(|point| camera.calibrate(point))
        .collect()
}
