use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use nalgebra::{Point3, Unit, Vector3, Vector4};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// This trait is implemented for homogeneous projective 3d coordinates.
pub trait Projective: From<Vector4<f64>> + Clone + Copy {
    /// Retrieve the homogeneous vector.
    ///
    /// No constraints are put on this vector. All components can move freely and it is not normalized.
    /// However, this vector may be normalized if desired and it will still be equivalent to the original.
    fn homogeneous(self) -> Vector4<f64>;

    /// Create the coordinate from a homogeneous vector.
    fn from_homogeneous(homogeneous: Vector4<f64>) -> Self {
        homogeneous.into()
    }

    /// Retrieve the euclidean 3d point by normalizing the homogeneous coordinate.
    ///
    /// This may fail, as a homogeneous coordinate can exist at near-infinity (like a star in the sky),
    /// whereas a 3d euclidean point cannot (it would overflow).
    fn point(self) -> Option<Point3<f64>> {
        Point3::from_homogeneous(self.homogeneous())
    }

    /// Divide the first three coordinates by the fourth without checking it.
    ///
    /// A point at infinity produces huge or non-finite components here. Use [`Projective::point`]
    /// or inspect [`Projective::homogeneous`] when that needs to be detected.
    fn euclidean(self) -> Vector3<f64> {
        let homogeneous = self.homogeneous();
        homogeneous.xyz() / homogeneous.w
    }

    /// Convert the euclidean 3d point into homogeneous coordinates.
    fn from_point(point: Point3<f64>) -> Self {
        point.to_homogeneous().into()
    }

    /// Retrieve the normalized bearing of the coordinate.
    fn bearing(self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.bearing_unnormalized())
    }

    /// Retrieve the unnormalized bearing of the coordinate.
    ///
    /// A negative `w` flips the direction of the euclidean point, so it is accounted for here.
    fn bearing_unnormalized(self) -> Vector3<f64> {
        let homogeneous = self.homogeneous();
        if homogeneous.w < 0.0 {
            -homogeneous.xyz()
        } else {
            homogeneous.xyz()
        }
    }
}

/// A 3d point which is relative to the optical center and orientation of a spherical camera.
/// The unit of distance of a `CameraPoint` is unspecified and relative to the current
/// reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraPoint(pub Vector4<f64>);

impl Projective for CameraPoint {
    fn homogeneous(self) -> Vector4<f64> {
        self.into()
    }
}

/// A point in "world" coordinates.
///
/// The real-world units are unknown, since relative pose estimation only recovers the
/// translation up to scale. The unit of distance and orientation are those of the
/// reconstruction the point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct WorldPoint(pub Vector4<f64>);

impl Projective for WorldPoint {
    fn homogeneous(self) -> Vector4<f64> {
        self.into()
    }
}
