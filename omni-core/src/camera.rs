use crate::{ImagePoint, KeyPoint};
use nalgebra::UnitVector3;

/// Converts between a pixel of an image and the bearing of the light that hit it.
///
/// For a spherical camera every pixel maps onto the unit sphere, including the directions
/// behind the camera, so `calibrate` never fails.
pub trait CameraModel {
    /// Extracts a bearing from a pixel location in an image.
    fn calibrate<P>(&self, point: P) -> UnitVector3<f64>
    where
        P: ImagePoint;

    /// Extracts the pixel location in the image from the bearing.
    ///
    /// This is fallible, since not every camera model covers every bearing.
    fn uncalibrate(&self, bearing: UnitVector3<f64>) -> Option<KeyPoint>;
}
