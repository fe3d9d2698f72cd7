use nalgebra::UnitVector3;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A correspondence between the bearing of a feature in camera `A` and the bearing
/// of the same feature in camera `B`.
///
/// A correspondence set is a sequence of these, paired by index.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct FeatureMatch(pub UnitVector3<f64>, pub UnitVector3<f64>);

impl FeatureMatch {
    /// Pairs two equal-length sequences of bearings by index.
    ///
    /// Returns `None` if the sequences have a different length.
    pub fn zip<'a>(
        a: &'a [UnitVector3<f64>],
        b: &'a [UnitVector3<f64>],
    ) -> Option<impl Iterator<Item = FeatureMatch> + Clone + 'a> {
        if a.len() != b.len() {
            return None;
        }
        Some(a.iter().zip(b).map(|(&a, &b)| FeatureMatch(a, b)))
    }
}
