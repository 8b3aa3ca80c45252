//! Per-frame comparable quantities.
//!
//! A frame is a [`FeatureVector`]: an ordered list of 3D points and joint
//! angles. Two frames are comparable when they hold the same kinds in the same
//! order. The aligner never checks this; the sampler that builds the frames
//! only includes quantities present in both motions.

use crate::{Error, Result};

/// A 3D position in world coordinates.
pub type Point3 = [f64; 3];

/// One comparable quantity at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feature {
    /// Position of a robot part, compared by Euclidean distance.
    Point(Point3),
    /// Joint angle in radians, compared by absolute difference.
    Angle(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Point,
    Angle,
}

impl Feature {
    pub fn kind(&self) -> FeatureKind {
        match self {
            Feature::Point(_) => FeatureKind::Point,
            Feature::Angle(_) => FeatureKind::Angle,
        }
    }

    /// Distance to `other`, or `None` if the kinds differ.
    ///
    /// # Example
    /// ```
    /// use motion_warp::feature::Feature;
    ///
    /// let a = Feature::Point([0.0, 0.0, 0.0]);
    /// let b = Feature::Point([3.0, 4.0, 0.0]);
    /// assert_eq!(a.distance(&b), Some(5.0));
    /// assert_eq!(a.distance(&Feature::Angle(1.0)), None);
    /// ```
    pub fn distance(&self, other: &Feature) -> Option<f64> {
        match (self, other) {
            (Feature::Point(a), Feature::Point(b)) => Some(euclidean(a, b)),
            (Feature::Angle(a), Feature::Angle(b)) => Some((a - b).abs()),
            _ => None,
        }
    }
}

pub fn euclidean(a: &Point3, b: &Point3) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// The features of one frame, in a fixed order.
pub type FeatureVector = Vec<Feature>;

/// Timestamps paired 1:1 with frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSequence {
    times: Vec<f64>,
    frames: Vec<FeatureVector>,
}

impl FeatureSequence {
    /// Pair `times` with `frames`.
    ///
    /// Fails if the lengths differ. Timestamp ordering is checked later, when
    /// the sequence is aligned.
    pub fn new(times: Vec<f64>, frames: Vec<FeatureVector>) -> Result<Self> {
        if times.len() != frames.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} frames", times.len()),
                got: format!("{} frames", frames.len()),
            });
        }
        Ok(Self { times, frames })
    }

    /// Sequence of a single joint angle.
    pub fn from_angles(times: Vec<f64>, angles: &[f64]) -> Result<Self> {
        let frames = angles.iter().map(|&a| vec![Feature::Angle(a)]).collect();
        Self::new(times, frames)
    }

    /// Sequence of a single point trajectory.
    pub fn from_points(times: Vec<f64>, points: &[Point3]) -> Result<Self> {
        let frames = points.iter().map(|&p| vec![Feature::Point(p)]).collect();
        Self::new(times, frames)
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn frames(&self) -> &[FeatureVector] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Kinds of the first frame; every frame is expected to share them.
    pub fn layout(&self) -> Vec<FeatureKind> {
        self.frames
            .first()
            .map(|f| f.iter().map(Feature::kind).collect())
            .unwrap_or_default()
    }

    /// Check that every frame of `self` and `other` shares one layout.
    ///
    /// The aligner assumes this holds; callers that assemble frames by hand
    /// can use it to catch a mismatch before aligning.
    pub fn validate_against(&self, other: &FeatureSequence) -> Result<()> {
        let layout = if self.is_empty() {
            other.layout()
        } else {
            self.layout()
        };
        for frame in self.frames.iter().chain(other.frames.iter()) {
            let kinds: Vec<FeatureKind> = frame.iter().map(Feature::kind).collect();
            if kinds != layout {
                return Err(Error::ShapeMismatch {
                    expected: format!("{layout:?}"),
                    got: format!("{kinds:?}"),
                });
            }
        }
        Ok(())
    }
}
