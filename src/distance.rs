//! Frame distance metrics.
//!
//! The aligner only sees timestamps and indices. Everything it knows about
//! what a frame contains comes through a [`DistanceMetric`], which usually
//! closes over per-index feature data prepared by the caller.

use crate::feature::{Feature, FeatureSequence};

/// Cost of aligning one base frame with one target frame.
///
/// Implementations return a non-negative value, `0.0` for a perfect match.
/// Any `Fn(f64, f64, usize, usize) -> f64` closure taking
/// `(base_time, target_time, base_index, target_index)` is a metric.
pub trait DistanceMetric {
    fn distance(
        &self,
        base_time: f64,
        target_time: f64,
        base_index: usize,
        target_index: usize,
    ) -> f64;
}

impl<F> DistanceMetric for F
where
    F: Fn(f64, f64, usize, usize) -> f64,
{
    fn distance(
        &self,
        base_time: f64,
        target_time: f64,
        base_index: usize,
        target_index: usize,
    ) -> f64 {
        self(base_time, target_time, base_index, target_index)
    }
}

/// Sum of per-feature distances between two frames.
///
/// Points contribute their Euclidean distance and angles their absolute
/// difference. Frames must share one layout; a kind mismatch at some position
/// contributes `+inf` and extra trailing features are ignored.
///
/// # Example
/// ```
/// use motion_warp::distance::feature_distance;
/// use motion_warp::feature::Feature;
///
/// let base = [Feature::Point([0.0, 0.0, 0.0]), Feature::Angle(1.0)];
/// let target = [Feature::Point([0.0, 3.0, 4.0]), Feature::Angle(0.5)];
/// assert_eq!(feature_distance(&base, &target), 5.5);
/// ```
pub fn feature_distance(base: &[Feature], target: &[Feature]) -> f64 {
    base.iter()
        .zip(target)
        .map(|(b, t)| b.distance(t).unwrap_or(f64::INFINITY))
        .sum()
}

/// Default metric over two prepared feature sequences.
#[derive(Debug, Clone, Copy)]
pub struct FeatureDistance<'a> {
    base: &'a FeatureSequence,
    target: &'a FeatureSequence,
}

impl<'a> FeatureDistance<'a> {
    pub fn new(base: &'a FeatureSequence, target: &'a FeatureSequence) -> Self {
        Self { base, target }
    }
}

impl DistanceMetric for FeatureDistance<'_> {
    fn distance(&self, _: f64, _: f64, base_index: usize, target_index: usize) -> f64 {
        match (
            self.base.frames().get(base_index),
            self.target.frames().get(target_index),
        ) {
            (Some(b), Some(t)) => feature_distance(b, t),
            _ => f64::INFINITY,
        }
    }
}
