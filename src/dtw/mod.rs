//! Dynamic Time Warping between a base and a target sequence.
//!
//! [`DynamicTimeWarp`] fills a full cost matrix, backtracks the cheapest
//! monotonic path through it and keeps that path as two parallel index arrays
//! ([`TimeWarpObj::index_map`]) and two parallel time arrays
//! ([`TimeWarpObj::time_warp_map`]). Both are in increasing time order.
//!
//! # Tie-break
//!
//! When several predecessors of a cell share the minimum cost, the backtrace
//! takes the diagonal first, then up (base index steps back alone), then left
//! (target index steps back alone). Equal-cost paths therefore repeat indices
//! as early in the sequence as possible.
//!
//! # Precondition
//!
//! The metric must compare structurally identical frames. The aligner never
//! inspects frames and cannot detect a mismatch.
//!
//! # Example
//! ```
//! use motion_warp::dtw::{DynamicTimeWarp, TimeWarpObj};
//!
//! let base = [0.0, 1.0, 2.0, 3.0];
//! let target = [0.0, 1.0, 2.0, 3.0, 4.0];
//! let same = |_: f64, _: f64, _: usize, _: usize| 0.0;
//! let dtw = DynamicTimeWarp::new(&base, &target, &same).unwrap();
//!
//! let (base_idx, target_idx) = dtw.index_map();
//! assert_eq!(base_idx, &[0, 0, 1, 2, 3]);
//! assert_eq!(target_idx, &[0, 1, 2, 3, 4]);
//! assert_eq!(dtw.time_warp(2.5), 3.5);
//! ```

mod cost;

pub use cost::{CostMatrix, Step};

use log::{debug, warn};

use crate::config::AlignConfig;
use crate::distance::{DistanceMetric, FeatureDistance};
use crate::feature::FeatureSequence;
use crate::{Error, Result};

/// Maps times between a base and a target timeline.
///
/// `time_warp` and `untime_warp` are only approximate inverses. Calling them
/// alternately over and over may walk a value away from where it started.
pub trait TimeWarpObj {
    /// Base-timeline time to target-timeline time.
    fn time_warp(&self, base_time: f64) -> f64;

    /// Target-timeline time to base-timeline time.
    fn untime_warp(&self, target_time: f64) -> f64;

    /// Parallel `(base_times, target_times)` arrays.
    fn time_warp_map(&self) -> (&[f64], &[f64]);

    /// Parallel `(base_indices, target_indices)` arrays.
    fn index_map(&self) -> (&[usize], &[usize]);
}

/// DTW alignment of two timestamp sequences.
#[derive(Debug, Clone)]
pub struct DynamicTimeWarp {
    base_times: Vec<f64>,
    target_times: Vec<f64>,
    cost: CostMatrix,
    index_map: (Vec<usize>, Vec<usize>),
    time_map: (Vec<f64>, Vec<f64>),
}

impl DynamicTimeWarp {
    /// Align with [`AlignConfig::default`].
    pub fn new<M>(base_times: &[f64], target_times: &[f64], metric: &M) -> Result<Self>
    where
        M: DistanceMetric + ?Sized,
    {
        Self::with_config(base_times, target_times, metric, &AlignConfig::default())
    }

    /// Align `base_times` against `target_times`.
    ///
    /// Empty input on either side is not an error: the maps are empty and
    /// [`time_warp`](TimeWarpObj::time_warp) passes times through unchanged.
    ///
    /// # Errors
    /// * [`Error::NonFiniteTimestamp`] / [`Error::NonMonotonicTimestamps`] for
    ///   malformed timestamps
    /// * [`Error::AlignmentTooLarge`] if the matrix exceeds `config.max_cells`
    pub fn with_config<M>(
        base_times: &[f64],
        target_times: &[f64],
        metric: &M,
        config: &AlignConfig,
    ) -> Result<Self>
    where
        M: DistanceMetric + ?Sized,
    {
        check_times("base", base_times)?;
        check_times("target", target_times)?;
        if let Err(e) = config.check_size(base_times.len(), target_times.len()) {
            warn!("refusing alignment: {e}");
            return Err(e);
        }

        debug!(
            "aligning {} base samples against {} target samples (band {:?})",
            base_times.len(),
            target_times.len(),
            config.band_radius
        );
        let cost = CostMatrix::build(base_times, target_times, metric, config.band_radius);
        let path = cost.backtrace();
        debug!("alignment path has {} steps", path.len());

        let (base_idx, target_idx): (Vec<usize>, Vec<usize>) = path.into_iter().unzip();
        let time_map = (
            base_idx.iter().map(|&i| base_times[i]).collect(),
            target_idx.iter().map(|&j| target_times[j]).collect(),
        );

        Ok(Self {
            base_times: base_times.to_vec(),
            target_times: target_times.to_vec(),
            cost,
            index_map: (base_idx, target_idx),
            time_map,
        })
    }

    /// Align two feature sequences with the default feature metric.
    pub fn from_sequences(
        base: &FeatureSequence,
        target: &FeatureSequence,
        config: &AlignConfig,
    ) -> Result<Self> {
        let metric = FeatureDistance::new(base, target);
        Self::with_config(base.times(), target.times(), &metric, config)
    }

    pub fn base_times(&self) -> &[f64] {
        &self.base_times
    }

    pub fn target_times(&self) -> &[f64] {
        &self.target_times
    }

    pub fn cost_matrix(&self) -> &CostMatrix {
        &self.cost
    }

    /// Accumulated cost of the whole alignment, `None` for empty input.
    pub fn total_cost(&self) -> Option<f64> {
        self.cost.total()
    }

    /// Alignment path as `(base_index, target_index)` pairs.
    pub fn path(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.index_map
            .0
            .iter()
            .copied()
            .zip(self.index_map.1.iter().copied())
    }

    /// Number of path steps.
    pub fn len(&self) -> usize {
        self.index_map.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_map.0.is_empty()
    }
}

impl TimeWarpObj for DynamicTimeWarp {
    fn time_warp(&self, base_time: f64) -> f64 {
        warp_through(base_time, &self.time_map.0, &self.time_map.1)
    }

    fn untime_warp(&self, target_time: f64) -> f64 {
        warp_through(target_time, &self.time_map.1, &self.time_map.0)
    }

    fn time_warp_map(&self) -> (&[f64], &[f64]) {
        (&self.time_map.0, &self.time_map.1)
    }

    fn index_map(&self) -> (&[usize], &[usize]) {
        (&self.index_map.0, &self.index_map.1)
    }
}

/// Map `t` from the `keys` timeline onto the `values` timeline.
///
/// `keys` is non-decreasing and parallel to `values`. A time equal to a key
/// maps to the value of the first entry holding that key. A time between two
/// distinct keys is linearly interpolated between their values. Times outside
/// the keys clamp to the first or last value. With no keys the time passes
/// through unchanged.
pub(crate) fn warp_through(t: f64, keys: &[f64], values: &[f64]) -> f64 {
    let (Some(&first), Some(&last)) = (keys.first(), keys.last()) else {
        return t;
    };
    if t.is_nan() {
        return t;
    }
    if t < first {
        return values[0];
    }
    if t > last {
        return values[values.len() - 1];
    }

    let lo = keys.partition_point(|&k| k <= t) - 1;
    if keys[lo] == t {
        return values[keys.partition_point(|&k| k < t)];
    }
    let hi = lo + 1;
    let frac = (t - keys[lo]) / (keys[hi] - keys[lo]);
    values[lo] + (values[hi] - values[lo]) * frac
}

fn check_times(sequence: &'static str, times: &[f64]) -> Result<()> {
    if let Some(index) = times.iter().position(|t| !t.is_finite()) {
        return Err(Error::NonFiniteTimestamp { sequence, index });
    }
    if let Some(index) = times.windows(2).position(|w| w[1] < w[0]) {
        return Err(Error::NonMonotonicTimestamps {
            sequence,
            index: index + 1,
        });
    }
    Ok(())
}
