use ndarray::Array2;

use crate::distance::DistanceMetric;

/// Predecessor chosen when backtracking out of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `(i - 1, j - 1)`
    Diagonal,
    /// `(i - 1, j)`: the base index advances alone.
    Up,
    /// `(i, j - 1)`: the target index advances alone.
    Left,
}

/// Accumulated DTW cost over a `base_len x target_len` grid.
///
/// `cost[(i, j)]` is `d(i, j)` plus the cheapest of the up, left and diagonal
/// predecessors, the origin having predecessor cost 0. Cells outside the band
/// hold `+inf`.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    cost: Array2<f64>,
}

impl CostMatrix {
    /// Fill the matrix for the given timestamps and metric.
    ///
    /// # Arguments
    /// * `base_times` - Timestamps of the base sequence (rows)
    /// * `target_times` - Timestamps of the target sequence (columns)
    /// * `metric` - Frame distance, called once per in-band cell
    /// * `band_radius` - Optional Sakoe-Chiba radius around the scaled diagonal
    pub fn build<M>(
        base_times: &[f64],
        target_times: &[f64],
        metric: &M,
        band_radius: Option<usize>,
    ) -> Self
    where
        M: DistanceMetric + ?Sized,
    {
        let n = base_times.len();
        let m = target_times.len();
        let mut cost = Array2::<f64>::from_elem((n, m), f64::INFINITY);
        if n == 0 || m == 0 {
            return Self { cost };
        }

        let rows = band_rows(n, m, band_radius);
        for (i, &(lo, hi)) in rows.iter().enumerate() {
            for j in lo..=hi {
                let prev = if i == 0 && j == 0 {
                    0.0
                } else if i == 0 {
                    cost[(0, j - 1)]
                } else if j == 0 {
                    cost[(i - 1, 0)]
                } else {
                    cost[(i - 1, j)]
                        .min(cost[(i, j - 1)])
                        .min(cost[(i - 1, j - 1)])
                };
                let d = metric.distance(base_times[i], target_times[j], i, j);
                cost[(i, j)] = prev + d;
            }
        }

        Self { cost }
    }

    /// `(base_len, target_len)`
    pub fn shape(&self) -> (usize, usize) {
        let s = self.cost.shape();
        (s[0], s[1])
    }

    pub fn is_empty(&self) -> bool {
        self.cost.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.cost.get((i, j)).copied()
    }

    /// Cost of the full alignment, i.e. the last cell.
    pub fn total(&self) -> Option<f64> {
        let (n, m) = self.shape();
        if n == 0 || m == 0 {
            return None;
        }
        self.get(n - 1, m - 1)
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.cost
    }

    /// Predecessor of cell `(i, j)` with ties broken diagonal, then up, then left.
    ///
    /// Returns `None` at the origin.
    pub fn step_from(&self, i: usize, j: usize) -> Option<Step> {
        match (i, j) {
            (0, 0) => None,
            (0, _) => Some(Step::Left),
            (_, 0) => Some(Step::Up),
            _ => {
                let diag = self.cost[(i - 1, j - 1)];
                let up = self.cost[(i - 1, j)];
                let left = self.cost[(i, j - 1)];
                if diag <= up && diag <= left {
                    Some(Step::Diagonal)
                } else if up <= left {
                    Some(Step::Up)
                } else {
                    Some(Step::Left)
                }
            }
        }
    }

    /// Minimum cost path from `(0, 0)` to the last cell, both ends included.
    pub fn backtrace(&self) -> Vec<(usize, usize)> {
        let (n, m) = self.shape();
        if n == 0 || m == 0 {
            return Vec::new();
        }

        let (mut i, mut j) = (n - 1, m - 1);
        let mut path = Vec::with_capacity(n + m - 1);
        path.push((i, j));
        while let Some(step) = self.step_from(i, j) {
            match step {
                Step::Diagonal => {
                    i -= 1;
                    j -= 1;
                }
                Step::Up => i -= 1,
                Step::Left => j -= 1,
            }
            path.push((i, j));
        }

        path.reverse();
        path
    }
}

/// Inclusive column range `(lo, hi)` filled in each row.
///
/// The band follows the diagonal from `(0, 0)` to `(n - 1, m - 1)`. Its radius
/// is widened to the slope of that diagonal so that consecutive rows always
/// overlap and the last cell stays reachable.
pub(crate) fn band_rows(n: usize, m: usize, band_radius: Option<usize>) -> Vec<(usize, usize)> {
    let full = vec![(0, m.saturating_sub(1)); n];
    let Some(radius) = band_radius else {
        return full;
    };
    if n < 2 || m < 2 {
        return full;
    }

    let slope = (m - 1) as f64 / (n - 1) as f64;
    let radius = (radius as f64).max(slope.ceil());
    let last = (m - 1) as f64;
    (0..n)
        .map(|i| {
            let center = i as f64 * slope;
            let lo = (center - radius).floor().max(0.0);
            let hi = (center + radius).ceil().min(last);
            (lo as usize, hi as usize)
        })
        .collect()
}
