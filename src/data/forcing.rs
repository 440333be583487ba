//! Time series driving dynamic boundary conditions.

use crate::mesh_error::HydroSieveError;

/// Piecewise-linear function of time read from a forcing resource.
///
/// Entries are kept sorted by time with a stable sort, so duplicate
/// timestamps retain their input order.
#[derive(Clone, Debug, PartialEq)]
pub struct ForcingSeries {
    entries: Vec<(f64, f64)>,
}

impl ForcingSeries {
    /// Build a series from `(time, value)` pairs; `None` when empty.
    pub fn from_entries(mut entries: Vec<(f64, f64)>) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        Some(Self { entries })
    }

    /// Constant series.
    pub fn constant(value: f64) -> Self {
        Self {
            entries: vec![(0.0, value)],
        }
    }

    /// Sorted `(time, value)` entries.
    pub fn entries(&self) -> &[(f64, f64)] {
        &self.entries
    }

    /// Value at time `t`.
    ///
    /// A single entry is a constant. Outside the covered range the first or
    /// last two entries are extrapolated linearly; inside it the first
    /// bracket with `t0 <= t <= t1` is interpolated.
    pub fn value_at(&self, t: f64) -> f64 {
        let e = &self.entries;
        let n = e.len();
        if n == 1 {
            return e[0].1;
        }
        let (lo, hi) = if t < e[0].0 {
            (e[0], e[1])
        } else if t > e[n - 1].0 {
            (e[n - 2], e[n - 1])
        } else {
            e.windows(2)
                .find(|w| w[0].0 <= t && t <= w[1].0)
                .map_or((e[0], e[1]), |w| (w[0], w[1]))
        };
        let (t0, v0) = lo;
        let (t1, v1) = hi;
        if t1 == t0 {
            return v0;
        }
        v0 + (v1 - v0) * (t - t0) / (t1 - t0)
    }
}

/// Supplier of forcing series for dynamic boundary conditions.
///
/// Series numbers are 1-based, matching the boundary description resource.
pub trait ForcingSource {
    /// Inflow hydrograph number `series`.
    fn hydrograph(&self, series: usize) -> Result<ForcingSeries, HydroSieveError>;
    /// Outflow rating curve number `series`.
    fn rating_curve(&self, series: usize) -> Result<ForcingSeries, HydroSieveError>;
}

/// Forcing series held in memory.
#[derive(Clone, Debug, Default)]
pub struct InlineForcing {
    /// Hydrographs in series order.
    pub hydrographs: Vec<ForcingSeries>,
    /// Rating curves in series order.
    pub rating_curves: Vec<ForcingSeries>,
}

impl InlineForcing {
    fn pick(all: &[ForcingSeries], series: usize) -> Result<ForcingSeries, HydroSieveError> {
        series
            .checked_sub(1)
            .and_then(|k| all.get(k))
            .cloned()
            .ok_or(HydroSieveError::ForcingSeriesIndex {
                requested: series,
                available: all.len(),
            })
    }
}

impl ForcingSource for InlineForcing {
    fn hydrograph(&self, series: usize) -> Result<ForcingSeries, HydroSieveError> {
        Self::pick(&self.hydrographs, series)
    }

    fn rating_curve(&self, series: usize) -> Result<ForcingSeries, HydroSieveError> {
        Self::pick(&self.rating_curves, series)
    }
}
