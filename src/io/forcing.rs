//! Reader for multi-series forcing resources (hydrographs, rating curves).
//!
//! The resource holds the number of series, then for every series its entry
//! count followed by that many `time value` lines.

use crate::data::{ForcingSeries, ForcingSource};
use crate::io::{RelevantLines, parse_token, read_all};
use crate::mesh_error::HydroSieveError;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read series number `series` (1-based) from a forcing resource.
pub fn read_forcing_series<R: Read>(reader: R, series: usize) -> Result<ForcingSeries, HydroSieveError> {
    let contents = read_all(reader)?;
    let mut lines = RelevantLines::new(&contents);
    let (line, t) = lines.expect_tokens("series count")?;
    let available: usize = parse_token(&t, 0, "series count", line)?;
    if series == 0 || series > available {
        return Err(HydroSieveError::ForcingSeriesIndex {
            requested: series,
            available,
        });
    }

    for _ in 1..series {
        let (line, t) = lines.expect_tokens("entry count")?;
        let entries: usize = parse_token(&t, 0, "entry count", line)?;
        for _ in 0..entries {
            lines.expect_tokens("series entry")?;
        }
    }

    let (line, t) = lines.expect_tokens("entry count")?;
    let count: usize = parse_token(&t, 0, "entry count", line)?;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let (line, t) = lines.expect_tokens("series entry")?;
        let time = parse_token(&t, 0, "time", line)?;
        let value = parse_token(&t, 1, "value", line)?;
        entries.push((time, value));
    }
    ForcingSeries::from_entries(entries).ok_or(HydroSieveError::EmptyForcingSeries(series))
}

/// Forcing series read from files on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForcingFiles {
    pub hydrographs: PathBuf,
    pub rating_curves: PathBuf,
}

impl ForcingFiles {
    pub fn new(hydrographs: impl Into<PathBuf>, rating_curves: impl Into<PathBuf>) -> Self {
        Self {
            hydrographs: hydrographs.into(),
            rating_curves: rating_curves.into(),
        }
    }

    fn read(path: &Path, series: usize) -> Result<ForcingSeries, HydroSieveError> {
        log::debug!("reading forcing series {series} from {}", path.display());
        let file = std::fs::File::open(path)?;
        read_forcing_series(std::io::BufReader::new(file), series)
    }
}

impl ForcingSource for ForcingFiles {
    fn hydrograph(&self, series: usize) -> Result<ForcingSeries, HydroSieveError> {
        Self::read(&self.hydrographs, series)
    }

    fn rating_curve(&self, series: usize) -> Result<ForcingSeries, HydroSieveError> {
        Self::read(&self.rating_curves, series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SERIES: &str = "2\n2\n0 1\n10 2\n# second\n1\n0 42\n";

    #[test]
    fn selects_series_by_skipping() {
        let s = read_forcing_series(TWO_SERIES.as_bytes(), 2).unwrap();
        assert_eq!(s.entries(), &[(0.0, 42.0)]);
        let s = read_forcing_series(TWO_SERIES.as_bytes(), 1).unwrap();
        assert_eq!(s.value_at(5.0), 1.5);
    }

    #[test]
    fn out_of_range_series() {
        for k in [0, 3] {
            assert!(matches!(
                read_forcing_series(TWO_SERIES.as_bytes(), k),
                Err(HydroSieveError::ForcingSeriesIndex { available: 2, .. })
            ));
        }
    }

    #[test]
    fn empty_series_is_fatal() {
        assert!(matches!(
            read_forcing_series("1\n0\n".as_bytes(), 1),
            Err(HydroSieveError::EmptyForcingSeries(1))
        ));
    }
}
