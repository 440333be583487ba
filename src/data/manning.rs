//! Manning roughness per real cell.

use crate::mesh_error::HydroSieveError;
use hashbrown::HashMap;

/// Manning coefficient `n` of every real cell, in mesh order.
///
/// An empty table means no bed friction at all.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Manning {
    coefficients: Vec<f64>,
}

impl Manning {
    /// No friction anywhere.
    pub fn none() -> Self {
        Self::default()
    }

    /// Same coefficient on `cells` cells.
    pub fn uniform(cells: usize, n: f64) -> Self {
        Self {
            coefficients: vec![n; cells],
        }
    }

    /// Resolve one land-use patch per cell against a `patch -> n` table.
    ///
    /// Cells without a patch, or whose patch is missing from the table, get
    /// `n = 0`.
    pub fn from_patches(
        patches: &[Option<u32>],
        table: &[(i64, f64)],
    ) -> Result<Self, HydroSieveError> {
        let mut lookup = HashMap::with_capacity(table.len());
        for &(patch, n) in table {
            if !(n.is_finite() && n >= 0.0) {
                return Err(HydroSieveError::MeshIoParse(format!(
                    "manning patch {patch}: coefficient must be finite and >= 0, got {n}"
                )));
            }
            lookup.insert(patch, n);
        }
        let mut unmatched = 0usize;
        let coefficients = patches
            .iter()
            .map(|p| match p.and_then(|p| lookup.get(&i64::from(p))) {
                Some(&n) => n,
                None => {
                    unmatched += 1;
                    0.0
                }
            })
            .collect();
        if unmatched > 0 {
            log::warn!("{unmatched} cells have no manning patch entry and get no friction");
        }
        Ok(Self { coefficients })
    }

    /// Coefficient of real cell `cell`; `0` when friction is off.
    pub fn coefficient(&self, cell: usize) -> f64 {
        self.coefficients.get(cell).copied().unwrap_or(0.0)
    }

    /// True when no cell carries a coefficient.
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Per-cell coefficients.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patches_map_to_coefficients() {
        let m = Manning::from_patches(&[Some(1), Some(2), None, Some(9)], &[(1, 0.03), (2, 0.05)])
            .unwrap();
        assert_eq!(m.coefficients(), &[0.03, 0.05, 0.0, 0.0]);
        assert_eq!(m.coefficient(42), 0.0);
        assert!(Manning::none().is_empty());
    }

    #[test]
    fn negative_coefficient_is_rejected() {
        assert!(Manning::from_patches(&[Some(1)], &[(1, -0.1)]).is_err());
    }
}
