//! Pluggable resolution of one time step.

use crate::data::{Bathymetry, Manning, State};
use crate::mesh_error::HydroSieveError;
use crate::solver::euler::EulerFirstOrder;
use crate::topology::{BoundaryKind, Mesh};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time integration scheme.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalScheme {
    #[default]
    Euler,
    Rk2,
}

/// Spatial reconstruction order.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpatialScheme {
    #[default]
    First,
    Muscl,
}

impl TemporalScheme {
    /// Lower-case configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Euler => "euler",
            Self::Rk2 => "rk2",
        }
    }
}

impl SpatialScheme {
    /// Lower-case configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Muscl => "muscl",
        }
    }
}

impl fmt::Display for TemporalScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for SpatialScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemporalScheme {
    type Err = HydroSieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euler" => Ok(Self::Euler),
            "rk2" => Ok(Self::Rk2),
            other => Err(HydroSieveError::InvalidConfig {
                key: "temporal-scheme".into(),
                value: other.to_string(),
                reason: "expected euler or rk2".into(),
            }),
        }
    }
}

impl FromStr for SpatialScheme {
    type Err = HydroSieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "muscl" => Ok(Self::Muscl),
            other => Err(HydroSieveError::InvalidConfig {
                key: "spatial-scheme".into(),
                value: other.to_string(),
                reason: "expected first or muscl".into(),
            }),
        }
    }
}

/// Advances a state by one time step.
///
/// The resolver takes the current state by value and returns the next one.
/// Ghost entries belong to the boundary conditions; a resolver may only
/// refresh the depth of ghosts behind open (non-wall) boundaries.
pub trait ResolutionMethod {
    /// State after one step of length `dt`.
    fn resolve(
        &self,
        state: State,
        dt: f64,
        mesh: &Mesh,
        bathymetry: &Bathymetry,
    ) -> Result<State, HydroSieveError>;

    /// Kind of the condition driving each boundary, indexed by boundary.
    /// Called once at model setup; the default ignores it.
    fn set_boundary_kinds(&mut self, _kinds: &[BoundaryKind]) {}
}

/// Fail with [`HydroSieveError::UnsupportedScheme`] unless a resolver exists
/// for the combination.
pub fn ensure_supported(temporal: TemporalScheme, spatial: SpatialScheme) -> Result<(), HydroSieveError> {
    match (temporal, spatial) {
        (TemporalScheme::Euler, SpatialScheme::First) => Ok(()),
        (temporal, spatial) => Err(HydroSieveError::UnsupportedScheme {
            temporal: temporal.to_string(),
            spatial: spatial.to_string(),
        }),
    }
}

/// Select the resolver for a scheme combination.
pub fn resolution_method(
    temporal: TemporalScheme,
    spatial: SpatialScheme,
    gravity: f64,
    manning: Manning,
) -> Result<Box<dyn ResolutionMethod>, HydroSieveError> {
    ensure_supported(temporal, spatial)?;
    Ok(Box::new(EulerFirstOrder::new(gravity).with_manning(manning)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_euler_first_is_supported() {
        assert!(resolution_method(TemporalScheme::Euler, SpatialScheme::First, 9.81, Manning::none()).is_ok());
        for (t, s) in [
            (TemporalScheme::Euler, SpatialScheme::Muscl),
            (TemporalScheme::Rk2, SpatialScheme::First),
            (TemporalScheme::Rk2, SpatialScheme::Muscl),
        ] {
            assert!(ensure_supported(t, s).is_err());
            match resolution_method(t, s, 9.81, Manning::none()) {
                Err(HydroSieveError::UnsupportedScheme { temporal, spatial }) => {
                    assert_eq!(temporal, t.name());
                    assert_eq!(spatial, s.name());
                }
                _ => panic!("{t}/{s} should be unsupported"),
            }
        }
    }
}
