//! Simulation configuration.
//!
//! Configurations are JSON or YAML documents with kebab-case keys. Every key
//! is optional and falls back to its default; `bathymetry-file` and
//! `manning-file` default to none:
//!
//! ```json
//! {
//!   "temporal-scheme": "euler",
//!   "spatial-scheme": "first",
//!   "mesh-file": "mesh.geo",
//!   "boundary-condition-file": "bc.txt",
//!   "hydrographs-file": "hydrograph.txt",
//!   "rating-curve-file": "rating_curve.txt",
//!   "initial-state-file": "dof_init.txt",
//!   "result-path": "output/",
//!   "output-mode": "raw",
//!   "simulation-time": 10000.0,
//!   "delta-to-write": 100.0,
//!   "is-delta-adaptive": false,
//!   "default-delta": 0.01,
//!   "cfl": 0.8,
//!   "gravity": 9.81,
//!   "bathymetry-file": "bathymetry.txt",
//!   "manning-file": "manning.txt"
//! }
//! ```
//!
//! [`SimulationConfig::from_path`] reads YAML for `.yaml`/`.yml` files and
//! JSON otherwise, and resolves relative file paths against the directory
//! holding the configuration file.
//!
//! `bathymetry-file` is an `id bed` table overriding the cell beds of the
//! mesh. `manning-file` is a `patch n` table resolved against the land-use
//! patch of every `.geo` cell.

use crate::io::OutputMode;
use crate::mesh_error::HydroSieveError;
use crate::solver::resolution::{SpatialScheme, TemporalScheme};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub temporal_scheme: TemporalScheme,
    pub spatial_scheme: SpatialScheme,
    pub mesh_file: PathBuf,
    pub boundary_condition_file: PathBuf,
    pub hydrographs_file: PathBuf,
    pub rating_curve_file: PathBuf,
    pub initial_state_file: PathBuf,
    pub result_path: PathBuf,
    pub output_mode: OutputMode,
    /// Simulated time at which the loop stops.
    pub simulation_time: f64,
    /// Interval between snapshots.
    pub delta_to_write: f64,
    /// Use the CFL policy instead of `default_delta`.
    #[serde(alias = "is-delta-adaptative")]
    pub is_delta_adaptive: bool,
    /// Fixed step, and fallback of the CFL policy on a dry mesh.
    pub default_delta: f64,
    /// Courant number of the adaptive policy.
    pub cfl: f64,
    pub gravity: f64,
    /// Optional `id bed` table overriding the mesh cell beds.
    pub bathymetry_file: Option<PathBuf>,
    /// Optional `patch n` Manning table; no friction when absent.
    pub manning_file: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            temporal_scheme: TemporalScheme::Euler,
            spatial_scheme: SpatialScheme::First,
            mesh_file: "mesh.geo".into(),
            boundary_condition_file: "bc.txt".into(),
            hydrographs_file: "hydrograph.txt".into(),
            rating_curve_file: "rating_curve.txt".into(),
            initial_state_file: "dof_init.txt".into(),
            result_path: "output/".into(),
            output_mode: OutputMode::Raw,
            simulation_time: 10000.0,
            delta_to_write: 100.0,
            is_delta_adaptive: false,
            default_delta: 0.01,
            cfl: 0.8,
            gravity: 9.81,
            bathymetry_file: None,
            manning_file: None,
        }
    }
}

impl SimulationConfig {
    /// Parse a JSON configuration; paths are kept as written.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, HydroSieveError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse a YAML configuration; paths are kept as written.
    pub fn from_yaml_reader<R: Read>(reader: R) -> Result<Self, HydroSieveError> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    /// Load a configuration file and resolve its relative paths against the
    /// file's directory. `.yaml` and `.yml` files are YAML, anything else JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HydroSieveError> {
        let path = path.as_ref();
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        let yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        let mut config = if yaml {
            Self::from_yaml_reader(reader)?
        } else {
            Self::from_reader(reader)?
        };
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Prefix every relative path with `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for p in [
            &mut self.mesh_file,
            &mut self.boundary_condition_file,
            &mut self.hydrographs_file,
            &mut self.rating_curve_file,
            &mut self.initial_state_file,
            &mut self.result_path,
        ]
        .into_iter()
        .chain(self.bathymetry_file.as_mut())
        .chain(self.manning_file.as_mut())
        {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }

    /// Override values from `key = value` string pairs using the same keys
    /// as the JSON document.
    pub fn update_values<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> Result<(), HydroSieveError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in values {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "temporal-scheme" => self.temporal_scheme = value.parse()?,
                "spatial-scheme" => self.spatial_scheme = value.parse()?,
                "mesh-file" => self.mesh_file = value.into(),
                "boundary-condition-file" => self.boundary_condition_file = value.into(),
                "hydrographs-file" => self.hydrographs_file = value.into(),
                "rating-curve-file" => self.rating_curve_file = value.into(),
                "initial-state-file" => self.initial_state_file = value.into(),
                "result-path" => self.result_path = value.into(),
                "output-mode" => self.output_mode = value.parse()?,
                "simulation-time" => self.simulation_time = parse_value(key, value)?,
                "delta-to-write" => self.delta_to_write = parse_value(key, value)?,
                "is-delta-adaptive" | "is-delta-adaptative" => {
                    self.is_delta_adaptive = parse_bool(key, value)?
                }
                "default-delta" => self.default_delta = parse_value(key, value)?,
                "cfl" => self.cfl = parse_value(key, value)?,
                "gravity" => self.gravity = parse_value(key, value)?,
                "bathymetry-file" => self.bathymetry_file = optional_path(value),
                "manning-file" => self.manning_file = optional_path(value),
                _ => {
                    return Err(HydroSieveError::InvalidConfig {
                        key: key.to_string(),
                        value: value.to_string(),
                        reason: "unknown configuration key".into(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Check numeric parameters before a run starts.
    pub fn validate(&self) -> Result<(), HydroSieveError> {
        if !(self.simulation_time.is_finite() && self.simulation_time >= 0.0) {
            return Err(invalid("simulation-time", self.simulation_time, "must be finite and >= 0"));
        }
        if !(self.delta_to_write.is_finite() && self.delta_to_write > 0.0) {
            return Err(HydroSieveError::InvalidWriteInterval(self.delta_to_write));
        }
        if !(self.default_delta.is_finite() && self.default_delta > 0.0) {
            return Err(HydroSieveError::NonPositiveTimeStep(self.default_delta));
        }
        if !(self.cfl.is_finite() && self.cfl > 0.0) {
            return Err(invalid("cfl", self.cfl, "must be finite and > 0"));
        }
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return Err(invalid("gravity", self.gravity, "must be finite and > 0"));
        }
        Ok(())
    }
}

fn invalid(key: &str, value: f64, reason: &str) -> HydroSieveError {
    HydroSieveError::InvalidConfig {
        key: key.into(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Empty string clears an optional path.
fn optional_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.into())
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, HydroSieveError> {
    value.trim().parse().map_err(|_| HydroSieveError::InvalidConfig {
        key: key.into(),
        value: value.into(),
        reason: "not a number".into(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, HydroSieveError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(HydroSieveError::InvalidConfig {
            key: key.into(),
            value: value.into(),
            reason: "expected true or false".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = SimulationConfig::from_reader("{}".as_bytes()).unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn legacy_adaptive_key_is_accepted() {
        let config =
            SimulationConfig::from_reader(r#"{"is-delta-adaptative": true}"#.as_bytes()).unwrap();
        assert!(config.is_delta_adaptive);
    }

    #[test]
    fn yaml_document_with_optional_tables() {
        let text = "temporal-scheme: euler\nbathymetry-file: bathymetry.txt\nmanning-file: manning.txt\nis-delta-adaptative: True\n";
        let config = SimulationConfig::from_yaml_reader(text.as_bytes()).unwrap();
        assert_eq!(config.bathymetry_file, Some(PathBuf::from("bathymetry.txt")));
        assert_eq!(config.manning_file, Some(PathBuf::from("manning.txt")));
        assert!(config.is_delta_adaptive);
        assert!(SimulationConfig::from_yaml_reader("colour: blue\n".as_bytes()).is_err());
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(SimulationConfig::from_reader(r#"{"mesh": "a.geo"}"#.as_bytes()).is_err());
        let mut config = SimulationConfig::default();
        assert!(config.update_values([("mesh", "a.geo")]).is_err());
    }

    #[test]
    fn string_overrides_are_typed() {
        let mut config = SimulationConfig::default();
        config
            .update_values([
                ("simulation-time", "12.5"),
                ("is-delta-adaptative", "True"),
                ("output-mode", "vtk"),
                ("boundary-condition-file", "/tmp/bc.txt"),
            ])
            .unwrap();
        assert_eq!(config.simulation_time, 12.5);
        assert!(config.is_delta_adaptive);
        assert_eq!(config.output_mode, OutputMode::Vtk);
        assert_eq!(config.boundary_condition_file, PathBuf::from("/tmp/bc.txt"));
        assert!(config.update_values([("cfl", "fast")]).is_err());
    }

    #[test]
    fn validate_rejects_bad_intervals() {
        let mut config = SimulationConfig::default();
        config.delta_to_write = 0.0;
        assert!(matches!(
            config.validate(),
            Err(HydroSieveError::InvalidWriteInterval(_))
        ));
        let mut config = SimulationConfig::default();
        config.default_delta = -1.0;
        assert!(matches!(
            config.validate(),
            Err(HydroSieveError::NonPositiveTimeStep(_))
        ));
    }
}
