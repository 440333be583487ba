//! String-keyed constructors for boundary conditions.
//!
//! A boundary description maps each group number to a namespace and its
//! arguments. [`BoundaryRegistry::create_all`] resolves every group of the
//! mesh once at setup; groups that the description does not mention are
//! walls.

use crate::boundary::discharge::Discharge1;
use crate::boundary::rating_curve::RatingCurve;
use crate::boundary::wall::Wall;
use crate::boundary::{BoundaryCondition, BoundaryGroups};
use crate::data::ForcingSource;
use crate::mesh_error::HydroSieveError;
use hashbrown::HashMap;
use std::collections::BTreeMap;

/// Namespace used for groups absent from the description.
pub const WALL_NAMESPACE: &str = "wall";
/// Inflow discharge namespace.
pub const DISCHARGE_NAMESPACE: &str = "discharg1";
/// Outflow rating curve namespace.
pub const RATING_CURVE_NAMESPACE: &str = "ratcurve";

/// Namespace and arguments requested for one group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupDescription {
    pub namespace: String,
    pub args: Vec<String>,
}

/// Group number to condition description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryDescription {
    groups: BTreeMap<u32, GroupDescription>,
}

impl BoundaryDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group; a group may only be described once.
    pub fn insert(
        &mut self,
        group: u32,
        namespace: impl Into<String>,
        args: Vec<String>,
    ) -> Result<(), HydroSieveError> {
        if self.groups.contains_key(&group) {
            return Err(HydroSieveError::DuplicateBoundaryGroup(group));
        }
        self.groups.insert(
            group,
            GroupDescription {
                namespace: namespace.into(),
                args,
            },
        );
        Ok(())
    }

    pub fn get(&self, group: u32) -> Option<&GroupDescription> {
        self.groups.get(&group)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &GroupDescription)> {
        self.groups.iter().map(|(&g, d)| (g, d))
    }
}

/// Everything a constructor receives for one group.
pub struct BoundarySetup<'a> {
    pub group: u32,
    pub namespace: &'a str,
    pub args: &'a [String],
    pub boundaries: Vec<usize>,
    pub forcing: &'a dyn ForcingSource,
}

impl BoundarySetup<'_> {
    /// 1-based forcing series number taken from the first argument.
    pub fn series_arg(&self) -> Result<usize, HydroSieveError> {
        let raw = self
            .args
            .first()
            .ok_or_else(|| HydroSieveError::MissingBoundaryArgument {
                group: self.group,
                namespace: self.namespace.to_string(),
                argument: "series",
            })?;
        raw.parse::<usize>()
            .map_err(|_| HydroSieveError::InvalidConfig {
                key: format!("boundary group {}", self.group),
                value: raw.clone(),
                reason: "series number must be a non-negative integer".into(),
            })
    }
}

/// Constructor stored in a [`BoundaryRegistry`].
pub type BoundaryConstructor =
    fn(BoundarySetup<'_>) -> Result<Box<dyn BoundaryCondition>, HydroSieveError>;

/// Namespace to constructor map.
#[derive(Clone)]
pub struct BoundaryRegistry {
    constructors: HashMap<String, BoundaryConstructor>,
}

impl std::fmt::Debug for BoundaryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.constructors.keys().collect();
        names.sort();
        f.debug_struct("BoundaryRegistry")
            .field("namespaces", &names)
            .finish()
    }
}

impl Default for BoundaryRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(WALL_NAMESPACE, build_wall);
        registry.register(DISCHARGE_NAMESPACE, build_discharge);
        registry.register(RATING_CURVE_NAMESPACE, build_rating_curve);
        registry
    }
}

impl BoundaryRegistry {
    /// Registry without any namespace.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register or replace a namespace.
    pub fn register(&mut self, namespace: impl Into<String>, ctor: BoundaryConstructor) -> &mut Self {
        self.constructors.insert(namespace.into(), ctor);
        self
    }

    pub fn get(&self, namespace: &str) -> Option<BoundaryConstructor> {
        self.constructors.get(namespace).copied()
    }

    /// One condition per boundary group, in ascending group order.
    pub fn create_all(
        &self,
        groups: &BoundaryGroups,
        description: &BoundaryDescription,
        forcing: &dyn ForcingSource,
    ) -> Result<Vec<Box<dyn BoundaryCondition>>, HydroSieveError> {
        for (group, _) in description.iter() {
            if groups.get(group).is_none() {
                log::warn!("boundary group {group} is described but has no boundary edge");
            }
        }
        groups
            .iter()
            .map(|(group, boundaries)| {
                let (namespace, args) = match description.get(group) {
                    Some(d) => (d.namespace.as_str(), d.args.as_slice()),
                    None => (WALL_NAMESPACE, &[][..]),
                };
                let ctor = self
                    .get(namespace)
                    .ok_or_else(|| HydroSieveError::UnknownBoundaryNamespace(namespace.to_string()))?;
                log::debug!(
                    "boundary group {group}: `{namespace}` over {} edges",
                    boundaries.len()
                );
                ctor(BoundarySetup {
                    group,
                    namespace,
                    args,
                    boundaries: boundaries.to_vec(),
                    forcing,
                })
            })
            .collect()
    }
}

fn build_wall(setup: BoundarySetup<'_>) -> Result<Box<dyn BoundaryCondition>, HydroSieveError> {
    Ok(Box::new(Wall::new(setup.group, setup.boundaries)))
}

fn build_discharge(setup: BoundarySetup<'_>) -> Result<Box<dyn BoundaryCondition>, HydroSieveError> {
    let series = setup.forcing.hydrograph(setup.series_arg()?)?;
    Ok(Box::new(Discharge1::new(setup.group, setup.boundaries, series)))
}

fn build_rating_curve(
    setup: BoundarySetup<'_>,
) -> Result<Box<dyn BoundaryCondition>, HydroSieveError> {
    let series = setup.forcing.rating_curve(setup.series_arg()?)?;
    Ok(Box::new(RatingCurve::new(setup.group, setup.boundaries, series)))
}
