//! The shallow-water time loop.
//!
//! A run goes through three phases:
//! 1. **init**: mesh, bed, initial state, boundary conditions, resolver,
//!    time-step policy and result sink are assembled ([`ShallowWaterModel::new`]
//!    or [`ShallowWaterModel::from_config`]);
//! 2. **loop**: while `t < simulation_time`, update every boundary condition,
//!    pick a step, resolve, advance `t`, snapshot when due and notify
//!    listeners. The last step is not shortened, so the final time may exceed
//!    `simulation_time`;
//! 3. **finalize**: convert the saved snapshots to the requested output mode.

use crate::boundary::{BoundaryCondition, BoundaryGroups, BoundaryRegistry};
use crate::config::SimulationConfig;
use crate::data::{Bathymetry, Manning, State};
use crate::debug_invariants::DebugInvariants;
use crate::io::{
    ForcingFiles, GeoMeshReader, OutputMode, ResultSink, ResultWriter, read_boundary_description,
    read_id_values_path, read_initial_state,
};
use crate::mesh_error::HydroSieveError;
use crate::solver::resolution::{ResolutionMethod, ensure_supported, resolution_method};
use crate::solver::timestep::{CflTimeStep, FixedTimeStep, TimeStepPolicy, checked_step};
use crate::topology::{BoundaryKind, Mesh};
use std::fs::File;
use std::io::BufReader;

/// Observer called at the end of every loop iteration.
pub trait LoopListener {
    /// Called with the step just taken, the new state and the new time.
    fn end_of_loop(&mut self, dt: f64, state: &State, t: f64);
}

impl<F> LoopListener for F
where
    F: FnMut(f64, &State, f64),
{
    fn end_of_loop(&mut self, dt: f64, state: &State, t: f64) {
        self(dt, state, t)
    }
}

/// Everything needed to assemble a model in memory.
pub struct ModelParts {
    pub mesh: Mesh,
    pub bathymetry: Bathymetry,
    pub initial_state: State,
    pub boundary_conditions: Vec<Box<dyn BoundaryCondition>>,
    pub resolver: Box<dyn ResolutionMethod>,
    pub time_step: Box<dyn TimeStepPolicy>,
    pub sink: Box<dyn ResultSink>,
    pub simulation_time: f64,
    pub output_mode: OutputMode,
}

/// Outcome of [`ShallowWaterModel::run`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    /// Simulated time when the loop stopped.
    pub final_time: f64,
    /// Number of loop iterations.
    pub steps: usize,
    /// `None` when no step was taken.
    pub min_dt: Option<f64>,
    pub max_dt: Option<f64>,
    /// Snapshots handed to the result sink.
    pub snapshots: usize,
}

/// A configured shallow-water simulation.
pub struct ShallowWaterModel {
    mesh: Mesh,
    bathymetry: Bathymetry,
    state: State,
    boundary_conditions: Vec<Box<dyn BoundaryCondition>>,
    resolver: Box<dyn ResolutionMethod>,
    time_step: Box<dyn TimeStepPolicy>,
    sink: Box<dyn ResultSink>,
    listeners: Vec<Box<dyn LoopListener>>,
    simulation_time: f64,
    output_mode: OutputMode,
    time: f64,
}

impl ShallowWaterModel {
    /// Assemble a model from in-memory parts; time starts at 0.
    pub fn new(parts: ModelParts) -> Result<Self, HydroSieveError> {
        if !(parts.simulation_time.is_finite() && parts.simulation_time >= 0.0) {
            return Err(HydroSieveError::InvalidConfig {
                key: "simulation-time".into(),
                value: parts.simulation_time.to_string(),
                reason: "must be finite and >= 0".into(),
            });
        }
        let real = parts.initial_state.real().len();
        if real != parts.mesh.cell_count() {
            return Err(HydroSieveError::InitialStateLength {
                expected: parts.mesh.cell_count(),
                found: real,
            });
        }
        let mut kinds: Vec<BoundaryKind> = parts.mesh.boundaries().iter().map(|b| b.kind()).collect();
        for bc in &parts.boundary_conditions {
            for &b in bc.boundaries() {
                if let Some(kind) = kinds.get_mut(b) {
                    *kind = bc.kind();
                }
            }
        }
        let mut resolver = parts.resolver;
        resolver.set_boundary_kinds(&kinds);
        Ok(Self {
            mesh: parts.mesh,
            bathymetry: parts.bathymetry,
            state: parts.initial_state,
            boundary_conditions: parts.boundary_conditions,
            resolver,
            time_step: parts.time_step,
            sink: parts.sink,
            listeners: Vec::new(),
            simulation_time: parts.simulation_time,
            output_mode: parts.output_mode,
            time: 0.0,
        })
    }

    /// Load every resource named by `config` with the default boundary
    /// registry.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, HydroSieveError> {
        Self::from_config_with_registry(config, &BoundaryRegistry::default())
    }

    /// Like [`Self::from_config`] with a caller-supplied boundary registry.
    pub fn from_config_with_registry(
        config: &SimulationConfig,
        registry: &BoundaryRegistry,
    ) -> Result<Self, HydroSieveError> {
        config.validate()?;
        ensure_supported(config.temporal_scheme, config.spatial_scheme)?;

        let geo = GeoMeshReader.read_path(&config.mesh_file)?;
        let (mesh, origins) = geo.builder().build_with_origins()?;
        let mut cell_beds = geo.cell_beds;
        if let Some(path) = &config.bathymetry_file {
            Bathymetry::override_cell_beds(&mesh, &mut cell_beds, &read_id_values_path(path)?)?;
        }
        let bathymetry = Bathymetry::new(&mesh, cell_beds, &origins)?;
        let manning = match &config.manning_file {
            Some(path) => Manning::from_patches(&geo.manning, &read_id_values_path(path)?)?,
            None => Manning::none(),
        };
        let resolver = resolution_method(
            config.temporal_scheme,
            config.spatial_scheme,
            config.gravity,
            manning,
        )?;

        let initial = read_initial_state(
            BufReader::new(File::open(&config.initial_state_file)?),
            mesh.cell_count(),
        )?;
        let initial_state = State::new(&mesh, initial)?;

        let description =
            read_boundary_description(BufReader::new(File::open(&config.boundary_condition_file)?))?;
        let groups = BoundaryGroups::from_origins(&mesh, &origins);
        let forcing = ForcingFiles::new(&config.hydrographs_file, &config.rating_curve_file);
        let boundary_conditions = registry.create_all(&groups, &description, &forcing)?;

        let time_step: Box<dyn TimeStepPolicy> = if config.is_delta_adaptive {
            Box::new(CflTimeStep {
                cfl: config.cfl,
                gravity: config.gravity,
                fallback: config.default_delta,
            })
        } else {
            Box::new(FixedTimeStep(config.default_delta))
        };
        let sink = Box::new(ResultWriter::new(&config.result_path, config.delta_to_write)?);

        log::info!(
            "model ready: {} cells, {} boundaries in {} groups, {}/{} scheme",
            mesh.cell_count(),
            mesh.boundary_count(),
            groups.len(),
            config.temporal_scheme,
            config.spatial_scheme
        );
        Self::new(ModelParts {
            mesh,
            bathymetry,
            initial_state,
            boundary_conditions,
            resolver,
            time_step,
            sink,
            simulation_time: config.simulation_time,
            output_mode: config.output_mode,
        })
    }

    /// Register a listener; listeners are notified in subscription order.
    pub fn subscribe(&mut self, listener: impl LoopListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn bathymetry(&self) -> &Bathymetry {
        &self.bathymetry
    }

    /// Current state; after [`Self::run`] the final one.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Current simulated time.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn boundary_conditions(&self) -> &[Box<dyn BoundaryCondition>] {
        &self.boundary_conditions
    }

    /// Run the loop to completion, then convert the snapshots.
    ///
    /// A resolver error, or a resolved state with a negative or non-finite
    /// real cell, stops the run; the model keeps the last valid state.
    pub fn run(&mut self) -> Result<RunSummary, HydroSieveError> {
        let mut summary = RunSummary {
            final_time: self.time,
            steps: 0,
            min_dt: None,
            max_dt: None,
            snapshots: 0,
        };
        while self.time < self.simulation_time {
            for bc in &self.boundary_conditions {
                bc.update(&self.mesh, &self.bathymetry, &mut self.state, self.time);
            }
            let dt = checked_step(self.time_step.estimate(&self.state, &self.mesh)?)?;
            // the current state survives a failed or invalid step
            let next = self
                .resolver
                .resolve(self.state.clone(), dt, &self.mesh, &self.bathymetry)?;
            next.validate_invariants()?;
            self.state = next;
            self.time += dt;

            if self.sink.is_time_to_write(self.time) {
                self.sink.save(&self.mesh, &self.state, self.time)?;
                summary.snapshots += 1;
            }
            for listener in &mut self.listeners {
                listener.end_of_loop(dt, &self.state, self.time);
            }

            summary.steps += 1;
            summary.min_dt = Some(summary.min_dt.map_or(dt, |m| m.min(dt)));
            summary.max_dt = Some(summary.max_dt.map_or(dt, |m| m.max(dt)));
            log::debug!("step {} dt={dt} t={}", summary.steps, self.time);
        }
        summary.final_time = self.time;

        self.sink
            .convert_all(&self.mesh, &self.bathymetry, self.output_mode)?;
        log::info!(
            "run finished at t={} after {} steps, {} snapshots",
            summary.final_time,
            summary.steps,
            summary.snapshots
        );
        Ok(summary)
    }
}
