mod util;

use hydro_sieve::boundary::{BoundarySetup, Wall};
use hydro_sieve::data::InlineForcing;
use hydro_sieve::io::read_boundary_description;
use hydro_sieve::prelude::*;
use util::*;

/// Condition that records what the registry handed to it.
struct Recorder {
    group: u32,
    boundaries: Vec<usize>,
}

impl BoundaryCondition for Recorder {
    fn kind(&self) -> BoundaryKind {
        BoundaryKind::Inflow
    }
    fn group(&self) -> u32 {
        self.group
    }
    fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }
    fn update(&self, _: &Mesh, _: &Bathymetry, state: &mut State, t: f64) {
        for &b in &self.boundaries {
            state[CellRef::Ghost(b)].h = t;
        }
    }
}

fn recorder(setup: BoundarySetup<'_>) -> Result<Box<dyn BoundaryCondition>, HydroSieveError> {
    Ok(Box::new(Recorder {
        group: setup.group,
        boundaries: setup.boundaries,
    }))
}

fn forcing() -> InlineForcing {
    InlineForcing {
        hydrographs: vec![ForcingSeries::constant(2.0)],
        rating_curves: vec![ForcingSeries::constant(1.0)],
    }
}

#[test]
fn wall_continues_surface_and_reflects_u() {
    let mut b = MeshBuilder::new();
    b.add_vertex(1, 0.0, 0.0)
        .add_vertex(2, 1.0, 0.0)
        .add_vertex(3, 1.0, 1.0)
        .add_vertex(4, 0.0, 1.0)
        .add_cell(1, [1, 2, 3, 4])
        .add_inlet(record(1, 4, 2.0, 1));
    let (mesh, origins) = b.build_with_origins().unwrap();
    let bathymetry = Bathymetry::new(&mesh, vec![1.0], &origins).unwrap();
    let b = boundary_at(&mesh, 1, 4);
    let mut state = State::uniform(&mesh, CellState::new(3.0, 4.0, 5.0));

    Wall::new(1, vec![b]).update(&mesh, &bathymetry, &mut state, 0.0);
    assert_eq!(state[CellRef::Ghost(b)], CellState::new(2.0, -4.0, 5.0));
    // only the listed boundary is touched
    let other = boundary_at(&mesh, 1, 1);
    assert_eq!(state[CellRef::Ghost(other)], CellState::default());
}

#[test]
fn registry_builds_one_condition_per_group() {
    let groups = BoundaryGroups::from_pairs([(0, 0), (1, 1), (2, 2), (3, 3), (4, 4), (5, 4)]);
    let description =
        read_boundary_description("4\n1 recorder\n2 recorder\n3 recorder\n4 recorder\n".as_bytes()).unwrap();
    let mut registry = BoundaryRegistry::default();
    registry.register("recorder", recorder);

    let bcs = registry.create_all(&groups, &description, &forcing()).unwrap();
    assert_eq!(bcs.len(), 5);
    let order: Vec<u32> = bcs.iter().map(|bc| bc.group()).collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4]);
    // group 0 is undescribed and falls back to a wall
    assert_eq!(bcs[0].kind(), BoundaryKind::Wall);
    assert_eq!(bcs[4].boundaries(), &[4, 5]);
}

#[test]
fn unknown_namespace_is_rejected() {
    let groups = BoundaryGroups::from_pairs([(0, 1)]);
    let description = read_boundary_description("1\n1 weir 3\n".as_bytes()).unwrap();
    assert!(matches!(
        BoundaryRegistry::default().create_all(&groups, &description, &forcing()),
        Err(HydroSieveError::UnknownBoundaryNamespace(ns)) if ns == "weir"
    ));
}

#[test]
fn forcing_arguments_are_checked() {
    let groups = BoundaryGroups::from_pairs([(0, 1)]);
    let registry = BoundaryRegistry::default();

    let missing = read_boundary_description("1\n1 discharg1\n".as_bytes()).unwrap();
    assert!(matches!(
        registry.create_all(&groups, &missing, &forcing()),
        Err(HydroSieveError::MissingBoundaryArgument { group: 1, .. })
    ));

    let garbage = read_boundary_description("1\n1 ratcurve first\n".as_bytes()).unwrap();
    assert!(matches!(
        registry.create_all(&groups, &garbage, &forcing()),
        Err(HydroSieveError::InvalidConfig { .. })
    ));

    let out_of_range = read_boundary_description("1\n1 discharg1 2\n".as_bytes()).unwrap();
    assert!(matches!(
        registry.create_all(&groups, &out_of_range, &forcing()),
        Err(HydroSieveError::ForcingSeriesIndex {
            requested: 2,
            available: 1
        })
    ));
}

#[test]
fn channel_conditions_drive_ghosts() {
    let (mesh, origins) = channel().build_with_origins().unwrap();
    let bathymetry = Bathymetry::flat(&mesh, 0.0);
    let groups = BoundaryGroups::from_origins(&mesh, &origins);
    let description =
        read_boundary_description("2\n1 discharg1 1\n2 ratcurve 1\n".as_bytes()).unwrap();
    let bcs = BoundaryRegistry::default()
        .create_all(&groups, &description, &forcing())
        .unwrap();
    let kinds: Vec<BoundaryKind> = bcs.iter().map(|bc| bc.kind()).collect();
    assert_eq!(
        kinds,
        vec![BoundaryKind::Wall, BoundaryKind::Inflow, BoundaryKind::Outflow]
    );

    let mut state = State::uniform(&mesh, CellState::new(1.0, 0.0, 0.0));
    for bc in &bcs {
        bc.update(&mesh, &bathymetry, &mut state, 0.0);
    }

    for cell in [1, 3] {
        let g = state[CellRef::Ghost(boundary_at(&mesh, cell, 4))];
        assert!(approx(g.u, 1.0));
        assert!(approx(g.v, 0.0));
    }
    for cell in [2, 4] {
        // dry ghost, depth floored at 1e-4: q / (2 * 1e-4)
        let g = state[CellRef::Ghost(boundary_at(&mesh, cell, 2))];
        assert!((g.u - 5000.0).abs() < 1e-6);
        assert_eq!(g.h, 0.0);
    }
    let wall = state[CellRef::Ghost(boundary_at(&mesh, 1, 1))];
    assert_eq!(wall.h, 1.0);
    assert_eq!(wall.u, 0.0);
}
