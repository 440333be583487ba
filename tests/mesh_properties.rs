mod util;

use hydro_sieve::prelude::*;
use proptest::prelude::*;
use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};
use util::*;

proptest! {
    #[test]
    fn prop_cell_order_does_not_change_topology(
        nx in 1u64..6,
        ny in 1u64..6,
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let (vertices, mut cells) = grid_records(nx, ny);
        let reference = grid(nx, ny);
        cells.shuffle(&mut rng);
        let shuffled = MeshBuilder::from_raw(vertices, cells, Vec::new(), Vec::new())
            .build()
            .unwrap();

        prop_assert_eq!(shuffled.edge_count(), reference.edge_count());
        prop_assert_eq!(shuffled.boundary_count(), reference.boundary_count());
        prop_assert_eq!(shuffled.edge_count() as u64, nx * (ny + 1) + ny * (nx + 1));
        prop_assert_eq!(shuffled.boundary_count() as u64, 2 * (nx + ny));
        prop_assert!((shuffled.surface() - (nx * ny) as f64).abs() < 1e-9);
        prop_assert!(shuffled.validate_invariants().is_ok());
    }

    #[test]
    fn prop_every_edge_has_unit_normal_and_two_sides(
        nx in 1u64..6,
        ny in 1u64..6,
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let (mut vertices, mut cells) = grid_records(nx, ny);
        vertices.shuffle(&mut rng);
        cells.shuffle(&mut rng);
        let mesh = MeshBuilder::from_raw(vertices, cells, Vec::new(), Vec::new())
            .build()
            .unwrap();

        for edge in mesh.edges() {
            let [a, b] = edge.cells();
            prop_assert_ne!(a, b);
            prop_assert!(!a.is_ghost());
            let n = edge.normal();
            prop_assert!((n[0].hypot(n[1]) - 1.0).abs() < 1e-12);
            let [va, vb] = edge.vertices();
            let (pa, pb) = (mesh.vertices()[va].coords(), mesh.vertices()[vb].coords());
            prop_assert!((n[0] * (pb[0] - pa[0]) + n[1] * (pb[1] - pa[1])).abs() < 1e-12);
            prop_assert_eq!(edge.is_boundary(), b.is_ghost());
        }
        for cell in mesh.cells() {
            prop_assert_eq!(cell.edges().len(), 4);
            prop_assert_eq!(cell.neighbors().len(), 4);
            prop_assert!(cell.surface() >= 0.0);
            let ghosts = cell.neighbors().iter().filter(|n| n.is_ghost()).count();
            prop_assert_eq!(cell.is_boundary(), ghosts > 0);
        }
    }
}
