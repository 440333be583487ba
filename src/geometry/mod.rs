//! Geometry utilities for hydro-sieve.
//!
//! This module provides the planar polygon helpers used to derive cell
//! surfaces, perimeters, gravity centres and edge normals.

pub mod polygon;

pub use polygon::{
    Point2, distance, midpoint, polygon_area, polygon_center, polygon_perimeter,
    unit_outward_normal,
};
