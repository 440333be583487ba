//! Planar polygon and segment helpers.
//!
//! All functions take plain `[f64; 2]` points and are free of state. Vertex
//! lists are interpreted in the order given; no winding-order validation is
//! performed, so a self-intersecting ordering silently yields the wrong area.

/// A point (or vector) in the plane.
pub type Point2 = [f64; 2];

/// Area of a simple polygon by the shoelace formula.
///
/// The absolute value of the signed sum is returned, so clockwise and
/// counter-clockwise orderings give the same result.
pub fn polygon_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let [xi, yi] = points[i];
        let [xj, yj] = points[(i + 1) % n];
        twice_area += xi * yj - xj * yi;
    }
    twice_area.abs() / 2.0
}

/// Sum of the distances between consecutive points, wrapping last to first.
pub fn polygon_perimeter(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| distance(points[i], points[(i + 1) % n]))
        .sum()
}

/// Arithmetic mean of the points.
///
/// This is the "gravity centre" used throughout the mesh. It is not the
/// area-weighted centroid of the polygon; the two coincide for triangles and
/// parallelograms only.
pub fn polygon_center(points: &[Point2]) -> Point2 {
    if points.is_empty() {
        return [0.0, 0.0];
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
    [sx / n, sy / n]
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point2, b: Point2) -> f64 {
    ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt()
}

/// Midpoint of a segment.
#[inline]
pub fn midpoint(a: Point2, b: Point2) -> Point2 {
    polygon_center(&[a, b])
}

/// Unit normal of segment `(a, b)` pointing away from `avoid`.
///
/// The side of `avoid` is found from the sign of the 2-D cross product
/// `(b - a) x (avoid - a)`. A zero-length segment returns `[0.0, 0.0]`. When
/// `avoid` lies on the supporting line the left-hand normal is returned.
pub fn unit_outward_normal(a: Point2, b: Point2, avoid: Point2) -> Point2 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let magnitude = (dx * dx + dy * dy).sqrt();
    if magnitude == 0.0 {
        return [0.0, 0.0];
    }
    let cross = dx * (avoid[1] - a[1]) - dy * (avoid[0] - a[0]);
    // avoid on the left: turn right
    let normal = if cross > 0.0 { [dy, -dx] } else { [-dy, dx] };
    [normal[0] / magnitude, normal[1] / magnitude]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn unit_square_metrics() {
        let square = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        assert!((polygon_area(&square) - 1.0).abs() < TOL);
        assert!((polygon_perimeter(&square) - 4.0).abs() < TOL);
        assert_eq!(polygon_center(&square), [0.5, 0.5]);
    }

    #[test]
    fn area_ignores_winding() {
        let ccw = [[0.0, 0.0], [2.0, 0.0], [0.0, 3.0]];
        let cw = [[0.0, 0.0], [0.0, 3.0], [2.0, 0.0]];
        assert!((polygon_area(&ccw) - 3.0).abs() < TOL);
        assert!((polygon_area(&cw) - 3.0).abs() < TOL);
    }

    #[test]
    fn center_is_vertex_mean_not_area_centroid() {
        // Trapezoid: mean of vertices differs from the true centroid.
        let trap = [[0.0, 0.0], [4.0, 0.0], [3.0, 1.0], [1.0, 1.0]];
        assert_eq!(polygon_center(&trap), [2.0, 0.5]);
    }

    #[test]
    fn normal_points_away_from_avoid_point() {
        let n = unit_outward_normal([0.0, 0.0], [1.0, 0.0], [0.5, 0.5]);
        assert!((n[0] - 0.0).abs() < TOL && (n[1] + 1.0).abs() < TOL);
        let n = unit_outward_normal([0.0, 0.0], [1.0, 0.0], [0.5, -0.5]);
        assert!((n[0] - 0.0).abs() < TOL && (n[1] - 1.0).abs() < TOL);
    }

    #[test]
    fn normal_is_unit_and_orthogonal() {
        let (a, b) = ([0.3, -1.2], [2.7, 4.1]);
        let n = unit_outward_normal(a, b, [0.0, 3.0]);
        let dot = n[0] * (b[0] - a[0]) + n[1] * (b[1] - a[1]);
        assert!(dot.abs() < 1e-10);
        assert!(((n[0] * n[0] + n[1] * n[1]).sqrt() - 1.0).abs() < TOL);
    }

    #[test]
    fn degenerate_segment_yields_zero_normal() {
        assert_eq!(unit_outward_normal([1.0, 1.0], [1.0, 1.0], [0.0, 0.0]), [0.0, 0.0]);
    }
}
