//! Brute-force pairwise intersection checking.
//!
//! Quadratic in the number of segments; serves as an oracle for the sweep
//! in tests and benchmarks.

use crate::geom::Point;
use crate::segments::Segments;

/// Computes every pairwise intersection point by testing all pairs.
///
/// Points are deduplicated and returned in sweep order, matching the report
/// order of [`crate::sweep::sweep`]. Pairs with no single crossing point
/// (disjoint segments, or collinear overlaps) contribute nothing.
pub fn pairwise_intersections(segments: &Segments) -> Vec<Point> {
    let indices: Vec<_> = segments.indices().collect();
    let mut points = Vec::new();
    for (i, &a) in indices.iter().enumerate() {
        for &b in &indices[i + 1..] {
            if let Some(p) = segments[a].intersection_point(&segments[b]) {
                points.push(p);
            }
        }
    }
    points.sort();
    points.dedup();
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic() {
        let segs = Segments::from_coords([
            (0.0, 0.0, 4.0, 4.0),
            (0.0, 4.0, 4.0, 0.0),
            (9.0, 0.0, 9.0, 9.0),
        ])
        .unwrap();
        assert_eq!(pairwise_intersections(&segs), vec![Point::new(2.0, 2.0)]);
    }

    #[test]
    fn concurrent_point_reported_once() {
        let segs = Segments::from_coords([
            (0.0, 0.0, 4.0, 4.0),
            (0.0, 2.0, 2.0, 0.0),
            (1.0, 5.0, 1.0, -1.0),
        ])
        .unwrap();
        assert_eq!(pairwise_intersections(&segs), vec![Point::new(1.0, 1.0)]);
    }

    #[test]
    fn collinear_overlap_is_not_a_point() {
        let segs = Segments::from_coords([(0.0, 0.0, 4.0, 0.0), (2.0, 0.0, 6.0, 0.0)]).unwrap();
        assert_eq!(pairwise_intersections(&segs), vec![]);
    }

    #[test]
    fn output_is_in_sweep_order() {
        let segs = Segments::from_coords([
            (0.0, 0.0, 10.0, 10.0),
            (0.0, 4.0, 4.0, 0.0),
            (0.0, 10.0, 10.0, 0.0),
        ])
        .unwrap();
        assert_eq!(
            pairwise_intersections(&segs),
            vec![Point::new(5.0, 5.0), Point::new(2.0, 2.0)]
        );
    }
}
