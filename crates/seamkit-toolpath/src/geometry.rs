//! Ring geometry: points on a circle and concentric ring families.

use crate::segment::Ring;
use crate::{ToolpathError, ToolpathResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A 2D coordinate in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Generates `vertex_count` points evenly spaced on a circle.
///
/// Point `i` sits at angle `i * 2π / n + angle_offset` (offset in degrees),
/// so the sequence runs counter-clockwise starting from the offset angle.
pub fn points_on_circle(
    center: Point,
    radius: f64,
    vertex_count: usize,
    angle_offset: f64,
) -> ToolpathResult<Vec<Point>> {
    if !center.x.is_finite() || !center.y.is_finite() {
        return Err(ToolpathError::precondition(
            "center",
            format!("must be finite, got ({}, {})", center.x, center.y),
        ));
    }
    if !radius.is_finite() || radius <= 0.0 {
        return Err(ToolpathError::precondition(
            "radius",
            format!("must be > 0, got {}", radius),
        ));
    }
    if vertex_count < 3 {
        return Err(ToolpathError::precondition(
            "vertex_count",
            format!("must be >= 3, got {}", vertex_count),
        ));
    }
    if !angle_offset.is_finite() {
        return Err(ToolpathError::precondition(
            "angle_offset",
            format!("must be finite, got {}", angle_offset),
        ));
    }

    let offset = angle_offset.to_radians();
    let n = vertex_count as f64;
    Ok((0..vertex_count)
        .map(|i| {
            let angle = i as f64 * 2.0 * PI / n + offset;
            Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect())
}

/// Circle parameters for one printed ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleSpec {
    pub center: Point,
    pub radius: f64,
    pub vertex_count: usize,
    /// Angle of the first vertex (seam point), in degrees
    pub angle_offset: f64,
}

impl CircleSpec {
    pub fn new(center: Point, radius: f64, vertex_count: usize, angle_offset: f64) -> Self {
        Self {
            center,
            radius,
            vertex_count,
            angle_offset,
        }
    }

    pub fn points(&self) -> ToolpathResult<Vec<Point>> {
        points_on_circle(self.center, self.radius, self.vertex_count, self.angle_offset)
    }

    pub fn ring(&self) -> ToolpathResult<Ring> {
        Ring::from_points(&self.points()?)
    }
}

/// Builds `count` concentric rings, ring `i` having radius `base + spacing * i`.
///
/// Rings come back innermost first, so the last one is the exterior wall.
pub fn concentric_rings(
    base: CircleSpec,
    spacing: f64,
    count: usize,
) -> ToolpathResult<Vec<Ring>> {
    if !spacing.is_finite() || spacing < 0.0 {
        return Err(ToolpathError::precondition(
            "spacing",
            format!("must be >= 0, got {}", spacing),
        ));
    }

    (0..count)
        .map(|i| {
            CircleSpec {
                radius: base.radius + spacing * i as f64,
                ..base
            }
            .ring()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_square_points() {
        let points = points_on_circle(Point::new(0.0, 0.0), 10.0, 4, 0.0).unwrap();
        assert_eq!(points.len(), 4);
        assert_close(points[0].x, 10.0);
        assert_close(points[0].y, 0.0);
        assert_close(points[1].x, 0.0);
        assert_close(points[1].y, 10.0);
        assert_close(points[2].x, -10.0);
        assert_close(points[3].y, -10.0);
    }

    #[test]
    fn test_angle_offset_moves_seam() {
        let points = points_on_circle(Point::new(90.0, 90.0), 20.0, 200, -90.0).unwrap();
        // Seam at the front (lowest Y) of the circle
        assert_close(points[0].x, 90.0);
        assert_close(points[0].y, 70.0);
    }

    #[test]
    fn test_counter_clockwise_order() {
        let points = points_on_circle(Point::new(0.0, 0.0), 5.0, 12, 0.0).unwrap();
        let signed_area: f64 = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum();
        assert!(signed_area > 0.0);
    }

    #[test]
    fn test_all_points_on_radius() {
        let center = Point::new(3.0, -4.0);
        for p in points_on_circle(center, 7.5, 37, 12.0).unwrap() {
            assert_close(p.distance_to(&center), 7.5);
        }
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let origin = Point::new(0.0, 0.0);
        assert!(matches!(
            points_on_circle(origin, 0.0, 8, 0.0),
            Err(ToolpathError::Precondition { .. })
        ));
        assert!(points_on_circle(origin, -1.0, 8, 0.0).is_err());
        assert!(points_on_circle(origin, f64::NAN, 8, 0.0).is_err());
        assert!(points_on_circle(origin, 1.0, 2, 0.0).is_err());
        assert!(points_on_circle(origin, 1.0, 0, 0.0).is_err());
        assert!(points_on_circle(origin, 1.0, 8, f64::INFINITY).is_err());
        assert!(points_on_circle(Point::new(f64::NAN, 0.0), 1.0, 8, 0.0).is_err());
    }

    #[test]
    fn test_concentric_radii() {
        let base = CircleSpec::new(Point::new(0.0, 0.0), 20.0, 64, 0.0);
        let rings = concentric_rings(base, 0.8, 4).unwrap();
        assert_eq!(rings.len(), 4);
        for (i, ring) in rings.iter().enumerate() {
            let expected = 20.0 + 0.8 * i as f64;
            assert_close(ring.seam_point().x, expected);
        }
        assert!(rings[3].perimeter() > rings[0].perimeter());
    }

    #[test]
    fn test_concentric_rejects_negative_spacing() {
        let base = CircleSpec::new(Point::new(0.0, 0.0), 20.0, 64, 0.0);
        assert!(concentric_rings(base, -0.1, 2).is_err());
        assert!(concentric_rings(base, 0.8, 0).unwrap().is_empty());
    }
}
