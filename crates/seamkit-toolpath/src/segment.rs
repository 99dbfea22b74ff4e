//! Segment and ring types.

use crate::geometry::Point;
use crate::{ToolpathError, ToolpathResult};

/// A directed line segment between two ring vertices.
///
/// The length is computed once on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    start: Point,
    end: Point,
    length: f64,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            length: start.distance_to(&end),
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Same segment traversed end to start.
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            length: self.length,
        }
    }
}

/// A closed polygon: segment `i` ends where segment `i + 1` starts and the
/// last segment ends at the first segment's start.
///
/// Built once per print and shared read-only by every layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    segments: Vec<Segment>,
    perimeter: f64,
}

impl Ring {
    /// Closes an ordered point sequence into a ring.
    pub fn from_points(points: &[Point]) -> ToolpathResult<Self> {
        if points.len() < 3 {
            return Err(ToolpathError::degenerate(format!(
                "ring needs at least 3 points, got {}",
                points.len()
            )));
        }

        let segments: Vec<Segment> = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(start, end)| Segment::new(*start, *end))
            .collect();
        let perimeter = segments.iter().map(Segment::length).sum();

        Ok(Self {
            segments,
            perimeter,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// First vertex, where every layer of this ring starts and ends.
    pub fn seam_point(&self) -> Point {
        self.segments[0].start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 4.0),
        ]
    }

    #[test]
    fn test_segment_length() {
        let seg = Segment::new(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert_eq!(seg.length(), 5.0);
        assert_eq!(seg.reversed().length(), 5.0);
        assert_eq!(seg.reversed().start(), seg.end());
    }

    #[test]
    fn test_zero_length_segment() {
        let p = Point::new(1.5, -2.0);
        let seg = Segment::new(p, p);
        assert_eq!(seg.length(), 0.0);
    }

    #[test]
    fn test_ring_closes() {
        let ring = Ring::from_points(&triangle()).unwrap();
        assert_eq!(ring.len(), 3);
        let segs = ring.segments();
        assert_eq!(segs[0].end(), segs[1].start());
        assert_eq!(segs[1].end(), segs[2].start());
        assert_eq!(segs[2].end(), segs[0].start());
        assert_eq!(ring.perimeter(), 12.0);
        assert_eq!(ring.seam_point(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_ring_rejects_too_few_points() {
        let pts = triangle();
        assert!(matches!(
            Ring::from_points(&pts[..2]),
            Err(ToolpathError::DegenerateGeometry { .. })
        ));
        assert!(Ring::from_points(&pts[..1]).is_err());
        assert!(Ring::from_points(&[]).is_err());
    }
}
