//! Layer construction with seam blending.
//!
//! A ring printed at a constant height shows a step where each layer starts
//! and ends. Instead, the first stretch of the ring (the slope prefix) is
//! printed as a ramp: both nozzle height and bead thickness climb linearly
//! from the previous layer's top to this layer's top. After the flat run
//! around the rest of the ring, the prefix is printed a second time at full
//! height with a bead that thins back out to nothing, filling the wedge the
//! up-ramp left behind.
//!
//! For one layer the emitted order is always:
//!
//! ```text
//! retract, travel XY, raise Z, un-retract, up-ramp..., flat..., down-ramp...
//! ```

use crate::flow::FlowCalculator;
use crate::geometry::Point;
use crate::motion::{MotionEmitter, MotionInstruction, MotionTag};
use crate::segment::{Ring, Segment};
use crate::{ToolpathError, ToolpathResult};
use seamkit_core::constants::{DEFAULT_RETRACT_LENGTH, DEFAULT_TRAVEL_SPEED, POSITION_EPSILON};
use seamkit_core::units::{to_mm_per_min, FeedRateUnits};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Index of the segment at which cumulative arc length first reaches
/// `seam_length`, or `None` if the ring is shorter than that.
///
/// A non-positive `seam_length` is reached by the first segment.
pub fn find_seam_boundary(segments: &[Segment], seam_length: f64) -> Option<usize> {
    let mut travelled = 0.0;
    for (index, segment) in segments.iter().enumerate() {
        travelled += segment.length();
        if travelled >= seam_length {
            trace!(index, travelled, seam_length, "seam boundary found");
            return Some(index);
        }
    }
    None
}

/// Split of a ring into the ramped slope prefix and the flat remainder.
#[derive(Debug, Clone, Copy)]
pub struct LayerPlan<'a> {
    ring: &'a Ring,
    slope_count: usize,
}

impl<'a> LayerPlan<'a> {
    /// Plans the split for `seam_length` millimeters of blending.
    ///
    /// If the ring is shorter than `seam_length` the whole ring is ramped.
    pub fn new(ring: &'a Ring, seam_length: f64) -> ToolpathResult<Self> {
        if ring.is_empty() {
            return Err(ToolpathError::degenerate(
                "cannot locate seam boundary on an empty ring",
            ));
        }

        let slope_count = match find_seam_boundary(ring.segments(), seam_length) {
            Some(index) => index + 1,
            None => {
                warn!(
                    seam_length,
                    perimeter = ring.perimeter(),
                    "Seam length exceeds ring perimeter, ramping across the whole ring"
                );
                ring.len()
            }
        };

        Ok(Self { ring, slope_count })
    }

    /// Segments printed as the up-ramp and again as the down-ramp.
    pub fn slope_segments(&self) -> &'a [Segment] {
        &self.ring.segments()[..self.slope_count]
    }

    /// Segments printed at constant height.
    pub fn flat_segments(&self) -> &'a [Segment] {
        &self.ring.segments()[self.slope_count..]
    }

    pub fn slope_count(&self) -> usize {
        self.slope_count
    }

    pub fn covers_whole_ring(&self) -> bool {
        self.slope_count == self.ring.len()
    }
}

/// Per-call inputs for one layer of one ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerRequest {
    /// Floor height: top of the previous layer (mm)
    pub current_z: f64,
    /// Height gained by this layer (mm)
    pub layer_height: f64,
    /// Arc length over which the seam is blended (mm); 0 for no blending
    pub seam_length: f64,
    /// Print speed (mm/s)
    pub speed: f64,
}

impl LayerRequest {
    pub fn new(current_z: f64, layer_height: f64, seam_length: f64, speed: f64) -> Self {
        Self {
            current_z,
            layer_height,
            seam_length,
            speed,
        }
    }

    fn validate(&self) -> ToolpathResult<()> {
        for (name, value) in [
            ("current_z", self.current_z),
            ("layer_height", self.layer_height),
            ("seam_length", self.seam_length),
        ] {
            if !value.is_finite() {
                return Err(ToolpathError::precondition(
                    name,
                    format!("must be finite, got {}", value),
                ));
            }
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ToolpathError::precondition(
                "speed",
                format!("must be > 0, got {}", self.speed),
            ));
        }
        Ok(())
    }
}

/// Tracks where the nozzle is while a layer is emitted, so that every
/// printing move provably starts at the previous move's end.
struct Cursor {
    position: Point,
}

impl Cursor {
    fn at(position: Point) -> Self {
        Self { position }
    }

    fn follow(&mut self, segment: &Segment) -> ToolpathResult<()> {
        let gap = self.position.distance_to(&segment.start());
        if gap > POSITION_EPSILON {
            return Err(ToolpathError::degenerate(format!(
                "segment starts at ({}, {}) but nozzle is at ({}, {})",
                segment.start().x,
                segment.start().y,
                self.position.x,
                self.position.y
            )));
        }
        self.position = segment.end();
        Ok(())
    }
}

fn checked_bead_height(height: f64, phase: MotionTag, index: usize) -> ToolpathResult<f64> {
    if height < 0.0 {
        return Err(ToolpathError::configuration(format!(
            "negative bead height {} on {} segment {}; check seam length and layer height",
            height, phase, index
        )));
    }
    Ok(height)
}

/// Emits complete layers for a ring.
#[derive(Debug, Clone, Copy)]
pub struct LayerBuilder {
    emitter: MotionEmitter,
    line_width: f64,
    travel_speed: f64,
    retract_length: f64,
}

impl LayerBuilder {
    /// Creates a builder laying beads `line_width` wide.
    pub fn new(flow: FlowCalculator, line_width: f64) -> ToolpathResult<Self> {
        if !line_width.is_finite() || line_width <= 0.0 {
            return Err(ToolpathError::precondition(
                "line_width",
                format!("must be > 0, got {}", line_width),
            ));
        }
        Ok(Self {
            emitter: MotionEmitter::new(flow),
            line_width,
            travel_speed: DEFAULT_TRAVEL_SPEED,
            retract_length: DEFAULT_RETRACT_LENGTH,
        })
    }

    /// Travel speed in mm/s for the moves to the seam point.
    pub fn with_travel_speed(mut self, travel_speed: f64) -> ToolpathResult<Self> {
        if !travel_speed.is_finite() || travel_speed <= 0.0 {
            return Err(ToolpathError::precondition(
                "travel_speed",
                format!("must be > 0, got {}", travel_speed),
            ));
        }
        self.travel_speed = travel_speed;
        Ok(self)
    }

    pub fn with_retract_length(mut self, retract_length: f64) -> ToolpathResult<Self> {
        if !retract_length.is_finite() || retract_length < 0.0 {
            return Err(ToolpathError::precondition(
                "retract_length",
                format!("must be >= 0, got {}", retract_length),
            ));
        }
        self.retract_length = retract_length;
        Ok(self)
    }

    /// Builds one layer of `ring`, rising from `request.current_z` to
    /// `request.current_z + request.layer_height`.
    pub fn build(
        &self,
        ring: &Ring,
        request: &LayerRequest,
    ) -> ToolpathResult<Vec<MotionInstruction>> {
        request.validate()?;
        let plan = LayerPlan::new(ring, request.seam_length)?;
        let slope = plan.slope_segments();
        let flat = plan.flat_segments();

        debug!(
            current_z = request.current_z,
            segments = ring.len(),
            slope = slope.len(),
            flat = flat.len(),
            "Building layer"
        );

        let mut moves = Vec::with_capacity(4 + 2 * slope.len() + flat.len());
        let seam = ring.seam_point();
        let travel_feed = to_mm_per_min(self.travel_speed, FeedRateUnits::MmPerSec);

        moves.push(MotionInstruction::extrude(
            -self.retract_length,
            MotionTag::Retract,
        ));
        moves.push(MotionInstruction::travel_xy(seam, travel_feed));
        moves.push(MotionInstruction::travel_z(request.current_z, travel_feed));
        moves.push(MotionInstruction::extrude(
            self.retract_length,
            MotionTag::Unretract,
        ));

        let mut cursor = Cursor::at(seam);
        let layer_height = request.layer_height;
        let goal_z = request.current_z + layer_height;
        let k = slope.len();
        let z_step = layer_height / k as f64;
        // The last ramp step lands exactly on the layer height.
        let rise = |steps: usize| {
            if steps == k {
                layer_height
            } else {
                z_step * steps as f64
            }
        };

        for (i, segment) in slope.iter().enumerate() {
            cursor.follow(segment)?;
            let height = checked_bead_height(rise(i + 1), MotionTag::Slope, i)?;
            moves.push(self.emit(
                segment,
                request.current_z + rise(i + 1),
                height,
                request.speed,
                MotionTag::Slope,
            ));
        }

        let flat_height = checked_bead_height(layer_height, MotionTag::Straight, k)?;
        for segment in flat {
            cursor.follow(segment)?;
            moves.push(self.emit(
                segment,
                goal_z,
                flat_height,
                request.speed,
                MotionTag::Straight,
            ));
        }

        for (i, segment) in slope.iter().enumerate() {
            cursor.follow(segment)?;
            let height = checked_bead_height(z_step * (k - i - 1) as f64, MotionTag::FinishSeam, i)?;
            moves.push(self.emit(
                segment,
                goal_z,
                height,
                request.speed,
                MotionTag::FinishSeam,
            ));
        }

        Ok(moves)
    }

    fn emit(
        &self,
        segment: &Segment,
        z: f64,
        bead_height: f64,
        speed: f64,
        tag: MotionTag,
    ) -> MotionInstruction {
        self.emitter
            .emit(segment, z, bead_height, self.line_width, speed, Some(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{points_on_circle, Point};

    fn square() -> Ring {
        Ring::from_points(&points_on_circle(Point::new(0.0, 0.0), 10.0, 4, 0.0).unwrap()).unwrap()
    }

    fn builder() -> LayerBuilder {
        LayerBuilder::new(FlowCalculator::default(), 0.8).unwrap()
    }

    fn tags(moves: &[MotionInstruction]) -> Vec<Option<MotionTag>> {
        moves.iter().map(|m| m.tag()).collect()
    }

    #[test]
    fn test_boundary_search() {
        let ring = square();
        let side = ring.segments()[0].length();
        assert_eq!(find_seam_boundary(ring.segments(), 0.0), Some(0));
        assert_eq!(find_seam_boundary(ring.segments(), -3.0), Some(0));
        assert_eq!(find_seam_boundary(ring.segments(), side * 1.5), Some(1));
        assert_eq!(find_seam_boundary(ring.segments(), side * 10.0), None);
        assert_eq!(find_seam_boundary(&[], 1.0), None);
    }

    #[test]
    fn test_plan_partitions_ring() {
        let ring = square();
        let side = ring.segments()[0].length();
        let plan = LayerPlan::new(&ring, side * 2.5).unwrap();
        assert_eq!(plan.slope_count(), 3);
        assert_eq!(plan.slope_segments().len(), 3);
        assert_eq!(plan.flat_segments().len(), 1);
        assert!(!plan.covers_whole_ring());

        let whole = LayerPlan::new(&ring, ring.perimeter() * 2.0).unwrap();
        assert!(whole.covers_whole_ring());
        assert!(whole.flat_segments().is_empty());
    }

    #[test]
    fn test_square_layer_structure() {
        let moves = builder()
            .build(&square(), &LayerRequest::new(0.0, 0.3, 5.0, 50.0))
            .unwrap();

        assert_eq!(moves.len(), 9);
        assert_eq!(
            tags(&moves),
            vec![
                Some(MotionTag::Retract),
                None,
                None,
                Some(MotionTag::Unretract),
                Some(MotionTag::Slope),
                Some(MotionTag::Straight),
                Some(MotionTag::Straight),
                Some(MotionTag::Straight),
                Some(MotionTag::FinishSeam),
            ]
        );
        assert_eq!(moves[0].e(), Some(-0.5));
        assert_eq!(moves[1].target(), Some(Point::new(10.0, 0.0)));
        assert_eq!(moves[1].feed_rate(), Some(12000.0));
        assert_eq!(moves[2].z(), Some(0.0));
        assert_eq!(moves[3].e(), Some(0.5));
        assert_eq!(moves[4].z(), Some(0.3));
        assert_eq!(moves[8].z(), Some(0.3));
        assert_eq!(moves[8].e(), Some(0.0));
    }

    #[test]
    fn test_ramp_heights_interpolate() {
        let ring = square();
        let side = ring.segments()[0].length();
        let moves = builder()
            .build(&ring, &LayerRequest::new(0.9, 0.3, side * 2.5, 50.0))
            .unwrap();

        // 4 setup + 3 slope + 1 flat + 3 finish
        assert_eq!(moves.len(), 11);
        let slope_z: Vec<f64> = moves[4..7].iter().map(|m| m.z().unwrap()).collect();
        assert!((slope_z[0] - 1.0).abs() < 1e-12);
        assert!((slope_z[1] - 1.1).abs() < 1e-12);
        assert_eq!(slope_z[2], 0.9 + 0.3);
        for m in &moves[7..] {
            assert_eq!(m.z(), Some(0.9 + 0.3));
        }
    }

    #[test]
    fn test_moves_chain_back_to_seam() {
        let ring = square();
        let moves = builder()
            .build(&ring, &LayerRequest::new(0.3, 0.3, 20.0, 50.0))
            .unwrap();
        let last = moves.last().unwrap();
        let plan = LayerPlan::new(&ring, 20.0).unwrap();
        assert_eq!(last.target(), Some(plan.slope_segments().last().unwrap().end()));

        let straight_end = moves
            .iter()
            .filter(|m| m.tag() == Some(MotionTag::Straight))
            .last()
            .unwrap();
        assert_eq!(straight_end.target(), Some(ring.seam_point()));
    }

    #[test]
    fn test_negative_layer_height_fails_fast() {
        let err = builder()
            .build(&square(), &LayerRequest::new(0.3, -0.3, 5.0, 50.0))
            .unwrap_err();
        assert!(matches!(err, ToolpathError::Configuration { .. }));
    }

    #[test]
    fn test_rejects_bad_request() {
        let ring = square();
        let b = builder();
        assert!(matches!(
            b.build(&ring, &LayerRequest::new(f64::NAN, 0.3, 5.0, 50.0)),
            Err(ToolpathError::Precondition { .. })
        ));
        assert!(b.build(&ring, &LayerRequest::new(0.0, 0.3, 5.0, 0.0)).is_err());
        assert!(b.build(&ring, &LayerRequest::new(0.0, 0.3, f64::INFINITY, 50.0)).is_err());
    }

    #[test]
    fn test_builder_options() {
        assert!(LayerBuilder::new(FlowCalculator::default(), 0.0).is_err());
        assert!(builder().with_travel_speed(-1.0).is_err());
        assert!(builder().with_retract_length(-0.1).is_err());

        let b = builder()
            .with_travel_speed(150.0)
            .unwrap()
            .with_retract_length(0.8)
            .unwrap();
        let moves = b
            .build(&square(), &LayerRequest::new(0.0, 0.2, 0.0, 30.0))
            .unwrap();
        assert_eq!(moves[0].e(), Some(-0.8));
        assert_eq!(moves[1].feed_rate(), Some(9000.0));
        assert_eq!(moves[3].e(), Some(0.8));
        assert_eq!(moves[4].feed_rate(), Some(1800.0));
    }
}
