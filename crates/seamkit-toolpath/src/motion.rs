//! Motion instructions and the per-segment emitter.

use crate::flow::FlowCalculator;
use crate::geometry::Point;
use crate::segment::Segment;
use seamkit_core::units::{to_mm_per_min, FeedRateUnits};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Human-readable label attached to an instruction as a trailing comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionTag {
    /// Filament pulled back before travel
    Retract,
    /// Filament pushed forward before printing
    Unretract,
    /// Rising seam ramp
    Slope,
    /// Constant-height run
    Straight,
    /// Thinning bead laid back over the seam ramp
    FinishSeam,
}

impl MotionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retract => "retract",
            Self::Unretract => "unretract",
            Self::Slope => "slope",
            Self::Straight => "straight",
            Self::FinishSeam => "finish_seam",
        }
    }
}

impl fmt::Display for MotionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One linear move of the machine.
///
/// Every word is optional: a retract only carries `E`, a travel move only
/// `X`, `Y` and `F`. The move starts wherever the previous one ended.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionInstruction {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    e: Option<f64>,
    feed_rate: Option<f64>,
    tag: Option<MotionTag>,
}

impl MotionInstruction {
    /// Filament-only move (retract when `length` is negative).
    pub fn extrude(length: f64, tag: MotionTag) -> Self {
        Self {
            e: Some(length),
            tag: Some(tag),
            ..Self::default()
        }
    }

    /// Non-printing XY move.
    pub fn travel_xy(target: Point, feed_rate: f64) -> Self {
        Self {
            x: Some(target.x),
            y: Some(target.y),
            feed_rate: Some(feed_rate),
            ..Self::default()
        }
    }

    /// Non-printing Z move.
    pub fn travel_z(z: f64, feed_rate: f64) -> Self {
        Self {
            z: Some(z),
            feed_rate: Some(feed_rate),
            ..Self::default()
        }
    }

    /// Printing move to `target` at height `z`.
    pub fn print_move(
        target: Point,
        z: f64,
        extrusion: f64,
        feed_rate: f64,
        tag: Option<MotionTag>,
    ) -> Self {
        Self {
            x: Some(target.x),
            y: Some(target.y),
            z: Some(z),
            e: Some(extrusion),
            feed_rate: Some(feed_rate),
            tag,
        }
    }

    pub fn x(&self) -> Option<f64> {
        self.x
    }

    pub fn y(&self) -> Option<f64> {
        self.y
    }

    pub fn z(&self) -> Option<f64> {
        self.z
    }

    /// Filament delta (mm)
    pub fn e(&self) -> Option<f64> {
        self.e
    }

    /// Feed rate (mm/min)
    pub fn feed_rate(&self) -> Option<f64> {
        self.feed_rate
    }

    pub fn tag(&self) -> Option<MotionTag> {
        self.tag
    }

    /// XY target, if the move has one.
    pub fn target(&self) -> Option<Point> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }

    /// True when the move deposits material while moving in XY.
    pub fn is_printing(&self) -> bool {
        self.target().is_some() && self.e.is_some()
    }
}

/// Turns ring segments into printing moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionEmitter {
    flow: FlowCalculator,
}

impl MotionEmitter {
    pub fn new(flow: FlowCalculator) -> Self {
        Self { flow }
    }

    /// Emits the move along `segment` ending at its end point.
    ///
    /// * `z` - Nozzle height for the move
    /// * `bead_height` - Thickness of the deposited bead
    /// * `width` - Width of the deposited bead
    /// * `speed` - Print speed in mm/s
    pub fn emit(
        &self,
        segment: &Segment,
        z: f64,
        bead_height: f64,
        width: f64,
        speed: f64,
        tag: Option<MotionTag>,
    ) -> MotionInstruction {
        MotionInstruction::print_move(
            segment.end(),
            z,
            self.flow.for_segment(segment, width, bead_height),
            to_mm_per_min(speed, FeedRateUnits::MmPerSec),
            tag,
        )
    }
}
