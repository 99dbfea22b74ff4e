//! Extrusion flow.
//!
//! The bead laid down by one segment is approximated as a `width × height ×
//! length` box. Its volume has to come out of the nozzle as a cylinder of
//! filament, so the filament length fed is `volume / (π · (d/2)²)`.

use crate::segment::Segment;
use crate::{ToolpathError, ToolpathResult};
use seamkit_core::constants::DEFAULT_FILAMENT_DIAMETER;
use std::f64::consts::PI;

/// Converts bead dimensions into a filament feed length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowCalculator {
    filament_diameter: f64,
    filament_area: f64,
}

impl FlowCalculator {
    /// Creates a calculator for the given filament diameter (mm).
    pub fn new(filament_diameter: f64) -> ToolpathResult<Self> {
        if !filament_diameter.is_finite() || filament_diameter <= 0.0 {
            return Err(ToolpathError::precondition(
                "filament_diameter",
                format!("must be > 0, got {}", filament_diameter),
            ));
        }
        Ok(Self {
            filament_diameter,
            filament_area: PI * (filament_diameter / 2.0).powi(2),
        })
    }

    pub fn filament_diameter(&self) -> f64 {
        self.filament_diameter
    }

    /// Filament length (mm) needed for a bead of the given width, height and length.
    pub fn filament_length(&self, width: f64, height: f64, length: f64) -> f64 {
        width * height * length / self.filament_area
    }

    /// Filament length for a bead laid along `segment`.
    pub fn for_segment(&self, segment: &Segment, width: f64, height: f64) -> f64 {
        self.filament_length(width, height, segment.length())
    }
}

impl Default for FlowCalculator {
    fn default() -> Self {
        Self {
            filament_diameter: DEFAULT_FILAMENT_DIAMETER,
            filament_area: PI * (DEFAULT_FILAMENT_DIAMETER / 2.0).powi(2),
        }
    }
}
