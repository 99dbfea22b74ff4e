//! Full print generation for a stack of concentric rings.

use crate::flow::FlowCalculator;
use crate::gcode::GcodeProgram;
use crate::geometry::{concentric_rings, CircleSpec, Point};
use crate::layer::{LayerBuilder, LayerRequest};
use crate::segment::Ring;
use crate::{ToolpathError, ToolpathResult};
use seamkit_core::constants::{
    DEFAULT_FILAMENT_DIAMETER, DEFAULT_RETRACT_LENGTH, DEFAULT_TRAVEL_SPEED,
};
use seamkit_core::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Parameters for a concentric ring print
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintParameters {
    /// X coordinate of the ring center (mm)
    pub center_x: f64,
    /// Y coordinate of the ring center (mm)
    pub center_y: f64,
    /// Radius of the innermost ring (mm)
    pub base_radius: f64,
    /// Number of concentric rings; the last one is the exterior wall
    pub ring_count: usize,
    /// Polygon vertices per ring
    pub vertex_count: usize,
    /// Angle of the seam point (degrees)
    pub angle_offset: f64,
    /// Bead width, also the spacing between rings (mm)
    pub line_width: f64,
    /// Height gained per layer (mm)
    pub layer_height: f64,
    /// Layers are stacked while their floor is below this height (mm)
    pub figure_height: f64,
    /// Seam blend length for interior rings (mm)
    pub seam_length_internal: f64,
    /// Seam blend length for the exterior ring (mm)
    pub seam_length_external: f64,
    /// Print speed for the first layer (mm/s)
    pub speed_first_layer: f64,
    /// Print speed for interior rings (mm/s)
    pub speed_internal: f64,
    /// Print speed for the exterior ring (mm/s)
    pub speed_external: f64,
    /// Travel speed (mm/s)
    pub travel_speed: f64,
    /// Filament diameter (mm)
    pub filament_diameter: f64,
    /// Retraction before travel (mm)
    pub retract_length: f64,
    /// Literal commands before the first layer
    pub start_gcode: Vec<String>,
    /// Literal commands between the first layer and the rest
    pub after_first_layer_gcode: Vec<String>,
    /// Literal commands after the last layer
    pub end_gcode: Vec<String>,
}

impl Default for PrintParameters {
    fn default() -> Self {
        Self {
            center_x: 90.0,
            center_y: 90.0,
            base_radius: 20.0,
            ring_count: 4,
            vertex_count: 200,
            angle_offset: -90.0,
            line_width: 0.8,
            layer_height: 0.3,
            figure_height: 10.0,
            seam_length_internal: 60.0,
            seam_length_external: 60.0,
            speed_first_layer: 20.0,
            speed_internal: 50.0,
            speed_external: 50.0,
            travel_speed: DEFAULT_TRAVEL_SPEED,
            filament_diameter: DEFAULT_FILAMENT_DIAMETER,
            retract_length: DEFAULT_RETRACT_LENGTH,
            start_gcode: vec![
                "START_PRINT BED_TEMP=80 EXTRUDER_TEMP=240".to_string(),
                "M83".to_string(),
                "M106 S40".to_string(),
            ],
            after_first_layer_gcode: vec!["M106 S128".to_string()],
            end_gcode: vec!["END_PRINT".to_string()],
        }
    }
}

impl PrintParameters {
    pub fn base_circle(&self) -> CircleSpec {
        CircleSpec::new(
            Point::new(self.center_x, self.center_y),
            self.base_radius,
            self.vertex_count,
            self.angle_offset,
        )
    }

    /// Floor heights of every layer after the first, stepped like
    /// `arange(layer_height, figure_height, layer_height)`: there are
    /// `ceil((figure_height - layer_height) / layer_height)` of them, so
    /// rounding can put the last floor at `figure_height` itself.
    pub fn layer_floors(&self) -> Vec<f64> {
        let step = self.layer_height;
        if !step.is_finite()
            || step <= 0.0
            || !self.figure_height.is_finite()
            || self.figure_height <= step
        {
            return Vec::new();
        }
        let count = ((self.figure_height - step) / step).ceil() as usize;
        (0..count).map(|j| step + j as f64 * step).collect()
    }
}

/// Generator for concentric ring prints
pub struct ConcentricPrintGenerator {
    params: PrintParameters,
}

impl ConcentricPrintGenerator {
    /// Create a new generator with the given parameters
    pub fn new(params: PrintParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PrintParameters {
        &self.params
    }

    /// Rings ordered from innermost to the exterior wall
    pub fn rings(&self) -> ToolpathResult<Vec<Ring>> {
        let p = &self.params;
        if p.ring_count == 0 {
            return Err(ToolpathError::precondition("ring_count", "must be >= 1, got 0"));
        }
        concentric_rings(p.base_circle(), p.line_width, p.ring_count)
    }

    fn layer_builder(&self) -> ToolpathResult<LayerBuilder> {
        let p = &self.params;
        LayerBuilder::new(FlowCalculator::new(p.filament_diameter)?, p.line_width)?
            .with_travel_speed(p.travel_speed)?
            .with_retract_length(p.retract_length)
    }

    /// Generate the complete program
    pub fn generate(&self) -> Result<GcodeProgram> {
        let p = &self.params;
        if !p.layer_height.is_finite() || p.layer_height <= 0.0 {
            return Err(ToolpathError::precondition(
                "layer_height",
                format!("must be > 0, got {}", p.layer_height),
            )
            .into());
        }

        let rings = self.rings()?;
        let builder = self.layer_builder()?;
        let floors = p.layer_floors();

        info!(
            rings = rings.len(),
            layers = floors.len() + 1,
            vertices = p.vertex_count,
            "Generating concentric print"
        );

        let mut program = GcodeProgram::new();
        for line in &p.start_gcode {
            program.push_literal(line.as_str());
        }

        // First layer is flat: no seam blending
        let first = LayerRequest::new(0.0, p.layer_height, 0.0, p.speed_first_layer);
        for ring in &rings {
            program.extend_motions(builder.build(ring, &first)?);
        }

        for line in &p.after_first_layer_gcode {
            program.push_literal(line.as_str());
        }

        // The exterior ring is printed last on every layer
        let (exterior, interior) = rings
            .split_last()
            .ok_or_else(|| ToolpathError::degenerate("no rings to print"))?;

        for floor in floors {
            debug!(floor, "Layer");
            let inner = LayerRequest::new(
                floor,
                p.layer_height,
                p.seam_length_internal,
                p.speed_internal,
            );
            for ring in interior {
                program.extend_motions(builder.build(ring, &inner)?);
            }
            let outer = LayerRequest::new(
                floor,
                p.layer_height,
                p.seam_length_external,
                p.speed_external,
            );
            program.extend_motions(builder.build(exterior, &outer)?);
        }

        for line in &p.end_gcode {
            program.push_literal(line.as_str());
        }

        info!(
            lines = program.len(),
            filament_mm = program.total_extrusion(),
            "Print generated"
        );
        Ok(program)
    }
}
